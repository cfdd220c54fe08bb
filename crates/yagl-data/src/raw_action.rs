//! Actions this crate does not model field by field.
//!
//! The opcode and payload pass through untouched so that whole files still
//! round-trip when they contain actions beyond 0x0D.

use std::fmt::Write;

use crate::action0d::ACTION_0D;
use crate::descriptors::{pad, parse_bytes, print_bytes, to_hex, PrintError};
use crate::stream::{Reader, Writer};
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

pub const RECORD_NAME: &str = "raw_action";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawActionRecord {
    pub opcode: u8,
    pub data: Vec<u8>,
}

impl RawActionRecord {
    /// Takes the remainder of the pseudo-sprite after its opcode.
    pub fn read(opcode: u8, r: &mut Reader) -> Self {
        Self {
            opcode,
            data: r.read_rest().to_vec(),
        }
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_u8(self.opcode);
        w.write_bytes(&self.data);
    }

    pub fn print(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        writeln!(
            out,
            "{}{RECORD_NAME}<{}> // Action{:02X}",
            pad(indent),
            to_hex(self.opcode),
            self.opcode
        )?;
        writeln!(out, "{}{{", pad(indent))?;
        print_bytes("data", &self.data, out, indent + 4)?;
        writeln!(out, "{}}}", pad(indent))?;
        Ok(())
    }

    pub fn parse(ts: &mut TokenStream) -> Result<Self, ParseError> {
        ts.match_ident(RECORD_NAME)?;
        ts.expect(&Token::OpenAngle)?;
        if *ts.peek() == Token::Integer(ACTION_0D.into()) {
            return Err(ts.structural("an opcode other than 0x0D"));
        }
        let opcode = ts.match_u8()?;
        ts.expect(&Token::CloseAngle)?;
        ts.expect(&Token::OpenBrace)?;
        let data = parse_bytes("data", ts)?;
        ts.expect(&Token::CloseBrace)?;
        Ok(Self { opcode, data })
    }
}
