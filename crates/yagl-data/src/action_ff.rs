//! Action 0xFF: a sound effect stored in the graphics section.

use std::fmt::Write;

use yagl_types::SpriteColour;

use crate::descriptors::{pad, parse_bytes, print_bytes, quote_bytes, string_bytes, PrintError};
use crate::stream::{ReadError, Reader, Writer};
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

pub const RECORD_NAME: &str = "sound_effect";

const MAX_NAME_LEN: usize = u8::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFFRecord {
    /// File name bytes as stored; not necessarily UTF-8. At most 255 bytes
    /// are written.
    pub name: Vec<u8>,
    /// Wave file contents.
    pub data: Vec<u8>,
}

impl ActionFFRecord {
    /// Reads one graphics entry body, starting at the `0xFF` info byte.
    pub fn read(r: &mut Reader) -> Result<Self, ReadError> {
        let offset = r.pos();
        let info = r.read_u8()?;
        if info != SpriteColour::SOUND {
            return Err(ReadError::InvalidValue {
                field: "sound info",
                value: info.into(),
                offset,
            });
        }
        let name_len = usize::from(r.read_u8()?);
        let name = r.read_bytes(name_len)?.to_vec();
        Ok(Self {
            name,
            data: r.read_rest().to_vec(),
        })
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_u8(SpriteColour::SOUND);
        let len = self.name.len().min(MAX_NAME_LEN);
        if len < self.name.len() {
            log::warn!("sound name of {} bytes cut to {MAX_NAME_LEN}", self.name.len());
        }
        w.write_u8(len as u8);
        w.write_bytes(&self.name[..len]);
        w.write_bytes(&self.data);
    }

    pub fn print(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        writeln!(out, "{}{RECORD_NAME}({})", pad(indent), quote_bytes(&self.name))?;
        writeln!(out, "{}{{", pad(indent))?;
        print_bytes("data", &self.data, out, indent + 4)?;
        writeln!(out, "{}}}", pad(indent))?;
        Ok(())
    }

    pub fn parse(ts: &mut TokenStream) -> Result<Self, ParseError> {
        ts.match_ident(RECORD_NAME)?;
        ts.expect(&Token::OpenParen)?;
        let text = ts.string()?;
        let name = string_bytes(&text)
            .filter(|bytes| bytes.len() <= MAX_NAME_LEN)
            .ok_or_else(|| ts.structural("sound file name of at most 255 bytes"))?;
        ts.expect(&Token::CloseParen)?;
        ts.expect(&Token::OpenBrace)?;
        let data = parse_bytes("data", ts)?;
        ts.expect(&Token::CloseBrace)?;
        Ok(Self { name, data })
    }
}
