//! Self-describing field handlers.
//!
//! A descriptor knows one field's name and encoding and implements the four
//! operations every record needs: read and write against the byte stream,
//! print and parse against the YAGL text. Descriptors are `static` tables.

use std::fmt::Write;
use std::marker::PhantomData;

use bitflags::Flags;
use yagl_types::{ExpressionKind, Feature, GrfLabel, GrmOperator, Operation, ZoomLevel};

use crate::stream::{ReadError, Reader, Writer};
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("{descriptor}: value {value:#x} has no symbolic name")]
    UnmappedValue {
        descriptor: &'static str,
        value: u32,
    },
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

/// Indentation used by every printer.
pub fn pad(indent: usize) -> String {
    " ".repeat(indent)
}

/// `0x` followed by lowercase digits padded to the width of `T`.
pub fn to_hex<T: UInt>(value: T) -> String {
    format!("0x{:0width$x}", value.to_u64(), width = T::HEX_DIGITS)
}

/// Fixed-width unsigned field types.
pub trait UInt: Copy + Eq + std::fmt::Debug + 'static {
    const MAX: u64;
    const HEX_DIGITS: usize;
    fn to_u64(self) -> u64;
    /// Caller has already range-checked `value` against `MAX`.
    fn from_u64(value: u64) -> Self;
    fn read(r: &mut Reader) -> Result<Self, ReadError>;
    fn write(self, w: &mut Writer);
}

macro_rules! uint_impl {
    ($t:ty, $digits:expr, $read:ident, $write:ident) => {
        impl UInt for $t {
            const MAX: u64 = <$t>::MAX as u64;
            const HEX_DIGITS: usize = $digits;
            fn to_u64(self) -> u64 {
                self.into()
            }
            fn from_u64(value: u64) -> Self {
                value as $t
            }
            fn read(r: &mut Reader) -> Result<Self, ReadError> {
                r.$read()
            }
            fn write(self, w: &mut Writer) {
                w.$write(self)
            }
        }
    };
}

uint_impl!(u8, 2, read_u8, write_u8);
uint_impl!(u16, 4, read_u16, write_u16);
uint_impl!(u32, 8, read_u32, write_u32);

/// Extended byte: one byte on the wire, or `0xFF` and a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtByte(pub u16);

impl UInt for ExtByte {
    const MAX: u64 = u16::MAX as u64;
    const HEX_DIGITS: usize = 4;
    fn to_u64(self) -> u64 {
        self.0.into()
    }
    fn from_u64(value: u64) -> Self {
        Self(value as u16)
    }
    fn read(r: &mut Reader) -> Result<Self, ReadError> {
        r.read_ext_u8().map(Self)
    }
    fn write(self, w: &mut Writer) {
        w.write_ext_u8(self.0)
    }
}

pub trait Descriptor {
    type Value;

    fn name(&self) -> &'static str;
    fn read(&self, r: &mut Reader) -> Result<Self::Value, ReadError>;
    fn write(&self, value: &Self::Value, w: &mut Writer);
    /// Text of the value alone, for use inside larger expressions.
    fn print_value(&self, value: &Self::Value) -> Result<String, PrintError>;
    fn parse_value(&self, ts: &mut TokenStream) -> Result<Self::Value, ParseError>;

    /// `<name>: <value>;` on its own line.
    fn print(&self, value: &Self::Value, out: &mut String, indent: usize) -> Result<(), PrintError> {
        let text = self.print_value(value)?;
        writeln!(out, "{}{}: {};", pad(indent), self.name(), text)?;
        Ok(())
    }

    fn parse(&self, ts: &mut TokenStream) -> Result<Self::Value, ParseError> {
        ts.match_ident(self.name())?;
        ts.expect(&Token::Colon)?;
        let value = self.parse_value(ts)?;
        ts.expect(&Token::SemiColon)?;
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UIntFormat {
    Dec,
    Hex,
}

pub struct IntegerDescriptor<T> {
    name: &'static str,
    format: UIntFormat,
    _width: PhantomData<T>,
}

impl<T: UInt> IntegerDescriptor<T> {
    pub const fn new(name: &'static str, format: UIntFormat) -> Self {
        Self {
            name,
            format,
            _width: PhantomData,
        }
    }
}

impl<T: UInt> Descriptor for IntegerDescriptor<T> {
    type Value = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self, r: &mut Reader) -> Result<T, ReadError> {
        T::read(r)
    }

    fn write(&self, value: &T, w: &mut Writer) {
        value.write(w)
    }

    fn print_value(&self, value: &T) -> Result<String, PrintError> {
        Ok(match self.format {
            UIntFormat::Dec => value.to_u64().to_string(),
            UIntFormat::Hex => to_hex(*value),
        })
    }

    fn parse_value(&self, ts: &mut TokenStream) -> Result<T, ParseError> {
        Ok(T::from_u64(ts.integer(T::MAX)?))
    }
}

/// Typed enums with a single-byte representation.
pub trait EnumRepr: Copy + PartialEq + 'static {
    fn to_raw(self) -> u8;
    fn from_raw(raw: u8) -> Option<Self>;
}

macro_rules! enum_repr {
    ($($t:ty),* $(,)?) => {$(
        impl EnumRepr for $t {
            fn to_raw(self) -> u8 {
                self as u8
            }
            fn from_raw(raw: u8) -> Option<Self> {
                Self::from_repr(raw)
            }
        }
    )*};
}

enum_repr!(Operation, GrmOperator, Feature, ZoomLevel, ExpressionKind);

/// Byte-sized enum with an ordered table of symbolic names.
pub struct EnumDescriptor<T: 'static> {
    pub name: &'static str,
    pub entries: &'static [(T, &'static str)],
}

impl<T: EnumRepr> EnumDescriptor<T> {
    pub fn value_name(&self, value: T) -> Result<&'static str, PrintError> {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, name)| *name)
            .ok_or(PrintError::UnmappedValue {
                descriptor: self.name,
                value: value.to_raw().into(),
            })
    }

    pub fn lookup(&self, name: &str) -> Option<T> {
        self.entries.iter().find(|(_, n)| *n == name).map(|(v, _)| *v)
    }
}

impl<T: EnumRepr> Descriptor for EnumDescriptor<T> {
    type Value = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self, r: &mut Reader) -> Result<T, ReadError> {
        let offset = r.pos();
        let raw = r.read_u8()?;
        T::from_raw(raw).ok_or(ReadError::InvalidValue {
            field: self.name,
            value: raw.into(),
            offset,
        })
    }

    fn write(&self, value: &T, w: &mut Writer) {
        w.write_u8(value.to_raw())
    }

    fn print_value(&self, value: &T) -> Result<String, PrintError> {
        self.value_name(*value).map(str::to_string)
    }

    fn parse_value(&self, ts: &mut TokenStream) -> Result<T, ParseError> {
        let name = ts.ident()?;
        self.lookup(&name)
            .ok_or_else(|| ts.unknown_identifier(self.name, &name))
    }
}

pub struct BoolDescriptor {
    pub name: &'static str,
}

impl Descriptor for BoolDescriptor {
    type Value = bool;

    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self, r: &mut Reader) -> Result<bool, ReadError> {
        let offset = r.pos();
        match r.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            raw => Err(ReadError::InvalidValue {
                field: self.name,
                value: raw.into(),
                offset,
            }),
        }
    }

    fn write(&self, value: &bool, w: &mut Writer) {
        w.write_u8(u8::from(*value))
    }

    fn print_value(&self, value: &bool) -> Result<String, PrintError> {
        let text = if *value { "true" } else { "false" };
        Ok(text.to_string())
    }

    fn parse_value(&self, ts: &mut TokenStream) -> Result<bool, ParseError> {
        let name = ts.ident()?;
        match name.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ts.unknown_identifier(self.name, &name)),
        }
    }
}

pub struct LabelDescriptor {
    pub name: &'static str,
}

impl Descriptor for LabelDescriptor {
    type Value = GrfLabel;

    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self, r: &mut Reader) -> Result<GrfLabel, ReadError> {
        r.read_label()
    }

    fn write(&self, value: &GrfLabel, w: &mut Writer) {
        w.write_label(*value)
    }

    fn print_value(&self, value: &GrfLabel) -> Result<String, PrintError> {
        Ok(value.to_string())
    }

    fn parse_value(&self, ts: &mut TokenStream) -> Result<GrfLabel, ParseError> {
        match ts.peek() {
            Token::String(s) => {
                let label = GrfLabel::from_text(s).ok_or_else(|| ts.structural("4-byte label"))?;
                ts.next();
                Ok(label)
            }
            _ => Err(ts.structural("4-byte label")),
        }
    }
}

/// Byte-sized set of flags printed as `Name | Name`, or `none` when empty.
pub struct BitfieldDescriptor<F: 'static> {
    pub name: &'static str,
    pub entries: &'static [(F, &'static str)],
}

const NO_FLAGS: &str = "none";

impl<F: Flags<Bits = u8> + Copy> Descriptor for BitfieldDescriptor<F> {
    type Value = F;

    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self, r: &mut Reader) -> Result<F, ReadError> {
        let offset = r.pos();
        let raw = r.read_u8()?;
        F::from_bits(raw).ok_or(ReadError::InvalidValue {
            field: self.name,
            value: raw.into(),
            offset,
        })
    }

    fn write(&self, value: &F, w: &mut Writer) {
        w.write_u8(value.bits())
    }

    fn print_value(&self, value: &F) -> Result<String, PrintError> {
        let mut names = Vec::new();
        let mut covered = 0u8;
        for (flag, name) in self.entries {
            if value.contains(*flag) {
                names.push(*name);
                covered |= flag.bits();
            }
        }
        if value.bits() & !covered != 0 {
            return Err(PrintError::UnmappedValue {
                descriptor: self.name,
                value: value.bits().into(),
            });
        }
        if names.is_empty() {
            return Ok(NO_FLAGS.to_string());
        }
        Ok(names.join(" | "))
    }

    fn parse_value(&self, ts: &mut TokenStream) -> Result<F, ParseError> {
        let first = ts.ident()?;
        if first == NO_FLAGS {
            return Ok(F::empty());
        }
        let mut value = F::empty();
        let mut name = first;
        loop {
            let flag = self
                .entries
                .iter()
                .find(|(_, n)| *n == name)
                .map(|(f, _)| *f)
                .ok_or_else(|| ts.unknown_identifier(self.name, &name))?;
            value.insert(flag);
            if !ts.accept(&Token::Pipe) {
                return Ok(value);
            }
            name = ts.ident()?;
        }
    }
}

/// Quoted string where each byte is one char; bytes outside printable ASCII
/// are written as `\xNN` so the text stays lossless.
pub fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::from("\"");
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7E => out.push(char::from(b)),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push('"');
    out
}

/// Inverse of [`quote_bytes`] for the string token content. Each char is one
/// byte value; the lexer only produces chars above `0x7F` from `\xNN`
/// escapes, so this never reinterprets encoded text.
pub fn string_bytes(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

const BYTES_PER_LINE: usize = 16;

/// Opaque byte run printed as a bracketed list of hex bytes.
pub fn print_bytes(name: &str, bytes: &[u8], out: &mut String, indent: usize) -> Result<(), PrintError> {
    if bytes.is_empty() {
        writeln!(out, "{}{name}: [ ];", pad(indent))?;
        return Ok(());
    }
    writeln!(out, "{}{name}:", pad(indent))?;
    writeln!(out, "{}[", pad(indent))?;
    for chunk in bytes.chunks(BYTES_PER_LINE) {
        let line: Vec<String> = chunk.iter().map(|b| to_hex(*b)).collect();
        writeln!(out, "{}{}", pad(indent + 4), line.join(" "))?;
    }
    writeln!(out, "{}];", pad(indent))?;
    Ok(())
}

pub fn parse_bytes(name: &str, ts: &mut TokenStream) -> Result<Vec<u8>, ParseError> {
    ts.match_ident(name)?;
    ts.expect(&Token::Colon)?;
    ts.expect(&Token::OpenBracket)?;
    let mut bytes = Vec::new();
    while !ts.accept(&Token::CloseBracket) {
        bytes.push(ts.match_u8()?);
    }
    ts.expect(&Token::SemiColon)?;
    Ok(bytes)
}
