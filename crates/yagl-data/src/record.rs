//! The closed set of data-section records.

use crate::action0d::{self, Action0DRecord, ACTION_0D};
use crate::descriptors::PrintError;
use crate::raw_action::{self, RawActionRecord};
use crate::sprite_index::{self, SpriteIndexRecord, INFO_SPRITE_INDEX};
use crate::sprite_map::SpriteZoomMap;
use crate::stream::{ReadError, Reader, Writer};
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

/// Info byte of an action pseudo-sprite.
pub const INFO_ACTION: u8 = 0xFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    ParameterExpression(Action0DRecord),
    SpriteIndex(SpriteIndexRecord),
    RawAction(RawActionRecord),
}

impl Record {
    /// Decodes one data-section entry. `r` must span exactly the payload.
    pub fn read(info: u8, info_offset: usize, r: &mut Reader) -> Result<Self, ReadError> {
        let record = match info {
            INFO_ACTION => {
                let opcode = r.read_u8()?;
                log::trace!("action {opcode:#04x} at offset {info_offset}");
                match opcode {
                    ACTION_0D => Self::ParameterExpression(Action0DRecord::read(r)?),
                    _ => Self::RawAction(RawActionRecord::read(opcode, r)),
                }
            }
            INFO_SPRITE_INDEX => Self::SpriteIndex(SpriteIndexRecord::read(r)?),
            value => {
                return Err(ReadError::UnknownInfo {
                    value,
                    offset: info_offset,
                });
            }
        };
        r.finish()?;
        Ok(record)
    }

    pub fn info_byte(&self) -> u8 {
        match self {
            Self::ParameterExpression(_) | Self::RawAction(_) => INFO_ACTION,
            Self::SpriteIndex(_) => INFO_SPRITE_INDEX,
        }
    }

    /// Writes the payload, not including the size and info byte.
    pub fn write(&self, w: &mut Writer) {
        match self {
            Self::ParameterExpression(record) => record.write(w),
            Self::SpriteIndex(record) => record.write(w),
            Self::RawAction(record) => record.write(w),
        }
    }

    pub fn print(&self, sprites: &SpriteZoomMap, out: &mut String, indent: usize) -> Result<(), PrintError> {
        match self {
            Self::ParameterExpression(record) => record.print(out, indent),
            Self::SpriteIndex(record) => record.print(sprites, out, indent),
            Self::RawAction(record) => record.print(out, indent),
        }
    }

    /// Dispatches on the leading identifier of the record.
    pub fn parse(ts: &mut TokenStream, sprites: &mut SpriteZoomMap) -> Result<Self, ParseError> {
        let name = match ts.peek() {
            Token::Ident(name) => name.clone(),
            _ => return Err(ts.structural("record")),
        };
        log::trace!("parsing {name} at {:?}", ts.location());
        match name.as_str() {
            action0d::RECORD_NAME => Ok(Self::ParameterExpression(Action0DRecord::parse(ts)?)),
            sprite_index::RECORD_NAME => Ok(Self::SpriteIndex(SpriteIndexRecord::parse(ts, sprites)?)),
            raw_action::RECORD_NAME => Ok(Self::RawAction(RawActionRecord::parse(ts)?)),
            other => Err(ts.unknown_identifier("record", other)),
        }
    }
}
