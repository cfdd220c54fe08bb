//! Data-section entries that point at graphics by sprite id.

use std::fmt::Write;

use yagl_types::SpriteId;

use crate::descriptors::{pad, to_hex, Descriptor, IntegerDescriptor, PrintError, UIntFormat};
use crate::sprite_map::{SpriteChild, SpriteZoomMap};
use crate::stream::{ReadError, Reader, Writer};
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

/// Info byte of a sprite index entry.
pub const INFO_SPRITE_INDEX: u8 = 0xFD;
pub const RECORD_NAME: &str = "sprite_id";
pub const UNREFERENCED_NAME: &str = "unreferenced_sprite";

/// Terminates the graphics section, so it can never own children.
const GRAPHICS_END: SpriteId = 0;

static DESC_SPRITE_ID: IntegerDescriptor<SpriteId> = IntegerDescriptor::new(RECORD_NAME, UIntFormat::Hex);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteIndexRecord {
    pub sprite_id: SpriteId,
}

impl SpriteIndexRecord {
    pub fn read(r: &mut Reader) -> Result<Self, ReadError> {
        Ok(Self {
            sprite_id: DESC_SPRITE_ID.read(r)?,
        })
    }

    pub fn write(&self, w: &mut Writer) {
        DESC_SPRITE_ID.write(&self.sprite_id, w);
    }

    pub fn print(&self, sprites: &SpriteZoomMap, out: &mut String, indent: usize) -> Result<(), PrintError> {
        if sprites.get(self.sprite_id).is_empty() {
            log::debug!("sprite id {:#x} has no images or sounds", self.sprite_id);
        }
        print_block(RECORD_NAME, self.sprite_id, sprites, out, indent)
    }

    /// Parses the block and registers its children under the id.
    pub fn parse(ts: &mut TokenStream, sprites: &mut SpriteZoomMap) -> Result<Self, ParseError> {
        let sprite_id = parse_block(RECORD_NAME, ts, sprites)?;
        Ok(Self { sprite_id })
    }
}

/// Graphics that no sprite index refers to. The block has the same body as
/// a `sprite_id` block but produces no record, only map entries.
pub fn print_unreferenced(
    sprite_id: SpriteId,
    sprites: &SpriteZoomMap,
    out: &mut String,
    indent: usize,
) -> Result<(), PrintError> {
    print_block(UNREFERENCED_NAME, sprite_id, sprites, out, indent)
}

pub fn parse_unreferenced(ts: &mut TokenStream, sprites: &mut SpriteZoomMap) -> Result<SpriteId, ParseError> {
    parse_block(UNREFERENCED_NAME, ts, sprites)
}

fn print_block(
    keyword: &str,
    sprite_id: SpriteId,
    sprites: &SpriteZoomMap,
    out: &mut String,
    indent: usize,
) -> Result<(), PrintError> {
    writeln!(
        out,
        "{}{keyword}: {}",
        pad(indent),
        DESC_SPRITE_ID.print_value(&sprite_id)?
    )?;
    writeln!(out, "{}{{", pad(indent))?;
    for child in sprites.get(sprite_id) {
        child.print(out, indent + 4)?;
    }
    writeln!(out, "{}}}", pad(indent))?;
    Ok(())
}

fn parse_block(keyword: &str, ts: &mut TokenStream, sprites: &mut SpriteZoomMap) -> Result<SpriteId, ParseError> {
    let (line, col) = ts.location();
    ts.match_ident(keyword)?;
    ts.expect(&Token::Colon)?;
    let sprite_id = DESC_SPRITE_ID.parse_value(ts)?;

    ts.expect(&Token::OpenBrace)?;
    let mut children = Vec::new();
    while !ts.accept(&Token::CloseBrace) {
        children.push(SpriteChild::parse(ts)?);
    }

    if sprite_id == GRAPHICS_END && !children.is_empty() {
        return Err(ParseError::Structural {
            line,
            col,
            expected: "non-zero sprite id for images or sounds".to_string(),
            found: to_hex(sprite_id),
        });
    }
    if !sprites.register(sprite_id, children) {
        return Err(ParseError::Structural {
            line,
            col,
            expected: format!("the same children as the earlier block for {}", to_hex(sprite_id)),
            found: "different children".to_string(),
        });
    }
    Ok(sprite_id)
}
