//! A whole GRF file as records plus the sprites they refer to.

use std::collections::HashSet;

use yagl_types::SpriteId;

use crate::container::{read_grf, write_grf};
use crate::descriptors::PrintError;
use crate::record::Record;
use crate::sprite_index::{parse_unreferenced, print_unreferenced, UNREFERENCED_NAME};
use crate::sprite_map::SpriteZoomMap;
use crate::stream::ReadError;
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub records: Vec<Record>,
    pub sprites: SpriteZoomMap,
}

impl Document {
    pub fn read(data: &[u8]) -> Result<Self, ReadError> {
        let (records, sprites) = read_grf(data)?;
        let doc = Self { records, sprites };
        for id in doc.unreferenced_sprites() {
            log::warn!("graphics for sprite id {id:#x} are not referenced by any sprite index");
        }
        Ok(doc)
    }

    pub fn write(&self) -> Vec<u8> {
        write_grf(&self.records, &self.sprites)
    }

    pub fn print(&self) -> Result<String, PrintError> {
        let mut out = String::new();
        for record in &self.records {
            record.print(&self.sprites, &mut out, 0)?;
        }
        for id in self.unreferenced_sprites() {
            print_unreferenced(id, &self.sprites, &mut out, 0)?;
        }
        Ok(out)
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut ts = TokenStream::from_text(text)?;
        let mut doc = Self::default();
        while !ts.at_eof() {
            if matches!(ts.peek(), Token::Ident(name) if name == UNREFERENCED_NAME) {
                parse_unreferenced(&mut ts, &mut doc.sprites)?;
                continue;
            }
            let record = Record::parse(&mut ts, &mut doc.sprites)?;
            doc.records.push(record);
        }
        Ok(doc)
    }

    /// Sprite ids with graphics but no index record, in map order. Text
    /// output lists them after the records as `unreferenced_sprite` blocks.
    pub fn unreferenced_sprites(&self) -> Vec<SpriteId> {
        let referenced: HashSet<SpriteId> = self
            .records
            .iter()
            .filter_map(|record| match record {
                Record::SpriteIndex(index) => Some(index.sprite_id),
                _ => None,
            })
            .collect();
        self.sprites
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !referenced.contains(id))
            .collect()
    }
}
