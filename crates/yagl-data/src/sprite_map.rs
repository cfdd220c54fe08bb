//! Images and sounds stored in the graphics section, keyed by sprite id.
//!
//! Sprite index records in the data section only hold an id. The children
//! live here so that several indices can refer to the same id and so that the
//! graphics section can be rewritten in the order it was read.

use std::collections::HashMap;

use yagl_types::{SpriteColour, SpriteId};

use crate::action_ff::ActionFFRecord;
use crate::descriptors::PrintError;
use crate::real_sprite::RealSpriteRecord;
use crate::stream::{ReadError, Reader, Writer};
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

/// One graphics-section entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteChild {
    Image(RealSpriteRecord),
    Sound(ActionFFRecord),
}

impl SpriteChild {
    /// Reads an entry body; the first byte tells a sound from an image.
    pub fn read(r: &mut Reader) -> Result<Self, ReadError> {
        if r.peek_u8()? == SpriteColour::SOUND {
            Ok(Self::Sound(ActionFFRecord::read(r)?))
        } else {
            Ok(Self::Image(RealSpriteRecord::read(r)?))
        }
    }

    pub fn write(&self, w: &mut Writer) {
        match self {
            Self::Image(image) => image.write(w),
            Self::Sound(sound) => sound.write(w),
        }
    }

    pub fn print(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        match self {
            Self::Image(image) => image.print(out, indent),
            Self::Sound(sound) => sound.print(out, indent),
        }
    }

    /// `[` opens an image, anything else must be a sound effect.
    pub fn parse(ts: &mut TokenStream) -> Result<Self, ParseError> {
        if *ts.peek() == Token::OpenBracket {
            Ok(Self::Image(RealSpriteRecord::parse(ts)?))
        } else {
            Ok(Self::Sound(ActionFFRecord::parse(ts)?))
        }
    }
}

/// Sole owner of every [`SpriteChild`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteZoomMap {
    children: HashMap<SpriteId, Vec<SpriteChild>>,
    order: Vec<SpriteId>,
}

impl SpriteZoomMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child to `id`, registering the id on first use.
    pub fn push(&mut self, id: SpriteId, child: SpriteChild) {
        let list = self.children.entry(id).or_insert_with(|| {
            self.order.push(id);
            Vec::new()
        });
        list.push(child);
    }

    /// Children of `id` in arrival order; empty when the id is unknown.
    pub fn get(&self, id: SpriteId) -> &[SpriteChild] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.children.contains_key(&id)
    }

    /// Registers the full child list of `id`.
    ///
    /// Registering the same list again is a no-op. Returns `false`, leaving the
    /// map untouched, when `id` already holds different children.
    pub fn register(&mut self, id: SpriteId, children: Vec<SpriteChild>) -> bool {
        if children.is_empty() {
            return true;
        }
        match self.children.get(&id) {
            Some(existing) => *existing == children,
            None => {
                self.order.push(id);
                self.children.insert(id, children);
                true
            }
        }
    }

    /// Ids in first-registration order with their children.
    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &[SpriteChild])> + '_ {
        self.order.iter().map(|&id| (id, self.get(id)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
