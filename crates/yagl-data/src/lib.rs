//! Codec between NFO/GRF binary records and YAGL text.
//!
//! Both directions meet in the same record model: [`Document::read`] and
//! [`Document::parse`] build it, [`Document::write`] and [`Document::print`]
//! render it.

pub mod action0d;
pub mod action_ff;
pub mod container;
pub mod descriptors;
pub mod document;
pub mod raw_action;
pub mod real_sprite;
pub mod record;
pub mod sprite_index;
pub mod sprite_map;
pub mod stream;
pub mod token_stream;
pub mod yagl_lexer;

pub use descriptors::PrintError;
pub use document::Document;
pub use record::Record;
pub use sprite_map::{SpriteChild, SpriteZoomMap};
pub use stream::ReadError;
pub use token_stream::ParseError;
pub use yagl_lexer::LexError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Print(#[from] PrintError),
}

/// Decodes a GRF file and renders it as YAGL text.
pub fn decode(data: &[u8]) -> Result<String, Error> {
    Ok(Document::read(data)?.print()?)
}

/// Parses YAGL text and encodes it as a GRF file.
pub fn encode(text: &str) -> Result<Vec<u8>, Error> {
    Ok(Document::parse(text)?.write())
}
