//! Real sprite images from the graphics section.
//!
//! Pixel data is opaque: it is carried byte for byte and never decoded.

use std::fmt::Write;

use yagl_types::{SpriteColour, ZoomLevel};

use crate::descriptors::{
    pad, parse_bytes, print_bytes, BitfieldDescriptor, Descriptor, EnumDescriptor, IntegerDescriptor,
    PrintError, UIntFormat,
};
use crate::stream::{ReadError, Reader, Writer};
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

static DESC_COLOUR: BitfieldDescriptor<SpriteColour> = BitfieldDescriptor {
    name: "colour",
    entries: &[
        (SpriteColour::RGB, "RGB"),
        (SpriteColour::ALPHA, "Alpha"),
        (SpriteColour::PALETTE, "Palette"),
        (SpriteColour::CHUNKED, "Chunked"),
        (SpriteColour::NO_CROP, "NoCrop"),
    ],
};

static DESC_ZOOM: EnumDescriptor<ZoomLevel> = EnumDescriptor {
    name: "zoom",
    entries: &[
        (ZoomLevel::Normal, "Normal"),
        (ZoomLevel::ZoomIn4, "ZoomIn4"),
        (ZoomLevel::ZoomIn2, "ZoomIn2"),
        (ZoomLevel::ZoomOut2, "ZoomOut2"),
        (ZoomLevel::ZoomOut4, "ZoomOut4"),
        (ZoomLevel::ZoomOut8, "ZoomOut8"),
    ],
};

static DESC_HEIGHT: IntegerDescriptor<u16> = IntegerDescriptor::new("height", UIntFormat::Dec);
static DESC_WIDTH: IntegerDescriptor<u16> = IntegerDescriptor::new("width", UIntFormat::Dec);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealSpriteRecord {
    pub colour: SpriteColour,
    pub zoom: ZoomLevel,
    pub height: u16,
    pub width: u16,
    pub x_offset: i16,
    pub y_offset: i16,
    pub data: Vec<u8>,
}

impl RealSpriteRecord {
    /// Reads one graphics entry body, starting at the colour byte.
    pub fn read(r: &mut Reader) -> Result<Self, ReadError> {
        Ok(Self {
            colour: DESC_COLOUR.read(r)?,
            zoom: DESC_ZOOM.read(r)?,
            height: DESC_HEIGHT.read(r)?,
            width: DESC_WIDTH.read(r)?,
            x_offset: r.read_i16()?,
            y_offset: r.read_i16()?,
            data: r.read_rest().to_vec(),
        })
    }

    pub fn write(&self, w: &mut Writer) {
        DESC_COLOUR.write(&self.colour, w);
        DESC_ZOOM.write(&self.zoom, w);
        DESC_HEIGHT.write(&self.height, w);
        DESC_WIDTH.write(&self.width, w);
        w.write_i16(self.x_offset);
        w.write_i16(self.y_offset);
        w.write_bytes(&self.data);
    }

    pub fn print(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        writeln!(
            out,
            "{}[{}, {}, {}, {}]",
            pad(indent),
            self.x_offset,
            self.y_offset,
            DESC_WIDTH.print_value(&self.width)?,
            DESC_HEIGHT.print_value(&self.height)?
        )?;
        writeln!(out, "{}{{", pad(indent))?;
        DESC_ZOOM.print(&self.zoom, out, indent + 4)?;
        DESC_COLOUR.print(&self.colour, out, indent + 4)?;
        print_bytes("data", &self.data, out, indent + 4)?;
        writeln!(out, "{}}}", pad(indent))?;
        Ok(())
    }

    /// `[x_offset, y_offset, width, height] { zoom; colour; data; }`
    pub fn parse(ts: &mut TokenStream) -> Result<Self, ParseError> {
        ts.expect(&Token::OpenBracket)?;
        let x_offset = ts.match_i16()?;
        ts.expect(&Token::Comma)?;
        let y_offset = ts.match_i16()?;
        ts.expect(&Token::Comma)?;
        let width = DESC_WIDTH.parse_value(ts)?;
        ts.expect(&Token::Comma)?;
        let height = DESC_HEIGHT.parse_value(ts)?;
        ts.expect(&Token::CloseBracket)?;

        ts.expect(&Token::OpenBrace)?;
        let zoom = DESC_ZOOM.parse(ts)?;
        let colour = DESC_COLOUR.parse(ts)?;
        let data = parse_bytes("data", ts)?;
        ts.expect(&Token::CloseBrace)?;

        Ok(Self {
            colour,
            zoom,
            height,
            width,
            x_offset,
            y_offset,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RealSpriteRecord {
        RealSpriteRecord {
            colour: SpriteColour::RGB | SpriteColour::ALPHA,
            zoom: ZoomLevel::ZoomIn2,
            height: 2,
            width: 1,
            x_offset: -4,
            y_offset: 7,
            data: vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80],
        }
    }

    #[test]
    fn binary_layout() {
        let mut w = Writer::new();
        sample().write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..10], &[0x03, 0x02, 0x02, 0x00, 0x01, 0x00, 0xFC, 0xFF, 0x07, 0x00]);
        let mut r = Reader::new(&bytes);
        assert_eq!(RealSpriteRecord::read(&mut r).expect("read"), sample());
    }

    #[test]
    fn text_layout() {
        let mut out = String::new();
        sample().print(&mut out, 4).expect("print");
        assert!(out.starts_with("    [-4, 7, 1, 2]\n    {\n        zoom: ZoomIn2;\n        colour: RGB | Alpha;\n"));
        let mut ts = TokenStream::from_text(&out).expect("lex");
        assert_eq!(RealSpriteRecord::parse(&mut ts).expect("parse"), sample());
    }

    #[test]
    fn undefined_colour_bits_are_rejected() {
        let mut r = Reader::new(&[0x10, 0x00, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            RealSpriteRecord::read(&mut r),
            Err(ReadError::InvalidValue { field: "colour", value: 0x10, .. })
        ));
    }
}
