use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Colour and compression bits of a container version 2 real sprite.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct SpriteColour: u8 {
        const RGB     = 0x01;
        const ALPHA   = 0x02;
        const PALETTE = 0x04;
        const CHUNKED = 0x08;
        const NO_CROP = 0x40;
    }
}

impl SpriteColour {
    /// Info byte value that marks a graphics entry as a sound effect.
    pub const SOUND: u8 = 0xFF;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values() {
        assert_eq!(SpriteColour::RGB.bits(), 0x01);
        assert_eq!(SpriteColour::ALPHA.bits(), 0x02);
        assert_eq!(SpriteColour::PALETTE.bits(), 0x04);
        assert_eq!(SpriteColour::CHUNKED.bits(), 0x08);
        assert_eq!(SpriteColour::NO_CROP.bits(), 0x40);
    }

    #[test]
    fn sound_marker_is_not_a_colour() {
        assert_ne!(SpriteColour::from_bits_truncate(SpriteColour::SOUND).bits(), SpriteColour::SOUND);
    }
}
