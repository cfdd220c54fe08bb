use serde::Serialize;
use strum::{EnumCount, EnumIter, FromRepr};

/// Zoom level byte of a container version 2 real sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum ZoomLevel {
    Normal = 0x00,
    ZoomIn4 = 0x01,
    ZoomIn2 = 0x02,
    ZoomOut2 = 0x03,
    ZoomOut4 = 0x04,
    ZoomOut8 = 0x05,
}
