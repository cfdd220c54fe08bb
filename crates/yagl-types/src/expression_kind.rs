use serde::Serialize;
use strum::{EnumCount, EnumIter, FromRepr};

/// Sub-kind of an Action 0x0D record.
///
/// Never stored: always derived from `source2` and `data` so that a record read
/// from bytes and the same record parsed from text classify identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum ExpressionKind {
    /// Ordinary three-operand arithmetic on parameters.
    Param = 0,
    /// Read of a patch (engine configuration) variable.
    Patch = 1,
    /// GRF resource management request.
    Resources = 2,
    /// Read of a parameter belonging to another GRF.
    OtherGrf = 3,
}

impl ExpressionKind {
    /// `source2` value that selects one of the special operand kinds.
    pub const SPECIAL_SOURCE: u8 = 0xFE;
    /// `data` value that selects a patch variable read.
    pub const PATCH_DATA: u32 = 0x0000_FFFF;

    pub fn classify(source2: u8, data: u32) -> Self {
        if source2 != Self::SPECIAL_SOURCE {
            Self::Param
        } else if data == Self::PATCH_DATA {
            Self::Patch
        } else if data & 0x0000_00FF == 0x0000_00FF {
            Self::Resources
        } else {
            Self::OtherGrf
        }
    }
}
