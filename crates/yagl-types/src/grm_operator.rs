use serde::Serialize;
use strum::{EnumCount, EnumIter, FromRepr};

/// GRF resource management operations, carried in `source1` of an Action 0x0D
/// resource request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum GrmOperator {
    Reserve = 0x00,
    Find = 0x01,
    Check = 0x02,
    Mark = 0x03,
    FindNoFail = 0x04,
    CheckNoFail = 0x05,
    GetOwner = 0x06,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn count() {
        assert_eq!(GrmOperator::COUNT, 7);
    }

    #[test]
    fn round_trip() {
        for op in GrmOperator::iter() {
            assert_eq!(GrmOperator::from_repr(op as u8), Some(op));
        }
        assert_eq!(GrmOperator::from_repr(0x07), None);
    }
}
