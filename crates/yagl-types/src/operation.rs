use serde::Serialize;
use strum::{EnumCount, EnumIter, FromRepr};

/// Arithmetic operators of Action 0x0D (low 7 bits of the operation byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum Operation {
    Assignment = 0x00,
    Addition = 0x01,
    Subtraction = 0x02,
    MultiplyUnsigned = 0x03,
    MultiplySigned = 0x04,
    BitShiftUnsigned = 0x05,
    BitShiftSigned = 0x06,
    BitwiseAnd = 0x07,
    BitwiseOr = 0x08,
    DivideUnsigned = 0x09,
    DivideSigned = 0x0A,
    ModuloUnsigned = 0x0B,
    ModuloSigned = 0x0C,
}

/// Whether an operator comes in a signed and an unsigned flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Signedness {
    Unsigned,
    Signed,
}

impl Operation {
    /// Bit 7 of the operation byte: skip when the target is already defined.
    pub const NOT_IF_DEFINED: u8 = 0x80;

    /// Infix token used in expressions. Signed and unsigned pairs share a token.
    pub fn infix(self) -> &'static str {
        match self {
            Self::Assignment => "=",
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::MultiplyUnsigned | Self::MultiplySigned => "*",
            Self::BitShiftUnsigned | Self::BitShiftSigned => "<<",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::DivideUnsigned | Self::DivideSigned => "/",
            Self::ModuloUnsigned | Self::ModuloSigned => "%",
        }
    }

    /// `None` for operators that have a single form.
    pub fn signedness(self) -> Option<Signedness> {
        match self {
            Self::MultiplyUnsigned
            | Self::BitShiftUnsigned
            | Self::DivideUnsigned
            | Self::ModuloUnsigned => Some(Signedness::Unsigned),
            Self::MultiplySigned | Self::BitShiftSigned | Self::DivideSigned | Self::ModuloSigned => {
                Some(Signedness::Signed)
            }
            _ => None,
        }
    }

    /// Select the operator for an infix token and optional signedness marker.
    ///
    /// Returns `None` when the token is unknown or when a marker is given for
    /// an operator without a signed form. A missing marker selects the
    /// unsigned form.
    pub fn from_infix(token: &str, signedness: Option<Signedness>) -> Option<Self> {
        use Signedness::*;
        let op = match (token, signedness) {
            ("=", None) => Self::Assignment,
            ("+", None) => Self::Addition,
            ("-", None) => Self::Subtraction,
            ("&", None) => Self::BitwiseAnd,
            ("|", None) => Self::BitwiseOr,
            ("*", None | Some(Unsigned)) => Self::MultiplyUnsigned,
            ("*", Some(Signed)) => Self::MultiplySigned,
            ("<<", None | Some(Unsigned)) => Self::BitShiftUnsigned,
            ("<<", Some(Signed)) => Self::BitShiftSigned,
            ("/", None | Some(Unsigned)) => Self::DivideUnsigned,
            ("/", Some(Signed)) => Self::DivideSigned,
            ("%", None | Some(Unsigned)) => Self::ModuloUnsigned,
            ("%", Some(Signed)) => Self::ModuloSigned,
            _ => return None,
        };
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn count() {
        assert_eq!(Operation::COUNT, 13);
    }

    #[test]
    fn discriminants() {
        assert_eq!(Operation::Assignment as u8, 0x00);
        assert_eq!(Operation::BitwiseOr as u8, 0x08);
        assert_eq!(Operation::ModuloSigned as u8, 0x0C);
    }

    #[test]
    fn infix_round_trip() {
        for op in Operation::iter() {
            assert_eq!(Operation::from_infix(op.infix(), op.signedness()), Some(op));
        }
    }

    #[test]
    fn paired_operators() {
        let paired = Operation::iter().filter(|op| op.signedness().is_some()).count();
        assert_eq!(paired, 8);
        assert_eq!(Operation::from_infix("+", Some(Signedness::Signed)), None);
        assert_eq!(Operation::from_infix("*", None), Some(Operation::MultiplyUnsigned));
    }
}
