use serde::Serialize;
use std::fmt;

/// Four raw bytes identifying a GRF, usually printable ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct GrfLabel(pub [u8; 4]);

impl GrfLabel {
    /// Interpret a little-endian dword as the label bytes in stream order.
    pub fn from_dword(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    pub fn to_dword(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// Build a label from text where every char is a single byte value, as
    /// produced by decoding `\xNN` escapes. Chars are not UTF-8 encoded: a
    /// char `U+00E9` becomes the byte `0xE9`.
    ///
    /// Returns `None` unless there are exactly four chars, each `<= 0xFF`.
    pub fn from_text(text: &str) -> Option<Self> {
        let mut bytes = [0u8; 4];
        let mut chars = text.chars();
        for b in &mut bytes {
            *b = u8::try_from(u32::from(chars.next()?)).ok()?;
        }
        chars.next().is_none().then_some(Self(bytes))
    }
}

impl fmt::Display for GrfLabel {
    /// Quoted form; bytes outside printable ASCII are written as `\xNN`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for &b in &self.0 {
            match b {
                b'"' => write!(f, "\\\"")?,
                b'\\' => write!(f, "\\\\")?,
                0x20..=0x7E => write!(f, "{}", b as char)?,
                _ => write!(f, "\\x{b:02x}")?,
            }
        }
        write!(f, "\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dword_round_trip() {
        let label = GrfLabel(*b"ABCD");
        assert_eq!(label.to_dword(), 0x4443_4241);
        assert_eq!(GrfLabel::from_dword(0x4443_4241), label);
    }

    #[test]
    fn display_escapes() {
        assert_eq!(GrfLabel(*b"AB\"\\").to_string(), r#""AB\"\\""#);
        assert_eq!(GrfLabel([b'M', b'T', 0x01, 0xFF]).to_string(), r#""MT\x01\xff""#);
    }

    #[test]
    fn from_text() {
        assert_eq!(GrfLabel::from_text("ABCD"), Some(GrfLabel(*b"ABCD")));
        assert_eq!(GrfLabel::from_text("MT\u{1}\u{ff}"), Some(GrfLabel([b'M', b'T', 1, 0xFF])));
        assert_eq!(GrfLabel::from_text("ABC"), None);
        assert_eq!(GrfLabel::from_text("ABCDE"), None);
        assert_eq!(GrfLabel::from_text("AB\u{100}D"), None);
    }
}
