//! Little-endian byte cursor for NFO/GRF data.
//!
//! Every read is bounds-checked; running off the end is fatal for the whole
//! file because the record boundaries that follow can no longer be trusted.

use yagl_types::GrfLabel;

/// Escape byte that announces a word-sized extended byte.
const EXTENDED_ESCAPE: u8 = 0xFF;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("unexpected end of data at offset {offset} (needed {needed} bytes)")]
    UnexpectedEof { offset: usize, needed: usize },
    #[error("invalid {field} value {value:#x} at offset {offset}")]
    InvalidValue {
        field: &'static str,
        value: u32,
        offset: usize,
    },
    #[error("{count} unexpected trailing bytes at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },
    #[error("unknown entry info byte {value:#04x} at offset {offset}")]
    UnknownInfo { value: u8, offset: usize },
    #[error("missing GRF container signature")]
    BadSignature,
    #[error("unsupported container compression {value}")]
    UnsupportedCompression { value: u8 },
}

/// Cursor for reading little-endian binary data.
///
/// Offsets reported by [`Reader::pos`] and in errors are absolute file
/// offsets, also for readers produced by [`Reader::take`].
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        if self.remaining() < n {
            return Err(ReadError::UnexpectedEof {
                offset: self.pos(),
                needed: n,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Split off the next `n` bytes as their own bounded reader.
    pub fn take(&mut self, n: usize) -> Result<Reader<'a>, ReadError> {
        let base = self.pos();
        let data = self.read_bytes(n)?;
        Ok(Reader { data, pos: 0, base })
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(&self) -> Result<(), ReadError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(ReadError::TrailingBytes {
                offset: self.pos(),
                count,
            }),
        }
    }

    pub fn peek_u8(&self) -> Result<u8, ReadError> {
        self.data.get(self.pos).copied().ok_or(ReadError::UnexpectedEof {
            offset: self.pos(),
            needed: 1,
        })
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Extended byte: a single byte, or `0xFF` followed by a word.
    pub fn read_ext_u8(&mut self) -> Result<u16, ReadError> {
        match self.read_u8()? {
            EXTENDED_ESCAPE => self.read_u16(),
            b => Ok(u16::from(b)),
        }
    }

    pub fn read_label(&mut self) -> Result<GrfLabel, ReadError> {
        Ok(GrfLabel(self.read_array()?))
    }

    /// Everything left in the buffer.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos.min(self.data.len())..];
        self.pos = self.data.len();
        slice
    }
}

/// Growable little-endian output buffer.
#[derive(Debug, Default)]
pub struct Writer {
    data: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_ext_u8(&mut self, value: u16) {
        match u8::try_from(value) {
            Ok(b) if b != EXTENDED_ESCAPE => self.write_u8(b),
            _ => {
                self.write_u8(EXTENDED_ESCAPE);
                self.write_u16(value);
            }
        }
    }

    pub fn write_label(&mut self, label: GrfLabel) {
        self.write_bytes(&label.0);
    }

    /// Overwrite a dword written earlier, used for back-patched sizes.
    pub fn patch_u32(&mut self, at: usize, value: u32) {
        self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }
}
