//! Bounds-checked byte cursor.
//!
//! Every record is split off the stream as a whole before any of its fields
//! are read, so a short stream fails with [`RadarError::TruncatedRecord`]
//! instead of decoding fields that overlap the next record.

use bytes::{Buf, Bytes};

use crate::error::{RadarError, Result};

/// A forward-only cursor over an in-memory volume file.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    buf: Bytes,
    total: usize,
}

impl ByteCursor {
    pub fn new(data: impl Into<Bytes>) -> Self {
        let buf = data.into();
        let total = buf.len();
        Self { buf, total }
    }

    /// Offset of the next unread byte from the start of the stream.
    pub fn position(&self) -> usize {
        self.total - self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Split off exactly `n` bytes for the named record.
    pub fn take(&mut self, n: usize, record: &'static str) -> Result<Bytes> {
        self.ensure(n, record)?;
        Ok(self.buf.split_to(n))
    }

    /// Advance past `n` padding bytes belonging to the named record.
    pub fn skip(&mut self, n: usize, record: &'static str) -> Result<()> {
        self.ensure(n, record)?;
        self.buf.advance(n);
        Ok(())
    }

    /// Look at the next `n` bytes without consuming them.
    pub fn peek(&self, n: usize) -> Option<&[u8]> {
        self.buf.get(..n)
    }

    fn ensure(&self, n: usize, record: &'static str) -> Result<()> {
        if self.buf.len() < n {
            return Err(RadarError::TruncatedRecord {
                record,
                offset: self.position(),
                needed: n,
                available: self.buf.len(),
            });
        }
        Ok(())
    }
}

/// A fixed-size header record.
pub trait Decode: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;
    /// Record name used in truncation errors.
    const NAME: &'static str;

    /// Read the fields from a buffer holding exactly `SIZE` bytes.
    fn decode_fields(buf: &mut Bytes) -> Self;

    fn decode(cursor: &mut ByteCursor) -> Result<Self> {
        let mut block = cursor.take(Self::SIZE, Self::NAME)?;
        let value = Self::decode_fields(&mut block);
        debug_assert!(block.is_empty(), "{} left {} bytes", Self::NAME, block.len());
        Ok(value)
    }
}

/// Fixed-width text field, trimmed of NUL and space padding.
pub fn fixed_text(buf: &mut Bytes, width: usize) -> String {
    let raw = buf.split_to(width);
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim().to_string()
}

/// Decode `count` little-endian u16 gate codes.
pub fn u16_codes(buf: &mut Bytes, count: usize) -> Vec<u16> {
    (0..count).map(|_| buf.get_u16_le()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        a: u16,
        b: i32,
    }

    impl Decode for Pair {
        const SIZE: usize = 6;
        const NAME: &'static str = "pair";

        fn decode_fields(buf: &mut Bytes) -> Self {
            Self {
                a: buf.get_u16_le(),
                b: buf.get_i32_le(),
            }
        }
    }

    #[test]
    fn test_decode_advances_exactly() {
        let mut cursor = ByteCursor::new(vec![1, 0, 0xff, 0xff, 0xff, 0xff, 9]);
        let pair = Pair::decode(&mut cursor).unwrap();
        assert_eq!(pair.a, 1);
        assert_eq!(pair.b, -1);
        assert_eq!(cursor.position(), 6);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_short_record_is_truncated() {
        let mut cursor = ByteCursor::new(vec![1, 0, 0]);
        match Pair::decode(&mut cursor) {
            Err(RadarError::TruncatedRecord {
                record,
                offset,
                needed,
                available,
            }) => {
                assert_eq!(record, "pair");
                assert_eq!(offset, 0);
                assert_eq!(needed, 6);
                assert_eq!(available, 3);
            }
            other => panic!("Expected TruncatedRecord, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_fixed_text_trims_padding() {
        let mut buf = Bytes::from_static(b"Z9200 \0\0\0\0rest");
        assert_eq!(fixed_text(&mut buf, 10), "Z9200");
        assert_eq!(&buf[..], b"rest");
    }

    #[test]
    fn test_skip_and_peek() {
        let mut cursor = ByteCursor::new(vec![0, 1, 2, 3]);
        assert_eq!(cursor.peek(2), Some(&[0u8, 1][..]));
        cursor.skip(3, "pad").unwrap();
        assert_eq!(cursor.position(), 3);
        assert!(cursor.skip(2, "pad").is_err());
        assert_eq!(cursor.peek(2), None);
    }
}
