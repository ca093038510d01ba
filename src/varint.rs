use crate::error::CodecError;

/// Maps a signed integer to an unsigned one so that values of small magnitude
/// (positive or negative) become small unsigned values: `n >= 0 -> 2n`,
/// `n < 0 -> -2n - 1`.
#[inline]
pub fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag`].
#[inline]
pub fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Appends `value` as a base-128 varint: 7 payload bits per byte, low group
/// first, with the high bit set on every byte except the last.
pub fn write_u64(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Appends a signed integer as a zigzag-folded varint.
#[inline]
pub fn write_i64(buf: &mut Vec<u8>, value: i64) {
    write_u64(buf, zigzag(value));
}

/// A cursor for reading varints and raw bytes sequentially from a message
/// buffer. All reads fail with `MalformedMessage` rather than panicking when
/// the buffer is exhausted.
#[derive(Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` over the given buffer.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Returns the number of bytes remaining.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    /// Returns `true` if every byte has been consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Reads a single raw byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        let byte = *self.bytes.get(self.pos).ok_or(CodecError::MalformedMessage {
            reason: "unexpected end of message",
        })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads `n` raw bytes as a slice.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::MalformedMessage {
                reason: "unexpected end of message",
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads an unsigned varint. Fails if the stream ends before a terminating
    /// byte or if the accumulated value would overflow 64 bits.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_u8()?;
            // The 10th byte may only carry the final payload bit.
            if shift == 63 && (byte & 0x7F) > 1 {
                return Err(CodecError::MalformedMessage {
                    reason: "varint overflows 64 bits",
                });
            }
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift > 63 {
                return Err(CodecError::MalformedMessage {
                    reason: "varint overflows 64 bits",
                });
            }
        }
    }

    /// Reads a zigzag-folded signed varint.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        Ok(unzigzag(self.read_u64()?))
    }

    /// Reads an unsigned varint that must fit in a `usize` count field.
    pub fn read_count(&mut self) -> Result<usize, CodecError> {
        usize::try_from(self.read_u64()?).map_err(|_| CodecError::MalformedMessage {
            reason: "count field overflows usize",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_u64(value: u64) {
        let mut buf = Vec::new();
        write_u64(&mut buf, value);
        let mut reader = ByteReader::new(&buf);
        assert_eq!(reader.read_u64().unwrap(), value);
        assert!(reader.is_exhausted());
    }

    fn roundtrip_i64(value: i64) {
        let mut buf = Vec::new();
        write_i64(&mut buf, value);
        let mut reader = ByteReader::new(&buf);
        assert_eq!(reader.read_i64().unwrap(), value);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_zigzag_mapping() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(-1), 1);
        assert_eq!(zigzag(1), 2);
        assert_eq!(zigzag(-2), 3);
        assert_eq!(zigzag(2147483647), 4294967294);
        assert_eq!(zigzag(-2147483648), 4294967295);
        for v in [0i64, 1, -1, 63, -64, i64::MAX, i64::MIN] {
            assert_eq!(unzigzag(zigzag(v)), v);
        }
    }

    #[test]
    fn test_single_byte_values() {
        for v in 0..=127u64 {
            let mut buf = Vec::new();
            write_u64(&mut buf, v);
            assert_eq!(buf.len(), 1);
            assert_eq!(buf[0], v as u8);
        }
    }

    #[test]
    fn test_multi_byte_encoding() {
        let mut buf = Vec::new();
        write_u64(&mut buf, 300);
        // 300 = 0b10_0101100 -> low group 0x2C | 0x80, then 0x02.
        assert_eq!(buf, vec![0xAC, 0x02]);
    }

    #[test]
    fn test_roundtrip_boundaries() {
        for v in [0u64, 127, 128, 16383, 16384, u32::MAX as u64, u64::MAX] {
            roundtrip_u64(v);
        }
        for v in [0i64, 1, -1, i32::MAX as i64, i32::MIN as i64, i64::MAX, i64::MIN] {
            roundtrip_i64(v);
        }
    }

    #[test]
    fn test_truncated_varint_fails() {
        let mut buf = Vec::new();
        write_u64(&mut buf, u64::MAX);
        for cut in 0..buf.len() {
            let mut reader = ByteReader::new(&buf[..cut]);
            assert!(reader.read_u64().is_err(), "cut at {cut} should fail");
        }
    }

    #[test]
    fn test_overlong_varint_fails() {
        // 11 continuation bytes can never terminate within 64 bits.
        let buf = vec![0xFF; 11];
        let mut reader = ByteReader::new(&buf);
        assert!(reader.read_u64().is_err());
    }

    #[test]
    fn test_overflowing_final_byte_fails() {
        // 9 continuation bytes then a final byte with more than 1 payload bit.
        let mut buf = vec![0x80; 9];
        buf.push(0x02);
        let mut reader = ByteReader::new(&buf);
        assert!(reader.read_u64().is_err());
    }

    #[test]
    fn test_read_exact() {
        let buf = [1u8, 2, 3, 4];
        let mut reader = ByteReader::new(&buf);
        assert_eq!(reader.read_exact(2).unwrap(), &[1, 2]);
        assert_eq!(reader.remaining(), 2);
        assert!(reader.read_exact(3).is_err());
        assert_eq!(reader.read_exact(2).unwrap(), &[3, 4]);
        assert!(reader.is_exhausted());
    }
}
