//! Wire primitives: big-endian fixed-width values and base-128 varints.
//!
//! [`Writer`] and [`Reader`] carry the cursor for one encode or decode call.
//! They are created fresh per call, so a codec never holds mutable position
//! state of its own.

use crate::error::DecodeError;

/// Longest valid varint: ceil(64 / 7).
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `value` takes as a base-128 varint (1 for zero).
#[inline]
pub fn varuint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Zig-zag map a signed value onto an unsigned one.
#[inline]
pub fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Output cursor over a buffer reserved to the exact encoded length.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(len: usize) -> Self {
        Writer {
            buf: Vec::with_capacity(len),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    pub fn write_u16_be(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn write_u32_be(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn write_f32_be(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn write_f64_be(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Write `value` as base-128 groups, least significant first.
    #[inline]
    pub fn write_varuint(&mut self, mut value: u64) {
        while value > 0x7f {
            self.buf.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    #[inline]
    pub fn write_varint(&mut self, value: i64) {
        self.write_varuint(zigzag(value));
    }
}

/// Input cursor. Every read is bounds-checked and fails with
/// [`DecodeError::TruncatedInput`] instead of reading past the end.
pub struct Reader<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.buf.len()
    }

    /// Consume `n` bytes.
    #[inline]
    /// Convert a decoded length or count to `usize`, rejecting values no
    /// buffer could hold so truncation errors stay readable.
    pub fn checked_len(&self, declared: u64) -> Result<usize, DecodeError> {
        usize::try_from(declared)
            .ok()
            .filter(|&n| n <= isize::MAX as usize && self.cursor.checked_add(n).is_some())
            .ok_or(DecodeError::LengthOverflow {
                declared,
                available: self.remaining(),
            })
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .cursor
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(DecodeError::TruncatedInput {
                need: self.cursor.saturating_add(n),
                have: self.buf.len(),
            })?;
        let bytes = &self.buf[self.cursor..end];
        self.cursor = end;
        Ok(bytes)
    }

    #[inline]
    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take_array::<1>()?[0])
    }

    #[inline]
    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    #[inline]
    pub fn read_f32_be(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_be_bytes(self.take_array()?))
    }

    #[inline]
    pub fn read_f64_be(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_be_bytes(self.take_array()?))
    }

    pub fn read_varuint(&mut self) -> Result<u64, DecodeError> {
        let start = self.cursor;
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            value |= ((byte & 0x7f) as u64) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::InvalidData(format!(
            "varint at offset {} exceeds {} bytes",
            start, MAX_VARINT_LEN
        )))
    }

    pub fn read_varint(&mut self) -> Result<i64, DecodeError> {
        Ok(unzigzag(self.read_varuint()?))
    }

    /// Read a varuint length prefix and the bytes it covers.
    pub fn read_prefixed(&mut self) -> Result<&'a [u8], DecodeError> {
        let declared = self.read_varuint()?;
        let len = self.checked_len(declared)?;
        self.take(len)
    }
}
