// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR stream primitives
//!
//! Byte-level reader/writer for the Common Data Representation used by
//! TypeCode marshaling: aligned little-endian primitives, NUL-counted
//! strings, and length-prefixed encapsulations whose first octet is an
//! endianness flag. Both halves track the absolute top-level stream
//! position through nested encapsulations so that indirection offsets
//! can be computed on write and resolved on read.
//!
//! Alignment is always relative to the enclosing encapsulation start,
//! never to the top-level stream.

use crate::error::{Error, Result};

/// CDR writer. Always emits little-endian.
pub struct CdrOutput {
    buf: Vec<u8>,
    /// Absolute top-level position of `buf[0]`.
    base: usize,
}

impl CdrOutput {
    pub fn new() -> Self {
        Self::with_base(0)
    }

    /// Writer for a nested encapsulation starting at absolute position `base`.
    pub fn with_base(base: usize) -> Self {
        CdrOutput {
            buf: Vec::new(),
            base,
        }
    }

    /// Absolute top-level position of the next byte written.
    pub fn position(&self) -> usize {
        self.base + self.buf.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Pad with zero bytes to the given alignment, relative to the
    /// enclosing encapsulation start.
    pub fn align(&mut self, alignment: usize) {
        let padding = (alignment - (self.buf.len() % alignment)) % alignment;
        self.buf.extend(std::iter::repeat_n(0u8, padding));
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    pub fn write_u16(&mut self, v: u16) {
        self.align(2);
        self.buf.extend(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.align(2);
        self.buf.extend(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.align(4);
        self.buf.extend(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.align(4);
        self.buf.extend(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.align(8);
        self.buf.extend(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.align(8);
        self.buf.extend(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.align(4);
        self.buf.extend(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.align(8);
        self.buf.extend(&v.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// u32 length including the NUL terminator, then bytes, then NUL.
    pub fn write_string(&mut self, s: &str) {
        self.write_u32(s.len() as u32 + 1);
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
    }

    /// u32 count of UTF-16 code units including the terminator, then the
    /// units, then a zero unit.
    pub fn write_wstring(&mut self, s: &str) {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.write_u32(units.len() as u32 + 1);
        for unit in units {
            self.buf.extend(&unit.to_le_bytes());
        }
        self.buf.extend(&0u16.to_le_bytes());
    }

    /// Write an encapsulation: aligned u32 byte length, then content whose
    /// first octet is the endianness flag. The closure fills the content;
    /// its writer tracks the correct absolute position and its alignment
    /// restarts at the encapsulation start.
    pub fn write_encapsulation<F>(&mut self, fill: F) -> Result<()>
    where
        F: FnOnce(&mut CdrOutput) -> Result<()>,
    {
        self.align(4);
        let mut inner = CdrOutput::with_base(self.position() + 4);
        inner.write_u8(1); // little-endian flag
        fill(&mut inner)?;
        let bytes = inner.into_bytes();
        self.write_u32(bytes.len() as u32);
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }
}

impl Default for CdrOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// CDR reader. Top-level streams are little-endian; encapsulations honor
/// their embedded endianness flag.
pub struct CdrInput<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Absolute top-level position of `buf[0]`.
    base: usize,
    little_endian: bool,
}

impl<'a> CdrInput<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        CdrInput {
            buf,
            pos: 0,
            base: 0,
            little_endian: true,
        }
    }

    /// Absolute top-level position of the next byte read.
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Skip padding to the given alignment, relative to the enclosing
    /// encapsulation start.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let padding = (alignment - (self.pos % alignment)) % alignment;
        if self.pos + padding > self.buf.len() {
            return Err(Error::BufferUnderflow {
                need: padding,
                have: self.remaining(),
            });
        }
        self.pos += padding;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(Error::BufferUnderflow {
                need: n,
                have: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.align(2)?;
        let b: [u8; 2] = self.read_bytes(2)?.try_into().unwrap_or([0; 2]);
        Ok(if self.little_endian {
            u16::from_le_bytes(b)
        } else {
            u16::from_be_bytes(b)
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.align(4)?;
        let b: [u8; 4] = self.read_bytes(4)?.try_into().unwrap_or([0; 4]);
        Ok(if self.little_endian {
            u32::from_le_bytes(b)
        } else {
            u32::from_be_bytes(b)
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.align(8)?;
        let b: [u8; 8] = self.read_bytes(8)?.try_into().unwrap_or([0; 8]);
        Ok(if self.little_endian {
            u64::from_le_bytes(b)
        } else {
            u64::from_be_bytes(b)
        })
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        if len == 0 {
            return Err(Error::InvalidString);
        }
        let bytes = self.read_bytes(len)?;
        if bytes[len - 1] != 0 {
            return Err(Error::InvalidString);
        }
        String::from_utf8(bytes[..len - 1].to_vec()).map_err(|_| Error::InvalidString)
    }

    pub fn read_wstring(&mut self) -> Result<String> {
        let count = self.read_u32()? as usize;
        if count == 0 {
            return Err(Error::InvalidWString);
        }
        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            units.push(self.read_u16()?);
        }
        if units.pop() != Some(0) {
            return Err(Error::InvalidWString);
        }
        String::from_utf16(&units).map_err(|_| Error::InvalidWString)
    }

    /// Enter an encapsulation: read the aligned u32 length, slice off that
    /// many bytes, and return a reader positioned past the endianness flag.
    /// The sub-reader keeps the correct absolute position and restarts
    /// alignment at the encapsulation start.
    pub fn read_encapsulation(&mut self) -> Result<CdrInput<'a>> {
        let len = self.read_u32()? as usize;
        let start = self.position();
        let bytes = self.read_bytes(len)?;
        let mut inner = CdrInput {
            buf: bytes,
            pos: 0,
            base: start,
            little_endian: true,
        };
        let flag = inner.read_u8()?;
        inner.little_endian = flag != 0;
        Ok(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_padding() {
        let mut out = CdrOutput::new();
        out.write_u8(7);
        out.write_u32(0xAABB_CCDD);
        let bytes = out.into_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[1..4], &[0, 0, 0]);

        let mut input = CdrInput::new(&bytes);
        assert_eq!(input.read_u8().unwrap(), 7);
        assert_eq!(input.read_u32().unwrap(), 0xAABB_CCDD);
    }

    #[test]
    fn test_string_roundtrip() {
        let mut out = CdrOutput::new();
        out.write_string("IDL:acme/Point:1.0");
        out.write_wstring("héllo");
        let bytes = out.into_bytes();
        let mut input = CdrInput::new(&bytes);
        assert_eq!(input.read_string().unwrap(), "IDL:acme/Point:1.0");
        assert_eq!(input.read_wstring().unwrap(), "héllo");
    }

    #[test]
    fn test_string_requires_nul() {
        // Length 2, payload "a" plus a non-NUL byte.
        let bytes = [2, 0, 0, 0, b'a', b'b'];
        let mut input = CdrInput::new(&bytes);
        assert_eq!(input.read_string(), Err(Error::InvalidString));
    }

    #[test]
    fn test_underflow_reports_need() {
        let bytes = [1, 2];
        let mut input = CdrInput::new(&bytes);
        assert_eq!(
            input.read_u32(),
            Err(Error::BufferUnderflow { need: 4, have: 2 })
        );
    }

    #[test]
    fn test_encapsulation_positions() {
        let mut out = CdrOutput::new();
        out.write_u8(0);
        let mut inner_value_pos = 0;
        out.write_encapsulation(|inner| {
            inner.write_u32(42);
            inner_value_pos = inner.position();
            Ok(())
        })
        .unwrap();
        let bytes = out.into_bytes();

        // Length field at 4, content at 8: flag octet, pad, u32.
        assert_eq!(inner_value_pos, 8 + 1 + 3 + 4);

        let mut input = CdrInput::new(&bytes);
        input.read_u8().unwrap();
        input.align(4).unwrap();
        let mut inner = input.read_encapsulation().unwrap();
        assert_eq!(inner.read_u32().unwrap(), 42);
        assert_eq!(inner.position(), inner_value_pos);
    }

    #[test]
    fn test_big_endian_encapsulation() {
        // Flag 0 = big endian, then a BE u32 after padding.
        let content = [0u8, 0, 0, 0, 0x00, 0x00, 0x01, 0x02];
        let mut bytes = (content.len() as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&content);
        let mut input = CdrInput::new(&bytes);
        let mut inner = input.read_encapsulation().unwrap();
        assert_eq!(inner.read_u32().unwrap(), 0x0102);
    }
}
