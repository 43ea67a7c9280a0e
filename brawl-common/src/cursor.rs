//! Sequential little-endian reader/writer over byte buffers
//!
//! Every FGT/LVL codec and authoring reader in the workspace is built on these
//! two types. Reads are bounds-checked: running off the end of the buffer is
//! reported as [`FormatError::UnexpectedEof`] instead of yielding junk values.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{FormatError, Result};

/// Reader over a fully-buffered byte slice with an advancing offset.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Jump to an absolute offset. Seeking past the end is allowed; the next
    /// read reports it.
    #[inline]
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Advance past `count` bytes, failing like a read if they are not there.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Borrow the next `count` bytes and advance past them.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or(FormatError::UnexpectedEof {
                offset: self.offset,
                needed: count,
                available: self.remaining(),
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_magic(&mut self) -> Result<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Read a fixed-width, NUL-padded string field.
    pub fn read_fixed_string(&mut self, width: usize) -> Result<String> {
        let bytes = self.read_bytes(width)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}

/// Growable little-endian writer.
///
/// Batch tools keep one writer alive and [`clear`](Self::clear) it between
/// assets so the backing allocation is reused.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.buffer.len()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn write_i16(&mut self, value: i16) {
        let mut bytes = [0u8; 2];
        LittleEndian::write_i16(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn write_i32(&mut self, value: i32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_i32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn write_f32(&mut self, value: f32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_f32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn write_magic(&mut self, magic: &[u8; 4]) {
        self.buffer.extend_from_slice(magic);
    }

    /// Write `value` into a fixed-width field, NUL-padded (and truncated if
    /// longer than `width`).
    pub fn write_fixed_string(&mut self, value: &str, width: usize) {
        let bytes = value.as_bytes();
        let len = bytes.len().min(width);
        self.buffer.extend_from_slice(&bytes[..len]);
        self.buffer.resize(self.buffer.len() + (width - len), 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_reads_follow_writes() {
        let mut w = ByteWriter::new();
        w.write_magic(b"FGTR");
        w.write_u16(0xBEEF);
        w.write_i16(-1234);
        w.write_i32(-7);
        w.write_f32(1.5);
        w.write_i8(-3);

        let bytes = w.into_inner();
        let mut c = ByteCursor::new(&bytes);
        assert_eq!(&c.read_magic().unwrap(), b"FGTR");
        assert_eq!(c.read_u16().unwrap(), 0xBEEF);
        assert_eq!(c.read_i16().unwrap(), -1234);
        assert_eq!(c.read_i32().unwrap(), -7);
        assert_eq!(c.read_f32().unwrap(), 1.5);
        assert_eq!(c.read_i8().unwrap(), -3);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut w = ByteWriter::new();
        w.write_u16(0x0102);
        assert_eq!(w.as_bytes(), &[0x02, 0x01]);
    }

    #[test]
    fn test_read_past_end_is_an_error() {
        let bytes = [1u8, 2, 3];
        let mut c = ByteCursor::new(&bytes);
        c.skip(2).unwrap();
        match c.read_u16() {
            Err(FormatError::UnexpectedEof {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 2);
                assert_eq!(needed, 2);
                assert_eq!(available, 1);
            }
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
        // Offset is untouched by a failed read
        assert_eq!(c.offset(), 2);
    }

    #[test]
    fn test_skip_past_end_is_an_error() {
        let bytes = [0u8; 4];
        let mut c = ByteCursor::new(&bytes);
        c.skip(3).unwrap();
        assert!(matches!(
            c.skip(2),
            Err(FormatError::UnexpectedEof {
                offset: 3,
                needed: 2,
                available: 1,
            })
        ));
        assert_eq!(c.offset(), 3);
        c.skip(1).unwrap();
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn test_fixed_string() {
        let mut w = ByteWriter::new();
        w.write_fixed_string("tex\\arm.bmp", 16);
        assert_eq!(w.offset(), 16);

        let bytes = w.into_inner();
        let mut c = ByteCursor::new(&bytes);
        assert_eq!(c.read_fixed_string(16).unwrap(), "tex\\arm.bmp");
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn test_seek_beyond_end_reports_on_read() {
        let bytes = [0u8; 4];
        let mut c = ByteCursor::new(&bytes);
        c.seek(100);
        assert_eq!(c.remaining(), 0);
        assert!(c.read_u8().is_err());
    }

    #[test]
    fn test_writer_reuse_keeps_capacity() {
        let mut w = ByteWriter::with_capacity(1024);
        w.write_bytes(&[0; 512]);
        w.clear();
        assert_eq!(w.offset(), 0);
        assert!(w.into_inner().capacity() >= 1024);
    }
}
