//! Low-level byte stream parser for container decoding.
//!
//! This module provides the [`crate::cell::Parser`] type, a cursor-based reader over a byte
//! slice. Bag-of-cells headers use big-endian integers of a width that is itself stored in
//! the header (1 to 8 bytes), so the reader is built around [`Parser::read_be_uint`] rather
//! than fixed-width primitives.
//!
//! # Usage Examples
//!
//! ```rust
//! use cellscope::Parser;
//!
//! let data = [0x01, 0x02, 0x03, 0x04];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_u8()?, 0x01);
//! assert_eq!(parser.read_be_uint(3)?, 0x020304);
//! assert!(!parser.has_more_data());
//! # Ok::<(), cellscope::Error>(())
//! ```

use crate::Result;

/// A bounds-checked binary reader.
///
/// The parser maintains an internal position and validates every read against the
/// remaining data, so truncated containers surface as [`crate::Error::OutOfBounds`]
/// instead of panics.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::cell::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the current position to the specified index.
    ///
    /// # Arguments
    /// * `pos` - The position to move the cursor to
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is beyond the data length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Arguments
    /// * `step` - Amount of bytes to advance
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.data.len() - self.position {
            return Err(out_of_bounds_error!());
        }

        self.position += step;
        Ok(())
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get access to the full underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Peek at the current byte without advancing.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(out_of_bounds_error!())
    }

    /// Read a single byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.peek_byte()?;
        self.position += 1;
        Ok(value)
    }

    /// Read a big-endian unsigned integer that is `size` bytes wide.
    ///
    /// # Arguments
    /// * `size` - Width in bytes, between 0 and 8
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for widths above 8 and
    /// [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_be_uint(&mut self, size: usize) -> Result<u64> {
        if size > 8 {
            return Err(malformed_error!("Integer width of {} bytes is too large", size));
        }

        let bytes = self.read_bytes(size)?;
        Ok(bytes
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)))
    }

    /// Read a big-endian `u32`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_be_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian `u32`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_le_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Borrow the next `count` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.data.len() - self.position {
            return Err(out_of_bounds_error!());
        }

        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_be_uint_widths() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_be_uint(0).unwrap(), 0);
        assert_eq!(parser.read_be_uint(2).unwrap(), 0x1234);
        assert_eq!(parser.read_be_uint(3).unwrap(), 0x56789A);
        assert!(parser.read_be_uint(1).is_err());
        assert!(parser.read_be_uint(9).is_err());
    }

    #[test]
    fn test_u32_endianness() {
        let data = [0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_be_u32().unwrap(), 0xB5EE_9C72);
        assert_eq!(parser.read_le_u32().unwrap(), 1);
        assert!(parser.read_u8().is_err());
    }

    #[test]
    fn test_navigation() {
        let data = [0x01, 0x02, 0x03];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.len(), 3);
        assert!(!parser.is_empty());

        parser.advance_by(2).unwrap();
        assert_eq!(parser.pos(), 2);
        assert_eq!(parser.peek_byte().unwrap(), 0x03);
        assert!(parser.advance_by(2).is_err());

        parser.seek(3).unwrap();
        assert!(!parser.has_more_data());
        assert!(parser.seek(4).is_err());

        parser.seek(0).unwrap();
        assert_eq!(parser.read_bytes(3).unwrap(), &data);
    }

    #[test]
    fn test_empty() {
        let parser = Parser::new(&[]);
        assert!(parser.is_empty());
        assert!(!parser.has_more_data());
        assert!(parser.peek_byte().is_err());
    }
}
