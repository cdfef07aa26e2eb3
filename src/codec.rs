//! Byte cursor shared by the binary decoders.
//!
//! The dictionary image nests recursively (a dictionary may embed the
//! dictionary of its reversed tails), so decoding threads one cursor through
//! every component instead of each component re-slicing the input.

use crate::error::{Error, Result};

/// Read-only cursor over a serialized image.
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    /// Number of bytes not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.off
    }

    /// Take the next `n` bytes, or fail if the image is truncated.
    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::InvalidEncoding(
                "unexpected end of input".to_string(),
            ));
        }
        let slice = &self.buf[self.off..self.off + n];
        self.off += n;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().expect("8-byte slice")))
    }

    /// Read a u64 that will be used as an element count, rejecting values
    /// whose minimal encoding could not fit in the remaining input. Guards
    /// `Vec::with_capacity` against allocation bombs in corrupt images.
    pub(crate) fn count(&mut self, elem_size: usize, what: &str) -> Result<usize> {
        let n = self.u64()? as usize;
        if n.saturating_mul(elem_size.max(1)) > self.remaining() {
            return Err(Error::InvalidEncoding(format!(
                "{what} count ({n}) too large for input ({} bytes left)",
                self.remaining()
            )));
        }
        Ok(n)
    }
}
