use crate::{Error, Result};

/// Forward-only reader over a fully materialized byte buffer.
///
/// `Cursor` tracks how many bytes have been consumed and nothing else; it has
/// no knowledge of the readout protocol. The decoder drives it byte-by-byte
/// and uses [`Cursor::offset`] for trailer bookkeeping.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, offset: 0 }
    }

    /// The byte at the current offset, without consuming it.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if the buffer is exhausted.
    pub fn peek(&self) -> Result<u8> {
        match self.buf.get(self.offset) {
            Some(&b) => Ok(b),
            None => Err(Error::EndOfBuffer {
                offset: self.offset,
            }),
        }
    }

    /// Consume and return the byte at the current offset.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if the buffer is exhausted.
    pub fn advance(&mut self) -> Result<u8> {
        let b = self.peek()?;
        self.offset += 1;
        Ok(b)
    }

    /// Count of bytes consumed so far, which is also the zero-based offset of
    /// the next unconsumed byte.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }
}
