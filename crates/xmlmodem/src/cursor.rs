//! A byte buffer bound to one transformation format.

use core::marker::PhantomData;

use crate::codec::Codec;

/// Wraps an immutable byte slice and decodes codepoints in the fixed
/// encoding `E`.
///
/// The buffer is borrowed, never copied: it stays owned by the caller (for
/// instance a memory-mapped file) for the cursor's whole lifetime.
#[derive(Debug, Clone)]
pub struct Cursor<'b, E: Codec> {
    buf: &'b [u8],
    pos: usize,
    _encoding: PhantomData<E>,
}

impl<'b, E: Codec> Cursor<'b, E> {
    #[must_use]
    pub fn new(buf: &'b [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            _encoding: PhantomData,
        }
    }

    /// Whether any unread byte remains.
    #[must_use]
    pub fn has_bytes(&self) -> bool {
        self.pos < self.buf.len()
    }

    /// Whether enough bytes remain to decode one complete codepoint.
    ///
    /// When this is `false` but [`has_bytes`](Self::has_bytes) is `true`,
    /// the buffer ends mid-sequence: a truncated-codepoint condition the
    /// caller must handle.
    #[must_use]
    pub fn has_codepoint(&self) -> bool {
        self.pos + E::MIN_BYTES <= self.buf.len()
    }

    /// Decodes the next codepoint, advancing the position.
    ///
    /// Precondition: [`has_codepoint`](Self::has_codepoint).
    pub fn next_codepoint(&mut self) -> char {
        debug_assert!(self.has_codepoint());
        E::decode(self.buf, &mut self.pos)
    }

    #[must_use]
    pub fn byte_pos(&self) -> usize {
        self.pos
    }

    /// Restores a position previously obtained from
    /// [`byte_pos`](Self::byte_pos). Used by the parser's context rewind.
    pub fn set_byte_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.buf.len());
        self.pos = pos;
    }

    #[must_use]
    pub fn bytes(&self) -> &'b [u8] {
        self.buf
    }
}
