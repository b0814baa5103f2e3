//! The source for decoding.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{fmt, mem, ops};
use bytes::Bytes;
use super::error::DecodeError;


//------------ SliceSource ---------------------------------------------------

/// A fully buffered source of encoded data.
///
/// The source owns the complete data to be decoded and keeps a cursor into
/// it. Because all the data is available at once, looking ahead at the next
/// value never needs to modify the source: a copy of the source can simply
/// be advanced instead. Copies are cheap as they share the underlying
/// buffer.
///
/// In addition to the cursor, the source has a limit that marks the end of
/// the content of the value currently being decoded. Attempts to read past
/// the limit fail.
#[derive(Clone, Debug)]
pub struct SliceSource {
    /// The complete data.
    data: Bytes,

    /// The index of the next octet to be read.
    pos: usize,

    /// The index of the first octet not to be read.
    limit: usize,
}

impl SliceSource {
    /// Creates a new source from the given bytes value.
    pub fn new(data: Bytes) -> Self {
        let limit = data.len();
        SliceSource { data, pos: 0, limit }
    }

    /// Creates a new source by copying the given slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Returns the current position of the source.
    pub fn pos(&self) -> Pos {
        Pos(self.pos)
    }

    /// Returns the number of octets left before the limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    /// Returns a slice of the octets left before the limit.
    pub fn slice(&self) -> &[u8] {
        &self.data[self.pos..self.limit]
    }

    /// Returns the n-th octet from the current position.
    ///
    /// Does not advance the source.
    pub fn peek_nth(&self, n: usize) -> Result<u8, DecodeError> {
        match self.slice().get(n) {
            Some(&value) => Ok(value),
            None => Err(self.short_err(n))
        }
    }

    /// Takes a single octet from the source.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        let res = self.peek_nth(0)?;
        self.pos += 1;
        Ok(res)
    }

    /// Takes `len` octets from the source.
    pub fn take_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if len > self.remaining() {
            return Err(self.short_err(self.remaining()))
        }
        let res = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(res)
    }

    /// Advances the source by `len` octets.
    pub fn advance(&mut self, len: usize) -> Result<(), DecodeError> {
        if len > self.remaining() {
            return Err(self.short_err(self.remaining()))
        }
        self.pos += len;
        Ok(())
    }

    /// Returns the data between two positions.
    ///
    /// Both positions must have been acquired from this source and `start`
    /// must not be after `end`.
    pub(crate) fn bytes_between(&self, start: Pos, end: Pos) -> Bytes {
        self.data.slice(start.0..end.0)
    }

    /// Restricts the source to the next `len` octets.
    ///
    /// Returns the previous limit so it can be restored via `set_limit`
    /// once the value has been processed.
    pub(crate) fn limit_further(
        &mut self, len: usize
    ) -> Result<usize, DecodeError> {
        if len > self.remaining() {
            return Err(self.short_err(self.remaining()))
        }
        Ok(mem::replace(&mut self.limit, self.pos + len))
    }

    /// Restores a limit returned by `limit_further`.
    pub(crate) fn set_limit(&mut self, limit: usize) {
        self.limit = limit
    }

    /// Returns a malformed error at the current position.
    pub fn content_err(
        &self, message: impl Into<std::borrow::Cow<'static, str>>
    ) -> DecodeError {
        DecodeError::malformed(message, self.pos())
    }

    /// Returns the error for running out of data `offset` octets from here.
    ///
    /// If the limit is the end of the data, the data has been truncated.
    /// Otherwise a value claims to be longer than its enclosing value.
    fn short_err(&self, offset: usize) -> DecodeError {
        let pos = Pos(self.pos + offset);
        if self.limit == self.data.len() {
            xerr!(DecodeError::end_of_stream(pos))
        }
        else {
            xerr!(DecodeError::malformed(
                "value exceeds the length of the enclosing value", pos
            ))
        }
    }
}


//------------ IntoSource ----------------------------------------------------

/// A type that can be converted into a source.
pub trait IntoSource {
    fn into_source(self) -> SliceSource;
}

impl IntoSource for SliceSource {
    fn into_source(self) -> SliceSource {
        self
    }
}

impl IntoSource for Bytes {
    fn into_source(self) -> SliceSource {
        SliceSource::new(self)
    }
}

impl IntoSource for Vec<u8> {
    fn into_source(self) -> SliceSource {
        SliceSource::new(self.into())
    }
}

impl<'a> IntoSource for &'a [u8] {
    fn into_source(self) -> SliceSource {
        SliceSource::from_slice(self)
    }
}

impl<'a, const N: usize> IntoSource for &'a [u8; N] {
    fn into_source(self) -> SliceSource {
        SliceSource::from_slice(self.as_ref())
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a source.
///
/// Values of this type can only be used for diagnostics. They can not be used
/// to determine how far a source has been advanced since it was created. This
/// is why we used a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl ops::Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Pos(self.0 + rhs.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================
