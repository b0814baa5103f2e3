//! Parsing BER encoded values.
//!
//! This is an internal module. Its public types are re-exported by the
//! parent.

use std::borrow::Cow;
use bytes::Bytes;
use crate::header::Header;
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::Tag;
use super::error::DecodeError;
use super::options::Options;
use super::source::{Pos, SliceSource};


//------------ Content -------------------------------------------------------

/// The content octets of a BER-encoded value.
///
/// A value is either primitive, containing actual octets of an actual value,
/// or constructed, in which case its content contains additional BER encoded
/// values. This enum is useful for cases where a certain type may be encoded
/// as either a primitive value or a complex constructed value.
///
/// Note that this type represents the content octets only, i.e., it does not
/// contain the tag of the value.
pub enum Content<'a> {
    /// The value is a primitive value.
    Primitive(Primitive<'a>),

    /// The value is a constructed value.
    Constructed(Constructed<'a>)
}

impl<'a> Content<'a> {
    /// Checkes that the content has been parsed completely.
    ///
    /// Returns a malformed error if not.
    fn exhausted(&mut self) -> Result<(), DecodeError> {
        match self {
            Content::Primitive(inner) => inner.exhausted(),
            Content::Constructed(inner) => inner.exhausted()
        }
    }

    /// Returns the decoding options used by the value.
    pub fn options(&self) -> Options {
        match self {
            Content::Primitive(inner) => inner.options(),
            Content::Constructed(inner) => inner.options()
        }
    }

    /// Returns the encoding mode used by the value.
    pub fn mode(&self) -> Mode {
        self.options().mode
    }

    /// Returns the current position of the underlying source.
    pub fn pos(&self) -> Pos {
        match self {
            Content::Primitive(inner) => inner.source.pos(),
            Content::Constructed(inner) => inner.source.pos()
        }
    }

    /// Returns whether this value is a primitive value.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Content::Primitive(_))
    }

    /// Returns whether this value is a constructed value.
    pub fn is_constructed(&self) -> bool {
        matches!(self, Content::Constructed(_))
    }

    /// Converts a reference into into one to a primitive value or errors out.
    pub fn as_primitive(&mut self) -> Result<&mut Primitive<'a>, DecodeError> {
        match self {
            Content::Primitive(inner) => Ok(inner),
            Content::Constructed(inner) => {
                xerr!(Err(inner.content_err("expected primitive value")))
            }
        }
    }

    /// Converts a reference into on to a constructed value or errors out.
    pub fn as_constructed(
        &mut self
    ) -> Result<&mut Constructed<'a>, DecodeError> {
        match self {
            Content::Primitive(inner) => {
                xerr!(Err(inner.content_err("expected constructed value")))
            }
            Content::Constructed(inner) => Ok(inner),
        }
    }

    /// Skips over the remaining content.
    pub fn skip_all(&mut self) -> Result<(), DecodeError> {
        match self {
            Content::Primitive(inner) => inner.skip_all(),
            Content::Constructed(inner) => inner.skip_all(),
        }
    }

    /// Returns a malformed error at the current position.
    pub fn content_err(
        &self, message: impl Into<Cow<'static, str>>
    ) -> DecodeError {
        DecodeError::malformed(message, self.pos())
    }
}


//------------ Primitive -----------------------------------------------------

/// The content octets of a primitive value.
///
/// You will receive a reference to a value of this type through a closure,
/// possibly wrapped in a `Content` value. Your task will be to read out all
/// the octets of the value before returning from the closure or produce an
/// error if the value isn’t correctly encoded. If you read less octets than
/// are available, whoever called the closure will produce an error after
/// you returned. Thus, you can read as many octets as you expect and not
/// bother to check whether that was all available octets.
///
/// A number of methods are available to deal with the encodings defined for
/// various types. These are prefixed by `to_` to indicate that they are
/// intended to convert the content to a certain type. They all read exactly
/// one encoded value.
///
/// The value provides access to the decoding options via the `options`
/// method. All methodes that decode data will honour the decoding mode and
/// enforce that data is encoded according to the mode.
pub struct Primitive<'a> {
    /// The underlying source limited to the length of the value.
    source: &'a mut SliceSource,

    /// The decoding options to operate with.
    options: Options,
}

/// # Value Management
///
impl<'a> Primitive<'a> {
    /// Creates a new primitive from the given source and options.
    fn new(source: &'a mut SliceSource, options: Options) -> Self {
        Primitive { source, options }
    }

    /// Returns the current decoding options.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Returns the current decoding mode.
    ///
    /// The higher-level `to_` methods will use this mode to enforce that
    /// data is encoded correctly.
    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    /// Returns the current position of the underlying source.
    pub fn pos(&self) -> Pos {
        self.source.pos()
    }

    /// Returns a malformed error at the current position.
    pub fn content_err(
        &self, message: impl Into<Cow<'static, str>>
    ) -> DecodeError {
        self.source.content_err(message)
    }
}

/// # Low-level Access
///
impl<'a> Primitive<'a> {
    /// Returns the number of remaining octets.
    pub fn remaining(&self) -> usize {
        self.source.remaining()
    }

    /// Returns the remaining octets without advancing over them.
    pub fn slice_all(&self) -> &[u8] {
        self.source.slice()
    }

    /// Takes a single octet.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        self.source.take_u8()
    }

    /// Skips the rest of the content.
    pub fn skip_all(&mut self) -> Result<(), DecodeError> {
        let len = self.source.remaining();
        self.source.advance(len)
    }

    /// Returns the remainder of the content as a `Bytes` value.
    pub fn take_all(&mut self) -> Result<Bytes, DecodeError> {
        let len = self.source.remaining();
        self.source.take_bytes(len)
    }

    /// Checks whether all content has been advanced over.
    fn exhausted(&self) -> Result<(), DecodeError> {
        if self.source.remaining() > 0 {
            xerr!(Err(self.content_err("trailing data in primitive value")))
        }
        else {
            Ok(())
        }
    }
}

/// # High-level Decoding
///
impl<'a> Primitive<'a> {
    /// Parses the primitive value as a BOOLEAN value.
    ///
    /// In BER mode, any non-zero octet is true. In DER mode, true must be
    /// encoded as 0xff.
    pub fn to_bool(&mut self) -> Result<bool, DecodeError> {
        if self.remaining() != 1 {
            xerr!(return Err(
                self.content_err("BOOLEAN content must be one octet")
            ))
        }
        let res = self.take_u8()?;
        if self.mode() == Mode::Der {
            match res {
                0 => Ok(false),
                0xFF => Ok(true),
                _ => {
                    xerr!(Err(self.content_err("invalid BOOLEAN in DER")))
                }
            }
        }
        else {
            Ok(res != 0)
        }
    }

    /// Parses the primitive value as a NULL value.
    pub fn to_null(&mut self) -> Result<(), DecodeError> {
        if self.remaining() != 0 {
            xerr!(Err(self.content_err("NULL must have empty content")))
        }
        else {
            Ok(())
        }
    }
}

/// # Support for Testing
///
impl Primitive<'static> {
    /// Decode a bytes slice via a closure.
    ///
    /// This method can be used in testing code for decoding primitive
    /// values by providing a bytes slice with the content. For instance,
    /// decoding the `to_bool` method could be tested like this:
    ///
    /// ```
    /// use bertree::Mode;
    /// use bertree::decode::Primitive;
    ///
    /// assert_eq!(
    ///     Primitive::decode_slice(
    ///         b"\x00".as_ref(), Mode::Der,
    ///         |prim| prim.to_bool()
    ///     ).unwrap(),
    ///     false
    /// )
    /// ```
    pub fn decode_slice<F, T>(
        data: &[u8],
        options: impl Into<Options>,
        op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Primitive) -> Result<T, DecodeError> {
        let mut source = SliceSource::from_slice(data);
        let mut prim = Primitive::new(&mut source, options.into());
        let res = op(&mut prim)?;
        prim.exhausted()?;
        Ok(res)
    }
}


//------------ Constructed ---------------------------------------------------

/// The content octets of a constructed value.
///
/// You will only ever receive a mutable reference to a value of this type
/// as an argument to a closure provided to some function. The closure will
/// have to process all content of the constructed value.
///
/// Since constructed values consist of a sequence of values, the methods
/// allow you to process these values one by one. The most basic of these
/// are [`take_value`] and [`take_opt_value`] which process exactly one
/// value or up to one value. A number of convenience functions exists on
/// top of them for commonly encountered types and cases.
///
/// Before committing to a value, [`peek_header`] lets you look at the
/// header of the next value without advancing. This is how optional
/// elements and alternatives are detected.
///
/// Because the caller of your closure checks whether all content has been
/// advanced over and raising an error of not, you only need to read as many
/// values as you expected to be present and can simply return when you think
/// you are done.
///
/// [`take_value`]: #method.take_value
/// [`take_opt_value`]: #method.take_opt_value
/// [`peek_header`]: #method.peek_header
#[derive(Debug)]
pub struct Constructed<'a> {
    /// The underlying source.
    source: &'a mut SliceSource,

    /// The state we are in so we can determine the end of the content.
    state: State,

    /// The decoding options to use.
    options: Options,

    /// The number of constructed values this value is nested in.
    depth: usize,
}

/// # General Management
///
impl<'a> Constructed<'a> {
    /// Creates a new source from the given components.
    fn new(
        source: &'a mut SliceSource,
        state: State,
        options: Options,
        depth: usize,
    ) -> Self {
        Constructed { source, state, options, depth }
    }

    /// Creates the content of a constructed value nested in this value.
    fn nested<'s>(
        &'s mut self, state: State, pos: Pos
    ) -> Result<Constructed<'s>, DecodeError> {
        let depth = self.depth + 1;
        if depth > self.options.max_depth {
            xerr!(return Err(DecodeError::unsupported(
                format!(
                    "constructed values nested deeper than {} levels",
                    self.options.max_depth
                ),
                pos
            )))
        }
        Ok(Constructed::new(self.source, state, self.options, depth))
    }

    /// Decode a source as a constructed content.
    ///
    /// The function will start decoding of `source` with the given options.
    /// It will pass a constructed content value to the closure `op` which
    /// has to process all the content and return a result or error.
    pub fn decode<F, T>(
        mut source: SliceSource, options: Options, op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Constructed) -> Result<T, DecodeError> {
        let mut cons = Constructed::new(
            &mut source, State::Unbounded, options, 0
        );
        let res = op(&mut cons)?;
        cons.exhausted()?;
        Ok(res)
    }

    /// Returns the decoding options used by the value.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Returns the encoding mode used by the value.
    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    /// Returns the current position of the underlying source.
    pub fn pos(&self) -> Pos {
        self.source.pos()
    }

    /// Returns a malformed error at the current position.
    pub fn content_err(
        &self, message: impl Into<Cow<'static, str>>
    ) -> DecodeError {
        self.source.content_err(message)
    }
}

/// # Fundamental Reading
///
impl<'a> Constructed<'a> {
    /// Checks whether all content has been advanced over.
    ///
    /// For a value of definite length, this is the case when the limit of the
    /// source has been reached. For indefinite values, we need to have either
    /// already read or can now read the end-of-contents marker.
    fn exhausted(&mut self) -> Result<(), DecodeError> {
        match self.state {
            State::Done => Ok(()),
            State::Definite | State::Unbounded => {
                if self.source.remaining() > 0 {
                    xerr!(Err(self.content_err("trailing data")))
                }
                else {
                    Ok(())
                }
            }
            State::Indefinite => {
                let pos = self.source.pos();
                let header = Header::take_from(self.source, self.mode())?;
                if header.is_eoc() {
                    self.state = State::Done;
                    Ok(())
                }
                else {
                    xerr!(Err(DecodeError::malformed(
                        "missing end-of-contents", pos
                    )))
                }
            }
        }
    }

    /// Returns whether we have already reached the end.
    ///
    /// For indefinite values, we may be at the end right now but don’t
    /// know it yet.
    fn is_exhausted(&self) -> bool {
        match self.state {
            State::Definite | State::Unbounded => {
                self.source.remaining() == 0
            }
            State::Indefinite => false,
            State::Done => true,
        }
    }

    /// Returns the header of the next value without advancing.
    ///
    /// Returns `Ok(None)` if the end of the value has been reached. For a
    /// value of indefinite length, this is the case if the next value is
    /// the end-of-contents marker.
    pub fn peek_header(&self) -> Result<Option<Header>, DecodeError> {
        if self.is_exhausted() {
            return Ok(None)
        }
        match Header::peek(self.source, self.mode())? {
            Some(header) if header.is_eoc() => {
                if let State::Indefinite = self.state {
                    Ok(None)
                }
                else {
                    xerr!(Err(self.content_err(
                        "unexpected end-of-contents"
                    )))
                }
            }
            res => Ok(res)
        }
    }

    /// Returns whether the next value has the given tag.
    pub fn next_is(&self, tag: Tag) -> Result<bool, DecodeError> {
        Ok(self.peek_header()?.map(Header::tag) == Some(tag))
    }

    /// Processes the next value.
    ///
    /// If `expected` is not `None`, the method will only process a value
    /// with the given tag and return `Ok(None)` if there isn’t another value
    /// or if the next value has a different tag.
    ///
    /// If `expected` is `None`, the method will process a value with any
    /// tag and only return `Ok(None)` if it reached the end of the value.
    ///
    /// The closure `op` receives both the tag and content for the next
    /// value. It must process the value, advancing the source to its end
    /// or return an error.
    fn process_next_value<F, T>(
        &mut self,
        expected: Option<Tag>,
        op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(Tag, &mut Content) -> Result<T, DecodeError> {
        if self.is_exhausted() {
            return Ok(None)
        }
        let mut probe = self.source.clone();
        let header = Header::take_from(&mut probe, self.mode())?;

        if header.is_eoc() {
            if let State::Indefinite = self.state {
                *self.source = probe;
                self.state = State::Done;
                return Ok(None)
            }
            else {
                xerr!(return Err(self.content_err(
                    "unexpected end-of-contents"
                )))
            }
        }
        if let Some(expected) = expected {
            if header.tag() != expected {
                return Ok(None)
            }
        }
        let pos = self.source.pos();
        *self.source = probe;

        match header.length() {
            Length::Definite(len) => {
                let old_limit = self.source.limit_further(len)?;
                let res = {
                    let mut content = if header.is_constructed() {
                        Content::Constructed(
                            self.nested(State::Definite, pos)?
                        )
                    }
                    else {
                        Content::Primitive(
                            Primitive::new(self.source, self.options)
                        )
                    };
                    let res = op(header.tag(), &mut content)?;
                    content.exhausted()?;
                    res
                };
                self.source.set_limit(old_limit);
                Ok(Some(res))
            }
            Length::Indefinite => {
                let mut content = Content::Constructed(
                    self.nested(State::Indefinite, pos)?
                );
                let res = op(header.tag(), &mut content)?;
                content.exhausted()?;
                Ok(Some(res))
            }
        }
    }

    /// Returns the error for a missing value with the `expected` tag.
    fn missing(&self, expected: Tag) -> DecodeError {
        let pos = self.source.pos();
        match self.peek_header() {
            Ok(Some(header)) => {
                match header.validate(expected, None, pos) {
                    Err(err) => err,
                    Ok(()) => {
                        DecodeError::malformed(
                            format!("missing {}", expected), pos
                        )
                    }
                }
            }
            Ok(None) => {
                DecodeError::malformed(format!("missing {}", expected), pos)
            }
            Err(err) => err,
        }
    }
}

/// # Processing Contained Values
///
/// The methods in this section each process one value of the constructed
/// value’s content.
impl<'a> Constructed<'a> {
    /// Process one value of content.
    ///
    /// The closure `op` receives the tag and content of the next value
    /// and must process it completely, advancing to the content’s end.
    ///
    /// Upon success, the method returns the closure’s return value. The
    /// method returns a malformed error if there isn’t at least one more
    /// value available. It also returns an error if the closure returns one
    /// or if reading from the source fails.
    pub fn take_value<F, T>(&mut self, op: F) -> Result<T, DecodeError>
    where F: FnOnce(Tag, &mut Content) -> Result<T, DecodeError> {
        match self.process_next_value(None, op)? {
            Some(res) => Ok(res),
            None => {
                xerr!(Err(self.content_err("missing value")))
            }
        }
    }

    /// Processes an optional value.
    ///
    /// If there is at least one more value available, the closure `op` is
    /// given the tag and content of that value and must process it
    /// completely, advancing to the end of its content. If the closure
    /// succeeds, its return value is returned as ‘some’ result.
    ///
    /// If there are no more values available, the method returns `Ok(None)`.
    /// It returns an error if the closure returns one or if reading from
    /// the source fails.
    pub fn take_opt_value<F, T>(
        &mut self, op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(Tag, &mut Content) -> Result<T, DecodeError> {
        self.process_next_value(None, op)
    }

    /// Processes a value with the given tag.
    ///
    /// If the next value has the tag `expected`, its content is being given
    /// to the closure which has to process it completely and return whatever
    /// is being returned upon success.
    ///
    /// The method will return a malformed error if it encounters any other
    /// tag or the end of the value. It will also return an error if the
    /// closure returns an error or doesn’t process the complete values, or
    /// if accessing the underlying source fails.
    pub fn take_value_if<F, T>(
        &mut self,
        expected: Tag,
        op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Content) -> Result<T, DecodeError> {
        let res = self.process_next_value(Some(expected), |_, content| {
            op(content)
        })?;
        match res {
            Some(res) => Ok(res),
            None => xerr!(Err(self.missing(expected)))
        }
    }

    /// Processes an optional value with the given tag.
    ///
    /// If the next value has the tag `expected`, its content is being given
    /// to the closure which has to process it completely and return whatever
    /// is to be returned as some value.
    ///
    /// If the next value has a different tag or if the end of the value has
    /// been reached, the method returns `Ok(None)`. It will return an error
    /// if the closure fails or doesn’t process the complete value, or if
    /// accessing the underlying source fails.
    pub fn take_opt_value_if<F, T>(
        &mut self,
        expected: Tag,
        op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(&mut Content) -> Result<T, DecodeError> {
        self.process_next_value(Some(expected), |_, content| op(content))
    }

    /// Processes a constructed value with the given tag.
    ///
    /// If the next value is a constructed value with the tag `expected`, its
    /// content is being given to the closure `op` which has to process it
    /// completely. If it succeeds, its return value is returned.
    pub fn take_constructed_if<F, T>(
        &mut self,
        expected: Tag,
        op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Constructed) -> Result<T, DecodeError> {
        self.take_value_if(expected, |content| {
            op(content.as_constructed()?)
        })
    }

    /// Processes an optional constructed value with the given tag.
    pub fn take_opt_constructed_if<F, T>(
        &mut self,
        expected: Tag,
        op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(&mut Constructed) -> Result<T, DecodeError> {
        self.take_opt_value_if(expected, |content| {
            op(content.as_constructed()?)
        })
    }

    /// Processes a primitive value with the given tag.
    pub fn take_primitive_if<F, T>(
        &mut self,
        expected: Tag,
        op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Primitive) -> Result<T, DecodeError> {
        self.take_value_if(expected, |content| {
            op(content.as_primitive()?)
        })
    }

    /// Processes an optional primitive value with the given tag.
    pub fn take_opt_primitive_if<F, T>(
        &mut self,
        expected: Tag,
        op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(&mut Primitive) -> Result<T, DecodeError> {
        self.take_opt_value_if(expected, |content| {
            op(content.as_primitive()?)
        })
    }

    /// Skips over all remaining content.
    pub fn skip_all(&mut self) -> Result<(), DecodeError> {
        while self.skip_one()?.is_some() { }
        Ok(())
    }

    /// Skips over the next value.
    ///
    /// Returns `Ok(None)` if the end of the value has been reached.
    pub fn skip_one(&mut self) -> Result<Option<()>, DecodeError> {
        self.process_next_value(None, |_, content| content.skip_all())
    }

    /// Captures all remaining values as raw data.
    ///
    /// The values are checked for being well-formed but are otherwise left
    /// untouched. For a value of indefinite length, the end-of-contents
    /// marker is not part of the returned data.
    pub fn capture_all(&mut self) -> Result<Bytes, DecodeError> {
        let start = self.source.pos();
        let mut end = start;
        while self.peek_header()?.is_some() {
            self.skip_one()?;
            end = self.source.pos();
        }
        Ok(self.source.bytes_between(start, end))
    }
}

/// # Processing Standard Values
///
/// These methods provide short-cuts for processing fundamental values in
/// their standard encoding.
impl<'a> Constructed<'a> {
    /// Processes and returns a mandatory boolean value.
    pub fn take_bool(&mut self) -> Result<bool, DecodeError> {
        self.take_primitive_if(Tag::BOOLEAN, |prim| prim.to_bool())
    }

    /// Processes and returns an optional boolean value.
    pub fn take_opt_bool(&mut self) -> Result<Option<bool>, DecodeError> {
        self.take_opt_primitive_if(Tag::BOOLEAN, |prim| prim.to_bool())
    }

    /// Processes a mandatory NULL value.
    pub fn take_null(&mut self) -> Result<(), DecodeError> {
        self.take_primitive_if(Tag::NULL, |prim| prim.to_null())
    }

    /// Processes an optional NULL value.
    pub fn take_opt_null(&mut self) -> Result<Option<()>, DecodeError> {
        self.take_opt_primitive_if(Tag::NULL, |prim| prim.to_null())
    }

    /// Processes a mandatory SEQUENCE value.
    ///
    /// This is a shortcut for `self.take_constructed_if(Tag::SEQUENCE, op)`.
    pub fn take_sequence<F, T>(&mut self, op: F) -> Result<T, DecodeError>
    where F: FnOnce(&mut Constructed) -> Result<T, DecodeError> {
        self.take_constructed_if(Tag::SEQUENCE, op)
    }

    /// Processes an optional SEQUENCE value.
    pub fn take_opt_sequence<F, T>(
        &mut self,
        op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(&mut Constructed) -> Result<T, DecodeError> {
        self.take_opt_constructed_if(Tag::SEQUENCE, op)
    }

    /// Processes a mandatory SET value.
    ///
    /// This is a shortcut for `self.take_constructed_if(Tag::SET, op)`.
    pub fn take_set<F, T>(&mut self, op: F) -> Result<T, DecodeError>
    where F: FnOnce(&mut Constructed) -> Result<T, DecodeError> {
        self.take_constructed_if(Tag::SET, op)
    }
}


//------------ State ---------------------------------------------------------

/// The processing state of a constructed value.
#[derive(Clone, Copy, Debug)]
enum State {
    /// We are reading until the end of the reader.
    Definite,

    /// Indefinite value, we haven’t reached the end yet.
    Indefinite,

    /// End of indefinite value reached.
    Done,

    /// Unbounded value: read until the end of the data.
    Unbounded,
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;

    #[test]
    fn definite_and_indefinite() {
        let definite = Mode::Ber.decode(
            b"\x30\x06\x01\x01\xff\x05\x00", |cons| {
                cons.take_sequence(|cons| {
                    let res = cons.take_bool()?;
                    cons.take_null()?;
                    Ok(res)
                })
            }
        );
        assert!(definite.is_err());

        let definite = Mode::Ber.decode(
            b"\x30\x05\x01\x01\xff\x05\x00", |cons| {
                cons.take_sequence(|cons| {
                    let res = cons.take_bool()?;
                    cons.take_null()?;
                    Ok(res)
                })
            }
        ).unwrap();
        assert!(definite);

        let indefinite = Mode::Ber.decode(
            b"\x30\x80\x01\x01\xff\x05\x00\x00\x00", |cons| {
                cons.take_sequence(|cons| {
                    let res = cons.take_bool()?;
                    cons.take_null()?;
                    Ok(res)
                })
            }
        ).unwrap();
        assert!(indefinite);
    }

    #[test]
    fn missing_eoc() {
        let err = Mode::Ber.decode(
            b"\x30\x80\x01\x01\xff", |cons| {
                cons.take_sequence(|cons| cons.take_bool())
            }
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfStream);

        let err = Mode::Ber.decode(
            b"\x30\x80\x01\x01\xff\x05\x00", |cons| {
                cons.take_sequence(|cons| cons.take_bool())
            }
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn indefinite_rejected_in_der() {
        assert!(Mode::Der.decode(
            b"\x30\x80\x05\x00\x00\x00", |cons| {
                cons.take_sequence(|cons| cons.take_null())
            }
        ).is_err());
    }

    #[test]
    fn optional_lookahead() {
        let res = Mode::Ber.decode(b"\x30\x02\x05\x00", |cons| {
            cons.take_sequence(|cons| {
                let flag = cons.take_opt_bool()?;
                assert!(!cons.next_is(Tag::BOOLEAN)?);
                cons.take_null()?;
                assert!(cons.peek_header()?.is_none());
                Ok(flag)
            })
        }).unwrap();
        assert_eq!(res, None);
    }

    #[test]
    fn wrong_tag() {
        let err = Mode::Ber.decode(b"\x31\x00", |cons| {
            cons.take_sequence(|_| Ok(()))
        }).unwrap_err();
        assert_eq!(err.message(), "expected SEQUENCE, found SET");
    }

    #[test]
    fn capture_all() {
        let res = Mode::Ber.decode(
            b"\x30\x80\x02\x01\x01\x04\x80\x04\x01\x00\x00\x00\x00\x00",
            |cons| cons.take_sequence(|cons| cons.capture_all())
        ).unwrap();
        assert_eq!(
            res.as_ref(), b"\x02\x01\x01\x04\x80\x04\x01\x00\x00\x00"
        );
    }

    #[test]
    fn nesting_depth() {
        fn nested(depth: usize) -> Vec<u8> {
            let mut data = b"\x30\x80".repeat(depth);
            data.extend_from_slice(&b"\0\0".repeat(depth));
            data
        }

        let limit = Options::DEFAULT_MAX_DEPTH;
        assert!(
            Mode::Ber.decode(nested(limit), |cons| cons.skip_all()).is_ok()
        );
        let err = Mode::Ber.decode(
            nested(limit + 1), |cons| cons.skip_all()
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.pos(), Pos::from(2 * limit));

        let err = Mode::Ber.decode(
            nested(10_000), |cons| cons.capture_all()
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        let options = Options::from(Mode::Ber).with_max_depth(2);
        assert!(options.decode(nested(2), |cons| cons.skip_all()).is_ok());
        assert!(options.decode(nested(3), |cons| cons.skip_all()).is_err());
        assert!(
            options.decode(b"\x30\x04\x30\x02\x05\x00", |cons| {
                cons.skip_all()
            }).is_ok()
        );
        assert!(
            options.decode(b"\x30\x04\x30\x02\x30\x00", |cons| {
                cons.skip_all()
            }).is_err()
        );
    }

    #[test]
    fn to_bool() {
        assert!(
            Primitive::decode_slice(b"\x01", Mode::Ber, |prim| prim.to_bool())
                .unwrap()
        );
        assert!(
            Primitive::decode_slice(b"\x01", Mode::Der, |prim| prim.to_bool())
                .is_err()
        );
        assert!(
            Primitive::decode_slice(b"\xff", Mode::Der, |prim| prim.to_bool())
                .unwrap()
        );
        assert!(
            Primitive::decode_slice(b"", Mode::Ber, |prim| prim.to_bool())
                .is_err()
        );
        assert!(
            Primitive::decode_slice(b"\x00", Mode::Ber, |prim| prim.to_null())
                .is_err()
        );
    }
}
