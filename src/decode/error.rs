//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};
use std::borrow::Cow;
use smallvec::SmallVec;
use super::source::Pos;


//------------ ErrorKind -----------------------------------------------------

/// The kind of a decoding error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The data did not conform with the encoding rules or the schema.
    Malformed,

    /// The data ended before a complete value was read.
    ///
    /// This usually means that a message was truncated.
    EndOfStream,

    /// A character string contained a character outside its repertoire.
    InvalidChar,

    /// The data is correctly encoded but uses a feature not supported.
    Unsupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::Malformed => "malformed data",
            ErrorKind::EndOfStream => "unexpected end of data",
            ErrorKind::InvalidChar => "invalid character",
            ErrorKind::Unsupported => "unsupported encoding",
        })
    }
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error carries its [kind][ErrorKind], a message, and the position in
/// the data where it was detected. While the error propagates outward
/// through the constructed values that contain the failing value, each
/// layer can attach a human-readable frame via [`context`]. The display
/// form lists these frames from the outermost inward, separated by `>>`,
/// followed by the message itself.
///
/// An error can also wrap another decoding error as its cause. This is used
/// when decoding is retried on already captured data, for instance when
/// interpreting the content of an ANY value.
///
/// [`context`]: #method.context
#[derive(Debug)]
pub struct DecodeError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    pos: Pos,

    /// The context frames, innermost first.
    frames: SmallVec<[Cow<'static, str>; 4]>,
    cause: Option<Box<DecodeError>>,
}

impl DecodeError {
    fn new(
        kind: ErrorKind, message: impl Into<Cow<'static, str>>, pos: Pos
    ) -> Self {
        DecodeError {
            kind,
            message: message.into(),
            pos,
            frames: SmallVec::new(),
            cause: None,
        }
    }

    /// Creates an error for malformed data.
    pub fn malformed(
        message: impl Into<Cow<'static, str>>, pos: Pos
    ) -> Self {
        Self::new(ErrorKind::Malformed, message, pos)
    }

    /// Creates an error for data that ended prematurely.
    pub fn end_of_stream(pos: Pos) -> Self {
        Self::new(ErrorKind::EndOfStream, "unexpected end of data", pos)
    }

    /// Creates an error for an invalid character in a string.
    pub fn invalid_char(
        message: impl Into<Cow<'static, str>>, pos: Pos
    ) -> Self {
        Self::new(ErrorKind::InvalidChar, message, pos)
    }

    /// Creates an error for an encoding feature that isn’t supported.
    pub fn unsupported(
        message: impl Into<Cow<'static, str>>, pos: Pos
    ) -> Self {
        Self::new(ErrorKind::Unsupported, message, pos)
    }

    /// Adds a context frame to the error.
    ///
    /// This should be called by each layer the error passes through, so the
    /// first call names the innermost value.
    pub fn context(mut self, frame: impl Into<Cow<'static, str>>) -> Self {
        self.frames.push(frame.into());
        self
    }

    /// Attaches another error as the cause of this error.
    pub fn with_cause(mut self, cause: DecodeError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message of the error.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the position in the data where the error was detected.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Returns an iterator over the context frames, outermost first.
    pub fn frames(&self) -> impl Iterator<Item = &str> + '_ {
        self.frames.iter().rev().map(|frame| &**frame)
    }

    /// Returns the cause of the error if there is one.
    pub fn cause(&self) -> Option<&DecodeError> {
        self.cause.as_deref()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for frame in self.frames() {
            write!(f, "{} >> ", frame)?;
        }
        write!(f, "{} (at octet {})", self.message, self.pos)?;
        if let Some(cause) = self.cause.as_ref() {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.cause.as_ref().map(|cause| {
            cause.as_ref() as &(dyn error::Error + 'static)
        })
    }
}


//------------ FieldNotPresent -----------------------------------------------

/// An optional field was requested that is absent from a decoded value.
///
/// This isn’t a decoding error: the data was correctly encoded and simply
/// omitted the field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldNotPresent {
    index: usize,
}

impl FieldNotPresent {
    /// Creates the error for the field with the given index.
    pub fn new(index: usize) -> Self {
        FieldNotPresent { index }
    }

    /// Returns the index of the missing field.
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for FieldNotPresent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "field {} not present", self.index)
    }
}

impl error::Error for FieldNotPresent { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn breadcrumbs() {
        let err = DecodeError::malformed("empty INTEGER", Pos::from(12))
            .context("element 3")
            .context("CHOICE alternative 2")
            .context("SEQUENCE");
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert_eq!(
            err.frames().collect::<Vec<_>>(),
            ["SEQUENCE", "CHOICE alternative 2", "element 3"]
        );
        assert_eq!(
            err.to_string(),
            "SEQUENCE >> CHOICE alternative 2 >> element 3 >> \
             empty INTEGER (at octet 12)"
        );
    }

    #[test]
    fn cause() {
        let inner = DecodeError::end_of_stream(Pos::from(4));
        let err = DecodeError::malformed(
            "cannot decode ANY", Pos::from(0)
        ).with_cause(inner);
        assert_eq!(err.cause().unwrap().kind(), ErrorKind::EndOfStream);
        assert!(error::Error::source(&err).is_some());
        assert_eq!(
            err.to_string(),
            "cannot decode ANY (at octet 0): \
             unexpected end of data (at octet 4)"
        );
    }

    #[test]
    fn field_not_present() {
        assert_eq!(FieldNotPresent::new(2).to_string(), "field 2 not present");
    }
}
