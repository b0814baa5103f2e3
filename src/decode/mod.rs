//! Parsing BER-encoded data.
//!
//! This modules provides the means to parse BER-encoded data.
//!
//! The basic idea is that for each type a function exists that knows how
//! to decode one value of that type. For constructed types, this function
//! in turn relies on similar functions provided for its consituent types.
//!
//! All data to be decoded is kept in a [`SliceSource`] which owns the
//! complete buffer. Decoding starts via [`Mode::decode`] or
//! [`Options::decode`] which hand a [`Constructed`] over the whole source
//! to a closure. Values are then taken from it one by one. The content of
//! primitive values is available through [`Primitive`].
//!
//! Errors are reported as [`DecodeError`]s which record the position of
//! the offending octet and, while propagating outward, a trail of the
//! constructed values they passed through.
//!
//! [`Mode::decode`]: ../enum.Mode.html#method.decode

pub use self::content::{Content, Constructed, Primitive};
pub use self::error::{DecodeError, ErrorKind, FieldNotPresent};
pub use self::options::{CharPolicy, Options};
pub use self::source::{IntoSource, Pos, SliceSource};

mod content;
mod error;
mod options;
mod source;
