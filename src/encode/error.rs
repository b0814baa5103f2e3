//! Errors from misusing the encoding API.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use std::{error, fmt};


//------------ UsageError ----------------------------------------------------

/// A value cannot be built or encoded the way it was requested.
///
/// These errors indicate a mistake by the caller rather than a problem with
/// any data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UsageError {
    /// An implicit tag was requested for a CHOICE.
    ///
    /// A CHOICE has no tag of its own that could be replaced. It can only
    /// be tagged explicitly.
    ImplicitChoice,

    /// A SET that must contain at least one element was empty.
    EmptySet,

    /// A time cannot be represented in the requested format.
    TimeOutOfRange,

    /// The arcs do not form a valid object identifier.
    InvalidOid(&'static str),

    /// A string contains a character outside the repertoire of its type.
    InvalidChar(char),

    /// The number of unused bits in a BIT STRING is invalid.
    InvalidUnusedBits,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            UsageError::ImplicitChoice => {
                f.write_str("a CHOICE cannot be implicitly tagged")
            }
            UsageError::EmptySet => f.write_str("empty SET"),
            UsageError::TimeOutOfRange => {
                f.write_str("time out of range for its format")
            }
            UsageError::InvalidOid(reason) => {
                write!(f, "invalid object identifier: {}", reason)
            }
            UsageError::InvalidChar(ch) => {
                write!(f, "invalid character {:?}", ch)
            }
            UsageError::InvalidUnusedBits => {
                f.write_str("invalid number of unused bits")
            }
        }
    }
}

impl error::Error for UsageError { }
