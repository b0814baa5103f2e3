//! Decoding options.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use crate::mode::Mode;
use super::content::Constructed;
use super::error::DecodeError;
use super::source::IntoSource;


//------------ CharPolicy ----------------------------------------------------

/// How to treat invalid characters when decoding a PrintableString.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CharPolicy {
    /// Characters outside the repertoire are dropped with a warning.
    ///
    /// Some producers are known to put arbitrary characters into this type,
    /// so this is the default.
    Lenient,

    /// Characters outside the repertoire are an error.
    Strict,
}

impl Default for CharPolicy {
    fn default() -> Self {
        CharPolicy::Lenient
    }
}


//------------ Options -------------------------------------------------------

/// The options for a decoding run.
///
/// The options are handed down to every value decoded during the run.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Options {
    /// The encoding rules to enforce.
    pub mode: Mode,

    /// The treatment of invalid characters in PrintableString values.
    pub printable: CharPolicy,

    /// The maximum number of nested constructed values.
    ///
    /// Data nested deeper is rejected with an unsupported error.
    pub max_depth: usize,
}

impl Options {
    /// The default for the maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Creates options from a mode and a character policy.
    pub fn new(mode: Mode, printable: CharPolicy) -> Self {
        Options { mode, printable, max_depth: Self::DEFAULT_MAX_DEPTH }
    }

    /// Returns these options with a different maximum nesting depth.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Options { max_depth, ..self }
    }

    /// Returns these options with strict PrintableString decoding.
    pub fn strict(self) -> Self {
        Options { printable: CharPolicy::Strict, ..self }
    }

    /// Decodes a source using these options.
    ///
    /// The closure `op` receives the content of the source as a constructed
    /// value and has to process all of it.
    pub fn decode<S, F, T>(self, source: S, op: F) -> Result<T, DecodeError>
    where
        S: IntoSource,
        F: FnOnce(&mut Constructed) -> Result<T, DecodeError>
    {
        let res = Constructed::decode(source.into_source(), self, op);
        if let Err(ref err) = res {
            log::debug!("decoding failed: {}", err);
        }
        res
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::from(Mode::default())
    }
}

impl From<Mode> for Options {
    fn from(mode: Mode) -> Self {
        Options::new(mode, CharPolicy::default())
    }
}
