//! The BER mode.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::{Constructed, DecodeError, IntoSource, Options};


//------------ Mode ----------------------------------------------------------

/// The BER mode.
///
/// A data structure can be encoded following the Basic Encoding Rules or
/// the stricter Distinguished Encoding Rules. This type represents the
/// mode to use when decoding. Encoding always produces the definite length
/// minimal forms, so its output is acceptable under both rules.
///
/// The default mode is BER.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings for
    /// some types as well as indefinite length values.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding. Additional rules apply to some types,
    /// such as BOOLEAN values which must be either 0x00 or 0xff and string
    /// types which must use the primitive form.
    Der,
}

impl Mode {
    /// Decode a source using a specific mode.
    ///
    /// The method will decode the entire source using this mode and
    /// the default values for all other decoding options. The
    /// closure `op` receives the content of the source as a constructed
    /// value. It has to take one or more values from it and return
    /// whatever it has decoded. If any content is left over after `op`
    /// returns, the method fails.
    pub fn decode<S, F, T>(self, source: S, op: F) -> Result<T, DecodeError>
    where
        S: IntoSource,
        F: FnOnce(&mut Constructed) -> Result<T, DecodeError>
    {
        Options::from(self).decode(source, op)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Ber
    }
}
