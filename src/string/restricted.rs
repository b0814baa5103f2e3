//! BER-encoded Restricted Character String types.
//!
//! This is an internal module. It’s public items are re-exported by the
//! parent.

use std::{cmp, error, fmt, hash, io, ops};
use std::borrow::Cow;
use std::marker::PhantomData;
use std::str::FromStr;
use bytes::Bytes;
use crate::decode::{CharPolicy, Constructed, Content, DecodeError, Pos};
use crate::encode::{PrimitiveContent, UsageError};
use crate::tag::Tag;
use super::octet::take_string_content;


//------------ CharSet -------------------------------------------------------

/// The character set of a restricted character string type.
///
/// The trait only includes associated functions and can thus be implemented
/// for marker types. It translates between the octets of an encoded string
/// and the characters they represent.
///
/// The trait is primarily used to define the character set of the
/// [`RestrictedString`] type.
///
/// [`RestrictedString`]: struct.RestrictedString.html
pub trait CharSet {
    /// The natural tag of the related restricted character string type.
    const TAG: Tag;

    /// Converts a sequence of octets into a string.
    ///
    /// The `policy` determines what to do with octets that represent
    /// characters outside the character set if the character set allows
    /// for leniency.
    fn decode_octets(
        octets: &[u8], policy: CharPolicy
    ) -> Result<String, CharSetError>;

    /// Converts a `str` into a octet sequence.
    ///
    /// Returns the first character that cannot be encoded as an error.
    fn encode_str(s: &str) -> Result<Vec<u8>, char>;
}


//------------ RestrictedString ----------------------------------------------

/// A generic restricted character string.
///
/// Restricted character strings essentially are a sequence of characters from
/// a specific character set mapped into a sequence of octets. In BER, these
/// are in fact encoded just like an [`OctetString`] with a different tag.
///
/// The value keeps both the text and its encoded octets. It can only be
/// created from text that is valid for the character set, so encoding it
/// never fails.
///
/// As usual, you can parse a restricted character string from encoded data
/// by way of the [`take_from`] and [`from_content`] methods.
/// Alternatively, you can create a new value from a `String` or `str` via
/// [`new`] or `FromStr`. The string derefs to `str`.
///
/// [`OctetString`]: struct.OctetString.html
/// [`take_from`]: #method.take_from
/// [`from_content`]: #method.from_content
/// [`new`]: #method.new
pub struct RestrictedString<L> {
    /// The text of the string.
    text: String,

    /// The encoded octets.
    octets: Bytes,

    /// Marker for our character set.
    marker: PhantomData<L>,
}

impl<L: CharSet> RestrictedString<L> {
    /// Creates a new value from text.
    ///
    /// Fails if the text contains a character that is not part of the
    /// character set.
    pub fn new(text: impl Into<String>) -> Result<Self, UsageError> {
        let text = text.into();
        let octets = L::encode_str(&text).map_err(UsageError::InvalidChar)?;
        Ok(RestrictedString {
            text,
            octets: octets.into(),
            marker: PhantomData,
        })
    }

    /// Returns the text of the string.
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Converts the value into its text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns the encoded octets of the string.
    pub fn as_octets(&self) -> &[u8] {
        self.octets.as_ref()
    }
}

/// # Decoding
///
impl<L: CharSet> RestrictedString<L> {
    /// Takes a single string value from the beginning of a constructed value.
    pub fn take_from(cons: &mut Constructed) -> Result<Self, DecodeError> {
        cons.take_value_if(L::TAG, Self::from_content)
    }

    /// Takes an optional string value from a constructed value.
    pub fn take_opt_from(
        cons: &mut Constructed
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_value_if(L::TAG, Self::from_content)
    }

    /// Takes a string value from content.
    ///
    /// The content may be in the segmented constructed form.
    pub fn from_content(content: &mut Content) -> Result<Self, DecodeError> {
        let pos = content.pos();
        let policy = content.options().printable;
        let octets = take_string_content(content, Tag::OCTET_STRING)?;
        let text = match L::decode_octets(octets.as_ref(), policy) {
            Ok(text) => text,
            Err(err) => {
                xerr!(return Err(err.into_decode_error(pos)))
            }
        };
        // Characters may have been replaced or dropped, so we reencode.
        let octets = match L::encode_str(&text) {
            Ok(reencoded) if reencoded == octets.as_ref() => octets,
            Ok(reencoded) => reencoded.into(),
            Err(ch) => {
                xerr!(return Err(DecodeError::invalid_char(
                    format!("invalid character {:?}", ch), pos
                )))
            }
        };
        Ok(RestrictedString { text, octets, marker: PhantomData })
    }
}


//--- FromStr

impl<L: CharSet> FromStr for RestrictedString<L> {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}


//--- Deref and AsRef

impl<L> ops::Deref for RestrictedString<L> {
    type Target = str;

    fn deref(&self) -> &str {
        self.text.as_str()
    }
}

impl<L> AsRef<str> for RestrictedString<L> {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}


//--- Clone

impl<L> Clone for RestrictedString<L> {
    fn clone(&self) -> Self {
        RestrictedString {
            text: self.text.clone(),
            octets: self.octets.clone(),
            marker: PhantomData,
        }
    }
}


//--- PartialEq and Eq, PartialOrd and Ord, Hash

impl<L> PartialEq for RestrictedString<L> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl<L> Eq for RestrictedString<L> { }

impl<L> PartialOrd for RestrictedString<L> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<L> Ord for RestrictedString<L> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl<L> hash::Hash for RestrictedString<L> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state)
    }
}


//--- Display and Debug

impl<L> fmt::Display for RestrictedString<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl<L: CharSet> fmt::Debug for RestrictedString<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({:?})", L::TAG, self.text)
    }
}


//--- PrimitiveContent

impl<'a, L: CharSet> PrimitiveContent for &'a RestrictedString<L> {
    const TAG: Tag = L::TAG;

    fn encoded_len(self) -> usize {
        self.octets.len()
    }

    fn write_encoded<W: io::Write>(
        self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self.octets.as_ref())
    }
}


//------------ CharSetError --------------------------------------------------

/// An error happened when converting between octets and characters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CharSetError {
    /// The octets contain a character outside the character set.
    InvalidChar(Cow<'static, str>),

    /// The octets are not a valid encoding at all.
    Malformed(&'static str),
}

impl CharSetError {
    /// Converts the error into a decoding error at the given position.
    fn into_decode_error(self, pos: Pos) -> DecodeError {
        match self {
            CharSetError::InvalidChar(msg) => {
                DecodeError::invalid_char(msg, pos)
            }
            CharSetError::Malformed(msg) => DecodeError::malformed(msg, pos),
        }
    }
}

impl fmt::Display for CharSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CharSetError::InvalidChar(msg) => f.write_str(msg),
            CharSetError::Malformed(msg) => f.write_str(msg),
        }
    }
}

impl error::Error for CharSetError { }
