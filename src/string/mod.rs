//! BER encoding for various strings types.
//!
//! This module provides type that match the various string encodings provided
//! by ASN.1 and BER.
//!
//! There are two types of strings for binary data. [`OctetString`]s contain
//! a unrestricted sequence of octets while [`BitString`]s contain a sequence
//! of bits that does not need to be of a length divisible by eight.
//!
//! In addition, there are a number of so-called restricted character strings
//! that each conain a sequence of characters according to a pre-defined
//! character set. ASN.1 defines quite a few of those of which the crate
//! currently only implements a subset that is commonly in use. Specifically:
//!
//! * [`Utf8String`] contains a sequence of Unicode code points encoded as
//!   octets through UTF-8,
//! * [`PrintableString`] contains a subset of ASCII characters including
//!   letters, digits, and a few symbols,
//! * [`TeletexString`] contains characters with code points below 256,
//!   one octet each,
//! * [`UniversalString`] contains Unicode code points in four octets each,
//! * [`BmpString`] contains Unicode text encoded in big-endian UTF-16,
//! * [`Ia5String`] contains ASCII characters only (IA5 is an alternative
//!   name for ASCII).
//!
//! All of these are implemented atop a generic [`RestrictedString`] by
//! providing an implementation for the [`CharSet`] trait.
//!
//! [`OctetString`]: struct.OctetString.html
//! [`BitString`]: struct.BitString.html
//! [`Utf8String`]: type.Utf8String.html
//! [`PrintableString`]: type.PrintableString.html
//! [`TeletexString`]: type.TeletexString.html
//! [`UniversalString`]: type.UniversalString.html
//! [`BmpString`]: type.BmpString.html
//! [`Ia5String`]: type.Ia5String.html
//! [`RestrictedString`]: struct.RestrictedString.html
//! [`CharSet`]: trait.CharSet.html

//--- Re-exports

pub use self::bit::BitString;
pub use self::charset::{
    BmpCharSet, BmpString, Ia5CharSet, Ia5String,
    PrintableCharSet, PrintableString, TeletexCharSet, TeletexString,
    UniversalCharSet, UniversalString, Utf8CharSet, Utf8String,
};
pub use self::octet::OctetString;
pub use self::restricted::{CharSet, CharSetError, RestrictedString};

pub(crate) use self::octet::take_string_content;

//--- Private modules

mod bit;
mod charset;
mod octet;
mod restricted;
