//! The character sets of the supported restricted string types.
//!
//! This is an internal module. It’s public items are re-exported by the
//! parent.

use std::char;
use crate::decode::CharPolicy;
use crate::tag::Tag;
use super::restricted::{CharSet, CharSetError, RestrictedString};


//------------ Utf8String ----------------------------------------------------

/// A restricted character string containing Unicode text encoded as UTF-8.
pub type Utf8String = RestrictedString<Utf8CharSet>;

/// The character set for the UTF8String ASN.1 type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Utf8CharSet;

impl CharSet for Utf8CharSet {
    const TAG: Tag = Tag::UTF8_STRING;

    fn decode_octets(
        octets: &[u8], _: CharPolicy
    ) -> Result<String, CharSetError> {
        String::from_utf8(octets.to_vec()).map_err(|_| {
            CharSetError::Malformed("invalid UTF-8")
        })
    }

    fn encode_str(s: &str) -> Result<Vec<u8>, char> {
        Ok(s.as_bytes().to_vec())
    }
}


//------------ PrintableString -----------------------------------------------

/// A restricted character string allowing a subset of ASCII characters.
///
/// This character string allows the following characters from the ASCII
/// character set and encodes them with their ASCII value:
///
/// * the letters `A` to `Z` and `a` to `z`,
/// * the digits `0` to `9`,
/// * the space character ` `,
/// * the symbols `'`, `(`, `)`, `+`, `,`, `-`, `.`, `/`, `:`, `=`, and `?`.
///
/// When decoding with the lenient [`CharPolicy`], other characters are
/// dropped from the text with a warning. Encoding always rejects them.
///
/// [`CharPolicy`]: ../decode/enum.CharPolicy.html
pub type PrintableString = RestrictedString<PrintableCharSet>;

/// The character set for the PrintableString ASN.1 type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PrintableCharSet;

impl PrintableCharSet {
    /// Returns whether the octet is a printable character.
    pub fn is_printable(ch: u8) -> bool {
        ch.is_ascii_alphanumeric() || // A-Z a-z 0-9
        ch == b' ' || ch == b'\'' || ch == b'(' || ch == b')' ||
        ch == b'+' || ch == b',' || ch == b'-' || ch == b'.' ||
        ch == b'/' || ch == b':' || ch == b'=' || ch == b'?'
    }
}

impl CharSet for PrintableCharSet {
    const TAG: Tag = Tag::PRINTABLE_STRING;

    fn decode_octets(
        octets: &[u8], policy: CharPolicy
    ) -> Result<String, CharSetError> {
        let mut res = String::with_capacity(octets.len());
        for &ch in octets {
            if Self::is_printable(ch) {
                res.push(char::from(ch))
            }
            else if policy == CharPolicy::Lenient {
                log::warn!(
                    "dropping invalid character {:#04x} from PrintableString",
                    ch
                );
            }
            else {
                return Err(CharSetError::InvalidChar(format!(
                    "invalid character {:#04x} in PrintableString", ch
                ).into()))
            }
        }
        Ok(res)
    }

    fn encode_str(s: &str) -> Result<Vec<u8>, char> {
        s.chars().map(|ch| {
            if ch.is_ascii() && Self::is_printable(ch as u8) {
                Ok(ch as u8)
            }
            else {
                Err(ch)
            }
        }).collect()
    }
}


//------------ TeletexString -------------------------------------------------

/// A restricted character string of one octet characters.
///
/// Each octet is mapped to the Unicode code point of the same value. Only
/// characters below U+0100 can be encoded.
pub type TeletexString = RestrictedString<TeletexCharSet>;

/// The character set for the TeletexString ASN.1 type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TeletexCharSet;

impl CharSet for TeletexCharSet {
    const TAG: Tag = Tag::TELETEX_STRING;

    fn decode_octets(
        octets: &[u8], _: CharPolicy
    ) -> Result<String, CharSetError> {
        Ok(octets.iter().map(|&ch| char::from(ch)).collect())
    }

    fn encode_str(s: &str) -> Result<Vec<u8>, char> {
        s.chars().map(|ch| {
            let value = u32::from(ch);
            if value < 0x100 { Ok(value as u8) } else { Err(ch) }
        }).collect()
    }
}


//------------ UniversalString -----------------------------------------------

/// A restricted character string of four octet characters.
///
/// Each character is encoded as its code point in four big-endian octets.
/// Values that are not Unicode scalar values are decoded as U+FFFD.
pub type UniversalString = RestrictedString<UniversalCharSet>;

/// The character set for the UniversalString ASN.1 type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct UniversalCharSet;

impl CharSet for UniversalCharSet {
    const TAG: Tag = Tag::UNIVERSAL_STRING;

    fn decode_octets(
        octets: &[u8], _: CharPolicy
    ) -> Result<String, CharSetError> {
        if octets.len() % 4 != 0 {
            return Err(CharSetError::Malformed(
                "UniversalString length not a multiple of four"
            ))
        }
        Ok(octets.chunks_exact(4).map(|chunk| {
            let value = u32::from_be_bytes(
                [chunk[0], chunk[1], chunk[2], chunk[3]]
            );
            char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
        }).collect())
    }

    fn encode_str(s: &str) -> Result<Vec<u8>, char> {
        Ok(s.chars().flat_map(|ch| u32::from(ch).to_be_bytes()).collect())
    }
}


//------------ BmpString -----------------------------------------------------

/// A restricted character string of two octet characters.
///
/// The string is encoded in UTF-16 with big-endian code units. Unpaired
/// surrogates are decoded as U+FFFD.
pub type BmpString = RestrictedString<BmpCharSet>;

/// The character set for the BMPString ASN.1 type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct BmpCharSet;

impl CharSet for BmpCharSet {
    const TAG: Tag = Tag::BMP_STRING;

    fn decode_octets(
        octets: &[u8], _: CharPolicy
    ) -> Result<String, CharSetError> {
        if octets.len() % 2 != 0 {
            return Err(CharSetError::Malformed(
                "BMPString length not a multiple of two"
            ))
        }
        let units = octets.chunks_exact(2).map(|chunk| {
            u16::from_be_bytes([chunk[0], chunk[1]])
        });
        Ok(char::decode_utf16(units).map(|ch| {
            ch.unwrap_or(char::REPLACEMENT_CHARACTER)
        }).collect())
    }

    fn encode_str(s: &str) -> Result<Vec<u8>, char> {
        Ok(s.encode_utf16().flat_map(u16::to_be_bytes).collect())
    }
}


//------------ Ia5String -----------------------------------------------------

/// A restricted character string containing ASCII characters.
pub type Ia5String = RestrictedString<Ia5CharSet>;

/// The character set for the IA5String ASN.1 type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Ia5CharSet;

impl CharSet for Ia5CharSet {
    const TAG: Tag = Tag::IA5_STRING;

    fn decode_octets(
        octets: &[u8], _: CharPolicy
    ) -> Result<String, CharSetError> {
        octets.iter().map(|&ch| {
            if ch.is_ascii() {
                Ok(char::from(ch))
            }
            else {
                Err(CharSetError::InvalidChar(format!(
                    "invalid character {:#04x} in IA5String", ch
                ).into()))
            }
        }).collect()
    }

    fn encode_str(s: &str) -> Result<Vec<u8>, char> {
        s.chars().map(|ch| {
            if ch.is_ascii() { Ok(ch as u8) } else { Err(ch) }
        }).collect()
    }
}


//============ Tests =========================================================
