//! A BER-encoded OCTET STRING.
//!
//! This is an internal module. It’s public types are re-exported by the
//! parent.

use std::{fmt, io};
use bytes::{Bytes, BytesMut};
use crate::decode::{Constructed, Content, DecodeError};
use crate::encode::PrimitiveContent;
use crate::mode::Mode;
use crate::tag::Tag;


//------------ OctetString ---------------------------------------------------

/// An octet string value.
///
/// An octet string is a sequence of octets, i.e., a glorified `[u8]`. Basic
/// Encoding Rules, however, allow this sequence to be broken up into chunks
/// that are encoded separatedly to allow for very large octet strings and
/// cases where one doesn’t yet know the length of the string. When decoding,
/// these chunks are joined so the value always holds the complete string.
///
/// # BER Encoding
///
/// Octet strings are either encoded as a primitive or a constructed value.
/// In the primitive form, the content octets are the string’s octets. In a
/// constructed form, the content is a sequence of encoded octets strings
/// which in turn may be primitive or constructed. In this case, the string’s
/// octets are the concatenation of all the content octets of the primitive
/// forms in the order as encountered.
///
/// In DER, only the primitive form is allowed. The encoder always uses the
/// primitive form.
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OctetString(Bytes);

impl OctetString {
    /// Creates an octet string from a bytes value.
    pub fn new(bytes: Bytes) -> Self {
        OctetString(bytes)
    }

    /// Returns a reference to the octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns a bytes value with the octets of the string.
    pub fn to_bytes(&self) -> Bytes {
        self.0.clone()
    }

    /// Converts the octet string into a bytes value.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns the length of the octet string.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the octet string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}


/// # Parsing of Octet Strings
///
impl OctetString {
    /// Takes a single octet string value from constructed value content.
    ///
    /// If there is no next value, if the next value does not have the tag
    /// `Tag::OCTET_STRING`, or if it doesn’t contain a correctly encoded
    /// octet string, a malformed error is returned.
    pub fn take_from(cons: &mut Constructed) -> Result<Self, DecodeError> {
        cons.take_value_if(Tag::OCTET_STRING, Self::from_content)
    }

    /// Takes an optional octet string value from constructed value content.
    ///
    /// If there is no next value, or if the next value does not have the
    /// tag `Tag::OCTET_STRING`, then `Ok(None)` is returned.
    pub fn take_opt_from(
        cons: &mut Constructed
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_value_if(Tag::OCTET_STRING, Self::from_content)
    }

    /// Takes an octet string value from content.
    pub fn from_content(content: &mut Content) -> Result<Self, DecodeError> {
        take_string_content(content, Tag::OCTET_STRING).map(OctetString)
    }
}


//--- From and AsRef

impl From<Bytes> for OctetString {
    fn from(bytes: Bytes) -> Self {
        OctetString(bytes)
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(bytes: Vec<u8>) -> Self {
        OctetString(bytes.into())
    }
}

impl<'a> From<&'a [u8]> for OctetString {
    fn from(bytes: &'a [u8]) -> Self {
        OctetString(Bytes::copy_from_slice(bytes))
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- Debug

impl fmt::Debug for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OctetString(")?;
        for octet in self.0.iter() {
            write!(f, "{:02x}", octet)?;
        }
        write!(f, ")")
    }
}


//--- PrimitiveContent

impl<'a> PrimitiveContent for &'a OctetString {
    const TAG: Tag = Tag::OCTET_STRING;

    fn encoded_len(self) -> usize {
        self.0.len()
    }

    fn write_encoded<W: io::Write>(
        self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self.0.as_ref())
    }
}


//------------ Segmented Content ---------------------------------------------

/// Takes the content of a value encoded like an octet string.
///
/// A primitive value provides its content directly. For a constructed
/// value, which is only allowed in BER, the content of all nested values
/// with the tag `segment_tag` is concatenated. Anything else in the content
/// is an error.
pub(crate) fn take_string_content(
    content: &mut Content,
    segment_tag: Tag,
) -> Result<Bytes, DecodeError> {
    match content {
        Content::Primitive(inner) => inner.take_all(),
        Content::Constructed(inner) => {
            if inner.mode() == Mode::Der {
                xerr!(return Err(inner.content_err(
                    "constructed string in DER mode"
                )))
            }
            let mut res = BytesMut::new();
            take_segments(inner, segment_tag, &mut res)?;
            Ok(res.freeze())
        }
    }
}

/// Appends the content of all segments of a constructed string to `target`.
fn take_segments(
    cons: &mut Constructed,
    segment_tag: Tag,
    target: &mut BytesMut,
) -> Result<(), DecodeError> {
    loop {
        let done = cons.take_opt_value_if(segment_tag, |content| {
            match content {
                Content::Primitive(inner) => {
                    target.extend_from_slice(inner.slice_all());
                    inner.skip_all()
                }
                Content::Constructed(inner) => {
                    take_segments(inner, segment_tag, target)
                }
            }
        })?.is_none();
        if done {
            break
        }
    }
    if cons.peek_header()?.is_some() {
        xerr!(return Err(cons.content_err(
            format!("expected {} segment", segment_tag)
        )))
    }
    Ok(())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;
    use crate::encode::Values;

    fn take(data: &[u8], mode: Mode) -> Result<Bytes, DecodeError> {
        mode.decode(data, |cons| {
            OctetString::take_from(cons).map(OctetString::into_bytes)
        })
    }

    #[test]
    fn take_from_ber() {
        // D .. definite constructed
        // I .. indefinite constructed
        // p .. primitive

        // p
        assert_eq!(take(b"\x04\x02ab", Mode::Der).unwrap(), "ab");

        // D(p)
        assert_eq!(take(b"\x24\x04\x04\x02ab", Mode::Ber).unwrap(), "ab");

        // D(pp)
        assert_eq!(
            take(b"\x24\x06\x04\x01a\x04\x01b", Mode::Ber).unwrap(),
            "ab"
        );

        // D(I(p))
        assert_eq!(
            take(b"\x24\x08\x24\x80\x04\x02ab\0\0", Mode::Ber).unwrap(),
            "ab"
        );

        // I(p)
        assert_eq!(
            take(b"\x24\x80\x04\x02ab\0\0", Mode::Ber).unwrap(),
            "ab"
        );

        // D(pI(p))
        assert_eq!(
            take(b"\x24\x0a\x04\x01a\x24\x80\x04\x01b\0\0", Mode::Ber)
                .unwrap(),
            "ab"
        );

        // I()
        assert_eq!(take(b"\x24\x80\0\0", Mode::Ber).unwrap(), "");
    }

    #[test]
    fn take_from_malformed() {
        assert!(take(b"\x24\x04\x04\x02ab", Mode::Der).is_err());
        assert_eq!(
            take(b"\x24\x03\x01\x01\xff", Mode::Ber).unwrap_err().message(),
            "expected OCTET STRING segment"
        );
        assert_eq!(
            take(b"\x24\x80\x04\x02ab", Mode::Ber).unwrap_err().kind(),
            ErrorKind::EndOfStream
        );
    }

    #[test]
    fn encode() {
        let string = OctetString::from(&b"abc"[..]);
        assert_eq!(string.encode().to_vec(), b"\x04\x03abc");
        assert_eq!(string.encode_as(Tag::CTX_0).to_vec(), b"\x80\x03abc");
    }
}
