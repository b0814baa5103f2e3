//! Arbitrary precision INTEGER values.

use std::{fmt, io};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use crate::decode::{Constructed, Content, DecodeError, Primitive};
use crate::encode::PrimitiveContent;
use crate::mode::Mode;
use crate::tag::Tag;


//------------ Integer -------------------------------------------------------

/// An INTEGER value of arbitrary size.
///
/// The value is kept as a [`BigInt`]. Conversions from and into the native
/// integer types are available via `From` and the `to_` methods.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit.
///
/// The encoder always produces the shortest possible content, i.e., the first
/// nine bits of the content are never all the same. When decoding in DER mode
/// this rule is enforced. In BER mode, redundant leading octets are accepted.
/// The content must never be empty.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Integer(BigInt);

impl Integer {
    /// Creates a new integer from a big integer.
    pub fn new(value: BigInt) -> Self {
        Integer(value)
    }

    /// Returns a reference to the big integer.
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    /// Converts the value into a big integer.
    pub fn into_bigint(self) -> BigInt {
        self.0
    }

    /// Returns the value as an `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    /// Returns the value as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Returns the content octets of the value.
    pub fn to_content(&self) -> Vec<u8> {
        self.0.to_signed_bytes_be()
    }
}

/// # Decoding
///
impl Integer {
    /// Takes a single INTEGER from the beginning of a constructed value.
    pub fn take_from(cons: &mut Constructed) -> Result<Self, DecodeError> {
        cons.take_primitive_if(Tag::INTEGER, Self::from_primitive)
    }

    /// Takes an optional INTEGER from the beginning of a constructed value.
    pub fn take_opt_from(
        cons: &mut Constructed
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_primitive_if(Tag::INTEGER, Self::from_primitive)
    }

    /// Decodes the content of an INTEGER value.
    pub fn from_content(content: &mut Content) -> Result<Self, DecodeError> {
        Self::from_primitive(content.as_primitive()?)
    }

    /// Decodes the content of a primitive INTEGER value.
    pub fn from_primitive(
        prim: &mut Primitive
    ) -> Result<Self, DecodeError> {
        Self::check_head(prim)?;
        let content = prim.take_all()?;
        Ok(Integer(BigInt::from_signed_bytes_be(content.as_ref())))
    }

    /// Decodes the content of an INTEGER value into an `i64`.
    pub fn i64_from_primitive(
        prim: &mut Primitive
    ) -> Result<i64, DecodeError> {
        let pos = prim.pos();
        match Self::from_primitive(prim)?.to_i64() {
            Some(value) => Ok(value),
            None => {
                xerr!(Err(DecodeError::malformed(
                    "INTEGER out of range", pos
                )))
            }
        }
    }

    /// Decodes the content of an INTEGER value into a `u64`.
    pub fn u64_from_primitive(
        prim: &mut Primitive
    ) -> Result<u64, DecodeError> {
        let pos = prim.pos();
        match Self::from_primitive(prim)?.to_u64() {
            Some(value) => Ok(value),
            None => {
                xerr!(Err(DecodeError::malformed(
                    "INTEGER out of range", pos
                )))
            }
        }
    }

    /// Checks that an integer is started correctly.
    ///
    /// Specifically, checks that there is at least one octet and, in DER
    /// mode, that the first nine bits of a multi-octet integer are not all
    /// the same.
    fn check_head(prim: &mut Primitive) -> Result<(), DecodeError> {
        let slice = prim.slice_all();
        if slice.is_empty() {
            xerr!(return Err(prim.content_err("empty INTEGER")))
        }
        if prim.mode() != Mode::Der {
            return Ok(())
        }
        match (slice.first(), slice.get(1).map(|x| x & 0x80 != 0)) {
            (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
                xerr!(Err(prim.content_err(
                    "INTEGER not minimally encoded"
                )))
            }
            _ => Ok(())
        }
    }
}


//--- From

macro_rules! from_native {
    ( $( $type:ident ),* ) => {
        $(
            impl From<$type> for Integer {
                fn from(value: $type) -> Self {
                    Integer(BigInt::from(value))
                }
            }
        )*
    }
}

from_native!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Integer(value)
    }
}

impl From<Integer> for BigInt {
    fn from(value: Integer) -> Self {
        value.0
    }
}


//--- Display

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//--- PrimitiveContent

impl<'a> PrimitiveContent for &'a Integer {
    const TAG: Tag = Tag::INTEGER;

    fn encoded_len(self) -> usize {
        self.0.to_signed_bytes_be().len()
    }

    fn write_encoded<W: io::Write>(
        self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&self.0.to_signed_bytes_be())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;
    use crate::encode::Values;

    const FIXTURES: &[(i64, &[u8])] = &[
        (0, b"\x00"),
        (1, b"\x01"),
        (-1, b"\xff"),
        (127, b"\x7f"),
        (128, b"\x00\x80"),
        (255, b"\x00\xff"),
        (256, b"\x01\x00"),
        (-128, b"\x80"),
        (-129, b"\xff\x7f"),
        (43568, b"\x00\xaa\x30"),
        (-43568, b"\xff\x55\xd0"),
    ];

    #[test]
    fn encode_fixtures() {
        for &(value, content) in FIXTURES {
            let int = Integer::from(value);
            assert_eq!(int.encode_to_vec(), content, "{}", value);
            assert_eq!((&int).encoded_len(), content.len(), "{}", value);
        }
    }

    #[test]
    fn decode_fixtures() {
        for &(value, content) in FIXTURES {
            for &mode in &[Mode::Ber, Mode::Der] {
                assert_eq!(
                    Primitive::decode_slice(
                        content, mode, Integer::i64_from_primitive
                    ).unwrap(),
                    value
                );
            }
        }
    }

    #[test]
    fn take_from() {
        let int = Mode::Der.decode(
            b"\x02\x03\x00\xaa\x30", Integer::take_from
        ).unwrap();
        assert_eq!(int, Integer::from(43568u16));
        assert_eq!(int.encode().to_vec(), b"\x02\x03\x00\xaa\x30");
        assert_eq!(
            Mode::Der.decode(b"\x04\x01\x00", Integer::take_opt_from)
                .unwrap_err().message(),
            "trailing data"
        );
    }

    #[test]
    fn decode_empty() {
        let err = Primitive::decode_slice(
            b"", Mode::Ber, Integer::from_primitive
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert_eq!(err.message(), "empty INTEGER");
    }

    #[test]
    fn decode_non_minimal() {
        assert_eq!(
            Primitive::decode_slice(
                b"\x00\x01", Mode::Ber, Integer::i64_from_primitive
            ).unwrap(),
            1
        );
        assert!(
            Primitive::decode_slice(
                b"\x00\x01", Mode::Der, Integer::from_primitive
            ).is_err()
        );
        assert!(
            Primitive::decode_slice(
                b"\xff\x80", Mode::Der, Integer::from_primitive
            ).is_err()
        );
    }

    #[test]
    fn big_values() {
        let content = b"\x00\x80\x00\x00\x00\x00\x00\x00\x00\x00\x01";
        let int = Primitive::decode_slice(
            content, Mode::Der, Integer::from_primitive
        ).unwrap();
        assert_eq!(int.to_i64(), None);
        assert_eq!(int.to_u64(), None);
        assert_eq!(int.encode_to_vec(), content);
        assert_eq!(
            Integer::from(u128::MAX).to_string(),
            "340282366920938463463374607431768211455"
        );
        assert!(
            Primitive::decode_slice(
                content, Mode::Der, Integer::u64_from_primitive
            ).is_err()
        );
    }
}
