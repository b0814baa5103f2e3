//! BER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::io;
use bytes::{Bytes, BytesMut};
use crate::decode::{Constructed, Content, DecodeError, Primitive};
use crate::encode::{PrimitiveContent, UsageError};
use crate::mode::Mode;
use crate::tag::Tag;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike
/// [`OctetString`][crate::string::OctetString]s, they do not need to contain
/// a multiple of eight bits.
///
/// You can parse a bit string value out of a constructed value using the
/// [`take_from`][Self::take_from] function. The
/// [`from_content`][Self::from_content] function parses the
/// content octets of a bit string value and can be used if the bit string is
/// implicitly tagged. Alternatively, you can create a new bit string
/// via the [`new`][Self::new] method or from a sequence of booleans via
/// [`from_bits`][Self::from_bits].
///
/// Bit strings are often used as a set of flags where each bit position has
/// a meaning. Since trailing zero bits don’t carry any information in this
/// case, [`from_flags`][Self::from_flags] and
/// [`strip_trailing_zeros`][Self::strip_trailing_zeros] produce the shortest
/// form so equal sets of flags always encode identically.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// When encoded in BER, bit strings can either be a primitive or
/// constructed value.
///
/// If encoded as a primitive value, the first octet of the
/// content contains the number of unused bits in the last octet and the
/// following octets contain the bits with the first bit in the most
/// significant bit of the octet.
///
/// In the constructed encoding, the bit string is represented as a sequence
/// of bit strings which in turn may either be constructed or primitive
/// encodings. The only limitation in this nesting is that only the last
/// primitively encoded bit string may have a non-zero number of unused bits.
///
/// With DER, only the primitive form is allowed and the unused bits must be
/// zero.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Fails if `unused` is greater than seven or if it is not zero for an
    /// empty bit string.
    pub fn new(unused: u8, bits: Bytes) -> Result<Self, UsageError> {
        if unused > 7 || (bits.is_empty() && unused != 0) {
            return Err(UsageError::InvalidUnusedBits)
        }
        Ok(BitString { unused, bits })
    }

    /// Creates a bit string from a sequence of bits.
    ///
    /// The first item becomes the most significant bit of the first octet.
    pub fn from_bits<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = Vec::new();
        let mut len = 0usize;
        for bit in iter {
            if len & 7 == 0 {
                bits.push(0u8);
            }
            if bit {
                if let Some(last) = bits.last_mut() {
                    *last |= 0x80 >> (len & 7);
                }
            }
            len += 1;
        }
        BitString {
            unused: ((8 - (len & 7)) & 7) as u8,
            bits: bits.into(),
        }
    }

    /// Creates a bit string for a set of flags.
    ///
    /// This is identical to [`from_bits`][Self::from_bits] followed by
    /// [`strip_trailing_zeros`][Self::strip_trailing_zeros].
    pub fn from_flags<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from_bits(iter).strip_trailing_zeros()
    }

    /// Removes all trailing zero bits.
    ///
    /// The result has the same value for every bit but ends in a one bit
    /// or is empty.
    pub fn strip_trailing_zeros(self) -> Self {
        let len = match (0..self.bit_len()).rev().find(|&i| self.bit(i)) {
            Some(last) => last + 1,
            None => return BitString::default()
        };
        let octets = (len + 7) >> 3;
        let unused = ((octets << 3) - len) as u8;
        let mut bits = self.bits[..octets].to_vec();
        if let Some(last) = bits.last_mut() {
            *last &= 0xFFu8 << unused;
        }
        BitString { unused, bits: bits.into() }
    }

    /// Returns the value of the given bit.
    ///
    /// Bits past the end of the bit string are reported as unset.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        self.bits[bit >> 3] & (0x80 >> (bit & 7)) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - (self.unused as usize)
    }

    /// Returns all the bits as a vector of booleans.
    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.bit_len()).map(|i| self.bit(i)).collect()
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octets(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }
}

/// # Decoding
///
impl BitString {
    /// Takes a single bit string value from constructed content.
    pub fn take_from(cons: &mut Constructed) -> Result<Self, DecodeError> {
        cons.take_value_if(Tag::BIT_STRING, Self::from_content)
    }

    /// Takes an optional bit string value from constructed content.
    pub fn take_opt_from(
        cons: &mut Constructed
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_value_if(Tag::BIT_STRING, Self::from_content)
    }

    /// Parses the content octets of a bit string value.
    pub fn from_content(content: &mut Content) -> Result<Self, DecodeError> {
        match content {
            Content::Primitive(inner) => {
                let mut bits = BytesMut::new();
                let unused = take_segment(inner, &mut bits)?;
                Ok(BitString { unused, bits: bits.freeze() })
            }
            Content::Constructed(inner) => {
                if inner.mode() == Mode::Der {
                    xerr!(return Err(inner.content_err(
                        "constructed bit string in DER mode"
                    )))
                }
                let mut bits = BytesMut::new();
                let mut unused = 0;
                take_segments(inner, &mut bits, &mut unused)?;
                Ok(BitString { unused, bits: bits.freeze() })
            }
        }
    }
}

/// Appends the bits of a primitive segment and returns its unused bits.
fn take_segment(
    prim: &mut Primitive,
    target: &mut BytesMut,
) -> Result<u8, DecodeError> {
    if prim.remaining() == 0 {
        xerr!(return Err(prim.content_err("empty bit string content")))
    }
    let unused = prim.take_u8()?;
    if unused > 7 {
        xerr!(return Err(prim.content_err("invalid unused bits")))
    }
    let bits = prim.slice_all();
    match bits.last() {
        None if unused != 0 => {
            xerr!(return Err(prim.content_err(
                "unused bits in empty bit string"
            )))
        }
        Some(last) if prim.mode() == Mode::Der => {
            if last & !(0xFFu8 << unused) != 0 {
                xerr!(return Err(prim.content_err(
                    "non-zero unused bits in DER mode"
                )))
            }
        }
        _ => { }
    }
    target.extend_from_slice(bits);
    prim.skip_all()?;
    Ok(unused)
}

/// Appends the bits of all segments of a constructed bit string.
///
/// `unused` holds the unused bits of the last segment so far. Only the very
/// last segment may have unused bits.
fn take_segments(
    cons: &mut Constructed,
    target: &mut BytesMut,
    unused: &mut u8,
) -> Result<(), DecodeError> {
    loop {
        let pos = cons.pos();
        let res = cons.take_opt_value_if(Tag::BIT_STRING, |content| {
            if *unused != 0 {
                xerr!(return Err(DecodeError::malformed(
                    "unused bits in non-final bit string segment", pos
                )))
            }
            match content {
                Content::Primitive(inner) => {
                    *unused = take_segment(inner, target)?;
                    Ok(())
                }
                Content::Constructed(inner) => {
                    take_segments(inner, target, unused)
                }
            }
        })?;
        if res.is_none() {
            break
        }
    }
    if cons.peek_header()?.is_some() {
        xerr!(return Err(cons.content_err("expected BIT STRING segment")))
    }
    Ok(())
}


//--- PrimitiveContent

impl<'a> PrimitiveContent for &'a BitString {
    const TAG: Tag = Tag::BIT_STRING;

    fn encoded_len(self) -> usize {
        self.bits.len() + 1
    }

    fn write_encoded<W: io::Write>(
        self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&[self.unused])?;
        target.write_all(self.bits.as_ref())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::Values;

    fn take(data: &[u8], mode: Mode) -> Result<BitString, DecodeError> {
        mode.decode(data, BitString::take_from)
    }

    #[test]
    fn padded_round_trip() {
        let bits = take(b"\x03\x03\x03\xb0\xc0", Mode::Ber).unwrap();
        assert_eq!(bits.unused(), 3);
        assert_eq!(bits.octets(), b"\xb0\xc0");
        assert_eq!(bits.bit_len(), 13);
        assert_eq!(bits.encode().to_vec(), b"\x03\x03\x03\xb0\xc0");

        let stripped = bits.clone().strip_trailing_zeros();
        assert_eq!(stripped.unused(), 6);
        assert_eq!(stripped.octets(), b"\xb0\xc0");
        for i in 0..16 {
            assert_eq!(bits.bit(i), stripped.bit(i), "bit {}", i);
        }
    }

    #[test]
    fn bools_and_flags() {
        let bools = [true, false, true, true, false, false, false, false, true];
        let bits = BitString::from_bits(bools.iter().copied());
        assert_eq!(bits.octets(), b"\xb0\x80");
        assert_eq!(bits.unused(), 7);
        assert_eq!(bits.to_bools(), bools);

        let flags = BitString::from_flags(vec![false, true, false, false]);
        assert_eq!(flags.unused(), 6);
        assert_eq!(flags.octets(), b"\x40");
        assert_eq!(
            flags,
            BitString::from_flags(vec![false, true, false, false, false])
        );
        assert_eq!(BitString::from_flags(vec![false; 9]), BitString::default());
        assert_eq!(BitString::default().encode().to_vec(), b"\x03\x01\x00");
    }

    #[test]
    fn constructed() {
        let bits = take(
            b"\x23\x80\x03\x02\x00\xb0\x23\x04\x03\x02\x04\xc0\0\0",
            Mode::Ber
        ).unwrap();
        assert_eq!(bits.octets(), b"\xb0\xc0");
        assert_eq!(bits.unused(), 4);

        assert!(take(
            b"\x23\x08\x03\x02\x04\xb0\x03\x02\x00\xc0", Mode::Ber
        ).is_err());
        assert!(take(b"\x23\x04\x03\x02\x00\xb0", Mode::Der).is_err());
    }

    #[test]
    fn malformed() {
        assert!(take(b"\x03\x00", Mode::Ber).is_err());
        assert!(take(b"\x03\x01\x01", Mode::Ber).is_err());
        assert!(take(b"\x03\x02\x08\x00", Mode::Ber).is_err());
        assert!(take(b"\x03\x02\x01\x01", Mode::Ber).is_ok());
        assert!(take(b"\x03\x02\x01\x01", Mode::Der).is_err());
        assert!(BitString::new(8, Bytes::from_static(b"\0")).is_err());
        assert!(BitString::new(1, Bytes::new()).is_err());
    }
}
