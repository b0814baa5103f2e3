//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ANS.1 to uniquely identify all sorts of things. The
//! type is also re-exported at the top-level.
//!
//! [`Oid`]: struct.Oid.html

use std::{cmp, fmt, io};
use std::str::FromStr;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use crate::decode::{Constructed, Content, DecodeError, Primitive};
use crate::encode::{PrimitiveContent, UsageError};
use crate::tag::Tag;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’. Each
/// of these integers is called an arc. Arcs are not limited in size, so
/// they are kept as [`BigUint`]s.
///
/// The first arc must be 0, 1, or 2. If it is 0 or 1, the second arc must
/// be less than 40. Every identifier has at least two arcs. These rules are
/// enforced by all means of creating a value.
///
/// Identifiers are ordered by the number of arcs first, with shorter
/// identifiers preceding longer ones, and then arc by arc.
///
/// # BER Encoding
///
/// An identifier is encoded as a primitive value. The first two arcs are
/// combined into a single component as `arc0 * 40 + arc1`, followed by one
/// component for each of the remaining arcs. Each component is encoded in
/// base 128, most significant group first, with the highest bit of every
/// octet but the last of a component set.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Oid {
    arcs: Vec<BigUint>,
}

impl Oid {
    /// Creates an identifier from its arcs.
    pub fn new(arcs: Vec<BigUint>) -> Result<Self, UsageError> {
        if arcs.len() < 2 {
            return Err(UsageError::InvalidOid("at least two arcs required"))
        }
        let first = arcs[0].to_u8().filter(|first| *first <= 2);
        let first = match first {
            Some(first) => first,
            None => {
                return Err(UsageError::InvalidOid(
                    "first arc must be 0, 1, or 2"
                ))
            }
        };
        if first < 2 && arcs[1] >= BigUint::from(40u8) {
            return Err(UsageError::InvalidOid(
                "second arc must be less than 40"
            ))
        }
        Ok(Oid { arcs })
    }

    /// Creates an identifier from arcs given as native integers.
    pub fn from_u64s(arcs: &[u64]) -> Result<Self, UsageError> {
        Self::new(arcs.iter().map(|arc| BigUint::from(*arc)).collect())
    }

    /// Returns the arcs of the identifier.
    pub fn arcs(&self) -> &[BigUint] {
        &self.arcs
    }

    /// Returns whether `self` is ordered before `other`.
    pub fn precedes(&self, other: &Oid) -> bool {
        self < other
    }

    /// Returns the content octets of the encoded identifier.
    pub fn to_content(&self) -> Vec<u8> {
        let mut res = Vec::new();
        let first = &self.arcs[0] * 40u32 + &self.arcs[1];
        push_component(&first, &mut res);
        for arc in &self.arcs[2..] {
            push_component(arc, &mut res);
        }
        res
    }
}

/// Appends the base 128 encoding of a component to `target`.
fn push_component(component: &BigUint, target: &mut Vec<u8>) {
    if component.is_zero() {
        target.push(0);
        return
    }
    let digits = component.to_radix_be(128);
    let last = digits.len() - 1;
    target.extend(digits.iter().enumerate().map(|(i, digit)| {
        if i == last { *digit } else { *digit | 0x80 }
    }));
}


/// # Decoding
///
impl Oid {
    /// Takes an object identifier value from the source.
    ///
    /// If the source has reached its end, if the next value does not have
    /// the `Tag::OID`, or if it is not a primitive value, returns a malformed
    /// error.
    pub fn take_from(cons: &mut Constructed) -> Result<Self, DecodeError> {
        cons.take_primitive_if(Tag::OID, Self::from_primitive)
    }

    /// Takes an optional object identifier value from the source.
    ///
    /// If the source has reached its end of if the next value does not have
    /// the `Tag::OID`, returns `Ok(None)`.
    pub fn take_opt_from(
        cons: &mut Constructed
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_primitive_if(Tag::OID, Self::from_primitive)
    }

    /// Skips over an object identifier if it is equal to `self`.
    ///
    /// Returns a malformed error if the next value is a different identifier.
    pub fn skip_if(&self, cons: &mut Constructed) -> Result<(), DecodeError> {
        let pos = cons.pos();
        let oid = Self::take_from(cons)?;
        if oid == *self {
            Ok(())
        }
        else {
            xerr!(Err(DecodeError::malformed(
                format!("expected object identifier {}, found {}", self, oid),
                pos
            )))
        }
    }

    /// Decodes the content of an object identifier value.
    pub fn from_content(content: &mut Content) -> Result<Self, DecodeError> {
        Self::from_primitive(content.as_primitive()?)
    }

    /// Decodes the content of a primitive object identifier value.
    pub fn from_primitive(
        prim: &mut Primitive
    ) -> Result<Self, DecodeError> {
        let pos = prim.pos();
        let content = prim.take_all()?;
        if content.is_empty() {
            xerr!(return Err(DecodeError::malformed(
                "empty OBJECT IDENTIFIER", pos
            )))
        }
        let mut arcs = Vec::new();
        let mut component = BigUint::zero();
        let mut start = true;
        for &octet in content.iter() {
            if start && octet == 0x80 {
                xerr!(return Err(DecodeError::malformed(
                    "OBJECT IDENTIFIER component not minimally encoded", pos
                )))
            }
            component = (component << 7usize) + u32::from(octet & 0x7F);
            start = octet & 0x80 == 0;
            if start {
                if arcs.is_empty() {
                    let (first, second) = split_first(component);
                    arcs.push(first);
                    arcs.push(second);
                }
                else {
                    arcs.push(component);
                }
                component = BigUint::zero();
            }
        }
        if !start {
            xerr!(return Err(DecodeError::malformed(
                "truncated OBJECT IDENTIFIER component", pos
            )))
        }
        Ok(Oid { arcs })
    }
}

/// Splits the first component into the first two arcs.
fn split_first(component: BigUint) -> (BigUint, BigUint) {
    match component.to_u8() {
        Some(value) if value < 40 => {
            (BigUint::zero(), BigUint::from(value))
        }
        Some(value) if value < 80 => {
            (BigUint::from(1u8), BigUint::from(value - 40))
        }
        _ => (BigUint::from(2u8), component - 80u32)
    }
}


//--- FromStr

impl FromStr for Oid {
    type Err = UsageError;

    /// Parses an identifier in dotted decimal notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s.split('.').map(|arc| {
            if arc.is_empty() || !arc.bytes().all(|ch| ch.is_ascii_digit()) {
                return Err(UsageError::InvalidOid("invalid arc"))
            }
            BigUint::from_str(arc).map_err(|_| {
                UsageError::InvalidOid("invalid arc")
            })
        }).collect::<Result<Vec<_>, _>>()?;
        Self::new(arcs)
    }
}


//--- PartialOrd and Ord

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.arcs.len().cmp(&other.arcs.len()).then_with(|| {
            self.arcs.cmp(&other.arcs)
        })
    }
}


//--- Display

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(arc) = arcs.next() {
            write!(f, "{}", arc)?;
        }
        for arc in arcs {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}


//--- PrimitiveContent

impl<'a> PrimitiveContent for &'a Oid {
    const TAG: Tag = Tag::OID;

    fn encoded_len(self) -> usize {
        self.to_content().len()
    }

    fn write_encoded<W: io::Write>(
        self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&self.to_content())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::Values;
    use crate::mode::Mode;

    #[test]
    fn rsadsi() {
        let oid = Oid::from_str("1.2.840.113549").unwrap();
        assert_eq!(oid.encode_to_vec(), b"\x2a\x86\x48\x86\xf7\x0d");
        let decoded = Mode::Der.decode(
            b"\x06\x06\x2a\x86\x48\x86\xf7\x0d", Oid::take_from
        ).unwrap();
        assert_eq!(decoded, oid);
        assert_eq!(decoded.arcs()[0], BigUint::from(1u8));
        assert_eq!(decoded.arcs()[1], BigUint::from(2u8));
        assert_eq!(decoded.to_string(), "1.2.840.113549");
        assert_eq!(
            decoded.encode().to_vec(), b"\x06\x06\x2a\x86\x48\x86\xf7\x0d"
        );
    }

    #[test]
    fn first_component() {
        let decode = |data: &[u8]| {
            Primitive::decode_slice(data, Mode::Ber, Oid::from_primitive)
                .unwrap().to_string()
        };
        assert_eq!(decode(b"\x00"), "0.0");
        assert_eq!(decode(b"\x27"), "0.39");
        assert_eq!(decode(b"\x28"), "1.0");
        assert_eq!(decode(b"\x50"), "2.0");
        assert_eq!(decode(b"\x81\x34\x03"), "2.100.3");
    }

    #[test]
    fn huge_arc() {
        let text = "2.25.329800735698586629295641978511506172918";
        let oid = Oid::from_str(text).unwrap();
        let content = oid.encode_to_vec();
        assert_eq!(content[0], 0x69);
        let decoded = Primitive::decode_slice(
            &content, Mode::Der, Oid::from_primitive
        ).unwrap();
        assert_eq!(decoded.to_string(), text);
    }

    #[test]
    fn malformed() {
        assert!(
            Primitive::decode_slice(b"", Mode::Ber, Oid::from_primitive)
                .is_err()
        );
        assert!(
            Primitive::decode_slice(b"\x2a\x86", Mode::Ber, Oid::from_primitive)
                .is_err()
        );
        assert!(
            Primitive::decode_slice(
                b"\x2a\x80\x01", Mode::Ber, Oid::from_primitive
            ).is_err()
        );
    }

    #[test]
    fn invalid_arcs() {
        assert!(Oid::from_str("1").is_err());
        assert!(Oid::from_str("3.1").is_err());
        assert!(Oid::from_str("1.40").is_err());
        assert!(Oid::from_str("2.40").is_ok());
        assert!(Oid::from_str("1..2").is_err());
        assert!(Oid::from_str("1.2.-3").is_err());
        assert!(Oid::from_u64s(&[0, 39, 7]).is_ok());
    }

    #[test]
    fn ordering() {
        let short = Oid::from_str("2.5.4").unwrap();
        let long = Oid::from_str("1.2.840.113549").unwrap();
        let longer = Oid::from_str("1.2.840.113549.1").unwrap();
        assert!(short.precedes(&long));
        assert!(long.precedes(&longer));
        assert!(!longer.precedes(&long));
        assert!(
            Oid::from_str("1.2.840.10040").unwrap().precedes(&long)
        );
        assert!(!long.precedes(&long));
    }
}
