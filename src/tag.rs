//! The identifier octets of a BER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, io};
use crate::decode::{DecodeError, SliceSource};


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// Tags defined by X.680 itself.
    Universal,

    /// Tags assigned by an application.
    Application,

    /// Tags whose meaning depends on the surrounding type.
    Context,

    /// Tags defined privately.
    Private,
}

impl Class {
    /// Returns the class bits of the first identifier octet.
    fn bits(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xc0,
        }
    }

    fn from_octet(octet: u8) -> Self {
        match octet & Tag::CLASS_BITS {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }
}


//------------ Tag -----------------------------------------------------------

/// The tag of a BER encoded value.
///
/// Each encoded value starts with one or more _identifier octets._ They
/// contain the class and number of the tag as well as whether the value
/// uses primitive or constructed encoding. `Tag` only covers the former,
/// the encoding form is kept by [`Header`].
///
/// Tag numbers below 31 fit into the first identifier octet. Larger
/// numbers use the high-tag-number form where the first octet only has
/// the class and all number bits set and the number follows in base 128.
///
/// # Limitations
///
/// At most three octets of the high-tag-number form are supported, which
/// limits tag numbers to the range up to 0x1f_ffff.
///
/// [`Header`]: struct.Header.html
//
//  The tag keeps the identifier octets as they appear on the wire with the
//  constructed bit cleared and the unused octets zero. Since decoding only
//  accepts minimal encodings, comparing the octets compares the tags.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag([u8; 4]);

/// # Constants for Often Used Tag Values
///
impl Tag {
    const CLASS_BITS: u8 = 0xc0;
    const CONSTRUCTED_BIT: u8 = 0x20;

    /// The number bits of the first octet.
    ///
    /// If all of them are set, the high-tag-number form is used.
    const NUMBER_BITS: u8 = 0x1f;

    /// Set in every octet of the high-tag-number form but the last.
    const MORE_BIT: u8 = 0x80;

    /// The largest supported tag number.
    const MAX_NUMBER: u32 = 0x001f_ffff;

    /// The tag of the end-of-contents marker, UNIVERSAL 0.
    pub const END_OF_CONTENTS: Self = Tag([0, 0, 0, 0]);

    //--- Universal Tags
    //
    // See clause 8.4 of X.690.

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Tag([1, 0, 0, 0]);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Tag([2, 0, 0, 0]);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Tag([3, 0, 0, 0]);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Tag([4, 0, 0, 0]);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Tag([5, 0, 0, 0]);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Tag([6, 0, 0, 0]);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Tag([12, 0, 0, 0]);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Tag([16, 0, 0, 0]);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Tag([17, 0, 0, 0]);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Tag([19, 0, 0, 0]);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Tag([20, 0, 0, 0]);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Tag([22, 0, 0, 0]);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Tag([23, 0, 0, 0]);

    /// The tag for the GeneralizedTime type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Tag([24, 0, 0, 0]);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Tag([28, 0, 0, 0]);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Tag([30, 0, 0, 0]);

    //--- The first few context-specific tags.

    /// The context specific tag [0].
    pub const CTX_0: Self = Tag([0x80, 0, 0, 0]);

    /// The context specific tag [1].
    pub const CTX_1: Self = Tag([0x81, 0, 0, 0]);

    /// The context specific tag [2].
    pub const CTX_2: Self = Tag([0x82, 0, 0, 0]);

    /// The context specific tag [3].
    pub const CTX_3: Self = Tag([0x83, 0, 0, 0]);
}

impl Tag {
    /// Creates a tag from the class bits and the number.
    ///
    /// # Panics
    ///
    /// The function panics if the number is larger than `MAX_NUMBER`.
    fn new(class_bits: u8, number: u32) -> Self {
        assert!(number <= Tag::MAX_NUMBER, "tag number too large");
        let mut octets = [class_bits, 0, 0, 0];
        if number < u32::from(Tag::NUMBER_BITS) {
            octets[0] |= number as u8;
            return Tag(octets)
        }
        octets[0] |= Tag::NUMBER_BITS;
        let digits = match number {
            0..=0x7f => 1,
            0x80..=0x3fff => 2,
            _ => 3
        };
        for i in 0..digits {
            let mut octet = (number >> (7 * (digits - 1 - i))) as u8 & 0x7f;
            if i + 1 < digits {
                octet |= Tag::MORE_BIT
            }
            octets[1 + i] = octet;
        }
        Tag(octets)
    }

    /// Creates a new tag of the given class and number.
    ///
    /// # Panics
    ///
    /// The function panics if the number is larger than 0x1f_ffff.
    pub fn from_parts(class: Class, number: u32) -> Self {
        Tag::new(class.bits(), number)
    }

    /// Creates a new tag in the universal class.
    ///
    /// # Panics
    ///
    /// The function panics if the number is larger than 0x1f_ffff.
    pub fn universal(number: u32) -> Self {
        Tag::from_parts(Class::Universal, number)
    }

    /// Creates a new tag in the application class.
    ///
    /// # Panics
    ///
    /// The function panics if the number is larger than 0x1f_ffff.
    pub fn application(number: u32) -> Self {
        Tag::from_parts(Class::Application, number)
    }

    /// Creates a new tag in the context specific class.
    ///
    /// # Panics
    ///
    /// The function panics if the number is larger than 0x1f_ffff.
    pub fn ctx(number: u32) -> Self {
        Tag::from_parts(Class::Context, number)
    }

    /// Creates a new tag in the private class.
    ///
    /// # Panics
    ///
    /// The function panics if the number is larger than 0x1f_ffff.
    pub fn private(number: u32) -> Self {
        Tag::from_parts(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub fn class(self) -> Class {
        Class::from_octet(self.0[0])
    }

    /// Returns whether the tag is of the universal class.
    pub fn is_universal(self) -> bool {
        self.class() == Class::Universal
    }

    /// Returns whether the tag is of the context specific class.
    pub fn is_context_specific(self) -> bool {
        self.class() == Class::Context
    }

    fn is_high_form(self) -> bool {
        self.0[0] & Tag::NUMBER_BITS == Tag::NUMBER_BITS
    }

    /// Returns the number of the tag.
    pub fn number(self) -> u32 {
        if !self.is_high_form() {
            return u32::from(self.0[0] & Tag::NUMBER_BITS)
        }
        let mut res = 0;
        for &octet in &self.0[1..] {
            res = res << 7 | u32::from(octet & !Tag::MORE_BIT);
            if octet & Tag::MORE_BIT == 0 {
                break
            }
        }
        res
    }

    /// Takes a tag from the beginning of a source.
    ///
    /// Upon success, returns both the tag and whether the value is
    /// constructed. Tags using more octets than necessary are rejected as
    /// malformed.
    pub fn take_from(
        source: &mut SliceSource,
    ) -> Result<(Self, bool), DecodeError> {
        let pos = source.pos();
        let first = source.take_u8()?;
        let constructed = first & Tag::CONSTRUCTED_BIT != 0;
        let first = first & !Tag::CONSTRUCTED_BIT;
        if first & Tag::NUMBER_BITS != Tag::NUMBER_BITS {
            return Ok((Tag([first, 0, 0, 0]), constructed))
        }
        let mut number = 0u32;
        for i in 0..3 {
            let octet = source.take_u8()?;
            if i == 0 && octet == Tag::MORE_BIT {
                xerr!(return Err(DecodeError::malformed(
                    "leading zero in tag number", pos
                )))
            }
            number = number << 7 | u32::from(octet & !Tag::MORE_BIT);
            if octet & Tag::MORE_BIT == 0 {
                if number < u32::from(Tag::NUMBER_BITS) {
                    xerr!(return Err(DecodeError::malformed(
                        "low tag number in high-tag-number form", pos
                    )))
                }
                return Ok((
                    Tag::new(first & Tag::CLASS_BITS, number), constructed
                ))
            }
        }
        xerr!(Err(DecodeError::unsupported(
            "tag numbers above 0x1fffff are not supported", pos
        )))
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if !self.is_high_form() {
            return 1
        }
        1 + self.0[1..].iter().position(|octet| {
            octet & Tag::MORE_BIT == 0
        }).map(|idx| idx + 1).unwrap_or(3)
    }

    /// Encodes the tag into a target.
    ///
    /// If `constructed` is `true`, the encoded tag will signal a value in
    /// constructed encoding and primitive encoding otherwise.
    pub fn write_encoded<W: io::Write>(
        self,
        constructed: bool,
        target: &mut W
    ) -> Result<(), io::Error> {
        let mut buf = self.0;
        if constructed {
            buf[0] |= Tag::CONSTRUCTED_BIT
        }
        target.write_all(&buf[..self.encoded_len()])
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Tag::END_OF_CONTENTS => "end-of-contents",
            Tag::BOOLEAN => "BOOLEAN",
            Tag::INTEGER => "INTEGER",
            Tag::BIT_STRING => "BIT STRING",
            Tag::OCTET_STRING => "OCTET STRING",
            Tag::NULL => "NULL",
            Tag::OID => "OBJECT IDENTIFIER",
            Tag::UTF8_STRING => "UTF8String",
            Tag::SEQUENCE => "SEQUENCE",
            Tag::SET => "SET",
            Tag::PRINTABLE_STRING => "PrintableString",
            Tag::TELETEX_STRING => "TeletexString",
            Tag::IA5_STRING => "IA5String",
            Tag::UTC_TIME => "UTCTime",
            Tag::GENERALIZED_TIME => "GeneralizedTime",
            Tag::UNIVERSAL_STRING => "UniversalString",
            Tag::BMP_STRING => "BMPString",
            tag => {
                let class = match tag.class() {
                    Class::Universal => "UNIVERSAL ",
                    Class::Application => "APPLICATION ",
                    Class::Context => "",
                    Class::Private => "PRIVATE ",
                };
                return write!(f, "[{}{}]", class, tag.number())
            }
        };
        f.write_str(name)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;

    const CLASSES: &[Class] = &[
        Class::Universal, Class::Application, Class::Context, Class::Private
    ];

    #[test]
    fn encode_and_take() {
        // Number and encoded octets with class and constructed bits cleared.
        let cases: &[(u32, &[u8])] = &[
            (0, b"\x00"),
            (30, b"\x1e"),
            (31, b"\x1f\x1f"),
            (127, b"\x1f\x7f"),
            (128, b"\x1f\x81\x00"),
            (0x3fff, b"\x1f\xff\x7f"),
            (0x4000, b"\x1f\x81\x80\x00"),
            (0x1f_ffff, b"\x1f\xff\xff\x7f"),
        ];
        for &class in CLASSES {
            for &(number, octets) in cases {
                let tag = Tag::from_parts(class, number);
                let mut expected = octets.to_vec();
                expected[0] |= class.bits();

                let mut encoded = Vec::new();
                tag.write_encoded(false, &mut encoded).unwrap();
                assert_eq!(encoded, expected);
                assert_eq!(tag.encoded_len(), expected.len());

                let mut source = SliceSource::from_slice(&encoded);
                assert_eq!(Tag::take_from(&mut source).unwrap(), (tag, false));
                assert_eq!(source.remaining(), 0);
                assert_eq!(tag.number(), number);
                assert_eq!(tag.class(), class);
            }
        }
    }

    #[test]
    fn constructed_bit() {
        let mut source = SliceSource::from_slice(b"\x30");
        assert_eq!(Tag::take_from(&mut source).unwrap(), (Tag::SEQUENCE, true));
        let mut encoded = Vec::new();
        Tag::ctx(3).write_encoded(true, &mut encoded).unwrap();
        assert_eq!(encoded, b"\xa3");
        assert_eq!(Tag::ctx(3), Tag::CTX_3);
    }

    #[test]
    fn take_failures() {
        let take = |data: &[u8]| {
            Tag::take_from(
                &mut SliceSource::from_slice(data)
            ).unwrap_err().kind()
        };
        assert_eq!(take(b"\xff\x80\x80\x80\x80"), ErrorKind::Malformed);
        assert_eq!(take(b"\xff\x81\x80\x80\x00"), ErrorKind::Unsupported);
        assert_eq!(take(b"\x1f\x81"), ErrorKind::EndOfStream);
        assert_eq!(take(b"\x1f\x05"), ErrorKind::Malformed);
        assert_eq!(take(b""), ErrorKind::EndOfStream);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Tag::ctx(5)), "[5]");
        assert_eq!(format!("{}", Tag::private(40)), "[PRIVATE 40]");
        assert_eq!(format!("{}", Tag::universal(10)), "[UNIVERSAL 10]");
        assert_eq!(format!("{}", Tag::SEQUENCE), "SEQUENCE");
        assert_eq!(format!("{:?}", Tag::BMP_STRING), "Tag(BMPString)");
    }
}
