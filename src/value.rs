//! Decoded values of any supported type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::io;
use crate::any::Any;
use crate::choice::Choice;
use crate::encode::{
    total_len, write_header, PrimitiveContent, UsageError, Values
};
use crate::explicit::Explicit;
use crate::int::Integer;
use crate::oid::Oid;
use crate::sequence::{Sequence, Set};
use crate::string::{
    BitString, BmpString, Ia5String, OctetString, PrintableString,
    TeletexString, UniversalString, Utf8String,
};
use crate::tag::Tag;
use crate::time::{GeneralizedTime, UtcTime};


//------------ Value ---------------------------------------------------------

/// A value of one of the supported ASN.1 types.
///
/// Values are produced by decoding data with a [`Template`] or assembled by
/// hand for encoding. Composite values own their elements, so a value is
/// always a tree.
///
/// Each value has a tag: the natural tag of its type, the outer tag of an
/// [`Explicit`], the captured tag of an [`Any`], or the tag of the selected
/// alternative of a [`Choice`]. The value can be encoded with this tag via
/// [`encode`] or with an implicit tag via [`encode_as`].
///
/// [`Template`]: enum.Template.html
/// [`Explicit`]: struct.Explicit.html
/// [`Any`]: struct.Any.html
/// [`Choice`]: struct.Choice.html
/// [`encode`]: #method.encode
/// [`encode_as`]: #method.encode_as
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Boolean(bool),
    Null,
    Integer(Integer),
    OctetString(OctetString),
    BitString(BitString),
    Oid(Oid),
    Utf8String(Utf8String),
    PrintableString(PrintableString),
    TeletexString(TeletexString),
    UniversalString(UniversalString),
    BmpString(BmpString),
    Ia5String(Ia5String),
    UtcTime(UtcTime),
    GeneralizedTime(GeneralizedTime),
    Sequence(Sequence),
    Set(Set),
    Choice(Choice),
    Explicit(Explicit),
    Any(Any),
}

impl Value {
    /// Returns the tag the value is encoded with by default.
    pub fn tag(&self) -> Tag {
        match *self {
            Value::Boolean(_) => Tag::BOOLEAN,
            Value::Null => Tag::NULL,
            Value::Integer(_) => Tag::INTEGER,
            Value::OctetString(_) => Tag::OCTET_STRING,
            Value::BitString(_) => Tag::BIT_STRING,
            Value::Oid(_) => Tag::OID,
            Value::Utf8String(_) => Tag::UTF8_STRING,
            Value::PrintableString(_) => Tag::PRINTABLE_STRING,
            Value::TeletexString(_) => Tag::TELETEX_STRING,
            Value::UniversalString(_) => Tag::UNIVERSAL_STRING,
            Value::BmpString(_) => Tag::BMP_STRING,
            Value::Ia5String(_) => Tag::IA5_STRING,
            Value::UtcTime(_) => Tag::UTC_TIME,
            Value::GeneralizedTime(_) => Tag::GENERALIZED_TIME,
            Value::Sequence(_) => Tag::SEQUENCE,
            Value::Set(_) => Tag::SET,
            Value::Choice(ref choice) => choice.value().tag(),
            Value::Explicit(ref explicit) => explicit.tag(),
            Value::Any(ref any) => any.tag(),
        }
    }

    /// Returns whether the value is encoded in constructed form.
    pub fn is_constructed(&self) -> bool {
        match *self {
            Value::Sequence(_) | Value::Set(_) | Value::Explicit(_) => true,
            Value::Choice(ref choice) => choice.value().is_constructed(),
            Value::Any(ref any) => any.is_constructed(),
            _ => false
        }
    }

    /// Returns a value encoder using the value’s own tag.
    ///
    /// A CHOICE is encoded as its selected alternative.
    pub fn encode(&self) -> ValueEncoder {
        match *self {
            Value::Choice(ref choice) => choice.value().encode(),
            _ => ValueEncoder { tag: self.tag(), value: self }
        }
    }

    /// Returns a value encoder using an implicit tag.
    ///
    /// The content stays the same, only the tag is replaced. This fails
    /// for a CHOICE which doesn’t have a tag of its own.
    pub fn encode_as(&self, tag: Tag) -> Result<ValueEncoder, UsageError> {
        match *self {
            Value::Choice(_) => Err(UsageError::ImplicitChoice),
            _ => Ok(ValueEncoder { tag, value: self })
        }
    }

    /// Returns the complete encoding of the value.
    pub fn to_vec(&self) -> Vec<u8> {
        self.encode().to_vec()
    }

    /// Returns the length of the content octets.
    fn content_len(&self) -> usize {
        match *self {
            Value::Boolean(value) => value.encoded_len(),
            Value::Null => ().encoded_len(),
            Value::Integer(ref value) => value.encoded_len(),
            Value::OctetString(ref value) => value.encoded_len(),
            Value::BitString(ref value) => value.encoded_len(),
            Value::Oid(ref value) => value.encoded_len(),
            Value::Utf8String(ref value) => value.encoded_len(),
            Value::PrintableString(ref value) => value.encoded_len(),
            Value::TeletexString(ref value) => value.encoded_len(),
            Value::UniversalString(ref value) => value.encoded_len(),
            Value::BmpString(ref value) => value.encoded_len(),
            Value::Ia5String(ref value) => value.encoded_len(),
            Value::UtcTime(ref value) => value.encoded_len(),
            Value::GeneralizedTime(ref value) => value.encoded_len(),
            Value::Sequence(ref value) => elements_len(value.iter()),
            Value::Set(ref value) => elements_len(value.iter()),
            Value::Choice(ref choice) => choice.value().content_len(),
            Value::Explicit(ref explicit) => {
                explicit.value().encode().encoded_len()
            }
            Value::Any(ref any) => any.content().len(),
        }
    }

    /// Writes the content octets.
    pub(crate) fn write_content<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        match *self {
            Value::Boolean(value) => value.write_encoded(target),
            Value::Null => ().write_encoded(target),
            Value::Integer(ref value) => value.write_encoded(target),
            Value::OctetString(ref value) => value.write_encoded(target),
            Value::BitString(ref value) => value.write_encoded(target),
            Value::Oid(ref value) => value.write_encoded(target),
            Value::Utf8String(ref value) => value.write_encoded(target),
            Value::PrintableString(ref value) => value.write_encoded(target),
            Value::TeletexString(ref value) => value.write_encoded(target),
            Value::UniversalString(ref value) => value.write_encoded(target),
            Value::BmpString(ref value) => value.write_encoded(target),
            Value::Ia5String(ref value) => value.write_encoded(target),
            Value::UtcTime(ref value) => value.write_encoded(target),
            Value::GeneralizedTime(ref value) => value.write_encoded(target),
            Value::Sequence(ref value) => write_elements(value.iter(), target),
            Value::Set(ref value) => write_elements(value.iter(), target),
            Value::Choice(ref choice) => choice.value().write_content(target),
            Value::Explicit(ref explicit) => {
                explicit.value().encode().write_encoded(target)
            }
            Value::Any(ref any) => target.write_all(any.content()),
        }
    }
}

/// Returns the encoded length of the present elements.
fn elements_len<'a>(iter: impl Iterator<Item = Option<&'a Value>>) -> usize {
    iter.flatten().map(|value| value.encode().encoded_len()).sum()
}

/// Writes the encoding of the present elements.
fn write_elements<'a, W: io::Write>(
    iter: impl Iterator<Item = Option<&'a Value>>,
    target: &mut W
) -> Result<(), io::Error> {
    for value in iter.flatten() {
        value.encode().write_encoded(target)?;
    }
    Ok(())
}


//--- Accessors

macro_rules! accessors {
    ( $( $variant:ident => $method:ident: $ty:ty, )* ) => {
        impl Value {
            $(
                /// Returns a reference to the inner value if it has the
                /// matching type.
                pub fn $method(&self) -> Option<&$ty> {
                    match *self {
                        Value::$variant(ref inner) => Some(inner),
                        _ => None
                    }
                }
            )*
        }
    }
}

accessors! {
    Integer => as_integer: Integer,
    OctetString => as_octet_string: OctetString,
    BitString => as_bit_string: BitString,
    Oid => as_oid: Oid,
    Utf8String => as_utf8_string: Utf8String,
    PrintableString => as_printable_string: PrintableString,
    UtcTime => as_utc_time: UtcTime,
    GeneralizedTime => as_generalized_time: GeneralizedTime,
    Sequence => as_sequence: Sequence,
    Set => as_set: Set,
    Choice => as_choice: Choice,
    Explicit => as_explicit: Explicit,
    Any => as_any: Any,
}

impl Value {
    /// Returns the boolean if this is a BOOLEAN value.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(value) => Some(value),
            _ => None
        }
    }

    /// Returns whether this is a NULL value.
    pub fn is_null(&self) -> bool {
        matches!(*self, Value::Null)
    }
}


//--- From

macro_rules! from_impls {
    ( $( $variant:ident: $ty:ty, )* ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    }
}

from_impls! {
    Boolean: bool,
    Integer: Integer,
    OctetString: OctetString,
    BitString: BitString,
    Oid: Oid,
    Utf8String: Utf8String,
    PrintableString: PrintableString,
    TeletexString: TeletexString,
    UniversalString: UniversalString,
    BmpString: BmpString,
    Ia5String: Ia5String,
    UtcTime: UtcTime,
    GeneralizedTime: GeneralizedTime,
    Sequence: Sequence,
    Set: Set,
    Choice: Choice,
    Explicit: Explicit,
    Any: Any,
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}


//------------ ValueEncoder --------------------------------------------------

/// The value encoder for a [`Value`].
///
/// [`Value`]: enum.Value.html
#[derive(Clone, Copy, Debug)]
pub struct ValueEncoder<'a> {
    tag: Tag,
    value: &'a Value,
}

impl<'a> ValueEncoder<'a> {
    /// Returns the tag the value will be encoded with.
    pub fn tag(&self) -> Tag {
        self.tag
    }
}

impl<'a> Values for ValueEncoder<'a> {
    fn encoded_len(&self) -> usize {
        total_len(self.tag, self.value.content_len())
    }

    fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        write_header(
            target, self.tag, self.value.is_constructed(),
            self.value.content_len()
        )?;
        self.value.write_content(target)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::sequence::SequenceBuilder;

    #[test]
    fn encode_leaves() {
        assert_eq!(Value::Boolean(true).to_vec(), b"\x01\x01\xff");
        assert_eq!(Value::Null.to_vec(), b"\x05\x00");
        assert_eq!(Value::from(Integer::from(128)).to_vec(), b"\x02\x02\x00\x80");
        assert_eq!(
            Value::from(Integer::from(-1)).encode_as(Tag::CTX_1)
                .unwrap().to_vec(),
            b"\x81\x01\xff"
        );
    }

    #[test]
    fn encode_nested() {
        let value = Value::from(
            SequenceBuilder::new()
                .push(Value::Boolean(false))
                .push_opt(None)
                .push(Value::from(Explicit::new(Tag::CTX_0, Value::Null)))
                .finish()
        );
        assert_eq!(value.tag(), Tag::SEQUENCE);
        assert_eq!(
            value.to_vec(),
            b"\x30\x07\x01\x01\x00\xa0\x02\x05\x00"
        );
        assert_eq!(
            value.encode_as(Tag::CTX_3).unwrap().to_vec(),
            b"\xa3\x07\x01\x01\x00\xa0\x02\x05\x00"
        );
    }

    #[test]
    fn encode_choice() {
        let value = Value::from(Choice::new(1, Value::Boolean(true)));
        assert_eq!(value.tag(), Tag::BOOLEAN);
        assert_eq!(value.to_vec(), b"\x01\x01\xff");
        assert_eq!(
            value.encode_as(Tag::CTX_0).unwrap_err(),
            UsageError::ImplicitChoice
        );
        let explicit = Value::from(Explicit::new(Tag::CTX_2, value));
        assert_eq!(explicit.to_vec(), b"\xa2\x03\x01\x01\xff");
    }
}
