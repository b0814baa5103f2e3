//! Templates for decoding values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use crate::any::Any;
use crate::choice::ChoiceTemplate;
use crate::decode::{
    Constructed, Content, DecodeError, IntoSource, Options, Pos
};
use crate::encode::UsageError;
use crate::explicit::ExplicitTemplate;
use crate::int::Integer;
use crate::oid::Oid;
use crate::sequence::{
    take_all_of, Sequence, SequenceTemplate, Set, SetTemplate
};
use crate::string::{
    BitString, BmpString, Ia5String, OctetString, PrintableString,
    TeletexString, UniversalString, Utf8String,
};
use crate::tag::Tag;
use crate::time::{GeneralizedTime, UtcTime};
use crate::value::Value;


//------------ Template ------------------------------------------------------

/// A description of how to decode a value.
///
/// A template mirrors an ASN.1 type definition. Leaf variants decode the
/// built-in types with their natural tag. The constructed variants are
/// composed of further templates, so a template for any schema built from
/// SEQUENCE, SET, their OF forms, CHOICE, EXPLICIT and IMPLICIT tagging,
/// ANY, and OPTIONAL or DEFAULT fields can be assembled once and used for
/// any number of decoding runs.
///
/// Decoding a value produces a [`Value`] of the matching variant.
///
/// [`Value`]: enum.Value.html
#[derive(Clone, Debug)]
pub enum Template {
    Boolean,
    Null,
    Integer,
    OctetString,
    BitString,
    Oid,
    Utf8String,
    PrintableString,
    TeletexString,
    UniversalString,
    BmpString,
    Ia5String,
    UtcTime,
    GeneralizedTime,
    Sequence(SequenceTemplate),
    Set(SetTemplate),
    SequenceOf(Box<Template>),
    SetOf(Box<Template>),
    Choice(ChoiceTemplate),
    Explicit(ExplicitTemplate),
    Implicit(ImplicitTemplate),

    /// Any single value, captured as an [`Any`].
    ///
    /// [`Any`]: struct.Any.html
    Any,
}

impl Template {
    /// Returns a template for a SEQUENCE OF values of `inner`.
    pub fn sequence_of(inner: Template) -> Self {
        Template::SequenceOf(Box::new(inner))
    }

    /// Returns a template for a SET OF values of `inner`.
    pub fn set_of(inner: Template) -> Self {
        Template::SetOf(Box::new(inner))
    }

    /// Converts the template into one for an explicitly tagged value.
    pub fn explicit(self, tag: Tag) -> Self {
        Template::Explicit(ExplicitTemplate::new(tag, self))
    }

    /// Converts the template into one for an implicitly tagged value.
    ///
    /// The value is expected with `tag` instead of its natural tag. This
    /// fails for a CHOICE which doesn’t have a tag to replace.
    pub fn implicit(self, tag: Tag) -> Result<Self, UsageError> {
        match self {
            Template::Choice(_) => Err(UsageError::ImplicitChoice),
            Template::Implicit(inner) => {
                Ok(Template::Implicit(ImplicitTemplate { tag, ..inner }))
            }
            inner => {
                Ok(Template::Implicit(ImplicitTemplate {
                    tag, inner: Box::new(inner)
                }))
            }
        }
    }

    /// Returns the template for the universal tag `tag`.
    ///
    /// Returns `None` if the tag isn’t one of a supported universal type.
    /// The elements of a SEQUENCE or SET are decoded as [`Any`] values.
    ///
    /// [`Any`]: struct.Any.html
    pub fn for_tag(tag: Tag) -> Option<Self> {
        let res = match tag {
            Tag::BOOLEAN => Template::Boolean,
            Tag::NULL => Template::Null,
            Tag::INTEGER => Template::Integer,
            Tag::OCTET_STRING => Template::OctetString,
            Tag::BIT_STRING => Template::BitString,
            Tag::OID => Template::Oid,
            Tag::UTF8_STRING => Template::Utf8String,
            Tag::PRINTABLE_STRING => Template::PrintableString,
            Tag::TELETEX_STRING => Template::TeletexString,
            Tag::UNIVERSAL_STRING => Template::UniversalString,
            Tag::BMP_STRING => Template::BmpString,
            Tag::IA5_STRING => Template::Ia5String,
            Tag::UTC_TIME => Template::UtcTime,
            Tag::GENERALIZED_TIME => Template::GeneralizedTime,
            Tag::SEQUENCE => Template::sequence_of(Template::Any),
            Tag::SET => Template::set_of(Template::Any),
            _ => return None
        };
        log::trace!("template for {}: {:?}", tag, res);
        Some(res)
    }

    /// Returns the tag of values of this template.
    ///
    /// Returns `None` for a CHOICE and ANY which have no tag of their own.
    pub fn tag(&self) -> Option<Tag> {
        Some(match *self {
            Template::Boolean => Tag::BOOLEAN,
            Template::Null => Tag::NULL,
            Template::Integer => Tag::INTEGER,
            Template::OctetString => Tag::OCTET_STRING,
            Template::BitString => Tag::BIT_STRING,
            Template::Oid => Tag::OID,
            Template::Utf8String => Tag::UTF8_STRING,
            Template::PrintableString => Tag::PRINTABLE_STRING,
            Template::TeletexString => Tag::TELETEX_STRING,
            Template::UniversalString => Tag::UNIVERSAL_STRING,
            Template::BmpString => Tag::BMP_STRING,
            Template::Ia5String => Tag::IA5_STRING,
            Template::UtcTime => Tag::UTC_TIME,
            Template::GeneralizedTime => Tag::GENERALIZED_TIME,
            Template::Sequence(_) | Template::SequenceOf(_) => Tag::SEQUENCE,
            Template::Set(_) | Template::SetOf(_) => Tag::SET,
            Template::Explicit(ref inner) => inner.tag(),
            Template::Implicit(ref inner) => inner.tag,
            Template::Choice(_) | Template::Any => return None,
        })
    }

    /// Returns whether a value with the given tag can be decoded.
    pub fn tag_match(&self, tag: Tag) -> bool {
        match *self {
            Template::Choice(ref inner) => inner.tag_match(tag),
            Template::Any => true,
            _ => self.tag() == Some(tag)
        }
    }

    /// Returns a description of the expected value for error messages.
    fn expected(&self) -> Cow<'static, str> {
        match *self {
            Template::Choice(_) => "CHOICE".into(),
            Template::Any => "any value".into(),
            _ => match self.tag() {
                Some(tag) => tag.to_string().into(),
                None => "value".into()
            }
        }
    }
}

/// # Decoding
///
impl Template {
    /// Decodes a complete encoded value.
    ///
    /// The data must contain exactly one value matching the template.
    pub fn decode(
        &self, source: impl IntoSource, options: impl Into<Options>
    ) -> Result<Value, DecodeError> {
        options.into().decode(source, |cons| self.take_from(cons))
    }

    /// Decodes a complete encoded value with an implicit tag.
    ///
    /// This is the same as decoding with `self.implicit(tag)` but doesn’t
    /// need to create a new template.
    pub fn decode_as(
        &self,
        tag: Tag,
        source: impl IntoSource,
        options: impl Into<Options>
    ) -> Result<Value, DecodeError> {
        if let Template::Choice(_) = *self {
            xerr!(return Err(DecodeError::unsupported(
                "implicitly tagged CHOICE", Pos::default()
            )))
        }
        options.into().decode(source, |cons| {
            cons.take_value_if(tag, |content| self.from_content(tag, content))
        })
    }

    /// Takes a value matching the template from a constructed value.
    pub fn take_from(
        &self, cons: &mut Constructed
    ) -> Result<Value, DecodeError> {
        match self.take_opt_from(cons)? {
            Some(value) => Ok(value),
            None => xerr!(Err(self.missing(cons)))
        }
    }

    /// Takes a value if the next value matches the template.
    ///
    /// Returns `Ok(None)` if there is no next value or if it has a tag not
    /// matched by the template. This is how OPTIONAL fields are decoded.
    pub fn take_opt_from(
        &self, cons: &mut Constructed
    ) -> Result<Option<Value>, DecodeError> {
        match cons.peek_header()? {
            Some(header) if self.tag_match(header.tag()) => {
                cons.take_value(|tag, content| {
                    self.from_content(tag, content)
                }).map(Some)
            }
            _ => Ok(None)
        }
    }

    /// Decodes the content of a value with the given tag.
    ///
    /// The tag isn’t checked except for selecting the alternative of a
    /// CHOICE and for being stored in an ANY.
    pub fn from_content(
        &self, tag: Tag, content: &mut Content
    ) -> Result<Value, DecodeError> {
        match *self {
            Template::Boolean => {
                content.as_primitive()?.to_bool().map(Value::Boolean)
            }
            Template::Null => {
                content.as_primitive()?.to_null().map(|_| Value::Null)
            }
            Template::Integer => {
                Integer::from_content(content).map(Value::Integer)
            }
            Template::OctetString => {
                OctetString::from_content(content).map(Value::OctetString)
            }
            Template::BitString => {
                BitString::from_content(content).map(Value::BitString)
            }
            Template::Oid => Oid::from_content(content).map(Value::Oid),
            Template::Utf8String => {
                Utf8String::from_content(content).map(Value::Utf8String)
            }
            Template::PrintableString => {
                PrintableString::from_content(content)
                    .map(Value::PrintableString)
            }
            Template::TeletexString => {
                TeletexString::from_content(content).map(Value::TeletexString)
            }
            Template::UniversalString => {
                UniversalString::from_content(content)
                    .map(Value::UniversalString)
            }
            Template::BmpString => {
                BmpString::from_content(content).map(Value::BmpString)
            }
            Template::Ia5String => {
                Ia5String::from_content(content).map(Value::Ia5String)
            }
            Template::UtcTime => {
                UtcTime::from_content(content).map(Value::UtcTime)
            }
            Template::GeneralizedTime => {
                GeneralizedTime::from_content(content)
                    .map(Value::GeneralizedTime)
            }
            Template::Sequence(ref inner) => {
                content.as_constructed().and_then(|cons| {
                    inner.from_constructed(cons)
                }).map(Value::Sequence).map_err(|err| err.context("SEQUENCE"))
            }
            Template::Set(ref inner) => {
                content.as_constructed().and_then(|cons| {
                    inner.from_constructed(cons)
                }).map(Value::Set).map_err(|err| err.context("SET"))
            }
            Template::SequenceOf(ref inner) => {
                content.as_constructed().and_then(|cons| {
                    take_all_of(inner, cons)
                }).map(|elements| {
                    Value::Sequence(Sequence::new(elements))
                }).map_err(|err| err.context("SEQUENCE OF"))
            }
            Template::SetOf(ref inner) => {
                content.as_constructed().and_then(|cons| {
                    take_all_of(inner, cons)
                }).map(|elements| {
                    Value::Set(Set::new(elements))
                }).map_err(|err| err.context("SET OF"))
            }
            Template::Choice(ref inner) => {
                inner.from_content(tag, content).map(Value::Choice)
            }
            Template::Explicit(ref inner) => {
                inner.from_content(content).map(Value::Explicit)
            }
            Template::Implicit(ref inner) => {
                inner.inner.from_content(tag, content)
            }
            Template::Any => Any::from_content(tag, content).map(Value::Any),
        }
    }

    /// Returns the error for a value missing from `cons`.
    pub(crate) fn missing(&self, cons: &Constructed) -> DecodeError {
        match cons.peek_header() {
            Ok(Some(header)) => {
                cons.content_err(format!(
                    "expected {}, found {}", self.expected(), header.tag()
                ))
            }
            Ok(None) => {
                cons.content_err(format!("missing {}", self.expected()))
            }
            Err(err) => err,
        }
    }
}


//------------ ImplicitTemplate ----------------------------------------------

/// A template for an implicitly tagged value.
///
/// Values of this template are created via [`Template::implicit`].
///
/// [`Template::implicit`]: enum.Template.html#method.implicit
#[derive(Clone, Debug)]
pub struct ImplicitTemplate {
    tag: Tag,
    inner: Box<Template>,
}

impl ImplicitTemplate {
    /// Returns the tag replacing the natural tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the template for the content.
    pub fn inner(&self) -> &Template {
        &self.inner
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::choice::Choice;
    use crate::decode::ErrorKind;
    use crate::encode::Values;
    use crate::explicit::Explicit;
    use crate::mode::Mode;
    use crate::sequence::SequenceBuilder;

    fn everything_template() -> Template {
        Template::Sequence(
            SequenceTemplate::new()
                .required(Template::Boolean)
                .required(Template::Null)
                .required(Template::Integer)
                .required(Template::OctetString)
                .required(Template::BitString)
                .required(Template::Oid)
                .required(Template::Utf8String)
                .required(Template::PrintableString)
                .required(Template::TeletexString)
                .required(Template::UniversalString)
                .required(Template::BmpString)
                .required(Template::Ia5String)
                .required(Template::UtcTime)
                .required(Template::GeneralizedTime)
                .required(Template::set_of(Template::Integer))
                .required(Template::Integer.explicit(Tag::CTX_0))
                .required(Template::Choice(
                    ChoiceTemplate::new()
                        .alternative(Template::Null)
                        .alternative(Template::Integer)
                ))
                .optional(Template::OctetString.implicit(Tag::CTX_1).unwrap())
                .optional(Template::Boolean.implicit(Tag::CTX_2).unwrap())
                .required(Template::Any)
        )
    }

    fn everything_value() -> Value {
        let time = Utc.timestamp_opt(1_500_000_000, 0).unwrap();
        Value::from(
            SequenceBuilder::new()
                .push(true)
                .push(())
                .push(Integer::from(-43568))
                .push(OctetString::from(&b"\x00\x01\x02"[..]))
                .push(BitString::from_flags(vec![true, false, true]))
                .push("1.2.840.113549".parse::<Oid>().unwrap())
                .push(Utf8String::new("Z\u{fc}rich").unwrap())
                .push(PrintableString::new("Test CA").unwrap())
                .push(TeletexString::new("caf\u{e9}").unwrap())
                .push(UniversalString::new("\u{1f600}").unwrap())
                .push(BmpString::new("\u{3042}").unwrap())
                .push(Ia5String::new("a@example.com").unwrap())
                .push(UtcTime::new(time).unwrap())
                .push(GeneralizedTime::new(time).unwrap())
                .push(Set::from(vec![
                    Value::from(Integer::from(2)), Value::from(Integer::from(1))
                ]))
                .push(Explicit::new(Tag::CTX_0, Integer::from(128)))
                .push(Choice::new(1, Integer::from(7)))
                .push(Value::Any(Any::new(
                    Tag::CTX_1, false, bytes::Bytes::from_static(b"ab")
                )))
                .push_opt(None)
                .push(Any::new(
                    Tag::OID, false, bytes::Bytes::from_static(b"\x2a\x03")
                ))
                .finish()
        )
    }

    #[test]
    fn round_trip() {
        let value = everything_value();
        let encoded = value.to_vec();
        assert_eq!(value.encode().encoded_len(), encoded.len());

        let decoded = everything_template().decode(
            encoded.as_slice(), Mode::Der
        ).unwrap();
        assert_eq!(decoded.to_vec(), encoded);

        let seq = decoded.as_sequence().unwrap();
        assert_eq!(seq.len(), 20);
        assert_eq!(seq.get(2), Some(&Value::Integer(Integer::from(-43568))));
        assert_eq!(
            seq.get(17),
            Some(&Value::OctetString(OctetString::from(&b"ab"[..])))
        );
        assert_eq!(seq.get(18), None);
        assert_eq!(
            seq.get(16).unwrap().as_choice().unwrap().index(), 1
        );

        // The original has an ANY in place of the implicitly tagged
        // OCTET STRING. Everything else decodes to the same values.
        let original = value.as_sequence().unwrap();
        for index in (0..17).chain(18..20) {
            assert_eq!(seq.get(index), original.get(index), "{}", index);
        }
    }

    #[test]
    fn truncation() {
        let encoded = everything_value().to_vec();
        let template = everything_template();
        for len in 0..encoded.len() {
            assert!(
                template.decode(&encoded[..len], Mode::Ber).is_err(),
                "{}", len
            );
        }
        assert_eq!(
            template.decode(&encoded[..encoded.len() - 1], Mode::Ber)
                .unwrap_err().kind(),
            ErrorKind::EndOfStream
        );
    }

    #[test]
    fn indefinite_equals_definite() {
        let template = Template::Sequence(
            SequenceTemplate::new()
                .required(Template::Integer)
                .required(Template::sequence_of(Template::Null))
        );
        let definite = template.decode(
            b"\x30\x09\x02\x01\x01\x30\x04\x05\x00\x05\x00", Mode::Der
        ).unwrap();
        let indefinite = template.decode(
            b"\x30\x80\x02\x01\x01\x30\x80\x05\x00\x05\x00\0\0\0\0",
            Mode::Ber
        ).unwrap();
        assert_eq!(definite, indefinite);
        assert_eq!(
            indefinite.to_vec(),
            b"\x30\x09\x02\x01\x01\x30\x04\x05\x00\x05\x00"
        );
        assert!(template.decode(
            b"\x30\x80\x02\x01\x01\x30\x80\x05\x00\x05\x00\0\0\0\0",
            Mode::Der
        ).is_err());
    }

    #[test]
    fn optional_lookahead() {
        let template = Template::Sequence(
            SequenceTemplate::new()
                .optional(Template::Integer)
                .optional(Template::Boolean)
                .optional(Template::Null)
                .required(Template::OctetString)
        );
        let value = template.decode(
            b"\x30\x05\x01\x01\xff\x04\x00", Mode::Der
        ).unwrap();
        let seq = value.as_sequence().unwrap();
        assert_eq!(seq.get(0), None);
        assert_eq!(seq.get(1), Some(&Value::Boolean(true)));
        assert_eq!(seq.get(2), None);
        assert!(seq.element(3).unwrap().as_octet_string().unwrap().is_empty());
        assert_eq!(value.to_vec(), b"\x30\x05\x01\x01\xff\x04\x00");
    }

    #[test]
    fn empty_sequence_of() {
        let value = Template::sequence_of(Template::Integer)
            .decode(b"\x30\x00", Mode::Der).unwrap();
        assert!(value.as_sequence().unwrap().is_empty());
        let value = Template::set_of(Template::Integer)
            .decode(b"\x31\x80\0\0", Mode::Ber).unwrap();
        assert!(value.as_set().unwrap().is_empty());
    }

    #[test]
    fn breadcrumbs() {
        let template = Template::Sequence(
            SequenceTemplate::new()
                .required(Template::Integer)
                .required(Template::Sequence(
                    SequenceTemplate::new().required(Template::Boolean)
                ))
        );
        let err = template.decode(
            b"\x30\x08\x02\x01\x01\x30\x03\x02\x01\x00", Mode::Ber
        ).unwrap_err();
        assert_eq!(
            err.to_string(),
            "SEQUENCE >> element 1 >> SEQUENCE >> element 0 >> \
             expected BOOLEAN, found INTEGER (at octet 7)"
        );
    }

    #[test]
    fn implicit_tags() {
        assert_eq!(
            Template::Choice(ChoiceTemplate::new()).implicit(Tag::CTX_0)
                .unwrap_err(),
            UsageError::ImplicitChoice
        );
        let template = Template::sequence_of(Template::Integer)
            .implicit(Tag::CTX_3).unwrap()
            .implicit(Tag::CTX_1).unwrap();
        assert!(template.tag_match(Tag::CTX_1));
        assert!(!template.tag_match(Tag::CTX_3));
        let value = template.decode(b"\xa1\x03\x02\x01\x05", Mode::Der)
            .unwrap();
        assert_eq!(value.as_sequence().unwrap().len(), 1);

        let value = Template::Integer.decode_as(
            Tag::CTX_0, b"\x80\x01\x05", Mode::Der
        ).unwrap();
        assert_eq!(value, Value::Integer(Integer::from(5)));
        assert!(Template::Choice(ChoiceTemplate::new()).decode_as(
            Tag::CTX_0, b"\x80\x01\x05", Mode::Der
        ).is_err());
    }

    #[test]
    fn deep_nesting() {
        let mut data = b"\x30\x80".repeat(10_000);
        data.extend_from_slice(&b"\0\0".repeat(10_000));
        let err = Template::Any.decode(data.clone(), Mode::Ber).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        let nested = Template::sequence_of(
            Template::sequence_of(Template::Null)
        );
        let err = nested.decode(
            data, crate::decode::Options::from(Mode::Ber).with_max_depth(1)
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(nested.decode(
            b"\x30\x04\x30\x02\x05\x00",
            crate::decode::Options::from(Mode::Ber).with_max_depth(2)
        ).is_ok());
    }

    #[test]
    fn algorithm_identifier() {
        // AlgorithmIdentifier ::= SEQUENCE {
        //     algorithm  OBJECT IDENTIFIER,
        //     parameters ANY OPTIONAL }
        let template = Template::Sequence(
            SequenceTemplate::new()
                .required(Template::Oid)
                .optional(Template::Any)
        );
        let data = b"\x30\x0d\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x01\x0b\
                     \x05\x00";
        let value = template.decode(data, Mode::Der).unwrap();
        let seq = value.as_sequence().unwrap();
        assert_eq!(
            seq.get(0).unwrap().as_oid().unwrap().to_string(),
            "1.2.840.113549.1.1.11"
        );
        assert!(seq.get(1).unwrap().as_any().unwrap().to_value(Mode::Der)
            .unwrap().is_null());
        assert_eq!(value.to_vec(), data);
    }
}
