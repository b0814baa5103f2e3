//! Values of an unknown type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, io};
use bytes::Bytes;
use crate::decode::{
    Constructed, Content, DecodeError, Options, Pos
};
use crate::encode::{total_len, write_header, write_vec, Values};
use crate::tag::Tag;
use crate::template::Template;
use crate::value::Value;


//------------ Any -----------------------------------------------------------

/// A value whose type isn’t known yet.
///
/// The value keeps the tag, the form, and the raw content octets of the
/// value. Once the actual type is known, the value can be decoded via
/// [`decode_with`]. For values with a universal tag, [`to_value`] picks
/// the template itself.
///
/// If the value was encoded with indefinite length, the content is kept
/// without the end-of-contents marker and the value will be encoded with
/// definite length.
///
/// [`decode_with`]: #method.decode_with
/// [`to_value`]: #method.to_value
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Any {
    tag: Tag,
    constructed: bool,
    content: Bytes,
}

impl Any {
    /// Creates a new value from its parts.
    ///
    /// The content is not checked. If `constructed` is `true`, it should
    /// consist of correctly encoded values.
    pub fn new(tag: Tag, constructed: bool, content: Bytes) -> Self {
        Any { tag, constructed, content }
    }

    /// Creates a new value from the encoding of a value.
    pub fn from_value(value: &Value) -> Self {
        let content = write_vec(0, |target| value.write_content(target));
        Any::new(value.tag(), value.is_constructed(), content.into())
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns the content octets.
    pub fn content(&self) -> &[u8] {
        self.content.as_ref()
    }

    /// Returns a bytes value with the content octets.
    pub fn content_bytes(&self) -> Bytes {
        self.content.clone()
    }

    /// Returns a value encoder using the original tag.
    pub fn encode(&self) -> AnyEncoder {
        self.encode_as(self.tag)
    }

    /// Returns a value encoder using a different tag.
    pub fn encode_as(&self, tag: Tag) -> AnyEncoder {
        AnyEncoder { tag, any: self }
    }

    /// Decodes the value with the given template.
    ///
    /// The template has to match the tag of the value. If you need to
    /// decode an implicitly tagged value, use [`Template::implicit`] to
    /// create a matching template.
    ///
    /// [`Template::implicit`]: enum.Template.html#method.implicit
    pub fn decode_with(
        &self, template: &Template, options: impl Into<Options>
    ) -> Result<Value, DecodeError> {
        log::trace!("decoding ANY value with tag {}", self.tag);
        options.into().decode(self.encode().to_vec(), |cons| {
            template.take_from(cons)
        }).map_err(|err| {
            DecodeError::malformed(
                format!("cannot decode ANY value with tag {}", self.tag),
                Pos::default()
            ).with_cause(err)
        })
    }

    /// Decodes the value based on its tag.
    ///
    /// This only works for values with the universal tag of one of the
    /// supported types. A SEQUENCE or SET is decoded into a list of ANY
    /// values.
    pub fn to_value(
        &self, options: impl Into<Options>
    ) -> Result<Value, DecodeError> {
        match Template::for_tag(self.tag) {
            Some(template) => self.decode_with(&template, options),
            None => {
                xerr!(Err(DecodeError::unsupported(
                    format!("no template for {}", self.tag), Pos::default()
                )))
            }
        }
    }
}

/// # Decoding
///
impl Any {
    /// Takes the next value from a constructed value.
    pub fn take_from(cons: &mut Constructed) -> Result<Self, DecodeError> {
        cons.take_value(Self::from_content)
    }

    /// Takes the next value if there is one.
    pub fn take_opt_from(
        cons: &mut Constructed
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_value(Self::from_content)
    }

    /// Captures the content of a value with the given tag.
    pub fn from_content(
        tag: Tag, content: &mut Content
    ) -> Result<Self, DecodeError> {
        match content {
            Content::Primitive(inner) => {
                Ok(Any::new(tag, false, inner.take_all()?))
            }
            Content::Constructed(inner) => {
                Ok(Any::new(tag, true, inner.capture_all()?))
            }
        }
    }
}


//--- Debug

impl fmt::Debug for Any {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "Any({}, {}, ",
            self.tag,
            if self.constructed { "constructed" } else { "primitive" }
        )?;
        for octet in self.content.iter() {
            write!(f, "{:02x}", octet)?;
        }
        write!(f, ")")
    }
}


//------------ AnyEncoder ----------------------------------------------------

/// The value encoder for an [`Any`] value.
///
/// [`Any`]: struct.Any.html
#[derive(Clone, Copy, Debug)]
pub struct AnyEncoder<'a> {
    tag: Tag,
    any: &'a Any,
}

impl<'a> Values for AnyEncoder<'a> {
    fn encoded_len(&self) -> usize {
        total_len(self.tag, self.any.content.len())
    }

    fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        write_header(
            target, self.tag, self.any.constructed, self.any.content.len()
        )?;
        target.write_all(self.any.content.as_ref())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::int::Integer;
    use crate::mode::Mode;

    #[test]
    fn capture_and_reencode() {
        let any = Mode::Ber.decode(b"\x30\x80\x02\x01\x01\0\0", Any::take_from)
            .unwrap();
        assert_eq!(any.tag(), Tag::SEQUENCE);
        assert!(any.is_constructed());
        assert_eq!(any.content(), b"\x02\x01\x01");
        assert_eq!(any.encode().to_vec(), b"\x30\x03\x02\x01\x01");
        assert_eq!(
            any.encode_as(Tag::CTX_2).to_vec(), b"\xa2\x03\x02\x01\x01"
        );
    }

    #[test]
    fn decode_with() {
        let any = Mode::Der.decode(b"\x82\x01\x05", Any::take_from).unwrap();
        let template = Template::Integer.implicit(Tag::CTX_2).unwrap();
        assert_eq!(
            any.decode_with(&template, Mode::Der).unwrap(),
            Value::Integer(Integer::from(5))
        );
        let err = any.decode_with(&Template::Integer, Mode::Der).unwrap_err();
        assert_eq!(err.cause().unwrap().message(), "expected INTEGER, found [2]");
    }

    #[test]
    fn to_value() {
        let any = Any::new(Tag::INTEGER, false, Bytes::from_static(b"\x80"));
        assert_eq!(
            any.to_value(Mode::Der).unwrap(),
            Value::Integer(Integer::from(-128))
        );

        let any = Mode::Ber.decode(
            b"\x30\x06\x05\x00\x02\x02\x00\x80", Any::take_from
        ).unwrap();
        let value = any.to_value(Mode::Ber).unwrap();
        let seq = value.as_sequence().unwrap();
        assert_eq!(seq.len(), 2);
        let second = seq.get(1).unwrap().as_any().unwrap();
        assert_eq!(
            second.to_value(Mode::Ber).unwrap(),
            Value::Integer(Integer::from(128))
        );
        assert_eq!(value.to_vec(), b"\x30\x06\x05\x00\x02\x02\x00\x80");

        let any = Any::new(Tag::CTX_0, false, Bytes::new());
        assert_eq!(
            any.to_value(Mode::Ber).unwrap_err().kind(),
            crate::decode::ErrorKind::Unsupported
        );
    }

    #[test]
    fn from_value() {
        let value = Value::from(
            crate::sequence::Sequence::builder().push(true).finish()
        );
        let any = Any::from_value(&value);
        assert_eq!(any.tag(), Tag::SEQUENCE);
        assert_eq!(any.content(), b"\x01\x01\xff");
        assert_eq!(Value::from(any).to_vec(), value.to_vec());
    }
}
