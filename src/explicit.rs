//! Explicitly tagged values and their template.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::{Content, DecodeError};
use crate::tag::Tag;
use crate::template::Template;
use crate::value::Value;


//------------ Explicit ------------------------------------------------------

/// An explicitly tagged value.
///
/// The value is encoded as a constructed value with the outer tag whose
/// content is the complete encoding of the inner value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Explicit {
    tag: Tag,
    value: Box<Value>,
}

impl Explicit {
    /// Creates a new explicitly tagged value.
    pub fn new(tag: Tag, value: impl Into<Value>) -> Self {
        Explicit { tag, value: Box::new(value.into()) }
    }

    /// Returns the outer tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the inner value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Converts the explicit value into the inner value.
    pub fn into_value(self) -> Value {
        *self.value
    }
}


//------------ ExplicitTemplate ----------------------------------------------

/// A template for an explicitly tagged value.
#[derive(Clone, Debug)]
pub struct ExplicitTemplate {
    tag: Tag,
    inner: Box<Template>,
}

impl ExplicitTemplate {
    /// Creates a template from the outer tag and the inner template.
    pub fn new(tag: Tag, inner: Template) -> Self {
        ExplicitTemplate { tag, inner: Box::new(inner) }
    }

    /// Returns the outer tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the template of the inner value.
    pub fn inner(&self) -> &Template {
        &self.inner
    }

    /// Decodes the content of the outer value.
    ///
    /// The content has to be exactly one value matching the inner
    /// template. If the outer value has indefinite length, it has to be
    /// terminated by an end-of-contents marker after that value.
    pub(crate) fn from_content(
        &self, content: &mut Content
    ) -> Result<Explicit, DecodeError> {
        let frame = || format!("EXPLICIT {}", self.tag);
        let cons = content.as_constructed().map_err(|err| {
            err.context(frame())
        })?;
        let value = self.inner.take_from(cons).map_err(|err| {
            err.context(frame())
        })?;
        if cons.peek_header().map_err(|err| err.context(frame()))?.is_some() {
            xerr!(return Err(
                cons.content_err("trailing data").context(frame())
            ))
        }
        Ok(Explicit { tag: self.tag, value: Box::new(value) })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;
    use crate::int::Integer;
    use crate::mode::Mode;

    fn template() -> Template {
        Template::Explicit(ExplicitTemplate::new(Tag::CTX_1, Template::Integer))
    }

    #[test]
    fn definite_and_indefinite() {
        let definite = template().decode(b"\xa1\x03\x02\x01\x05", Mode::Der)
            .unwrap();
        let indefinite = template().decode(
            b"\xa1\x80\x02\x01\x05\0\0", Mode::Ber
        ).unwrap();
        assert_eq!(definite, indefinite);
        let explicit = definite.as_explicit().unwrap();
        assert_eq!(explicit.tag(), Tag::CTX_1);
        assert_eq!(explicit.value(), &Value::Integer(Integer::from(5)));
        assert_eq!(indefinite.to_vec(), b"\xa1\x03\x02\x01\x05");
    }

    #[test]
    fn missing_eoc() {
        assert_eq!(
            template().decode(b"\xa1\x80\x02\x01\x05", Mode::Ber)
                .unwrap_err().kind(),
            ErrorKind::EndOfStream
        );
        assert!(
            template().decode(b"\xa1\x80\x02\x01\x05\x02\x01\x06", Mode::Ber)
                .is_err()
        );
    }

    #[test]
    fn malformed() {
        // Primitive outer value.
        assert!(template().decode(b"\x81\x01\x05", Mode::Ber).is_err());

        // Two inner values.
        let err = template().decode(
            b"\xa1\x06\x02\x01\x05\x02\x01\x06", Mode::Ber
        ).unwrap_err();
        assert_eq!(err.message(), "trailing data");
        assert_eq!(err.frames().collect::<Vec<_>>(), ["EXPLICIT [1]"]);
    }
}
