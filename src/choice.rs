//! CHOICE values and their template.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::{Content, DecodeError};
use crate::tag::Tag;
use crate::template::Template;
use crate::value::Value;


//------------ Choice --------------------------------------------------------

/// A value of a CHOICE type.
///
/// The value remembers which of the alternatives was selected together
/// with the value of that alternative. It has no tag of its own and is
/// always encoded as the value of the alternative.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Choice {
    index: usize,
    value: Box<Value>,
}

impl Choice {
    /// Creates a new value for the alternative with the given index.
    pub fn new(index: usize, value: impl Into<Value>) -> Self {
        Choice { index, value: Box::new(value.into()) }
    }

    /// Returns the index of the selected alternative.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the value of the selected alternative.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Converts the choice into the value of the selected alternative.
    pub fn into_value(self) -> Value {
        *self.value
    }
}


//------------ ChoiceTemplate ------------------------------------------------

/// A template for a CHOICE type.
///
/// The template consists of the templates of all alternatives in order.
/// When decoding, the first alternative whose template matches the tag of
/// the next value is selected.
#[derive(Clone, Debug, Default)]
pub struct ChoiceTemplate {
    alternatives: Vec<Template>,
}

impl ChoiceTemplate {
    /// Creates a template without any alternatives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alternative.
    pub fn alternative(mut self, template: Template) -> Self {
        self.alternatives.push(template);
        self
    }

    /// Returns the templates of the alternatives.
    pub fn alternatives(&self) -> &[Template] {
        &self.alternatives
    }

    /// Returns whether any of the alternatives matches `tag`.
    pub fn tag_match(&self, tag: Tag) -> bool {
        self.alternatives.iter().any(|alt| alt.tag_match(tag))
    }

    /// Decodes the content of a value as the alternative matching `tag`.
    pub(crate) fn from_content(
        &self, tag: Tag, content: &mut Content
    ) -> Result<Choice, DecodeError> {
        let index = match self.alternatives.iter().position(|alt| {
            alt.tag_match(tag)
        }) {
            Some(index) => index,
            None => {
                xerr!(return Err(content.content_err(
                    format!("no CHOICE alternative for {}", tag)
                )))
            }
        };
        log::trace!("selected CHOICE alternative {} for {}", index, tag);
        let value = self.alternatives[index].from_content(tag, content)
            .map_err(|err| {
                err.context(format!("CHOICE alternative {}", index))
            })?;
        Ok(Choice { index, value: Box::new(value) })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::explicit::ExplicitTemplate;
    use crate::int::Integer;
    use crate::mode::Mode;

    fn template() -> Template {
        Template::Choice(
            ChoiceTemplate::new()
                .alternative(Template::Integer)
                .alternative(Template::Null)
                .alternative(Template::Explicit(
                    ExplicitTemplate::new(Tag::CTX_0, Template::Boolean)
                ))
        )
    }

    #[test]
    fn dispatch() {
        let template = template();
        assert!(template.tag_match(Tag::INTEGER));
        assert!(template.tag_match(Tag::CTX_0));
        assert!(!template.tag_match(Tag::BOOLEAN));

        let value = template.decode(b"\x05\x00", Mode::Ber).unwrap();
        let choice = value.as_choice().unwrap();
        assert_eq!(choice.index(), 1);
        assert_eq!(choice.value(), &Value::Null);

        let value = template.decode(b"\xa0\x03\x01\x01\xff", Mode::Der)
            .unwrap();
        assert_eq!(value.as_choice().unwrap().index(), 2);
        assert_eq!(value.to_vec(), b"\xa0\x03\x01\x01\xff");

        let value = template.decode(b"\x02\x01\x2a", Mode::Der).unwrap();
        assert_eq!(
            value.as_choice().unwrap().value(),
            &Value::Integer(Integer::from(42))
        );
    }

    #[test]
    fn no_alternative() {
        let err = template().decode(b"\x01\x01\x00", Mode::Ber).unwrap_err();
        assert_eq!(err.message(), "expected CHOICE, found BOOLEAN");

        let err = template().decode(b"\xa0\x03\x02\x01\x00", Mode::Ber)
            .unwrap_err();
        assert_eq!(
            err.frames().collect::<Vec<_>>(),
            ["CHOICE alternative 2", "EXPLICIT [0]"]
        );
    }
}
