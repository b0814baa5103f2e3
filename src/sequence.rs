//! SEQUENCE and SET values and their templates.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::slice;
use crate::decode::{Constructed, DecodeError, FieldNotPresent};
use crate::encode::UsageError;
use crate::template::Template;
use crate::value::Value;


//------------ Sequence and Set ----------------------------------------------

/// Defines a value type holding an ordered list of optional elements plus
/// its builder.
macro_rules! elements_type {
    ( $name:ident, $builder:ident, $asn:literal ) => {
        #[doc = concat!("A decoded or assembled ", $asn, " value.")]
        ///
        /// The value holds one slot per element. A slot is empty if the
        /// element is an absent OPTIONAL field. Empty slots are not
        /// encoded.
        #[derive(Clone, Debug, Default, Eq, PartialEq)]
        pub struct $name {
            elements: Vec<Option<Value>>,
        }

        impl $name {
            /// Creates a value from a list of elements.
            pub fn new(elements: Vec<Option<Value>>) -> Self {
                $name { elements }
            }

            #[doc = concat!("Returns a builder for a ", $asn, " value.")]
            pub fn builder() -> $builder {
                $builder::new()
            }

            /// Returns the number of element slots.
            pub fn len(&self) -> usize {
                self.elements.len()
            }

            /// Returns whether there are no element slots at all.
            pub fn is_empty(&self) -> bool {
                self.elements.is_empty()
            }

            /// Returns the element at index `index` if it is present.
            pub fn get(&self, index: usize) -> Option<&Value> {
                self.elements.get(index).and_then(Option::as_ref)
            }

            /// Returns the element at index `index`.
            ///
            /// Returns an error if the slot is empty or doesn’t exist.
            pub fn element(
                &self, index: usize
            ) -> Result<&Value, FieldNotPresent> {
                self.get(index).ok_or_else(|| FieldNotPresent::new(index))
            }

            /// Returns an iterator over all element slots.
            pub fn iter(&self) -> Iter {
                Iter(self.elements.iter())
            }

            /// Returns an iterator over the present elements.
            pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
                self.elements.iter().flatten()
            }

            /// Converts the value into its element slots.
            pub fn into_elements(self) -> Vec<Option<Value>> {
                self.elements
            }
        }

        impl From<Vec<Value>> for $name {
            fn from(elements: Vec<Value>) -> Self {
                $name { elements: elements.into_iter().map(Some).collect() }
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = Option<&'a Value>;
            type IntoIter = Iter<'a>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        #[doc = concat!("A builder for a ", $asn, " value.")]
        ///
        /// Elements are added in order. Once complete, the builder is
        /// turned into an immutable value via `finish`.
        #[derive(Clone, Debug, Default)]
        pub struct $builder {
            elements: Vec<Option<Value>>,
        }

        impl $builder {
            /// Creates a new, empty builder.
            pub fn new() -> Self {
                Self::default()
            }

            /// Appends an element.
            pub fn push(mut self, value: impl Into<Value>) -> Self {
                self.elements.push(Some(value.into()));
                self
            }

            /// Appends an optional element.
            ///
            /// A `None` creates an empty slot.
            pub fn push_opt(mut self, value: Option<Value>) -> Self {
                self.elements.push(value);
                self
            }

            /// Returns the number of element slots added so far.
            pub fn len(&self) -> usize {
                self.elements.len()
            }

            /// Returns whether no element slots were added yet.
            pub fn is_empty(&self) -> bool {
                self.elements.is_empty()
            }

            /// Finishes building.
            pub fn finish(self) -> $name {
                $name { elements: self.elements }
            }
        }
    }
}

elements_type!(Sequence, SequenceBuilder, "SEQUENCE");
elements_type!(Set, SetBuilder, "SET");

impl SetBuilder {
    /// Finishes building a SET that must have at least one element.
    pub fn finish_non_empty(self) -> Result<Set, UsageError> {
        if self.elements.iter().all(Option::is_none) {
            return Err(UsageError::EmptySet)
        }
        Ok(self.finish())
    }
}


//------------ Iter ----------------------------------------------------------

/// An iterator over the element slots of a SEQUENCE or SET.
#[derive(Clone, Debug)]
pub struct Iter<'a>(slice::Iter<'a, Option<Value>>);

impl<'a> Iterator for Iter<'a> {
    type Item = Option<&'a Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}


//------------ Field ---------------------------------------------------------

/// A field of a SEQUENCE or SET template.
#[derive(Clone, Debug)]
pub struct Field {
    template: Template,
    presence: Presence,
}

impl Field {
    /// Returns the template for the field.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Returns whether the field may be absent.
    pub fn is_optional(&self) -> bool {
        !matches!(self.presence, Presence::Required)
    }

    /// Returns the value to use if the field is absent.
    ///
    /// Returns an error for a required field.
    fn absent(&self) -> Result<Option<Value>, ()> {
        match self.presence {
            Presence::Required => Err(()),
            Presence::Optional => Ok(None),
            Presence::Default(ref value) => Ok(Some(value.clone())),
        }
    }
}

#[derive(Clone, Debug)]
enum Presence {
    Required,
    Optional,
    Default(Value),
}


//------------ Fields --------------------------------------------------------

/// Defines a template type for a list of fields.
macro_rules! fields_template {
    ( $name:ident, $asn:literal ) => {
        #[doc = concat!("A template for a ", $asn, " of known fields.")]
        ///
        /// The template is built by adding the fields in declaration
        /// order. Fields can be required, optional, or have a default
        /// that is used when the field is absent.
        #[derive(Clone, Debug, Default)]
        pub struct $name {
            fields: Vec<Field>,
        }

        impl $name {
            /// Creates a new template without any fields.
            pub fn new() -> Self {
                Self::default()
            }

            /// Adds a required field.
            pub fn required(self, template: Template) -> Self {
                self.field(template, Presence::Required)
            }

            /// Adds an optional field.
            pub fn optional(self, template: Template) -> Self {
                self.field(template, Presence::Optional)
            }

            /// Adds a field with a default value.
            pub fn with_default(
                self, template: Template, default: impl Into<Value>
            ) -> Self {
                self.field(template, Presence::Default(default.into()))
            }

            fn field(mut self, template: Template, presence: Presence) -> Self {
                self.fields.push(Field { template, presence });
                self
            }

            /// Returns the fields of the template.
            pub fn fields(&self) -> &[Field] {
                &self.fields
            }
        }
    }
}

fields_template!(SequenceTemplate, "SEQUENCE");
fields_template!(SetTemplate, "SET");

impl SequenceTemplate {
    /// Decodes the content of a SEQUENCE.
    ///
    /// Each field is tried in order. An absent optional field results in
    /// an empty slot or its default.
    pub(crate) fn from_constructed(
        &self, cons: &mut Constructed
    ) -> Result<Sequence, DecodeError> {
        let mut elements = Vec::with_capacity(self.fields.len());
        for (index, field) in self.fields.iter().enumerate() {
            let value = field.template.take_opt_from(cons).map_err(|err| {
                err.context(format!("element {}", index))
            })?;
            let value = match value {
                Some(value) => Some(value),
                None => match field.absent() {
                    Ok(value) => value,
                    Err(()) => {
                        xerr!(return Err(
                            field.template.missing(cons)
                                .context(format!("element {}", index))
                        ))
                    }
                }
            };
            elements.push(value);
        }
        Ok(Sequence::new(elements))
    }
}

impl SetTemplate {
    /// Decodes the content of a SET.
    ///
    /// The elements may appear in any order. Each element is assigned to
    /// the first field not yet present whose template matches its tag.
    pub(crate) fn from_constructed(
        &self, cons: &mut Constructed
    ) -> Result<Set, DecodeError> {
        let mut elements: Vec<Option<Value>> = vec![None; self.fields.len()];
        while let Some(header) = cons.peek_header()? {
            let tag = header.tag();
            let index = self.fields.iter().enumerate().position(|(i, field)| {
                elements[i].is_none() && field.template.tag_match(tag)
            });
            let index = match index {
                Some(index) => index,
                None => {
                    xerr!(return Err(cons.content_err(
                        format!("unexpected {} in SET", tag)
                    )))
                }
            };
            let value = self.fields[index].template.take_from(cons).map_err(
                |err| err.context(format!("element {}", index))
            )?;
            elements[index] = Some(value);
        }
        for (index, field) in self.fields.iter().enumerate() {
            if elements[index].is_some() {
                continue
            }
            match field.absent() {
                Ok(value) => elements[index] = value,
                Err(()) => {
                    xerr!(return Err(cons.content_err(
                        format!("missing element {} in SET", index)
                    )))
                }
            }
        }
        Ok(Set::new(elements))
    }
}


//------------ OF templates --------------------------------------------------

/// Decodes the content of a SEQUENCE OF or SET OF.
///
/// All remaining values are decoded with `template`. No values result in
/// an empty list.
pub(crate) fn take_all_of(
    template: &Template, cons: &mut Constructed
) -> Result<Vec<Option<Value>>, DecodeError> {
    let mut elements = Vec::new();
    while cons.peek_header()?.is_some() {
        let index = elements.len();
        let value = template.take_from(cons).map_err(|err| {
            err.context(format!("element {}", index))
        })?;
        elements.push(Some(value));
    }
    Ok(elements)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::int::Integer;
    use crate::mode::Mode;

    #[test]
    fn accessors() {
        let seq = Sequence::builder()
            .push(true)
            .push_opt(None)
            .push(Integer::from(5))
            .finish();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0), Some(&Value::Boolean(true)));
        assert_eq!(seq.get(1), None);
        assert_eq!(seq.element(1), Err(FieldNotPresent::new(1)));
        assert_eq!(seq.element(7), Err(FieldNotPresent::new(7)));
        assert_eq!(seq.values().count(), 2);
        assert_eq!(seq.iter().filter(Option::is_none).count(), 1);
    }

    #[test]
    fn empty_set() {
        assert_eq!(
            SetBuilder::new().push_opt(None).finish_non_empty(),
            Err(UsageError::EmptySet)
        );
        assert!(SetBuilder::new().finish().is_empty());
        assert!(SetBuilder::new().push(()).finish_non_empty().is_ok());
    }

    #[test]
    fn sequence_fields() {
        let template = SequenceTemplate::new()
            .required(Template::Integer)
            .with_default(Template::Boolean, false)
            .optional(Template::Null)
            .required(Template::OctetString);

        let seq = Mode::Der.decode(
            b"\x02\x01\x07\x05\x00\x04\x01x",
            |cons| template.from_constructed(cons)
        ).unwrap();
        assert_eq!(seq.get(0), Some(&Value::Integer(Integer::from(7))));
        assert_eq!(seq.get(1), Some(&Value::Boolean(false)));
        assert_eq!(seq.get(2), Some(&Value::Null));
        assert_eq!(seq.len(), 4);

        let seq = Mode::Der.decode(
            b"\x02\x01\x07\x01\x01\xff\x04\x00",
            |cons| template.from_constructed(cons)
        ).unwrap();
        assert_eq!(seq.get(1), Some(&Value::Boolean(true)));
        assert_eq!(seq.get(2), None);

        let err = Mode::Der.decode(
            b"\x02\x01\x07\x05\x00",
            |cons| template.from_constructed(cons)
        ).unwrap_err();
        assert_eq!(err.frames().collect::<Vec<_>>(), ["element 3"]);
    }

    #[test]
    fn set_fields() {
        let template = SetTemplate::new()
            .required(Template::Integer)
            .optional(Template::Boolean)
            .with_default(Template::Null, ());

        let set = Mode::Ber.decode(
            b"\x01\x01\xff\x02\x01\x03",
            |cons| template.from_constructed(cons)
        ).unwrap();
        assert_eq!(set.get(0), Some(&Value::Integer(Integer::from(3))));
        assert_eq!(set.get(1), Some(&Value::Boolean(true)));
        assert_eq!(set.get(2), Some(&Value::Null));

        // The same field twice.
        assert!(Mode::Ber.decode(
            b"\x02\x01\x03\x02\x01\x03",
            |cons| template.from_constructed(cons)
        ).is_err());

        // Missing required field.
        assert_eq!(
            Mode::Ber.decode(
                b"\x01\x01\xff",
                |cons| template.from_constructed(cons)
            ).unwrap_err().message(),
            "missing element 0 in SET"
        );
    }

    #[test]
    fn take_all_of_empty() {
        let res = Mode::Ber.decode(b"", |cons| {
            take_all_of(&Template::Integer, cons)
        }).unwrap();
        assert!(res.is_empty());
        let res = Mode::Ber.decode(b"\x02\x01\x01\x02\x01\x02", |cons| {
            take_all_of(&Template::Integer, cons)
        }).unwrap();
        assert_eq!(res.len(), 2);
        assert!(Mode::Ber.decode(b"\x02\x01\x01\x05\x00", |cons| {
            take_all_of(&Template::Integer, cons)
        }).is_err());
    }
}
