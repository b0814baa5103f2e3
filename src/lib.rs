//! Encoding and decoding of ASN.1 values in BER and DER.
//!
//! This crate translates between trees of typed values and their encoding
//! in the Basic Encoding Rules and their canonical subset, the
//! Distinguished Encoding Rules, as defined in ITU-T X.690.
//!
//! There are two ways to use the crate.
//!
//! The typed way works directly on the types of the individual modules.
//! Each type knows how to take itself from a [`decode::Constructed`] via
//! its `take_from` and `from_content` functions and how to encode itself
//! through the [`encode::Values`] and [`encode::PrimitiveContent`] traits.
//! Custom types are built by composing these in closures:
//!
//! ```
//! use bertree::{Integer, Mode, Oid};
//!
//! let (alg, version) = Mode::Der.decode(
//!     b"\x30\x06\x06\x01\x2a\x02\x01\x03",
//!     |cons| {
//!         cons.take_sequence(|cons| {
//!             Ok((Oid::take_from(cons)?, Integer::take_from(cons)?))
//!         })
//!     }
//! ).unwrap();
//! assert_eq!(alg.to_string(), "1.2");
//! assert_eq!(version.to_u64(), Some(3));
//! ```
//!
//! The dynamic way describes the schema of the data through a [`Template`]
//! which is built once and can then decode any number of values into the
//! closed [`Value`] enum. Values of this enum can be assembled by hand and
//! encoded, too:
//!
//! ```
//! use bertree::{Mode, SequenceTemplate, Tag, Template, Value};
//! use bertree::encode::Values;
//!
//! let template = Template::Sequence(
//!     SequenceTemplate::new()
//!         .required(Template::Oid)
//!         .optional(Template::Integer.explicit(Tag::CTX_0))
//! );
//! let value = template.decode(b"\x30\x03\x06\x01\x2a", Mode::Ber).unwrap();
//! let seq = value.as_sequence().unwrap();
//! assert!(seq.get(1).is_none());
//! assert_eq!(value.encode().to_vec(), b"\x30\x03\x06\x01\x2a");
//! ```
//!
//! Decoding always happens on data that is completely available in memory.
//! Decoding errors are reported through [`decode::DecodeError`] which keeps
//! track of the path through the nested values that led to the error.
//! Mistakes in using the API are reported through [`encode::UsageError`].

#[macro_use] mod debug;

pub use self::any::{Any, AnyEncoder};
pub use self::choice::{Choice, ChoiceTemplate};
pub use self::explicit::{Explicit, ExplicitTemplate};
pub use self::header::Header;
pub use self::int::Integer;
pub use self::length::Length;
pub use self::mode::Mode;
pub use self::oid::Oid;
pub use self::sequence::{
    Field, Iter, Sequence, SequenceBuilder, SequenceTemplate, Set, SetBuilder,
    SetTemplate,
};
pub use self::string::{
    BitString, BmpString, Ia5String, OctetString, PrintableString,
    TeletexString, UniversalString, Utf8String,
};
pub use self::tag::{Class, Tag};
pub use self::template::{ImplicitTemplate, Template};
pub use self::time::{GeneralizedTime, UtcTime};
pub use self::value::{Value, ValueEncoder};

pub mod decode;
pub mod encode;

pub mod int;
pub mod oid;
pub mod string;
pub mod time;

mod any;
mod choice;
mod explicit;
mod header;
mod length;
mod mode;
mod sequence;
mod tag;
mod template;
mod value;
