//! Encoding data in BER.
//!
//! This modules provides means to encode data in BER. All output uses the
//! definite length form and minimal encodings and is therefore valid DER
//! as long as the values themselves follow its additional rules.
//!
//! Encoding is done using helper types called _encoders_ that represent the
//! structure of the encoding. These types implement the trait [`Values`].
//! A type that can be encoded typically provides a method named `encode`
//! that produces a value of its encoder type representing the value’s
//! encoding. If necessary, they can also provide a method `encode_as` that
//! does the same thing but allows the caller to provide a tag to use for
//! encoding as is necessary for implicit tagging.
//!
//! The [`Values`] type can then be used to simply write the encoding to
//! anything that implements the standard library’s `io::Write` trait.
//!
//! The trait [`PrimitiveContent`] helps with producing encoders for types
//! that use the primitive encoding. Through this trait the types can declare
//! how their content is encoded and receive an automatic encoder type based
//! on that.
//!
//! [`Values`]: trait.Values.html
//! [`PrimitiveContent`]: trait.PrimitiveContent.html

pub use self::error::UsageError;
pub use self::primitive::{PrimitiveContent, Primitive};
pub(crate) use self::values::write_vec;
pub use self::values::{
    Values,
    Constructed, Nothing,
    sequence, set, total_len, write_header,
};

mod error;
mod primitive;
mod values;
