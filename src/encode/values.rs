//! Everything related to the `Values` trait.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use std::io;
use crate::length::Length;
use crate::tag::Tag;


//------------ Values --------------------------------------------------------

/// A type that is a value encoder.
///
/// Value encoders know how to encode themselves into a sequence of encoded
/// values. While you can impl this trait for your type manually, in
/// practice it is often easier to define a method called `encode` and let
/// it return some dedicated value encoder type constructed from the types
/// provided by this module.
///
/// A type implementing this trait should encode itself into zero or more
/// values. That is, the type becomes the content or part of the content
/// of a constructed value.
///
/// All encoders produce the definite length form with the shortest
/// possible length octets. Since the total length of a value needs to be
/// known before its content is written, encoders must be able to report
/// their encoded length without writing anything.
pub trait Values {
    /// Returns the length of the encoded values.
    fn encoded_len(&self) -> usize;

    /// Encodes the values and writes them to `target`.
    fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error>;


    //--- Provided methods

    /// Converts the encoder into one with an explicit tag.
    ///
    /// For an explicit tag, the value is wrapped in a constructed value with
    /// the given tag.
    fn explicit(self, tag: Tag) -> Constructed<Self>
    where Self: Sized {
        Constructed::new(tag, self)
    }

    /// Writes the encoded values into a new vec.
    fn to_vec(&self) -> Vec<u8> {
        write_vec(self.encoded_len(), |target| self.write_encoded(target))
    }
}


//--- Blanket impls

impl<V: Values + ?Sized> Values for &'_ V {
    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        (**self).write_encoded(target)
    }
}


//--- Impls for Tuples

/// Macro for implementing `Values` for tuples.
///
/// This macro implements `Values` for all tuples up to a certain degree.
/// It needs to be invoked as below. All the `Tx`s are the type parameters
/// of the elements the tuple, the numbers are the tuple element numbers.
/// The number need to be provided backwards ending in 0.
///
/// The `tuple` bit of the macro does the actual impl and invokes itself with
/// one less tuple element. The `write` bit below is to implement
/// `write_encoded` backwards (i.e., starting with the smallest number).
macro_rules! tupl_impl {
    // Termination: empty lists, do nothing.
    ( tuple > ) => { };

    // Impl values for the complete lists, then recurse to the lists without
    // their heads.
    ( tuple $t:ident $( $ttail:ident )* > $i:tt $( $itail:tt )* ) => {
        impl<$t: Values, $( $ttail: Values ),*> Values
                for ($t, $( $ttail ),*) {
            fn encoded_len(&self) -> usize {
                self.$i.encoded_len()
                $(
                    + self.$itail.encoded_len()
                )*
            }

            fn write_encoded<W: io::Write>(
                &self,
                target: &mut W
            ) -> Result<(), io::Error> {
                tupl_impl!( write self, target, $i $( $itail )* );
                Ok(())
            }
        }

        tupl_impl!(
             tuple $($ttail)* > $($itail)*
        );
    };

    // Termination: empty lists, do nothing.
    ( write $self:expr, $target:expr, ) => { };

    // Write all elements of tuple $self to $target in order.
    ( write $self:expr, $target:expr, $i:tt $($itail:tt)*) => {
        tupl_impl!( write $self, $target, $($itail)* );
        $self.$i.write_encoded($target)?
    }
}

tupl_impl!(
    tuple T11 T10 T9 T8 T7 T6 T5 T4 T3 T2 T1 T0 > 11 10 9 8 7 6 5 4 3 2 1 0
);


//--- Impl for Option

/// Encoding of an optional value.
///
/// This implementation encodes `None` as nothing, i.e., as an OPTIONAL
/// in ASN.1 parlance.
impl<V: Values> Values for Option<V> {
    fn encoded_len(&self) -> usize {
        match self {
            Some(v) => v.encoded_len(),
            None => 0,
        }
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        match self {
            Some(v) => v.write_encoded(target),
            None => Ok(())
        }
    }
}


//--- Impl for slice and Vec

impl<V: Values> Values for [V] {
    fn encoded_len(&self) -> usize {
        self.iter().map(Values::encoded_len).sum()
    }

    fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        self.iter().try_for_each(|v| v.write_encoded(target))
    }
}

impl<V: Values> Values for Vec<V> {
    fn encoded_len(&self) -> usize {
        self.as_slice().encoded_len()
    }

    fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        self.as_slice().write_encoded(target)
    }
}


//------------ Constructed ---------------------------------------------------

/// A value encoder for a single constructed value.
pub struct Constructed<V> {
    /// The tag of the value.
    tag: Tag,

    /// A value encoder for the content of the value.
    inner: V,
}

impl<V> Constructed<V> {
    /// Creates a new constructed value encoder from a tag and content.
    ///
    /// The returned value will encode as a single constructed value with
    /// the given tag and whatever `inner` encodes to as its content.
    pub fn new(tag: Tag, inner: V) -> Self {
        Constructed { tag, inner }
    }
}

impl<V: Values> Values for Constructed<V> {
    fn encoded_len(&self) -> usize {
        total_len(self.tag, self.inner.encoded_len())
    }

    fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        write_header(target, self.tag, true, self.inner.encoded_len())?;
        self.inner.write_encoded(target)
    }
}


//------------ Nothing -------------------------------------------------------

/// An encoder for nothing.
///
/// Unsurprisingly, this encodes as zero octets of content. It can be useful
/// for writing an encoder for an enum where some of the variants shouldn’t
/// result in content at all.
pub struct Nothing;

impl Values for Nothing {
    fn encoded_len(&self) -> usize {
        0
    }

    fn write_encoded<W: io::Write>(
        &self, _target: &mut W
    ) -> Result<(), io::Error> {
        Ok(())
    }
}


//============ Standard Functions ============================================

/// Returns a value encoder for a SEQUENCE containing `inner`.
pub fn sequence<V: Values>(inner: V) -> impl Values {
    Constructed::new(Tag::SEQUENCE, inner)
}

/// Returns a value encoder for a SET containing `inner`.
///
/// The values are written in the order given. Use `Constructed::new` for
/// a SEQUENCE or SET with an implicit tag.
pub fn set<V: Values>(inner: V) -> impl Values {
    Constructed::new(Tag::SET, inner)
}

/// Returns the length for a structure based on the tag and content length.
///
/// This is necessary because the length octets have a different length
/// depending on the content length.
pub fn total_len(tag: Tag, content_len: usize) -> usize {
    tag.encoded_len()
        + Length::Definite(content_len).encoded_len()
        + content_len
}

/// Returns the octets written by `op` into a new vec.
///
/// An `io::Write` for a vec never fails, so neither can `op`.
pub(crate) fn write_vec<F>(capacity: usize, op: F) -> Vec<u8>
where F: FnOnce(&mut Vec<u8>) -> Result<(), io::Error> {
    let mut target = Vec::with_capacity(capacity);
    match op(&mut target) {
        Ok(()) => target,
        Err(_) => unreachable!("writing to a vec failed"),
    }
}

/// Writes the header for a value.
///
/// The header in the sense of this function is the identifier octets and the
/// length octets.
pub fn write_header<W: io::Write>(
    target: &mut W,
    tag: Tag,
    constructed: bool,
    content_len: usize,
) -> Result<(), io::Error> {
    tag.write_encoded(constructed, target)?;
    Length::Definite(content_len).write_encoded(target)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::PrimitiveContent;

    #[test]
    fn nested() {
        let value = sequence((
            true.encode(),
            Some(().encode()),
            None::<Nothing>,
            sequence(Nothing).explicit(Tag::CTX_1),
        ));
        let expected = b"\x30\x09\x01\x01\xff\x05\x00\xa1\x02\x30\x00";
        assert_eq!(value.encoded_len(), expected.len());
        assert_eq!(value.to_vec(), expected);
    }

    #[test]
    fn set_of_values() {
        let value = set(vec![true.encode(), false.encode()]);
        let expected = b"\x31\x06\x01\x01\xff\x01\x01\x00";
        assert_eq!(value.encoded_len(), expected.len());
        assert_eq!(value.to_vec(), expected);
        assert_eq!(set(Nothing).to_vec(), b"\x31\x00");
    }

    #[test]
    fn long_content() {
        let content = vec![0u8; 300];
        let value = sequence(content.as_slice().encode());
        let encoded = value.to_vec();
        assert_eq!(encoded.len(), value.encoded_len());
        assert_eq!(&encoded[..8], b"\x30\x82\x01\x30\x04\x82\x01\x2c");
    }
}
