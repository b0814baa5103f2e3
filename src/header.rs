//! The header of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::io;
use crate::decode::{DecodeError, Pos, SliceSource};
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::Tag;


//------------ Header --------------------------------------------------------

/// The identifier and length octets of an encoded value.
///
/// Every encoded value starts with a header naming its tag, whether the
/// value is primitive or constructed, and the length of its content. The
/// special header with tag UNIVERSAL 0, primitive form, and a length of
/// zero is the end-of-contents marker that terminates the content of a
/// constructed value of indefinite length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Header {
    tag: Tag,
    constructed: bool,
    length: Length,
}

impl Header {
    /// Creates a new header from its components.
    pub fn new(tag: Tag, constructed: bool, length: Length) -> Self {
        Header { tag, constructed, length }
    }

    /// Returns the tag of the value.
    pub fn tag(self) -> Tag {
        self.tag
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Returns the length of the content.
    pub fn length(self) -> Length {
        self.length
    }

    /// Returns whether this is the end-of-contents marker.
    pub fn is_eoc(self) -> bool {
        self.tag == Tag::END_OF_CONTENTS
            && !self.constructed
            && self.length.is_zero()
    }

    /// Takes a header from the beginning of a source.
    ///
    /// Fails if the length is indefinite but the value is primitive, and in
    /// DER mode whenever the length is indefinite at all.
    pub fn take_from(
        source: &mut SliceSource, mode: Mode
    ) -> Result<Self, DecodeError> {
        let pos = source.pos();
        let (tag, constructed) = Tag::take_from(source)?;
        let length = Length::take_from(source, mode)?;
        if length == Length::Indefinite && !constructed {
            xerr!(return Err(DecodeError::malformed(
                "indefinite length on primitive value", pos
            )))
        }
        Ok(Header { tag, constructed, length })
    }

    /// Returns the header at the beginning of a source.
    ///
    /// The source itself is left untouched. Returns `Ok(None)` if the
    /// source has no more octets before its limit.
    pub fn peek(
        source: &SliceSource, mode: Mode
    ) -> Result<Option<Self>, DecodeError> {
        if source.remaining() == 0 {
            return Ok(None)
        }
        let mut probe = source.clone();
        Self::take_from(&mut probe, mode).map(Some)
    }

    /// Checks that the header has the expected tag and form.
    ///
    /// If `constructed` is `None`, either form is acceptable. The `pos`
    /// argument is used for the error if the check fails.
    pub fn validate(
        self, expected: Tag, constructed: Option<bool>, pos: Pos
    ) -> Result<(), DecodeError> {
        if self.tag != expected {
            xerr!(return Err(DecodeError::malformed(
                format!("expected {}, found {}", expected, self.tag), pos
            )))
        }
        match constructed {
            Some(true) if !self.constructed => {
                xerr!(Err(DecodeError::malformed(
                    format!("expected constructed {}", expected), pos
                )))
            }
            Some(false) if self.constructed => {
                xerr!(Err(DecodeError::malformed(
                    format!("expected primitive {}", expected), pos
                )))
            }
            _ => Ok(())
        }
    }

    /// Returns the length of the encoded header.
    pub fn encoded_len(self) -> usize {
        self.tag.encoded_len() + self.length.encoded_len()
    }

    /// Writes the encoded header to a target.
    pub fn write_encoded<W: io::Write>(
        self, target: &mut W
    ) -> Result<(), io::Error> {
        self.tag.write_encoded(self.constructed, target)?;
        self.length.write_encoded(target)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;

    fn take(data: &[u8], mode: Mode) -> Result<Header, DecodeError> {
        Header::take_from(&mut SliceSource::from_slice(data), mode)
    }

    #[test]
    fn take_from() {
        assert_eq!(
            take(b"\x30\x82\x01\x00", Mode::Ber).unwrap(),
            Header::new(Tag::SEQUENCE, true, Length::Definite(256))
        );
        assert_eq!(
            take(b"\xa0\x80", Mode::Ber).unwrap(),
            Header::new(Tag::CTX_0, true, Length::Indefinite)
        );
        assert!(take(b"\x00\x00", Mode::Ber).unwrap().is_eoc());
        assert!(take(b"\x04\x80", Mode::Ber).is_err());
        assert!(take(b"\xa0\x80", Mode::Der).is_err());
        assert!(take(b"\x02\xff", Mode::Ber).is_err());
        assert_eq!(
            take(b"\x02", Mode::Ber).unwrap_err().kind(),
            ErrorKind::EndOfStream
        );
    }

    #[test]
    fn peek_leaves_source() {
        let source = SliceSource::from_slice(b"\x02\x01\x05");
        let header = Header::peek(&source, Mode::Ber).unwrap().unwrap();
        assert_eq!(header.tag(), Tag::INTEGER);
        assert_eq!(source.remaining(), 3);
        assert!(
            Header::peek(&SliceSource::from_slice(b""), Mode::Ber)
                .unwrap().is_none()
        );
    }

    #[test]
    fn validate() {
        let header = Header::new(Tag::SEQUENCE, true, Length::Definite(0));
        assert!(header.validate(Tag::SEQUENCE, None, Pos::default()).is_ok());
        assert!(
            header.validate(Tag::SEQUENCE, Some(true), Pos::default()).is_ok()
        );
        assert!(
            header.validate(Tag::SEQUENCE, Some(false), Pos::default())
                .is_err()
        );
        assert!(header.validate(Tag::SET, None, Pos::default()).is_err());
    }

    #[test]
    fn encode() {
        let header = Header::new(Tag::ctx(31), true, Length::Definite(200));
        let mut target = Vec::new();
        header.write_encoded(&mut target).unwrap();
        assert_eq!(target, b"\xbf\x1f\x81\xc8");
        assert_eq!(header.encoded_len(), 4);
    }
}
