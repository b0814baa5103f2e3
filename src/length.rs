//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::io;
use crate::decode::{DecodeError, SliceSource};
use crate::mode::Mode;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-contents marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets. The first octet 0xFF is reserved and
/// never valid.
///
/// Under DER rules, a definite length must be encoded in the minimum number
/// of octets and indefinite length is not allowed at all.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    /// A length value in definite form.
    ///
    /// Provides the actual length of the content in octets.
    Definite(usize),

    /// A length value in indefinite form.
    ///
    /// In this form, the end of a value is determined by a special tag.
    Indefinite
}

impl Length {
    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns whether the length is definite and zero.
    pub fn is_zero(self) -> bool {
        self == Length::Definite(0)
    }

    /// Takes a length value from the beginning of a source.
    ///
    /// In DER mode, the indefinite form as well as any non-minimal
    /// encoding of a definite length are rejected.
    pub fn take_from(
        source: &mut SliceSource,
        mode: Mode,
    ) -> Result<Self, DecodeError> {
        let pos = source.pos();
        match source.take_u8()? {
            // Bit 7 clear: other bits are the length
            n if (n & 0x80) == 0 => Ok(Length::Definite(n as usize)),

            // Bit 7 set: other bits are the number of octets that
            // encode the length. Unless they are all 0, in which case this
            // is the indefinite form.
            0x80 => {
                if mode == Mode::Der {
                    xerr!(Err(DecodeError::malformed(
                        "indefinite length in DER", pos
                    )))
                }
                else {
                    Ok(Length::Indefinite)
                }
            }
            0xFF => {
                xerr!(Err(DecodeError::malformed(
                    "illegal length octets", pos
                )))
            }
            n => {
                let count = (n & 0x7F) as usize;
                let mut len = 0usize;
                for i in 0..count {
                    let octet = source.take_u8()?;
                    if mode == Mode::Der && i == 0 && octet == 0 {
                        xerr!(return Err(DecodeError::malformed(
                            "non-minimal length in DER", pos
                        )))
                    }
                    if len.leading_zeros() < 8 {
                        xerr!(return Err(DecodeError::unsupported(
                            "excessive length", pos
                        )))
                    }
                    len = (len << 8) | usize::from(octet);
                }
                if mode == Mode::Der && len < 0x80 {
                    xerr!(return Err(DecodeError::malformed(
                        "non-minimal length in DER", pos
                    )))
                }
                Ok(Length::Definite(len))
            }
        }
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Indefinite => 1,
            Length::Definite(len) => {
                if len > 0x7F {
                    Self::octet_count(len) + 1
                }
                else {
                    1
                }
            }
        }
    }

    /// Writes the encoded length to the given writer.
    pub fn write_encoded<W: io::Write>(
        self, target: &mut W
    ) -> Result<(), io::Error> {
        match self {
            Length::Indefinite => target.write_all(&[0x80]),
            Length::Definite(len) => {
                if len > 0x7F {
                    let count = Self::octet_count(len);
                    target.write_all(&[(count as u8) | 0x80])?;
                    let octets = len.to_be_bytes();
                    target.write_all(&octets[octets.len() - count..])
                }
                else {
                    target.write_all(&[len as u8])
                }
            }
        }
    }

    /// Returns the number of octets necessary to express `len`.
    fn octet_count(len: usize) -> usize {
        let size = std::mem::size_of::<usize>();
        size - (len.leading_zeros() as usize / 8)
    }
}


//============ Tests =========================================================
