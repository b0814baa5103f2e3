//! The UTCTime and GeneralizedTime types.
//!
//! Both types represent a point in time as text. They share all their logic
//! and only differ in their tag and the number of digits used for the year.

use std::{fmt, io};
use std::marker::PhantomData;
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Timelike, Utc
};
use crate::decode::{Constructed, Content, DecodeError};
use crate::encode::{PrimitiveContent, UsageError};
use crate::string::take_string_content;
use crate::tag::Tag;


//------------ TimeFormat ----------------------------------------------------

/// The textual format of a time type.
///
/// The trait is implemented for marker types that select the format of
/// [`Time`] values.
///
/// [`Time`]: struct.Time.html
pub trait TimeFormat {
    /// The natural tag of the time type.
    const TAG: Tag;

    /// Whether the year is written with two digits only.
    ///
    /// If so, years from 70 are in the twentieth century, earlier years in
    /// the twenty-first.
    const SHORT_YEAR: bool;
}

/// The format of UTCTime with two year digits.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UtcFormat;

impl TimeFormat for UtcFormat {
    const TAG: Tag = Tag::UTC_TIME;
    const SHORT_YEAR: bool = true;
}

/// The format of GeneralizedTime with four year digits.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GeneralizedFormat;

impl TimeFormat for GeneralizedFormat {
    const TAG: Tag = Tag::GENERALIZED_TIME;
    const SHORT_YEAR: bool = false;
}


//------------ Time ----------------------------------------------------------

/// A point in time with a resolution of one second.
///
/// Use the aliases [`UtcTime`] and [`GeneralizedTime`] for the two ASN.1
/// time types.
///
/// # BER Encoding
///
/// A time is encoded like a restricted character string. The content is
/// the date and time as `YYMMDDhhmm[ss]` for UTCTime or `YYYYMMDDhhmm[ss]`
/// for GeneralizedTime, followed by an optional fraction of a second for
/// GeneralizedTime only, followed by either a `Z` for UTC or an offset
/// `+hhmm` or `-hhmm`. UTCTime requires the zone. A GeneralizedTime without
/// one is taken to be in UTC.
///
/// The encoder always writes the seconds, no fraction, and the `Z` zone.
///
/// [`UtcTime`]: type.UtcTime.html
/// [`GeneralizedTime`]: type.GeneralizedTime.html
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Time<F> {
    time: DateTime<Utc>,
    marker: PhantomData<F>,
}

/// A UTCTime value.
pub type UtcTime = Time<UtcFormat>;

/// A GeneralizedTime value.
pub type GeneralizedTime = Time<GeneralizedFormat>;

impl<F: TimeFormat> Time<F> {
    /// Creates a new value from a point in time.
    ///
    /// Fractions of a second are dropped. Fails if the year cannot be
    /// represented, i.e., if it isn’t between 1970 and 2069 for UTCTime or
    /// between 0 and 9999 for GeneralizedTime.
    pub fn new(time: DateTime<Utc>) -> Result<Self, UsageError> {
        if !Self::year_in_range(&time) {
            return Err(UsageError::TimeOutOfRange)
        }
        let time = time.with_nanosecond(0).ok_or(UsageError::TimeOutOfRange)?;
        Ok(Time { time, marker: PhantomData })
    }

    /// Returns whether the year of `time` can be encoded.
    ///
    /// This keeps the content at a fixed length and makes it decode to
    /// the same point in time again.
    fn year_in_range(time: &DateTime<Utc>) -> bool {
        if F::SHORT_YEAR {
            (1970..=2069).contains(&time.year())
        }
        else {
            (0..=9999).contains(&time.year())
        }
    }

    /// Returns the point in time.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.time
    }

    /// Converts the value into the point in time.
    pub fn into_datetime(self) -> DateTime<Utc> {
        self.time
    }

    /// Returns the content octets of the encoded value.
    pub fn to_content(&self) -> String {
        let time = &self.time;
        if F::SHORT_YEAR {
            format!(
                "{:02}{:02}{:02}{:02}{:02}{:02}Z",
                time.year() % 100, time.month(), time.day(),
                time.hour(), time.minute(), time.second()
            )
        }
        else {
            format!(
                "{:04}{:02}{:02}{:02}{:02}{:02}Z",
                time.year(), time.month(), time.day(),
                time.hour(), time.minute(), time.second()
            )
        }
    }
}

/// # Decoding
///
impl<F: TimeFormat> Time<F> {
    /// Takes a single time value from the beginning of a constructed value.
    pub fn take_from(cons: &mut Constructed) -> Result<Self, DecodeError> {
        cons.take_value_if(F::TAG, Self::from_content)
    }

    /// Takes an optional time value from the beginning of a constructed
    /// value.
    pub fn take_opt_from(
        cons: &mut Constructed
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_value_if(F::TAG, Self::from_content)
    }

    /// Takes a time value from content.
    pub fn from_content(content: &mut Content) -> Result<Self, DecodeError> {
        let pos = content.pos();
        let octets = take_string_content(content, Tag::OCTET_STRING)?;
        match Self::parse(octets.as_ref()) {
            Ok(time) => Ok(Time { time, marker: PhantomData }),
            Err(msg) => {
                xerr!(Err(DecodeError::malformed(
                    format!("invalid {}: {}", F::TAG, msg), pos
                )))
            }
        }
    }

    /// Parses the textual form of a time.
    fn parse(octets: &[u8]) -> Result<DateTime<Utc>, &'static str> {
        let mut parser = Parser(octets);
        let year = if F::SHORT_YEAR {
            match parser.take_num(2)? as i32 {
                year if year < 70 => year + 2000,
                year => year + 1900
            }
        }
        else {
            parser.take_num(4)? as i32
        };
        let month = parser.take_num(2)?;
        let day = parser.take_num(2)?;
        let hour = parser.take_num(2)?;
        let minute = parser.take_num(2)?;
        let second = if parser.peek_digit() { parser.take_num(2)? } else { 0 };
        if !F::SHORT_YEAR && parser.skip_if(|ch| ch == b'.' || ch == b',') {
            if !parser.peek_digit() {
                return Err("empty fraction")
            }
            while parser.skip_if(|ch| ch.is_ascii_digit()) { }
        }
        let offset = if parser.skip_if(|ch| ch == b'Z') {
            0
        }
        else if parser.skip_if(|ch| ch == b'+') {
            parser.take_offset()?
        }
        else if parser.skip_if(|ch| ch == b'-') {
            -parser.take_offset()?
        }
        else if parser.0.is_empty() && !F::SHORT_YEAR {
            0
        }
        else if parser.0.is_empty() {
            return Err("missing time zone")
        }
        else {
            return Err("invalid time zone")
        };
        if !parser.0.is_empty() {
            return Err("trailing characters")
        }

        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .ok_or("invalid date or time")?;
        let zone = FixedOffset::east_opt(offset).ok_or("invalid offset")?;
        let time = zone.from_local_datetime(&naive).single()
            .map(|time| time.with_timezone(&Utc))
            .ok_or("invalid date or time")?;
        if !Self::year_in_range(&time) {
            return Err("year out of range in UTC")
        }
        Ok(time)
    }
}

/// A cursor over the content of a time value.
struct Parser<'a>(&'a [u8]);

impl<'a> Parser<'a> {
    /// Takes a decimal number of exactly `digits` digits.
    fn take_num(&mut self, digits: usize) -> Result<u32, &'static str> {
        if self.0.len() < digits {
            return Err("too short")
        }
        let (head, tail) = self.0.split_at(digits);
        let mut res = 0;
        for &ch in head {
            if !ch.is_ascii_digit() {
                return Err("expected digit")
            }
            res = res * 10 + u32::from(ch - b'0');
        }
        self.0 = tail;
        Ok(res)
    }

    /// Takes an offset `hhmm` and returns it in seconds.
    fn take_offset(&mut self) -> Result<i32, &'static str> {
        let hours = self.take_num(2)?;
        let minutes = self.take_num(2)?;
        if hours > 23 || minutes > 59 {
            return Err("invalid offset")
        }
        Ok(((hours * 60 + minutes) * 60) as i32)
    }

    /// Returns whether the next character is a digit.
    fn peek_digit(&self) -> bool {
        self.0.first().map(u8::is_ascii_digit).unwrap_or(false)
    }

    /// Skips over the next character if it fulfills `op`.
    fn skip_if(&mut self, op: impl FnOnce(u8) -> bool) -> bool {
        match self.0.split_first() {
            Some((&ch, tail)) if op(ch) => {
                self.0 = tail;
                true
            }
            _ => false
        }
    }
}


//--- Display

impl<F: TimeFormat> fmt::Display for Time<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_content())
    }
}


//--- PrimitiveContent

impl<'a, F: TimeFormat> PrimitiveContent for &'a Time<F> {
    const TAG: Tag = F::TAG;

    fn encoded_len(self) -> usize {
        if F::SHORT_YEAR { 13 } else { 15 }
    }

    fn write_encoded<W: io::Write>(
        self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self.to_content().as_bytes())
    }
}


//--- Helpers for tests

#[cfg(test)]
impl<F: TimeFormat> Time<F> {
    fn parse_str(s: &str) -> Result<Self, DecodeError> {
        Self::parse(s.as_bytes()).map(|time| {
            Time { time, marker: PhantomData }
        }).map_err(|msg| {
            DecodeError::malformed(msg, crate::decode::Pos::default())
        })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::Values;
    use crate::mode::Mode;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(y, m, d).unwrap()
                .and_hms_opt(h, min, s).unwrap()
        )
    }

    #[test]
    fn encode() {
        let time = utc(2019, 3, 7, 9, 5, 2);
        let utc_time = UtcTime::new(time).unwrap();
        assert_eq!(
            utc_time.encode().to_vec(), b"\x17\x0d190307090502Z"
        );
        let gen_time = GeneralizedTime::new(time).unwrap();
        assert_eq!(
            gen_time.encode().to_vec(), b"\x18\x0f20190307090502Z"
        );
        assert_eq!(
            UtcTime::new(utc(2070, 1, 1, 0, 0, 0)),
            Err(UsageError::TimeOutOfRange)
        );
        assert!(GeneralizedTime::new(utc(2070, 1, 1, 0, 0, 0)).is_ok());
    }

    #[test]
    fn decode_utc() {
        assert_eq!(
            UtcTime::parse_str("190307090502Z").unwrap().into_datetime(),
            utc(2019, 3, 7, 9, 5, 2)
        );
        assert_eq!(
            UtcTime::parse_str("7001010000Z").unwrap().into_datetime(),
            utc(1970, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            UtcTime::parse_str("6912312359+0100").unwrap().into_datetime(),
            utc(2069, 12, 31, 22, 59, 0)
        );
        assert_eq!(
            UtcTime::parse_str("190307090502-0230").unwrap().into_datetime(),
            utc(2019, 3, 7, 11, 35, 2)
        );
        assert!(UtcTime::parse_str("190307090502").is_err());
        assert!(UtcTime::parse_str("190307090502.5Z").is_err());
        assert!(UtcTime::parse_str("190307090502ZZ").is_err());
        assert!(UtcTime::parse_str("191307090502Z").is_err());
        assert!(UtcTime::parse_str("190230090502Z").is_err());
        assert!(UtcTime::parse_str("19030709050aZ").is_err());
        assert!(UtcTime::parse_str("1903070905+2400").is_err());
    }

    #[test]
    fn decode_generalized() {
        assert_eq!(
            GeneralizedTime::parse_str("20190307090502.123Z")
                .unwrap().into_datetime(),
            utc(2019, 3, 7, 9, 5, 2)
        );
        assert_eq!(
            GeneralizedTime::parse_str("201903070905")
                .unwrap().into_datetime(),
            utc(2019, 3, 7, 9, 5, 0)
        );
        assert_eq!(
            GeneralizedTime::parse_str("20190307090502,5+0100")
                .unwrap().into_datetime(),
            utc(2019, 3, 7, 8, 5, 2)
        );
        assert!(GeneralizedTime::parse_str("20190307090502.Z").is_err());
        assert!(GeneralizedTime::parse_str("2019030709").is_err());
    }

    #[test]
    fn offset_leaves_range() {
        assert!(UtcTime::parse_str("700101000000+0100").is_err());
        assert!(UtcTime::parse_str("691231233000-0100").is_err());
        assert_eq!(
            UtcTime::parse_str("700101010000+0100").unwrap().into_datetime(),
            utc(1970, 1, 1, 0, 0, 0)
        );
        assert!(
            GeneralizedTime::parse_str("99991231235959-0100").is_err()
        );
        assert!(
            GeneralizedTime::parse_str("00000101000000+0100").is_err()
        );
        assert_eq!(
            GeneralizedTime::parse_str("99991231225959-0100").unwrap()
                .into_datetime(),
            utc(9999, 12, 31, 23, 59, 59)
        );

        let err = Mode::Ber.decode(
            b"\x18\x1399991231235959-0100", GeneralizedTime::take_from
        ).unwrap_err();
        assert_eq!(err.kind(), crate::decode::ErrorKind::Malformed);

        // Whatever decodes, encodes with the announced length and decodes
        // to the same time again.
        for &data in &[
            &b"\x17\x11700101010000+0100"[..],
            &b"\x17\x11691231223000-0100"[..],
        ] {
            let time = Mode::Ber.decode(data, UtcTime::take_from).unwrap();
            let encoded = time.encode().to_vec();
            assert_eq!(encoded.len(), 15);
            assert_eq!(
                Mode::Der.decode(encoded.as_slice(), UtcTime::take_from)
                    .unwrap(),
                time
            );
        }
        let time = Mode::Ber.decode(
            &b"\x18\x1399991231225959-0100"[..], GeneralizedTime::take_from
        ).unwrap();
        let encoded = time.encode().to_vec();
        assert_eq!(encoded.len(), 17);
        assert_eq!(
            Mode::Der.decode(encoded.as_slice(), GeneralizedTime::take_from)
                .unwrap(),
            time
        );
    }

    #[test]
    fn take_from() {
        let data = b"\x30\x1e\
            \x17\x0d190307090502Z\
            \x18\x0d201903070905Z";
        let (first, second) = Mode::Der.decode(data, |cons| {
            cons.take_sequence(|cons| {
                Ok((UtcTime::take_from(cons)?, GeneralizedTime::take_from(cons)?))
            })
        }).unwrap();
        assert_eq!(first.to_string(), "190307090502Z");
        assert_eq!(second.to_string(), "20190307090500Z");
        assert!(Mode::Der.decode(b"\x18\x0d190307090502Z", UtcTime::take_from)
            .is_err());
    }
}
