//! This module implements `UtcOffset`, the fixed numeric offset carried by
//! the offset kinds.

use core::{fmt, str::FromStr};

use ixdtf::records::{MinutePrecisionOffset, Sign as IxdtfSign, UtcOffsetRecordOrZ};
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    error::ErrorMessage,
    fields::MAX_OFFSET_SECONDS,
    parsers::{self, FormattableOffset, FormattableTime, Precision},
    Sign, TemporalError, TemporalResult, NS_PER_SECOND,
};

/// A fixed UTC offset in whole seconds, within `-18:00..=+18:00`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset(i32);

impl UtcOffset {
    /// The `Z` offset.
    pub const UTC: Self = Self(0);

    /// Creates an offset from a signed amount of seconds.
    pub fn from_seconds(seconds: i32) -> TemporalResult<Self> {
        if !(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&seconds) {
            return Err(TemporalError::range().with_enum(ErrorMessage::OffsetOutOfRange));
        }
        Ok(Self(seconds))
    }

    /// Creates an offset from its sign and unsigned components.
    pub fn from_hms(sign: Sign, hours: u8, minutes: u8, seconds: u8) -> TemporalResult<Self> {
        if minutes > 59 || seconds > 59 {
            return Err(TemporalError::range().with_enum(ErrorMessage::OffsetOutOfRange));
        }
        let magnitude = i32::from(hours) * 3600 + i32::from(minutes) * 60 + i32::from(seconds);
        Self::from_seconds(magnitude * i32::from(sign.as_sign_multiplier()))
    }

    pub(crate) fn from_ixdtf_record(record: UtcOffsetRecordOrZ) -> TemporalResult<Self> {
        let record = match record {
            UtcOffsetRecordOrZ::Z => return Ok(Self::UTC),
            UtcOffsetRecordOrZ::Offset(record) => record,
        };
        let fraction = record
            .fraction()
            .map(|fraction| {
                fraction.to_nanoseconds().ok_or(
                    TemporalError::range()
                        .with_enum(ErrorMessage::FractionalTimeMoreThanNineDigits),
                )
            })
            .transpose()?
            .unwrap_or(0);
        if fraction != 0 {
            return Err(TemporalError::range()
                .with_message("Sub-second UTC offsets are not supported."));
        }
        Self::from_hms(
            sign_from_ixdtf(record.sign()),
            record.hour(),
            record.minute(),
            record.second().unwrap_or(0),
        )
    }

    pub(crate) fn from_ixdtf_minute_record(record: MinutePrecisionOffset) -> TemporalResult<Self> {
        Self::from_hms(sign_from_ixdtf(record.sign), record.hour, record.minute, 0)
    }

    /// Returns the total offset in seconds.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub(crate) const fn nanoseconds(&self) -> i64 {
        self.0 as i64 * NS_PER_SECOND
    }

    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        Sign::from(self.0.signum() as i8)
    }

    #[inline]
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        self.0 == 0
    }

    fn to_formattable(self) -> FormattableOffset {
        let magnitude = self.0.unsigned_abs();
        let second = (magnitude % 60) as u8;
        FormattableOffset {
            sign: self.sign(),
            time: FormattableTime {
                hour: (magnitude / 3600) as u8,
                minute: ((magnitude / 60) % 60) as u8,
                second,
                nanosecond: 0,
                precision: if second == 0 {
                    Precision::Minute
                } else {
                    Precision::Digit(0)
                },
                include_sep: true,
            },
        }
    }
}

fn sign_from_ixdtf(sign: IxdtfSign) -> Sign {
    if sign == IxdtfSign::Negative {
        Sign::Negative
    } else {
        Sign::Positive
    }
}

impl Writeable for UtcOffset {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if self.is_utc() {
            return sink.write_char('Z');
        }
        self.to_formattable().write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.is_utc() {
            return LengthHint::exact(1);
        }
        self.to_formattable().writeable_length_hint()
    }
}

impl_display_with_writeable!(UtcOffset);

impl FromStr for UtcOffset {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_utc_offset(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use super::UtcOffset;
    use crate::{error::ErrorKind, Sign};
    use core::str::FromStr;
    use writeable::assert_writeable_eq;

    #[test]
    fn offset_rendering() {
        assert_writeable_eq!(UtcOffset::UTC, "Z");
        assert_writeable_eq!(UtcOffset::from_seconds(7200).unwrap(), "+02:00");
        assert_writeable_eq!(UtcOffset::from_seconds(-19_800).unwrap(), "-05:30");
        assert_writeable_eq!(UtcOffset::from_seconds(3_723).unwrap(), "+01:02:03");
    }

    #[test]
    fn offset_limits() {
        assert!(UtcOffset::from_seconds(64_800).is_ok());
        let err = UtcOffset::from_seconds(64_801).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(UtcOffset::from_hms(Sign::Positive, 1, 60, 0).is_err());
        assert_eq!(
            UtcOffset::from_hms(Sign::Negative, 3, 30, 0).unwrap().seconds(),
            -12_600
        );
    }

    #[test]
    fn offset_parsing() {
        let cases = [
            ("Z", 0),
            ("z", 0),
            ("+02", 7200),
            ("-02:30", -9000),
            ("+0230", 9000),
            ("+01:02:03", 3723),
            ("-00:00", 0),
        ];
        for (source, seconds) in cases {
            let offset = UtcOffset::from_str(source).unwrap();
            assert_eq!(offset.seconds(), seconds, "{source}");
        }
        for source in ["", "02:00", "+2", "+02:0", "+02:00:", "+19:00", "+02:00Z"] {
            assert!(UtcOffset::from_str(source).is_err(), "{source}");
        }
    }
}
