//! Parsed intermediate types
//!
//! A [`ParsedTemporal`] is a bag of components that has been *parsed* or
//! assembled by a caller but not yet validated. The `from_temporal`
//! factories of the value kinds extract what they need from it, defaulting
//! components the requested precision does not cover.

use alloc::string::String;

use ixdtf::records::{IxdtfParseRecord, TimeZoneRecord};
use ixdtf::encoding::Utf8;

use crate::{
    error::ErrorMessage,
    iso::{IsoDate, IsoTime},
    parsers::{self, ParseVariant},
    TemporalError, TemporalResult, TemporalUnwrap, UtcOffset,
};

/// Zone identifiers that always denote UTC.
const UTC_IDENTIFIERS: [&str; 8] = [
    "UTC", "Z", "GMT", "UT", "UCT", "Etc/UTC", "Etc/GMT", "Etc/UCT",
];

/// A parsed-but-not-validated set of temporal components.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedTemporal {
    // A potentially set `year` field.
    pub year: Option<i32>,
    // A potentially set `month` field.
    pub month: Option<u8>,
    // A potentially set `day` field.
    pub day: Option<u8>,
    // A potentially set `hour` field.
    pub hour: Option<u8>,
    // A potentially set `minute` field.
    pub minute: Option<u8>,
    // A potentially set `second` field.
    pub second: Option<u8>,
    // A potentially set `nanosecond` of second field.
    pub nanosecond: Option<u32>,
    // A potentially set inline UTC offset.
    pub offset: Option<UtcOffset>,
    // A potentially set time zone identifier.
    pub time_zone: Option<String>,
}

/// Convenience methods for building a `ParsedTemporal`
impl ParsedTemporal {
    pub const fn new() -> Self {
        Self {
            year: None,
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
            nanosecond: None,
            offset: None,
            time_zone: None,
        }
    }

    pub const fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub const fn with_month(mut self, month: Option<u8>) -> Self {
        self.month = month;
        self
    }

    pub const fn with_day(mut self, day: Option<u8>) -> Self {
        self.day = day;
        self
    }

    pub const fn with_hour(mut self, hour: Option<u8>) -> Self {
        self.hour = hour;
        self
    }

    pub const fn with_minute(mut self, minute: Option<u8>) -> Self {
        self.minute = minute;
        self
    }

    pub const fn with_second(mut self, second: Option<u8>) -> Self {
        self.second = second;
        self
    }

    pub const fn with_nanosecond(mut self, nanosecond: Option<u32>) -> Self {
        self.nanosecond = nanosecond;
        self
    }

    pub const fn with_offset(mut self, offset: Option<UtcOffset>) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_time_zone(mut self, time_zone: Option<&str>) -> Self {
        self.time_zone = time_zone.map(String::from);
        self
    }

    /// Sets every date component from an `IsoDate`.
    pub fn with_date(self, date: IsoDate) -> Self {
        self.with_year(Some(date.year))
            .with_month(Some(date.month))
            .with_day(Some(date.day))
    }

    /// Sets every time component from an `IsoTime`.
    pub fn with_time(self, time: IsoTime) -> Self {
        self.with_hour(Some(time.hour))
            .with_minute(Some(time.minute))
            .with_second(Some(time.second))
            .with_nanosecond(Some(time.nanosecond_of_second()))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ParsedTemporal {
    /// Converts a UTF-8 encoded IXDTF string into a `ParsedTemporal`.
    ///
    /// Date-times, year-months and times are accepted. A bracketed time zone
    /// annotation is recorded as the time zone identifier.
    ///
    /// ```rust
    /// use openehr_temporal::ParsedTemporal;
    ///
    /// let parsed =
    ///     ParsedTemporal::from_utf8(b"2021-08-06T04:03+02:00[Europe/Ljubljana]").unwrap();
    /// assert_eq!(parsed.year, Some(2021));
    /// assert_eq!(parsed.minute, Some(3));
    /// assert_eq!(parsed.offset.map(|o| o.seconds()), Some(7200));
    /// assert_eq!(parsed.time_zone.as_deref(), Some("Europe/Ljubljana"));
    /// ```
    pub fn from_utf8(source: &[u8]) -> TemporalResult<Self> {
        let (record, variant) = parsers::parse_ixdtf(source)?;
        Self::from_ixdtf_record(record, variant)
    }

    fn from_ixdtf_record(
        record: IxdtfParseRecord<'_, Utf8>,
        variant: ParseVariant,
    ) -> TemporalResult<Self> {
        let mut parsed = Self::new();

        if variant != ParseVariant::Time {
            // Assertion: a date must exist on date-time and year-month parses.
            let date = record.date.temporal_unwrap()?;
            parsed.year = Some(date.year);
            parsed.month = Some(date.month);
            if variant == ParseVariant::DateTime {
                parsed.day = Some(date.day);
            }
        }

        if let Some(time) = record.time {
            let iso = IsoTime::from_time_record(time)?;
            parsed.hour = Some(iso.hour);
            parsed.minute = Some(iso.minute);
            parsed.second = Some(iso.second);
            parsed.nanosecond = time.fraction.map(|_| iso.nanosecond_of_second());
        }

        parsed.offset = record.offset.map(UtcOffset::from_ixdtf_record).transpose()?;

        if let Some(annotation) = record.tz {
            let zone = match annotation.tz {
                TimeZoneRecord::Name(name) => String::from_utf8(name.to_vec())
                    .map_err(|_| TemporalError::syntax().with_message("Invalid time zone name."))?,
                TimeZoneRecord::Offset(offset) => {
                    UtcOffset::from_ixdtf_minute_record(offset)?.to_string()
                }
                _ => {
                    return Err(TemporalError::syntax()
                        .with_message("Unsupported time zone annotation."))
                }
            };
            parsed.time_zone = Some(zone);
        }

        Ok(parsed)
    }

    /// Resolves the time zone identifier to a fixed offset.
    ///
    /// Returns `None` without a time zone; fails with an invalid input error
    /// when the identifier names a region.
    pub fn zone_offset(&self) -> TemporalResult<Option<UtcOffset>> {
        self.time_zone
            .as_deref()
            .map(resolve_fixed_zone)
            .transpose()
    }

    /// Returns the inline offset, falling back to a fixed-offset time zone.
    pub fn resolved_offset(&self) -> TemporalResult<Option<UtcOffset>> {
        match self.offset {
            Some(offset) => Ok(Some(offset)),
            None => self.zone_offset(),
        }
    }

    /// Fails when the time zone identifier names a region.
    pub(crate) fn check_fixed_zone(&self) -> TemporalResult<()> {
        self.zone_offset().map(|_| ())
    }

    pub(crate) fn require_year(&self) -> TemporalResult<i32> {
        self.year
            .ok_or(TemporalError::invalid_input().with_enum(ErrorMessage::MissingYear))
    }

    pub(crate) fn require_month(&self) -> TemporalResult<u8> {
        self.month
            .ok_or(TemporalError::invalid_input().with_enum(ErrorMessage::MissingMonth))
    }

    pub(crate) fn require_day(&self) -> TemporalResult<u8> {
        self.day
            .ok_or(TemporalError::invalid_input().with_enum(ErrorMessage::MissingDay))
    }

    /// Extracts a time of day. The hour is required, finer components
    /// default to zero.
    pub(crate) fn require_time(&self) -> TemporalResult<IsoTime> {
        let hour = self
            .hour
            .ok_or(TemporalError::invalid_input().with_enum(ErrorMessage::MissingHour))?;
        IsoTime::from_components(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanosecond.unwrap_or(0),
        )
    }
}

/// Resolves a time zone identifier that denotes a fixed offset.
pub(crate) fn resolve_fixed_zone(identifier: &str) -> TemporalResult<UtcOffset> {
    if UTC_IDENTIFIERS
        .iter()
        .any(|utc| utc.eq_ignore_ascii_case(identifier))
    {
        return Ok(UtcOffset::UTC);
    }
    if identifier.starts_with(['+', '-']) {
        return parsers::parse_utc_offset(identifier.as_bytes())
            .map_err(|_| TemporalError::invalid_input().with_enum(ErrorMessage::NamedTimeZone));
    }
    Err(TemporalError::invalid_input().with_enum(ErrorMessage::NamedTimeZone))
}
