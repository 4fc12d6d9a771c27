//! This module implements `OpenEhrDateTime` and any directly related algorithms.

use core::str::FromStr;

use crate::{
    fields::{ChronoField, FieldState, FieldStateHolder, FieldStates, OpenEhrField},
    host::HostHooks,
    iso::{IsoDate, IsoDateTime, IsoTime},
    options::ResolverMode,
    parsed_intermediates::ParsedTemporal,
    parsers, TemporalError, TemporalResult, UtcOffset,
};

use super::{
    now::host_offset_date_time, partial::check_precision, AnyOpenEhrTemporal, ExactOrPartial,
    FormatterContext, OpenEhrDate, OpenEhrOffsetDateTime, OpenEhrTemporal, OpenEhrTime,
    TemporalAccessor, TemporalKind,
};

/// A date-time precise to any field from the year down to the nanosecond.
///
/// ```rust
/// use openehr_temporal::{OpenEhrDateTime, OpenEhrField, UtcOffset};
///
/// let date_time =
///     OpenEhrDateTime::of(2021, Some(8), Some(6), Some(4), Some(3), None, None).unwrap();
/// assert_eq!(date_time.precision_field(), OpenEhrField::Minutes);
///
/// let offset = date_time.at_offset(UtcOffset::from_seconds(7200).unwrap()).unwrap();
/// assert_eq!(offset.to_string(), "2021-08-06T04:03+02:00");
/// assert_eq!(date_time.to_date().to_string(), "2021-08-06");
/// ```
pub type OpenEhrDateTime = OpenEhrTemporal<IsoDateTime>;

/// Infers the precision of a date-time, preferring the time components.
pub(crate) fn date_time_precision(
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    nanosecond: Option<u32>,
) -> OpenEhrField {
    OpenEhrTime::precision_of(hour, minute, second, nanosecond)
        .unwrap_or_else(|| OpenEhrDate::precision_of(month, day))
}

/// Builds the exact date-time from supplied components, defaulting omitted
/// ones to their natural zero.
pub(crate) fn iso_date_time_of(
    year: i32,
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    nanosecond: Option<u32>,
) -> TemporalResult<IsoDateTime> {
    IsoDateTime::new(
        IsoDate::try_new(year, month.unwrap_or(1), day.unwrap_or(1))?,
        IsoTime::from_components(
            hour.unwrap_or(0),
            minute.unwrap_or(0),
            second.unwrap_or(0),
            nanosecond.unwrap_or(0),
        )?,
    )
}

/// Reads a date-time at `precision`. Date-level precisions yield the start
/// of the day.
pub(crate) fn iso_date_time_from_parsed(
    parsed: &ParsedTemporal,
    precision: OpenEhrField,
) -> TemporalResult<IsoDateTime> {
    let year = parsed.require_year()?;
    let (date, time) = match precision {
        OpenEhrField::Years => (IsoDate::try_new(year, 1, 1)?, IsoTime::default()),
        OpenEhrField::Months => (
            IsoDate::try_new(year, parsed.require_month()?, 1)?,
            IsoTime::default(),
        ),
        OpenEhrField::Days => (
            IsoDate::try_new(year, parsed.require_month()?, parsed.require_day()?)?,
            IsoTime::default(),
        ),
        _ => (
            IsoDate::try_new(year, parsed.require_month()?, parsed.require_day()?)?,
            parsed.require_time()?,
        ),
    };
    IsoDateTime::new(date, time)
}

impl OpenEhrTemporal<IsoDateTime> {
    /// Creates a date-time with the default date-time field states.
    ///
    /// The precision is the finest time component supplied or, without an
    /// hour, the finest date component supplied.
    pub fn of(
        year: i32,
        month: Option<u8>,
        day: Option<u8>,
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
        nanosecond: Option<u32>,
    ) -> TemporalResult<Self> {
        Self::of_with_states(
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond,
            FieldStates::DATE_TIME,
            ResolverMode::default(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn of_with_states(
        year: i32,
        month: Option<u8>,
        day: Option<u8>,
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
        nanosecond: Option<u32>,
        field_states: FieldStates,
        resolver_mode: ResolverMode,
    ) -> TemporalResult<Self> {
        let exact = iso_date_time_of(year, month, day, hour, minute, second, nanosecond)?;
        Self::new(
            exact,
            date_time_precision(month, day, hour, minute, second, nanosecond),
            field_states,
            resolver_mode,
        )
    }

    /// Returns the current date-time observed by the system.
    #[cfg(feature = "sys")]
    pub fn now() -> TemporalResult<Self> {
        Self::now_with_host(&crate::sys::SystemHost)
    }

    /// Returns the current date-time observed by `host`.
    pub fn now_with_host(host: &impl HostHooks) -> TemporalResult<Self> {
        let now = host_offset_date_time(host)?;
        Self::new(
            now.date_time,
            OpenEhrField::MINIMUM,
            FieldStates::DATE_TIME,
            ResolverMode::default(),
        )
    }

    /// Creates a date-time from an external temporal at `precision`.
    ///
    /// A date-time is returned unchanged. An inline offset is ignored, while
    /// a named time zone that is not a fixed offset is rejected.
    pub fn from_temporal(
        accessor: &TemporalAccessor,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<Self> {
        if let Some(AnyOpenEhrTemporal::DateTime(date_time)) = accessor.as_partial() {
            return Ok(*date_time);
        }
        check_precision(precision)?;
        let parsed = accessor.to_parsed();
        parsed.check_fixed_zone()?;
        let exact = iso_date_time_from_parsed(&parsed, precision)?;
        Self::new(
            exact,
            precision,
            *context.field_states(),
            context.resolver_mode(),
        )
    }

    /// Drops the time of day, keeping the precision down to the day.
    #[must_use]
    pub fn to_date(&self) -> OpenEhrDate {
        OpenEhrDate::new_unchecked(
            self.exact().date,
            self.precision_field(),
            *self.field_states(),
            self.resolver_mode(),
        )
    }

    /// Attaches `offset`, carrying over only the components backed by
    /// supplied data.
    pub fn at_offset(&self, offset: UtcOffset) -> TemporalResult<OpenEhrOffsetDateTime> {
        let exact = self.exact();
        let strict = |field: ChronoField| self.is_strictly_supported(field);
        OpenEhrOffsetDateTime::of_with_states(
            exact.date.year,
            strict(ChronoField::MonthOfYear).then_some(exact.date.month),
            strict(ChronoField::DayOfMonth).then_some(exact.date.day),
            strict(ChronoField::HourOfDay).then_some(exact.time.hour),
            strict(ChronoField::MinuteOfHour).then_some(exact.time.minute),
            strict(ChronoField::SecondOfMinute).then_some(exact.time.second),
            strict(ChronoField::NanoOfSecond).then(|| exact.time.nanosecond_of_second()),
            offset,
            self.field_states()
                .with(OpenEhrField::OffsetSeconds, FieldState::Optional),
            self.resolver_mode(),
        )
    }

    /// Collapses the date-time by precision: coarse values become a year, a
    /// year-month or a date, and nanosecond values the plain date-time.
    #[must_use]
    pub fn to_exact_or_partial(&self) -> ExactOrPartial {
        let exact = self.exact();
        match self.precision_field() {
            OpenEhrField::Years if !self.is_field_mandatory(OpenEhrField::Months) => {
                ExactOrPartial::Year(exact.date.year)
            }
            OpenEhrField::Months if !self.is_field_mandatory(OpenEhrField::Days) => {
                ExactOrPartial::YearMonth {
                    year: exact.date.year,
                    month: exact.date.month,
                }
            }
            OpenEhrField::Days if !self.is_field_mandatory(OpenEhrField::Hours) => {
                ExactOrPartial::Date(exact.date)
            }
            OpenEhrField::Nanos => ExactOrPartial::DateTime(exact),
            _ => ExactOrPartial::Partial(AnyOpenEhrTemporal::DateTime(*self)),
        }
    }
}

impl FromStr for OpenEhrTemporal<IsoDateTime> {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parsed, precision) = parsers::parse_canonical(s.as_bytes(), TemporalKind::DateTime)?;
        Self::from_temporal(
            &parsed.into(),
            precision,
            &FormatterContext::for_kind(TemporalKind::DateTime),
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use super::OpenEhrDateTime;
    use crate::{
        error::ErrorKind,
        fields::{ChronoField, FieldState, FieldStateHolder, FieldStates, OpenEhrField},
        host::FixedHost,
        iso::{IsoDate, IsoDateTime, IsoTime},
        options::{ResolverMode, TemporalUnit},
        time::EpochNanoseconds,
        ExactOrPartial, FormatterContext, OpenEhrTemporal, ParsedTemporal, TemporalAccessor,
        TemporalKind, UtcOffset,
    };
    use alloc::string::ToString;
    use core::str::FromStr;
    use writeable::assert_writeable_eq;

    fn context() -> FormatterContext {
        FormatterContext::for_kind(TemporalKind::DateTime)
    }

    #[test]
    fn of_prefers_time_precision() {
        let cases = [
            (
                (None, None, None, None, None, None),
                OpenEhrField::Years,
                "2021",
            ),
            (
                (Some(8), None, None, None, None, None),
                OpenEhrField::Months,
                "2021-08",
            ),
            (
                (Some(8), Some(6), None, None, None, None),
                OpenEhrField::Days,
                "2021-08-06",
            ),
            (
                (Some(8), Some(6), Some(4), None, None, None),
                OpenEhrField::Hours,
                "2021-08-06T04",
            ),
            (
                (Some(8), Some(6), Some(4), Some(3), None, None),
                OpenEhrField::Minutes,
                "2021-08-06T04:03",
            ),
            (
                (Some(8), Some(6), Some(4), Some(3), Some(2), None),
                OpenEhrField::Seconds,
                "2021-08-06T04:03:02",
            ),
            (
                (Some(8), Some(6), Some(4), Some(3), Some(2), Some(1_000)),
                OpenEhrField::Nanos,
                "2021-08-06T04:03:02:1000",
            ),
        ];
        for ((month, day, hour, minute, second, nanosecond), precision, rendered) in cases {
            let date_time =
                OpenEhrDateTime::of(2021, month, day, hour, minute, second, nanosecond).unwrap();
            assert_eq!(date_time.precision_field(), precision);
            assert_eq!(date_time.to_string(), rendered);
        }

        // An hour without a date still takes the time rule.
        let date_time = OpenEhrDateTime::of(2021, None, None, Some(4), None, None, None).unwrap();
        assert_eq!(date_time.precision_field(), OpenEhrField::Hours);
    }

    #[test]
    fn arithmetic_carries_into_date() {
        let date_time =
            OpenEhrDateTime::of(2021, Some(12), Some(31), Some(23), None, None, None).unwrap();
        let added = date_time.add(2, TemporalUnit::Hour).unwrap();
        assert_writeable_eq!(added, "2022-01-01T01");
        assert_eq!(added.precision_field(), OpenEhrField::Hours);

        let added = date_time.add(1, TemporalUnit::Month).unwrap();
        assert_writeable_eq!(added, "2022-01-31T23");

        let coarse = OpenEhrDateTime::of(2021, Some(8), None, None, None, None, None).unwrap();
        let changed = coarse.with_field(ChronoField::MinuteOfHour, 30).unwrap();
        assert_eq!(changed.precision_field(), OpenEhrField::Minutes);
        assert_writeable_eq!(changed, "2021-08-01T00:30");

        let later = coarse.add(3, TemporalUnit::Day).unwrap();
        assert_eq!(coarse.until(&later, TemporalUnit::Hour).unwrap(), 72);
    }

    #[test]
    fn to_date_clamps_to_days() {
        let date_time =
            OpenEhrDateTime::of(2021, Some(8), Some(6), Some(4), None, None, None).unwrap();
        let date = date_time.to_date();
        assert_eq!(date.precision_field(), OpenEhrField::Days);
        assert_writeable_eq!(date, "2021-08-06");

        let month = OpenEhrDateTime::of(2021, Some(8), None, None, None, None, None).unwrap();
        assert_eq!(month.to_date().precision_field(), OpenEhrField::Months);
    }

    #[test]
    fn at_offset_drops_implied_components() {
        let offset = UtcOffset::from_seconds(-3600).unwrap();
        // 04:03 is set below the day precision.
        let exact = IsoDateTime::new(
            IsoDate::try_new(2021, 8, 6).unwrap(),
            IsoTime::from_components(4, 3, 0, 0).unwrap(),
        )
        .unwrap();
        let date_time = OpenEhrTemporal::new(
            exact,
            OpenEhrField::Days,
            FieldStates::DATE_TIME,
            ResolverMode::Lenient,
        )
        .unwrap();
        let with_offset = date_time.at_offset(offset).unwrap();
        assert_eq!(with_offset.precision_field(), OpenEhrField::Days);
        assert_eq!(with_offset.exact().date_time.time, IsoTime::default());
        assert_eq!(with_offset.exact().offset, offset);
        assert_eq!(
            with_offset.field_states().get(OpenEhrField::OffsetSeconds),
            Some(FieldState::Optional)
        );
        assert_writeable_eq!(with_offset, "2021-08-06-01:00");
    }

    #[test]
    fn now_uses_host_offset() {
        let host = FixedHost::new(
            EpochNanoseconds::from_seconds(1_628_292_600),
            UtcOffset::from_seconds(-7200).unwrap(),
        )
        .unwrap();
        let now = OpenEhrDateTime::now_with_host(&host).unwrap();
        assert_eq!(now.precision_field(), OpenEhrField::Nanos);
        assert_writeable_eq!(now, "2021-08-06T21:30:00:00");
    }

    #[test]
    fn from_temporal_defaults_to_start_of_day() {
        let parsed = ParsedTemporal::new()
            .with_year(Some(2021))
            .with_month(Some(8))
            .with_day(Some(6))
            .with_hour(Some(4))
            .with_offset(Some(UtcOffset::UTC));
        let accessor = TemporalAccessor::from(parsed.clone());

        let date_time =
            OpenEhrDateTime::from_temporal(&accessor, OpenEhrField::Days, &context()).unwrap();
        assert_eq!(date_time.exact().time, IsoTime::default());
        assert_writeable_eq!(date_time, "2021-08-06");

        let date_time =
            OpenEhrDateTime::from_temporal(&accessor, OpenEhrField::Minutes, &context()).unwrap();
        assert_writeable_eq!(date_time, "2021-08-06T04:00");

        let zoned = TemporalAccessor::from(parsed.clone().with_time_zone(Some("Europe/Ljubljana")));
        let err =
            OpenEhrDateTime::from_temporal(&zoned, OpenEhrField::Hours, &context()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let utc = TemporalAccessor::from(parsed.with_time_zone(Some("UTC")));
        assert!(OpenEhrDateTime::from_temporal(&utc, OpenEhrField::Hours, &context()).is_ok());
    }

    #[test]
    fn from_other_kinds() {
        let date = crate::OpenEhrDate::of(2021, Some(8), Some(6)).unwrap();
        let date_time =
            OpenEhrDateTime::from_temporal(&date.into(), OpenEhrField::Days, &context()).unwrap();
        assert_writeable_eq!(date_time, "2021-08-06");

        let err = OpenEhrDateTime::from_temporal(&date.into(), OpenEhrField::Hours, &context())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn exactness_collapse() {
        let date = OpenEhrDateTime::of(2021, Some(8), Some(6), None, None, None, None).unwrap();
        assert_eq!(
            date.to_exact_or_partial(),
            ExactOrPartial::Date(IsoDate::try_new(2021, 8, 6).unwrap())
        );
        let hours = OpenEhrDateTime::of(2021, Some(8), Some(6), Some(4), None, None, None).unwrap();
        assert_eq!(hours.to_exact_or_partial(), ExactOrPartial::Partial(hours.into()));
        let nanos = hours.with_field(ChronoField::NanoOfSecond, 0).unwrap();
        assert_eq!(nanos.to_exact_or_partial(), ExactOrPartial::DateTime(nanos.exact()));

        let forced = date.with_field_states(
            FieldStates::DATE_TIME.with(OpenEhrField::Hours, FieldState::Mandatory),
        );
        assert_eq!(forced.to_exact_or_partial(), ExactOrPartial::Partial(forced.into()));
    }

    #[test]
    fn round_trips() {
        for source in [
            "2021",
            "2021-08",
            "2021-08-06",
            "2021-08-06T04",
            "2021-08-06T04:03:02:500000000",
        ] {
            let date_time = OpenEhrDateTime::from_str(source).unwrap();
            assert_eq!(date_time.to_string(), source);

            let accessor = TemporalAccessor::from(date_time.to_exact_or_partial());
            let rebuilt =
                OpenEhrDateTime::from_temporal(&accessor, date_time.precision_field(), &context())
                    .unwrap();
            assert_eq!(rebuilt, date_time, "{source}");
        }
        assert!(OpenEhrDateTime::from_str("2021-08-06T04Z").is_err());
    }
}
