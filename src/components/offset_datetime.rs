//! This module implements `OpenEhrOffsetDateTime` and any directly related
//! algorithms.

use core::str::FromStr;

use crate::{
    error::ErrorMessage,
    fields::{FieldStateHolder, FieldStates, OpenEhrField},
    host::HostHooks,
    iso::{IsoOffsetDateTime, IsoOffsetTime},
    options::ResolverMode,
    parsers, TemporalError, TemporalResult, UtcOffset,
};

use super::{
    datetime::{date_time_precision, iso_date_time_from_parsed, iso_date_time_of},
    now::host_offset_date_time,
    partial::check_precision,
    AnyOpenEhrTemporal, ExactOrPartial, FormatterContext, OpenEhrDateTime, OpenEhrOffsetTime,
    OpenEhrTemporal, TemporalAccessor, TemporalKind,
};

/// A date-time observed at a fixed UTC offset, precise to any field from the
/// year down to the nanosecond.
///
/// ```rust
/// use openehr_temporal::{OpenEhrField, OpenEhrOffsetDateTime, UtcOffset};
///
/// let offset = UtcOffset::from_seconds(7200).unwrap();
/// let date_time =
///     OpenEhrOffsetDateTime::of(2021, Some(8), Some(6), Some(4), Some(3), Some(2), None, offset)
///         .unwrap();
///
/// let utc = date_time.with_offset_same_instant(UtcOffset::UTC).unwrap();
/// assert_eq!(utc.precision_field(), OpenEhrField::Seconds);
/// assert_eq!(utc.to_string(), "2021-08-06T02:03:02Z");
/// ```
pub type OpenEhrOffsetDateTime = OpenEhrTemporal<IsoOffsetDateTime>;

impl OpenEhrTemporal<IsoOffsetDateTime> {
    /// Creates an offset date-time with the default offset date-time field
    /// states.
    #[allow(clippy::too_many_arguments)]
    pub fn of(
        year: i32,
        month: Option<u8>,
        day: Option<u8>,
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
        nanosecond: Option<u32>,
        offset: UtcOffset,
    ) -> TemporalResult<Self> {
        Self::of_with_states(
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond,
            offset,
            FieldStates::OFFSET_DATE_TIME,
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
        offset: UtcOffset,
        field_states: FieldStates,
        resolver_mode: ResolverMode,
    ) -> TemporalResult<Self> {
        let date_time = iso_date_time_of(year, month, day, hour, minute, second, nanosecond)?;
        Self::new(
            IsoOffsetDateTime::new_unchecked(date_time, offset),
            date_time_precision(month, day, hour, minute, second, nanosecond),
            field_states,
            resolver_mode,
        )
    }

    /// Returns the current date-time and offset observed by the system.
    #[cfg(feature = "sys")]
    pub fn now() -> TemporalResult<Self> {
        Self::now_with_host(&crate::sys::SystemHost)
    }

    /// Returns the current date-time and offset observed by `host`.
    pub fn now_with_host(host: &impl HostHooks) -> TemporalResult<Self> {
        Self::new(
            host_offset_date_time(host)?,
            OpenEhrField::MINIMUM,
            FieldStates::OFFSET_DATE_TIME,
            ResolverMode::default(),
        )
    }

    /// Creates an offset date-time from an external temporal at `precision`.
    ///
    /// The offset is read from the inline offset or, failing that, from a
    /// time zone that is a fixed offset. Date-level precisions yield the
    /// start of the day.
    pub fn from_temporal(
        accessor: &TemporalAccessor,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<Self> {
        if let Some(AnyOpenEhrTemporal::OffsetDateTime(date_time)) = accessor.as_partial() {
            return Ok(*date_time);
        }
        check_precision(precision)?;
        let parsed = accessor.to_parsed();
        parsed.check_fixed_zone()?;
        let offset = parsed
            .resolved_offset()?
            .ok_or(TemporalError::invalid_input().with_enum(ErrorMessage::MissingOffset))?;
        let date_time = iso_date_time_from_parsed(&parsed, precision)?;
        Self::new(
            IsoOffsetDateTime::new_unchecked(date_time, offset),
            precision,
            *context.field_states(),
            context.resolver_mode(),
        )
    }

    /// Returns the offset of this value.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> UtcOffset {
        self.exact().offset
    }

    /// Drops the offset, keeping the precision.
    #[must_use]
    pub fn to_date_time(&self) -> OpenEhrDateTime {
        OpenEhrDateTime::new_unchecked(
            self.exact().date_time,
            self.precision_field(),
            *self.field_states(),
            self.resolver_mode(),
        )
    }

    /// Drops the date, keeping the precision.
    ///
    /// A value precise to a date field keeps only its offset as supported.
    #[must_use]
    pub fn to_offset_time(&self) -> OpenEhrOffsetTime {
        let exact = self.exact();
        OpenEhrOffsetTime::new_unchecked(
            IsoOffsetTime::new_unchecked(exact.date_time.time, exact.offset),
            self.precision_field(),
            *self.field_states(),
            self.resolver_mode(),
        )
    }

    /// Returns the same instant observed at `offset`, at the same precision.
    ///
    /// The value is returned unchanged when `offset` is already its offset.
    pub fn with_offset_same_instant(&self, offset: UtcOffset) -> TemporalResult<Self> {
        if self.offset() == offset {
            return Ok(*self);
        }
        let exact = self.exact().with_offset_same_instant(offset)?;
        Ok(Self::new_unchecked(
            exact,
            self.precision_field(),
            *self.field_states(),
            self.resolver_mode(),
        ))
    }

    /// Collapses the value like a date-time, with nanosecond values becoming
    /// the plain offset date-time.
    #[must_use]
    pub fn to_exact_or_partial(&self) -> ExactOrPartial {
        if self.precision_field() == OpenEhrField::Nanos {
            return ExactOrPartial::OffsetDateTime(self.exact());
        }
        ExactOrPartial::Partial(AnyOpenEhrTemporal::OffsetDateTime(*self))
    }
}

impl FromStr for OpenEhrTemporal<IsoOffsetDateTime> {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parsed, precision) =
            parsers::parse_canonical(s.as_bytes(), TemporalKind::OffsetDateTime)?;
        Self::from_temporal(
            &parsed.into(),
            precision,
            &FormatterContext::for_kind(TemporalKind::OffsetDateTime),
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use super::OpenEhrOffsetDateTime;
    use crate::{
        error::ErrorKind,
        fields::{ChronoField, FieldState, FieldStateHolder, FieldStates, OpenEhrField},
        host::FixedHost,
        iso::IsoTime,
        options::{ResolverMode, TemporalUnit},
        time::EpochNanoseconds,
        ExactOrPartial, FormatterContext, OpenEhrDateTime, ParsedTemporal, TemporalAccessor,
        TemporalKind, UtcOffset,
    };
    use alloc::string::ToString;
    use core::str::FromStr;
    use writeable::assert_writeable_eq;

    fn plus_two() -> UtcOffset {
        UtcOffset::from_seconds(7200).unwrap()
    }

    fn context() -> FormatterContext {
        FormatterContext::for_kind(TemporalKind::OffsetDateTime)
    }

    #[test]
    fn same_instant_at_utc() {
        let date_time = OpenEhrOffsetDateTime::of(
            2021,
            Some(8),
            Some(6),
            Some(4),
            Some(3),
            Some(2),
            None,
            plus_two(),
        )
        .unwrap();
        let utc = date_time.with_offset_same_instant(UtcOffset::UTC).unwrap();
        assert_eq!(utc.precision_field(), OpenEhrField::Seconds);
        assert_eq!(utc.offset(), UtcOffset::UTC);
        assert_writeable_eq!(utc, "2021-08-06T02:03:02Z");
        assert_eq!(utc.field_states(), date_time.field_states());

        // Instants compare equal, local date-times do not.
        assert_eq!(utc.until(&date_time, TemporalUnit::Second).unwrap(), 0);
        assert_ne!(utc, date_time);
    }

    #[test]
    fn same_offset_is_unchanged() {
        let date_time = OpenEhrOffsetDateTime::of(
            2021,
            Some(8),
            None,
            None,
            None,
            None,
            None,
            plus_two(),
        )
        .unwrap()
        .with_resolver_mode(ResolverMode::Strict);
        let same = date_time.with_offset_same_instant(plus_two()).unwrap();
        assert_eq!(same.exact(), date_time.exact());
        assert_eq!(same.resolver_mode(), ResolverMode::Strict);
        assert_eq!(same.precision_field(), OpenEhrField::Months);
    }

    #[test]
    fn conversions_keep_precision() {
        let date_time = OpenEhrOffsetDateTime::of(
            2021,
            Some(8),
            Some(6),
            Some(4),
            Some(3),
            None,
            None,
            UtcOffset::from_seconds(-19_800).unwrap(),
        )
        .unwrap();
        assert_writeable_eq!(date_time, "2021-08-06T04:03-05:30");

        let local = date_time.to_date_time();
        assert_eq!(local.precision_field(), OpenEhrField::Minutes);
        assert_writeable_eq!(local, "2021-08-06T04:03");

        let time = date_time.to_offset_time();
        assert_eq!(time.precision_field(), OpenEhrField::Minutes);
        assert_writeable_eq!(time, "04:03-05:30");

        let day =
            OpenEhrOffsetDateTime::of(2021, Some(8), Some(6), None, None, None, None, plus_two())
                .unwrap();
        let midnight = day.to_offset_time();
        assert_eq!(midnight.precision_field(), OpenEhrField::Days);
        assert!(!midnight.is_field_supported(ChronoField::HourOfDay));
        assert_writeable_eq!(midnight, "+02:00");
    }

    #[test]
    fn offset_field() {
        let date_time =
            OpenEhrOffsetDateTime::of(2021, None, None, None, None, None, None, plus_two())
                .unwrap();
        assert_eq!(date_time.get(ChronoField::OffsetSeconds).unwrap(), 7200);
        let moved = date_time.with_field(ChronoField::OffsetSeconds, -3600).unwrap();
        assert_eq!(moved.precision_field(), OpenEhrField::Years);
        assert_writeable_eq!(moved, "2021-01:00");

        let hidden = date_time.with_field_states(
            FieldStates::OFFSET_DATE_TIME.with(OpenEhrField::OffsetSeconds, FieldState::Forbidden),
        );
        assert!(!hidden.is_field_supported(ChronoField::OffsetSeconds));
        assert_writeable_eq!(hidden, "2021");
        assert!(OpenEhrDateTime::of(2021, None, None, None, None, None, None)
            .unwrap()
            .get(ChronoField::OffsetSeconds)
            .is_err());
    }

    #[test]
    fn now_carries_host_offset() {
        let host = FixedHost::new(
            EpochNanoseconds::from_seconds(1_628_292_600),
            plus_two(),
        )
        .unwrap();
        let now = OpenEhrOffsetDateTime::now_with_host(&host).unwrap();
        assert_eq!(now.offset(), plus_two());
        assert_writeable_eq!(now, "2021-08-07T01:30:00:00+02:00");
        assert_eq!(now.to_exact_or_partial(), ExactOrPartial::OffsetDateTime(now.exact()));
    }

    #[test]
    fn from_temporal_reads_offset() {
        let parsed = ParsedTemporal::new()
            .with_year(Some(2021))
            .with_month(Some(8))
            .with_day(Some(6))
            .with_hour(Some(4));

        let inline = TemporalAccessor::from(parsed.clone().with_offset(Some(plus_two())));
        let date_time =
            OpenEhrOffsetDateTime::from_temporal(&inline, OpenEhrField::Hours, &context()).unwrap();
        assert_writeable_eq!(date_time, "2021-08-06T04+02:00");

        let start_of_day =
            OpenEhrOffsetDateTime::from_temporal(&inline, OpenEhrField::Days, &context()).unwrap();
        assert_eq!(start_of_day.exact().date_time.time, IsoTime::default());

        let zoned = TemporalAccessor::from(parsed.clone().with_time_zone(Some("+02:00")));
        let date_time =
            OpenEhrOffsetDateTime::from_temporal(&zoned, OpenEhrField::Hours, &context()).unwrap();
        assert_eq!(date_time.offset(), plus_two());

        let missing = TemporalAccessor::from(parsed.clone());
        let err = OpenEhrOffsetDateTime::from_temporal(&missing, OpenEhrField::Hours, &context())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn named_zone_is_rejected() {
        let accessor = TemporalAccessor::from(
            ParsedTemporal::new()
                .with_year(Some(2021))
                .with_month(Some(8))
                .with_day(Some(6))
                .with_hour(Some(4))
                .with_offset(Some(plus_two()))
                .with_time_zone(Some("Europe/Ljubljana")),
        );
        let err = OpenEhrOffsetDateTime::from_temporal(&accessor, OpenEhrField::Hours, &context())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let source =
            TemporalAccessor::from_utf8(b"2021-08-06T04:03+02:00[Europe/Ljubljana]").unwrap();
        assert!(OpenEhrOffsetDateTime::from_temporal(&source, OpenEhrField::Minutes, &context())
            .is_err());
    }

    #[test]
    fn round_trips() {
        for source in [
            "2021Z",
            "2021-08+02:00",
            "2021-08-06T04Z",
            "2021-08-06T04:03:02-05:30",
            "2021-08-06T04:03:02:123000000+01:00",
        ] {
            let date_time = OpenEhrOffsetDateTime::from_str(source).unwrap();
            assert_eq!(date_time.to_string(), source);

            let accessor = TemporalAccessor::from(date_time.to_exact_or_partial());
            let rebuilt = OpenEhrOffsetDateTime::from_temporal(
                &accessor,
                date_time.precision_field(),
                &context(),
            )
            .unwrap();
            assert_eq!(rebuilt, date_time, "{source}");
        }
        assert!(OpenEhrOffsetDateTime::from_str("2021-08-06T04").is_err());
    }
}
