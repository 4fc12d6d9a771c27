//! This module implements `OpenEhrOffsetTime` and any directly related
//! algorithms.

use core::str::FromStr;

use crate::{
    error::ErrorMessage,
    fields::{FieldStateHolder, FieldStates, OpenEhrField},
    host::HostHooks,
    iso::{IsoOffsetTime, IsoTime},
    options::ResolverMode,
    parsers, TemporalError, TemporalResult, TemporalUnwrap, UtcOffset,
};

use super::{
    now::host_offset_date_time, partial::check_precision, AnyOpenEhrTemporal, ExactOrPartial,
    FormatterContext, OpenEhrTemporal, OpenEhrTime, TemporalAccessor, TemporalKind,
};

/// A time of day observed at a fixed UTC offset.
///
/// ```rust
/// use openehr_temporal::{OpenEhrField, OpenEhrOffsetTime, UtcOffset};
///
/// let time = OpenEhrOffsetTime::of(4, Some(3), None, None, UtcOffset::UTC).unwrap();
/// assert_eq!(time.precision_field(), OpenEhrField::Minutes);
/// assert_eq!(time.to_string(), "04:03Z");
/// ```
pub type OpenEhrOffsetTime = OpenEhrTemporal<IsoOffsetTime>;

/// The ways an offset time is read from an external temporal, tried in
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extraction {
    /// A time with an inline offset.
    Direct,
    /// The time and offset of a full offset date-time.
    OffsetDateTime,
    /// The time of a full date-time, at the offset of its time zone.
    Zoned,
}

impl Extraction {
    const ALL: [Self; 3] = [Self::Direct, Self::OffsetDateTime, Self::Zoned];

    fn extract(self, accessor: &TemporalAccessor) -> TemporalResult<IsoOffsetTime> {
        match self {
            Self::Direct => {
                let parsed = accessor.to_parsed();
                let offset = parsed
                    .offset
                    .ok_or(TemporalError::invalid_input().with_enum(ErrorMessage::MissingOffset))?;
                Ok(IsoOffsetTime::new_unchecked(parsed.require_time()?, offset))
            }
            Self::OffsetDateTime => {
                if let Some(AnyOpenEhrTemporal::OffsetDateTime(date_time)) = accessor.as_partial() {
                    let exact = date_time.exact();
                    return Ok(IsoOffsetTime::new_unchecked(exact.date_time.time, exact.offset));
                }
                let parsed = accessor.to_parsed();
                parsed.require_day()?;
                parsed.require_month()?;
                parsed.require_year()?;
                let offset = parsed
                    .offset
                    .ok_or(TemporalError::invalid_input().with_enum(ErrorMessage::MissingOffset))?;
                Ok(IsoOffsetTime::new_unchecked(parsed.require_time()?, offset))
            }
            Self::Zoned => {
                let parsed = accessor.to_parsed();
                parsed.require_day()?;
                parsed.require_month()?;
                parsed.require_year()?;
                let offset = parsed
                    .zone_offset()?
                    .ok_or(TemporalError::invalid_input().with_enum(ErrorMessage::MissingOffset))?;
                Ok(IsoOffsetTime::new_unchecked(parsed.require_time()?, offset))
            }
        }
    }
}

impl OpenEhrTemporal<IsoOffsetTime> {
    /// Creates an offset time with the default offset time field states.
    pub fn of(
        hour: u8,
        minute: Option<u8>,
        second: Option<u8>,
        nanosecond: Option<u32>,
        offset: UtcOffset,
    ) -> TemporalResult<Self> {
        Self::of_with_states(
            hour,
            minute,
            second,
            nanosecond,
            offset,
            FieldStates::OFFSET_TIME,
            ResolverMode::default(),
        )
    }

    pub fn of_with_states(
        hour: u8,
        minute: Option<u8>,
        second: Option<u8>,
        nanosecond: Option<u32>,
        offset: UtcOffset,
        field_states: FieldStates,
        resolver_mode: ResolverMode,
    ) -> TemporalResult<Self> {
        let time = IsoTime::from_components(
            hour,
            minute.unwrap_or(0),
            second.unwrap_or(0),
            nanosecond.unwrap_or(0),
        )?;
        let precision =
            OpenEhrTime::precision_of(Some(hour), minute, second, nanosecond).temporal_unwrap()?;
        Self::new(
            IsoOffsetTime::new_unchecked(time, offset),
            precision,
            field_states,
            resolver_mode,
        )
    }

    /// Returns the current time of day and offset observed by the system.
    #[cfg(feature = "sys")]
    pub fn now() -> TemporalResult<Self> {
        Self::now_with_host(&crate::sys::SystemHost)
    }

    /// Returns the current time of day and offset observed by `host`.
    pub fn now_with_host(host: &impl HostHooks) -> TemporalResult<Self> {
        let now = host_offset_date_time(host)?;
        Self::new(
            IsoOffsetTime::new_unchecked(now.date_time.time, now.offset),
            OpenEhrField::MINIMUM,
            FieldStates::OFFSET_TIME,
            ResolverMode::default(),
        )
    }

    /// Creates an offset time from an external temporal at `precision`.
    ///
    /// An offset time is returned unchanged. Otherwise the time is read with
    /// an inline offset, then from a full offset date-time, then from a full
    /// date-time in a fixed-offset time zone. A strict `context` only allows
    /// the first.
    pub fn from_temporal(
        accessor: &TemporalAccessor,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<Self> {
        if let Some(AnyOpenEhrTemporal::OffsetTime(time)) = accessor.as_partial() {
            return Ok(*time);
        }
        check_precision(precision)?;
        accessor.to_parsed().check_fixed_zone()?;
        let attempts = if context.is_strict() {
            1
        } else {
            Extraction::ALL.len()
        };
        for strategy in Extraction::ALL.into_iter().take(attempts) {
            match strategy.extract(accessor) {
                Ok(exact) => {
                    return Self::new(
                        exact,
                        precision,
                        *context.field_states(),
                        context.resolver_mode(),
                    )
                }
                Err(_error) => {
                    #[cfg(feature = "log")]
                    log::debug!("offset time extraction {strategy:?} failed: {_error}");
                }
            }
        }
        Err(TemporalError::invalid_input().with_enum(ErrorMessage::InvalidTime))
    }

    /// Returns the offset of this value.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> UtcOffset {
        self.exact().offset
    }

    /// Drops the offset, keeping the precision.
    #[must_use]
    pub fn to_time(&self) -> OpenEhrTime {
        OpenEhrTime::new_unchecked(
            self.exact().time,
            self.precision_field(),
            *self.field_states(),
            self.resolver_mode(),
        )
    }

    /// Collapses the value to a plain offset time at nanosecond precision.
    #[must_use]
    pub fn to_exact_or_partial(&self) -> ExactOrPartial {
        if self.precision_field() == OpenEhrField::Nanos {
            return ExactOrPartial::OffsetTime(self.exact());
        }
        ExactOrPartial::Partial(AnyOpenEhrTemporal::OffsetTime(*self))
    }
}

impl FromStr for OpenEhrTemporal<IsoOffsetTime> {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parsed, precision) = parsers::parse_canonical(s.as_bytes(), TemporalKind::OffsetTime)?;
        Self::from_temporal(
            &parsed.into(),
            precision,
            &FormatterContext::for_kind(TemporalKind::OffsetTime),
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use super::OpenEhrOffsetTime;
    use crate::{
        error::ErrorKind,
        fields::{ChronoField, OpenEhrField},
        host::EmptyHostSystem,
        iso::IsoOffsetTime,
        options::{ResolverMode, TemporalUnit},
        ExactOrPartial, FormatterContext, OpenEhrOffsetDateTime, ParsedTemporal, TemporalAccessor,
        TemporalKind, UtcOffset,
    };
    use alloc::string::ToString;
    use core::str::FromStr;
    use writeable::assert_writeable_eq;

    fn context() -> FormatterContext {
        FormatterContext::for_kind(TemporalKind::OffsetTime)
    }

    fn full_date_time() -> ParsedTemporal {
        ParsedTemporal::new()
            .with_year(Some(2021))
            .with_month(Some(8))
            .with_day(Some(6))
            .with_hour(Some(4))
            .with_minute(Some(3))
    }

    #[test]
    fn of_and_render() {
        let offset = UtcOffset::from_seconds(-9000).unwrap();
        let time = OpenEhrOffsetTime::of(4, None, None, None, offset).unwrap();
        assert_eq!(time.precision_field(), OpenEhrField::Hours);
        assert_writeable_eq!(time, "04-02:30");
        assert_eq!(time.offset(), offset);
        assert_writeable_eq!(time.to_time(), "04");

        let time = OpenEhrOffsetTime::of(4, Some(3), Some(2), Some(1), UtcOffset::UTC).unwrap();
        assert_writeable_eq!(time, "04:03:02:01Z");
    }

    #[test]
    fn ordering_follows_the_instant() {
        let plus_two = UtcOffset::from_seconds(7200).unwrap();
        let early = OpenEhrOffsetTime::of(4, None, None, None, plus_two).unwrap();
        let late = OpenEhrOffsetTime::of(3, None, None, None, UtcOffset::UTC).unwrap();
        assert!(early < late);
        assert_eq!(early.until(&late, TemporalUnit::Hour).unwrap(), 1);
        assert!(early.add(1, TemporalUnit::Day).is_err());
        assert_eq!(early.get(ChronoField::OffsetSeconds).unwrap(), 7200);
    }

    #[test]
    fn now_from_empty_host() {
        let now = OpenEhrOffsetTime::now_with_host(&EmptyHostSystem).unwrap();
        assert_writeable_eq!(now, "00:00:00:00Z");
        assert_eq!(now.to_exact_or_partial(), ExactOrPartial::OffsetTime(now.exact()));
    }

    #[test]
    fn extraction_order() {
        // Direct.
        let direct = TemporalAccessor::from(
            ParsedTemporal::new()
                .with_hour(Some(4))
                .with_offset(Some(UtcOffset::UTC)),
        );
        let time =
            OpenEhrOffsetTime::from_temporal(&direct, OpenEhrField::Hours, &context()).unwrap();
        assert_writeable_eq!(time, "04Z");

        // Through a fixed-offset time zone.
        let zoned = TemporalAccessor::from(full_date_time().with_time_zone(Some("-05:00")));
        let time =
            OpenEhrOffsetTime::from_temporal(&zoned, OpenEhrField::Minutes, &context()).unwrap();
        assert_writeable_eq!(time, "04:03-05:00");
        let strict = context().with_resolver_mode(ResolverMode::Strict);
        let err =
            OpenEhrOffsetTime::from_temporal(&zoned, OpenEhrField::Minutes, &strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // Through an offset date-time whose time is not rendered.
        let date_time = OpenEhrOffsetDateTime::of(
            2021,
            Some(8),
            Some(6),
            None,
            None,
            None,
            None,
            UtcOffset::UTC,
        )
        .unwrap()
        .with_field(ChronoField::OffsetSeconds, 3600)
        .unwrap();
        let time =
            OpenEhrOffsetTime::from_temporal(&date_time.into(), OpenEhrField::Hours, &context())
                .unwrap();
        assert_eq!(
            time.exact(),
            IsoOffsetTime::default().with_field(ChronoField::OffsetSeconds, 3600).unwrap()
        );
    }

    #[test]
    fn named_zone_is_rejected() {
        let zoned =
            TemporalAccessor::from(full_date_time().with_time_zone(Some("America/New_York")));
        let err = OpenEhrOffsetTime::from_temporal(&zoned, OpenEhrField::Minutes, &context())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let inline = TemporalAccessor::from(
            ParsedTemporal::new()
                .with_hour(Some(4))
                .with_offset(Some(UtcOffset::from_seconds(7200).unwrap()))
                .with_time_zone(Some("Europe/Paris")),
        );
        let err = OpenEhrOffsetTime::from_temporal(&inline, OpenEhrField::Minutes, &context())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let date = TemporalAccessor::from(ParsedTemporal::new().with_year(Some(2021)));
        let err =
            OpenEhrOffsetTime::from_temporal(&date, OpenEhrField::Hours, &context()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn round_trips() {
        for source in ["04Z", "04:03+02:00", "04:03:02-05:30", "04:03:02:500000000+01:00:30"] {
            let time = OpenEhrOffsetTime::from_str(source).unwrap();
            assert_eq!(time.to_string(), source);

            let accessor = TemporalAccessor::from(time.to_exact_or_partial());
            let rebuilt =
                OpenEhrOffsetTime::from_temporal(&accessor, time.precision_field(), &context())
                    .unwrap();
            assert_eq!(rebuilt, time, "{source}");
        }
        assert!(OpenEhrOffsetTime::from_str("04:03").is_err());
    }
}
