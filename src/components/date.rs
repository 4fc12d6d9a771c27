//! This module implements `OpenEhrDate` and any directly related algorithms.

use core::str::FromStr;

use crate::{
    fields::{FieldStateHolder, FieldStates, OpenEhrField},
    host::HostHooks,
    iso::IsoDate,
    options::ResolverMode,
    parsers, TemporalError, TemporalResult,
};

use super::{
    now::host_offset_date_time, partial::check_precision, AnyOpenEhrTemporal, ExactOrPartial,
    FormatterContext, OpenEhrTemporal, TemporalAccessor, TemporalKind,
};

/// A calendar date precise to the year, the month or the day.
///
/// ```rust
/// use openehr_temporal::{ExactOrPartial, OpenEhrDate, OpenEhrField};
///
/// let date = OpenEhrDate::of(2021, Some(8), None).unwrap();
/// assert_eq!(date.precision_field(), OpenEhrField::Months);
/// assert_eq!(
///     date.to_exact_or_partial(),
///     ExactOrPartial::YearMonth { year: 2021, month: 8 }
/// );
/// ```
pub type OpenEhrDate = OpenEhrTemporal<IsoDate>;

impl OpenEhrTemporal<IsoDate> {
    /// Infers the precision of a date from the components supplied.
    #[must_use]
    pub fn precision_of(month: Option<u8>, day: Option<u8>) -> OpenEhrField {
        match (month, day) {
            (None, _) => OpenEhrField::Years,
            (Some(_), None) => OpenEhrField::Months,
            _ => OpenEhrField::Days,
        }
    }

    /// Creates a date with the default date field states.
    ///
    /// Omitted components default to 1 and the precision is the finest
    /// component supplied.
    pub fn of(year: i32, month: Option<u8>, day: Option<u8>) -> TemporalResult<Self> {
        Self::of_with_states(year, month, day, FieldStates::DATE, ResolverMode::default())
    }

    pub fn of_with_states(
        year: i32,
        month: Option<u8>,
        day: Option<u8>,
        field_states: FieldStates,
        resolver_mode: ResolverMode,
    ) -> TemporalResult<Self> {
        let exact = IsoDate::try_new(year, month.unwrap_or(1), day.unwrap_or(1))?;
        Self::new(
            exact,
            Self::precision_of(month, day),
            field_states,
            resolver_mode,
        )
    }

    /// Returns the current date observed by the system.
    #[cfg(feature = "sys")]
    pub fn now() -> TemporalResult<Self> {
        Self::now_with_host(&crate::sys::SystemHost)
    }

    /// Returns the current date observed by `host`.
    pub fn now_with_host(host: &impl HostHooks) -> TemporalResult<Self> {
        let now = host_offset_date_time(host)?;
        Self::new(
            now.date_time.date,
            OpenEhrField::MINIMUM,
            FieldStates::DATE,
            ResolverMode::default(),
        )
    }

    /// Creates a date from an external temporal at `precision`.
    ///
    /// A date is returned unchanged. Otherwise the year, the month and the
    /// day are read as far as `precision` requires.
    pub fn from_temporal(
        accessor: &TemporalAccessor,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<Self> {
        if let Some(AnyOpenEhrTemporal::Date(date)) = accessor.as_partial() {
            return Ok(*date);
        }
        check_precision(precision)?;
        let parsed = accessor.to_parsed();
        let year = parsed.require_year()?;
        let exact = match precision {
            OpenEhrField::Years => IsoDate::try_new(year, 1, 1)?,
            OpenEhrField::Months => IsoDate::try_new(year, parsed.require_month()?, 1)?,
            _ => IsoDate::try_new(year, parsed.require_month()?, parsed.require_day()?)?,
        };
        Self::new(
            exact,
            precision,
            *context.field_states(),
            context.resolver_mode(),
        )
    }

    /// Collapses the date to a year, a year-month or a plain date when the
    /// next finer field is not mandatory.
    #[must_use]
    pub fn to_exact_or_partial(&self) -> ExactOrPartial {
        let exact = self.exact();
        match self.precision_field() {
            OpenEhrField::Years if !self.is_field_mandatory(OpenEhrField::Months) => {
                ExactOrPartial::Year(exact.year)
            }
            OpenEhrField::Months if !self.is_field_mandatory(OpenEhrField::Days) => {
                ExactOrPartial::YearMonth {
                    year: exact.year,
                    month: exact.month,
                }
            }
            OpenEhrField::Days if !self.is_field_mandatory(OpenEhrField::Hours) => {
                ExactOrPartial::Date(exact)
            }
            _ => ExactOrPartial::Partial(AnyOpenEhrTemporal::Date(*self)),
        }
    }
}

impl FromStr for OpenEhrTemporal<IsoDate> {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parsed, precision) = parsers::parse_canonical(s.as_bytes(), TemporalKind::Date)?;
        Self::from_temporal(
            &parsed.into(),
            precision,
            &FormatterContext::for_kind(TemporalKind::Date),
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use super::OpenEhrDate;
    use crate::{
        error::ErrorKind,
        fields::{ChronoField, FieldState, FieldStates, OpenEhrField},
        host::FixedHost,
        iso::IsoDate,
        options::{ResolverMode, TemporalUnit},
        time::EpochNanoseconds,
        ExactOrPartial, FormatterContext, ParsedTemporal, TemporalAccessor, UtcOffset,
    };
    use alloc::string::ToString;
    use core::str::FromStr;
    use writeable::assert_writeable_eq;

    #[test]
    fn of_infers_precision() {
        let date = OpenEhrDate::of(2021, None, None).unwrap();
        assert_eq!(date.precision_field(), OpenEhrField::Years);
        assert_writeable_eq!(date, "2021");

        let date = OpenEhrDate::of(2021, Some(8), None).unwrap();
        assert_eq!(date.precision_field(), OpenEhrField::Months);
        assert_writeable_eq!(date, "2021-08");

        let date = OpenEhrDate::of(2021, Some(8), Some(6)).unwrap();
        assert_eq!(date.precision_field(), OpenEhrField::Days);
        assert_writeable_eq!(date, "2021-08-06");

        assert_writeable_eq!(OpenEhrDate::of(-44, Some(3), Some(15)).unwrap(), "-44-03-15");
        assert_eq!(
            OpenEhrDate::of(2021, Some(2), Some(29)).unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn arithmetic_keeps_day_floor() {
        let date = OpenEhrDate::of(2021, Some(1), None).unwrap();
        let added = date.add(1, TemporalUnit::Month).unwrap();
        assert_eq!(added.precision_field(), OpenEhrField::Months);
        assert_writeable_eq!(added, "2021-02");

        let added = date.add(36, TemporalUnit::Hour);
        assert_eq!(added.unwrap_err().kind(), ErrorKind::UnsupportedField);

        let changed = date.with_field(ChronoField::DayOfMonth, 31).unwrap();
        assert_eq!(changed.precision_field(), OpenEhrField::Days);
        assert_writeable_eq!(changed, "2021-01-31");
        let next = changed.add(1, TemporalUnit::Month).unwrap();
        assert_writeable_eq!(next, "2021-02-28");

        assert!(!changed.is_field_supported(ChronoField::HourOfDay));
        assert_eq!(changed.get(ChronoField::DayOfWeek).unwrap(), 7);
    }

    #[test]
    fn now_is_clamped_to_days() {
        // 2021-08-06T23:30:00Z observed at +02:00.
        let host = FixedHost::new(
            EpochNanoseconds::from_seconds(1_628_292_600),
            UtcOffset::from_seconds(7200).unwrap(),
        )
        .unwrap();
        let date = OpenEhrDate::now_with_host(&host).unwrap();
        assert_eq!(date.precision_field(), OpenEhrField::Days);
        assert_writeable_eq!(date, "2021-08-07");
    }

    #[test]
    fn from_temporal() {
        let context = FormatterContext::for_kind(crate::TemporalKind::Date);
        let accessor = TemporalAccessor::from(
            ParsedTemporal::new()
                .with_year(Some(2021))
                .with_month(Some(8))
                .with_day(Some(6)),
        );
        let date = OpenEhrDate::from_temporal(&accessor, OpenEhrField::Months, &context).unwrap();
        assert_writeable_eq!(date, "2021-08");
        assert_eq!(date.exact().day, 1);

        let date = OpenEhrDate::from_temporal(&accessor, OpenEhrField::Seconds, &context).unwrap();
        assert_eq!(date.precision_field(), OpenEhrField::Days);

        let year_only = TemporalAccessor::from(ParsedTemporal::new().with_year(Some(2021)));
        let err = OpenEhrDate::from_temporal(&year_only, OpenEhrField::Days, &context).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = OpenEhrDate::from_temporal(&accessor, OpenEhrField::OffsetSeconds, &context)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldMapping);

        let original = OpenEhrDate::of_with_states(
            2020,
            None,
            None,
            FieldStates::DATE.with(OpenEhrField::Months, FieldState::Mandatory),
            ResolverMode::Strict,
        )
        .unwrap();
        let same =
            OpenEhrDate::from_temporal(&original.into(), OpenEhrField::Days, &context).unwrap();
        assert_eq!(same.resolver_mode(), ResolverMode::Strict);
        assert_eq!(same, original);
    }

    #[test]
    fn exactness_collapse() {
        let year = OpenEhrDate::of(2021, None, None).unwrap();
        assert_eq!(year.to_exact_or_partial(), ExactOrPartial::Year(2021));

        let forced = year.with_field_states(
            FieldStates::DATE.with(OpenEhrField::Months, FieldState::Mandatory),
        );
        assert_eq!(
            forced.to_exact_or_partial(),
            ExactOrPartial::Partial(forced.into())
        );

        let date = OpenEhrDate::of(2021, Some(8), Some(6)).unwrap();
        assert_eq!(
            date.to_exact_or_partial(),
            ExactOrPartial::Date(IsoDate::try_new(2021, 8, 6).unwrap())
        );
    }

    #[test]
    fn round_trip_through_text() {
        for source in ["2021", "2021-08", "2021-08-06", "-0044-03"] {
            let date = OpenEhrDate::from_str(source).unwrap();
            let rendered = date.to_string();
            assert_eq!(OpenEhrDate::from_str(&rendered).unwrap(), date, "{source}");
        }
        assert_eq!(OpenEhrDate::from_str("-0044-03").unwrap().to_string(), "-44-03");
        assert!(OpenEhrDate::from_str("2021-13").is_err());
    }

    #[test]
    fn round_trip_through_exact_form() {
        let context = FormatterContext::for_kind(crate::TemporalKind::Date);
        for date in [
            OpenEhrDate::of(2021, None, None).unwrap(),
            OpenEhrDate::of(2021, Some(8), None).unwrap(),
            OpenEhrDate::of(2021, Some(8), Some(6)).unwrap(),
        ] {
            let accessor = TemporalAccessor::from(date.to_exact_or_partial());
            let rebuilt =
                OpenEhrDate::from_temporal(&accessor, date.precision_field(), &context).unwrap();
            assert_eq!(rebuilt, date);
        }
    }
}
