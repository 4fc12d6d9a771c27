//! This module implements the closed sum types over the five value kinds:
//! `AnyOpenEhrTemporal`, `ExactOrPartial` and `TemporalAccessor`.

use alloc::borrow::Cow;
use core::fmt::{self, Write};

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    fields::{ChronoField, FieldStates, OpenEhrField},
    iso::{IsoDate, IsoDateTime, IsoOffsetDateTime, IsoOffsetTime, IsoTime},
    options::{ResolverMode, TemporalUnit},
    parsed_intermediates::ParsedTemporal,
    parsers::FormattablePartial,
    TemporalResult, UtcOffset,
};

use super::{
    FormatterContext, OpenEhrDate, OpenEhrDateTime, OpenEhrOffsetDateTime, OpenEhrOffsetTime,
    OpenEhrTime, TemporalKind, TemporalQuery,
};

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            AnyOpenEhrTemporal::Date($inner) => $body,
            AnyOpenEhrTemporal::Time($inner) => $body,
            AnyOpenEhrTemporal::DateTime($inner) => $body,
            AnyOpenEhrTemporal::OffsetDateTime($inner) => $body,
            AnyOpenEhrTemporal::OffsetTime($inner) => $body,
        }
    };
}

// ==== AnyOpenEhrTemporal ====

/// A partial value of any of the five kinds.
///
/// ```rust
/// use openehr_temporal::{AnyOpenEhrTemporal, OpenEhrField, TemporalKind};
///
/// let value = AnyOpenEhrTemporal::parse("2021-08-06T04", TemporalKind::DateTime).unwrap();
/// assert_eq!(value.kind(), TemporalKind::DateTime);
/// assert_eq!(value.precision_field(), OpenEhrField::Hours);
/// assert_eq!(value.to_string(), "2021-08-06T04");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyOpenEhrTemporal {
    Date(OpenEhrDate),
    Time(OpenEhrTime),
    DateTime(OpenEhrDateTime),
    OffsetDateTime(OpenEhrOffsetDateTime),
    OffsetTime(OpenEhrOffsetTime),
}

impl AnyOpenEhrTemporal {
    /// Builds a value of `kind` from an external temporal at `precision`.
    pub fn from_temporal(
        accessor: &TemporalAccessor,
        kind: TemporalKind,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<Self> {
        let value = match kind {
            TemporalKind::Date => {
                Self::Date(OpenEhrDate::from_temporal(accessor, precision, context)?)
            }
            TemporalKind::Time => {
                Self::Time(OpenEhrTime::from_temporal(accessor, precision, context)?)
            }
            TemporalKind::DateTime => {
                Self::DateTime(OpenEhrDateTime::from_temporal(accessor, precision, context)?)
            }
            TemporalKind::OffsetDateTime => Self::OffsetDateTime(
                OpenEhrOffsetDateTime::from_temporal(accessor, precision, context)?,
            ),
            TemporalKind::OffsetTime => {
                Self::OffsetTime(OpenEhrOffsetTime::from_temporal(accessor, precision, context)?)
            }
        };
        Ok(value)
    }

    /// Parses the canonical rendering of `kind`.
    pub fn parse(source: &str, kind: TemporalKind) -> TemporalResult<Self> {
        let value = match kind {
            TemporalKind::Date => Self::Date(source.parse()?),
            TemporalKind::Time => Self::Time(source.parse()?),
            TemporalKind::DateTime => Self::DateTime(source.parse()?),
            TemporalKind::OffsetDateTime => Self::OffsetDateTime(source.parse()?),
            TemporalKind::OffsetTime => Self::OffsetTime(source.parse()?),
        };
        Ok(value)
    }

    #[must_use]
    pub fn kind(&self) -> TemporalKind {
        dispatch!(self, value => value.kind())
    }

    #[must_use]
    pub fn precision_field(&self) -> OpenEhrField {
        dispatch!(self, value => value.precision_field())
    }

    #[must_use]
    pub fn field_states(&self) -> &FieldStates {
        use crate::fields::FieldStateHolder;
        dispatch!(self, value => value.field_states())
    }

    #[must_use]
    pub fn resolver_mode(&self) -> ResolverMode {
        dispatch!(self, value => value.resolver_mode())
    }

    #[must_use]
    pub fn is_unit_supported(&self, unit: TemporalUnit) -> bool {
        dispatch!(self, value => value.is_unit_supported(unit))
    }

    #[must_use]
    pub fn is_field_supported(&self, field: ChronoField) -> bool {
        dispatch!(self, value => value.is_field_supported(field))
    }

    #[must_use]
    pub fn is_strictly_supported(&self, field: ChronoField) -> bool {
        dispatch!(self, value => value.is_strictly_supported(field))
    }

    pub fn get(&self, field: ChronoField) -> TemporalResult<i64> {
        dispatch!(self, value => value.get(field))
    }

    pub fn get_component(&self, field: OpenEhrField) -> TemporalResult<i64> {
        dispatch!(self, value => value.get_component(field))
    }

    #[must_use]
    pub fn to_exact_or_partial(&self) -> ExactOrPartial {
        dispatch!(self, value => value.to_exact_or_partial())
    }
}

impl Writeable for AnyOpenEhrTemporal {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        dispatch!(self, value => value.write_to(sink))
    }

    fn writeable_length_hint(&self) -> LengthHint {
        dispatch!(self, value => value.writeable_length_hint())
    }
}

impl_display_with_writeable!(AnyOpenEhrTemporal);

impl From<OpenEhrDate> for AnyOpenEhrTemporal {
    fn from(value: OpenEhrDate) -> Self {
        Self::Date(value)
    }
}

impl From<OpenEhrTime> for AnyOpenEhrTemporal {
    fn from(value: OpenEhrTime) -> Self {
        Self::Time(value)
    }
}

impl From<OpenEhrDateTime> for AnyOpenEhrTemporal {
    fn from(value: OpenEhrDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<OpenEhrOffsetDateTime> for AnyOpenEhrTemporal {
    fn from(value: OpenEhrOffsetDateTime) -> Self {
        Self::OffsetDateTime(value)
    }
}

impl From<OpenEhrOffsetTime> for AnyOpenEhrTemporal {
    fn from(value: OpenEhrOffsetTime) -> Self {
        Self::OffsetTime(value)
    }
}

// ==== ExactOrPartial ====

/// The most specific standard representation of a partial value.
///
/// Consumers that do not understand partial precision receive a bare year, a
/// year-month or one of the exact records where the value allows it, and the
/// partial value itself otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExactOrPartial {
    Year(i32),
    YearMonth { year: i32, month: u8 },
    Date(IsoDate),
    Time(IsoTime),
    DateTime(IsoDateTime),
    OffsetDateTime(IsoOffsetDateTime),
    OffsetTime(IsoOffsetTime),
    Partial(AnyOpenEhrTemporal),
}

impl ExactOrPartial {
    fn year_month(year: i32, month: Option<u8>) -> FormattablePartial {
        FormattablePartial {
            year: Some(year),
            month,
            ..FormattablePartial::default()
        }
    }
}

impl Writeable for ExactOrPartial {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        match self {
            Self::Year(year) => Self::year_month(*year, None).write_to(sink),
            Self::YearMonth { year, month } => Self::year_month(*year, Some(*month)).write_to(sink),
            Self::Date(date) => date.write_to(sink),
            Self::Time(time) => time.write_to(sink),
            Self::DateTime(date_time) => date_time.write_to(sink),
            Self::OffsetDateTime(date_time) => date_time.write_to(sink),
            Self::OffsetTime(time) => time.write_to(sink),
            Self::Partial(partial) => partial.write_to(sink),
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        match self {
            Self::Year(year) => Self::year_month(*year, None).writeable_length_hint(),
            Self::YearMonth { year, month } => {
                Self::year_month(*year, Some(*month)).writeable_length_hint()
            }
            Self::Date(date) => date.writeable_length_hint(),
            Self::Time(time) => time.writeable_length_hint(),
            Self::DateTime(date_time) => date_time.writeable_length_hint(),
            Self::OffsetDateTime(date_time) => date_time.writeable_length_hint(),
            Self::OffsetTime(time) => time.writeable_length_hint(),
            Self::Partial(partial) => partial.writeable_length_hint(),
        }
    }
}

impl_display_with_writeable!(ExactOrPartial);

// ==== TemporalAccessor ====

/// The external temporal handed to the `from_temporal` factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalAccessor {
    /// A bag of loosely parsed fields.
    Parsed(ParsedTemporal),
    /// An already built partial value.
    Partial(AnyOpenEhrTemporal),
}

impl TemporalAccessor {
    /// Parses an IXDTF string into a field bag.
    pub fn from_utf8(source: &[u8]) -> TemporalResult<Self> {
        ParsedTemporal::from_utf8(source).map(Self::Parsed)
    }

    /// Returns the partial value when this accessor wraps one.
    #[must_use]
    pub fn as_partial(&self) -> Option<&AnyOpenEhrTemporal> {
        match self {
            Self::Partial(partial) => Some(partial),
            Self::Parsed(_) => None,
        }
    }

    /// Runs `query` against this accessor.
    ///
    /// ```rust
    /// use openehr_temporal::{
    ///     FormatterContext, OpenEhrDate, OpenEhrField, TemporalAccessor, TemporalKind,
    /// };
    ///
    /// let accessor = TemporalAccessor::from_utf8(b"2021-08-06T04:03").unwrap();
    /// let date = accessor
    ///     .query(
    ///         &OpenEhrDate::from_temporal,
    ///         OpenEhrField::Months,
    ///         &FormatterContext::for_kind(TemporalKind::Date),
    ///     )
    ///     .unwrap();
    /// assert_eq!(date.to_string(), "2021-08");
    /// ```
    pub fn query<R>(
        &self,
        query: &impl TemporalQuery<R>,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<R> {
        query.query_from(self, precision, context)
    }

    /// Returns the fields this accessor exposes. A partial value exposes
    /// only its supported components.
    pub(crate) fn to_parsed(&self) -> Cow<'_, ParsedTemporal> {
        match self {
            Self::Parsed(parsed) => Cow::Borrowed(parsed),
            Self::Partial(partial) => Cow::Owned(ParsedTemporal::from(partial)),
        }
    }
}

impl From<&AnyOpenEhrTemporal> for ParsedTemporal {
    fn from(value: &AnyOpenEhrTemporal) -> Self {
        let component = |field: OpenEhrField| value.get_component(field).ok();
        let small = |field: OpenEhrField| component(field).and_then(|v| u8::try_from(v).ok());
        Self {
            year: component(OpenEhrField::Years).and_then(|v| i32::try_from(v).ok()),
            month: small(OpenEhrField::Months),
            day: small(OpenEhrField::Days),
            hour: small(OpenEhrField::Hours),
            minute: small(OpenEhrField::Minutes),
            second: small(OpenEhrField::Seconds),
            nanosecond: component(OpenEhrField::Nanos).and_then(|v| u32::try_from(v).ok()),
            offset: component(OpenEhrField::OffsetSeconds)
                .and_then(|v| i32::try_from(v).ok())
                .and_then(|v| UtcOffset::from_seconds(v).ok()),
            time_zone: None,
        }
    }
}

impl From<ParsedTemporal> for TemporalAccessor {
    fn from(value: ParsedTemporal) -> Self {
        Self::Parsed(value)
    }
}

impl From<AnyOpenEhrTemporal> for TemporalAccessor {
    fn from(value: AnyOpenEhrTemporal) -> Self {
        Self::Partial(value)
    }
}

impl From<OpenEhrDate> for TemporalAccessor {
    fn from(value: OpenEhrDate) -> Self {
        Self::Partial(value.into())
    }
}

impl From<OpenEhrTime> for TemporalAccessor {
    fn from(value: OpenEhrTime) -> Self {
        Self::Partial(value.into())
    }
}

impl From<OpenEhrDateTime> for TemporalAccessor {
    fn from(value: OpenEhrDateTime) -> Self {
        Self::Partial(value.into())
    }
}

impl From<OpenEhrOffsetDateTime> for TemporalAccessor {
    fn from(value: OpenEhrOffsetDateTime) -> Self {
        Self::Partial(value.into())
    }
}

impl From<OpenEhrOffsetTime> for TemporalAccessor {
    fn from(value: OpenEhrOffsetTime) -> Self {
        Self::Partial(value.into())
    }
}

impl From<ExactOrPartial> for TemporalAccessor {
    fn from(value: ExactOrPartial) -> Self {
        let parsed = ParsedTemporal::new();
        let parsed = match value {
            ExactOrPartial::Year(year) => parsed.with_year(Some(year)),
            ExactOrPartial::YearMonth { year, month } => {
                parsed.with_year(Some(year)).with_month(Some(month))
            }
            ExactOrPartial::Date(date) => parsed.with_date(date),
            ExactOrPartial::Time(time) => parsed.with_time(time),
            ExactOrPartial::DateTime(date_time) => {
                parsed.with_date(date_time.date).with_time(date_time.time)
            }
            ExactOrPartial::OffsetDateTime(date_time) => parsed
                .with_date(date_time.date_time.date)
                .with_time(date_time.date_time.time)
                .with_offset(Some(date_time.offset)),
            ExactOrPartial::OffsetTime(time) => {
                parsed.with_time(time.time).with_offset(Some(time.offset))
            }
            ExactOrPartial::Partial(partial) => return Self::Partial(partial),
        };
        Self::Parsed(parsed)
    }
}
