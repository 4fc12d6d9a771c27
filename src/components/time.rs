//! This module implements `OpenEhrTime` and any directly related algorithms.

use core::str::FromStr;

use crate::{
    fields::{FieldStateHolder, FieldStates, OpenEhrField},
    host::HostHooks,
    iso::IsoTime,
    options::ResolverMode,
    parsers, TemporalError, TemporalResult, TemporalUnwrap,
};

use super::{
    now::host_offset_date_time, partial::check_precision, AnyOpenEhrTemporal, ExactOrPartial,
    FormatterContext, OpenEhrTemporal, TemporalAccessor, TemporalKind,
};

/// A time of day precise to the hour, the minute, the second or the
/// nanosecond.
///
/// ```rust
/// use openehr_temporal::{OpenEhrField, OpenEhrTime};
///
/// let time = OpenEhrTime::of(4, Some(3), None, None).unwrap();
/// assert_eq!(time.precision_field(), OpenEhrField::Minutes);
/// assert_eq!(time.to_string(), "04:03");
/// ```
pub type OpenEhrTime = OpenEhrTemporal<IsoTime>;

impl OpenEhrTemporal<IsoTime> {
    /// Infers the precision of a time from the components supplied.
    ///
    /// Returns `None` when the hour is omitted.
    #[must_use]
    pub fn precision_of(
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
        nanosecond: Option<u32>,
    ) -> Option<OpenEhrField> {
        hour?;
        let precision = if minute.is_none() {
            OpenEhrField::Hours
        } else if second.is_none() {
            OpenEhrField::Minutes
        } else if nanosecond.is_none() {
            OpenEhrField::Seconds
        } else {
            OpenEhrField::Nanos
        };
        Some(precision)
    }

    /// Creates a time with the default time field states.
    pub fn of(
        hour: u8,
        minute: Option<u8>,
        second: Option<u8>,
        nanosecond: Option<u32>,
    ) -> TemporalResult<Self> {
        Self::of_with_states(
            hour,
            minute,
            second,
            nanosecond,
            FieldStates::TIME,
            ResolverMode::default(),
        )
    }

    pub fn of_with_states(
        hour: u8,
        minute: Option<u8>,
        second: Option<u8>,
        nanosecond: Option<u32>,
        field_states: FieldStates,
        resolver_mode: ResolverMode,
    ) -> TemporalResult<Self> {
        let exact = IsoTime::from_components(
            hour,
            minute.unwrap_or(0),
            second.unwrap_or(0),
            nanosecond.unwrap_or(0),
        )?;
        let precision =
            Self::precision_of(Some(hour), minute, second, nanosecond).temporal_unwrap()?;
        Self::new(exact, precision, field_states, resolver_mode)
    }

    /// Returns the current time of day observed by the system.
    #[cfg(feature = "sys")]
    pub fn now() -> TemporalResult<Self> {
        Self::now_with_host(&crate::sys::SystemHost)
    }

    /// Returns the current time of day observed by `host`.
    pub fn now_with_host(host: &impl HostHooks) -> TemporalResult<Self> {
        let now = host_offset_date_time(host)?;
        Self::new(
            now.date_time.time,
            OpenEhrField::MINIMUM,
            FieldStates::TIME,
            ResolverMode::default(),
        )
    }

    /// Creates a time from an external temporal.
    ///
    /// A time is returned unchanged. Otherwise the hour is required and
    /// finer components default to zero.
    pub fn from_temporal(
        accessor: &TemporalAccessor,
        precision: OpenEhrField,
        context: &FormatterContext,
    ) -> TemporalResult<Self> {
        if let Some(AnyOpenEhrTemporal::Time(time)) = accessor.as_partial() {
            return Ok(*time);
        }
        check_precision(precision)?;
        let exact = accessor.to_parsed().require_time()?;
        Self::new(
            exact,
            precision,
            *context.field_states(),
            context.resolver_mode(),
        )
    }

    /// Collapses the time to a plain time at nanosecond precision.
    #[must_use]
    pub fn to_exact_or_partial(&self) -> ExactOrPartial {
        if self.precision_field() == OpenEhrField::Nanos {
            return ExactOrPartial::Time(self.exact());
        }
        ExactOrPartial::Partial(AnyOpenEhrTemporal::Time(*self))
    }
}

impl FromStr for OpenEhrTemporal<IsoTime> {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parsed, precision) = parsers::parse_canonical(s.as_bytes(), TemporalKind::Time)?;
        Self::from_temporal(
            &parsed.into(),
            precision,
            &FormatterContext::for_kind(TemporalKind::Time),
        )
    }
}
