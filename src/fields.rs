//! This module implements the openEHR field domain and field state
//! configuration.
//!
//! An [`OpenEhrField`] names one granularity level of a partial temporal.
//! The date-time fields are totally ordered from the coarsest (`Years`) to the
//! finest (`Nanos`); `OffsetSeconds` stands outside that order.
//!
//! A [`FieldStates`] configuration records for each field whether it is
//! mandatory, optional, undefined or forbidden in a given usage context.

use core::{cmp::Ordering, fmt, str::FromStr};

use crate::{error::ErrorMessage, options::TemporalUnit, TemporalError, TemporalResult};

/// The smallest ISO year supported.
pub(crate) const MIN_ISO_YEAR: i32 = -271_821;
/// The largest ISO year supported.
pub(crate) const MAX_ISO_YEAR: i32 = 275_760;
/// Offsets are limited to +/-18:00.
pub(crate) const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

// ==== ChronoField ====

/// A field of a calendar date, a time of day or a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChronoField {
    /// The proleptic year.
    Year,
    /// The month of year, from 1 to 12.
    MonthOfYear,
    /// The day of month, from 1 to 31.
    DayOfMonth,
    /// The day of year, from 1 to 366.
    DayOfYear,
    /// The ISO day of week, Monday being 1.
    DayOfWeek,
    /// The hour of day, from 0 to 23.
    HourOfDay,
    /// The minute of hour, from 0 to 59.
    MinuteOfHour,
    /// The second of minute, from 0 to 59.
    SecondOfMinute,
    /// The millisecond of second, from 0 to 999.
    MilliOfSecond,
    /// The nanosecond of second, from 0 to 999,999,999.
    NanoOfSecond,
    /// The UTC offset in seconds.
    OffsetSeconds,
}

impl ChronoField {
    /// Returns the unit this field is measured in.
    #[inline]
    #[must_use]
    pub const fn base_unit(self) -> TemporalUnit {
        match self {
            Self::Year => TemporalUnit::Year,
            Self::MonthOfYear => TemporalUnit::Month,
            Self::DayOfMonth | Self::DayOfYear | Self::DayOfWeek => TemporalUnit::Day,
            Self::HourOfDay => TemporalUnit::Hour,
            Self::MinuteOfHour => TemporalUnit::Minute,
            Self::SecondOfMinute | Self::OffsetSeconds => TemporalUnit::Second,
            Self::MilliOfSecond => TemporalUnit::Millisecond,
            Self::NanoOfSecond => TemporalUnit::Nanosecond,
        }
    }

    /// Returns the inclusive range of valid values for this field.
    #[must_use]
    pub const fn value_range(self) -> (i64, i64) {
        match self {
            Self::Year => (MIN_ISO_YEAR as i64, MAX_ISO_YEAR as i64),
            Self::MonthOfYear => (1, 12),
            Self::DayOfMonth => (1, 31),
            Self::DayOfYear => (1, 366),
            Self::DayOfWeek => (1, 7),
            Self::HourOfDay => (0, 23),
            Self::MinuteOfHour | Self::SecondOfMinute => (0, 59),
            Self::MilliOfSecond => (0, 999),
            Self::NanoOfSecond => (0, 999_999_999),
            Self::OffsetSeconds => (-(MAX_OFFSET_SECONDS as i64), MAX_OFFSET_SECONDS as i64),
        }
    }

    /// Validates `value` against this field's range.
    pub fn check_value(self, value: i64) -> TemporalResult<i64> {
        let (min, max) = self.value_range();
        if !(min..=max).contains(&value) {
            return Err(TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange));
        }
        Ok(value)
    }
}

impl fmt::Display for ChronoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => "Year",
            Self::MonthOfYear => "MonthOfYear",
            Self::DayOfMonth => "DayOfMonth",
            Self::DayOfYear => "DayOfYear",
            Self::DayOfWeek => "DayOfWeek",
            Self::HourOfDay => "HourOfDay",
            Self::MinuteOfHour => "MinuteOfHour",
            Self::SecondOfMinute => "SecondOfMinute",
            Self::MilliOfSecond => "MilliOfSecond",
            Self::NanoOfSecond => "NanoOfSecond",
            Self::OffsetSeconds => "OffsetSeconds",
        }
        .fmt(f)
    }
}

// ==== OpenEhrField ====

/// A granularity level of an openEHR partial temporal.
///
/// Comparison follows the coarse-to-fine order, so `Years < Months < ... <
/// Nanos`. `OffsetSeconds` does not compare with any other field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenEhrField {
    Years = 0,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
    Nanos,
    OffsetSeconds,
}

impl OpenEhrField {
    /// The finest field a partial temporal can be precise to.
    pub const MINIMUM: Self = Self::Nanos;

    pub const DATE_FIELDS: [Self; 3] = [Self::Years, Self::Months, Self::Days];

    pub const TIME_FIELDS: [Self; 4] = [Self::Hours, Self::Minutes, Self::Seconds, Self::Nanos];

    pub const DATE_TIME_FIELDS: [Self; 7] = [
        Self::Years,
        Self::Months,
        Self::Days,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
        Self::Nanos,
    ];

    pub const ALL: [Self; 8] = [
        Self::Years,
        Self::Months,
        Self::Days,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
        Self::Nanos,
        Self::OffsetSeconds,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Returns the unit of this field.
    #[inline]
    #[must_use]
    pub const fn unit(self) -> TemporalUnit {
        match self {
            Self::Years => TemporalUnit::Year,
            Self::Months => TemporalUnit::Month,
            Self::Days => TemporalUnit::Day,
            Self::Hours => TemporalUnit::Hour,
            Self::Minutes => TemporalUnit::Minute,
            Self::Seconds | Self::OffsetSeconds => TemporalUnit::Second,
            Self::Nanos => TemporalUnit::Nanosecond,
        }
    }

    /// Returns the chrono field backing this field.
    #[inline]
    #[must_use]
    pub const fn chrono_field(self) -> ChronoField {
        match self {
            Self::Years => ChronoField::Year,
            Self::Months => ChronoField::MonthOfYear,
            Self::Days => ChronoField::DayOfMonth,
            Self::Hours => ChronoField::HourOfDay,
            Self::Minutes => ChronoField::MinuteOfHour,
            Self::Seconds => ChronoField::SecondOfMinute,
            Self::Nanos => ChronoField::NanoOfSecond,
            Self::OffsetSeconds => ChronoField::OffsetSeconds,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_date_field(self) -> bool {
        matches!(self, Self::Years | Self::Months | Self::Days)
    }

    #[inline]
    #[must_use]
    pub const fn is_time_field(self) -> bool {
        matches!(
            self,
            Self::Hours | Self::Minutes | Self::Seconds | Self::Nanos
        )
    }

    /// Returns whether this field is strictly finer than `other`.
    #[inline]
    #[must_use]
    pub fn is_finer_than(self, other: Self) -> bool {
        self.partial_cmp(&other) == Some(Ordering::Greater)
    }

    /// Returns the finer of two date-time fields.
    #[inline]
    #[must_use]
    pub fn finer(self, other: Self) -> Self {
        if other.is_finer_than(self) {
            other
        } else {
            self
        }
    }

    /// Returns the coarser of two date-time fields.
    #[inline]
    #[must_use]
    pub fn coarser(self, other: Self) -> Self {
        if self.is_finer_than(other) {
            other
        } else {
            self
        }
    }

    /// Returns the finest date-time field whose unit is not finer than
    /// `unit`, so milliseconds and microseconds map to `Seconds`.
    ///
    /// Week-based units and `Auto` have no field.
    pub fn try_from_unit(unit: TemporalUnit) -> TemporalResult<Self> {
        if matches!(unit, TemporalUnit::Auto | TemporalUnit::Week) {
            return Err(TemporalError::field_mapping().with_enum(ErrorMessage::UnitHasNoField));
        }
        Self::DATE_TIME_FIELDS
            .into_iter()
            .rev()
            .find(|field| field.unit() >= unit)
            .ok_or(TemporalError::field_mapping().with_enum(ErrorMessage::UnitHasNoField))
    }

    /// Returns the field backed by `chrono_field`.
    pub fn try_from_chrono_field(chrono_field: ChronoField) -> TemporalResult<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.chrono_field() == chrono_field)
            .ok_or(TemporalError::field_mapping().with_enum(ErrorMessage::ChronoFieldHasNoField))
    }
}

impl PartialOrd for OpenEhrField {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::OffsetSeconds, Self::OffsetSeconds) => Some(Ordering::Equal),
            (Self::OffsetSeconds, _) | (_, Self::OffsetSeconds) => None,
            _ => Some(self.index().cmp(&other.index())),
        }
    }
}

impl TryFrom<TemporalUnit> for OpenEhrField {
    type Error = TemporalError;

    fn try_from(unit: TemporalUnit) -> Result<Self, Self::Error> {
        Self::try_from_unit(unit)
    }
}

impl TryFrom<ChronoField> for OpenEhrField {
    type Error = TemporalError;

    fn try_from(field: ChronoField) -> Result<Self, Self::Error> {
        Self::try_from_chrono_field(field)
    }
}

impl fmt::Display for OpenEhrField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Nanos => "nanos",
            Self::OffsetSeconds => "offset_seconds",
        }
        .fmt(f)
    }
}

impl FromStr for OpenEhrField {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "years" => Ok(Self::Years),
            "months" => Ok(Self::Months),
            "days" => Ok(Self::Days),
            "hours" => Ok(Self::Hours),
            "minutes" => Ok(Self::Minutes),
            "seconds" => Ok(Self::Seconds),
            "nanos" => Ok(Self::Nanos),
            "offset_seconds" => Ok(Self::OffsetSeconds),
            _ => Err(TemporalError::field_mapping().with_message("unknown openEHR field")),
        }
    }
}

// ==== FieldState ====

/// The state of a field in a usage context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldState {
    /// The field must be present.
    Mandatory,
    /// The field may be present.
    Optional,
    /// The field carries no requirement but may be present.
    Undefined,
    /// The field must not be present.
    Forbidden,
}

impl FieldState {
    /// Whether a present value of this field is meaningful.
    #[inline]
    #[must_use]
    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Whether this field may be present at all.
    #[inline]
    #[must_use]
    pub const fn is_possible(self) -> bool {
        !matches!(self, Self::Forbidden)
    }
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mandatory => "mandatory",
            Self::Optional => "optional",
            Self::Undefined => "undefined",
            Self::Forbidden => "forbidden",
        }
        .fmt(f)
    }
}

impl FromStr for FieldState {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mandatory" => Ok(Self::Mandatory),
            "optional" => Ok(Self::Optional),
            "undefined" => Ok(Self::Undefined),
            "forbidden" => Ok(Self::Forbidden),
            _ => Err(TemporalError::r#type().with_message("unknown field state")),
        }
    }
}

// ==== FieldStates ====

/// An immutable configuration mapping fields to their [`FieldState`].
///
/// Fields absent from the configuration are neither mandatory nor possible.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldStates {
    states: [Option<FieldState>; 8],
}

impl FieldStates {
    /// A configuration without any entries.
    pub const EMPTY: Self = Self { states: [None; 8] };

    /// Default configuration of date values.
    pub const DATE: Self = Self::defaults(&OpenEhrField::DATE_FIELDS);

    /// Default configuration of time values.
    pub const TIME: Self = Self::defaults(&OpenEhrField::TIME_FIELDS);

    /// Default configuration of date-time values.
    pub const DATE_TIME: Self = Self::defaults(&OpenEhrField::DATE_TIME_FIELDS);

    /// Default configuration of time values with an offset.
    pub const OFFSET_TIME: Self =
        Self::TIME.with(OpenEhrField::OffsetSeconds, FieldState::Optional);

    /// Default configuration of date-time values with an offset.
    pub const OFFSET_DATE_TIME: Self =
        Self::DATE_TIME.with(OpenEhrField::OffsetSeconds, FieldState::Optional);

    /// Returns a configuration where the coarsest of `fields` is mandatory
    /// and every other field is optional.
    #[must_use]
    pub const fn defaults(fields: &[OpenEhrField]) -> Self {
        let mut coarsest = usize::MAX;
        let mut i = 0;
        while i < fields.len() {
            let index = fields[i].index();
            if index < coarsest {
                coarsest = index;
            }
            i += 1;
        }

        let mut states = [None; 8];
        let mut i = 0;
        while i < fields.len() {
            let index = fields[i].index();
            states[index] = if index == coarsest {
                Some(FieldState::Mandatory)
            } else {
                Some(FieldState::Optional)
            };
            i += 1;
        }
        Self { states }
    }

    /// Returns a copy with `field` set to `state`.
    #[must_use]
    pub const fn with(mut self, field: OpenEhrField, state: FieldState) -> Self {
        self.states[field.index()] = Some(state);
        self
    }

    /// Returns a copy without an entry for `field`.
    #[must_use]
    pub const fn without(mut self, field: OpenEhrField) -> Self {
        self.states[field.index()] = None;
        self
    }

    /// Returns the state configured for `field`.
    #[inline]
    #[must_use]
    pub const fn get(&self, field: OpenEhrField) -> Option<FieldState> {
        self.states[field.index()]
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, field: OpenEhrField) -> bool {
        self.states[field.index()].is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.iter().all(Option::is_none)
    }

    /// Iterates over the configured fields from the coarsest to the finest,
    /// `OffsetSeconds` last.
    pub fn iter(&self) -> impl Iterator<Item = (OpenEhrField, FieldState)> + '_ {
        OpenEhrField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|state| (field, state)))
    }

    /// Returns a copy holding only the entries accepted by `predicate`.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(OpenEhrField, FieldState) -> bool,
    {
        self.iter()
            .filter(|(field, state)| predicate(*field, *state))
            .collect()
    }

    /// Returns the date-time field whose unit is `unit` with its state.
    pub(crate) fn entry_for_unit(&self, unit: TemporalUnit) -> Option<(OpenEhrField, FieldState)> {
        OpenEhrField::DATE_TIME_FIELDS
            .into_iter()
            .find(|field| field.unit() == unit)
            .and_then(|field| self.get(field).map(|state| (field, state)))
    }
}

impl FromIterator<(OpenEhrField, FieldState)> for FieldStates {
    fn from_iter<I: IntoIterator<Item = (OpenEhrField, FieldState)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY, |states, (field, state)| states.with(field, state))
    }
}

impl<const N: usize> From<[(OpenEhrField, FieldState); N]> for FieldStates {
    fn from(entries: [(OpenEhrField, FieldState); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Answers mandatory/possible queries over a [`FieldStates`] configuration.
pub trait FieldStateHolder {
    /// Returns the configuration in force.
    fn field_states(&self) -> &FieldStates;

    /// Whether `field` is configured as mandatory.
    fn is_field_mandatory(&self, field: OpenEhrField) -> bool {
        self.field_states().get(field) == Some(FieldState::Mandatory)
    }

    /// Whether `field` may be present at all.
    fn is_field_possible(&self, field: OpenEhrField) -> bool {
        self.field_states()
            .get(field)
            .is_some_and(FieldState::is_possible)
    }
}

impl FieldStateHolder for FieldStates {
    fn field_states(&self) -> &FieldStates {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ChronoField, FieldState, FieldStateHolder, FieldStates, OpenEhrField};
    use crate::{error::ErrorKind, options::TemporalUnit};
    use alloc::vec::Vec;
    use core::cmp::Ordering;

    #[test]
    fn field_order() {
        assert!(OpenEhrField::Years < OpenEhrField::Months);
        assert!(OpenEhrField::Seconds < OpenEhrField::Nanos);
        assert!(OpenEhrField::Nanos.is_finer_than(OpenEhrField::Days));
        assert!(!OpenEhrField::Days.is_finer_than(OpenEhrField::Days));
        assert_eq!(
            OpenEhrField::OffsetSeconds.partial_cmp(&OpenEhrField::Seconds),
            None
        );
        assert_eq!(
            OpenEhrField::Hours.partial_cmp(&OpenEhrField::Hours),
            Some(Ordering::Equal)
        );
        assert_eq!(
            OpenEhrField::Minutes.finer(OpenEhrField::Hours),
            OpenEhrField::Minutes
        );
        assert_eq!(
            OpenEhrField::Minutes.coarser(OpenEhrField::Hours),
            OpenEhrField::Hours
        );
        assert_eq!(OpenEhrField::MINIMUM, OpenEhrField::Nanos);
    }

    #[test]
    fn field_from_unit() {
        let cases = [
            (TemporalUnit::Nanosecond, OpenEhrField::Nanos),
            (TemporalUnit::Microsecond, OpenEhrField::Seconds),
            (TemporalUnit::Millisecond, OpenEhrField::Seconds),
            (TemporalUnit::Second, OpenEhrField::Seconds),
            (TemporalUnit::Minute, OpenEhrField::Minutes),
            (TemporalUnit::Hour, OpenEhrField::Hours),
            (TemporalUnit::Day, OpenEhrField::Days),
            (TemporalUnit::Month, OpenEhrField::Months),
            (TemporalUnit::Year, OpenEhrField::Years),
        ];
        for (unit, field) in cases {
            assert_eq!(OpenEhrField::try_from(unit).ok(), Some(field), "{unit}");
        }
        for unit in [TemporalUnit::Auto, TemporalUnit::Week] {
            let err = OpenEhrField::try_from(unit).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::FieldMapping, "{unit}");
        }
    }

    #[test]
    fn field_from_chrono_field() {
        assert_eq!(
            OpenEhrField::try_from(ChronoField::MonthOfYear).ok(),
            Some(OpenEhrField::Months)
        );
        assert_eq!(
            OpenEhrField::try_from(ChronoField::OffsetSeconds).ok(),
            Some(OpenEhrField::OffsetSeconds)
        );
        let err = OpenEhrField::try_from(ChronoField::DayOfWeek).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldMapping);
        assert!(OpenEhrField::try_from(ChronoField::MilliOfSecond).is_err());
    }

    #[test]
    fn field_state_flags() {
        assert!(FieldState::Mandatory.is_defined() && FieldState::Mandatory.is_possible());
        assert!(FieldState::Optional.is_defined() && FieldState::Optional.is_possible());
        assert!(!FieldState::Undefined.is_defined() && FieldState::Undefined.is_possible());
        assert!(FieldState::Forbidden.is_defined() && !FieldState::Forbidden.is_possible());
    }

    #[test]
    fn default_configurations() {
        let date: Vec<_> = FieldStates::DATE.iter().collect();
        assert_eq!(
            date,
            [
                (OpenEhrField::Years, FieldState::Mandatory),
                (OpenEhrField::Months, FieldState::Optional),
                (OpenEhrField::Days, FieldState::Optional),
            ]
        );
        assert!(FieldStates::TIME.is_field_mandatory(OpenEhrField::Hours));
        assert!(!FieldStates::TIME.is_field_mandatory(OpenEhrField::Minutes));
        assert!(!FieldStates::TIME.contains(OpenEhrField::Years));
        assert!(FieldStates::DATE_TIME.is_field_mandatory(OpenEhrField::Years));
        assert!(FieldStates::DATE_TIME.is_field_possible(OpenEhrField::Nanos));
        assert!(!FieldStates::DATE_TIME.contains(OpenEhrField::OffsetSeconds));
        assert_eq!(
            FieldStates::OFFSET_DATE_TIME.get(OpenEhrField::OffsetSeconds),
            Some(FieldState::Optional)
        );
        assert!(FieldStates::OFFSET_TIME.is_field_mandatory(OpenEhrField::Hours));
    }

    #[test]
    fn holder_queries_default_to_false() {
        let states = FieldStates::from([
            (OpenEhrField::Years, FieldState::Mandatory),
            (OpenEhrField::Months, FieldState::Forbidden),
        ]);
        assert!(states.is_field_possible(OpenEhrField::Years));
        assert!(!states.is_field_possible(OpenEhrField::Months));
        assert!(!states.is_field_possible(OpenEhrField::Days));
        assert!(!states.is_field_mandatory(OpenEhrField::Days));
        assert!(FieldStates::EMPTY.is_empty());
    }

    #[test]
    fn chrono_field_ranges() {
        assert!(ChronoField::HourOfDay.check_value(23).is_ok());
        assert!(ChronoField::HourOfDay.check_value(24).is_err());
        assert!(ChronoField::OffsetSeconds.check_value(-64_800).is_ok());
        assert_eq!(ChronoField::DayOfWeek.base_unit(), TemporalUnit::Day);
        assert_eq!(ChronoField::OffsetSeconds.base_unit(), TemporalUnit::Second);
    }
}
