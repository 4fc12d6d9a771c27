//! Native implementation of the crate's option enums.
//!
//! Options describe how an operation should be completed: which unit an
//! amount is measured in, how out-of-range components are treated, and how
//! strictly implied components are resolved.

use crate::NS_PER_DAY;
use core::{fmt, str::FromStr};

// ==== Options enums and methods ====

/// The unit that an amount or a difference is measured in.
///
/// Units are ordered from the finest (`Nanosecond`) to the coarsest (`Year`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemporalUnit {
    /// The `Auto` unit
    Auto = 0,
    /// The `Nanosecond` unit
    Nanosecond,
    /// The `Microsecond` unit
    Microsecond,
    /// The `Millisecond` unit
    Millisecond,
    /// The `Second` unit
    Second,
    /// The `Minute` unit
    Minute,
    /// The `Hour` unit
    Hour,
    /// The `Day` unit
    Day,
    /// The `Week` unit
    Week,
    /// The `Month` unit
    Month,
    /// The `Year` unit
    Year,
}

impl TemporalUnit {
    /// Returns the `Nanosecond` amount for any given value.
    #[must_use]
    pub fn as_nanoseconds(&self) -> Option<u64> {
        use TemporalUnit::{
            Auto, Day, Hour, Microsecond, Millisecond, Minute, Month, Nanosecond, Second, Week,
            Year,
        };
        match self {
            Year | Month | Auto => None,
            Week => Some(NS_PER_DAY * 7),
            Day => Some(NS_PER_DAY),
            Hour => Some(3_600_000_000_000),
            Minute => Some(60_000_000_000),
            Second => Some(1_000_000_000),
            Millisecond => Some(1_000_000),
            Microsecond => Some(1_000),
            Nanosecond => Some(1),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_date_unit(&self) -> bool {
        use TemporalUnit::{Day, Month, Week, Year};
        matches!(self, Year | Month | Week | Day)
    }

    #[inline]
    #[must_use]
    pub fn is_time_unit(&self) -> bool {
        use TemporalUnit::{Hour, Microsecond, Millisecond, Minute, Nanosecond, Second};
        matches!(
            self,
            Hour | Minute | Second | Millisecond | Microsecond | Nanosecond
        )
    }

    /// Returns whether this unit is coarser than or equal to `other`.
    #[inline]
    #[must_use]
    pub fn is_at_least(&self, other: TemporalUnit) -> bool {
        *self >= other
    }
}

/// A parsing error for `TemporalUnit`
#[derive(Debug, Clone, Copy)]
pub struct ParseTemporalUnitError;

impl fmt::Display for ParseTemporalUnitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("provided string was not a valid TemporalUnit")
    }
}

impl FromStr for TemporalUnit {
    type Err = ParseTemporalUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "year" | "years" => Ok(Self::Year),
            "month" | "months" => Ok(Self::Month),
            "week" | "weeks" => Ok(Self::Week),
            "day" | "days" => Ok(Self::Day),
            "hour" | "hours" => Ok(Self::Hour),
            "minute" | "minutes" => Ok(Self::Minute),
            "second" | "seconds" => Ok(Self::Second),
            "millisecond" | "milliseconds" => Ok(Self::Millisecond),
            "microsecond" | "microseconds" => Ok(Self::Microsecond),
            "nanosecond" | "nanoseconds" => Ok(Self::Nanosecond),
            _ => Err(ParseTemporalUnitError),
        }
    }
}

impl fmt::Display for TemporalUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Auto => "auto",
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
            Self::Microsecond => "microsecond",
            Self::Nanosecond => "nanosecond",
        }
        .fmt(f)
    }
}

/// `ArithmeticOverflow` can also be used as an
/// assignment overflow and consists of the "constrain"
/// and "reject" options.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOverflow {
    /// Constrain option
    #[default]
    Constrain,
    /// Reject option
    Reject,
}

/// How components finer than a value's precision are resolved.
///
/// In `Strict` mode a component that was not supplied is never reported as
/// present. In `Lenient` mode an implied component is reported as present
/// when the field states mark it mandatory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverMode {
    /// Only supplied components are present.
    Strict,
    /// Mandatory implied components are present.
    #[default]
    Lenient,
}

impl ResolverMode {
    #[inline]
    #[must_use]
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// A parsing error for `ResolverMode`
#[derive(Debug, Clone, Copy)]
pub struct ParseResolverModeError;

impl fmt::Display for ParseResolverModeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("provided string was not a valid resolver mode")
    }
}

impl FromStr for ResolverMode {
    type Err = ParseResolverModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "lenient" | "smart" => Ok(Self::Lenient),
            _ => Err(ParseResolverModeError),
        }
    }
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
        .fmt(f)
    }
}
