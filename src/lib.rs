//! The `openehr_temporal` crate implements partial-precision date and time
//! values following the openEHR extended ISO 8601 profile.
//!
//! A partial value remembers which components were actually supplied (its
//! *precision field*), which components a usage context allows or requires
//! (its [`FieldStates`]), and whether implied components may be reported as
//! present ([`ResolverMode`]).
//!
//! ```rust
//! use openehr_temporal::{OpenEhrDate, OpenEhrDateTime, OpenEhrField};
//! use openehr_temporal::fields::ChronoField;
//!
//! let date = OpenEhrDate::of(2021, Some(8), None).unwrap();
//! assert_eq!(date.precision_field(), OpenEhrField::Months);
//! assert_eq!(date.to_string(), "2021-08");
//! assert!(!date.is_field_supported(ChronoField::DayOfMonth));
//!
//! let date_time = OpenEhrDateTime::of(2021, Some(8), Some(6), Some(4), None, None, None).unwrap();
//! assert_eq!(date_time.to_string(), "2021-08-06T04");
//! ```
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    // Currently throws a false positive regarding dependencies that are only used in benchmarks.
    unused_crate_dependencies,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::cognitive_complexity,
    clippy::missing_errors_doc,
    clippy::let_unit_value,
    clippy::option_if_let_else,

    // It may be worth to look if we can fix the issues highlighted by these lints.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,

    // Add temporarily - Needs addressing
    clippy::missing_panics_doc,
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod fields;
pub mod host;
pub mod iso;
pub mod options;
pub mod parsed_intermediates;
pub mod parsers;

#[cfg(feature = "sys")]
pub mod sys;

mod components;
mod epoch_nanoseconds;

#[doc(hidden)]
pub(crate) mod utils;

use core::cmp::Ordering;

#[doc(inline)]
pub use error::TemporalError;

/// The `openehr_temporal` result type
pub type TemporalResult<T> = Result<T, TemporalError>;

pub mod time {
    pub use crate::epoch_nanoseconds::EpochNanoseconds;
}

pub use crate::components::{
    AnyOpenEhrTemporal, ExactOrPartial, ExactTemporal, FormatterContext, Now, OpenEhrDate,
    OpenEhrDateTime, OpenEhrOffsetDateTime, OpenEhrOffsetTime, OpenEhrTemporal, OpenEhrTime,
    TemporalAccessor, TemporalKind, TemporalQuery, UtcOffset,
};
pub use crate::fields::{FieldState, FieldStates, OpenEhrField};
pub use crate::options::{ResolverMode, TemporalUnit};
pub use crate::parsed_intermediates::ParsedTemporal;

/// A library specific trait for unwrapping assertions.
pub(crate) trait TemporalUnwrap {
    type Output;

    /// `openehr_temporal` based assertion for unwrapping. This will panic in
    /// debug builds, but throws error during runtime.
    fn temporal_unwrap(self) -> TemporalResult<Self::Output>;
}

impl<T> TemporalUnwrap for Option<T> {
    type Output = T;

    fn temporal_unwrap(self) -> TemporalResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(TemporalError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! temporal_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err(TemporalError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err(TemporalError::assert());
        }
    };
}

/// A general Sign type.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
    #[default]
    Positive = 1,
    Zero = 0,
    Negative = -1,
}

impl From<i8> for Sign {
    fn from(value: i8) -> Self {
        match value.cmp(&0) {
            Ordering::Greater => Self::Positive,
            Ordering::Equal => Self::Zero,
            Ordering::Less => Self::Negative,
        }
    }
}

impl Sign {
    /// Coerces the current `Sign` to be either negative or positive.
    pub(crate) fn as_sign_multiplier(&self) -> i8 {
        if matches!(self, Self::Zero) {
            return 1;
        }
        *self as i8
    }
}

// Relevant numeric constants
/// Nanoseconds per day constant: 8.64e+13
pub const NS_PER_DAY: u64 = MS_PER_DAY as u64 * 1_000_000;
/// Milliseconds per day constant: 8.64e+7
pub const MS_PER_DAY: u32 = 24 * 60 * 60 * 1000;
/// Nanoseconds per second.
pub(crate) const NS_PER_SECOND: i64 = 1_000_000_000;
/// Max Instant nanosecond constant
#[doc(hidden)]
pub(crate) const NS_MAX_INSTANT: i128 = NS_PER_DAY as i128 * 100_000_000i128;
/// Min Instant nanosecond constant
#[doc(hidden)]
pub(crate) const NS_MIN_INSTANT: i128 = -NS_MAX_INSTANT;
