//! This module implements the internal ISO field records.
//!
//! These records are the *exact* values wrapped by the partial-precision
//! kinds. They are public so callers can inspect a value's full components,
//! but the partial kinds are the intended entry point.
//!
//! The five record types are:
//!   - `IsoDate`
//!   - `IsoTime`
//!   - `IsoDateTime`
//!   - `IsoOffsetDateTime`
//!   - `IsoOffsetTime`
//!
//! ## Arithmetic
//!
//! Adding months or years constrains the day of month to the target month.
//! Adding time units to an `IsoTime` wraps around midnight, while an
//! `IsoDateTime` carries the overflow into its date.

use core::{cmp::Ordering, fmt};

use ixdtf::records::TimeRecord;
use num_traits::Euclid;
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    error::{ErrorMessage, TemporalError},
    fields::{ChronoField, MAX_ISO_YEAR, MIN_ISO_YEAR},
    options::{ArithmeticOverflow, TemporalUnit},
    parsers::{FormattableDate, FormattableTime, Precision},
    time::EpochNanoseconds,
    utils, TemporalResult, UtcOffset, NS_PER_DAY, NS_PER_SECOND,
};

/// The largest absolute epoch day representable by an `IsoDate`.
pub(crate) const MAX_EPOCH_DAYS: i64 = 100_000_000;

const NS_PER_DAY_I64: i64 = NS_PER_DAY as i64;

fn unit_nanoseconds(unit: TemporalUnit) -> TemporalResult<i64> {
    unit.as_nanoseconds()
        .map(|nanos| nanos as i64)
        .ok_or(TemporalError::unsupported_field().with_enum(ErrorMessage::UnitNotSupported))
}

fn unsupported_unit() -> TemporalError {
    TemporalError::unsupported_field().with_enum(ErrorMessage::UnitNotSupported)
}

fn unsupported_field() -> TemporalError {
    TemporalError::unsupported_field().with_enum(ErrorMessage::FieldNotSupported)
}

fn number_out_of_range() -> TemporalError {
    TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange)
}

// ==== `IsoDate` ====

/// `IsoDate` is a proleptic Gregorian calendar date.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    /// An ISO year within a range -271821..=275760
    pub year: i32,
    /// An ISO month within a valid range 1..=12
    pub month: u8,
    /// An ISO day within a valid range of 1..=31
    pub day: u8,
}

impl Default for IsoDate {
    fn default() -> Self {
        Self::new_unchecked(1970, 1, 1)
    }
}

impl IsoDate {
    /// Creates a new `IsoDate` without determining the validity.
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    pub(crate) fn regulate(
        year: i32,
        month: u8,
        day: u8,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        match overflow {
            ArithmeticOverflow::Constrain => {
                let month = month.clamp(1, 12);
                let day = constrain_iso_day(year, month, day);
                Ok(Self::new_unchecked(year, month, day))
            }
            ArithmeticOverflow::Reject => {
                if !is_valid_date(year, month, day) {
                    return Err(TemporalError::range().with_message("not a valid ISO date."));
                }
                Ok(Self::new_unchecked(year, month, day))
            }
        }
    }

    pub(crate) fn new_with_overflow(
        year: i32,
        month: u8,
        day: u8,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let date = Self::regulate(year, month, day, overflow)?;
        date.check_within_limits()?;
        Ok(date)
    }

    /// Creates a validated `IsoDate`, rejecting invalid or out-of-range dates.
    pub fn try_new(year: i32, month: u8, day: u8) -> TemporalResult<Self> {
        Self::new_with_overflow(year, month, day, ArithmeticOverflow::Reject)
    }

    /// Checks that this date lies within the supported epoch day range.
    pub fn check_within_limits(self) -> TemporalResult<()> {
        if !(MIN_ISO_YEAR..=MAX_ISO_YEAR).contains(&self.year)
            || self.to_epoch_days().abs() > MAX_EPOCH_DAYS
        {
            return Err(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange));
        }
        Ok(())
    }

    /// Equivalent to `IsoDateToEpochDays`
    #[inline]
    pub(crate) fn to_epoch_days(self) -> i64 {
        utils::epoch_days_from_gregorian_date(self.year, self.month, self.day)
    }

    pub(crate) fn from_epoch_days(epoch_days: i64) -> TemporalResult<Self> {
        if epoch_days.abs() > MAX_EPOCH_DAYS {
            return Err(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange));
        }
        let (year, month, day) = utils::ymd_from_epoch_days(epoch_days);
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Returns the ISO day of week, Monday being 1.
    #[inline]
    #[must_use]
    pub fn day_of_week(self) -> u8 {
        utils::iso_day_of_week(self.to_epoch_days())
    }

    #[inline]
    #[must_use]
    pub fn day_of_year(self) -> u16 {
        utils::iso_day_of_year(self.year, self.month, self.day)
    }

    /// Returns the months elapsed since year zero.
    #[inline]
    pub(crate) fn proleptic_month(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    pub(crate) fn add_days(self, days: i64) -> TemporalResult<Self> {
        let epoch_days = self
            .to_epoch_days()
            .checked_add(days)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange))?;
        Self::from_epoch_days(epoch_days)
    }

    pub(crate) fn add_months(self, months: i64) -> TemporalResult<Self> {
        let month_count = self
            .proleptic_month()
            .checked_add(months)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange))?;
        let (year, month) = month_count.div_rem_euclid(&12);
        let year = i32::try_from(year)
            .map_err(|_| TemporalError::range().with_enum(ErrorMessage::DateOutOfRange))?;
        Self::new_with_overflow(year, month as u8 + 1, self.day, ArithmeticOverflow::Constrain)
    }

    pub(crate) fn add_years(self, years: i64) -> TemporalResult<Self> {
        let months = years
            .checked_mul(12)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange))?;
        self.add_months(months)
    }

    /// Adds `amount` of a date `unit`.
    pub(crate) fn add(self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        match unit {
            TemporalUnit::Day => self.add_days(amount),
            TemporalUnit::Week => {
                self.add_days(amount.checked_mul(7).ok_or(number_out_of_range())?)
            }
            TemporalUnit::Month => self.add_months(amount),
            TemporalUnit::Year => self.add_years(amount),
            _ => Err(unsupported_unit()),
        }
    }

    pub(crate) fn days_until(self, other: Self) -> i64 {
        other.to_epoch_days() - self.to_epoch_days()
    }

    /// Returns the whole months between two dates, truncated toward zero.
    pub(crate) fn months_until(self, other: Self) -> i64 {
        let packed_start = self.proleptic_month() * 32 + i64::from(self.day);
        let packed_end = other.proleptic_month() * 32 + i64::from(other.day);
        (packed_end - packed_start) / 32
    }

    /// Returns the whole amount of a date `unit` between two dates.
    pub(crate) fn until(self, other: Self, unit: TemporalUnit) -> TemporalResult<i64> {
        match unit {
            TemporalUnit::Day => Ok(self.days_until(other)),
            TemporalUnit::Week => Ok(self.days_until(other) / 7),
            TemporalUnit::Month => Ok(self.months_until(other)),
            TemporalUnit::Year => Ok(self.months_until(other) / 12),
            _ => Err(unsupported_unit()),
        }
    }

    pub(crate) fn get_field(self, field: ChronoField) -> TemporalResult<i64> {
        match field {
            ChronoField::Year => Ok(i64::from(self.year)),
            ChronoField::MonthOfYear => Ok(i64::from(self.month)),
            ChronoField::DayOfMonth => Ok(i64::from(self.day)),
            ChronoField::DayOfYear => Ok(i64::from(self.day_of_year())),
            ChronoField::DayOfWeek => Ok(i64::from(self.day_of_week())),
            _ => Err(unsupported_field()),
        }
    }

    /// Returns a copy with `field` set to `value`.
    ///
    /// Setting the year or the month constrains the day of month; setting
    /// the day of month or the day of year rejects days the month or year
    /// does not have.
    pub(crate) fn with_field(self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        if !is_date_field(field) {
            return Err(unsupported_field());
        }
        let value = field.check_value(value)?;
        match field {
            ChronoField::Year => Self::new_with_overflow(
                value as i32,
                self.month,
                self.day,
                ArithmeticOverflow::Constrain,
            ),
            ChronoField::MonthOfYear => Self::new_with_overflow(
                self.year,
                value as u8,
                self.day,
                ArithmeticOverflow::Constrain,
            ),
            ChronoField::DayOfMonth => Self::try_new(self.year, self.month, value as u8),
            ChronoField::DayOfYear => {
                if value > i64::from(utils::iso_days_in_year(self.year)) {
                    return Err(TemporalError::range().with_message("not a valid ISO date."));
                }
                let start = Self::new_unchecked(self.year, 1, 1).to_epoch_days();
                Self::from_epoch_days(start + value - 1).and_then(|date| {
                    date.check_within_limits()?;
                    Ok(date)
                })
            }
            ChronoField::DayOfWeek => self.add_days(value - i64::from(self.day_of_week())),
            _ => Err(unsupported_field()),
        }
    }
}

#[inline]
pub(crate) fn is_date_field(field: ChronoField) -> bool {
    matches!(
        field,
        ChronoField::Year
            | ChronoField::MonthOfYear
            | ChronoField::DayOfMonth
            | ChronoField::DayOfYear
            | ChronoField::DayOfWeek
    )
}

#[inline]
pub(crate) fn is_time_field(field: ChronoField) -> bool {
    matches!(
        field,
        ChronoField::HourOfDay
            | ChronoField::MinuteOfHour
            | ChronoField::SecondOfMinute
            | ChronoField::MilliOfSecond
            | ChronoField::NanoOfSecond
    )
}

#[inline]
pub(crate) fn is_valid_date(year: i32, month: u8, day: u8) -> bool {
    if !(1..=12).contains(&month) {
        return false;
    }
    is_valid_iso_day(year, month, day)
}

/// Note: month is 1 based.
#[inline]
pub(crate) fn constrain_iso_day(year: i32, month: u8, day: u8) -> u8 {
    let days_in_month = utils::iso_days_in_month(year, month);
    day.clamp(1, days_in_month)
}

#[inline]
pub(crate) fn is_valid_iso_day(year: i32, month: u8, day: u8) -> bool {
    let days_in_month = utils::iso_days_in_month(year, month);
    (1..=days_in_month).contains(&day)
}

// ==== `IsoTime` ====

/// An `IsoTime` record that contains a wall-clock time of day.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTime {
    /// A valid hour value between 0..=23
    pub hour: u8, // 0..=23
    /// A valid minute value between 0..=59
    pub minute: u8, // 0..=59
    /// A valid second value between 0..=59
    pub second: u8, // 0..=59
    /// A valid millisecond value between 0..=999
    pub millisecond: u16, // 0..=999
    /// A valid microsecond value between 0..=999
    pub microsecond: u16, // 0..=999
    /// A valid nanosecond value between 0..=999
    pub nanosecond: u16, // 0..=999
}

impl IsoTime {
    /// Creates a new `IsoTime` without any validation.
    pub(crate) const fn new_unchecked(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
        }
    }

    /// Creates a new regulated `IsoTime`.
    pub fn new(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<IsoTime> {
        match overflow {
            ArithmeticOverflow::Constrain => Ok(Self::new_unchecked(
                hour.clamp(0, 23),
                minute.clamp(0, 59),
                second.clamp(0, 59),
                millisecond.clamp(0, 999),
                microsecond.clamp(0, 999),
                nanosecond.clamp(0, 999),
            )),
            ArithmeticOverflow::Reject => {
                if !is_valid_time(hour, minute, second, millisecond, microsecond, nanosecond) {
                    return Err(TemporalError::range().with_message("IsoTime is not valid"));
                };
                Ok(Self::new_unchecked(
                    hour,
                    minute,
                    second,
                    millisecond,
                    microsecond,
                    nanosecond,
                ))
            }
        }
    }

    /// Creates a validated `IsoTime` from an hour, minute, second and
    /// nanosecond of second.
    pub fn from_components(
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> TemporalResult<Self> {
        if nanosecond > 999_999_999 {
            return Err(TemporalError::range().with_message("IsoTime is not valid"));
        }
        let (millisecond, rem) = nanosecond.div_rem_euclid(&1_000_000);
        let (microsecond, nanosecond) = rem.div_rem_euclid(&1_000);
        Self::new(
            hour,
            minute,
            second,
            millisecond as u16,
            microsecond as u16,
            nanosecond as u16,
            ArithmeticOverflow::Reject,
        )
    }

    pub(crate) fn from_time_record(time_record: TimeRecord) -> TemporalResult<Self> {
        let second = time_record.second.clamp(0, 59);
        let fractional_seconds = time_record
            .fraction
            .map(|x| {
                x.to_nanoseconds().ok_or(
                    TemporalError::range()
                        .with_enum(ErrorMessage::FractionalTimeMoreThanNineDigits),
                )
            })
            .transpose()?
            .unwrap_or(0);

        Self::from_components(
            time_record.hour,
            time_record.minute,
            second,
            fractional_seconds,
        )
    }

    /// Returns the nanosecond of second, combining the sub-second slots.
    #[inline]
    #[must_use]
    pub fn nanosecond_of_second(&self) -> u32 {
        u32::from(self.millisecond) * 1_000_000
            + u32::from(self.microsecond) * 1_000
            + u32::from(self.nanosecond)
    }

    #[inline]
    pub(crate) fn to_nanoseconds_of_day(self) -> i64 {
        (i64::from(self.hour) * 3_600 + i64::from(self.minute) * 60 + i64::from(self.second))
            * NS_PER_SECOND
            + i64::from(self.nanosecond_of_second())
    }

    /// Creates a time from nanoseconds of day, wrapping around midnight.
    pub(crate) fn from_nanoseconds_of_day(nanoseconds: i64) -> Self {
        let nanoseconds = nanoseconds.rem_euclid(NS_PER_DAY_I64);
        let (seconds, fraction) = nanoseconds.div_rem_euclid(&NS_PER_SECOND);
        let fraction = fraction as u32;
        Self::new_unchecked(
            (seconds / 3_600) as u8,
            ((seconds / 60) % 60) as u8,
            (seconds % 60) as u8,
            (fraction / 1_000_000) as u16,
            ((fraction / 1_000) % 1_000) as u16,
            (fraction % 1_000) as u16,
        )
    }

    /// Adds `amount` of a time `unit`, returning the days carried and the
    /// resulting wall-clock time.
    pub(crate) fn add_with_carry(
        self,
        amount: i64,
        unit: TemporalUnit,
    ) -> TemporalResult<(i64, Self)> {
        if !unit.is_time_unit() {
            return Err(unsupported_unit());
        }
        let total = i128::from(self.to_nanoseconds_of_day())
            + i128::from(amount) * i128::from(unit_nanoseconds(unit)?);
        let (days, nanoseconds) = total.div_rem_euclid(&i128::from(NS_PER_DAY_I64));
        let days = i64::try_from(days).map_err(|_| number_out_of_range())?;
        Ok((days, Self::from_nanoseconds_of_day(nanoseconds as i64)))
    }

    /// Adds `amount` of a time `unit`, wrapping around midnight.
    pub(crate) fn add(self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        self.add_with_carry(amount, unit).map(|(_, time)| time)
    }

    pub(crate) fn until(self, other: Self, unit: TemporalUnit) -> TemporalResult<i64> {
        if !unit.is_time_unit() {
            return Err(unsupported_unit());
        }
        Ok((other.to_nanoseconds_of_day() - self.to_nanoseconds_of_day()) / unit_nanoseconds(unit)?)
    }

    pub(crate) fn get_field(self, field: ChronoField) -> TemporalResult<i64> {
        match field {
            ChronoField::HourOfDay => Ok(i64::from(self.hour)),
            ChronoField::MinuteOfHour => Ok(i64::from(self.minute)),
            ChronoField::SecondOfMinute => Ok(i64::from(self.second)),
            ChronoField::MilliOfSecond => Ok(i64::from(self.millisecond)),
            ChronoField::NanoOfSecond => Ok(i64::from(self.nanosecond_of_second())),
            _ => Err(unsupported_field()),
        }
    }

    pub(crate) fn with_field(self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        if !is_time_field(field) {
            return Err(unsupported_field());
        }
        let value = field.check_value(value)?;
        let (hour, minute, second, nanosecond) = (
            self.hour,
            self.minute,
            self.second,
            self.nanosecond_of_second(),
        );
        match field {
            ChronoField::HourOfDay => {
                Self::from_components(value as u8, minute, second, nanosecond)
            }
            ChronoField::MinuteOfHour => {
                Self::from_components(hour, value as u8, second, nanosecond)
            }
            ChronoField::SecondOfMinute => {
                Self::from_components(hour, minute, value as u8, nanosecond)
            }
            ChronoField::MilliOfSecond => {
                Self::from_components(hour, minute, second, value as u32 * 1_000_000)
            }
            ChronoField::NanoOfSecond => Self::from_components(hour, minute, second, value as u32),
            _ => Err(unsupported_field()),
        }
    }

    fn to_formattable(self) -> FormattableTime {
        FormattableTime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            nanosecond: self.nanosecond_of_second(),
            precision: Precision::Auto,
            include_sep: true,
        }
    }
}

#[inline]
pub(crate) fn is_valid_time(hour: u8, minute: u8, second: u8, ms: u16, mis: u16, ns: u16) -> bool {
    if !(0..=23).contains(&hour) {
        return false;
    }

    let min_sec = 0..=59;
    if !min_sec.contains(&minute) || !min_sec.contains(&second) {
        return false;
    }

    let sub_second = 0..=999;
    sub_second.contains(&ms) && sub_second.contains(&mis) && sub_second.contains(&ns)
}

// ==== `IsoDateTime` ====

/// `IsoDateTime` is the record of an `IsoDate` and an `IsoTime`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDateTime {
    /// The `IsoDate` fields.
    pub date: IsoDate,
    /// The `IsoTime` fields.
    pub time: IsoTime,
}

impl IsoDateTime {
    /// Creates a new `IsoDateTime` without any validaiton.
    pub(crate) const fn new_unchecked(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Creates a new validated `IsoDateTime` that is within valid limits.
    pub fn new(date: IsoDate, time: IsoTime) -> TemporalResult<Self> {
        date.check_within_limits()
            .map_err(|_| TemporalError::range().with_enum(ErrorMessage::DateTimeOutOfRange))?;
        Ok(Self::new_unchecked(date, time))
    }

    /// Creates the local date-time observed at `offset` for an instant.
    pub(crate) fn from_epoch_nanoseconds(
        epoch_nanoseconds: EpochNanoseconds,
        offset: UtcOffset,
    ) -> TemporalResult<Self> {
        let local = epoch_nanoseconds.as_i128() + i128::from(offset.nanoseconds());
        let (days, nanoseconds) = local.div_rem_euclid(&i128::from(NS_PER_DAY_I64));
        let days = i64::try_from(days)
            .map_err(|_| TemporalError::range().with_enum(ErrorMessage::DateTimeOutOfRange))?;
        let date = IsoDate::from_epoch_days(days)
            .map_err(|_| TemporalError::range().with_enum(ErrorMessage::DateTimeOutOfRange))?;
        Ok(Self::new_unchecked(
            date,
            IsoTime::from_nanoseconds_of_day(nanoseconds as i64),
        ))
    }

    /// Returns this date-time as nanoseconds since the epoch, read as UTC.
    #[inline]
    pub fn as_nanoseconds(&self) -> i128 {
        i128::from(self.date.to_epoch_days()) * i128::from(NS_PER_DAY_I64)
            + i128::from(self.time.to_nanoseconds_of_day())
    }

    pub(crate) fn add(self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        if unit.is_date_unit() {
            return Ok(Self::new_unchecked(self.date.add(amount, unit)?, self.time));
        }
        let (days, time) = self.time.add_with_carry(amount, unit)?;
        let date = self
            .date
            .add_days(days)
            .map_err(|_| TemporalError::range().with_enum(ErrorMessage::DateTimeOutOfRange))?;
        Ok(Self::new_unchecked(date, time))
    }

    /// Returns the whole amount of `unit` between two date-times.
    ///
    /// For date units the end date is moved one day toward the start when
    /// its time of day has not yet been reached.
    pub(crate) fn until(self, other: Self, unit: TemporalUnit) -> TemporalResult<i64> {
        if unit.is_date_unit() {
            let mut end = other.date;
            if end > self.date && other.time < self.time {
                end = end.add_days(-1)?;
            } else if end < self.date && other.time > self.time {
                end = end.add_days(1)?;
            }
            return self.date.until(end, unit);
        }
        if !unit.is_time_unit() {
            return Err(unsupported_unit());
        }
        let nanoseconds = other.as_nanoseconds() - self.as_nanoseconds();
        i64::try_from(nanoseconds / i128::from(unit_nanoseconds(unit)?))
            .map_err(|_| number_out_of_range())
    }

    pub(crate) fn get_field(self, field: ChronoField) -> TemporalResult<i64> {
        if is_date_field(field) {
            return self.date.get_field(field);
        }
        self.time.get_field(field)
    }

    pub(crate) fn with_field(self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        if is_date_field(field) {
            return Ok(Self::new_unchecked(
                self.date.with_field(field, value)?,
                self.time,
            ));
        }
        Ok(Self::new_unchecked(
            self.date,
            self.time.with_field(field, value)?,
        ))
    }
}

// ==== `IsoOffsetDateTime` ====

/// A date-time observed at a fixed UTC offset.
///
/// Values order by the instant they denote first, and by their local
/// date-time second.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsoOffsetDateTime {
    /// The local date-time.
    pub date_time: IsoDateTime,
    /// The offset of the local date-time from UTC.
    pub offset: UtcOffset,
}

impl IsoOffsetDateTime {
    pub(crate) const fn new_unchecked(date_time: IsoDateTime, offset: UtcOffset) -> Self {
        Self { date_time, offset }
    }

    /// Returns the instant this value denotes.
    #[inline]
    pub fn epoch_nanoseconds(&self) -> i128 {
        self.date_time.as_nanoseconds() - i128::from(self.offset.nanoseconds())
    }

    /// Returns the same instant observed at `offset`.
    pub(crate) fn with_offset_same_instant(self, offset: UtcOffset) -> TemporalResult<Self> {
        let epoch_nanoseconds = EpochNanoseconds(self.epoch_nanoseconds());
        let date_time = IsoDateTime::from_epoch_nanoseconds(epoch_nanoseconds, offset)?;
        Ok(Self::new_unchecked(date_time, offset))
    }

    pub(crate) fn add(self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        Ok(Self::new_unchecked(
            self.date_time.add(amount, unit)?,
            self.offset,
        ))
    }

    pub(crate) fn until(self, other: Self, unit: TemporalUnit) -> TemporalResult<i64> {
        let other = other.with_offset_same_instant(self.offset)?;
        self.date_time.until(other.date_time, unit)
    }

    pub(crate) fn get_field(self, field: ChronoField) -> TemporalResult<i64> {
        if field == ChronoField::OffsetSeconds {
            return Ok(i64::from(self.offset.seconds()));
        }
        self.date_time.get_field(field)
    }

    /// Setting `OffsetSeconds` keeps the local date-time.
    pub(crate) fn with_field(self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        if field == ChronoField::OffsetSeconds {
            let offset = UtcOffset::from_seconds(field.check_value(value)? as i32)?;
            return Ok(Self::new_unchecked(self.date_time, offset));
        }
        Ok(Self::new_unchecked(
            self.date_time.with_field(field, value)?,
            self.offset,
        ))
    }
}

impl Ord for IsoOffsetDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_nanoseconds()
            .cmp(&other.epoch_nanoseconds())
            .then_with(|| self.date_time.cmp(&other.date_time))
    }
}

impl PartialOrd for IsoOffsetDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ==== `IsoOffsetTime` ====

/// A time of day observed at a fixed UTC offset.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsoOffsetTime {
    /// The local time of day.
    pub time: IsoTime,
    /// The offset of the local time from UTC.
    pub offset: UtcOffset,
}

impl IsoOffsetTime {
    pub(crate) const fn new_unchecked(time: IsoTime, offset: UtcOffset) -> Self {
        Self { time, offset }
    }

    /// Returns the nanoseconds of the UTC day, which may fall outside a
    /// single day.
    #[inline]
    pub(crate) fn epoch_nanoseconds_of_day(&self) -> i64 {
        self.time.to_nanoseconds_of_day() - self.offset.nanoseconds()
    }

    pub(crate) fn add(self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        Ok(Self::new_unchecked(self.time.add(amount, unit)?, self.offset))
    }

    pub(crate) fn until(self, other: Self, unit: TemporalUnit) -> TemporalResult<i64> {
        if !unit.is_time_unit() {
            return Err(unsupported_unit());
        }
        Ok((other.epoch_nanoseconds_of_day() - self.epoch_nanoseconds_of_day())
            / unit_nanoseconds(unit)?)
    }

    pub(crate) fn get_field(self, field: ChronoField) -> TemporalResult<i64> {
        if field == ChronoField::OffsetSeconds {
            return Ok(i64::from(self.offset.seconds()));
        }
        self.time.get_field(field)
    }

    pub(crate) fn with_field(self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        if field == ChronoField::OffsetSeconds {
            let offset = UtcOffset::from_seconds(field.check_value(value)? as i32)?;
            return Ok(Self::new_unchecked(self.time, offset));
        }
        Ok(Self::new_unchecked(
            self.time.with_field(field, value)?,
            self.offset,
        ))
    }
}

impl Ord for IsoOffsetTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_nanoseconds_of_day()
            .cmp(&other.epoch_nanoseconds_of_day())
            .then_with(|| self.time.cmp(&other.time))
    }
}

impl PartialOrd for IsoOffsetTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ==== Rendering ====

impl Writeable for IsoDate {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        FormattableDate(self.year, self.month, self.day).write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        FormattableDate(self.year, self.month, self.day).writeable_length_hint()
    }
}

impl Writeable for IsoTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.to_formattable().write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.to_formattable().writeable_length_hint()
    }
}

impl Writeable for IsoDateTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.date.write_to(sink)?;
        sink.write_char('T')?;
        self.time.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.date.writeable_length_hint() + 1 + self.time.writeable_length_hint()
    }
}

impl Writeable for IsoOffsetDateTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.date_time.write_to(sink)?;
        self.offset.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.date_time.writeable_length_hint() + self.offset.writeable_length_hint()
    }
}

impl Writeable for IsoOffsetTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.time.write_to(sink)?;
        self.offset.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.time.writeable_length_hint() + self.offset.writeable_length_hint()
    }
}

impl_display_with_writeable!(IsoDate);
impl_display_with_writeable!(IsoTime);
impl_display_with_writeable!(IsoDateTime);
impl_display_with_writeable!(IsoOffsetDateTime);
impl_display_with_writeable!(IsoOffsetTime);

#[cfg(test)]
mod tests {
    use alloc::format;
    use super::{IsoDate, IsoDateTime, IsoOffsetDateTime, IsoOffsetTime, IsoTime};
    use crate::{
        error::ErrorKind, fields::ChronoField, options::TemporalUnit, time::EpochNanoseconds,
        UtcOffset,
    };
    use writeable::assert_writeable_eq;

    fn date(year: i32, month: u8, day: u8) -> IsoDate {
        IsoDate::try_new(year, month, day).unwrap()
    }

    fn time(hour: u8, minute: u8, second: u8, nanosecond: u32) -> IsoTime {
        IsoTime::from_components(hour, minute, second, nanosecond).unwrap()
    }

    #[test]
    fn date_validation() {
        assert!(IsoDate::try_new(2021, 2, 29).is_err());
        assert!(IsoDate::try_new(2020, 2, 29).is_ok());
        assert!(IsoDate::try_new(2021, 13, 1).is_err());
        assert!(IsoDate::try_new(275_760, 9, 13).is_ok());
        let err = IsoDate::try_new(275_760, 9, 14).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn date_month_arithmetic_constrains_day() {
        assert_eq!(date(2021, 1, 31).add_months(1).unwrap(), date(2021, 2, 28));
        assert_eq!(date(2020, 2, 29).add_years(1).unwrap(), date(2021, 2, 28));
        assert_eq!(date(2021, 12, 15).add_months(1).unwrap(), date(2022, 1, 15));
        assert_eq!(date(2021, 1, 15).add_months(-13).unwrap(), date(2019, 12, 15));
        assert_eq!(
            date(2021, 8, 6).add(2, TemporalUnit::Week).unwrap(),
            date(2021, 8, 20)
        );
        assert!(date(2021, 8, 6).add(1, TemporalUnit::Hour).is_err());
    }

    #[test]
    fn date_differences() {
        let start = date(2021, 1, 31);
        assert_eq!(start.until(date(2021, 2, 28), TemporalUnit::Month).unwrap(), 0);
        assert_eq!(start.until(date(2021, 3, 31), TemporalUnit::Month).unwrap(), 2);
        assert_eq!(start.until(date(2020, 12, 31), TemporalUnit::Month).unwrap(), -1);
        assert_eq!(start.until(date(2022, 1, 30), TemporalUnit::Year).unwrap(), 0);
        assert_eq!(start.until(date(2021, 2, 14), TemporalUnit::Week).unwrap(), 2);
        assert_eq!(start.until(date(2021, 2, 1), TemporalUnit::Day).unwrap(), 1);
    }

    #[test]
    fn date_fields() {
        let value = date(2021, 8, 6);
        assert_eq!(value.get_field(ChronoField::DayOfWeek).unwrap(), 5);
        assert_eq!(value.get_field(ChronoField::DayOfYear).unwrap(), 218);
        assert!(value.get_field(ChronoField::HourOfDay).is_err());

        let leap = date(2020, 2, 29);
        assert_eq!(leap.with_field(ChronoField::Year, 2021).unwrap(), date(2021, 2, 28));
        assert!(leap.with_field(ChronoField::DayOfMonth, 30).is_err());
        assert_eq!(
            value.with_field(ChronoField::DayOfWeek, 1).unwrap(),
            date(2021, 8, 2)
        );
        assert_eq!(
            value.with_field(ChronoField::DayOfYear, 1).unwrap(),
            date(2021, 1, 1)
        );
        assert!(value.with_field(ChronoField::DayOfYear, 366).is_err());
        assert!(value.with_field(ChronoField::MonthOfYear, 13).is_err());
    }

    #[test]
    fn time_wraps_around_midnight() {
        let value = time(23, 30, 0, 0);
        assert_eq!(value.add(45, TemporalUnit::Minute).unwrap(), time(0, 15, 0, 0));
        assert_eq!(
            value.add_with_carry(-24, TemporalUnit::Hour).unwrap(),
            (-1, value)
        );
        assert_eq!(
            time(0, 0, 0, 0).add(-1, TemporalUnit::Nanosecond).unwrap(),
            time(23, 59, 59, 999_999_999)
        );
        assert!(value.add(1, TemporalUnit::Day).is_err());
        assert_eq!(
            time(4, 0, 0, 0).until(time(2, 30, 0, 0), TemporalUnit::Hour).unwrap(),
            -1
        );
    }

    #[test]
    fn time_fields() {
        let value = time(4, 3, 2, 123_456_789);
        assert_eq!(value.get_field(ChronoField::MilliOfSecond).unwrap(), 123);
        assert_eq!(value.get_field(ChronoField::NanoOfSecond).unwrap(), 123_456_789);
        assert_eq!(
            value.with_field(ChronoField::MilliOfSecond, 5).unwrap(),
            time(4, 3, 2, 5_000_000)
        );
        assert!(value.with_field(ChronoField::HourOfDay, 24).is_err());
        assert!(value.with_field(ChronoField::Year, 2021).is_err());
    }

    #[test]
    fn date_time_carry_and_difference() {
        let start = IsoDateTime::new(date(2021, 12, 31), time(23, 0, 0, 0)).unwrap();
        let next = start.add(90, TemporalUnit::Minute).unwrap();
        assert_eq!(next, IsoDateTime::new(date(2022, 1, 1), time(0, 30, 0, 0)).unwrap());
        assert_eq!(start.until(next, TemporalUnit::Minute).unwrap(), 90);
        assert_eq!(start.until(next, TemporalUnit::Day).unwrap(), 0);

        let later = IsoDateTime::new(date(2022, 1, 1), time(23, 0, 0, 0)).unwrap();
        assert_eq!(start.until(later, TemporalUnit::Day).unwrap(), 1);
    }

    #[test]
    fn offset_date_time_same_instant() {
        let local = IsoDateTime::new(date(2021, 8, 6), time(4, 3, 2, 0)).unwrap();
        let value = IsoOffsetDateTime::new_unchecked(local, UtcOffset::from_seconds(7200).unwrap());
        let utc = value.with_offset_same_instant(UtcOffset::UTC).unwrap();
        assert_eq!(
            utc.date_time,
            IsoDateTime::new(date(2021, 8, 6), time(2, 3, 2, 0)).unwrap()
        );
        assert_eq!(utc.epoch_nanoseconds(), value.epoch_nanoseconds());
        // Same instant, so the local date-time decides.
        assert!(utc < value);
        assert_eq!(value.until(utc, TemporalUnit::Second).unwrap(), 0);
        assert_writeable_eq!(value, "2021-08-06T04:03:02+02:00");
    }

    #[test]
    fn offset_time_ordering() {
        let plus_two = IsoOffsetTime::new_unchecked(
            time(4, 0, 0, 0),
            UtcOffset::from_seconds(7200).unwrap(),
        );
        let utc = IsoOffsetTime::new_unchecked(time(3, 0, 0, 0), UtcOffset::UTC);
        assert!(plus_two < utc);
        assert_eq!(plus_two.until(utc, TemporalUnit::Hour).unwrap(), 1);
        assert_writeable_eq!(utc, "03:00:00Z");
    }

    #[test]
    fn date_time_from_epoch() {
        let value = IsoDateTime::from_epoch_nanoseconds(
            EpochNanoseconds::from_seconds(-1),
            UtcOffset::UTC,
        )
        .unwrap();
        assert_writeable_eq!(value, "1969-12-31T23:59:59");
        let value = IsoDateTime::from_epoch_nanoseconds(
            EpochNanoseconds::from_seconds(0),
            UtcOffset::from_seconds(-3600).unwrap(),
        )
        .unwrap();
        assert_writeable_eq!(value, "1969-12-31T23:00:00");
    }
}
