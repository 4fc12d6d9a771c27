//! This module implements `OpenEhrTemporal`, the partial-precision wrapper
//! shared by every value kind, and the `ExactTemporal` records it wraps.

use core::{
    cmp::Ordering,
    fmt::{self, Write},
    hash::{Hash, Hasher},
};

use writeable::{LengthHint, Writeable};

use crate::{
    error::ErrorMessage,
    fields::{ChronoField, FieldState, FieldStateHolder, FieldStates, OpenEhrField},
    iso::{self, IsoDate, IsoDateTime, IsoOffsetDateTime, IsoOffsetTime, IsoTime},
    options::{ResolverMode, TemporalUnit},
    parsers::FormattablePartial,
    temporal_assert, TemporalError, TemporalResult, UtcOffset,
};

// ==== TemporalKind ====

/// The five shapes a partial temporal can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
    OffsetDateTime,
    OffsetTime,
}

impl TemporalKind {
    #[inline]
    #[must_use]
    pub const fn has_date(self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::OffsetDateTime)
    }

    #[inline]
    #[must_use]
    pub const fn has_time(self) -> bool {
        !matches!(self, Self::Date)
    }

    #[inline]
    #[must_use]
    pub const fn has_offset(self) -> bool {
        matches!(self, Self::OffsetDateTime | Self::OffsetTime)
    }

    /// The field-state configuration values of this kind use by default.
    #[must_use]
    pub const fn default_field_states(self) -> FieldStates {
        match self {
            Self::Date => FieldStates::DATE,
            Self::Time => FieldStates::TIME,
            Self::DateTime => FieldStates::DATE_TIME,
            Self::OffsetDateTime => FieldStates::OFFSET_DATE_TIME,
            Self::OffsetTime => FieldStates::OFFSET_TIME,
        }
    }

    /// The finest precision field values of this kind can carry.
    #[must_use]
    pub const fn floor(self) -> OpenEhrField {
        match self {
            Self::Date => OpenEhrField::Days,
            _ => OpenEhrField::MINIMUM,
        }
    }
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
            Self::OffsetDateTime => "offset date-time",
            Self::OffsetTime => "offset time",
        }
        .fmt(f)
    }
}

// ==== ExactTemporal ====

mod private {
    pub trait Sealed {}

    impl Sealed for crate::iso::IsoDate {}
    impl Sealed for crate::iso::IsoTime {}
    impl Sealed for crate::iso::IsoDateTime {}
    impl Sealed for crate::iso::IsoOffsetDateTime {}
    impl Sealed for crate::iso::IsoOffsetTime {}
}

/// An exact ISO record that a partial temporal can wrap.
///
/// This trait is sealed; it is implemented for the five records of the
/// [`iso`](crate::iso) module only.
pub trait ExactTemporal:
    private::Sealed + Copy + Eq + Ord + Hash + fmt::Debug + Writeable
{
    /// The kind of partial temporal wrapping this record.
    const KIND: TemporalKind;

    /// Whether the record can add or measure `unit`.
    fn supports_unit(unit: TemporalUnit) -> bool;

    /// Whether the record has a value for `field`.
    fn supports_field(field: ChronoField) -> bool;

    fn get_field(&self, field: ChronoField) -> TemporalResult<i64>;

    fn with_field(&self, field: ChronoField, value: i64) -> TemporalResult<Self>;

    fn add(&self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self>;

    fn until(&self, other: &Self, unit: TemporalUnit) -> TemporalResult<i64>;
}

fn is_time_unit(unit: TemporalUnit) -> bool {
    unit.is_time_unit()
}

fn is_date_time_unit(unit: TemporalUnit) -> bool {
    unit != TemporalUnit::Auto
}

impl ExactTemporal for IsoDate {
    const KIND: TemporalKind = TemporalKind::Date;

    fn supports_unit(unit: TemporalUnit) -> bool {
        unit.is_date_unit()
    }

    fn supports_field(field: ChronoField) -> bool {
        iso::is_date_field(field)
    }

    fn get_field(&self, field: ChronoField) -> TemporalResult<i64> {
        IsoDate::get_field(*self, field)
    }

    fn with_field(&self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        IsoDate::with_field(*self, field, value)
    }

    fn add(&self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        IsoDate::add(*self, amount, unit)
    }

    fn until(&self, other: &Self, unit: TemporalUnit) -> TemporalResult<i64> {
        IsoDate::until(*self, *other, unit)
    }
}

impl ExactTemporal for IsoTime {
    const KIND: TemporalKind = TemporalKind::Time;

    fn supports_unit(unit: TemporalUnit) -> bool {
        is_time_unit(unit)
    }

    fn supports_field(field: ChronoField) -> bool {
        iso::is_time_field(field)
    }

    fn get_field(&self, field: ChronoField) -> TemporalResult<i64> {
        IsoTime::get_field(*self, field)
    }

    fn with_field(&self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        IsoTime::with_field(*self, field, value)
    }

    fn add(&self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        IsoTime::add(*self, amount, unit)
    }

    fn until(&self, other: &Self, unit: TemporalUnit) -> TemporalResult<i64> {
        IsoTime::until(*self, *other, unit)
    }
}

impl ExactTemporal for IsoDateTime {
    const KIND: TemporalKind = TemporalKind::DateTime;

    fn supports_unit(unit: TemporalUnit) -> bool {
        is_date_time_unit(unit)
    }

    fn supports_field(field: ChronoField) -> bool {
        iso::is_date_field(field) || iso::is_time_field(field)
    }

    fn get_field(&self, field: ChronoField) -> TemporalResult<i64> {
        IsoDateTime::get_field(*self, field)
    }

    fn with_field(&self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        IsoDateTime::with_field(*self, field, value)
    }

    fn add(&self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        IsoDateTime::add(*self, amount, unit)
    }

    fn until(&self, other: &Self, unit: TemporalUnit) -> TemporalResult<i64> {
        IsoDateTime::until(*self, *other, unit)
    }
}

impl ExactTemporal for IsoOffsetDateTime {
    const KIND: TemporalKind = TemporalKind::OffsetDateTime;

    fn supports_unit(unit: TemporalUnit) -> bool {
        is_date_time_unit(unit)
    }

    fn supports_field(field: ChronoField) -> bool {
        field == ChronoField::OffsetSeconds || IsoDateTime::supports_field(field)
    }

    fn get_field(&self, field: ChronoField) -> TemporalResult<i64> {
        IsoOffsetDateTime::get_field(*self, field)
    }

    fn with_field(&self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        IsoOffsetDateTime::with_field(*self, field, value)
    }

    fn add(&self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        IsoOffsetDateTime::add(*self, amount, unit)
    }

    fn until(&self, other: &Self, unit: TemporalUnit) -> TemporalResult<i64> {
        IsoOffsetDateTime::until(*self, *other, unit)
    }
}

impl ExactTemporal for IsoOffsetTime {
    const KIND: TemporalKind = TemporalKind::OffsetTime;

    fn supports_unit(unit: TemporalUnit) -> bool {
        is_time_unit(unit)
    }

    fn supports_field(field: ChronoField) -> bool {
        field == ChronoField::OffsetSeconds || iso::is_time_field(field)
    }

    fn get_field(&self, field: ChronoField) -> TemporalResult<i64> {
        IsoOffsetTime::get_field(*self, field)
    }

    fn with_field(&self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        IsoOffsetTime::with_field(*self, field, value)
    }

    fn add(&self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        IsoOffsetTime::add(*self, amount, unit)
    }

    fn until(&self, other: &Self, unit: TemporalUnit) -> TemporalResult<i64> {
        IsoOffsetTime::until(*self, *other, unit)
    }
}

/// Rejects the offset field, which is not a granularity level.
pub(crate) fn check_precision(precision: OpenEhrField) -> TemporalResult<()> {
    if precision == OpenEhrField::OffsetSeconds {
        return Err(TemporalError::field_mapping()
            .with_message("The offset cannot be the precision of a temporal."));
    }
    Ok(())
}

// ==== OpenEhrTemporal ====

/// A temporal value that is precise only down to its precision field.
///
/// The wrapped exact record always holds every component of its kind;
/// components finer than the precision field carry their natural zero
/// (month and day 1, time components 0) and are reported as unsupported
/// unless the field states force them.
///
/// Values are compared, ordered and hashed by their exact record and
/// precision field only. The field states and the resolver mode describe how
/// a value is presented, not which value it is.
#[derive(Debug, Clone, Copy)]
pub struct OpenEhrTemporal<T: ExactTemporal> {
    exact: T,
    precision: OpenEhrField,
    field_states: FieldStates,
    resolver_mode: ResolverMode,
}

// ==== Private API ====

impl<T: ExactTemporal> OpenEhrTemporal<T> {
    /// Creates a new value with a precision already known to be a date-time
    /// field, clamping it to the kind's floor.
    pub(crate) fn new_unchecked(
        exact: T,
        precision: OpenEhrField,
        field_states: FieldStates,
        resolver_mode: ResolverMode,
    ) -> Self {
        Self {
            exact,
            precision: precision.coarser(T::KIND.floor()),
            field_states,
            resolver_mode,
        }
    }

    /// Completes `field_states` with the kind's default entries.
    fn fill_field_states(field_states: FieldStates) -> FieldStates {
        T::KIND
            .default_field_states()
            .iter()
            .filter(|(field, _)| !field_states.contains(*field))
            .fold(field_states, |states, (field, state)| states.with(field, state))
    }

    /// Rewraps `exact` after an operation that touched `unit`.
    fn rewrap(&self, exact: T, unit: Option<TemporalUnit>) -> TemporalResult<Self> {
        let precision = match unit {
            Some(unit) => self.precision.finer(OpenEhrField::try_from_unit(unit)?),
            None => self.precision,
        };
        temporal_assert!(
            !self.precision.is_finer_than(precision),
            "precision narrowed from {} to {precision}",
            self.precision
        );
        Ok(Self::new_unchecked(
            exact,
            precision,
            self.field_states,
            self.resolver_mode,
        ))
    }

    fn supported_component(&self, field: OpenEhrField) -> TemporalResult<Option<i64>> {
        let chrono_field = field.chrono_field();
        if !self.is_field_supported(chrono_field) {
            return Ok(None);
        }
        self.exact.get_field(chrono_field).map(Some)
    }

    fn supported_u8(&self, field: OpenEhrField) -> TemporalResult<Option<u8>> {
        self.supported_component(field)?
            .map(|value| {
                u8::try_from(value)
                    .map_err(|_| TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange))
            })
            .transpose()
    }

    /// Collects the supported components for rendering.
    pub(crate) fn to_formattable(&self) -> TemporalResult<FormattablePartial> {
        let year = self
            .supported_component(OpenEhrField::Years)?
            .map(|year| {
                i32::try_from(year)
                    .map_err(|_| TemporalError::range().with_enum(ErrorMessage::DateOutOfRange))
            })
            .transpose()?;
        let nanosecond = self
            .supported_component(OpenEhrField::Nanos)?
            .map(|nanos| {
                u32::try_from(nanos)
                    .map_err(|_| TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange))
            })
            .transpose()?;
        let offset = self
            .supported_component(OpenEhrField::OffsetSeconds)?
            .map(|seconds| {
                i32::try_from(seconds)
                    .map_err(|_| TemporalError::range().with_enum(ErrorMessage::OffsetOutOfRange))
                    .and_then(UtcOffset::from_seconds)
            })
            .transpose()?;
        Ok(FormattablePartial {
            year,
            month: self.supported_u8(OpenEhrField::Months)?,
            day: self.supported_u8(OpenEhrField::Days)?,
            hour: self.supported_u8(OpenEhrField::Hours)?,
            minute: self.supported_u8(OpenEhrField::Minutes)?,
            second: self.supported_u8(OpenEhrField::Seconds)?,
            nanosecond,
            offset,
        })
    }
}

// ==== Public API ====

impl<T: ExactTemporal> OpenEhrTemporal<T> {
    /// Creates a new value wrapping `exact`.
    ///
    /// The precision is clamped to the finest field of the kind. Field
    /// states missing an entry for a field of the kind receive the kind's
    /// default entry.
    ///
    /// ```rust
    /// use openehr_temporal::{iso::IsoDate, FieldStates, OpenEhrDate, OpenEhrField, ResolverMode};
    ///
    /// let exact = IsoDate::try_new(2021, 8, 6).unwrap();
    /// let date =
    ///     OpenEhrDate::new(exact, OpenEhrField::Nanos, FieldStates::DATE, ResolverMode::Strict)
    ///         .unwrap();
    /// assert_eq!(date.precision_field(), OpenEhrField::Days);
    /// ```
    pub fn new(
        exact: T,
        precision: OpenEhrField,
        field_states: FieldStates,
        resolver_mode: ResolverMode,
    ) -> TemporalResult<Self> {
        check_precision(precision)?;
        Ok(Self::new_unchecked(
            exact,
            precision,
            Self::fill_field_states(field_states),
            resolver_mode,
        ))
    }

    /// Returns the exact record, holding natural zeros below the precision.
    #[inline]
    #[must_use]
    pub fn exact(&self) -> T {
        self.exact
    }

    /// Returns the finest field that was actually supplied.
    #[inline]
    #[must_use]
    pub fn precision_field(&self) -> OpenEhrField {
        self.precision
    }

    #[inline]
    #[must_use]
    pub fn resolver_mode(&self) -> ResolverMode {
        self.resolver_mode
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> TemporalKind {
        T::KIND
    }

    /// Returns a copy using `field_states`, with missing entries taken from
    /// the kind's defaults.
    #[must_use]
    pub fn with_field_states(&self, field_states: FieldStates) -> Self {
        Self {
            field_states: Self::fill_field_states(field_states),
            ..*self
        }
    }

    /// Returns a copy using `resolver_mode`.
    #[must_use]
    pub fn with_resolver_mode(&self, resolver_mode: ResolverMode) -> Self {
        Self {
            resolver_mode,
            ..*self
        }
    }

    /// Returns whether `unit` is present in this value.
    ///
    /// A unit at or coarser than the precision is present when its field is
    /// possible. A finer unit is present only in lenient mode, and only when
    /// its field is mandatory.
    ///
    /// ```rust
    /// use openehr_temporal::{
    ///     FieldState, OpenEhrDateTime, OpenEhrField, ResolverMode, TemporalUnit,
    /// };
    /// use openehr_temporal::fields::FieldStateHolder;
    ///
    /// let date_time =
    ///     OpenEhrDateTime::of(2021, Some(8), Some(6), None, None, None, None).unwrap();
    /// assert!(date_time.is_unit_supported(TemporalUnit::Day));
    /// assert!(!date_time.is_unit_supported(TemporalUnit::Hour));
    ///
    /// let forced = date_time.with_field_states(
    ///     date_time.field_states().with(OpenEhrField::Hours, FieldState::Mandatory),
    /// );
    /// assert!(forced.is_unit_supported(TemporalUnit::Hour));
    /// assert!(!forced
    ///     .with_resolver_mode(ResolverMode::Strict)
    ///     .is_unit_supported(TemporalUnit::Hour));
    /// ```
    #[must_use]
    pub fn is_unit_supported(&self, unit: TemporalUnit) -> bool {
        if !T::supports_unit(unit) {
            return false;
        }
        let Some((_, state)) = self.field_states.entry_for_unit(unit) else {
            return false;
        };
        if unit >= self.precision.unit() {
            return state.is_possible();
        }
        !self.resolver_mode.is_strict() && state == FieldState::Mandatory
    }

    /// Returns whether `field` is present in this value.
    ///
    /// The offset is present unless it is forbidden; every other field
    /// follows the rule of its base unit.
    #[must_use]
    pub fn is_field_supported(&self, field: ChronoField) -> bool {
        if !T::supports_field(field) {
            return false;
        }
        if field == ChronoField::OffsetSeconds {
            return self.field_states.get(OpenEhrField::OffsetSeconds)
                != Some(FieldState::Forbidden);
        }
        self.is_unit_supported(field.base_unit())
    }

    /// Returns whether `field` is backed by supplied data, ignoring the
    /// resolver mode and the field states.
    #[must_use]
    pub fn is_strictly_supported(&self, field: ChronoField) -> bool {
        T::supports_field(field)
            && (field == ChronoField::OffsetSeconds || field.base_unit() >= self.precision.unit())
    }

    /// Returns whether `unit` is backed by supplied data.
    #[must_use]
    pub fn is_strictly_supported_unit(&self, unit: TemporalUnit) -> bool {
        T::supports_unit(unit) && unit >= self.precision.unit()
    }

    /// Returns the value of `field`, failing when it is not supported.
    pub fn get(&self, field: ChronoField) -> TemporalResult<i64> {
        if !self.is_field_supported(field) {
            return Err(
                TemporalError::unsupported_field().with_enum(ErrorMessage::FieldNotSupported)
            );
        }
        self.exact.get_field(field)
    }

    /// Returns the value of an openEHR `field`, failing when it is not
    /// supported.
    pub fn get_component(&self, field: OpenEhrField) -> TemporalResult<i64> {
        self.get(field.chrono_field())
    }

    /// Returns a copy with `field` set to `value`.
    ///
    /// The precision becomes the finer of the current precision and the field
    /// of `field`'s base unit. Setting the offset keeps the precision.
    ///
    /// ```rust
    /// use openehr_temporal::{fields::ChronoField, OpenEhrDateTime, OpenEhrField};
    ///
    /// let date_time = OpenEhrDateTime::of(2021, Some(8), None, None, None, None, None).unwrap();
    /// let changed = date_time.with_field(ChronoField::HourOfDay, 4).unwrap();
    /// assert_eq!(changed.precision_field(), OpenEhrField::Hours);
    /// assert_eq!(changed.to_string(), "2021-08-01T04");
    /// ```
    pub fn with_field(&self, field: ChronoField, value: i64) -> TemporalResult<Self> {
        let exact = self.exact.with_field(field, value)?;
        let unit = (field != ChronoField::OffsetSeconds).then(|| field.base_unit());
        self.rewrap(exact, unit)
    }

    /// Returns a copy with `field` set to `value`.
    pub fn with_component(&self, field: OpenEhrField, value: i64) -> TemporalResult<Self> {
        self.with_field(field.chrono_field(), value)
    }

    /// Adds `amount` of `unit`, refining the precision to the field of
    /// `unit` when it is finer.
    pub fn add(&self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        let exact = self.exact.add(amount, unit)?;
        self.rewrap(exact, Some(unit))
    }

    /// Subtracts `amount` of `unit`.
    pub fn subtract(&self, amount: i64, unit: TemporalUnit) -> TemporalResult<Self> {
        let amount = amount
            .checked_neg()
            .ok_or(TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange))?;
        self.add(amount, unit)
    }

    /// Returns the whole amount of `unit` from this value until `other`.
    pub fn until(&self, other: &Self, unit: TemporalUnit) -> TemporalResult<i64> {
        self.exact.until(&other.exact, unit)
    }

    /// Returns the whole amount of `unit` from `other` until this value.
    pub fn since(&self, other: &Self, unit: TemporalUnit) -> TemporalResult<i64> {
        other.exact.until(&self.exact, unit)
    }
}

// ==== Trait impls ====

impl<T: ExactTemporal> FieldStateHolder for OpenEhrTemporal<T> {
    fn field_states(&self) -> &FieldStates {
        &self.field_states
    }
}

impl<T: ExactTemporal> PartialEq for OpenEhrTemporal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.exact == other.exact && self.precision == other.precision
    }
}

impl<T: ExactTemporal> Eq for OpenEhrTemporal<T> {}

impl<T: ExactTemporal> Hash for OpenEhrTemporal<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.exact.hash(state);
        self.precision.hash(state);
    }
}

impl<T: ExactTemporal> Ord for OpenEhrTemporal<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.exact
            .cmp(&other.exact)
            .then_with(|| self.precision.index().cmp(&other.precision.index()))
    }
}

impl<T: ExactTemporal> PartialOrd for OpenEhrTemporal<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ExactTemporal> Writeable for OpenEhrTemporal<T> {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        match self.to_formattable() {
            Ok(formattable) => formattable.write_to(sink),
            Err(_error) => {
                #[cfg(feature = "log")]
                log::warn!("falling back to a diagnostic rendering: {_error}");
                self.exact.write_to(sink)?;
                write!(sink, " [OpenEhr with {} precision]", self.precision)
            }
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.to_formattable()
            .map_or(LengthHint::undefined(), |formattable| {
                formattable.writeable_length_hint()
            })
    }
}

impl<T: ExactTemporal> fmt::Display for OpenEhrTemporal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}
