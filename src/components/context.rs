//! This module implements `FormatterContext`, the configuration a textual
//! formatter or parser hands to the `from_temporal` factories.

use alloc::string::String;

use icu_locale::Locale;

use crate::{
    fields::{FieldState, FieldStateHolder, FieldStates, OpenEhrField},
    options::ResolverMode,
};

use super::TemporalKind;

/// The field states, pattern and resolver mode a value is read or written
/// with.
///
/// ```rust
/// use openehr_temporal::{FieldStates, FormatterContext, OpenEhrField, ResolverMode};
/// use openehr_temporal::fields::FieldStateHolder;
///
/// let context = FormatterContext::new(FieldStates::OFFSET_DATE_TIME)
///     .with_pattern(Some("yyyy-MM-dd'T'HH:mmZ"))
///     .with_resolver_mode(ResolverMode::Strict);
/// assert!(context.is_strict());
///
/// let time = context.narrow(false, true);
/// assert!(!time.is_field_possible(OpenEhrField::Days));
/// assert!(time.is_field_possible(OpenEhrField::OffsetSeconds));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterContext {
    field_states: FieldStates,
    pattern: Option<String>,
    resolver_mode: ResolverMode,
    compact: bool,
    locale: Locale,
}

impl Default for FormatterContext {
    fn default() -> Self {
        Self::new(FieldStates::OFFSET_DATE_TIME)
    }
}

impl FormatterContext {
    /// Creates a lenient context without a pattern for the undetermined
    /// locale.
    pub fn new(field_states: FieldStates) -> Self {
        Self {
            field_states,
            pattern: None,
            resolver_mode: ResolverMode::default(),
            compact: false,
            locale: Locale::UNKNOWN,
        }
    }

    /// Creates the default context of a value kind.
    pub fn for_kind(kind: TemporalKind) -> Self {
        Self::new(kind.default_field_states())
    }

    #[must_use]
    pub fn with_field_states(mut self, field_states: FieldStates) -> Self {
        self.field_states = field_states;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: Option<&str>) -> Self {
        self.pattern = pattern.map(String::from);
        self
    }

    #[must_use]
    pub fn with_resolver_mode(mut self, resolver_mode: ResolverMode) -> Self {
        self.resolver_mode = resolver_mode;
        self
    }

    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[inline]
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn resolver_mode(&self) -> ResolverMode {
        self.resolver_mode
    }

    #[inline]
    #[must_use]
    pub fn is_compact(&self) -> bool {
        self.compact
    }

    #[inline]
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The configured field states without the offset entry.
    #[must_use]
    pub fn date_time_field_states(&self) -> FieldStates {
        self.field_states.without(OpenEhrField::OffsetSeconds)
    }

    #[inline]
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.resolver_mode.is_strict()
    }

    /// Whether the pattern is missing or blank.
    #[must_use]
    pub fn is_undefined_pattern(&self) -> bool {
        self.pattern
            .as_deref()
            .map_or(true, |pattern| pattern.trim().is_empty())
    }

    /// Whether a field from the year down to the second may be left out.
    #[must_use]
    pub fn is_partial_pattern(&self) -> bool {
        self.field_states
            .iter()
            .filter(|(field, _)| {
                *field != OpenEhrField::OffsetSeconds && !field.is_finer_than(OpenEhrField::Seconds)
            })
            .any(|(_, state)| matches!(state, FieldState::Optional | FieldState::Forbidden))
    }

    /// Returns a context restricted to the date fields, the time fields
    /// including the offset, or both.
    #[must_use]
    pub fn narrow(&self, include_date: bool, include_time: bool) -> Self {
        let field_states = self.field_states.filter(|field, _| {
            (include_date && field.is_date_field())
                || (include_time && !field.is_date_field())
        });
        Self {
            field_states,
            ..self.clone()
        }
    }
}

impl FieldStateHolder for FormatterContext {
    fn field_states(&self) -> &FieldStates {
        &self.field_states
    }
}
