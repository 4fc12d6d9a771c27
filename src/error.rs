//! This module implements `TemporalError`.

use core::fmt;
use ixdtf::ParseError;

/// `TemporalError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Error.
    #[default]
    Generic,
    /// TypeError
    Type,
    /// RangeError
    Range,
    /// SyntaxError
    Syntax,
    /// Assert
    Assert,
    /// A unit or chrono field has no counterpart in the openEHR field domain.
    FieldMapping,
    /// A field or unit is not supported at the value's precision.
    UnsupportedField,
    /// An external temporal could not be converted into the requested kind.
    InvalidInput,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => "Error",
            Self::Type => "TypeError",
            Self::Range => "RangeError",
            Self::Syntax => "SyntaxError",
            Self::Assert => "ImplementationError",
            Self::FieldMapping => "FieldMappingError",
            Self::UnsupportedField => "UnsupportedFieldError",
            Self::InvalidInput => "InvalidTemporalInputError",
        }
        .fmt(f)
    }
}

/// The error type for `openehr_temporal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalError {
    kind: ErrorKind,
    msg: ErrorMessage,
}

impl TemporalError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: ErrorMessage::None,
        }
    }

    /// Create a generic error
    #[inline]
    #[must_use]
    pub fn general(msg: &'static str) -> Self {
        Self::new(ErrorKind::Generic).with_message(msg)
    }

    /// Create a range error.
    #[inline]
    #[must_use]
    pub const fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Create a type error.
    #[inline]
    #[must_use]
    pub const fn r#type() -> Self {
        Self::new(ErrorKind::Type)
    }

    /// Create a syntax error.
    #[inline]
    #[must_use]
    pub const fn syntax() -> Self {
        Self::new(ErrorKind::Syntax)
    }

    /// Create a field mapping error.
    #[inline]
    #[must_use]
    pub const fn field_mapping() -> Self {
        Self::new(ErrorKind::FieldMapping)
    }

    /// Create an unsupported field error.
    #[inline]
    #[must_use]
    pub const fn unsupported_field() -> Self {
        Self::new(ErrorKind::UnsupportedField)
    }

    /// Create an invalid temporal input error.
    #[inline]
    #[must_use]
    pub const fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates an assertion error
    #[inline]
    #[must_use]
    #[cfg_attr(debug_assertions, track_caller)]
    pub(crate) const fn assert() -> Self {
        #[cfg(not(debug_assertions))]
        {
            Self::new(ErrorKind::Assert)
        }
        #[cfg(debug_assertions)]
        Self {
            kind: ErrorKind::Assert,
            msg: ErrorMessage::String(core::panic::Location::caller().file()),
        }
    }

    /// Create an abrupt end error.
    #[inline]
    #[must_use]
    pub fn abrupt_end() -> Self {
        Self::syntax().with_message("Abrupt end to parsing target.")
    }

    /// Add a message to the error.
    #[inline]
    #[must_use]
    pub fn with_message(mut self, msg: &'static str) -> Self {
        self.msg = ErrorMessage::String(msg);
        self
    }

    /// Add a message enum to the error.
    #[inline]
    #[must_use]
    pub(crate) fn with_enum(mut self, msg: ErrorMessage) -> Self {
        self.msg = msg;
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Extracts the error message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> &'static str {
        self.msg.to_string()
    }
}

impl fmt::Display for TemporalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.to_string();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

impl core::error::Error for TemporalError {}

impl From<ParseError> for TemporalError {
    fn from(error: ParseError) -> Self {
        TemporalError::syntax().with_enum(ErrorMessage::Ixdtf(error))
    }
}

/// The error message
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum ErrorMessage {
    // Range
    InstantOutOfRange,
    DateOutOfRange,
    DateTimeOutOfRange,
    OffsetOutOfRange,
    NumberOutOfRange,
    FractionalTimeMoreThanNineDigits,

    // Field domain
    UnitHasNoField,
    ChronoFieldHasNoField,
    FieldNotSupported,
    UnitNotSupported,

    // Input shape
    NamedTimeZone,
    MissingOffset,
    MissingYear,
    MissingMonth,
    MissingDay,
    MissingHour,
    InvalidTime,

    // Typed
    None,
    String(&'static str),
    Ixdtf(ParseError),
}

impl ErrorMessage {
    pub fn to_string(self) -> &'static str {
        match self {
            Self::InstantOutOfRange => "Instant nanoseconds are not within a valid epoch range.",
            Self::DateOutOfRange => "Date is not within ISO date time limits.",
            Self::DateTimeOutOfRange => "DateTime is not within ISO date time limits.",
            Self::OffsetOutOfRange => "UTC offset must be within -18:00 and +18:00.",
            Self::NumberOutOfRange => "number exceeded a valid range.",
            Self::FractionalTimeMoreThanNineDigits => "Fractional time exceeds nine digits.",
            Self::UnitHasNoField => "Unit has no corresponding openEHR field.",
            Self::ChronoFieldHasNoField => "Chrono field has no corresponding openEHR field.",
            Self::FieldNotSupported => "Field is not supported at this precision.",
            Self::UnitNotSupported => "Unit is not supported by this value.",
            Self::NamedTimeZone => "Named time zones are not supported, only fixed offsets.",
            Self::MissingOffset => "Temporal does not carry a UTC offset.",
            Self::MissingYear => "Temporal does not carry a year.",
            Self::MissingMonth => "Temporal does not carry a month.",
            Self::MissingDay => "Temporal does not carry a day.",
            Self::MissingHour => "Temporal does not carry an hour.",
            Self::InvalidTime => "Invalid time",
            Self::None => "",
            Self::String(s) => s,
            Self::Ixdtf(s) => ixdtf_error_to_static_string(s),
        }
    }
}

pub fn ixdtf_error_to_static_string(error: ParseError) -> &'static str {
    match error {
        ParseError::ImplAssert => "Implementation error: this error must not throw.",
        ParseError::NonAsciiCodePoint => "Code point was not ASCII",
        ParseError::ParseFloat => "Invalid float while parsing fraction part.",
        ParseError::AbruptEnd { .. } => "Parsing ended abruptly.",
        ParseError::InvalidEnd => "Unexpected character found after parsing was completed.",
        ParseError::InvalidMonthRange => "Parsed month value not in a valid range.",
        ParseError::InvalidDayRange => "Parsed day value not in a valid range.",
        ParseError::DateYear => "Invalid character while parsing year value.",
        ParseError::DateExtendedYear => "Invalid character while parsing extended year value.",
        ParseError::DateMonth => "Invalid character while parsing month value.",
        ParseError::DateDay => "Invalid character while parsing day value.",
        ParseError::DateUnexpectedEnd => "Unexpected end while parsing a date value.",
        ParseError::TimeRequired => "Time is required.",
        ParseError::TimeHour => "Invalid character while parsing hour value.",
        ParseError::TimeMinuteSecond => {
            "Invalid character while parsing minute/second value in (0, 59] range."
        }
        ParseError::TimeSecond => "Invalid character while parsing second value in (0, 60] range.",
        ParseError::FractionPart => "Invalid character while parsing fraction part value.",
        ParseError::DateSeparator => "Invalid character while parsing date separator.",
        ParseError::TimeSeparator => "Invalid character while parsing time separator.",
        ParseError::DecimalSeparator => "Invalid character while parsing decimal separator.",
        ParseError::InvalidAnnotation => "Invalid annotation.",
        ParseError::AnnotationOpen => "Invalid annotation open character.",
        ParseError::AnnotationClose => "Invalid annotation close character.",
        ParseError::AnnotationChar => "Invalid annotation character.",
        ParseError::TzLeadingChar => "Invalid time zone leading character.",
        ParseError::IanaCharPostSeparator => "Expected time zone character after '/'.",
        ParseError::IanaChar => "Invalid IANA time zone character after '/'.",
        ParseError::UtcTimeSeparator => "Invalid time zone character after '/'.",
        ParseError::OffsetNeedsSign => "UTC offset needs a sign",
        ParseError::AmbiguousTimeYearMonth => "Time is ambiguous with YearMonth",
        _ => "General IXDTF parsing error",
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, TemporalError};
    use alloc::string::ToString;

    #[test]
    fn error_display_includes_kind_and_message() {
        let err = TemporalError::unsupported_field().with_message("minute");
        assert_eq!(err.kind(), ErrorKind::UnsupportedField);
        assert_eq!(err.to_string(), "UnsupportedFieldError: minute");

        let err = TemporalError::field_mapping();
        assert_eq!(err.to_string(), "FieldMappingError");
        assert_eq!(err.into_message(), "");
    }
}
