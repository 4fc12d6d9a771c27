//! This module implements text parsing and rendering for partial values.
//!
//! Rendering goes through `Writeable` records that only hold the
//! components a value supports. Parsing comes in two flavors: the canonical
//! scanner reads back exactly what the canonical rendering emits, while the
//! IXDTF entry points accept RFC 9557 strings through `ixdtf`.

use crate::{
    components::TemporalKind,
    error::ErrorMessage,
    fields::OpenEhrField,
    parsed_intermediates::ParsedTemporal,
    Sign, TemporalError, TemporalResult, UtcOffset,
};
use ixdtf::{encoding::Utf8, parsers::IxdtfParser, records::IxdtfParseRecord};
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

// ==== Rendering ====

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
    #[default]
    Auto,
    Minute,
    Digit(u8),
}

#[derive(Debug)]
pub struct FormattableTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    pub precision: Precision,
    pub include_sep: bool,
}

impl Writeable for FormattableTime {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_padded_u8(self.hour, sink)?;
        if self.include_sep {
            sink.write_char(':')?;
        }
        write_padded_u8(self.minute, sink)?;
        if self.precision == Precision::Minute {
            return Ok(());
        }
        if self.include_sep {
            sink.write_char(':')?;
        }
        write_padded_u8(self.second, sink)?;
        if (self.nanosecond == 0 && self.precision == Precision::Auto)
            || self.precision == Precision::Digit(0)
        {
            return Ok(());
        }
        sink.write_char('.')?;
        write_nanosecond(self.nanosecond, self.precision, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let sep = self.include_sep as usize;
        if self.precision == Precision::Minute {
            return LengthHint::exact(4 + sep);
        }
        let time_base = 6 + (sep * 2);
        if self.nanosecond == 0 || self.precision == Precision::Digit(0) {
            return LengthHint::exact(time_base);
        }
        if let Precision::Digit(d) = self.precision {
            return LengthHint::exact(time_base + 1 + d as usize);
        }
        LengthHint::between(time_base + 2, time_base + 10)
    }
}

fn write_padded_u8<W: core::fmt::Write + ?Sized>(num: u8, sink: &mut W) -> core::fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

fn write_nanosecond<W: core::fmt::Write + ?Sized>(
    nanoseconds: u32,
    precision: Precision,
    sink: &mut W,
) -> core::fmt::Result {
    let (digits, index) = u32_to_digits(nanoseconds);
    let precision = match precision {
        Precision::Digit(digit) if digit <= 9 => digit as usize,
        _ => index,
    };
    write_digit_slice_to_precision(digits, 0, precision, sink)
}

pub fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut output = [0; 9];
    let mut precision = 0;
    for (i, out) in output.iter_mut().enumerate().rev() {
        let v = (value % 10) as u8;
        value /= 10;
        if precision == 0 && v != 0 {
            // i is 0-indexed, but we want a 1-indexed precision
            precision = i + 1;
        }
        *out = v;
    }

    (output, precision)
}

pub fn write_digit_slice_to_precision<W: core::fmt::Write + ?Sized>(
    digits: [u8; 9],
    base: usize,
    precision: usize,
    sink: &mut W,
) -> core::fmt::Result {
    for digit in digits.iter().take(precision).skip(base) {
        digit.write_to(sink)?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct FormattableOffset {
    pub sign: Sign,
    pub time: FormattableTime,
}

impl Writeable for FormattableOffset {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self.sign {
            Sign::Negative => sink.write_char('-')?,
            _ => sink.write_char('+')?,
        }
        self.time.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.time.writeable_length_hint() + 1
    }
}

#[derive(Debug)]
pub struct FormattableDate(pub i32, pub u8, pub u8);

impl Writeable for FormattableDate {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_year(self.0, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.1, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.2, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let year_length = if (0..=9999).contains(&self.0) { 4 } else { 7 };

        LengthHint::exact(6 + year_length)
    }
}

fn write_year<W: core::fmt::Write + ?Sized>(year: i32, sink: &mut W) -> core::fmt::Result {
    if (0..=9999).contains(&year) {
        write_four_digit_year(year, sink)
    } else {
        write_extended_year(year, sink)
    }
}

fn write_four_digit_year<W: core::fmt::Write + ?Sized>(
    mut y: i32,
    sink: &mut W,
) -> core::fmt::Result {
    (y / 1_000).write_to(sink)?;
    y %= 1_000;
    (y / 100).write_to(sink)?;
    y %= 100;
    (y / 10).write_to(sink)?;
    y %= 10;
    y.write_to(sink)
}

fn write_extended_year<W: core::fmt::Write + ?Sized>(y: i32, sink: &mut W) -> core::fmt::Result {
    let sign = if y < 0 { '-' } else { '+' };
    sink.write_char(sign)?;
    let (digits, _) = u32_to_digits(y.unsigned_abs());
    write_digit_slice_to_precision(digits, 3, 9, sink)
}

/// The canonical rendering of a partial value.
///
/// Only supported components are set. Date components are joined by `-`,
/// the hour is preceded by `T` when a date component was written, and later
/// time components are joined by `:`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormattablePartial {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub nanosecond: Option<u32>,
    pub offset: Option<UtcOffset>,
}

impl FormattablePartial {
    fn has_date(&self) -> bool {
        self.year.is_some() || self.month.is_some() || self.day.is_some()
    }
}

impl Writeable for FormattablePartial {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if let Some(year) = self.year {
            year.write_to(sink)?;
        }
        for component in [self.month, self.day].into_iter().flatten() {
            sink.write_char('-')?;
            write_padded_u8(component, sink)?;
        }
        if let Some(hour) = self.hour {
            if self.has_date() {
                sink.write_char('T')?;
            }
            write_padded_u8(hour, sink)?;
        }
        for component in [self.minute, self.second].into_iter().flatten() {
            sink.write_char(':')?;
            write_padded_u8(component, sink)?;
        }
        if let Some(nanosecond) = self.nanosecond {
            sink.write_char(':')?;
            if nanosecond < 10 {
                sink.write_char('0')?;
            }
            nanosecond.write_to(sink)?;
        }
        if let Some(offset) = self.offset {
            offset.write_to(sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let year = self
            .year
            .map_or(LengthHint::exact(0), |year| year.writeable_length_hint());
        let hour = self
            .hour
            .map_or(0, |_| 2 + usize::from(self.has_date()));
        let separated = [self.month, self.day, self.minute, self.second]
            .into_iter()
            .flatten()
            .count();
        let fraction = self
            .nanosecond
            .map_or(LengthHint::exact(0), |_| LengthHint::between(3, 10));
        let offset = self
            .offset
            .map_or(LengthHint::exact(0), |offset| offset.writeable_length_hint());
        year + (hour + 3 * separated) + fraction + offset
    }
}

impl_display_with_writeable!(FormattableDate);
impl_display_with_writeable!(FormattableTime);
impl_display_with_writeable!(FormattableOffset);
impl_display_with_writeable!(FormattablePartial);

// ==== Canonical parsing ====

struct Cursor<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a [u8]) -> Self {
        Self { source, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    /// Consumes `ch` if it is the next character.
    fn check_or(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn is_done(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn close(&self) -> TemporalResult<()> {
        if !self.is_done() {
            return Err(TemporalError::syntax()
                .with_message("Unexpected character found after parsing was completed."));
        }
        Ok(())
    }

    /// Reads exactly `count` ASCII digits.
    fn digits(&mut self, count: usize) -> TemporalResult<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let digit = self.next().ok_or(TemporalError::abrupt_end())?;
            if !digit.is_ascii_digit() {
                return Err(TemporalError::syntax().with_message("Expected an ASCII digit."));
            }
            value = value * 10 + u32::from(digit - b'0');
        }
        Ok(value)
    }

    /// Reads one or more ASCII digits, up to `max`.
    fn digit_run(&mut self, max: usize) -> TemporalResult<(u64, usize)> {
        let mut value = 0u64;
        let mut count = 0;
        while let Some(digit) = self.peek().filter(u8::is_ascii_digit) {
            if count == max {
                return Err(TemporalError::syntax().with_message("Too many digits."));
            }
            value = value * 10 + u64::from(digit - b'0');
            count += 1;
            self.pos += 1;
        }
        if count == 0 {
            return Err(TemporalError::syntax().with_message("Expected an ASCII digit."));
        }
        Ok((value, count))
    }

    fn is_offset_start(&self) -> bool {
        matches!(self.peek(), Some(b'Z' | b'z' | b'+' | b'-'))
    }
}

fn narrow_u8(value: u32) -> TemporalResult<u8> {
    u8::try_from(value)
        .map_err(|_| TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange))
}

fn parse_canonical_date(
    cursor: &mut Cursor<'_>,
    parsed: &mut ParsedTemporal,
) -> TemporalResult<OpenEhrField> {
    let sign = if cursor.check_or(b'-') {
        -1
    } else {
        cursor.check_or(b'+');
        1
    };
    let (year, _) = cursor.digit_run(6)?;
    parsed.year = Some(sign * year as i32);
    if !cursor.check_or(b'-') {
        return Ok(OpenEhrField::Years);
    }
    parsed.month = Some(narrow_u8(cursor.digits(2)?)?);
    if !cursor.check_or(b'-') {
        return Ok(OpenEhrField::Months);
    }
    parsed.day = Some(narrow_u8(cursor.digits(2)?)?);
    Ok(OpenEhrField::Days)
}

fn parse_canonical_time(
    cursor: &mut Cursor<'_>,
    parsed: &mut ParsedTemporal,
) -> TemporalResult<OpenEhrField> {
    parsed.hour = Some(narrow_u8(cursor.digits(2)?)?);
    if !cursor.check_or(b':') {
        return Ok(OpenEhrField::Hours);
    }
    parsed.minute = Some(narrow_u8(cursor.digits(2)?)?);
    if !cursor.check_or(b':') {
        return Ok(OpenEhrField::Minutes);
    }
    parsed.second = Some(narrow_u8(cursor.digits(2)?)?);
    if cursor.check_or(b':') {
        // Nanosecond of second as a whole number.
        let (nanosecond, _) = cursor.digit_run(9)?;
        parsed.nanosecond = Some(nanosecond as u32);
        return Ok(OpenEhrField::Nanos);
    }
    if !cursor.check_or(b'.') && !cursor.check_or(b',') {
        return Ok(OpenEhrField::Seconds);
    }
    let (fraction, digits) = cursor.digit_run(9)?;
    parsed.nanosecond = Some(fraction as u32 * 10u32.pow(9 - digits as u32));
    Ok(OpenEhrField::Nanos)
}

fn parse_offset_body(cursor: &mut Cursor<'_>) -> TemporalResult<UtcOffset> {
    if cursor.check_or(b'Z') || cursor.check_or(b'z') {
        return Ok(UtcOffset::UTC);
    }
    let sign = match cursor.next() {
        Some(b'+') => Sign::Positive,
        Some(b'-') => Sign::Negative,
        Some(_) => {
            return Err(TemporalError::syntax().with_message("UTC offset needs a sign"));
        }
        None => return Err(TemporalError::abrupt_end()),
    };
    let hours = narrow_u8(cursor.digits(2)?)?;
    if cursor.is_done() {
        return UtcOffset::from_hms(sign, hours, 0, 0);
    }
    let separated = cursor.check_or(b':');
    let minutes = narrow_u8(cursor.digits(2)?)?;
    let has_seconds = if separated {
        cursor.check_or(b':')
    } else {
        !cursor.is_done()
    };
    let seconds = if has_seconds {
        narrow_u8(cursor.digits(2)?)?
    } else {
        0
    };
    UtcOffset::from_hms(sign, hours, minutes, seconds)
}

/// Parses a `Z`, `±HH`, `±HH:MM`, `±HHMM` or `±HH:MM:SS` offset.
pub(crate) fn parse_utc_offset(source: &[u8]) -> TemporalResult<UtcOffset> {
    let mut cursor = Cursor::new(source);
    let offset = parse_offset_body(&mut cursor)?;
    cursor.close()?;
    Ok(offset)
}

/// Parses the canonical rendering of `kind`, returning the components found
/// and the finest of them.
pub(crate) fn parse_canonical(
    source: &[u8],
    kind: TemporalKind,
) -> TemporalResult<(ParsedTemporal, OpenEhrField)> {
    let mut cursor = Cursor::new(source);
    let mut parsed = ParsedTemporal::new();

    let mut precision = if kind.has_date() {
        Some(parse_canonical_date(&mut cursor, &mut parsed)?)
    } else {
        None
    };

    let time_follows = if kind.has_date() {
        kind.has_time() && cursor.check_or(b'T')
    } else {
        true
    };
    if time_follows {
        precision = Some(parse_canonical_time(&mut cursor, &mut parsed)?);
    }

    if kind.has_offset() {
        if !cursor.is_offset_start() {
            return Err(TemporalError::syntax().with_enum(ErrorMessage::MissingOffset));
        }
        parsed.offset = Some(parse_offset_body(&mut cursor)?);
    }
    cursor.close()?;

    let precision = precision.ok_or(TemporalError::abrupt_end())?;
    Ok((parsed, precision))
}

// ==== IXDTF parsing ====

/// The shape of the IXDTF production that matched a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseVariant {
    YearMonth,
    DateTime,
    Time,
}

/// Parses an IXDTF string, trying a date-time first, then a year-month and
/// finally a time.
pub(crate) fn parse_ixdtf(
    source: &[u8],
) -> TemporalResult<(IxdtfParseRecord<'_, Utf8>, ParseVariant)> {
    let date_time = IxdtfParser::from_utf8(source).parse();
    let Err(error) = date_time else {
        return date_time
            .map(|record| (record, ParseVariant::DateTime))
            .map_err(TemporalError::from);
    };

    if let Ok(record) = IxdtfParser::from_utf8(source).parse_year_month() {
        return Ok((record, ParseVariant::YearMonth));
    }
    if let Ok(record) = IxdtfParser::from_utf8(source).parse_time() {
        return Ok((record, ParseVariant::Time));
    }

    // Report the error from the date-time production.
    Err(TemporalError::from(error))
}
