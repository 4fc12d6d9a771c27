//! Utility date and time equations for the proleptic Gregorian calendar.
//!
//! The epoch day conversions use the Neri-Schneider equations on a
//! computational calendar that starts in March. The rata die is shifted by
//! 680 400-year cycles so that every supported epoch day maps to a positive
//! computational rata die.
//!
//! | Significant Date | Computational Rata Die | Rata Die Shift
//! | -----------------|------------------------|-----------------|
//! | April 19, -271_821 | -99,280,532 | 65,429 |
//! | January 1, 1970 | 719,468 | 100,065,428 |
//! | September 14, 275,760 | 100_719_469 | 200,065,429 |

const EPOCH_COMPUTATIONAL_RATA_DIE: i64 = 719_468;

const DAYS_IN_A_400Y_CYCLE: u64 = 146_097;
const TWO_POWER_THIRTY_NINE: u64 = 549_755_813_888; // 2^39 constant
const TWO_POWER_SIXTEEN: u64 = 65_536; // 2^16 constant

/// Count of 400-year cycles the computational calendar is shifted by.
const SHIFT_CYCLES: i64 = 680;
const SHIFT_YEARS: i64 = 400 * SHIFT_CYCLES;
const SHIFT_DAYS: i64 = DAYS_IN_A_400Y_CYCLE as i64 * SHIFT_CYCLES;

/// Returns the epoch days for a Gregorian year, month and day.
///
/// Callers must keep `year` within `-271_821..=275_760`.
pub(crate) fn epoch_days_from_gregorian_date(year: i32, month: u8, day: u8) -> i64 {
    let j = i64::from(month <= 2);
    let computational_year = i64::from(year) + SHIFT_YEARS - j;
    let computational_month = i64::from(month) + 12 * j;
    let computational_day = i64::from(day) - 1;
    let century = computational_year / 100;

    let y_star = 1461 * computational_year / 4 - century + century / 4;
    let m_star = (979 * computational_month - 2919) / 32;
    let rata_die = y_star + m_star + computational_day;

    rata_die - EPOCH_COMPUTATIONAL_RATA_DIE - SHIFT_DAYS
}

/// Returns the Gregorian year, month and day for the given epoch days.
///
/// Callers must keep `epoch_days` within `crate::iso::MAX_EPOCH_DAYS`.
pub(crate) fn ymd_from_epoch_days(epoch_days: i64) -> (i32, u8, u8) {
    let rata_die = (epoch_days + EPOCH_COMPUTATIONAL_RATA_DIE + SHIFT_DAYS) as u64;

    // Century and day of century
    let n_one = 4 * rata_die + 3;
    let century = n_one / DAYS_IN_A_400Y_CYCLE;
    let n_two = (n_one % DAYS_IN_A_400Y_CYCLE) | 3;

    // Year of century and day of year
    let year_of_century = (376_287_347 * n_two) / TWO_POWER_THIRTY_NINE;
    let day_of_year = (n_two - 1461 * year_of_century) / 4;
    let computational_year = 100 * century + year_of_century;

    // Month and day
    let n_three = 2141 * day_of_year + 197_913;
    let computational_month = n_three / TWO_POWER_SIXTEEN;
    let computational_day = (n_three % TWO_POWER_SIXTEEN) / 2141;

    let j = u64::from(day_of_year >= 306);
    let year = computational_year as i64 + j as i64 - SHIFT_YEARS;
    let month = computational_month - 12 * j;
    let day = computational_day + 1;

    (year as i32, month as u8, day as u8)
}

#[inline]
pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// `ISODaysInMonth ( year, month )`
pub(crate) fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        // Month is validated before this is reached.
        _ => 0,
    }
}

#[inline]
pub(crate) fn iso_days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns the ISO day of week, Monday being 1 and Sunday 7.
#[inline]
pub(crate) fn iso_day_of_week(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday.
    ((epoch_days + 3).rem_euclid(7) + 1) as u8
}

/// Returns the one-based day of the year.
#[inline]
pub(crate) fn iso_day_of_year(year: i32, month: u8, day: u8) -> u16 {
    let days = epoch_days_from_gregorian_date(year, month, day)
        - epoch_days_from_gregorian_date(year, 1, 1);
    days as u16 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_days_round_trip() {
        let cases = [
            ((1970, 1, 1), 0),
            ((1969, 12, 31), -1),
            ((2000, 3, 1), 11_017),
            ((2020, 2, 29), 18_321),
            ((2021, 8, 6), 18_845),
            ((2024, 12, 31), 20_088),
            ((1, 1, 1), -719_162),
        ];
        for ((year, month, day), days) in cases {
            assert_eq!(epoch_days_from_gregorian_date(year, month, day), days);
            assert_eq!(ymd_from_epoch_days(days), (year, month, day));
        }
    }

    #[test]
    fn epoch_days_limits() {
        assert_eq!(ymd_from_epoch_days(-100_000_000), (-271_821, 4, 20));
        assert_eq!(ymd_from_epoch_days(100_000_000), (275_760, 9, 13));
        assert_eq!(epoch_days_from_gregorian_date(-271_821, 4, 20), -100_000_000);
        assert_eq!(epoch_days_from_gregorian_date(275_760, 9, 13), 100_000_000);
    }

    #[test]
    fn day_of_week_and_year() {
        assert_eq!(iso_day_of_week(0), 4);
        assert_eq!(iso_day_of_week(18_845), 5);
        assert_eq!(iso_day_of_week(-719_162), 1);
        assert_eq!(iso_day_of_year(2021, 8, 6), 218);
        assert_eq!(iso_day_of_year(2024, 12, 31), 366);
        assert_eq!(iso_day_of_year(2020, 2, 29), 60);
    }

    #[test]
    fn days_in_month() {
        assert_eq!(iso_days_in_month(2020, 2), 29);
        assert_eq!(iso_days_in_month(1900, 2), 28);
        assert_eq!(iso_days_in_month(2000, 2), 29);
        assert_eq!(iso_days_in_month(2021, 4), 30);
        assert_eq!(iso_days_in_year(2021), 365);
    }
}
