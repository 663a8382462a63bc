use crate::error::{Result, SpendingError};
use chrono::{Datelike, Days, Month, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Strict format used for explicit report ranges.
pub const RANGE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Formats accepted for the `Date` column when loading a ledger.
const LEDGER_DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d.%m.%Y"];

pub fn first_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Returns `None` when `month` is outside 1-12 or the year is out of chrono's range.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.checked_sub_days(Days::new(1))
}

/// Parses a zero-padded `DD/MM/YYYY` date. Surrounding whitespace, unpadded
/// days or months and other separators are rejected.
pub fn parse_range_date(value: &str) -> Result<NaiveDate> {
    let err = || SpendingError::DateParse {
        value: value.to_string(),
        expected: "DD/MM/YYYY",
    };
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b'/',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(err());
    }
    NaiveDate::parse_from_str(value, RANGE_DATE_FORMAT).map_err(|_| err())
}

pub fn parse_ledger_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    LEDGER_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Full English name of a calendar month, e.g. `3 -> "March"`.
pub fn month_name(month: u32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    Month::try_from(month).ok().map(|m| m.name())
}

/// Accepts full names and three-letter abbreviations in any case.
pub fn month_from_name(name: &str) -> Option<u32> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    (1..=12u32).find(|&m| {
        month_name(m)
            .map(|full| {
                let full = full.to_lowercase();
                full == wanted || (wanted.len() == 3 && full.starts_with(&wanted))
            })
            .unwrap_or(false)
    })
}

/// `(year, month)` key used to count distinct calendar months.
pub fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2023, 2),
            NaiveDate::from_ymd_opt(2023, 2, 28)
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            last_day_of_month(2023, 4),
            NaiveDate::from_ymd_opt(2023, 4, 30)
        );
        assert_eq!(
            last_day_of_month(2023, 12),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert_eq!(last_day_of_month(2023, 13), None);
        assert_eq!(last_day_of_month(2023, 0), None);
    }

    #[test]
    fn test_parse_range_date_is_strict() {
        assert_eq!(
            parse_range_date("15/01/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_range_date("2024-01-15").is_err());
        assert!(parse_range_date("15.01.2024").is_err());
        assert!(parse_range_date("31/02/2024").is_err());
        assert!(parse_range_date("1/3/2024").is_err());
        assert!(parse_range_date(" 15/01/2024").is_err());
        assert!(parse_range_date("15/01/2024 ").is_err());
    }

    #[test]
    fn test_parse_ledger_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_ledger_date("05/03/2024"), expected);
        assert_eq!(parse_ledger_date("2024-03-05"), expected);
        assert_eq!(parse_ledger_date(" 05.03.2024 "), expected);
        assert_eq!(parse_ledger_date("March 5th"), None);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(13), None);

        assert_eq!(month_from_name("march"), Some(3));
        assert_eq!(month_from_name("MARCH"), Some(3));
        assert_eq!(month_from_name("Sep"), Some(9));
        assert_eq!(month_from_name("Marc"), None);
        assert_eq!(month_from_name(""), None);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_money(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_whole(Decimal::new(1005, 1)), Decimal::from(101));
        assert_eq!(round_whole(Decimal::new(1004, 1)), Decimal::from(100));
    }
}
