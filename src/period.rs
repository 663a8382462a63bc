use crate::error::{Result, SpendingError};
use crate::schema::{PeriodWindow, Record};
use crate::utils::{
    first_day_of_month, last_day_of_month, month_from_name, month_name, parse_range_date,
};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// A month given either by number or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthSpec {
    Number(u32),
    Name(String),
}

impl MonthSpec {
    /// Resolves to a month number in 1-12.
    pub fn number(&self) -> Result<u32> {
        match self {
            MonthSpec::Number(n) if (1..=12).contains(n) => Ok(*n),
            MonthSpec::Number(n) => Err(SpendingError::InvalidMonth(n.to_string())),
            MonthSpec::Name(name) => {
                month_from_name(name).ok_or_else(|| SpendingError::InvalidMonth(name.clone()))
            }
        }
    }
}

impl From<u32> for MonthSpec {
    fn from(n: u32) -> Self {
        MonthSpec::Number(n)
    }
}

impl From<&str> for MonthSpec {
    fn from(name: &str) -> Self {
        MonthSpec::Name(name.to_string())
    }
}

impl From<String> for MonthSpec {
    fn from(name: String) -> Self {
        MonthSpec::Name(name)
    }
}

/// A calendar year given as a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearSpec {
    Number(i32),
    Text(String),
}

impl YearSpec {
    pub fn year(&self) -> Result<i32> {
        match self {
            YearSpec::Number(y) => Ok(*y),
            YearSpec::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| SpendingError::InvalidYear(text.clone())),
        }
    }
}

impl From<i32> for YearSpec {
    fn from(year: i32) -> Self {
        YearSpec::Number(year)
    }
}

impl From<&str> for YearSpec {
    fn from(text: &str) -> Self {
        YearSpec::Text(text.to_string())
    }
}

/// What part of the ledger a report covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodScope {
    /// Two `DD/MM/YYYY` dates, both included.
    Range {
        date_beg: String,
        date_end: String,
        label: String,
    },
    Month { year: i32, month: MonthSpec },
    Year(YearSpec),
}

impl PeriodScope {
    pub fn resolve(&self) -> Result<PeriodWindow> {
        let window = match self {
            PeriodScope::Range {
                date_beg,
                date_end,
                label,
            } => PeriodWindow {
                date_beg: parse_range_date(date_beg)?,
                date_end: parse_range_date(date_end)?,
                label: label.clone(),
            },
            PeriodScope::Month { year, month } => month_window(*year, month.number()?)?,
            PeriodScope::Year(spec) => year_window(spec.year()?)?,
        };
        debug!(
            "Resolved period '{}' to {}..={}",
            window.label, window.date_beg, window.date_end
        );
        Ok(window)
    }
}

pub fn month_window(year: i32, month: u32) -> Result<PeriodWindow> {
    let invalid = || SpendingError::InvalidMonth(month.to_string());
    let date_beg = first_day_of_month(year, month).ok_or_else(invalid)?;
    let date_end = last_day_of_month(year, month).ok_or_else(invalid)?;
    let label = month_name(month).ok_or_else(invalid)?.to_string();
    Ok(PeriodWindow {
        date_beg,
        date_end,
        label,
    })
}

pub fn year_window(year: i32) -> Result<PeriodWindow> {
    let invalid = || SpendingError::InvalidYear(year.to_string());
    let date_beg = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
    let date_end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
    Ok(PeriodWindow {
        date_beg,
        date_end,
        label: year.to_string(),
    })
}

/// Records dated inside the window, in ledger order. An inverted window selects nothing.
pub fn select<'a>(records: &'a [Record], window: &PeriodWindow) -> Vec<&'a Record> {
    records.iter().filter(|r| window.contains(r.date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn record(date: (i32, u32, u32), price: i64) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            who: "A".to_string(),
            what: String::new(),
            category: "Food".to_string(),
            price: Decimal::from(price),
        }
    }

    #[test]
    fn test_month_spec_number_and_name_agree() {
        assert_eq!(MonthSpec::from(3u32).number().unwrap(), 3);
        assert_eq!(MonthSpec::from("March").number().unwrap(), 3);
        assert_eq!(MonthSpec::from("mArCh").number().unwrap(), 3);
    }

    #[test]
    fn test_invalid_months() {
        assert!(matches!(
            MonthSpec::from(0u32).number(),
            Err(SpendingError::InvalidMonth(_))
        ));
        assert!(matches!(
            MonthSpec::from(13u32).number(),
            Err(SpendingError::InvalidMonth(_))
        ));
        assert!(matches!(
            MonthSpec::from("Smarch").number(),
            Err(SpendingError::InvalidMonth(_))
        ));
    }

    #[test]
    fn test_year_spec() {
        assert_eq!(YearSpec::from(2024).year().unwrap(), 2024);
        assert_eq!(YearSpec::from(" 2024 ").year().unwrap(), 2024);
        assert!(matches!(
            YearSpec::from("twenty").year(),
            Err(SpendingError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_month_window_leap_years() {
        let feb_2024 = PeriodScope::Month {
            year: 2024,
            month: MonthSpec::from(2u32),
        }
        .resolve()
        .unwrap();
        assert_eq!(
            feb_2024.date_end,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(feb_2024.label, "February");

        let feb_2023 = PeriodScope::Month {
            year: 2023,
            month: MonthSpec::from("february"),
        }
        .resolve()
        .unwrap();
        assert_eq!(
            feb_2023.date_beg,
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()
        );
        assert_eq!(
            feb_2023.date_end,
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_year_window() {
        let window = PeriodScope::Year(YearSpec::from("2023")).resolve().unwrap();
        assert_eq!(window.date_beg, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(
            window.date_end,
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
        assert_eq!(window.label, "2023");
    }

    #[test]
    fn test_range_rejects_other_formats() {
        let scope = PeriodScope::Range {
            date_beg: "2024-01-01".to_string(),
            date_end: "31/01/2024".to_string(),
            label: "January".to_string(),
        };
        assert!(matches!(
            scope.resolve(),
            Err(SpendingError::DateParse { .. })
        ));
    }

    #[test]
    fn test_select_includes_boundaries() {
        let records = vec![
            record((2023, 12, 31), 1),
            record((2024, 1, 10), 2),
            record((2024, 1, 15), 3),
            record((2024, 1, 20), 4),
            record((2024, 1, 21), 5),
        ];
        let window = PeriodScope::Range {
            date_beg: "10/01/2024".to_string(),
            date_end: "20/01/2024".to_string(),
            label: "mid January".to_string(),
        }
        .resolve()
        .unwrap();

        let selected = select(&records, &window);
        let prices: Vec<Decimal> = selected.iter().map(|r| r.price).collect();
        assert_eq!(
            prices,
            vec![Decimal::from(2), Decimal::from(3), Decimal::from(4)]
        );
    }

    #[test]
    fn test_inverted_range_selects_nothing() {
        let records = vec![record((2024, 3, 1), 10)];
        let window = PeriodScope::Range {
            date_beg: "01/06/2024".to_string(),
            date_end: "01/01/2024".to_string(),
            label: "inverted".to_string(),
        }
        .resolve()
        .unwrap();
        assert!(select(&records, &window).is_empty());
    }
}
