//! Plain-text rendering of report results.
//!
//! Rendering is purely downstream of the engine: nothing here changes a number.
//! Repeated category names and totals are blanked after the first row of each
//! category, which is why the engine always returns them unmasked.

use crate::schema::{AggregationResult, AnnualReport};
use rust_decimal::Decimal;
use std::fmt;

struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }
        widths
    }

    /// First column left-aligned, every other column right-aligned.
    fn render(&self) -> String {
        let widths = self.widths();
        let mut output = String::new();

        let line = |cells: &[String], output: &mut String| {
            let mut parts = Vec::with_capacity(widths.len());
            for (i, width) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                if i == 0 {
                    parts.push(format!("{:<width$}", cell, width = width));
                } else {
                    parts.push(format!("{:>width$}", cell, width = width));
                }
            }
            output.push_str(parts.join("  ").trim_end());
            output.push('\n');
        };

        line(self.headers.as_slice(), &mut output);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&rule.join("  "));
        output.push('\n');
        for row in &self.rows {
            line(row.as_slice(), &mut output);
        }
        output
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

pub fn render_aggregation(result: &AggregationResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Spendings in {} ({} - {}): {}\n",
        result.label,
        result.date_beg.format("%d/%m/%Y"),
        result.date_end.format("%d/%m/%Y"),
        money(result.total_spent)
    ));
    if result.subscriptions_view.is_some() {
        output.push_str(&format!(
            "Spendings in {} with subscriptions: {}\n",
            result.label,
            money(result.total_with_subscriptions)
        ));
    }
    output.push_str(&format!(
        "Spendings in {} with the apartment: {}\n\n",
        result.label,
        money(result.total_with_rent)
    ));

    let mut categories = TextTable::new(&["Category", "Who", "Price", "Count", "Category total"]);
    let mut previous: Option<&str> = None;
    for row in &result.by_category_by_payer {
        let first_of_category = previous != Some(row.category.as_str());
        categories.push(vec![
            if first_of_category {
                row.category.clone()
            } else {
                String::new()
            },
            row.payer.clone(),
            money(row.sum),
            row.count.to_string(),
            if first_of_category {
                money(row.category_total)
            } else {
                String::new()
            },
        ]);
        previous = Some(row.category.as_str());
    }
    output.push_str(&categories.render());
    output.push('\n');

    let mut payers = TextTable::new(&["Who", "Price", "Price with rent"]);
    for row in &result.by_payer {
        payers.push(vec![
            row.payer.clone(),
            money(row.sum),
            money(row.sum_plus_rent_share),
        ]);
    }
    output.push_str(&payers.render());

    if let Some(subscriptions) = &result.subscriptions_view {
        output.push('\n');
        let mut subs = TextTable::new(&["Subscription", "Price"]);
        for sub in subscriptions {
            subs.push(vec![sub.what.clone(), money(sub.price)]);
        }
        output.push_str(&subs.render());
    }

    output
}

pub fn render_annual(report: &AnnualReport) -> String {
    if report.is_empty() {
        return format!("No spendings recorded in {}\n", report.year);
    }

    let mut output = format!("Spendings in {} by category and month\n\n", report.year);

    let mut headers = vec!["Category"];
    headers.extend(report.months.iter().map(|m| m.label.as_str()));
    let mut matrix = TextTable::new(&headers);
    for (category, cells) in &report.category_by_month {
        let mut row = vec![category.clone()];
        row.extend(cells.iter().map(|c| format!("{:.0}", c)));
        matrix.push(row);
    }
    let mut totals = vec!["Total".to_string()];
    totals.extend(
        report
            .months
            .iter()
            .map(|m| format!("{:.0}", report.month_total(m.month))),
    );
    matrix.push(totals);
    output.push_str(&matrix.render());
    output.push('\n');

    let mut payers = TextTable::new(&["Month", "Who", "Price", "Price with rent"]);
    for row in &report.payer_by_month {
        let label = report
            .months
            .iter()
            .find(|m| m.month == row.month)
            .map(|m| m.label.clone())
            .unwrap_or_else(|| row.month.to_string());
        payers.push(vec![
            label,
            row.payer.clone(),
            money(row.sum),
            money(row.sum_plus_rent_share),
        ]);
    }
    output.push_str(&payers.render());

    output
}

impl fmt::Display for AggregationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_aggregation(self))
    }
}

impl fmt::Display for AnnualReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_annual(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CategoryPayerRow, MonthColumn, PayerMonthRow, PayerRow};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn result() -> AggregationResult {
        AggregationResult {
            label: "January".to_string(),
            date_beg: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            record_count: 3,
            effective_rent: Decimal::from(1000),
            rent_multiplier: 1,
            total_spent: Decimal::from(180),
            total_with_subscriptions: Decimal::from(180),
            total_with_rent: Decimal::from(1180),
            by_category_by_payer: vec![
                CategoryPayerRow {
                    category: "Food".to_string(),
                    payer: "A".to_string(),
                    sum: Decimal::from(100),
                    count: 1,
                    category_total: Decimal::from(150),
                },
                CategoryPayerRow {
                    category: "Food".to_string(),
                    payer: "B".to_string(),
                    sum: Decimal::from(50),
                    count: 1,
                    category_total: Decimal::from(150),
                },
                CategoryPayerRow {
                    category: "Transport".to_string(),
                    payer: "A".to_string(),
                    sum: Decimal::from(30),
                    count: 1,
                    category_total: Decimal::from(30),
                },
            ],
            by_payer: vec![PayerRow {
                payer: "A".to_string(),
                sum: Decimal::from(130),
                sum_plus_rent_share: Decimal::from(630),
            }],
            subscriptions_view: None,
        }
    }

    #[test]
    fn test_repeated_category_total_is_blanked() {
        let text = render_aggregation(&result());
        assert!(text.contains("Spendings in January (01/01/2024 - 31/01/2024): 180.00"));
        assert!(text.contains("with the apartment: 1180.00"));
        assert_eq!(text.matches("150.00").count(), 1);
        assert_eq!(text.matches("Food").count(), 1);
        assert!(text.contains("630.00"));
        assert!(!text.contains("Subscription"));
    }

    #[test]
    fn test_annual_matrix_has_totals_row() {
        let mut category_by_month = BTreeMap::new();
        category_by_month.insert(
            "Food".to_string(),
            vec![Decimal::from(100), Decimal::from(20)],
        );
        let report = AnnualReport {
            year: 2024,
            effective_rent: Decimal::from(1000),
            months: vec![
                MonthColumn {
                    month: 3,
                    label: "March".to_string(),
                },
                MonthColumn {
                    month: 4,
                    label: "April".to_string(),
                },
            ],
            category_by_month,
            payer_by_month: vec![PayerMonthRow {
                month: 3,
                payer: "A".to_string(),
                sum: Decimal::from(100),
                sum_plus_rent_share: Decimal::from(600),
            }],
        };
        let text = report.to_string();
        assert!(text.contains("March"));
        assert!(text.contains("April"));
        assert!(text.contains("Total"));
        assert!(text.contains("600.00"));
    }

    #[test]
    fn test_empty_annual() {
        let report = AnnualReport::empty(2019, Decimal::ZERO);
        assert_eq!(render_annual(&report), "No spendings recorded in 2019\n");
    }
}
