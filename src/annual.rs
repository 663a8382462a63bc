use crate::engine::{sum_by_category, sum_by_payer, Aggregator, Entry};
use crate::error::Result;
use crate::period::{month_window, select, year_window};
use crate::schema::{AnnualReport, MonthColumn, PayerMonthRow, Record};
use crate::utils::{round_money, round_whole};
use chrono::Datelike;
use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Month-by-month breakdown of one calendar year.
pub struct AnnualRollupBuilder<'a> {
    aggregator: &'a Aggregator<'a>,
    effective_rent: Decimal,
}

impl<'a> AnnualRollupBuilder<'a> {
    pub fn new(aggregator: &'a Aggregator<'a>, effective_rent: Decimal) -> Self {
        Self {
            aggregator,
            effective_rent,
        }
    }

    /// Covers every month from the first to the last month holding records, gaps
    /// included. A year without records gives an empty report.
    pub fn build(&self, records: &[Record], year: i32) -> Result<AnnualReport> {
        let year_records = select(records, &year_window(year)?);

        let first = year_records.iter().map(|r| r.date.month()).min();
        let last = year_records.iter().map(|r| r.date.month()).max();
        let (Some(first), Some(last)) = (first, last) else {
            info!("No records in {}, annual report is empty", year);
            return Ok(AnnualReport::empty(year, self.effective_rent));
        };

        let share = self.aggregator.rent_share(self.effective_rent);
        let month_count = (last - first + 1) as usize;

        let mut months = Vec::with_capacity(month_count);
        let mut category_by_month: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
        let mut payer_by_month = Vec::new();

        for (idx, month) in (first..=last).enumerate() {
            let window = month_window(year, month)?;
            let month_records: Vec<&Record> = year_records
                .iter()
                .copied()
                .filter(|r| window.contains(r.date))
                .collect();

            debug!(
                "Rolling up {} {}: {} records",
                window.label,
                year,
                month_records.len()
            );

            for (category, sum) in sum_by_category(month_records.iter().map(|r| Entry::from(*r))) {
                let cells = category_by_month
                    .entry(category.to_string())
                    .or_insert_with(|| vec![Decimal::ZERO; month_count]);
                cells[idx] = round_whole(sum);
            }

            for (payer, sum) in sum_by_payer(month_records.iter().map(|r| Entry::from(*r))) {
                payer_by_month.push(PayerMonthRow {
                    month,
                    payer: payer.to_string(),
                    sum: round_money(sum),
                    sum_plus_rent_share: round_money(sum + share),
                });
            }

            months.push(MonthColumn {
                month,
                label: window.label,
            });
        }

        info!(
            "Annual report for {}: {} months, {} categories",
            year,
            months.len(),
            category_by_month.len()
        );

        Ok(AnnualReport {
            year,
            effective_rent: self.effective_rent,
            months,
            category_by_month,
            payer_by_month,
        })
    }
}
