use crate::error::{Result, SpendingError};
use crate::recurring::RecurringCosts;
use crate::schema::{
    AggregationResult, CategoryPayerRow, PayerRow, PeriodWindow, Record, SHARED_PAYER,
    SUBSCRIPTIONS_CATEGORY,
};
use crate::utils::{round_money, year_month};
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Borrowed view of the three fields grouping cares about. Lets synthetic
/// subscription rows sit next to ledger records without cloning either.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry<'a> {
    pub category: &'a str,
    pub payer: &'a str,
    pub price: Decimal,
}

impl<'a> From<&'a Record> for Entry<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            category: &record.category,
            payer: &record.who,
            price: record.price,
        }
    }
}

// Internal accumulator for one (category, payer) cell
#[derive(Default)]
struct Cell {
    sum: Decimal,
    count: usize,
}

pub struct Aggregator<'a> {
    costs: &'a RecurringCosts,
    rent_split: Decimal,
}

impl<'a> Aggregator<'a> {
    pub fn new(costs: &'a RecurringCosts, rent_split: u32) -> Result<Self> {
        if rent_split == 0 {
            return Err(SpendingError::InvalidRentSplit(rent_split));
        }
        Ok(Self {
            costs,
            rent_split: Decimal::from(rent_split),
        })
    }

    /// Builds the summary of `records`, which must already be filtered to `window`.
    ///
    /// With `yearly` set the rent is charged once per distinct calendar month present
    /// in `records`; otherwise it is charged once. An empty selection yields a
    /// zero-valued result rather than an error.
    pub fn aggregate(
        &self,
        records: &[&Record],
        window: &PeriodWindow,
        yearly: bool,
        rent_override: Option<Decimal>,
    ) -> AggregationResult {
        let effective_rent = self.costs.effective_rent(rent_override);
        let rent_multiplier = if yearly {
            distinct_months(records)
        } else {
            1
        };
        let total_rent = effective_rent * Decimal::from(rent_multiplier);

        let total_spent: Decimal = records.iter().map(|r| r.price).sum();

        let mut entries: Vec<Entry> = records.iter().map(|r| Entry::from(*r)).collect();
        let (total_with_subscriptions, subscriptions_view) = if self.costs.has_subscriptions() {
            let subs = self.costs.subscriptions();
            entries.extend(subs.iter().map(|s| Entry {
                category: SUBSCRIPTIONS_CATEGORY,
                payer: SHARED_PAYER,
                price: s.price,
            }));
            (
                total_spent + self.costs.subscriptions_total(),
                Some(subs.to_vec()),
            )
        } else {
            (total_spent, None)
        };

        let total_with_rent = total_with_subscriptions + total_rent;

        let by_category_by_payer = group_by_category_and_payer(&entries);
        let by_payer = self.group_by_payer(records, total_rent);

        debug!(
            "Aggregated '{}': {} records, {} category rows, {} payers, rent x{}",
            window.label,
            records.len(),
            by_category_by_payer.len(),
            by_payer.len(),
            rent_multiplier
        );

        AggregationResult {
            label: window.label.clone(),
            date_beg: window.date_beg,
            date_end: window.date_end,
            record_count: records.len(),
            effective_rent,
            rent_multiplier,
            total_spent: round_money(total_spent),
            total_with_subscriptions: round_money(total_with_subscriptions),
            total_with_rent: round_money(total_with_rent),
            by_category_by_payer,
            by_payer,
            subscriptions_view,
        }
    }

    /// Each payer's spend plus their share of `total_rent`.
    fn group_by_payer(&self, records: &[&Record], total_rent: Decimal) -> Vec<PayerRow> {
        let share = self.rent_share(total_rent);

        let mut rows: Vec<PayerRow> = sum_by_payer(records.iter().map(|r| Entry::from(*r)))
            .into_iter()
            .map(|(payer, sum)| PayerRow {
                payer: payer.to_string(),
                sum: round_money(sum),
                sum_plus_rent_share: round_money(sum + share),
            })
            .collect();

        rows.sort_by(|a, b| b.sum.cmp(&a.sum).then_with(|| a.payer.cmp(&b.payer)));
        rows
    }

    pub fn rent_share(&self, rent: Decimal) -> Decimal {
        rent / self.rent_split
    }
}

/// Number of distinct (year, month) pairs among the records.
pub fn distinct_months(records: &[&Record]) -> u32 {
    let months: BTreeSet<(i32, u32)> = records.iter().map(|r| year_month(r.date)).collect();
    months.len() as u32
}

fn group_by_category_and_payer(entries: &[Entry]) -> Vec<CategoryPayerRow> {
    let mut cells: BTreeMap<(&str, &str), Cell> = BTreeMap::new();
    let mut category_totals: BTreeMap<&str, Decimal> = BTreeMap::new();

    for entry in entries {
        let cell = cells.entry((entry.category, entry.payer)).or_default();
        cell.sum += entry.price;
        cell.count += 1;
        *category_totals.entry(entry.category).or_default() += entry.price;
    }

    let mut rows: Vec<(Decimal, CategoryPayerRow)> = cells
        .into_iter()
        .map(|((category, payer), cell)| {
            let category_total = category_totals
                .get(category)
                .copied()
                .unwrap_or_default();
            (
                category_total,
                CategoryPayerRow {
                    category: category.to_string(),
                    payer: payer.to_string(),
                    sum: round_money(cell.sum),
                    count: cell.count,
                    category_total: round_money(category_total),
                },
            )
        })
        .collect();

    // Sort on the unrounded totals so two categories that round alike stay ordered.
    rows.sort_by(|(total_a, a), (total_b, b)| {
        total_b
            .cmp(total_a)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| b.sum.cmp(&a.sum))
            .then_with(|| a.payer.cmp(&b.payer))
    });

    rows.into_iter().map(|(_, row)| row).collect()
}

pub(crate) fn sum_by_category<'a, I>(entries: I) -> BTreeMap<&'a str, Decimal>
where
    I: IntoIterator<Item = Entry<'a>>,
{
    let mut sums = BTreeMap::new();
    for entry in entries {
        *sums.entry(entry.category).or_insert(Decimal::ZERO) += entry.price;
    }
    sums
}

pub(crate) fn sum_by_payer<'a, I>(entries: I) -> BTreeMap<&'a str, Decimal>
where
    I: IntoIterator<Item = Entry<'a>>,
{
    let mut sums = BTreeMap::new();
    for entry in entries {
        *sums.entry(entry.payer).or_insert(Decimal::ZERO) += entry.price;
    }
    sums
}
