use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category assigned to synthetic subscription rows during grouping.
pub const SUBSCRIPTIONS_CATEGORY: &str = "Subscriptions";

/// Payer assigned to synthetic subscription rows during grouping.
pub const SHARED_PAYER: &str = "Shared";

pub const DEFAULT_PRICE_APT: i64 = 5850;

pub const DEFAULT_RENT_SPLIT: u32 = 2;

/// One spending event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub who: String,
    #[serde(default)]
    pub what: String,
    pub category: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Subscription {
    #[schemars(description = "Name of the recurring service (e.g., 'Netflix', 'Gym')")]
    pub what: String,

    #[schemars(description = "Monthly price of the subscription")]
    pub price: Decimal,
}

/// Construction-time settings of a reporter. Never changed once a reporter exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportConfig {
    #[serde(default = "default_price_apt")]
    #[schemars(
        description = "Monthly rent of the apartment. Folded into every report and split between payers. Defaults to 5850."
    )]
    pub price_apt: Decimal,

    #[serde(default)]
    #[schemars(
        description = "Optional itemized monthly subscriptions. When present they are added to totals and grouped under the 'Subscriptions' category."
    )]
    pub subscriptions: Option<Vec<Subscription>>,

    #[serde(default = "default_rent_split")]
    #[schemars(
        description = "Number of payers the rent is divided between. Must be at least 1. Defaults to 2."
    )]
    pub rent_split: u32,
}

fn default_price_apt() -> Decimal {
    Decimal::from(DEFAULT_PRICE_APT)
}

fn default_rent_split() -> u32 {
    DEFAULT_RENT_SPLIT
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            price_apt: default_price_apt(),
            subscriptions: None,
            rent_split: default_rent_split(),
        }
    }
}

impl ReportConfig {
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ReportConfig)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Inclusive date interval plus the label shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub date_beg: NaiveDate,
    pub date_end: NaiveDate,
    pub label: String,
}

impl PeriodWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_beg <= date && date <= self.date_end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPayerRow {
    pub category: String,
    pub payer: String,
    pub sum: Decimal,
    pub count: usize,
    /// Total of the whole category, repeated on every row of that category.
    pub category_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerRow {
    pub payer: String,
    pub sum: Decimal,
    pub sum_plus_rent_share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub label: String,
    pub date_beg: NaiveDate,
    pub date_end: NaiveDate,
    pub record_count: usize,
    pub effective_rent: Decimal,
    pub rent_multiplier: u32,
    pub total_spent: Decimal,
    pub total_with_subscriptions: Decimal,
    pub total_with_rent: Decimal,
    pub by_category_by_payer: Vec<CategoryPayerRow>,
    pub by_payer: Vec<PayerRow>,
    pub subscriptions_view: Option<Vec<Subscription>>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn payer(&self, payer: &str) -> Option<&PayerRow> {
        self.by_payer.iter().find(|row| row.payer == payer)
    }

    pub fn category_total(&self, category: &str) -> Option<Decimal> {
        self.by_category_by_payer
            .iter()
            .find(|row| row.category == category)
            .map(|row| row.category_total)
    }

    pub fn row(&self, category: &str, payer: &str) -> Option<&CategoryPayerRow> {
        self.by_category_by_payer
            .iter()
            .find(|row| row.category == category && row.payer == payer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthColumn {
    pub month: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerMonthRow {
    pub month: u32,
    pub payer: String,
    pub sum: Decimal,
    pub sum_plus_rent_share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualReport {
    pub year: i32,
    pub effective_rent: Decimal,
    /// Months from the first to the last month holding records, in order.
    pub months: Vec<MonthColumn>,
    /// Category to one whole-unit cell per entry of `months`.
    pub category_by_month: BTreeMap<String, Vec<Decimal>>,
    pub payer_by_month: Vec<PayerMonthRow>,
}

impl AnnualReport {
    pub fn empty(year: i32, effective_rent: Decimal) -> Self {
        Self {
            year,
            effective_rent,
            months: Vec::new(),
            category_by_month: BTreeMap::new(),
            payer_by_month: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Cell of the category×month matrix. Missing categories or months read as zero.
    pub fn category_month(&self, category: &str, month: u32) -> Decimal {
        let Some(idx) = self.months.iter().position(|m| m.month == month) else {
            return Decimal::ZERO;
        };
        self.category_by_month
            .get(category)
            .and_then(|cells| cells.get(idx))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of one month's column. Cells are already rounded to whole units, so with
    /// fractional prices this can differ from the exact monthly total (two categories
    /// at 0.5 each give 2 here against 1 spent).
    pub fn month_total(&self, month: u32) -> Decimal {
        self.category_by_month
            .keys()
            .map(|category| self.category_month(category, month))
            .sum()
    }
}
