//! # Spending Report
//!
//! A library for turning a ledger of household spending records into period-scoped
//! summaries, with the apartment rent and recurring subscriptions folded in.
//!
//! ## Core Concepts
//!
//! - **Ledger**: The immutable set of dated spending records (`Date`, `Who`, `What`, `Category`, `Price`)
//! - **Period Window**: An inclusive date range resolved from an explicit range, a month or a year
//! - **Recurring Costs**: Monthly rent and itemized subscriptions that never appear as records
//! - **Rent Split**: Rent is charged once per month covered and divided evenly between payers
//! - **Annual Rollup**: A category×month matrix and a payer×month list for one calendar year
//!
//! ## Example
//!
//! ```rust,ignore
//! use spending_report::*;
//! use rust_decimal::Decimal;
//!
//! let ledger = Ledger::from_csv_path("spendings.csv")?;
//! let config = ReportConfig {
//!     price_apt: Decimal::from(5850),
//!     subscriptions: Some(vec![Subscription {
//!         what: "Netflix".to_string(),
//!         price: Decimal::new(4990, 2),
//!     }]),
//!     rent_split: 2,
//! };
//!
//! let reporter = SpendingReporter::new(ledger, config)?;
//! let march = reporter.info_by_month(2024, "March", None)?;
//! println!("{}", march);
//! ```

pub mod annual;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod period;
pub mod recurring;
pub mod report;
pub mod schema;
pub mod utils;

pub use annual::AnnualRollupBuilder;
pub use engine::{distinct_months, Aggregator};
pub use error::{Result, SpendingError};
pub use ingestion::{Ledger, RawTable};
pub use period::{select, MonthSpec, PeriodScope, YearSpec};
pub use recurring::RecurringCosts;
pub use report::{render_aggregation, render_annual};
pub use schema::*;

use log::info;
use rust_decimal::Decimal;

/// Owns the ledger and the recurring costs; every report is a read-only pass over them.
#[derive(Debug, Clone)]
pub struct SpendingReporter {
    ledger: Ledger,
    costs: RecurringCosts,
    rent_split: u32,
}

impl SpendingReporter {
    pub fn new(ledger: Ledger, config: ReportConfig) -> Result<Self> {
        validate_config(&config)?;

        info!(
            "Creating spending reporter over {} records (rent {}, split {})",
            ledger.len(),
            config.price_apt,
            config.rent_split
        );

        Ok(Self {
            costs: RecurringCosts::from_config(&config),
            rent_split: config.rent_split,
            ledger,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn recurring_costs(&self) -> &RecurringCosts {
        &self.costs
    }

    /// Report over two `DD/MM/YYYY` dates, both included.
    pub fn info_by_range(
        &self,
        date_beg: &str,
        date_end: &str,
        label: &str,
        price_apt: Option<Decimal>,
    ) -> Result<AggregationResult> {
        let scope = PeriodScope::Range {
            date_beg: date_beg.to_string(),
            date_end: date_end.to_string(),
            label: label.to_string(),
        };
        self.report(&scope, false, price_apt)
    }

    pub fn info_by_month(
        &self,
        year: i32,
        month: impl Into<MonthSpec>,
        price_apt: Option<Decimal>,
    ) -> Result<AggregationResult> {
        let scope = PeriodScope::Month {
            year,
            month: month.into(),
        };
        self.report(&scope, false, price_apt)
    }

    /// Rent is charged once for every calendar month that holds at least one record.
    pub fn info_by_year(
        &self,
        year: impl Into<YearSpec>,
        price_apt: Option<Decimal>,
    ) -> Result<AggregationResult> {
        self.report(&PeriodScope::Year(year.into()), true, price_apt)
    }

    pub fn annual_report(
        &self,
        year: impl Into<YearSpec>,
        price_apt: Option<Decimal>,
    ) -> Result<AnnualReport> {
        let year = year.into().year()?;
        info!("Building annual report for {}", year);

        let aggregator = Aggregator::new(&self.costs, self.rent_split)?;
        AnnualRollupBuilder::new(&aggregator, self.costs.effective_rent(price_apt))
            .build(self.ledger.records(), year)
    }

    fn report(
        &self,
        scope: &PeriodScope,
        yearly: bool,
        price_apt: Option<Decimal>,
    ) -> Result<AggregationResult> {
        let window = scope.resolve()?;
        info!("Building report for '{}'", window.label);

        let selected = select(self.ledger.records(), &window);
        let aggregator = Aggregator::new(&self.costs, self.rent_split)?;
        Ok(aggregator.aggregate(&selected, &window, yearly, price_apt))
    }
}

fn validate_config(config: &ReportConfig) -> Result<()> {
    if config.rent_split == 0 {
        return Err(SpendingError::InvalidRentSplit(config.rent_split));
    }
    Ok(())
}
