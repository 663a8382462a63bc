use crate::schema::{ReportConfig, Subscription};
use rust_decimal::Decimal;

/// Fixed monthly costs that never appear as dated records: rent and subscriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringCosts {
    monthly_rent: Decimal,
    subscriptions: Option<Vec<Subscription>>,
}

impl RecurringCosts {
    pub fn new(monthly_rent: Decimal, subscriptions: Option<Vec<Subscription>>) -> Self {
        let subscriptions = subscriptions.map(|mut subs| {
            // stable: equal prices keep their configured order
            subs.sort_by(|a, b| b.price.cmp(&a.price));
            subs
        });
        Self {
            monthly_rent,
            subscriptions,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.price_apt, config.subscriptions.clone())
    }

    pub fn monthly_rent(&self) -> Decimal {
        self.monthly_rent
    }

    /// Sorted by price, most expensive first. Empty when none were configured.
    pub fn subscriptions(&self) -> &[Subscription] {
        self.subscriptions.as_deref().unwrap_or(&[])
    }

    pub fn has_subscriptions(&self) -> bool {
        self.subscriptions.is_some()
    }

    pub fn subscriptions_total(&self) -> Decimal {
        self.subscriptions().iter().map(|s| s.price).sum()
    }

    pub fn effective_rent(&self, rent_override: Option<Decimal>) -> Decimal {
        rent_override.unwrap_or(self.monthly_rent)
    }
}
