use crate::model::{generate_id, Bill, BillItem, Period};
use crate::store::StoreResult;

#[async_trait::async_trait]
pub trait BillingProvider: Send + Sync {
    async fn bill(&self, user_id: &str, period: Period) -> StoreResult<Bill>;
}

/// Flat daily-rate billing used until a real billing system is connected
#[derive(Debug, Clone)]
pub struct MockBilling {
    pub daily_rate_cents: i64,
    pub currency: String,
}

impl Default for MockBilling {
    fn default() -> Self {
        Self {
            daily_rate_cents: 10,
            currency: "EUR".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl BillingProvider for MockBilling {
    async fn bill(&self, user_id: &str, period: Period) -> StoreResult<Bill> {
        let days = period.days();
        let amount = days * self.daily_rate_cents;
        Ok(Bill {
            bill_id: generate_id(),
            user_id: user_id.to_string(),
            period,
            items: vec![BillItem {
                description: "Platform access (days)".to_string(),
                quantity: days,
                unit_price_cents: self.daily_rate_cents,
                amount_cents: amount,
            }],
            total_cents: amount,
            currency: self.currency.clone(),
        })
    }
}
