//! Sale and sale item models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Sale header from the database. Immutable after commit except for the
/// `email_sent` flag, flipped by the background receipt delivery.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sale {
    pub id: Uuid,
    pub receipt_no: String,
    pub sale_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub total_amount: Decimal,
    pub total_profit: Decimal,
    pub sold_by_user_id: Uuid,
    pub email_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One sold unit within a sale, with the model name and IMEI snapshotted
/// as of sale time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub device_id: Uuid,
    pub model_name_at_sale: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub cost_price_at_sale: Decimal,
    pub item_profit: Decimal,
    pub imei_at_sale: String,
    pub created_at: DateTime<Utc>,
}

/// One requested item of a sale: the device to sell and the price actually
/// charged for it
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaleItemInput {
    pub device_id: Uuid,
    pub sale_price: Decimal,
}

/// Header data for a sale about to be committed
#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub sold_by_user_id: Uuid,
}

/// A committed sale with its line items
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletedSale {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Running aggregate totals for one sale
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    pub total_amount: Decimal,
    pub total_profit: Decimal,
}

impl SaleTotals {
    /// Account for one unit and return its profit
    pub fn add_item(&mut self, sale_price: Decimal, cost_price: Decimal) -> Decimal {
        let profit = sale_price - cost_price;
        self.total_amount += sale_price;
        self.total_profit += profit;
        profit
    }
}

/// Format a receipt sequence value as the human-readable receipt number,
/// e.g. `#0042`
pub fn format_receipt_no(seq: i64) -> String {
    format!("#{:04}", seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn receipt_numbers_are_zero_padded() {
        assert_eq!(format_receipt_no(1), "#0001");
        assert_eq!(format_receipt_no(42), "#0042");
        assert_eq!(format_receipt_no(9999), "#9999");
        // Padding never truncates once the sequence outgrows four digits
        assert_eq!(format_receipt_no(12345), "#12345");
    }

    #[test]
    fn totals_accumulate_exactly() {
        let mut totals = SaleTotals::default();

        let p1 = totals.add_item(dec!(12000.00), dec!(9500.00));
        let p2 = totals.add_item(dec!(7999.99), dec!(8200.00));

        assert_eq!(p1, dec!(2500.00));
        // Selling below cost yields a negative item profit, not an error
        assert_eq!(p2, dec!(-200.01));
        assert_eq!(totals.total_amount, dec!(19999.99));
        assert_eq!(totals.total_profit, dec!(2299.99));
    }

    #[test]
    fn totals_of_empty_sale_are_zero() {
        let totals = SaleTotals::default();
        assert_eq!(totals.total_amount, Decimal::ZERO);
        assert_eq!(totals.total_profit, Decimal::ZERO);
    }
}
