//! Reporting service: daily profit and current stock summaries

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        device_status::STATUS_IN_STOCK,
        report::{DailyProfit, StockReport},
        user::{permissions, Caller},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Daily sales and profit figures over an inclusive date range
    pub async fn profit_report(
        &self,
        caller: &Caller,
        start_date: &str,
        end_date: &str,
    ) -> AppResult<Vec<DailyProfit>> {
        caller.require(permissions::VIEW_FINANCIAL_REPORTS)?;

        let start = parse_report_date(start_date)?;
        let end = parse_report_date(end_date)?;
        if start > end {
            return Err(AppError::Validation(
                "Start date cannot be after the end date".to_string(),
            ));
        }

        self.repository.reports.daily_profit_summary(start, end).await
    }

    /// Current stock levels aggregated by catalog entry. Stock figures
    /// carry no profit data, so either report permission opens them.
    pub async fn stock_report(&self, caller: &Caller) -> AppResult<Vec<StockReport>> {
        if !caller.can(permissions::VIEW_STOCK_REPORTS) {
            caller.require(permissions::VIEW_FINANCIAL_REPORTS)?;
        }

        let in_stock = self
            .repository
            .device_statuses
            .find_by_name(STATUS_IN_STOCK)
            .await?
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "System status \"{}\" is not configured. Contact support.",
                    STATUS_IN_STOCK
                ))
            })?;

        self.repository
            .reports
            .current_stock_summary(in_stock.id)
            .await
    }
}

/// Parse a `YYYY-MM-DD` report boundary, rejecting anything else
fn parse_report_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::Validation("Invalid date format. Dates must be in YYYY-MM-DD format.".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_iso_dates() {
        assert_eq!(
            parse_report_date("2026-08-30").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        for input in ["30-08-2026", "2026/08/30", "2026-13-01", "not-a-date", ""] {
            assert!(matches!(
                parse_report_date(input),
                Err(AppError::Validation(_))
            ));
        }
    }
}
