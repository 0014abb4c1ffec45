//! Dashboard and pending-work aggregation.
//!
//! Figures are recomputed from the persisted ledger on every call; nothing is
//! cached across calls, so a persistence failure can never leave stale
//! aggregates behind.

use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use log::info;
use rust_decimal::Decimal;

use crate::domain::commands::stats::DashboardStats;
use crate::domain::errors::LedgerError;
use crate::domain::models::{CashDirection, Transaction, TransactionStatus};
use crate::storage::traits::{CustomerStorage, TransactionStorage};

/// Service deriving aggregate figures from the ledger and the directory.
#[derive(Clone)]
pub struct StatsService {
    transaction_repository: Arc<dyn TransactionStorage>,
    customer_repository: Arc<dyn CustomerStorage>,
}

impl StatsService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionStorage>,
        customer_repository: Arc<dyn CustomerStorage>,
    ) -> Self {
        Self {
            transaction_repository,
            customer_repository,
        }
    }

    /// Compute the dashboard figures as of `now`.
    ///
    /// "Today" and "this month" are midnights in the offset of the supplied
    /// `now`, so the caller controls the local timezone. Profit figures count
    /// Paid transactions only; the pending total is all-time.
    pub fn dashboard_stats(
        &self,
        now: DateTime<FixedOffset>,
    ) -> Result<DashboardStats, LedgerError> {
        let transactions = self.transaction_repository.list_transactions()?;
        let total_customers = self.customer_repository.list_customers()?.len();

        let today = day_start(now);
        let start_of_month = month_start(now);

        let daily_profit = transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Paid && t.created_at >= today)
            .map(|t| t.profit)
            .sum();
        let monthly_profit = transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Paid && t.created_at >= start_of_month)
            .map(|t| t.profit)
            .sum();

        let total_pending_amount = pending_total(&transactions);
        let services_today = transactions.iter().filter(|t| t.created_at >= today).count();

        let daily_deposit = daily_cash(&transactions, today, CashDirection::Deposit);
        let daily_withdrawal = daily_cash(&transactions, today, CashDirection::Withdrawal);

        info!(
            "Dashboard stats: {} transactions today, daily profit {}",
            services_today, daily_profit
        );

        Ok(DashboardStats {
            daily_profit,
            monthly_profit,
            total_pending_amount,
            total_customers,
            services_today,
            daily_deposit,
            daily_withdrawal,
            daily_net_cash: daily_deposit - daily_withdrawal,
        })
    }

    /// Total outstanding amount across all pending transactions.
    ///
    /// Shares its sum with [`StatsService::dashboard_stats`] so the
    /// pending-work view and the dashboard can never disagree.
    pub fn pending_work_total(&self) -> Result<Decimal, LedgerError> {
        let transactions = self.transaction_repository.list_transactions()?;
        Ok(pending_total(&transactions))
    }
}

/// Sum of pending amounts over Pending transactions. Single source of truth
/// for both the dashboard figure and the pending-work view.
fn pending_total(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Pending)
        .map(|t| t.pending_amount)
        .sum()
}

fn daily_cash(
    transactions: &[Transaction],
    today: DateTime<FixedOffset>,
    direction: CashDirection,
) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.created_at >= today)
        .filter_map(|t| t.cash_movement.as_ref())
        .filter(|cash| cash.direction == direction)
        .map(|cash| cash.amount)
        .sum()
}

/// Midnight of `now`'s calendar day, in `now`'s offset.
fn day_start(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_local_timezone(*now.offset())
        .unwrap()
}

/// Midnight of the first day of `now`'s month, in `now`'s offset.
fn month_start(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_local_timezone(*now.offset())
        .unwrap()
}
