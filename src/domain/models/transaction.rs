//! Domain model for a ledger transaction.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::service::CashDirection;

/// Payment status of a transaction.
///
/// The only permitted transition is Pending → Paid, performed by settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Paid,
    Pending,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Paid => "PAID",
            TransactionStatus::Pending => "PENDING",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "PAID" => Ok(TransactionStatus::Paid),
            "PENDING" => Ok(TransactionStatus::Pending),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Upi,
    Bank,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Upi => "UPI",
            PaymentMode::Bank => "BANK",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "CASH" => Ok(PaymentMode::Cash),
            "UPI" => Ok(PaymentMode::Upi),
            "BANK" => Ok(PaymentMode::Bank),
            _ => Err(format!("Invalid payment mode: {}", s)),
        }
    }
}

/// Cash moved on behalf of a customer, distinct from the facilitation fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashMovement {
    pub amount: Decimal,
    pub direction: CashDirection,
    pub bank_name: String,
}

/// A stored ledger record.
///
/// Core fields are immutable after creation; settlement is the sole mutation
/// path and only moves `amount_paid`, `pending_amount`, `status` and `profit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub service_code: String,
    pub service_name: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_mobile: Option<String>,
    pub qty: u32,
    pub price: Decimal,
    pub cost: Decimal,
    pub partner_fee: Decimal,
    pub total_charge: Decimal,
    pub amount_paid: Decimal,
    pub pending_amount: Decimal,
    pub status: TransactionStatus,
    pub profit: Decimal,
    pub payment_mode: PaymentMode,
    pub notes: Option<String>,
    pub cash_movement: Option<CashMovement>,
    pub created_at: DateTime<FixedOffset>,
}

impl Transaction {
    /// Generate a unique transaction ID.
    /// Format: txn-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("txn-{}-{}", timestamp_ms, random_suffix(4))
    }

    /// The profit that would be fully recognized if the total charge were
    /// entirely paid. For cash movements this is the flat fee itself.
    pub fn potential_profit(&self) -> Decimal {
        if self.cash_movement.is_some() {
            self.price
        } else {
            Decimal::from(self.qty) * (self.price - self.cost - self.partner_fee)
        }
    }
}

/// Generate a random hex suffix for record IDs. Zero-padded so IDs always
/// carry a fixed-width suffix.
pub(crate) fn random_suffix(len: usize) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos();
    format!("{:0>width$x}", now % (16_u128.pow(len as u32)), width = len)
}
