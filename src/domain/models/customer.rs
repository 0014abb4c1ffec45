//! Domain model for a customer.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A registered customer of the shop.
///
/// Customers are created once and never mutated or deleted. The optional bank
/// fields are captured for banking services but carry no validation beyond
/// presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub mobile_number: String,
    pub address: String,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl Customer {
    /// Generate a unique customer ID.
    /// Format: cust-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!(
            "cust-{}-{}",
            timestamp_ms,
            super::transaction::random_suffix(4)
        )
    }
}
