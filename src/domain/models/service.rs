//! Domain model for a catalog service.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Broad grouping used for reporting and form layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceCategory {
    Banking,
    G2c,
    Print,
    Doc,
    Other,
}

impl ServiceCategory {
    /// Convert to string for CSV storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Banking => "BANKING",
            ServiceCategory::G2c => "G2C",
            ServiceCategory::Print => "PRINT",
            ServiceCategory::Doc => "DOC",
            ServiceCategory::Other => "OTHER",
        }
    }

    /// Parse from string for CSV loading.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "BANKING" => Ok(ServiceCategory::Banking),
            "G2C" => Ok(ServiceCategory::G2c),
            "PRINT" => Ok(ServiceCategory::Print),
            "DOC" => Ok(ServiceCategory::Doc),
            "OTHER" => Ok(ServiceCategory::Other),
            _ => Err(format!("Invalid service category: {}", s)),
        }
    }
}

/// Direction of a cash movement handled on behalf of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashDirection {
    Deposit,
    Withdrawal,
}

impl CashDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashDirection::Deposit => "DEPOSIT",
            CashDirection::Withdrawal => "WITHDRAWAL",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "DEPOSIT" => Ok(CashDirection::Deposit),
            "WITHDRAWAL" => Ok(CashDirection::Withdrawal),
            _ => Err(format!("Invalid cash direction: {}", s)),
        }
    }
}

/// What kind of billing a service follows.
///
/// Regular services charge per unit. Cash-movement services bill a flat
/// facilitation fee while the moved cash amount is tracked separately on the
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceKind {
    Regular,
    CashMovement(CashDirection),
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Regular => "REGULAR",
            ServiceKind::CashMovement(CashDirection::Deposit) => "CASH_MOVEMENT_DEPOSIT",
            ServiceKind::CashMovement(CashDirection::Withdrawal) => "CASH_MOVEMENT_WITHDRAWAL",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "REGULAR" => Ok(ServiceKind::Regular),
            "CASH_MOVEMENT_DEPOSIT" => Ok(ServiceKind::CashMovement(CashDirection::Deposit)),
            "CASH_MOVEMENT_WITHDRAWAL" => Ok(ServiceKind::CashMovement(CashDirection::Withdrawal)),
            _ => Err(format!("Invalid service kind: {}", s)),
        }
    }
}

/// A catalog entry: what the shop can bill for, with default pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub code: String,
    pub name: String,
    pub category: ServiceCategory,
    pub kind: ServiceKind,
    pub default_price: Decimal,
    pub default_cost: Decimal,
    pub default_partner_fee: Decimal,
    pub active: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl Service {
    /// Direction of the cash movement, if this is a cash-movement service.
    pub fn cash_direction(&self) -> Option<CashDirection> {
        match self.kind {
            ServiceKind::CashMovement(direction) => Some(direction),
            ServiceKind::Regular => None,
        }
    }
}
