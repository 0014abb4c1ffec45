//! Service catalog with first-use seeding.
//!
//! The catalog is reference data: seeded once into an empty store with the
//! fixed list below, read-only afterwards.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use log::info;
use rust_decimal::Decimal;

use crate::domain::errors::LedgerError;
use crate::domain::models::{CashDirection, Service, ServiceCategory, ServiceKind};
use crate::storage::traits::ServiceStorage;

/// Default pricing for a seeded catalog entry: (code, name, category, price, cost).
/// Partner fees all default to zero; partners invoice per-account openings
/// separately and the fee is entered per transaction.
const SEED_CATALOG: &[(&str, &str, ServiceCategory, i64, i64)] = &[
    ("CASH_DEPOSIT", "Cash Deposit", ServiceCategory::Banking, 10, 0),
    ("CASH_WITHDRAWAL", "Cash Withdrawal", ServiceCategory::Banking, 10, 0),
    ("AIRTEL_ACCOUNT", "Airtel Account", ServiceCategory::Banking, 0, 0),
    ("FINO_ACCOUNT", "Fino Account", ServiceCategory::Banking, 0, 0),
    ("KOTAK_ACCOUNT", "Kotak Account", ServiceCategory::Banking, 0, 0),
    ("AADHAAR_PRINT", "Aadhaar Print", ServiceCategory::Print, 10, 2),
    ("AYUSHMAN_CARD", "Ayushman Card", ServiceCategory::G2c, 50, 0),
    ("ESHRAM_CARD", "eShram Card", ServiceCategory::G2c, 20, 0),
    ("SAMAGRAH", "Samagrah", ServiceCategory::G2c, 20, 0),
    ("KYC", "KYC", ServiceCategory::Banking, 30, 0),
    ("LIFE_CERT", "Life Certificate", ServiceCategory::G2c, 50, 0),
    ("PRINT_BW", "Print Out B/W (per page)", ServiceCategory::Print, 2, 1),
    ("PRINT_COLOR", "Print Out Color (per page)", ServiceCategory::Print, 10, 5),
    ("LAMINATION", "Lamination", ServiceCategory::Doc, 30, 15),
    ("INCOME_CERT", "Income Certificate", ServiceCategory::G2c, 50, 0),
    ("DOMESTIC_CERT", "Domestic Certificate", ServiceCategory::G2c, 50, 0),
    ("RESUME", "Resume Making", ServiceCategory::Doc, 50, 0),
    ("POLICE_VERIFICATION", "Police Verification", ServiceCategory::G2c, 100, 0),
    ("PAN_CARD", "PAN Card", ServiceCategory::G2c, 50, 0),
    ("OTHER", "Other", ServiceCategory::Other, 0, 0),
];

/// Service for reading the catalog of billable services.
#[derive(Clone)]
pub struct CatalogService {
    service_repository: Arc<dyn ServiceStorage>,
}

impl CatalogService {
    pub fn new(service_repository: Arc<dyn ServiceStorage>) -> Self {
        Self { service_repository }
    }

    /// List active services, seeding the catalog first if the store is empty.
    pub fn list_services(&self) -> Result<Vec<Service>, LedgerError> {
        self.ensure_seeded()?;
        let services = self.service_repository.list_services()?;
        Ok(services.into_iter().filter(|s| s.active).collect())
    }

    /// Look up a service by code.
    pub fn get_service(&self, code: &str) -> Result<Option<Service>, LedgerError> {
        self.ensure_seeded()?;
        Ok(self.service_repository.get_service(code)?)
    }

    /// Seed the fixed catalog into an empty store. Idempotent.
    fn ensure_seeded(&self) -> Result<(), LedgerError> {
        if !self.service_repository.list_services()?.is_empty() {
            return Ok(());
        }
        let now = Utc::now().fixed_offset();
        let catalog = seed_catalog(now);
        self.service_repository.store_services(&catalog)?;
        info!("Seeded service catalog with {} entries", catalog.len());
        Ok(())
    }
}

/// Build the fixed seed catalog with the given creation timestamp.
fn seed_catalog(now: DateTime<FixedOffset>) -> Vec<Service> {
    SEED_CATALOG
        .iter()
        .map(|&(code, name, category, price, cost)| Service {
            code: code.to_string(),
            name: name.to_string(),
            category,
            kind: match code {
                "CASH_DEPOSIT" => ServiceKind::CashMovement(CashDirection::Deposit),
                "CASH_WITHDRAWAL" => ServiceKind::CashMovement(CashDirection::Withdrawal),
                _ => ServiceKind::Regular,
            },
            default_price: Decimal::from(price),
            default_cost: Decimal::from(cost),
            default_partner_fee: Decimal::ZERO,
            active: true,
            created_at: now,
        })
        .collect()
}
