//! # Seva Ledger
//!
//! Back-office core for a citizen-services shop (jan seva kendra): customer
//! directory, service catalog, transaction ledger with profit/settlement
//! rules, and recompute-on-read dashboard aggregation.
//!
//! The crate is UI-agnostic. A presentation layer (web, desktop, CLI) talks to
//! the services held in [`AppState`]; persistence sits behind the storage
//! traits in [`storage::traits`] so the file-backed store and test stores are
//! interchangeable.
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer (out of scope)
//!     ↓
//! Domain layer (services, validation, profit rules)
//!     ↓
//! Storage layer (per-collection CSV files)
//! ```

pub mod domain;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::domain::{CatalogService, CustomerService, LedgerService, StatsService};
use crate::storage::csv::{
    CsvConnection, CustomerRepository, ServiceRepository, TransactionRepository,
};

/// Main application state that holds all services.
#[derive(Clone)]
pub struct AppState {
    pub customer_service: CustomerService,
    pub catalog_service: CatalogService,
    pub ledger_service: LedgerService,
    pub stats_service: StatsService,
}

/// Initialize the back office with all required services over one connection.
pub fn initialize_backoffice(connection: CsvConnection) -> Result<AppState> {
    info!("Setting up storage at {}", connection.base_directory().display());
    let customers = Arc::new(CustomerRepository::new(connection.clone()));
    let services = Arc::new(ServiceRepository::new(connection.clone()));
    let transactions = Arc::new(TransactionRepository::new(connection));

    info!("Setting up domain services");
    let customer_service = CustomerService::new(customers.clone());
    let catalog_service = CatalogService::new(services);
    let ledger_service = LedgerService::new(
        transactions.clone(),
        catalog_service.clone(),
        customer_service.clone(),
    );
    let stats_service = StatsService::new(transactions, customers);

    Ok(AppState {
        customer_service,
        catalog_service,
        ledger_service,
        stats_service,
    })
}
