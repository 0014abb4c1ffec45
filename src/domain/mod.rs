//! # Domain Module
//!
//! Business logic for the back office. This layer owns the rules that turn a
//! raw service or cash entry into a consistent ledger record, and the
//! aggregate figures derived from the ledger.
//!
//! ## Module Organization
//!
//! - **customer_service**: customer directory (create/lookup)
//! - **catalog_service**: service catalog with first-use seeding
//! - **ledger_service**: transaction recording, settlement and queries
//! - **stats_service**: dashboard and pending-work aggregation
//!
//! ## Business Rules
//!
//! - A transaction's pending amount is always `total_charge - amount_paid`
//!   and its status is Paid exactly when nothing is pending
//! - Profit is recognized proportionally to the amount actually paid, and
//!   replaced by the full potential profit on settlement
//! - Cash deposits/withdrawals are billed as a flat fee, are always Paid at
//!   creation, and carry the moved cash amount separately from the fee
//! - The sole permitted mutation of a stored transaction is Pending → Paid

pub mod catalog_service;
pub mod commands;
pub mod customer_service;
pub mod errors;
pub mod ledger_service;
pub mod models;
pub mod stats_service;

pub use catalog_service::CatalogService;
pub use customer_service::CustomerService;
pub use errors::LedgerError;
pub use ledger_service::LedgerService;
pub use stats_service::StatsService;
