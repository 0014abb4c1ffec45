//! # Storage Module
//!
//! Persistence for the back office. The domain layer only sees the traits in
//! [`traits`]; the concrete backend here keeps one CSV file per collection
//! under a base directory.

pub mod csv;
pub mod traits;

pub use traits::{CustomerStorage, ServiceStorage, TransactionStorage};
