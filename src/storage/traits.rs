//! # Storage Traits
//!
//! Storage abstraction traits that allow different backends to be used
//! interchangeably by the domain layer. The production document store and the
//! test stores both sit behind these.

use anyhow::Result;

use crate::domain::models::{Customer, Service, Transaction};

/// Interface for customer storage operations.
pub trait CustomerStorage: Send + Sync {
    /// Store a new customer.
    fn store_customer(&self, customer: &Customer) -> Result<()>;

    /// Retrieve a specific customer by ID.
    fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>>;

    /// List all customers in insertion order.
    fn list_customers(&self) -> Result<Vec<Customer>>;
}

/// Interface for service catalog storage operations.
pub trait ServiceStorage: Send + Sync {
    /// Store a batch of services (used by catalog seeding).
    fn store_services(&self, services: &[Service]) -> Result<()>;

    /// Retrieve a specific service by code.
    fn get_service(&self, code: &str) -> Result<Option<Service>>;

    /// List all services, active or not.
    fn list_services(&self) -> Result<Vec<Service>>;
}

/// Interface for transaction storage operations.
pub trait TransactionStorage: Send + Sync {
    /// Store a new transaction.
    fn store_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Retrieve a specific transaction by ID.
    fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// List all transactions in insertion order.
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Replace an existing transaction (matched by ID).
    /// Fails if the transaction does not exist.
    fn update_transaction(&self, transaction: &Transaction) -> Result<()>;
}
