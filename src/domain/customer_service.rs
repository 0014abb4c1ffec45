//! Customer directory service.

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::domain::commands::customers::{CreateCustomerCommand, CreateCustomerResult};
use crate::domain::errors::LedgerError;
use crate::domain::models::Customer;
use crate::storage::traits::CustomerStorage;

/// Service for registering and looking up customers.
#[derive(Clone)]
pub struct CustomerService {
    customer_repository: Arc<dyn CustomerStorage>,
}

impl CustomerService {
    pub fn new(customer_repository: Arc<dyn CustomerStorage>) -> Self {
        Self {
            customer_repository,
        }
    }

    /// Register a new customer.
    pub fn create_customer(
        &self,
        command: CreateCustomerCommand,
    ) -> Result<CreateCustomerResult, LedgerError> {
        self.validate_create_command(&command)?;

        let now = Utc::now().fixed_offset();
        let customer = Customer {
            id: Customer::generate_id(now.timestamp_millis() as u64),
            name: command.name.trim().to_string(),
            mobile_number: command.mobile_number.trim().to_string(),
            address: command.address.trim().to_string(),
            bank_name: normalize_optional(command.bank_name),
            account_number: normalize_optional(command.account_number),
            ifsc_code: normalize_optional(command.ifsc_code),
            created_at: now,
        };

        self.customer_repository.store_customer(&customer)?;

        info!("Created customer {} ({})", customer.name, customer.id);

        Ok(CreateCustomerResult { customer })
    }

    /// Get a customer by ID.
    pub fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, LedgerError> {
        Ok(self.customer_repository.get_customer(customer_id)?)
    }

    /// List all customers, most recently registered first.
    pub fn list_customers(&self) -> Result<Vec<Customer>, LedgerError> {
        let mut customers = self.customer_repository.list_customers()?;
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(customers)
    }

    fn validate_create_command(&self, command: &CreateCustomerCommand) -> Result<(), LedgerError> {
        if command.name.trim().len() < 2 {
            return Err(LedgerError::validation(
                "Name must be at least 2 characters.",
            ));
        }
        let mobile = command.mobile_number.trim();
        if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
            return Err(LedgerError::validation("Mobile number must be 10 digits."));
        }
        if command.address.trim().len() < 5 {
            return Err(LedgerError::validation(
                "Address must be at least 5 characters.",
            ));
        }
        Ok(())
    }
}

/// Trim an optional field; blank input is treated as absent.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
