use anyhow::{Context, Result};
use chrono::DateTime;
use csv::Reader;
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::domain::models::Customer;
use crate::storage::traits::CustomerStorage;

const HEADER: &[&str] = &[
    "id",
    "name",
    "mobile_number",
    "address",
    "bank_name",
    "account_number",
    "ifsc_code",
    "created_at",
];

/// CSV-based customer repository.
#[derive(Clone)]
pub struct CustomerRepository {
    connection: CsvConnection,
}

impl CustomerRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_customers(&self) -> Result<Vec<Customer>> {
        let file_path = self.connection.customers_file_path();
        self.connection.ensure_file_exists(&file_path, HEADER)?;

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut customers = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let created_at = DateTime::parse_from_rfc3339(record.get(7).unwrap_or(""))
                .with_context(|| format!("Invalid created_at in customer record: {:?}", record))?;

            customers.push(Customer {
                id: record.get(0).unwrap_or("").to_string(),
                name: record.get(1).unwrap_or("").to_string(),
                mobile_number: record.get(2).unwrap_or("").to_string(),
                address: record.get(3).unwrap_or("").to_string(),
                bank_name: optional(record.get(4)),
                account_number: optional(record.get(5)),
                ifsc_code: optional(record.get(6)),
                created_at,
            });
        }

        Ok(customers)
    }

    fn write_customers(&self, customers: &[Customer]) -> Result<()> {
        let file_path = self.connection.customers_file_path();
        let mut csv_writer = csv::Writer::from_path(&file_path)?;

        csv_writer.write_record(HEADER)?;
        for customer in customers {
            csv_writer.write_record([
                customer.id.clone(),
                customer.name.clone(),
                customer.mobile_number.clone(),
                customer.address.clone(),
                customer.bank_name.clone().unwrap_or_default(),
                customer.account_number.clone().unwrap_or_default(),
                customer.ifsc_code.clone().unwrap_or_default(),
                customer.created_at.to_rfc3339(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl CustomerStorage for CustomerRepository {
    fn store_customer(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.read_customers()?;
        customers.push(customer.clone());
        self.write_customers(&customers)
    }

    fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>> {
        let customers = self.read_customers()?;
        Ok(customers.into_iter().find(|c| c.id == customer_id))
    }

    fn list_customers(&self) -> Result<Vec<Customer>> {
        self.read_customers()
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}
