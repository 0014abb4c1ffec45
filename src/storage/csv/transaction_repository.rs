use anyhow::{bail, Context, Result};
use chrono::DateTime;
use csv::Reader;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::domain::models::{
    CashDirection, CashMovement, PaymentMode, Transaction, TransactionStatus,
};
use crate::storage::traits::TransactionStorage;

const HEADER: &[&str] = &[
    "id",
    "service_code",
    "service_name",
    "customer_id",
    "customer_name",
    "customer_mobile",
    "qty",
    "price",
    "cost",
    "partner_fee",
    "total_charge",
    "amount_paid",
    "pending_amount",
    "status",
    "profit",
    "payment_mode",
    "notes",
    "cash_amount",
    "cash_direction",
    "cash_bank_name",
    "created_at",
];

/// CSV-based transaction repository.
#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
}

impl TransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_transactions(&self) -> Result<Vec<Transaction>> {
        let file_path = self.connection.transactions_file_path();
        self.connection.ensure_file_exists(&file_path, HEADER)?;

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut transactions = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let id = record.get(0).unwrap_or("").to_string();

            // The three cash columns are either all present or all blank.
            let cash_movement = match (
                optional(record.get(17)),
                optional(record.get(18)),
                optional(record.get(19)),
            ) {
                (Some(amount), Some(direction), Some(bank_name)) => Some(CashMovement {
                    amount: parse_decimal(&amount, "cash_amount", &id)?,
                    direction: CashDirection::parse(&direction).map_err(anyhow::Error::msg)?,
                    bank_name,
                }),
                (None, None, None) => None,
                _ => bail!("Partial cash movement fields in transaction {}", id),
            };

            transactions.push(Transaction {
                service_code: record.get(1).unwrap_or("").to_string(),
                service_name: record.get(2).unwrap_or("").to_string(),
                customer_id: optional(record.get(3)),
                customer_name: optional(record.get(4)),
                customer_mobile: optional(record.get(5)),
                qty: record
                    .get(6)
                    .unwrap_or("")
                    .parse::<u32>()
                    .with_context(|| format!("Invalid qty in transaction {}", id))?,
                price: parse_decimal(record.get(7).unwrap_or(""), "price", &id)?,
                cost: parse_decimal(record.get(8).unwrap_or(""), "cost", &id)?,
                partner_fee: parse_decimal(record.get(9).unwrap_or(""), "partner_fee", &id)?,
                total_charge: parse_decimal(record.get(10).unwrap_or(""), "total_charge", &id)?,
                amount_paid: parse_decimal(record.get(11).unwrap_or(""), "amount_paid", &id)?,
                pending_amount: parse_decimal(record.get(12).unwrap_or(""), "pending_amount", &id)?,
                status: TransactionStatus::parse(record.get(13).unwrap_or(""))
                    .map_err(anyhow::Error::msg)?,
                profit: parse_decimal(record.get(14).unwrap_or(""), "profit", &id)?,
                payment_mode: PaymentMode::parse(record.get(15).unwrap_or(""))
                    .map_err(anyhow::Error::msg)?,
                notes: optional(record.get(16)),
                cash_movement,
                created_at: DateTime::parse_from_rfc3339(record.get(20).unwrap_or(""))
                    .with_context(|| format!("Invalid created_at in transaction {}", id))?,
                id,
            });
        }

        Ok(transactions)
    }

    fn write_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let file_path = self.connection.transactions_file_path();
        let mut csv_writer = csv::Writer::from_path(&file_path)?;

        csv_writer.write_record(HEADER)?;
        for transaction in transactions {
            let cash = transaction.cash_movement.as_ref();
            csv_writer.write_record([
                transaction.id.clone(),
                transaction.service_code.clone(),
                transaction.service_name.clone(),
                transaction.customer_id.clone().unwrap_or_default(),
                transaction.customer_name.clone().unwrap_or_default(),
                transaction.customer_mobile.clone().unwrap_or_default(),
                transaction.qty.to_string(),
                transaction.price.to_string(),
                transaction.cost.to_string(),
                transaction.partner_fee.to_string(),
                transaction.total_charge.to_string(),
                transaction.amount_paid.to_string(),
                transaction.pending_amount.to_string(),
                transaction.status.as_str().to_string(),
                transaction.profit.to_string(),
                transaction.payment_mode.as_str().to_string(),
                transaction.notes.clone().unwrap_or_default(),
                cash.map(|c| c.amount.to_string()).unwrap_or_default(),
                cash.map(|c| c.direction.as_str().to_string())
                    .unwrap_or_default(),
                cash.map(|c| c.bank_name.clone()).unwrap_or_default(),
                transaction.created_at.to_rfc3339(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl TransactionStorage for TransactionRepository {
    fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.read_transactions()?;
        transactions.push(transaction.clone());
        self.write_transactions(&transactions)
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let transactions = self.read_transactions()?;
        Ok(transactions.into_iter().find(|t| t.id == transaction_id))
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.read_transactions()
    }

    fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.read_transactions()?;
        let position = transactions
            .iter()
            .position(|t| t.id == transaction.id)
            .with_context(|| format!("Transaction not found for update: {}", transaction.id))?;
        transactions[position] = transaction.clone();
        self.write_transactions(&transactions)
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

fn parse_decimal(value: &str, field: &str, id: &str) -> Result<Decimal> {
    value
        .parse::<Decimal>()
        .with_context(|| format!("Invalid {} in transaction {}", field, id))
}
