//! Transaction ledger: recording, settlement and queries.
//!
//! This service turns a raw, user-supplied entry into a validated, fully
//! derived, persisted [`Transaction`]. Validation runs in a fixed order and a
//! failed validation never reaches persistence.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use rust_decimal::Decimal;

use crate::domain::catalog_service::CatalogService;
use crate::domain::commands::transactions::{RecordTransactionCommand, TransactionListQuery};
use crate::domain::customer_service::CustomerService;
use crate::domain::errors::LedgerError;
use crate::domain::models::{
    CashDirection, CashMovement, Customer, Service, Transaction, TransactionStatus,
};
use crate::storage::traits::TransactionStorage;

/// Denormalized customer label for anonymous cash movements.
const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Service owning the transaction write path, settlement and queries.
#[derive(Clone)]
pub struct LedgerService {
    transaction_repository: Arc<dyn TransactionStorage>,
    catalog_service: CatalogService,
    customer_service: CustomerService,
}

impl LedgerService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionStorage>,
        catalog_service: CatalogService,
        customer_service: CustomerService,
    ) -> Self {
        Self {
            transaction_repository,
            catalog_service,
            customer_service,
        }
    }

    /// Record a new transaction.
    ///
    /// Validation order: field-level checks (first failing field wins), the
    /// paid-versus-charge rule, service resolution, then cash-movement extras.
    /// An unresolvable customer ID is not an error; the entry is recorded as
    /// anonymous. Each call creates a new record; the operation is not
    /// idempotent and persistence failures surface as [`LedgerError::Io`].
    pub fn record_transaction(
        &self,
        command: RecordTransactionCommand,
    ) -> Result<Transaction, LedgerError> {
        self.validate_fields(&command)?;

        if command.amount_paid > command.total_charge {
            return Err(LedgerError::validation(
                "amount paid cannot exceed total charge",
            ));
        }

        let service = self
            .catalog_service
            .get_service(command.service_code.trim())?
            .filter(|s| s.active)
            .ok_or_else(|| LedgerError::not_found("invalid service"))?;

        let customer = match command.customer_id.as_deref() {
            Some(customer_id) => {
                let resolved = self.customer_service.get_customer(customer_id)?;
                if resolved.is_none() {
                    warn!(
                        "Customer {} not found, recording transaction as anonymous",
                        customer_id
                    );
                }
                resolved
            }
            None => None,
        };

        let transaction = match service.cash_direction() {
            Some(direction) => {
                self.build_cash_movement(&command, &service, direction, customer)?
            }
            None => self.build_regular(&command, &service, customer),
        };

        self.transaction_repository.store_transaction(&transaction)?;

        info!(
            "Recorded transaction {} for {} ({}, total {})",
            transaction.id,
            transaction.service_code,
            transaction.status.as_str(),
            transaction.total_charge
        );

        Ok(transaction)
    }

    /// Settle an outstanding transaction: the single permitted Pending → Paid
    /// transition. The full potential profit replaces the proportional profit
    /// recognized at creation. Settling an already-Paid record is a no-op that
    /// returns the unchanged record, which also makes concurrent settlements
    /// of the same ID safe at the status level.
    pub fn settle_transaction(&self, transaction_id: &str) -> Result<Transaction, LedgerError> {
        let mut transaction = self
            .transaction_repository
            .get_transaction(transaction_id)?
            .ok_or_else(|| {
                LedgerError::not_found(format!("Transaction not found: {}", transaction_id))
            })?;

        if transaction.status == TransactionStatus::Paid {
            info!("Transaction {} is already settled", transaction_id);
            return Ok(transaction);
        }

        transaction.amount_paid = transaction.total_charge;
        transaction.pending_amount = Decimal::ZERO;
        transaction.status = TransactionStatus::Paid;
        transaction.profit = transaction.potential_profit();

        self.transaction_repository.update_transaction(&transaction)?;

        info!(
            "Settled transaction {}, profit now {}",
            transaction.id, transaction.profit
        );

        Ok(transaction)
    }

    /// List transactions, optionally filtered to one status, most recent
    /// first. Timestamp ties are broken by ID so repeated queries over the
    /// same records always return the same order.
    pub fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut transactions = self.transaction_repository.list_transactions()?;
        if let Some(status) = query.status {
            transactions.retain(|t| t.status == status);
        }
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(transactions)
    }

    fn validate_fields(&self, command: &RecordTransactionCommand) -> Result<(), LedgerError> {
        if command.service_code.trim().is_empty() {
            return Err(LedgerError::validation("Service is required."));
        }
        if command.qty < 1 {
            return Err(LedgerError::validation("Quantity must be at least 1."));
        }
        for (field, value) in [
            ("Price", command.price),
            ("Cost", command.cost),
            ("Partner fee", command.partner_fee),
            ("Total charge", command.total_charge),
            ("Amount paid", command.amount_paid),
        ] {
            if value < Decimal::ZERO {
                return Err(LedgerError::validation(format!(
                    "{} cannot be negative.",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Normalize a cash deposit/withdrawal entry. The price is the flat
    /// facilitation fee: fully paid at creation, no unit cost, no partner fee,
    /// profit recognized in full.
    fn build_cash_movement(
        &self,
        command: &RecordTransactionCommand,
        service: &Service,
        direction: CashDirection,
        customer: Option<Customer>,
    ) -> Result<Transaction, LedgerError> {
        let cash_amount = command
            .cash_amount
            .filter(|amount| *amount > Decimal::ZERO)
            .ok_or_else(|| LedgerError::validation("Cash amount must be positive."))?;
        let bank_name = command
            .cash_bank_name
            .as_deref()
            .map(str::trim)
            .filter(|name| name.len() >= 2)
            .ok_or_else(|| {
                LedgerError::validation("Bank name must be at least 2 characters.")
            })?;

        let fee = command.price;
        let now = Utc::now().fixed_offset();

        Ok(Transaction {
            id: Transaction::generate_id(now.timestamp_millis() as u64),
            service_code: service.code.clone(),
            service_name: service.name.clone(),
            customer_id: customer.as_ref().map(|c| c.id.clone()),
            customer_name: Some(
                customer
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| WALK_IN_CUSTOMER.to_string()),
            ),
            customer_mobile: customer.as_ref().map(|c| c.mobile_number.clone()),
            qty: 1,
            price: fee,
            cost: Decimal::ZERO,
            partner_fee: Decimal::ZERO,
            total_charge: fee,
            amount_paid: fee,
            pending_amount: Decimal::ZERO,
            status: TransactionStatus::Paid,
            profit: fee,
            payment_mode: command.payment_mode,
            notes: command.notes.clone(),
            cash_movement: Some(CashMovement {
                amount: cash_amount,
                direction,
                bank_name: bank_name.to_string(),
            }),
            created_at: now,
        })
    }

    /// Derive a regular service entry: pending amount, status, and profit
    /// proportional to the amount actually paid.
    fn build_regular(
        &self,
        command: &RecordTransactionCommand,
        service: &Service,
        customer: Option<Customer>,
    ) -> Transaction {
        let pending_amount = command.total_charge - command.amount_paid;
        let status = if pending_amount.is_zero() {
            TransactionStatus::Paid
        } else {
            TransactionStatus::Pending
        };

        let potential_profit =
            Decimal::from(command.qty) * (command.price - command.cost - command.partner_fee);
        // The proportional rule only applies when something was charged. A
        // zero-charge entry has nothing outstanding, counts as Paid, and its
        // potential profit is recognized in full at creation even though no
        // payment was taken.
        let profit = if command.total_charge > Decimal::ZERO {
            command.amount_paid / command.total_charge * potential_profit
        } else {
            potential_profit
        };

        let now = Utc::now().fixed_offset();

        Transaction {
            id: Transaction::generate_id(now.timestamp_millis() as u64),
            service_code: service.code.clone(),
            service_name: service.name.clone(),
            customer_id: customer.as_ref().map(|c| c.id.clone()),
            customer_name: customer.as_ref().map(|c| c.name.clone()),
            customer_mobile: customer.as_ref().map(|c| c.mobile_number.clone()),
            qty: command.qty,
            price: command.price,
            cost: command.cost,
            partner_fee: command.partner_fee,
            total_charge: command.total_charge,
            amount_paid: command.amount_paid,
            pending_amount,
            status,
            profit,
            payment_mode: command.payment_mode,
            notes: command.notes.clone(),
            cash_movement: None,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::customers::CreateCustomerCommand;
    use crate::domain::models::PaymentMode;
    use crate::storage::csv::{
        CsvConnection, CustomerRepository, ServiceRepository, TransactionRepository,
    };

    fn create_test_ledger() -> (LedgerService, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let customer_service =
            CustomerService::new(Arc::new(CustomerRepository::new(connection.clone())));
        let catalog_service =
            CatalogService::new(Arc::new(ServiceRepository::new(connection.clone())));
        let ledger = LedgerService::new(
            Arc::new(TransactionRepository::new(connection)),
            catalog_service,
            customer_service,
        );
        (ledger, temp_dir)
    }

    fn aadhaar_print(qty: u32, total: i64, paid: i64) -> RecordTransactionCommand {
        RecordTransactionCommand {
            qty,
            price: Decimal::from(10),
            cost: Decimal::from(2),
            total_charge: Decimal::from(total),
            amount_paid: Decimal::from(paid),
            ..RecordTransactionCommand::for_service("AADHAAR_PRINT", PaymentMode::Cash)
        }
    }

    fn ayushman_partial() -> RecordTransactionCommand {
        RecordTransactionCommand {
            price: Decimal::from(50),
            total_charge: Decimal::from(50),
            amount_paid: Decimal::from(20),
            ..RecordTransactionCommand::for_service("AYUSHMAN_CARD", PaymentMode::Upi)
        }
    }

    fn cash_deposit(amount: i64) -> RecordTransactionCommand {
        RecordTransactionCommand {
            price: Decimal::from(10),
            cash_amount: Some(Decimal::from(amount)),
            cash_bank_name: Some("State Bank of India".to_string()),
            ..RecordTransactionCommand::for_service("CASH_DEPOSIT", PaymentMode::Cash)
        }
    }

    #[test]
    fn test_fully_paid_service_recognizes_full_profit() {
        let (ledger, _temp_dir) = create_test_ledger();
        let tx = ledger.record_transaction(aadhaar_print(2, 20, 20)).unwrap();

        assert_eq!(tx.status, TransactionStatus::Paid);
        assert_eq!(tx.pending_amount, Decimal::ZERO);
        assert_eq!(tx.profit, Decimal::from(16));
    }

    #[test]
    fn test_partial_payment_recognizes_proportional_profit() {
        let (ledger, _temp_dir) = create_test_ledger();
        let tx = ledger.record_transaction(ayushman_partial()).unwrap();

        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.pending_amount, Decimal::from(30));
        // 20/50 of the 50 potential.
        assert_eq!(tx.profit, Decimal::from(20));
        assert_eq!(tx.total_charge - tx.amount_paid, tx.pending_amount);
    }

    #[test]
    fn test_zero_payment_recognizes_zero_profit() {
        let (ledger, _temp_dir) = create_test_ledger();
        let tx = ledger.record_transaction(aadhaar_print(2, 20, 0)).unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.profit, Decimal::ZERO);
    }

    #[test]
    fn test_zero_charge_recognizes_full_potential_profit() {
        let (ledger, _temp_dir) = create_test_ledger();
        // Nothing billed: the record is Paid with no pending balance, and
        // the potential profit is recognized up front.
        let tx = ledger.record_transaction(aadhaar_print(1, 0, 0)).unwrap();
        assert_eq!(tx.status, TransactionStatus::Paid);
        assert_eq!(tx.pending_amount, Decimal::ZERO);
        assert_eq!(tx.profit, Decimal::from(8));
    }

    #[test]
    fn test_overpayment_is_rejected() {
        let (ledger, _temp_dir) = create_test_ledger();
        let err = ledger
            .record_transaction(aadhaar_print(1, 10, 15))
            .unwrap_err();
        match err {
            LedgerError::Validation(msg) => {
                assert_eq!(msg, "amount paid cannot exceed total charge")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_field_validation_first_failure_wins() {
        let (ledger, _temp_dir) = create_test_ledger();
        let command = RecordTransactionCommand {
            qty: 0,
            price: Decimal::from(-5),
            ..RecordTransactionCommand::for_service("KYC", PaymentMode::Cash)
        };
        let err = ledger.record_transaction(command).unwrap_err();
        match err {
            LedgerError::Validation(msg) => assert_eq!(msg, "Quantity must be at least 1."),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_service_is_not_found() {
        let (ledger, _temp_dir) = create_test_ledger();
        let command = RecordTransactionCommand::for_service("NO_SUCH_SERVICE", PaymentMode::Cash);
        assert!(matches!(
            ledger.record_transaction(command).unwrap_err(),
            LedgerError::NotFound(_)
        ));
    }

    #[test]
    fn test_cash_deposit_is_normalized() {
        let (ledger, _temp_dir) = create_test_ledger();
        // Junk qty/cost/fee on the way in; normalization wins.
        let command = RecordTransactionCommand {
            qty: 3,
            cost: Decimal::from(5),
            partner_fee: Decimal::from(2),
            ..cash_deposit(5000)
        };
        let tx = ledger.record_transaction(command).unwrap();

        assert_eq!(tx.qty, 1);
        assert_eq!(tx.cost, Decimal::ZERO);
        assert_eq!(tx.partner_fee, Decimal::ZERO);
        assert_eq!(tx.status, TransactionStatus::Paid);
        assert_eq!(tx.total_charge, Decimal::from(10));
        assert_eq!(tx.amount_paid, Decimal::from(10));
        assert_eq!(tx.profit, Decimal::from(10));

        let cash = tx.cash_movement.expect("cash movement extension");
        assert_eq!(cash.amount, Decimal::from(5000));
        assert_eq!(cash.direction, CashDirection::Deposit);
        assert_eq!(tx.customer_name.as_deref(), Some(WALK_IN_CUSTOMER));
    }

    #[test]
    fn test_cash_withdrawal_direction_comes_from_service() {
        let (ledger, _temp_dir) = create_test_ledger();
        let command = RecordTransactionCommand {
            price: Decimal::from(10),
            cash_amount: Some(Decimal::from(2000)),
            cash_bank_name: Some("HDFC Bank".to_string()),
            ..RecordTransactionCommand::for_service("CASH_WITHDRAWAL", PaymentMode::Cash)
        };
        let tx = ledger.record_transaction(command).unwrap();
        assert_eq!(
            tx.cash_movement.unwrap().direction,
            CashDirection::Withdrawal
        );
    }

    #[test]
    fn test_cash_movement_requires_amount_and_bank() {
        let (ledger, _temp_dir) = create_test_ledger();

        let missing_amount = RecordTransactionCommand {
            cash_amount: None,
            ..cash_deposit(5000)
        };
        assert!(matches!(
            ledger.record_transaction(missing_amount).unwrap_err(),
            LedgerError::Validation(_)
        ));

        let short_bank = RecordTransactionCommand {
            cash_bank_name: Some("S".to_string()),
            ..cash_deposit(5000)
        };
        assert!(matches!(
            ledger.record_transaction(short_bank).unwrap_err(),
            LedgerError::Validation(_)
        ));

        let zero_amount = RecordTransactionCommand {
            cash_amount: Some(Decimal::ZERO),
            ..cash_deposit(5000)
        };
        assert!(matches!(
            ledger.record_transaction(zero_amount).unwrap_err(),
            LedgerError::Validation(_)
        ));
    }

    #[test]
    fn test_known_customer_is_denormalized() {
        let (ledger, _temp_dir) = create_test_ledger();
        let customer = ledger
            .customer_service
            .create_customer(CreateCustomerCommand {
                name: "Amit Kumar".to_string(),
                mobile_number: "9876543210".to_string(),
                address: "123, Main St, Delhi".to_string(),
                bank_name: None,
                account_number: None,
                ifsc_code: None,
            })
            .unwrap()
            .customer;

        let command = RecordTransactionCommand {
            customer_id: Some(customer.id.clone()),
            ..aadhaar_print(1, 10, 10)
        };
        let tx = ledger.record_transaction(command).unwrap();
        assert_eq!(tx.customer_id.as_deref(), Some(customer.id.as_str()));
        assert_eq!(tx.customer_name.as_deref(), Some("Amit Kumar"));
        assert_eq!(tx.customer_mobile.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_unknown_customer_is_recorded_as_anonymous() {
        let (ledger, _temp_dir) = create_test_ledger();
        let command = RecordTransactionCommand {
            customer_id: Some("cust-does-not-exist".to_string()),
            ..aadhaar_print(1, 10, 10)
        };
        let tx = ledger.record_transaction(command).unwrap();
        assert_eq!(tx.customer_id, None);
        assert_eq!(tx.customer_name, None);
        assert_eq!(tx.customer_mobile, None);
    }

    #[test]
    fn test_settlement_replaces_proportional_profit() {
        let (ledger, _temp_dir) = create_test_ledger();
        let tx = ledger.record_transaction(ayushman_partial()).unwrap();
        assert_eq!(tx.profit, Decimal::from(20));

        let settled = ledger.settle_transaction(&tx.id).unwrap();
        assert_eq!(settled.amount_paid, Decimal::from(50));
        assert_eq!(settled.pending_amount, Decimal::ZERO);
        assert_eq!(settled.status, TransactionStatus::Paid);
        // Replaced with the full potential profit, not topped up.
        assert_eq!(settled.profit, Decimal::from(50));

        // The stored record reflects the settlement.
        let listed = ledger
            .list_transactions(TransactionListQuery::default())
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], settled);
    }

    #[test]
    fn test_settling_a_paid_transaction_is_a_no_op() {
        let (ledger, _temp_dir) = create_test_ledger();
        let tx = ledger.record_transaction(aadhaar_print(2, 20, 20)).unwrap();

        let settled = ledger.settle_transaction(&tx.id).unwrap();
        assert_eq!(settled, tx);

        let again = ledger.settle_transaction(&tx.id).unwrap();
        assert_eq!(again, tx);
    }

    #[test]
    fn test_settling_unknown_id_is_not_found() {
        let (ledger, _temp_dir) = create_test_ledger();
        assert!(matches!(
            ledger.settle_transaction("txn-missing").unwrap_err(),
            LedgerError::NotFound(_)
        ));
    }

    #[test]
    fn test_list_filter_returns_only_requested_status() {
        let (ledger, _temp_dir) = create_test_ledger();
        ledger.record_transaction(aadhaar_print(2, 20, 20)).unwrap();
        ledger.record_transaction(ayushman_partial()).unwrap();
        ledger.record_transaction(cash_deposit(1000)).unwrap();

        let pending = ledger
            .list_transactions(TransactionListQuery {
                status: Some(TransactionStatus::Pending),
            })
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert!(pending
            .iter()
            .all(|t| t.status == TransactionStatus::Pending));

        let all = ledger
            .list_transactions(TransactionListQuery::default())
            .unwrap();
        assert_eq!(all.len(), 3);
        // Newest first, stable across repeated calls.
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        let again = ledger
            .list_transactions(TransactionListQuery::default())
            .unwrap();
        assert_eq!(all, again);
    }

    #[test]
    fn test_inactive_service_is_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let service_repository = ServiceRepository::new(connection.clone());

        // A non-empty store suppresses seeding, so only this inactive entry exists.
        let retired = Service {
            code: "OLD_SERVICE".to_string(),
            name: "Old Service".to_string(),
            category: crate::domain::models::ServiceCategory::Other,
            kind: crate::domain::models::ServiceKind::Regular,
            default_price: Decimal::from(10),
            default_cost: Decimal::ZERO,
            default_partner_fee: Decimal::ZERO,
            active: false,
            created_at: Utc::now().fixed_offset(),
        };
        crate::storage::traits::ServiceStorage::store_services(&service_repository, &[retired])
            .unwrap();

        let customer_service =
            CustomerService::new(Arc::new(CustomerRepository::new(connection.clone())));
        let catalog_service = CatalogService::new(Arc::new(service_repository));
        let ledger = LedgerService::new(
            Arc::new(TransactionRepository::new(connection)),
            catalog_service,
            customer_service,
        );

        let command = RecordTransactionCommand::for_service("OLD_SERVICE", PaymentMode::Cash);
        assert!(matches!(
            ledger.record_transaction(command).unwrap_err(),
            LedgerError::NotFound(_)
        ));
    }
}
