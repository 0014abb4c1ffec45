//! Domain-level command and query types.
//!
//! These structs are the typed input/output of the services and are what a
//! presentation layer maps its form payloads into. Field-level validation
//! happens in the services, not here.

pub mod customers {
    use crate::domain::models::Customer;

    /// Input for registering a new customer.
    #[derive(Debug, Clone)]
    pub struct CreateCustomerCommand {
        pub name: String,
        pub mobile_number: String,
        pub address: String,
        pub bank_name: Option<String>,
        pub account_number: Option<String>,
        pub ifsc_code: Option<String>,
    }

    /// Result of registering a customer.
    #[derive(Debug, Clone)]
    pub struct CreateCustomerResult {
        pub customer: Customer,
    }
}

pub mod transactions {
    use rust_decimal::Decimal;

    use crate::domain::models::{PaymentMode, TransactionStatus};

    /// Input for recording a transaction.
    ///
    /// `cash_amount` and `cash_bank_name` are only meaningful (and required)
    /// when the resolved service is a cash-movement service.
    #[derive(Debug, Clone)]
    pub struct RecordTransactionCommand {
        pub service_code: String,
        pub customer_id: Option<String>,
        pub qty: u32,
        pub price: Decimal,
        pub cost: Decimal,
        pub partner_fee: Decimal,
        pub total_charge: Decimal,
        pub amount_paid: Decimal,
        pub payment_mode: PaymentMode,
        pub notes: Option<String>,
        pub cash_amount: Option<Decimal>,
        pub cash_bank_name: Option<String>,
    }

    impl RecordTransactionCommand {
        /// A command with the field defaults a blank form submits: one unit,
        /// all amounts zero, no customer.
        pub fn for_service(service_code: impl Into<String>, payment_mode: PaymentMode) -> Self {
            Self {
                service_code: service_code.into(),
                customer_id: None,
                qty: 1,
                price: Decimal::ZERO,
                cost: Decimal::ZERO,
                partner_fee: Decimal::ZERO,
                total_charge: Decimal::ZERO,
                amount_paid: Decimal::ZERO,
                payment_mode,
                notes: None,
                cash_amount: None,
                cash_bank_name: None,
            }
        }
    }

    /// Query parameters for listing transactions.
    #[derive(Debug, Clone, Default)]
    pub struct TransactionListQuery {
        pub status: Option<TransactionStatus>,
    }
}

pub mod stats {
    use rust_decimal::Decimal;

    /// Dashboard figures, recomputed from the ledger on every call.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DashboardStats {
        pub daily_profit: Decimal,
        pub monthly_profit: Decimal,
        pub total_pending_amount: Decimal,
        pub total_customers: usize,
        pub services_today: usize,
        pub daily_deposit: Decimal,
        pub daily_withdrawal: Decimal,
        pub daily_net_cash: Decimal,
    }
}
