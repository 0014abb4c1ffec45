pub mod customer;
pub mod service;
pub mod transaction;

pub use customer::Customer;
pub use service::{CashDirection, Service, ServiceCategory, ServiceKind};
pub use transaction::{CashMovement, PaymentMode, Transaction, TransactionStatus};
