//! # CSV Storage Module
//!
//! File-based storage backend keeping one CSV file per collection under a
//! base directory. Records are addressable by their opaque string id and
//! orderable by their RFC 3339 creation timestamp, which is all the domain
//! layer requires of a backend.
//!
//! ## File Format
//!
//! Each collection file carries a header row; optional fields are stored as
//! empty strings, monetary values as decimal strings, timestamps as RFC 3339.
//! Writes are read-all / truncate-and-rewrite, flushed before returning.

pub mod connection;
pub mod customer_repository;
pub mod service_repository;
pub mod transaction_repository;

pub use connection::CsvConnection;
pub use customer_repository::CustomerRepository;
pub use service_repository::ServiceRepository;
pub use transaction_repository::TransactionRepository;
