//! Income and expense ledger

pub mod models;
pub mod service;

pub use models::{NewTransaction, Transaction, TransactionKind};
pub use service::*;
