//! Orders

pub mod models;
pub mod service;

pub use models::{CreatedOrder, OrderSummary};
pub use service::*;
