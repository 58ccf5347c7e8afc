//! Bağlan
//!
//! Order pricing and wizard engine for the Bağlan Oto Bakım detailing shop:
//! a read-only service catalog, the in-progress order draft, line item
//! expansion and totals, step checks and the submission request.

pub mod catalog;
pub mod discounts;
pub mod draft;
pub mod gate;
pub mod order;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod receipt;
pub mod wizard;
