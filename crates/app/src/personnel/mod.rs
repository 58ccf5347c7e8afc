//! Personnel

pub mod models;
pub mod service;

pub use models::{NewPersonnel, Personnel, PersonnelUpdate};
pub use service::*;
