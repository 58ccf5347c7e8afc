//! Bağlan backend client, order wizard session and operator tooling.

pub mod auth;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod envelope;
pub mod expenses;
pub mod observability;
pub mod orders;
pub mod personnel;
pub mod session;
