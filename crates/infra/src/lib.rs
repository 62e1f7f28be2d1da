//! Storage and application services.
//!
//! Stores are in-memory and tenant-isolated; services carry the business
//! rules that span more than one record.

pub mod service;
pub mod store;
