//! Domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod page;

pub use error::{DomainError, DomainResult};
pub use id::{ActivityId, ContactId, DealId, MembershipId, OrganizationId, TaskId, UserId};
pub use page::Page;
