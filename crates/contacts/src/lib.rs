//! Contact records scoped to an organization.

mod contact;

pub use contact::{Contact, ContactUpdate, NewContact};
