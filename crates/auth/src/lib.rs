//! Pure authentication/authorization building blocks.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod password;
pub mod rbac;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use rbac::{authorize, has_permission, role_permissions, AuthzError, Permission, Role};
pub use token::{Claims, TokenError, TokenKind, TokenPair, TokenService};
