//! Authorization guard applied at the handler boundary.
//!
//! Role resolution happens in the membership middleware; handlers only state
//! the permission their operation needs.

use axum::http::StatusCode;

use nexcrm_auth::{authorize, Permission};

use crate::app::errors::json_error;
use crate::context::MemberContext;

/// Check that the caller's role in the current organization carries
/// `permission`. Intended to be called before any store access.
pub fn require(member: &MemberContext, permission: Permission) -> Result<(), axum::response::Response> {
    authorize(member.role(), permission).map_err(|_| {
        json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("missing permission: {}", permission.as_str()),
        )
    })
}
