//! Role-based access control: a fixed role→permission table.
//!
//! The table below is the single source of truth. Roles do not inherit from
//! each other; a (role, permission) pair not present in the table is denied.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nexcrm_core::DomainError;

/// An atomic capability a role may hold within an organization.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Read,
    Create,
    Update,
    Delete,
    ManageMembers,
    ManageOrganization,
    ViewReports,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::Read,
        Permission::Create,
        Permission::Update,
        Permission::Delete,
        Permission::ManageMembers,
        Permission::ManageOrganization,
        Permission::ViewReports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Create => "create",
            Permission::Update => "update",
            Permission::Delete => "delete",
            Permission::ManageMembers => "manage_members",
            Permission::ManageOrganization => "manage_organization",
            Permission::ViewReports => "view_reports",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named bundle of permissions granted by an organization membership.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Manager,
    Sales,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Owner,
        Role::Admin,
        Role::Manager,
        Role::Sales,
        Role::Viewer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Sales => "sales",
            Role::Viewer => "viewer",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "sales" => Ok(Role::Sales),
            "viewer" => Ok(Role::Viewer),
            other => Err(DomainError::validation(format!("unknown role '{other}'"))),
        }
    }
}

/// The permission set granted by each role.
///
/// Deny-by-default: anything not listed here is not granted.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Owner => &[
            Permission::Read,
            Permission::Create,
            Permission::Update,
            Permission::Delete,
            Permission::ManageMembers,
            Permission::ManageOrganization,
            Permission::ViewReports,
        ],
        Role::Admin => &[
            Permission::Read,
            Permission::Create,
            Permission::Update,
            Permission::Delete,
            Permission::ManageMembers,
            Permission::ViewReports,
        ],
        Role::Manager => &[
            Permission::Read,
            Permission::Create,
            Permission::Update,
            Permission::ViewReports,
        ],
        Role::Sales => &[Permission::Read, Permission::Create, Permission::Update],
        Role::Viewer => &[Permission::Read],
    }
}

/// Pure policy lookup. No side effects, never fails.
pub fn has_permission(role: Role, permission: Permission) -> bool {
    role_permissions(role).contains(&permission)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),
}

/// Authorize a role for a required permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(role: Role, required: Permission) -> Result<(), AuthzError> {
    if has_permission(role, required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(role: Role) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|p| has_permission(role, *p))
            .collect()
    }

    #[test]
    fn owner_has_every_permission() {
        assert_eq!(granted(Role::Owner), Permission::ALL.to_vec());
    }

    #[test]
    fn admin_has_everything_but_manage_organization() {
        let perms = granted(Role::Admin);
        assert!(!perms.contains(&Permission::ManageOrganization));
        assert_eq!(perms.len(), 6);
    }

    #[test]
    fn manager_matches_table() {
        assert_eq!(
            granted(Role::Manager),
            vec![
                Permission::Read,
                Permission::Create,
                Permission::Update,
                Permission::ViewReports,
            ]
        );
    }

    #[test]
    fn sales_matches_table() {
        assert_eq!(
            granted(Role::Sales),
            vec![Permission::Read, Permission::Create, Permission::Update]
        );
    }

    #[test]
    fn viewer_is_read_only() {
        assert_eq!(granted(Role::Viewer), vec![Permission::Read]);
    }

    #[test]
    fn authorize_denies_with_the_missing_permission() {
        let err = authorize(Role::Viewer, Permission::Delete).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden(Permission::Delete));
    }

    #[test]
    fn unknown_role_strings_are_rejected_at_parse_time() {
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!("sales".parse::<Role>().unwrap(), Role::Sales);
    }
}
