use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexcrm_core::OrganizationId;

/// Root tenant boundary. Every business entity except [`crate::User`] belongs
/// to exactly one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: OrganizationId::new(),
            name: name.into(),
            description: None,
            website: None,
            phone: None,
            email: None,
            address: None,
            city: None,
            country: None,
            postal_code: None,
            created_at: now,
            updated_at: now,
        }
    }
}
