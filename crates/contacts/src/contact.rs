use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexcrm_core::{ContactId, DomainError, DomainResult, OrganizationId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub organization_id: OrganizationId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a contact.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
}

impl Contact {
    pub fn new(organization_id: OrganizationId, new: NewContact) -> DomainResult<Self> {
        let first_name = new.first_name.trim().to_string();
        let last_name = new.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(DomainError::validation(
                "contact first and last name cannot be empty",
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: ContactId::new(),
            organization_id,
            first_name,
            last_name,
            email: new.email,
            phone: new.phone,
            position: new.position,
            company: new.company,
            address: new.address,
            city: new.city,
            country: new.country,
            postal_code: new.postal_code,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, update: ContactUpdate) -> DomainResult<()> {
        if let Some(first_name) = update.first_name {
            let first_name = first_name.trim().to_string();
            if first_name.is_empty() {
                return Err(DomainError::validation("contact first name cannot be empty"));
            }
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            let last_name = last_name.trim().to_string();
            if last_name.is_empty() {
                return Err(DomainError::validation("contact last name cannot be empty"));
            }
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(position) = update.position {
            self.position = Some(position);
        }
        if let Some(company) = update.company {
            self.company = Some(company);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(city) = update.city {
            self.city = Some(city);
        }
        if let Some(country) = update.country {
            self.country = Some(country);
        }
        if let Some(postal_code) = update.postal_code {
            self.postal_code = Some(postal_code);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Case-insensitive match against name, email, phone and company, used
    /// by list search.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        let hit = |field: Option<&str>| field.is_some_and(|v| v.to_lowercase().contains(&q));
        self.first_name.to_lowercase().contains(&q)
            || self.last_name.to_lowercase().contains(&q)
            || hit(self.email.as_deref())
            || hit(self.phone.as_deref())
            || hit(self.company.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewContact {
        NewContact {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: Some("jane@corp.test".into()),
            phone: None,
            position: None,
            company: Some("Corp".into()),
            address: None,
            city: None,
            country: None,
            postal_code: None,
            notes: None,
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut new = sample();
        new.first_name = "  ".into();
        assert!(Contact::new(OrganizationId::new(), new).is_err());
    }

    #[test]
    fn update_leaves_absent_fields_untouched() {
        let mut contact = Contact::new(OrganizationId::new(), sample()).unwrap();
        contact
            .apply(ContactUpdate {
                phone: Some("+1 555 0100".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(contact.first_name, "Jane");
        assert_eq!(contact.phone.as_deref(), Some("+1 555 0100"));
    }

    #[test]
    fn search_matches_company_case_insensitively() {
        let contact = Contact::new(OrganizationId::new(), sample()).unwrap();
        assert!(contact.matches("CORP"));
        assert!(contact.matches("jane"));
        assert!(!contact.matches("nobody"));
    }
}
