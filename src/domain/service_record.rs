use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type ServiceId = Uuid;

/// One service performed for a client, as stored in the log.
/// Records are never edited in place; a wrong entry is deleted and re-recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceId,
    pub client_name: String,
    pub client_phone: Option<String>,
    /// Free text such as "Fade" or "Classic cut"
    pub service_type: String,
    /// Price charged, in cents (never negative)
    pub price_cents: Cents,
    pub notes: Option<String>,
    /// When the service happened
    pub created_at: DateTime<Utc>,
}

impl ServiceRecord {
    pub fn new(
        client_name: impl Into<String>,
        service_type: impl Into<String>,
        price_cents: Cents,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_name: client_name.into(),
            client_phone: None,
            service_type: service_type.into(),
            price_cents,
            notes: None,
            created_at,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.client_phone = Some(phone.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Case-insensitive search over client name, service type and phone.
    /// An empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        self.client_name.to_lowercase().contains(&term)
            || self.service_type.to_lowercase().contains(&term)
            || self
                .client_phone
                .as_deref()
                .is_some_and(|phone| phone.to_lowercase().contains(&term))
    }
}
