//! Entity records and wire envelopes for the admin API

use serde::{Deserialize, Serialize};

/// One backend-managed row shown in the table.
///
/// Identity is `id` (the service's `public_secret`); a record is never
/// mutated in place, only replaced by a re-fetch after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityRecord {
    #[serde(rename = "public_secret")]
    pub id: String,

    #[serde(rename = "module_code")]
    pub code: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "is_active")]
    pub active: bool,
}

impl EntityRecord {
    /// Case-insensitive substring match over code, name, and description.
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.code.to_lowercase().contains(&query)
            || self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// Paginated list envelope returned by the service
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub data: Vec<EntityRecord>,

    #[serde(default)]
    pub count: u64,
}

/// Acknowledgement envelope for create/update/delete
#[derive(Debug, Clone, Deserialize)]
pub struct AckEnvelope {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: String,
}

/// In-progress, unsaved copy of a record being edited in the form.
///
/// Seeded on modal open and discarded on close or successful submit; it
/// never aliases the controller's row list. The serialized shape is the
/// create/update request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityDraft {
    #[serde(skip)]
    pub id: Option<String>,

    #[serde(rename = "module_code")]
    pub code: String,

    pub name: String,

    pub description: String,

    #[serde(rename = "is_active")]
    pub active: bool,
}

impl EntityDraft {
    /// Blank template for create mode; new records default to active
    pub fn blank() -> Self {
        Self {
            active: true,
            ..Self::default()
        }
    }

    /// Copy-on-open seed for edit mode
    pub fn from_record(record: &EntityRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            code: record.code.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            active: record.active,
        }
    }
}
