//! crates/result_admin_core/src/screen.rs
//!
//! The seam between the generic workflow and one managed entity type.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::NOT_SPECIFIED;
use crate::filter::{FilterField, Filterable};
use crate::reference::ReferenceKind;

/// A backend record with an immutable, backend-assigned identifier.
pub trait Record: DeserializeOwned + Filterable + Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// One label/value line of a read-only detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

impl DetailRow {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Binds the workflow to an entity type, its endpoints and its filter bar.
pub trait Screen: Send + Sync + 'static {
    type Record: Record;
    type Payload: Serialize + DeserializeOwned + Send + Sync;

    const TITLE: &'static str;
    const PATH: &'static str;
    /// Key holding the collection in list responses.
    const COLLECTION_KEY: &'static str;
    /// Key holding the record in create/update responses.
    const ITEM_KEY: &'static str;
    /// Create-response field carrying a one-time initial password, for
    /// entities that own a login account.
    const CREDENTIAL_KEY: Option<&'static str> = None;
    const FILTERS: &'static [FilterField];
    const REFERENCES: &'static [ReferenceKind];
    const HEADERS: &'static [&'static str];

    fn cells(record: &Self::Record) -> Vec<String>;

    fn detail(record: &Self::Record) -> Vec<DetailRow>;
}

pub fn format_timestamp(at: Option<&DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}
