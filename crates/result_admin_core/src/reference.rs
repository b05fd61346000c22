//! crates/result_admin_core/src/reference.rs
//!
//! Shared read-through cache of the reference collections (departments,
//! sessions, courses, ...) that filter bars and edit forms offer as options.
//! One cache is injected into every workflow instead of threading the
//! collections through each screen by hand.

use futures::future::try_join_all;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::ports::{ApiRequest, PortError, PortResult, RemoteDataClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    Departments,
    Sessions,
    Courses,
    Semesters,
    Committees,
    Teachers,
    ExternalTeachers,
    Students,
}

impl ReferenceKind {
    pub fn path(self) -> &'static str {
        match self {
            ReferenceKind::Departments => "/departments",
            ReferenceKind::Sessions => "/sessions",
            ReferenceKind::Courses => "/courses",
            ReferenceKind::Semesters => "/semesters",
            ReferenceKind::Committees => "/committees",
            ReferenceKind::Teachers => "/teachers",
            ReferenceKind::ExternalTeachers => "/external-teachers",
            ReferenceKind::Students => "/students",
        }
    }

    pub fn collection_key(self) -> &'static str {
        match self {
            ReferenceKind::Departments => "departments",
            ReferenceKind::Sessions => "sessions",
            ReferenceKind::Courses => "courses",
            ReferenceKind::Semesters => "semesters",
            ReferenceKind::Committees => "committees",
            ReferenceKind::Teachers => "teachers",
            ReferenceKind::ExternalTeachers => "externalTeachers",
            ReferenceKind::Students => "students",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_key())
    }
}

/// One selectable option: the backend id and the text shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    pub id: String,
    pub label: String,
}

impl ReferenceItem {
    fn from_value(kind: ReferenceKind, value: &Value) -> Option<Self> {
        let text = |key: &str| value.get(key).and_then(Value::as_str).unwrap_or("").trim();
        let id = text("_id");
        if id.is_empty() {
            return None;
        }
        let label = match kind {
            ReferenceKind::Courses => match (text("code"), text("title")) {
                ("", title) => title.to_string(),
                (code, "") => code.to_string(),
                (code, title) => format!("{} - {}", code, title),
            },
            ReferenceKind::Students => match text("registrationNumber") {
                "" => text("name").to_string(),
                reg => format!("{} ({})", text("name"), reg),
            },
            _ => text("name").to_string(),
        };
        Some(Self {
            id: id.to_string(),
            label,
        })
    }
}

/// Reference options captured by one workflow at its last load.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    collections: BTreeMap<ReferenceKind, Arc<Vec<ReferenceItem>>>,
}

impl ReferenceSnapshot {
    pub fn options(&self, kind: ReferenceKind) -> &[ReferenceItem] {
        self.collections
            .get(&kind)
            .map(|items| items.as_slice())
            .unwrap_or(&[])
    }

    pub fn label(&self, kind: ReferenceKind, id: &str) -> Option<&str> {
        self.options(kind)
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.label.as_str())
    }
}

#[derive(Clone, Default)]
pub struct ReferenceCache {
    entries: Arc<RwLock<HashMap<ReferenceKind, Arc<Vec<ReferenceItem>>>>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached collection, requesting it on a miss.
    pub async fn get_or_fetch(
        &self,
        client: &dyn RemoteDataClient,
        kind: ReferenceKind,
    ) -> PortResult<Arc<Vec<ReferenceItem>>> {
        if let Some(items) = self.entries.read().await.get(&kind) {
            debug!("Reference cache hit for {}", kind);
            return Ok(items.clone());
        }

        let body = client.send(ApiRequest::get(kind.path())).await?;
        let raw = body
            .get(kind.collection_key())
            .and_then(Value::as_array)
            .ok_or_else(|| {
                PortError::Decode(format!("response has no `{}` collection", kind.collection_key()))
            })?;
        let items: Arc<Vec<ReferenceItem>> = Arc::new(
            raw.iter()
                .filter_map(|v| ReferenceItem::from_value(kind, v))
                .collect(),
        );
        info!("Loaded {} {} into the reference cache", items.len(), kind);

        self.entries.write().await.insert(kind, items.clone());
        Ok(items)
    }

    /// Loads several collections concurrently; the first failure aborts the join.
    pub async fn snapshot(
        &self,
        client: &dyn RemoteDataClient,
        kinds: &[ReferenceKind],
    ) -> PortResult<ReferenceSnapshot> {
        let loaded = try_join_all(kinds.iter().map(|kind| async move {
            self.get_or_fetch(client, *kind).await.map(|items| (*kind, items))
        }))
        .await?;
        Ok(ReferenceSnapshot {
            collections: loaded.into_iter().collect(),
        })
    }

    pub async fn invalidate(&self, kinds: &[ReferenceKind]) {
        let mut entries = self.entries.write().await;
        for kind in kinds {
            entries.remove(kind);
        }
    }

    pub async fn contains(&self, kind: ReferenceKind) -> bool {
        self.entries.read().await.contains_key(&kind)
    }
}
