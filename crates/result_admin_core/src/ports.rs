//! crates/result_admin_core/src/ports.rs
//!
//! Defines the service contracts (traits) the controllers depend on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! workflow logic independent of the HTTP stack and of where the session
//! credential is persisted.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::SessionSnapshot;

/// Banner text used when the backend gave no human-readable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },
    /// The credential was missing, expired or rejected.
    #[error("Unauthorized")]
    Unauthorized,
    /// The request never produced a response (connection, DNS, timeout).
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The response did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
    /// Local persistence failed.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl PortError {
    /// The text shown in the dismissable error banner.
    pub fn user_message(&self) -> String {
        match self {
            PortError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            PortError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Request Description
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One REST call, independent of the transport that will carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Appends query parameters; callers pass only constrained fields.
    pub fn with_query(mut self, params: Vec<(String, String)>) -> Self {
        self.query.extend(params);
        self
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait RemoteDataClient: Send + Sync {
    /// Issues one request and returns the parsed JSON body of a successful response.
    async fn send(&self, request: ApiRequest) -> PortResult<Value>;

    /// Attaches (or with `None`, detaches) the bearer credential sent on every request.
    fn set_bearer(&self, token: Option<String>);
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the persisted snapshot, `None` when nothing has been stored.
    async fn load(&self) -> PortResult<Option<SessionSnapshot>>;

    async fn save(&self, snapshot: &SessionSnapshot) -> PortResult<()>;

    async fn clear(&self) -> PortResult<()>;
}

//=========================================================================================
// Response Helpers
//=========================================================================================

/// Pulls the array stored under `key` out of a collection response.
pub fn extract_collection<T: DeserializeOwned>(body: &Value, key: &str) -> PortResult<Vec<T>> {
    let items = body
        .get(key)
        .ok_or_else(|| PortError::Decode(format!("response has no `{}` collection", key)))?;
    serde_json::from_value(items.clone())
        .map_err(|e| PortError::Decode(format!("`{}` collection: {}", key, e)))
}

/// Pulls a single record stored under `key`.
pub fn extract_item<T: DeserializeOwned>(body: &Value, key: &str) -> PortResult<T> {
    let item = body
        .get(key)
        .ok_or_else(|| PortError::Decode(format!("response has no `{}` field", key)))?;
    serde_json::from_value(item.clone())
        .map_err(|e| PortError::Decode(format!("`{}` field: {}", key, e)))
}
