//! crates/result_admin_core/src/auth.rs
//!
//! The session context injected into every screen: the bearer credential and
//! the signed-in administrator's identity, with an explicit lifecycle instead
//! of process-wide globals.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{SessionSnapshot, UserIdentity};
use crate::ports::{extract_item, ApiRequest, PortError, PortResult, RemoteDataClient, SessionStore};

pub struct AuthContext {
    client: Arc<dyn RemoteDataClient>,
    store: Arc<dyn SessionStore>,
    session: Option<SessionSnapshot>,
}

impl AuthContext {
    pub fn new(client: Arc<dyn RemoteDataClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            session: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Reads the persisted credential and validates it against the backend.
    ///
    /// A rejected credential is cleared from the store. A transport failure
    /// leaves the store untouched and is returned so the caller can retry.
    pub async fn init(&mut self) -> PortResult<bool> {
        self.session = None;
        let Some(snapshot) = self.store.load().await? else {
            self.client.set_bearer(None);
            info!("No persisted session found");
            return Ok(false);
        };

        self.client.set_bearer(Some(snapshot.token.clone()));
        match self.client.send(ApiRequest::get("/auth/me")).await {
            Ok(body) => {
                let refreshed = match extract_item::<UserIdentity>(&body, "user") {
                    Ok(user) if user != snapshot.user => {
                        let refreshed = SessionSnapshot {
                            token: snapshot.token,
                            user,
                        };
                        self.store.save(&refreshed).await?;
                        refreshed
                    }
                    _ => snapshot,
                };
                info!("Restored session for {}", refreshed.user.email);
                self.session = Some(refreshed);
                Ok(true)
            }
            Err(e @ PortError::Transport(_)) => {
                warn!("Could not validate persisted session: {}", e);
                self.client.set_bearer(None);
                Err(e)
            }
            Err(e) => {
                warn!("Persisted session rejected, clearing it: {}", e);
                self.client.set_bearer(None);
                self.store.clear().await?;
                Ok(false)
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> PortResult<&UserIdentity> {
        let body = self
            .client
            .send(ApiRequest::post(
                "/auth/login",
                json!({ "email": email, "password": password }),
            ))
            .await?;

        let token: String = extract_item(&body, "token")?;
        let user: UserIdentity = extract_item(&body, "user")?;
        let snapshot = SessionSnapshot { token, user };

        self.store.save(&snapshot).await?;
        self.client.set_bearer(Some(snapshot.token.clone()));
        info!("Logged in as {}", snapshot.user.email);
        Ok(&self.session.insert(snapshot).user)
    }

    /// Ends the session locally; the backend logout call is best-effort.
    pub async fn teardown(&mut self) -> PortResult<()> {
        if self.session.is_some() {
            if let Err(e) = self.client.send(ApiRequest::post("/auth/logout", json!({}))).await {
                warn!("Backend logout failed, clearing local session anyway: {}", e);
            }
        }
        self.client.set_bearer(None);
        self.session = None;
        self.store.clear().await?;
        info!("Session cleared");
        Ok(())
    }
}
