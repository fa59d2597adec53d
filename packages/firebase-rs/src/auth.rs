//! Anonymous authentication against the Identity Toolkit API.
//!
//! Storage writes require a signed-in user even under open security rules,
//! so the storage client asks this module for a session right before any
//! upload or delete.

use std::sync::RwLock;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{FirebaseError, Result};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// One signed-in (anonymous) user.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "idToken")]
    pub id_token: String,
    #[serde(rename = "localId")]
    pub local_id: String,
}

/// Client for anonymous sign-in. The session is cached for the lifetime of
/// the client, mirroring the persisted auth state of the web app.
pub struct AuthClient {
    client: reqwest::Client,
    api_key: String,
    session: RwLock<Option<Session>>,
}

impl AuthClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            session: RwLock::new(None),
        }
    }

    /// The cached session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.session.read().expect("session lock poisoned").clone()
    }

    /// Drop the cached session.
    pub fn sign_out(&self) {
        self.session.write().expect("session lock poisoned").take();
    }

    /// Return the cached session, signing in anonymously first if there is
    /// none. A rejected sign-in aborts the calling operation.
    pub async fn ensure_session(&self) -> Result<Session> {
        if let Some(session) = self.current_session() {
            debug!(user = %session.local_id, "reusing cached session");
            return Ok(session);
        }
        self.sign_in_anonymously().await
    }

    /// Create a fresh anonymous user and cache its session.
    pub async fn sign_in_anonymously(&self) -> Result<Session> {
        let url = format!(
            "{}/accounts:signUp?key={}",
            IDENTITY_TOOLKIT_URL, self.api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "returnSecureToken": true }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body, "anonymous sign-in rejected");
            return Err(FirebaseError::AuthFailed(format!(
                "anonymous sign-in rejected (status {})",
                status.as_u16()
            )));
        }

        let session: Session = resp
            .json()
            .await
            .map_err(|e| FirebaseError::Parse(format!("sign-in response: {e}")))?;

        info!(user = %session.local_id, "signed in anonymously");
        *self.session.write().expect("session lock poisoned") = Some(session.clone());
        Ok(session)
    }
}
