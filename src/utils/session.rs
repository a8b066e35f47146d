// src/utils/session.rs

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{error::AppError, models::user::AdminProfile};

/// The signed-in administrator's backend credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    #[serde(skip)]
    pub token: String,
    pub profile: Option<AdminProfile>,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            profile: None,
            signed_in_at: Utc::now(),
        }
    }
}

/// Process-wide session slot. Empty until a login succeeds; emptied again
/// on logout or when the backend stops accepting the token.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Replaces any existing session.
    pub async fn begin(&self, session: Session) {
        *self.inner.write().await = Some(session);
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn set_profile(&self, profile: AdminProfile) {
        if let Some(session) = self.inner.write().await.as_mut() {
            session.profile = Some(profile);
        }
    }

    pub async fn end(&self) -> Option<Session> {
        self.inner.write().await.take()
    }

    /// Ends the session only if it still carries `token`, so a stale
    /// rejection cannot sign out a newer login.
    pub async fn expire(&self, token: &str) -> bool {
        let mut slot = self.inner.write().await;
        if slot.as_ref().is_some_and(|s| s.token == token) {
            *slot = None;
            return true;
        }
        false
    }
}

/// Axum Middleware: Session.
///
/// Rejects requests with 401 while nobody is signed in, otherwise injects the
/// `Session` into the request extensions. A 401 coming back from the handler
/// means the backend refused the token, so the session is torn down.
pub async fn session_middleware(
    State(sessions): State<SessionStore>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = sessions
        .current()
        .await
        .ok_or_else(|| AppError::AuthError("Please sign in first.".to_string()))?;

    let token = session.token.clone();
    req.extensions_mut().insert(session);
    let response = next.run(req).await;

    if response.status() == StatusCode::UNAUTHORIZED && sessions.expire(&token).await {
        tracing::warn!("Backend rejected the session token, signing out");
    }

    Ok(response)
}
