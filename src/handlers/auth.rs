// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    backend::BackendClient,
    error::AppError,
    models::user::LoginRequest,
    utils::session::{Session, SessionStore},
};

/// Signs the administrator in against the backend.
///
/// The token is kept in the session store. The admin profile is fetched on
/// a best-effort basis: a failure there does not undo the login.
pub async fn login(
    State(backend): State<BackendClient>,
    State(sessions): State<SessionStore>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("Please enter the admin email.".to_string()));
    }
    if payload.password.trim().is_empty() {
        return Err(AppError::BadRequest("Please enter the password.".to_string()));
    }

    let token = backend.login(payload.email.trim(), &payload.password).await?;
    let mut session = Session::new(token.token);

    match backend.authed(&session).admin_profile().await {
        Ok(profile) => session.profile = Some(profile),
        Err(e) => tracing::warn!("Could not load admin profile after login: {}", e),
    }

    tracing::info!("Admin signed in: {}", payload.email.trim());
    sessions.begin(session.clone()).await;

    Ok(Json(session))
}

/// Signs out. The backend is told on a best-effort basis; the local session
/// is always cleared.
pub async fn logout(
    State(backend): State<BackendClient>,
    State(sessions): State<SessionStore>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session) = sessions.end().await {
        if let Err(e) = backend.authed(&session).logout().await {
            tracing::warn!("Backend logout failed: {}", e);
        }
        tracing::info!("Admin signed out");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Current session. Reloads the profile when the login-time fetch failed.
pub async fn me(
    State(backend): State<BackendClient>,
    State(sessions): State<SessionStore>,
) -> Result<impl IntoResponse, AppError> {
    let mut session = sessions
        .current()
        .await
        .ok_or_else(|| AppError::AuthError("Please sign in first.".to_string()))?;

    if session.profile.is_none() {
        let profile = match backend.authed(&session).admin_profile().await {
            Ok(profile) => profile,
            Err(e) => {
                let err = AppError::from(e);
                if matches!(err, AppError::AuthError(_)) {
                    sessions.expire(&session.token).await;
                }
                return Err(err);
            }
        };
        sessions.set_profile(profile.clone()).await;
        session.profile = Some(profile);
    }

    Ok(Json(json!({
        "profile": session.profile,
        "signed_in_at": session.signed_in_at,
    })))
}
