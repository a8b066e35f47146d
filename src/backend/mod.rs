// src/backend/mod.rs

//! Typed client for the PlayEdu backend (`/backend/v1/...`).
//!
//! Every backend response is a JSON envelope `{"code": 0, "msg": "", "data": ...}`.
//! The envelope is checked first, then `data` is decoded into an explicit
//! schema. A shape mismatch becomes a `DecodeError` instead of leaking an
//! untyped value into the console.

pub mod auth;
pub mod grade;
pub mod question;
pub mod quiz;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;

use crate::utils::session::Session;

pub const API_PREFIX: &str = "/backend/v1";

/// Response body did not match the expected schema.
#[derive(Debug, Error)]
#[error("unexpected response from {endpoint}: {source}")]
pub struct DecodeError {
    pub endpoint: String,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session expired or not signed in")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    /// The backend refused the request and said why.
    #[error("{message}")]
    Rejected { code: i64, message: String },

    #[error("backend answered HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: StatusCode },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
}

impl BackendError {
    /// Message for the admin: the backend's own wording when it gave one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Rejected { message, .. } | BackendError::NotFound(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Shared HTTP client bound to one backend origin.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base: String,
}

impl BackendClient {
    pub fn new(base: &Url, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL of `path` under `/backend/v1`.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(Url::parse(&format!("{}{}{}", self.base, API_PREFIX, path))?)
    }

    /// View of the client that sends the session's bearer token.
    pub fn authed<'a>(&'a self, session: &'a Session) -> Authed<'a> {
        Authed {
            client: self,
            token: &session.token,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T, BackendError> {
        let data = self.execute(path, request).await?;
        serde_json::from_value(data).map_err(|source| {
            tracing::error!("Backend schema mismatch on {}: {}", path, source);
            BackendError::from(DecodeError {
                endpoint: path.to_string(),
                source,
            })
        })
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<serde_json::Value, BackendError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Backend request to {} failed: {}", path, e);
            BackendError::Transport(e)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }

        let body = response.bytes().await?;
        let envelope: Envelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(source) => {
                if status == StatusCode::NOT_FOUND {
                    return Err(BackendError::NotFound(format!("{} not found", path)));
                }
                if !status.is_success() {
                    return Err(BackendError::Status {
                        endpoint: path.to_string(),
                        status,
                    });
                }
                return Err(DecodeError {
                    endpoint: path.to_string(),
                    source,
                }
                .into());
            }
        };

        match envelope.code {
            0 if status.is_success() => Ok(envelope.data),
            0 => Err(BackendError::Status {
                endpoint: path.to_string(),
                status,
            }),
            401 => Err(BackendError::Unauthorized),
            404 => Err(BackendError::NotFound(envelope.msg)),
            code => Err(BackendError::Rejected {
                code,
                message: envelope.msg,
            }),
        }
    }
}

/// Client view carrying a bearer token. Cheap to build per request.
#[derive(Debug, Clone, Copy)]
pub struct Authed<'a> {
    client: &'a BackendClient,
    token: &'a str,
}

impl Authed<'_> {
    fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.client
            .http
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T, BackendError> {
        self.client.fetch(path, request).await
    }

    /// For endpoints whose `data` carries nothing the console needs.
    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<(), BackendError> {
        self.client.execute(path, request).await.map(|_| ())
    }
}
