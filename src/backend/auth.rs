// src/backend/auth.rs

use reqwest::Method;
use serde_json::json;

use super::{Authed, BackendClient, BackendError};
use crate::models::user::{AdminProfile, LoginToken};

impl BackendClient {
    /// Exchanges admin credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginToken, BackendError> {
        let path = "/auth/login";
        let request = self
            .http
            .request(Method::POST, self.endpoint(path)?)
            .json(&json!({ "email": email, "password": password }));
        self.fetch(path, request).await
    }
}

impl Authed<'_> {
    pub async fn admin_profile(&self) -> Result<AdminProfile, BackendError> {
        let path = "/auth/detail";
        let request = self.request(Method::GET, self.client.endpoint(path)?);
        self.fetch(path, request).await
    }

    pub async fn logout(&self) -> Result<(), BackendError> {
        let path = "/auth/logout";
        let request = self.request(Method::POST, self.client.endpoint(path)?);
        self.execute(path, request).await
    }
}
