// src/models/user.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO for admin login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100, message = "Please enter the admin email."))]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "Please enter the password."))]
    #[serde(default)]
    pub password: String,
}

/// `data` of a successful `POST /backend/v1/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginToken {
    pub token: String,
}

/// Signed-in administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// `data` of `GET /backend/v1/auth/detail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub user: AdminUser,
    /// Permission slug to granted flag.
    #[serde(default)]
    pub permissions: HashMap<String, bool>,
}
