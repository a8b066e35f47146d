// src/models/mod.rs

pub mod grade;
pub mod question;
pub mod quiz;
pub mod user;

use serde::{Deserialize, Serialize};

/// Paginated list as returned by the backend: `{"data": [...], "total": n}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: i64,
}
