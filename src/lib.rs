// src/lib.rs

pub mod backend;
pub mod compose;
pub mod config;
pub mod error;
pub mod grade_import;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_router;
