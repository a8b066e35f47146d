// src/handlers/mod.rs

pub mod auth;
pub mod grade;
pub mod question;
pub mod quiz;
