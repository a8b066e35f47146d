// src/utils/mod.rs

pub mod session;
