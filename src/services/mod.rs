// src/services/mod.rs
//
// Shared services used across domain modules

pub mod cache;
pub mod email;
pub mod encryption;
