// src/users/mod.rs
//! Back office user administration: status changes and paged listing

pub mod models;
pub mod repo;
pub mod services;
pub mod validators;
