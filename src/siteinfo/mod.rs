// src/siteinfo/mod.rs
//! Site configuration sections (general, interface, smtp) stored as JSON blobs

pub mod handlers;
pub mod models;
pub mod options;
pub mod repo;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::siteinfo_routes;
