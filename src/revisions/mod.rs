// src/revisions/mod.rs

pub mod handlers;
pub mod models;
pub mod repo;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::revisions_routes;
