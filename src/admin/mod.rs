// src/admin/mod.rs
//! Back office HTTP surface; every route requires an administrator

pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::admin_routes;
