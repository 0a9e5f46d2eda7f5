//! # Auth Module
//!
//! Bearer token issuing and validation, and the `AuthedUser` extractor used
//! by every protected route.

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod tokens;


pub use extractors::AuthedUser;
pub use routes::auth_routes;
pub use tokens::issue_token;
