//! User-management REST backend: CRUD on user records, registration,
//! login with an access token, and a password check endpoint.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod users;
