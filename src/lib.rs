//! sharelink - trackable short links for sellers.
//!
//! Issues one six-character code per target URL, records a click on every
//! redirect and reports per-link clicks, earnings and monthly breakdowns.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod store;
