//! HTTP surface of the tutoring marketplace session API.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod store_handler;
