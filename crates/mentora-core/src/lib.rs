//! Shared configuration, error and domain enums for the mentora workspace.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
