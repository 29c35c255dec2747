//! Wayfarer - travel marketplace backend
//!
//! Travelers book tours and activities from verified partners; an
//! administrator back office approves partners and moderates listings.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Marketplace entities and their rules
//! - **services**: Use cases behind the HTTP API
//! - **infra**: Postgres, Redis, object storage, email queue, payment gateway
//! - **jobs**: Background email delivery
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations)
//! wayfarer serve
//!
//! # Deliver queued emails
//! wayfarer jobs work
//!
//! # Inspect migrations
//! wayfarer migrate status
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
