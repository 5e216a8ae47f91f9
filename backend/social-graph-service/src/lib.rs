/// Social Graph Service Library
///
/// Stores users, posts, follows, comments, groups and reports, and exposes
/// them over a JSON HTTP API.
///
/// # Modules
///
/// - `domain`: Entities and the ownership predicate
/// - `repository`: Storage trait with PostgreSQL and in-memory implementations
/// - `services`: Business logic layer
/// - `handlers`: HTTP request handlers and route table
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `db`: Connection pool and migrations
/// - `metrics`: Prometheus collectors
/// - `validators`: Input checks shared by DTOs and services
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod repository;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
