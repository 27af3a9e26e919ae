//! Shared types, errors, and configuration for Invoicer.
//!
//! This crate provides common types used across all other crates:
//! - Minor-unit money conversion with decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, CacheConfig, JwtSettings};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
