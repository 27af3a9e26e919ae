//! Core business logic for Invoicer.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and status transition rules live here.
//!
//! # Modules
//!
//! - `invoice` - Invoice status set and form validation
//! - `status` - Status changes, restores, and change-log presentation
//! - `listing` - Invoice list filters and the page cache

pub mod invoice;
pub mod listing;
pub mod status;
