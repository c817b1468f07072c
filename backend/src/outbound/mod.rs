//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local user store for development and tests
//! - **persistence**: PostgreSQL repositories using Diesel
//!
//! Adapters translate between domain and storage types and hold no business
//! rules.

pub mod memory;
pub mod persistence;
