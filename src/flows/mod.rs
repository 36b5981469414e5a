//! Flows module - Operations combining multiple backends
//!
//! Provides:
//! - search: Validate repositories, search each with rg and stream TSV records

pub mod search;
