//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Result model (repositories, options, matches, output records)
//! - Error taxonomy
//! - TSV rendering
//! - Path normalization utilities
//! - Common utilities

pub mod error;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
