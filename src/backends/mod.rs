//! Backends module - External tool integrations
//!
//! Provides:
//! - git: Repository root validation and GitHub context discovery
//! - rg: ripgrep integration (streaming rg --json)

pub mod git;
pub mod rg;
