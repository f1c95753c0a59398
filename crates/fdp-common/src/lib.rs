//! FDP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the FDP project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all FDP workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Checksums**: File fingerprinting utilities
//! - **Logging**: Tracing subscriber configuration
//! - **Types**: Shared domain types and data structures
//!
//! # Example
//!
//! ```no_run
//! use fdp_common::{Result, FdpError};
//! use fdp_common::checksum::compute_file_sha256;
//!
//! fn fingerprint(path: &str) -> Result<()> {
//!     let digest = compute_file_sha256(path)?;
//!     println!("File fingerprint: {}", digest);
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{FdpError, Result};
