//! # Groupwise Core
//!
//! Core types, errors, and utilities shared by the Groupwise crates.
//!
//! - [`errors`]: Error kinds and the application error type
//! - [`serde`]: Custom deserialization helpers for persisted documents
//! - [`text`]: Field predicates and case/diacritic folding for search
//!
//! # Example
//!
//! ```ignore
//! use groupwise_core::errors::{AppError, ErrorKind};
//! use groupwise_core::text::fold_contains;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Group not found"));
//! assert_eq!(error.kind(), ErrorKind::NotFound);
//!
//! assert!(fold_contains("João", "joao"));
//! ```

pub mod errors;
pub mod serde;
pub mod text;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
