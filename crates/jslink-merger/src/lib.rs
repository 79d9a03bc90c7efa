//! Fragment merging and linking for the jslink backend.
//!
//! This crate is the linker's top layer: feed per-unit
//! [`ProgramFragment`](jslink_ast::ProgramFragment)s to a [`Merger`] and get
//! back one [`LinkedProgram`] with deduplicated imports, wired prototype
//! chains, cross-fragment names unified through their keys, and every
//! temporary name resolved to a final text.

// Fragment accumulation and the link driver
pub mod merger;
pub use merger::{LinkedProgram, Merger};

// Typed link errors
pub mod error;
pub use error::{LinkError, Result};

// Opt-in tracing setup for embedding drivers and tests
pub mod tracing_config;
pub use tracing_config::init_tracing;
