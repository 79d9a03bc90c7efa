//! Scope construction and temporary name resolution for the jslink backend.
//!
//! The code generator mints placeholder (temporary) names freely and never
//! worries about collisions; this crate is where those placeholders become
//! real identifiers. [`ScopeTree::build`] computes declared/used name sets
//! per lexical scope, and [`resolve_temporary_names`] assigns each temporary
//! a final text that captures nothing, renames labels within their
//! function-local namespace, and rewrites the program in place.

// Per-scope declared/used name sets
pub mod scope_tree;
pub use scope_tree::{ScopeId, ScopeTree};

// Final-text assignment and in-place rewrite
pub mod resolve;
pub use resolve::resolve_temporary_names;
