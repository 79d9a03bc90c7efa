//! Link-time errors.

use jslink_ast::names::FqName;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors surfaced while accumulating fragments.
///
/// A failed [`add_fragment`](crate::Merger::add_fragment) leaves the merger
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// Two fragments registered different superclasses for the same class.
    #[error(
        "fragment {fragment_index}: class `{class}` already has superclass `{existing}`, cannot re-register it with `{conflicting}`"
    )]
    ConflictingSuperclass {
        class: String,
        existing: String,
        conflicting: String,
        fragment_index: usize,
    },

    /// An import's key was never bound by any fragment, so there is no
    /// canonical name to declare the import variable with.
    #[error("fragment {fragment_index}: import `{key}` has no name binding")]
    MissingImportBinding { key: FqName, fragment_index: usize },
}
