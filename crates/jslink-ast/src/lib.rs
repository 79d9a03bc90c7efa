//! Shared data model for the jslink backend linker.
//!
//! This crate provides the types the code generator hands to the linker:
//! - Name identity (`NameId`, `NameArena`, `FqName`)
//! - The output JavaScript AST (`Expr`, `Statement`, builders)
//! - Traversal (`Visitor`, `MutVisitor` and their walkers)
//! - Reserved-word tables
//! - Per-unit output (`ProgramFragment`, `NameBinding`)

// Name identity - handles into the arena, never raw strings
pub mod names;
pub use names::{FqName, NameArena, NameData, NameId, NameMetadata};

// Output AST and builder helpers
pub mod ast;
pub use ast::{
    Block, Catch, Expr, Function, NameRef, Property, PropertyKey, RefTarget, Statement, VarDecl,
};

// Read-only and mutating traversal
pub mod visit;
pub use visit::{MutVisitor, Visitor, visit_stmts, visit_stmts_mut};

// ECMAScript reserved words
pub mod reserved;
pub use reserved::{RESERVED_WORDS, is_reserved};

// Pre-link program fragments
pub mod fragment;
pub use fragment::{NameBinding, ProgramFragment};
