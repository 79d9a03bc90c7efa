//! ECMAScript reserved words.
//!
//! The resolver seeds the root scope with these so no temporary ever gets
//! renamed onto a keyword.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// Reserved words of the target language: keywords, future reserved words
/// (including strict mode), and the literal spellings.
pub const RESERVED_WORDS: &[&str] = &[
    // Keywords
    "break",
    "case",
    "catch",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "finally",
    "for",
    "function",
    "if",
    "in",
    "instanceof",
    "new",
    "return",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    // Future reserved words
    "class",
    "const",
    "enum",
    "export",
    "extends",
    "import",
    "super",
    // Future reserved words in strict mode
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
    // Literals
    "null",
    "true",
    "false",
];

static RESERVED_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| RESERVED_WORDS.iter().copied().collect());

/// True if `ident` cannot be used as an identifier in emitted code.
pub fn is_reserved(ident: &str) -> bool {
    RESERVED_SET.contains(ident)
}
