//! Per-compilation-unit output, before linking.
//!
//! The code generator produces one [`ProgramFragment`] per unit. Fragments
//! are self-contained: every name they mention is a local mint, and
//! declarations that other units can see are tied to a fragment-independent
//! [`FqName`] key through [`NameBinding`]s. The merger consumes fragments
//! exactly once.

use crate::ast::{Expr, Statement};
use crate::names::{FqName, NameId};
use indexmap::IndexMap;

/// Ties a fragment-local name to its cross-fragment key.
#[derive(Debug, Clone)]
pub struct NameBinding {
    pub name: NameId,
    pub key: FqName,
}

/// One compilation unit's generated output.
///
/// All maps preserve insertion order; the merger's output order is defined
/// in terms of it.
#[derive(Debug, Clone, Default)]
pub struct ProgramFragment {
    /// External entities this unit needs, keyed by identity. The value is
    /// the initializer the import variable is declared with. Initializers
    /// are emitted verbatim and must be built from fragment-independent
    /// references.
    pub imports: IndexMap<FqName, Expr>,

    /// Which local names stand for which cross-fragment entities.
    pub name_bindings: Vec<NameBinding>,

    /// Function and class declarations.
    pub declaration_block: Vec<Statement>,

    /// Top-level side effects, run after all declarations.
    pub initializer_block: Vec<Statement>,

    /// Statements publishing public API to the output object.
    pub export_block: Vec<Statement>,

    /// Direct superclass per class declared in this unit.
    pub parent_classes: IndexMap<NameId, NameId>,

    /// Statements to place right after a class's prototype wiring, e.g.
    /// default-method bridges copied onto the prototype.
    pub post_declarations: IndexMap<NameId, Vec<Statement>>,
}

impl ProgramFragment {
    pub fn new() -> Self {
        ProgramFragment::default()
    }

    /// Bind `name` to `key` for cross-fragment unification.
    pub fn bind(&mut self, name: NameId, key: FqName) {
        self.name_bindings.push(NameBinding { name, key });
    }

    /// Record an import of `key`, declared with `init`, and bind `name` to
    /// the same key so references through `name` unify with it.
    pub fn import(&mut self, name: NameId, key: FqName, init: Expr) {
        self.bind(name, key.clone());
        self.imports.insert(key, init);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameArena;

    #[test]
    fn import_records_binding_and_initializer() {
        let mut names = NameArena::new();
        let util = names.declare_temporary("Util");
        let mut fragment = ProgramFragment::new();
        fragment.import(
            util,
            FqName::new("pkg:Util"),
            Expr::prop(Expr::global_ref("pkg"), "Util"),
        );

        assert_eq!(fragment.name_bindings.len(), 1);
        assert_eq!(fragment.name_bindings[0].key, FqName::new("pkg:Util"));
        assert!(fragment.imports.contains_key(&FqName::new("pkg:Util")));
    }

    #[test]
    fn maps_keep_insertion_order() {
        let mut names = NameArena::new();
        let a = names.declare_temporary("A");
        let b = names.declare_temporary("B");
        let base = names.declare_temporary("Base");

        let mut fragment = ProgramFragment::new();
        fragment.parent_classes.insert(b, base);
        fragment.parent_classes.insert(a, base);

        let order: Vec<NameId> = fragment.parent_classes.keys().copied().collect();
        assert_eq!(order, vec![b, a]);
    }
}
