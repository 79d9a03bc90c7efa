//! Temporary name resolution.
//!
//! Runs over the final merged program, after every fragment has landed.
//! Three steps share one replacement map:
//!
//! 1. Walk the scope tree top-down. Each scope seeds a taken-text set with
//!    every stable name visible in it or anywhere beneath it, then assigns
//!    each temporary it declares the first free spelling, probing `name`,
//!    `name_0`, `name_1`, ... Replacements are fresh stable names carrying
//!    the original's metadata; the temporary itself is never edited, so
//!    resolution is idempotent.
//! 2. Resolve labels the same way against a separate, function-local
//!    namespace.
//! 3. Apply the map in one mutating walk over every name slot, then remap
//!    companion metadata through it.

use jslink_ast::ast::{Function, Statement};
use jslink_ast::names::{NameArena, NameId};
use jslink_ast::visit::{self, MutVisitor, Visitor};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::scope_tree::{ScopeId, ScopeTree};

/// Give every temporary name in `stmts` a final, collision-free text.
///
/// Stable names are never altered, whatever they collide with; making
/// user-visible spellings unique is the generator's job. Running this twice
/// is a no-op the second time, since replacements are stable.
#[tracing::instrument(level = "trace", skip_all)]
pub fn resolve_temporary_names(stmts: &mut [Statement], names: &mut NameArena) {
    let tree = ScopeTree::build(stmts, names);

    let mut replacements = FxHashMap::default();
    let mut resolver = NameResolver {
        names: &mut *names,
        tree: &tree,
        taken: FxHashSet::default(),
        replacements: &mut replacements,
    };
    resolver.resolve_scope(ScopeTree::ROOT);

    let mut labels = LabelResolver {
        names: &mut *names,
        replacements: &mut replacements,
        active: FxHashSet::default(),
    };
    visit::visit_stmts(&mut labels, stmts);

    let mut apply = ApplyReplacements {
        replacements: &replacements,
    };
    visit::visit_stmts_mut(&mut apply, stmts);
    names.remap_companions(&replacements);

    debug!(replacements = replacements.len(), "resolved temporary names");
}

struct NameResolver<'a> {
    names: &'a mut NameArena,
    tree: &'a ScopeTree,
    /// Texts that would be captured if a temporary took them, for the scope
    /// chain currently being walked.
    taken: FxHashSet<String>,
    replacements: &'a mut FxHashMap<NameId, NameId>,
}

impl NameResolver<'_> {
    fn resolve_scope(&mut self, scope: ScopeId) {
        let tree = self.tree;
        let mut inserted: Vec<String> = Vec::new();

        // Seed with everything stable this scope can see: its own stable
        // declarations, stable names its subtree declares or uses, and the
        // final texts of temporaries already resolved above us.
        for &name in tree.declared(scope) {
            if !self.names.is_temporary(name) {
                let text = self.names.text(name).to_owned();
                self.occupy(text, &mut inserted);
            }
        }
        for &name in tree.used(scope) {
            let resolved = self.replacements.get(&name).copied().unwrap_or(name);
            if self.names.is_temporary(resolved) {
                // Declared in some scope below; its text is not final yet.
                continue;
            }
            let text = self.names.text(resolved).to_owned();
            self.occupy(text, &mut inserted);
        }

        // Assign final texts to this scope's temporaries in declaration
        // order, so the outcome never depends on map iteration.
        for &name in tree.declared(scope) {
            if !self.names.is_temporary(name) || self.replacements.contains_key(&name) {
                continue;
            }
            let original = self.names.text(name).to_owned();
            let mut resolved = original.clone();
            let mut suffix = 0u32;
            while self.taken.contains(&resolved) {
                resolved = format!("{original}_{suffix}");
                suffix += 1;
            }
            self.occupy(resolved.clone(), &mut inserted);

            let replacement = self.names.declare(resolved);
            self.names.copy_metadata(replacement, name);
            self.replacements.insert(name, replacement);
            trace!(
                temporary = %original,
                resolved = %self.names.text(replacement),
                "assigned final text"
            );
        }

        for &child in tree.children(scope) {
            self.resolve_scope(child);
        }

        for text in inserted {
            self.taken.remove(&text);
        }
    }

    /// Mark `text` occupied for this scope's subtree.
    ///
    /// Only a successful insert is recorded for undo: text an ancestor
    /// already occupies must stay occupied when this scope is left.
    fn occupy(&mut self, text: String, inserted: &mut Vec<String>) {
        if self.taken.insert(text.clone()) {
            inserted.push(text);
        }
    }
}

/// Labels get their own namespace: one active-text set per enclosing
/// function, saved and restored at function boundaries. An entry is popped
/// exactly when the walk leaves the labeled statement that installed it, so
/// sibling labels can share a text while nested ones cannot.
struct LabelResolver<'a> {
    names: &'a mut NameArena,
    replacements: &'a mut FxHashMap<NameId, NameId>,
    active: FxHashSet<String>,
}

impl Visitor for LabelResolver<'_> {
    fn visit_labeled(&mut self, label: NameId, body: &Statement) {
        let installed = if self.names.is_temporary(label) {
            let original = self.names.text(label).to_owned();
            let mut resolved = original.clone();
            let mut suffix = 0u32;
            while !self.active.insert(resolved.clone()) {
                resolved = format!("{original}_{suffix}");
                suffix += 1;
            }
            let replacement = self.names.declare(resolved.clone());
            self.names.copy_metadata(replacement, label);
            self.replacements.insert(label, replacement);
            trace!(label = %original, resolved = %resolved, "assigned label text");
            Some(resolved)
        } else {
            let text = self.names.text(label).to_owned();
            // Re-entering a text an outer label owns installs nothing; the
            // outer occurrence decides when it frees up.
            self.active.insert(text.clone()).then_some(text)
        };

        self.visit_stmt(body);

        if let Some(text) = installed {
            self.active.remove(&text);
        }
    }

    fn visit_function(&mut self, func: &Function) {
        let outer = std::mem::take(&mut self.active);
        visit::walk_function(self, func);
        self.active = outer;
    }
}

struct ApplyReplacements<'a> {
    replacements: &'a FxHashMap<NameId, NameId>,
}

impl MutVisitor for ApplyReplacements<'_> {
    fn visit_name(&mut self, name: &mut NameId) {
        if let Some(&replacement) = self.replacements.get(name) {
            // Replacements are fresh stable names, so no slot is ever
            // rewritten through the map twice.
            debug_assert!(!self.replacements.contains_key(&replacement));
            *name = replacement;
        }
    }
}
