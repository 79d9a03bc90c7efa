//! Fragment merging.
//!
//! The merger consumes one [`ProgramFragment`] per compilation unit and
//! produces a single linked program. Fragments agree on [`FqName`] keys, not
//! on names: the first fragment to bind a key mints a canonical temporary
//! for it, and every fragment's blocks are rewritten from their local names
//! onto the canonical ones as they arrive. Linking lays the sections out as
//!
//! 1. deduplicated import declarations,
//! 2. class prototype wiring (superclasses first) with each class's
//!    post-declaration statements,
//! 3. declarations,
//! 4. initializers,
//! 5. exports,
//!
//! and then runs temporary name resolution over the whole program, so
//! canonical names and surviving fragment temporaries all get final texts in
//! one pass.

use indexmap::IndexMap;
use jslink_ast::ast::{Expr, Statement};
use jslink_ast::fragment::ProgramFragment;
use jslink_ast::names::{FqName, NameArena, NameId};
use jslink_ast::visit::{MutVisitor, visit_stmts_mut};
use jslink_resolver::resolve_temporary_names;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{LinkError, Result};

/// Final linked output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkedProgram {
    /// The program: imports, prototype wiring, declarations, initializers.
    pub body: Vec<Statement>,
    /// Statements publishing the public API, resolved against `body`.
    pub exports: Vec<Statement>,
}

/// Accumulates fragments and links them into one program.
///
/// Fragments are merged in the order they are added and that order defines
/// the output: section contents keep fragment order, imports keep
/// first-occurrence order, and prototype wiring keeps first-registration
/// order (subject to superclasses going first).
#[derive(Debug, Default)]
pub struct Merger {
    /// Canonical name per key, minted on first bind.
    name_table: FxHashMap<FqName, NameId>,
    declared_imports: FxHashSet<FqName>,
    import_block: Vec<Statement>,
    declaration_block: Vec<Statement>,
    initializer_block: Vec<Statement>,
    export_block: Vec<Statement>,
    /// Direct superclass per class, keyed by canonical names.
    parent_classes: IndexMap<NameId, NameId>,
    /// Per-class statements to emit right after the class's wiring.
    post_declarations: IndexMap<NameId, Vec<Statement>>,
    fragments_merged: usize,
}

impl Merger {
    pub fn new() -> Self {
        Merger::default()
    }

    /// Merge one fragment into the accumulator.
    ///
    /// The fragment is validated in full before anything is committed: on
    /// error the merger is unchanged, canonical names staged for the
    /// fragment are discarded, and the merger can keep accepting other
    /// fragments, though a linker normally aborts.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn add_fragment(&mut self, names: &mut NameArena, fragment: ProgramFragment) -> Result<()> {
        let index = self.fragments_merged;
        let (name_map, staged_names) = self.build_name_map(names, &fragment);

        let ProgramFragment {
            imports,
            name_bindings: _,
            mut declaration_block,
            mut initializer_block,
            mut export_block,
            parent_classes,
            post_declarations,
        } = fragment;

        // Resolve and validate against the accumulator before touching it.
        let mut new_imports = Vec::new();
        for (key, init) in imports {
            if self.declared_imports.contains(&key) {
                continue;
            }
            let canonical = self
                .name_table
                .get(&key)
                .or_else(|| staged_names.get(&key))
                .copied()
                .ok_or_else(|| LinkError::MissingImportBinding {
                    key: key.clone(),
                    fragment_index: index,
                })?;
            new_imports.push((key, canonical, init));
        }

        let mut new_parents: IndexMap<NameId, NameId> = IndexMap::new();
        for (class, superclass) in parent_classes {
            let class = canonical_of(&name_map, class);
            let superclass = canonical_of(&name_map, superclass);
            let existing = self
                .parent_classes
                .get(&class)
                .or_else(|| new_parents.get(&class));
            match existing {
                Some(&existing) if existing != superclass => {
                    return Err(LinkError::ConflictingSuperclass {
                        class: names.text(class).to_owned(),
                        existing: names.text(existing).to_owned(),
                        conflicting: names.text(superclass).to_owned(),
                        fragment_index: index,
                    });
                }
                Some(_) => {}
                None => {
                    new_parents.insert(class, superclass);
                }
            }
        }

        // Commit.
        self.name_table.extend(staged_names);
        rename_statements(&mut declaration_block, &name_map);
        rename_statements(&mut export_block, &name_map);
        rename_statements(&mut initializer_block, &name_map);

        let imports_declared = new_imports.len();
        for (key, canonical, init) in new_imports {
            self.declared_imports.insert(key);
            names.metadata_mut(canonical).imported = true;
            self.import_block.push(Statement::var(canonical, Some(init)));
        }

        self.declaration_block.append(&mut declaration_block);
        self.initializer_block.append(&mut initializer_block);
        self.export_block.append(&mut export_block);
        self.parent_classes.extend(new_parents);

        for (class, mut stmts) in post_declarations {
            let class = canonical_of(&name_map, class);
            rename_statements(&mut stmts, &name_map);
            self.post_declarations
                .entry(class)
                .or_default()
                .append(&mut stmts);
        }

        self.fragments_merged += 1;
        debug!(
            fragment = index,
            imports_declared,
            bindings = name_map.len(),
            "merged fragment"
        );
        Ok(())
    }

    /// Map this fragment's bound local names onto canonical names. A key
    /// seen for the first time gets a canonical temporary staged for it;
    /// staged mints reach the name table only once the fragment validates.
    fn build_name_map(
        &self,
        names: &mut NameArena,
        fragment: &ProgramFragment,
    ) -> (FxHashMap<NameId, NameId>, FxHashMap<FqName, NameId>) {
        let mut map = FxHashMap::default();
        let mut staged = FxHashMap::default();
        for binding in &fragment.name_bindings {
            let known = self
                .name_table
                .get(&binding.key)
                .or_else(|| staged.get(&binding.key))
                .copied();
            let canonical = match known {
                Some(canonical) => canonical,
                None => {
                    // The canonical name starts as a temporary spelled like
                    // the first local; resolution gives it its final text.
                    let text = names.text(binding.name).to_owned();
                    let canonical = names.declare_temporary(text);
                    staged.insert(binding.key.clone(), canonical);
                    trace!(key = %binding.key, "minted canonical name");
                    canonical
                }
            };
            map.insert(binding.name, canonical);
        }
        (map, staged)
    }

    /// Produce the linked program and resolve every temporary in it.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn link(mut self, names: &mut NameArena) -> LinkedProgram {
        let mut body = Vec::with_capacity(
            self.import_block.len()
                + self.declaration_block.len()
                + self.initializer_block.len()
                + self.export_block.len(),
        );
        body.append(&mut self.import_block);
        self.add_class_prototypes(&mut body);
        body.append(&mut self.declaration_block);
        body.append(&mut self.initializer_block);

        // Exports resolve together with the body so they agree on final
        // texts, then split back off.
        let export_start = body.len();
        body.append(&mut self.export_block);

        resolve_temporary_names(&mut body, names);

        let exports = body.split_off(export_start);
        debug!(
            fragments = self.fragments_merged,
            statements = body.len(),
            exports = exports.len(),
            "linked program"
        );
        LinkedProgram { body, exports }
    }

    fn add_class_prototypes(&mut self, statements: &mut Vec<Statement>) {
        let mut visited = FxHashSet::default();
        let classes: Vec<NameId> = self.parent_classes.keys().copied().collect();
        for cls in classes {
            self.add_prototype_chain(cls, &mut visited, statements);
        }
        // Classes with post-declarations but no superclass link get no
        // wiring; their statements still belong to this section.
        let leftovers = std::mem::take(&mut self.post_declarations);
        for (_, stmts) in leftovers {
            statements.extend(stmts);
        }
    }

    /// Emit wiring for `cls`, superclasses first.
    fn add_prototype_chain(
        &mut self,
        cls: NameId,
        visited: &mut FxHashSet<NameId>,
        statements: &mut Vec<Statement>,
    ) {
        if !visited.insert(cls) {
            return;
        }
        if let Some(&superclass) = self.parent_classes.get(&cls) {
            self.add_prototype_chain(superclass, visited, statements);

            // cls.prototype = Object.create(superclass.prototype);
            let super_prototype = prototype_of(Expr::name_ref(superclass));
            let instance = Expr::call(
                Expr::prop(Expr::global_ref("Object"), "create"),
                vec![super_prototype],
            );
            statements.push(Expr::assign(prototype_of(Expr::name_ref(cls)), instance).make_stmt());

            // cls.prototype.constructor = cls;
            statements.push(
                Expr::assign(
                    Expr::prop(prototype_of(Expr::name_ref(cls)), "constructor"),
                    Expr::name_ref(cls),
                )
                .make_stmt(),
            );
        }
        if let Some(stmts) = self.post_declarations.shift_remove(&cls) {
            statements.extend(stmts);
        }
    }
}

fn prototype_of(class_ref: Expr) -> Expr {
    Expr::prop(class_ref, "prototype")
}

fn canonical_of(map: &FxHashMap<NameId, NameId>, name: NameId) -> NameId {
    map.get(&name).copied().unwrap_or(name)
}

struct RenameNames<'a> {
    map: &'a FxHashMap<NameId, NameId>,
}

impl MutVisitor for RenameNames<'_> {
    fn visit_name(&mut self, name: &mut NameId) {
        if let Some(&canonical) = self.map.get(name) {
            *name = canonical;
        }
    }
}

fn rename_statements(stmts: &mut [Statement], map: &FxHashMap<NameId, NameId>) {
    visit_stmts_mut(&mut RenameNames { map }, stmts);
}
