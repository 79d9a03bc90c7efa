//! Scope tree construction.
//!
//! One pass over a finished program computes, per lexical scope, which names
//! it declares and which it uses. The resolver then walks this tree instead
//! of the AST. Scoping follows the generator's `var`-based model: functions
//! are the only construct that opens a scope, a function's own name lives in
//! the scope that contains the function, its parameters live inside, and
//! `var` declarators and catch parameters land in whatever scope is current.
//!
//! Unqualified references to literal idents are implicit globals. Each
//! distinct spelling is minted once per build as a stable name, declared at
//! the root, and recorded as used wherever it occurs, so the resolver treats
//! the surrounding runtime environment as occupied text.

use indexmap::IndexSet;
use jslink_ast::ast::{Catch, Function, NameRef, RefTarget, Statement, VarDecl};
use jslink_ast::names::{NameArena, NameId};
use jslink_ast::reserved::RESERVED_WORDS;
use jslink_ast::visit::{self, Visitor};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Handle to a scope in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
struct ScopeData {
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    declared: IndexSet<NameId>,
    used: IndexSet<NameId>,
}

/// Declared and used names per scope, parent links included.
///
/// Built once per resolution pass over the final merged program and
/// discarded afterward. Children are stored in creation order, which is
/// source order, so walks over the tree are deterministic.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
}

impl ScopeTree {
    /// The program scope. Always present; never has a parent.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Compute the scope tree for `stmts`.
    ///
    /// The root is pre-seeded with the reserved words as stable
    /// declarations so no temporary can resolve onto one. Minting implicit
    /// globals is the only reason this needs `&mut` names.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn build(stmts: &[Statement], names: &mut NameArena) -> ScopeTree {
        let mut tree = ScopeTree {
            scopes: vec![ScopeData::default()],
        };
        for word in RESERVED_WORDS {
            let name = names.declare(*word);
            tree.declare(Self::ROOT, name);
        }

        let mut collector = ScopeCollector {
            tree: &mut tree,
            names,
            current: Self::ROOT,
            implicit_globals: FxHashMap::default(),
        };
        visit::visit_stmts(&mut collector, stmts);
        let globals = collector.implicit_globals.len();

        tree.lift_stable_names(names);
        debug!(
            scopes = tree.scopes.len(),
            implicit_globals = globals,
            "built scope tree"
        );
        tree
    }

    /// Create a child of `parent` and register it in source order.
    fn alloc_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            parent: Some(parent),
            ..ScopeData::default()
        });
        self.scopes[parent.index()].children.push(id);
        id
    }

    fn declare(&mut self, scope: ScopeId, name: NameId) {
        self.scopes[scope.index()].declared.insert(name);
    }

    fn record_use(&mut self, scope: ScopeId, name: NameId) {
        self.scopes[scope.index()].used.insert(name);
    }

    /// Propagate stable names to the enclosing scope, bottom-up.
    ///
    /// A scope's seed set must contain every stable text visible anywhere
    /// beneath it, declared or merely used, otherwise a temporary resolved
    /// here could capture a binding in a nested function. Temporaries are
    /// not lifted; their final text is unknown until the resolver reaches
    /// their declaring scope.
    fn lift_stable_names(&mut self, names: &NameArena) {
        // Children always sit after their parent, so reverse index order
        // visits every scope before the one it lifts into.
        for index in (1..self.scopes.len()).rev() {
            let Some(parent) = self.scopes[index].parent else {
                continue;
            };
            let scope = &self.scopes[index];
            let lifted: Vec<NameId> = scope
                .declared
                .iter()
                .chain(scope.used.iter())
                .copied()
                .filter(|&name| !names.is_temporary(name))
                .collect();
            self.scopes[parent.index()].used.extend(lifted);
        }
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    pub fn children(&self, scope: ScopeId) -> &[ScopeId] {
        &self.scopes[scope.index()].children
    }

    /// Names declared directly in `scope`, in declaration order.
    pub fn declared(&self, scope: ScopeId) -> &IndexSet<NameId> {
        &self.scopes[scope.index()].declared
    }

    /// Names used in `scope`, plus stable names declared or used anywhere
    /// beneath it.
    pub fn used(&self, scope: ScopeId) -> &IndexSet<NameId> {
        &self.scopes[scope.index()].used
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

struct ScopeCollector<'a> {
    tree: &'a mut ScopeTree,
    names: &'a mut NameArena,
    current: ScopeId,
    /// One stable name per implicit-global spelling, minted on first sight.
    implicit_globals: FxHashMap<String, NameId>,
}

impl Visitor for ScopeCollector<'_> {
    fn visit_function(&mut self, func: &Function) {
        // The function's own name is visible where the function appears.
        if let Some(name) = func.name {
            self.tree.declare(self.current, name);
        }
        let enclosing = self.current;
        self.current = self.tree.alloc_child(enclosing);
        for &param in &func.parameters {
            self.tree.declare(self.current, param);
        }
        self.visit_block(&func.body);
        self.current = enclosing;
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        self.tree.declare(self.current, decl.name);
        visit::walk_var_decl(self, decl);
    }

    fn visit_catch(&mut self, catch: &Catch) {
        self.tree.declare(self.current, catch.parameter);
        visit::walk_catch(self, catch);
    }

    fn visit_name_ref(&mut self, name_ref: &NameRef) {
        if name_ref.qualifier.is_some() {
            // Qualified references are property accesses; only the
            // qualifier participates in scoping.
            visit::walk_name_ref(self, name_ref);
            return;
        }
        match &name_ref.target {
            RefTarget::Name(name) => self.tree.record_use(self.current, *name),
            RefTarget::Ident(ident) => {
                let name = *self
                    .implicit_globals
                    .entry(ident.clone())
                    .or_insert_with(|| self.names.declare(ident.clone()));
                self.tree.declare(ScopeTree::ROOT, name);
                self.tree.record_use(self.current, name);
            }
        }
    }
}
