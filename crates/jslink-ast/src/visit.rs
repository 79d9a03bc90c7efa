//! AST traversal.
//!
//! Two traits, both with default walkers:
//!
//! - [`Visitor`] reads the tree. Hooks are per construct so a pass can treat
//!   declarations, references, and labels differently (scope building needs
//!   exactly that split).
//! - [`MutVisitor`] rewrites the tree. Every slot that holds a [`NameId`],
//!   whether a declaration, a reference, or a label, funnels through one
//!   [`MutVisitor::visit_name`] hook, so a rename pass is a single method.
//!
//! Overriding a `visit_*` method replaces recursion into that construct;
//! call the matching `walk_*` function to continue into children.

use crate::ast::{Block, Catch, Expr, Function, NameRef, RefTarget, Statement, VarDecl};
use crate::names::NameId;

/// Read-only traversal with per-construct hooks.
pub trait Visitor: Sized {
    fn visit_stmt(&mut self, stmt: &Statement) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_function(&mut self, func: &Function) {
        walk_function(self, func);
    }

    fn visit_name_ref(&mut self, name_ref: &NameRef) {
        walk_name_ref(self, name_ref);
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        walk_var_decl(self, decl);
    }

    fn visit_catch(&mut self, catch: &Catch) {
        walk_catch(self, catch);
    }

    fn visit_labeled(&mut self, label: NameId, body: &Statement) {
        let _ = label;
        self.visit_stmt(body);
    }

    fn visit_break(&mut self, label: Option<NameId>) {
        let _ = label;
    }

    fn visit_continue(&mut self, label: Option<NameId>) {
        let _ = label;
    }
}

/// Visit every statement in a slice.
pub fn visit_stmts<V: Visitor>(visitor: &mut V, stmts: &[Statement]) {
    for stmt in stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Empty => {}
        Statement::Expression(expr) => visitor.visit_expr(expr),
        Statement::Vars(decls) => {
            for decl in decls {
                visitor.visit_var_decl(decl);
            }
        }
        Statement::Block(block) => visitor.visit_block(block),
        Statement::If {
            condition,
            then_stmt,
            else_stmt,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(then_stmt);
            if let Some(else_stmt) = else_stmt {
                visitor.visit_stmt(else_stmt);
            }
        }
        Statement::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(body);
        }
        Statement::DoWhile { body, condition } => {
            visitor.visit_stmt(body);
            visitor.visit_expr(condition);
        }
        Statement::For {
            init,
            condition,
            update,
            body,
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            if let Some(update) = update {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(body);
        }
        Statement::Return(expr) => {
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
        Statement::Throw(expr) => visitor.visit_expr(expr),
        Statement::Try {
            block,
            catch,
            finally,
        } => {
            visitor.visit_block(block);
            if let Some(catch) = catch {
                visitor.visit_catch(catch);
            }
            if let Some(finally) = finally {
                visitor.visit_block(finally);
            }
        }
        Statement::Labeled { label, body } => visitor.visit_labeled(*label, body),
        Statement::Break(label) => visitor.visit_break(*label),
        Statement::Continue(label) => visitor.visit_continue(*label),
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::StringLit(_) | Expr::NumberLit(_) | Expr::BoolLit(_) | Expr::NullLit | Expr::This => {
        }
        Expr::Ref(name_ref) => visitor.visit_name_ref(name_ref),
        Expr::Call { callee, arguments } => {
            visitor.visit_expr(callee);
            for arg in arguments {
                visitor.visit_expr(arg);
            }
        }
        Expr::New {
            constructor,
            arguments,
        } => {
            visitor.visit_expr(constructor);
            for arg in arguments {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Prefix { operand, .. } => visitor.visit_expr(operand),
        Expr::Conditional {
            condition,
            when_true,
            when_false,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_expr(when_true);
            visitor.visit_expr(when_false);
        }
        Expr::ArrayLit(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        Expr::ObjectLit(props) => {
            for prop in props {
                visitor.visit_expr(&prop.value);
            }
        }
        Expr::Function(func) => visitor.visit_function(func),
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    for stmt in &block.statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_function<V: Visitor>(visitor: &mut V, func: &Function) {
    visitor.visit_block(&func.body);
}

pub fn walk_name_ref<V: Visitor>(visitor: &mut V, name_ref: &NameRef) {
    if let Some(qualifier) = &name_ref.qualifier {
        visitor.visit_expr(qualifier);
    }
}

pub fn walk_var_decl<V: Visitor>(visitor: &mut V, decl: &VarDecl) {
    if let Some(init) = &decl.init {
        visitor.visit_expr(init);
    }
}

pub fn walk_catch<V: Visitor>(visitor: &mut V, catch: &Catch) {
    visitor.visit_block(&catch.body);
}

/// Mutating traversal. [`MutVisitor::visit_name`] fires at every name slot:
/// function names and parameters, variable declarators, catch parameters,
/// bound references, labels, and labeled break/continue targets.
pub trait MutVisitor: Sized {
    fn visit_name(&mut self, name: &mut NameId) {
        let _ = name;
    }

    fn visit_stmt(&mut self, stmt: &mut Statement) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_block(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }

    fn visit_function(&mut self, func: &mut Function) {
        walk_function_mut(self, func);
    }

    fn visit_name_ref(&mut self, name_ref: &mut NameRef) {
        walk_name_ref_mut(self, name_ref);
    }
}

/// Visit every statement in a slice, mutably.
pub fn visit_stmts_mut<V: MutVisitor>(visitor: &mut V, stmts: &mut [Statement]) {
    for stmt in stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt_mut<V: MutVisitor>(visitor: &mut V, stmt: &mut Statement) {
    match stmt {
        Statement::Empty => {}
        Statement::Expression(expr) => visitor.visit_expr(expr),
        Statement::Vars(decls) => {
            for decl in decls {
                visitor.visit_name(&mut decl.name);
                if let Some(init) = &mut decl.init {
                    visitor.visit_expr(init);
                }
            }
        }
        Statement::Block(block) => visitor.visit_block(block),
        Statement::If {
            condition,
            then_stmt,
            else_stmt,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(then_stmt);
            if let Some(else_stmt) = else_stmt {
                visitor.visit_stmt(else_stmt);
            }
        }
        Statement::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(body);
        }
        Statement::DoWhile { body, condition } => {
            visitor.visit_stmt(body);
            visitor.visit_expr(condition);
        }
        Statement::For {
            init,
            condition,
            update,
            body,
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            if let Some(update) = update {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(body);
        }
        Statement::Return(expr) => {
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
        Statement::Throw(expr) => visitor.visit_expr(expr),
        Statement::Try {
            block,
            catch,
            finally,
        } => {
            visitor.visit_block(block);
            if let Some(catch) = catch {
                visitor.visit_name(&mut catch.parameter);
                visitor.visit_block(&mut catch.body);
            }
            if let Some(finally) = finally {
                visitor.visit_block(finally);
            }
        }
        Statement::Labeled { label, body } => {
            visitor.visit_name(label);
            visitor.visit_stmt(body);
        }
        Statement::Break(label) | Statement::Continue(label) => {
            if let Some(label) = label {
                visitor.visit_name(label);
            }
        }
    }
}

pub fn walk_expr_mut<V: MutVisitor>(visitor: &mut V, expr: &mut Expr) {
    match expr {
        Expr::StringLit(_) | Expr::NumberLit(_) | Expr::BoolLit(_) | Expr::NullLit | Expr::This => {
        }
        Expr::Ref(name_ref) => visitor.visit_name_ref(name_ref),
        Expr::Call { callee, arguments } => {
            visitor.visit_expr(callee);
            for arg in arguments {
                visitor.visit_expr(arg);
            }
        }
        Expr::New {
            constructor,
            arguments,
        } => {
            visitor.visit_expr(constructor);
            for arg in arguments {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Prefix { operand, .. } => visitor.visit_expr(operand),
        Expr::Conditional {
            condition,
            when_true,
            when_false,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_expr(when_true);
            visitor.visit_expr(when_false);
        }
        Expr::ArrayLit(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        Expr::ObjectLit(props) => {
            for prop in props {
                visitor.visit_expr(&mut prop.value);
            }
        }
        Expr::Function(func) => visitor.visit_function(func),
    }
}

pub fn walk_block_mut<V: MutVisitor>(visitor: &mut V, block: &mut Block) {
    for stmt in &mut block.statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_function_mut<V: MutVisitor>(visitor: &mut V, func: &mut Function) {
    if let Some(name) = &mut func.name {
        visitor.visit_name(name);
    }
    for param in &mut func.parameters {
        visitor.visit_name(param);
    }
    visitor.visit_block(&mut func.body);
}

pub fn walk_name_ref_mut<V: MutVisitor>(visitor: &mut V, name_ref: &mut NameRef) {
    if let RefTarget::Name(name) = &mut name_ref.target {
        visitor.visit_name(name);
    }
    if let Some(qualifier) = &mut name_ref.qualifier {
        visitor.visit_expr(qualifier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameArena;
    use rustc_hash::FxHashMap;

    struct RefCounter {
        bound: usize,
        idents: usize,
    }

    impl Visitor for RefCounter {
        fn visit_name_ref(&mut self, name_ref: &NameRef) {
            match &name_ref.target {
                RefTarget::Name(_) => self.bound += 1,
                RefTarget::Ident(_) => self.idents += 1,
            }
            walk_name_ref(self, name_ref);
        }
    }

    #[test]
    fn walker_reaches_refs_inside_functions_and_labels() {
        let mut names = NameArena::new();
        let x = names.declare("x");
        let loop_label = names.declare("loop");

        let body = Statement::Labeled {
            label: loop_label,
            body: Box::new(Statement::While {
                condition: Expr::name_ref(x),
                body: Box::new(Statement::Break(Some(loop_label))),
            }),
        };
        let stmts = vec![
            Expr::call(
                Expr::prop(Expr::global_ref("console"), "log"),
                vec![Expr::name_ref(x)],
            )
            .make_stmt(),
            Expr::Function(Function {
                name: None,
                parameters: vec![],
                body: Block::new(vec![body]),
            })
            .make_stmt(),
        ];

        let mut counter = RefCounter { bound: 0, idents: 0 };
        visit_stmts(&mut counter, &stmts);
        // x twice; labels are not references.
        assert_eq!(counter.bound, 2);
        // console.log: the property ident and the global qualifier.
        assert_eq!(counter.idents, 2);
    }

    struct Renamer {
        map: FxHashMap<NameId, NameId>,
    }

    impl MutVisitor for Renamer {
        fn visit_name(&mut self, name: &mut NameId) {
            if let Some(&to) = self.map.get(name) {
                *name = to;
            }
        }
    }

    #[test]
    fn mut_walker_hits_every_name_slot() {
        let mut names = NameArena::new();
        let old = names.declare("old");
        let new = names.declare("new");

        let mut stmts = vec![
            Expr::Function(Function {
                name: Some(old),
                parameters: vec![old],
                body: Block::new(vec![
                    Statement::var(old, Some(Expr::name_ref(old))),
                    Statement::Try {
                        block: Block::default(),
                        catch: Some(Catch {
                            parameter: old,
                            body: Block::default(),
                        }),
                        finally: None,
                    },
                    Statement::Labeled {
                        label: old,
                        body: Box::new(Statement::Continue(Some(old))),
                    },
                ]),
            })
            .make_stmt(),
        ];

        let mut map = FxHashMap::default();
        map.insert(old, new);
        visit_stmts_mut(&mut Renamer { map }, &mut stmts);

        struct SlotCollector {
            seen: Vec<NameId>,
        }
        impl MutVisitor for SlotCollector {
            fn visit_name(&mut self, name: &mut NameId) {
                self.seen.push(*name);
            }
        }
        let mut collector = SlotCollector { seen: Vec::new() };
        visit_stmts_mut(&mut collector, &mut stmts);

        // fn name, param, var, var init ref, catch param, label, continue.
        assert_eq!(collector.seen.len(), 7);
        assert!(collector.seen.iter().all(|&name| name == new));
    }
}
