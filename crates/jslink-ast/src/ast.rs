//! Output JavaScript AST.
//!
//! This is the tree the backend's code generator emits and the linker
//! rewrites. It is deliberately smaller than a parser AST: only constructs
//! the generator actually produces exist, and identifiers are [`NameId`]
//! handles rather than strings wherever they participate in renaming.
//!
//! Property names and implicit globals appear as raw `String` idents inside
//! [`NameRef`]; those are spelled literally and never renamed.

use crate::names::NameId;
use serde::Serialize;

/// Expression node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    // =========================================================================
    // Literals
    // =========================================================================
    /// String literal: `"hello"`
    StringLit(String),

    /// Numeric literal, kept as written: `42`, `3.14`
    NumberLit(String),

    /// Boolean literal: `true`, `false`
    BoolLit(bool),

    /// Null literal: `null`
    NullLit,

    /// This keyword: `this`
    This,

    // =========================================================================
    // References
    // =========================================================================
    /// Identifier reference, possibly qualified: `x`, `a.b`, `obj.method`
    Ref(NameRef),

    // =========================================================================
    // Compound expressions
    // =========================================================================
    /// Call expression: `callee(args)`
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// New expression: `new Ctor(args)`
    New {
        constructor: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// Binary expression: `left op right`
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary prefix expression: `!x`, `typeof x`
    Prefix { op: String, operand: Box<Expr> },

    /// Conditional expression: `cond ? a : b`
    Conditional {
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },

    /// Array literal: `[a, b]`
    ArrayLit(Vec<Expr>),

    /// Object literal: `{ key: value }`
    ObjectLit(Vec<Property>),

    /// Function expression: `function name(params) { body }`
    Function(Function),
}

/// A reference to a name, optionally through a qualifier expression.
///
/// Plain references and property accesses share this node so one rewrite
/// path covers both. A reference is *unqualified* when `qualifier` is
/// `None`; only unqualified references participate in scope resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameRef {
    pub target: RefTarget,
    pub qualifier: Option<Box<Expr>>,
}

/// What a [`NameRef`] points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RefTarget {
    /// A bound name from the arena. Renamed when its name is replaced.
    Name(NameId),
    /// A literal identifier: a property name or an implicit global.
    /// Spelled as written; never renamed.
    Ident(String),
}

/// A property in an object literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyKey {
    Ident(String),
    Str(String),
    Num(String),
}

/// Function expression or declaration body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: Option<NameId>,
    pub parameters: Vec<NameId>,
    pub body: Block,
}

/// Brace-delimited statement list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Block { statements }
    }
}

/// Statement node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// Empty statement: `;`
    Empty,

    /// Expression statement: `expr;`
    Expression(Expr),

    /// Variable statement: `var a = 1, b;`
    Vars(Vec<VarDecl>),

    /// Nested block: `{ ... }`
    Block(Block),

    /// If statement: `if (cond) then else alt`
    If {
        condition: Expr,
        then_stmt: Box<Statement>,
        else_stmt: Option<Box<Statement>>,
    },

    /// While loop: `while (cond) body`
    While {
        condition: Expr,
        body: Box<Statement>,
    },

    /// Do-while loop: `do body while (cond);`
    DoWhile {
        body: Box<Statement>,
        condition: Expr,
    },

    /// For loop: `for (init; cond; update) body`; `init` is a `Vars` or
    /// `Expression` statement when present.
    For {
        init: Option<Box<Statement>>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Box<Statement>,
    },

    /// Return statement: `return expr;`
    Return(Option<Expr>),

    /// Throw statement: `throw expr;`
    Throw(Expr),

    /// Try statement: `try { } catch (e) { } finally { }`
    Try {
        block: Block,
        catch: Option<Catch>,
        finally: Option<Block>,
    },

    /// Labeled statement: `label: body`
    Labeled { label: NameId, body: Box<Statement> },

    /// Break statement: `break;` or `break label;`
    Break(Option<NameId>),

    /// Continue statement: `continue;` or `continue label;`
    Continue(Option<NameId>),
}

/// Single declarator inside a variable statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub name: NameId,
    pub init: Option<Expr>,
}

/// Catch clause. The parameter is visible in the enclosing function scope,
/// matching the generator's `var`-based scoping model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catch {
    pub parameter: NameId,
    pub body: Block,
}

impl Expr {
    /// Create an unqualified reference to a bound name.
    pub fn name_ref(name: NameId) -> Self {
        Expr::Ref(NameRef {
            target: RefTarget::Name(name),
            qualifier: None,
        })
    }

    /// Create an unqualified reference to a literal identifier, e.g. the
    /// global `Object`.
    pub fn global_ref(ident: impl Into<String>) -> Self {
        Expr::Ref(NameRef {
            target: RefTarget::Ident(ident.into()),
            qualifier: None,
        })
    }

    /// Create a property access: `object.property`.
    pub fn prop(object: Expr, property: impl Into<String>) -> Self {
        Expr::Ref(NameRef {
            target: RefTarget::Ident(property.into()),
            qualifier: Some(Box::new(object)),
        })
    }

    /// Create a string literal.
    pub fn string(s: impl Into<String>) -> Self {
        Expr::StringLit(s.into())
    }

    /// Create a numeric literal.
    pub fn number(n: impl Into<String>) -> Self {
        Expr::NumberLit(n.into())
    }

    /// Create a call expression.
    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// Create a new expression.
    pub fn new_expr(constructor: Expr, arguments: Vec<Expr>) -> Self {
        Expr::New {
            constructor: Box::new(constructor),
            arguments,
        }
    }

    /// Create a binary expression.
    pub fn binary(left: Expr, op: impl Into<String>, right: Expr) -> Self {
        Expr::Binary {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create an assignment expression.
    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::binary(target, "=", value)
    }

    /// Wrap this expression in an expression statement.
    pub fn make_stmt(self) -> Statement {
        Statement::Expression(self)
    }
}

impl Statement {
    /// Create a single-declarator variable statement: `var name = init;`
    pub fn var(name: NameId, init: Option<Expr>) -> Self {
        Statement::Vars(vec![VarDecl { name, init }])
    }

    /// Create a nested block statement.
    pub fn block(statements: Vec<Statement>) -> Self {
        Statement::Block(Block::new(statements))
    }

    /// Create a return statement.
    pub fn ret(expr: Option<Expr>) -> Self {
        Statement::Return(expr)
    }
}
