// src/js/walker.rs

use super::ast::*;

/// One assignment-shaped node: `target = value` or an object-literal `key: value`.
#[derive(Debug, Clone, Copy)]
pub struct Assignment<'a> {
    /// Left-hand token as written in the source (`"price"`, `zoomUrls`).
    pub token: &'a str,
    pub value: &'a Expr,
}

/// Visits every assignment in `program`, depth-first and in source order.
/// A node is reported before any assignment nested inside its value.
pub fn walk_assignments<'a, F>(program: &'a Program, visit: F)
where
    F: FnMut(Assignment<'a>),
{
    let mut walker = Walker { visit };
    for stmt in &program.body {
        walker.stmt(stmt);
    }
}

struct Walker<F> {
    visit: F,
}

impl<'a, F> Walker<F>
where
    F: FnMut(Assignment<'a>),
{
    fn stmts(&mut self, stmts: &'a [Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Var(decls) => self.var_decls(decls),
            Stmt::Function(function) => self.stmts(&function.body),
            Stmt::Expr(expr) | Stmt::Throw(expr) => self.expr(expr),
            Stmt::Block(body) => self.stmts(body),
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.stmt(consequent);
                if let Some(alternate) = alternate {
                    self.stmt(alternate);
                }
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.for_init(init);
                }
                if let Some(test) = test {
                    self.expr(test);
                }
                if let Some(update) = update {
                    self.expr(update);
                }
                self.stmt(body);
            }
            Stmt::ForIn { left, right, body } => {
                self.for_init(left);
                self.expr(right);
                self.stmt(body);
            }
            Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
                self.expr(test);
                self.stmt(body);
            }
            Stmt::Return(arg) => {
                if let Some(arg) = arg {
                    self.expr(arg);
                }
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                self.stmts(block);
                if let Some(handler) = handler {
                    self.stmts(&handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.stmts(finalizer);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => {
                self.expr(discriminant);
                for case in cases {
                    if let Some(test) = &case.test {
                        self.expr(test);
                    }
                    self.stmts(&case.body);
                }
            }
            Stmt::Labeled { body, .. } => self.stmt(body),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty => {}
        }
    }

    fn var_decls(&mut self, decls: &'a [VarDecl]) {
        for decl in decls {
            if let Some(init) = &decl.init {
                self.expr(init);
            }
        }
    }

    fn for_init(&mut self, init: &'a ForInit) {
        match init {
            ForInit::Var(decls) => self.var_decls(decls),
            ForInit::Expr(expr) => self.expr(expr),
        }
    }

    fn expr(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Assign { target, value, .. } => {
                if let Some(token) = target_token(target) {
                    (self.visit)(Assignment { token, value });
                }
                self.expr(target);
                self.expr(value);
            }
            Expr::Object(properties) => {
                for property in properties {
                    (self.visit)(Assignment {
                        token: &property.key.raw,
                        value: &property.value,
                    });
                    self.expr(&property.value);
                }
            }
            Expr::Array(items) | Expr::Sequence(items) => {
                for item in items {
                    self.expr(item);
                }
            }
            Expr::Function(function) => self.stmts(&function.body),
            Expr::Unary { arg, .. } | Expr::Update { arg, .. } => self.expr(arg),
            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.expr(consequent);
                self.expr(alternate);
            }
            Expr::Call { callee, args } | Expr::New { callee, args } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }
            Expr::Member { object, property } => {
                self.expr(object);
                if let MemberProperty::Computed(property) = property {
                    self.expr(property);
                }
            }
            Expr::Ident(_)
            | Expr::Number(_)
            | Expr::Str { .. }
            | Expr::Regex(_)
            | Expr::Bool(_)
            | Expr::Null
            | Expr::This => {}
        }
    }
}

fn target_token(target: &Expr) -> Option<&str> {
    match target {
        Expr::Ident(name) => Some(name),
        Expr::Member {
            property: MemberProperty::Named(name),
            ..
        } => Some(name),
        Expr::Member {
            property: MemberProperty::Computed(property),
            ..
        } => match property.as_ref() {
            Expr::Str { raw, .. } => Some(raw),
            _ => None,
        },
        _ => None,
    }
}
