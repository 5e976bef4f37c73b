// src/js/parser.rs

//! Recursive-descent parser for the ES5 subset listing pages embed.
//!
//! Automatic semicolon insertion is honoured only where a line break, a
//! closing brace or the end of input follows a statement. Two statements
//! glued together on one line are a hard error.
//!
//! Tree depth is capped at `MAX_DEPTH`, counting operator and member chains
//! link by link, so walking or dropping the tree never runs out of stack.

use super::ast::*;
use super::lexer::{tokenize, Token, TokenKind};
use super::ParseError;

const MAX_DEPTH: usize = 256;

const ASSIGN_OPS: [&str; 12] = [
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "&=", "|=", "^=",
];

pub fn parse(src: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    parser.program()
}

fn binary_precedence(op: &str) -> Option<u8> {
    let prec = match op {
        "||" => 1,
        "&&" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "==" | "!=" | "===" | "!==" => 6,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 7,
        "<<" | ">>" | ">>>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        _ => return None,
    };
    Some(prec)
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    // ---- token helpers ----

    fn peek(&self) -> &Token<'a> {
        // The lexer always terminates the stream with Eof, and `advance`
        // never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_nth(&self, n: usize) -> &Token<'a> {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token<'a> {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn is_punct(&self, p: &str) -> bool {
        let tok = self.peek();
        tok.kind == TokenKind::Punct && tok.raw == p
    }

    fn is_keyword(&self, kw: &str) -> bool {
        let tok = self.peek();
        tok.kind == TokenKind::Ident && tok.raw == kw
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        if self.is_punct(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.is_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: &str) -> Result<(), ParseError> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected `{p}`")))
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<(), ParseError> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected `{kw}`")))
        }
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        if self.peek().kind == TokenKind::Ident {
            Ok(self.advance().raw.to_string())
        } else {
            Err(self.unexpected("expected identifier"))
        }
    }

    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat_punct(";") || self.is_punct("}") || self.at_eof() || self.peek().newline_before
        {
            Ok(())
        } else {
            Err(self.unexpected("missing `;`"))
        }
    }

    fn unexpected(&self, what: &str) -> ParseError {
        let tok = self.peek();
        let found = if tok.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            format!("`{}`", tok.raw)
        };
        ParseError::new(format!("{what}, found {found}"), tok.offset)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::new("nesting too deep", self.peek().offset));
        }
        Ok(())
    }

    // ---- statements ----

    fn program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while !self.at_eof() {
            body.push(self.statement()?);
        }
        Ok(Program { body })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        self.enter()?;
        let stmt = self.statement_inner();
        self.depth -= 1;
        stmt
    }

    fn statement_inner(&mut self) -> Result<Stmt, ParseError> {
        if self.is_punct("{") {
            return Ok(Stmt::Block(self.block()?));
        }
        if self.eat_punct(";") {
            return Ok(Stmt::Empty);
        }

        let tok = self.peek().clone();
        if tok.kind == TokenKind::Ident {
            match tok.raw {
                "var" | "let" | "const" => {
                    self.advance();
                    let decls = self.var_decls(false)?;
                    self.consume_semicolon()?;
                    return Ok(Stmt::Var(decls));
                }
                "function" => {
                    self.advance();
                    return Ok(Stmt::Function(self.function_rest()?));
                }
                "if" => return self.if_statement(),
                "for" => return self.for_statement(),
                "while" => {
                    self.advance();
                    let test = self.paren_expression()?;
                    let body = Box::new(self.statement()?);
                    return Ok(Stmt::While { test, body });
                }
                "do" => {
                    self.advance();
                    let body = Box::new(self.statement()?);
                    self.expect_keyword("while")?;
                    let test = self.paren_expression()?;
                    self.eat_punct(";");
                    return Ok(Stmt::DoWhile { body, test });
                }
                "return" => {
                    self.advance();
                    let arg = if self.ends_statement() {
                        None
                    } else {
                        Some(self.expression(false)?)
                    };
                    self.consume_semicolon()?;
                    return Ok(Stmt::Return(arg));
                }
                "break" | "continue" => {
                    self.advance();
                    let label = if self.peek().kind == TokenKind::Ident && !self.ends_statement() {
                        Some(self.identifier()?)
                    } else {
                        None
                    };
                    self.consume_semicolon()?;
                    return Ok(if tok.raw == "break" {
                        Stmt::Break(label)
                    } else {
                        Stmt::Continue(label)
                    });
                }
                "throw" => {
                    self.advance();
                    let arg = self.expression(false)?;
                    self.consume_semicolon()?;
                    return Ok(Stmt::Throw(arg));
                }
                "try" => return self.try_statement(),
                "switch" => return self.switch_statement(),
                _ => {
                    let next = self.peek_nth(1);
                    if next.kind == TokenKind::Punct && next.raw == ":" {
                        self.advance();
                        self.advance();
                        let body = Box::new(self.statement()?);
                        return Ok(Stmt::Labeled {
                            label: tok.raw.to_string(),
                            body,
                        });
                    }
                }
            }
        }

        let expr = self.expression(false)?;
        self.consume_semicolon()?;
        Ok(Stmt::Expr(expr))
    }

    fn ends_statement(&self) -> bool {
        self.is_punct(";") || self.is_punct("}") || self.at_eof() || self.peek().newline_before
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.eat_punct("}") {
            if self.at_eof() {
                return Err(self.unexpected("unclosed block"));
            }
            body.push(self.statement()?);
        }
        Ok(body)
    }

    fn var_decls(&mut self, no_in: bool) -> Result<Vec<VarDecl>, ParseError> {
        let mut decls = Vec::new();
        loop {
            let name = self.identifier()?;
            let init = if self.eat_punct("=") {
                Some(self.assignment(no_in)?)
            } else {
                None
            };
            decls.push(VarDecl { name, init });
            if !self.eat_punct(",") {
                return Ok(decls);
            }
        }
    }

    fn paren_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("(")?;
        let expr = self.expression(false)?;
        self.expect_punct(")")?;
        Ok(expr)
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let test = self.paren_expression()?;
        let consequent = Box::new(self.statement()?);
        let alternate = if self.eat_keyword("else") {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            test,
            consequent,
            alternate,
        })
    }

    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        self.expect_punct("(")?;

        let init = if self.is_punct(";") {
            None
        } else if self.is_keyword("var") || self.is_keyword("let") || self.is_keyword("const") {
            self.advance();
            Some(ForInit::Var(self.var_decls(true)?))
        } else {
            Some(ForInit::Expr(self.expression(true)?))
        };

        if let Some(left) = init.clone() {
            if self.eat_keyword("in") || self.eat_keyword("of") {
                let right = self.expression(false)?;
                self.expect_punct(")")?;
                let body = Box::new(self.statement()?);
                return Ok(Stmt::ForIn { left, right, body });
            }
        }

        self.expect_punct(";")?;
        let test = if self.is_punct(";") {
            None
        } else {
            Some(self.expression(false)?)
        };
        self.expect_punct(";")?;
        let update = if self.is_punct(")") {
            None
        } else {
            Some(self.expression(false)?)
        };
        self.expect_punct(")")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::For {
            init,
            test,
            update,
            body,
        })
    }

    fn try_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let block = self.block()?;

        let handler = if self.eat_keyword("catch") {
            self.expect_punct("(")?;
            let param = self.identifier()?;
            self.expect_punct(")")?;
            Some(CatchClause {
                param,
                body: self.block()?,
            })
        } else {
            None
        };

        let finalizer = if self.eat_keyword("finally") {
            Some(self.block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected("expected `catch` or `finally`"));
        }

        Ok(Stmt::Try {
            block,
            handler,
            finalizer,
        })
    }

    fn switch_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let discriminant = self.paren_expression()?;
        self.expect_punct("{")?;

        let mut cases = Vec::new();
        while !self.eat_punct("}") {
            let test = if self.eat_keyword("case") {
                Some(self.expression(false)?)
            } else if self.eat_keyword("default") {
                None
            } else {
                return Err(self.unexpected("expected `case` or `default`"));
            };
            self.expect_punct(":")?;

            let mut body = Vec::new();
            while !(self.is_keyword("case") || self.is_keyword("default") || self.is_punct("}")) {
                if self.at_eof() {
                    return Err(self.unexpected("unclosed switch"));
                }
                body.push(self.statement()?);
            }
            cases.push(SwitchCase { test, body });
        }

        Ok(Stmt::Switch {
            discriminant,
            cases,
        })
    }

    /// Everything after the `function` keyword.
    fn function_rest(&mut self) -> Result<Function, ParseError> {
        let name = if self.peek().kind == TokenKind::Ident {
            Some(self.identifier()?)
        } else {
            None
        };

        self.expect_punct("(")?;
        let mut params = Vec::new();
        while !self.eat_punct(")") {
            params.push(self.identifier()?);
            if !self.is_punct(")") {
                self.expect_punct(",")?;
            }
        }

        let body = self.block()?;
        Ok(Function { name, params, body })
    }

    // ---- expressions ----

    fn expression(&mut self, no_in: bool) -> Result<Expr, ParseError> {
        let first = self.assignment(no_in)?;
        if !self.is_punct(",") {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.eat_punct(",") {
            exprs.push(self.assignment(no_in)?);
        }
        Ok(Expr::Sequence(exprs))
    }

    fn assignment(&mut self, no_in: bool) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.assignment_inner(no_in);
        self.depth -= 1;
        expr
    }

    fn assignment_inner(&mut self, no_in: bool) -> Result<Expr, ParseError> {
        let target = self.conditional(no_in)?;

        let tok = self.peek();
        if tok.kind == TokenKind::Punct && ASSIGN_OPS.iter().any(|op| *op == tok.raw) {
            if !matches!(target, Expr::Ident(_) | Expr::Member { .. }) {
                return Err(self.unexpected("invalid assignment target"));
            }
            let op = self.advance().raw.to_string();
            let value = self.assignment(no_in)?;
            return Ok(Expr::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            });
        }

        Ok(target)
    }

    fn conditional(&mut self, no_in: bool) -> Result<Expr, ParseError> {
        let test = self.binary(1, no_in)?;
        if !self.eat_punct("?") {
            return Ok(test);
        }

        let consequent = self.assignment(false)?;
        self.expect_punct(":")?;
        let alternate = self.assignment(no_in)?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn binary_operator(&self, no_in: bool) -> Option<(String, u8)> {
        let tok = self.peek();
        let is_operator = match tok.kind {
            TokenKind::Punct => true,
            TokenKind::Ident => tok.raw == "instanceof" || (tok.raw == "in" && !no_in),
            _ => false,
        };
        if !is_operator {
            return None;
        }
        binary_precedence(tok.raw).map(|prec| (tok.raw.to_string(), prec))
    }

    fn binary(&mut self, min_prec: u8, no_in: bool) -> Result<Expr, ParseError> {
        let base = self.depth;
        let expr = self.binary_chain(min_prec, no_in);
        self.depth = base;
        expr
    }

    /// Left-associative operator chain. Every operator deepens the tree by one
    /// level, so each is charged against `MAX_DEPTH`.
    fn binary_chain(&mut self, min_prec: u8, no_in: bool) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;

        while let Some((op, prec)) = self.binary_operator(no_in) {
            if prec < min_prec {
                break;
            }
            self.enter()?;
            self.advance();
            let right = self.binary(prec + 1, no_in)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.unary_inner();
        self.depth -= 1;
        expr
    }

    fn unary_inner(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek().clone();
        let is_unary = match tok.kind {
            TokenKind::Punct => matches!(tok.raw, "!" | "~" | "+" | "-"),
            TokenKind::Ident => matches!(tok.raw, "typeof" | "void" | "delete"),
            _ => false,
        };
        if is_unary {
            self.advance();
            let arg = self.unary()?;
            return Ok(Expr::Unary {
                op: tok.raw.to_string(),
                arg: Box::new(arg),
            });
        }

        if tok.kind == TokenKind::Punct && matches!(tok.raw, "++" | "--") {
            self.advance();
            let arg = self.unary()?;
            return Ok(Expr::Update {
                op: tok.raw.to_string(),
                prefix: true,
                arg: Box::new(arg),
            });
        }

        let expr = self.call_or_member()?;
        let next = self.peek();
        if next.kind == TokenKind::Punct && matches!(next.raw, "++" | "--") && !next.newline_before
        {
            let op = self.advance().raw.to_string();
            return Ok(Expr::Update {
                op,
                prefix: false,
                arg: Box::new(expr),
            });
        }

        Ok(expr)
    }

    fn call_or_member(&mut self) -> Result<Expr, ParseError> {
        let base = self.depth;
        let expr = self.call_or_member_chain();
        self.depth = base;
        expr
    }

    fn call_or_member_chain(&mut self) -> Result<Expr, ParseError> {
        let mut expr = if self.is_keyword("new") {
            self.new_expression()?
        } else {
            self.primary()?
        };

        loop {
            if self.is_punct("(") || self.is_punct(".") || self.is_punct("[") {
                self.enter()?;
            }
            if self.is_punct("(") {
                let args = self.arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if let Some(property) = self.member_suffix()? {
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn new_expression(&mut self) -> Result<Expr, ParseError> {
        let base = self.depth;
        let expr = self.new_expression_inner();
        self.depth = base;
        expr
    }

    fn new_expression_inner(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        self.advance();

        let mut callee = if self.is_keyword("new") {
            self.new_expression()?
        } else {
            self.primary()?
        };
        while self.is_punct(".") || self.is_punct("[") {
            self.enter()?;
            if let Some(property) = self.member_suffix()? {
                callee = Expr::Member {
                    object: Box::new(callee),
                    property,
                };
            }
        }

        let args = if self.is_punct("(") {
            self.arguments()?
        } else {
            Vec::new()
        };

        Ok(Expr::New {
            callee: Box::new(callee),
            args,
        })
    }

    fn member_suffix(&mut self) -> Result<Option<MemberProperty>, ParseError> {
        if self.eat_punct(".") {
            // Reserved words are valid property names (`a.default`).
            return Ok(Some(MemberProperty::Named(self.identifier()?)));
        }
        if self.eat_punct("[") {
            let property = self.expression(false)?;
            self.expect_punct("]")?;
            return Ok(Some(MemberProperty::Computed(Box::new(property))));
        }
        Ok(None)
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        while !self.eat_punct(")") {
            args.push(self.assignment(false)?);
            if !self.is_punct(")") {
                self.expect_punct(",")?;
            }
        }
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Ident => {
                self.advance();
                Ok(match tok.raw {
                    "function" => Expr::Function(Box::new(self.function_rest()?)),
                    "this" => Expr::This,
                    "true" => Expr::Bool(true),
                    "false" => Expr::Bool(false),
                    "null" => Expr::Null,
                    name => Expr::Ident(name.to_string()),
                })
            }
            TokenKind::Number => {
                self.advance();
                Ok(Expr::Number(tok.raw.to_string()))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expr::Str {
                    value,
                    raw: tok.raw.to_string(),
                })
            }
            TokenKind::Regex => {
                self.advance();
                Ok(Expr::Regex(tok.raw.to_string()))
            }
            TokenKind::Punct if tok.raw == "(" => self.paren_expression(),
            TokenKind::Punct if tok.raw == "[" => self.array_literal(),
            TokenKind::Punct if tok.raw == "{" => self.object_literal(),
            _ => Err(self.unexpected("unexpected token")),
        }
    }

    fn array_literal(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("[")?;
        let mut items = Vec::new();
        while !self.eat_punct("]") {
            // Holes (`[a,,b]`) carry nothing worth keeping.
            if self.eat_punct(",") {
                continue;
            }
            items.push(self.assignment(false)?);
            if !self.is_punct("]") {
                self.expect_punct(",")?;
            }
        }
        Ok(Expr::Array(items))
    }

    fn object_literal(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("{")?;
        let mut properties = Vec::new();

        while !self.eat_punct("}") {
            let key = self.property_key()?;

            let next = self.peek();
            let is_accessor = matches!(key.raw.as_str(), "get" | "set")
                && !(next.kind == TokenKind::Punct && matches!(next.raw, ":" | "," | "}"));

            let value = if is_accessor {
                let accessor_key = self.property_key()?;
                let function = self.function_rest()?;
                properties.push(Property {
                    key: accessor_key,
                    value: Expr::Function(Box::new(function)),
                });
                None
            } else {
                self.expect_punct(":")?;
                Some(self.assignment(false)?)
            };

            if let Some(value) = value {
                properties.push(Property { key, value });
            }
            if !self.is_punct("}") {
                self.expect_punct(",")?;
            }
        }

        Ok(Expr::Object(properties))
    }

    fn property_key(&mut self) -> Result<PropertyKey, ParseError> {
        let tok = self.peek().clone();
        let name = match &tok.kind {
            TokenKind::Ident | TokenKind::Number => tok.raw.to_string(),
            TokenKind::Str(value) => value.clone(),
            _ => return Err(self.unexpected("expected property name")),
        };
        self.advance();
        Ok(PropertyKey {
            raw: tok.raw.to_string(),
            name,
        })
    }
}
