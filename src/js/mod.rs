// src/js/mod.rs

//! Just enough JavaScript to read the inline scripts listing pages ship:
//! a tokenizer, an ES5-subset parser producing a syntax tree, and a walker
//! that reports assignment nodes.

pub mod ast;
mod lexer;
mod parser;
mod walker;

use thiserror::Error;

pub use parser::parse;
pub use walker::{walk_assignments, Assignment};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}
