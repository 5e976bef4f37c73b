// src/schema/mod.rs

//! Token → canonical field lookup tables, one per listing source.
//!
//! A schema is plain data: the extractor never knows which site it is
//! working on, it only asks the schema whether a raw left-hand token matters.

mod rightmove;
mod zoopla;

use crate::domain::CanonicalField;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    Single,
    Multi,
}

/// One row of a schema as written in a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaEntry {
    pub field: CanonicalField,
    pub token: String,
    pub multiplicity: Multiplicity,
}

impl SchemaEntry {
    pub fn single(field: CanonicalField, token: &str) -> Self {
        Self {
            field,
            token: token.to_string(),
            multiplicity: Multiplicity::Single,
        }
    }

    pub fn multi(field: CanonicalField, token: &str) -> Self {
        Self {
            field,
            token: token.to_string(),
            multiplicity: Multiplicity::Multi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: CanonicalField,
    pub multiplicity: Multiplicity,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("token {token} is mapped twice in schema {schema}")]
    DuplicateToken { schema: String, token: String },
    #[error("unknown schema: {0}")]
    Unknown(String),
    #[error("could not read schema file {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("malformed schema document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    name: String,
    entries: Vec<SchemaEntry>,
}

#[derive(Debug, Clone)]
pub struct ExtractionSchema {
    name: String,
    by_token: HashMap<String, FieldDescriptor>,
}

impl ExtractionSchema {
    pub fn new(name: impl Into<String>, entries: Vec<SchemaEntry>) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut by_token = HashMap::with_capacity(entries.len());

        for entry in entries {
            let descriptor = FieldDescriptor {
                field: entry.field,
                multiplicity: entry.multiplicity,
            };
            if by_token.insert(entry.token.clone(), descriptor).is_some() {
                return Err(SchemaError::DuplicateToken {
                    schema: name,
                    token: entry.token,
                });
            }
        }

        Ok(Self { name, by_token })
    }

    /// Built-in schemas by site name.
    pub fn by_name(name: &str) -> Result<Self, SchemaError> {
        match name {
            "rightmove" => Ok(Self::rightmove()),
            "zoopla" => Ok(Self::zoopla()),
            other => Err(SchemaError::Unknown(other.to_string())),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let doc: SchemaDocument = serde_json::from_str(json)?;
        Self::new(doc.name, doc.entries)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| SchemaError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    pub fn rightmove() -> Self {
        Self::from_builtin("rightmove", rightmove::entries())
    }

    pub fn zoopla() -> Self {
        Self::from_builtin("zoopla", zoopla::entries())
    }

    // Built-in tables are covered by tests for uniqueness, so a duplicate
    // here just keeps the later row instead of failing at runtime.
    fn from_builtin(name: &str, entries: Vec<SchemaEntry>) -> Self {
        let by_token = entries
            .into_iter()
            .map(|e| {
                (
                    e.token,
                    FieldDescriptor {
                        field: e.field,
                        multiplicity: e.multiplicity,
                    },
                )
            })
            .collect();

        Self {
            name: name.to_string(),
            by_token,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` means the token is noise.
    pub fn lookup(&self, raw_token: &str) -> Option<FieldDescriptor> {
        self.by_token.get(raw_token).copied()
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }
}

#[cfg(test)]
pub(crate) fn builtin_entries(name: &str) -> Option<Vec<SchemaEntry>> {
    match name {
        "rightmove" => Some(rightmove::entries()),
        "zoopla" => Some(zoopla::entries()),
        _ => None,
    }
}
