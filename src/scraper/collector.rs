// collector.rs
use crate::domain::availability::resolve_availability;
use crate::domain::{CanonicalField, FieldKind, FieldValue};
use crate::js::ast::Expr;
use crate::js::Assignment;
use crate::schema::{ExtractionSchema, Multiplicity};
use crate::scraper::ExtractionError;
use std::collections::BTreeMap;
use tracing::debug;

/// Accumulates raw values for one listing while its fragments are walked.
///
/// Single fields keep the first scalar seen; multi fields keep every value
/// in walk order. Values stay as strings until `finish` types them.
pub struct FieldCollector<'s> {
    schema: &'s ExtractionSchema,
    captured: BTreeMap<CanonicalField, Vec<String>>,
}

impl<'s> FieldCollector<'s> {
    pub fn new(schema: &'s ExtractionSchema) -> Self {
        Self {
            schema,
            captured: BTreeMap::new(),
        }
    }

    pub fn offer(&mut self, assignment: Assignment<'_>) {
        let Some(descriptor) = self.schema.lookup(assignment.token) else {
            return;
        };

        match descriptor.multiplicity {
            Multiplicity::Single => {
                if self.captured.contains_key(&descriptor.field) {
                    return;
                }
                if let Some(value) = scalar(assignment.value) {
                    self.captured.insert(descriptor.field, vec![value]);
                }
            }
            Multiplicity::Multi => {
                let values = scalars(assignment.value);
                if !values.is_empty() {
                    self.captured
                        .entry(descriptor.field)
                        .or_default()
                        .extend(values);
                }
            }
        }
    }

    pub fn raw(&self, field: CanonicalField) -> Option<&str> {
        self.captured
            .get(&field)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Types every captured value. The availability date falls back to the
    /// description; anything still unresolved is left out for the record to null-fill.
    pub fn finish(self, description: Option<&str>) -> BTreeMap<CanonicalField, FieldValue> {
        let script_date = self.raw(CanonicalField::DateAvailable).map(str::to_string);

        let mut fields: BTreeMap<CanonicalField, FieldValue> = self
            .captured
            .into_iter()
            .filter(|(field, _)| field.kind() != FieldKind::Date)
            .map(|(field, values)| (field, convert(field.kind(), values)))
            .collect();

        match resolve_availability(script_date.as_deref(), description) {
            Some(date) => {
                fields.insert(CanonicalField::DateAvailable, FieldValue::Date(date));
            }
            None => {
                let err = ExtractionError::UnparsableDate {
                    script_value: script_date,
                };
                debug!(error = %err, "availability left empty");
            }
        }

        fields
    }
}

fn convert(kind: FieldKind, values: Vec<String>) -> FieldValue {
    let first = values.first().map(|v| v.trim());

    match kind {
        FieldKind::List => FieldValue::List(values),
        FieldKind::Text => match first {
            Some(v) if !v.is_empty() => FieldValue::Text(v.to_string()),
            _ => FieldValue::Null,
        },
        FieldKind::Float => first
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|f| f.is_finite())
            .map_or(FieldValue::Null, FieldValue::Float),
        FieldKind::Integer => first
            .and_then(|v| {
                v.parse::<i64>().ok().or_else(|| {
                    v.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| f as i64)
                })
            })
            .map_or(FieldValue::Null, FieldValue::Integer),
        // resolved separately in `finish`
        FieldKind::Date => FieldValue::Null,
    }
}

/// Scalar text of a literal right-hand side. `null`, identifiers, calls and
/// containers give `None` and don't count as a value.
fn scalar(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Str { value, .. } => Some(value.replace('"', "")),
        Expr::Number(raw) => Some(raw.clone()),
        Expr::Bool(b) => Some(b.to_string()),
        Expr::Unary { op, arg } => match (op.as_str(), arg.as_ref()) {
            ("-", Expr::Number(raw)) => Some(negate(raw)),
            ("+", Expr::Number(raw)) => Some(raw.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Array right-hand sides contribute one value per scalar element.
fn scalars(expr: &Expr) -> Vec<String> {
    match expr {
        Expr::Array(items) => items.iter().filter_map(scalar).collect(),
        other => scalar(other).into_iter().collect(),
    }
}

fn negate(raw: &str) -> String {
    match raw.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None => format!("-{raw}"),
    }
}
