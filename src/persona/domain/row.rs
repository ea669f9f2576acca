//! Field readers for heterogeneous store rows.
//!
//! Modern rows carry every setting as a top-level column. Older rows keep them
//! inside a nested `runtime` object, sometimes under a different key. A
//! top-level column wins; a null column counts as absent.

use crate::error::{PersonaError, Result};
use crate::types::{BehaviorWeights, Row, StructuredMap};
use serde_json::Value;

/// Lookup view over a row and its legacy `runtime` object.
pub(crate) struct RowFields<'a> {
    record: &'static str,
    row: &'a Row,
    runtime: Option<&'a Row>,
}

impl<'a> RowFields<'a> {
    pub(crate) fn new(record: &'static str, row: &'a Row) -> Self {
        let runtime = row.get("runtime").and_then(Value::as_object);
        Self {
            record,
            row,
            runtime,
        }
    }

    /// Top-level column only.
    pub(crate) fn column(&self, field: &str) -> Option<&'a Value> {
        non_null(self.row.get(field))
    }

    /// Top-level column, then the legacy `runtime` object.
    pub(crate) fn resolve(&self, field: &str, legacy_aliases: &[&str]) -> Option<&'a Value> {
        self.column(field)
            .or_else(|| self.legacy(field, legacy_aliases))
    }

    /// `runtime.<field>`, then each `runtime.<alias>`.
    pub(crate) fn legacy(&self, field: &str, legacy_aliases: &[&str]) -> Option<&'a Value> {
        let runtime = self.runtime?;
        std::iter::once(field)
            .chain(legacy_aliases.iter().copied())
            .find_map(|key| non_null(runtime.get(key)))
    }

    pub(crate) fn required_string(&self, field: &str) -> Result<String> {
        let value = self
            .column(field)
            .ok_or_else(|| PersonaError::missing(self.record, field))?;
        scalar_to_string(field, value)
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Ids and versions arrive as strings or numbers depending on the column type.
pub(crate) fn scalar_to_string(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(PersonaError::invalid(field, "expected a string or number")),
    }
}

pub(crate) fn string_value(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PersonaError::invalid(field, "expected a string"))
}

pub(crate) fn float_value(field: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| PersonaError::invalid(field, "expected a number"))
}

pub(crate) fn count_value(field: &str, value: &Value) -> Result<u32> {
    let count = match value.as_u64() {
        Some(n) => n,
        None => match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 => f as u64,
            _ => return Err(PersonaError::invalid(field, "expected a non-negative integer")),
        },
    };
    u32::try_from(count).map_err(|_| PersonaError::invalid(field, "value out of range"))
}

/// String array, de-duplicated with first occurrences kept in order.
pub(crate) fn unique_strings(field: &str, value: &Value) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| PersonaError::invalid(field, "expected an array of strings"))?;
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let s = item
            .as_str()
            .ok_or_else(|| PersonaError::invalid(field, "expected an array of strings"))?;
        if !out.iter().any(|existing| existing == s) {
            out.push(s.to_string());
        }
    }
    Ok(out)
}

pub(crate) fn structured_map(field: &str, value: &Value) -> Result<StructuredMap> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| PersonaError::invalid(field, "expected an object"))
}

pub(crate) fn weights_map(field: &str, value: &Value) -> Result<BehaviorWeights> {
    let object = value
        .as_object()
        .ok_or_else(|| PersonaError::invalid(field, "expected an object of numbers"))?;
    object
        .iter()
        .map(|(key, weight)| {
            weight
                .as_f64()
                .map(|w| (key.clone(), w))
                .ok_or_else(|| PersonaError::invalid(field, format!("weight '{}' is not a number", key)))
        })
        .collect()
}
