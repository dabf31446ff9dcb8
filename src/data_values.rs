use crate::ast::Expr;
use crate::fuzzy::resolve_by_fuzzy_name;
use crate::value::Value;
use std::collections::BTreeMap;

/// Collapse a per-rank table to a [`Value`] for ranks `1..=max_rank`.
///
/// Index 0 is a buffer slot and always dropped. Returns `None` when no rank
/// survives; a scalar when every surviving entry equals the first.
pub fn resolve(table: &[f64], max_rank: usize) -> Option<Value> {
    let end = table.len().min(max_rank.saturating_add(1));
    if end <= 1 {
        return None;
    }
    let ranks = &table[1..end];
    let first = ranks[0];
    if ranks.iter().all(|v| *v == first) {
        Some(Value::Scalar(first))
    } else {
        Some(Value::Vector(ranks.to_vec()))
    }
}

/// Case-insensitive exact lookup of a table by name.
pub fn find_table<'a>(tables: &'a BTreeMap<String, Vec<f64>>, name: &str) -> Option<&'a [f64]> {
    if name.is_empty() {
        return None;
    }
    tables
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, table)| table.as_slice())
}

/// Resolve a data value by exact (case-insensitive) name.
pub fn lookup(tables: &BTreeMap<String, Vec<f64>>, name: &str, max_rank: usize) -> Option<Value> {
    resolve(find_table(tables, name)?, max_rank)
}

/// How a data value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Loose,
}

/// Resolve a data value through the full fuzzy-name cascade.
pub fn lookup_fuzzy(
    tables: &BTreeMap<String, Vec<f64>>,
    name: &str,
    max_rank: usize,
) -> Option<(Value, MatchKind)> {
    if let Some(value) = lookup(tables, name, max_rank) {
        return Some((value, MatchKind::Exact));
    }
    let key = resolve_by_fuzzy_name(name, tables.keys().map(String::as_str))?;
    tracing::debug!("data value \"{}\" loosely matched \"{}\"", name, key);
    let value = resolve(&tables[key], max_rank)?;
    Some((value, MatchKind::Loose))
}

/// Apply a parsed formula to a resolved value.
pub fn apply_formula(value: &Value, expr: &Expr) -> Value {
    value.apply_formula(expr)
}

/// Multiply by 100 without rounding.
pub fn scale_by_100(value: &Value) -> Value {
    value.scale_by_100()
}
