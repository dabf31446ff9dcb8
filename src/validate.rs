use crate::community::*;
use crate::data_values::find_table;
use std::collections::BTreeSet;

// ── Error types ─────────────────────────────────────────────────────

/// A problem found in a calculation graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub message: String,
    /// Where the problem sits (e.g. ["TotalDamage", "mFormulaParts", "1"]).
    pub path: Vec<String>,
    /// Machine-readable error code.
    pub code: &'static str,
}

impl ValidationError {
    fn new(code: &'static str, path: Vec<String>, message: String) -> Self {
        ValidationError {
            message,
            path,
            code,
        }
    }
}

// ── Graph validation ────────────────────────────────────────────────

/// Check every calculation for dangling references, cycles and node types
/// the evaluator cannot handle.
///
/// Returns an empty vec when every calculation can be evaluated.
pub fn validate_calculations(data: &CommunityData) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (key, node) in &data.spell_calculations {
        match node {
            CalculationNode::Basic(basic) => check_basic(key, basic, data, &mut errors),
            CalculationNode::Modified(modified) => {
                check_modified(key, modified, data, &mut errors)
            }
            CalculationNode::Unsupported => errors.push(ValidationError::new(
                "unsupported-calculation",
                vec![key.clone()],
                format!("Calculation \"{}\" has an unsupported type", key),
            )),
        }
    }
    errors
}

fn check_basic(
    key: &str,
    basic: &BasicCalculation,
    data: &CommunityData,
    errors: &mut Vec<ValidationError>,
) {
    for (index, part) in basic.parts.iter().enumerate() {
        let path = || {
            vec![
                key.to_string(),
                "mFormulaParts".to_string(),
                index.to_string(),
            ]
        };
        for name in part_data_values(part) {
            check_data_value(name, path(), data, errors);
        }
    }
    if let Some(name) = basic.multiplier.as_ref().and_then(|m| m.data_value.as_deref()) {
        check_data_value(name, vec![key.to_string(), "mMultiplier".to_string()], data, errors);
    }
}

fn check_modified(
    key: &str,
    modified: &ModifiedCalculation,
    data: &CommunityData,
    errors: &mut Vec<ValidationError>,
) {
    let path = vec![key.to_string(), "mModifiedGameCalculation".to_string()];
    match modified.inner.as_deref() {
        None => errors.push(ValidationError::new(
            "missing-calculation",
            path,
            format!("Calculation \"{}\" does not name the calculation it modifies", key),
        )),
        Some(inner) if !data.spell_calculations.contains_key(inner) => {
            errors.push(ValidationError::new(
                "missing-calculation",
                path,
                format!("Calculation \"{}\" modifies unknown calculation \"{}\"", key, inner),
            ))
        }
        Some(_) => {
            if let Some(cycle) = find_cycle(key, data) {
                errors.push(ValidationError::new(
                    "circular-reference",
                    path,
                    format!("Circular reference: {}", cycle.join(" -> ")),
                ));
            }
        }
    }
    if let Some(name) = modified.multiplier.as_ref().and_then(|m| m.data_value.as_deref()) {
        check_data_value(name, vec![key.to_string(), "mMultiplier".to_string()], data, errors);
    }
}

fn check_data_value(
    name: &str,
    path: Vec<String>,
    data: &CommunityData,
    errors: &mut Vec<ValidationError>,
) {
    if find_table(&data.data_values, name).is_none() {
        errors.push(ValidationError::new(
            "missing-data-value",
            path,
            format!("Data value \"{}\" does not exist", name),
        ));
    }
}

/// Data values a formula part reads.
fn part_data_values(part: &FormulaPart) -> Vec<&str> {
    match part {
        FormulaPart::NamedDataValue { data_value }
        | FormulaPart::StatRatio { data_value, .. } => data_value.as_deref().into_iter().collect(),
        FormulaPart::ProductOfSubParts { part1, part2 } => [part1, part2]
            .into_iter()
            .flatten()
            .filter(|sub| sub.kind() == SubPartKind::NamedDataValue)
            .filter_map(|sub| sub.data_value.as_deref())
            .collect(),
        _ => Vec::new(),
    }
}

/// Follow the modifier chain starting at `start`; if it comes back to
/// `start`, return the keys along the loop.
fn find_cycle(start: &str, data: &CommunityData) -> Option<Vec<String>> {
    let mut chain = vec![start.to_string()];
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    seen.insert(start);
    let mut current = start;
    loop {
        let CalculationNode::Modified(modified) = data.spell_calculations.get(current)? else {
            return None;
        };
        let next = modified.inner.as_deref()?;
        chain.push(next.to_string());
        if next == start {
            return Some(chain);
        }
        if !seen.insert(next) {
            // A loop that does not pass through `start`; reported from its
            // own members.
            return None;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> CommunityData {
        serde_json::from_value(value).unwrap()
    }

    fn codes(errors: &[ValidationError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.code).collect()
    }

    #[test]
    fn test_valid_graph() {
        let d = data(json!({
            "DataValues": { "BaseDamage": [0, 10, 20], "Mult": [0, 2, 2] },
            "mSpellCalculations": {
                "Base": {
                    "__type": "GameCalculation",
                    "mFormulaParts": [{ "__type": "NamedDataValueCalculationPart", "mDataValue": "basedamage" }]
                },
                "Scaled": {
                    "__type": "GameCalculationModified",
                    "mModifiedGameCalculation": "Base",
                    "mMultiplier": { "mDataValue": "Mult" }
                }
            }
        }));
        assert!(validate_calculations(&d).is_empty());
    }

    #[test]
    fn test_missing_references() {
        let d = data(json!({
            "mSpellCalculations": {
                "Base": {
                    "__type": "GameCalculation",
                    "mFormulaParts": [
                        { "__type": "NumberCalculationPart", "mNumber": 1 },
                        { "__type": "StatByNamedDataValueCalculationPart", "mDataValue": "ADRatio", "mStat": 2 }
                    ]
                },
                "Dangling": {
                    "__type": "GameCalculationModified",
                    "mModifiedGameCalculation": "Nowhere"
                }
            }
        }));
        let errors = validate_calculations(&d);
        assert_eq!(codes(&errors), vec!["missing-data-value", "missing-calculation"]);
        assert_eq!(errors[0].path, vec!["Base", "mFormulaParts", "1"]);
        assert_eq!(errors[1].path, vec!["Dangling", "mModifiedGameCalculation"]);
    }

    #[test]
    fn test_cycle_and_unsupported() {
        let d = data(json!({
            "mSpellCalculations": {
                "A": { "__type": "GameCalculationModified", "mModifiedGameCalculation": "B" },
                "B": { "__type": "GameCalculationModified", "mModifiedGameCalculation": "A" },
                "C": { "__type": "GameCalculationModified", "mModifiedGameCalculation": "A" },
                "D": { "__type": "Mystery" }
            }
        }));
        let errors = validate_calculations(&d);
        assert_eq!(
            codes(&errors),
            vec!["circular-reference", "circular-reference", "unsupported-calculation"]
        );
        assert_eq!(errors[0].message, "Circular reference: A -> B -> A");
    }

    #[test]
    fn test_product_sub_parts() {
        let d = data(json!({
            "mSpellCalculations": {
                "P": {
                    "__type": "GameCalculation",
                    "mFormulaParts": [{
                        "__type": "ProductOfSubPartsCalculationPart",
                        "mPart1": { "__type": "NamedDataValueCalculationPart", "mDataValue": "Missing" },
                        "mPart2": { "__type": "NumberCalculationPart", "mNumber": 2 }
                    }]
                }
            }
        }));
        let errors = validate_calculations(&d);
        assert_eq!(codes(&errors), vec!["missing-data-value"]);
    }
}
