//! Name reconciliation between the two data sources.
//!
//! Template placeholders use lower-case names (`armorshredpercent`,
//! `basedamageNL`) while the community tables use CamelCase keys
//! (`ArmorShredPercent`, `BaseDamage`). Matching cascades from strict to
//! loose and stops at the first stage that finds something:
//!
//! 1. exact, case-insensitive
//! 2. the same after dropping a trailing `NL` level indicator
//! 3. substring in either direction (closest length wins)
//! 4. CamelCase token overlap (best coverage wins)
//!
//! Keys are visited in the order given; ties go to the earliest key.

use convert_case::{Case, Casing};

/// Shortest name considered for substring matching.
const MIN_SUBSTRING_LEN: usize = 4;

/// Shortest CamelCase token that counts toward an overlap.
const MIN_TOKEN_LEN: usize = 3;

/// Find the table key that `name` most plausibly refers to.
pub fn resolve_by_fuzzy_name<'a>(
    name: &str,
    keys: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let keys: Vec<&'a str> = keys.into_iter().collect();
    let name = name.trim();
    if name.is_empty() || keys.is_empty() {
        return None;
    }

    if let Some(key) = exact(name, &keys) {
        return Some(key);
    }

    let stripped = strip_level_suffix(name);
    if stripped.len() != name.len() {
        if let Some(key) = exact(stripped, &keys) {
            return Some(key);
        }
    }

    let query = stripped.to_ascii_lowercase();
    if let Some(key) = substring(&query, &keys) {
        return Some(key);
    }

    token_overlap(stripped, &query, &keys)
}

/// Drop a trailing `NL` (next-level) marker: `basedamageNL` → `basedamage`.
pub fn strip_level_suffix(name: &str) -> &str {
    let len = name.len();
    if len > 2 && name.is_char_boundary(len - 2) && name[len - 2..].eq_ignore_ascii_case("nl") {
        &name[..len - 2]
    } else {
        name
    }
}

fn exact<'a>(name: &str, keys: &[&'a str]) -> Option<&'a str> {
    keys.iter().copied().find(|key| key.eq_ignore_ascii_case(name))
}

fn substring<'a>(query: &str, keys: &[&'a str]) -> Option<&'a str> {
    if query.len() < MIN_SUBSTRING_LEN {
        return None;
    }
    let mut best: Option<(usize, &'a str)> = None;
    for &key in keys {
        let lower = key.to_ascii_lowercase();
        if lower.len() < MIN_SUBSTRING_LEN {
            continue;
        }
        if lower.contains(query) || query.contains(lower.as_str()) {
            let distance = lower.len().abs_diff(query.len());
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, key));
            }
        }
    }
    best.map(|(_, key)| key)
}

fn token_overlap<'a>(name: &str, query: &str, keys: &[&'a str]) -> Option<&'a str> {
    let query_tokens = camel_tokens(name);
    let mut best: Option<(usize, &'a str)> = None;
    for &key in keys {
        let lower = key.to_ascii_lowercase();

        // Key tokens found inside the query.
        let forward: usize = camel_tokens(key)
            .iter()
            .filter(|t| query.contains(t.as_str()))
            .map(String::len)
            .sum();

        // Query tokens found inside the key, when the query has CamelCase.
        let backward: usize = if query_tokens.len() > 1 {
            query_tokens
                .iter()
                .filter(|t| lower.contains(t.as_str()))
                .map(String::len)
                .sum()
        } else {
            0
        };

        let score = forward.max(backward);
        // At least half of the query has to be covered.
        if score == 0 || score * 2 < query.len() {
            continue;
        }
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, key));
        }
    }
    best.map(|(_, key)| key)
}

/// Split a CamelCase / snake_case / digit-separated name into lower-case
/// tokens of at least [`MIN_TOKEN_LEN`] characters.
///
/// `ADRatioPerSecond` → `["ratio", "per", "second"]` (`ad` is too short).
pub fn camel_tokens(name: &str) -> Vec<String> {
    name.to_case(Case::Snake)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &[
        "ArmorShredPercent",
        "AttackRangeBonus",
        "BaseDamage",
        "BonusDamageTT",
        "CooldownDecrease",
        "ShredDuration",
    ];

    fn find(name: &str) -> Option<&'static str> {
        resolve_by_fuzzy_name(name, KEYS.iter().copied())
    }

    #[test]
    fn test_exact_case_insensitive() {
        assert_eq!(find("basedamage"), Some("BaseDamage"));
    }

    #[test]
    fn test_level_suffix() {
        assert_eq!(find("basedamageNL"), Some("BaseDamage"));
        assert_eq!(strip_level_suffix("nl"), "nl");
        assert_eq!(strip_level_suffix("cooldownnl"), "cooldown");
    }

    #[test]
    fn test_substring_either_direction() {
        assert_eq!(find("armorshred"), Some("ArmorShredPercent"));
        assert_eq!(find("totalshredduration"), Some("ShredDuration"));
    }

    #[test]
    fn test_substring_prefers_closest_length() {
        let keys = ["DamageBonusTotal", "DamageBonus"];
        assert_eq!(
            resolve_by_fuzzy_name("damagebon", keys.iter().copied()),
            Some("DamageBonus")
        );
    }

    #[test]
    fn test_token_overlap() {
        assert_eq!(find("percentarmorshred"), Some("ArmorShredPercent"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(find("xyz"), None);
        assert_eq!(find(""), None);
        assert_eq!(resolve_by_fuzzy_name("basedamage", std::iter::empty()), None);
    }

    #[test]
    fn test_camel_tokens() {
        assert_eq!(camel_tokens("ADRatioPerSecond"), vec!["ratio", "per", "second"]);
        assert_eq!(camel_tokens("BonusDamageTT"), vec!["bonus", "damage"]);
        assert_eq!(camel_tokens("q_base_damage2"), vec!["base", "damage"]);
    }
}
