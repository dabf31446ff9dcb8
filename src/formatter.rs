use crate::spell::RankCell;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A slash-joined run of numbers such as `8/7.5/7`.
static RANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?(?:/-?\d+(?:\.\d+)?)+").unwrap());

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

/// Format a number for display: integers without a decimal point,
/// everything else with at most 3 decimals and no trailing zeros.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    if x.fract() == 0.0 {
        return format!("{}", x);
    }
    format_fixed_trimmed(x, 3)
}

/// `digits` fixed decimals, then trailing zeros (and a bare `.`) removed.
pub fn format_fixed_trimmed(x: f64, digits: usize) -> String {
    if !x.is_finite() {
        return format_number(x);
    }
    let fixed = format!("{:.*}", digits, x);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format per-rank cells as `"1/2/3"`, or `"1"` when every rank is equal.
///
/// With `trim_buffer` the leading buffer slot is dropped first. Null, empty
/// and zero cells are skipped, and at most `max_rank` values are kept
/// (`0` means no limit). Returns an empty string when nothing survives.
pub fn format_level_values(cells: &[RankCell], max_rank: usize, trim_buffer: bool) -> String {
    join_ranks(&level_numbers(cells, max_rank, trim_buffer))
}

/// The numeric part of [`format_level_values`], before joining.
pub fn level_numbers(cells: &[RankCell], max_rank: usize, trim_buffer: bool) -> Vec<f64> {
    let start = if trim_buffer && cells.len() > 1 { 1 } else { 0 };
    let values = cells[start..]
        .iter()
        .filter(|cell| !cell.is_blank_or_zero())
        .filter_map(RankCell::as_number);
    if max_rank > 0 {
        values.take(max_rank).collect()
    } else {
        values.collect()
    }
}

/// Join already-resolved numbers, collapsing identical entries.
pub fn join_ranks(values: &[f64]) -> String {
    let formatted: Vec<String> = values.iter().map(|v| format_number(*v)).collect();
    match formatted.first() {
        None => String::new(),
        Some(first) if formatted.iter().all(|f| f == first) => first.clone(),
        Some(_) => formatted.join("/"),
    }
}

/// Like [`join_ranks`], with `digits` fixed decimals (trailing zeros trimmed)
/// instead of the default three.
pub fn join_ranks_with_precision(values: &[f64], digits: usize) -> String {
    let formatted: Vec<String> = values
        .iter()
        .map(|v| format_fixed_trimmed(*v, digits))
        .collect();
    match formatted.first() {
        None => String::new(),
        Some(first) if formatted.iter().all(|f| f == first) => first.clone(),
        Some(_) => formatted.join("/"),
    }
}

/// Reduce every `a/b/c` run in `text` to the entry for `level` (1-based,
/// clamped to the run length).
pub fn select_rank(text: &str, level: usize) -> String {
    RANK_RUN
        .replace_all(text, |caps: &Captures| {
            let entries: Vec<&str> = caps[0].split('/').collect();
            let idx = level.max(1).min(entries.len()) - 1;
            entries[idx].to_string()
        })
        .into_owned()
}

/// Upper bound on a requested decimal count.
pub const MAX_PRECISION: usize = 20;

/// Render every number in `text` with exactly `precision` decimals, capped
/// at [`MAX_PRECISION`].
pub fn apply_numeric_precision(text: &str, precision: usize) -> String {
    let precision = precision.min(MAX_PRECISION);
    NUMBER
        .replace_all(text, |caps: &Captures| match caps[0].parse::<f64>() {
            Ok(num) => format!("{:.*}", precision, num),
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[f64]) -> Vec<RankCell> {
        values.iter().map(|v| RankCell::Number(*v)).collect()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(2.3333), "2.333");
        assert_eq!(format_number(2.333), "2.333");
        assert_eq!(format_number(7.5), "7.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(10.000000000000002), "10");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_format_level_values_collapse() {
        assert_eq!(format_level_values(&nums(&[20.0, 20.0, 20.0]), 3, false), "20");
    }

    #[test]
    fn test_format_level_values_join_and_truncate() {
        let cells = nums(&[8.0, 7.5, 7.0, 6.5, 6.0, 5.5]);
        assert_eq!(format_level_values(&cells, 5, false), "8/7.5/7/6.5/6");
    }

    #[test]
    fn test_format_level_values_buffer_and_blanks() {
        let cells = vec![
            RankCell::Number(99.0),
            RankCell::Text("10".into()),
            RankCell::Null,
            RankCell::Text("".into()),
            RankCell::Text("0".into()),
            RankCell::Number(20.0),
        ];
        assert_eq!(format_level_values(&cells, 5, true), "10/20");
        assert_eq!(format_level_values(&cells, 5, false), "99/10/20");
    }

    #[test]
    fn test_format_level_values_empty() {
        assert_eq!(format_level_values(&nums(&[0.0, 0.0]), 5, false), "");
        assert_eq!(format_level_values(&[], 5, true), "");
    }

    #[test]
    fn test_select_rank() {
        assert_eq!(select_rank("8/7.5/7/6.5/6", 1), "8");
        assert_eq!(select_rank("8/7.5/7/6.5/6", 2), "7.5");
        assert_eq!(select_rank("8/7.5/7", 9), "7");
        assert_eq!(select_rank("25/30/35% + 50% AD", 0), "25% + 50% AD");
    }

    #[test]
    fn test_apply_numeric_precision() {
        assert_eq!(apply_numeric_precision("33.333/40", 1), "33.3/40.0");
        assert_eq!(apply_numeric_precision("12%", 0), "12%");
    }

    #[test]
    fn test_apply_numeric_precision_is_capped() {
        let out = apply_numeric_precision("1.5", 4_000_000_000);
        assert_eq!(out, format!("1.5{}", "0".repeat(MAX_PRECISION - 1)));
    }

    #[test]
    fn test_format_fixed_trimmed() {
        assert_eq!(format_fixed_trimmed(0.3, 4), "0.3");
        assert_eq!(format_fixed_trimmed(1.0, 2), "1");
        assert_eq!(format_fixed_trimmed(0.00012, 2), "0");
    }
}
