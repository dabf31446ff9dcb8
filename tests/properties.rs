//! Property-based tests for rank resolution and formatting.

use proptest::prelude::*;
use spelltip::data_values::resolve;
use spelltip::formatter::{format_level_values, format_number, select_rank};
use spelltip::spell::RankCell;
use spelltip::tags::convert_xml_tags;
use spelltip::value::Value;
use spelltip::{replace_variables, RenderOptions, Spell};

// ===========================================================================
// Generators
// ===========================================================================

/// A per-rank table with its buffer slot: small integers so equal runs
/// actually occur.
fn arb_table() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec((0u8..4).prop_map(f64::from), 1..8)
}

fn arb_nonzero() -> impl Strategy<Value = f64> {
    prop_oneof![
        (1i32..1000).prop_map(f64::from),
        (1i32..100_000).prop_map(|n| f64::from(n) / 1000.0),
    ]
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn resolve_is_scalar_iff_ranks_equal(table in arb_table(), max_rank in 1usize..6) {
        let ranks: Vec<f64> = table.iter().skip(1).take(max_rank).copied().collect();
        match resolve(&table, max_rank) {
            None => prop_assert!(ranks.is_empty()),
            Some(Value::Scalar(x)) => {
                prop_assert!(ranks.iter().all(|r| *r == x));
            }
            Some(Value::Vector(v)) => {
                prop_assert!(ranks.iter().any(|r| *r != ranks[0]));
                prop_assert_eq!(v, ranks);
            }
        }
    }

    #[test]
    fn identical_ranks_collapse(x in arb_nonzero(), n in 1usize..6) {
        let cells = vec![RankCell::Number(x); n];
        prop_assert_eq!(format_level_values(&cells, n, false), format_number(x));
    }

    #[test]
    fn format_number_has_at_most_three_decimals(x in arb_nonzero()) {
        let s = format_number(x);
        if let Some((_, frac)) = s.split_once('.') {
            prop_assert!(frac.len() <= 3);
            prop_assert!(!frac.ends_with('0'));
        }
    }

    #[test]
    fn select_rank_picks_one_entry(values in proptest::collection::vec(1u16..500, 2..6), level in 0usize..8) {
        let run = values.iter().map(u16::to_string).collect::<Vec<_>>().join("/");
        let idx = level.max(1).min(values.len()) - 1;
        prop_assert_eq!(select_rank(&run, level), values[idx].to_string());
    }

    #[test]
    fn tag_pairs_stay_balanced(words in proptest::collection::vec("[a-z]{1,6}", 1..5)) {
        let text = words
            .iter()
            .map(|w| format!("<keywordMajor>{}</keywordMajor>", w))
            .collect::<Vec<_>>()
            .join(" and ");
        let out = convert_xml_tags(&text);
        prop_assert_eq!(out.matches("<span").count(), words.len());
        prop_assert_eq!(out.matches("</span>").count(), words.len());
        prop_assert_eq!(out.matches(" and ").count(), words.len() - 1);
    }

    #[test]
    fn plain_text_passes_through(text in "[A-Za-z ,.]{0,40}") {
        let out = replace_variables(&text, &Spell::default(), &RenderOptions::default(), None);
        let collapsed = text.split(' ').filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");
        prop_assert_eq!(out.trim(), collapsed.as_str());
    }
}
