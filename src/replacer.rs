//! Full-template `{{ expr }}` substitution.
//!
//! Every placeholder is resolved independently through a fixed cascade:
//!
//! 1. spell-native tables picked by name (cooldown, ammo recharge, range, cost)
//! 2. `e<N>` effect-burn references
//! 3. the spell calculation graph
//! 4. data values, through the fuzzy-name cascade
//!
//! A placeholder nothing resolves disappears. Failures never leave the
//! placeholder that caused them.

use crate::ast::Expr;
use crate::calc::{self, CalcContext};
use crate::cleanup;
use crate::community::CommunityData;
use crate::data_values::{self, MatchKind};
use crate::formatter::{apply_numeric_precision, join_ranks, level_numbers, select_rank};
use crate::fuzzy::strip_level_suffix;
use crate::options::RenderOptions;
use crate::parser::parse_placeholder;
use crate::spell::{parse_burn_numbers, RankCell, Spell};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap());

static EFFECT_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^e(\d+)$").unwrap());

/// Substitute every placeholder of `template` and clean up the result.
pub fn replace_variables(
    template: &str,
    spell: &Spell,
    options: &RenderOptions,
    community: Option<&CommunityData>,
) -> String {
    let empty = CommunityData::default();
    let ctx = CalcContext::new(spell, community.unwrap_or(&empty));

    let text = cleanup::normalize_operators(template);
    let text = cleanup::strip_unresolvable(&text);

    let mut resolved: BTreeSet<String> = BTreeSet::new();
    let substituted = PLACEHOLDER.replace_all(&text, |caps: &Captures| {
        let raw = caps[1].trim();
        if raw.to_ascii_lowercase().contains("gamemodeinteger") {
            return String::new();
        }

        let placeholder = parse_placeholder(raw);
        let name = placeholder.expr.name().to_string();
        if resolved.contains(&name) {
            tracing::debug!("dropping repeated placeholder \"{}\"", name);
            return String::new();
        }

        let percent_follows = caps
            .get(0)
            .is_some_and(|m| text[m.end()..].starts_with('%'));
        let Some(mut out) = resolve_expr(&placeholder.expr, &ctx, percent_follows) else {
            tracing::debug!("placeholder \"{}\" unresolved for {}", raw, spell.id);
            return String::new();
        };
        resolved.insert(name);

        if let Some(precision) = placeholder.precision {
            out = apply_numeric_precision(&out, precision);
        }
        if !options.show_all_levels {
            out = select_rank(&out, options.level);
        }
        out
    });

    let cleaned = cleanup::cleanup_residue(&substituted);
    cleanup::remove_duplicate_percent_runs(&cleaned)
}

/// Resolve one parsed placeholder, or `None` when every step comes up empty.
pub fn resolve_expr(expr: &Expr, ctx: &CalcContext<'_>, percent_follows: bool) -> Option<String> {
    spell_native(expr, ctx)
        .or_else(|| effect_reference(expr, ctx))
        .or_else(|| calc::resolve_calculation(expr.name(), ctx))
        .or_else(|| data_value(expr, ctx, percent_follows))
}

/// The spell table a placeholder name points at, judged by its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeField {
    Cooldown,
    AmmoRecharge,
    Range,
    Cost,
}

impl NativeField {
    pub fn classify(name: &str) -> Option<NativeField> {
        let key = strip_level_suffix(name.trim()).to_ascii_lowercase();
        if key == "cooldown" || key.ends_with("cooldown") {
            Some(NativeField::Cooldown)
        } else if key.contains("ammorecharge") {
            Some(NativeField::AmmoRecharge)
        } else if key.contains("range") {
            Some(NativeField::Range)
        } else if key.ends_with("cost") {
            Some(NativeField::Cost)
        } else {
            None
        }
    }
}

/// Per-rank numbers for a spell-native field; empty when there is no data.
pub fn native_numbers(field: NativeField, ctx: &CalcContext<'_>) -> Vec<f64> {
    let max_rank = ctx.spell.maxrank;
    match field {
        NativeField::Cooldown => {
            let numbers = level_numbers(&ctx.spell.cooldown_cells(), max_rank, false);
            if numbers.is_empty() {
                // Charge-based abilities publish a zero cooldown.
                ammo_numbers(ctx)
            } else {
                numbers
            }
        }
        NativeField::AmmoRecharge => ammo_numbers(ctx),
        NativeField::Range => level_numbers(&ctx.spell.range_cells(), max_rank, false),
        NativeField::Cost => level_numbers(&ctx.spell.cost_cells(), max_rank, false),
    }
}

fn ammo_numbers(ctx: &CalcContext<'_>) -> Vec<f64> {
    let Some(table) = ctx.community.ammo_recharge_table() else {
        return Vec::new();
    };
    let cells: Vec<RankCell> = table.iter().copied().map(RankCell::from).collect();
    level_numbers(&cells, ctx.spell.maxrank, true)
}

fn spell_native(expr: &Expr, ctx: &CalcContext<'_>) -> Option<String> {
    let field = NativeField::classify(expr.name())?;
    let numbers = native_numbers(field, ctx);
    if numbers.is_empty() {
        return None;
    }
    let applied: Vec<f64> = numbers.iter().map(|x| expr.apply_to(*x)).collect();
    Some(join_ranks(&applied))
}

/// `e3` → `effectBurn[3]`. Index 0 is never a valid reference.
fn effect_reference(expr: &Expr, ctx: &CalcContext<'_>) -> Option<String> {
    let index: usize = EFFECT_REF.captures(expr.name())?[1].parse().ok()?;
    if index == 0 {
        return None;
    }
    let numbers = parse_burn_numbers(ctx.effect_burn(index)?);
    if numbers.is_empty() {
        return None;
    }
    let applied: Vec<f64> = numbers.iter().map(|x| expr.apply_to(*x)).collect();
    Some(join_ranks(&applied))
}

/// Data-value lookup. A loosely matched value strictly between 0 and 1 with
/// no formula of its own is taken to be a fraction and shown as a percent.
fn data_value(expr: &Expr, ctx: &CalcContext<'_>, percent_follows: bool) -> Option<String> {
    let (value, kind) =
        data_values::lookup_fuzzy(&ctx.community.data_values, expr.name(), ctx.spell.maxrank)?;

    if kind == MatchKind::Loose && !expr.is_formula() && value.is_fraction() {
        let scaled = data_values::scale_by_100(&value).to_tooltip_string();
        return Some(if percent_follows {
            scaled
        } else {
            format!("{}%", scaled)
        });
    }

    let text = data_values::apply_formula(&value, expr).to_tooltip_string();
    (!text.is_empty()).then_some(text)
}
