//! The per-rank stat lines listed under a tooltip (`leveltip`).

use crate::ast::Expr;
use crate::calc::{self, CalcContext};
use crate::community::CommunityData;
use crate::data_values;
use crate::formatter::join_ranks;
use crate::parser::parse;
use crate::replacer::{native_numbers, NativeField};
use crate::spell::{parse_burn_numbers, Spell};
use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{\s*([^}]+?)\s*\}\}").unwrap());
static EFFECT_AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^effect(\d+)amount$").unwrap());
static EFFECT_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^e(\d+)$").unwrap());

const RESOURCE_TOKEN: &str = "@AbilityResourceName@";

/// Render `label: [value]` lines for every leveltip pair that resolves,
/// joined with `<br />`. Empty when nothing resolves.
pub fn format_leveltip_stats(spell: &Spell, community: Option<&CommunityData>) -> String {
    let Some(leveltip) = &spell.leveltip else {
        return String::new();
    };
    let empty = CommunityData::default();
    let ctx = CalcContext::new(spell, community.unwrap_or(&empty));

    let lines: Vec<String> = leveltip
        .label
        .iter()
        .zip(&leveltip.effect)
        .filter_map(|(label, effect)| format_line(label, effect, &ctx))
        .collect();
    lines.join("<br />")
}

fn format_line(label: &str, effect: &str, ctx: &CalcContext<'_>) -> Option<String> {
    let caps = FIRST_PLACEHOLDER.captures(effect)?;
    let whole = caps.get(0)?;
    let expr = parse(&caps[1]);

    let display_label = label.replace(RESOURCE_TOKEN, ctx.spell.resource_name());
    if display_label.contains("{{") || display_label.contains("}}") {
        tracing::debug!("skipping leveltip \"{}\" with unresolved label", label);
        return None;
    }

    let (value, from_tables) = resolve(&expr, ctx)?;

    // "slow" labels only mark raw table values as percentages.
    let lower = label.to_lowercase();
    let label_percent = label.contains('%')
        || lower.contains("percent")
        || (from_tables && lower.contains("slow"));
    let effect_percent = effect[whole.end()..].trim_start().starts_with('%');
    let value = if (label_percent || effect_percent) && !value.contains('%') {
        value
            .split('/')
            .map(|v| if v.is_empty() { v.to_string() } else { format!("{}%", v) })
            .collect::<Vec<_>>()
            .join("/")
    } else {
        value
    };

    Some(format!("{}: [{}]", display_label, value))
}

/// Calculations, then data values, then the spell's own tables. The flag is
/// set when the value came from the spell's tables.
fn resolve(expr: &Expr, ctx: &CalcContext<'_>) -> Option<(String, bool)> {
    calc::resolve_calculation(expr.name(), ctx)
        .or_else(|| {
            let (value, _) = data_values::lookup_fuzzy(
                &ctx.community.data_values,
                expr.name(),
                ctx.spell.maxrank,
            )?;
            Some(data_values::apply_formula(&value, expr).to_tooltip_string())
        })
        .filter(|v| !v.trim().is_empty())
        .map(|v| (v, false))
        .or_else(|| legacy(expr, ctx).map(|v| (v, true)))
}

fn legacy(expr: &Expr, ctx: &CalcContext<'_>) -> Option<String> {
    let name = match EFFECT_AMOUNT.captures(expr.name()) {
        Some(caps) => format!("e{}", &caps[1]),
        None => expr.name().to_string(),
    };

    let numbers = if let Some(caps) = EFFECT_REF.captures(&name) {
        let index: usize = caps[1].parse().ok()?;
        let burn = ctx.effect_burn(index).filter(|b| b.trim() != "0")?;
        let mut numbers = parse_burn_numbers(burn);
        if ctx.spell.maxrank > 0 {
            numbers.truncate(ctx.spell.maxrank);
        }
        numbers
    } else {
        native_numbers(legacy_field(&name)?, ctx)
    };

    if numbers.is_empty() {
        return None;
    }
    let applied: Vec<f64> = numbers.iter().map(|x| expr.apply_to(*x)).collect();
    Some(join_ranks(&applied))
}

fn legacy_field(name: &str) -> Option<NativeField> {
    let lower = name.to_ascii_lowercase();
    if lower.contains("cost") {
        Some(NativeField::Cost)
    } else if lower.contains("cooldown") {
        Some(NativeField::Cooldown)
    } else if lower.contains("ammorecharge") {
        Some(NativeField::AmmoRecharge)
    } else {
        None
    }
}
