use crate::community::*;
use crate::data_values;
use crate::error::EvalError;
use crate::formatter::join_ranks_with_precision;
use crate::spell::{parse_burn_numbers, Spell};
use crate::value::Value;
use std::collections::BTreeSet;

/// Everything an evaluation reads. Both records are borrowed read-only.
#[derive(Debug, Clone, Copy)]
pub struct CalcContext<'a> {
    pub spell: &'a Spell,
    pub community: &'a CommunityData,
}

/// A "N% of Stat" contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct StatPart {
    pub name: String,
    pub ratio: Value,
}

/// How the base of a single-part calculation is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeDisplay {
    #[default]
    None,
    /// Champion-level percent range: `(40% ~ 100%)`.
    CharLevel,
    /// First-to-last breakpoint: `(12 ~ 8)`.
    Breakpoint,
}

/// The evaluated form of a calculation, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcResult {
    pub base: Value,
    pub stat_parts: Vec<StatPart>,
    pub is_percent: bool,
    pub range: RangeDisplay,
    /// Decimal places to render with, when the source pins them.
    pub precision: Option<usize>,
}

impl CalcResult {
    fn range(start: f64, end: f64, is_percent: bool, range: RangeDisplay) -> Self {
        CalcResult {
            base: Value::Vector(vec![start, end]),
            stat_parts: Vec::new(),
            is_percent,
            range,
            precision: None,
        }
    }
}

impl<'a> CalcContext<'a> {
    pub fn new(spell: &'a Spell, community: &'a CommunityData) -> Self {
        CalcContext { spell, community }
    }

    /// A data value for ranks `1..=maxrank`, by exact case-insensitive name.
    pub fn data_value(&self, name: &str) -> Option<Value> {
        let value = data_values::lookup(&self.community.data_values, name, self.spell.maxrank);
        if value.is_none() {
            tracing::debug!("data value \"{}\" missing for {}", name, self.spell.id);
        }
        value
    }

    /// `effectBurn[index]`, preferring the community copy over the spell's.
    pub fn effect_burn(&self, index: usize) -> Option<&'a str> {
        let community = self
            .community
            .effect_burn
            .as_ref()
            .and_then(|burn| burn.get(index))
            .and_then(|entry| entry.as_deref());
        community.or_else(|| self.spell.effect_burn_at(index))
    }

    /// An effect-burn entry as a value, truncated to `maxrank`.
    fn effect_value(&self, index: usize) -> Option<Value> {
        let Some(burn) = self.effect_burn(index) else {
            tracing::debug!("effectBurn[{}] missing for {}", index, self.spell.id);
            return None;
        };
        let mut nums = parse_burn_numbers(burn);
        if self.spell.maxrank > 0 {
            nums.truncate(self.spell.maxrank);
        }
        match nums.len() {
            0 => None,
            1 => Some(Value::Scalar(nums[0])),
            _ => Some(Value::Vector(nums)),
        }
    }

    fn multiplier(&self, multiplier: &Multiplier) -> Option<Value> {
        match (&multiplier.data_value, multiplier.number) {
            (Some(name), _) => self.data_value(name),
            (None, Some(n)) => Some(Value::Scalar(n)),
            (None, None) => None,
        }
    }

    fn sub_part(&self, part: Option<&SubPart>) -> Value {
        let Some(part) = part else {
            return Value::Scalar(0.0);
        };
        let value = match part.kind() {
            SubPartKind::NamedDataValue => part.data_value.as_deref().and_then(|n| self.data_value(n)),
            SubPartKind::Number => Some(Value::Scalar(part.number.unwrap_or(0.0))),
            SubPartKind::EffectValue => self.effect_value(part.effect_index.unwrap_or(0)),
            SubPartKind::Other => {
                tracing::debug!("unsupported product sub part {:?}", part.type_name);
                None
            }
        };
        value.unwrap_or(Value::Scalar(0.0))
    }
}

/// Display name for a stat coefficient.
///
/// `stat` picks the stat (2 attack damage, 12 health, 1 armor, 6 magic
/// resist, 18 life steal); `stat_formula == 2` makes it the bonus portion.
/// Both absent means ability power. Unknown stats have no name.
pub fn stat_name(stat: Option<u32>, stat_formula: Option<u32>) -> String {
    let Some(code) = stat.or(stat_formula) else {
        return "Ability Power".to_string();
    };
    let base = match code {
        2 => "Attack Damage",
        12 => "Health",
        1 => "Armor",
        6 => "Magic Resist",
        18 => "Life Steal",
        _ => return String::new(),
    };
    if stat == Some(code) && stat_formula == Some(2) {
        format!("bonus {}", base)
    } else {
        base.to_string()
    }
}

/// Evaluate the calculation stored under `key`.
///
/// `visited` holds the keys already entered on this evaluation chain;
/// re-entering one is a circular reference.
pub fn evaluate(
    key: &str,
    ctx: &CalcContext<'_>,
    visited: &mut BTreeSet<String>,
) -> Result<CalcResult, EvalError> {
    let node = ctx
        .community
        .spell_calculations
        .get(key)
        .ok_or_else(|| EvalError::UnknownCalculation(key.to_string()))?;

    if !visited.insert(key.to_string()) {
        return Err(EvalError::CircularReference(key.to_string()));
    }

    match node {
        CalculationNode::Modified(modified) => evaluate_modified(key, modified, ctx, visited),
        CalculationNode::Basic(basic) => evaluate_basic(basic, ctx),
        CalculationNode::Unsupported => Err(EvalError::UnsupportedCalculation(key.to_string())),
    }
}

fn evaluate_modified(
    key: &str,
    modified: &ModifiedCalculation,
    ctx: &CalcContext<'_>,
    visited: &mut BTreeSet<String>,
) -> Result<CalcResult, EvalError> {
    let inner_key = modified
        .inner
        .as_deref()
        .ok_or_else(|| EvalError::MissingInnerCalculation(key.to_string()))?;
    let inner = evaluate(inner_key, ctx, visited)?;

    match modified.multiplier.as_ref().and_then(|m| ctx.multiplier(m)) {
        Some(mult) => scale_result(inner, &mult),
        None => Ok(inner),
    }
}

fn scale_result(result: CalcResult, mult: &Value) -> Result<CalcResult, EvalError> {
    let base = result.base.mul(mult)?;
    let stat_parts = result
        .stat_parts
        .into_iter()
        .map(|sp| {
            Ok(StatPart {
                ratio: sp.ratio.mul(mult)?,
                name: sp.name,
            })
        })
        .collect::<Result<Vec<_>, EvalError>>()?;
    Ok(CalcResult {
        base,
        stat_parts,
        ..result
    })
}

fn evaluate_basic(calc: &BasicCalculation, ctx: &CalcContext<'_>) -> Result<CalcResult, EvalError> {
    let is_percent = calc.display_as_percent;

    if let [only] = calc.parts.as_slice() {
        if let Some(range) = single_part_range(only, calc, is_percent) {
            return Ok(range);
        }
    }

    let mut base = Value::Scalar(0.0);
    let mut stat_parts = Vec::new();

    for part in &calc.parts {
        match part {
            FormulaPart::NamedDataValue { data_value } => {
                let Some(name) = data_value else {
                    tracing::debug!("named data value part without a name");
                    continue;
                };
                if let Some(v) = ctx.data_value(name) {
                    base = base.add(&v)?;
                }
            }
            FormulaPart::StatRatio {
                data_value,
                stat,
                stat_formula,
            } => {
                let Some(ratio) = data_value.as_deref().and_then(|n| ctx.data_value(n)) else {
                    continue;
                };
                stat_parts.push(StatPart {
                    name: stat_name(*stat, *stat_formula),
                    ratio,
                });
            }
            FormulaPart::LevelBreakpoint {
                level1_value,
                breakpoints,
                ..
            } => {
                let total = breakpoints
                    .iter()
                    .filter_map(|bp| bp.additional_bonus)
                    .fold(level1_value.unwrap_or(0.0), |acc, bonus| acc + bonus);
                base = base.add(&Value::Scalar(total))?;
            }
            FormulaPart::Number { number } => {
                base = base.add(&Value::Scalar(number.unwrap_or(0.0)))?;
            }
            FormulaPart::EffectValue { effect_index } => {
                if let Some(v) = ctx.effect_value(effect_index.unwrap_or(0)) {
                    base = base.add(&v)?;
                }
            }
            FormulaPart::StatByCoefficient {
                coefficient,
                stat,
                stat_formula,
            } => {
                let Some(c) = coefficient else {
                    tracing::debug!("stat coefficient part without a coefficient");
                    continue;
                };
                stat_parts.push(StatPart {
                    name: stat_name(*stat, *stat_formula),
                    ratio: Value::Scalar(*c),
                });
            }
            FormulaPart::AbilityResourceByCoefficient {
                coefficient,
                stat_formula,
            } => {
                let Some(c) = coefficient else {
                    tracing::debug!("resource coefficient part without a coefficient");
                    continue;
                };
                let resource = ctx.spell.resource_name();
                let name = if *stat_formula == Some(2) {
                    format!("bonus {}", resource)
                } else {
                    resource.to_string()
                };
                stat_parts.push(StatPart {
                    name,
                    ratio: Value::Scalar(*c),
                });
            }
            FormulaPart::ProductOfSubParts { part1, part2 } => {
                let product = ctx
                    .sub_part(part1.as_ref())
                    .mul(&ctx.sub_part(part2.as_ref()))?;
                base = base.add(&product)?;
            }
            FormulaPart::ByCharLevelInterpolation { start, .. } => {
                // Outside the single-part range display only the level 1
                // value is meaningful.
                base = base.add(&Value::Scalar(start.unwrap_or(0.0)))?;
            }
            FormulaPart::Unknown => {
                tracing::debug!("skipping unknown formula part");
            }
        }
    }

    let mut result = CalcResult {
        base,
        stat_parts,
        is_percent,
        range: RangeDisplay::None,
        precision: calc
            .precision
            .filter(|p| *p >= 0)
            .map(|p| p as usize + 1),
    };

    if let Some(mult) = calc.multiplier.as_ref().and_then(|m| ctx.multiplier(m)) {
        result = scale_result(result, &mult)?;
    }
    Ok(result)
}

/// Range displays for calculations made of a single level-driven part.
fn single_part_range(part: &FormulaPart, calc: &BasicCalculation, is_percent: bool) -> Option<CalcResult> {
    match part {
        FormulaPart::LevelBreakpoint {
            level1_value,
            breakpoints,
            ..
        } if calc.simple_tooltip_display == Some(6) => {
            let start = level1_value.unwrap_or(0.0);
            let end = breakpoints
                .iter()
                .filter_map(|bp| bp.additional_bonus)
                .fold(start, |acc, bonus| acc + bonus);
            Some(CalcResult::range(start, end, is_percent, RangeDisplay::Breakpoint))
        }
        FormulaPart::LevelBreakpoint {
            level1_value,
            breakpoints,
            initial_bonus_per_level,
        } if is_percent => {
            let per_level = initial_bonus_per_level.unwrap_or(0.0);
            let first_level = breakpoints.first().and_then(|bp| bp.level)?;
            if per_level == 0.0 || first_level == 0 {
                return None;
            }
            // The bonus applies from level 2 up to the level before the
            // first breakpoint.
            let steps = first_level.saturating_sub(2) as f64;
            let start = level1_value.unwrap_or(0.0);
            Some(CalcResult::range(
                start,
                start + steps * per_level,
                true,
                RangeDisplay::CharLevel,
            ))
        }
        FormulaPart::ByCharLevelInterpolation { start, end } if is_percent => {
            let start = start.unwrap_or(0.0);
            Some(CalcResult::range(
                start,
                end.unwrap_or(start),
                true,
                RangeDisplay::CharLevel,
            ))
        }
        _ => None,
    }
}

/// Render an evaluated calculation as tooltip text.
///
/// Percent bases are scaled by 100 and suffixed with `%`; stat ratios are
/// always rendered as `"<ratio×100>% <Stat>"`. An all-zero base is omitted.
/// Returns `None` when nothing is left to show.
pub fn render(result: &CalcResult) -> Option<String> {
    let fmt = |value: &Value| match result.precision {
        Some(digits) => join_ranks_with_precision(value.as_slice(), digits),
        None => value.to_tooltip_string(),
    };

    let base = if result.is_percent {
        result.base.scale_by_100()
    } else {
        result.base.clone()
    };

    let mut parts = Vec::new();

    if !base.is_zero() {
        let pct = if result.is_percent { "%" } else { "" };
        let text = match (result.range, base.as_slice()) {
            (RangeDisplay::CharLevel, [lo, hi]) => format!(
                "({}% ~ {}%)",
                fmt(&Value::Scalar(*lo)),
                fmt(&Value::Scalar(*hi))
            ),
            (RangeDisplay::Breakpoint, [lo, hi]) => format!(
                "({}{pct} ~ {}{pct})",
                fmt(&Value::Scalar(*lo)),
                fmt(&Value::Scalar(*hi))
            ),
            _ => format!("{}{}", fmt(&base), pct),
        };
        parts.push(text);
    }

    for sp in &result.stat_parts {
        let ratio = fmt(&sp.ratio.scale_by_100());
        if sp.name.is_empty() {
            parts.push(format!("{}%", ratio));
        } else {
            parts.push(format!("{}% {}", ratio, sp.name));
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" + "))
    }
}

/// Resolve a placeholder through the calculation graph.
///
/// The name is matched case-insensitively against the calculation keys.
/// Evaluation failures are logged and reported as `None` so the caller can
/// try its next resolution step.
pub fn resolve_calculation(name: &str, ctx: &CalcContext<'_>) -> Option<String> {
    let (key, _) = ctx.community.find_calculation(name)?;
    match evaluate(key, ctx, &mut BTreeSet::new()) {
        Ok(result) => render(&result).filter(|s| !s.trim().is_empty()),
        Err(err) => {
            tracing::warn!("failed to evaluate calculation \"{}\": {}", key, err);
            None
        }
    }
}
