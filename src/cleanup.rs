//! Text passes that run around placeholder substitution.

use once_cell::sync::Lazy;
use regex::Regex;

static PLUS_AFTER_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\}\})\s*\+\s*(\S)").unwrap());
static PLUS_BEFORE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\S)\s*\+\s*(\{\{)").unwrap());
static TILDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\S)\s*~\s*(\S)").unwrap());

/// `{{ a {{ b }} c }}`: game-mode conditional blocks, dropped whole.
static NESTED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]*\{\{[^}]*\}\}[^}]*)\}\}").unwrap());
static CROSS_TOOLTIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\{\{\s*Spell_[^}]*Tooltip[^}]*\}\}").unwrap());
static MODIFIER_APPEND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\{\{\s*spellmodifierdescriptionappend\s*\}\}").unwrap());

static EMPTY_BRACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{\s*\}\}").unwrap());
/// `%i:scaleAP%` style icon tokens.
static ICON_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[^\s:%]+:[^\s%]+%").unwrap());
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\r\n]+").unwrap());

static PERCENT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?(?:/\d+(?:\.\d+)?)+)%").unwrap());
/// Group 1 is the run; the prefix keeps it from starting mid-number.
static DECIMAL_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\d./])(0\.[0-9]+(?:/0?\.[0-9]+)+)").unwrap());

/// Two runs describe the same numbers when every entry agrees within this.
const DUPLICATE_TOLERANCE: f64 = 0.01;

/// Space out `+` next to placeholders and every `~`:
/// `{{ a }}+Max Health` → `{{ a }} + Max Health`, `50~100` → `50 ~ 100`.
pub fn normalize_operators(text: &str) -> String {
    let text = PLUS_AFTER_PLACEHOLDER.replace_all(text, "$1 + $2");
    let text = PLUS_BEFORE_PLACEHOLDER.replace_all(&text, "$1 + $2");
    TILDE.replace_all(&text, "$1 ~ $2").into_owned()
}

/// Drop placeholders that can never resolve: nested conditional blocks,
/// cross-references to other tooltips and the modifier-append marker.
pub fn strip_unresolvable(text: &str) -> String {
    let text = NESTED_BLOCK.replace_all(text, "");
    let text = CROSS_TOOLTIP.replace_all(&text, "");
    MODIFIER_APPEND.replace_all(&text, "").into_owned()
}

/// Remove what substitution leaves behind: brace fragments, icon tokens,
/// stray `%` signs and runs of spaces. Newlines are kept.
pub fn cleanup_residue(text: &str) -> String {
    let text = EMPTY_BRACES.replace_all(text, "");
    let text = text.replace("}}", "").replace("{{", "");
    let text = ICON_TOKEN.replace_all(&text, "");
    let text = strip_stray_percent(&text);
    collapse_spaces(&text)
}

/// Remove every `%` with no digit directly on either side.
pub fn strip_stray_percent(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '%' {
            let before = i > 0 && chars[i - 1].is_ascii_digit();
            let after = chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
            if !before && !after {
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Collapse runs of non-newline whitespace to one space.
pub fn collapse_spaces(text: &str) -> String {
    SPACE_RUN.replace_all(text, " ").into_owned()
}

/// Delete a decimal run that restates the percent run right before it:
/// `25/30/35% 0.25/0.3/0.35` → `25/30/35%`. Only spaces may separate the
/// two; the separating gap goes with the decimal run.
pub fn remove_duplicate_percent_runs(text: &str) -> String {
    let percents: Vec<(usize, Vec<f64>)> = PERCENT_RUN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.end(), split_numbers(&caps[1])))
        })
        .collect();
    if percents.is_empty() {
        return text.to_string();
    }

    let decimals: Vec<(usize, usize)> = DECIMAL_RUN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| (m.start(), m.end())))
        .collect();

    let mut result = text.to_string();
    // Back to front so earlier offsets stay valid.
    for &(start, end) in decimals.iter().rev() {
        let values = split_numbers(&text[start..end]);
        let adjacent = percents.iter().find(|(percent_end, _)| {
            *percent_end <= start && text[*percent_end..start].chars().all(|c| c == ' ' || c == '\t')
        });
        if let Some((percent_end, percent)) = adjacent {
            if same_fractions(percent, &values) {
                result.replace_range(*percent_end..end, "");
            }
        }
    }
    result
}

fn split_numbers(run: &str) -> Vec<f64> {
    run.split('/').filter_map(|s| s.parse().ok()).collect()
}

fn same_fractions(percent: &[f64], decimals: &[f64]) -> bool {
    !percent.is_empty()
        && percent.len() == decimals.len()
        && percent
            .iter()
            .zip(decimals)
            .all(|(p, d)| (p / 100.0 - d).abs() < DUPLICATE_TOLERANCE)
}
