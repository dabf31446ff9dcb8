pub mod ast;
pub mod calc;
pub mod cleanup;
pub mod community;
pub mod data_values;
pub mod error;
pub mod formatter;
pub mod from_json;
pub mod fuzzy;
pub mod leveltip;
pub mod options;
pub mod parser;
pub mod replacer;
pub mod spell;
pub mod tags;
pub mod validate;
pub mod value;

use once_cell::sync::Lazy;
use regex::Regex;

pub use community::CommunityData;
pub use error::{EvalError, LoadError};
pub use from_json::{RenderMode, RenderRequest};
pub use leveltip::format_leveltip_stats;
pub use options::RenderOptions;
pub use replacer::replace_variables;
pub use spell::Spell;
pub use tags::convert_xml_tags;
pub use validate::{validate_calculations, ValidationError};

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

// ── Core API ───────────────────────────────────────────────────────

/// Render a tooltip: markup to spans, placeholders to rank values, every
/// line break as `<br />`.
pub fn parse_spell_tooltip(
    text: &str,
    spell: &Spell,
    options: &RenderOptions,
    community: Option<&CommunityData>,
) -> String {
    if text.is_empty() {
        return String::new();
    }
    let converted = convert_xml_tags(text);
    let replaced = replace_variables(&converted, spell, options, community);
    let normalized = BR_TAG.replace_all(&replaced, "<br />");
    cleanup::collapse_spaces(&normalized).replace('\n', "<br />")
}

/// Render a description: markup and placeholders, every rank shown.
pub fn parse_spell_description(
    text: &str,
    spell: &Spell,
    community: Option<&CommunityData>,
) -> String {
    if text.is_empty() {
        return String::new();
    }
    let converted = convert_xml_tags(text);
    replace_variables(&converted, spell, &RenderOptions::default(), community)
}

/// Run one [`RenderRequest`] and return its output text.
///
/// Validation output has one `code path: message` line per problem.
pub fn render(request: &RenderRequest) -> String {
    let community = request.community_data.as_ref();
    match request.mode {
        RenderMode::Tooltip => {
            parse_spell_tooltip(&request.text, &request.spell, &request.options, community)
        }
        RenderMode::Description => parse_spell_description(&request.text, &request.spell, community),
        RenderMode::Leveltip => format_leveltip_stats(&request.spell, community),
        RenderMode::Validate => {
            let empty = CommunityData::default();
            validate_calculations(community.unwrap_or(&empty))
                .iter()
                .map(|e| format!("{} {}: {}", e.code, e.path.join("."), e.message))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

#[cfg(test)]
mod tests;
