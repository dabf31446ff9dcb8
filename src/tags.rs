//! Pseudo-XML markup → styled `<span>` markup.
//!
//! Runs before placeholder resolution so tag boundaries are fixed first.
//! Every tag occurrence is rewritten exactly once in a single left-to-right
//! pass, so a closing tag can never be re-read as part of another tag and
//! separate occurrences of the same tag stay independently paired.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `<name>` or `</name>` without attributes.
static SIMPLE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)>").unwrap());

/// `<font color='...'>` with either quote style.
static FONT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<font\s+color=['"]([^'"]+)['"]\s*>"#).unwrap());

/// The closed tag vocabulary of ability descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    PhysicalDamage,
    MagicDamage,
    TrueDamage,
    Damage,
    Status,
    LifeSteal,
    ScaleAD,
    ScaleAP,
    ScaleArmor,
    ScaleLevel,
    Healing,
    Shield,
    Speed,
    KeywordMajor,
    KeywordStealth,
    SpellPassive,
    SpellActive,
    Recast,
    Rules,
    Mana,
    Energy,
    Health,
    Cooldown,
    Range,
    Radius,
    Width,
    Length,
    Font,
    Br,
    Other,
}

/// Tag names as written in the source, paired with their variant.
const TAG_NAMES: &[(&str, Tag)] = &[
    ("physicalDamage", Tag::PhysicalDamage),
    ("magicDamage", Tag::MagicDamage),
    ("trueDamage", Tag::TrueDamage),
    ("damage", Tag::Damage),
    ("status", Tag::Status),
    ("lifeSteal", Tag::LifeSteal),
    ("scaleAD", Tag::ScaleAD),
    ("scaleAP", Tag::ScaleAP),
    ("scaleArmor", Tag::ScaleArmor),
    ("scaleLevel", Tag::ScaleLevel),
    ("healing", Tag::Healing),
    ("shield", Tag::Shield),
    ("speed", Tag::Speed),
    ("keywordMajor", Tag::KeywordMajor),
    ("keywordStealth", Tag::KeywordStealth),
    ("spellPassive", Tag::SpellPassive),
    ("spellActive", Tag::SpellActive),
    ("recast", Tag::Recast),
    ("rules", Tag::Rules),
    ("mana", Tag::Mana),
    ("energy", Tag::Energy),
    ("health", Tag::Health),
    ("cooldown", Tag::Cooldown),
    ("range", Tag::Range),
    ("radius", Tag::Radius),
    ("width", Tag::Width),
    ("length", Tag::Length),
    ("font", Tag::Font),
    ("br", Tag::Br),
];

impl Tag {
    /// Case-insensitive lookup; anything outside the vocabulary is `Other`.
    pub fn from_name(name: &str) -> Tag {
        TAG_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, tag)| *tag)
            .unwrap_or(Tag::Other)
    }

    /// CSS classes for the styled span, if the tag carries a style.
    pub fn class_name(self) -> Option<&'static str> {
        use Tag::*;
        let class = match self {
            PhysicalDamage => "text-red-600 dark:text-red-500 font-semibold",
            MagicDamage => "text-blue-600 dark:text-blue-500 font-semibold",
            TrueDamage => "text-yellow-600 dark:text-yellow-500 font-semibold",
            Damage | Health => "text-red-600 dark:text-red-400",
            Status => "text-purple-600 dark:text-purple-500",
            LifeSteal => "text-green-600 dark:text-green-500",
            ScaleAD => "text-orange-600 dark:text-orange-500",
            ScaleAP | Mana => "text-blue-600 dark:text-blue-400",
            ScaleArmor => "text-orange-600 dark:text-orange-400",
            ScaleLevel => "text-gray-600 dark:text-gray-400",
            Healing => "text-green-600 dark:text-green-400",
            Shield => "text-blue-600 dark:text-blue-300",
            Speed => "text-cyan-600 dark:text-cyan-500",
            KeywordMajor => "text-yellow-600 dark:text-yellow-400 font-semibold",
            Energy => "text-yellow-600 dark:text-yellow-400",
            KeywordStealth => "text-purple-600 dark:text-purple-400 font-semibold",
            SpellPassive => "text-gray-600 dark:text-gray-500 italic",
            SpellActive => "text-gray-900 dark:text-white font-semibold",
            Recast => "text-yellow-600 dark:text-yellow-300",
            Rules => "text-gray-600 dark:text-gray-400 italic",
            Cooldown => "text-gray-600 dark:text-gray-300",
            Range => "text-cyan-600 dark:text-cyan-400",
            Radius => "text-purple-600 dark:text-purple-400",
            Width => "text-indigo-600 dark:text-indigo-400",
            Length => "text-pink-600 dark:text-pink-400",
            Font | Br | Other => return None,
        };
        Some(class)
    }
}

/// Convert pseudo-XML tags in `text` to spans.
///
/// Known tags get a classed span, `<font color='c'>` keeps its color as an
/// inline style, `<br>` passes through and any other simple tag becomes a
/// bare span.
pub fn convert_xml_tags(text: &str) -> String {
    let with_fonts = FONT_OPEN.replace_all(text, |caps: &Captures| {
        format!("<span style=\"color: {}\">", &caps[1])
    });

    SIMPLE_TAG
        .replace_all(&with_fonts, |caps: &Captures| {
            let closing = !caps[1].is_empty();
            match Tag::from_name(&caps[2]) {
                Tag::Br => caps[0].to_string(),
                _ if closing => "</span>".to_string(),
                tag => match tag.class_name() {
                    Some(class) => format!("<span class=\"{}\">", class),
                    None => "<span>".to_string(),
                },
            }
        })
        .into_owned()
}
