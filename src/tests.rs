use crate::community::CommunityData;
use crate::formatter::{format_level_values, format_number};
use crate::options::RenderOptions;
use crate::spell::{RankCell, Spell};
use crate::{parse_spell_tooltip, render, replace_variables, RenderRequest};

// ── Shared fixture runners ──────────────────────────────────────────

/// Embed fixture files at compile time.
const TOOLTIP_FIXTURES: &str = include_str!("../test-data/fixtures/tooltips.json");
const LEVELTIP_FIXTURES: &str = include_str!("../test-data/fixtures/leveltips.json");
const VALIDATE_FIXTURES: &str = include_str!("../test-data/fixtures/validate.json");

/// Every fixture is a render request plus `name` and `expected`.
fn run_fixtures(source: &str) {
    let fixtures: Vec<serde_json::Value> = serde_json::from_str(source).unwrap();
    assert!(!fixtures.is_empty());

    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap();
        let expected = fixture["expected"].as_str().unwrap();
        let request: RenderRequest = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("Fixture '{}': bad request: {}", name, e));

        let output = render(&request);
        assert_eq!(output, expected, "Fixture '{}'", name);
    }
}

#[test]
fn test_fixture_tooltips() {
    run_fixtures(TOOLTIP_FIXTURES);
}

#[test]
fn test_fixture_leveltips() {
    run_fixtures(LEVELTIP_FIXTURES);
}

#[test]
fn test_fixture_validate() {
    run_fixtures(VALIDATE_FIXTURES);
}

// ── Scenarios ───────────────────────────────────────────────────────

fn wukong() -> (Spell, CommunityData) {
    let request: RenderRequest = serde_json::from_str(
        r#"{
            "spell": {
                "id": "MonkeyKingDoubleAttack",
                "name": "Crushing Blow",
                "maxrank": 5,
                "cooldown": [9, 8.5, 8, 7.5, 7],
                "cost": [40, 40, 40, 40, 40],
                "range": [375, 375, 375, 375, 375],
                "effectBurn": [null, "0", "0"],
                "costType": "Mana"
            },
            "communityData": {
                "DataValues": {
                    "BaseDamage": [0, 20, 45, 70, 95, 120, 145],
                    "ADRatio": [0, 0.45, 0.45, 0.45, 0.45, 0.45, 0.45],
                    "AttackRangeBonus": [0, 75, 75, 75, 75, 75, 75],
                    "ArmorShredPercent": [0, 0.1, 0.15, 0.2, 0.25, 0.3, 0.35],
                    "ShredDuration": [0, 3, 3, 3, 3, 3, 3],
                    "CooldownDecrease": [0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]
                },
                "mSpellCalculations": {
                    "BonusDamage": {
                        "__type": "GameCalculation",
                        "mFormulaParts": [
                            { "__type": "NamedDataValueCalculationPart", "mDataValue": "BaseDamage" },
                            { "__type": "StatByNamedDataValueCalculationPart", "mDataValue": "ADRatio", "mStat": 2, "mStatFormula": 2 }
                        ]
                    }
                }
            }
        }"#,
    )
    .unwrap();
    let community = request.community_data.unwrap_or_default();
    (request.spell, community)
}

const WUKONG_Q: &str = "Wukong's next attack gains {{ attackrangebonus }} range, deals \
<physicalDamage>{{ bonusdamage }} bonus physical damage</physicalDamage>, and removes \
<scaleArmor>{{ armorshredpercent*100 }}% Armor</scaleArmor> for {{ shredduration }} seconds.";

#[test]
fn test_wukong_q_all_ranks() {
    let (spell, community) = wukong();
    let out = parse_spell_tooltip(WUKONG_Q, &spell, &RenderOptions::default(), Some(&community));
    assert_eq!(
        out,
        "Wukong's next attack gains 375 range, deals \
<span class=\"text-red-600 dark:text-red-500 font-semibold\">20/45/70/95/120 + 45% bonus Attack Damage bonus physical damage</span>, \
and removes <span class=\"text-orange-600 dark:text-orange-400\">10/15/20/25/30% Armor</span> for 3 seconds."
    );
}

#[test]
fn test_wukong_q_single_rank() {
    let (spell, community) = wukong();
    let out = parse_spell_tooltip(WUKONG_Q, &spell, &RenderOptions::at_level(5), Some(&community));
    assert!(out.contains("120 + 45% bonus Attack Damage"), "{}", out);
    assert!(out.contains("30% Armor"), "{}", out);
    assert!(!out.contains("20/45"), "{}", out);
}

#[test]
fn test_determinism() {
    let (spell, community) = wukong();
    let options = RenderOptions::default();
    let first = replace_variables(WUKONG_Q, &spell, &options, Some(&community));
    let second = replace_variables(WUKONG_Q, &spell, &options, Some(&community));
    assert_eq!(first, second);
}

#[test]
fn test_sibling_failures_are_local() {
    let (spell, mut community) = wukong();
    community.spell_calculations.insert(
        "Broken".to_string(),
        serde_json::from_value(serde_json::json!({ "__type": "Unknown" })).unwrap(),
    );
    let out = parse_spell_tooltip(
        "{{ broken }} then {{ shredduration }}",
        &spell,
        &RenderOptions::default(),
        Some(&community),
    );
    assert_eq!(out, " then 3");
}

#[test]
fn test_untagged_calculation_leaves_siblings_intact() {
    let request: RenderRequest = serde_json::from_str(
        r#"{
            "text": "{{ odd }} deals {{ basedamage }}",
            "spell": { "id": "OddSpell", "maxrank": 2 },
            "communityData": {
                "DataValues": { "BaseDamage": [0, 10, 20] },
                "mSpellCalculations": { "Odd": { "mFormulaParts": [] } }
            }
        }"#,
    )
    .unwrap();
    assert_eq!(render(&request), " deals 10/20");
}

// ── Formatter properties ────────────────────────────────────────────

#[test]
fn test_format_number_examples() {
    assert_eq!(format_number(2.0), "2");
    assert_eq!(format_number(2.3333), "2.333");
    assert_eq!(format_number(2.333), "2.333");
}

#[test]
fn test_collapse_matches_format_number() {
    for x in [1.0, 2.5, 0.125, 175.0] {
        let cells = vec![RankCell::Number(x); 3];
        assert_eq!(format_level_values(&cells, 3, false), format_number(x));
    }
}
