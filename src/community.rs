//! Records from the secondary (community) data source: named per-rank
//! data values and the spell-calculation graph built on top of them.
//!
//! The source discriminates calculation nodes and formula parts with a
//! `__type` string; here they are closed enums so the evaluator can match
//! exhaustively. A node or part that is untagged, carries an unknown
//! discriminant or is otherwise malformed deserializes to a catch-all
//! variant instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Per-ability data from the community source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommunityData {
    /// Named per-rank tables; index 0 is a buffer slot.
    #[serde(rename = "DataValues", alias = "dataValues")]
    pub data_values: BTreeMap<String, Vec<f64>>,

    #[serde(
        rename = "mSpellCalculations",
        alias = "SpellCalculations",
        deserialize_with = "lenient_map"
    )]
    pub spell_calculations: BTreeMap<String, CalculationNode>,

    /// Effect-burn strings; preferred over the spell's own when present.
    #[serde(rename = "effectBurn")]
    pub effect_burn: Option<Vec<Option<String>>>,

    /// Recharge time of stacked-charge abilities; index 0 is a buffer slot.
    #[serde(rename = "mAmmoRechargeTime")]
    pub ammo_recharge_time: Option<Vec<f64>>,
}

impl CommunityData {
    /// Case-insensitive exact lookup of a calculation, returning its
    /// canonical key.
    pub fn find_calculation(&self, name: &str) -> Option<(&str, &CalculationNode)> {
        self.spell_calculations
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, node)| (key.as_str(), node))
    }

    /// The ammo recharge table, from the dedicated field or a data value of
    /// the same name.
    pub fn ammo_recharge_table(&self) -> Option<&[f64]> {
        self.ammo_recharge_time.as_deref().or_else(|| {
            self.data_values
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("mAmmoRechargeTime"))
                .map(|(_, table)| table.as_slice())
        })
    }
}

/// Falls back to the catch-all variant when an entry does not fit its type.
trait Lenient: DeserializeOwned {
    fn unsupported() -> Self;

    fn from_json(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::debug!("unsupported calculation entry: {}", e);
            Self::unsupported()
        })
    }
}

fn lenient_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Lenient,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, T::from_json(value)))
        .collect())
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Lenient,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().map(T::from_json).collect())
}

/// A node of the calculation graph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__type")]
pub enum CalculationNode {
    #[serde(rename = "GameCalculation")]
    Basic(BasicCalculation),
    #[serde(rename = "GameCalculationModified")]
    Modified(ModifiedCalculation),
    #[serde(other)]
    Unsupported,
}

/// Sum of formula parts, optionally displayed as a percentage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BasicCalculation {
    #[serde(rename = "mFormulaParts", default, deserialize_with = "lenient_vec")]
    pub parts: Vec<FormulaPart>,
    #[serde(rename = "mDisplayAsPercent", default)]
    pub display_as_percent: bool,
    #[serde(rename = "mMultiplier")]
    pub multiplier: Option<Multiplier>,
    /// Decimal hint; negative means "unspecified".
    #[serde(rename = "mPrecision")]
    pub precision: Option<i32>,
    #[serde(rename = "mSimpleTooltipCalculationDisplay")]
    pub simple_tooltip_display: Option<i32>,
}

/// Another calculation scaled by a multiplier.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModifiedCalculation {
    #[serde(rename = "mModifiedGameCalculation")]
    pub inner: Option<String>,
    #[serde(rename = "mMultiplier")]
    pub multiplier: Option<Multiplier>,
}

/// Either a named data value or a literal number.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Multiplier {
    #[serde(rename = "mDataValue")]
    pub data_value: Option<String>,
    #[serde(rename = "mNumber")]
    pub number: Option<f64>,
}

/// One level breakpoint of a champion-level stair-step.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Breakpoint {
    #[serde(rename = "mAdditionalBonusAtThisLevel")]
    pub additional_bonus: Option<f64>,
    #[serde(rename = "mLevel")]
    pub level: Option<u32>,
}

/// A term of a [`BasicCalculation`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__type")]
pub enum FormulaPart {
    #[serde(rename = "NamedDataValueCalculationPart")]
    NamedDataValue {
        #[serde(rename = "mDataValue")]
        data_value: Option<String>,
    },
    #[serde(rename = "StatByNamedDataValueCalculationPart")]
    StatRatio {
        #[serde(rename = "mDataValue")]
        data_value: Option<String>,
        #[serde(rename = "mStat")]
        stat: Option<u32>,
        #[serde(rename = "mStatFormula")]
        stat_formula: Option<u32>,
    },
    #[serde(rename = "ByCharLevelBreakpointsCalculationPart")]
    LevelBreakpoint {
        #[serde(rename = "mLevel1Value")]
        level1_value: Option<f64>,
        #[serde(rename = "mBreakpoints", default)]
        breakpoints: Vec<Breakpoint>,
        #[serde(rename = "mInitialBonusPerLevel")]
        initial_bonus_per_level: Option<f64>,
    },
    #[serde(rename = "NumberCalculationPart")]
    Number {
        #[serde(rename = "mNumber")]
        number: Option<f64>,
    },
    #[serde(rename = "EffectValueCalculationPart")]
    EffectValue {
        #[serde(rename = "mEffectIndex")]
        effect_index: Option<usize>,
    },
    #[serde(rename = "StatByCoefficientCalculationPart")]
    StatByCoefficient {
        #[serde(rename = "mCoefficient")]
        coefficient: Option<f64>,
        #[serde(rename = "mStat")]
        stat: Option<u32>,
        #[serde(rename = "mStatFormula")]
        stat_formula: Option<u32>,
    },
    #[serde(rename = "AbilityResourceByCoefficientCalculationPart")]
    AbilityResourceByCoefficient {
        #[serde(rename = "mCoefficient")]
        coefficient: Option<f64>,
        #[serde(rename = "mStatFormula")]
        stat_formula: Option<u32>,
    },
    #[serde(rename = "ProductOfSubPartsCalculationPart")]
    ProductOfSubParts {
        #[serde(rename = "mPart1")]
        part1: Option<SubPart>,
        #[serde(rename = "mPart2")]
        part2: Option<SubPart>,
    },
    #[serde(rename = "ByCharLevelInterpolationCalculationPart")]
    ByCharLevelInterpolation {
        #[serde(rename = "mStartValue")]
        start: Option<f64>,
        #[serde(rename = "mEndValue")]
        end: Option<f64>,
    },
    #[serde(other)]
    Unknown,
}

impl Lenient for CalculationNode {
    fn unsupported() -> Self {
        CalculationNode::Unsupported
    }
}

impl Lenient for FormulaPart {
    fn unsupported() -> Self {
        FormulaPart::Unknown
    }
}

/// An operand of a product part. The source does not always tag these, so
/// the discriminant is optional here and interpreted by [`SubPart::kind`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubPart {
    #[serde(rename = "__type")]
    pub type_name: Option<String>,
    #[serde(rename = "mDataValue")]
    pub data_value: Option<String>,
    #[serde(rename = "mNumber")]
    pub number: Option<f64>,
    #[serde(rename = "mEffectIndex")]
    pub effect_index: Option<usize>,
}

/// The sub-part shapes a product understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubPartKind {
    NamedDataValue,
    Number,
    EffectValue,
    Other,
}

impl SubPart {
    pub fn kind(&self) -> SubPartKind {
        match self.type_name.as_deref() {
            Some("NamedDataValueCalculationPart") => SubPartKind::NamedDataValue,
            Some("NumberCalculationPart") => SubPartKind::Number,
            Some("EffectValueCalculationPart") => SubPartKind::EffectValue,
            _ => SubPartKind::Other,
        }
    }
}
