use serde::Deserialize;

/// One entry of a per-rank array as it appears in the primary data source:
/// a number, a numeric string, or `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RankCell {
    Number(f64),
    Text(String),
    Null,
}

impl RankCell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RankCell::Number(x) => Some(*x),
            RankCell::Text(s) => s.trim().parse().ok(),
            RankCell::Null => None,
        }
    }

    /// Null, empty and literal-zero cells carry no rank data.
    pub fn is_blank_or_zero(&self) -> bool {
        match self {
            RankCell::Number(x) => *x == 0.0,
            RankCell::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == "0"
            }
            RankCell::Null => true,
        }
    }
}

impl From<f64> for RankCell {
    fn from(x: f64) -> Self {
        RankCell::Number(x)
    }
}

/// Split a burn string such as `"8/7.5/7"` into cells.
pub fn burn_cells(burn: &str) -> Vec<RankCell> {
    burn.split('/')
        .map(|part| RankCell::Text(part.trim().to_string()))
        .collect()
}

/// Label/effect pairs describing the tooltip's stat lines.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Leveltip {
    pub label: Vec<String>,
    pub effect: Vec<String>,
}

/// A champion ability as published by the primary data source.
///
/// Field presence varies between releases, so everything except the id
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Spell {
    pub id: String,
    pub name: Option<String>,
    pub maxrank: usize,
    pub cooldown: Vec<RankCell>,
    pub cooldown_burn: Option<String>,
    pub cost: Vec<RankCell>,
    pub cost_burn: Option<String>,
    pub range: Vec<RankCell>,
    pub range_burn: Option<String>,
    pub effect_burn: Vec<Option<String>>,
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub leveltip: Option<Leveltip>,
    pub resource: Option<String>,
    pub cost_type: Option<String>,
}

impl Spell {
    /// Cooldown cells, preferring the array over the burn string.
    pub fn cooldown_cells(&self) -> Vec<RankCell> {
        table_or_burn(&self.cooldown, self.cooldown_burn.as_deref())
    }

    pub fn cost_cells(&self) -> Vec<RankCell> {
        table_or_burn(&self.cost, self.cost_burn.as_deref())
    }

    pub fn range_cells(&self) -> Vec<RankCell> {
        table_or_burn(&self.range, self.range_burn.as_deref())
    }

    /// `effectBurn[index]`, skipping missing slots.
    pub fn effect_burn_at(&self, index: usize) -> Option<&str> {
        self.effect_burn.get(index)?.as_deref()
    }

    /// The resource name substituted for `@AbilityResourceName@`:
    /// the cost type, then the resource, then `"Mana"`. Values that are
    /// themselves unresolved placeholders are skipped.
    pub fn resource_name(&self) -> &str {
        let usable = |s: &&str| !s.is_empty() && !s.contains("{{");
        self.cost_type
            .as_deref()
            .map(str::trim)
            .filter(usable)
            .or_else(|| self.resource.as_deref().map(str::trim).filter(usable))
            .unwrap_or(DEFAULT_RESOURCE)
    }
}

pub const DEFAULT_RESOURCE: &str = "Mana";

fn table_or_burn(table: &[RankCell], burn: Option<&str>) -> Vec<RankCell> {
    if table.iter().any(|c| !c.is_blank_or_zero()) {
        return table.to_vec();
    }
    match burn {
        Some(burn) if !burn.trim().is_empty() => burn_cells(burn),
        _ => table.to_vec(),
    }
}

/// Parse an effect-burn entry: `"80/100/120"` → per-rank numbers,
/// `"0.5"` → a single number. Non-numeric pieces are dropped.
pub fn parse_burn_numbers(burn: &str) -> Vec<f64> {
    burn.split('/')
        .filter_map(|s| s.trim().parse::<f64>().ok())
        .collect()
}
