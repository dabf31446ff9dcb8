use crate::community::CommunityData;
use crate::error::LoadError;
use crate::options::RenderOptions;
use crate::spell::Spell;
use serde::Deserialize;

/// Deserialize a spell record from the primary data source.
pub fn spell_from_json(input: &str) -> Result<Spell, LoadError> {
    serde_json::from_str(input).map_err(|e| LoadError::json("spell", e))
}

/// Deserialize a community record (data values plus calculations).
pub fn community_from_json(input: &str) -> Result<CommunityData, LoadError> {
    serde_json::from_str(input).map_err(|e| LoadError::json("community data", e))
}

/// What a [`RenderRequest`] asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// `text` as a tooltip, honoring the options.
    #[default]
    Tooltip,
    /// `text` as a description, every rank shown.
    Description,
    /// The spell's leveltip lines; `text` is ignored.
    Leveltip,
    /// Report problems in the calculation graph.
    Validate,
}

/// One self-contained render job.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderRequest {
    pub text: String,
    pub spell: Spell,
    pub options: RenderOptions,
    pub community_data: Option<CommunityData>,
    pub mode: RenderMode,
}

/// Deserialize a [`RenderRequest`].
pub fn request_from_json(input: &str) -> Result<RenderRequest, LoadError> {
    serde_json::from_str(input).map_err(|e| LoadError::json("render request", e))
}
