use serde::Deserialize;

/// Per-call render settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Ability rank shown when not every rank is displayed (1-based).
    pub level: usize,
    /// Show every rank as `a/b/c` instead of only `level`.
    pub show_all_levels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            level: 1,
            show_all_levels: true,
        }
    }
}

impl RenderOptions {
    /// Only the given rank.
    pub fn at_level(level: usize) -> Self {
        RenderOptions {
            level,
            show_all_levels: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let opts: RenderOptions = serde_json::from_str(r#"{"level": 3}"#).unwrap();
        assert_eq!(
            opts,
            RenderOptions {
                level: 3,
                show_all_levels: true
            }
        );
        let opts: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, RenderOptions::default());
    }
}
