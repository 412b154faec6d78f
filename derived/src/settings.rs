use anyhow::{Context, Result};
use serde::Deserialize;

/// Tuning of a derived sequence. None of these change _what_ the derived sequence contains.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EngineSettings {
    pub search: InsertionSearch,
    pub notifications: NotificationBatching,
    /// Verify all ordering invariants after each processed change. Costs a full pass over the
    /// derived sequence per change.
    pub audit: bool,
}

/// How the insertion point of a sorted item is found.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertionSearch {
    #[default]
    Binary,
    /// Scan from the front. Only useful for comparators that are not consistent, where the
    /// derived order is undefined anyway and the scan is at least deterministic.
    Linear,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationBatching {
    /// One `Insert` per contiguous run of inserted items.
    #[default]
    Runs,
    /// One `Insert` per item.
    PerItem,
}

impl EngineSettings {
    pub fn from_toml(toml: &str) -> Result<Self> {
        toml::from_str(toml).context("Failed to parse engine settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            EngineSettings::from_toml("").unwrap(),
            EngineSettings::default()
        );
    }

    #[test]
    fn parses_all_keys() {
        let settings = EngineSettings::from_toml(
            r#"
            search = "linear"
            notifications = "per-item"
            audit = true
            "#,
        )
        .unwrap();

        assert_eq!(
            settings,
            EngineSettings {
                search: InsertionSearch::Linear,
                notifications: NotificationBatching::PerItem,
                audit: true,
            }
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(EngineSettings::from_toml(r#"search = "quadratic""#).is_err());
        assert!(EngineSettings::from_toml("batch = 3").is_err());
    }
}
