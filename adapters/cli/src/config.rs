use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use hunters_core::MatchRules;
use serde::Deserialize;

/// Default location of the score ledger.
pub(crate) const DEFAULT_SCORES_PATH: &str = "scores.json";

/// Settings read from the optional TOML configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HostConfig {
    /// Score ledger location, overridden by `--scores`.
    pub(crate) scores: Option<PathBuf>,
    /// Match constants.
    pub(crate) rules: MatchRules,
}

impl HostConfig {
    /// Loads the configuration at `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    /// Ledger path after applying the command-line override.
    pub(crate) fn scores_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.scores.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = HostConfig::load(None).expect("defaults load");
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.scores_path(None), PathBuf::from("scores.json"));
    }

    #[test]
    fn partial_rules_keep_remaining_defaults() {
        let config = HostConfig::parse(
            r#"
            scores = "custom.json"

            [rules]
            columns = 30
            trap_cooldown_ms = 2500
            "#,
        )
        .expect("config parses");

        assert_eq!(config.rules.columns, 30);
        assert_eq!(config.rules.trap_cooldown_ms, 2_500);
        assert_eq!(config.rules.rows, MatchRules::default().rows);
        assert_eq!(config.scores_path(None), PathBuf::from("custom.json"));
        assert_eq!(
            config.scores_path(Some(PathBuf::from("flag.json"))),
            PathBuf::from("flag.json")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(HostConfig::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn config_file_is_read_from_disk() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("hunters.toml");
        fs::write(&path, "[rules]\nmax_traps = 5\n").expect("write config");

        let config = HostConfig::load(Some(&path)).expect("config loads");
        assert_eq!(config.rules.max_traps, 5);

        let missing = HostConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(missing.is_err());
    }
}
