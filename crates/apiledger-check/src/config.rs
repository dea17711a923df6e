//! Configuration for apiledger.
//!
//! Loads config from:
//! 1. Global: ~/.config/apiledger/config.toml
//! 2. Per-project: .apiledger/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [baseline]
//! file_name = "PublicAPI.txt"
//!
//! [rules.new-api]
//! severity = "warning"
//!
//! [rules.deleted-api]
//! enabled = false
//!
//! [pretty]
//! colors = "never"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use apiledger_output::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::baseline::BASELINE_FILE_NAME;
use crate::diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticSink, Rule};

/// Error loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown rule `{0}` in [rules] (expected `new-api` or `deleted-api`)")]
    UnknownRule(String),
}

/// Baseline discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(default)]
pub struct BaselineConfig {
    /// File name to look for among additional files (case-insensitive).
    /// Default: PublicAPI.txt
    pub file_name: Option<String>,
}

impl BaselineConfig {
    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(BASELINE_FILE_NAME)
    }
}

/// Per-rule override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(default)]
pub struct RuleOverride {
    /// Replace the rule's default severity
    pub severity: Option<DiagnosticLevel>,
    /// Set to false to drop the rule's diagnostics
    pub enabled: Option<bool>,
}

impl RuleOverride {
    fn merge(self, other: Self) -> Self {
        Self {
            severity: other.severity.or(self.severity),
            enabled: other.enabled.or(self.enabled),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(default)]
pub struct ApiLedgerConfig {
    pub baseline: BaselineConfig,
    /// Keyed by rule id (`new-api`, `deleted-api`)
    pub rules: BTreeMap<String, RuleOverride>,
    pub pretty: PrettyConfig,
}

impl ApiLedgerConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/apiledger/config.toml,
    /// then merges with per-project config from .apiledger/config.toml.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path()
            && global_path.is_file()
        {
            config = config.merge(Self::load_file(&global_path)?);
        }

        let project_path = root.join(".apiledger").join("config.toml");
        if project_path.is_file() {
            config = config.merge(Self::load_file(&project_path)?);
        }

        Ok(config)
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("apiledger").join("config.toml"))
    }

    /// Load and validate a single config file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.rules.keys().find(|id| Rule::from_id(id).is_none()) {
            Some(unknown) => Err(ConfigError::UnknownRule(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Merge another config into this one; set values in `other` win.
    pub fn merge(self, other: Self) -> Self {
        let mut rules = self.rules;
        for (id, over) in other.rules {
            let merged = match rules.remove(&id) {
                Some(existing) => existing.merge(over),
                None => over,
            };
            rules.insert(id, merged);
        }
        Self {
            baseline: BaselineConfig {
                file_name: other.baseline.file_name.or(self.baseline.file_name),
            },
            rules,
            pretty: self.pretty.merge(other.pretty),
        }
    }

    pub fn rule_enabled(&self, rule: Rule) -> bool {
        self.rules
            .get(rule.id())
            .and_then(|o| o.enabled)
            .unwrap_or(true)
    }

    pub fn rule_level(&self, rule: Rule) -> DiagnosticLevel {
        self.rules
            .get(rule.id())
            .and_then(|o| o.severity)
            .unwrap_or_else(|| rule.default_level())
    }

    /// Apply rule overrides to a diagnostic; `None` if its rule is disabled.
    pub fn apply(&self, diagnostic: Diagnostic) -> Option<Diagnostic> {
        if !self.rule_enabled(diagnostic.rule) {
            return None;
        }
        let level = self.rule_level(diagnostic.rule);
        Some(diagnostic.with_level(level))
    }
}

/// Sink adapter applying rule overrides before forwarding.
///
/// Filtering happens here, after the session has recorded what it examined,
/// so disabling `new-api` never turns members into deletions.
pub struct ConfiguredSink<'a> {
    config: &'a ApiLedgerConfig,
    inner: &'a dyn DiagnosticSink,
}

impl<'a> ConfiguredSink<'a> {
    pub fn new(config: &'a ApiLedgerConfig, inner: &'a dyn DiagnosticSink) -> Self {
        Self { config, inner }
    }
}

impl DiagnosticSink for ConfiguredSink<'_> {
    fn report(&self, diagnostic: Diagnostic) {
        if let Some(diagnostic) = self.config.apply(diagnostic) {
            self.inner.report(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::CollectingSink;
    use apiledger_output::ColorMode;
    use apiledger_symbols::Location;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ApiLedgerConfig::default();
        assert_eq!(config.baseline.file_name(), "PublicAPI.txt");
        assert!(config.rule_enabled(Rule::NewApi));
        assert_eq!(config.rule_level(Rule::DeletedApi), DiagnosticLevel::Error);
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(".apiledger");
        std::fs::create_dir_all(&config_dir).unwrap();

        let mut file = std::fs::File::create(config_dir.join("config.toml")).unwrap();
        writeln!(
            file,
            r#"
[baseline]
file_name = "Api.txt"

[rules.new-api]
severity = "warning"

[rules.deleted-api]
enabled = false

[pretty]
colors = "never"
"#
        )
        .unwrap();

        let config = ApiLedgerConfig::load_file(&config_dir.join("config.toml")).unwrap();
        assert_eq!(config.baseline.file_name(), "Api.txt");
        assert_eq!(config.rule_level(Rule::NewApi), DiagnosticLevel::Warning);
        assert!(config.rule_enabled(Rule::NewApi));
        assert!(!config.rule_enabled(Rule::DeletedApi));
        assert_eq!(config.pretty.colors, Some(ColorMode::Never));
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rules.no-such-rule]\nenabled = false\n").unwrap();
        let err = ApiLedgerConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule(ref id) if id == "no-such-rule"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rules\n").unwrap();
        assert!(matches!(
            ApiLedgerConfig::load_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_merge_project_wins() {
        let mut global = ApiLedgerConfig::default();
        global.baseline.file_name = Some("Global.txt".to_string());
        global.rules.insert(
            "new-api".to_string(),
            RuleOverride {
                severity: Some(DiagnosticLevel::Hint),
                enabled: Some(false),
            },
        );

        let mut project = ApiLedgerConfig::default();
        project.rules.insert(
            "new-api".to_string(),
            RuleOverride {
                severity: None,
                enabled: Some(true),
            },
        );

        let merged = global.merge(project);
        assert_eq!(merged.baseline.file_name(), "Global.txt");
        assert!(merged.rule_enabled(Rule::NewApi));
        assert_eq!(merged.rule_level(Rule::NewApi), DiagnosticLevel::Hint);
    }

    #[test]
    fn test_configured_sink_filters_and_relevels() {
        let mut config = ApiLedgerConfig::default();
        config.rules.insert(
            "deleted-api".to_string(),
            RuleOverride {
                severity: None,
                enabled: Some(false),
            },
        );
        config.rules.insert(
            "new-api".to_string(),
            RuleOverride {
                severity: Some(DiagnosticLevel::Warning),
                enabled: None,
            },
        );

        let collected = CollectingSink::new();
        let sink = ConfiguredSink::new(&config, &collected);
        sink.report(Diagnostic::deleted_api("X", Location::degenerate("PublicAPI.txt")));
        sink.report(Diagnostic::new_api("C", "C", Location::degenerate("C.cs")));

        let diagnostics = collected.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::NewApi);
        assert_eq!(diagnostics[0].level, DiagnosticLevel::Warning);
    }
}
