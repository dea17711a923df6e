//! Diagnostic output from the reconciler.
//!
//! Diagnostics are handed to a [`DiagnosticSink`] supplied by the host. They
//! are displayed to users and can be used for CI enforcement.

use std::sync::{Mutex, PoisonError};

use apiledger_output::{bold, paint};
use apiledger_symbols::Location;
use nu_ansi_term::Color;
use serde::{Deserialize, Serialize};

/// Severity level for a diagnostic.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Informational hint
    Hint,
    /// Warning (may indicate a problem)
    Warning,
    /// Error (definite problem)
    Error,
}

impl DiagnosticLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticLevel::Hint => "hint",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Error => "error",
        }
    }
}

/// The two drift rules.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Public symbol missing from the baseline
    NewApi,
    /// Baseline entry with no public symbol behind it
    DeletedApi,
}

impl Rule {
    pub const ALL: [Rule; 2] = [Rule::NewApi, Rule::DeletedApi];

    /// Rule ID used in output and config (`[rules.new-api]`).
    pub fn id(&self) -> &'static str {
        match self {
            Rule::NewApi => "new-api",
            Rule::DeletedApi => "deleted-api",
        }
    }

    pub fn from_id(id: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|r| r.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Rule::NewApi => "Add public types and members to the declared API",
            Rule::DeletedApi => "Remove deleted types and members from the declared API",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::NewApi => {
                "All public types and members should be declared in PublicAPI.txt. \
                 This draws attention to API changes in reviews and source control history."
            }
            Rule::DeletedApi => {
                "When removing a public type or member, the corresponding entry in \
                 PublicAPI.txt should also be removed."
            }
        }
    }

    pub fn default_level(&self) -> DiagnosticLevel {
        DiagnosticLevel::Error
    }
}

/// A diagnostic produced by the reconciler.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Diagnostic {
    pub rule: Rule,
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Source position for `new-api`, baseline position for `deleted-api`
    pub location: Location,
    /// Signature name this diagnostic is about
    pub signature: String,
    /// Textual fix suggestion; never applied automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// A public symbol that is not declared in the baseline.
    pub fn new_api(short_name: &str, signature: &str, location: Location) -> Self {
        Self {
            rule: Rule::NewApi,
            level: Rule::NewApi.default_level(),
            message: format!("Symbol '{}' is not part of the declared API.", short_name),
            location,
            signature: signature.to_string(),
            suggestion: Some(format!("add `{}` to the baseline", signature)),
        }
    }

    /// A baseline entry with no public symbol behind it.
    pub fn deleted_api(signature: &str, location: Location) -> Self {
        Self {
            rule: Rule::DeletedApi,
            level: Rule::DeletedApi.default_level(),
            message: format!(
                "Symbol '{}' is part of the declared API, but is either not public or could not be found.",
                signature
            ),
            location,
            signature: signature.to_string(),
            suggestion: Some("remove this line from the baseline".to_string()),
        }
    }

    pub fn with_level(mut self, level: DiagnosticLevel) -> Self {
        self.level = level;
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

/// Receiver of diagnostics; the host's reporting channel.
///
/// Called from worker threads during observation, hence `Sync`.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

/// Format a diagnostic for display.
pub fn format_diagnostic(diag: &Diagnostic, use_colors: bool) -> String {
    let level_str = match diag.level {
        DiagnosticLevel::Hint => paint("hint", Color::Cyan, use_colors),
        DiagnosticLevel::Warning => paint("warning", Color::Yellow, use_colors),
        DiagnosticLevel::Error => paint("error", Color::Red, use_colors),
    };

    let mut out = String::new();
    out.push_str(&format!("{}: ", diag.location));
    out.push_str(&format!("{} [{}]: ", level_str, bold(diag.rule.id(), use_colors)));
    out.push_str(&diag.message);

    if let Some(ref suggestion) = diag.suggestion {
        out.push_str(&format!("\n  suggestion: {}", suggestion));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_api_message_uses_short_name() {
        let diag = Diagnostic::new_api("M", "C.M() -> void", Location::on_line("C.cs", 2, 4, 1));
        assert_eq!(diag.rule, Rule::NewApi);
        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert_eq!(diag.message, "Symbol 'M' is not part of the declared API.");
        assert_eq!(diag.signature, "C.M() -> void");
    }

    #[test]
    fn test_deleted_api_message_uses_signature() {
        let diag = Diagnostic::deleted_api("C.Old() -> void", Location::degenerate("PublicAPI.txt"));
        assert!(diag.message.starts_with("Symbol 'C.Old() -> void' is part of the declared API"));
        assert!(diag.is_error());
    }

    #[test]
    fn test_rule_ids_round_trip() {
        for rule in Rule::ALL {
            assert_eq!(Rule::from_id(rule.id()), Some(rule));
        }
        assert_eq!(Rule::from_id("unknown"), None);
        assert_eq!(
            serde_json::to_string(&Rule::DeletedApi).unwrap(),
            "\"deleted-api\""
        );
    }

    #[test]
    fn test_format_diagnostic_plain() {
        let diag = Diagnostic::new_api("C", "C", Location::on_line("src/C.cs", 0, 13, 1));
        insta::assert_snapshot!(format_diagnostic(&diag, false), @r"
        src/C.cs:1:14: error [new-api]: Symbol 'C' is not part of the declared API.
          suggestion: add `C` to the baseline
        ");
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());
        sink.report(Diagnostic::deleted_api("X", Location::degenerate("PublicAPI.txt")));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.into_diagnostics()[0].signature, "X");
    }
}
