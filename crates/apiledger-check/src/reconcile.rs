//! Drive a [`Session`] over a whole symbol graph.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use apiledger_output::{OutputFormatter, bold, paint};
use apiledger_symbols::{DisplayFormat, SymbolGraph, SymbolId, is_public_api};
use nu_ansi_term::Color;
use rayon::prelude::*;
use serde::Serialize;

use crate::baseline::AdditionalFile;
use crate::config::{ApiLedgerConfig, ConfiguredSink};
use crate::diagnostic::{
    CollectingSink, Diagnostic, DiagnosticLevel, DiagnosticSink, Rule, format_diagnostic,
};
use crate::session::Session;

/// Errors that abort a check.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("check cancelled")]
    Cancelled,
}

/// Cooperative cancellation signal shared between the host and the driver.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What [`run`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Distinct signature names examined
    pub examined: usize,
    /// Declared names with no public symbol behind them, sorted
    pub deleted: Vec<String>,
}

/// Observe every symbol of `graph` in parallel, then finish the session.
///
/// Cancellation is checked before each observation. A cancelled run never
/// reaches `finish`, so no `deleted-api` diagnostics are emitted for it.
pub fn run(
    graph: &SymbolGraph,
    session: Session,
    sink: &dyn DiagnosticSink,
    cancel: &CancellationToken,
) -> Result<RunOutcome, CheckError> {
    let ids: Vec<SymbolId> = graph.ids().collect();
    ids.par_iter().try_for_each(|&id| {
        if cancel.is_cancelled() {
            return Err(CheckError::Cancelled);
        }
        session.observe(graph, id, sink);
        Ok(())
    })?;

    let examined = session.examined().len();
    let deleted = session.finish(sink);
    Ok(RunOutcome { examined, deleted })
}

/// Run a full check: find the baseline, reconcile, collect diagnostics.
pub fn check(
    graph: &SymbolGraph,
    files: &[AdditionalFile],
    config: &ApiLedgerConfig,
    cancel: &CancellationToken,
) -> Result<CheckReport, CheckError> {
    let Some(session) = Session::start(files, config) else {
        return Ok(CheckReport::skipped(config.baseline.file_name()));
    };
    let baseline = session.baseline().path().display().to_string();
    let declared = session.baseline().len();

    let collected = CollectingSink::new();
    let outcome = run(graph, session, &ConfiguredSink::new(config, &collected), cancel)?;

    let mut diagnostics = collected.into_diagnostics();
    sort_diagnostics(&mut diagnostics);
    Ok(CheckReport {
        baseline: Some(baseline),
        skipped_reason: None,
        declared,
        examined: outcome.examined,
        diagnostics,
    })
}

fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (&a.location.file, a.location.lines.start, a.rule, &a.signature).cmp(&(
            &b.location.file,
            b.location.lines.start,
            b.rule,
            &b.signature,
        ))
    });
}

/// Signature names of every symbol currently in the public API, sorted.
///
/// A baseline with exactly these lines reconciles cleanly.
pub fn public_api(graph: &SymbolGraph) -> Vec<String> {
    graph
        .iter()
        .filter(|(id, symbol)| {
            symbol.is_examinable() && !symbol.is_ignorable_accessor() && is_public_api(graph, *id)
        })
        .map(|(id, _)| graph.render(id, &DisplayFormat::SIGNATURE))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Result of `apiledger check`.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct CheckReport {
    /// Path of the baseline used; absent when the check was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_reason: Option<String>,
    /// Distinct names in the baseline
    pub declared: usize,
    /// Distinct public names examined
    pub examined: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    fn skipped(file_name: &str) -> Self {
        Self {
            baseline: None,
            skipped_reason: Some(format!("no {} among additional files", file_name)),
            declared: 0,
            examined: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.baseline.is_none()
    }

    pub fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    fn summary(&self) -> String {
        if let Some(reason) = &self.skipped_reason {
            return format!("skipped: {}", reason);
        }
        if self.diagnostics.is_empty() {
            return format!(
                "ok: {} declared, {} examined, no drift",
                self.declared, self.examined
            );
        }
        format!(
            "{} error(s), {} warning(s), {} hint(s)",
            self.count(DiagnosticLevel::Error),
            self.count(DiagnosticLevel::Warning),
            self.count(DiagnosticLevel::Hint),
        )
    }
}

impl OutputFormatter for CheckReport {
    fn format_text(&self) -> String {
        let mut lines: Vec<String> = self
            .diagnostics
            .iter()
            .map(|d| format_diagnostic(d, false))
            .collect();
        lines.push(self.summary());
        lines.join("\n")
    }

    fn format_pretty(&self, colors: bool) -> String {
        let mut lines = Vec::new();
        if let Some(baseline) = &self.baseline {
            lines.push(bold(&format!("# {}", baseline), colors));
            lines.push(String::new());
        }
        for diag in &self.diagnostics {
            lines.push(format_diagnostic(diag, colors));
        }
        if !self.diagnostics.is_empty() {
            lines.push(String::new());
        }
        let color = if self.has_errors() {
            Color::Red
        } else if self.diagnostics.is_empty() {
            Color::Green
        } else {
            Color::Yellow
        };
        lines.push(paint(&self.summary(), color, colors));
        lines.join("\n")
    }
}

/// Result of `apiledger list`.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct ApiListing {
    pub signatures: Vec<String>,
}

impl ApiListing {
    pub fn of(graph: &SymbolGraph) -> Self {
        Self {
            signatures: public_api(graph),
        }
    }
}

impl OutputFormatter for ApiListing {
    fn format_text(&self) -> String {
        self.signatures.join("\n")
    }
}

/// One rule as the loaded config sees it.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct RuleEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: DiagnosticLevel,
    pub enabled: bool,
}

/// Result of `apiledger rules`.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct RuleListing {
    pub rules: Vec<RuleEntry>,
    #[serde(skip)]
    show_descriptions: bool,
}

impl RuleListing {
    pub fn of(config: &ApiLedgerConfig) -> Self {
        let rules = Rule::ALL
            .into_iter()
            .map(|rule| RuleEntry {
                id: rule.id().to_string(),
                title: rule.title().to_string(),
                description: rule.description().to_string(),
                level: config.rule_level(rule),
                enabled: config.rule_enabled(rule),
            })
            .collect();
        Self {
            rules,
            show_descriptions: true,
        }
    }

    pub fn without_descriptions(mut self) -> Self {
        self.show_descriptions = false;
        self
    }

    fn format(&self, colors: bool) -> String {
        let mut lines = Vec::new();
        for entry in &self.rules {
            let state = if entry.enabled {
                entry.level.as_str()
            } else {
                "disabled"
            };
            lines.push(format!(
                "{} {:<8} {}",
                bold(&format!("{:<12}", entry.id), colors),
                state,
                entry.title
            ));
            if self.show_descriptions {
                lines.push(format!("    {}", entry.description));
            }
        }
        lines.join("\n")
    }
}

impl OutputFormatter for RuleListing {
    fn format_text(&self) -> String {
        self.format(false)
    }

    fn format_pretty(&self, colors: bool) -> String {
        self.format(colors)
    }
}
