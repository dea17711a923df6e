//! One analysis session: observe every symbol, then sweep for deletions.
//!
//! ```text
//! Session::start ──> observe(symbol) × N (any thread, any order) ──> finish()
//! ```
//!
//! `observe` borrows the session shared, `finish` consumes it, so every
//! observation has completed before the deleted-API sweep can start.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use apiledger_symbols::{CanonicalNames, SymbolGraph, SymbolId, is_public_api};

use crate::baseline::{AdditionalFile, Baseline, find_baseline};
use crate::config::ApiLedgerConfig;
use crate::diagnostic::{Diagnostic, DiagnosticSink};

/// What happened to one observed symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// Not a kind the baseline tracks, or an event add/remove accessor
    Skipped,
    NotPublic,
    /// Public and declared in the baseline
    Declared,
    /// Public and missing from the baseline; one diagnostic per location
    New { reported: usize },
}

/// State of one analysis session.
///
/// The declared set is fixed at start; the examined set only grows.
#[derive(Debug)]
pub struct Session {
    baseline: Baseline,
    examined: Mutex<HashSet<String>>,
}

impl Session {
    /// Start a session if the baseline is among `files`.
    ///
    /// Returns `None` when there is no baseline: the check is opt-in per
    /// compilation and is skipped entirely.
    pub fn start(files: &[AdditionalFile], config: &ApiLedgerConfig) -> Option<Self> {
        let file_name = config.baseline.file_name();
        let Some(file) = find_baseline(files, file_name) else {
            tracing::debug!(file_name, "no baseline among additional files, skipping");
            return None;
        };
        Some(Self::with_baseline(Baseline::from_file(file)))
    }

    pub fn with_baseline(baseline: Baseline) -> Self {
        tracing::debug!(
            path = %baseline.path().display(),
            declared = baseline.len(),
            "starting session"
        );
        Self {
            baseline,
            examined: Mutex::new(HashSet::new()),
        }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Observe one discovered symbol.
    ///
    /// Safe to call concurrently. Recording the name and reporting happen
    /// under a single lock acquisition. Every undeclared observation reports
    /// its own locations, so distinct symbols sharing a signature are all
    /// reported whatever order they arrive in.
    pub fn observe(
        &self,
        graph: &SymbolGraph,
        id: SymbolId,
        sink: &dyn DiagnosticSink,
    ) -> Observation {
        let Some(symbol) = graph.get(id) else {
            return Observation::Skipped;
        };
        if !symbol.is_examinable() || symbol.is_ignorable_accessor() {
            return Observation::Skipped;
        }
        if !is_public_api(graph, id) {
            return Observation::NotPublic;
        }

        let names = CanonicalNames::of(graph, id);
        tracing::trace!(signature = %names.signature, "observed public symbol");

        let mut examined = self.examined.lock().unwrap_or_else(PoisonError::into_inner);
        examined.insert(names.signature.clone());
        if self.baseline.contains(&names.signature) {
            return Observation::Declared;
        }
        for location in &symbol.locations {
            sink.report(Diagnostic::new_api(
                &names.short,
                &names.signature,
                location.clone(),
            ));
        }
        Observation::New {
            reported: symbol.locations.len(),
        }
    }

    /// Snapshot of the names examined so far.
    pub fn examined(&self) -> HashSet<String> {
        self.examined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// End the session: report every declared name that was never examined.
    ///
    /// Names are reported in sorted order. A name whose line cannot be found
    /// is anchored at an empty location in the baseline file.
    pub fn finish(self, sink: &dyn DiagnosticSink) -> Vec<String> {
        let examined = self
            .examined
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut deleted: Vec<String> = self
            .baseline
            .declared()
            .iter()
            .filter(|name| !examined.contains(*name))
            .cloned()
            .collect();
        deleted.sort();

        for name in &deleted {
            let location = self.baseline.locate_or_degenerate(name);
            sink.report(Diagnostic::deleted_api(name, location));
        }
        tracing::debug!(
            examined = examined.len(),
            deleted = deleted.len(),
            "session finished"
        );
        deleted
    }
}
