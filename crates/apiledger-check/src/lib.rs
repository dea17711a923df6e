//! Public API baseline reconciliation.
//!
//! Compares the public surface of a [`SymbolGraph`](apiledger_symbols::SymbolGraph)
//! against a checked-in `PublicAPI.txt` and reports drift in both directions:
//!
//! - `new-api`: a public symbol the baseline does not declare;
//! - `deleted-api`: a baseline line with no public symbol behind it.
//!
//! The building block is [`Session`]; [`reconcile::check`] drives one over a
//! whole graph.

mod baseline;
pub mod config;
mod diagnostic;
pub mod reconcile;
mod session;

pub use baseline::{AdditionalFile, BASELINE_FILE_NAME, Baseline, BaselineError, find_baseline};
pub use config::{ApiLedgerConfig, BaselineConfig, ConfigError, ConfiguredSink, RuleOverride};
pub use diagnostic::{
    CollectingSink, Diagnostic, DiagnosticLevel, DiagnosticSink, Rule, format_diagnostic,
};
pub use reconcile::{
    ApiListing, CancellationToken, CheckError, CheckReport, RuleEntry, RuleListing, RunOutcome, check,
    public_api, run,
};
pub use session::{Observation, Session};
