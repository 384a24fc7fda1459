//! tramita-analyze: statistics and reporting over reconciliation
//! results.
//!
//! Each dimension is a separate module producing a serializable result
//! struct. The `analyze()` function orchestrates all dimensions and
//! aggregates them into an [`AnalysisReport`] with notable findings
//! and a markdown rendering.

pub mod breakdown;
pub mod coverage;
pub mod patterns;
pub mod report;
pub mod success;
pub mod transitions;

use tramita_core::{CaseRecord, Reconciliation};

pub use breakdown::{BreakdownResult, OutcomeTally};
pub use coverage::CoverageResult;
pub use patterns::PatternResult;
pub use report::{AnalysisReport, AnalyzeOptions, Finding, FindingSeverity};
pub use success::{SuccessResult, TierSuccess};
pub use transitions::TransitionResult;

/// Run every analysis dimension over one reconciliation run.
pub fn analyze(reconciliation: &Reconciliation, records: &[CaseRecord]) -> AnalysisReport {
    analyze_with(reconciliation, records, &AnalyzeOptions::default())
}

/// Like [`analyze`], with explicit finding thresholds.
pub fn analyze_with(
    reconciliation: &Reconciliation,
    records: &[CaseRecord],
    options: &AnalyzeOptions,
) -> AnalysisReport {
    let success = success::analyze_success(reconciliation);
    let transitions = transitions::analyze_transitions(reconciliation);
    let breakdown = breakdown::analyze_breakdown(reconciliation, records);
    let patterns = patterns::analyze_patterns(reconciliation);
    let coverage = coverage::analyze_coverage(reconciliation);

    let mut report = AnalysisReport {
        config_version: reconciliation.config_version.clone(),
        success,
        transitions,
        breakdown,
        patterns,
        coverage,
        findings: Vec::new(),
    };
    report.extract_findings(options);
    report
}
