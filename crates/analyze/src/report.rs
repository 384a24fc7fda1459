//! Aggregated report over all analysis dimensions.
//!
//! The report carries every dimension result, extracts notable
//! findings for summary display, and renders itself as markdown for
//! the CLI's report command.

use serde::Serialize;

use crate::breakdown::BreakdownResult;
use crate::coverage::CoverageResult;
use crate::patterns::PatternResult;
use crate::success::{SuccessResult, TierSuccess};
use crate::transitions::TransitionResult;

/// Severity level for an analysis finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FindingSeverity {
    Info,
    Warning,
}

/// A notable finding worth surfacing above the raw numbers.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub analysis: String,
    pub severity: FindingSeverity,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

/// Thresholds for finding extraction.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Warn when this share of decided chains rests on inferred
    /// appellants rather than observed transitions.
    pub inferred_warning_share: f64,
    /// Warn when this share of the batch stayed unlinked.
    pub residual_warning_share: f64,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        AnalyzeOptions {
            inferred_warning_share: 0.25,
            residual_warning_share: 0.5,
        }
    }
}

/// Aggregated analysis report over one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub config_version: String,
    pub success: SuccessResult,
    pub transitions: TransitionResult,
    pub breakdown: BreakdownResult,
    pub patterns: PatternResult,
    pub coverage: CoverageResult,
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    /// Extract findings from the dimension results.
    pub fn extract_findings(&mut self, options: &AnalyzeOptions) {
        self.findings.clear();

        let decided = self.success.overall.decided;
        if decided > 0 {
            let share = self.success.decided_inferred as f64 / decided as f64;
            if share > options.inferred_warning_share {
                self.findings.push(Finding {
                    analysis: "success".to_string(),
                    severity: FindingSeverity::Warning,
                    message: format!(
                        "{:.0}% of decided chains rest on inferred appellants ({} of {})",
                        share * 100.0,
                        self.success.decided_inferred,
                        decided
                    ),
                    details: Some(serde_json::json!({
                        "decided": decided,
                        "inferred": self.success.decided_inferred,
                        "share": share,
                    })),
                });
            }
        }

        if self.coverage.total_records > 0 {
            let share = self.coverage.residual as f64 / self.coverage.total_records as f64;
            if share > options.residual_warning_share {
                self.findings.push(Finding {
                    analysis: "coverage".to_string(),
                    severity: FindingSeverity::Warning,
                    message: format!(
                        "{} of {} records could not be linked into any chain",
                        self.coverage.residual, self.coverage.total_records
                    ),
                    details: Some(serde_json::json!({
                        "residual": self.coverage.residual,
                        "total_records": self.coverage.total_records,
                    })),
                });
            }
        }

        if self.coverage.skipped > 0 {
            self.findings.push(Finding {
                analysis: "coverage".to_string(),
                severity: FindingSeverity::Info,
                message: format!(
                    "{} record(s) excluded before grouping",
                    self.coverage.skipped
                ),
                details: None,
            });
        }

        if let Some(&unknown) = self.patterns.counts.get("no usable evidence") {
            self.findings.push(Finding {
                analysis: "patterns".to_string(),
                severity: FindingSeverity::Info,
                message: format!("{} chain(s) produced no usable outcome evidence", unknown),
                details: None,
            });
        }

        // Sort findings for deterministic output
        self.findings.sort_by(|a, b| {
            a.analysis
                .cmp(&b.analysis)
                .then_with(|| format!("{:?}", a.severity).cmp(&format!("{:?}", b.severity)))
                .then_with(|| a.message.cmp(&b.message))
        });
    }

    /// Render the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Reconciliation report\n\n");
        out.push_str(&format!("Code table: {}\n\n", self.config_version));

        out.push_str("## Coverage\n\n");
        out.push_str(&format!("- Records: {}\n", self.coverage.total_records));
        out.push_str(&format!(
            "- Linked into {} chain(s): {} records ({:.1}%)\n",
            self.coverage.chain_count,
            self.coverage.chained,
            self.coverage.chained_share * 100.0
        ));
        out.push_str(&format!("- Residual: {}\n", self.coverage.residual));
        out.push_str(&format!("- Skipped: {}\n\n", self.coverage.skipped));

        out.push_str("## Employee success\n\n");
        out.push_str("| Slice | Decided | Favorable | Rate |\n");
        out.push_str("|---|---|---|---|\n");
        push_success_row(&mut out, "Overall", &self.success.overall);
        push_success_row(&mut out, "First instance", &self.success.first_instance);
        push_success_row(&mut out, "Appellate", &self.success.appellate);
        push_success_row(&mut out, "Superior", &self.success.superior);
        out.push('\n');

        out.push_str("## Appeal transitions\n\n");
        out.push_str(&format!(
            "- Steps: {} (upheld rate {})\n",
            self.transitions.total_steps,
            fmt_rate(self.transitions.upheld_rate)
        ));
        out.push_str(&format!(
            "- Upheld: {} favorable, {} unfavorable\n",
            self.transitions.upheld_favorable, self.transitions.upheld_unfavorable
        ));
        out.push_str(&format!(
            "- Overturned: {} favorable, {} unfavorable\n",
            self.transitions.overturned_favorable, self.transitions.overturned_unfavorable
        ));
        out.push_str(&format!(
            "- Appellants: {} employee, {} employer, {} unknown\n",
            self.transitions.employee_appeals,
            self.transitions.employer_appeals,
            self.transitions.unknown_appellant
        ));
        out.push_str(&format!(
            "- Outside the merit track: {} settled, {} dismissed, {} reform-only, {} unknown\n\n",
            self.transitions.settled_chains,
            self.transitions.dismissed_chains,
            self.transitions.reformed_unconfirmed_chains,
            self.transitions.unknown_chains
        ));

        if !self.patterns.counts.is_empty() {
            out.push_str("## Flow patterns\n\n");
            out.push_str("| Pattern | Chains |\n");
            out.push_str("|---|---|\n");
            for (pattern, count) in &self.patterns.counts {
                out.push_str(&format!("| {} | {} |\n", pattern, count));
            }
            out.push('\n');
        }

        if !self.breakdown.by_court.is_empty() {
            out.push_str("## By court\n\n");
            out.push_str("| Court | Chains | Decided | Favorable | Settled | Dismissed |\n");
            out.push_str("|---|---|---|---|---|---|\n");
            for (court, tally) in &self.breakdown.by_court {
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    court,
                    tally.chains,
                    tally.decided,
                    tally.favorable_to_employee,
                    tally.settled,
                    tally.dismissed
                ));
            }
            out.push('\n');
        }

        if !self.breakdown.by_filing_year.is_empty() {
            out.push_str("## By filing year\n\n");
            out.push_str("| Year | Chains | Decided | Favorable | Settled | Dismissed |\n");
            out.push_str("|---|---|---|---|---|---|\n");
            for (year, tally) in &self.breakdown.by_filing_year {
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    year,
                    tally.chains,
                    tally.decided,
                    tally.favorable_to_employee,
                    tally.settled,
                    tally.dismissed
                ));
            }
            out.push('\n');
        }

        out.push_str("## Findings\n\n");
        if self.findings.is_empty() {
            out.push_str("No findings.\n");
        } else {
            for finding in &self.findings {
                let tag = match finding.severity {
                    FindingSeverity::Warning => "WARNING",
                    FindingSeverity::Info => "INFO",
                };
                out.push_str(&format!("- [{}] {}\n", tag, finding.message));
            }
        }
        out
    }
}

fn push_success_row(out: &mut String, label: &str, tally: &TierSuccess) {
    out.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        label,
        tally.decided,
        tally.favorable_to_employee,
        fmt_rate(tally.rate)
    ));
}

fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.1}%", r * 100.0),
        None => "n/a".to_string(),
    }
}
