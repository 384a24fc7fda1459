//! Outcome breakdowns by origin court and filing year.
//!
//! Each chain is attributed to its lowest-tier member: the court the
//! lawsuit started in and the year it was filed. Chains whose lowest
//! record lacks the attribute are left out of that table.

use std::collections::BTreeMap;

use serde::Serialize;
use tramita_core::{CaseRecord, ChainStatus, Reconciliation, ResolvedChain};

/// Per-group outcome tally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutcomeTally {
    pub chains: usize,
    pub decided: usize,
    pub favorable_to_employee: usize,
    pub settled: usize,
    pub dismissed: usize,
}

impl OutcomeTally {
    fn record(&mut self, resolved: &ResolvedChain) {
        self.chains += 1;
        match resolved.outcome.status {
            ChainStatus::Decided => {
                self.decided += 1;
                if resolved.outcome.final_favorable_to_employee == Some(true) {
                    self.favorable_to_employee += 1;
                }
            }
            ChainStatus::Settled => self.settled += 1,
            ChainStatus::Dismissed => self.dismissed += 1,
            ChainStatus::ReformedUnconfirmed | ChainStatus::Unknown => {}
        }
    }
}

/// Aggregated breakdown result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BreakdownResult {
    pub by_court: BTreeMap<String, OutcomeTally>,
    pub by_filing_year: BTreeMap<i32, OutcomeTally>,
}

/// Group chain outcomes by origin court and filing year.
pub fn analyze_breakdown(
    reconciliation: &Reconciliation,
    records: &[CaseRecord],
) -> BreakdownResult {
    let mut result = BreakdownResult::default();

    for resolved in &reconciliation.chains {
        // Members are in tier order, so the first one is the origin.
        let Some(origin) = resolved.chain.members.first() else {
            continue;
        };
        let record = &records[origin.record];

        if !record.court.is_empty() {
            result
                .by_court
                .entry(record.court.clone())
                .or_default()
                .record(resolved);
        }
        if let Some(date) = record.filed_date {
            result
                .by_filing_year
                .entry(date.year())
                .or_default()
                .record(resolved);
        }
    }

    result
}
