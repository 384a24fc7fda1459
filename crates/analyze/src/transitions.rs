//! Appeal transition statistics.
//!
//! Every resolved step is one appellate review of a lower decision.
//! This module counts how often the lower decision survived, split by
//! which direction the standing decision pointed afterwards, and who
//! carried the appeals.

use serde::Serialize;
use tramita_core::{ChainStatus, Party, Reconciliation};

/// Aggregated transition result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransitionResult {
    pub total_steps: usize,
    /// Lower decision survived, standing decision favors the employee.
    pub upheld_favorable: usize,
    /// Lower decision survived, standing decision favors the employer.
    pub upheld_unfavorable: usize,
    /// Appeal granted, decision now favors the employee.
    pub overturned_favorable: usize,
    /// Appeal granted, decision now favors the employer.
    pub overturned_unfavorable: usize,
    pub employee_appeals: usize,
    pub employer_appeals: usize,
    pub unknown_appellant: usize,
    /// Chains that terminated outside the truth table.
    pub reformed_unconfirmed_chains: usize,
    pub settled_chains: usize,
    pub dismissed_chains: usize,
    pub unknown_chains: usize,
    /// Share of steps where the lower decision survived.
    pub upheld_rate: Option<f64>,
}

/// Tally appeal transitions across all chains of a run.
pub fn analyze_transitions(reconciliation: &Reconciliation) -> TransitionResult {
    let mut result = TransitionResult::default();

    for resolved in &reconciliation.chains {
        match resolved.outcome.status {
            ChainStatus::ReformedUnconfirmed => result.reformed_unconfirmed_chains += 1,
            ChainStatus::Settled => result.settled_chains += 1,
            ChainStatus::Dismissed => result.dismissed_chains += 1,
            ChainStatus::Unknown => result.unknown_chains += 1,
            ChainStatus::Decided => {}
        }
        for step in &resolved.outcome.steps {
            result.total_steps += 1;
            match (step.upheld, step.favorable_to_employee) {
                (true, true) => result.upheld_favorable += 1,
                (true, false) => result.upheld_unfavorable += 1,
                (false, true) => result.overturned_favorable += 1,
                (false, false) => result.overturned_unfavorable += 1,
            }
            match step.who_appealed {
                Party::Employee => result.employee_appeals += 1,
                Party::Employer => result.employer_appeals += 1,
                Party::Unknown => result.unknown_appellant += 1,
            }
        }
    }

    if result.total_steps > 0 {
        let upheld = result.upheld_favorable + result.upheld_unfavorable;
        result.upheld_rate = Some(upheld as f64 / result.total_steps as f64);
    }
    result
}
