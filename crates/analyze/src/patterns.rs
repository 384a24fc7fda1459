//! Flow patterns: how lawsuits travel through the tiers.
//!
//! Every chain is summarized into a short textual pattern such as
//! `first instance favorable -> appellate upheld`, and the patterns are
//! counted. The table gives a quick feel for what the batch is made of
//! without reading individual chains.

use std::collections::BTreeMap;

use serde::Serialize;
use tramita_core::{ChainStatus, Reconciliation, ResolvedOutcome};

/// Aggregated pattern result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatternResult {
    pub counts: BTreeMap<String, usize>,
    pub distinct: usize,
    /// Highest count wins; ties go to the lexicographically first
    /// pattern.
    pub most_common: Option<String>,
}

/// Count the flow pattern of every chain in a run.
pub fn analyze_patterns(reconciliation: &Reconciliation) -> PatternResult {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for resolved in &reconciliation.chains {
        *counts.entry(pattern_label(&resolved.outcome)).or_default() += 1;
    }

    let mut most_common = None;
    let mut best = 0;
    for (pattern, &count) in &counts {
        if count > best {
            best = count;
            most_common = Some(pattern.clone());
        }
    }

    PatternResult {
        distinct: counts.len(),
        counts,
        most_common,
    }
}

/// Render one outcome as a pattern string.
fn pattern_label(outcome: &ResolvedOutcome) -> String {
    match outcome.status {
        ChainStatus::Settled => return "settled".to_string(),
        ChainStatus::Dismissed => return "dismissed".to_string(),
        ChainStatus::ReformedUnconfirmed => return "reformed, result unknown".to_string(),
        ChainStatus::Unknown => return "no usable evidence".to_string(),
        ChainStatus::Decided => {}
    }

    let Some(first) = outcome.steps.first() else {
        return match outcome.final_favorable_to_employee {
            Some(true) => "decided without appeal (favorable)".to_string(),
            Some(false) => "decided without appeal (unfavorable)".to_string(),
            None => "decided".to_string(),
        };
    };

    // The decision standing before the first step belongs to the lower
    // tier; an upheld step kept it, an overturned step flipped it.
    let lower_favorable = if first.upheld {
        first.favorable_to_employee
    } else {
        !first.favorable_to_employee
    };
    let mut label = format!(
        "{} {}",
        first.from_tier.label(),
        if lower_favorable { "favorable" } else { "unfavorable" }
    );
    for step in &outcome.steps {
        label.push_str(" -> ");
        label.push_str(step.to_tier.label());
        label.push_str(if step.upheld { " upheld" } else { " overturned" });
    }
    label
}
