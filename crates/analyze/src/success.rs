//! Employee success rates, overall and per tier.
//!
//! The overall rate counts decided chains whose final standing decision
//! favors the employee. Per-tier rates are reconstructed from the
//! resolved appeal steps: the decision standing before a step belongs
//! to the step's lower tier, the decision standing after it to the
//! higher tier.

use std::collections::BTreeMap;

use serde::Serialize;
use tramita_core::{ChainStatus, Confidence, Party, Reconciliation, Tier};

/// Decided/favorable tally for one slice of chains.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TierSuccess {
    pub decided: usize,
    pub favorable_to_employee: usize,
    /// `favorable_to_employee / decided`, absent when nothing decided.
    pub rate: Option<f64>,
}

impl TierSuccess {
    fn record(&mut self, favorable: bool) {
        self.decided += 1;
        if favorable {
            self.favorable_to_employee += 1;
        }
    }

    fn finish(&mut self) {
        if self.decided > 0 {
            self.rate = Some(self.favorable_to_employee as f64 / self.decided as f64);
        }
    }
}

/// Aggregated success-rate result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuccessResult {
    /// Final outcome across all decided chains.
    pub overall: TierSuccess,
    pub first_instance: TierSuccess,
    pub appellate: TierSuccess,
    pub superior: TierSuccess,
    /// Decided chains where every transition was directly observed.
    pub decided_high_confidence: usize,
    /// Decided chains that leaned on subject-matter inference or thin
    /// evidence.
    pub decided_inferred: usize,
    /// Chains with no final direction (non-merit or no evidence).
    pub undecided_chains: usize,
}

/// Compute employee success rates over one reconciliation run.
pub fn analyze_success(reconciliation: &Reconciliation) -> SuccessResult {
    let mut result = SuccessResult::default();

    for resolved in &reconciliation.chains {
        let outcome = &resolved.outcome;
        if outcome.status != ChainStatus::Decided {
            result.undecided_chains += 1;
            continue;
        }

        match outcome.final_favorable_to_employee {
            Some(favorable) => {
                result.overall.record(favorable);
                match outcome.confidence {
                    Confidence::High => result.decided_high_confidence += 1,
                    Confidence::Medium | Confidence::Low => result.decided_inferred += 1,
                }
            }
            None => result.undecided_chains += 1,
        }

        // One data point per tier per chain. A two-step chain mentions
        // the middle tier twice (after the first step, before the
        // second); the map collapses the duplicate.
        let mut per_tier: BTreeMap<Tier, bool> = BTreeMap::new();
        for step in &outcome.steps {
            match step.who_appealed {
                Party::Employer => {
                    per_tier.insert(step.from_tier, true);
                }
                Party::Employee => {
                    per_tier.insert(step.from_tier, false);
                }
                Party::Unknown => {}
            }
            per_tier.insert(step.to_tier, step.favorable_to_employee);
        }
        for (tier, favorable) in per_tier {
            match tier {
                Tier::FirstInstance => result.first_instance.record(favorable),
                Tier::Appellate => result.appellate.record(favorable),
                Tier::Superior => result.superior.record(favorable),
            }
        }
    }

    result.overall.finish();
    result.first_instance.finish();
    result.appellate.finish();
    result.superior.finish();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tramita_core::{
        CaseChain, ChainMember, Linkage, ResolvedChain, ResolvedOutcome, StepResolution,
    };

    fn chain_with(outcome: ResolvedOutcome) -> ResolvedChain {
        ResolvedChain {
            chain: CaseChain {
                members: vec![ChainMember {
                    record: 0,
                    linkage: Linkage::Key {
                        key: "001234520208".to_string(),
                        priority: 0,
                    },
                }],
                superseded: vec![],
            },
            outcome,
        }
    }

    fn reconciliation(chains: Vec<ResolvedChain>) -> Reconciliation {
        Reconciliation {
            config_version: "tpu-2024.1".to_string(),
            total_records: chains.len(),
            chains,
            residual: vec![],
            skipped: vec![],
        }
    }

    fn step(
        from: Tier,
        to: Tier,
        who: Party,
        favorable: bool,
        upheld: bool,
    ) -> StepResolution {
        StepResolution {
            from_tier: from,
            to_tier: to,
            who_appealed: who,
            favorable_to_employee: favorable,
            upheld,
        }
    }

    #[test]
    fn empty_run_has_no_rates() {
        let result = analyze_success(&reconciliation(vec![]));
        assert_eq!(result.overall.decided, 0);
        assert_eq!(result.overall.rate, None);
    }

    #[test]
    fn per_tier_rates_follow_the_steps() {
        // Granted below, employer appeal denied: favorable at both tiers.
        let upheld_chain = chain_with(ResolvedOutcome {
            final_favorable_to_employee: Some(true),
            who_appealed_per_step: vec![Party::Employer],
            steps: vec![step(
                Tier::FirstInstance,
                Tier::Appellate,
                Party::Employer,
                true,
                true,
            )],
            confidence: Confidence::High,
            status: ChainStatus::Decided,
        });
        // Denied below, employee appeal denied: unfavorable at both.
        let denied_chain = chain_with(ResolvedOutcome {
            final_favorable_to_employee: Some(false),
            who_appealed_per_step: vec![Party::Employee],
            steps: vec![step(
                Tier::FirstInstance,
                Tier::Appellate,
                Party::Employee,
                false,
                true,
            )],
            confidence: Confidence::High,
            status: ChainStatus::Decided,
        });

        let result = analyze_success(&reconciliation(vec![upheld_chain, denied_chain]));
        assert_eq!(result.overall.decided, 2);
        assert_eq!(result.overall.favorable_to_employee, 1);
        assert_eq!(result.overall.rate, Some(0.5));
        assert_eq!(result.first_instance.decided, 2);
        assert_eq!(result.first_instance.favorable_to_employee, 1);
        assert_eq!(result.appellate.decided, 2);
        assert_eq!(result.appellate.favorable_to_employee, 1);
        assert_eq!(result.superior.decided, 0);
    }

    #[test]
    fn middle_tier_counts_once_in_two_step_chain() {
        let chain = chain_with(ResolvedOutcome {
            final_favorable_to_employee: Some(true),
            who_appealed_per_step: vec![Party::Employee, Party::Employer],
            steps: vec![
                step(
                    Tier::FirstInstance,
                    Tier::Appellate,
                    Party::Employee,
                    true,
                    false,
                ),
                step(Tier::Appellate, Tier::Superior, Party::Employer, true, true),
            ],
            confidence: Confidence::High,
            status: ChainStatus::Decided,
        });

        let result = analyze_success(&reconciliation(vec![chain]));
        assert_eq!(result.appellate.decided, 1);
        assert_eq!(result.appellate.favorable_to_employee, 1);
        assert_eq!(result.first_instance.decided, 1);
        assert_eq!(result.first_instance.favorable_to_employee, 0);
        assert_eq!(result.superior.decided, 1);
    }

    #[test]
    fn undecided_chains_are_ignored() {
        let settled = chain_with(ResolvedOutcome {
            final_favorable_to_employee: None,
            who_appealed_per_step: vec![],
            steps: vec![],
            confidence: Confidence::High,
            status: ChainStatus::Settled,
        });
        let result = analyze_success(&reconciliation(vec![settled]));
        assert_eq!(result.overall.decided, 0);
        assert_eq!(result.decided_high_confidence, 0);
        assert_eq!(result.undecided_chains, 1);
    }

    #[test]
    fn confidence_split_tracks_inference() {
        let observed = chain_with(ResolvedOutcome {
            final_favorable_to_employee: Some(true),
            who_appealed_per_step: vec![],
            steps: vec![],
            confidence: Confidence::High,
            status: ChainStatus::Decided,
        });
        let inferred = chain_with(ResolvedOutcome {
            final_favorable_to_employee: Some(false),
            who_appealed_per_step: vec![Party::Employee],
            steps: vec![],
            confidence: Confidence::Medium,
            status: ChainStatus::Decided,
        });
        let result = analyze_success(&reconciliation(vec![observed, inferred]));
        assert_eq!(result.decided_high_confidence, 1);
        assert_eq!(result.decided_inferred, 1);
    }
}
