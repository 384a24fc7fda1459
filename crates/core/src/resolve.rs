//! Outcome resolution: who appealed at each step of a chain and where
//! the lawsuit finally landed.
//!
//! The core rule is positional. Whoever holds the favorable decision
//! has no reason to appeal, so the presumed appellant at each step is
//! the party the lower decision went against, and the step outcome
//! follows from whether the appeal was granted. Evidence that cannot
//! feed that table (reform markers without a coded result, non-merit
//! terminations) degrades to an explicit status instead of a guess.

use crate::chain::CaseChain;
use crate::config::EngineConfig;
use crate::interpret::{Disposition, RecordInterpretation};
use crate::record::{CaseRecord, Tier};

/// A party to the lawsuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Party {
    Employee,
    Employer,
    Unknown,
}

/// How much the resolver trusts its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Confidence {
    /// Every transition came from directly observed movement codes.
    High,
    /// The appellant was inferred from subject matter.
    Medium,
    /// Thin or tied evidence.
    Low,
}

/// Terminal classification of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ChainStatus {
    /// A merit outcome was reached.
    Decided,
    /// Only a reform marker was found: a decision changed, but what it
    /// changed to was never coded.
    ReformedUnconfirmed,
    /// Settlement approved.
    Settled,
    /// Terminated without a merit direction.
    Dismissed,
    /// No usable evidence.
    Unknown,
}

/// One resolved appeal step between two tiers.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StepResolution {
    pub from_tier: Tier,
    pub to_tier: Tier,
    pub who_appealed: Party,
    /// Whether the decision standing AFTER this step favors the
    /// employee.
    pub favorable_to_employee: bool,
    /// True when the appeal was denied or not admitted, leaving the
    /// lower decision standing.
    pub upheld: bool,
}

/// The resolver's answer for one chain.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedOutcome {
    pub final_favorable_to_employee: Option<bool>,
    pub who_appealed_per_step: Vec<Party>,
    pub steps: Vec<StepResolution>,
    pub confidence: Confidence,
    pub status: ChainStatus,
}

impl ResolvedOutcome {
    fn undecided(status: ChainStatus, confidence: Confidence) -> Self {
        ResolvedOutcome {
            final_favorable_to_employee: None,
            who_appealed_per_step: Vec::new(),
            steps: Vec::new(),
            confidence,
            status,
        }
    }
}

/// One usable piece of verdict evidence, in tier order.
struct Finding {
    tier: Tier,
    /// Role-1 findings carry "favorable to employee"; appeal findings
    /// carry "appeal granted".
    value: bool,
    is_appeal: bool,
}

/// Pull the verdict evidence out of a chain, lowest tier first.
///
/// An appellate or superior record that replays the first-instance
/// judgment in its own movements contributes that judgment as a
/// first-instance finding when no dedicated first-instance record
/// supplied one.
fn collect_findings(
    records: &[CaseRecord],
    chain: &CaseChain,
    interps: &[Option<RecordInterpretation>],
) -> Vec<Finding> {
    let mut findings: Vec<Finding> = Vec::new();

    for member in &chain.members {
        let Some(interp) = interps[member.record].as_ref() else {
            continue;
        };
        let tier = records[member.record].tier;
        if tier == Tier::FirstInstance {
            if let Some(event) = &interp.first_instance {
                if let Some(favorable) = event.verdict.favorable_to_employee() {
                    findings.push(Finding {
                        tier,
                        value: favorable,
                        is_appeal: false,
                    });
                }
            }
            continue;
        }

        let has_first = findings.iter().any(|f| !f.is_appeal);
        if !has_first {
            if let Some(event) = &interp.first_instance {
                if let Some(favorable) = event.verdict.favorable_to_employee() {
                    findings.push(Finding {
                        tier: Tier::FirstInstance,
                        value: favorable,
                        is_appeal: false,
                    });
                }
            }
        }
        if let Some(event) = &interp.appeal {
            if let Some(granted) = event.verdict.appeal_granted() {
                findings.push(Finding {
                    tier,
                    value: granted,
                    is_appeal: true,
                });
            }
        }
    }

    findings
}

/// Weigh the chain's subject codes toward a likely appellant.
fn infer_appellant(
    config: &EngineConfig,
    records: &[CaseRecord],
    chain: &CaseChain,
) -> (Party, Confidence) {
    let keywords = &config.subject_keywords;
    let mut employee = 0u32;
    let mut employer = 0u32;

    for member in &chain.members {
        for subject in &records[member.record].subjects {
            let label = subject.label.to_lowercase();
            for keyword in &keywords.employee {
                if label.contains(keyword.as_str()) {
                    employee += 2;
                }
            }
            for keyword in &keywords.employer {
                if label.contains(keyword.as_str()) {
                    employer += 2;
                }
            }
            for keyword in &keywords.employee_weak {
                if label.contains(keyword.as_str()) {
                    employee += 1;
                }
            }
        }
    }

    if employee == 0 && employer == 0 {
        (Party::Unknown, Confidence::Low)
    } else if employee > employer {
        (Party::Employee, Confidence::Medium)
    } else if employer > employee {
        (Party::Employer, Confidence::Medium)
    } else {
        // Tied weights: the employee files the claim, so on balance the
        // employee is the likelier appellant, but the answer is weak.
        (Party::Employee, Confidence::Low)
    }
}

fn disposition_status(disposition: Disposition) -> ChainStatus {
    match disposition {
        Disposition::Settlement => ChainStatus::Settled,
        Disposition::DismissedWithoutPrejudice | Disposition::ResolvedWithPrejudice => {
            ChainStatus::Dismissed
        }
    }
}

/// Resolve a chain's end-to-end outcome.
///
/// `interps` must be parallel to `records`.
pub fn resolve_chain(
    records: &[CaseRecord],
    chain: &CaseChain,
    interps: &[Option<RecordInterpretation>],
    config: &EngineConfig,
) -> ResolvedOutcome {
    let findings = collect_findings(records, chain, interps);

    // A non-merit termination at or above the highest verdict tier
    // ends the lawsuit without a direction.
    let top_disposition = chain
        .members
        .iter()
        .filter_map(|m| {
            interps[m.record].as_ref().and_then(|i| {
                i.disposition
                    .as_ref()
                    .map(|d| (records[m.record].tier.rank(), d.disposition))
            })
        })
        .max_by_key(|(rank, _)| *rank);
    if let Some((disposition_rank, disposition)) = top_disposition {
        let top_verdict_rank = findings.iter().map(|f| f.tier.rank()).max().unwrap_or(0);
        if disposition_rank >= top_verdict_rank {
            return ResolvedOutcome::undecided(disposition_status(disposition), Confidence::High);
        }
    }

    if findings.is_empty() {
        let reform_seen = chain
            .members
            .iter()
            .any(|m| interps[m.record].as_ref().is_some_and(|i| i.reform.is_some()));
        let status = if reform_seen {
            ChainStatus::ReformedUnconfirmed
        } else {
            ChainStatus::Unknown
        };
        return ResolvedOutcome::undecided(status, Confidence::Low);
    }

    // Walk the findings, carrying who currently holds the favorable
    // decision. An appeal finding with nothing below it fixes the
    // position directly: a granted appeal occupies the same structural
    // slot as a granted claim.
    let mut steps: Vec<StepResolution> = Vec::new();
    let mut current: Option<(Tier, bool)> = None;
    for finding in &findings {
        match (current, finding.is_appeal) {
            (None, _) => {
                current = Some((finding.tier, finding.value));
            }
            (Some((from_tier, favorable)), true) => {
                let who_appealed = if favorable {
                    Party::Employer
                } else {
                    Party::Employee
                };
                let granted = finding.value;
                let after = if granted { !favorable } else { favorable };
                steps.push(StepResolution {
                    from_tier,
                    to_tier: finding.tier,
                    who_appealed,
                    favorable_to_employee: after,
                    upheld: !granted,
                });
                current = Some((finding.tier, after));
            }
            (Some(_), false) => {
                // A first-instance finding after the walk has started
                // carries no new position.
            }
        }
    }

    if !steps.is_empty() {
        let final_favorable = steps.last().map(|s| s.favorable_to_employee);
        let who_appealed_per_step = steps.iter().map(|s| s.who_appealed).collect();
        return ResolvedOutcome {
            final_favorable_to_employee: final_favorable,
            who_appealed_per_step,
            steps,
            confidence: Confidence::High,
            status: ChainStatus::Decided,
        };
    }

    // No transition to evaluate: a single finding.
    match findings.first() {
        Some(finding) if !finding.is_appeal => {
            // Last known outcome stands, but nothing confirms it
            // survived an appeal.
            ResolvedOutcome {
                final_favorable_to_employee: Some(finding.value),
                who_appealed_per_step: Vec::new(),
                steps: Vec::new(),
                confidence: Confidence::Low,
                status: ChainStatus::Decided,
            }
        }
        Some(finding) => {
            // A lone appeal verdict: someone appealed, the record trail
            // does not say who. Fall back to subject matter.
            let (who_appealed, confidence) = infer_appellant(config, records, chain);
            if who_appealed == Party::Unknown {
                return ResolvedOutcome {
                    final_favorable_to_employee: None,
                    who_appealed_per_step: vec![Party::Unknown],
                    steps: Vec::new(),
                    confidence: Confidence::Low,
                    status: ChainStatus::Unknown,
                };
            }
            let granted = finding.value;
            let favorable = if granted {
                who_appealed == Party::Employee
            } else {
                who_appealed == Party::Employer
            };
            ResolvedOutcome {
                final_favorable_to_employee: Some(favorable),
                who_appealed_per_step: vec![who_appealed],
                steps: Vec::new(),
                confidence,
                status: ChainStatus::Decided,
            }
        }
        None => ResolvedOutcome::undecided(ChainStatus::Unknown, Confidence::Low),
    }
}
