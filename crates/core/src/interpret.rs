//! Movement interpretation: from a record's raw movement history to
//! the verdicts it evidences.
//!
//! The interpreter is an allow-list over the configured code table.
//! Codes the table does not know are skipped, and within each semantic
//! category the LAST recognized event wins, because registries append
//! corrective entries rather than rewrite history.

use crate::config::{CodeMeaning, EngineConfig};
use crate::record::{CaseRecord, Tier};

/// A merit decision recognized from a movement code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Verdict {
    /// Claim granted in full (first instance).
    Granted,
    /// Claim denied (first instance).
    Denied,
    /// Claim granted in part (first instance).
    PartiallyGranted,
    /// Appeal granted in full.
    AppealGranted,
    /// Appeal granted in part.
    AppealPartiallyGranted,
    /// Appeal denied on the merits.
    AppealDenied,
    /// Appeal not admitted for review. Behaves like a denial when
    /// resolving outcomes but stays distinct so reports can count it.
    AppealNotAdmitted,
}

impl Verdict {
    /// True for the verdicts a first-instance judge hands down.
    pub fn is_first_instance(&self) -> bool {
        matches!(
            self,
            Verdict::Granted | Verdict::Denied | Verdict::PartiallyGranted
        )
    }

    /// For first-instance verdicts: does the decision favor the
    /// employee? Partial grants count as favorable.
    pub fn favorable_to_employee(&self) -> Option<bool> {
        match self {
            Verdict::Granted | Verdict::PartiallyGranted => Some(true),
            Verdict::Denied => Some(false),
            _ => None,
        }
    }

    /// For appeal verdicts: was the appeal granted? Partial grants
    /// count as granted; not-admitted counts as not granted.
    pub fn appeal_granted(&self) -> Option<bool> {
        match self {
            Verdict::AppealGranted | Verdict::AppealPartiallyGranted => Some(true),
            Verdict::AppealDenied | Verdict::AppealNotAdmitted => Some(false),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Granted => "claim granted",
            Verdict::Denied => "claim denied",
            Verdict::PartiallyGranted => "claim partially granted",
            Verdict::AppealGranted => "appeal granted",
            Verdict::AppealPartiallyGranted => "appeal partially granted",
            Verdict::AppealDenied => "appeal denied",
            Verdict::AppealNotAdmitted => "appeal not admitted",
        }
    }
}

/// A non-merit termination of the proceeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Disposition {
    /// Settlement approved by the court.
    Settlement,
    /// Dismissed without reaching the merits.
    DismissedWithoutPrejudice,
    /// Resolved with prejudice, no verdict direction recorded.
    ResolvedWithPrejudice,
}

impl Disposition {
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Settlement => "settlement approved",
            Disposition::DismissedWithoutPrejudice => "dismissed without prejudice",
            Disposition::ResolvedWithPrejudice => "resolved with prejudice",
        }
    }
}

/// A recognized verdict together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictEvent {
    pub verdict: Verdict,
    pub code: u32,
    pub timestamp: String,
    /// Index into the record's movement list.
    pub movement_index: usize,
}

/// A code-190 "prior decision reformed" event.
#[derive(Debug, Clone, PartialEq)]
pub struct ReformEvent {
    pub code: u32,
    pub timestamp: String,
    /// The kind of decision that was reformed, when a qualifying
    /// attachment names it.
    pub prior_decision: Option<String>,
}

/// A recognized non-merit termination.
#[derive(Debug, Clone, PartialEq)]
pub struct DispositionEvent {
    pub disposition: Disposition,
    pub code: u32,
    pub timestamp: String,
}

/// Everything the interpreter recognized in one record.
///
/// A record can legitimately carry BOTH a first-instance verdict and an
/// appeal verdict: appellate dockets replay the original judgment
/// before recording their own. Both slots are kept; the resolver treats
/// the pair as a directly observed transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordInterpretation {
    pub first_instance: Option<VerdictEvent>,
    pub appeal: Option<VerdictEvent>,
    pub reform: Option<ReformEvent>,
    pub disposition: Option<DispositionEvent>,
}

impl RecordInterpretation {
    /// The verdict slot appropriate to the tier the record sits at.
    pub fn outcome_for_tier(&self, tier: Tier) -> Option<&VerdictEvent> {
        match tier {
            Tier::FirstInstance => self.first_instance.as_ref(),
            Tier::Appellate | Tier::Superior => self.appeal.as_ref(),
        }
    }

    /// True when the only evidence at the record's own tier is a
    /// reform marker: something changed, but what it changed to was
    /// never coded.
    pub fn reform_only(&self, tier: Tier) -> bool {
        self.reform.is_some() && self.outcome_for_tier(tier).is_none()
    }

    /// Both verdict categories present in one movement list.
    pub fn has_within_record_transition(&self) -> bool {
        self.first_instance.is_some() && self.appeal.is_some()
    }

    fn is_empty(&self) -> bool {
        self.first_instance.is_none()
            && self.appeal.is_none()
            && self.reform.is_none()
            && self.disposition.is_none()
    }
}

/// Attachment names that carry the reformed-decision type.
fn is_prior_decision_attachment(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("decis") || lower.contains("tipo")
}

/// Interpret one record's movement history.
///
/// Returns `None` when no configured code appears at all; callers must
/// treat that as "outcome unknown", never as a denial.
pub fn interpret_record(config: &EngineConfig, record: &CaseRecord) -> Option<RecordInterpretation> {
    let mut interp = RecordInterpretation::default();

    for (index, movement) in record.movements.iter().enumerate() {
        let Some(meaning) = config.code_table.get(&movement.code) else {
            continue;
        };
        match meaning {
            CodeMeaning::Verdict(verdict) => {
                let event = VerdictEvent {
                    verdict: *verdict,
                    code: movement.code,
                    timestamp: movement.timestamp.clone(),
                    movement_index: index,
                };
                if verdict.is_first_instance() {
                    interp.first_instance = Some(event);
                } else {
                    interp.appeal = Some(event);
                }
            }
            CodeMeaning::DecisionReformed => {
                let prior_decision = movement
                    .attachments
                    .iter()
                    .find(|a| is_prior_decision_attachment(&a.name))
                    .and_then(|a| a.value.clone());
                interp.reform = Some(ReformEvent {
                    code: movement.code,
                    timestamp: movement.timestamp.clone(),
                    prior_decision,
                });
            }
            CodeMeaning::Disposition(disposition) => {
                interp.disposition = Some(DispositionEvent {
                    disposition: *disposition,
                    code: movement.code,
                    timestamp: movement.timestamp.clone(),
                });
            }
        }
    }

    if interp.is_empty() {
        None
    } else {
        Some(interp)
    }
}
