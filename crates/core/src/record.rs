//! Input record model.
//!
//! A [`CaseRecord`] is one court-system entry for a lawsuit at a single
//! tier. The same underlying lawsuit typically produces one record per
//! tier it reached, each with its own movement history. Linking those
//! records back together is the job of [`crate::chain`].

use time::Date;

/// Judicial tier a record was captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum Tier {
    /// First-instance labor court (a single judge).
    FirstInstance,
    /// Regional appellate court.
    Appellate,
    /// Superior labor court.
    Superior,
}

impl Tier {
    /// Numeric rank used for ordering chain members: 1, 2, 3.
    pub fn rank(&self) -> u8 {
        match self {
            Tier::FirstInstance => 1,
            Tier::Appellate => 2,
            Tier::Superior => 3,
        }
    }

    /// Human-readable label for reports and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::FirstInstance => "first instance",
            Tier::Appellate => "appellate",
            Tier::Superior => "superior",
        }
    }
}

/// One procedural movement in a record's history.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementEvent {
    /// Standardized movement-table code (e.g. 219, 237).
    pub code: u32,
    /// Timestamp string as recorded by the source system.
    pub timestamp: String,
    /// Qualifying attachments, e.g. the kind of decision reformed.
    pub attachments: Vec<MovementAttachment>,
}

/// Named qualifier attached to a movement.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementAttachment {
    pub name: String,
    pub value: Option<String>,
}

/// Standardized subject-matter code with its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectCode {
    pub code: u32,
    pub label: String,
}

/// One court-system record: a lawsuit as seen from a single tier.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    /// Case number exactly as the source system carries it, punctuation
    /// and all.
    pub raw_number: String,
    pub tier: Tier,
    /// Court identifier (e.g. "TRT02", "TST").
    pub court: String,
    /// Filing date, when the source provided a parseable one.
    pub filed_date: Option<Date>,
    pub subjects: Vec<SubjectCode>,
    /// Movement history in source order.
    pub movements: Vec<MovementEvent>,
}

impl CaseRecord {
    /// True when the record carries no usable case number (nothing to
    /// normalize, so the record cannot participate in linking).
    pub fn has_number(&self) -> bool {
        self.raw_number.chars().any(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ranks_are_ordered() {
        assert!(Tier::FirstInstance < Tier::Appellate);
        assert!(Tier::Appellate < Tier::Superior);
        assert_eq!(Tier::FirstInstance.rank(), 1);
        assert_eq!(Tier::Superior.rank(), 3);
    }

    #[test]
    fn has_number_requires_a_digit() {
        let mut rec = CaseRecord {
            raw_number: "---".to_string(),
            tier: Tier::FirstInstance,
            court: "TRT02".to_string(),
            filed_date: None,
            subjects: vec![],
            movements: vec![],
        };
        assert!(!rec.has_number());
        rec.raw_number = "0001234-56.2020.5.02.0001".to_string();
        assert!(rec.has_number());
    }
}
