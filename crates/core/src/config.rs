//! Engine configuration: the versioned movement-code table, the
//! similarity threshold, and the subject-keyword lists used by the
//! appellant heuristic.
//!
//! The code table ships with the standardized movement codes the
//! Brazilian labor courts publish, but callers may supply their own
//! table (courts add codes between table revisions, and the `version`
//! string records which revision a run was interpreted against).

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::interpret::{Disposition, Verdict};

/// What a movement code means to the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeMeaning {
    /// A merit decision at some tier.
    Verdict(Verdict),
    /// Code 190: a prior decision was reformed. Not a verdict by
    /// itself; the qualifying attachment says what was reformed.
    DecisionReformed,
    /// A non-merit termination of the proceeding.
    Disposition(Disposition),
}

/// Subject-keyword lists for inferring the likely appellant when the
/// record trail is too thin to observe one directly.
///
/// A subject label matching an `employee` or `employer` entry counts
/// double; `employee_weak` entries count once. Matching is
/// case-insensitive substring containment over the subject label.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectKeywords {
    pub employee: Vec<String>,
    pub employer: Vec<String>,
    pub employee_weak: Vec<String>,
}

impl SubjectKeywords {
    fn standard() -> Self {
        let own = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        SubjectKeywords {
            employee: own(&[
                "salário",
                "horas extras",
                "adicional",
                "indenização por dano",
                "equiparação",
                "diferenças salariais",
                "gratificação",
                "comissões",
                "prêmios",
                "participação nos lucros",
                "verbas rescisórias",
                "remuneração",
            ]),
            employer: own(&[
                "justa causa",
                "contribuição sindical",
                "multa administrativa",
                "reintegração",
                "estabilidade",
                "readmissão",
            ]),
            employee_weak: own(&["assédio", "dano moral"]),
        }
    }
}

/// Tuning and reference data for one reconciliation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Revision label of the movement-code table in `code_table`.
    pub version: String,
    /// Movement code to interpreted meaning. Codes absent from the
    /// table are ignored by the interpreter.
    pub code_table: BTreeMap<u32, CodeMeaning>,
    /// Minimum similarity score for the fuzzy linking passes.
    pub similarity_threshold: f64,
    pub subject_keywords: SubjectKeywords,
}

impl EngineConfig {
    /// The standardized code table and default tuning.
    pub fn standard() -> Self {
        let mut table = BTreeMap::new();
        // First-instance merit decisions.
        table.insert(219, CodeMeaning::Verdict(Verdict::Granted));
        table.insert(220, CodeMeaning::Verdict(Verdict::Denied));
        table.insert(221, CodeMeaning::Verdict(Verdict::PartiallyGranted));
        // Appeal merit decisions.
        table.insert(237, CodeMeaning::Verdict(Verdict::AppealGranted));
        table.insert(238, CodeMeaning::Verdict(Verdict::AppealPartiallyGranted));
        table.insert(242, CodeMeaning::Verdict(Verdict::AppealDenied));
        table.insert(236, CodeMeaning::Verdict(Verdict::AppealNotAdmitted));
        // Reform marker.
        table.insert(190, CodeMeaning::DecisionReformed);
        // Non-merit terminations.
        table.insert(471, CodeMeaning::Disposition(Disposition::Settlement));
        table.insert(
            466,
            CodeMeaning::Disposition(Disposition::DismissedWithoutPrejudice),
        );
        table.insert(
            487,
            CodeMeaning::Disposition(Disposition::ResolvedWithPrejudice),
        );
        EngineConfig {
            version: "tpu-2024.1".to_string(),
            code_table: table,
            similarity_threshold: 0.8,
            subject_keywords: SubjectKeywords::standard(),
        }
    }

    /// Check the configuration before any records are processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.similarity_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::InvalidThreshold(t));
        }
        if self.code_table.is_empty() {
            return Err(ConfigError::EmptyCodeTable);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_validates() {
        assert!(EngineConfig::standard().validate().is_ok());
    }

    #[test]
    fn threshold_outside_unit_interval_rejected() {
        let mut cfg = EngineConfig::standard();
        cfg.similarity_threshold = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
        cfg.similarity_threshold = 0.0;
        assert!(cfg.validate().is_err());
        cfg.similarity_threshold = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_code_table_rejected() {
        let mut cfg = EngineConfig::standard();
        cfg.code_table.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyCodeTable)));
    }

    #[test]
    fn standard_table_covers_the_published_codes() {
        let cfg = EngineConfig::standard();
        for code in [219, 220, 221, 236, 237, 238, 242, 190, 466, 471, 487] {
            assert!(cfg.code_table.contains_key(&code), "missing code {code}");
        }
    }
}
