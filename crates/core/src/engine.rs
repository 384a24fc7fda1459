//! The four-stage reconciliation pipeline behind one entry point.

use crate::chain::{build_chains, CaseChain};
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::interpret::{interpret_record, RecordInterpretation};
use crate::number::{normalize, CaseKeys};
use crate::record::CaseRecord;
use crate::resolve::{resolve_chain, ResolvedOutcome};

/// A chain together with its resolved outcome.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedChain {
    pub chain: CaseChain,
    pub outcome: ResolvedOutcome,
}

/// A record excluded before grouping, with the reason it was excluded.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// Everything one reconciliation run produced.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Reconciliation {
    /// Code-table revision the movements were interpreted against.
    pub config_version: String,
    pub total_records: usize,
    pub chains: Vec<ResolvedChain>,
    /// Records no pass could link.
    pub residual: Vec<usize>,
    /// Records excluded before grouping.
    pub skipped: Vec<SkippedRecord>,
}

/// Reconciliation engine: validated configuration plus the pipeline.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Build an engine, rejecting invalid configuration up front.
    pub fn new(config: EngineConfig) -> Result<Engine, ConfigError> {
        config.validate()?;
        Ok(Engine { config })
    }

    /// An engine over the standardized code table.
    pub fn with_defaults() -> Engine {
        Engine {
            config: EngineConfig::standard(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run normalize, interpret, group, and resolve over one batch.
    ///
    /// Data-quality problems never abort the run: a record without a
    /// usable case number is skipped and counted, and a record whose
    /// movements say nothing resolves to an unknown outcome.
    pub fn reconcile(&self, records: &[CaseRecord]) -> Reconciliation {
        let mut skipped = Vec::new();
        let keys: Vec<Option<CaseKeys>> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                if record.has_number() {
                    Some(normalize(&record.raw_number))
                } else {
                    skipped.push(SkippedRecord {
                        index,
                        reason: "case number has no digits".to_string(),
                    });
                    None
                }
            })
            .collect();

        let interps: Vec<Option<RecordInterpretation>> = records
            .iter()
            .map(|record| interpret_record(&self.config, record))
            .collect();

        let grouping = build_chains(records, &keys, &self.config);
        let chains: Vec<ResolvedChain> = grouping
            .chains
            .into_iter()
            .map(|chain| {
                let outcome = resolve_chain(records, &chain, &interps, &self.config);
                ResolvedChain { chain, outcome }
            })
            .collect();

        tracing::info!(
            total = records.len(),
            chains = chains.len(),
            residual = grouping.residual.len(),
            skipped = skipped.len(),
            "reconciliation complete"
        );

        Reconciliation {
            config_version: self.config.version.clone(),
            total_records: records.len(),
            chains,
            residual: grouping.residual,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MovementEvent, Tier};

    fn record(raw: &str, tier: Tier, codes: &[u32]) -> CaseRecord {
        CaseRecord {
            raw_number: raw.to_string(),
            tier,
            court: "TRT02".to_string(),
            filed_date: None,
            subjects: vec![],
            movements: codes
                .iter()
                .map(|&code| MovementEvent {
                    code,
                    timestamp: "2021-02-01T12:00:00Z".to_string(),
                    attachments: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut config = EngineConfig::standard();
        config.similarity_threshold = 2.0;
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn empty_number_is_skipped_not_fatal() {
        let engine = Engine::with_defaults();
        let records = vec![
            record("", Tier::FirstInstance, &[219]),
            record("00123456720208020001", Tier::FirstInstance, &[219]),
            record("00123456720208020099", Tier::Appellate, &[242]),
        ];
        let result = engine.reconcile(&records);
        assert_eq!(result.total_records, 3);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].index, 0);
        assert_eq!(result.chains.len(), 1);
    }

    #[test]
    fn reconciliation_serializes_to_json() {
        let engine = Engine::with_defaults();
        let records = vec![
            record("00123456720208020001", Tier::FirstInstance, &[219]),
            record("00123456720208020099", Tier::Appellate, &[237]),
        ];
        let result = engine.reconcile(&records);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_records"], 2);
        assert_eq!(json["chains"][0]["outcome"]["status"], "Decided");
        assert_eq!(
            json["chains"][0]["outcome"]["final_favorable_to_employee"],
            false
        );
    }

    #[test]
    fn empty_batch_yields_empty_result() {
        let result = Engine::with_defaults().reconcile(&[]);
        assert_eq!(result.total_records, 0);
        assert!(result.chains.is_empty());
        assert!(result.residual.is_empty());
        assert!(result.skipped.is_empty());
    }
}
