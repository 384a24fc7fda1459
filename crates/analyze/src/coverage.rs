//! Linking coverage: how much of the batch the grouping stage
//! accounted for, and through which linkage kinds.

use serde::Serialize;
use tramita_core::{Linkage, Reconciliation};

/// Aggregated coverage result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageResult {
    pub total_records: usize,
    pub chain_count: usize,
    /// Records placed in a chain, authoritative members and superseded
    /// collision losers alike.
    pub chained: usize,
    pub residual: usize,
    pub skipped: usize,
    /// Chain members attached through a shared normalized key.
    pub key_linked: usize,
    /// Chain members attached by fuzzy similarity, seeds included.
    pub similarity_linked: usize,
    /// `chained / total_records`, zero for an empty batch.
    pub chained_share: f64,
}

/// Measure linking coverage of one reconciliation run.
pub fn analyze_coverage(reconciliation: &Reconciliation) -> CoverageResult {
    let mut result = CoverageResult {
        total_records: reconciliation.total_records,
        chain_count: reconciliation.chains.len(),
        residual: reconciliation.residual.len(),
        skipped: reconciliation.skipped.len(),
        ..CoverageResult::default()
    };

    for resolved in &reconciliation.chains {
        result.chained += resolved.chain.members.len() + resolved.chain.superseded.len();
        for member in &resolved.chain.members {
            match member.linkage {
                Linkage::Key { .. } => result.key_linked += 1,
                Linkage::Seed | Linkage::Similarity { .. } => result.similarity_linked += 1,
            }
        }
    }

    if result.total_records > 0 {
        result.chained_share = result.chained as f64 / result.total_records as f64;
    }
    result
}
