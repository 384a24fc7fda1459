//! Case grouping: link records that belong to the same lawsuit.
//!
//! Four passes run over a shrinking pool of ungrouped record indices.
//! The pool is the only mutable state and membership is only ever
//! removed, so no record can land in two chains. Passes run in fixed
//! order and every tie has an explicit rule, which makes grouping
//! deterministic for a fixed input order.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::EngineConfig;
use crate::number::CaseKeys;
use crate::record::{CaseRecord, Tier};
use crate::similarity::score;

/// How a member was attached to its chain.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Linkage {
    /// The anchor record a similarity search started from.
    Seed,
    /// Matched on a shared normalized key. Priority 0 is the primary
    /// key; higher priorities are the alternate windowings in order.
    Key { key: String, priority: u8 },
    /// Matched by fuzzy number similarity at the given score.
    Similarity { score: f64 },
}

/// One record's place in a chain.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChainMember {
    /// Index into the input batch.
    pub record: usize,
    pub linkage: Linkage,
}

/// Records linked as one lawsuit, ordered by tier rank, at most one
/// authoritative record per tier.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CaseChain {
    pub members: Vec<ChainMember>,
    /// Same-tier collision losers: linked to the chain but displaced
    /// by a record with a later filing date.
    pub superseded: Vec<usize>,
}

impl CaseChain {
    /// Record index holding the given tier, if the chain has one.
    pub fn member_at(&self, records: &[CaseRecord], tier: Tier) -> Option<usize> {
        self.members
            .iter()
            .map(|m| m.record)
            .find(|&i| records[i].tier == tier)
    }
}

/// Output of the grouping stage.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Grouping {
    pub chains: Vec<CaseChain>,
    /// Records no pass could link: single-record chains, excluded from
    /// outcome statistics but retained for coverage accounting.
    pub residual: Vec<usize>,
}

/// Key string a record exposes at the given pass priority.
fn key_at(keys: &CaseKeys, priority: u8) -> Option<&str> {
    if priority == 0 {
        Some(&keys.primary)
    } else {
        keys.alternates.get(priority as usize - 1).map(|k| k.as_str())
    }
}

/// Later filing date wins; a missing date loses to any present one;
/// a full tie keeps the lower index.
fn supersedes(records: &[CaseRecord], challenger: usize, incumbent: usize) -> bool {
    match (records[challenger].filed_date, records[incumbent].filed_date) {
        (Some(c), Some(i)) if c != i => c > i,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        _ => challenger < incumbent,
    }
}

/// Collapse a key group to one record per tier. Returns members in
/// tier order plus the displaced indices.
fn collapse_by_tier(
    records: &[CaseRecord],
    group: &[usize],
    key: &str,
    priority: u8,
) -> (Vec<ChainMember>, Vec<usize>) {
    let mut authoritative: BTreeMap<u8, usize> = BTreeMap::new();
    let mut superseded = Vec::new();

    for &index in group {
        let rank = records[index].tier.rank();
        match authoritative.get(&rank) {
            None => {
                authoritative.insert(rank, index);
            }
            Some(&incumbent) => {
                if supersedes(records, index, incumbent) {
                    tracing::debug!(
                        key,
                        tier = records[index].tier.label(),
                        winner = index,
                        loser = incumbent,
                        "tier collision, later filing date kept"
                    );
                    superseded.push(incumbent);
                    authoritative.insert(rank, index);
                } else {
                    tracing::debug!(
                        key,
                        tier = records[index].tier.label(),
                        winner = incumbent,
                        loser = index,
                        "tier collision, later filing date kept"
                    );
                    superseded.push(index);
                }
            }
        }
    }

    let members = authoritative
        .into_values()
        .map(|record| ChainMember {
            record,
            linkage: Linkage::Key {
                key: key.to_string(),
                priority,
            },
        })
        .collect();
    (members, superseded)
}

/// One key pass: group pool members sharing the key at `priority`;
/// groups spanning >= 2 distinct tiers become chains and leave the
/// pool.
fn key_pass(
    records: &[CaseRecord],
    keys: &[Option<CaseKeys>],
    pool: &mut BTreeSet<usize>,
    priority: u8,
    chains: &mut Vec<CaseChain>,
) {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for &index in pool.iter() {
        let Some(record_keys) = keys[index].as_ref() else {
            continue;
        };
        let Some(key) = key_at(record_keys, priority) else {
            continue;
        };
        groups.entry(key).or_default().push(index);
    }

    for (key, group) in groups {
        let tiers: BTreeSet<u8> = group.iter().map(|&i| records[i].tier.rank()).collect();
        if tiers.len() < 2 {
            continue;
        }
        let (members, superseded) = collapse_by_tier(records, &group, key, priority);
        for member in &members {
            pool.remove(&member.record);
        }
        for &loser in &superseded {
            pool.remove(&loser);
        }
        chains.push(CaseChain { members, superseded });
    }
}

/// Best similarity candidate at `tier` for the anchor record, or
/// `None` when nothing in the pool clears the threshold.
///
/// Ties break by highest score, then most recent filing date, then
/// lowest index. Each tie encountered is logged so a surprising link
/// can be traced back to the rule that made it.
fn best_candidate(
    records: &[CaseRecord],
    anchor: usize,
    pool: &BTreeSet<usize>,
    tier: Tier,
    threshold: f64,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for &candidate in pool.iter() {
        if records[candidate].tier != tier {
            continue;
        }
        let s = score(&records[anchor].raw_number, &records[candidate].raw_number);
        if s < threshold {
            continue;
        }
        match best {
            None => best = Some((candidate, s)),
            Some((incumbent, incumbent_score)) => {
                if s > incumbent_score {
                    best = Some((candidate, s));
                } else if s == incumbent_score {
                    let replace = supersedes(records, candidate, incumbent);
                    let (winner, loser) = if replace {
                        (candidate, incumbent)
                    } else {
                        (incumbent, candidate)
                    };
                    tracing::debug!(
                        anchor,
                        winner,
                        loser,
                        score = s,
                        "similarity tie broken by filing date, then index"
                    );
                    if replace {
                        best = Some((candidate, s));
                    }
                }
            }
        }
    }
    best
}

/// Fallback pass: anchor each ungrouped first-instance record, attach
/// the most similar appellate record, then try to extend to a superior
/// record from the appellate one.
fn fallback_pass(
    records: &[CaseRecord],
    pool: &mut BTreeSet<usize>,
    threshold: f64,
    chains: &mut Vec<CaseChain>,
) {
    let anchors: Vec<usize> = pool
        .iter()
        .copied()
        .filter(|&i| records[i].tier == Tier::FirstInstance)
        .collect();

    for anchor in anchors {
        if !pool.contains(&anchor) {
            continue;
        }
        let Some((appellate, appellate_score)) =
            best_candidate(records, anchor, pool, Tier::Appellate, threshold)
        else {
            continue;
        };
        pool.remove(&anchor);
        pool.remove(&appellate);
        let mut members = vec![
            ChainMember {
                record: anchor,
                linkage: Linkage::Seed,
            },
            ChainMember {
                record: appellate,
                linkage: Linkage::Similarity {
                    score: appellate_score,
                },
            },
        ];
        if let Some((superior, superior_score)) =
            best_candidate(records, appellate, pool, Tier::Superior, threshold)
        {
            pool.remove(&superior);
            members.push(ChainMember {
                record: superior,
                linkage: Linkage::Similarity {
                    score: superior_score,
                },
            });
        }
        chains.push(CaseChain {
            members,
            superseded: Vec::new(),
        });
    }
}

/// Residual pass: pair leftover appellate records with superior ones,
/// for lawsuits whose first-instance filing never reached the batch.
fn residual_pass(
    records: &[CaseRecord],
    pool: &mut BTreeSet<usize>,
    threshold: f64,
    chains: &mut Vec<CaseChain>,
) {
    let anchors: Vec<usize> = pool
        .iter()
        .copied()
        .filter(|&i| records[i].tier == Tier::Appellate)
        .collect();

    for anchor in anchors {
        if !pool.contains(&anchor) {
            continue;
        }
        let Some((superior, superior_score)) =
            best_candidate(records, anchor, pool, Tier::Superior, threshold)
        else {
            continue;
        };
        pool.remove(&anchor);
        pool.remove(&superior);
        chains.push(CaseChain {
            members: vec![
                ChainMember {
                    record: anchor,
                    linkage: Linkage::Seed,
                },
                ChainMember {
                    record: superior,
                    linkage: Linkage::Similarity {
                        score: superior_score,
                    },
                },
            ],
            superseded: Vec::new(),
        });
    }
}

/// Run all grouping passes.
///
/// `keys` must be parallel to `records`; an entry of `None` marks a
/// record excluded upstream (no usable number), which never enters the
/// pool.
pub fn build_chains(
    records: &[CaseRecord],
    keys: &[Option<CaseKeys>],
    config: &EngineConfig,
) -> Grouping {
    debug_assert_eq!(records.len(), keys.len());

    let mut pool: BTreeSet<usize> = (0..records.len()).filter(|&i| keys[i].is_some()).collect();
    let mut chains = Vec::new();

    // Key passes in priority order: primary, then each alternate.
    let max_alternates = keys
        .iter()
        .flatten()
        .map(|k| k.alternates.len())
        .max()
        .unwrap_or(0);
    for priority in 0..=max_alternates as u8 {
        key_pass(records, keys, &mut pool, priority, &mut chains);
    }

    fallback_pass(records, &mut pool, config.similarity_threshold, &mut chains);
    residual_pass(records, &mut pool, config.similarity_threshold, &mut chains);

    let residual: Vec<usize> = pool.into_iter().collect();
    Grouping { chains, residual }
}
