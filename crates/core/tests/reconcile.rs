//! End-to-end pipeline scenarios through `Engine::reconcile`.

use tramita_core::{
    CaseRecord, ChainStatus, Confidence, Engine, MovementEvent, Party, SubjectCode, Tier,
};

fn record(raw: &str, tier: Tier, codes: &[u32]) -> CaseRecord {
    CaseRecord {
        raw_number: raw.to_string(),
        tier,
        court: match tier {
            Tier::FirstInstance => "TRT02".to_string(),
            Tier::Appellate => "TRT02".to_string(),
            Tier::Superior => "TST".to_string(),
        },
        filed_date: None,
        subjects: vec![],
        movements: codes
            .iter()
            .enumerate()
            .map(|(i, &code)| MovementEvent {
                code,
                timestamp: format!("2021-06-{:02}T14:00:00Z", i + 1),
                attachments: vec![],
            })
            .collect(),
    }
}

fn with_subjects(mut rec: CaseRecord, labels: &[&str]) -> CaseRecord {
    rec.subjects = labels
        .iter()
        .enumerate()
        .map(|(i, label)| SubjectCode {
            code: 2000 + i as u32,
            label: label.to_string(),
        })
        .collect();
    rec
}

#[test]
fn shared_primary_key_groups_two_tiers() {
    let engine = Engine::with_defaults();
    let records = vec![
        record("00123456720208020001", Tier::FirstInstance, &[219]),
        record("00123456720208020099", Tier::Appellate, &[242]),
    ];
    let result = engine.reconcile(&records);
    assert_eq!(result.chains.len(), 1);
    assert_eq!(result.chains[0].chain.members.len(), 2);
    assert!(result.residual.is_empty());
}

#[test]
fn granted_then_appeal_granted_resolves_against_employee() {
    let engine = Engine::with_defaults();
    let records = vec![
        record("00123456720208020001", Tier::FirstInstance, &[219]),
        record("00123456720208020099", Tier::Appellate, &[237]),
    ];
    let result = engine.reconcile(&records);
    let outcome = &result.chains[0].outcome;
    assert_eq!(outcome.who_appealed_per_step, vec![Party::Employer]);
    assert_eq!(outcome.final_favorable_to_employee, Some(false));
    assert_eq!(outcome.confidence, Confidence::High);
}

#[test]
fn denied_then_appeal_denied_is_an_upheld_denial() {
    let engine = Engine::with_defaults();
    let records = vec![
        record("00123456720208020001", Tier::FirstInstance, &[220]),
        record("00123456720208020099", Tier::Appellate, &[242]),
    ];
    let result = engine.reconcile(&records);
    let outcome = &result.chains[0].outcome;
    assert_eq!(outcome.final_favorable_to_employee, Some(false));
    assert_eq!(outcome.confidence, Confidence::High);
    assert!(outcome.steps[0].upheld);
}

#[test]
fn unlinked_appellate_record_takes_the_heuristic_path() {
    let engine = Engine::with_defaults();
    let records = vec![with_subjects(
        record("00123456720208020001", Tier::Appellate, &[237]),
        &["Horas Extras", "Salário por Fora"],
    )];
    let result = engine.reconcile(&records);
    assert!(result.chains.is_empty());
    assert_eq!(result.residual, vec![0]);

    // Resolve the residual record as a single-member chain.
    let chain = tramita_core::CaseChain {
        members: vec![tramita_core::ChainMember {
            record: 0,
            linkage: tramita_core::Linkage::Seed,
        }],
        superseded: vec![],
    };
    let config = engine.config();
    let interps: Vec<_> = records
        .iter()
        .map(|r| tramita_core::interpret_record(config, r))
        .collect();
    let outcome = tramita_core::resolve_chain(&records, &chain, &interps, config);
    assert_eq!(outcome.who_appealed_per_step, vec![Party::Employee]);
    assert_eq!(outcome.confidence, Confidence::Medium);
}

#[test]
fn reform_marker_alone_never_guesses_a_direction() {
    let engine = Engine::with_defaults();
    let records = vec![
        record("00123456720208020001", Tier::FirstInstance, &[190]),
        record("00123456720208020099", Tier::Appellate, &[190]),
    ];
    let result = engine.reconcile(&records);
    let outcome = &result.chains[0].outcome;
    assert_eq!(outcome.final_favorable_to_employee, None);
    assert_eq!(outcome.status, ChainStatus::ReformedUnconfirmed);
}

#[test]
fn truth_table_rows_are_exact() {
    // (first-instance code, appeal code, who appealed, favorable).
    let rows = [
        (219, 237, Party::Employer, false),
        (219, 242, Party::Employer, true),
        (219, 236, Party::Employer, true),
        (220, 237, Party::Employee, true),
        (220, 242, Party::Employee, false),
        (220, 236, Party::Employee, false),
        (221, 237, Party::Employer, false),
        (221, 242, Party::Employer, true),
    ];
    let engine = Engine::with_defaults();
    for (lower, higher, who, favorable) in rows {
        let records = vec![
            record("00123456720208020001", Tier::FirstInstance, &[lower]),
            record("00123456720208020099", Tier::Appellate, &[higher]),
        ];
        let result = engine.reconcile(&records);
        let outcome = &result.chains[0].outcome;
        assert_eq!(
            outcome.who_appealed_per_step,
            vec![who],
            "codes {lower}/{higher}"
        );
        assert_eq!(
            outcome.final_favorable_to_employee,
            Some(favorable),
            "codes {lower}/{higher}"
        );
        assert_eq!(outcome.confidence, Confidence::High);
    }
}

#[test]
fn heuristic_fallback_never_reaches_high_confidence() {
    let engine = Engine::with_defaults();
    let direct = engine.reconcile(&[
        record("00123456720208020001", Tier::FirstInstance, &[220]),
        record("00123456720208020099", Tier::Appellate, &[237]),
        record("00123456720208029999", Tier::Superior, &[242]),
    ]);
    assert_eq!(direct.chains[0].outcome.confidence, Confidence::High);
    assert_eq!(direct.chains[0].outcome.steps.len(), 2);

    let lone = vec![with_subjects(
        record("00123456720208020001", Tier::Appellate, &[237]),
        &["Verbas Rescisórias"],
    )];
    let chain = tramita_core::CaseChain {
        members: vec![tramita_core::ChainMember {
            record: 0,
            linkage: tramita_core::Linkage::Seed,
        }],
        superseded: vec![],
    };
    let config = engine.config();
    let interps: Vec<_> = lone
        .iter()
        .map(|r| tramita_core::interpret_record(config, r))
        .collect();
    let outcome = tramita_core::resolve_chain(&lone, &chain, &interps, config);
    assert_ne!(outcome.confidence, Confidence::High);
}

#[test]
fn repeated_runs_are_identical() {
    let engine = Engine::with_defaults();
    let records = vec![
        record("00123456720208020001", Tier::FirstInstance, &[219]),
        record("00123456720208020099", Tier::Appellate, &[242]),
        record("0012345672020", Tier::Superior, &[236]),
        record("77777770920198040001", Tier::FirstInstance, &[220]),
        record("", Tier::Appellate, &[237]),
    ];
    let first = engine.reconcile(&records);
    for _ in 0..3 {
        assert_eq!(engine.reconcile(&records), first);
    }
}

#[test]
fn every_record_is_accounted_for_exactly_once() {
    let engine = Engine::with_defaults();
    let records = vec![
        record("00123456720208020001", Tier::FirstInstance, &[219]),
        record("00123456720208020099", Tier::Appellate, &[237]),
        record("55555550220217010001", Tier::FirstInstance, &[220]),
        record("", Tier::FirstInstance, &[219]),
        record("0012345672020", Tier::Superior, &[242]),
    ];
    let result = engine.reconcile(&records);
    let mut seen = std::collections::BTreeSet::new();
    for resolved in &result.chains {
        for member in &resolved.chain.members {
            assert!(seen.insert(member.record));
        }
        for &loser in &resolved.chain.superseded {
            assert!(seen.insert(loser));
        }
    }
    for &index in &result.residual {
        assert!(seen.insert(index));
    }
    for skip in &result.skipped {
        assert!(seen.insert(skip.index));
    }
    assert_eq!(seen.len(), records.len());
}
