//! tramita-core: case-chain reconciliation and outcome-inference engine.
//!
//! Takes a batch of labor-court case records spread across the three
//! judicial tiers, links the records that belong to the same underlying
//! lawsuit, interprets each record's procedural movements into verdicts,
//! and resolves the end-to-end outcome of every chain: who appealed at
//! each step and whether the final decision favors the employee.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`Engine::reconcile()`] -- run the full four-stage pipeline
//! - [`EngineConfig`] -- versioned movement-code table and tuning knobs
//! - [`CaseRecord`] / [`Tier`] -- the input record model
//! - [`CaseChain`] / [`ResolvedOutcome`] -- the linked and resolved output
//! - [`ConfigError`] -- configuration validation error type
//!
//! Individual stage entry functions are also re-exported for selective
//! pipeline execution.

pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod interpret;
pub mod number;
pub mod record;
pub mod resolve;
pub mod similarity;

// ── Convenience re-exports: key types ────────────────────────────────

pub use chain::{CaseChain, ChainMember, Grouping, Linkage};
pub use config::{CodeMeaning, EngineConfig, SubjectKeywords};
pub use engine::{Engine, Reconciliation, ResolvedChain, SkippedRecord};
pub use error::ConfigError;
pub use interpret::{Disposition, RecordInterpretation, Verdict};
pub use number::{CaseKeys, CnjNumber};
pub use record::{CaseRecord, MovementAttachment, MovementEvent, SubjectCode, Tier};
pub use resolve::{ChainStatus, Confidence, Party, ResolvedOutcome, StepResolution};

// ── Convenience re-exports: stage entry points ───────────────────────

pub use chain::build_chains;
pub use interpret::interpret_record;
pub use number::normalize;
pub use resolve::resolve_chain;
pub use similarity::score;
