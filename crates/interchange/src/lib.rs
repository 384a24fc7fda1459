//! tramita-interchange: registry JSON to typed case records.
//!
//! The national registry API returns case records as JSON with
//! Portuguese field names and loosely enforced shapes. This crate
//! walks that JSON into [`tramita_core::CaseRecord`]s, skipping
//! malformed entries with a recorded reason instead of aborting the
//! batch.

pub mod deserialize;

pub use deserialize::{from_datajud, Ingest, IngestError, SkippedEntry};
