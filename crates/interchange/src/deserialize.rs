//! Deserialization from registry JSON into typed case records.
//!
//! The main entry point is [`from_datajud`], which takes a
//! `&serde_json::Value` holding an array of case entries and produces
//! an [`Ingest`].

use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tramita_core::{CaseRecord, MovementAttachment, MovementEvent, SubjectCode, Tier};

/// Fatal structural errors during ingestion. Everything entry-level
/// degrades to the skipped list instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The input is not a JSON array of case entries.
    NotAnArray,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::NotAnArray => {
                write!(f, "input is not a JSON array of case records")
            }
        }
    }
}

impl std::error::Error for IngestError {}

/// An entry excluded during ingestion, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position in the input array.
    pub index: usize,
    pub reason: String,
}

/// Result of walking one registry payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingest {
    pub records: Vec<CaseRecord>,
    pub skipped: Vec<SkippedEntry>,
}

/// Deserialize a registry JSON payload into case records.
///
/// Entries missing a required field or carrying an unknown tier code
/// are skipped with a reason. Unknown extra fields are ignored for
/// forward compatibility.
pub fn from_datajud(data: &serde_json::Value) -> Result<Ingest, IngestError> {
    let entries = data.as_array().ok_or(IngestError::NotAnArray)?;

    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match parse_entry(entry) {
            Ok(record) => records.push(record),
            Err(reason) => skipped.push(SkippedEntry { index, reason }),
        }
    }

    Ok(Ingest { records, skipped })
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn required_str(obj: &serde_json::Value, field: &str) -> Result<String, String> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| format!("missing '{}' field", field))
}

/// Map the registry's tier code onto [`Tier`].
fn parse_grau(grau: &str) -> Option<Tier> {
    match grau.trim().to_uppercase().as_str() {
        "G1" | "GRAU_1" => Some(Tier::FirstInstance),
        "G2" | "GRAU_2" => Some(Tier::Appellate),
        "GS" | "SUP" | "TST" => Some(Tier::Superior),
        _ => None,
    }
}

/// Filing dates arrive as RFC 3339 timestamps or plain `YYYY-MM-DD`;
/// anything else degrades to `None`.
fn parse_filed_date(raw: &str) -> Option<Date> {
    if let Ok(stamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(stamp.date());
    }
    let day_only = format_description!("[year]-[month]-[day]");
    Date::parse(raw.get(..10)?, &day_only).ok()
}

fn parse_subjects(entry: &serde_json::Value) -> Vec<SubjectCode> {
    entry
        .get("assuntos")
        .and_then(|a| a.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|subject| {
                    let code = subject.get("codigo")?.as_u64()? as u32;
                    let label = subject
                        .get("nome")
                        .and_then(|n| n.as_str())
                        .unwrap_or("")
                        .to_string();
                    Some(SubjectCode { code, label })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// A tabulated complement keeps its description as the attachment name
/// when it has one, falling back to the bare name.
fn parse_attachments(movement: &serde_json::Value) -> Vec<MovementAttachment> {
    movement
        .get("complementosTabelados")
        .and_then(|c| c.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|complement| {
                    let nome = complement.get("nome").and_then(|v| v.as_str()).unwrap_or("");
                    let descricao = complement
                        .get("descricao")
                        .and_then(|v| v.as_str())
                        .unwrap_or("");
                    let name = if descricao.is_empty() { nome } else { descricao };
                    if name.is_empty() {
                        return None;
                    }
                    let value = match complement.get("valor") {
                        Some(serde_json::Value::String(s)) => Some(s.clone()),
                        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
                        _ => None,
                    };
                    Some(MovementAttachment {
                        name: name.to_string(),
                        value,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_movements(entry: &serde_json::Value) -> Vec<MovementEvent> {
    entry
        .get("movimentos")
        .and_then(|m| m.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|movement| {
                    let code = movement.get("codigo")?.as_u64()? as u32;
                    let timestamp = movement
                        .get("dataHora")
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string();
                    Some(MovementEvent {
                        code,
                        timestamp,
                        attachments: parse_attachments(movement),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_entry(entry: &serde_json::Value) -> Result<CaseRecord, String> {
    let raw_number = required_str(entry, "numeroProcesso")?;
    let grau = required_str(entry, "grau")?;
    let tier = parse_grau(&grau).ok_or_else(|| format!("unknown grau '{}'", grau))?;

    let court = entry
        .get("tribunal")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let filed_date = entry
        .get("dataAjuizamento")
        .and_then(|v| v.as_str())
        .and_then(parse_filed_date);

    Ok(CaseRecord {
        raw_number,
        tier,
        court,
        filed_date,
        subjects: parse_subjects(entry),
        movements: parse_movements(entry),
    })
}
