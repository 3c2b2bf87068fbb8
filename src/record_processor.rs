//! Native implementation of the newline transform's record contract.
//!
//! Mirrors the inline processor declared by
//! [`resources::transform`](crate::resources::transform): each record's
//! payload is base64-decoded, a single `\n` byte is appended, and the result
//! is re-encoded and echoed back under the same record id with result `Ok`.
//! Characters outside the base64 alphabet (line breaks, spaces) are discarded
//! before decoding, like python's non-validating `b64decode`. A payload that
//! still does not decode fails the whole batch.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Errors from record processing.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record '{record_id}' payload is not valid base64: {source}")]
    InvalidPayload {
        record_id: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("malformed transformation event: {0}")]
    MalformedEvent(#[from] serde_json::Error),
}

/// A batch handed to the processor by the delivery stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransformationEvent {
    pub records: Vec<InputRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub record_id: String,
    /// Base64-encoded payload.
    pub data: String,
}

/// Processing outcome reported per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RecordResult {
    Ok,
    Dropped,
    ProcessingFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub record_id: String,
    pub result: RecordResult,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransformationResponse {
    pub records: Vec<OutputRecord>,
}

/// Append a newline to one record's payload.
pub fn append_newline(record: &InputRecord) -> Result<OutputRecord, RecordError> {
    let encoded: String = record
        .data
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    let mut payload = STANDARD
        .decode(encoded)
        .map_err(|source| RecordError::InvalidPayload {
            record_id: record.record_id.clone(),
            source,
        })?;
    payload.push(b'\n');

    Ok(OutputRecord {
        record_id: record.record_id.clone(),
        result: RecordResult::Ok,
        data: STANDARD.encode(payload),
    })
}

/// Process a batch, preserving record order.
pub fn process(event: &TransformationEvent) -> Result<TransformationResponse, RecordError> {
    let records = event
        .records
        .iter()
        .map(append_newline)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TransformationResponse { records })
}

/// Process a batch given as JSON, returning the JSON response.
pub fn process_json(event: &str) -> Result<String, RecordError> {
    let event: TransformationEvent = serde_json::from_str(event)?;
    Ok(serde_json::to_string(&process(&event)?)?)
}
