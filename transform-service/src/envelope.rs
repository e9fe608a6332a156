//! Notification envelope unwrapping
//!
//! The invoking runtime delivers a storage notification wrapped twice: the
//! storage event JSON is stringified into the topic message, and the message
//! itself arrives escaped and quote-delimited. Unwrapping reverses both
//! layers before the pipeline can see the container/key coordinates.

use serde::Deserialize;

use shared::types::PipelineError;

/// Outer notification envelope as received from the invoking runtime
#[derive(Debug, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(rename = "Records")]
    pub records: Vec<EnvelopeRecord>,
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

#[derive(Debug, Deserialize)]
pub struct SnsMessage {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Decoded storage event carried inside the envelope
#[derive(Debug, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records")]
    pub records: Vec<StorageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageRecord {
    #[serde(rename = "s3")]
    pub storage: StorageEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEntity {
    #[serde(rename = "bucket")]
    pub container: Container,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Container {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

/// Unwrap a raw notification body into the first storage event record.
///
/// Only the first outer record is consumed; batching across records is not
/// performed. Any structural problem is fatal to the invocation.
pub fn unwrap_notification(body: &str) -> Result<StorageRecord, PipelineError> {
    let envelope: NotificationEnvelope = serde_json::from_str(body)
        .map_err(|e| PipelineError::MalformedEnvelope(format!("envelope is not JSON: {}", e)))?;

    let record = envelope.records.first().ok_or_else(|| {
        PipelineError::MalformedEnvelope("envelope contains no records".to_string())
    })?;

    let event = decode_inner_message(&record.sns.message)?;

    event.records.into_iter().next().ok_or_else(|| {
        PipelineError::MalformedEnvelope("storage event contains no records".to_string())
    })
}

/// Decode the doubly-serialized inner message into a storage event.
///
/// The escaping scheme is undone bluntly: every backslash is removed, then
/// exactly one leading and one trailing character (the quote pair from the
/// second serialization) is stripped. The global backslash removal is lossy
/// for payloads that legitimately contain backslashes; that is the accepted
/// transport contract, preserved bit-for-bit.
fn decode_inner_message(message: &str) -> Result<StorageEvent, PipelineError> {
    let unescaped: String = message.chars().filter(|&c| c != '\\').collect();

    if unescaped.chars().count() < 2 {
        return Err(PipelineError::MalformedEnvelope(
            "inner message too short to hold an event".to_string(),
        ));
    }

    let mut chars = unescaped.chars();
    chars.next();
    chars.next_back();
    let inner = chars.as_str();

    serde_json::from_str(inner).map_err(|e| {
        PipelineError::MalformedEnvelope(format!("inner message is not JSON after unescape: {}", e))
    })
}
