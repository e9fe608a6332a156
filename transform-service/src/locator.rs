//! Transform job derivation
//!
//! Maps an unwrapped storage event record to the source/destination
//! coordinates of a single transform job.

use crate::envelope::StorageRecord;

/// Fixed suffix appended to the source container to form the destination.
pub const OUTPUT_CONTAINER_SUFFIX: &str = "-out";

/// Source and destination coordinates for one pipeline invocation.
///
/// Constructed once per invocation and discarded when the job completes or
/// fails; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformJob {
    pub source_container: String,
    pub source_key: String,
    pub dest_container: String,
    pub dest_key: String,
}

/// Derive the transform job for a storage record.
///
/// The destination key keeps only the source key prefix before the first
/// `.` and appends the transform's extension. Multi-dot keys lose
/// everything after the first dot; that rename is a deliberate
/// simplification, not multi-extension handling.
pub fn locate(record: &StorageRecord, extension: &str) -> TransformJob {
    let source_container = record.storage.container.name.clone();
    let source_key = record.storage.object.key.clone();

    let dest_container = format!("{}{}", source_container, OUTPUT_CONTAINER_SUFFIX);
    let stem = source_key.split('.').next().unwrap_or(&source_key);
    let dest_key = format!("{}{}", stem, extension);

    TransformJob {
        source_container,
        source_key,
        dest_container,
        dest_key,
    }
}
