//! Content transforms for fetched Markdown documents
//!
//! Each variant converts the full source text to a derived representation
//! with an associated content-type tag. Markdown has no invalid syntax, so
//! conversion is best-effort by construction and never fails.

pub mod html;
pub mod plaintext;

pub use html::HtmlTransform;
pub use plaintext::PlainTextTransform;

use serde::{Deserialize, Serialize};

/// In-memory result of applying a transform to the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedPayload {
    pub body: String,
    pub content_type: &'static str,
}

/// Trait for converting Markdown source into a derived representation.
///
/// Implementations are selected by configuration at startup and driven by
/// the pipeline between the fetch and write stages.
pub trait DocumentTransform: Send + Sync {
    /// Short name for log records.
    fn name(&self) -> &'static str;

    /// Convert the full source text; the whole document is held in memory.
    fn convert(&self, source: &str) -> TransformedPayload;

    /// File extension (including the dot) for derived output keys.
    fn extension(&self) -> &'static str;
}

/// Which transform a worker process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformVariant {
    Html,
    Plaintext,
}

impl std::str::FromStr for TransformVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(TransformVariant::Html),
            "plaintext" | "text" => Ok(TransformVariant::Plaintext),
            other => anyhow::bail!("unknown transform variant: {}", other),
        }
    }
}

/// Build the transform for the configured variant.
pub fn transform_for(variant: TransformVariant) -> Box<dyn DocumentTransform> {
    match variant {
        TransformVariant::Html => Box::new(HtmlTransform),
        TransformVariant::Plaintext => Box::new(PlainTextTransform),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!("html".parse::<TransformVariant>().unwrap(), TransformVariant::Html);
        assert_eq!(
            "PLAINTEXT".parse::<TransformVariant>().unwrap(),
            TransformVariant::Plaintext
        );
        assert!("pdf".parse::<TransformVariant>().is_err());
    }

    #[test]
    fn test_factory_matches_variant() {
        assert_eq!(transform_for(TransformVariant::Html).extension(), ".html");
        assert_eq!(transform_for(TransformVariant::Plaintext).extension(), ".txt");
    }

    #[test]
    fn trait_is_object_safe() {
        fn _accepts(_: &dyn DocumentTransform) {}
    }
}
