//! Input validation for gateway request bodies

use serde_json::Value;
use tracing::{debug, warn};

/// Maximum number of texts accepted in one batch embedding request
pub const MAX_BATCH_SIZE: usize = 2048;

/// Input validator
pub struct InputValidator;

impl InputValidator {
    /// Require a non-empty text field, returning `missing` otherwise
    pub fn require_text(
        value: Option<String>,
        missing: ValidationError,
    ) -> Result<String, ValidationError> {
        match value {
            Some(text) if !text.is_empty() => Ok(text),
            _ => {
                warn!("Validation failed: {}", missing);
                Err(missing)
            }
        }
    }

    /// Require both texts of a comparison pair
    pub fn require_pair(
        text1: Option<String>,
        text2: Option<String>,
    ) -> Result<(String, String), ValidationError> {
        match (text1, text2) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Ok((a, b)),
            _ => {
                warn!("Validation failed: comparison pair incomplete");
                Err(ValidationError::MissingComparisonText)
            }
        }
    }

    /// Validate a batch of texts: a non-empty JSON array of strings, at most `MAX_BATCH_SIZE`
    pub fn validate_batch(texts: Option<Value>) -> Result<Vec<String>, ValidationError> {
        let items = match texts {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => {
                warn!("Validation failed: texts missing, empty or not an array");
                return Err(ValidationError::EmptyBatch);
            }
        };

        if items.len() > MAX_BATCH_SIZE {
            warn!("Validation failed: batch too large ({} > {})", items.len(), MAX_BATCH_SIZE);
            return Err(ValidationError::BatchTooLarge {
                size: items.len(),
                max_size: MAX_BATCH_SIZE,
            });
        }

        let texts = items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                other => Err(ValidationError::MalformedBody(format!(
                    "texts must contain only strings, found {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Batch size validation passed ({} texts)", texts.len());
        Ok(texts)
    }
}

/// Validation errors, reported to callers as HTTP 400
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Message is required")]
    MissingMessage,

    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Text is required")]
    MissingText,

    #[error("Both text1 and text2 are required")]
    MissingComparisonText,

    #[error("Texts array is required and must not be empty")]
    EmptyBatch,

    #[error("Maximum {max_size} texts allowed per batch")]
    BatchTooLarge { size: usize, max_size: usize },

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}
