//! Property Exists Inspection
//!
//! Publishes whether the target properties file defines a key. A missing
//! file yields `false` so the result can gate later steps.

use std::path::Path;

use async_trait::async_trait;
use serde_json::json;
use transform_engine::{InspectionResult, Inspector, Result, TransformContext};

use super::lookup;

/// Check whether the target properties file defines a key
#[derive(Debug, Clone)]
pub struct PropertyExists {
    key: String,
}

impl PropertyExists {
    /// Create a new property check
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Inspector for PropertyExists {
    fn label(&self) -> &str {
        "PropertyExists"
    }

    fn description(&self) -> String {
        format!("Check if property '{}' is defined in the target file", self.key)
    }

    async fn inspect(
        &self,
        target: &Path,
        _context: &TransformContext,
    ) -> Result<InspectionResult> {
        let defined = match tokio::fs::read_to_string(target).await {
            Ok(content) => lookup(&content, &self.key).is_some(),
            Err(_) => false,
        };
        log::debug!(
            "PropertyExists: '{}' in '{}' -> {}",
            self.key,
            target.display(),
            defined
        );
        Ok(InspectionResult::value(json!(defined)))
    }
}
