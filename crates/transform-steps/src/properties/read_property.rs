//! Read Property Inspection
//!
//! Publishes the value of a key in the target properties file. An absent
//! key is a no-op (nothing to report); a missing file is an error.

use std::path::Path;

use async_trait::async_trait;
use serde_json::json;
use transform_engine::{InspectionResult, Inspector, Result, TransformContext};

use super::lookup;

/// Read the value of a property from the target file
#[derive(Debug, Clone)]
pub struct ReadProperty {
    key: String,
}

impl ReadProperty {
    /// Read the value of `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Inspector for ReadProperty {
    fn label(&self) -> &str {
        "ReadProperty"
    }

    fn description(&self) -> String {
        format!("Read property '{}' from the target file", self.key)
    }

    async fn inspect(
        &self,
        target: &Path,
        _context: &TransformContext,
    ) -> Result<InspectionResult> {
        let content = match tokio::fs::read_to_string(target).await {
            Ok(content) => content,
            Err(e) => {
                return Ok(InspectionResult::error(format!(
                    "could not read '{}': {}",
                    target.display(),
                    e
                )))
            }
        };
        match lookup(&content, &self.key) {
            Some(value) => {
                log::debug!("ReadProperty: '{}' = '{}'", self.key, value);
                Ok(InspectionResult::value(json!(value)))
            }
            None => Ok(InspectionResult::no_op(format!(
                "property '{}' is not defined in '{}'",
                self.key,
                target.display()
            ))),
        }
    }
}
