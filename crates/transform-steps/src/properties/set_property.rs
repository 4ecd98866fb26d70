//! Set Property Mutation
//!
//! Sets a key in the target properties file: replaces the value when the
//! key is present, appends a new pair when it is not. A key already at
//! the requested value is a no-op.

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

use super::parse_pair;

/// Add or replace a property in the target file
#[derive(Debug, Clone)]
pub struct SetProperty {
    key: String,
    value: String,
}

impl SetProperty {
    /// Set `key` to `value`
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
impl Mutator for SetProperty {
    fn label(&self) -> &str {
        "SetProperty"
    }

    fn description(&self) -> String {
        format!(
            "Set property '{}' to '{}' in the target file",
            self.key, self.value
        )
    }

    async fn mutate(&self, target: &Path, _context: &TransformContext) -> Result<MutationResult> {
        let content = match tokio::fs::read_to_string(target).await {
            Ok(content) => content,
            Err(e) => {
                return Ok(MutationResult::error(format!(
                    "could not read '{}': {}",
                    target.display(),
                    e
                )))
            }
        };

        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        let mut replaced = false;
        for line in lines.iter_mut() {
            if let Some((key, value)) = parse_pair(line) {
                if key == self.key {
                    if value == self.value {
                        return Ok(MutationResult::no_op(format!(
                            "property '{}' is already '{}'",
                            self.key, self.value
                        )));
                    }
                    *line = format!("{}={}", self.key, self.value);
                    replaced = true;
                    break;
                }
            }
        }

        let details = if replaced {
            format!("property '{}' replaced with '{}'", self.key, self.value)
        } else {
            lines.push(format!("{}={}", self.key, self.value));
            format!("property '{}' added with '{}'", self.key, self.value)
        };

        let mut rewritten = lines.join("\n");
        rewritten.push('\n');
        tokio::fs::write(target, rewritten).await?;
        log::debug!("SetProperty: {} in '{}'", details, target.display());
        Ok(MutationResult::success(details))
    }
}
