//! Remove Property Mutation
//!
//! Removes a key from the target properties file. An absent key is a
//! no-op, and a failed removal does not abort the run by default.

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

use super::parse_pair;

/// Remove a property from the target file
#[derive(Debug, Clone)]
pub struct RemoveProperty {
    key: String,
}

impl RemoveProperty {
    /// Remove `key` and its value
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Mutator for RemoveProperty {
    fn label(&self) -> &str {
        "RemoveProperty"
    }

    fn description(&self) -> String {
        format!("Remove property '{}' from the target file", self.key)
    }

    fn abort_on_failure_default(&self) -> bool {
        false
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

        let before = content.lines().count();
        let kept: Vec<&str> = content
            .lines()
            .filter(|line| parse_pair(line).map(|(key, _)| key) != Some(self.key.as_str()))
            .collect();

        if kept.len() == before {
            return Ok(MutationResult::no_op(format!(
                "property '{}' is not present",
                self.key
            )));
        }

        let mut rewritten = kept.join("\n");
        if content.ends_with('\n') {
            rewritten.push('\n');
        }
        tokio::fs::write(target, rewritten).await?;
        log::debug!(
            "RemoveProperty: removed '{}' from '{}'",
            self.key,
            target.display()
        );
        Ok(MutationResult::success(format!(
            "property '{}' removed",
            self.key
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use transform_engine::MutationKind;

    #[tokio::test]
    async fn test_removes_key() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.properties");
        std::fs::write(&file, "a=1\nspring.version=4.3\nb=2\n").unwrap();

        let context = TransformContext::new();
        let result = RemoveProperty::new("spring.version")
            .mutate(&file, &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), MutationKind::Success);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "a=1\nb=2\n");
    }

    #[tokio::test]
    async fn test_absent_key_is_a_no_op() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.properties");
        std::fs::write(&file, "a=1\n").unwrap();

        let context = TransformContext::new();
        let result = RemoveProperty::new("ghost")
            .mutate(&file, &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), MutationKind::NoOp);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "a=1\n");
    }

    #[test]
    fn test_does_not_abort_by_default() {
        assert!(!RemoveProperty::new("x").abort_on_failure_default());
    }
}
