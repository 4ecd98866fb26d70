//! Remove Line Mutation
//!
//! Removes lines containing a fragment from the target file. No matching
//! line is a no-op, and a failed removal does not abort the run by
//! default.

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

/// Remove lines containing a fragment from the target text file
#[derive(Debug, Clone)]
pub struct RemoveLine {
    fragment: String,
    first_only: bool,
}

impl RemoveLine {
    /// Remove every line containing `fragment`
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            first_only: false,
        }
    }

    /// Only remove the first matching line
    pub fn first_only(mut self) -> Self {
        self.first_only = true;
        self
    }
}

#[async_trait]
impl Mutator for RemoveLine {
    fn label(&self) -> &str {
        "RemoveLine"
    }

    fn description(&self) -> String {
        format!(
            "Remove lines containing '{}' from the target file",
            self.fragment
        )
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

        let lines: Vec<&str> = content.lines().collect();
        let mut removed = 0;
        let kept: Vec<&str> = lines
            .into_iter()
            .filter(|line| {
                let matches = line.contains(self.fragment.as_str());
                if matches && (!self.first_only || removed == 0) {
                    removed += 1;
                    false
                } else {
                    true
                }
            })
            .collect();

        if removed == 0 {
            return Ok(MutationResult::no_op(format!(
                "no line containing '{}' in '{}'",
                self.fragment,
                target.display()
            )));
        }

        let mut rewritten = kept.join("\n");
        if content.ends_with('\n') {
            rewritten.push('\n');
        }
        tokio::fs::write(target, rewritten).await?;
        log::debug!(
            "RemoveLine: removed {} line(s) from '{}'",
            removed,
            target.display()
        );
        Ok(MutationResult::success(format!(
            "removed {} line(s) containing '{}'",
            removed, self.fragment
        )))
    }
}
