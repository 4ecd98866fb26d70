//! Replace Text Mutation
//!
//! Replaces occurrences of a search string in the target file. Zero
//! occurrences is a no-op; a missing target is an error, since the
//! template author asked for a specific file to change.

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

/// Replace occurrences of a search string in the target file
#[derive(Debug, Clone)]
pub struct ReplaceText {
    search: String,
    replacement: String,
    first_only: bool,
}

impl ReplaceText {
    /// Replace every occurrence of `search` with `replacement`
    pub fn new(search: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replacement: replacement.into(),
            first_only: false,
        }
    }

    /// Only replace the first occurrence
    pub fn first_only(mut self) -> Self {
        self.first_only = true;
        self
    }
}

#[async_trait]
impl Mutator for ReplaceText {
    fn label(&self) -> &str {
        "ReplaceText"
    }

    fn description(&self) -> String {
        format!(
            "Replace '{}' with '{}' in the target file",
            self.search, self.replacement
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

        let occurrences = content.matches(&self.search).count();
        if occurrences == 0 {
            return Ok(MutationResult::no_op(format!(
                "'{}' not found in '{}'",
                self.search,
                target.display()
            )));
        }

        let (replaced, count) = if self.first_only {
            (content.replacen(&self.search, &self.replacement, 1), 1)
        } else {
            (
                content.replace(&self.search, &self.replacement),
                occurrences,
            )
        };
        tokio::fs::write(target, replaced).await?;
        log::debug!(
            "ReplaceText: {} occurrence(s) in '{}'",
            count,
            target.display()
        );
        Ok(MutationResult::success(format!(
            "replaced {} occurrence(s) of '{}'",
            count, self.search
        )))
    }
}
