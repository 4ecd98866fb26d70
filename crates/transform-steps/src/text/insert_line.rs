//! Insert Line Mutation
//!
//! Inserts one line into the target file: at the end, at a zero-based
//! index, or right after the first line containing an anchor fragment.
//! A missing anchor is a no-op so templates can insert "if the section is
//! there".

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

/// Where the new line goes
#[derive(Debug, Clone)]
pub enum InsertPosition {
    /// Append after the last line
    AtEnd,
    /// Insert before the line currently at this zero-based index;
    /// an index past the end appends
    AtIndex(usize),
    /// Insert after the first line containing this fragment
    After(String),
}

/// Insert a line into the target text file
#[derive(Debug, Clone)]
pub struct InsertLine {
    line: String,
    position: InsertPosition,
}

impl InsertLine {
    /// Append the line at the end of the file
    pub fn at_end(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            position: InsertPosition::AtEnd,
        }
    }

    /// Insert the line at a zero-based index
    pub fn at_index(line: impl Into<String>, index: usize) -> Self {
        Self {
            line: line.into(),
            position: InsertPosition::AtIndex(index),
        }
    }

    /// Insert the line after the first line containing `anchor`
    pub fn after(line: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            position: InsertPosition::After(anchor.into()),
        }
    }
}

#[async_trait]
impl Mutator for InsertLine {
    fn label(&self) -> &str {
        "InsertLine"
    }

    fn description(&self) -> String {
        match &self.position {
            InsertPosition::AtEnd => format!("Insert line '{}' at the end of the target file", self.line),
            InsertPosition::AtIndex(index) => {
                format!("Insert line '{}' at index {} of the target file", self.line, index)
            }
            InsertPosition::After(anchor) => {
                format!("Insert line '{}' after the line containing '{}'", self.line, anchor)
            }
        }
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
        let mut past_end = None;
        let insert_at = match &self.position {
            InsertPosition::AtEnd => lines.len(),
            InsertPosition::AtIndex(index) => {
                if *index > lines.len() {
                    past_end = Some(*index);
                }
                (*index).min(lines.len())
            }
            InsertPosition::After(anchor) => {
                match lines.iter().position(|line| line.contains(anchor.as_str())) {
                    Some(index) => index + 1,
                    None => {
                        return Ok(MutationResult::no_op(format!(
                            "no line containing '{}' in '{}'",
                            anchor,
                            target.display()
                        )))
                    }
                }
            }
        };

        lines.insert(insert_at, self.line.clone());
        let mut rewritten = lines.join("\n");
        if content.ends_with('\n') || content.is_empty() {
            rewritten.push('\n');
        }
        tokio::fs::write(target, rewritten).await?;
        log::debug!(
            "InsertLine: inserted at line {} of '{}'",
            insert_at,
            target.display()
        );
        let mut result = MutationResult::success(format!("inserted line at index {}", insert_at));
        if let Some(index) = past_end {
            // The change was applied, just not exactly where asked
            result.add_warning(format!(
                "index {} is past the end of the file, line appended at {}",
                index, insert_at
            ));
        }
        Ok(result)
    }
}
