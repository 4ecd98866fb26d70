//! Find Files Inspection
//!
//! Recursively searches the target directory and publishes the matching
//! paths, relative to the target, as a sorted list. An empty list is a
//! normal `Value` result so templates can iterate over "whatever matched".

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::json;
use transform_engine::{InspectionResult, Inspector, Result, TransformContext};

/// Recursively find files under the target directory
#[derive(Debug, Default, Clone)]
pub struct FindFiles {
    name_contains: Option<String>,
    extension: Option<String>,
    recursive: bool,
}

impl FindFiles {
    /// Create a recursive search with no filters (matches every file)
    pub fn new() -> Self {
        Self {
            name_contains: None,
            extension: None,
            recursive: true,
        }
    }

    /// Only match file names containing this fragment
    pub fn named(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Only match files with this extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Restrict the search to the target directory itself
    pub fn shallow(mut self) -> Self {
        self.recursive = false;
        self
    }

    fn matches(&self, path: &Path) -> bool {
        if let Some(fragment) = &self.name_contains {
            let name = path.file_name().map(|n| n.to_string_lossy().to_string());
            if !name.is_some_and(|n| n.contains(fragment.as_str())) {
                return false;
            }
        }
        if let Some(extension) = &self.extension {
            if path.extension().map(|e| e.to_string_lossy().to_string())
                != Some(extension.clone())
            {
                return false;
            }
        }
        true
    }

    fn walk(&self, base: &Path, dir: &Path, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                if self.recursive {
                    self.walk(base, &path, found)?;
                }
            } else if self.matches(&path) {
                if let Ok(relative) = path.strip_prefix(base) {
                    found.push(relative.to_path_buf());
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Inspector for FindFiles {
    fn label(&self) -> &str {
        "FindFiles"
    }

    fn description(&self) -> String {
        let mut filters = Vec::new();
        if let Some(fragment) = &self.name_contains {
            filters.push(format!("name containing '{}'", fragment));
        }
        if let Some(extension) = &self.extension {
            filters.push(format!("extension '{}'", extension));
        }
        if filters.is_empty() {
            "Find all files under the target folder".into()
        } else {
            format!("Find files with {}", filters.join(" and "))
        }
    }

    async fn inspect(
        &self,
        target: &Path,
        _context: &TransformContext,
    ) -> Result<InspectionResult> {
        if !target.is_dir() {
            return Ok(InspectionResult::error(format!(
                "'{}' is not a directory",
                target.display()
            )));
        }

        let mut found = Vec::new();
        if let Err(e) = self.walk(target, target, &mut found) {
            return Ok(InspectionResult::error(format!(
                "search under '{}' failed: {}",
                target.display(),
                e
            )));
        }

        // Sort so the payload is deterministic across runs
        found.sort();
        let relative: Vec<String> = found
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        log::debug!(
            "FindFiles: {} matches under '{}'",
            relative.len(),
            target.display()
        );
        Ok(InspectionResult::value(json!(relative))
            .with_details(format!("{} files found", relative.len())))
    }
}
