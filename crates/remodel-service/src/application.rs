//! Application handle
//!
//! A validated reference to the application tree a transformation should
//! start from. Validation happens at construction so a bad path surfaces
//! before any work is dispatched.

use std::path::{Path, PathBuf};

use crate::error::{Result, ServiceError};

/// The application folder a transformation request targets
#[derive(Debug, Clone)]
pub struct Application {
    folder: PathBuf,
    name: String,
}

impl Application {
    /// Create a handle, validating that the folder exists and is a
    /// directory
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self> {
        let folder = folder.into();
        if !folder.exists() {
            return Err(ServiceError::InvalidApplication(format!(
                "'{}' does not exist",
                folder.display()
            )));
        }
        if !folder.is_dir() {
            return Err(ServiceError::InvalidApplication(format!(
                "'{}' is not a directory",
                folder.display()
            )));
        }
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                ServiceError::InvalidApplication(format!(
                    "'{}' has no folder name",
                    folder.display()
                ))
            })?;
        Ok(Self { folder, name })
    }

    /// The application root folder
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// The folder name, used to derive output locations
    pub fn name(&self) -> &str {
        &self.name
    }
}
