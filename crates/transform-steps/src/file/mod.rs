//! File system steps
//!
//! Inspections over the tree (existence checks, recursive search) and the
//! copy/delete/rename mutator family. Copy and rename abort the run on
//! failure by default; deletions default to continuing, matching how these
//! step families are typically composed in templates.

mod copy_directory;
mod copy_file;
mod delete_directory;
mod delete_file;
mod file_exists;
mod find_files;
mod rename_file;

pub use copy_directory::CopyDirectory;
pub use copy_file::CopyFile;
pub use delete_directory::DeleteDirectory;
pub use delete_file::DeleteFile;
pub use file_exists::FileExists;
pub use find_files::FindFiles;
pub use rename_file::RenameFile;

use std::path::{Path, PathBuf};

use transform_engine::TransformContext;

/// Where a copy step places its result.
///
/// Copy destinations are either fixed next to the source at definition
/// time, or read from a context attribute at execution time (the usual
/// pattern when an earlier inspection located the destination).
#[derive(Debug, Clone)]
pub enum Destination {
    /// A path relative to the source's parent directory
    Sibling(PathBuf),
    /// An absolute directory path held by a context attribute
    FromAttribute(String),
}

impl Destination {
    /// Resolve the destination directory against the source and context
    pub(crate) fn resolve(
        &self,
        source: &Path,
        context: &TransformContext,
    ) -> Result<PathBuf, String> {
        match self {
            Self::Sibling(path) => {
                let parent = source
                    .parent()
                    .ok_or_else(|| format!("'{}' has no parent directory", source.display()))?;
                Ok(parent.join(path))
            }
            Self::FromAttribute(attribute) => {
                let raw: String = context
                    .get::<String>(attribute)
                    .map_err(|e| e.to_string())?;
                Ok(PathBuf::from(raw))
            }
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Sibling(path) => format!("'{}'", path.display()),
            Self::FromAttribute(attribute) => {
                format!("directory held by context attribute '{}'", attribute)
            }
        }
    }
}

/// Copy a directory tree, creating destination directories as needed.
/// Existing files are overwritten so re-running the step is idempotent.
pub(crate) fn copy_tree(source: &Path, destination: &Path) -> std::io::Result<u64> {
    let mut copied = 0;
    std::fs::create_dir_all(destination)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
