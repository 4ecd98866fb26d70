//! Output compression
//!
//! Zips a transformed tree into a single archive next to it. Entry names
//! are relative to the tree root with forward slashes, so the archive
//! unpacks the same way everywhere.

use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{Result, ServiceError};

/// Compress `source` into the zip file at `destination`
pub(crate) fn zip_tree(source: &Path, destination: &Path) -> Result<()> {
    let file = std::fs::File::create(destination)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    add_entries(&mut writer, source, source, options)?;
    writer
        .finish()
        .map_err(|e| ServiceError::Compression(e.to_string()))?;
    log::debug!(
        "Compressed '{}' into '{}'",
        source.display(),
        destination.display()
    );
    Ok(())
}

fn add_entries(
    writer: &mut ZipWriter<std::fs::File>,
    root: &Path,
    directory: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        let name = path
            .strip_prefix(root)
            .map_err(|e| ServiceError::Compression(e.to_string()))?
            .to_string_lossy()
            .replace('\\', "/");

        if entry.file_type()?.is_dir() {
            writer
                .add_directory(format!("{}/", name), options)
                .map_err(|e| ServiceError::Compression(e.to_string()))?;
            add_entries(writer, root, &path, options)?;
        } else {
            writer
                .start_file(name, options)
                .map_err(|e| ServiceError::Compression(e.to_string()))?;
            let content = std::fs::read(&path)?;
            writer.write_all(&content)?;
        }
    }
    Ok(())
}
