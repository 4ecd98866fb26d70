//! Manual-instructions artifact
//!
//! Renders the manual-instruction records a run collected into a markdown
//! document at the root of the transformed tree, so it ships with the
//! result (including inside a zipped output).

use std::path::{Path, PathBuf};

use transform_engine::ManualInstructionRecord;

/// File name of the rendered document
pub const MANUAL_INSTRUCTIONS_FILE: &str = "MANUAL_INSTRUCTIONS.md";

/// Write the manual-instructions document, if any records were collected.
/// Returns the document location, or `None` when there was nothing to
/// write.
pub(crate) fn write_manual_instructions(
    root: &Path,
    template: &str,
    records: &[ManualInstructionRecord],
) -> std::io::Result<Option<PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }

    let mut document = format!(
        "# Manual instructions\n\nTransformation '{}' could not automate {} change(s).\nApply them by hand before using the transformed application.\n\n",
        template,
        records.len()
    );
    for (index, record) in records.iter().enumerate() {
        document.push_str(&format!("{}. {}", index + 1, record.description));
        if let Some(resource) = &record.resource {
            document.push_str(&format!(" (`{}`)", resource.display()));
        }
        document.push('\n');
    }

    let location = root.join(MANUAL_INSTRUCTIONS_FILE);
    std::fs::write(&location, document)?;
    log::info!(
        "{} manual instruction(s) written to '{}'",
        records.len(),
        location.display()
    );
    Ok(Some(location))
}
