//! Working-copy staging
//!
//! Every transformation owns a private working copy of the application
//! tree for its whole lifetime; isolation between concurrent requests is
//! achieved by construction, not by locking. The output location is
//! either the configured folder or a sibling of the application, suffixed
//! with a timestamp and the run id so concurrent requests never collide.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::application::Application;
use crate::config::Configuration;
use crate::error::{Result, ServiceError};

/// Compute where the transformed tree for this run lives
pub(crate) fn output_location(
    application: &Application,
    configuration: &Configuration,
    run_id: &Uuid,
) -> PathBuf {
    if configuration.modify_original_folder() {
        return application.folder().to_path_buf();
    }
    let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let short_id = &run_id.simple().to_string()[..8];
    let name = format!("{}-transformed-{}-{}", application.name(), stamp, short_id);
    match configuration.output_folder() {
        Some(folder) => folder.join(name),
        None => application
            .folder()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(name),
    }
}

/// Materialize the private working copy, unless the request mutates the
/// original folder in place
pub(crate) async fn materialize(
    application: &Application,
    configuration: &Configuration,
    run_id: &Uuid,
) -> Result<PathBuf> {
    let destination = output_location(application, configuration, run_id);
    if configuration.modify_original_folder() {
        log::debug!(
            "Transformation {}: mutating '{}' in place",
            run_id,
            destination.display()
        );
        return Ok(destination);
    }

    let source = application.folder().to_path_buf();
    let target = destination.clone();
    let copied = tokio::task::spawn_blocking(move || copy_tree(&source, &target))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))??;
    log::debug!(
        "Transformation {}: staged {} files into '{}'",
        run_id,
        copied,
        destination.display()
    );
    Ok(destination)
}

/// Recursive tree copy used to stage working copies
fn copy_tree(source: &Path, destination: &Path) -> std::io::Result<u64> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_materializes_full_copy() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join("billing");
        std::fs::create_dir_all(app_dir.join("src")).unwrap();
        std::fs::write(app_dir.join("pom.xml"), "<project/>").unwrap();
        std::fs::write(app_dir.join("src/App.java"), "class App {}").unwrap();

        let application = Application::new(&app_dir).unwrap();
        let configuration = Configuration::default();
        let run_id = Uuid::new_v4();

        let copy = materialize(&application, &configuration, &run_id)
            .await
            .unwrap();

        assert_ne!(copy, app_dir);
        assert!(copy.join("pom.xml").exists());
        assert!(copy.join("src/App.java").exists());
        // The original is untouched
        assert!(app_dir.join("pom.xml").exists());
    }

    #[tokio::test]
    async fn test_modify_original_skips_the_copy() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join("app");
        std::fs::create_dir_all(&app_dir).unwrap();

        let application = Application::new(&app_dir).unwrap();
        let configuration = Configuration::builder()
            .modify_original_folder(true)
            .build()
            .unwrap();
        let run_id = Uuid::new_v4();

        let location = materialize(&application, &configuration, &run_id)
            .await
            .unwrap();
        assert_eq!(location, app_dir);
    }

    #[test]
    fn test_output_locations_are_distinct_per_run() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join("app");
        std::fs::create_dir_all(&app_dir).unwrap();
        let application = Application::new(&app_dir).unwrap();
        let configuration = Configuration::default();

        let first = output_location(&application, &configuration, &Uuid::new_v4());
        let second = output_location(&application, &configuration, &Uuid::new_v4());
        assert_ne!(first, second);
    }

    #[test]
    fn test_configured_output_folder_is_used() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join("app");
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::create_dir_all(&out_dir).unwrap();

        let application = Application::new(&app_dir).unwrap();
        let configuration = Configuration::builder()
            .output_folder(&out_dir)
            .build()
            .unwrap();
        let location = output_location(&application, &configuration, &Uuid::new_v4());
        assert!(location.starts_with(&out_dir));
    }
}
