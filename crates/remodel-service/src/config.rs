//! Transformation configuration
//!
//! A recognized-options bag validated at build time: where the transformed
//! copy goes, whether it is zipped, whether the original tree is mutated
//! in place, the properties pre-seeded into the context, and the dry-run
//! and verbosity switches. There is no process-wide state; a configuration
//! travels with its request.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, ServiceError};

/// Validated options for one transformation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_folder: Option<PathBuf>,
    zip_output: bool,
    modify_original_folder: bool,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    properties: HashMap<String, String>,
    dry_run: bool,
    verbose: bool,
}

impl Default for Configuration {
    /// Transformed copy placed next to the application, no zip
    fn default() -> Self {
        Self {
            output_folder: None,
            zip_output: false,
            modify_original_folder: false,
            properties: HashMap::new(),
            dry_run: false,
            verbose: false,
        }
    }
}

impl Configuration {
    /// Start building a configuration
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder {
            configuration: Self::default(),
        }
    }

    /// Where the transformed copy is placed; `None` means a sibling of
    /// the application folder
    pub fn output_folder(&self) -> Option<&Path> {
        self.output_folder.as_deref()
    }

    /// Whether the transformed tree is compressed into a zip afterwards
    pub fn zip_output(&self) -> bool {
        self.zip_output
    }

    /// Whether the original folder is mutated in place instead of copied
    pub fn modify_original_folder(&self) -> bool {
        self.modify_original_folder
    }

    /// Properties pre-seeded into the context. Names prefixed with `$`
    /// are the conventional condition flags.
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Execute without persisting mutations
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Step-by-step logging at info level
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Builder validating option combinations at `build` time
#[derive(Debug)]
pub struct ConfigurationBuilder {
    configuration: Configuration,
}

impl ConfigurationBuilder {
    /// Place the transformed copy under this existing directory
    pub fn output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.configuration.output_folder = Some(folder.into());
        self
    }

    /// Compress the transformed tree into a zip when done
    pub fn zip_output(mut self, zip: bool) -> Self {
        self.configuration.zip_output = zip;
        self
    }

    /// Mutate the original folder in place instead of copying it
    pub fn modify_original_folder(mut self, modify: bool) -> Self {
        self.configuration.modify_original_folder = modify;
        self
    }

    /// Seed one context property
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration
            .properties
            .insert(name.into(), value.into());
        self
    }

    /// Seed many context properties
    pub fn properties(mut self, properties: HashMap<String, String>) -> Self {
        self.configuration.properties.extend(properties);
        self
    }

    /// Execute without persisting mutations
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.configuration.dry_run = dry_run;
        self
    }

    /// Step-by-step logging at info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.configuration.verbose = verbose;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<Configuration> {
        let configuration = self.configuration;
        if let Some(folder) = &configuration.output_folder {
            if configuration.modify_original_folder {
                return Err(ServiceError::InvalidConfiguration(
                    "an output folder cannot be combined with modifying the original folder"
                        .into(),
                ));
            }
            if !folder.is_dir() {
                return Err(ServiceError::InvalidConfiguration(format!(
                    "output folder '{}' does not exist or is not a directory",
                    folder.display()
                )));
            }
        }
        if configuration.modify_original_folder && configuration.zip_output {
            return Err(ServiceError::InvalidConfiguration(
                "zip output cannot be combined with modifying the original folder".into(),
            ));
        }
        Ok(configuration)
    }
}
