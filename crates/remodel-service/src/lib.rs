//! Remodel Service - transformation coordination for remodel
//!
//! The coordinator around the transform engine: it validates requests,
//! resolves template names through a registry, materializes an isolated
//! working copy per request, dispatches the engine on the async runtime
//! and aggregates the final [`TransformationResult`]. It supports:
//!
//! - Concurrent transformation requests with isolation by construction
//! - Template and upgrade-path resolution with explicit not-found /
//!   ambiguous errors
//! - Working-copy staging, in-place mutation and zipped output
//! - Context properties seeded from the request configuration
//! - A manual-instructions document for changes steps could not automate
//!
//! # Example
//!
//! ```ignore
//! use remodel_service::{Application, Configuration, TransformService};
//!
//! let service = TransformService::new();
//! let application = Application::new("/path/to/app")?;
//! let handle = service.transform(application, "SpringBootMigration", Configuration::default())?;
//! let result = handle.wait().await?;
//! assert!(result.successful);
//! ```

pub mod application;
mod compression;
pub mod config;
pub mod error;
pub mod instructions;
pub mod registry;
pub mod result;
pub mod service;
mod staging;

// Re-export key types
pub use application::Application;
pub use config::{Configuration, ConfigurationBuilder};
pub use error::{Result, ServiceError};
pub use registry::{TemplateProvider, TemplateRegistry, UpgradeProvider};
pub use result::{StepRecord, TransformationResult, UpgradeSummary};
pub use service::{TransformHandle, TransformService};
