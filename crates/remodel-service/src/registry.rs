//! Template registry and resolution
//!
//! Templates reach the coordinator as named factory functions: a fresh
//! template value is built per run, so concurrent runs of the same
//! transformation never share step state. Factories register either
//! explicitly or at link time through `inventory`.
//!
//! Resolution never guesses: an unknown name and an ambiguous name are
//! distinct errors, both surfaced before any transformation starts.

use std::collections::HashMap;

use parking_lot::RwLock;
use transform_engine::{DefinitionError, Template, UpgradeStep};

use crate::error::{Result, ServiceError};

/// Factory building a fresh template per run
pub type TemplateFactory = fn() -> std::result::Result<Template, DefinitionError>;

/// Factory building a fresh upgrade-step chain per run, starting at the
/// chain's first step
pub type UpgradeFactory = fn() -> std::result::Result<Vec<UpgradeStep>, DefinitionError>;

/// A template provider registered at link time
///
/// ```ignore
/// inventory::submit! {
///     TemplateProvider { name: "SpringBootMigration", build: spring_boot_template }
/// }
/// ```
pub struct TemplateProvider {
    pub name: &'static str,
    pub build: TemplateFactory,
}

inventory::collect!(TemplateProvider);

/// An upgrade-chain provider registered at link time
pub struct UpgradeProvider {
    pub name: &'static str,
    pub build: UpgradeFactory,
}

inventory::collect!(UpgradeProvider);

/// Name-keyed store of template and upgrade factories
#[derive(Default)]
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, Vec<TemplateFactory>>>,
    upgrades: RwLock<HashMap<String, Vec<UpgradeFactory>>>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with every provider submitted through
    /// `inventory`
    pub fn with_collected() -> Self {
        let registry = Self::new();
        for provider in inventory::iter::<TemplateProvider> {
            registry.register_template(provider.name, provider.build);
        }
        for provider in inventory::iter::<UpgradeProvider> {
            registry.register_upgrade(provider.name, provider.build);
        }
        registry
    }

    /// Register a template factory under a name
    pub fn register_template(&self, name: impl Into<String>, factory: TemplateFactory) {
        self.templates
            .write()
            .entry(name.into())
            .or_default()
            .push(factory);
    }

    /// Register an upgrade-chain factory under the name of its first step
    pub fn register_upgrade(&self, name: impl Into<String>, factory: UpgradeFactory) {
        self.upgrades
            .write()
            .entry(name.into())
            .or_default()
            .push(factory);
    }

    /// Resolve a template factory by name
    pub fn resolve_template(&self, name: &str) -> Result<TemplateFactory> {
        let templates = self.templates.read();
        match templates.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(ServiceError::TemplateNotFound(name.to_string())),
            Some(candidates) if candidates.len() > 1 => Err(ServiceError::AmbiguousTemplate {
                name: name.to_string(),
                count: candidates.len(),
            }),
            Some(candidates) => Ok(candidates[0]),
        }
    }

    /// Resolve an upgrade-chain factory by name
    pub fn resolve_upgrade(&self, name: &str) -> Result<UpgradeFactory> {
        let upgrades = self.upgrades.read();
        match upgrades.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(ServiceError::TemplateNotFound(name.to_string())),
            Some(candidates) if candidates.len() > 1 => Err(ServiceError::AmbiguousTemplate {
                name: name.to_string(),
                count: candidates.len(),
            }),
            Some(candidates) => Ok(candidates[0]),
        }
    }

    /// Names of all registered templates, for listings and diagnostics
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.read().keys().cloned().collect();
        names.sort();
        names
    }
}
