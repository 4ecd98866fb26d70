//! Transformation coordinator
//!
//! Accepts transformation requests, resolves the template, materializes a
//! private working copy, runs the engine on a spawned task and hands the
//! caller a handle to await. Any number of requests can be in flight at
//! once: each owns its working copy, context and freshly built template,
//! so isolation comes from construction rather than synchronization.

use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use transform_engine::{
    Engine, EventSink, ExecutionOptions, LogEventSink, TransformContext, UpgradePath,
};

use crate::application::Application;
use crate::config::Configuration;
use crate::error::{Result, ServiceError};
use crate::registry::TemplateRegistry;
use crate::result::{StepRecord, TransformationResult, UpgradeSummary};
use crate::{compression, instructions, staging};

/// A dispatched transformation, awaitable for its result
#[derive(Debug)]
pub struct TransformHandle {
    id: Uuid,
    join: JoinHandle<Result<TransformationResult>>,
}

impl TransformHandle {
    /// The run identifier, also part of the output location
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the transformation to finish
    pub async fn wait(self) -> Result<TransformationResult> {
        self.join
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
    }
}

/// Entry point for transformation and upgrade requests
pub struct TransformService {
    registry: Arc<TemplateRegistry>,
    events: Arc<dyn EventSink>,
}

impl Default for TransformService {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformService {
    /// Create a service backed by the link-time collected registry
    pub fn new() -> Self {
        Self {
            registry: Arc::new(TemplateRegistry::with_collected()),
            events: Arc::new(LogEventSink),
        }
    }

    /// Create a service with an explicit registry
    pub fn with_registry(registry: Arc<TemplateRegistry>) -> Self {
        Self {
            registry,
            events: Arc::new(LogEventSink),
        }
    }

    /// Replace the progress event sink
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// The registry this service resolves names against
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Dispatch a template transformation.
    ///
    /// Resolution and definition errors surface here, before anything is
    /// copied or executed. The returned handle resolves to the final
    /// [`TransformationResult`].
    pub fn transform(
        &self,
        application: Application,
        template_name: &str,
        configuration: Configuration,
    ) -> Result<TransformHandle> {
        let factory = self.registry.resolve_template(template_name)?;
        // A fresh template per run: concurrent runs never share step state
        let template = factory()?;
        let events = self.events.clone();
        let id = Uuid::new_v4();
        log::info!(
            "Transformation {}: '{}' against '{}'",
            id,
            template.name(),
            application.folder().display()
        );

        let join = tokio::spawn(async move {
            let location = staging::materialize(&application, &configuration, &id).await?;
            let mut context = TransformContext::with_properties(configuration.properties());
            let engine = Engine::with_event_sink(events);
            let options = ExecutionOptions {
                dry_run: configuration.dry_run(),
                verbose: configuration.verbose(),
            };

            let report = engine
                .execute(&template, &location, &mut context, &options)
                .await?;

            let step_outcomes = context
                .outcomes()
                .iter()
                .map(|(step, outcome)| StepRecord {
                    step: step.clone(),
                    outcome: outcome.clone(),
                })
                .collect();

            finalize(
                id,
                template.name().to_string(),
                None,
                configuration,
                location,
                report.aborted,
                report.abort_details,
                step_outcomes,
                context.manual_instructions().to_vec(),
            )
        });
        Ok(TransformHandle { id, join })
    }

    /// Dispatch an upgrade-path transformation.
    ///
    /// `first_step_name` resolves to the first upgrade step of a chain;
    /// an absent `target_version` means "upgrade to latest". Construction
    /// of the path (chain contiguity, target reachability) is validated
    /// here, before dispatch.
    pub fn upgrade(
        &self,
        application: Application,
        first_step_name: &str,
        target_version: Option<&str>,
        configuration: Configuration,
    ) -> Result<TransformHandle> {
        let factory = self.registry.resolve_upgrade(first_step_name)?;
        let chain = factory()?;
        let mut path = UpgradePath::new(chain, target_version)?;
        let summary = UpgradeSummary {
            from_version: path.original_version().to_string(),
            to_version: path.target_version().to_string(),
        };
        let first_template = path
            .peek()
            .map(|step| step.template().name().to_string())
            .unwrap_or_else(|| first_step_name.to_string());
        let events = self.events.clone();
        let id = Uuid::new_v4();
        log::info!("Transformation {}: {}", id, path.description());

        let join = tokio::spawn(async move {
            let location = staging::materialize(&application, &configuration, &id).await?;
            let engine = Engine::with_event_sink(events);
            let options = ExecutionOptions {
                dry_run: configuration.dry_run(),
                verbose: configuration.verbose(),
            };

            let outcome = engine
                .execute_upgrade(&mut path, &location, configuration.properties(), &options)
                .await?;

            let step_outcomes = outcome
                .runs
                .iter()
                .flat_map(|run| run.outcomes.iter())
                .map(|(step, outcome)| StepRecord {
                    step: step.clone(),
                    outcome: outcome.clone(),
                })
                .collect();
            let manual_instructions = outcome
                .runs
                .iter()
                .flat_map(|run| run.manual_instructions.iter().cloned())
                .collect();

            finalize(
                id,
                first_template,
                Some(summary),
                configuration,
                location,
                outcome.aborted,
                outcome.abort_details,
                step_outcomes,
                manual_instructions,
            )
        });
        Ok(TransformHandle { id, join })
    }
}

/// Assemble the final report: manual-instructions document, optional zip,
/// and the result value
#[allow(clippy::too_many_arguments)]
fn finalize(
    id: Uuid,
    template: String,
    upgrade: Option<UpgradeSummary>,
    configuration: Configuration,
    location: std::path::PathBuf,
    aborted: bool,
    abort_details: Option<transform_engine::AbortDetails>,
    step_outcomes: Vec<StepRecord>,
    manual_instructions: Vec<transform_engine::ManualInstructionRecord>,
) -> Result<TransformationResult> {
    let manual_location =
        instructions::write_manual_instructions(&location, &template, &manual_instructions)?;
    let manual_available = manual_location.is_some();

    let mut transformed_location = location.clone();
    let mut zip_location = None;
    let mut manual_instructions_location = manual_location;
    if configuration.zip_output() {
        let archive = location.with_extension("zip");
        compression::zip_tree(&location, &archive)?;
        std::fs::remove_dir_all(&location)?;
        transformed_location = archive.clone();
        if manual_available {
            // The document ships at the archive root
            manual_instructions_location = Some(archive.clone());
        }
        zip_location = Some(archive);
    }

    if aborted {
        log::warn!("Transformation {}: aborted", id);
    } else {
        log::info!(
            "Transformation {}: completed, output at '{}'",
            id,
            transformed_location.display()
        );
    }

    Ok(TransformationResult {
        id: id.to_string(),
        template,
        upgrade,
        configuration,
        transformed_location,
        successful: !aborted,
        aborted,
        abort_details,
        step_outcomes,
        manual_instructions_available: manual_available,
        manual_instructions_location,
        zip_location,
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;
    use transform_engine::{
        DefinitionError, MutationKind, Step, StepOutcome, Template, UpgradeStep,
    };
    use transform_steps::{
        FileExists, InsertLine, ManualInstruction, ReadTextFile, RemoveProperty, ReplaceText,
        SetProperty,
    };

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn seed_application(root: &Path) -> Application {
        let app_dir = root.join("billing-app");
        std::fs::create_dir_all(app_dir.join("src")).unwrap();
        std::fs::write(
            app_dir.join("app.properties"),
            "packaging=war\nname=billing\n",
        )
        .unwrap();
        std::fs::write(app_dir.join("README.md"), "Deploy the war file.\n").unwrap();
        std::fs::write(app_dir.join("src/App.java"), "class App {}\n").unwrap();
        Application::new(app_dir).unwrap()
    }

    /// The migration used across the end-to-end tests: set packaging,
    /// add a parent, remove a dependency that may not be there.
    fn migration_template() -> std::result::Result<Template, DefinitionError> {
        let mut template = Template::new("PropertiesMigration", "retarget the packaging model");
        template.add(
            Step::mutate(SetProperty::new("packaging", "jar")).relative("app.properties"),
        )?;
        template.add(
            Step::mutate(SetProperty::new("parent", "org.x:y:1.0")).relative("app.properties"),
        )?;
        template.add(
            Step::mutate(RemoveProperty::new("legacy.dependency"))
                .relative("app.properties")
                .abort_on_failure(false),
        )?;
        Ok(template)
    }

    fn failing_template() -> std::result::Result<Template, DefinitionError> {
        let mut template = Template::new("FailingRead", "read a file that is not there");
        template.add(Step::inspect(ReadTextFile::new()).relative("missing/model.xml"))?;
        template.add(
            Step::mutate(SetProperty::new("never", "runs")).relative("app.properties"),
        )?;
        Ok(template)
    }

    fn registry_with_defaults() -> Arc<TemplateRegistry> {
        let registry = TemplateRegistry::new();
        registry.register_template("PropertiesMigration", migration_template);
        registry.register_template("FailingRead", failing_template);
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_end_to_end_template_run() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());
        let service = TransformService::with_registry(registry_with_defaults());

        let handle = service
            .transform(
                application.clone(),
                "PropertiesMigration",
                Configuration::default(),
            )
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert!(result.successful);
        assert!(!result.aborted);
        assert_eq!(result.step_outcomes.len(), 3);

        // SUCCESS, SUCCESS, NO_OP (the removed dependency was absent)
        let kinds: Vec<MutationKind> = result
            .step_outcomes
            .iter()
            .map(|record| match record.outcome.execution_result().unwrap() {
                transform_engine::ExecutionResult::Mutation(m) => m.kind(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                MutationKind::Success,
                MutationKind::Success,
                MutationKind::NoOp
            ]
        );

        // The transformed copy has the edits; the original is untouched
        let transformed = std::fs::read_to_string(
            result.transformed_location.join("app.properties"),
        )
        .unwrap();
        assert!(transformed.contains("packaging=jar"));
        assert!(transformed.contains("parent=org.x:y:1.0"));
        let original =
            std::fs::read_to_string(application.folder().join("app.properties")).unwrap();
        assert!(original.contains("packaging=war"));
    }

    #[tokio::test]
    async fn test_inspection_failure_aborts_with_single_outcome() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());
        let service = TransformService::with_registry(registry_with_defaults());

        let result = service
            .transform(application, "FailingRead", Configuration::default())
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert!(result.aborted);
        assert!(!result.successful);
        assert_eq!(result.step_outcomes.len(), 1);
        assert!(result.abort_details.is_some());
    }

    #[tokio::test]
    async fn test_resolution_errors_surface_before_dispatch() {
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());
        let service = TransformService::with_registry(registry_with_defaults());

        let err = service
            .transform(application, "NoSuchTemplate", Configuration::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::TemplateNotFound(_)));
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_isolated() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());
        let service = TransformService::with_registry(registry_with_defaults());

        let mut handles = Vec::new();
        for _ in 0..20 {
            handles.push(
                service
                    .transform(
                        application.clone(),
                        "PropertiesMigration",
                        Configuration::default(),
                    )
                    .unwrap(),
            );
        }

        let mut locations = Vec::new();
        for handle in handles {
            let result = handle.wait().await.unwrap();
            assert!(result.successful);
            let content = std::fs::read_to_string(
                result.transformed_location.join("app.properties"),
            )
            .unwrap();
            // Every copy converges to the same transformed content
            assert_eq!(content, "packaging=jar\nname=billing\nparent=org.x:y:1.0\n");
            locations.push(result.transformed_location);
        }

        // Distinct output location per request
        let unique: std::collections::HashSet<_> = locations.iter().collect();
        assert_eq!(unique.len(), locations.len());
    }

    #[tokio::test]
    async fn test_zip_output_replaces_the_folder() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());
        let service = TransformService::with_registry(registry_with_defaults());

        let configuration = Configuration::builder().zip_output(true).build().unwrap();
        let result = service
            .transform(application, "PropertiesMigration", configuration)
            .unwrap()
            .wait()
            .await
            .unwrap();

        let archive = result.zip_location.clone().unwrap();
        assert_eq!(result.transformed_location, archive);
        assert!(archive.exists());
        assert_eq!(archive.extension().unwrap(), "zip");
        // The uncompressed folder is gone
        assert!(!archive.with_extension("").exists());
    }

    #[tokio::test]
    async fn test_modify_original_folder_mutates_in_place() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());
        let service = TransformService::with_registry(registry_with_defaults());

        let configuration = Configuration::builder()
            .modify_original_folder(true)
            .build()
            .unwrap();
        let result = service
            .transform(application.clone(), "PropertiesMigration", configuration)
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert_eq!(result.transformed_location, application.folder());
        let content =
            std::fs::read_to_string(application.folder().join("app.properties")).unwrap();
        assert!(content.contains("packaging=jar"));
    }

    #[tokio::test]
    async fn test_dry_run_leaves_the_copy_untouched() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());
        let service = TransformService::with_registry(registry_with_defaults());

        let configuration = Configuration::builder().dry_run(true).build().unwrap();
        let result = service
            .transform(application, "PropertiesMigration", configuration)
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert!(result.successful);
        let content = std::fs::read_to_string(
            result.transformed_location.join("app.properties"),
        )
        .unwrap();
        assert!(content.contains("packaging=war"));
        // Every mutation is visible as a no-op
        for record in &result.step_outcomes {
            assert!(matches!(record.outcome, StepOutcome::Executed { .. }));
        }
    }

    #[tokio::test]
    async fn test_manual_instructions_artifact() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());

        fn with_manual_work() -> std::result::Result<Template, DefinitionError> {
            let mut template = Template::new("ManualWork", "partially automated");
            template.add(
                Step::mutate(ReplaceText::new("war file", "jar file")).relative("README.md"),
            )?;
            template.add(Step::inspect(
                ManualInstruction::new("Review the service wiring by hand")
                    .with_resource("src/App.java"),
            ))?;
            Ok(template)
        }
        let registry = TemplateRegistry::new();
        registry.register_template("ManualWork", with_manual_work);
        let service = TransformService::with_registry(Arc::new(registry));

        let result = service
            .transform(application, "ManualWork", Configuration::default())
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert!(result.manual_instructions_available);
        let location = result.manual_instructions_location.unwrap();
        let content = std::fs::read_to_string(location).unwrap();
        assert!(content.contains("Review the service wiring by hand"));
    }

    fn upgrade_chain() -> std::result::Result<Vec<UpgradeStep>, DefinitionError> {
        fn to_1_1() -> std::result::Result<Template, DefinitionError> {
            let mut template = Template::new("UpgradeTo1_1", "framework 1.0 to 1.1");
            template.add(Step::mutate(InsertLine::at_end("upgraded-to=1.1")).relative(
                "app.properties",
            ))?;
            Ok(template)
        }
        fn to_2_0() -> std::result::Result<Template, DefinitionError> {
            let mut template = Template::new("UpgradeTo2_0", "framework 1.1 to 2.0");
            template.add(Step::mutate(InsertLine::at_end("upgraded-to=2.0")).relative(
                "app.properties",
            ))?;
            Ok(template)
        }
        Ok(vec![
            UpgradeStep::new(to_1_1()?, "1.0", "1.1")?,
            UpgradeStep::new(to_2_0()?, "1.1", "2.0")?,
        ])
    }

    #[tokio::test]
    async fn test_upgrade_to_latest() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());

        let registry = TemplateRegistry::new();
        registry.register_upgrade("UpgradeTo1_1", upgrade_chain);
        let service = TransformService::with_registry(Arc::new(registry));

        let result = service
            .upgrade(application, "UpgradeTo1_1", None, Configuration::default())
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert!(result.successful);
        let summary = result.upgrade.clone().unwrap();
        assert_eq!(summary.from_version, "1.0");
        assert_eq!(summary.to_version, "2.0");

        let content = std::fs::read_to_string(
            result.transformed_location.join("app.properties"),
        )
        .unwrap();
        assert!(content.contains("upgraded-to=1.1"));
        assert!(content.contains("upgraded-to=2.0"));
        // One outcome per template, both runs present in order
        assert_eq!(result.step_outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_upgrade_stops_at_target_version() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());

        let registry = TemplateRegistry::new();
        registry.register_upgrade("UpgradeTo1_1", upgrade_chain);
        let service = TransformService::with_registry(Arc::new(registry));

        let result = service
            .upgrade(
                application,
                "UpgradeTo1_1",
                Some("1.1"),
                Configuration::default(),
            )
            .unwrap()
            .wait()
            .await
            .unwrap();

        let content = std::fs::read_to_string(
            result.transformed_location.join("app.properties"),
        )
        .unwrap();
        assert!(content.contains("upgraded-to=1.1"));
        assert!(!content.contains("upgraded-to=2.0"));
    }

    #[tokio::test]
    async fn test_invalid_upgrade_target_fails_before_dispatch() {
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());

        let registry = TemplateRegistry::new();
        registry.register_upgrade("UpgradeTo1_1", upgrade_chain);
        let service = TransformService::with_registry(Arc::new(registry));

        let err = service
            .upgrade(
                application,
                "UpgradeTo1_1",
                Some("9.9"),
                Configuration::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Definition(DefinitionError::UnknownUpgradeVersion { .. })
        ));
    }

    #[tokio::test]
    async fn test_conditions_driven_by_seeded_properties() {
        init_logging();
        let dir = tempdir().unwrap();
        let application = seed_application(dir.path());

        fn conditional() -> std::result::Result<Template, DefinitionError> {
            let mut template = Template::new("Conditional", "README edits behind a flag");
            let has_readme =
                template.add(Step::inspect(FileExists::new()).relative("README.md"))?;
            let edit = Step::mutate(ReplaceText::new("Deploy the war file.", "Run the jar."))
                .relative("README.md")
                .execute_if(has_readme.as_str());
            template.add(Step::group("readmeEdits", vec![edit]).execute_if("$editReadme"))?;
            Ok(template)
        }
        let registry = TemplateRegistry::new();
        registry.register_template("Conditional", conditional);
        let service = TransformService::with_registry(Arc::new(registry));

        // Flag off: the group is skipped wholesale
        let result = service
            .transform(application.clone(), "Conditional", Configuration::default())
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert!(matches!(
            result.outcome("readmeEdits").unwrap(),
            StepOutcome::SkippedCondition { .. }
        ));

        // Flag on: the edit runs
        let configuration = Configuration::builder()
            .property("$editReadme", "true")
            .build()
            .unwrap();
        let result = service
            .transform(application, "Conditional", configuration)
            .unwrap()
            .wait()
            .await
            .unwrap();
        let content =
            std::fs::read_to_string(result.transformed_location.join("README.md")).unwrap();
        assert!(content.contains("Run the jar."));
    }
}
