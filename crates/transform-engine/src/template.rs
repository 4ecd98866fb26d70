//! Transformation templates
//!
//! A template is an ordered, possibly grouped, sequence of steps defining
//! one named transformation. Registration assigns each unnamed step a
//! stable derived name (`{parent}-{order}-{label}`) and performs all
//! definition-time validation, so a template that builds successfully is
//! executable as-is.

use std::collections::HashSet;

use crate::error::DefinitionError;
use crate::step::{Step, StepBody};

/// An ordered, possibly grouped, sequence of steps
#[derive(Debug)]
pub struct Template {
    name: String,
    description: String,
    extension: Option<String>,
    steps: Vec<Step>,
    names: HashSet<String>,
}

impl Template {
    /// Create an empty template
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            extension: None,
            steps: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Tag the template with the identity of the extension that owns it
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Register a step at the end of the list and return its final name,
    /// so later steps can reference its context entry.
    ///
    /// Fails on duplicate names, mutation steps without a target, and
    /// blank condition attributes. Group children are registered
    /// recursively, named after the group.
    pub fn add(&mut self, step: Step) -> Result<String, DefinitionError> {
        let mut step = step;
        let order = self.steps.len() + 1;
        let parent = self.name.clone();
        self.register(&mut step, &parent, order)?;
        // register() always assigns a name
        let name = step.name.clone().unwrap_or_default();
        self.steps.push(step);
        Ok(name)
    }

    fn register(
        &mut self,
        step: &mut Step,
        parent: &str,
        order: usize,
    ) -> Result<(), DefinitionError> {
        let name = step
            .name
            .clone()
            .unwrap_or_else(|| format!("{}-{}-{}", parent, order, step.label()));

        if !self.names.insert(name.clone()) {
            return Err(DefinitionError::DuplicateStepName {
                name,
                template: self.name.clone(),
            });
        }

        if let Some(condition) = &step.condition {
            if condition.attribute.trim().is_empty() {
                return Err(DefinitionError::BlankConditionAttribute { step: name });
            }
        }

        if matches!(step.body, StepBody::Mutation { .. }) && step.target.is_none() {
            return Err(DefinitionError::MissingTarget { step: name });
        }

        step.name = Some(name.clone());

        if let StepBody::Group(children) = &mut step.body {
            for (index, child) in children.iter_mut().enumerate() {
                self.register(child, &name, index + 1)?;
            }
        }

        Ok(())
    }

    /// The template name, also the prefix of derived step names
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human description of the transformation
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Identity of the owning extension, if tagged
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// The registered steps, in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Total number of registered steps, groups counted as one
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TransformContext;
    use crate::error::Result;
    use crate::result::{InspectionResult, MutationResult};
    use crate::step::{Inspector, Mutator};
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;

    struct Probe;

    #[async_trait]
    impl Inspector for Probe {
        fn label(&self) -> &str {
            "Probe"
        }

        fn description(&self) -> String {
            "Probe".into()
        }

        async fn inspect(
            &self,
            _target: &Path,
            _context: &TransformContext,
        ) -> Result<InspectionResult> {
            Ok(InspectionResult::value(json!(true)))
        }
    }

    struct Touch;

    #[async_trait]
    impl Mutator for Touch {
        fn label(&self) -> &str {
            "Touch"
        }

        fn description(&self) -> String {
            "Touch".into()
        }

        async fn mutate(
            &self,
            _target: &Path,
            _context: &TransformContext,
        ) -> Result<MutationResult> {
            Ok(MutationResult::success("touched"))
        }
    }

    #[test]
    fn test_derived_names_follow_registration_order() {
        let mut template = Template::new("SpringBootMigration", "WAR to Spring Boot");
        let first = template.add(Step::inspect(Probe)).unwrap();
        let second = template.add(Step::inspect(Probe)).unwrap();

        assert_eq!(first, "SpringBootMigration-1-Probe");
        assert_eq!(second, "SpringBootMigration-2-Probe");
    }

    #[test]
    fn test_explicit_name_is_kept() {
        let mut template = Template::new("T", "t");
        let name = template
            .add(Step::inspect(Probe).named("hasPom"))
            .unwrap();
        assert_eq!(name, "hasPom");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut template = Template::new("T", "t");
        template.add(Step::inspect(Probe).named("same")).unwrap();
        let err = template
            .add(Step::inspect(Probe).named("same"))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateStepName { .. }));
    }

    #[test]
    fn test_mutation_without_target_rejected() {
        let mut template = Template::new("T", "t");
        let err = template.add(Step::mutate(Touch)).unwrap_err();
        assert!(matches!(err, DefinitionError::MissingTarget { .. }));
    }

    #[test]
    fn test_blank_condition_attribute_rejected() {
        let mut template = Template::new("T", "t");
        let err = template
            .add(Step::inspect(Probe).execute_if("  "))
            .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::BlankConditionAttribute { .. }
        ));
    }

    #[test]
    fn test_group_children_named_after_group() {
        let mut template = Template::new("T", "t");
        let group = Step::group(
            "pomEdits",
            vec![
                Step::mutate(Touch).relative("pom.xml"),
                Step::mutate(Touch).relative("pom.xml"),
            ],
        );
        let name = template.add(group).unwrap();
        assert_eq!(name, "pomEdits");

        let registered = &template.steps()[0];
        match &registered.body {
            StepBody::Group(children) => {
                assert_eq!(children[0].name(), Some("pomEdits-1-Touch"));
                assert_eq!(children[1].name(), Some("pomEdits-2-Touch"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_group_child_name_collision_rejected() {
        let mut template = Template::new("T", "t");
        template.add(Step::inspect(Probe).named("clash")).unwrap();
        let group = Step::group(
            "g",
            vec![Step::mutate(Touch).relative("x").named("clash")],
        );
        let err = template.add(group).unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateStepName { .. }));
    }
}
