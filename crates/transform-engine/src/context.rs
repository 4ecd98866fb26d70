//! Transformation context
//!
//! The context is the write-once, name-keyed result store shared by all
//! steps within one run. The engine records each step's outcome under the
//! step's name; inspection payloads additionally land in the value map so
//! later steps can consume them by name.
//!
//! One context belongs to exactly one run. Concurrent transformations each
//! own a fresh instance; nothing here is synchronized.

use std::collections::HashMap;

use crate::error::ContextError;
use crate::result::{ExecutionResult, ManualInstructionRecord, StepOutcome};

/// Write-once, name-keyed store of step results for a single run
#[derive(Debug, Default)]
pub struct TransformContext {
    values: HashMap<String, serde_json::Value>,
    outcomes: Vec<(String, StepOutcome)>,
    outcome_index: HashMap<String, usize>,
    manual_instructions: Vec<ManualInstructionRecord>,
}

impl TransformContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context pre-seeded with configuration properties.
    ///
    /// Property names are taken verbatim; names prefixed with `$` are the
    /// conventional property-sourced condition flags used by
    /// `execute_if`/`execute_unless`.
    pub fn with_properties(properties: &HashMap<String, String>) -> Self {
        let mut context = Self::new();
        for (name, value) in properties {
            context
                .values
                .insert(name.clone(), serde_json::Value::String(value.clone()));
        }
        context
    }

    /// Bind a value attribute. Entries are write-once: binding a name
    /// twice is an engine invariant violation, never expected in correct
    /// usage.
    pub fn set_value(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), ContextError> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return Err(ContextError::Collision { name });
        }
        self.values.insert(name, value);
        Ok(())
    }

    /// Raw value lookup. A missing name is a hard error; the engine never
    /// silently substitutes a default.
    pub fn value(&self, name: &str) -> Result<&serde_json::Value, ContextError> {
        self.values
            .get(name)
            .ok_or_else(|| ContextError::NeverRecorded { name: name.into() })
    }

    /// Typed value lookup, distinguishing "never recorded" from "recorded
    /// but null" from "recorded but of the wrong type"
    pub fn get<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, ContextError> {
        let value = self.value(name)?;
        if value.is_null() {
            return Err(ContextError::NullValue { name: name.into() });
        }
        serde_json::from_value(value.clone()).map_err(|_| ContextError::WrongType {
            name: name.into(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Boolean-condition lookup with truthiness coercion.
    ///
    /// Unlike [`TransformContext::get`], this never fails: a missing or
    /// null attribute is simply false, as are `false`, `""` and `"false"`.
    /// Everything else is true.
    pub fn flag(&self, name: &str) -> bool {
        match self.values.get(name) {
            None => false,
            Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => !s.is_empty() && s != "false",
            Some(_) => true,
        }
    }

    /// Whether a value attribute is bound, regardless of its content
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Record a step outcome under the step's name (write-once). When the
    /// outcome carries an inspection payload, the payload is also bound as
    /// a value attribute under `store_as` (or the step name).
    pub fn record_outcome(
        &mut self,
        name: &str,
        outcome: StepOutcome,
        store_as: Option<&str>,
    ) -> Result<(), ContextError> {
        if self.outcome_index.contains_key(name) {
            return Err(ContextError::Collision { name: name.into() });
        }
        if let StepOutcome::Executed {
            result: ExecutionResult::Inspection(inspection),
        } = &outcome
        {
            if let Some(value) = inspection.value_ref() {
                self.set_value(store_as.unwrap_or(name), value.clone())?;
            }
            if let Some(record) = inspection.manual_instruction() {
                self.manual_instructions.push(record.clone());
            }
        }
        self.outcome_index
            .insert(name.to_string(), self.outcomes.len());
        self.outcomes.push((name.to_string(), outcome));
        Ok(())
    }

    /// Look up the recorded outcome of a previous step
    pub fn outcome(&self, name: &str) -> Option<&StepOutcome> {
        self.outcome_index
            .get(name)
            .map(|index| &self.outcomes[*index].1)
    }

    /// Ordered list of recorded outcomes, in execution order
    pub fn outcomes(&self) -> &[(String, StepOutcome)] {
        &self.outcomes
    }

    /// Append a manual-instructions entry
    pub fn add_manual_instruction(&mut self, record: ManualInstructionRecord) {
        self.manual_instructions.push(record);
    }

    /// Manual instructions recorded during the run, in order
    pub fn manual_instructions(&self) -> &[ManualInstructionRecord] {
        &self.manual_instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{InspectionResult, MutationResult};
    use serde_json::json;

    #[test]
    fn test_set_then_get_returns_stored_value() {
        let mut context = TransformContext::new();
        context.set_value("pomPath", json!("pom.xml")).unwrap();
        let path: String = context.get("pomPath").unwrap();
        assert_eq!(path, "pom.xml");
    }

    #[test]
    fn test_get_missing_is_hard_error() {
        let context = TransformContext::new();
        let err = context.get::<String>("neverSet").unwrap_err();
        assert_eq!(
            err,
            ContextError::NeverRecorded {
                name: "neverSet".into()
            }
        );
    }

    #[test]
    fn test_get_distinguishes_null_from_missing() {
        let mut context = TransformContext::new();
        context.set_value("maybe", serde_json::Value::Null).unwrap();
        let err = context.get::<String>("maybe").unwrap_err();
        assert_eq!(err, ContextError::NullValue { name: "maybe".into() });
    }

    #[test]
    fn test_get_surfaces_type_mismatch() {
        let mut context = TransformContext::new();
        context.set_value("count", json!("three")).unwrap();
        let err = context.get::<u32>("count").unwrap_err();
        assert!(matches!(err, ContextError::WrongType { .. }));
    }

    #[test]
    fn test_write_once_collision() {
        let mut context = TransformContext::new();
        context.set_value("name", json!(1)).unwrap();
        let err = context.set_value("name", json!(2)).unwrap_err();
        assert_eq!(err, ContextError::Collision { name: "name".into() });
        // The original binding is untouched
        assert_eq!(context.get::<u32>("name").unwrap(), 1);
    }

    #[test]
    fn test_flag_truthiness() {
        let mut context = TransformContext::new();
        context.set_value("$skipTests", json!("true")).unwrap();
        context.set_value("$offline", json!("false")).unwrap();
        context.set_value("empty", json!("")).unwrap();
        context.set_value("flag", json!(true)).unwrap();
        context.set_value("nil", serde_json::Value::Null).unwrap();

        assert!(context.flag("$skipTests"));
        assert!(!context.flag("$offline"));
        assert!(!context.flag("empty"));
        assert!(context.flag("flag"));
        assert!(!context.flag("nil"));
        assert!(!context.flag("missing"));
    }

    #[test]
    fn test_record_outcome_stores_inspection_payload() {
        let mut context = TransformContext::new();
        let outcome = StepOutcome::Executed {
            result: ExecutionResult::Inspection(InspectionResult::value(json!(["x"]))),
        };
        context.record_outcome("find-1", outcome, None).unwrap();

        assert!(context.outcome("find-1").is_some());
        let found: Vec<String> = context.get("find-1").unwrap();
        assert_eq!(found, vec!["x".to_string()]);
    }

    #[test]
    fn test_record_outcome_honors_store_as() {
        let mut context = TransformContext::new();
        let outcome = StepOutcome::Executed {
            result: ExecutionResult::Inspection(InspectionResult::value(json!(true))),
        };
        context
            .record_outcome("exists-1", outcome, Some("hasPom"))
            .unwrap();
        assert!(context.flag("hasPom"));
        // The outcome itself still lives under the step name
        assert!(context.outcome("exists-1").is_some());
        assert!(context.outcome("hasPom").is_none());
    }

    #[test]
    fn test_record_outcome_is_write_once() {
        let mut context = TransformContext::new();
        let outcome = StepOutcome::Executed {
            result: ExecutionResult::Mutation(MutationResult::success("done")),
        };
        context
            .record_outcome("op-1", outcome.clone(), None)
            .unwrap();
        let err = context.record_outcome("op-1", outcome, None).unwrap_err();
        assert_eq!(err, ContextError::Collision { name: "op-1".into() });
    }

    #[test]
    fn test_outcomes_preserve_execution_order() {
        let mut context = TransformContext::new();
        for name in ["a", "b", "c"] {
            context
                .record_outcome(
                    name,
                    StepOutcome::Executed {
                        result: ExecutionResult::Mutation(MutationResult::no_op("-")),
                    },
                    None,
                )
                .unwrap();
        }
        let names: Vec<&str> = context.outcomes().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_seeded_properties() {
        let mut properties = HashMap::new();
        properties.insert("$upgrade".to_string(), "true".to_string());
        properties.insert("appName".to_string(), "billing".to_string());
        let context = TransformContext::with_properties(&properties);

        assert!(context.flag("$upgrade"));
        assert_eq!(context.get::<String>("appName").unwrap(), "billing");
    }
}
