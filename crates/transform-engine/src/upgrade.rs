//! Upgrade paths
//!
//! An upgrade path chains version-tagged templates ("upgrade steps") so an
//! application can be walked from its current version to a target version
//! by running each intermediate step's template in sequence. The path is
//! an immutable ordered list plus an explicit cursor: it can be inspected
//! without being consumed, and the cursor only ever moves forward.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::engine::AbortDetails;
use crate::error::DefinitionError;
use crate::result::{ManualInstructionRecord, StepOutcome};
use crate::template::Template;

/// A version-tagged template forming one link of an upgrade path
#[derive(Debug)]
pub struct UpgradeStep {
    template: Template,
    current_version: String,
    next_version: String,
}

impl UpgradeStep {
    /// Create an upgrade step taking an application from
    /// `current_version` to `next_version`
    pub fn new(
        template: Template,
        current_version: impl Into<String>,
        next_version: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let current_version = current_version.into();
        let next_version = next_version.into();
        if current_version.trim().is_empty() || next_version.trim().is_empty() {
            return Err(DefinitionError::BlankVersion {
                template: template.name().to_string(),
            });
        }
        Ok(Self {
            template,
            current_version,
            next_version,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn next_version(&self) -> &str {
        &self.next_version
    }
}

/// A consumable walk over a chain of upgrade steps
#[derive(Debug)]
pub struct UpgradePath {
    steps: Vec<UpgradeStep>,
    target_version: String,
    /// Index of the last step to yield (the one whose `next_version`
    /// equals the target)
    end: usize,
    cursor: usize,
}

impl UpgradePath {
    /// Build a path from an ordered chain of upgrade steps.
    ///
    /// The chain must be contiguous (each step starts at the version the
    /// previous one upgrades to). An explicit `target` must equal the
    /// `next_version` of some step in the chain and must be newer than the
    /// starting version; when omitted, the target defaults to the last
    /// step's `next_version` ("upgrade to latest").
    pub fn new(steps: Vec<UpgradeStep>, target: Option<&str>) -> Result<Self, DefinitionError> {
        let first = steps.first().ok_or(DefinitionError::EmptyUpgradePath)?;

        for pair in steps.windows(2) {
            if pair[0].next_version != pair[1].current_version {
                return Err(DefinitionError::BrokenUpgradeChain {
                    expected: pair[0].next_version.clone(),
                    found: pair[1].current_version.clone(),
                });
            }
        }

        let target_version = match target {
            None => steps[steps.len() - 1].next_version.clone(),
            Some(target) => {
                if target == first.current_version {
                    return Err(DefinitionError::CurrentVersionTarget {
                        version: target.to_string(),
                    });
                }
                if compare_versions(target, &first.current_version) == Ordering::Less {
                    return Err(DefinitionError::OlderTargetVersion {
                        target: target.to_string(),
                        current: first.current_version.clone(),
                    });
                }
                target.to_string()
            }
        };

        let end = steps
            .iter()
            .position(|step| step.next_version == target_version)
            .ok_or_else(|| DefinitionError::UnknownUpgradeVersion {
                version: target_version.clone(),
            })?;

        Ok(Self {
            steps,
            target_version,
            end,
            cursor: 0,
        })
    }

    /// The version the walk starts from
    pub fn original_version(&self) -> &str {
        &self.steps[0].current_version
    }

    /// The version the walk upgrades to
    pub fn target_version(&self) -> &str {
        &self.target_version
    }

    /// Human-readable summary of the walk
    pub fn description(&self) -> String {
        format!(
            "Upgrade path from version {} to version {}",
            self.original_version(),
            self.target_version
        )
    }

    /// True until the step whose `next_version` equals the target has
    /// been yielded
    pub fn has_next(&self) -> bool {
        self.cursor <= self.end
    }

    /// Yield the step at the cursor and advance. Returns `None` once the
    /// path is exhausted.
    pub fn next(&mut self) -> Option<&UpgradeStep> {
        if !self.has_next() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        Some(&self.steps[index])
    }

    /// The step the cursor points at, without consuming it
    pub fn peek(&self) -> Option<&UpgradeStep> {
        if self.has_next() {
            Some(&self.steps[self.cursor])
        } else {
            None
        }
    }

    /// How many steps have been yielded so far
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Total number of steps this walk will yield
    pub fn len(&self) -> usize {
        self.end + 1
    }
}

/// Record of one upgrade step's template execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRunRecord {
    pub template: String,
    pub from_version: String,
    pub to_version: String,
    pub aborted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_details: Option<AbortDetails>,
    pub outcomes: Vec<(String, StepOutcome)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manual_instructions: Vec<ManualInstructionRecord>,
}

/// Aggregate result of walking an upgrade path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeOutcome {
    pub aborted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_details: Option<AbortDetails>,
    pub runs: Vec<UpgradeRunRecord>,
}

/// Compare two dotted version strings segment-wise, numerically where
/// both segments parse as numbers
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let l = l.unwrap_or("0");
                let r = r.unwrap_or("0");
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}
