//! Workflow Definition Data Model
//!
//! Core data structures representing a statically declared workflow:
//! a mapping of job keys to the metadata needed for runner inference.
//!
//! # Example YAML Format
//!
//! ```yaml
//! jobs:
//!   ts:
//!     runs-on: ubuntu-latest
//!
//!   build:
//!     name: build / ${{ matrix.os }}
//!     runs-on:
//!       - self-hosted
//!       - linux
//! ```

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;

/// A single declared job within a workflow definition.
///
/// Only the fields consumed by runner inference are modeled. Both fields
/// are optional: a job declared with neither a display name override nor
/// an explicit runner is valid.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSpec {
    /// Display name override. May contain `${{ expression }}` placeholders
    /// that GitHub resolves at run time.
    #[serde(default)]
    pub name: Option<String>,

    /// Declared runner label (e.g. `ubuntu-latest`, `self-hosted`).
    #[serde(rename = "runs-on", default, deserialize_with = "runner_label")]
    pub runs_on: Option<String>,
}

/// Deserializes a runner label declared as either a single string or a
/// sequence of labels. A sequence is joined with `", "`.
fn runner_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Value::deserialize(deserializer)?;
    match val {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Sequence(seq) => {
            let labels = seq
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s),
                    _ => Err(de::Error::custom("expected string in runs-on sequence")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            if labels.is_empty() {
                Ok(None)
            } else {
                Ok(Some(labels.join(", ")))
            }
        }
        _ => Err(de::Error::custom("expected string or sequence of strings")),
    }
}

impl JobSpec {
    /// Creates an empty job spec (no display name, no declared runner).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name for this job.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the declared runner label for this job.
    pub fn with_runner(mut self, runner: impl Into<String>) -> Self {
        self.runs_on = Some(runner.into());
        self
    }
}

/// A parsed workflow definition: the `jobs` mapping of a workflow file.
///
/// Iteration order over jobs is not significant; callers that look up a
/// runtime job name take the first structural match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowDefinition {
    /// Declared jobs, keyed by job key.
    pub jobs: HashMap<String, JobSpec>,
}

impl WorkflowDefinition {
    /// Creates an empty workflow definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a definition from a list of `(job key, spec)` pairs.
    pub fn from_jobs<I, K>(jobs: I) -> Self
    where
        I: IntoIterator<Item = (K, JobSpec)>,
        K: Into<String>,
    {
        Self {
            jobs: jobs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Gets a declared job by key.
    pub fn job(&self, key: &str) -> Option<&JobSpec> {
        self.jobs.get(key)
    }

    /// Returns the number of declared jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if the definition declares no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
