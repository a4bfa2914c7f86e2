//! Workflow Definition Parser
//!
//! Parses workflow YAML text into a [`WorkflowDefinition`]. Validation is
//! deliberately shallow: the document root must be a mapping and it must
//! carry a `jobs` mapping. Individual job entries are taken as-is; an entry
//! with an unexpected shape degrades to an empty [`JobSpec`] instead of
//! failing the parse, since absent fields are tolerated downstream.

use std::collections::HashMap;

use log::debug;
use serde_yaml::Value;
use thiserror::Error;

use super::model::{JobSpec, WorkflowDefinition};

/// Errors produced while parsing a workflow definition document.
///
/// Both kinds mean the same thing to callers: the workflow definition is
/// unavailable, and metric emission proceeds without runner inference.
#[derive(Debug, Error)]
pub enum WorkflowParseError {
    /// The document did not deserialize to a mapping (null included).
    #[error("workflow is not a valid object: {0}")]
    MalformedDocument(String),

    /// The document root lacks a mapping-typed `jobs` field.
    #[error("workflow does not have a valid \"jobs\" field")]
    MissingJobsField,
}

/// Parses workflow definition text into a [`WorkflowDefinition`].
///
/// # Arguments
///
/// * `text` - Raw workflow YAML document text
///
/// # Returns
///
/// * `Ok(WorkflowDefinition)` - The `jobs` mapping of the document
/// * `Err(WorkflowParseError)` - The document root or its `jobs` field is
///   not a mapping
///
/// # Example
///
/// ```
/// use actions_metrics::workflow::parse_workflow;
///
/// let def = parse_workflow("jobs:\n  ts:\n    runs-on: ubuntu-latest\n").unwrap();
/// assert_eq!(def.len(), 1);
/// ```
pub fn parse_workflow(text: &str) -> Result<WorkflowDefinition, WorkflowParseError> {
    let document: Value = serde_yaml::from_str(text)
        .map_err(|e| WorkflowParseError::MalformedDocument(e.to_string()))?;

    let root = match document {
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(WorkflowParseError::MalformedDocument(
                value_kind(&other).to_string(),
            ))
        }
    };

    let jobs = match root.get("jobs") {
        Some(Value::Mapping(mapping)) => mapping,
        _ => return Err(WorkflowParseError::MissingJobsField),
    };

    let mut declared: HashMap<String, JobSpec> = HashMap::with_capacity(jobs.len());
    for (key, value) in jobs {
        let Some(key) = key.as_str() else {
            debug!("Skipping non-string job key: {:?}", key);
            continue;
        };
        // Entries that do not fit the expected shape keep their key but
        // carry no name or runner.
        let spec = serde_yaml::from_value(value.clone()).unwrap_or_default();
        declared.insert(key.to_string(), spec);
    }

    debug!("Parsed workflow definition with {} job(s)", declared.len());
    Ok(WorkflowDefinition { jobs: declared })
}

/// Describes a YAML value's kind for error messages.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workflow() {
        let def = parse_workflow(
            "
jobs:
  ts:
    runs-on: ubuntu-latest
",
        )
        .unwrap();

        assert_eq!(
            def,
            WorkflowDefinition::from_jobs(vec![(
                "ts",
                JobSpec::new().with_runner("ubuntu-latest"),
            )])
        );
    }

    #[test]
    fn test_parse_workflow_with_names_and_templates() {
        let def = parse_workflow(
            "
jobs:
  ts:
    name: typescript build
    runs-on: ubuntu-latest
  matrix:
    name: test / ${{ matrix.x }}
    runs-on: self-hosted
",
        )
        .unwrap();

        assert_eq!(def.len(), 2);
        assert_eq!(
            def.job("matrix").and_then(|j| j.name.as_deref()),
            Some("test / ${{ matrix.x }}")
        );
    }

    #[test]
    fn test_parse_scalar_document_is_malformed() {
        let err = parse_workflow("just a string").unwrap_err();
        assert!(matches!(err, WorkflowParseError::MalformedDocument(_)));
    }

    #[test]
    fn test_parse_sequence_document_is_malformed() {
        let err = parse_workflow("- a\n- b\n").unwrap_err();
        assert!(matches!(err, WorkflowParseError::MalformedDocument(_)));
    }

    #[test]
    fn test_parse_empty_document_is_malformed() {
        // An empty document deserializes to null.
        let err = parse_workflow("").unwrap_err();
        assert!(matches!(err, WorkflowParseError::MalformedDocument(_)));
    }

    #[test]
    fn test_parse_invalid_yaml_is_malformed() {
        let err = parse_workflow("jobs: [unclosed").unwrap_err();
        assert!(matches!(err, WorkflowParseError::MalformedDocument(_)));
    }

    #[test]
    fn test_parse_missing_jobs_field() {
        let err = parse_workflow("name: ci\non: push\n").unwrap_err();
        assert!(matches!(err, WorkflowParseError::MissingJobsField));
    }

    #[test]
    fn test_parse_non_mapping_jobs_field() {
        let err = parse_workflow("jobs: not-a-mapping\n").unwrap_err();
        assert!(matches!(err, WorkflowParseError::MissingJobsField));

        let err = parse_workflow("jobs:\n").unwrap_err();
        assert!(matches!(err, WorkflowParseError::MissingJobsField));
    }

    #[test]
    fn test_parse_tolerates_malformed_job_entry() {
        let def = parse_workflow(
            "
jobs:
  ok:
    runs-on: ubuntu-latest
  odd: just-a-string
",
        )
        .unwrap();

        assert_eq!(def.len(), 2);
        assert_eq!(def.job("odd"), Some(&JobSpec::new()));
    }

    #[test]
    fn test_parse_tolerates_runs_on_group_mapping() {
        // A `runs-on: { group: ... }` declaration is out of scope; the entry
        // survives with no runner label.
        let def = parse_workflow(
            "
jobs:
  grouped:
    runs-on:
      group: org-runners
",
        )
        .unwrap();

        assert_eq!(def.job("grouped"), Some(&JobSpec::new()));
    }
}
