//! Runner Inference
//!
//! Best-effort mapping of a runtime job name back to its declared workflow
//! job, to recover the runner label the workflow file declares. Runtime
//! names embed matrix values and composite segments the static declaration
//! does not have, so matching is tolerant: an exact match on the
//! canonicalized name is tried first, then templated display names
//! containing `${{ ... }}` expressions are matched as patterns against the
//! raw name.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::jobname::canonical_job_name;
use super::model::WorkflowDefinition;

/// A flat `${{ ... }}` expression placeholder, matched non-greedily.
static EXPRESSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{\{.+?\}\}").unwrap());

/// Resolves the declared runner label for a runtime job name.
///
/// Returns `None` when no workflow definition is available (the caller
/// could not fetch the workflow file) or when no declared job correlates
/// with the runtime name. Neither case is an error; the job metric is
/// simply emitted without a runner attribute.
///
/// Matching rules, per declared job:
///
/// 1. Exact: the canonicalized runtime name equals the job key or the
///    declared display name. The declared runner is returned as-is, even
///    when the job declares none.
/// 2. Templated: a display name containing at least one `${{ ... }}`
///    placeholder is turned into an anchored pattern (literal fragments
///    escaped, placeholders replaced by a non-greedy wildcard) and matched
///    against the RAW runtime name, since matrix values rendered into the
///    template are exactly what canonicalization would strip.
///
/// The first match encountered wins; well-formed workflows do not produce
/// ties.
///
/// # Example
///
/// ```
/// use actions_metrics::workflow::{infer_runner, JobSpec, WorkflowDefinition};
///
/// let def = WorkflowDefinition::from_jobs(vec![(
///     "ts",
///     JobSpec::new().with_runner("ubuntu-latest"),
/// )]);
/// assert_eq!(infer_runner("ts (1, 2, 3)", Some(&def)).as_deref(), Some("ubuntu-latest"));
/// assert_eq!(infer_runner("foo", Some(&def)), None);
/// ```
pub fn infer_runner(job_name: &str, definition: Option<&WorkflowDefinition>) -> Option<String> {
    let definition = definition?;
    let canonical_name = canonical_job_name(job_name);

    for (key, job) in &definition.jobs {
        // Exact match on the job key or a literal display name.
        if canonical_name == *key || Some(canonical_name.as_str()) == job.name.as_deref() {
            debug!("Job '{}' matched declared job '{}'", job_name, key);
            return job.runs_on.clone();
        }

        // Templated display name. The presence check must be an explicit
        // match test: a placeholder at position zero is a valid template.
        if let Some(name) = &job.name {
            if EXPRESSION.is_match(name) && template_matches(name, job_name) {
                debug!("Job '{}' matched templated job '{}'", job_name, key);
                return job.runs_on.clone();
            }
        }
    }

    None
}

/// Matches a raw runtime job name against a templated display name.
///
/// The template is split on every placeholder; literal fragments are
/// regex-escaped and rejoined with a non-greedy one-or-more wildcard, and
/// the resulting pattern is anchored at both ends.
fn template_matches(template: &str, job_name: &str) -> bool {
    let pattern = format!(
        "^{}$",
        EXPRESSION
            .split(template)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".+?")
    );

    match Regex::new(&pattern) {
        Ok(re) => re.is_match(job_name),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::model::JobSpec;

    fn keyed_definition() -> WorkflowDefinition {
        WorkflowDefinition::from_jobs(vec![("ts", JobSpec::new().with_runner("ubuntu-latest"))])
    }

    #[test]
    fn test_lookup_by_key_simple_name() {
        let runner = infer_runner("ts", Some(&keyed_definition()));
        assert_eq!(runner.as_deref(), Some("ubuntu-latest"));
    }

    #[test]
    fn test_lookup_by_key_matrix_name() {
        let runner = infer_runner("ts (1, 2, 3)", Some(&keyed_definition()));
        assert_eq!(runner.as_deref(), Some("ubuntu-latest"));
    }

    #[test]
    fn test_lookup_by_key_not_found() {
        let runner = infer_runner("foo", Some(&keyed_definition()));
        assert_eq!(runner, None);
    }

    fn named_definition() -> WorkflowDefinition {
        WorkflowDefinition::from_jobs(vec![(
            "ts",
            JobSpec::new()
                .with_name("typescript build")
                .with_runner("ubuntu-latest"),
        )])
    }

    #[test]
    fn test_lookup_by_display_name_simple() {
        let runner = infer_runner("typescript build", Some(&named_definition()));
        assert_eq!(runner.as_deref(), Some("ubuntu-latest"));
    }

    #[test]
    fn test_lookup_by_display_name_matrix() {
        let runner = infer_runner("typescript build (1, 2, 3)", Some(&named_definition()));
        assert_eq!(runner.as_deref(), Some("ubuntu-latest"));
    }

    #[test]
    fn test_lookup_by_display_name_not_found() {
        let runner = infer_runner("foo", Some(&named_definition()));
        assert_eq!(runner, None);
    }

    fn templated_definition() -> WorkflowDefinition {
        WorkflowDefinition::from_jobs(vec![
            (
                "foo",
                JobSpec::new()
                    .with_name("test / ${{ matrix.x }} / ${{ matrix.y }}")
                    .with_runner("self-hosted"),
            ),
            ("bar", JobSpec::new().with_runner("ubuntu-latest")),
        ])
    }

    #[test]
    fn test_lookup_by_template() {
        let runner = infer_runner("test / 32 / true", Some(&templated_definition()));
        assert_eq!(runner.as_deref(), Some("self-hosted"));
    }

    #[test]
    fn test_lookup_by_template_not_found() {
        let runner = infer_runner("baz", Some(&templated_definition()));
        assert_eq!(runner, None);
    }

    #[test]
    fn test_template_placeholder_at_position_zero() {
        let def = WorkflowDefinition::from_jobs(vec![(
            "build",
            JobSpec::new()
                .with_name("${{ matrix.os }} build")
                .with_runner("self-hosted"),
        )]);

        let runner = infer_runner("ubuntu build", Some(&def));
        assert_eq!(runner.as_deref(), Some("self-hosted"));
    }

    #[test]
    fn test_template_escapes_literal_metacharacters() {
        let def = WorkflowDefinition::from_jobs(vec![(
            "build",
            JobSpec::new()
                .with_name("build (${{ matrix.os }})")
                .with_runner("self-hosted"),
        )]);

        assert_eq!(
            infer_runner("build (ubuntu)", Some(&def)).as_deref(),
            Some("self-hosted")
        );
        // The parentheses are literal, not a regex group.
        assert_eq!(infer_runner("build ubuntu", Some(&def)), None);
    }

    #[test]
    fn test_template_is_anchored() {
        let def = WorkflowDefinition::from_jobs(vec![(
            "foo",
            JobSpec::new()
                .with_name("test / ${{ matrix.x }}")
                .with_runner("self-hosted"),
        )]);

        assert_eq!(infer_runner("prefix test / 32", Some(&def)), None);
        assert_eq!(
            infer_runner("test / 32", Some(&def)).as_deref(),
            Some("self-hosted")
        );
    }

    #[test]
    fn test_exact_match_without_declared_runner() {
        // A match terminates the search even when the job declares no
        // runner; the result is simply unknown.
        let def = WorkflowDefinition::from_jobs(vec![("ts", JobSpec::new())]);
        assert_eq!(infer_runner("ts", Some(&def)), None);
    }

    #[test]
    fn test_no_definition_available() {
        assert_eq!(infer_runner("anything", None), None);
        assert_eq!(infer_runner("", None), None);
    }

    #[test]
    fn test_empty_definition() {
        let def = WorkflowDefinition::new();
        assert_eq!(infer_runner("ts", Some(&def)), None);
    }
}
