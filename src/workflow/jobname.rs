//! Runtime Job Name Parsing
//!
//! GitHub renders matrix job names as `"<base name> (<matrix values>)"` and
//! composite job context as `/`-separated segments, e.g.
//! `"service-checks (snakes, example) / run-plan-alerts"`. This module
//! recovers the canonical (declaration-time) name and the rendered matrix
//! values from such runtime names.

use once_cell::sync::Lazy;
use regex::Regex;

/// First parenthesized group with any immediately preceding spaces,
/// matched non-greedily.
static MATRIX_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r" *\(.+?\)").unwrap());

/// Inner text of a parenthesized group.
static MATRIX_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

/// Attributes extracted from a runtime job name, used to label job- and
/// step-level metric points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobNameAttributes {
    /// The job name with its first matrix annotation removed.
    pub canonical_name: String,
    /// Rendered matrix values, present iff a parenthesized group was found.
    pub matrix: Option<String>,
}

/// Removes the first matrix annotation from a runtime job name.
///
/// Only the leftmost parenthesized group is removed, together with any
/// spaces immediately before it; later `/`-separated composite segments are
/// left untouched.
///
/// # Example
///
/// ```
/// use actions_metrics::workflow::canonical_job_name;
///
/// assert_eq!(canonical_job_name("ts"), "ts");
/// assert_eq!(canonical_job_name("ts (1, 2, 3)"), "ts");
/// assert_eq!(canonical_job_name("matrix (foo, bar) / name"), "matrix / name");
/// ```
pub fn canonical_job_name(job_name: &str) -> String {
    MATRIX_SUFFIX.replace(job_name, "").into_owned()
}

/// Parses a runtime job name into metric attributes.
///
/// The canonical name is always produced. When the name carries one or more
/// parenthesized groups, only the FIRST group's inner text becomes the
/// matrix value; any further groups are discarded. Composite job names carry
/// at most one matrix annotation in practice, so this is a deliberate
/// simplification rather than a defect.
pub fn parse_job_name(job_name: &str) -> JobNameAttributes {
    let canonical_name = canonical_job_name(job_name);
    let matrix = MATRIX_GROUP
        .captures(job_name)
        .map(|group| group[1].to_string());

    JobNameAttributes {
        canonical_name,
        matrix,
    }
}
