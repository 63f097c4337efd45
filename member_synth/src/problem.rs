//! Diagnostics produced during validation.
//!
//! Problems are data. The host anchors them on the annotation usage named in
//! [`Problem::anchor`] and may offer the remediations without the engine
//! interpreting them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Provenance, Stereotype};

/// Problem severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks generation for the offending usage.
    Error,
    /// Reported, never blocks.
    Warning,
}

/// A suggested fix, forwarded to the host verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Remediation {
    /// Set an attribute on the annotation.
    SetAttribute {
        /// Attribute name.
        name: String,
        /// Suggested source value.
        value: String,
    },
    /// Remove the annotation.
    RemoveAnnotation,
    /// Remove a modifier from the annotated declaration.
    RemoveModifier {
        /// Modifier keyword.
        modifier: String,
    },
    /// Add a modifier to the annotated declaration.
    AddModifier {
        /// Modifier keyword.
        modifier: String,
    },
}

/// A validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Annotation usage the problem belongs to.
    pub anchor: Provenance,
    /// Suggested fixes.
    #[serde(default)]
    pub remediations: Vec<Remediation>,
}

impl Problem {
    /// An error anchored on `anchor`.
    #[must_use]
    pub fn error(anchor: Provenance, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            anchor,
            remediations: Vec::new(),
        }
    }

    /// A warning anchored on `anchor`.
    #[must_use]
    pub fn warning(anchor: Provenance, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            anchor,
            remediations: Vec::new(),
        }
    }

    /// Attaches a remediation.
    #[must_use]
    pub fn with_fix(mut self, fix: Remediation) -> Self {
        self.remediations.push(fix);
        self
    }

    /// Whether this problem blocks generation.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {} ({})", self.message, self.anchor)
    }
}

/// Collects problems for one processor run against one usage.
#[derive(Debug, Clone)]
pub struct ProblemSink {
    anchor: Provenance,
    problems: Vec<Problem>,
}

impl ProblemSink {
    /// Starts a sink anchored on `stereotype` at `symbol`.
    #[must_use]
    pub fn new(stereotype: Stereotype, symbol: impl Into<String>) -> Self {
        Self {
            anchor: Provenance::new(stereotype, symbol),
            problems: Vec::new(),
        }
    }

    /// Anchor shared by every problem in this sink.
    #[must_use]
    pub const fn anchor(&self) -> &Provenance {
        &self.anchor
    }

    /// Records an error and returns it for further decoration.
    pub fn error(&mut self, message: impl Into<String>) -> &mut Problem {
        self.push(Problem::error(self.anchor.clone(), message))
    }

    /// Records a warning and returns it for further decoration.
    pub fn warning(&mut self, message: impl Into<String>) -> &mut Problem {
        self.push(Problem::warning(self.anchor.clone(), message))
    }

    #[expect(clippy::indexing_slicing, reason = "index of the element just pushed")]
    fn push(&mut self, problem: Problem) -> &mut Problem {
        let index = self.problems.len();
        self.problems.push(problem);
        &mut self.problems[index]
    }

    /// Whether any error has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(Problem::is_error)
    }

    /// Recorded problems so far.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Consumes the sink.
    #[must_use]
    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}

impl Problem {
    /// Attaches a remediation in place; pairs with [`ProblemSink::error`].
    pub fn fix(&mut self, fix: Remediation) -> &mut Self {
        self.remediations.push(fix);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_never_count_as_errors() {
        let mut sink = ProblemSink::new(Stereotype::ToString, "a.B");
        sink.warning("redundant");
        assert!(!sink.has_errors());
        sink.error("broken").fix(Remediation::RemoveAnnotation);
        assert!(sink.has_errors());
        let problems = sink.into_problems();
        assert_eq!(problems.len(), 2);
        assert_eq!(
            problems.last().map(|p| p.remediations.clone()),
            Some(vec![Remediation::RemoveAnnotation])
        );
    }

    #[test]
    fn display_includes_anchor() {
        let problem = Problem::error(Provenance::new(Stereotype::Data, "a.B"), "only classes");
        assert_eq!(problem.to_string(), "error: only classes (@Data on a.B)");
    }
}
