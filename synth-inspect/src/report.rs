//! Building and rendering inspection reports.

use member_synth::model::{MemberKind, SynthesizedMember, TypeId};
use member_synth::{Augmenter, InferredType, Problem, SnapshotHost};
use serde::Serialize;
use tracing::debug;

use crate::error::InspectError;
use crate::input::SnapshotDocument;

/// Synthesized members and problems for one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeReport {
    /// Inspected type.
    pub id: TypeId,
    /// Accepted members, filtered by kind when requested.
    pub members: Vec<SynthesizedMember>,
    /// Problems found while augmenting.
    pub problems: Vec<Problem>,
}

/// Outcome of inferring one placeholder local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderReport {
    /// Local variable name.
    pub variable: String,
    /// Enclosing symbol.
    pub symbol: String,
    /// Inferred type, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inferred: Option<InferredType>,
    /// Why inference failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<Problem>,
}

/// Everything `synth-inspect` prints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Per-type results, sorted by id.
    pub types: Vec<TypeReport>,
    /// Placeholder results in document order.
    pub placeholders: Vec<PlaceholderReport>,
}

impl Report {
    /// Number of error problems across the report.
    #[must_use]
    pub fn error_count(&self) -> usize {
        let type_errors = self
            .types
            .iter()
            .flat_map(|t| &t.problems)
            .filter(|p| p.is_error())
            .count();
        let placeholder_errors = self
            .placeholders
            .iter()
            .filter_map(|p| p.problem.as_ref())
            .filter(|p| p.is_error())
            .count();
        type_errors + placeholder_errors
    }

    /// Human-readable rendering: one header per type, `+` for members and
    /// `!` for problems.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        for ty in &self.types {
            lines.push(ty.id.to_string());
            lines.extend(ty.members.iter().map(|m| format!("  + {m}")));
            lines.extend(ty.problems.iter().map(|p| format!("  ! {p}")));
        }
        for local in &self.placeholders {
            let outcome = match (&local.inferred, &local.problem) {
                (Some(inferred), _) if inferred.is_final => format!("final {}", inferred.ty),
                (Some(inferred), _) => inferred.ty.to_string(),
                (None, Some(problem)) => format!("! {problem}"),
                (None, None) => "?".to_owned(),
            };
            lines.push(format!("{}: {} -> {outcome}", local.symbol, local.variable));
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// Augments the selected types of `document` (every type when `selected`
/// is empty) and infers its placeholders.
///
/// # Errors
///
/// Returns [`InspectError::UnknownType`] for a selected type missing from
/// the snapshot, or [`InspectError::Synth`] if augmentation fails.
pub fn build_report(
    document: &SnapshotDocument,
    augmenter: &Augmenter<SnapshotHost>,
    selected: &[String],
    kind: Option<MemberKind>,
) -> Result<Report, InspectError> {
    let ids = if selected.is_empty() {
        augmenter.host().type_ids()
    } else {
        selected
            .iter()
            .map(|name| {
                let id = TypeId::from(name.as_str());
                augmenter
                    .host()
                    .get(&id)
                    .map(|_| id)
                    .ok_or_else(|| InspectError::UnknownType(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut types = Vec::with_capacity(ids.len());
    for id in ids {
        let analysis = augmenter.analyse(&id)?;
        let members = analysis
            .members
            .iter()
            .filter(|m| kind.is_none_or(|wanted| m.kind() == wanted))
            .cloned()
            .collect();
        debug!(type_id = %id, problems = analysis.problems.len(), "inspected type");
        types.push(TypeReport {
            id,
            members,
            problems: analysis.problems.clone(),
        });
    }

    let placeholders = document
        .placeholders
        .iter()
        .map(|usage| {
            let outcome = augmenter.infer_placeholder_type(usage);
            PlaceholderReport {
                variable: usage.variable.clone(),
                symbol: usage.symbol.clone(),
                inferred: outcome.as_ref().ok().cloned(),
                problem: outcome.err(),
            }
        })
        .collect();

    Ok(Report {
        types,
        placeholders,
    })
}
