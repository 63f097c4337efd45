//! Field selection for `equals`/`hashCode` and `toString`.
//!
//! Two styles exist: the `of`/`exclude` attribute lists and the
//! `Include`/`Exclude` field markers. The lists take precedence when both
//! are present.

use crate::config::{CallSuperPolicy, RedundancyPolicy};
use crate::model::{AnnotationUsage, AttrValue, DeclaredField, DeclaredType, Modifier, Stereotype};
use crate::problem::{ProblemSink, Remediation};

/// Which generated member the selection is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// `equals`/`hashCode`.
    Equality,
    /// `toString`.
    ToString,
}

impl SelectionKind {
    const fn markers(self) -> (Stereotype, Stereotype) {
        match self {
            Self::Equality => (Stereotype::EqualsInclude, Stereotype::EqualsExclude),
            Self::ToString => (Stereotype::ToStringInclude, Stereotype::ToStringExclude),
        }
    }

    /// Whether `field` takes part when nothing is configured.
    fn is_default_candidate(self, field: &DeclaredField) -> bool {
        let base = !field.is_static() && !field.is_synthetic();
        match self {
            Self::Equality => base && !field.modifiers.has(Modifier::Transient),
            Self::ToString => base,
        }
    }

    const fn subject(self) -> &'static str {
        match self {
            Self::Equality => "equals/hashCode",
            Self::ToString => "toString",
        }
    }
}

/// A participating field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedField<'a> {
    /// The field.
    pub field: &'a DeclaredField,
    /// Label used by `toString` (`@ToString.Include(name = ..)`).
    pub label: String,
    /// Ordering rank; higher ranks come first.
    pub rank: i64,
}

impl<'a> SelectedField<'a> {
    fn plain(field: &'a DeclaredField) -> Self {
        Self {
            field,
            label: field.name.clone(),
            rank: 0,
        }
    }

    fn from_marker(field: &'a DeclaredField, marker: Option<&AnnotationUsage>) -> Self {
        let mut selected = Self::plain(field);
        if let Some(include) = marker {
            if let Some(label) = include.str_attr("name").filter(|n| !n.is_empty()) {
                label.clone_into(&mut selected.label);
            }
            if let Some(AttrValue::Int(rank)) = include.attr("rank") {
                selected.rank = *rank;
            }
        }
        selected
    }
}

fn report_unknown(owner: &DeclaredType, names: &[String], list: &str, sink: &mut ProblemSink) {
    for name in names {
        if owner.field(name).is_none() {
            sink.warning(format!("field '{name}' named in '{list}' does not exist"));
        }
    }
}

/// Selects the participating fields of `owner` for `usage`, in order.
pub fn select_fields<'a>(
    kind: SelectionKind,
    owner: &'a DeclaredType,
    usage: &AnnotationUsage,
    redundancy: RedundancyPolicy,
    sink: &mut ProblemSink,
) -> Vec<SelectedField<'a>> {
    let of = usage.list_attr("of");
    let mut exclude = usage.list_attr("exclude");
    let (include_marker, exclude_marker) = kind.markers();

    if !of.is_empty() && !exclude.is_empty() {
        sink.warning("exclude and of are mutually exclusive; the exclude parameter will be ignored")
            .fix(Remediation::SetAttribute {
                name: "exclude".to_owned(),
                value: "{}".to_owned(),
            });
        exclude.clear();
    }
    report_unknown(owner, &of, "of", sink);
    report_unknown(owner, &exclude, "exclude", sink);

    let uses_lists = !of.is_empty() || !exclude.is_empty();
    let uses_markers = owner
        .fields
        .iter()
        .any(|f| f.has_annotation(include_marker) || f.has_annotation(exclude_marker));
    if uses_lists && uses_markers {
        sink.warning(
            "the old-style 'exclude'/'of' parameters cannot be mixed with the new-style include/exclude annotations",
        );
    }

    if !of.is_empty() {
        return owner
            .fields
            .iter()
            .filter(|f| !f.is_synthetic() && of.contains(&f.name))
            .map(SelectedField::plain)
            .collect();
    }

    if !exclude.is_empty() {
        if redundancy == RedundancyPolicy::Warn {
            for field in owner.fields.iter().filter(|f| exclude.contains(&f.name)) {
                if !kind.is_default_candidate(field) {
                    sink.warning(format!(
                        "field '{}' would have been excluded from {} anyway",
                        field.name,
                        kind.subject()
                    ))
                    .fix(Remediation::SetAttribute {
                        name: "exclude".to_owned(),
                        value: format!("without \"{}\"", field.name),
                    });
                }
            }
        }
        return owner
            .fields
            .iter()
            .filter(|f| kind.is_default_candidate(f) && !exclude.contains(&f.name))
            .map(SelectedField::plain)
            .collect();
    }

    let only_explicit = usage.flag("onlyExplicitlyIncluded", false);
    let mut selected: Vec<SelectedField<'a>> = owner
        .fields
        .iter()
        .filter(|f| !f.is_synthetic())
        .filter_map(|f| {
            let include = f.annotation(include_marker);
            let excluded = f.has_annotation(exclude_marker);
            if excluded {
                if include.is_some() {
                    sink.warning(format!(
                        "field '{}' is marked both included and excluded; exclusion wins",
                        f.name
                    ));
                }
                if redundancy == RedundancyPolicy::Warn && !kind.is_default_candidate(f) {
                    sink.warning(format!(
                        "field '{}' would have been excluded from {} anyway",
                        f.name,
                        kind.subject()
                    ))
                    .fix(Remediation::RemoveAnnotation);
                }
                return None;
            }
            let participates = if only_explicit {
                include.is_some()
            } else {
                include.is_some() || kind.is_default_candidate(f)
            };
            participates.then(|| SelectedField::from_marker(f, include))
        })
        .collect();
    selected.sort_by(|a, b| b.rank.cmp(&a.rank));
    selected
}

/// Effective `callSuper` for `usage` on `owner`, reporting misuse.
///
/// Writing `callSuper = true` on a type without a real superclass is an
/// error. Omitting it on a type with one is decided by `policy`.
pub fn resolve_call_super(
    kind: SelectionKind,
    owner: &DeclaredType,
    usage: &AnnotationUsage,
    policy: CallSuperPolicy,
    sink: &mut ProblemSink,
) -> bool {
    match usage.bool_attr("callSuper") {
        Some(true) if !owner.has_real_superclass() => {
            sink.error(format!(
                "generating {} with a call to the superclass is pointless: '{}' extends java.lang.Object",
                kind.subject(),
                owner.name
            ))
            .fix(Remediation::SetAttribute {
                name: "callSuper".to_owned(),
                value: "false".to_owned(),
            });
            false
        }
        Some(explicit) => explicit,
        None if !owner.has_real_superclass() => false,
        None => match policy {
            CallSuperPolicy::Call => true,
            CallSuperPolicy::Skip => false,
            CallSuperPolicy::Warn => {
                sink.warning(format!(
                    "generating {} without a call to the superclass even though '{}' does not extend java.lang.Object",
                    kind.subject(),
                    owner.name
                ))
                .fix(Remediation::SetAttribute {
                    name: "callSuper".to_owned(),
                    value: "true".to_owned(),
                })
                .fix(Remediation::SetAttribute {
                    name: "callSuper".to_owned(),
                    value: "false".to_owned(),
                });
                false
            }
        },
    }
}
