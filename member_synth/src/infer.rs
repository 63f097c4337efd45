//! Type inference for `val` and `var` local placeholders.
//!
//! The host supplies the already-computed type of the initializer
//! expression; for enhanced `for` loops it supplies the type of the
//! iterated expression and the element type is derived here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::host::Host;
use crate::model::{DeclaredType, Primitive, Provenance, Stereotype, TypeId, TypeRef};
use crate::problem::Problem;

/// Placeholder keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKeyword {
    /// Final local.
    Val,
    /// Mutable local.
    Var,
}

impl PlaceholderKeyword {
    const fn stereotype(self) -> Stereotype {
        match self {
            Self::Val => Stereotype::Val,
            Self::Var => Stereotype::Var,
        }
    }
}

/// One use of a placeholder in a local declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderUse {
    /// Keyword used.
    pub keyword: PlaceholderKeyword,
    /// Declared variable.
    pub variable: String,
    /// Type of the initializer (or iterated expression), when present.
    pub initializer_type: Option<TypeRef>,
    /// Declared as the variable of an enhanced `for` loop.
    #[serde(default)]
    pub foreach: bool,
    /// Enclosing symbol, for problem anchors.
    pub symbol: String,
}

/// Inferred local type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredType {
    /// Type of the local.
    pub ty: TypeRef,
    /// The local is final (`val`).
    pub is_final: bool,
}

/// Raw types whose first type argument is the iteration element.
const ITERABLES: &[&str] = &[
    "Iterable",
    "Collection",
    "List",
    "Set",
    "SortedSet",
    "NavigableSet",
    "Queue",
    "Deque",
    "ArrayList",
    "LinkedList",
    "HashSet",
    "LinkedHashSet",
    "TreeSet",
    "ArrayDeque",
    "PriorityQueue",
    "ImmutableList",
    "ImmutableSet",
    "ImmutableSortedSet",
    "ImmutableCollection",
];

fn known_iterable(ty: &TypeRef) -> Option<TypeRef> {
    let simple = ty.simple_name()?;
    if !ITERABLES.contains(&simple) {
        return None;
    }
    let raw = ty.raw_name()?;
    let standard = raw == simple
        || raw.starts_with("java.")
        || raw.starts_with("com.google.common.collect.");
    if !standard {
        return None;
    }
    Some(
        ty.type_args()
            .first()
            .map_or_else(|| TypeRef::class("java.lang.Object"), TypeRef::as_element),
    )
}

/// Replaces type variables named in `params` with `args`.
fn substitute(ty: &TypeRef, params: &[String], args: &[TypeRef]) -> TypeRef {
    match ty {
        TypeRef::Class { name, args: inner } if inner.is_empty() => params
            .iter()
            .position(|p| p == name)
            .and_then(|index| args.get(index))
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        TypeRef::Class { name, args: inner } => TypeRef::generic(
            name.clone(),
            inner.iter().map(|a| substitute(a, params, args)).collect(),
        ),
        TypeRef::Array(component) => substitute(component, params, args).array_of(),
        TypeRef::Wildcard(Some((bound, inner))) => {
            TypeRef::Wildcard(Some((*bound, Box::new(substitute(inner, params, args)))))
        }
        TypeRef::Primitive(_) | TypeRef::Wildcard(None) => ty.clone(),
    }
}

/// Element type of iterating over `ty`, walking declared supertypes.
fn element_type(host: &dyn Host, ty: &TypeRef, seen: &mut HashSet<TypeId>) -> Option<TypeRef> {
    if let Some(component) = ty.component() {
        return Some(component.clone());
    }
    if let Some(element) = known_iterable(ty) {
        return Some(element);
    }
    let declared: DeclaredType = host.resolve_type(ty)?;
    if !seen.insert(declared.id.clone()) {
        return None;
    }
    declared
        .interfaces
        .iter()
        .chain(declared.superclass.iter())
        .map(|parent| substitute(parent, &declared.type_params, ty.type_args()))
        .find_map(|parent| element_type(host, &parent, seen))
}

/// Infers the type of a placeholder local.
///
/// # Errors
///
/// Returns an error [`Problem`] when there is no initializer, the
/// initializer is `void`, or a `for` loop iterates over something whose
/// element type cannot be determined.
pub fn infer_placeholder(host: &dyn Host, usage: &PlaceholderUse) -> Result<InferredType, Problem> {
    let anchor = Provenance::new(usage.keyword.stereotype(), usage.symbol.clone());
    let keyword = match usage.keyword {
        PlaceholderKeyword::Val => "val",
        PlaceholderKeyword::Var => "var",
    };
    let Some(initializer) = usage.initializer_type.as_ref() else {
        return Err(Problem::error(
            anchor,
            format!("'{keyword}' on '{}' requires an initializer expression", usage.variable),
        ));
    };
    if *initializer == TypeRef::Primitive(Primitive::Void) {
        return Err(Problem::error(
            anchor,
            format!("cannot infer the type of '{}' from a void expression", usage.variable),
        ));
    }
    let ty = if usage.foreach {
        element_type(host, initializer, &mut HashSet::new()).ok_or_else(|| {
            Problem::error(
                anchor.clone(),
                format!("cannot infer the element type of '{initializer}'"),
            )
        })?
    } else {
        initializer.clone()
    };
    Ok(InferredType {
        ty,
        is_final: usage.keyword == PlaceholderKeyword::Val,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SnapshotHost;
    use rstest::rstest;

    fn parse(text: &str) -> TypeRef {
        TypeRef::parse(text).unwrap_or_else(|err| panic!("{err}"))
    }

    fn placeholder(keyword: PlaceholderKeyword, ty: Option<&str>, foreach: bool) -> PlaceholderUse {
        PlaceholderUse {
            keyword,
            variable: "item".to_owned(),
            initializer_type: ty.map(parse),
            foreach,
            symbol: "a.Main#run()".to_owned(),
        }
    }

    fn host() -> SnapshotHost {
        SnapshotHost::from_types([
            DeclaredType::class("a.Bag")
                .with_type_param("T")
                .extending(parse("a.Base<T>")),
            DeclaredType::class("a.Base")
                .with_type_param("E")
                .implementing(parse("java.lang.Iterable<E>")),
            DeclaredType::class("a.Loop").implementing(parse("a.Loop")),
        ])
    }

    #[rstest]
    #[case("java.util.Map<String, Integer>", false, "java.util.Map<String, Integer>")]
    #[case("String[]", true, "String")]
    #[case("java.util.List<? extends Number>", true, "Number")]
    #[case("java.util.Set", true, "java.lang.Object")]
    #[case("a.Bag<String>", true, "String")]
    fn inferred_types(#[case] ty: &str, #[case] foreach: bool, #[case] expected: &str) {
        let result = infer_placeholder(&host(), &placeholder(PlaceholderKeyword::Var, Some(ty), foreach));
        assert_eq!(result.map(|t| t.ty.to_string()), Ok(expected.to_owned()));
    }

    #[test]
    fn val_is_final() {
        let result = infer_placeholder(&host(), &placeholder(PlaceholderKeyword::Val, Some("int"), false));
        assert_eq!(
            result,
            Ok(InferredType {
                ty: TypeRef::Primitive(Primitive::Int),
                is_final: true,
            })
        );
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some("void"), false)]
    #[case(Some("a.Loop"), true)]
    #[case(Some("java.util.Map<String, Integer>"), true)]
    fn failures_are_error_problems(#[case] ty: Option<&str>, #[case] foreach: bool) {
        let result = infer_placeholder(&host(), &placeholder(PlaceholderKeyword::Val, ty, foreach));
        assert!(result.is_err_and(|problem| problem.is_error()));
    }
}
