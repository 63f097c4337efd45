//! `@Singular` container families and their builder templates.
//!
//! Every family accumulates into `java.util.ArrayList`s (a key list and a
//! value list for maps) and materializes three ways at build time.

use crate::model::{
    AccessLevel, AnnotationUsage, Body, Materialization, Modifiers, Primitive, Provenance,
    SynthField, SynthMethod, TypeRef, WildcardBound,
};
use crate::naming::{capitalize, singularize};
use crate::problem::{ProblemSink, Remediation};

use super::info::BuilderInfo;
use super::strategy::{AccumulationStrategy, SingularSpec};

const ARRAY_LIST: &str = "java.util.ArrayList";
const ITERABLE: &str = "java.lang.Iterable";
const COLLECTIONS: &str = "java.util.Collections";
const GUAVA: &str = "com.google.common.collect";

/// Container types `@Singular` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// `java.util.List`
    List,
    /// `java.util.Collection`
    Collection,
    /// `java.lang.Iterable`
    Iterable,
    /// `java.util.Set`
    Set,
    /// `java.util.SortedSet`
    SortedSet,
    /// `java.util.NavigableSet`
    NavigableSet,
    /// `java.util.Map`
    Map,
    /// `java.util.SortedMap`
    SortedMap,
    /// `java.util.NavigableMap`
    NavigableMap,
    /// Guava `ImmutableList`
    ImmutableList,
    /// Guava `ImmutableCollection`
    ImmutableCollection,
    /// Guava `ImmutableSet`
    ImmutableSet,
    /// Guava `ImmutableSortedSet`
    ImmutableSortedSet,
    /// Guava `ImmutableMap`
    ImmutableMap,
    /// Guava `ImmutableSortedMap`
    ImmutableSortedMap,
    /// Guava `ImmutableBiMap`
    ImmutableBiMap,
}

const KNOWN: &[(&str, &str, Container)] = &[
    ("java.util", "List", Container::List),
    ("java.util", "Collection", Container::Collection),
    ("java.lang", "Iterable", Container::Iterable),
    ("java.util", "Set", Container::Set),
    ("java.util", "SortedSet", Container::SortedSet),
    ("java.util", "NavigableSet", Container::NavigableSet),
    ("java.util", "Map", Container::Map),
    ("java.util", "SortedMap", Container::SortedMap),
    ("java.util", "NavigableMap", Container::NavigableMap),
    (GUAVA, "ImmutableList", Container::ImmutableList),
    (GUAVA, "ImmutableCollection", Container::ImmutableCollection),
    (GUAVA, "ImmutableSet", Container::ImmutableSet),
    (GUAVA, "ImmutableSortedSet", Container::ImmutableSortedSet),
    (GUAVA, "ImmutableMap", Container::ImmutableMap),
    (GUAVA, "ImmutableSortedMap", Container::ImmutableSortedMap),
    (GUAVA, "ImmutableBiMap", Container::ImmutableBiMap),
];

impl Container {
    /// Recognises `ty` by simple or qualified raw name.
    #[must_use]
    pub fn recognize(ty: &TypeRef) -> Option<Self> {
        let raw = ty.raw_name()?;
        KNOWN
            .iter()
            .find(|(package, simple, _)| {
                raw == *simple
                    || raw
                        .strip_prefix(package)
                        .and_then(|rest| rest.strip_prefix('.'))
                        == Some(*simple)
            })
            .map(|(_, _, container)| *container)
    }

    /// Whether entries are key/value pairs.
    #[must_use]
    pub const fn is_map(self) -> bool {
        matches!(
            self,
            Self::Map
                | Self::SortedMap
                | Self::NavigableMap
                | Self::ImmutableMap
                | Self::ImmutableSortedMap
                | Self::ImmutableBiMap
        )
    }

    /// Number of type arguments the container takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        if self.is_map() { 2 } else { 1 }
    }

    /// Guava type the container materializes through, if any.
    const fn guava_type(self) -> Option<&'static str> {
        match self {
            Self::ImmutableList | Self::ImmutableCollection => Some("ImmutableList"),
            Self::ImmutableSet => Some("ImmutableSet"),
            Self::ImmutableSortedSet => Some("ImmutableSortedSet"),
            Self::ImmutableMap => Some("ImmutableMap"),
            Self::ImmutableSortedMap => Some("ImmutableSortedMap"),
            Self::ImmutableBiMap => Some("ImmutableBiMap"),
            _ => None,
        }
    }
}

/// Chooses the strategy for a builder entry named `name` of type `ty`.
///
/// `marker` is the `@Singular` usage; without it the entry is plain.
/// `auto` enables automatic singularization of the add-one name.
pub fn select_strategy(
    name: &str,
    ty: &TypeRef,
    marker: Option<&AnnotationUsage>,
    auto: bool,
    sink: &mut ProblemSink,
) -> AccumulationStrategy {
    let Some(marker) = marker else {
        return AccumulationStrategy::Plain;
    };
    let Some(container) = Container::recognize(ty) else {
        sink.warning(format!(
            "@Singular is not supported on type '{ty}'; '{name}' gets a plain setter"
        ))
        .fix(Remediation::RemoveAnnotation);
        return AccumulationStrategy::Plain;
    };
    let args = ty.type_args();
    if args.len() != container.arity() {
        sink.warning(format!(
            "@Singular on '{name}' needs exactly {} type argument(s) on '{ty}'; '{name}' gets a plain setter",
            container.arity()
        ));
        return AccumulationStrategy::Plain;
    }
    let explicit = marker.str_attr("value").filter(|n| !n.is_empty());
    let singular_name = match explicit {
        Some(explicit) => explicit.to_owned(),
        None if auto => singularize(name).unwrap_or_else(|| name.to_owned()),
        None => name.to_owned(),
    };
    AccumulationStrategy::Singular(SingularSpec {
        container,
        singular_name,
        elements: args.iter().map(TypeRef::as_element).collect(),
        ignore_null: marker.flag("ignoreNullCollections", false),
    })
}

fn array_list(element: &TypeRef) -> TypeRef {
    TypeRef::generic(ARRAY_LIST, vec![element.clone()])
}

fn extends(bound: &TypeRef) -> TypeRef {
    TypeRef::Wildcard(Some((WildcardBound::Extends, Box::new(bound.clone()))))
}

/// Accumulator list names: the field itself, or `$key`/`$value` for maps.
fn accumulators(field: &str, spec: &SingularSpec) -> Vec<(String, TypeRef)> {
    match spec.elements.as_slice() {
        [key, value] if spec.is_map() => vec![
            (format!("{field}$key"), array_list(key)),
            (format!("{field}$value"), array_list(value)),
        ],
        elements => elements
            .first()
            .map(|e| vec![(field.to_owned(), array_list(e))])
            .unwrap_or_default(),
    }
}

/// Builder fields holding the accumulated elements.
#[must_use]
pub fn accumulator_fields(
    info: &BuilderInfo,
    spec: &SingularSpec,
    provenance: &Provenance,
) -> Vec<SynthField> {
    accumulators(&info.name, spec)
        .into_iter()
        .map(|(name, ty)| SynthField {
            name,
            ty,
            modifiers: Modifiers::of_access(AccessLevel::Private),
            initializer: None,
            provenance: provenance.clone(),
        })
        .collect()
}

fn init_lines(accumulators: &[(String, TypeRef)]) -> Vec<String> {
    match accumulators {
        [(single, ty)] => vec![format!("if (this.{single} == null) this.{single} = new {ty}();")],
        [(first, _), ..] => {
            let mut lines = vec![format!("if (this.{first} == null) {{")];
            lines.extend(
                accumulators
                    .iter()
                    .map(|(name, ty)| format!("  this.{name} = new {ty}();")),
            );
            lines.push("}".to_owned());
            lines
        }
        [] => Vec::new(),
    }
}

fn prefixed(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}{}", capitalize(name))
    }
}

/// Add-one, add-all and clear methods for a singular entry.
///
/// Fluent builders return `builder_type`; otherwise the methods are `void`.
#[must_use]
pub fn mutators(
    info: &BuilderInfo,
    spec: &SingularSpec,
    builder_type: &TypeRef,
    setter_prefix: &str,
    fluent: bool,
    provenance: &Provenance,
) -> Vec<SynthMethod> {
    let field = info.name.as_str();
    let singular = spec.singular_name.as_str();
    let accs = accumulators(field, spec);
    let public = Modifiers::of_access(AccessLevel::Public);
    let returns = if fluent {
        builder_type.clone()
    } else {
        TypeRef::Primitive(Primitive::Void)
    };
    let method = |name: String, mut lines: Vec<String>| {
        if fluent {
            lines.push("return this;".to_owned());
        }
        SynthMethod::new(
            name,
            Some(returns.clone()),
            public.clone(),
            Body::Statements(lines),
            provenance.clone(),
        )
        .from_field(&info.source_name)
    };

    let mut add_one = init_lines(&accs);
    let add_one_method = match spec.elements.as_slice() {
        [key, value] if spec.is_map() => {
            let (key_param, value_param) = (format!("{singular}Key"), format!("{singular}Value"));
            add_one.push(format!("this.{field}$key.add({key_param});"));
            add_one.push(format!("this.{field}$value.add({value_param});"));
            method(prefixed(setter_prefix, singular), add_one)
                .with_param(key_param, key.clone())
                .with_param(value_param, value.clone())
        }
        elements => {
            add_one.push(format!("this.{field}.add({singular});"));
            method(prefixed(setter_prefix, singular), add_one)
                .with_param(singular, first_element(elements))
        }
    };

    let mut add_all = vec![if spec.ignore_null {
        let exit = if fluent { "return this;" } else { "return;" };
        format!("if ({field} == null) {exit}")
    } else {
        format!(
            "if ({field} == null) throw new java.lang.NullPointerException(\"{field} cannot be null\");"
        )
    }];
    add_all.extend(init_lines(&accs));
    let all_type = match spec.elements.as_slice() {
        [key, value] if spec.is_map() => {
            let entry = format!("java.util.Map.Entry<{}, {}>", extends(key), extends(value));
            add_all.push(format!("for (final {entry} $entry : {field}.entrySet()) {{"));
            add_all.push(format!("  this.{field}$key.add($entry.getKey());"));
            add_all.push(format!("  this.{field}$value.add($entry.getValue());"));
            add_all.push("}".to_owned());
            TypeRef::generic("java.util.Map", vec![extends(key), extends(value)])
        }
        elements => {
            let element = first_element(elements);
            add_all.push(format!("for (final {element} $element : {field}) {{"));
            add_all.push(format!("  this.{field}.add($element);"));
            add_all.push("}".to_owned());
            TypeRef::generic(ITERABLE, vec![element])
        }
    };
    let add_all_method = method(prefixed(setter_prefix, field), add_all).with_param(field, all_type);

    let clear: Vec<String> = accs
        .iter()
        .map(|(name, _)| format!("if (this.{name} != null) this.{name}.clear();"))
        .collect();
    let clear_method = method(format!("clear{}", capitalize(field)), clear);

    vec![add_one_method, add_all_method, clear_method]
}

fn first_element(elements: &[TypeRef]) -> TypeRef {
    elements
        .first()
        .cloned()
        .unwrap_or_else(|| TypeRef::class("java.lang.Object"))
}

fn zipped_map(keys: &str, values: &str, factory: &str) -> String {
    format!(
        "java.util.stream.IntStream.range(0, {keys}.size()).boxed().collect(java.util.stream.Collectors.toMap({keys}::get, {values}::get, (a, b) -> b, {factory}::new))"
    )
}

/// Build-time conversion of the accumulator(s) into the declared type.
#[must_use]
pub fn materialization(info: &BuilderInfo, spec: &SingularSpec) -> Materialization {
    let field = &info.name;
    let container = spec.container;
    let elements: Vec<String> = spec.elements.iter().map(ToString::to_string).collect();
    let generics = elements.join(", ");

    if container.is_map() {
        let (keys, values) = (format!("this.{field}$key"), format!("this.{field}$value"));
        let first = format!("{keys}.get(0), {values}.get(0)");
        let (empty, singleton, copy) = match container.guava_type() {
            Some(guava) => {
                let factory = if container == Container::ImmutableSortedMap {
                    format!("java.util.TreeMap<{generics}>")
                } else {
                    format!("java.util.LinkedHashMap<{generics}>")
                };
                (
                    format!("{GUAVA}.{guava}.of()"),
                    format!("{GUAVA}.{guava}.of({first})"),
                    format!("{GUAVA}.{guava}.copyOf({})", zipped_map(&keys, &values, &factory)),
                )
            }
            None if container == Container::Map => (
                format!("{COLLECTIONS}.emptyMap()"),
                format!("{COLLECTIONS}.singletonMap({first})"),
                format!(
                    "{COLLECTIONS}.unmodifiableMap({})",
                    zipped_map(&keys, &values, &format!("java.util.LinkedHashMap<{generics}>"))
                ),
            ),
            None => {
                let wrap = if container == Container::NavigableMap {
                    "unmodifiableNavigableMap"
                } else {
                    "unmodifiableSortedMap"
                };
                let tree = format!("java.util.TreeMap<{generics}>");
                (
                    format!("{COLLECTIONS}.{wrap}(new {tree}())"),
                    format!("{COLLECTIONS}.{wrap}(new {tree}({COLLECTIONS}.singletonMap({first})))"),
                    format!("{COLLECTIONS}.{wrap}({})", zipped_map(&keys, &values, &tree)),
                )
            }
        };
        return Materialization {
            accumulator: keys,
            empty,
            singleton,
            copy,
        };
    }

    let acc = format!("this.{field}");
    let first = format!("{acc}.get(0)");
    let (empty, singleton, copy) = match container {
        Container::List | Container::Collection | Container::Iterable => (
            format!("{COLLECTIONS}.emptyList()"),
            format!("{COLLECTIONS}.singletonList({first})"),
            format!("{COLLECTIONS}.unmodifiableList(new {ARRAY_LIST}<{generics}>({acc}))"),
        ),
        Container::Set => (
            format!("{COLLECTIONS}.emptySet()"),
            format!("{COLLECTIONS}.singleton({first})"),
            format!("{COLLECTIONS}.unmodifiableSet(new java.util.LinkedHashSet<{generics}>({acc}))"),
        ),
        Container::SortedSet | Container::NavigableSet => {
            let wrap = if container == Container::NavigableSet {
                "unmodifiableNavigableSet"
            } else {
                "unmodifiableSortedSet"
            };
            let tree = format!("java.util.TreeSet<{generics}>");
            (
                format!("{COLLECTIONS}.{wrap}(new {tree}())"),
                format!("{COLLECTIONS}.{wrap}(new {tree}({COLLECTIONS}.singletonList({first})))"),
                format!("{COLLECTIONS}.{wrap}(new {tree}({acc}))"),
            )
        }
        _ => {
            let guava = container.guava_type().unwrap_or("ImmutableList");
            (
                format!("{GUAVA}.{guava}.of()"),
                format!("{GUAVA}.{guava}.of({first})"),
                format!("{GUAVA}.{guava}.copyOf({acc})"),
            )
        }
    };
    Materialization {
        accumulator: acc,
        empty,
        singleton,
        copy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MaterializeArm, Stereotype};
    use rstest::rstest;

    fn sink() -> ProblemSink {
        ProblemSink::new(Stereotype::Singular, "a.Post#tags")
    }

    fn parse(text: &str) -> TypeRef {
        TypeRef::parse(text).unwrap_or_else(|err| panic!("{err}"))
    }

    #[rstest]
    #[case("java.util.List<String>", Some(Container::List))]
    #[case("Iterable<String>", Some(Container::Iterable))]
    #[case("com.google.common.collect.ImmutableBiMap<String, Integer>", Some(Container::ImmutableBiMap))]
    #[case("java.util.ArrayList<String>", None)]
    #[case("org.acme.List<String>", None)]
    fn recognises_supported_containers(#[case] ty: &str, #[case] expected: Option<Container>) {
        assert_eq!(Container::recognize(&parse(ty)), expected);
    }

    #[rstest]
    #[case("tags", None, true, "tag")]
    #[case("people", None, true, "person")]
    #[case("tags", Some("label"), true, "label")]
    #[case("tags", None, false, "tags")]
    #[case("data", None, true, "data")]
    fn singular_names(
        #[case] name: &str,
        #[case] explicit: Option<&str>,
        #[case] auto: bool,
        #[case] expected: &str,
    ) {
        let mut marker = AnnotationUsage::new("Singular");
        if let Some(value) = explicit {
            marker = marker.with_str("value", value);
        }
        let mut sink = sink();
        let strategy = select_strategy(name, &parse("java.util.List<String>"), Some(&marker), auto, &mut sink);
        assert_eq!(
            strategy.singular().map(|s| s.singular_name.as_str()),
            Some(expected)
        );
        assert!(sink.problems().is_empty());
    }

    #[rstest]
    #[case("java.util.ArrayList<String>")]
    #[case("java.util.List")]
    #[case("java.util.Map<String>")]
    fn unsupported_shapes_fall_back_with_a_warning(#[case] ty: &str) {
        let mut sink = sink();
        let marker = AnnotationUsage::new("Singular");
        let strategy = select_strategy("tags", &parse(ty), Some(&marker), true, &mut sink);
        assert_eq!(strategy, AccumulationStrategy::Plain);
        assert_eq!(sink.problems().len(), 1);
        assert!(!sink.has_errors());
    }

    fn info(name: &str, text: &str) -> (BuilderInfo, SingularSpec) {
        let ty = parse(text);
        let marker = AnnotationUsage::new("Singular");
        let strategy = select_strategy(name, &ty, Some(&marker), true, &mut sink());
        let Some(spec) = strategy.singular().cloned() else {
            panic!("expected a singular strategy");
        };
        (BuilderInfo::plain(name, ty), spec)
    }

    #[test]
    fn list_mutators_have_the_expected_shapes() {
        let (info, spec) = info("tags", "java.util.List<String>");
        let builder = TypeRef::class("PostBuilder");
        let origin = Provenance::new(Stereotype::Builder, "a.Post");
        let methods = mutators(&info, &spec, &builder, "", true, &origin);
        let shapes: Vec<String> = methods
            .iter()
            .map(|m| {
                let params: Vec<String> = m.params.iter().map(|p| p.ty.to_string()).collect();
                format!("{}({})", m.name, params.join(", "))
            })
            .collect();
        assert_eq!(
            shapes,
            [
                "tag(String)",
                "tags(java.lang.Iterable<String>)",
                "clearTags()"
            ]
        );
    }

    #[test]
    fn map_mutators_take_key_and_value() {
        let (info, spec) = info("scores", "java.util.Map<String, Integer>");
        let origin = Provenance::new(Stereotype::Builder, "a.Game");
        let methods = mutators(&info, &spec, &TypeRef::class("GameBuilder"), "with", true, &origin);
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["withScore", "withScores", "clearScores"]);
        let fields = accumulator_fields(&info, &spec, &origin);
        let field_names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(field_names, ["scores$key", "scores$value"]);
    }

    #[test]
    fn ignore_null_collections_skips_instead_of_throwing() {
        let ty = parse("java.util.Set<String>");
        let marker = AnnotationUsage::new("Singular").with_bool("ignoreNullCollections", true);
        let strategy = select_strategy("names", &ty, Some(&marker), true, &mut sink());
        let Some(spec) = strategy.singular() else {
            panic!("expected a singular strategy");
        };
        let info = BuilderInfo::plain("names", ty.clone());
        let origin = Provenance::new(Stereotype::Builder, "a.Team");
        let methods = mutators(&info, spec, &TypeRef::class("TeamBuilder"), "", true, &origin);
        let add_all = methods.get(1).map(|m| m.body.to_string()).unwrap_or_default();
        assert!(add_all.starts_with("if (names == null) return this;"), "{add_all}");
    }

    #[test]
    fn bulk_add_iterates_any_iterable() {
        let (info, spec) = info("tags", "java.util.List<String>");
        let origin = Provenance::new(Stereotype::Builder, "a.Post");
        let methods = mutators(&info, &spec, &TypeRef::class("PostBuilder"), "", true, &origin);
        let add_all = methods.get(1).map(|m| m.body.to_string()).unwrap_or_default();
        assert!(add_all.contains("for (final String $element : tags) {"), "{add_all}");
        assert!(add_all.contains("this.tags.add($element);"), "{add_all}");
        assert!(!add_all.contains("addAll"), "{add_all}");
    }

    #[test]
    fn non_fluent_mutators_return_void() {
        let ty = parse("java.util.Set<String>");
        let marker = AnnotationUsage::new("Singular").with_bool("ignoreNullCollections", true);
        let strategy = select_strategy("names", &ty, Some(&marker), true, &mut sink());
        let Some(spec) = strategy.singular() else {
            panic!("expected a singular strategy");
        };
        let info = BuilderInfo::plain("names", ty.clone());
        let origin = Provenance::new(Stereotype::Builder, "a.Team");
        let methods = mutators(&info, spec, &TypeRef::class("TeamBuilder"), "", false, &origin);
        let void = TypeRef::Primitive(Primitive::Void);
        assert!(methods.iter().all(|m| m.return_type.as_ref() == Some(&void)));
        let bodies: Vec<String> = methods.iter().map(|m| m.body.to_string()).collect();
        assert!(bodies.iter().all(|b| !b.contains("return this;")), "{bodies:?}");
        assert!(
            bodies.get(1).is_some_and(|b| b.starts_with("if (names == null) return;")),
            "{bodies:?}"
        );
    }

    #[rstest]
    #[case("java.util.List<String>", "java.util.Collections.emptyList()")]
    #[case("java.util.SortedSet<String>", "java.util.Collections.unmodifiableSortedSet(new java.util.TreeSet<String>())")]
    #[case("java.util.Map<String, Integer>", "java.util.Collections.emptyMap()")]
    #[case("com.google.common.collect.ImmutableCollection<String>", "com.google.common.collect.ImmutableList.of()")]
    fn empty_arm_per_family(#[case] ty: &str, #[case] expected: &str) {
        let (info, spec) = info("items", ty);
        assert_eq!(materialization(&info, &spec).expr(MaterializeArm::Empty), expected);
    }

    #[test]
    fn map_copy_keeps_insertion_order() {
        let (info, spec) = info("scores", "java.util.Map<String, Integer>");
        let m = materialization(&info, &spec);
        assert_eq!(m.accumulator, "this.scores$key");
        assert!(m.copy.contains("java.util.LinkedHashMap<String, Integer>::new"), "{}", m.copy);
        assert!(m.copy.contains("(a, b) -> b"));
    }
}
