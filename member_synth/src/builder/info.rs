//! One builder entry: a field or parameter the builder collects.

use crate::model::{
    AccessLevel, BuildArg, BuildSource, DeclaredField, Modifiers, Param, Primitive, Provenance,
    Stereotype, SynthField, ToStringPart, TypeRef,
};
use crate::naming::{PrefixPolicy, decapitalize};
use crate::problem::ProblemSink;

use super::singular::{accumulator_fields, materialization, select_strategy};
use super::strategy::AccumulationStrategy;

/// A value the builder collects and passes on at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderInfo {
    /// Builder-visible name, after prefix stripping.
    pub name: String,
    /// Field or parameter the value ends up in.
    pub source_name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// `@Builder.Default` initializer.
    pub default_initializer: Option<String>,
    /// Setter rejects `null`.
    pub non_null: bool,
    /// How values accumulate.
    pub strategy: AccumulationStrategy,
}

impl BuilderInfo {
    /// A plain entry named after its source.
    #[must_use]
    pub fn plain(name: impl Into<String>, ty: TypeRef) -> Self {
        let owned: String = name.into();
        Self {
            source_name: owned.clone(),
            name: owned,
            ty,
            default_initializer: None,
            non_null: false,
            strategy: AccumulationStrategy::Plain,
        }
    }

    /// Entry for a field of a type-level builder.
    ///
    /// A `@Builder.Default` without an initializer is reported by the
    /// marker processor; here the field is simply treated as plain.
    pub fn from_field(
        field: &DeclaredField,
        prefix: &PrefixPolicy,
        singular_auto: bool,
        sink: &mut ProblemSink,
    ) -> Self {
        let name = decapitalize(&prefix.lenient_base_name(&field.name));
        let default_initializer = field
            .has_annotation(Stereotype::BuilderDefault)
            .then(|| field.initializer.clone())
            .flatten();
        let strategy = if default_initializer.is_some() {
            AccumulationStrategy::Plain
        } else {
            select_strategy(
                &name,
                &field.ty,
                field.annotation(Stereotype::Singular),
                singular_auto,
                sink,
            )
        };
        Self {
            name,
            source_name: field.name.clone(),
            ty: field.ty.clone(),
            default_initializer,
            non_null: crate::handlers::needs_null_check(field),
            strategy,
        }
    }

    /// Entry for a parameter of a constructor- or method-level builder.
    pub fn from_param(param: &Param, singular_auto: bool, sink: &mut ProblemSink) -> Self {
        let strategy = select_strategy(
            &param.name,
            &param.ty,
            param.annotation(Stereotype::Singular),
            singular_auto,
            sink,
        );
        Self {
            non_null: param.annotation(Stereotype::NonNull).is_some() && !param.ty.is_primitive(),
            strategy,
            ..Self::plain(param.name.clone(), param.ty.clone())
        }
    }

    /// Whether `@Builder.Default` applies.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default_initializer.is_some()
    }

    /// Name of the static supplier holding the default initializer.
    #[must_use]
    pub fn default_supplier(&self) -> String {
        format!("$default${}", self.name)
    }

    /// Fields the builder needs for this entry.
    #[must_use]
    pub fn builder_fields(&self, provenance: &Provenance) -> Vec<SynthField> {
        let field = |name: String, ty: TypeRef| SynthField {
            name,
            ty,
            modifiers: Modifiers::of_access(AccessLevel::Private),
            initializer: None,
            provenance: provenance.clone(),
        };
        match &self.strategy {
            AccumulationStrategy::Singular(spec) => accumulator_fields(self, spec, provenance),
            AccumulationStrategy::Plain if self.has_default() => vec![
                field(format!("{}$value", self.name), self.ty.clone()),
                field(
                    format!("{}$set", self.name),
                    TypeRef::Primitive(Primitive::Boolean),
                ),
            ],
            AccumulationStrategy::Plain => vec![field(self.name.clone(), self.ty.clone())],
        }
    }

    /// How `build()` derives the argument; `owner` qualifies the supplier.
    #[must_use]
    pub fn build_arg(&self, owner: &str) -> BuildArg {
        let source = match &self.strategy {
            AccumulationStrategy::Singular(spec) => {
                BuildSource::Singular(materialization(self, spec))
            }
            AccumulationStrategy::Plain if self.has_default() => BuildSource::Default {
                value: format!("this.{}$value", self.name),
                set_flag: format!("this.{}$set", self.name),
                supplier: format!("{owner}.{}()", self.default_supplier()),
            },
            AccumulationStrategy::Plain => BuildSource::Field(format!("this.{}", self.name)),
        };
        BuildArg {
            name: self.name.clone(),
            ty: self.ty.to_string(),
            source,
        }
    }

    /// Segment printed by the builder's `toString`.
    #[must_use]
    pub fn to_string_part(&self) -> ToStringPart {
        let expr = match &self.strategy {
            AccumulationStrategy::Singular(spec) if spec.is_map() => {
                format!("this.{0}$key + \", {0}$value=\" + this.{0}$value", self.name)
            }
            AccumulationStrategy::Plain if self.has_default() => {
                format!("this.{}$value", self.name)
            }
            _ => format!("this.{}", self.name),
        };
        let (label, array) = match &self.strategy {
            AccumulationStrategy::Singular(spec) if spec.is_map() => {
                (format!("{}$key", self.name), None)
            }
            AccumulationStrategy::Plain if self.has_default() => {
                (format!("{}$value", self.name), None)
            }
            _ => (
                self.name.clone(),
                self.ty
                    .is_array()
                    .then(|| crate::handlers::value_kind(&self.ty)),
            ),
        };
        ToStringPart {
            label: Some(label),
            expr,
            array,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationUsage, MaterializeArm};

    fn sink() -> ProblemSink {
        ProblemSink::new(Stereotype::Builder, "a.Job")
    }

    #[test]
    fn prefix_is_stripped_from_the_builder_name() {
        let field = DeclaredField::new("mName", TypeRef::class("String"));
        let info = BuilderInfo::from_field(&field, &PrefixPolicy::new(["m"]), true, &mut sink());
        assert_eq!(info.name, "name");
        assert_eq!(info.source_name, "mName");
    }

    #[test]
    fn default_fields_use_value_and_set_flag() {
        let field = DeclaredField::new("retries", TypeRef::Primitive(Primitive::Int))
            .with_initializer("3")
            .annotated(AnnotationUsage::new("Builder.Default"));
        let info = BuilderInfo::from_field(&field, &PrefixPolicy::default(), true, &mut sink());
        let origin = Provenance::new(Stereotype::Builder, "a.Job");
        let names: Vec<String> = info
            .builder_fields(&origin)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["retries$value", "retries$set"]);
        assert_eq!(
            info.build_arg("Job").source,
            BuildSource::Default {
                value: "this.retries$value".to_owned(),
                set_flag: "this.retries$set".to_owned(),
                supplier: "Job.$default$retries()".to_owned(),
            }
        );
    }

    #[test]
    fn default_without_initializer_is_plain() {
        let field = DeclaredField::new("retries", TypeRef::Primitive(Primitive::Int))
            .annotated(AnnotationUsage::new("Builder.Default"));
        let info = BuilderInfo::from_field(&field, &PrefixPolicy::default(), true, &mut sink());
        assert!(!info.has_default());
        assert_eq!(
            info.build_arg("Job").source,
            BuildSource::Field("this.retries".to_owned())
        );
    }

    #[test]
    fn singular_parameter_materializes_three_ways() {
        let param = Param::new(
            "tags",
            TypeRef::generic("java.util.List", vec![TypeRef::class("String")]),
        )
        .annotated(AnnotationUsage::new("Singular"));
        let info = BuilderInfo::from_param(&param, true, &mut sink());
        let BuildSource::Singular(m) = info.build_arg("Post").source else {
            panic!("expected a singular build source");
        };
        assert_eq!(m.expr(MaterializeArm::Empty), "java.util.Collections.emptyList()");
        assert_eq!(
            m.expr(MaterializeArm::Singleton),
            "java.util.Collections.singletonList(this.tags.get(0))"
        );
    }
}
