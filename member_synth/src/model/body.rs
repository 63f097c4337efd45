//! Semantic body templates for synthesized methods.
//!
//! A body is never executed. It describes what the generated member does in
//! source-like pseudo code so the host can show it (hover, navigation
//! previews) and tests can assert on the behaviour without a compiler.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Primitive;

/// How a field value takes part in equality and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// A primitive compared by value.
    Primitive(Primitive),
    /// An array; `deep` when the component type is itself an object.
    Array {
        /// Use the deep comparison helpers.
        deep: bool,
    },
    /// A reference compared with `equals`.
    Reference,
}

/// One field as seen by `equals`/`hashCode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldComparison {
    /// Field name.
    pub name: String,
    /// Accessor expression on `this`, e.g. `this.name` or `this.getName()`.
    pub this_access: String,
    /// Accessor expression on the other instance.
    pub other_access: String,
    /// Comparison shape.
    pub kind: ValueKind,
}

/// One segment of a generated `toString`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToStringPart {
    /// Label printed before `=`, absent when field names are suppressed.
    pub label: Option<String>,
    /// Value expression.
    pub expr: String,
    /// Arrays are rendered with `java.util.Arrays`.
    pub array: Option<ValueKind>,
}

/// Which of the three immutable shapes a build step produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterializeArm {
    /// Nothing accumulated.
    Empty,
    /// Exactly one element accumulated.
    Singleton,
    /// Two or more elements accumulated.
    Copy,
}

impl MaterializeArm {
    /// Selects the arm for an accumulated element count.
    #[must_use]
    pub const fn for_len(len: usize) -> Self {
        match len {
            0 => Self::Empty,
            1 => Self::Singleton,
            _ => Self::Copy,
        }
    }
}

/// Build-time conversion of a singular accumulator into the target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Materialization {
    /// Accumulator expression whose size selects the arm.
    pub accumulator: String,
    /// Expression for [`MaterializeArm::Empty`].
    pub empty: String,
    /// Expression for [`MaterializeArm::Singleton`].
    pub singleton: String,
    /// Expression for [`MaterializeArm::Copy`].
    pub copy: String,
}

impl Materialization {
    /// Expression for the given arm.
    #[must_use]
    pub fn expr(&self, arm: MaterializeArm) -> &str {
        match arm {
            MaterializeArm::Empty => &self.empty,
            MaterializeArm::Singleton => &self.singleton,
            MaterializeArm::Copy => &self.copy,
        }
    }
}

/// How `build()` obtains one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildSource {
    /// Read the builder field as is.
    Field(String),
    /// Builder default: use the value if set, else the supplier.
    Default {
        /// `name$value` field.
        value: String,
        /// `name$set` flag.
        set_flag: String,
        /// Supplier call, e.g. `Foo.$default$name()`.
        supplier: String,
    },
    /// Singular accumulator materialized three ways.
    Singular(Materialization),
}

/// One local computed before the build call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArg {
    /// Local/argument name.
    pub name: String,
    /// Declared type of the local.
    pub ty: String,
    /// How the value is derived.
    pub source: BuildSource,
}

/// Body template of a synthesized method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    /// `return <expr>;`
    Return(String),
    /// Cached lazy getter over an atomic holder.
    LazyGetter {
        /// Holder field.
        field: String,
        /// Initializer evaluated once.
        initializer: String,
    },
    /// Assignment, optionally guarded and returning `this`.
    Assign {
        /// Target expression.
        target: String,
        /// Assigned value.
        value: String,
        /// Parameter requiring a null check.
        null_check: Option<String>,
        /// Whether the method returns `this`.
        returns_this: bool,
    },
    /// `return this.f == f ? this : new T(...);`
    Wither {
        /// Field being replaced.
        field: String,
        /// Constructed type.
        type_expr: String,
        /// Constructor arguments.
        args: Vec<String>,
        /// Parameter requiring a null check.
        null_check: Option<String>,
    },
    /// Constructor assignments.
    Constructor {
        /// Parameters checked against null first.
        null_checks: Vec<String>,
        /// `(field, value)` assignments in order.
        assignments: Vec<(String, String)>,
    },
    /// `throw new <exception>("<message>");`
    Throw {
        /// Exception type.
        exception: String,
        /// Message text.
        message: String,
    },
    /// Abstract method without a body.
    Abstract,
    /// Generated `equals(Object)`.
    Equals {
        /// Type tested with `instanceof`.
        type_name: String,
        /// Call `super.equals` first.
        call_super: bool,
        /// Consult `canEqual`.
        can_equal: bool,
        /// Compared fields.
        fields: Vec<FieldComparison>,
    },
    /// Generated `hashCode()`.
    HashCode {
        /// Seed with `super.hashCode()`.
        call_super: bool,
        /// Hashed fields.
        fields: Vec<FieldComparison>,
    },
    /// Generated `toString()`.
    ToString {
        /// Leading type label.
        label: String,
        /// Include `super.toString()`.
        call_super: bool,
        /// Printed values.
        parts: Vec<ToStringPart>,
    },
    /// Straight-line statements (builder mutators).
    Statements(Vec<String>),
    /// Builder `build()`.
    Build {
        /// Locals computed first.
        args: Vec<BuildArg>,
        /// Final expression returned, e.g. `new Foo(a, b)`.
        result: String,
    },
}

const PRIME: u32 = 59;

fn hash_term(field: &FieldComparison) -> Vec<String> {
    let access = &field.this_access;
    let local = format!("${}", field.name);
    match field.kind {
        ValueKind::Primitive(Primitive::Boolean) => {
            vec![format!("result = result * PRIME + ({access} ? 79 : 97);")]
        }
        ValueKind::Primitive(Primitive::Long) => vec![
            format!("final long {local} = {access};"),
            format!("result = result * PRIME + (int) ({local} >>> 32 ^ {local});"),
        ],
        ValueKind::Primitive(Primitive::Float) => vec![format!(
            "result = result * PRIME + java.lang.Float.floatToIntBits({access});"
        )],
        ValueKind::Primitive(Primitive::Double) => vec![
            format!("final long {local} = java.lang.Double.doubleToLongBits({access});"),
            format!("result = result * PRIME + (int) ({local} >>> 32 ^ {local});"),
        ],
        ValueKind::Primitive(_) => vec![format!("result = result * PRIME + {access};")],
        ValueKind::Array { deep } => {
            let helper = if deep { "deepHashCode" } else { "hashCode" };
            vec![format!(
                "result = result * PRIME + java.util.Arrays.{helper}({access});"
            )]
        }
        ValueKind::Reference => vec![
            format!("final java.lang.Object {local} = {access};"),
            format!("result = result * PRIME + ({local} == null ? 43 : {local}.hashCode());"),
        ],
    }
}

fn equals_term(field: &FieldComparison) -> Vec<String> {
    let (this, other) = (&field.this_access, &field.other_access);
    match field.kind {
        ValueKind::Primitive(Primitive::Float) => vec![format!(
            "if (java.lang.Float.compare({this}, {other}) != 0) return false;"
        )],
        ValueKind::Primitive(Primitive::Double) => vec![format!(
            "if (java.lang.Double.compare({this}, {other}) != 0) return false;"
        )],
        ValueKind::Primitive(_) => vec![format!("if ({this} != {other}) return false;")],
        ValueKind::Array { deep } => {
            let helper = if deep { "deepEquals" } else { "equals" };
            vec![format!(
                "if (!java.util.Arrays.{helper}({this}, {other})) return false;"
            )]
        }
        ValueKind::Reference => {
            let this_local = format!("this${}", field.name);
            let other_local = format!("other${}", field.name);
            vec![
                format!("final java.lang.Object {this_local} = {this};"),
                format!("final java.lang.Object {other_local} = {other};"),
                format!(
                    "if ({this_local} == null ? {other_local} != null : !{this_local}.equals({other_local})) return false;"
                ),
            ]
        }
    }
}

impl Body {
    /// Renders the template as source-like lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Return(expr) => vec![format!("return {expr};")],
            Self::LazyGetter { field, initializer } => vec![
                format!("java.lang.Object value = this.{field}.get();"),
                "if (value == null) {".to_owned(),
                format!("  synchronized (this.{field}) {{"),
                format!("    value = this.{field}.get();"),
                "    if (value == null) {".to_owned(),
                format!("      value = {initializer};"),
                format!("      this.{field}.set(value);"),
                "    }".to_owned(),
                "  }".to_owned(),
                "}".to_owned(),
                "return value;".to_owned(),
            ],
            Self::Assign {
                target,
                value,
                null_check,
                returns_this,
            } => {
                let mut lines = null_check.iter().map(|p| null_guard(p)).collect::<Vec<_>>();
                lines.push(format!("{target} = {value};"));
                if *returns_this {
                    lines.push("return this;".to_owned());
                }
                lines
            }
            Self::Wither {
                field,
                type_expr,
                args,
                null_check,
            } => {
                let mut lines = null_check.iter().map(|p| null_guard(p)).collect::<Vec<_>>();
                lines.push(format!(
                    "return this.{field} == {field} ? this : new {type_expr}({});",
                    args.join(", ")
                ));
                lines
            }
            Self::Constructor {
                null_checks,
                assignments,
            } => null_checks
                .iter()
                .map(|p| null_guard(p))
                .chain(
                    assignments
                        .iter()
                        .map(|(field, value)| format!("this.{field} = {value};")),
                )
                .collect(),
            Self::Throw { exception, message } => {
                vec![format!("throw new {exception}(\"{message}\");")]
            }
            Self::Abstract => Vec::new(),
            Self::Equals {
                type_name,
                call_super,
                can_equal,
                fields,
            } => {
                let mut lines = vec![
                    "if (o == this) return true;".to_owned(),
                    format!("if (!(o instanceof {type_name})) return false;"),
                    format!("final {type_name} other = ({type_name}) o;"),
                ];
                if *can_equal {
                    lines.push(
                        "if (!other.canEqual((java.lang.Object) this)) return false;".to_owned(),
                    );
                }
                if *call_super {
                    lines.push("if (!super.equals(o)) return false;".to_owned());
                }
                lines.extend(fields.iter().flat_map(equals_term));
                lines.push("return true;".to_owned());
                lines
            }
            Self::HashCode { call_super, fields } => {
                let mut lines = vec![format!("final int PRIME = {PRIME};")];
                lines.push(if *call_super {
                    "int result = super.hashCode();".to_owned()
                } else {
                    "int result = 1;".to_owned()
                });
                lines.extend(fields.iter().flat_map(hash_term));
                lines.push("return result;".to_owned());
                lines
            }
            Self::ToString {
                label,
                call_super,
                parts,
            } => vec![render_to_string(label, *call_super, parts)],
            Self::Statements(lines) => lines.clone(),
            Self::Build { args, result } => {
                let mut lines = Vec::new();
                for arg in args {
                    lines.extend(render_build_arg(arg));
                }
                lines.push(format!("return {result};"));
                lines
            }
        }
    }
}

fn null_guard(param: &str) -> String {
    format!(
        "if ({param} == null) throw new java.lang.NullPointerException(\"{param} is marked non-null but is null\");"
    )
}

fn render_to_string(label: &str, call_super: bool, parts: &[ToStringPart]) -> String {
    let mut segments = Vec::new();
    if call_super {
        segments.push("\"super=\" + super.toString()".to_owned());
    }
    for part in parts {
        let value = match part.array {
            Some(ValueKind::Array { deep: true }) => {
                format!("java.util.Arrays.deepToString({})", part.expr)
            }
            Some(ValueKind::Array { deep: false }) => {
                format!("java.util.Arrays.toString({})", part.expr)
            }
            _ => part.expr.clone(),
        };
        segments.push(match &part.label {
            Some(label) => format!("\"{label}=\" + {value}"),
            None => value,
        });
    }
    if segments.is_empty() {
        return format!("return \"{label}()\";");
    }
    format!(
        "return \"{label}(\" + {} + \")\";",
        segments.join(" + \", \" + ")
    )
}

fn render_build_arg(arg: &BuildArg) -> Vec<String> {
    let BuildArg { name, ty, source } = arg;
    match source {
        BuildSource::Field(expr) => vec![format!("{ty} {name} = {expr};")],
        BuildSource::Default {
            value,
            set_flag,
            supplier,
        } => vec![
            format!("{ty} {name} = {value};"),
            format!("if (!{set_flag}) {name} = {supplier};"),
        ],
        BuildSource::Singular(m) => vec![
            format!("{ty} {name};"),
            format!(
                "switch ({acc} == null ? 0 : {acc}.size()) {{",
                acc = m.accumulator
            ),
            format!("case 0: {name} = {}; break;", m.empty),
            format!("case 1: {name} = {}; break;", m.singleton),
            format!("default: {name} = {};", m.copy),
            "}".to_owned(),
        ],
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}
