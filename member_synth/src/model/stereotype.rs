//! The closed set of stereotype annotations the engine understands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logging framework selected by a logger stereotype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFlavor {
    /// `@Slf4j`
    Slf4j,
    /// `@XSlf4j`
    XSlf4j,
    /// `@Log` (java.util.logging)
    Jul,
    /// `@Log4j`
    Log4j,
    /// `@Log4j2`
    Log4j2,
    /// `@CommonsLog`
    CommonsLog,
    /// `@JBossLog`
    JBossLog,
    /// `@Flogger`
    Flogger,
}

impl LogFlavor {
    /// Every supported flavour.
    pub const ALL: [Self; 8] = [
        Self::Slf4j,
        Self::XSlf4j,
        Self::Jul,
        Self::Log4j,
        Self::Log4j2,
        Self::CommonsLog,
        Self::JBossLog,
        Self::Flogger,
    ];

    /// Qualified logger type.
    #[must_use]
    pub const fn logger_type(self) -> &'static str {
        match self {
            Self::Slf4j => "org.slf4j.Logger",
            Self::XSlf4j => "org.slf4j.ext.XLogger",
            Self::Jul => "java.util.logging.Logger",
            Self::Log4j => "org.apache.log4j.Logger",
            Self::Log4j2 => "org.apache.logging.log4j.Logger",
            Self::CommonsLog => "org.apache.commons.logging.Log",
            Self::JBossLog => "org.jboss.logging.Logger",
            Self::Flogger => "com.google.common.flogger.FluentLogger",
        }
    }

    /// Factory call creating the logger; `{}` is replaced by the argument.
    #[must_use]
    pub const fn factory(self) -> &'static str {
        match self {
            Self::Slf4j => "org.slf4j.LoggerFactory.getLogger({})",
            Self::XSlf4j => "org.slf4j.ext.XLoggerFactory.getXLogger({})",
            Self::Jul => "java.util.logging.Logger.getLogger({})",
            Self::Log4j => "org.apache.log4j.Logger.getLogger({})",
            Self::Log4j2 => "org.apache.logging.log4j.LogManager.getLogger({})",
            Self::CommonsLog => "org.apache.commons.logging.LogFactory.getLog({})",
            Self::JBossLog => "org.jboss.logging.Logger.getLogger({})",
            Self::Flogger => "com.google.common.flogger.FluentLogger.forEnclosingClass()",
        }
    }

    /// Whether the factory accepts a `topic` argument.
    #[must_use]
    pub const fn supports_topic(self) -> bool {
        !matches!(self, Self::Flogger)
    }

    /// `java.util.logging` wants the class name string rather than the class.
    #[must_use]
    pub const fn wants_class_name(self) -> bool {
        matches!(self, Self::Jul)
    }
}

/// A stereotype annotation recognised by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stereotype {
    /// `@Getter`
    Getter,
    /// `@Setter`
    Setter,
    /// `@With`
    With,
    /// `@Accessors`
    Accessors,
    /// `@ToString`
    ToString,
    /// `@ToString.Include`
    ToStringInclude,
    /// `@ToString.Exclude`
    ToStringExclude,
    /// `@EqualsAndHashCode`
    EqualsAndHashCode,
    /// `@EqualsAndHashCode.Include`
    EqualsInclude,
    /// `@EqualsAndHashCode.Exclude`
    EqualsExclude,
    /// `@NoArgsConstructor`
    NoArgsConstructor,
    /// `@RequiredArgsConstructor`
    RequiredArgsConstructor,
    /// `@AllArgsConstructor`
    AllArgsConstructor,
    /// `@Data`
    Data,
    /// `@Value`
    Value,
    /// `@Builder`
    Builder,
    /// `@Builder.Default`
    BuilderDefault,
    /// `@Singular`
    Singular,
    /// `@NonNull`
    NonNull,
    /// `@FieldDefaults`
    FieldDefaults,
    /// `@NonFinal`
    NonFinal,
    /// `@PackagePrivate`
    PackagePrivate,
    /// `@UtilityClass`
    UtilityClass,
    /// `@FieldNameConstants`
    FieldNameConstants,
    /// `@FieldNameConstants.Include`
    FieldNameConstantsInclude,
    /// `@FieldNameConstants.Exclude`
    FieldNameConstantsExclude,
    /// One of the logger stereotypes.
    Log(LogFlavor),
    /// `val` local type placeholder.
    Val,
    /// `var` local type placeholder.
    Var,
}

const NAMED: &[(&str, Stereotype)] = &[
    ("Getter", Stereotype::Getter),
    ("Setter", Stereotype::Setter),
    ("With", Stereotype::With),
    ("Accessors", Stereotype::Accessors),
    ("ToString", Stereotype::ToString),
    ("ToString.Include", Stereotype::ToStringInclude),
    ("ToString.Exclude", Stereotype::ToStringExclude),
    ("EqualsAndHashCode", Stereotype::EqualsAndHashCode),
    ("EqualsAndHashCode.Include", Stereotype::EqualsInclude),
    ("EqualsAndHashCode.Exclude", Stereotype::EqualsExclude),
    ("NoArgsConstructor", Stereotype::NoArgsConstructor),
    ("RequiredArgsConstructor", Stereotype::RequiredArgsConstructor),
    ("AllArgsConstructor", Stereotype::AllArgsConstructor),
    ("Data", Stereotype::Data),
    ("Value", Stereotype::Value),
    ("Builder", Stereotype::Builder),
    ("Builder.Default", Stereotype::BuilderDefault),
    ("Singular", Stereotype::Singular),
    ("NonNull", Stereotype::NonNull),
    ("FieldDefaults", Stereotype::FieldDefaults),
    ("NonFinal", Stereotype::NonFinal),
    ("PackagePrivate", Stereotype::PackagePrivate),
    ("UtilityClass", Stereotype::UtilityClass),
    ("FieldNameConstants", Stereotype::FieldNameConstants),
    ("FieldNameConstants.Include", Stereotype::FieldNameConstantsInclude),
    ("FieldNameConstants.Exclude", Stereotype::FieldNameConstantsExclude),
    ("Slf4j", Stereotype::Log(LogFlavor::Slf4j)),
    ("XSlf4j", Stereotype::Log(LogFlavor::XSlf4j)),
    ("Log", Stereotype::Log(LogFlavor::Jul)),
    ("Log4j", Stereotype::Log(LogFlavor::Log4j)),
    ("Log4j2", Stereotype::Log(LogFlavor::Log4j2)),
    ("CommonsLog", Stereotype::Log(LogFlavor::CommonsLog)),
    ("JBossLog", Stereotype::Log(LogFlavor::JBossLog)),
    ("Flogger", Stereotype::Log(LogFlavor::Flogger)),
    ("val", Stereotype::Val),
    ("var", Stereotype::Var),
];

impl Stereotype {
    /// Recognises an annotation name, simple or qualified.
    ///
    /// Nested marker annotations keep their outer type, so both
    /// `Builder.Default` and `lombok.Builder.Default` resolve to
    /// [`Self::BuilderDefault`], while a bare `Default` does not.
    ///
    /// ```
    /// use member_synth::model::Stereotype;
    ///
    /// assert_eq!(Stereotype::from_name("lombok.Getter"), Some(Stereotype::Getter));
    /// assert_eq!(
    ///     Stereotype::from_name("Builder.Default"),
    ///     Some(Stereotype::BuilderDefault)
    /// );
    /// assert_eq!(Stereotype::from_name("Default"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let mut segments = name.trim().rsplit('.');
        let last = segments.next()?;
        let nested = segments
            .next()
            .filter(|outer| outer.starts_with(char::is_uppercase))
            .map(|outer| format!("{outer}.{last}"));
        let key = nested.as_deref().unwrap_or(last);
        NAMED
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, stereotype)| *stereotype)
    }

    /// Simple annotation name without the `@`.
    #[must_use]
    pub fn name(self) -> &'static str {
        NAMED
            .iter()
            .find(|(_, stereotype)| *stereotype == self)
            .map_or("?", |(name, _)| name)
    }

    /// Configuration key segment used by `flag_usage`.
    #[must_use]
    pub fn config_name(self) -> String {
        heck::ToSnakeCase::to_snake_case(self.name().replace('.', "_").as_str())
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Getter", Some(Stereotype::Getter))]
    #[case("lombok.experimental.UtilityClass", Some(Stereotype::UtilityClass))]
    #[case("lombok.extern.slf4j.Slf4j", Some(Stereotype::Log(LogFlavor::Slf4j)))]
    #[case("EqualsAndHashCode.Exclude", Some(Stereotype::EqualsExclude))]
    #[case("lombok.Builder.Default", Some(Stereotype::BuilderDefault))]
    #[case("javax.annotation.Nonnull", None)]
    #[case("lombok.val", Some(Stereotype::Val))]
    #[case("", None)]
    fn recognises_names(#[case] name: &str, #[case] expected: Option<Stereotype>) {
        assert_eq!(Stereotype::from_name(name), expected);
    }

    #[rstest]
    #[case(Stereotype::EqualsAndHashCode, "equals_and_hash_code")]
    #[case(Stereotype::BuilderDefault, "builder_default")]
    #[case(Stereotype::Log(LogFlavor::Slf4j), "slf4j")]
    fn config_names_are_snake_case(#[case] stereotype: Stereotype, #[case] expected: &str) {
        assert_eq!(stereotype.config_name(), expected);
    }
}
