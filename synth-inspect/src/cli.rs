//! Command-line interface definitions for `synth-inspect`.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use member_synth::model::MemberKind;

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per member or problem.
    Text,
    /// The full report as pretty-printed JSON.
    Json,
}

/// Member kinds selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Fields only.
    Field,
    /// Methods and constructors only.
    Method,
    /// Nested types only.
    NestedType,
}

impl KindArg {
    /// Engine member kind.
    #[must_use]
    pub const fn member_kind(self) -> MemberKind {
        match self {
            Self::Field => MemberKind::Field,
            Self::Method => MemberKind::Method,
            Self::NestedType => MemberKind::NestedType,
        }
    }
}

/// Parsed CLI arguments for `synth-inspect`.
#[derive(Debug, Parser)]
#[command(name = "synth-inspect")]
#[command(about = "Show the members stereotype annotations synthesize for a snapshot")]
#[command(version)]
pub struct Args {
    /// JSON snapshot of declared types (and optional placeholder uses).
    #[arg(value_name = "path")]
    pub snapshot: Utf8PathBuf,
    /// TOML configuration layered over the defaults.
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Qualified type to inspect (repeat for several); defaults to all.
    #[arg(long = "type", value_name = "qualified.Name")]
    pub types: Vec<String>,
    /// Restrict output to one member kind.
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Exit with an error when any problem is an error.
    #[arg(long = "deny-errors")]
    pub should_deny_errors: bool,
}
