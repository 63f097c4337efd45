//! Error types for `synth-inspect`.

use camino::Utf8PathBuf;
use member_synth::SynthError;
use thiserror::Error;

/// Errors surfaced by the `synth-inspect` pipeline.
#[derive(Debug, Error)]
pub enum InspectError {
    /// An input file could not be opened or read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File being read.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for a snapshot document.
    #[error("failed to parse snapshot {path}: {source}")]
    Snapshot {
        /// Snapshot file.
        path: Utf8PathBuf,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },

    /// The report could not be encoded as JSON.
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    /// Configuration loading or augmentation failed.
    #[error(transparent)]
    Synth(#[from] SynthError),

    /// A `--type` selection names a type the snapshot lacks.
    #[error("type '{0}' is not in the snapshot")]
    UnknownType(String),

    /// `--deny-errors` was given and error problems were reported.
    #[error("{0} error problem(s) reported")]
    ProblemsFound(usize),

    /// Writing the report to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}
