//! Snapshot documents read from disk.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use member_synth::model::DeclaredType;
use member_synth::{LayeredConfig, PlaceholderUse, SnapshotHost};
use serde::Deserialize;
use tracing::debug;

use crate::error::InspectError;

/// Everything `synth-inspect` reads from a snapshot file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapshotDocument {
    /// Declared types, nested types inline.
    pub types: Vec<DeclaredType>,
    /// `val`/`var` locals to infer.
    pub placeholders: Vec<PlaceholderUse>,
}

impl SnapshotDocument {
    /// Parses a document from JSON text; `path` names it in errors.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::Snapshot`] if the JSON does not describe a
    /// snapshot.
    pub fn from_json(path: &Utf8Path, text: &str) -> Result<Self, InspectError> {
        serde_json::from_str(text).map_err(|source| InspectError::Snapshot {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Host over the document's types with `config`.
    #[must_use]
    pub fn host(&self, config: LayeredConfig) -> SnapshotHost {
        SnapshotHost::from_types(self.types.iter().cloned()).with_config(config)
    }
}

/// Reads the UTF-8 file at `path`.
///
/// # Errors
///
/// Returns [`InspectError::Io`] if the file cannot be opened or read.
pub fn read_text(path: &Utf8Path) -> Result<String, InspectError> {
    let io_error = |source| InspectError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        io_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no file name",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    let text = dir.read_to_string(name).map_err(io_error)?;
    debug!(path = %path, bytes = text.len(), "read input");
    Ok(text)
}

/// Loads the snapshot at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_snapshot(path: &Utf8Path) -> Result<SnapshotDocument, InspectError> {
    SnapshotDocument::from_json(path, &read_text(path)?)
}

/// Loads configuration: defaults, then `path` if given, then environment.
///
/// # Errors
///
/// Returns [`InspectError::Synth`] if a layer fails to parse.
pub fn load_config(path: Option<&Utf8Path>) -> Result<LayeredConfig, InspectError> {
    Ok(LayeredConfig::load(path.map(Utf8Path::as_std_path))?)
}
