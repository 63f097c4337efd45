//! Shared helpers for working with `figment::Jail` in tests.
//!
//! The jail gives each test its own working directory and environment, so
//! configuration files and `MEMBER_SYNTH_` variables never leak between
//! tests.

use std::path::Path;

use anyhow::{Result, anyhow};
use member_synth::{LayeredConfig, SynthResult};

/// File name used for configuration written into a jail.
pub const CONFIG_FILE: &str = "member-synth.toml";

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail).map_err(|err| figment::Error::from(err.to_string()))?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Writes `toml` to [`CONFIG_FILE`] in the jail and loads every layer.
///
/// # Errors
///
/// Returns an error if the file cannot be written or a layer fails to
/// parse.
pub fn load_config(jail: &mut figment::Jail, toml: &str) -> Result<LayeredConfig> {
    jail.create_file(CONFIG_FILE, toml)
        .map_err(|err| anyhow!(err.to_string()))?;
    to_anyhow(LayeredConfig::load(Some(Path::new(CONFIG_FILE))))
}

/// Converts an engine result into an `anyhow` result.
///
/// # Errors
///
/// Returns the engine error, stringified.
pub fn to_anyhow<T>(result: SynthResult<T>) -> Result<T> {
    result.map_err(|err| anyhow!(err.to_string()))
}
