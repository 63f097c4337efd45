//! CLI entrypoint for `synth-inspect`.

use std::io::Write;

use clap::Parser;
use member_synth::Augmenter;
use synth_inspect::cli::{Args, KindArg, OutputFormat};
use synth_inspect::error::InspectError;
use synth_inspect::input;
use synth_inspect::report::{self, Report};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), InspectError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    run(&Args::parse())
}

fn run(args: &Args) -> Result<(), InspectError> {
    let document = input::load_snapshot(&args.snapshot)?;
    let config = input::load_config(args.config.as_deref())?;
    info!(
        snapshot = %args.snapshot,
        types = document.types.len(),
        placeholders = document.placeholders.len(),
        "loaded snapshot"
    );
    let augmenter = Augmenter::new(document.host(config));
    let built = report::build_report(
        &document,
        &augmenter,
        &args.types,
        args.kind.map(KindArg::member_kind),
    )?;
    write_report(&built, args.format)?;
    let errors = built.error_count();
    if args.should_deny_errors && errors > 0 {
        return Err(InspectError::ProblemsFound(errors));
    }
    Ok(())
}

fn write_report(built: &Report, format: OutputFormat) -> Result<(), InspectError> {
    let rendered = match format {
        OutputFormat::Text => built.render_text(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(built)?;
            json.push('\n');
            json
        }
    };
    std::io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .map_err(InspectError::Output)
}
