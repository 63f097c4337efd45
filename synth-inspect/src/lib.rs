//! Library interface for the `synth-inspect` tool.
//!
//! The binary reads a JSON snapshot of declared types, runs the
//! member-synthesis engine over it and prints what each type gains. The
//! pieces live here so they can be tested without spawning the binary.

pub mod cli;
pub mod error;
pub mod input;
pub mod report;
