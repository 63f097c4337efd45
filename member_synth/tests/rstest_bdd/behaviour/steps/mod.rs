//! Step definitions, grouped by the part of the pipeline they drive.

mod accessor_steps;
mod builder_steps;
mod helpers;
mod type_steps;
