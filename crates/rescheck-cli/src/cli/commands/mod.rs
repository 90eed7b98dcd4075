//! CLI command handlers, one file per command.

mod check;
mod download;
mod size;

pub use check::{run_check, CheckOptions};
pub use download::run_download;
pub use size::run_size;
