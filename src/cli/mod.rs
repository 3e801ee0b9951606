//! CLI-specific modules
//!
//! The `fastvar` binary plays the editor host: it reads the component file,
//! asks the pickers on the terminal and commits the edited buffer to disk.

pub mod host;
pub mod output;

pub use host::CliHost;
pub use output::{CreateReport, KindsReport, OutputFormat, OutputWriter, patch_text};
