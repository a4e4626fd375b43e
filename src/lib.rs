pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::DownloadDir;
pub use config::TomlConfig;
pub use core::{
    controller::{ExportConfig, ExportController},
    directory::{DirectoryView, TriggerOutcome},
    response::ServerErrorParser,
};
pub use utils::error::{AppError, ExportError, ExportErrorKind, Result};
