pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::domain::model::ExportVariant;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "user-export")]
#[command(about = "Show the user directory and export it as a report file")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Server base URL (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Export variant (overrides the config file)
    #[arg(long, value_enum)]
    pub variant: Option<ExportVariant>,

    /// Directory the exported file is saved into (overrides the config file)
    #[arg(long)]
    pub download_dir: Option<String>,

    /// Emit JSON logs instead of compact text
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
