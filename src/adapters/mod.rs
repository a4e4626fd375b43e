// Adapters layer: concrete implementations for external systems.

pub mod download_dir;

pub use download_dir::DownloadDir;
