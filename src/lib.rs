pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, LauncherArgs};

pub use adapters::{GeminiShortener, HttpPageFetcher, SystemCommandRunner};
pub use app::{build_extractor, output::OutputFormat};
pub use config::AppConfig;
pub use core::{extractor::LinkExtractor, launcher::Launcher};
pub use utils::error::{ExtractorError, Result};
