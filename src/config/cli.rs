use crate::app::output::OutputFormat;
use crate::config::toml_config::AppConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "yt-link-extractor")]
#[command(about = "Extract the links from a YouTube video description and title them")]
pub struct Cli {
    /// Path to TOML configuration file (defaults to ./extractor.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web UI and JSON API (default)
    Serve(ServeArgs),
    /// Extract links from a single video and print them
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Address to bind the server to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// YouTube video URL
    pub url: String,

    /// Gemini API key used to shorten long titles
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
#[command(name = "launch")]
#[command(about = "Prepare the Python virtual environment and start the application")]
pub struct LauncherArgs {
    /// Project directory (defaults to the directory containing this executable)
    #[arg(long, env = "LAUNCHER_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Path to TOML configuration file, relative to the current directory
    /// (defaults to <project>/extractor.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl LauncherArgs {
    /// 相對路徑以呼叫者的工作目錄為準，與主程式一致
    pub fn config_file(&self, cwd: &Path) -> Option<PathBuf> {
        self.config.as_ref().map(|path| cwd.join(path))
    }
}
