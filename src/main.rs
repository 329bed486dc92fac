use clap::Parser;
use yt_link_extractor::app::{output, server};
use yt_link_extractor::config::cli::{Cli, Command, ExtractArgs, LogFormat, ServeArgs};
use yt_link_extractor::utils::{logger, validation, validation::Validate};
use yt_link_extractor::{build_extractor, AppConfig, Result};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::debug!("CLI args: {:?}", cli);

    if let Err(e) = run(cli).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let mut config = AppConfig::load(cli.config.as_deref(), &cwd)?;

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => {
            args.apply(&mut config);
            config.validate()?;
            tracing::info!("🚀 Starting YouTube Link Extractor");
            server::serve(config).await
        }
        Command::Extract(args) => {
            config.validate()?;
            extract_once(config, args).await
        }
    }
}

async fn extract_once(config: AppConfig, args: ExtractArgs) -> Result<()> {
    validation::validate_url("url", &args.url)?;

    let extractor = build_extractor(&config)?;
    let api_key = args
        .api_key
        .filter(|key| !key.is_empty())
        .or_else(|| config.gemini.resolved_api_key());

    let result = extractor.extract(&args.url, api_key.as_deref()).await?;
    print!("{}", output::render(&result, args.format)?);
    Ok(())
}
