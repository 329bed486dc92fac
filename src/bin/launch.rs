use clap::Parser;
use yt_link_extractor::core::launcher::{resolve_project_root, Launcher};
use yt_link_extractor::utils::{logger, validation::Validate};
use yt_link_extractor::{AppConfig, LauncherArgs, Result, SystemCommandRunner};

fn main() {
    let args = LauncherArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ Launch failed: {} (Category: {:?}, Severity: {:?})",
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
}

fn run(args: &LauncherArgs) -> Result<i32> {
    let project_root = resolve_project_root(args.project_dir.as_deref())?;
    tracing::debug!("📁 Project directory: {}", project_root.display());

    let config_path = args.config_file(&std::env::current_dir()?);
    let config = AppConfig::load(config_path.as_deref(), &project_root)?;
    config.validate()?;

    let launcher = Launcher::new(
        SystemCommandRunner,
        project_root,
        config.launcher.clone(),
        config.server.public_url(),
    );

    let outcome = launcher.run()?;
    tracing::debug!(
        "Application finished (exit code {}, environment created: {})",
        outcome.exit_code,
        outcome.created_environment
    );
    Ok(outcome.exit_code)
}
