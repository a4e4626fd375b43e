use anyhow::Context;
use clap::Parser;
use user_export::utils::{logger, validation::Validate};
use user_export::{
    CliConfig, DirectoryView, DownloadDir, ExportController, TomlConfig, TriggerOutcome,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting user-export");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => TomlConfig::default(),
    };
    config.apply_overrides(
        args.base_url.clone(),
        args.variant,
        args.download_dir.clone(),
    );

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    let target = DownloadDir::new(config.download_dir());
    let controller = ExportController::new(config.export_config(), target);
    let view = DirectoryView::new(config.users.clone(), controller);

    println!("{}\n", view.render());

    let outcome = view.trigger_export().await;
    println!("{}", view.render());

    match outcome {
        TriggerOutcome::Failed(e) => {
            tracing::error!(kind = e.kind.as_str(), "Export failed: {}", e.message);
            std::process::exit(2);
        }
        TriggerOutcome::Ignored => {
            tracing::debug!("Export trigger ignored while busy");
            Ok(())
        }
        TriggerOutcome::Completed => {
            let saved = view
                .exporter()
                .target()
                .base_path()
                .join(&view.exporter().config().filename);
            println!("📁 Export saved to: {}", saved.display());
            Ok(())
        }
    }
}
