use anyhow::Context;
use clap::Parser;
use menu_import::adapters::http;
use menu_import::core::ConfigProvider;
use menu_import::domain::model::RecordKind;
use menu_import::utils::{logger, validation::Validate};
use menu_import::{
    CliConfig, HttpSource, ImportError, ImportOptions, ImportReport, Importer, SanityStore,
    TomlConfig,
};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse().with_env_fallbacks();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting menu-import");

    let exit_code = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            match TomlConfig::from_file(path) {
                Ok(mut config) => {
                    cli.apply_to(&mut config);
                    let report_path = config.report_path().map(Path::to_path_buf);
                    run(&config, report_path).await
                }
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    e.severity().exit_code()
                }
            }
        }
        None => run(&cli, cli.report.clone()).await,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: &C, report_path: Option<PathBuf>) -> i32 {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return e.severity().exit_code();
    }

    tracing::info!(
        "📋 Target: project {} / dataset {} (api v{})",
        config.project_id(),
        config.dataset(),
        config.api_version()
    );
    tracing::info!("📋 Sources: {} | {}", config.foods_endpoint(), config.chefs_endpoint());

    let mut report = ImportReport::new(config.dry_run());
    let outcome = execute(config, &mut report).await;

    if let Some(path) = report_path.as_deref() {
        if !report.entries.is_empty() {
            match write_report(&report, path) {
                Ok(()) => tracing::info!("📁 Report saved to: {}", path.display()),
                Err(e) => tracing::warn!("⚠️ {:#}", e),
            }
        }
    }

    match outcome {
        Ok(()) => {
            print_summary(&report);
            0
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            e.severity().exit_code()
        }
    }
}

async fn execute<C: ConfigProvider>(
    config: &C,
    report: &mut ImportReport,
) -> Result<(), ImportError> {
    let client = http::build_client(config.timeout())?;
    let source = HttpSource::from_config(client.clone(), config);
    let store = SanityStore::from_config(client, config);

    let importer = Importer::new(source, store).with_options(ImportOptions::from_config(config));
    importer.run_into(report).await
}

fn write_report(report: &ImportReport, path: &Path) -> anyhow::Result<()> {
    report
        .write_csv(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

fn print_summary(report: &ImportReport) {
    let foods = report.summary(RecordKind::Food);
    let chefs = report.summary(RecordKind::Chef);

    if report.dry_run {
        println!("🔍 Dry run: {} foods and {} chefs would be imported", foods.fetched, chefs.fetched);
        return;
    }

    println!("✅ Data import completed!");
    println!(
        "  Foods: {} created, {} failed, {} images uploaded",
        foods.created, foods.failed, foods.images_uploaded
    );
    println!(
        "  Chefs: {} created, {} failed, {} images uploaded",
        chefs.created, chefs.failed, chefs.images_uploaded
    );
    if foods.images_failed + chefs.images_failed > 0 {
        println!(
            "  ⚠️ {} images could not be uploaded",
            foods.images_failed + chefs.images_failed
        );
    }
}
