use anyhow::{Context, Result};
use clap::Parser;
use object_store_backup::{
    adapters::outbound::observer::TracingObserver,
    app::{AppBuilder, AppConfig, StorageBackend},
    config::BackupConfig,
    ports::BackupService,
};
use std::{
    fs::OpenOptions,
    num::NonZeroUsize,
    path::PathBuf,
    process::ExitCode,
    sync::{Arc, Mutex},
};
use tracing::{error, info, warn};
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "object-store-backup")]
#[command(about = "Incremental backup of local folders to S3", long_about = None)]
struct Cli {
    /// Backup configuration file
    #[arg(short, long, env = "BACKUP_CONFIG", default_value = "config.yml")]
    config: PathBuf,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Also append log output to this file
    #[arg(long, env = "BACKUP_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Storage backend type: `s3`, or `memory` for a trial run that uploads nowhere
    #[arg(long, env = "STORAGE_BACKEND", default_value = "s3")]
    storage_backend: String,

    /// Maximum number of directories synced at the same time (default: all)
    #[arg(long, env = "BACKUP_MAX_CONCURRENT_UNITS")]
    max_concurrent_units: Option<NonZeroUsize>,

    /// Exit with a non-zero status when any file or folder failed
    #[arg(long, env = "BACKUP_FAIL_ON_ERROR", default_value = "false")]
    fail_on_error: bool,
}

impl Cli {
    fn level_filter(&self) -> LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            "off" => LevelFilter::OFF,
            _ => LevelFilter::INFO,
        }
    }

    fn init_logging(&self) -> Result<()> {
        let file_layer = match &self.log_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file {}", path.display()))?;
                Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(self.level_filter())
            .with(fmt::layer())
            .with(file_layer)
            .init();

        Ok(())
    }

    fn to_app_config(&self, config: &BackupConfig) -> Result<AppConfig> {
        let mut app_config = AppConfig::from_backup_config(config)
            .context("Invalid backup configuration")?;

        match self.storage_backend.as_str() {
            "s3" => {}
            "memory" => {
                app_config.storage_backend = StorageBackend::InMemory {
                    bucket: app_config.storage_backend.bucket().clone(),
                };
            }
            other => anyhow::bail!("Unknown storage backend: {}", other),
        }

        if self.max_concurrent_units.is_some() {
            app_config.max_concurrent_units = self.max_concurrent_units;
        }

        Ok(app_config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting backup with config {}", cli.config.display());

    let config = match BackupConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("error reading config file {}: {}", cli.config.display(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(profile) = config.aws.profile_name.as_deref().filter(|p| !p.trim().is_empty()) {
        warn!(
            profile,
            "Named profiles are not read; credentials come from the environment"
        );
    }

    let app_config = cli.to_app_config(&config)?;
    info!(
        bucket = %app_config.storage_backend.bucket(),
        prefix = %app_config.global_prefix,
        backend = %cli.storage_backend,
        "Backup target"
    );

    let app = AppBuilder::new()
        .with_config(app_config)
        .with_observer(Arc::new(TracingObserver::new()))
        .build()
        .await
        .context("Failed to build application")?;

    let summary = match app.orchestrator.run(&config.declarations()).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Backup aborted: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.fail_on_error && summary.has_failures() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
