use anyhow::Context;
use clap::{Parser, Subcommand};
use scribe_engine::check::check_files;
use scribe_engine::config::{ConfigLoader, ScribeConfig};
use scribe_gemini::oracle_from_config;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "scribe",
    version,
    about = "Turn an Appium server log into a replayable step script"
)]
struct Args {
    /// Config file (defaults to ./scribe.yaml, then ~/.scribe/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Follow the driver log and record locators and steps (default)
    Watch {
        /// Driver log to follow
        #[arg(long)]
        log: Option<PathBuf>,
        /// Registry output (JSON, name -> locator)
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Step script output
        #[arg(long)]
        steps: Option<PathBuf>,
        /// Never call the naming oracle
        #[arg(long)]
        offline: bool,
        /// Poll interval in milliseconds when the log has no new data
        #[arg(long)]
        poll_ms: Option<u64>,
    },
    /// Check that every name a step script uses exists in a registry
    Check {
        #[arg(long)]
        registry: Option<PathBuf>,
        #[arg(long)]
        steps: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = ConfigLoader::load(args.config.as_deref())
        .await
        .context("loading configuration")?;

    match args.command.unwrap_or(Command::Watch {
        log: None,
        registry: None,
        steps: None,
        offline: false,
        poll_ms: None,
    }) {
        Command::Watch {
            log,
            registry,
            steps,
            offline,
            poll_ms,
        } => {
            if let Some(log) = log {
                config.paths.log_file = log;
            }
            if let Some(registry) = registry {
                config.paths.registry_file = registry;
            }
            if let Some(steps) = steps {
                config.paths.steps_file = steps;
            }
            if let Some(poll_ms) = poll_ms {
                config.reader.poll_interval_ms = poll_ms;
            }
            if offline {
                config.oracle.enabled = false;
            }
            watch(config).await
        }
        Command::Check { registry, steps } => {
            let registry = registry.unwrap_or(config.paths.registry_file);
            let steps = steps.unwrap_or(config.paths.steps_file);
            check(registry, steps).await
        }
    }
}

async fn watch(config: ScribeConfig) -> anyhow::Result<ExitCode> {
    info!("Scribe starting");
    let oracle = oracle_from_config(&config.oracle);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
        }
        on_signal.cancel();
    });

    let summary = scribe_engine::start(&config, oracle, &cancel)
        .await
        .context("recording stopped")?;

    println!(
        "Recorded {} actions and {} element bindings from {} log lines",
        summary.actions, summary.bindings, summary.lines_read
    );
    Ok(ExitCode::SUCCESS)
}

async fn check(registry: PathBuf, steps: PathBuf) -> anyhow::Result<ExitCode> {
    let report = check_files(&registry, &steps).await?;
    if report.is_ok() {
        println!(
            "{}: all {} steps resolve against {}",
            steps.display(),
            report.steps,
            registry.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    for missing in &report.missing {
        println!(
            "{}:{}: unknown element '{}'",
            steps.display(),
            missing.line,
            missing.name
        );
    }
    Ok(ExitCode::FAILURE)
}
