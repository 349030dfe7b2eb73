use crate::config::ScribeConfig;
use crate::engine::{CorrelationEngine, Outcome};
use crate::error::ScribeError;
use crate::extractor::extract;
use crate::naming::NamingOracle;
use crate::reader::{LogReader, ensure_log_source};
use crate::writer::{ArtifactSink, FileArtifacts};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Counters reported when the loop stops. `lines_read` is the reader's own
/// count, so it includes lines consumed before `run` was entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_read: u64,
    pub events: u64,
    pub bindings: u64,
    pub actions: u64,
}

/// Drive `engine` with every line `reader` yields until `cancel` fires.
///
/// The sink is flushed on the way out. Errors abort immediately without a
/// flush; they are all fatal.
pub async fn run<S: ArtifactSink>(
    reader: &mut LogReader,
    engine: &mut CorrelationEngine<S>,
    cancel: &CancellationToken,
) -> Result<RunSummary, ScribeError> {
    let mut summary = RunSummary::default();

    while let Some(line) = reader.next_line(cancel).await? {
        let Some(event) = extract(&line.text) else {
            continue;
        };
        summary.events += 1;

        match engine.process(event).await? {
            Outcome::Bound(_) => summary.bindings += 1,
            Outcome::Recorded(_) => summary.actions += 1,
            _ => {}
        }
    }

    summary.lines_read = reader.lines_read();
    engine.shutdown().await?;
    info!(
        "Stopped after {} lines: {} events, {} bindings, {} actions",
        summary.lines_read, summary.events, summary.bindings, summary.actions
    );
    Ok(summary)
}

/// Prepare the files named in `config` and record until cancelled.
///
/// The log is created if missing and otherwise read from the start; the
/// registry and steps files are reset.
pub async fn start(
    config: &ScribeConfig,
    oracle: Arc<dyn NamingOracle>,
    cancel: &CancellationToken,
) -> Result<RunSummary, ScribeError> {
    let paths = &config.paths;
    ensure_log_source(&paths.log_file).await?;
    let artifacts = FileArtifacts::create(&paths.registry_file, &paths.steps_file).await?;

    let mut reader = LogReader::open(
        &paths.log_file,
        Duration::from_millis(config.reader.poll_interval_ms),
    )
    .await?;
    let mut engine = CorrelationEngine::new(&config.correlation, oracle, artifacts);

    info!(
        "Scanning {} from the beginning and listening for new commands",
        paths.log_file.display()
    );
    run(&mut reader, &mut engine, cancel).await
}
