//! Command implementations
//!
//! Every command that touches the network builds a `ScorecardEngine` over a
//! file-backed store in the configured data directory.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use scorecard::connectivity::{HttpProbeConnectivity, ManualConnectivity};
use scorecard::{FileKeyValueStore, FlushReport, PendingQueue, ScorecardEngine};
use scorecard_api::{ConnectivityState, Criterion, EvaluationForm, PendingRecord, Score};
use scorecard_core::ConnectivityMonitor;
use scorecard_supabase::SupabaseClient;

use crate::cli::SubmitArgs;
use crate::config::CliConfig;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

fn open_store(config: &CliConfig) -> Result<Arc<FileKeyValueStore>> {
    let dir = config.data_dir();
    std::fs::create_dir_all(&dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory {}: {}", dir.display(), e))?;
    Ok(Arc::new(FileKeyValueStore::new(dir)))
}

fn probe(config: &CliConfig) -> Result<Arc<HttpProbeConnectivity>> {
    let url = config
        .probe_url()
        .ok_or_else(|| anyhow::anyhow!("No probe_url or Supabase URL configured"))?;
    let monitor = HttpProbeConnectivity::new(url, PROBE_TIMEOUT)
        .map_err(|e| anyhow::anyhow!("Failed to create connectivity probe: {}", e))?;
    Ok(Arc::new(monitor))
}

fn build_engine(config: &CliConfig, connectivity: Arc<dyn ConnectivityMonitor>) -> Result<ScorecardEngine> {
    let client = SupabaseClient::new(config.require_remote()?)
        .map_err(|e| anyhow::anyhow!("Failed to create Supabase client: {}", e))?;
    Ok(ScorecardEngine::new(
        open_store(config)?,
        Arc::new(client),
        connectivity,
        &config.sync,
    ))
}

pub fn form_from_args(args: &SubmitArgs) -> EvaluationForm {
    EvaluationForm {
        evaluator: args.evaluator.clone(),
        class: args.class.clone(),
        group: args.group.clone(),
        scores: args.scores(),
        note: args.note.clone(),
    }
}

pub async fn submit(config: &CliConfig, args: &SubmitArgs) -> Result<()> {
    let form = form_from_args(args);
    // Invalid input fails before any config or network access.
    form.validate()?;

    let connectivity = probe(config)?;
    connectivity.refresh().await;
    let engine = build_engine(config, connectivity)?;

    let outcome = engine.submission().submit(&form).await?;
    println!("{}", outcome.title());
    println!("{}", outcome.user_message());
    if outcome.is_queued() {
        println!("Pending evaluations: {}", pending_count(engine.queue()).await?);
    }
    Ok(())
}

pub async fn flush(config: &CliConfig) -> Result<()> {
    let report = flush_now(config).await?;
    print_report(&report);
    Ok(())
}

/// Manual flushes skip the reachability probe.
async fn flush_now(config: &CliConfig) -> Result<FlushReport> {
    let connectivity = Arc::new(ManualConnectivity::new(ConnectivityState::online()));
    let engine = build_engine(config, connectivity)?;
    engine
        .coordinator()
        .flush()
        .await
        .map_err(|e| anyhow::anyhow!("Flush failed: {}", e))
}

pub async fn pending(config: &CliConfig, json: bool) -> Result<()> {
    let queue = PendingQueue::new(open_store(config)?, config.sync.queue_key.clone());
    let records = queue
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read pending queue: {}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No pending evaluations.");
        return Ok(());
    }
    println!("{} pending evaluation(s):", records.len());
    for record in &records {
        println!("  {}", describe(record));
    }
    Ok(())
}

pub async fn watch(config: &CliConfig, interval: Duration) -> Result<()> {
    let connectivity = probe(config)?;
    connectivity.refresh().await;
    let engine = build_engine(config, connectivity.clone())?;

    let polling = connectivity.spawn_polling(interval);
    let trigger = engine.start_sync_trigger();
    println!("Watching connectivity. Press Ctrl-C to stop.");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to listen for Ctrl-C: {}", e))?;

    info!("[watch] Stopping");
    polling.abort();
    trigger.shutdown().await;
    println!("Pending evaluations: {}", pending_count(engine.queue()).await?);
    Ok(())
}

pub fn criteria() {
    for criterion in Criterion::ALL {
        println!("{}  {}", criterion.id(), criterion.label());
        println!("    {}", criterion.description());
    }
    println!();
    let scores: Vec<String> = Score::ALL
        .into_iter()
        .map(|s| format!("{} ({:.2})", s.label(), s.value()))
        .collect();
    println!("Scores: {}", scores.join(", "));
}

async fn pending_count(queue: &PendingQueue) -> Result<usize> {
    queue
        .len()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read pending queue: {}", e))
}

fn describe(record: &PendingRecord) -> String {
    let evaluation = &record.evaluation;
    format!(
        "{}  group '{}', class {}, by {} (total {:.2})",
        record.saved_at, evaluation.group, evaluation.class, evaluation.evaluator, evaluation.total
    )
}

fn print_report(report: &FlushReport) {
    println!(
        "{:?}: {} sent in {} batch(es), {} batch(es) retried one by one, {} still pending",
        report.outcome, report.sent, report.batches, report.batch_failures, report.still_pending
    );
}
