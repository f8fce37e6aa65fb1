//! Handlers for `run`, `once` and `refresh`.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::{MonitoringRun, RunKind, RunStatus};
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::build_scheduler;
use crate::infrastructure::config::Config;

/// Run the engine until SIGINT or SIGTERM.
///
/// The in-flight cycle always completes; the signal only cuts the sleep
/// short. Queued notifications are flushed before returning.
pub async fn execute(config: Config) -> Result<()> {
    let mut scheduler = build_scheduler(&config)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    info!(service = %config.service_name, "fplwatch starting");
    let result = scheduler.run(shutdown_rx).await;
    scheduler
        .close_notifiers(config.notifier.drain_timeout())
        .await;
    result?;
    info!("fplwatch stopped");
    Ok(())
}

/// Run exactly one cycle.
///
/// # Errors
/// Returns [`Error::Cycle`] if the cycle failed or another instance holds
/// the engine lock.
pub async fn execute_once(config: Config, kind: RunKind) -> Result<()> {
    let mut scheduler = build_scheduler(&config)?;
    let run = scheduler.tick(kind).await;
    if let Err(e) = scheduler.release() {
        warn!(error = %e, "Failed to release engine lock");
    }
    scheduler
        .close_notifiers(config.notifier.drain_timeout())
        .await;

    print_summary(&run);
    match run.status {
        RunStatus::Success => Ok(()),
        RunStatus::Standby => Err(Error::Cycle("engine lock is held by another instance".into())),
        RunStatus::Failed => Err(Error::Cycle(
            run.error_message.unwrap_or_else(|| "unknown error".into()),
        )),
    }
}

fn print_summary(run: &MonitoringRun) {
    let monitors = if run.monitors.is_empty() {
        "none".to_string()
    } else {
        run.monitors_label()
    };
    println!(
        "{} {}: monitors={} records={} changes={} sent={}",
        run.kind, run.status, monitors, run.records_processed, run.changes_detected, run.notifications_sent
    );
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            warn!(error = %e, "Could not install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
