use anyhow::Result;
use openpbs_exporter::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let pbs_repo = pbs_repo::PbsRepo::new(
        app_config.collection.shell.clone(),
        app_config.commands.clone(),
        Duration::from_secs(app_config.collection.command_timeout_secs),
    );
    let collector = Arc::new(collector::Collector::new(
        pbs_repo,
        app_config.collection.job_header_lines,
    ));
    let metrics = Arc::new(
        metrics::MetricsRegistry::new()
            .map_err(|e| anyhow::anyhow!("metrics registry: {}", e))?,
    );
    let store = Arc::new(store::SnapshotStore::new());

    let sinks: Vec<Arc<dyn collector::SnapshotSink>> = vec![
        metrics.clone() as Arc<dyn collector::SnapshotSink>,
        store.clone() as Arc<dyn collector::SnapshotSink>,
    ];

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            collector,
            sinks,
            shutdown_rx,
        },
        worker::WorkerConfig {
            refresh_interval_ms: app_config.collection.refresh_interval_ms,
            stats_log_interval_secs: app_config.collection.stats_log_interval_secs,
        },
    );

    let app = routes::app(metrics, store);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        refresh_interval_ms = app_config.collection.refresh_interval_ms,
        "Listening on http://{}/metrics",
        addr
    );

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            if let Ok(stats) = worker_handle.await {
                tracing::info!(
                    passes_succeeded = stats.succeeded,
                    passes_failed = stats.failed,
                    "worker stopped"
                );
            }
        }
    }

    Ok(())
}
