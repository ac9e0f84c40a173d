//! Process lifecycle: startup, serving and shutdown

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::crawl::{CrawlMode, CrawlStats, Crawler};
use crate::http::{AppState, HttpServer};
use crate::index::FileIndex;

/// Open the index, crawling first if it has to be created.
///
/// A fresh index gets an Initial pass; an existing one gets an Update pass
/// when `update` is set. If the Initial pass fails the new index directory
/// is removed so the next start tries again.
pub fn prepare_index(
    config: &Config,
    root: &Path,
    update: bool,
) -> Result<(FileIndex, Option<CrawlStats>)> {
    let dir = config.index.resolve_dir()?;
    let (index, created) = FileIndex::open_or_create(&dir, &config.index)
        .with_context(|| format!("Failed to open index at {}", dir.display()))?;

    if created {
        info!("No index found, running initial crawl");
        match Crawler::new(&index, root).run(CrawlMode::Initial) {
            Ok(stats) => return Ok((index, Some(stats))),
            Err(e) => {
                drop(index);
                if let Err(cleanup) = std::fs::remove_dir_all(&dir) {
                    warn!("Failed to remove incomplete index {}: {}", dir.display(), cleanup);
                }
                return Err(e).context("Initial crawl failed");
            }
        }
    }

    if update {
        let stats = Crawler::new(&index, root)
            .run(CrawlMode::Update)
            .context("Update crawl failed")?;
        return Ok((index, Some(stats)));
    }

    Ok((index, None))
}

/// Running service
pub struct Service {
    config: Config,
    root: PathBuf,
    index: Arc<FileIndex>,
}

impl Service {
    /// Resolve the root and bring the index up to date
    pub async fn start(config: Config) -> Result<Self> {
        let root = config.root_dir()?;
        info!("Serving {}", root.display());

        let prepare_config = config.clone();
        let prepare_root = root.clone();
        let update = config.crawl.update_on_start;
        let (index, _) = tokio::task::spawn_blocking(move || {
            prepare_index(&prepare_config, &prepare_root, update)
        })
        .await
        .context("Index preparation task panicked")??;

        info!("Index holds {} records", index.num_records());

        Ok(Self {
            config,
            root,
            index: Arc::new(index),
        })
    }

    /// Serve HTTP until SIGINT, SIGTERM or SIGUSR1
    pub async fn run(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let server = HttpServer::new(
            self.config.http.clone(),
            AppState::new(self.index.clone(), self.root.clone()),
        );
        let listener = server.bind().await?;

        let mut server_handle = tokio::spawn(async move {
            match server.run(listener, shutdown_rx).await {
                Ok(()) => info!("HTTP server shut down cleanly"),
                Err(e) => error!("HTTP server failed: {}", e),
            }
        });

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
            }
            name = wait_for_terminate() => {
                info!("Received {}, shutting down", name);
            }
            _ = &mut server_handle => {
                anyhow::bail!("HTTP server stopped unexpectedly");
            }
        }

        let _ = shutdown_tx.send(());

        let grace = self.config.http.shutdown_grace();
        let server_abort = server_handle.abort_handle();
        if tokio::time::timeout(grace, server_handle).await.is_err() {
            warn!(
                "HTTP server did not shut down within {}s, aborting",
                grace.as_secs()
            );
            server_abort.abort();
        }

        info!("Shutdown complete");
        Ok(())
    }
}

/// Resolve with the name of the first termination signal: SIGTERM or SIGUSR1
#[cfg(unix)]
async fn wait_for_terminate() -> &'static str {
    use tokio::signal::unix::SignalKind;

    let mut sigterm = listen(SignalKind::terminate(), "SIGTERM");
    let mut sigusr1 = listen(SignalKind::user_defined1(), "SIGUSR1");
    tokio::select! {
        _ = recv(&mut sigterm) => "SIGTERM",
        _ = recv(&mut sigusr1) => "SIGUSR1",
    }
}

#[cfg(unix)]
fn listen(
    kind: tokio::signal::unix::SignalKind,
    name: &str,
) -> Option<tokio::signal::unix::Signal> {
    match tokio::signal::unix::signal(kind) {
        Ok(signal) => Some(signal),
        Err(e) => {
            warn!("Failed to register {} handler: {}", name, e);
            None
        }
    }
}

#[cfg(unix)]
async fn recv(signal: &mut Option<tokio::signal::unix::Signal>) {
    match signal {
        Some(signal) => {
            signal.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(not(unix))]
async fn wait_for_terminate() -> &'static str {
    std::future::pending::<&'static str>().await
}
