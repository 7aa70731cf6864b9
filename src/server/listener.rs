use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::{ProxyConfig, ServerConfig};
use crate::http::connection::Connection;
use crate::proxy::ProxyHandler;
use crate::server::gate::AdmissionGate;
use crate::service::action::Handler;
use crate::service::files::FileService;
use crate::store::FileStore;

/// Runs the file service: gated accept loop over the local store.
pub async fn run_files(cfg: &ServerConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&cfg.store_root)
        .await
        .with_context(|| format!("failed to create store root {}", cfg.store_root.display()))?;

    let service = Arc::new(FileService::new(FileStore::new(&cfg.store_root)));
    let gate = AdmissionGate::new(cfg.max_inflight);
    let listener = bind(&cfg.listen_addr).await?;

    serve(listener, service, Some(gate)).await
}

/// Runs the proxy: ungated accept loop forwarding to one upstream.
pub async fn run_proxy(cfg: &ProxyConfig) -> anyhow::Result<()> {
    let handler = Arc::new(ProxyHandler::new(&cfg.upstream_addr)?);
    let listener = bind(&cfg.listen_addr).await?;

    // Only the file service is admission-gated
    serve(listener, handler, None).await
}

async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");
    Ok(listener)
}

/// Accepts connections forever, one spawned handler per connection.
///
/// A failed accept is logged and skipped, never fatal. With a gate, the
/// loop waits for a permit before spawning, so excess connections queue
/// in the accept backlog until a slot frees.
pub async fn serve<H>(
    listener: TcpListener,
    handler: Arc<H>,
    gate: Option<AdmissionGate>,
) -> anyhow::Result<()>
where
    H: Handler + Send + Sync + 'static,
{
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Accept failed: {e}");
                continue;
            }
        };
        debug!("Accepted connection from {peer}");

        let permit = match &gate {
            Some(gate) => Some(gate.acquire().await),
            None => None,
        };

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            // Held for the whole exchange; dropped on every exit path
            let _permit = permit;

            let mut conn = Connection::new(socket, handler);
            if let Err(e) = conn.run().await {
                error!("Connection error from {peer}: {e}");
            }
        });
    }
}
