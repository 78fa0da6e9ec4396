use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
    service::TowerToHyperService,
};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, info, warn};

/// Plaintext listener. Serves until the process is terminated.
pub async fn serve_plaintext(listener: TcpListener, app: Router) -> Result<()> {
    info!(addr = %listener.local_addr()?, "http listener started");
    axum::serve(listener, app).await?;
    Ok(())
}

/// TLS listener sharing the same router. Each accepted connection is
/// handshaken and driven on its own task; a failed handshake only affects
/// that connection.
pub async fn serve_tls(
    listener: TcpListener,
    tls_config: Arc<rustls::ServerConfig>,
    app: Router,
) -> Result<()> {
    let acceptor = TlsAcceptor::from(tls_config);
    info!(addr = %listener.local_addr()?, "https listener started");

    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!("accept failed: {err}");
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        let acceptor = acceptor.clone();
        let app = app.clone();
        tokio::spawn(async move {
            let stream = match acceptor.accept(stream).await {
                Ok(stream) => stream,
                Err(err) => {
                    debug!(%peer_addr, "tls handshake failed: {err}");
                    return;
                }
            };
            let service = TowerToHyperService::new(app);
            if let Err(err) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!(%peer_addr, "connection error: {err}");
            }
        });
    }
}
