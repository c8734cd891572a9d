use folio_engine::Site;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::create_router;
use crate::state::AppState;

pub struct FolioServer;

impl FolioServer {
    /// Serve the JSON API until Ctrl+C
    pub async fn serve(site: Site, addr: &str) -> anyhow::Result<()> {
        let app = create_router(AppState::new(site));

        let listener = TcpListener::bind(addr).await?;

        info!("Folio listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully...");
}
