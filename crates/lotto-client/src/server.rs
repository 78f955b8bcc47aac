use std::net::SocketAddr;
use std::sync::Arc;

use crate::{config::DashboardConfig, models::DrawTable, service::query::DateRange};

mod handlers;
mod router;
mod types;

pub use router::build_router;

/// Read-only data behind the dashboard.
#[derive(Debug)]
pub struct DashboardState {
    pub table: DrawTable,
    /// Window used when a query leaves a bound out.
    pub default_range: DateRange,
}

#[derive(Clone)]
pub struct HttpServer {
    state: Arc<DashboardState>,
    addr: SocketAddr,
}

impl HttpServer {
    pub fn new(table: DrawTable, config: &DashboardConfig) -> Self {
        Self::with_state(
            Arc::new(DashboardState {
                table,
                default_range: config.default_range(),
            }),
            config.socket_addr(),
        )
    }

    pub fn with_state(state: Arc<DashboardState>, addr: SocketAddr) -> Self {
        Self { state, addr }
    }

    pub async fn start(&self) -> anyhow::Result<tokio::task::JoinHandle<()>> {
        let addr = self.addr;
        let app = build_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!(
            "Dashboard listening on http://{addr} ({} draws loaded)",
            self.state.table.len()
        );

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("HTTP server stopped: {e}");
            }
        });

        Ok(handle)
    }
}
