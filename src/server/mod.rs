//! HTTP server for the summarization app

pub mod error;
pub mod routes;
pub mod session;
pub mod state;

use axum::{Router, extract::Request, middleware::Next, response::Response, routing::get};
use std::net::SocketAddr;
use std::time::Instant;

use crate::config::Config;
use crate::error::{BrieflyError, Result};

pub use error::{ApiError, ApiResult};
pub use session::CurrentSession;
pub use state::{AppState, Services};

/// Briefly HTTP server
pub struct BrieflyServer {
    config: Config,
    state: AppState,
}

impl BrieflyServer {
    /// Load the model and clients described by `config` and build the server
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let services = Services::from_config(&config).await?;
        Self::with_services(config, services)
    }

    /// Build the server around already constructed services
    pub fn with_services(config: Config, services: Services) -> Result<Self> {
        let state = AppState::new(config.clone(), services)?;
        Ok(Self { config, state })
    }

    /// The complete router, state attached
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .merge(routes::app_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            .layer(axum::middleware::from_fn(log_request))
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| BrieflyError::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        log::info!("Starting Briefly on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| BrieflyError::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| BrieflyError::Generic(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        self.config.server_address()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({:.1}ms)",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    response
}
