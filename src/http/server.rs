//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one route per registered asset view
//! - Wire up middleware (tracing, timeout, request ID, registry extension)
//! - Bind server to listener
//! - Stop when shutdown is triggered

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, routing::on, Extension, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AssetServerConfig;
use crate::http::handler::{serve_asset, AssetRoute};
use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::lifecycle::ShutdownSignal;
use crate::registry::AssetRegistry;

/// HTTP server for registered asset views.
pub struct AssetServer {
    router: Router,
}

impl AssetServer {
    /// Create a new HTTP server with the given configuration and registry.
    pub fn new(config: &AssetServerConfig, registry: Arc<AssetRegistry>) -> Self {
        Self {
            router: Self::build_router(config, registry),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &AssetServerConfig, registry: Arc<AssetRegistry>) -> Router {
        let mut router = Router::new();
        for mount in registry.mounts() {
            let route = AssetRoute {
                asset_spec: Arc::from(mount.asset_spec.as_str()),
                view: mount.view.clone(),
            };
            tracing::debug!(route = %mount.route_name, pattern = %mount.pattern, "Mounting asset route");
            router = router.route(&mount.pattern, on(mount.methods, serve_asset).with_state(route));
        }

        router
            .layer(Extension(registry))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(RequestIdLayer)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
