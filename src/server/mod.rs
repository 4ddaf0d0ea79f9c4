pub mod handlers;
mod types;

pub use handlers::AppState;
pub use types::{BatchResponse, ErrorResponse, GenerateRequest, SingleResponse, WorkflowsResponse};

use crate::comfy::{ComfyClient, HttpComfyClient};
use crate::config::Config;
use crate::generation::Generator;
use crate::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Build the application router; tests construct this directly with a
/// fake ComfyUI client behind the state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/workflows", get(handlers::list_workflows))
        .route("/generate", post(handlers::generate))
        .route("/output/latest", get(handlers::serve_latest))
        .route("/output/*path", get(handlers::serve_output))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let config = Arc::new(config);

    let client: Arc<dyn ComfyClient> = Arc::new(HttpComfyClient::new(&config.comfy.base_url));
    let generator = Arc::new(Generator::new(client, config.clone()));

    let app = router(AppState {
        config: config.clone(),
        generator,
    });

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);
    info!("ComfyUI backend at {}", config.comfy.base_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
