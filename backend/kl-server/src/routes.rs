use crate::health;

use kl_config::{Paths, ServerConfig};

use axum::{Router, routing::get};
use log::info;
use tower_http::services::ServeDir;

/// Subdirectories of the content directory, each mounted under `content_url`
const CONTENT_MOUNTS: [&str; 2] = ["databases", "storage"];

/// Build the application router with all endpoints
pub fn build_router(server: &ServerConfig, paths: &Paths) -> Router {
    let mut router = Router::new()
        .route("/", get(health::identity))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness));

    // Static file mounts
    if let Some(root) = &server.static_root {
        let dir = paths.resolve(root);
        info!("Serving static files from {} at {}", dir.display(), server.static_url);
        router = router.nest_service(&server.static_url, ServeDir::new(dir));
    }
    if let Some(content) = &server.content_dir {
        let content = paths.resolve(content);
        for name in CONTENT_MOUNTS {
            let dir = content.join(name);
            let url = format!("{}/{name}", server.content_url);
            info!("Serving content from {} at {url}", dir.display());
            router = router.nest_service(&url, ServeDir::new(dir));
        }
    }

    router
}
