use std::sync::Arc;

use aide::axum::{ApiRouter, routing::get};
use aide::openapi::{Info, OpenApi};
use aide::scalar::Scalar;
use axum::{Extension, Json, Router, routing::get as axum_get};

use super::DashboardState;
use super::handlers::{get_frequency, get_last_draw_handler, health, index};
use super::types::RouterState;

/// Dashboard page, JSON API and its OpenAPI document.
pub fn build_router(dashboard: Arc<DashboardState>) -> Router {
    let mut api = OpenApi {
        info: Info {
            title: "Lotto Dashboard API".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ..Default::default()
        },
        ..Default::default()
    };

    let app = ApiRouter::new()
        .route(
            "/api/docs",
            Scalar::new("/api/docs/openapi.json")
                .with_title("Lotto Dashboard API Docs")
                .axum_route(),
        )
        .api_route("/health", get(health))
        .api_route("/api/frequency", get(get_frequency))
        .api_route("/api/draws/last", get(get_last_draw_handler))
        .with_state(RouterState { dashboard })
        .finish_api(&mut api);

    let api = Arc::new(api);
    app.route("/", axum_get(index))
        .route("/api/docs/openapi.json", axum_get(serve_openapi))
        .layer(Extension(api))
}

async fn serve_openapi(Extension(api): Extension<Arc<OpenApi>>) -> Json<OpenApi> {
    Json((*api).clone())
}
