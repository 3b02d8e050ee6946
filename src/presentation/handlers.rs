// HTTP request handlers
use crate::domain::display::DisplayOverrides;
use crate::infrastructure::http_response::{accepts_brotli, html_response, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::page::{render_page, render_unavailable};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Chart page; `count`, `width` and `radius` tune the rendering
pub async fn chart_page(
    Query(overrides): Query<DisplayOverrides>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);

    let (html, status) = match state.chart_service.build_page(&overrides).await {
        Ok(page) => match render_page(&page) {
            Ok(html) => (html, StatusCode::OK),
            Err(e) => {
                tracing::error!("Failed to render chart page: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
        Err(e) => {
            tracing::error!("Reachability data unavailable: {}", e);
            (
                render_unavailable(state.chart_service.layouts()),
                StatusCode::BAD_GATEWAY,
            )
        }
    };

    match html_response(html, status, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Summary and Chart.js configurations as JSON
pub async fn chart_data(
    Query(overrides): Query<DisplayOverrides>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);

    let result = match state.chart_service.build_page(&overrides).await {
        Ok(page) => json_response(&page, StatusCode::OK, compress).await,
        Err(e) => {
            tracing::error!("Reachability data unavailable: {}", e);
            let body = ErrorBody {
                error: e.to_string(),
            };
            json_response(&body, StatusCode::BAD_GATEWAY, compress).await
        }
    };

    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
