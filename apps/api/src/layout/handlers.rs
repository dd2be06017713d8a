use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::layout::css::{page_preview_svg, BackgroundCss};
use crate::layout::geometry::{GeometryDescriptor, GridSpec};
use crate::layout::paper::PageDimensions;
use crate::layout::pattern::PatternSpec;
use crate::layout::settings::{GridPreset, GridUpdate, LayoutSettings, ResolvedLayout};
use crate::layout::style::ContentBoxStyle;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    #[serde(flatten)]
    pub settings: LayoutSettings,
    /// Overrides the configured writing area.
    pub page: Option<PageDimensions>,
}

#[derive(Serialize)]
pub struct LayoutResponse {
    pub geometry: GeometryDescriptor,
    pub pattern: PatternSpec,
    pub background: BackgroundCss,
    pub content_style: ContentBoxStyle,
    /// `content_style` as ordered `[property, value]` pairs.
    pub content_css: Vec<(&'static str, String)>,
}

#[derive(Serialize)]
pub struct PresetView {
    pub preset: GridPreset,
    pub key: String,
    pub label: &'static str,
    pub grid: GridSpec,
}

#[derive(Debug, Deserialize)]
pub struct GridUpdateRequest {
    #[serde(default)]
    pub settings: LayoutSettings,
    pub update: GridUpdate,
}

fn resolve_request(state: &AppState, req: &LayoutRequest) -> Result<ResolvedLayout, AppError> {
    let page = match req.page {
        Some(page) => validate_page(page)?,
        None => state.page,
    };
    let resolved = req.settings.resolve(page, &state.pattern_config);
    debug!(
        direction = ?req.settings.direction,
        mode = ?req.settings.mode,
        cell = resolved.geometry.cell_size,
        pitch = resolved.geometry.line_pitch,
        "Resolved layout"
    );
    Ok(resolved)
}

fn validate_page(page: PageDimensions) -> Result<PageDimensions, AppError> {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if ok(page.width) && ok(page.height) {
        Ok(page)
    } else {
        Err(AppError::Validation(format!(
            "Page dimensions must be positive, got {} × {}",
            page.width, page.height
        )))
    }
}

/// POST /api/v1/layout/resolve
pub async fn handle_resolve(
    State(state): State<AppState>,
    Json(req): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    let ResolvedLayout { geometry, pattern } = resolve_request(&state, &req)?;
    let direction = req.settings.direction;
    let content_style =
        ContentBoxStyle::from_layout(direction, &geometry, req.settings.mode.grid_fitting());
    Ok(Json(LayoutResponse {
        background: BackgroundCss::from_pattern(&pattern),
        content_css: content_style.declarations(),
        content_style,
        geometry,
        pattern,
    }))
}

/// POST /api/v1/layout/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<LayoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let resolved = resolve_request(&state, &req)?;
    let svg = page_preview_svg(&resolved.geometry, &resolved.pattern);
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    ))
}

/// GET /api/v1/layout/presets
pub async fn handle_presets() -> Json<Vec<PresetView>> {
    Json(
        GridPreset::ALL
            .into_iter()
            .map(|preset| PresetView {
                preset,
                key: preset.to_string(),
                label: preset.label(),
                grid: preset.grid(),
            })
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
pub struct ZoomRequest {
    #[serde(default)]
    pub settings: LayoutSettings,
    /// Wheel delta; positive scrolls down.
    pub delta_y: f64,
}

/// POST /api/v1/layout/settings/zoom
pub async fn handle_zoom(Json(req): Json<ZoomRequest>) -> Json<LayoutSettings> {
    let mut settings = req.settings;
    settings.zoom_by_wheel(req.delta_y);
    Json(settings)
}

/// POST /api/v1/layout/settings/grid
pub async fn handle_grid_update(
    Json(req): Json<GridUpdateRequest>,
) -> Result<Json<LayoutSettings>, AppError> {
    let mut settings = req.settings;
    settings.apply_grid_update(req.update)?;
    Ok(Json(settings))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{HeaderMap, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::routes::tests::test_state;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, HeaderMap, Vec<u8>) {
        let (state, _dir) = test_state();
        let app = build_router(state);
        let response = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        (status, headers, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_resolve_default_settings() {
        let (status, _, body) = post_json("/api/v1/layout/resolve", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(v["geometry"]["cell_size"], json!(31.0));
        assert_eq!(v["geometry"]["letter_spacing"], json!(6.0));
        assert_eq!(v["pattern"]["repeat"], json!("down"));
        assert_eq!(v["background"]["border"], json!("1px solid #ccc"));
    }

    #[tokio::test]
    async fn test_resolve_none_mode_clears_background() {
        let (status, _, body) = post_json(
            "/api/v1/layout/resolve",
            json!({ "mode": "none", "direction": "vertical" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(v["background"]["background_image"], json!("none"));
        assert_eq!(v["background"]["border"], json!("none"));
        assert_eq!(v["content_style"]["transform"]["axis"], json!("none"));
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_page() {
        let (status, _, _) = post_json(
            "/api/v1/layout/resolve",
            json!({ "page": { "width": -1.0, "height": 100.0 } }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_is_svg() {
        let (status, headers, body) =
            post_json("/api/v1/layout/preview", json!({ "mode": "grid" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "image/svg+xml");
        let svg = String::from_utf8(body).expect("utf-8 svg");
        assert!(svg.contains("<pattern"));
    }

    #[tokio::test]
    async fn test_resolve_grid_mode_uses_standard_sheet() {
        let (status, _, body) = post_json(
            "/api/v1/layout/resolve",
            json!({
                "mode": "grid",
                "grid": { "chars_per_line": 37, "lines_per_page": 12 }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).expect("json body");
        // Snapped to the 20 × 10 sheet: 20 cells of 31px plus 1px slack.
        assert_eq!(v["geometry"]["cell_size"], json!(31.0));
        assert_eq!(v["geometry"]["content_width"], json!(621.0));
    }

    #[tokio::test]
    async fn test_grid_update_in_grid_mode() {
        let (status, _, body) = post_json(
            "/api/v1/layout/settings/grid",
            json!({
                "settings": { "mode": "grid" },
                "update": { "kind": "preset", "preset": "sheet200" }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(v["grid"]["lines_per_page"], json!(10));

        let (status, _, _) = post_json(
            "/api/v1/layout/settings/grid",
            json!({
                "settings": { "mode": "grid" },
                "update": { "kind": "manual", "chars": 30, "lines": 30 }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_zoom_clamps_at_maximum() {
        let (status, _, body) = post_json(
            "/api/v1/layout/settings/zoom",
            json!({ "settings": { "zoom_percent": 200 }, "delta_y": -120.0 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(v["zoom_percent"], json!(200));
    }
}
