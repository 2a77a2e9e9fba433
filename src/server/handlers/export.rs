//! Preview and PDF export handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    export::pdf::{self, PdfExport},
    geometry::Offset,
    project::ProjectDocument,
    render::{self, canvas},
    viewport::{DEFAULT_ZOOM, Viewport, ViewportSize},
};

use super::super::state::AppState;
use super::{ApiError, blocking};

/// Largest preview edge in pixels.
const MAX_PREVIEW_EDGE: u32 = 4096;

/// Query parameters for the preview endpoint. Without both offsets the
/// viewport is fitted to the content.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_zoom")]
    pub zoom: i32,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_zoom() -> i32 {
    DEFAULT_ZOOM
}

/// GET /api/projects/:id/preview - Render a viewport of a stored project as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.clone();
    let png_bytes = blocking(move || {
        let doc = store.get(&id)?;
        let width = query.width.clamp(1, MAX_PREVIEW_EDGE);
        let height = query.height.clamp(1, MAX_PREVIEW_EDGE);

        let mut viewport = Viewport::new(Offset::default(), query.zoom);
        match (query.offset_x, query.offset_y) {
            (Some(x), Some(y)) => viewport.set_offset(Offset::new(x, y)),
            _ => {
                viewport.fit_to_content(&doc.grid, ViewportSize::new(width as f64, height as f64));
            }
        }

        let img = canvas::render_canvas(&doc.grid, width, height, viewport.offset(), viewport.zoom());
        render::encode_png(&img)
    })
    .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}

/// GET /api/projects/:id/export - Download a stored project as PDF.
pub async fn project_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.clone();
    let export = blocking(move || {
        let doc = store.get(&id)?;
        pdf::export_document(&doc)
    })
    .await?;
    Ok(pdf_response(export))
}

/// POST /api/export/pdf - Download the posted (possibly unsaved) document as PDF.
pub async fn document_pdf(Json(doc): Json<ProjectDocument>) -> Result<impl IntoResponse, ApiError> {
    let export = blocking(move || pdf::export_document(&doc)).await?;
    Ok(pdf_response(export))
}

fn pdf_response(export: PdfExport) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.bytes,
    )
}
