use axum::{
    extract::{Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use rust_embed::RustEmbed;
use serde::Deserialize;
use std::path::Path;
use tracing::{error, warn};

use crate::assets::{self, AssetError};
use crate::constants::{PROJECTS_LOAD_ERROR, PROJECT_LOAD_ERROR, PROJECT_NOT_FOUND};
use crate::loader::{find_project, load_catalog, LoadError};
use crate::model::Catalog;
use crate::render::{self, ImageSizes};

use super::state::AppState;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub id: Option<String>,
}

// Landing page with the project grid
pub async fn index_html(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    match load_catalog(&state.settings.data_file).await {
        Ok(catalog) => (StatusCode::OK, Html(render::grid_page(&catalog, &state.site))),
        Err(e) => {
            error!("Error loading projects: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::grid_error_page(PROJECTS_LOAD_ERROR, &state.site)),
            )
        }
    }
}

// Detail page: project.html?id=<id>
pub async fn project_html(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> (StatusCode, Html<String>) {
    let catalog = match load_catalog(&state.settings.data_file).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Error loading project: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::message_page(PROJECT_LOAD_ERROR, &state.site)),
            );
        }
    };

    let project = match find_project(&catalog, query.id.as_deref()) {
        Ok(project) => project,
        Err(e @ LoadError::NotFound(_)) => {
            warn!("{}", e);
            return (
                StatusCode::NOT_FOUND,
                Html(render::message_page(PROJECT_NOT_FOUND, &state.site)),
            );
        }
        Err(e) => {
            error!("Error loading project: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::message_page(PROJECT_LOAD_ERROR, &state.site)),
            );
        }
    };

    let sources = assets::gallery_sources(project);
    let site_dir = state.settings.site_dir.clone();
    let sizes = tokio::task::spawn_blocking(move || assets::probe_sizes(&site_dir, &sources))
        .await
        .unwrap_or_else(|e| {
            warn!("Image size probe failed: {}", e);
            ImageSizes::new()
        });

    (
        StatusCode::OK,
        Html(render::project_page(project, &catalog, &sizes, &state.site)),
    )
}

// The parsed data document, for clients that want raw JSON
pub async fn projects_json(State(state): State<AppState>) -> Result<Json<Catalog>, StatusCode> {
    load_catalog(&state.settings.data_file).await.map(Json).map_err(|e| {
        error!("Error loading projects: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Grid-card thumbnail generated on demand from a site image
pub async fn thumbnail_image(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response, StatusCode> {
    let site_dir = state.settings.site_dir.clone();
    let width = state.settings.thumbnail_width;
    let requested = path.clone();

    let jpeg_data = tokio::task::spawn_blocking(move || assets::thumbnail(&site_dir, &requested, width))
        .await
        .map_err(|e| {
            error!("Thumbnail task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| match e {
            AssetError::Forbidden(_) => StatusCode::FORBIDDEN,
            AssetError::NotFound(_) => StatusCode::NOT_FOUND,
            other => {
                error!("Failed to create thumbnail for {}: {}", path, other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        jpeg_data,
    )
        .into_response())
}

// Stylesheet and the lightbox wasm bundle, embedded at build time
pub async fn static_asset(AxumPath(path): AxumPath<String>) -> Result<Response, StatusCode> {
    let content = Asset::get(&path).ok_or(StatusCode::NOT_FOUND)?;
    let content_type = assets::mime_type(Path::new(&path));
    Ok(([(header::CONTENT_TYPE, content_type)], content.data.into_owned()).into_response())
}
