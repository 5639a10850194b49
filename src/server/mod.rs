use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{index_html, project_html, projects_json, static_asset, thumbnail_image};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Images, videos and anything else the data file points at
    let site_files = ServeDir::new(&state.settings.site_dir);

    Router::new()
        .route("/", get(index_html))
        .route("/index.html", get(index_html))
        .route("/project.html", get(project_html))
        .route("/projects.json", get(projects_json))
        .route("/thumbnail/*path", get(thumbnail_image))
        .route("/static/*path", get(static_asset))
        .fallback_service(site_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let port = state.settings.port;
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running at http://{}", addr);
    info!("  GET /                      - project grid");
    info!("  GET /project.html?id=<id>  - project detail");
    info!("  GET /projects.json         - project data");
    info!("  GET /thumbnail/<path>      - grid thumbnail");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::path::Path;
    use tower::ServiceExt;

    const DATA: &str = r#"{"projects":[
        {"id":"alpha","title":"Alpha","description":"First project","tags":["Rust"],
         "sections":[{"type":"gallery","layout":"grid","images":[{"src":"img/a.png","alt":"A","caption":"Shot"}]}]},
        {"id":"beta","title":"Beta","description":"Second project"}
    ]}"#;

    fn app_with(dir: &Path, data: Option<&str>) -> Router {
        if let Some(data) = data {
            std::fs::write(dir.join("projects.json"), data).unwrap();
        }
        std::fs::create_dir_all(dir.join("img")).unwrap();
        image::RgbImage::from_pixel(64, 32, image::Rgb([0, 0, 0]))
            .save(dir.join("img/a.png"))
            .unwrap();

        let settings = Settings {
            data_file: dir.join("projects.json"),
            site_dir: dir.to_path_buf(),
            owner_name: "Test Owner".into(),
            thumbnail_width: 16,
            ..Settings::default()
        };
        create_app(AppState::new(settings))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn grid_lists_projects() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app_with(dir.path(), Some(DATA)), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("href=\"project.html?id=alpha\""));
        assert!(body.contains("href=\"project.html?id=beta\""));
    }

    #[tokio::test]
    async fn detail_page_renders_sections_with_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app_with(dir.path(), Some(DATA)), "/project.html?id=alpha").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Alpha - Test Owner</title>"));
        assert!(body.contains("<img src=\"img/a.png\" alt=\"A\" width=\"64\" height=\"32\">"));
        assert!(body.contains("class=\"nav-project next-project\""));
    }

    #[tokio::test]
    async fn unknown_project_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app_with(dir.path(), Some(DATA)), "/project.html?id=gamma").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<p>Project not found.</p>"));
        assert!(!body.contains("project-hero"));

        let (status, _) = get(app_with(dir.path(), None), "/project.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn broken_data_shows_error_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app_with(dir.path(), Some("{ nope")), "/project.html?id=alpha").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("<p>Error loading project.</p>"));

        let (status, body) = get(app_with(dir.path(), None), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("<p>Error loading projects.</p>"));
    }

    #[tokio::test]
    async fn missing_data_file_shows_error_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app_with(dir.path(), None), "/project.html?id=alpha").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Error loading project."));
    }

    #[tokio::test]
    async fn projects_json_round_trips_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app_with(dir.path(), Some(DATA)), "/projects.json").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["projects"][1]["id"], "beta");
    }

    #[tokio::test]
    async fn thumbnails_are_scaled_jpegs() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), Some(DATA));
        let response = app
            .oneshot(Request::builder().uri("/thumbnail/img/a.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let thumb = image::load_from_memory(&body).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (16, 8));

        let (status, _) = get(app_with(dir.path(), None), "/thumbnail/img/missing.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn site_files_and_static_assets_are_served() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = get(app_with(dir.path(), Some(DATA)), "/img/a.png").await;
        assert_eq!(status, StatusCode::OK);

        let app = app_with(dir.path(), Some(DATA));
        let response = app
            .oneshot(Request::builder().uri("/static/style.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

        let (status, _) = get(app_with(dir.path(), Some(DATA)), "/static/nope.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn fit_image_fits_inside_lightbox_container() {
        use crate::constants::{LIGHTBOX_FIT_MAX_HEIGHT, LIGHTBOX_FIT_MAX_WIDTH};

        let dir = tempfile::tempdir().unwrap();
        let (_, css) = get(app_with(dir.path(), Some(DATA)), "/static/style.css").await;
        let rule = |selector: &str| {
            let start = css.find(&format!("{} {{", selector)).unwrap();
            let end = start + css[start..].find('}').unwrap();
            css[start..end].to_string()
        };
        let container = rule(".lightbox-image-container");
        let image = rule(".lightbox-image-inner img");
        assert!(container.contains(&format!("height: {};", LIGHTBOX_FIT_MAX_HEIGHT)));
        assert!(image.contains(&format!("max-height: {};", LIGHTBOX_FIT_MAX_HEIGHT)));
        assert!(image.contains(&format!("max-width: {};", LIGHTBOX_FIT_MAX_WIDTH)));
    }

    #[tokio::test]
    async fn ids_with_reserved_characters_round_trip_through_links() {
        let dir = tempfile::tempdir().unwrap();
        let data = r#"{"projects":[{"id":"r&d #2","title":"Research"},{"id":"next","title":"Next"}]}"#;
        let (_, grid) = get(app_with(dir.path(), Some(data)), "/").await;
        assert!(grid.contains("href=\"project.html?id=r%26d+%232\""));

        let (status, body) = get(app_with(dir.path(), Some(data)), "/project.html?id=r%26d+%232").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Research - Test Owner</title>"));
    }
}
