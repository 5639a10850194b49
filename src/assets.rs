use image::{GenericImageView, ImageReader};
use rayon::prelude::*;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::constants::THUMBNAIL_JPEG_QUALITY;
use crate::model::{Project, Section};
use crate::render::{is_local, ImageSizes};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("path escapes the site directory: {0}")]
    Forbidden(String),
    #[error("asset not found: {0}")]
    NotFound(PathBuf),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Simple MIME type detection based on file extension
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("json") => "application/json",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Maps a site-relative URL path onto `site_dir`, refusing anything that
/// could climb out of it.
pub fn resolve(site_dir: &Path, relative: &str) -> Result<PathBuf, AssetError> {
    let relative = relative.trim_start_matches('/');
    let candidate = Path::new(relative);
    let clean = candidate
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if relative.is_empty() || !clean {
        return Err(AssetError::Forbidden(relative.to_string()));
    }
    Ok(site_dir.join(candidate))
}

/// Local gallery image sources of a project, in page order.
pub fn gallery_sources(project: &Project) -> Vec<String> {
    project
        .content_sections()
        .unwrap_or_default()
        .iter()
        .filter_map(|section| match section {
            Section::Gallery { images, .. } => Some(images),
            _ => None,
        })
        .flatten()
        .map(|figure| figure.src.clone())
        .filter(|src| is_local(src))
        .collect()
}

/// Reads the pixel size of each local image from its header. Remote,
/// missing or undecodable images are left out.
pub fn probe_sizes(site_dir: &Path, sources: &[String]) -> ImageSizes {
    sources
        .par_iter()
        .filter_map(|src| {
            let path = resolve(site_dir, src).ok()?;
            match image::image_dimensions(&path) {
                Ok(size) => Some((src.clone(), size)),
                Err(e) => {
                    tracing::debug!("No size for {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect()
}

/// Creates a JPEG thumbnail no wider than `max_width`. Images that are
/// already small enough are re-encoded at their own size.
pub fn thumbnail(site_dir: &Path, relative: &str, max_width: u32) -> Result<Vec<u8>, AssetError> {
    let path = resolve(site_dir, relative)?;
    if !path.is_file() {
        return Err(AssetError::NotFound(path));
    }

    let img = ImageReader::open(&path)?.with_guessed_format()?.decode()?;
    let (width, height) = img.dimensions();
    let scaled = if width > max_width {
        let new_height = ((height as f64) * (max_width as f64) / (width as f64)).round().max(1.0) as u32;
        img.resize(max_width, new_height, image::imageops::FilterType::Triangle)
    } else {
        img
    };

    let rgb = scaled.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, THUMBNAIL_JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_catalog;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 100, 50]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn mime_types_by_extension() {
        assert_eq!(mime_type(Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(mime_type(Path::new("pkg/site_bg.wasm")), "application/wasm");
        assert_eq!(mime_type(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn resolve_rejects_parent_and_absolute_escapes() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve(root, "img/a.png").unwrap(), root.join("img/a.png"));
        assert_eq!(resolve(root, "/img/a.png").unwrap(), root.join("img/a.png"));
        assert!(matches!(resolve(root, "../secret"), Err(AssetError::Forbidden(_))));
        assert!(matches!(resolve(root, "img/../../x"), Err(AssetError::Forbidden(_))));
        assert!(matches!(resolve(root, ""), Err(AssetError::Forbidden(_))));
    }

    #[test]
    fn gallery_sources_skip_remote_images() {
        let catalog = parse_catalog(
            r#"{"projects":[{"id":"a","title":"A","sections":[
                {"type":"gallery","images":[{"src":"img/1.png"},{"src":"https://x.org/2.png"}]},
                {"type":"full-width-image","src":"img/hero.png"},
                {"type":"gallery","images":[{"src":"img/3.png"}]}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(
            gallery_sources(&catalog.projects[0]),
            vec!["img/1.png".to_string(), "img/3.png".to_string()]
        );
    }

    #[test]
    fn probe_reads_sizes_of_existing_images() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 40, 30);

        let sizes = probe_sizes(dir.path(), &["a.png".to_string(), "missing.png".to_string()]);
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes.get("a.png"), Some(&(40, 30)));
    }

    #[test]
    fn thumbnail_downscales_wide_images() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "wide.png", 200, 100);

        let jpeg = thumbnail(dir.path(), "wide.png", 50).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (50, 25));
    }

    #[test]
    fn thumbnail_never_upscales() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "small.png", 20, 10);

        let jpeg = thumbnail(dir.path(), "small.png", 600).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (20, 10));
    }

    #[test]
    fn thumbnail_of_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(thumbnail(dir.path(), "nope.png", 50), Err(AssetError::NotFound(_))));
    }
}
