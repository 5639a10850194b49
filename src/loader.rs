use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::{Catalog, Project};

/// The two ways a page can fail to get its data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Fetch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed project data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no project with id {0:?}")]
    NotFound(String),
}

pub fn parse_catalog(text: &str) -> Result<Catalog, LoadError> {
    Ok(serde_json::from_str(text)?)
}

/// Reads and parses the data file. Called once per page request.
#[cfg(not(target_arch = "wasm32"))]
pub async fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Fetch {
            path: path.to_path_buf(),
            source,
        })?;
    let catalog = parse_catalog(&text)?;
    tracing::debug!("Loaded {} projects from {}", catalog.projects.len(), path.display());
    Ok(catalog)
}

pub fn find_project<'a>(catalog: &'a Catalog, id: Option<&str>) -> Result<&'a Project, LoadError> {
    let id = id.unwrap_or_default();
    catalog
        .find(id)
        .ok_or_else(|| LoadError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_catalog_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"projects":[{{"id":"a","title":"A"}}]}}"#).unwrap();

        let catalog = load_catalog(file.path()).await.unwrap();
        assert_eq!(catalog.projects.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"projects\": [").unwrap();

        let err = load_catalog(file.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn unknown_or_missing_id_is_not_found() {
        let catalog = parse_catalog(r#"{"projects":[{"id":"a","title":"A"}]}"#).unwrap();
        assert_eq!(find_project(&catalog, Some("a")).unwrap().title, "A");
        assert!(matches!(
            find_project(&catalog, Some("b")),
            Err(LoadError::NotFound(id)) if id == "b"
        ));
        assert!(matches!(find_project(&catalog, None), Err(LoadError::NotFound(_))));
    }
}
