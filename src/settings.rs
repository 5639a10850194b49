use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_DATA_FILE, DEFAULT_OWNER_NAME, DEFAULT_PORT, DEFAULT_THUMBNAIL_WIDTH};
use crate::render::SiteInfo;

pub const CONFIG_FILE_NAME: &str = "portfolio.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub site_dir: PathBuf,
    pub port: u16,
    pub owner_name: String,
    pub contact_email: Option<String>,
    pub thumbnail_width: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            site_dir: PathBuf::from("."),
            port: DEFAULT_PORT,
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            contact_email: None,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
        }
    }
}

impl Settings {
    /// Loads `portfolio.ini` from the first place it exists. On a first run
    /// a default file is written next to the executable.
    pub fn load() -> Result<Self> {
        Self::load_or_create(&Self::config_candidates())
    }

    pub fn load_or_create(candidates: &[PathBuf]) -> Result<Self> {
        if let Some(path) = candidates.iter().find(|p| p.exists()) {
            return Self::load_from(path);
        }
        let Some(path) = candidates.first() else {
            return Ok(Settings::default());
        };
        match Settings::default().save(path) {
            Ok(()) => {
                tracing::info!("Wrote default settings to {}", path.display());
                Self::load_from(path)
            }
            Err(e) => {
                tracing::warn!("Could not write default settings: {:#}", e);
                Ok(Settings::default())
            }
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file {}", config_path.display()))?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().trim_matches('"').to_string());
            }
        }

        let mut settings = Settings::default();
        if let Some(data_file) = config_map.get("data_file") {
            settings.data_file = PathBuf::from(data_file);
        }
        if let Some(site_dir) = config_map.get("site_dir") {
            settings.site_dir = PathBuf::from(site_dir);
        }
        if let Some(port_str) = config_map.get("port") {
            if let Ok(port) = port_str.parse::<u16>() {
                settings.port = port;
            }
        }
        if let Some(owner_name) = config_map.get("owner_name") {
            settings.owner_name = owner_name.clone();
        }
        if let Some(email) = config_map.get("contact_email").filter(|e| !e.is_empty()) {
            settings.contact_email = Some(email.clone());
        }
        if let Some(width_str) = config_map.get("thumbnail_width") {
            if let Ok(width) = width_str.parse::<u32>() {
                if width > 0 {
                    settings.thumbnail_width = width;
                }
            }
        }

        // Relative data paths are taken relative to the config file
        if let Some(base) = config_path.parent() {
            if settings.data_file.is_relative() {
                settings.data_file = base.join(&settings.data_file);
            }
            if settings.site_dir.is_relative() {
                settings.site_dir = base.join(&settings.site_dir);
            }
        }

        Ok(settings)
    }

    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# Portfolio site configuration\n");
        content.push_str(&format!("data_file = \"{}\"\n", self.data_file.display()));
        content.push_str(&format!("site_dir = \"{}\"\n", self.site_dir.display()));
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("owner_name = \"{}\"\n", self.owner_name));
        if let Some(ref email) = self.contact_email {
            content.push_str(&format!("contact_email = \"{}\"\n", email));
        }
        content.push_str(&format!("thumbnail_width = {}\n", self.thumbnail_width));

        std::fs::write(config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    pub fn site_info(&self) -> SiteInfo {
        SiteInfo {
            owner_name: self.owner_name.clone(),
            contact_email: self.contact_email.clone(),
            thumbnail_route: Some("/thumbnail/".to_string()),
        }
    }

    /// Next to the executable first (with cargo's `target/<profile>` stripped),
    /// then the working directory.
    pub fn config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
            let mut dir = dir;
            if dir.ends_with("target/debug") || dir.ends_with("target/release") {
                dir.pop();
                dir.pop();
            }
            candidates.push(dir.join(CONFIG_FILE_NAME));
        }
        candidates.push(PathBuf::from(CONFIG_FILE_NAME));
        candidates
    }
}
