use std::sync::Arc;

use crate::render::SiteInfo;
use crate::settings::Settings;

// Read-only state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub site: Arc<SiteInfo>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let site = settings.site_info();
        Self {
            settings: Arc::new(settings),
            site: Arc::new(site),
        }
    }
}
