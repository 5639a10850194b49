// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// Data
pub const DEFAULT_DATA_FILE: &str = "projects.json";
pub const DEFAULT_OWNER_NAME: &str = "Portfolio";

// Grid thumbnails: only downscale, never upscale, aspect ratio preserved
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 600;
pub const THUMBNAIL_JPEG_QUALITY: u8 = 85;

// Lightbox zoom: 100%..200% in 25% steps
pub const ZOOM_STEP: f64 = 0.25;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM_STEPS: u8 = 4;

// Dragging moves the image twice as far as the pointer
pub const PAN_SPEED: f64 = 2.0;

// DOM hooks shared by the renderer and the browser host
pub const GRID_ELEMENT_ID: &str = "projects-grid";
pub const CONTENT_ELEMENT_ID: &str = "project-content";
pub const GALLERY_IMAGE_SELECTOR: &str = ".gallery-image img";
pub const LIGHTBOX_CLASS: &str = "lightbox";
pub const LIGHTBOX_ACTIVE_CLASS: &str = "active";
// Fit-view bounds of the image; must not exceed the 92vw x 84vh container
pub const LIGHTBOX_FIT_MAX_WIDTH: &str = "90vw";
pub const LIGHTBOX_FIT_MAX_HEIGHT: &str = "84vh";

// Copy-email link and its toast
pub const EMAIL_LINK_ID: &str = "email-link";
pub const TOAST_ELEMENT_ID: &str = "toast";
pub const TOAST_VISIBLE_CLASS: &str = "show";
pub const TOAST_MESSAGE: &str = "Email copied to clipboard!";
pub const TOAST_MS: i32 = 3000;

// Error fragments
pub const PROJECT_NOT_FOUND: &str = "Project not found.";
pub const PROJECT_LOAD_ERROR: &str = "Error loading project.";
pub const PROJECTS_LOAD_ERROR: &str = "Error loading projects.";
