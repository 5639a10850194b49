use super::state::{ImageRef, LightboxState, Phase, Point, Size, Zoom};
use crate::constants::PAN_SPEED;

/// What a click on the open overlay landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTarget {
    Background,
    CloseButton,
    Image,
    Controls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ZoomIn,
    ZoomOut,
    Reset,
    Cancel,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Key {
        match name {
            "+" | "=" => Key::ZoomIn,
            "-" => Key::ZoomOut,
            "0" => Key::Reset,
            "Escape" => Key::Cancel,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageSizing {
    /// Bounded by the viewport, centered.
    Fit,
    /// Explicit pixel dimensions, anchored top-left so it can be scrolled.
    Explicit(Size),
}

/// Everything the host needs to redraw the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub zoom_label: String,
    /// `None` leaves the current sizing untouched.
    pub sizing: Option<ImageSizing>,
    pub cursor: Cursor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ImageClicked { src: String, alt: String, in_gallery: bool },
    /// The viewer image finished loading `src`.
    ImageLoaded { src: String },
    /// Fit-view size measured for `src`; `None` when it could not be read.
    BaseSizeMeasured { src: String, size: Option<Size> },
    ViewportResized(Size),
    Scrolled(Point),
    ZoomIn,
    ZoomOut,
    ZoomReset,
    OverlayClicked(OverlayTarget),
    KeyDown(Key),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowImage { src: String, alt: String },
    SetVisible(bool),
    SetPageScrollLocked(bool),
    Render(View),
    /// Measure the rendered image on the next frame and report back with
    /// `Event::BaseSizeMeasured`.
    MeasureBaseSize,
    SetScroll(Point),
    SetCursor(Cursor),
    PreventDefault,
}

/// The lightbox interaction core. Owns its state; the host feeds it events
/// and applies the returned effects in order.
#[derive(Debug, Clone, Default)]
pub struct Lightbox {
    state: LightboxState,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LightboxState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let phase = self.state.phase();
        tracing::trace!(?phase, ?event, "lightbox event");

        match (phase, event) {
            (_, Event::ViewportResized(size)) => {
                self.state.viewport = Some(size);
                Vec::new()
            }
            (_, Event::ImageClicked { src, alt, in_gallery: true }) => self.open(src, alt),
            (_, Event::ImageClicked { .. }) => Vec::new(),

            (Phase::Closed, _) => Vec::new(),

            // Reports for an image that has since been replaced are stale
            (_, Event::ImageLoaded { src }) if self.state.is_current(&src) => {
                self.state.image_loaded = true;
                self.render()
            }
            (_, Event::ImageLoaded { .. }) => Vec::new(),
            (Phase::OpenFit, Event::BaseSizeMeasured { src, size: Some(size) })
                if !size.is_empty() && self.state.is_current(&src) =>
            {
                self.state.base_size = Some(size);
                Vec::new()
            }
            (_, Event::BaseSizeMeasured { .. }) => Vec::new(),
            (_, Event::Scrolled(p)) => {
                self.state.scroll = p;
                Vec::new()
            }

            (_, Event::ZoomIn) => self.set_zoom(self.state.zoom.zoom_in()),
            (_, Event::ZoomOut) => self.set_zoom(self.state.zoom.zoom_out()),
            (_, Event::ZoomReset) => self.set_zoom(Zoom::FIT),

            (_, Event::OverlayClicked(OverlayTarget::Background | OverlayTarget::CloseButton)) => {
                self.close()
            }
            (_, Event::OverlayClicked(_)) => Vec::new(),

            (_, Event::KeyDown(key)) => self.key(key),

            (Phase::OpenZoomed, Event::PointerDown(p)) => {
                self.state.is_panning = true;
                self.state.pan_origin = p;
                self.state.scroll_origin = self.state.scroll;
                vec![Effect::SetCursor(Cursor::Grabbing)]
            }
            (_, Event::PointerDown(_)) => Vec::new(),
            (_, Event::PointerMove(p)) if self.state.is_panning => self.pan_to(p),
            (_, Event::PointerMove(_)) => Vec::new(),
            (phase, Event::PointerUp | Event::PointerLeave) => {
                self.state.is_panning = false;
                if phase == Phase::OpenZoomed {
                    vec![Effect::SetCursor(Cursor::Grab)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn open(&mut self, src: String, alt: String) -> Vec<Effect> {
        self.state.reset();
        self.state.open = true;
        self.state.image = Some(ImageRef { src: src.clone(), alt: alt.clone() });

        let mut effects = vec![
            Effect::ShowImage { src, alt },
            Effect::SetVisible(true),
            Effect::SetPageScrollLocked(true),
        ];
        effects.extend(self.render());
        effects
    }

    fn close(&mut self) -> Vec<Effect> {
        self.state.reset();
        let mut effects = vec![Effect::SetVisible(false), Effect::SetPageScrollLocked(false)];
        effects.extend(self.render());
        effects
    }

    fn key(&mut self, key: Key) -> Vec<Effect> {
        let effects = match key {
            Key::ZoomIn => self.set_zoom(self.state.zoom.zoom_in()),
            Key::ZoomOut => self.set_zoom(self.state.zoom.zoom_out()),
            Key::Reset => self.set_zoom(Zoom::FIT),
            Key::Cancel => self.close(),
            Key::Other => return Vec::new(),
        };
        let mut out = vec![Effect::PreventDefault];
        out.extend(effects);
        out
    }

    fn set_zoom(&mut self, zoom: Zoom) -> Vec<Effect> {
        self.state.zoom = zoom;
        self.render()
    }

    fn pan_to(&mut self, p: Point) -> Vec<Effect> {
        let origin = self.state.pan_origin;
        let start = self.state.scroll_origin;
        let walk = Point::new((p.x - origin.x) * PAN_SPEED, (p.y - origin.y) * PAN_SPEED);
        let scroll = self.state.clamp_scroll(Point::new(start.x - walk.x, start.y - walk.y));
        self.state.scroll = scroll;
        vec![Effect::PreventDefault, Effect::SetScroll(scroll)]
    }

    // Fit view drops pan state and scroll; zoomed view sizes from the base,
    // never from what is currently on screen.
    fn render(&mut self) -> Vec<Effect> {
        let zoom = self.state.zoom;
        let zoom_label = zoom.label();

        if zoom.is_fit() {
            self.state.is_panning = false;
            self.state.scroll = Point::ORIGIN;
            let mut effects = vec![
                Effect::Render(View {
                    zoom_label,
                    sizing: Some(ImageSizing::Fit),
                    cursor: Cursor::Default,
                }),
                Effect::SetScroll(Point::ORIGIN),
            ];
            if self.state.open && self.state.image_loaded {
                effects.push(Effect::MeasureBaseSize);
            }
            return effects;
        }

        match self.state.displayed_size() {
            Some(size) => {
                let mut effects = vec![Effect::Render(View {
                    zoom_label,
                    sizing: Some(ImageSizing::Explicit(size)),
                    cursor: Cursor::Grab,
                })];
                let clamped = self.state.clamp_scroll(self.state.scroll);
                if clamped != self.state.scroll {
                    self.state.scroll = clamped;
                    effects.push(Effect::SetScroll(clamped));
                }
                effects
            }
            None => vec![Effect::Render(View {
                zoom_label,
                sizing: None,
                cursor: Cursor::Default,
            })],
        }
    }
}
