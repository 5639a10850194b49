use crate::constants::{MAX_ZOOM_STEPS, MIN_ZOOM, ZOOM_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn scaled(&self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// Zoom level kept as a step count so it is always an exact multiple of 0.25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Zoom(u8);

impl Zoom {
    pub const FIT: Zoom = Zoom(0);

    pub fn level(self) -> f64 {
        MIN_ZOOM + f64::from(self.0) * ZOOM_STEP
    }

    pub fn zoom_in(self) -> Zoom {
        Zoom((self.0 + 1).min(MAX_ZOOM_STEPS))
    }

    pub fn zoom_out(self) -> Zoom {
        Zoom(self.0.saturating_sub(1))
    }

    pub fn is_fit(self) -> bool {
        self.0 == 0
    }

    /// "100%", "125%", ...
    pub fn label(self) -> String {
        format!("{}%", (self.level() * 100.0).round() as u32)
    }
}

/// Where the viewer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    OpenFit,
    OpenZoomed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightboxState {
    pub open: bool,
    pub image: Option<ImageRef>,
    pub image_loaded: bool,
    pub zoom: Zoom,
    pub is_panning: bool,
    pub pan_origin: Point,
    pub scroll_origin: Point,
    pub scroll: Point,
    pub base_size: Option<Size>,
    pub viewport: Option<Size>,
}

impl LightboxState {
    pub fn phase(&self) -> Phase {
        match (self.open, self.zoom.is_fit()) {
            (false, _) => Phase::Closed,
            (true, true) => Phase::OpenFit,
            (true, false) => Phase::OpenZoomed,
        }
    }

    /// Whether `src` is the image the viewer is showing.
    pub fn is_current(&self, src: &str) -> bool {
        self.image.as_ref().is_some_and(|image| image.src == src)
    }

    /// Pixel size of the image at the current zoom, when the base is known.
    pub fn displayed_size(&self) -> Option<Size> {
        self.base_size.map(|base| base.scaled(self.zoom.level()))
    }

    /// Largest scroll offset the zoomed image allows. Unbounded while the
    /// viewport or base size is unknown.
    pub fn max_scroll(&self) -> Option<Point> {
        let displayed = self.displayed_size()?;
        let viewport = self.viewport?;
        Some(Point::new(
            (displayed.width - viewport.width).max(0.0),
            (displayed.height - viewport.height).max(0.0),
        ))
    }

    pub fn clamp_scroll(&self, p: Point) -> Point {
        let mut x = p.x.max(0.0);
        let mut y = p.y.max(0.0);
        if let Some(max) = self.max_scroll() {
            x = x.min(max.x);
            y = y.min(max.y);
        }
        Point::new(x, y)
    }

    /// Back to the state a fresh open starts from, keeping what the host
    /// told us about the viewport.
    pub fn reset(&mut self) {
        let viewport = self.viewport;
        *self = LightboxState {
            viewport,
            ..LightboxState::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_levels_step_by_quarter_and_clamp() {
        let mut zoom = Zoom::FIT;
        let mut seen = vec![zoom.level()];
        for _ in 0..6 {
            zoom = zoom.zoom_in();
            seen.push(zoom.level());
        }
        assert_eq!(seen, vec![1.0, 1.25, 1.5, 1.75, 2.0, 2.0, 2.0]);
        assert_eq!(Zoom::FIT.zoom_out(), Zoom::FIT);
    }

    #[test]
    fn labels_are_rounded_percentages() {
        assert_eq!(Zoom::FIT.label(), "100%");
        assert_eq!(Zoom::FIT.zoom_in().label(), "125%");
        assert_eq!(Zoom::FIT.zoom_in().zoom_in().zoom_in().zoom_in().label(), "200%");
    }

    #[test]
    fn displayed_size_scales_the_base() {
        let state = LightboxState {
            base_size: Some(Size::new(400.0, 300.0)),
            zoom: Zoom::FIT.zoom_in().zoom_in(),
            ..Default::default()
        };
        assert_eq!(state.displayed_size(), Some(Size::new(600.0, 450.0)));
    }

    #[test]
    fn scroll_is_clamped_to_the_overflow() {
        let state = LightboxState {
            base_size: Some(Size::new(400.0, 300.0)),
            viewport: Some(Size::new(500.0, 400.0)),
            zoom: Zoom::FIT.zoom_in().zoom_in().zoom_in().zoom_in(),
            ..Default::default()
        };
        assert_eq!(state.clamp_scroll(Point::new(-5.0, 1000.0)), Point::new(0.0, 200.0));
    }

    #[test]
    fn reset_keeps_viewport_only() {
        let mut state = LightboxState {
            open: true,
            zoom: Zoom::FIT.zoom_in(),
            scroll: Point::new(3.0, 4.0),
            viewport: Some(Size::new(800.0, 600.0)),
            ..Default::default()
        };
        state.reset();
        assert_eq!(state.phase(), Phase::Closed);
        assert_eq!(state.zoom, Zoom::FIT);
        assert_eq!(state.scroll, Point::ORIGIN);
        assert_eq!(state.viewport, Some(Size::new(800.0, 600.0)));
    }
}
