//! Full-screen image viewer for gallery images: discrete zoom (100%–200%)
//! and drag-panning.
//!
//! The core is DOM-free. A host turns browser input into [`Event`]s, calls
//! [`Lightbox::dispatch`] and applies the returned [`Effect`]s in order.

mod machine;
mod state;

pub use machine::{Cursor, Effect, Event, ImageSizing, Key, Lightbox, OverlayTarget, View};
pub use state::{ImageRef, LightboxState, Phase, Point, Size, Zoom};
