//! Browser host for the lightbox. Binds the overlay markup emitted by
//! `render::lightbox_overlay` to a [`Lightbox`] and applies its effects to
//! the DOM. Also wires the copy-email link on the landing page.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent, Node};

use crate::constants::{
    EMAIL_LINK_ID, GALLERY_IMAGE_SELECTOR, LIGHTBOX_ACTIVE_CLASS, LIGHTBOX_CLASS, LIGHTBOX_FIT_MAX_HEIGHT,
    LIGHTBOX_FIT_MAX_WIDTH, TOAST_ELEMENT_ID, TOAST_MS, TOAST_VISIBLE_CLASS,
};
use crate::lightbox::{Effect, Event, ImageSizing, Key, Lightbox, OverlayTarget, Point, Size, View};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["navigator", "clipboard"], js_name = writeText)]
    fn write_clipboard_text(text: &str) -> Result<js_sys::Promise, JsValue>;
}

struct Host {
    core: RefCell<Lightbox>,
    overlay: HtmlElement,
    container: HtmlElement,
    inner: HtmlElement,
    image: HtmlImageElement,
    close_button: Element,
    controls: Element,
    zoom_label: Element,
    body: Option<HtmlElement>,
}

fn find<T: JsCast>(root: &Element, selector: &str) -> Result<T, JsValue> {
    root.query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("lightbox: missing {}", selector)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("lightbox: unexpected element for {}", selector)))
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(web_sys::Event) + 'static) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    callback.forget();
    Ok(())
}

impl Host {
    fn new(document: &Document, overlay: Element) -> Result<Self, JsValue> {
        Ok(Self {
            core: RefCell::new(Lightbox::new()),
            container: find(&overlay, ".lightbox-image-container")?,
            inner: find(&overlay, ".lightbox-image-inner")?,
            image: find(&overlay, "img")?,
            close_button: find(&overlay, ".lightbox-close")?,
            controls: find(&overlay, ".lightbox-controls")?,
            zoom_label: find(&overlay, ".lightbox-zoom-level")?,
            body: document.body(),
            overlay: overlay
                .dyn_into::<HtmlElement>()
                .map_err(|_| JsValue::from_str("lightbox: overlay is not an HTML element"))?,
        })
    }

    fn dispatch(self: &Rc<Self>, event: Event) -> Vec<Effect> {
        let effects = self.core.borrow_mut().dispatch(event);
        for effect in &effects {
            self.apply(effect);
        }
        effects
    }

    fn apply(self: &Rc<Self>, effect: &Effect) {
        match effect {
            Effect::ShowImage { src, alt } => {
                self.image.set_src(src);
                self.image.set_alt(alt);
            }
            Effect::SetVisible(visible) => {
                let classes = self.overlay.class_list();
                let _ = if *visible {
                    classes.add_1(LIGHTBOX_ACTIVE_CLASS)
                } else {
                    classes.remove_1(LIGHTBOX_ACTIVE_CLASS)
                };
            }
            Effect::SetPageScrollLocked(locked) => {
                if let Some(body) = &self.body {
                    set_style(body, "overflow", if *locked { "hidden" } else { "" });
                }
            }
            Effect::Render(view) => self.render(view),
            Effect::MeasureBaseSize => self.schedule_measure(),
            Effect::SetScroll(p) => {
                self.container.set_scroll_left(p.x.round() as i32);
                self.container.set_scroll_top(p.y.round() as i32);
            }
            Effect::SetCursor(cursor) => set_style(&self.container, "cursor", cursor.css()),
            Effect::PreventDefault => {}
        }
    }

    fn render(&self, view: &View) {
        self.zoom_label.set_text_content(Some(view.zoom_label.as_str()));
        let image: &HtmlElement = &self.image;
        match view.sizing {
            Some(ImageSizing::Fit) => {
                set_style(image, "width", "");
                set_style(image, "height", "");
                set_style(image, "max-width", LIGHTBOX_FIT_MAX_WIDTH);
                set_style(image, "max-height", LIGHTBOX_FIT_MAX_HEIGHT);
                set_style(&self.inner, "width", "");
                set_style(&self.inner, "height", "");
                set_style(&self.container, "justify-content", "center");
                set_style(&self.container, "align-items", "center");
            }
            Some(ImageSizing::Explicit(size)) => {
                let width = format!("{}px", size.width);
                let height = format!("{}px", size.height);
                set_style(&self.inner, "width", &width);
                set_style(&self.inner, "height", &height);
                set_style(image, "width", &width);
                set_style(image, "height", &height);
                set_style(image, "max-width", "none");
                set_style(image, "max-height", "none");
                set_style(&self.container, "justify-content", "flex-start");
                set_style(&self.container, "align-items", "flex-start");
            }
            None => {}
        }
        set_style(&self.container, "cursor", view.cursor.css());
    }

    // The fit size is only known after layout, so read it on the next frame.
    fn schedule_measure(self: &Rc<Self>) {
        let host = Rc::clone(self);
        let src = self.image.src();
        let callback = Closure::once_into_js(move || {
            let size = Size::new(
                f64::from(host.image.offset_width()),
                f64::from(host.image.offset_height()),
            );
            host.dispatch(Event::BaseSizeMeasured { src, size: Some(size).filter(|s| !s.is_empty()) });
        });
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(callback.unchecked_ref());
        }
    }

    fn report_viewport(self: &Rc<Self>) {
        let size = Size::new(
            f64::from(self.container.client_width()),
            f64::from(self.container.client_height()),
        );
        if !size.is_empty() {
            self.dispatch(Event::ViewportResized(size));
        }
    }

    fn pointer(&self, event: &web_sys::Event) -> Option<Point> {
        let mouse = event.dyn_ref::<MouseEvent>()?;
        Some(Point::new(
            f64::from(mouse.page_x() - self.container.offset_left()),
            f64::from(mouse.page_y() - self.container.offset_top()),
        ))
    }

    fn overlay_target(&self, event: &web_sys::Event) -> OverlayTarget {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
            return OverlayTarget::Image;
        };
        if self.overlay.is_same_node(Some(&target)) {
            OverlayTarget::Background
        } else if self.close_button.is_same_node(Some(&target)) {
            OverlayTarget::CloseButton
        } else if self.controls.contains(Some(&target)) {
            OverlayTarget::Controls
        } else {
            OverlayTarget::Image
        }
    }

    fn install(self: &Rc<Self>, document: &Document) -> Result<(), JsValue> {
        // Gallery images anywhere in the page
        let host = Rc::clone(self);
        listen(document, "click", move |e| {
            let Some(image) = e.target().and_then(|t| t.dyn_into::<HtmlImageElement>().ok()) else {
                return;
            };
            let in_gallery = image.matches(GALLERY_IMAGE_SELECTOR).unwrap_or(false);
            host.dispatch(Event::ImageClicked { src: image.src(), alt: image.alt(), in_gallery });
        })?;

        let host = Rc::clone(self);
        listen(&self.image, "load", move |_| {
            host.report_viewport();
            host.dispatch(Event::ImageLoaded { src: host.image.src() });
        })?;

        for (selector, event) in [
            (".zoom-in", Event::ZoomIn),
            (".zoom-out", Event::ZoomOut),
            (".zoom-reset", Event::ZoomReset),
        ] {
            let button: Element = find(&self.overlay, selector)?;
            let host = Rc::clone(self);
            listen(&button, "click", move |e| {
                e.stop_propagation();
                host.dispatch(event.clone());
            })?;
        }

        let host = Rc::clone(self);
        listen(&self.overlay, "click", move |e| {
            let target = host.overlay_target(&e);
            host.dispatch(Event::OverlayClicked(target));
        })?;

        let host = Rc::clone(self);
        listen(document, "keydown", move |e| {
            let Some(key) = e.dyn_ref::<KeyboardEvent>().map(|k| Key::from_key_name(&k.key())) else {
                return;
            };
            if host.dispatch(Event::KeyDown(key)).contains(&Effect::PreventDefault) {
                e.prevent_default();
            }
        })?;

        let host = Rc::clone(self);
        listen(&self.container, "mousedown", move |e| {
            if let Some(p) = host.pointer(&e) {
                host.dispatch(Event::PointerDown(p));
            }
        })?;

        let host = Rc::clone(self);
        listen(&self.container, "mousemove", move |e| {
            if let Some(p) = host.pointer(&e) {
                if host.dispatch(Event::PointerMove(p)).contains(&Effect::PreventDefault) {
                    e.prevent_default();
                }
            }
        })?;

        let host = Rc::clone(self);
        listen(&self.container, "mouseup", move |_| {
            host.dispatch(Event::PointerUp);
        })?;

        let host = Rc::clone(self);
        listen(&self.container, "mouseleave", move |_| {
            host.dispatch(Event::PointerLeave);
        })?;

        let host = Rc::clone(self);
        listen(&self.container, "scroll", move |_| {
            let p = Point::new(
                f64::from(host.container.scroll_left()),
                f64::from(host.container.scroll_top()),
            );
            host.dispatch(Event::Scrolled(p));
        })?;

        if let Some(window) = web_sys::window() {
            let host = Rc::clone(self);
            listen(&window, "resize", move |_| host.report_viewport())?;
        }

        Ok(())
    }
}

async fn copy_to_clipboard(text: &str) -> Result<(), JsValue> {
    JsFuture::from(write_clipboard_text(text)?).await.map(|_| ())
}

fn show_toast(toast: &Element) {
    let _ = toast.class_list().add_1(TOAST_VISIBLE_CLASS);
    let toast = toast.clone();
    let hide = Closure::once_into_js(move || {
        let _ = toast.class_list().remove_1(TOAST_VISIBLE_CLASS);
    });
    if let Some(window) = web_sys::window() {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), TOAST_MS);
    }
}

// Clicking the contact address copies it instead of opening a mail client.
fn install_email_copy(document: &Document) -> Result<(), JsValue> {
    let (Some(link), Some(toast)) = (
        document.get_element_by_id(EMAIL_LINK_ID),
        document.get_element_by_id(TOAST_ELEMENT_ID),
    ) else {
        return Ok(());
    };
    let email = link
        .get_attribute("data-email")
        .or_else(|| link.text_content())
        .unwrap_or_default();

    listen(&link, "click", move |e| {
        e.prevent_default();
        let email = email.clone();
        let toast = toast.clone();
        spawn_local(async move {
            match copy_to_clipboard(&email).await {
                Ok(()) => show_toast(&toast),
                Err(err) => web_sys::console::error_2(&JsValue::from_str("Failed to copy email:"), &err),
            }
        });
    })
}

/// Entry point run when the module is loaded. Each page gets only the
/// behaviour whose markup it contains.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };
    install_email_copy(&document)?;

    let Some(overlay) = document.query_selector(&format!(".{}", LIGHTBOX_CLASS))? else {
        return Ok(());
    };
    let host = Rc::new(Host::new(&document, overlay)?);
    host.install(&document)
}
