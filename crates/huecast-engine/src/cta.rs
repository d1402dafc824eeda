//! CTA button lifecycle: create, insert, restyle, resize, click, destroy.
//!
//! The button moves through `absent -> created -> inserted`. Creation is
//! idempotent on the reserved id; destruction removes the element and
//! deregisters the resize handler so nothing stays bound to a dead node.

use huecast_core::config::{CtaConfig, CtaPosition};
use huecast_core::cta::{
    self, CONTENT_CONTAINERS, CTA_BUTTON_ID, HEADER_CANDIDATES, NAV_CONTAINERS,
};
use huecast_core::{ThemeError, ThemeResult};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

/// Transient label while the toggle notification is in flight.
pub const LOADING_TEXT: &str = "Switching...";

/// Fixed user-facing notice after a toggle send. The one-way channel cannot
/// confirm delivery, so this is always shown.
pub const NOTICE_TEXT: &str = "Theme API is unavailable right now";

const NOTICE_ID: &str = "huecast-cta-notice";
const NOTICE_DURATION_MS: i32 = 4000;
const RESTORE_DELAY_MS: i32 = 600;

fn dom_err(context: &str, err: JsValue) -> ThemeError {
    ThemeError::Dom(format!("{context}: {err:?}"))
}

/// Owner of the single CTA button element and its event handlers.
#[derive(Default)]
pub struct CtaManager {
    button: Option<HtmlElement>,
    floating: bool,
    // Stored so the handlers stay alive while registered
    resize_closure: Option<Closure<dyn FnMut()>>,
    click_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl CtaManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(&self) -> Option<&HtmlElement> {
        self.button.as_ref()
    }

    pub fn has_click_handler(&self) -> bool {
        self.click_closure.is_some()
    }

    /// `absent -> created`. If an element with the reserved id already
    /// exists it is reused, never duplicated.
    pub fn ensure_button(
        &mut self,
        document: &Document,
        config: &CtaConfig,
    ) -> ThemeResult<HtmlElement> {
        if let Some(button) = &self.button {
            return Ok(button.clone());
        }

        if let Some(existing) = document.get_element_by_id(CTA_BUTTON_ID) {
            let button: HtmlElement = existing.dyn_into().map_err(|_| {
                ThemeError::Dom("existing CTA element is not an HTML element".to_string())
            })?;
            self.button = Some(button.clone());
            return Ok(button);
        }

        let element = document
            .create_element("button")
            .map_err(|e| dom_err("failed to create CTA button", e))?;
        element.set_id(CTA_BUTTON_ID);
        element
            .set_attribute("type", "button")
            .map_err(|e| dom_err("failed to set button type", e))?;
        let button: HtmlElement = element
            .dyn_into()
            .map_err(|_| ThemeError::Dom("created element is not an HTML element".to_string()))?;
        button.set_text_content(Some(&config.text));

        self.button = Some(button.clone());
        Ok(button)
    }

    /// `created -> inserted`. Header placement lands in the most specific
    /// nav container of the first visible landmark; everything else (or a
    /// page with no landmark) floats at the configured fallback corner.
    pub fn insert(
        &mut self,
        window: &Window,
        document: &Document,
        config: &CtaConfig,
    ) -> ThemeResult<()> {
        let button = self
            .button
            .clone()
            .ok_or_else(|| ThemeError::Dom("CTA button was never created".to_string()))?;

        if !button.is_connected() {
            let slot = if config.position == CtaPosition::Header {
                find_header_slot(window, document)
            } else {
                None
            };
            match slot {
                Some(container) => {
                    container
                        .append_child(&button)
                        .map_err(|e| dom_err("failed to insert CTA button", e))?;
                    self.floating = false;
                }
                None => {
                    let body = document
                        .body()
                        .ok_or_else(|| ThemeError::Dom("document has no body".to_string()))?;
                    body.append_child(&button)
                        .map_err(|e| dom_err("failed to insert CTA button", e))?;
                    self.floating = true;
                }
            }
        }

        self.restyle(config);
        self.update_max_width(window, document);
        self.wire_resize(window)?;
        Ok(())
    }

    /// Re-assert the button's own styling with `!important` priority so
    /// injected styling rules and page CSS cannot repaint it.
    pub fn restyle(&self, config: &CtaConfig) {
        let Some(button) = &self.button else { return };
        let style = button.style();
        for (prop, value) in cta::button_style(config, self.floating) {
            let _ = style.set_property_with_priority(&prop, &value, "important");
        }
    }

    /// Recompute the responsive max-width against the main content
    /// container.
    pub fn update_max_width(&self, window: &Window, document: &Document) {
        let Some(button) = &self.button else { return };
        if let Some(width) = content_width(window, document) {
            let px = cta::max_width_px(width);
            let _ = button.style().set_property("max-width", &format!("{px:.0}px"));
        }
    }

    /// Attach a pre-built click handler. No-op when one is already wired.
    pub fn attach_click(&mut self, closure: Closure<dyn FnMut(web_sys::Event)>) -> ThemeResult<()> {
        if self.click_closure.is_some() {
            return Ok(());
        }
        let button = self
            .button
            .as_ref()
            .ok_or_else(|| ThemeError::Dom("CTA button was never created".to_string()))?;
        button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|e| dom_err("failed to attach click handler", e))?;
        self.click_closure = Some(closure);
        Ok(())
    }

    fn wire_resize(&mut self, window: &Window) -> ThemeResult<()> {
        if self.resize_closure.is_some() {
            return Ok(());
        }
        let Some(button) = self.button.clone() else {
            return Ok(());
        };

        let closure = Closure::wrap(Box::new(move || {
            let Some(window) = web_sys::window() else { return };
            let Some(document) = window.document() else { return };
            if let Some(width) = content_width(&window, &document) {
                let px = cta::max_width_px(width);
                let _ = button.style().set_property("max-width", &format!("{px:.0}px"));
            }
        }) as Box<dyn FnMut()>);

        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| dom_err("failed to attach resize handler", e))?;
        self.resize_closure = Some(closure);
        Ok(())
    }

    /// Tear down: deregister handlers, remove the element, clear the
    /// reference.
    pub fn destroy(&mut self, window: &Window) {
        if let Some(closure) = self.resize_closure.take() {
            let _ = window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
        if let Some(button) = self.button.take() {
            if let Some(closure) = self.click_closure.take() {
                let _ = button
                    .remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            }
            button.remove();
        }
        self.floating = false;
    }
}

/// The click flow: disable, show loading text, send the one-way toggle
/// notification, show the fixed notice, restore after a beat.
pub fn run_click_flow(
    window: &Window,
    document: &Document,
    button: &HtmlElement,
    toggle_endpoint: &str,
    client_id: &str,
    restore_text: &str,
) {
    let _ = button.set_attribute("disabled", "true");
    button.set_text_content(Some(LOADING_TEXT));

    crate::fetch::send_toggle(window, toggle_endpoint, client_id);

    // No acknowledgment can come back over the one-way channel, so the
    // notice is shown unconditionally.
    show_toggle_notice(document);

    let button_for_timer = button.clone();
    let text_for_timer = restore_text.to_string();
    let restore = Closure::once(move || {
        let _ = button_for_timer.remove_attribute("disabled");
        button_for_timer.set_text_content(Some(&text_for_timer));
    });
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        restore.as_ref().unchecked_ref(),
        RESTORE_DELAY_MS,
    ) {
        Ok(_) => restore.forget(),
        Err(_) => {
            let _ = button.remove_attribute("disabled");
            button.set_text_content(Some(restore_text));
        }
    }
}

/// Show the transient toggle notice, reusing the element when one is
/// already on screen.
pub fn show_toggle_notice(document: &Document) {
    let notice = match document.get_element_by_id(NOTICE_ID) {
        Some(existing) => existing,
        None => {
            let Ok(element) = document.create_element("div") else {
                return;
            };
            element.set_id(NOTICE_ID);
            let Some(body) = document.body() else { return };
            if body.append_child(&element).is_err() {
                return;
            }
            element
        }
    };
    notice.set_text_content(Some(NOTICE_TEXT));

    if let Some(html) = notice.dyn_ref::<HtmlElement>() {
        let style = html.style();
        for (prop, value) in [
            ("position", "fixed"),
            ("left", "50%"),
            ("bottom", "24px"),
            ("transform", "translateX(-50%)"),
            ("background", "#212529"),
            ("color", "#ffffff"),
            ("padding", "8px 16px"),
            ("border-radius", "4px"),
            ("font-size", "13px"),
            ("z-index", "2147483001"),
        ] {
            let _ = style.set_property(prop, value);
        }
    }

    let Some(window) = web_sys::window() else { return };
    let notice_clone = notice.clone();
    let dismiss = Closure::once(move || notice_clone.remove());
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            dismiss.as_ref().unchecked_ref(),
            NOTICE_DURATION_MS,
        )
        .is_ok()
    {
        dismiss.forget();
    }
}

/// First visible header/nav landmark, drilled down to its most specific
/// nested navigation container.
fn find_header_slot(window: &Window, document: &Document) -> Option<Element> {
    for candidate in HEADER_CANDIDATES {
        let Ok(Some(landmark)) = document.query_selector(candidate) else {
            continue;
        };
        if !is_visible(window, &landmark) {
            continue;
        }
        for nav_selector in NAV_CONTAINERS {
            if let Ok(Some(nav)) = landmark.query_selector(nav_selector) {
                if is_visible(window, &nav) {
                    return Some(nav);
                }
            }
        }
        return Some(landmark);
    }
    None
}

fn is_visible(window: &Window, element: &Element) -> bool {
    let Some(html) = element.dyn_ref::<HtmlElement>() else {
        return false;
    };
    if html.offset_width() <= 0 && html.offset_height() <= 0 {
        return false;
    }
    if let Ok(Some(style)) = window.get_computed_style(element) {
        let display = style.get_property_value("display").unwrap_or_default();
        let visibility = style.get_property_value("visibility").unwrap_or_default();
        if display == "none" || visibility == "hidden" {
            return false;
        }
    }
    true
}

/// Effective width of the main content container: the lesser of its actual
/// width and any CSS max-width constraint.
fn content_width(window: &Window, document: &Document) -> Option<f64> {
    for selector in CONTENT_CONTAINERS {
        let Ok(Some(element)) = document.query_selector(selector) else {
            continue;
        };
        let actual = element.client_width() as f64;
        if actual <= 0.0 {
            continue;
        }
        let css_max = window
            .get_computed_style(&element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("max-width").ok())
            .and_then(|value| parse_px(&value));
        return Some(cta::effective_width(actual, css_max));
    }
    None
}

fn parse_px(value: &str) -> Option<f64> {
    value.strip_suffix("px")?.trim().parse().ok()
}
