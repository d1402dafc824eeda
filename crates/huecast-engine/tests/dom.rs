//! Browser-run tests for the DOM glue. Execute with `wasm-pack test
//! --headless --chrome` (or any wasm-bindgen test runner with a browser).

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use huecast_core::cta::CTA_BUTTON_ID;
use huecast_core::events::THEME_ERROR;
use huecast_core::palette::CssVariableSet;
use huecast_core::CtaConfig;
use huecast_engine::cta::CtaManager;
use huecast_engine::{apply, ThemeEngine};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn cta_creation_is_idempotent() {
    let document = document();
    let config = CtaConfig::default();

    let mut manager = CtaManager::new();
    let first = manager.ensure_button(&document, &config).unwrap();
    document.body().unwrap().append_child(&first).unwrap();

    // Same manager: same element back.
    let second = manager.ensure_button(&document, &config).unwrap();
    assert_eq!(first, second);

    // A fresh manager must reuse the element in the document, not
    // duplicate it.
    let mut other = CtaManager::new();
    let reused = other.ensure_button(&document, &config).unwrap();
    assert_eq!(first, reused);
    let count = document
        .query_selector_all(&format!("#{CTA_BUTTON_ID}"))
        .unwrap()
        .length();
    assert_eq!(count, 1);

    first.remove();
}

#[wasm_bindgen_test]
fn apply_then_read_back_round_trips() {
    let document = document();
    let mut set = CssVariableSet::new();
    set.set("--theme-rt-primary", "#00204c");
    set.set("--theme-rt-accent", "#bbaf71");

    apply::apply_variable_set(&document, &set).unwrap();

    assert_eq!(
        apply::read_variable(&document, "--theme-rt-primary").as_deref(),
        Some("#00204c")
    );
    assert_eq!(
        apply::read_variable(&document, "--theme-rt-accent").as_deref(),
        Some("#bbaf71")
    );
}

#[wasm_bindgen_test]
fn apply_merges_by_key_presence() {
    let document = document();

    let mut first = CssVariableSet::new();
    first.set("--theme-merge-a", "#111111");
    first.set("--theme-merge-b", "#222222");
    apply::apply_variable_set(&document, &first).unwrap();

    // A second set that only carries one key overwrites it and leaves the
    // other untouched.
    let mut second = CssVariableSet::new();
    second.set("--theme-merge-a", "#333333");
    apply::apply_variable_set(&document, &second).unwrap();

    assert_eq!(
        apply::read_variable(&document, "--theme-merge-a").as_deref(),
        Some("#333333")
    );
    assert_eq!(
        apply::read_variable(&document, "--theme-merge-b").as_deref(),
        Some("#222222")
    );
}

#[wasm_bindgen_test]
fn header_position_falls_back_to_floating_corner() {
    let window = web_sys::window().unwrap();
    let document = document();

    // The harness page has no header/nav landmark, so a `header` placement
    // must float at the fallback corner instead of being dropped.
    let config = CtaConfig::default();
    let mut manager = CtaManager::new();
    manager.ensure_button(&document, &config).unwrap();
    manager.insert(&window, &document, &config).unwrap();

    let button = manager.button().unwrap().clone();
    let style = button.style();
    assert_eq!(style.get_property_value("position").unwrap(), "fixed");
    assert_eq!(style.get_property_value("top").unwrap(), "20px");
    assert_eq!(style.get_property_value("right").unwrap(), "20px");

    manager.destroy(&window);
    assert!(document.get_element_by_id(CTA_BUTTON_ID).is_none());
}

#[wasm_bindgen_test]
async fn failed_fetch_emits_one_error_and_writes_nothing() {
    let config = js_sys::JSON::parse(
        r#"{"apiEndpoint":"http://127.0.0.1:9/nope","retryAttempts":2,"retryDelay":10,"intelligentMapping":false}"#,
    )
    .unwrap();
    let engine = ThemeEngine::new(config).unwrap();

    let errors = Rc::new(Cell::new(0u32));
    let seen = errors.clone();
    engine.on(THEME_ERROR, move |_| seen.set(seen.get() + 1));

    let result = JsFuture::from(engine.init()).await.unwrap();
    assert_eq!(result.as_bool(), Some(false));

    // Exactly one error event for the terminal failure, not one per
    // attempt, and nothing applied by the fetch path.
    assert_eq!(errors.get(), 1);
    let snapshot: js_sys::Object = engine.snapshot().unchecked_into();
    assert_eq!(js_sys::Object::keys(&snapshot).length(), 0);

    engine.destroy();
}
