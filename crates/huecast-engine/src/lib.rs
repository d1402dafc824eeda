//! Huecast Browser Engine
//!
//! The wasm32 client: samples page colors, applies CSS variables, manages
//! the CTA button, fetches the remote palette, and injects styling rules.
//! The host page constructs a [`ThemeEngine`] explicitly and owns it; there
//! is no ambient global instance.

#[cfg(target_arch = "wasm32")]
pub mod apply;
#[cfg(target_arch = "wasm32")]
pub mod cta;
#[cfg(target_arch = "wasm32")]
pub mod fetch;
#[cfg(target_arch = "wasm32")]
pub mod inject;
#[cfg(target_arch = "wasm32")]
pub mod sampler;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use engine::ThemeEngine;
#[cfg(target_arch = "wasm32")]
pub use web::config_from_url;

#[cfg(target_arch = "wasm32")]
mod engine {
    use std::cell::RefCell;
    use std::rc::Rc;

    use huecast_core::mapping::{self, map_detected_colors};
    use huecast_core::palette::{self, CssVariableSet};
    use huecast_core::{
        EventEmitter, ThemeConfig, ThemeConfigPatch, ThemeError, ThemeEvent, ThemeResult,
    };
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::future_to_promise;

    use crate::{apply, cta::CtaManager, fetch, inject, sampler};

    struct EngineState {
        config: ThemeConfig,
        applied: CssVariableSet,
        initialized: bool,
        client_id: String,
    }

    /// Per-concern interior mutability keeps event listeners free to call
    /// back into the engine without tripping a shared borrow.
    struct EngineShared {
        state: RefCell<EngineState>,
        emitter: RefCell<EventEmitter>,
        cta: RefCell<CtaManager>,
    }

    type Shared = Rc<EngineShared>;

    /// The theme engine instance exported to the host page.
    #[wasm_bindgen]
    pub struct ThemeEngine {
        shared: Shared,
    }

    #[wasm_bindgen]
    impl ThemeEngine {
        /// Construct an engine from a plain configuration object (or
        /// `undefined` for defaults). Rejects malformed configuration.
        #[wasm_bindgen(constructor)]
        pub fn new(config: JsValue) -> Result<ThemeEngine, JsValue> {
            let config: ThemeConfig = parse_js(config, "configuration")?;
            log::info!("theme engine created for {}", config.api_endpoint);
            Ok(Self {
                shared: Rc::new(EngineShared {
                    state: RefCell::new(EngineState {
                        config,
                        applied: CssVariableSet::new(),
                        initialized: false,
                        client_id: uuid::Uuid::new_v4().to_string(),
                    }),
                    emitter: RefCell::new(EventEmitter::new()),
                    cta: RefCell::new(CtaManager::new()),
                }),
            })
        }

        /// Run the startup sequence: optional intelligent mapping, CTA
        /// creation, palette fetch and apply. Resolves to `true` when the
        /// fetched palette was applied. Theme failures surface as
        /// `theme-error` events, never as a rejected promise.
        pub fn init(&self) -> js_sys::Promise {
            let shared = self.shared.clone();
            future_to_promise(async move {
                let fetched = run_init(&shared).await;
                Ok(JsValue::from_bool(fetched))
            })
        }

        /// Re-run fetch and apply. Rejects when the engine was never
        /// initialized.
        pub fn refresh(&self) -> js_sys::Promise {
            let shared = self.shared.clone();
            future_to_promise(async move {
                if !shared.state.borrow().initialized {
                    return Err(JsValue::from_str("theme engine is not initialized"));
                }
                let config = shared.state.borrow().config.clone();
                Ok(JsValue::from_bool(run_fetch_and_apply(&shared, &config).await))
            })
        }

        /// Current applied variable set as a plain object.
        pub fn snapshot(&self) -> JsValue {
            let state = self.shared.state.borrow();
            serde_json::to_string(&state.applied)
                .ok()
                .and_then(|json| js_sys::JSON::parse(&json).ok())
                .unwrap_or(JsValue::UNDEFINED)
        }

        /// Shallow-merge a configuration patch, then re-assert CTA styling
        /// since its coloring is tied to configuration.
        #[wasm_bindgen(js_name = updateConfig)]
        pub fn update_config(&self, patch: JsValue) -> Result<(), JsValue> {
            let patch: ThemeConfigPatch = parse_js(patch, "configuration patch")?;
            let cta_config = {
                let mut state = self.shared.state.borrow_mut();
                state.config.apply_patch(patch);
                state.config.cta.clone()
            };
            self.shared.cta.borrow().restyle(&cta_config);
            Ok(())
        }

        /// Register a callback for one of the lifecycle events. The same
        /// events are also dispatched on the document as `CustomEvent`s.
        #[wasm_bindgen(js_name = addListener)]
        pub fn add_listener(&self, event: &str, callback: js_sys::Function) {
            self.shared.emitter.borrow_mut().on(event, move |theme_event| {
                let detail = theme_event
                    .detail()
                    .and_then(|d| js_sys::JSON::parse(&d.to_string()).ok())
                    .unwrap_or(JsValue::UNDEFINED);
                if let Err(err) = callback.call1(&JsValue::NULL, &detail) {
                    log::warn!("{} listener threw: {err:?}", theme_event.name());
                }
            });
        }

        /// Tear down: remove the CTA button and injected stylesheet, drop
        /// listeners, clear applied state.
        pub fn destroy(&self) {
            if let Some(window) = web_sys::window() {
                self.shared.cta.borrow_mut().destroy(&window);
                if let Some(document) = window.document() {
                    inject::remove_stylesheet(&document);
                }
            }
            self.shared.emitter.borrow_mut().clear();
            let mut state = self.shared.state.borrow_mut();
            state.applied = CssVariableSet::new();
            state.initialized = false;
            log::info!("theme engine destroyed");
        }
    }

    // Rust-side surface for rlib consumers.
    impl ThemeEngine {
        /// Typed observer registration, the Rust counterpart of
        /// `addListener`.
        pub fn on(&self, event: &str, callback: impl Fn(&ThemeEvent) + 'static) {
            self.shared.emitter.borrow_mut().on(event, callback);
        }

        pub fn config(&self) -> ThemeConfig {
            self.shared.state.borrow().config.clone()
        }
    }

    fn parse_js<T: serde::de::DeserializeOwned + Default>(
        value: JsValue,
        what: &str,
    ) -> Result<T, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(T::default());
        }
        let json: String = js_sys::JSON::stringify(&value)
            .map_err(|_| JsValue::from_str(&format!("{what} is not serializable")))?
            .into();
        serde_json::from_str(&json)
            .map_err(|e| JsValue::from_str(&format!("invalid {what}: {e}")))
    }

    async fn run_init(shared: &Shared) -> bool {
        let config = shared.state.borrow().config.clone();

        if config.intelligent_mapping {
            let ranked = sampler::analyze_page_colors();
            if ranked.is_empty() {
                log::info!("no page colors detected, skipping intelligent mapping");
            } else {
                apply_and_notify(shared, &map_detected_colors(&ranked));
            }
        }

        if let Err(err) = create_cta(shared, &config) {
            emit_error(shared, &err);
        }

        let fetched = run_fetch_and_apply(shared, &config).await;
        shared.state.borrow_mut().initialized = true;
        fetched
    }

    /// Fetch the palette and apply it, emitting exactly one `theme-error`
    /// on terminal failure. Previously applied variables stay untouched
    /// unless local fallback was explicitly enabled.
    async fn run_fetch_and_apply(shared: &Shared, config: &ThemeConfig) -> bool {
        match fetch::fetch_palette(config).await {
            Ok(response) => {
                let variables = palette::theme_variables(&response.colors);
                let applied = apply_and_notify(shared, &variables);
                if let Some(rules) = &response.styling_rules {
                    if let Some(document) = document() {
                        if let Err(err) = inject::inject_styling_rules(&document, rules) {
                            emit_error(shared, &err);
                        }
                    }
                }
                applied
            }
            Err(err) => {
                if config.allow_local_fallback {
                    log::warn!("palette fetch failed, applying local fallback palette");
                    apply_and_notify(shared, &mapping::default_palette());
                }
                emit_error(shared, &err);
                false
            }
        }
    }

    /// Write a variable set to the root, fold it into the snapshot, emit
    /// `theme-applied`, and re-assert CTA styling so the button tracks the
    /// freshly written variables with highest specificity.
    fn apply_and_notify(shared: &Shared, set: &CssVariableSet) -> bool {
        let Some(document) = document() else {
            emit_error(shared, &ThemeError::Dom("no document".to_string()));
            return false;
        };
        if let Err(err) = apply::apply_variable_set(&document, set) {
            emit_error(shared, &err);
            return false;
        }

        {
            let mut state = shared.state.borrow_mut();
            for (name, value) in set.iter() {
                state.applied.set(name, value);
            }
        }

        emit(shared, ThemeEvent::Applied {
            variables: set.clone(),
        });

        let cta_config = shared.state.borrow().config.cta.clone();
        shared.cta.borrow().restyle(&cta_config);
        true
    }

    fn create_cta(shared: &Shared, config: &ThemeConfig) -> ThemeResult<()> {
        let window =
            web_sys::window().ok_or_else(|| ThemeError::Dom("no window object".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| ThemeError::Dom("no document".to_string()))?;

        let mut manager = shared.cta.borrow_mut();
        let button = manager.ensure_button(&document, &config.cta)?;
        manager.insert(&window, &document, &config.cta)?;
        if !manager.has_click_handler() {
            manager.attach_click(make_click_closure(shared.clone(), button))?;
        }
        Ok(())
    }

    fn make_click_closure(
        shared: Shared,
        button: web_sys::HtmlElement,
    ) -> Closure<dyn FnMut(web_sys::Event)> {
        Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let (endpoint, client_id, restore_text) = {
                let state = shared.state.borrow();
                (
                    state.config.toggle_endpoint(),
                    state.client_id.clone(),
                    state.config.cta.text.clone(),
                )
            };
            emit(&shared, ThemeEvent::CtaClicked);

            let Some(window) = web_sys::window() else { return };
            let Some(document) = window.document() else { return };
            crate::cta::run_click_flow(
                &window,
                &document,
                &button,
                &endpoint,
                &client_id,
                &restore_text,
            );
        }) as Box<dyn FnMut(web_sys::Event)>)
    }

    fn emit(shared: &Shared, event: ThemeEvent) {
        if let Some(document) = document() {
            apply::dispatch_dom_event(&document, &event);
        }
        shared.emitter.borrow().emit(&event);
    }

    fn emit_error(shared: &Shared, err: &ThemeError) {
        log::error!("{err}");
        emit(shared, ThemeEvent::Error {
            message: err.to_string(),
            source: Some(err.kind().to_string()),
        });
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window().and_then(|w| w.document())
    }
}
