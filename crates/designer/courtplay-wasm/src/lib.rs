use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use courtplay_core::{
    link, Clock, Config, Designer, KeyValueBackend, KeyValuePlayStore, Play, PlayLibrary, Point,
    Rgb, SharedPlay, StoreError,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn to_js<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

/// `Date.now()` as the engine clock.
#[derive(Clone, Copy, Debug, Default)]
struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// `window.localStorage`. Missing storage (workers, privacy modes) surfaces as
/// a backend error, which the play store treats as an empty collection.
#[derive(Clone, Copy, Debug, Default)]
struct LocalStorageBackend;

impl LocalStorageBackend {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Backend {
            reason: "no window".into(),
        })?;
        window
            .local_storage()
            .map_err(backend_error)?
            .ok_or_else(|| StoreError::Backend {
                reason: "localStorage unavailable".into(),
            })
    }
}

fn backend_error(err: JsValue) -> StoreError {
    StoreError::Backend {
        reason: format!("{err:?}"),
    }
}

impl KeyValueBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?.get_item(key).map_err(backend_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?.set_item(key, value).map_err(backend_error)
    }
}

type BrowserLibrary = PlayLibrary<KeyValuePlayStore<LocalStorageBackend>, JsClock>;

#[wasm_bindgen]
pub struct CourtplayDesigner {
    core: Designer<JsClock>,
    library: BrowserLibrary,
}

#[wasm_bindgen]
impl CourtplayDesigner {
    /// Create a designer. Pass a (partial) config object or undefined/null for defaults.
    /// Example:
    ///   new CourtplayDesigner({ possession_radius: 40 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CourtplayDesigner, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let core = Designer::try_with_clock(cfg, JsClock)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;

        Ok(CourtplayDesigner {
            core,
            library: PlayLibrary::open(KeyValuePlayStore::new(LocalStorageBackend), JsClock),
        })
    }

    /// Current tokens as `[{ id, type, x, y, color }]`.
    #[wasm_bindgen]
    pub fn tokens(&self) -> Result<JsValue, JsError> {
        to_js(self.core.tokens(), "tokens")
    }

    /// Recording buffer (or loaded play) as `[{ timestamp, tokens }]`.
    #[wasm_bindgen]
    pub fn frames(&self) -> Result<JsValue, JsError> {
        to_js(self.core.frames(), "frames")
    }

    #[wasm_bindgen(js_name = frame_count)]
    pub fn frame_count(&self) -> u32 {
        self.core.frames().len() as u32
    }

    /// "idle" | "recording" | "playing"
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        self.core.state().name().to_string()
    }

    #[wasm_bindgen]
    pub fn carrier(&self) -> Option<String> {
        self.core.carrier().map(str::to_string)
    }

    #[wasm_bindgen(js_name = begin_drag)]
    pub fn begin_drag(&mut self, id: String, x: f64, y: f64) -> bool {
        self.core.begin_drag(&id, Point::new(x, y))
    }

    #[wasm_bindgen(js_name = drag_to)]
    pub fn drag_to(&mut self, id: String, x: f64, y: f64) -> bool {
        self.core.drag_to(&id, Point::new(x, y))
    }

    #[wasm_bindgen(js_name = end_drag)]
    pub fn end_drag(&mut self, id: String) -> bool {
        self.core.end_drag(&id)
    }

    /// Absolute move request (keyboard nudges, programmatic placement).
    #[wasm_bindgen(js_name = move_token)]
    pub fn move_token(&mut self, id: String, x: f64, y: f64) -> bool {
        self.core.move_token(&id, Point::new(x, y))
    }

    #[wasm_bindgen(js_name = start_recording)]
    pub fn start_recording(&mut self) -> bool {
        self.core.start_recording()
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.core.stop();
    }

    #[wasm_bindgen]
    pub fn play(&mut self) -> bool {
        self.core.play()
    }

    /// requestAnimationFrame callback. Returns whether to schedule another frame.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> bool {
        self.core.tick().should_continue()
    }

    #[wasm_bindgen(js_name = reset_positions)]
    pub fn reset_positions(&mut self) -> bool {
        self.core.reset_positions()
    }

    /// `color` is `#rrggbb` or `#rgb`.
    #[wasm_bindgen(js_name = set_token_color)]
    pub fn set_token_color(&mut self, id: String, color: String) -> Result<bool, JsError> {
        let rgb: Rgb = color
            .parse()
            .map_err(|e| JsError::new(&format!("set_token_color: {e}")))?;
        Ok(self.core.set_token_color(&id, rgb))
    }

    /// Load a play object `{ id, name, date, frames }` into the designer.
    #[wasm_bindgen(js_name = load_play)]
    pub fn load_play(&mut self, play: JsValue) -> Result<bool, JsError> {
        if jsvalue_is_undefined_or_null(&play) {
            return Err(JsError::new("load_play: play is null/undefined"));
        }
        let play: Play =
            swb::from_value(play).map_err(|e| JsError::new(&format!("load_play parse error: {e}")))?;
        Ok(self.core.load_play(&play))
    }

    /// Drain events queued since the last call.
    #[wasm_bindgen(js_name = take_events)]
    pub fn take_events(&mut self) -> Result<JsValue, JsError> {
        let out = self.core.take_outputs();
        to_js(&out.events, "events")
    }

    // ----- saved plays (localStorage) -----

    #[wasm_bindgen(js_name = saved_plays)]
    pub fn saved_plays(&self) -> Result<JsValue, JsError> {
        to_js(&self.library.to_vec(), "saved_plays")
    }

    /// Save the current frame buffer under `name`. Returns the stored play.
    #[wasm_bindgen(js_name = save_play)]
    pub fn save_play(&mut self, name: String) -> Result<JsValue, JsError> {
        let play = self
            .library
            .save(&name, self.core.frames())
            .map_err(|e| JsError::new(&format!("save_play: {e}")))?;
        to_js(&play, "save_play")
    }

    #[wasm_bindgen(js_name = delete_play)]
    pub fn delete_play(&mut self, id: String) -> Result<bool, JsError> {
        self.library
            .delete(&id)
            .map_err(|e| JsError::new(&format!("delete_play: {e}")))
    }

    #[wasm_bindgen(js_name = load_saved_play)]
    pub fn load_saved_play(&mut self, id: String) -> Result<bool, JsError> {
        let play = self
            .library
            .require(&id)
            .map_err(|e| JsError::new(&format!("load_saved_play: {e}")))?;
        Ok(self.core.load_play(play))
    }

    // ----- sharing -----

    /// Record to upload for a saved play, stamped with the current time.
    /// The host performs the HTTP request to its blob store.
    #[wasm_bindgen(js_name = shared_record)]
    pub fn shared_record(&self, id: String) -> Result<JsValue, JsError> {
        let play = self
            .library
            .require(&id)
            .map_err(|e| JsError::new(&format!("shared_record: {e}")))?;
        to_js(&SharedPlay::from_play(play, JsClock.now_utc()), "shared_record")
    }

    /// Validate a fetched record, add it to the saved plays and load it.
    /// Returns the stored play. Refused unless the designer is idle, so nothing
    /// is saved that could not also be shown.
    #[wasm_bindgen(js_name = import_shared_record)]
    pub fn import_shared_record(&mut self, record: JsValue) -> Result<JsValue, JsError> {
        if !self.core.state().is_idle() {
            return Err(JsError::new(&format!(
                "import_shared_record: designer is {}, stop first",
                self.core.state().name()
            )));
        }
        let raw: serde_json::Value = swb::from_value(record)
            .map_err(|e| JsError::new(&format!("import_shared_record parse error: {e}")))?;
        let shared = SharedPlay::from_record(raw)
            .map_err(|e| JsError::new(&format!("import_shared_record: {e}")))?;
        let play = self
            .library
            .import(shared.into_play(String::new()))
            .map_err(|e| JsError::new(&format!("import_shared_record: {e}")))?;
        if !self.core.load_play(&play) {
            return Err(JsError::new(&format!(
                "import_shared_record: saved as {} but could not be loaded",
                play.id
            )));
        }
        to_js(&play, "import_shared_record")
    }
}

/// Link to a shared play, built from the page URL.
#[wasm_bindgen(js_name = share_url)]
pub fn share_url(page_url: String, share_id: String) -> Result<String, JsError> {
    link::share_url(&page_url, &share_id).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen(js_name = shared_play_id)]
pub fn shared_play_id(url: String) -> Option<String> {
    link::shared_play_id(&url)
}

#[wasm_bindgen(js_name = clear_shared_play_param)]
pub fn clear_shared_play_param(url: String) -> Result<String, JsError> {
    link::clear_shared_play_param(&url).map_err(|e| JsError::new(&e.to_string()))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
