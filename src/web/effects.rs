use wasm_bindgen::prelude::*;

///
/// Bindings to the small pieces of browser chrome the game leans on: the
/// canvas-confetti script (loaded globally by index.html), the clipboard and
/// share sheet, and the persisted dark-mode flag. Everything here is
/// fire-and-forget — a missing script or a denied permission is logged and
/// shrugged off.
///

#[wasm_bindgen]
extern "C" {
    // canvas-confetti's global entrypoint
    #[wasm_bindgen(catch)]
    fn confetti(options: &JsValue) -> Result<(), JsValue>;
}

/// The celebratory burst on a win: 150 particles, 70° spread, just below
/// center — same shape every time.
pub fn fire_confetti() {
    let options = js_sys::Object::new();
    let origin = js_sys::Object::new();
    let set = |obj: &js_sys::Object, key: &str, value: JsValue| {
        let _ = js_sys::Reflect::set(obj, &JsValue::from_str(key), &value);
    };
    set(&options, "particleCount", 150.into());
    set(&options, "spread", 70.into());
    set(&origin, "y", 0.6.into());
    set(&options, "origin", origin.into());

    if let Err(err) = confetti(&options) {
        log::warn!("confetti effect unavailable: {:?}", err);
    }
}

/// Copies the share message to the clipboard, and offers the native share
/// sheet where the browser has one.
pub fn share_text(message: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();

    // clipboard denial isn't actionable; drop the promise
    let _ = navigator.clipboard().write_text(message);

    if js_sys::Reflect::has(&navigator, &JsValue::from_str("share")).unwrap_or(false) {
        let data = web_sys::ShareData::new();
        data.set_text(message);
        let _ = navigator.share_with_data(&data);
    }
}

const DARK_MODE_KEY: &str = "darkMode";

pub fn load_dark_mode() -> bool {
    local_storage()
        .and_then(|storage| storage.get_item(DARK_MODE_KEY).ok().flatten())
        .map(|value| value == "1")
        .unwrap_or(false)
}

pub fn store_dark_mode(enabled: bool) {
    if let Some(storage) = local_storage() {
        if let Err(err) = storage.set_item(DARK_MODE_KEY, if enabled { "1" } else { "0" }) {
            log::warn!("could not persist dark mode flag: {:?}", err);
        }
    }
}

/// Mirrors the flag onto `<body class="dark">`, where the stylesheet picks
/// it up.
pub fn apply_dark_class(enabled: bool) {
    if let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    {
        let _ = body.class_list().toggle_with_force("dark", enabled);
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}
