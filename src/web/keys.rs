use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use yew::Callback;

/// Listens for the Escape key on the whole window so an open modal can be
/// dismissed from the keyboard.
///
/// Automatically registers the listener on create, and de-registers on drop.
pub struct EscapeListener {
    callback: Closure<dyn FnMut(web_sys::KeyboardEvent)>,
}

impl EscapeListener {
    /// Create a listener that emits on every Escape keydown.
    ///
    /// Returns an Option because acquiring the JS window object itself
    /// returns an Option; we propagate that problem to our caller.
    pub fn create(target: Callback<()>) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Escape" {
                target.emit(());
            }
        }) as Box<dyn FnMut(_)>);

        let cb_ref = callback.as_ref().unchecked_ref();
        if window
            .add_event_listener_with_callback("keydown", cb_ref)
            .is_ok()
        {
            log::debug!("registered global keydown listener");
            Some(Self { callback })
        } else {
            None
        }
    }
}

impl Drop for EscapeListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let cb_ref = self.callback.as_ref().unchecked_ref();
            if window
                .remove_event_listener_with_callback("keydown", cb_ref)
                .is_ok()
            {
                log::debug!("de-registered keydown callback");
                return;
            }
        }

        log::warn!("did not remove global keydown callback listener!")
    }
}
