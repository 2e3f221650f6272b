//! Browser interval timers that stop when dropped.
use crate::dom;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use yew::prelude::*;

/// A running `setInterval` registration.
pub struct Ticker {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Ticker {
    /// Call `on_tick` every `period_ms` milliseconds.
    ///
    /// Returns `None` outside the browser or when the timer cannot be armed.
    pub fn start(period_ms: i32, on_tick: impl FnMut() + 'static) -> Option<Self> {
        let win = dom::window()?;
        let callback = Closure::wrap(Box::new(on_tick) as Box<dyn FnMut()>);
        match win.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        ) {
            Ok(handle) => Some(Self {
                handle,
                _callback: callback,
            }),
            Err(err) => {
                dom::console_error(&format!(
                    "failed to start {period_ms}ms timer: {}",
                    dom::js_error_message(&err)
                ));
                None
            }
        }
    }

    /// Cancel the interval. Dropping the ticker does the same.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(win) = dom::window() {
            win.clear_interval_with_handle(self.handle);
        }
    }
}

/// Emit `on_tick` every `period_ms` while the component is mounted.
///
/// The first callback is kept for the lifetime of the timer, so it must read
/// live state through shared handles rather than captured values.
#[hook]
pub fn use_interval(period_ms: u32, on_tick: Callback<()>) {
    use_effect_with(period_ms, move |&period| {
        let period = i32::try_from(period).unwrap_or(i32::MAX);
        let ticker = Ticker::start(period, move || on_tick.emit(()));
        move || {
            if let Some(ticker) = ticker {
                ticker.stop();
            }
        }
    });
}
