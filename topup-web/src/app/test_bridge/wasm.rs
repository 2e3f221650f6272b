use super::shared::snapshot;
use crate::app::handlers::AppHandlers;
use crate::app::state::AppState;
use crate::dom;
use topup_core::{GameId, PaymentMethod};
use wasm_bindgen::prelude::*;
use yew::prelude::*;

struct BridgeBindings {
    state: Closure<dyn FnMut() -> JsValue>,
    select_game: Closure<dyn FnMut(JsValue)>,
    select_bundle: Closure<dyn FnMut(JsValue)>,
    fill_account: Closure<dyn FnMut(JsValue, JsValue)>,
    check_account: Closure<dyn FnMut()>,
    pay_with: Closure<dyn FnMut(JsValue)>,
    submit: Closure<dyn FnMut()>,
    dismiss: Closure<dyn FnMut()>,
    tick: Closure<dyn FnMut()>,
}

impl BridgeBindings {
    fn entries(&self) -> [(&'static str, &JsValue); 9] {
        [
            ("state", self.state.as_ref()),
            ("selectGame", self.select_game.as_ref()),
            ("selectBundle", self.select_bundle.as_ref()),
            ("fillAccount", self.fill_account.as_ref()),
            ("checkAccount", self.check_account.as_ref()),
            ("payWith", self.pay_with.as_ref()),
            ("submit", self.submit.as_ref()),
            ("dismiss", self.dismiss.as_ref()),
            ("tick", self.tick.as_ref()),
        ]
    }
}

fn test_mode_enabled() -> bool {
    dom::query_flag("test", "1")
}

fn unit(callback: &Callback<()>) -> Closure<dyn FnMut()> {
    let callback = callback.clone();
    Closure::wrap(Box::new(move || callback.emit(())) as Box<dyn FnMut()>)
}

fn build_bridge(state: &AppState, handlers: &AppHandlers) -> BridgeBindings {
    let state_handle = state.clone();
    let state_fn = Closure::wrap(Box::new(move || {
        serde_wasm_bindgen::to_value(&snapshot(&state_handle)).unwrap_or(JsValue::NULL)
    }) as Box<dyn FnMut() -> JsValue>);

    let game_cb = handlers.game_select.clone();
    let select_game = Closure::wrap(Box::new(move |value: JsValue| {
        match value.as_string().map(|code| code.parse::<GameId>()) {
            Some(Ok(game)) => game_cb.emit(game),
            Some(Err(err)) => dom::console_error(&err.to_string()),
            None => dom::console_error("selectGame expects a game code"),
        }
    }) as Box<dyn FnMut(JsValue)>);

    let bundle_cb = handlers.bundle_select.clone();
    let select_bundle = Closure::wrap(Box::new(move |value: JsValue| {
        let id = value
            .as_string()
            .or_else(|| value.as_f64().map(|n| n.to_string()));
        if let Some(id) = id {
            bundle_cb.emit(AttrValue::from(id));
        }
    }) as Box<dyn FnMut(JsValue)>);

    let account_cb = handlers.account_input.clone();
    let zone_cb = handlers.zone_input.clone();
    let fill_account = Closure::wrap(Box::new(move |account: JsValue, zone: JsValue| {
        account_cb.emit(account.as_string().unwrap_or_default());
        zone_cb.emit(zone.as_string().unwrap_or_default());
    }) as Box<dyn FnMut(JsValue, JsValue)>);

    let pay_cb = handlers.payment_select.clone();
    let pay_with = Closure::wrap(Box::new(move |value: JsValue| {
        match value.as_string().map(|key| key.parse::<PaymentMethod>()) {
            Some(Ok(method)) => pay_cb.emit(method),
            Some(Err(err)) => dom::console_error(&err),
            None => dom::console_error("payWith expects a payment method key"),
        }
    }) as Box<dyn FnMut(JsValue)>);

    BridgeBindings {
        state: state_fn,
        select_game,
        select_bundle,
        fill_account,
        check_account: unit(&handlers.check_account),
        pay_with,
        submit: unit(&handlers.submit),
        dismiss: unit(&handlers.dismiss_payment),
        tick: unit(&handlers.checkout_tick),
    }
}

fn attach_bridge(bindings: &BridgeBindings) {
    let Some(window) = dom::window() else {
        return;
    };
    let bridge = js_sys::Object::new();
    for (name, func) in bindings.entries() {
        let _ = js_sys::Reflect::set(&bridge, &JsValue::from_str(name), func);
    }
    let _ = js_sys::Reflect::set(&window, &JsValue::from_str("__topupTest"), &bridge);
}

fn detach_bridge() {
    if let Some(window) = dom::window() {
        let _ = js_sys::Reflect::delete_property(&window, &JsValue::from_str("__topupTest"));
    }
}

#[hook]
pub fn use_test_bridge(app_state: &AppState, handlers: &AppHandlers) {
    let state = app_state.clone();
    let handlers = handlers.clone();
    use_effect_with((), move |()| {
        let bindings = test_mode_enabled().then(|| {
            let bindings = build_bridge(&state, &handlers);
            attach_bridge(&bindings);
            log::info!("test bridge attached at window.__topupTest");
            bindings
        });
        move || {
            if bindings.is_some() {
                detach_bridge();
            }
            drop(bindings);
        }
    });
}
