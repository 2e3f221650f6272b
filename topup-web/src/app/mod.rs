use crate::timer::use_interval;
use topup_core::constants::{BANNER_ROTATE_MS, TICK_INTERVAL_MS};
use yew::prelude::*;

pub mod bootstrap;
pub mod handlers;
pub mod state;
pub mod test_bridge;
pub mod view;

pub use state::AppState;

#[function_component(App)]
pub fn app() -> Html {
    let app_state = state::use_app_state();
    let app_handlers = handlers::AppHandlers::new(&app_state);
    bootstrap::use_bootstrap(&app_state);
    test_bridge::use_test_bridge(&app_state, &app_handlers);

    let second_tick = {
        let checkout_tick = app_handlers.checkout_tick.clone();
        let clock_tick = app_handlers.clock_tick.clone();
        Callback::from(move |()| {
            checkout_tick.emit(());
            clock_tick.emit(());
        })
    };
    use_interval(TICK_INTERVAL_MS, second_tick);
    use_interval(BANNER_ROTATE_MS, app_handlers.banner_rotate.clone());

    view::render_app(&app_state, &app_handlers)
}
