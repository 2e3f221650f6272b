use crate::app::handlers::AppHandlers;
use crate::app::state::AppState;
use yew::prelude::*;

#[hook]
pub fn use_test_bridge(app_state: &AppState, handlers: &AppHandlers) {
    let _ = (app_state, handlers);
}
