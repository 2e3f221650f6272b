use crate::app::handlers::load_catalog;
use crate::app::state::AppState;
use crate::storage::LocalFormStore;
use topup_core::{FormStore, OrderForm};
use yew::prelude::*;

/// Restore the saved order form, keeping its game only if the store lists it.
pub(crate) fn restore_saved_form(state: &AppState) {
    let store = LocalFormStore::new(state.config.storage.form.as_str());
    match store.load_form() {
        Ok(Some(saved)) if state.config.listing(saved.game).is_some() => {
            log::info!("restored saved order form for {}", saved.game);
            state.form.update(|form| *form = OrderForm::restore(saved));
        }
        Ok(Some(saved)) => {
            log::warn!("saved form names unlisted game {}, ignoring it", saved.game);
        }
        Ok(None) => {}
        Err(err) => log::debug!("no saved order form: {err}"),
    }
}

fn bootstrap_load(state: &AppState) {
    restore_saved_form(state);
    let game = state.active_game();
    load_catalog(state, game);
}

#[hook]
pub fn use_bootstrap(app_state: &AppState) {
    let state = app_state.clone();
    use_effect_with((), move |()| {
        bootstrap_load(&state);
        || {}
    });
}
