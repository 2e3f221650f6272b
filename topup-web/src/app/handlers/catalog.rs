use super::form::{clear_issue, persist_form};
use crate::app::state::AppState;
use topup_core::{CatalogError, CommitOutcome, FetchTicket, FieldIssue, GameId};
use yew::prelude::*;

/// Start loading `game`'s catalog. Earlier requests still in flight are
/// discarded when they land.
pub fn load_catalog(state: &AppState, game: GameId) {
    let ticket = state.catalog.update(|catalog| catalog.begin(game));
    crate::a11y::set_status(&format!("Loading {} products...", game.display_name()));
    spawn_fetch(state.clone(), ticket);
}

#[cfg(target_arch = "wasm32")]
fn spawn_fetch(state: AppState, ticket: FetchTicket) {
    wasm_bindgen_futures::spawn_local(async move {
        let backend = crate::api::RestBackend::new(&state.config.backend);
        let result = topup_core::fetch_catalog(
            state.session,
            &backend,
            &backend,
            ticket.game(),
        )
        .await;
        finish_fetch(&state, ticket, result);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_fetch(state: AppState, ticket: FetchTicket) {
    log::debug!("catalog fetch for {} skipped outside the browser", ticket.game());
    let _ = state;
}

pub fn finish_fetch(
    state: &AppState,
    ticket: FetchTicket,
    result: Result<Vec<topup_core::Bundle>, CatalogError>,
) {
    let outcome = state.catalog.update(|catalog| catalog.commit(ticket, result));
    match outcome {
        CommitOutcome::Applied => {
            let count = state.catalog.with(|catalog| catalog.bundles().len());
            crate::a11y::set_status(&format!("{count} products loaded"));
        }
        CommitOutcome::Failed => {
            let message = state
                .catalog
                .with(|catalog| catalog.error().map(CatalogError::user_message))
                .unwrap_or_default();
            crate::a11y::set_status(message);
        }
        CommitOutcome::Discarded => {}
    }
}

pub fn build_game_select(state: &AppState) -> Callback<GameId> {
    let state = state.clone();
    Callback::from(move |game: GameId| {
        if !state.form.update(|form| form.set_game(game)) {
            return;
        }
        state.field_issues.update(Vec::clear);
        state.alert.set(None);
        persist_form(&state);
        load_catalog(&state, game);
    })
}

pub fn build_bundle_select(state: &AppState) -> Callback<AttrValue> {
    let state = state.clone();
    Callback::from(move |bundle_id: AttrValue| {
        let Some(bundle) = state
            .catalog
            .with(|catalog| catalog.find(bundle_id.as_str()).cloned())
        else {
            log::warn!("bundle {bundle_id} is not in the active catalog");
            return;
        };
        let name = bundle.display_name.clone();
        if state.form.update(|form| form.select_bundle(bundle)) {
            clear_issue(&state, FieldIssue::MissingBundle);
            crate::a11y::set_status(&format!("Selected {name}"));
        }
    })
}
