use crate::app::state::AppState;
use crate::storage::LocalFormStore;
use topup_core::{FieldIssue, FormStore, LookupError, LookupOutcome, LookupTicket, OrderForm};
use yew::prelude::*;

/// Save the identifying fields so a reload keeps them.
pub fn persist_form(state: &AppState) {
    let saved = state.form.with(OrderForm::persisted);
    if let Err(err) = LocalFormStore::new(state.config.storage.form.as_str()).save_form(&saved) {
        log::debug!("order form not saved: {err}");
    }
}

/// Drop `resolved` from the inline errors once the customer fixed it.
pub fn clear_issue(state: &AppState, resolved: FieldIssue) {
    if state.field_issues.with(|issues| issues.contains(&resolved)) {
        state
            .field_issues
            .update(|issues| issues.retain(|issue| *issue != resolved));
    }
}

pub fn build_account_input(state: &AppState) -> Callback<String> {
    let state = state.clone();
    Callback::from(move |value: String| {
        state.form.update(|form| form.set_account_id(value));
        clear_issue(&state, FieldIssue::MissingAccountId);
        persist_form(&state);
    })
}

pub fn build_zone_input(state: &AppState) -> Callback<String> {
    let state = state.clone();
    Callback::from(move |value: String| {
        state.form.update(|form| form.set_zone_id(value));
        clear_issue(&state, FieldIssue::MissingZoneId);
        persist_form(&state);
    })
}

pub fn build_check_account(state: &AppState) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        if state.lookup_pending.snapshot() {
            return;
        }
        match state.form.update(OrderForm::begin_lookup) {
            Err(err) => {
                state.alert.set(Some(AttrValue::from(err.user_message())));
            }
            Ok((ticket, request)) => {
                state.alert.set(None);
                state.lookup_pending.update(|pending| *pending = true);
                crate::a11y::set_status("Checking account...");
                spawn_lookup(state.clone(), ticket, request);
            }
        }
    })
}

#[cfg(target_arch = "wasm32")]
fn spawn_lookup(state: AppState, ticket: LookupTicket, request: topup_core::LookupRequest) {
    wasm_bindgen_futures::spawn_local(async move {
        let lookup = crate::api::HttpLookup::new(state.config.lookup.clone());
        let result = topup_core::resolve_nickname(&lookup, &request).await;
        finish_lookup(&state, ticket, result);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_lookup(state: AppState, ticket: LookupTicket, _request: topup_core::LookupRequest) {
    finish_lookup(
        &state,
        ticket,
        Err(LookupError::Transport("no browser available".to_string())),
    );
}

/// Apply a lookup answer unless the fields changed while it was in flight.
pub fn finish_lookup(state: &AppState, ticket: LookupTicket, result: Result<String, LookupError>) {
    let outcome = state.form.update(|form| form.apply_lookup(ticket, result));
    state.lookup_pending.update(|pending| *pending = false);
    if outcome.changes_form() {
        persist_form(state);
    }
    match outcome {
        LookupOutcome::Found(nickname) => {
            state.alert.set(None);
            crate::a11y::set_status(&format!("Account found: {nickname}"));
        }
        LookupOutcome::Failed(err) => {
            state.alert.set(Some(AttrValue::from(err.user_message())));
            crate::a11y::set_status(err.user_message());
        }
        LookupOutcome::Discarded => {}
    }
}
