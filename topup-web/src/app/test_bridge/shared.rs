use crate::app::state::AppState;
use serde::Serialize;

/// What browser tests read back through `window.__topupTest.state()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BridgeSnapshot {
    pub game: String,
    pub account_id: String,
    pub zone_id: String,
    pub nickname: Option<String>,
    pub validated: bool,
    pub selected_bundle: Option<String>,
    pub bundle_count: usize,
    pub catalog_loading: bool,
    pub checkout: &'static str,
    pub cooldown: u32,
    pub order: Option<String>,
    pub reseller: bool,
}

pub(super) fn snapshot(state: &AppState) -> BridgeSnapshot {
    let (game, account_id, zone_id, nickname, validated, selected_bundle) =
        state.form.with(|form| {
            (
                form.game().code().to_string(),
                form.account_id().to_string(),
                form.zone_id().to_string(),
                form.nickname().map(str::to_string),
                form.is_validated(),
                form.selected_bundle().map(|b| b.id.clone()),
            )
        });
    let (bundle_count, catalog_loading) = state
        .catalog
        .with(|catalog| (catalog.bundles().len(), catalog.is_loading()));
    let (checkout, cooldown, order) = state.checkout.with(|machine| {
        (
            machine.state().name(),
            machine.remaining_cooldown(),
            machine.pending_order().map(|o| o.order_string.clone()),
        )
    });
    BridgeSnapshot {
        game,
        account_id,
        zone_id,
        nickname,
        validated,
        selected_bundle,
        bundle_count,
        catalog_loading,
        checkout,
        cooldown,
        order,
        reseller: state.session.is_reseller(),
    }
}
