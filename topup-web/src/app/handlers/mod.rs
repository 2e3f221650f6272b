mod banner;
mod catalog;
mod checkout;
mod form;

use crate::app::state::AppState;
use topup_core::{GameId, PaymentMethod};
use yew::prelude::*;

pub use banner::{
    build_banner_next, build_banner_prev, build_banner_rotate, build_banner_select,
    build_clock_tick, build_close_popup, build_close_promo,
};
pub use catalog::{build_bundle_select, build_game_select, finish_fetch, load_catalog};
pub use checkout::{
    build_checkout_tick, build_dismiss_payment, build_payment_select, build_submit,
};
pub use form::{
    build_account_input, build_check_account, build_zone_input, finish_lookup, persist_form,
};

#[derive(Clone, PartialEq)]
pub struct AppHandlers {
    pub game_select: Callback<GameId>,
    pub bundle_select: Callback<AttrValue>,
    pub account_input: Callback<String>,
    pub zone_input: Callback<String>,
    pub check_account: Callback<()>,
    pub payment_select: Callback<PaymentMethod>,
    pub submit: Callback<()>,
    pub dismiss_payment: Callback<()>,
    pub checkout_tick: Callback<()>,
    pub banner_next: Callback<()>,
    pub banner_prev: Callback<()>,
    pub banner_select: Callback<usize>,
    pub banner_rotate: Callback<()>,
    pub clock_tick: Callback<()>,
    pub close_popup: Callback<()>,
    pub close_promo: Callback<()>,
}

impl AppHandlers {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            game_select: build_game_select(state),
            bundle_select: build_bundle_select(state),
            account_input: build_account_input(state),
            zone_input: build_zone_input(state),
            check_account: build_check_account(state),
            payment_select: build_payment_select(state),
            submit: build_submit(state),
            dismiss_payment: build_dismiss_payment(state),
            checkout_tick: build_checkout_tick(state),
            banner_next: build_banner_next(state),
            banner_prev: build_banner_prev(state),
            banner_select: build_banner_select(state),
            banner_rotate: build_banner_rotate(state),
            clock_tick: build_clock_tick(state),
            close_popup: build_close_popup(state),
            close_promo: build_close_promo(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::use_app_state;
    use futures::executor::block_on;
    use topup_core::{Bundle, BundleKind, CheckoutState, LookupError, OrderForm};
    use yew::LocalServerRenderer;

    fn bundle(id: &str, game: GameId, diamonds: u32, cents: i64) -> Bundle {
        Bundle {
            id: id.to_string(),
            game,
            display_name: format!("{diamonds} Diamonds"),
            kind: Some(BundleKind::Diamonds),
            unit_price_cents: cents,
            original_price_cents: None,
            discount_percent: None,
            diamond_amount: Some(diamonds),
            reseller_price_cents: None,
            image_ref: None,
            badge_label: None,
            code: None,
        }
    }

    #[derive(Properties, PartialEq)]
    struct ScriptProps {
        script: fn(&AppState, &AppHandlers) -> String,
    }

    /// Runs `script` against fresh app state once and renders its report.
    #[function_component(ScriptHarness)]
    fn script_harness(props: &ScriptProps) -> Html {
        let state = use_app_state();
        let handlers = AppHandlers::new(&state);
        let report = use_mut_ref(|| None::<String>);
        if report.borrow().is_none() {
            let out = (props.script)(&state, &handlers);
            *report.borrow_mut() = Some(out);
        }
        let text = report.borrow().clone().unwrap_or_default();
        html! { <p>{ text }</p> }
    }

    fn run(script: fn(&AppState, &AppHandlers) -> String) -> String {
        block_on(LocalServerRenderer::<ScriptHarness>::with_props(ScriptProps { script }).render())
    }

    #[test]
    fn order_flow_reaches_cooldown() {
        let html = run(|state, handlers| {
            handlers.submit.emit(());
            let rejected = state.checkout.with(|m| m.state().name());

            let ticket = state.catalog.update(|c| c.begin(GameId::Mlbb));
            finish_fetch(state, ticket, Ok(vec![bundle("9", GameId::Mlbb, 172, 220)]));
            handlers.bundle_select.emit(AttrValue::from("9"));
            handlers.account_input.emit("123456789".to_string());
            handlers.zone_input.emit("1234".to_string());

            let (lookup, _) = state.form.update(OrderForm::begin_lookup).unwrap();
            finish_lookup(state, lookup, Ok("Shadow".to_string()));
            handlers.payment_select.emit(PaymentMethod::Khqr);
            handlers.submit.emit(());
            let order = state
                .checkout
                .with(|m| m.pending_order().map(|o| o.order_string.clone()));
            handlers.dismiss_payment.emit(());
            let cooling = state.checkout.with(|m| m.state().name());
            format!("{rejected}|{}|{cooling}", order.unwrap_or_default())
        });
        assert!(html.contains("idle|123456789 1234 172|cooldown"), "{html}");
    }

    #[test]
    fn stale_answers_are_ignored() {
        let html = run(|state, _| {
            let old = state.catalog.update(|c| c.begin(GameId::Mlbb));
            let _ = state.catalog.update(|c| c.begin(GameId::FreeFire));
            finish_fetch(state, old, Ok(vec![bundle("1", GameId::Mlbb, 86, 150)]));
            let count = state.catalog.with(|c| c.bundles().len());

            state.form.update(|f| f.set_account_id("77"));
            state.form.update(|f| f.set_game(GameId::FreeFire));
            let (ticket, _) = state.form.update(OrderForm::begin_lookup).unwrap();
            state.form.update(|f| f.set_account_id("78"));
            finish_lookup(state, ticket, Err(LookupError::NotFound));
            let cleared = state.form.with(|f| f.nickname().is_none());
            format!("{count}|{cleared}")
        });
        assert!(html.contains("0|true"), "{html}");
    }

    #[test]
    fn fixing_a_field_clears_its_inline_error() {
        let html = run(|state, handlers| {
            handlers.submit.emit(());
            let before = state.field_issues.snapshot().len();
            handlers.account_input.emit("123456789".to_string());
            handlers.zone_input.emit("1234".to_string());
            handlers.payment_select.emit(PaymentMethod::Khqr);
            let left = state.field_issues.snapshot();
            format!("{before}|{left:?}")
        });
        assert!(html.contains("4|[MissingBundle]"), "{html}");
    }

    #[test]
    fn account_check_waits_for_the_pending_lookup() {
        let html = run(|state, handlers| {
            handlers.account_input.emit("55501".to_string());
            state.form.update(|f| f.set_game(GameId::FreeFire));
            let (ticket, _) = state.form.update(OrderForm::begin_lookup).unwrap();
            finish_lookup(state, ticket, Ok("Ace".to_string()));

            state.lookup_pending.update(|pending| *pending = true);
            handlers.check_account.emit(());
            let kept = state.form.with(OrderForm::is_validated);

            state.lookup_pending.update(|pending| *pending = false);
            handlers.check_account.emit(());
            let rechecked = state.form.with(OrderForm::is_validated);
            format!("{kept}|{rechecked}|{}", state.lookup_pending.snapshot())
        });
        assert!(html.contains("true|false|false"), "{html}");
    }

    #[test]
    fn game_switch_drops_selection_and_reloads() {
        let html = run(|state, handlers| {
            let ticket = state.catalog.update(|c| c.begin(GameId::Mlbb));
            finish_fetch(state, ticket, Ok(vec![bundle("9", GameId::Mlbb, 172, 220)]));
            handlers.bundle_select.emit(AttrValue::from("9"));
            let had = state.form.with(|f| f.selected_bundle().is_some());
            handlers.game_select.emit(GameId::FreeFire);
            let kept = state.form.with(|f| f.selected_bundle().is_some());
            let loading = state.catalog.with(|c| (c.active_game(), c.is_loading()));
            format!("{had}|{kept}|{}|{}", loading.0, loading.1)
        });
        assert!(html.contains("true|false|freefire|true"), "{html}");
    }

    #[test]
    fn cooldown_ticks_back_to_idle() {
        let html = run(|state, handlers| {
            handlers.checkout_tick.emit(());
            let ticket = state.catalog.update(|c| c.begin(GameId::FreeFire));
            state.form.update(|f| f.set_game(GameId::FreeFire));
            finish_fetch(state, ticket, Ok(vec![bundle("3", GameId::FreeFire, 310, 300)]));
            handlers.bundle_select.emit(AttrValue::from("3"));
            handlers.account_input.emit("55501".to_string());
            let (lookup, _) = state.form.update(OrderForm::begin_lookup).unwrap();
            finish_lookup(state, lookup, Ok("Ace".to_string()));
            handlers.payment_select.emit(PaymentMethod::AbaPay);
            handlers.submit.emit(());
            handlers.dismiss_payment.emit(());
            let secs = state.checkout.with(|m| m.remaining_cooldown());
            for _ in 0..secs {
                handlers.checkout_tick.emit(());
            }
            let idle = state
                .checkout
                .with(|m| matches!(m.state(), CheckoutState::Idle));
            format!("{secs}|{idle}")
        });
        assert!(html.contains("5|true"), "{html}");
    }
}
