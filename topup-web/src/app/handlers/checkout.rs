use super::form::clear_issue;
use crate::app::state::AppState;
use topup_core::{CheckoutError, CheckoutMachine, CheckoutState, FieldIssue, PaymentMethod};
use yew::prelude::*;

pub fn build_payment_select(state: &AppState) -> Callback<PaymentMethod> {
    let state = state.clone();
    Callback::from(move |method: PaymentMethod| {
        state
            .checkout
            .update(|machine| machine.select_payment_method(Some(method)));
        clear_issue(&state, FieldIssue::MissingPaymentMethod);
    })
}

pub fn build_submit(state: &AppState) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        let form = state.form.snapshot();
        match state.checkout.update(|machine| machine.submit(&form)) {
            Ok(summary) => {
                log::info!("order ready: {}", summary.order_string);
                state.field_issues.update(Vec::clear);
                state.alert.set(None);
                crate::a11y::set_status(&format!(
                    "Pay {} with {}",
                    summary.price_label(),
                    summary.payment_method
                ));
            }
            Err(err) => {
                if let CheckoutError::Fields(issues) = &err {
                    state.field_issues.update(|current| current.clone_from(issues));
                }
                let message = err.user_message();
                crate::a11y::set_status(&message);
                state.alert.set(Some(AttrValue::from(message)));
            }
        }
    })
}

pub fn build_dismiss_payment(state: &AppState) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        if state.checkout.update(CheckoutMachine::dismiss_payment) {
            let secs = state.checkout.with(CheckoutMachine::remaining_cooldown);
            crate::a11y::set_status(&format!("You can order again in {secs}s"));
        }
    })
}

/// One-second tick for the checkout cooldown.
pub fn build_checkout_tick(state: &AppState) -> Callback<()> {
    let checkout = state.checkout.clone();
    Callback::from(move |()| {
        let cooling = checkout.with(|machine| matches!(machine.state(), CheckoutState::Cooldown(_)));
        if cooling && checkout.update(CheckoutMachine::tick) {
            crate::a11y::set_status("Checkout is available again");
        }
    })
}
