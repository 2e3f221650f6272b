use crate::components::modal::Modal;
use topup_core::OrderSummary;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or_default]
    pub order: Option<OrderSummary>,
    pub on_close: Callback<()>,
}

/// Payment handoff. Settlement happens with the external provider; closing
/// this dialog starts the checkout cooldown.
#[function_component(PaymentModal)]
pub fn payment_modal(p: &Props) -> Html {
    let Some(order) = p.order.as_ref() else {
        return Html::default();
    };
    let on_done = {
        let cb = p.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let title = AttrValue::from(format!("Pay with {}", order.payment_method.label()));

    html! {
        <Modal
            open={true}
            {title}
            description={AttrValue::from("Send this order to the payment provider to complete your top-up.")}
            on_close={p.on_close.clone()}
            return_focus_id={AttrValue::from("checkout-submit")}
        >
            <dl class="order-details">
                <dt>{ "Order" }</dt>
                <dd><code id="order-string">{ order.order_string.clone() }</code></dd>
                <dt>{ "Game" }</dt>
                <dd>{ order.game.display_name() }</dd>
                <dt>{ "Product" }</dt>
                <dd>{ order.bundle_name.clone() }</dd>
                { order.nickname.as_ref().map(|name| html! {
                    <>
                        <dt>{ "Player" }</dt>
                        <dd>{ name.clone() }</dd>
                    </>
                }).unwrap_or_default() }
                <dt>{ "Total" }</dt>
                <dd>{ order.price_label() }</dd>
                if order.discount_percent > 0 {
                    <dt>{ "Discount" }</dt>
                    <dd>{ format!("{}%", order.discount_percent) }</dd>
                }
            </dl>
            <button type="button" class="btn-primary" onclick={on_done}>{ "Done" }</button>
        </Modal>
    }
}
