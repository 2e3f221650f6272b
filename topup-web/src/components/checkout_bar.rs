use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// Selected product and its price, once a product is chosen.
    #[prop_or_default]
    pub selection: Option<(AttrValue, AttrValue)>,
    /// Seconds left before another order can be placed.
    #[prop_or_default]
    pub cooldown_secs: u32,
    #[prop_or_default]
    pub awaiting_payment: bool,
    #[prop_or_default]
    pub alert: Option<AttrValue>,
    pub on_submit: Callback<()>,
}

#[function_component(CheckoutBar)]
pub fn checkout_bar(p: &Props) -> Html {
    let busy = p.cooldown_secs > 0 || p.awaiting_payment;
    let onclick = {
        let cb = p.on_submit.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let label = if p.cooldown_secs > 0 {
        format!("Please wait {}s", p.cooldown_secs)
    } else {
        "Buy Now".to_string()
    };

    html! {
        <section class="checkout-bar" aria-label="Checkout">
            { p.alert.as_ref().map(|msg| html! {
                <p id="checkout-alert" class="alert alert-error" role="alert">{ msg.clone() }</p>
            }).unwrap_or_default() }
            <div class="checkout-summary">
                { p.selection.as_ref().map_or_else(
                    || html! { <span class="muted">{ "No product selected" }</span> },
                    |(name, price)| html! {
                        <>
                            <span class="checkout-product">{ name.clone() }</span>
                            <strong class="checkout-price">{ price.clone() }</strong>
                        </>
                    },
                ) }
            </div>
            <button
                id="checkout-submit"
                type="button"
                class="btn-primary"
                {onclick}
                disabled={busy}
                aria-disabled={busy.to_string()}
            >
                { label }
            </button>
        </section>
    }
}
