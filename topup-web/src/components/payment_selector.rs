use topup_core::PaymentMethod;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub methods: Vec<PaymentMethod>,
    #[prop_or_default]
    pub selected: Option<PaymentMethod>,
    #[prop_or_default]
    pub missing: bool,
    pub on_select: Callback<PaymentMethod>,
}

#[function_component(PaymentSelector)]
pub fn payment_selector(p: &Props) -> Html {
    html! {
        <fieldset class="payment-selector" aria-invalid={p.missing.then(|| AttrValue::from("true"))}>
            <legend>{ "Payment method" }</legend>
            { for p.methods.iter().map(|&method| {
                let checked = p.selected == Some(method);
                let onchange = {
                    let cb = p.on_select.clone();
                    Callback::from(move |_: Event| cb.emit(method))
                };
                let id = format!("pay-{}", method.key());
                html! {
                    <label for={id.clone()} class={classes!("payment-option", checked.then_some("is-selected"))}>
                        <input {id} type="radio" name="payment-method" value={method.key()} {checked} {onchange} />
                        <span>{ method.label() }</span>
                    </label>
                }
            }) }
            if p.missing {
                <p class="field-error" role="alert">{ topup_core::FieldIssue::MissingPaymentMethod.message() }</p>
            }
        </fieldset>
    }
}
