use topup_core::{FieldIssue, GameId};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub game: GameId,
    pub account_id: AttrValue,
    pub zone_id: AttrValue,
    #[prop_or_default]
    pub nickname: Option<AttrValue>,
    #[prop_or_default]
    pub validated: bool,
    #[prop_or_default]
    pub pending: bool,
    #[prop_or_default]
    pub issues: Vec<FieldIssue>,
    pub on_account: Callback<String>,
    pub on_zone: Callback<String>,
    pub on_check: Callback<()>,
}

fn text_input(cb: &Callback<String>) -> Callback<InputEvent> {
    let cb = cb.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
            cb.emit(input.value());
        }
    })
}

fn issue_note(issues: &[FieldIssue], issue: FieldIssue, id: &'static str) -> Html {
    if issues.contains(&issue) {
        html! { <p {id} class="field-error" role="alert">{ issue.message() }</p> }
    } else {
        Html::default()
    }
}

#[function_component(AccountForm)]
pub fn account_form(p: &Props) -> Html {
    let zone_required = p.game.requires_zone();
    let account_invalid = p.issues.contains(&FieldIssue::MissingAccountId);
    let zone_invalid = p.issues.contains(&FieldIssue::MissingZoneId);
    let on_check = {
        let cb = p.on_check.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <section class="account-form" aria-labelledby="account-form-title">
            <h2 id="account-form-title">{ "Enter your account" }</h2>
            <div class="account-fields">
                <label for="account-id">{ "Account ID" }</label>
                <input
                    id="account-id"
                    type="text"
                    inputmode="numeric"
                    autocomplete="off"
                    value={p.account_id.clone()}
                    oninput={text_input(&p.on_account)}
                    aria-invalid={account_invalid.then(|| AttrValue::from("true"))}
                    placeholder="Account ID"
                />
                { issue_note(&p.issues, FieldIssue::MissingAccountId, "account-id-error") }
                if zone_required {
                    <label for="zone-id">{ "Zone ID" }</label>
                    <input
                        id="zone-id"
                        type="text"
                        inputmode="numeric"
                        autocomplete="off"
                        value={p.zone_id.clone()}
                        oninput={text_input(&p.on_zone)}
                        aria-invalid={zone_invalid.then(|| AttrValue::from("true"))}
                        placeholder="Zone ID"
                    />
                    { issue_note(&p.issues, FieldIssue::MissingZoneId, "zone-id-error") }
                }
            </div>
            <button
                id="check-account"
                type="button"
                class="btn-secondary"
                onclick={on_check}
                disabled={p.pending}
                aria-busy={p.pending.then(|| AttrValue::from("true"))}
            >
                { if p.pending { "Checking..." } else { "Check ID" } }
            </button>
            { p.nickname.as_ref().map(|name| {
                let class = classes!("account-nickname", p.validated.then_some("is-verified"));
                html! {
                    <p id="account-nickname" {class} aria-live="polite">
                        { "Nickname: " }<strong>{ name.clone() }</strong>
                    </p>
                }
            }).unwrap_or_default() }
        </section>
    }
}
