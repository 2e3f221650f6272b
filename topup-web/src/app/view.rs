use crate::a11y::{STATUS_REGION_ID, visible_focus_css};
use crate::app::handlers::AppHandlers;
use crate::app::state::AppState;
use crate::components::account_form::AccountForm;
use crate::components::banner_carousel::BannerCarousel;
use crate::components::checkout_bar::CheckoutBar;
use crate::components::footer::Footer;
use crate::components::game_picker::GamePicker;
use crate::components::header::Header;
use crate::components::payment_modal::PaymentModal;
use crate::components::payment_selector::PaymentSelector;
use crate::components::product_list::ProductList;
use crate::components::promo::{PopupBanner, PromoToast};
use topup_core::clock::utc_from_millis;
use topup_core::{CheckoutState, FieldIssue, format_currency, format_duration};
use yew::prelude::*;

/// Header clock text and time left on today's deals.
fn clock_labels(state: &AppState) -> (Option<AttrValue>, Option<AttrValue>) {
    let Some(now) = state.now_ms.and_then(utc_from_millis) else {
        return (None, None);
    };
    let clock = state.config.clock();
    (
        Some(AttrValue::from(clock.format(now))),
        Some(AttrValue::from(format_duration(clock.seconds_until_midnight(now)))),
    )
}

pub fn render_app(state: &AppState, handlers: &AppHandlers) -> Html {
    let config = &state.config;
    let (clock, deals_left) = clock_labels(state);

    let (game, account_id, zone_id, nickname, validated, selection, selected_id) =
        state.form.with(|form| {
            let bundle = form.selected_bundle();
            (
                form.game(),
                AttrValue::from(form.account_id().to_string()),
                AttrValue::from(form.zone_id().to_string()),
                form.nickname().map(|n| AttrValue::from(n.to_string())),
                form.is_validated(),
                bundle.map(|b| {
                    (
                        AttrValue::from(b.display_name.clone()),
                        AttrValue::from(format_currency(b.unit_price_cents)),
                    )
                }),
                bundle.map(|b| AttrValue::from(b.id.clone())),
            )
        });
    let (grouped, loading, catalog_error) = state.catalog.with(|catalog| {
        (
            catalog.grouped(),
            catalog.is_loading(),
            catalog.error().map(|err| AttrValue::from(err.user_message())),
        )
    });
    let (payment_method, cooldown_secs, pending_order) = state.checkout.with(|machine| {
        (
            machine.payment_method(),
            machine.remaining_cooldown(),
            machine.pending_order().cloned(),
        )
    });
    let awaiting_payment = state
        .checkout
        .with(|machine| matches!(machine.state(), CheckoutState::AwaitingPayment(_)));
    let banners: Vec<AttrValue> = config.banners.iter().cloned().map(AttrValue::from).collect();
    let current_banner = state.carousel.with(|carousel| carousel.current());

    html! {
        <div class="storefront" style={config.theme.css_vars()}>
            <style>{ visible_focus_css() }</style>
            <Header
                name={AttrValue::from(config.name.clone())}
                tagline={AttrValue::from(config.tagline.clone())}
                {clock}
                reseller={state.session.is_reseller()}
            />
            <main id="main" tabindex="-1">
                <BannerCarousel
                    {banners}
                    current={current_banner}
                    on_prev={handlers.banner_prev.clone()}
                    on_next={handlers.banner_next.clone()}
                    on_select={handlers.banner_select.clone()}
                />
                <GamePicker
                    games={config.games.clone()}
                    active={game}
                    on_select={handlers.game_select.clone()}
                />
                <AccountForm
                    {game}
                    {account_id}
                    {zone_id}
                    {nickname}
                    {validated}
                    pending={state.lookup_pending.snapshot()}
                    issues={state.field_issues.snapshot()}
                    on_account={handlers.account_input.clone()}
                    on_zone={handlers.zone_input.clone()}
                    on_check={handlers.check_account.clone()}
                />
                if state.field_issues.with(|issues| issues.contains(&FieldIssue::MissingBundle)) {
                    <p class="field-error" role="alert">{ FieldIssue::MissingBundle.message() }</p>
                }
                <ProductList
                    {grouped}
                    {game}
                    {loading}
                    error={catalog_error}
                    selected={selected_id}
                    reseller={state.session.is_reseller()}
                    deals_countdown={deals_left}
                    on_select={handlers.bundle_select.clone()}
                />
                <PaymentSelector
                    methods={config.payment_methods.clone()}
                    selected={payment_method}
                    missing={state.field_issues.with(|issues| issues.contains(&FieldIssue::MissingPaymentMethod))}
                    on_select={handlers.payment_select.clone()}
                />
                <CheckoutBar
                    {selection}
                    {cooldown_secs}
                    {awaiting_payment}
                    alert={(*state.alert).clone()}
                    on_submit={handlers.submit.clone()}
                />
            </main>
            <PaymentModal order={pending_order} on_close={handlers.dismiss_payment.clone()} />
            <PopupBanner
                open={*state.show_popup}
                image={AttrValue::from(config.popup_banner.image.clone())}
                link={config.popup_banner.link.clone().map(AttrValue::from)}
                on_close={handlers.close_popup.clone()}
            />
            <PromoToast
                open={*state.show_promo}
                message={AttrValue::from(config.promo.message.clone())}
                on_close={handlers.close_promo.clone()}
            />
            <div id={STATUS_REGION_ID} class="sr-only" role="status" aria-live="polite"></div>
            <Footer name={AttrValue::from(config.name.clone())} contact={config.contact.clone()} />
        </div>
    }
}
