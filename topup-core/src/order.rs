//! Order string derivation for the payment handoff.
use crate::bundle::{Bundle, format_currency};
use crate::checkout::PaymentMethod;
use crate::constants::SENTINEL_ZONE;
use crate::form::OrderForm;
use crate::game::GameId;
use serde::{Deserialize, Serialize};

/// The product token in an order string: explicit code, else diamond
/// amount, else display name.
#[must_use]
pub fn bundle_code(bundle: &Bundle) -> String {
    if let Some(code) = bundle.code.as_deref().map(str::trim)
        && !code.is_empty()
    {
        return code.to_string();
    }
    match bundle.diamond_amount {
        Some(amount) => amount.to_string(),
        None => bundle.display_name.trim().to_string(),
    }
}

/// Format `"{account} {zone-or-0} {code}"`, the literal fulfillment payload.
#[must_use]
pub fn format_order_string(account_id: &str, zone_id: Option<&str>, bundle: &Bundle) -> String {
    let zone = zone_id
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .unwrap_or(SENTINEL_ZONE);
    format!("{} {zone} {}", account_id.trim(), bundle_code(bundle))
}

/// Everything the payment modal shows for one submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_string: String,
    pub game: GameId,
    pub bundle_id: String,
    pub bundle_name: String,
    pub price_cents: i64,
    pub discount_percent: u32,
    pub nickname: Option<String>,
    pub payment_method: PaymentMethod,
}

impl OrderSummary {
    /// Summarize `form`; `None` when no bundle is selected.
    #[must_use]
    pub fn from_form(form: &OrderForm, payment_method: PaymentMethod) -> Option<Self> {
        let bundle = form.selected_bundle()?;
        let zone = form.zone_required().then(|| form.effective_zone());
        Some(Self {
            order_string: format_order_string(form.account_id(), zone, bundle),
            game: form.game(),
            bundle_id: bundle.id.clone(),
            bundle_name: bundle.display_name.clone(),
            price_cents: bundle.unit_price_cents,
            discount_percent: bundle.discount_percent.unwrap_or(0),
            nickname: form.nickname().map(ToString::to_string),
            payment_method,
        })
    }

    #[must_use]
    pub fn price_label(&self) -> String {
        format_currency(self.price_cents)
    }
}
