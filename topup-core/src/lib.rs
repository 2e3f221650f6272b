//! Top-up Storefront Core
//!
//! Platform-agnostic storefront logic for game top-up shops: catalog loading
//! with reseller pricing, product grouping, account validation, the order
//! form and the checkout state machine. No DOM or network dependencies live
//! here; platforms plug in through the source and storage traits.

pub mod bundle;
pub mod carousel;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod config;
pub mod constants;
pub mod countdown;
pub mod form;
pub mod game;
pub mod grouper;
pub mod order;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use bundle::{
    BadgeTone, Bundle, BundleKind, CatalogRow, ResellerOverride, ResellerRow, format_currency,
    price_to_cents,
};
pub use carousel::Carousel;
pub use catalog::{
    CatalogError, CatalogLoader, CatalogSource, CommitOutcome, FetchTicket, ResellerPriceSource,
    apply_reseller_overrides, fetch_catalog,
};
pub use checkout::{CheckoutError, CheckoutMachine, CheckoutState, FieldIssue, PaymentMethod};
pub use clock::StoreClock;
pub use config::{ConfigError, StoreConfig};
pub use countdown::{Countdown, format_duration};
pub use form::{FormStore, LookupOutcome, LookupTicket, OrderForm, PersistedForm};
pub use game::{GameId, UnknownGame};
pub use grouper::{DiamondShelves, GroupedCatalog, ProductGrouper, group_bundles};
pub use order::{OrderSummary, bundle_code, format_order_string};
pub use session::Session;
pub use validation::{
    AccountLookup, LookupError, LookupRequest, ValidationResult, parse_lookup_response,
    resolve_nickname,
};

use anyhow::Context;

/// Storefront engine wiring the backend, lookup and form storage together.
pub struct Storefront<B, L, F>
where
    B: CatalogSource + ResellerPriceSource,
    L: AccountLookup,
    F: FormStore,
{
    session: Session,
    backend: B,
    lookup: L,
    store: F,
}

impl<B, L, F> Storefront<B, L, F>
where
    B: CatalogSource + ResellerPriceSource,
    L: AccountLookup,
    F: FormStore,
{
    /// Create a storefront for one visit.
    pub const fn new(session: Session, backend: B, lookup: L, store: F) -> Self {
        Self {
            session,
            backend,
            lookup,
            store,
        }
    }

    pub const fn session(&self) -> Session {
        self.session
    }

    /// Restore the saved form, or start a blank one for `default_game`.
    ///
    /// # Errors
    ///
    /// Returns an error if the form store cannot be read.
    pub fn restore_form(&self, default_game: GameId) -> Result<OrderForm, F::Error> {
        Ok(self
            .store
            .load_form()?
            .map_or_else(|| OrderForm::new(default_game), OrderForm::restore))
    }

    /// Persist the form's identifying fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the form cannot be saved.
    pub fn save_form(&self, form: &OrderForm) -> Result<(), F::Error> {
        self.store.save_form(&form.persisted())
    }

    /// Fetch the catalog for `game` with this session's pricing.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fetch fails.
    pub async fn catalog(&self, game: GameId) -> Result<Vec<Bundle>, CatalogError> {
        fetch_catalog(self.session, &self.backend, &self.backend, game).await
    }

    /// Fetch and group the catalog for `game`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fetch fails.
    pub async fn grouped_catalog(&self, game: GameId) -> Result<GroupedCatalog, CatalogError> {
        let bundles = self.catalog(game).await?;
        Ok(ProductGrouper::new(self.session).group(&bundles))
    }

    /// Look up the account in `form`, record the outcome on it and save the
    /// form when the nickname changed. A failed save is logged, not returned.
    pub async fn validate_account(&self, form: &mut OrderForm) -> LookupOutcome {
        let (ticket, request) = match form.begin_lookup() {
            Ok(pair) => pair,
            Err(err) => return LookupOutcome::Failed(err),
        };
        let result = resolve_nickname(&self.lookup, &request).await;
        let outcome = form.apply_lookup(ticket, result);
        if outcome.changes_form()
            && let Err(err) = self.save_form(form)
        {
            log::warn!("order form not saved after lookup: {err}");
        }
        outcome
    }

    /// Restore the saved form and load its game's catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the form store or the catalog cannot be read.
    pub async fn open(&self, default_game: GameId) -> anyhow::Result<(OrderForm, Vec<Bundle>)>
    where
        F::Error: Into<anyhow::Error>,
    {
        let form = self
            .restore_form(default_game)
            .map_err(Into::<anyhow::Error>::into)
            .context("restoring saved order form")?;
        let bundles = self
            .catalog(form.game())
            .await
            .with_context(|| format!("loading {} catalog", form.game()))?;
        Ok((form, bundles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FixtureBackend;

    #[async_trait(?Send)]
    impl CatalogSource for FixtureBackend {
        async fn fetch_bundles(&self, game: GameId) -> Result<Vec<CatalogRow>, CatalogError> {
            let rows = json!([
                {"id": 9, "name": "172 Diamonds", "price": 2.2, "type": "diamonds", "diamonds": 172},
                {"id": 10, "name": "Weekly Pass", "price": 1.5, "type": "subscription"},
                {"id": 11, "name": "Mystery", "price": 0.5, "type": game.code()}
            ]);
            Ok(serde_json::from_value(rows)?)
        }
    }

    #[async_trait(?Send)]
    impl ResellerPriceSource for FixtureBackend {
        async fn fetch_reseller_prices(
            &self,
            _game: GameId,
        ) -> Result<Vec<ResellerRow>, CatalogError> {
            Ok(vec![ResellerRow {
                product_id: "9".into(),
                game: "mlbb".into(),
                price: 1.9,
            }])
        }
    }

    struct FixtureLookup;

    #[async_trait(?Send)]
    impl AccountLookup for FixtureLookup {
        async fn lookup(&self, request: &LookupRequest) -> Result<Value, LookupError> {
            if request.account_id() == "404" {
                return Ok(json!({"success": false}));
            }
            Ok(json!({"success": true, "data": {"nickname": "Shadow"}}))
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        saved: Rc<RefCell<Option<PersistedForm>>>,
    }

    impl FormStore for MemoryStore {
        type Error = Infallible;

        fn load_form(&self) -> Result<Option<PersistedForm>, Self::Error> {
            Ok(self.saved.borrow().clone())
        }

        fn save_form(&self, form: &PersistedForm) -> Result<(), Self::Error> {
            *self.saved.borrow_mut() = Some(form.clone());
            Ok(())
        }

        fn clear_form(&self) -> Result<(), Self::Error> {
            self.saved.borrow_mut().take();
            Ok(())
        }
    }

    fn storefront(session: Session) -> Storefront<FixtureBackend, FixtureLookup, MemoryStore> {
        Storefront::new(session, FixtureBackend, FixtureLookup, MemoryStore::default())
    }

    #[test]
    fn full_order_flow() {
        let shop = storefront(Session::reseller());
        let (mut form, bundles) = block_on(shop.open(GameId::Mlbb)).unwrap();
        assert_eq!(bundles.len(), 3);

        form.set_account_id("123456789");
        form.set_zone_id("1234");
        let outcome = block_on(shop.validate_account(&mut form));
        assert_eq!(outcome, LookupOutcome::Found("Shadow".into()));

        let chosen = bundles.iter().find(|b| b.id == "9").cloned().unwrap();
        assert_eq!(chosen.unit_price_cents, 190);
        form.select_bundle(chosen);

        let mut checkout = CheckoutMachine::default();
        checkout.select_payment_method(Some(PaymentMethod::Khqr));
        let summary = checkout.submit(&form).unwrap();
        assert_eq!(summary.order_string, "123456789 1234 172");
        assert_eq!(summary.price_label(), "$1.90");
    }

    #[test]
    fn saved_form_survives_restart() {
        let shop = storefront(Session::guest());
        let mut form = shop.restore_form(GameId::FreeFire).unwrap();
        assert_eq!(form.game(), GameId::FreeFire);
        form.set_account_id("42");
        block_on(shop.validate_account(&mut form));
        shop.save_form(&form).unwrap();

        let restored = shop.restore_form(GameId::Mlbb).unwrap();
        assert_eq!(restored.game(), GameId::FreeFire);
        assert_eq!(restored.account_id(), "42");
        assert_eq!(restored.nickname(), Some("Shadow"));
        assert!(!restored.is_validated());
    }

    #[test]
    fn unknown_accounts_are_reported() {
        let shop = storefront(Session::guest());
        let mut form = OrderForm::new(GameId::FreeFire);
        form.set_account_id("404");
        assert_eq!(
            block_on(shop.validate_account(&mut form)),
            LookupOutcome::Failed(LookupError::NotFound)
        );
        form.set_account_id("");
        assert_eq!(
            block_on(shop.validate_account(&mut form)),
            LookupOutcome::Failed(LookupError::MissingAccountId)
        );
    }

    #[test]
    fn failed_lookup_forgets_the_saved_nickname() {
        let shop = storefront(Session::guest());
        shop.save_form(&OrderForm::restore(PersistedForm {
            account_id: "404".into(),
            game: GameId::FreeFire,
            nickname: Some("Shadow".into()),
            ..PersistedForm::default()
        }))
        .unwrap();

        let mut form = shop.restore_form(GameId::Mlbb).unwrap();
        assert_eq!(form.nickname(), Some("Shadow"));
        assert_eq!(
            block_on(shop.validate_account(&mut form)),
            LookupOutcome::Failed(LookupError::NotFound)
        );

        let reloaded = shop.restore_form(GameId::Mlbb).unwrap();
        assert_eq!(reloaded.account_id(), "404");
        assert_eq!(reloaded.nickname(), None);
    }

    #[test]
    fn guests_group_without_reseller_prices() {
        let shop = storefront(Session::guest());
        let grouped = block_on(shop.grouped_catalog(GameId::Mlbb)).unwrap();
        let kinds: Vec<_> = grouped.iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            [BundleKind::Special, BundleKind::Diamonds, BundleKind::Subscription]
        );
        assert!(grouped.flatten().all(|b| b.reseller_price_cents.is_none()));
    }
}
