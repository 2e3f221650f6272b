use anyhow::{Context, Result};
use futures::executor::block_on;
use std::sync::Arc;
use topup_core::constants::MAX_COOLDOWN_SECS;
use topup_core::{
    Bundle, CatalogError, CatalogLoader, CheckoutError, CheckoutMachine, CheckoutState,
    CommitOutcome, GameId, GroupedCatalog, LookupOutcome, OrderForm, OrderSummary, PaymentMethod,
    Session, Storefront, resolve_nickname,
};

use super::fixtures::{FixtureBackend, FixtureLookup, MemoryStore, UNKNOWN_ACCOUNT_PREFIX};

/// Which account the simulated customer types in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountPlan {
    Known,
    Unknown,
    Blank,
}

impl AccountPlan {
    #[must_use]
    pub fn account_id(self, iteration: usize) -> String {
        match self {
            Self::Known => (100_000_000 + iteration).to_string(),
            Self::Unknown => format!("{UNKNOWN_ACCOUNT_PREFIX}{iteration:06}"),
            Self::Blank => String::new(),
        }
    }
}

#[must_use]
pub fn zone_for(iteration: usize) -> String {
    (1000 + iteration % 9000).to_string()
}

/// Declarative plan for one customer visit.
#[derive(Debug, Clone)]
pub struct FlowPlan {
    pub game: GameId,
    pub session: Session,
    pub cooldown_secs: u32,
    pub payment: Option<PaymentMethod>,
    pub account: AccountPlan,
    pub select_bundle: bool,
    pub backend: FixtureBackend,
    pub expectations: Vec<FlowExpectation>,
}

impl FlowPlan {
    #[must_use]
    pub fn new(game: GameId, session: Session) -> Self {
        Self {
            game,
            session,
            cooldown_secs: topup_core::constants::DEFAULT_COOLDOWN_SECS,
            payment: Some(PaymentMethod::Khqr),
            account: AccountPlan::Known,
            select_bundle: true,
            backend: FixtureBackend::default(),
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_cooldown(mut self, secs: u32) -> Self {
        self.cooldown_secs = secs;
        self
    }

    #[must_use]
    pub const fn with_payment(mut self, payment: Option<PaymentMethod>) -> Self {
        self.payment = payment;
        self
    }

    #[must_use]
    pub const fn with_account(mut self, account: AccountPlan) -> Self {
        self.account = account;
        self
    }

    #[must_use]
    pub const fn without_bundle(mut self) -> Self {
        self.select_bundle = false;
        self
    }

    #[must_use]
    pub const fn with_backend(mut self, backend: FixtureBackend) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<FlowExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a visit completes.
type FlowExpectationFn = Arc<dyn Fn(&FlowSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct FlowExpectation(FlowExpectationFn);

impl std::fmt::Debug for FlowExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowExpectation").finish()
    }
}

impl FlowExpectation {
    pub fn evaluate(&self, summary: &FlowSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for FlowExpectation
where
    F: Fn(&FlowSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Everything observed during one visit.
#[derive(Debug, Clone)]
pub struct FlowSummary {
    pub iteration: usize,
    pub game: GameId,
    pub session: Session,
    pub bundles: Vec<Bundle>,
    pub grouped: GroupedCatalog,
    pub catalog_error: Option<CatalogError>,
    /// Outcome of a response for a request the customer already moved past.
    pub stale_commit: CommitOutcome,
    /// Outcome of a lookup answered after the account field was edited.
    pub stale_lookup: LookupOutcome,
    pub lookup: LookupOutcome,
    pub form: OrderForm,
    /// The form as a fresh page load restores it.
    pub restored: OrderForm,
    pub checkout: Result<OrderSummary, CheckoutError>,
    /// Rejection for a second submit made during the cooldown.
    pub resubmit: Option<CheckoutError>,
    pub states: Vec<&'static str>,
    pub cooldown_ticks: u32,
}

fn other_game(game: GameId) -> GameId {
    GameId::ALL
        .iter()
        .copied()
        .find(|g| *g != game)
        .unwrap_or(game)
}

/// Drives a [`FlowPlan`] through the storefront engine with in-memory fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowRunner;

impl FlowRunner {
    /// Run one visit.
    ///
    /// # Errors
    ///
    /// Returns an error if form storage fails, which the fixtures never do.
    pub fn run(&self, plan: &FlowPlan, iteration: usize) -> Result<FlowSummary> {
        block_on(Self::visit(plan, iteration))
    }

    async fn visit(plan: &FlowPlan, iteration: usize) -> Result<FlowSummary> {
        let store = MemoryStore::default();
        let shop = Storefront::new(plan.session, plan.backend.clone(), FixtureLookup, store);
        let mut form = shop
            .restore_form(plan.game)
            .context("restoring blank form")?;

        // The customer switches game while the first request is in flight.
        let mut loader = CatalogLoader::new(plan.session, plan.game);
        let stale = loader.begin(other_game(plan.game));
        let current = loader.begin(plan.game);
        let fetched = shop.catalog(plan.game).await;
        let stale_commit = loader.commit(stale, shop.catalog(stale.game()).await);
        loader.commit(current, fetched);

        let account_id = plan.account.account_id(iteration);
        form.set_account_id(account_id.clone());
        if form.zone_required() {
            form.set_zone_id(zone_for(iteration));
        }

        let stale_lookup = match form.begin_lookup() {
            Ok((ticket, request)) => {
                let answer = resolve_nickname(&FixtureLookup, &request).await;
                form.set_account_id(account_id);
                form.apply_lookup(ticket, answer)
            }
            Err(err) => LookupOutcome::Failed(err),
        };
        let lookup = shop.validate_account(&mut form).await;

        if plan.select_bundle && !loader.bundles().is_empty() {
            let bundle = &loader.bundles()[iteration % loader.bundles().len()];
            form.select_bundle(bundle.clone());
        }

        shop.save_form(&form).context("saving form")?;
        let restored = shop
            .restore_form(other_game(plan.game))
            .context("restoring saved form")?;

        let mut machine = CheckoutMachine::new(plan.cooldown_secs);
        machine.select_payment_method(plan.payment);
        let mut states = vec![machine.state().name()];
        let checkout = machine.submit(&form);
        states.push(machine.state().name());

        let mut resubmit = None;
        let mut cooldown_ticks = 0;
        if checkout.is_ok() {
            machine.dismiss_payment();
            states.push(machine.state().name());
            resubmit = machine.submit(&form).err();
            while !matches!(machine.state(), CheckoutState::Idle)
                && cooldown_ticks <= MAX_COOLDOWN_SECS
            {
                machine.tick();
                cooldown_ticks += 1;
            }
            states.push(machine.state().name());
        }

        Ok(FlowSummary {
            iteration,
            game: plan.game,
            session: plan.session,
            bundles: loader.bundles().to_vec(),
            grouped: loader.grouped(),
            catalog_error: loader.error().cloned(),
            stale_commit,
            stale_lookup,
            lookup,
            form,
            restored,
            checkout,
            resubmit,
            states,
            cooldown_ticks,
        })
    }
}
