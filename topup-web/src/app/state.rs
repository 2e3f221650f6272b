use std::cell::RefCell;
use std::rc::Rc;
use topup_core::{
    CatalogLoader, CheckoutMachine, Carousel, FieldIssue, GameId, OrderForm, Session, StoreConfig,
};
use yew::prelude::*;

const EMBEDDED_CONFIG: &str = include_str!("../../static/config/store.json");

/// Mutable state shared between renders, timers and async tasks.
///
/// Reads always see the latest value, unlike a captured `UseStateHandle`,
/// which matters for responses that arrive after the user moved on.
pub struct Shared<T> {
    cell: Rc<RefCell<T>>,
    refresh: UseForceUpdateHandle,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            refresh: self.refresh.clone(),
        }
    }
}

impl<T> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T> Shared<T> {
    /// Read the current value.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.cell.borrow())
    }

    /// Mutate the value and schedule a re-render.
    pub fn update<R>(&self, write: impl FnOnce(&mut T) -> R) -> R {
        let out = write(&mut self.cell.borrow_mut());
        self.refresh.force_update();
        out
    }
}

impl<T: Clone> Shared<T> {
    pub fn snapshot(&self) -> T {
        self.cell.borrow().clone()
    }
}

#[hook]
pub fn use_shared<T: 'static, F: FnOnce() -> T>(init: F) -> Shared<T> {
    let cell = use_mut_ref(init);
    let refresh = use_force_update();
    Shared { cell, refresh }
}

/// Embedded skin, falling back to the built-in defaults when it is invalid.
#[must_use]
pub fn load_config() -> StoreConfig {
    StoreConfig::from_json(EMBEDDED_CONFIG).unwrap_or_else(|err| {
        log::error!("store config rejected, using defaults: {err}");
        StoreConfig::default_config()
    })
}

fn default_game(config: &StoreConfig) -> GameId {
    config
        .games
        .first()
        .map_or_else(GameId::default, |listing| listing.game)
}

#[derive(Clone, PartialEq)]
pub struct AppState {
    pub config: Rc<StoreConfig>,
    pub session: Session,
    pub form: Shared<OrderForm>,
    pub catalog: Shared<CatalogLoader>,
    pub checkout: Shared<CheckoutMachine>,
    pub carousel: Shared<Carousel>,
    pub alert: UseStateHandle<Option<AttrValue>>,
    pub field_issues: Shared<Vec<FieldIssue>>,
    pub lookup_pending: Shared<bool>,
    pub now_ms: UseStateHandle<Option<f64>>,
    pub show_popup: UseStateHandle<bool>,
    pub show_promo: UseStateHandle<bool>,
}

#[hook]
pub fn use_app_state() -> AppState {
    let config = use_memo((), |()| load_config());
    let session = *use_memo((), {
        let key = config.storage.reseller_flag.clone();
        move |()| crate::storage::load_session(&key)
    });
    let first_game = default_game(&config);
    let cooldown = config.cooldown_secs;
    let banner_count = config.banners.len();
    let popup = config.popup_banner.enabled;
    let promo = config.promo.enabled;

    AppState {
        form: use_shared(|| OrderForm::new(first_game)),
        catalog: use_shared(|| CatalogLoader::new(session, first_game)),
        checkout: use_shared(|| CheckoutMachine::new(cooldown)),
        carousel: use_shared(|| Carousel::new(banner_count)),
        alert: use_state(|| None::<AttrValue>),
        field_issues: use_shared(Vec::<FieldIssue>::new),
        lookup_pending: use_shared(|| false),
        now_ms: use_state(crate::dom::now_millis),
        show_popup: use_state(|| popup),
        show_promo: use_state(|| promo),
        config,
        session,
    }
}

impl AppState {
    #[must_use]
    pub fn active_game(&self) -> GameId {
        self.form.with(OrderForm::game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_is_valid() {
        let config = StoreConfig::from_json(EMBEDDED_CONFIG).unwrap();
        assert_eq!(default_game(&config), GameId::Mlbb);
        assert_eq!(config.cooldown_secs, 5);
        assert_eq!(load_config(), config);
    }
}
