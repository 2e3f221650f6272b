//! Catalog loading: fetch, reseller overlay, and stale-response guarding.
use crate::bundle::{Bundle, CatalogRow, ResellerOverride, ResellerRow};
use crate::game::GameId;
use crate::grouper::{GroupedCatalog, ProductGrouper};
use crate::session::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("catalog request failed with status {0}")]
    Status(u16),
    #[error("catalog payload could not be decoded: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Alert text shown to the customer.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Transport(_) => "Could not reach the store. Check your connection and try again.",
            Self::Status(_) | Self::Decode(_) => {
                "Products are unavailable right now. Please try again later."
            }
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Read-only bundle source, filtered by game and ordered by id ascending.
#[async_trait(?Send)]
pub trait CatalogSource {
    async fn fetch_bundles(&self, game: GameId) -> Result<Vec<CatalogRow>, CatalogError>;
}

/// Read-only reseller price source for one game.
#[async_trait(?Send)]
pub trait ResellerPriceSource {
    async fn fetch_reseller_prices(&self, game: GameId) -> Result<Vec<ResellerRow>, CatalogError>;
}

/// Overlay reseller prices onto `bundles`, joined on `(bundle id, game)`.
///
/// Only `unit_price_cents` and `reseller_price_cents` change. Returns the
/// number of bundles that received an override.
pub fn apply_reseller_overrides(bundles: &mut [Bundle], overrides: &[ResellerOverride]) -> usize {
    let by_key: HashMap<(String, GameId), i64> = overrides
        .iter()
        .map(|o| ((o.product_id.clone(), o.game), o.price_cents))
        .collect();
    let mut applied = 0;
    for bundle in bundles.iter_mut() {
        let key = (bundle.id.clone(), bundle.game);
        if let Some(&price) = by_key.get(&key) {
            bundle.unit_price_cents = price;
            bundle.reseller_price_cents = Some(price);
            applied += 1;
        }
    }
    applied
}

/// Fetch the bundle list for `game`, overlaying reseller prices when the
/// session is a reseller.
///
/// A failed reseller fetch keeps the base catalog and is only logged; a failed
/// catalog fetch is returned to the caller. Nothing is retried.
///
/// # Errors
///
/// Returns an error if the catalog fetch fails.
pub async fn fetch_catalog<C, R>(
    session: Session,
    catalog: &C,
    reseller: &R,
    game: GameId,
) -> Result<Vec<Bundle>, CatalogError>
where
    C: CatalogSource + ?Sized,
    R: ResellerPriceSource + ?Sized,
{
    let rows = catalog.fetch_bundles(game).await?;
    let mut bundles: Vec<Bundle> = rows
        .into_iter()
        .map(|row| Bundle::from_row(row, game))
        .collect();

    if session.is_reseller() {
        match reseller.fetch_reseller_prices(game).await {
            Ok(rows) => {
                let overrides: Vec<ResellerOverride> = rows
                    .into_iter()
                    .filter_map(ResellerOverride::from_row)
                    .collect();
                let applied = apply_reseller_overrides(&mut bundles, &overrides);
                log::debug!("applied {applied} reseller prices to {game} catalog");
            }
            Err(err) => {
                log::warn!("reseller prices for {game} unavailable, using base prices: {err}");
            }
        }
    }

    Ok(bundles)
}

/// Identifies one catalog request so late responses can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    game: GameId,
    generation: u64,
}

impl FetchTicket {
    #[must_use]
    pub const fn game(&self) -> GameId {
        self.game
    }
}

/// What happened to a catalog response handed to [`CatalogLoader::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    Failed,
    /// The user moved on to another request before this one answered.
    Discarded,
}

/// Client-side catalog state for the active game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLoader {
    session: Session,
    active_game: GameId,
    generation: u64,
    loading: bool,
    bundles: Vec<Bundle>,
    error: Option<CatalogError>,
}

impl CatalogLoader {
    #[must_use]
    pub const fn new(session: Session, game: GameId) -> Self {
        Self {
            session,
            active_game: game,
            generation: 0,
            loading: false,
            bundles: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub const fn session(&self) -> Session {
        self.session
    }

    #[must_use]
    pub const fn active_game(&self) -> GameId {
        self.active_game
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    #[must_use]
    pub const fn error(&self) -> Option<&CatalogError> {
        self.error.as_ref()
    }

    /// Start a request for `game`. The previous list is dropped right away so
    /// bundles of one game are never shown under another.
    pub fn begin(&mut self, game: GameId) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        self.active_game = game;
        self.loading = true;
        self.bundles.clear();
        self.error = None;
        FetchTicket {
            game,
            generation: self.generation,
        }
    }

    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.game == self.active_game
    }

    /// Apply a response if it still belongs to the active request.
    pub fn commit(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Bundle>, CatalogError>,
    ) -> CommitOutcome {
        if !self.is_current(ticket) {
            log::debug!(
                "discarding stale {} catalog response (active: {})",
                ticket.game,
                self.active_game
            );
            return CommitOutcome::Discarded;
        }
        self.loading = false;
        match result {
            Ok(bundles) => {
                self.bundles = bundles;
                self.error = None;
                CommitOutcome::Applied
            }
            Err(err) => {
                log::warn!("{} catalog fetch failed: {err}", ticket.game);
                self.bundles.clear();
                self.error = Some(err);
                CommitOutcome::Failed
            }
        }
    }

    #[must_use]
    pub fn find(&self, bundle_id: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.id == bundle_id)
    }

    #[must_use]
    pub fn grouped(&self) -> GroupedCatalog {
        ProductGrouper::new(self.session).group(&self.bundles)
    }
}
