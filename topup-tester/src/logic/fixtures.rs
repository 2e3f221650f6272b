//! In-memory stand-ins for the storefront backend, the account lookup
//! service and browser storage.
use async_trait::async_trait;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use topup_core::{
    AccountLookup, CatalogError, CatalogRow, CatalogSource, FormStore, GameId, LookupError,
    LookupRequest, PersistedForm, ResellerPriceSource, ResellerRow,
};

/// Account ids starting with this prefix are unknown to [`FixtureLookup`].
pub const UNKNOWN_ACCOUNT_PREFIX: &str = "404";

/// Reseller price for every bundle the fixture backend overrides.
pub const RESELLER_PRICE: f64 = 0.5;

fn zone_game_rows() -> Value {
    json!([
        {"id": 1, "name": "Weekly Diamond Pass", "price": 1.45, "type": "diamonds", "diamonds": 220},
        {"id": 2, "name": "86 Diamonds", "price": 1.2, "type": "diamonds", "diamonds": 86},
        {"id": 3, "name": "172 Diamonds", "price": 2.2, "type": "diamonds", "diamonds": 172,
         "originalPrice": 2.5, "discountApplied": 12, "tagname": "Hot"},
        {"id": 4, "name": "Twilight Pass", "price": 7.5, "type": "subscription", "code": "TWP"},
        {"id": 5, "name": "Starlight Bonus", "price": 3.0, "type": "special", "code": "SLB",
         "tagname": "Best Seller"},
        {"id": 6, "name": "Mystery Crate", "price": 0.99, "type": "crate"}
    ])
}

fn zoneless_game_rows() -> Value {
    json!([
        {"id": 11, "name": "100 Diamonds", "price": 0.95, "type": "diamonds", "diamonds": 100},
        {"id": 12, "name": "310 Diamonds", "price": 2.85, "type": "diamonds", "diamonds": 310,
         "code": "FF-310"},
        {"id": 13, "name": "Weekly Membership", "price": 1.9, "type": "subscription"},
        {"id": 14, "name": "Level Up Pass", "price": 0.8, "code": "LUP"}
    ])
}

/// Catalog rows the fixture backend serves for `game`.
///
/// # Errors
///
/// Returns an error if the fixture rows do not decode.
pub fn catalog_rows(game: GameId) -> Result<Vec<CatalogRow>, CatalogError> {
    let rows = if game.requires_zone() {
        zone_game_rows()
    } else {
        zoneless_game_rows()
    };
    Ok(serde_json::from_value(rows)?)
}

/// Backend serving fixed catalogs plus reseller prices for odd bundle ids.
#[derive(Debug, Clone, Default)]
pub struct FixtureBackend {
    pub catalog_down: bool,
    pub reseller_down: bool,
}

#[async_trait(?Send)]
impl CatalogSource for FixtureBackend {
    async fn fetch_bundles(&self, game: GameId) -> Result<Vec<CatalogRow>, CatalogError> {
        if self.catalog_down {
            return Err(CatalogError::Status(503));
        }
        catalog_rows(game)
    }
}

#[async_trait(?Send)]
impl ResellerPriceSource for FixtureBackend {
    async fn fetch_reseller_prices(&self, game: GameId) -> Result<Vec<ResellerRow>, CatalogError> {
        if self.reseller_down {
            return Err(CatalogError::Transport("connection reset".into()));
        }
        let mut rows: Vec<ResellerRow> = catalog_rows(game)?
            .into_iter()
            .filter(|row| row.id.parse::<u32>().is_ok_and(|id| id % 2 == 1))
            .map(|row| ResellerRow {
                product_id: row.id,
                game: game.code().to_string(),
                price: RESELLER_PRICE,
            })
            .collect();
        // A row for a game we do not sell must be ignored.
        rows.push(ResellerRow {
            product_id: "2".into(),
            game: "pubg".into(),
            price: 0.01,
        });
        Ok(rows)
    }
}

/// Lookup service that knows every account outside [`UNKNOWN_ACCOUNT_PREFIX`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureLookup;

impl FixtureLookup {
    #[must_use]
    pub fn nickname_for(account_id: &str) -> String {
        format!("Player{}", account_id.chars().rev().take(4).collect::<String>())
    }
}

#[async_trait(?Send)]
impl AccountLookup for FixtureLookup {
    async fn lookup(&self, request: &LookupRequest) -> Result<Value, LookupError> {
        if request.account_id().starts_with(UNKNOWN_ACCOUNT_PREFIX) {
            return Ok(json!({"success": false, "message": "not found"}));
        }
        Ok(json!({
            "success": true,
            "data": {"nickname": Self::nickname_for(request.account_id())}
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("storage is unavailable")]
pub struct StorageUnavailable;

/// Form storage shared between clones, like one browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Rc<RefCell<Option<PersistedForm>>>,
}

impl FormStore for MemoryStore {
    type Error = StorageUnavailable;

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

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn every_game_has_a_decodable_catalog() {
        for game in GameId::ALL {
            let rows = catalog_rows(game).expect("fixture rows decode");
            assert!(!rows.is_empty(), "{game} has no fixture rows");
        }
    }

    #[test]
    fn reseller_prices_cover_odd_ids_only() {
        let rows = block_on(FixtureBackend::default().fetch_reseller_prices(GameId::Mlbb))
            .expect("reseller rows");
        let ids: Vec<&str> = rows
            .iter()
            .filter(|r| r.game == "mlbb")
            .map(|r| r.product_id.as_str())
            .collect();
        assert_eq!(ids, ["1", "3", "5"]);
    }

    #[test]
    fn unknown_prefix_is_reported_as_failure() {
        let request = LookupRequest::new(GameId::FreeFire, "404123", "").expect("request");
        let payload = block_on(FixtureLookup.lookup(&request)).expect("payload");
        assert_eq!(
            topup_core::parse_lookup_response(&payload),
            Err(LookupError::NotFound)
        );
    }
}
