//! Browser clients for the hosted catalog tables and account lookups.
use crate::dom::{self, FetchedText};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use topup_core::config::BackendConfig;
use topup_core::{
    AccountLookup, CatalogError, CatalogRow, CatalogSource, GameId, LookupError, LookupRequest,
    ResellerPriceSource, ResellerRow,
};

/// Read-only REST client for the catalog and reseller price tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestBackend {
    base_url: String,
    api_key: String,
    reseller_table: String,
}

impl RestBackend {
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            reseller_table: config.reseller_table.clone(),
        }
    }

    /// Rows for `game`, ordered by id ascending.
    #[must_use]
    pub fn catalog_url(&self, game: GameId) -> String {
        format!(
            "{}/rest/v1/{}?select=*&game=eq.{}&order=id.asc",
            self.base_url,
            game.catalog_table(),
            game.code()
        )
    }

    #[must_use]
    pub fn reseller_url(&self, game: GameId) -> String {
        format!(
            "{}/rest/v1/{}?select=product_id,game,price&game=eq.{}",
            self.base_url,
            self.reseller_table,
            game.code()
        )
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Accept", "application/json".to_string())];
        if !self.api_key.is_empty() {
            headers.push(("apikey", self.api_key.clone()));
            headers.push(("Authorization", format!("Bearer {}", self.api_key)));
        }
        headers
    }

    async fn get(&self, url: &str) -> Result<FetchedText, CatalogError> {
        let headers = self.headers();
        let borrowed: Vec<(&str, &str)> = headers
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        let fetched = dom::fetch_text(url, &borrowed)
            .await
            .map_err(|err| CatalogError::Transport(dom::js_error_message(&err)))?;
        if !fetched.is_success() {
            return Err(CatalogError::Status(fetched.status));
        }
        Ok(fetched)
    }
}

#[async_trait(?Send)]
impl CatalogSource for RestBackend {
    async fn fetch_bundles(&self, game: GameId) -> Result<Vec<CatalogRow>, CatalogError> {
        let fetched = self.get(&self.catalog_url(game)).await?;
        Ok(serde_json::from_str(&fetched.body)?)
    }
}

#[async_trait(?Send)]
impl ResellerPriceSource for RestBackend {
    async fn fetch_reseller_prices(&self, game: GameId) -> Result<Vec<ResellerRow>, CatalogError> {
        let fetched = self.get(&self.reseller_url(game)).await?;
        Ok(serde_json::from_str(&fetched.body)?)
    }
}

/// Per-game account lookup endpoints filled from URL templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpLookup {
    templates: BTreeMap<GameId, String>,
}

impl HttpLookup {
    #[must_use]
    pub const fn new(templates: BTreeMap<GameId, String>) -> Self {
        Self { templates }
    }

    #[must_use]
    pub fn url_for(&self, request: &LookupRequest) -> Option<String> {
        self.templates
            .get(&request.game())
            .map(|template| request.url(template))
    }
}

#[async_trait(?Send)]
impl AccountLookup for HttpLookup {
    async fn lookup(&self, request: &LookupRequest) -> Result<Value, LookupError> {
        let url = self.url_for(request).ok_or_else(|| {
            LookupError::Transport(format!("no lookup endpoint for {}", request.game()))
        })?;
        let fetched = dom::fetch_text(&url, &[("Accept", "application/json")])
            .await
            .map_err(|err| LookupError::Transport(dom::js_error_message(&err)))?;
        if fetched.status == 404 {
            return Err(LookupError::NotFound);
        }
        if !fetched.is_success() {
            return Err(LookupError::Status(fetched.status));
        }
        serde_json::from_str(&fetched.body).map_err(|err| LookupError::Malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(key: &str) -> RestBackend {
        RestBackend::new(&BackendConfig {
            base_url: "https://db.test/".to_string(),
            api_key: key.to_string(),
            reseller_table: "reseller_prices".to_string(),
        })
    }

    #[test]
    fn catalog_urls_filter_by_game_and_order_by_id() {
        let api = backend("");
        assert_eq!(
            api.catalog_url(GameId::MlbbPh),
            "https://db.test/rest/v1/mlbb_products?select=*&game=eq.mlbb_ph&order=id.asc"
        );
        assert_eq!(
            api.reseller_url(GameId::FreeFire),
            "https://db.test/rest/v1/reseller_prices?select=product_id,game,price&game=eq.freefire"
        );
    }

    #[test]
    fn api_key_is_sent_twice() {
        assert_eq!(backend("").headers().len(), 1);
        let headers = backend("anon").headers();
        assert!(headers.contains(&("apikey", "anon".to_string())));
        assert!(headers.contains(&("Authorization", "Bearer anon".to_string())));
    }

    #[test]
    fn lookup_urls_come_from_templates() {
        let mut templates = BTreeMap::new();
        templates.insert(GameId::Mlbb, "https://id.test/ml/{id}/{zone}".to_string());
        let lookup = HttpLookup::new(templates);
        let ml = LookupRequest::new(GameId::Mlbb, "123", "45").unwrap();
        assert_eq!(lookup.url_for(&ml).as_deref(), Some("https://id.test/ml/123/45"));
        let ff = LookupRequest::new(GameId::FreeFire, "9", "").unwrap();
        assert!(lookup.url_for(&ff).is_none());
    }
}
