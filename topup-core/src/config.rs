//! Store skin configuration.
//!
//! One `StoreConfig` describes a storefront: branding, banners, accepted
//! payment methods, backend endpoints and checkout tuning.
use crate::checkout::PaymentMethod;
use crate::clock::StoreClock;
use crate::constants::{
    DEFAULT_CLOCK_UTC_OFFSET_HOURS, DEFAULT_COOLDOWN_SECS, FORM_STORAGE_KEY, MAX_COOLDOWN_SECS,
    MIN_COOLDOWN_SECS, RESELLER_FLAG_KEY,
};
use crate::game::GameId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid store config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be within [{min}, {max}] (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("lookup template for {0} has no {{id}} placeholder")]
    MissingPlaceholder(GameId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary: String,
    pub accent: String,
    pub background: String,
    pub font: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#16a34a".to_string(),
            accent: "#facc15".to_string(),
            background: "#ffffff".to_string(),
            font: "Inter, sans-serif".to_string(),
        }
    }
}

impl Theme {
    /// Inline CSS custom properties for the app root.
    #[must_use]
    pub fn css_vars(&self) -> String {
        format!(
            "--topup-primary:{};--topup-accent:{};--topup-bg:{};--topup-font:{};",
            self.primary, self.accent, self.background, self.font
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupBanner {
    pub enabled: bool,
    pub image: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoToast {
    pub enabled: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub url: String,
}

/// A game tile on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListing {
    pub game: GameId,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
}

/// Hosted backend the catalog and reseller tables are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Public (anon) key; sent as `apikey` and bearer token.
    pub api_key: String,
    pub reseller_table: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://backend.example.com".to_string(),
            api_key: String::new(),
            reseller_table: "reseller_prices".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub form: String,
    pub reseller_flag: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            form: FORM_STORAGE_KEY.to_string(),
            reseller_flag: RESELLER_FLAG_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub name: String,
    pub tagline: String,
    pub theme: Theme,
    pub banners: Vec<String>,
    pub rotate_banners: bool,
    pub popup_banner: PopupBanner,
    pub promo: PromoToast,
    pub payment_methods: Vec<PaymentMethod>,
    pub contact: Vec<ContactLink>,
    pub games: Vec<GameListing>,
    pub backend: BackendConfig,
    /// Account lookup URL templates with `{id}` and optional `{zone}`.
    pub lookup: BTreeMap<GameId, String>,
    pub cooldown_secs: u32,
    pub clock_utc_offset_hours: i32,
    pub storage: StorageKeys,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl StoreConfig {
    #[must_use]
    pub fn default_config() -> Self {
        let lookup = GameId::ALL
            .into_iter()
            .map(|game| {
                let template = if game.requires_zone() {
                    format!("https://lookup.example.com/{}?id={{id}}&zone={{zone}}", game.code())
                } else {
                    format!("https://lookup.example.com/{}?id={{id}}", game.code())
                };
                (game, template)
            })
            .collect();
        Self {
            name: "Top-up Store".to_string(),
            tagline: "Premium Gaming Store".to_string(),
            theme: Theme::default(),
            banners: vec![
                "/static/img/banner-mlbb.webp".to_string(),
                "/static/img/banner-freefire.webp".to_string(),
            ],
            rotate_banners: true,
            popup_banner: PopupBanner::default(),
            promo: PromoToast::default(),
            payment_methods: PaymentMethod::ALL.to_vec(),
            contact: Vec::new(),
            games: GameId::ALL
                .into_iter()
                .map(|game| GameListing {
                    game,
                    image: None,
                    badge: None,
                })
                .collect(),
            backend: BackendConfig::default(),
            lookup,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            clock_utc_offset_hours: DEFAULT_CLOCK_UTC_OFFSET_HOURS,
            storage: StorageKeys::default(),
        }
    }

    /// Parse and validate a skin file. Missing fields take default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates its documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Empty("name"));
        }
        if !(MIN_COOLDOWN_SECS..=MAX_COOLDOWN_SECS).contains(&self.cooldown_secs) {
            return Err(ConfigError::RangeViolation {
                field: "cooldown_secs",
                min: i64::from(MIN_COOLDOWN_SECS),
                max: i64::from(MAX_COOLDOWN_SECS),
                value: i64::from(self.cooldown_secs),
            });
        }
        if StoreClock::new(self.clock_utc_offset_hours).is_none() {
            return Err(ConfigError::RangeViolation {
                field: "clock_utc_offset_hours",
                min: -12,
                max: 14,
                value: i64::from(self.clock_utc_offset_hours),
            });
        }
        if self.rotate_banners && self.banners.is_empty() {
            return Err(ConfigError::Empty("banners"));
        }
        if self.payment_methods.is_empty() {
            return Err(ConfigError::Empty("payment_methods"));
        }
        if self.games.is_empty() {
            return Err(ConfigError::Empty("games"));
        }
        if let Some((game, _)) = self
            .lookup
            .iter()
            .find(|(_, template)| !template.contains("{id}"))
        {
            return Err(ConfigError::MissingPlaceholder(*game));
        }
        Ok(())
    }

    #[must_use]
    pub fn clock(&self) -> StoreClock {
        StoreClock::new(self.clock_utc_offset_hours).unwrap_or_else(|| {
            log::warn!(
                "clock offset {} is invalid, falling back to UTC",
                self.clock_utc_offset_hours
            );
            StoreClock::utc()
        })
    }

    #[must_use]
    pub fn listing(&self, game: GameId) -> Option<&GameListing> {
        self.games.iter().find(|listing| listing.game == game)
    }
}
