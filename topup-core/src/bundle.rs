//! Purchasable bundles and the raw rows they are built from.
use crate::game::GameId;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Display bucket a bundle belongs to.
///
/// Variant order is the order sections appear on the storefront.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    Special,
    Diamonds,
    Subscription,
}

impl BundleKind {
    pub const ALL: [Self; 3] = [Self::Special, Self::Diamonds, Self::Subscription];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Special => "special",
            Self::Diamonds => "diamonds",
            Self::Subscription => "subscription",
        }
    }

    /// Section heading shown above the bucket.
    #[must_use]
    pub const fn section_title(self) -> &'static str {
        match self {
            Self::Special => "Best Seller",
            Self::Diamonds => "Saving Packages",
            Self::Subscription => "Subscription Packages",
        }
    }
}

impl FromStr for BundleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "special" => Ok(Self::Special),
            "diamonds" | "diamond" => Ok(Self::Diamonds),
            "subscription" => Ok(Self::Subscription),
            other => Err(other.to_string()),
        }
    }
}

/// Icon family for a bundle's badge label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Hot,
    Best,
    New,
    Premium,
    Plain,
}

impl BadgeTone {
    #[must_use]
    pub fn classify(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("hot") {
            Self::Hot
        } else if lower.contains("best") {
            Self::Best
        } else if lower.contains("new") {
            Self::New
        } else if lower.contains("premium") {
            Self::Premium
        } else {
            Self::Plain
        }
    }
}

/// A bundle as held by the client: a read-only snapshot from one catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    pub game: GameId,
    pub display_name: String,
    /// `None` when the catalog row carried no type or one we do not know.
    pub kind: Option<BundleKind>,
    /// Price in cents to avoid floating-point issues
    pub unit_price_cents: i64,
    #[serde(default)]
    pub original_price_cents: Option<i64>,
    #[serde(default)]
    pub discount_percent: Option<u32>,
    #[serde(default)]
    pub diamond_amount: Option<u32>,
    #[serde(default)]
    pub reseller_price_cents: Option<i64>,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub badge_label: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl Bundle {
    /// Build a bundle from a catalog row fetched for `game`.
    #[must_use]
    pub fn from_row(row: CatalogRow, game: GameId) -> Self {
        let kind = match row.kind.as_deref() {
            Some(raw) => match raw.parse::<BundleKind>() {
                Ok(kind) => Some(kind),
                Err(label) => {
                    log::warn!("bundle {} has unrecognized type '{label}'", row.id);
                    None
                }
            },
            None => None,
        };
        Self {
            id: row.id,
            game,
            display_name: row.name,
            kind,
            unit_price_cents: price_to_cents(row.price),
            original_price_cents: row.original_price.map(price_to_cents),
            discount_percent: row.discount_percent,
            diamond_amount: row.diamonds,
            reseller_price_cents: None,
            image_ref: row.image.filter(|s| !s.trim().is_empty()),
            badge_label: row.badge.filter(|s| !s.trim().is_empty()),
            code: row.code.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Whether a strike-through original price should be shown.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.original_price_cents.is_some() && self.discount_percent.is_some_and(|pct| pct > 0)
    }

    #[must_use]
    pub fn badge_tone(&self) -> Option<BadgeTone> {
        self.badge_label.as_deref().map(BadgeTone::classify)
    }
}

/// A catalog row as returned by the backend for one game.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub diamonds: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub code: Option<String>,
    #[serde(default, alias = "originalPrice")]
    pub original_price: Option<f64>,
    #[serde(default, alias = "discountApplied")]
    pub discount_percent: Option<u32>,
    #[serde(default, alias = "tagname")]
    pub badge: Option<String>,
}

/// A reseller price row as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResellerRow {
    #[serde(deserialize_with = "string_or_number")]
    pub product_id: String,
    pub game: String,
    pub price: f64,
}

/// A reseller price keyed by `(product_id, game)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResellerOverride {
    pub product_id: String,
    pub game: GameId,
    pub price_cents: i64,
}

impl ResellerOverride {
    /// Rows naming a game we do not sell are dropped.
    #[must_use]
    pub fn from_row(row: ResellerRow) -> Option<Self> {
        match row.game.parse::<GameId>() {
            Ok(game) => Some(Self {
                product_id: row.product_id,
                game,
                price_cents: price_to_cents(row.price),
            }),
            Err(err) => {
                log::warn!("skipping reseller price for {}: {err}", row.product_id);
                None
            }
        }
    }
}

/// Convert a decimal price from the backend into cents.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn price_to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// Format a cents amount as `$X.YY`.
#[must_use]
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawScalar {
    fn into_string(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawScalar::deserialize(deserializer).map(RawScalar::into_string)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawScalar>::deserialize(deserializer).map(|raw| raw.map(RawScalar::into_string))
}
