//! Supported games and their per-game wiring.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A game the storefront sells top-ups for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum GameId {
    #[default]
    #[serde(rename = "mlbb")]
    Mlbb,
    #[serde(rename = "mlbb_ph")]
    MlbbPh,
    #[serde(rename = "freefire")]
    FreeFire,
    #[serde(rename = "freefire_th")]
    FreeFireTh,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game code: {0}")]
pub struct UnknownGame(pub String);

impl GameId {
    pub const ALL: [Self; 4] = [Self::Mlbb, Self::MlbbPh, Self::FreeFire, Self::FreeFireTh];

    /// Wire code used by the backend tables and the persisted form.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Mlbb => "mlbb",
            Self::MlbbPh => "mlbb_ph",
            Self::FreeFire => "freefire",
            Self::FreeFireTh => "freefire_th",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Mlbb => "Mobile Legends",
            Self::MlbbPh => "Mobile Legends PH",
            Self::FreeFire => "Free Fire",
            Self::FreeFireTh => "Free Fire TH",
        }
    }

    /// Zone-based games need a server/zone id next to the account id.
    #[must_use]
    pub const fn requires_zone(self) -> bool {
        matches!(self, Self::Mlbb | Self::MlbbPh)
    }

    /// Backend table holding this game's bundles.
    #[must_use]
    pub const fn catalog_table(self) -> &'static str {
        match self {
            Self::Mlbb | Self::MlbbPh => "mlbb_products",
            Self::FreeFire | Self::FreeFireTh => "freefire_products",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GameId {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|game| game.code() == needle)
            .ok_or(UnknownGame(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_str() {
        for game in GameId::ALL {
            assert_eq!(game.code().parse::<GameId>().unwrap(), game);
        }
        assert_eq!(" MLBB ".parse::<GameId>().unwrap(), GameId::Mlbb);
        assert!("pubg".parse::<GameId>().is_err());
    }

    #[test]
    fn only_mobile_legends_needs_a_zone() {
        assert!(GameId::Mlbb.requires_zone());
        assert!(GameId::MlbbPh.requires_zone());
        assert!(!GameId::FreeFire.requires_zone());
        assert!(!GameId::FreeFireTh.requires_zone());
    }

    #[test]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&GameId::FreeFireTh).unwrap();
        assert_eq!(json, "\"freefire_th\"");
        let back: GameId = serde_json::from_str("\"mlbb_ph\"").unwrap();
        assert_eq!(back, GameId::MlbbPh);
    }
}
