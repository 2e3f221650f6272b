//! Account lookup: request building and strict parsing of untyped responses.
//!
//! Lookup endpoints are third-party services with no fixed schema, so the
//! response is handled as an untyped JSON value and checked field by field.
use crate::game::GameId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Outcome of the last explicit lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub found: bool,
    pub nickname: Option<String>,
}

impl ValidationResult {
    #[must_use]
    pub fn found(nickname: impl Into<String>) -> Self {
        Self {
            found: true,
            nickname: Some(nickname.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.found && self.nickname.as_deref().is_some_and(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("account id is required")]
    MissingAccountId,
    #[error("zone id is required for {0}")]
    MissingZoneId(GameId),
    #[error("account id may only contain letters and digits")]
    InvalidAccountId,
    #[error("zone id may only contain digits")]
    InvalidZoneId,
    #[error("network error: {0}")]
    Transport(String),
    #[error("lookup failed with status {0}")]
    Status(u16),
    #[error("account not found")]
    NotFound,
    #[error("unexpected lookup response: {0}")]
    Malformed(String),
}

impl LookupError {
    /// Alert text shown to the customer.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::MissingAccountId => "Please enter your account ID.",
            Self::MissingZoneId(_) => "Please enter your zone ID.",
            Self::InvalidAccountId | Self::InvalidZoneId => "Please check the IDs you entered.",
            Self::Transport(_) | Self::Status(_) => {
                "Could not verify the account right now. Please try again."
            }
            Self::NotFound | Self::Malformed(_) => {
                "Account not found. Please check your ID and try again."
            }
        }
    }
}

/// One outbound lookup for a game account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    game: GameId,
    account_id: String,
    zone_id: Option<String>,
}

impl LookupRequest {
    /// Validate the identifying fields and build a request.
    ///
    /// # Errors
    ///
    /// Returns an error if a required id is empty or contains characters the
    /// lookup endpoints do not accept.
    pub fn new(game: GameId, account_id: &str, zone_id: &str) -> Result<Self, LookupError> {
        let account_id = account_id.trim();
        if account_id.is_empty() {
            return Err(LookupError::MissingAccountId);
        }
        if !account_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(LookupError::InvalidAccountId);
        }
        let zone_id = if game.requires_zone() {
            let zone = zone_id.trim();
            if zone.is_empty() {
                return Err(LookupError::MissingZoneId(game));
            }
            if !zone.chars().all(|c| c.is_ascii_digit()) {
                return Err(LookupError::InvalidZoneId);
            }
            Some(zone.to_string())
        } else {
            None
        };
        Ok(Self {
            game,
            account_id: account_id.to_string(),
            zone_id,
        })
    }

    #[must_use]
    pub const fn game(&self) -> GameId {
        self.game
    }

    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    #[must_use]
    pub fn zone_id(&self) -> Option<&str> {
        self.zone_id.as_deref()
    }

    /// Fill an endpoint template's `{id}` and `{zone}` placeholders.
    #[must_use]
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{id}", &self.account_id)
            .replace("{zone}", self.zone_id.as_deref().unwrap_or_default())
    }
}

/// A per-game account lookup endpoint returning an untyped payload.
#[async_trait(?Send)]
pub trait AccountLookup {
    async fn lookup(&self, request: &LookupRequest) -> Result<Value, LookupError>;
}

/// Issue one lookup and extract the nickname.
///
/// # Errors
///
/// Returns an error on transport failure or when the response does not
/// describe a found account.
pub async fn resolve_nickname<L>(lookup: &L, request: &LookupRequest) -> Result<String, LookupError>
where
    L: AccountLookup + ?Sized,
{
    let payload = lookup.lookup(request).await?;
    parse_lookup_response(&payload)
}

const SUCCESS_KEYS: [&str; 4] = ["success", "status", "found", "ok"];
const NAME_KEYS: [&str; 6] = ["nickname", "name", "username", "userName", "nick", "ign"];
const NESTED_KEYS: [&str; 2] = ["data", "result"];

/// Extract the nickname from a lookup payload.
///
/// A payload counts as found when it carries a non-empty nickname (top level
/// or under `data`/`result`) and no explicit failure flag.
///
/// # Errors
///
/// Returns [`LookupError::NotFound`] when the payload flags a failure and
/// [`LookupError::Malformed`] when it has no usable nickname.
pub fn parse_lookup_response(payload: &Value) -> Result<String, LookupError> {
    let Some(object) = payload.as_object() else {
        return Err(LookupError::Malformed("payload is not an object".into()));
    };

    let flag = SUCCESS_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .map(flag_is_truthy);
    if flag == Some(false) {
        return Err(LookupError::NotFound);
    }

    let nickname = nickname_in(payload).or_else(|| {
        NESTED_KEYS
            .iter()
            .filter_map(|key| object.get(*key))
            .find_map(nickname_in)
    });

    match nickname {
        Some(name) => Ok(name),
        None if object.contains_key("error") => Err(LookupError::NotFound),
        None => Err(LookupError::Malformed("no nickname in response".into())),
    }
}

fn nickname_in(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    NAME_KEYS
        .iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(ToString::to_string)
}

fn flag_is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_u64().is_some_and(|code| code == 1 || code == 200),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "ok" | "success" | "found" | "200"
        ),
        _ => false,
    }
}
