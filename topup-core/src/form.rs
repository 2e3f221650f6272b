//! Order form state and its persisted subset.
use crate::bundle::Bundle;
use crate::checkout::FieldIssue;
use crate::constants::SENTINEL_ZONE;
use crate::game::GameId;
use crate::validation::{LookupError, LookupRequest, ValidationResult};
use serde::{Deserialize, Serialize};

/// The fields kept across reloads. Bundle selection is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedForm {
    pub account_id: String,
    pub zone_id: String,
    pub game: GameId,
    pub nickname: Option<String>,
}

/// Abstracts where the persisted form lives.
/// Platform-specific implementations should provide this
pub trait FormStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the last saved form, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_form(&self) -> Result<Option<PersistedForm>, Self::Error>;

    /// Save the form, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save_form(&self, form: &PersistedForm) -> Result<(), Self::Error>;

    /// Remove the saved form.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn clear_form(&self) -> Result<(), Self::Error>;
}

/// Identifies one account lookup so a late answer for old input is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
}

/// What [`OrderForm::apply_lookup`] did with a lookup answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(String),
    Failed(LookupError),
    /// The identifying fields changed while the lookup was in flight.
    Discarded,
}

impl LookupOutcome {
    /// Whether the answer rewrote the nickname, so the saved form is stale.
    #[must_use]
    pub const fn changes_form(&self) -> bool {
        !matches!(self, Self::Discarded)
    }
}

/// The customer's in-progress order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderForm {
    account_id: String,
    zone_id: String,
    game: GameId,
    selected_bundle: Option<Bundle>,
    nickname: Option<String>,
    validation: Option<ValidationResult>,
    generation: u64,
}

impl OrderForm {
    #[must_use]
    pub fn new(game: GameId) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }

    /// Rebuild from storage. A restored nickname is shown but does not count
    /// as a successful validation; the customer must check again.
    #[must_use]
    pub fn restore(saved: PersistedForm) -> Self {
        Self {
            account_id: saved.account_id,
            zone_id: saved.zone_id,
            game: saved.game,
            nickname: saved.nickname.filter(|n| !n.trim().is_empty()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn persisted(&self) -> PersistedForm {
        PersistedForm {
            account_id: self.account_id.clone(),
            zone_id: self.zone_id.clone(),
            game: self.game,
            nickname: self.nickname.clone(),
        }
    }

    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    #[must_use]
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    #[must_use]
    pub const fn game(&self) -> GameId {
        self.game
    }

    #[must_use]
    pub const fn selected_bundle(&self) -> Option<&Bundle> {
        self.selected_bundle.as_ref()
    }

    #[must_use]
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.validation
            .as_ref()
            .is_some_and(ValidationResult::is_success)
    }

    pub fn set_account_id(&mut self, value: impl Into<String>) {
        self.account_id = value.into();
        self.invalidate();
    }

    pub fn set_zone_id(&mut self, value: impl Into<String>) {
        self.zone_id = value.into();
        self.invalidate();
    }

    /// Switch games. Returns `false` when `game` is already active.
    ///
    /// The selected bundle belongs to the old catalog, so it is dropped too.
    pub fn set_game(&mut self, game: GameId) -> bool {
        if self.game == game {
            return false;
        }
        self.game = game;
        self.selected_bundle = None;
        self.invalidate();
        true
    }

    /// Select a bundle from the active game's catalog.
    ///
    /// Returns `false` and leaves the selection untouched when the bundle
    /// belongs to another game.
    pub fn select_bundle(&mut self, bundle: Bundle) -> bool {
        if bundle.game != self.game {
            log::warn!(
                "ignoring {} bundle {} while {} is active",
                bundle.game,
                bundle.id,
                self.game
            );
            return false;
        }
        self.selected_bundle = Some(bundle);
        true
    }

    #[must_use]
    pub const fn zone_required(&self) -> bool {
        self.game.requires_zone()
    }

    /// The zone sent with the order: the entered zone for zone-based games,
    /// [`SENTINEL_ZONE`] otherwise or when none was entered.
    #[must_use]
    pub fn effective_zone(&self) -> &str {
        let zone = self.zone_id.trim();
        if self.zone_required() && !zone.is_empty() {
            zone
        } else {
            SENTINEL_ZONE
        }
    }

    /// Missing required inputs, in display order.
    #[must_use]
    pub fn field_issues(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if self.account_id.trim().is_empty() {
            issues.push(FieldIssue::MissingAccountId);
        }
        if self.zone_required() && self.zone_id.trim().is_empty() {
            issues.push(FieldIssue::MissingZoneId);
        }
        if self.selected_bundle.is_none() {
            issues.push(FieldIssue::MissingBundle);
        }
        issues
    }

    /// Prepare an account lookup for the current identifiers.
    ///
    /// Clears any previous validation so a failed or pending lookup never
    /// leaves an old "found" state behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifiers are missing or malformed.
    pub fn begin_lookup(&mut self) -> Result<(LookupTicket, LookupRequest), LookupError> {
        self.validation = None;
        let request = LookupRequest::new(self.game, &self.account_id, &self.zone_id)?;
        Ok((
            LookupTicket {
                generation: self.generation,
            },
            request,
        ))
    }

    /// Record a lookup answer if the identifiers have not changed since
    /// [`Self::begin_lookup`].
    pub fn apply_lookup(
        &mut self,
        ticket: LookupTicket,
        result: Result<String, LookupError>,
    ) -> LookupOutcome {
        if ticket.generation != self.generation {
            log::debug!("discarding lookup answer for edited account fields");
            return LookupOutcome::Discarded;
        }
        match result {
            Ok(nickname) => {
                self.validation = Some(ValidationResult::found(nickname.clone()));
                self.nickname = Some(nickname.clone());
                LookupOutcome::Found(nickname)
            }
            Err(err) => {
                log::warn!("account lookup for {} failed: {err}", self.game);
                self.validation = None;
                self.nickname = None;
                LookupOutcome::Failed(err)
            }
        }
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.validation = None;
        self.nickname = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleKind;

    fn bundle(game: GameId) -> Bundle {
        Bundle {
            id: "9".into(),
            game,
            display_name: "172 Diamonds".into(),
            kind: Some(BundleKind::Diamonds),
            unit_price_cents: 220,
            original_price_cents: None,
            discount_percent: None,
            diamond_amount: Some(172),
            reseller_price_cents: None,
            image_ref: None,
            badge_label: None,
            code: None,
        }
    }

    fn validated() -> OrderForm {
        let mut form = OrderForm::new(GameId::Mlbb);
        form.set_account_id("123456789");
        form.set_zone_id("1234");
        let (ticket, _) = form.begin_lookup().unwrap();
        form.apply_lookup(ticket, Ok("Shadow".into()));
        assert!(form.is_validated());
        form
    }

    #[test]
    fn identifying_edits_clear_validation() {
        let mut form = validated();
        form.set_account_id("123456789");
        assert!(form.validation().is_none());
        assert!(form.nickname().is_none());

        let mut form = validated();
        form.set_zone_id("");
        assert!(form.validation().is_none());

        let mut form = validated();
        assert!(form.set_game(GameId::FreeFire));
        assert!(form.validation().is_none());
    }

    #[test]
    fn switching_game_drops_the_bundle() {
        let mut form = OrderForm::new(GameId::Mlbb);
        assert!(form.select_bundle(bundle(GameId::Mlbb)));
        assert!(!form.set_game(GameId::Mlbb));
        assert!(form.selected_bundle().is_some());
        form.set_game(GameId::FreeFire);
        assert!(form.selected_bundle().is_none());
        assert!(!form.select_bundle(bundle(GameId::Mlbb)));
        assert!(form.selected_bundle().is_none());
    }

    #[test]
    fn effective_zone_uses_sentinel_when_unused() {
        let mut form = OrderForm::new(GameId::FreeFire);
        form.set_zone_id("777");
        assert_eq!(form.effective_zone(), "0");
        form.set_game(GameId::Mlbb);
        assert_eq!(form.effective_zone(), "777");
        form.set_zone_id("  ");
        assert_eq!(form.effective_zone(), "0");
    }

    #[test]
    fn field_issues_follow_game_rules() {
        let form = OrderForm::new(GameId::Mlbb);
        assert_eq!(
            form.field_issues(),
            [
                FieldIssue::MissingAccountId,
                FieldIssue::MissingZoneId,
                FieldIssue::MissingBundle
            ]
        );
        let mut ff = OrderForm::new(GameId::FreeFire);
        ff.set_account_id("42");
        ff.select_bundle(bundle(GameId::FreeFire));
        assert!(ff.field_issues().is_empty());
    }

    #[test]
    fn late_lookup_answers_are_discarded() {
        let mut form = OrderForm::new(GameId::FreeFire);
        form.set_account_id("42");
        let (ticket, request) = form.begin_lookup().unwrap();
        assert_eq!(request.account_id(), "42");
        form.set_account_id("43");
        assert_eq!(
            form.apply_lookup(ticket, Ok("Old".into())),
            LookupOutcome::Discarded
        );
        assert!(!form.is_validated());
    }

    #[test]
    fn failed_lookup_clears_previous_success() {
        let mut form = validated();
        let (ticket, _) = form.begin_lookup().unwrap();
        assert!(form.validation().is_none());
        let outcome = form.apply_lookup(ticket, Err(LookupError::NotFound));
        assert_eq!(outcome, LookupOutcome::Failed(LookupError::NotFound));
        assert!(form.nickname().is_none());
    }

    #[test]
    fn only_applied_answers_dirty_the_saved_form() {
        let mut form = OrderForm::restore(PersistedForm {
            account_id: "42".into(),
            game: GameId::FreeFire,
            nickname: Some("Shadow".into()),
            ..PersistedForm::default()
        });
        let (ticket, _) = form.begin_lookup().unwrap();
        let failed = form.apply_lookup(ticket, Err(LookupError::NotFound));
        assert!(failed.changes_form());
        assert_eq!(form.persisted().nickname, None);

        let (ticket, _) = form.begin_lookup().unwrap();
        assert!(form.apply_lookup(ticket, Ok("Ace".into())).changes_form());

        let (ticket, _) = form.begin_lookup().unwrap();
        form.set_account_id("43");
        assert!(!form.apply_lookup(ticket, Ok("Late".into())).changes_form());
    }

    #[test]
    fn persistence_skips_selection_and_validation() {
        let mut form = validated();
        form.select_bundle(bundle(GameId::Mlbb));
        let saved = form.persisted();
        let json = serde_json::to_string(&saved).unwrap();
        assert!(json.contains("\"accountId\":\"123456789\""));
        assert!(!json.contains("172"));

        let restored = OrderForm::restore(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.account_id(), "123456789");
        assert_eq!(restored.nickname(), Some("Shadow"));
        assert!(restored.selected_bundle().is_none());
        assert!(!restored.is_validated());
    }

    #[test]
    fn persisted_form_tolerates_missing_fields() {
        let saved: PersistedForm = serde_json::from_str(r#"{"accountId":"1"}"#).unwrap();
        assert_eq!(saved.game, GameId::Mlbb);
        assert_eq!(saved.zone_id, "");
    }
}
