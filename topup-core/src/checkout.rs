//! Checkout trigger: gates submission, hands off to payment, then cools down.
//!
//! ```text
//! Idle -> ValidatingInput -> AwaitingPayment -> Cooldown -> Idle
//!              |
//!              +-> Idle (any failed gate)
//! ```
use crate::constants::{DEFAULT_COOLDOWN_SECS, MAX_COOLDOWN_SECS, MIN_COOLDOWN_SECS};
use crate::countdown::Countdown;
use crate::form::OrderForm;
use crate::order::OrderSummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Khqr,
    AbaPay,
}

impl PaymentMethod {
    pub const ALL: [Self; 2] = [Self::Khqr, Self::AbaPay];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Khqr => "khqr",
            Self::AbaPay => "aba_pay",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Khqr => "KHQR",
            Self::AbaPay => "ABA Pay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "khqr" => Ok(Self::Khqr),
            "aba" | "aba_pay" | "abapay" => Ok(Self::AbaPay),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

/// A required input that is missing. Shown inline next to its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldIssue {
    MissingAccountId,
    MissingZoneId,
    MissingBundle,
    MissingPaymentMethod,
}

impl FieldIssue {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingAccountId => "Please enter your account ID.",
            Self::MissingZoneId => "Please enter your zone ID.",
            Self::MissingBundle => "Please select a product.",
            Self::MissingPaymentMethod => "Please choose a payment method.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("missing required fields: {0:?}")]
    Fields(Vec<FieldIssue>),
    #[error("account has not been verified")]
    NotValidated,
    #[error("checkout is cooling down for {remaining_secs}s")]
    CoolingDown { remaining_secs: u32 },
    #[error("a payment is already open")]
    PaymentPending,
}

impl CheckoutError {
    /// Alert text shown to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Fields(issues) => issues
                .first()
                .map_or("Please complete the form.", |issue| issue.message())
                .to_string(),
            Self::NotValidated => "Please check your account ID before paying.".to_string(),
            Self::CoolingDown { remaining_secs } => {
                format!("Please wait {remaining_secs}s before placing another order.")
            }
            Self::PaymentPending => "Finish or close the current payment first.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    ValidatingInput,
    AwaitingPayment(OrderSummary),
    Cooldown(Countdown),
}

impl CheckoutState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ValidatingInput => "validating",
            Self::AwaitingPayment(_) => "awaiting_payment",
            Self::Cooldown(_) => "cooldown",
        }
    }
}

/// Clamp a configured cooldown into the accepted range.
#[must_use]
pub fn clamp_cooldown(secs: u32) -> u32 {
    secs.clamp(MIN_COOLDOWN_SECS, MAX_COOLDOWN_SECS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutMachine {
    state: CheckoutState,
    cooldown_secs: u32,
    payment_method: Option<PaymentMethod>,
}

impl Default for CheckoutMachine {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_SECS)
    }
}

impl CheckoutMachine {
    #[must_use]
    pub fn new(cooldown_secs: u32) -> Self {
        Self {
            state: CheckoutState::Idle,
            cooldown_secs: clamp_cooldown(cooldown_secs),
            payment_method: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    #[must_use]
    pub const fn cooldown_secs(&self) -> u32 {
        self.cooldown_secs
    }

    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub const fn select_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.payment_method = method;
    }

    #[must_use]
    pub const fn remaining_cooldown(&self) -> u32 {
        match &self.state {
            CheckoutState::Cooldown(countdown) => countdown.remaining_secs(),
            _ => 0,
        }
    }

    #[must_use]
    pub const fn pending_order(&self) -> Option<&OrderSummary> {
        match &self.state {
            CheckoutState::AwaitingPayment(summary) => Some(summary),
            _ => None,
        }
    }

    /// Try to open the payment step for `form`.
    ///
    /// Field issues are reported together so the form can mark every missing
    /// input at once. Any failure leaves the machine `Idle`.
    ///
    /// # Errors
    ///
    /// Returns an error while a payment is open or cooling down, when required
    /// fields are missing, or when the account has not been verified.
    pub fn submit(&mut self, form: &OrderForm) -> Result<OrderSummary, CheckoutError> {
        match &self.state {
            CheckoutState::AwaitingPayment(_) => return Err(CheckoutError::PaymentPending),
            CheckoutState::Cooldown(countdown) => {
                return Err(CheckoutError::CoolingDown {
                    remaining_secs: countdown.remaining_secs(),
                });
            }
            CheckoutState::Idle | CheckoutState::ValidatingInput => {}
        }

        self.state = CheckoutState::ValidatingInput;
        match self.check(form) {
            Ok(summary) => {
                log::debug!("opening payment for order '{}'", summary.order_string);
                self.state = CheckoutState::AwaitingPayment(summary.clone());
                Ok(summary)
            }
            Err(err) => {
                self.state = CheckoutState::Idle;
                Err(err)
            }
        }
    }

    fn check(&self, form: &OrderForm) -> Result<OrderSummary, CheckoutError> {
        let mut issues = form.field_issues();
        if self.payment_method.is_none() {
            issues.push(FieldIssue::MissingPaymentMethod);
        }
        if !issues.is_empty() {
            return Err(CheckoutError::Fields(issues));
        }
        if !form.is_validated() {
            return Err(CheckoutError::NotValidated);
        }
        let method = self
            .payment_method
            .ok_or(CheckoutError::Fields(vec![FieldIssue::MissingPaymentMethod]))?;
        OrderSummary::from_form(form, method)
            .ok_or(CheckoutError::Fields(vec![FieldIssue::MissingBundle]))
    }

    /// Close the payment modal and start the cooldown. Returns `false` when no
    /// payment was open.
    pub fn dismiss_payment(&mut self) -> bool {
        if !matches!(self.state, CheckoutState::AwaitingPayment(_)) {
            return false;
        }
        self.state = CheckoutState::Cooldown(Countdown::new(self.cooldown_secs));
        true
    }

    /// Advance the cooldown by one second. Returns `true` when submission is
    /// re-enabled by this tick.
    pub fn tick(&mut self) -> bool {
        let CheckoutState::Cooldown(countdown) = &mut self.state else {
            return false;
        };
        if countdown.tick() {
            self.state = CheckoutState::Idle;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Bundle, BundleKind};
    use crate::game::GameId;

    fn ready_form() -> OrderForm {
        let mut form = OrderForm::new(GameId::Mlbb);
        form.set_account_id("123456789");
        form.set_zone_id("1234");
        let (ticket, _) = form.begin_lookup().unwrap();
        form.apply_lookup(ticket, Ok("Shadow".into()));
        form.select_bundle(Bundle {
            id: "9".into(),
            game: GameId::Mlbb,
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
        });
        form
    }

    fn ready_machine(cooldown: u32) -> CheckoutMachine {
        let mut machine = CheckoutMachine::new(cooldown);
        machine.select_payment_method(Some(PaymentMethod::Khqr));
        machine
    }

    #[test]
    fn full_cycle_returns_to_idle() {
        let form = ready_form();
        let mut machine = ready_machine(3);
        let summary = machine.submit(&form).unwrap();
        assert_eq!(summary.order_string, "123456789 1234 172");
        assert_eq!(machine.state().name(), "awaiting_payment");
        assert_eq!(
            machine.submit(&form).unwrap_err(),
            CheckoutError::PaymentPending
        );

        assert!(machine.dismiss_payment());
        assert_eq!(machine.remaining_cooldown(), 3);
        assert_eq!(
            machine.submit(&form).unwrap_err(),
            CheckoutError::CoolingDown { remaining_secs: 3 }
        );
        assert!(!machine.tick());
        assert!(!machine.tick());
        assert!(machine.tick());
        assert_eq!(machine.state(), &CheckoutState::Idle);
        assert!(machine.submit(&form).is_ok());
    }

    #[test]
    fn missing_payment_method_keeps_idle() {
        let mut machine = CheckoutMachine::new(5);
        let err = machine.submit(&ready_form()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::Fields(vec![FieldIssue::MissingPaymentMethod])
        );
        assert_eq!(machine.state(), &CheckoutState::Idle);
    }

    #[test]
    fn unvalidated_account_is_rejected() {
        let mut form = ready_form();
        form.set_zone_id("1234");
        let mut machine = ready_machine(5);
        assert_eq!(
            machine.submit(&form).unwrap_err(),
            CheckoutError::NotValidated
        );
        assert_eq!(machine.state(), &CheckoutState::Idle);
    }

    #[test]
    fn dismiss_and_tick_are_noops_outside_their_states() {
        let mut machine = ready_machine(5);
        assert!(!machine.dismiss_payment());
        assert!(!machine.tick());
        assert_eq!(machine.state(), &CheckoutState::Idle);
    }

    #[test]
    fn cooldown_is_clamped() {
        assert_eq!(CheckoutMachine::new(0).cooldown_secs(), MIN_COOLDOWN_SECS);
        assert_eq!(CheckoutMachine::new(600).cooldown_secs(), MAX_COOLDOWN_SECS);
        assert_eq!(CheckoutMachine::default().cooldown_secs(), 5);
    }

    #[test]
    fn payment_methods_parse_loosely() {
        assert_eq!("ABA".parse::<PaymentMethod>(), Ok(PaymentMethod::AbaPay));
        assert_eq!(" khqr ".parse::<PaymentMethod>(), Ok(PaymentMethod::Khqr));
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn user_messages_name_the_first_issue() {
        let err = CheckoutError::Fields(vec![FieldIssue::MissingZoneId, FieldIssue::MissingBundle]);
        assert_eq!(err.user_message(), "Please enter your zone ID.");
        assert_eq!(
            CheckoutError::CoolingDown { remaining_secs: 4 }.user_message(),
            "Please wait 4s before placing another order."
        );
    }
}
