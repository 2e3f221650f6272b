use anyhow::{Context, Result};
use std::time::Duration;
use thirtyfour::prelude::*;
use topup_core::{
    CheckoutError, FieldIssue, GameId, LookupError, LookupOutcome, Session, bundle_code,
};

use super::{BrowserScenario, CombinedScenario, FlowScenario, ScenarioCtx, TestScenario};
use crate::browser::StorefrontState;
use crate::logic::fixtures::FixtureLookup;
use crate::logic::flow::zone_for;
use crate::logic::{AccountPlan, FlowPlan, FlowSummary};

const BROWSER_ACCOUNT: &str = "123456789";
const BROWSER_ZONE: &str = "1234";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

pub struct OrderFlowScenario;

impl OrderFlowScenario {
    fn plan() -> FlowPlan {
        FlowPlan::new(GameId::Mlbb, Session::guest()).with_expectation(order_matches_form)
    }
}

/// Fill the form through the bridge and open the payment step.
pub(super) async fn place_browser_order(
    driver: &WebDriver,
    ctx: &ScenarioCtx<'_>,
) -> Result<StorefrontState> {
    driver.goto(&ctx.base_url).await?;
    ctx.bridge.ensure_available().await?;
    ctx.bridge.select_game(GameId::Mlbb.code()).await?;
    ctx.bridge
        .wait_for("the catalog to load", Duration::from_secs(10), |s| {
            s.game == "mlbb" && s.catalog_ready()
        })
        .await?;

    ctx.bridge.fill_account(BROWSER_ACCOUNT, BROWSER_ZONE).await?;
    ctx.bridge.check_account().await?;
    let state = ctx
        .bridge
        .wait_for("the account lookup", LOOKUP_TIMEOUT, |s| s.validated)
        .await?;
    if ctx.verbose {
        println!("  🔎 Account verified as {:?}", state.nickname);
    }

    let card_id = driver
        .find(By::Css("#products .product-card"))
        .await
        .context("no product card to pick")?
        .id()
        .await?
        .context("product card without an id")?;
    let bundle_id = card_id.trim_start_matches("bundle-");
    ctx.bridge.select_bundle(bundle_id).await?;
    let state = ctx.bridge.state().await?;
    anyhow::ensure!(
        state.selected_bundle.as_deref() == Some(bundle_id),
        "Bundle {bundle_id} should be selected, got {:?}",
        state.selected_bundle
    );
    ctx.bridge.pay_with("khqr").await?;
    ctx.bridge.submit().await?;

    ctx.bridge
        .wait_for("the payment step", Duration::from_secs(5), |s| {
            s.checkout == "awaiting_payment"
        })
        .await
}

#[async_trait::async_trait]
impl BrowserScenario for OrderFlowScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        let state = place_browser_order(driver, ctx).await?;
        let order = state.order.context("payment step opened without an order")?;
        let prefix = format!("{BROWSER_ACCOUNT} {BROWSER_ZONE} ");
        anyhow::ensure!(
            order.starts_with(&prefix),
            "Order string should start with '{prefix}', got '{order}'"
        );
        let shown = driver.find(By::Id("order-string")).await?.text().await?;
        anyhow::ensure!(
            shown == order,
            "Payment modal shows '{shown}' but the order is '{order}'"
        );
        if ctx.verbose {
            println!("  🧾 Order handed to payment: {order}");
        }

        ctx.bridge.dismiss().await?;
        let state = ctx.bridge.state().await?;
        anyhow::ensure!(
            state.checkout == "cooldown",
            "Closing payment should start the cooldown, got {}",
            state.checkout
        );
        Ok(())
    }
}

impl CombinedScenario for OrderFlowScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::flow("Zone Game Order Flow", Self::plan()))
    }
}

fn order_matches_form(summary: &FlowSummary) -> Result<()> {
    let order = summary
        .checkout
        .as_ref()
        .map_err(|err| anyhow::anyhow!("Order should be accepted, got {err}"))?;
    let bundle = summary
        .form
        .selected_bundle()
        .context("accepted order without a selected bundle")?;
    let zone = if summary.game.requires_zone() {
        zone_for(summary.iteration)
    } else {
        "0".to_string()
    };
    let expected = format!(
        "{} {zone} {}",
        AccountPlan::Known.account_id(summary.iteration),
        bundle_code(bundle)
    );
    anyhow::ensure!(
        order.order_string == expected,
        "Order string should be '{expected}', got '{}'",
        order.order_string
    );
    anyhow::ensure!(
        order.price_cents == bundle.unit_price_cents,
        "Order price {} should match bundle price {}",
        order.price_cents,
        bundle.unit_price_cents
    );
    let nickname = FixtureLookup::nickname_for(summary.form.account_id());
    anyhow::ensure!(
        order.nickname.as_deref() == Some(nickname.as_str()),
        "Order should carry nickname {nickname}, got {:?}",
        order.nickname
    );
    Ok(())
}

pub fn zoneless_order_scenario() -> FlowScenario {
    FlowScenario::new(
        "Zoneless Game Order Flow",
        FlowPlan::new(GameId::FreeFire, Session::guest())
            .with_expectation(order_matches_form)
            .with_expectation(|summary: &FlowSummary| -> Result<()> {
                let request_zone = summary.form.effective_zone();
                anyhow::ensure!(
                    request_zone == "0",
                    "Zoneless games should send zone 0, got '{request_zone}'"
                );
                Ok(())
            }),
    )
}

fn missing_fields_are_reported_together(summary: &FlowSummary) -> Result<()> {
    let expected = CheckoutError::Fields(vec![
        FieldIssue::MissingAccountId,
        FieldIssue::MissingBundle,
        FieldIssue::MissingPaymentMethod,
    ]);
    anyhow::ensure!(
        summary.checkout.as_ref().err() == Some(&expected),
        "Expected {expected:?}, got {:?}",
        summary.checkout
    );
    anyhow::ensure!(
        summary.states == ["idle", "idle"],
        "A failed gate should leave checkout idle, got {:?}",
        summary.states
    );
    Ok(())
}

pub fn checkout_gates_scenario() -> FlowScenario {
    FlowScenario::new(
        "Checkout Gates",
        FlowPlan::new(GameId::Mlbb, Session::guest())
            .with_account(AccountPlan::Blank)
            .with_payment(None)
            .without_bundle()
            .with_expectation(missing_fields_are_reported_together),
    )
}

fn unverified_account_is_rejected(summary: &FlowSummary) -> Result<()> {
    anyhow::ensure!(
        summary.lookup == LookupOutcome::Failed(LookupError::NotFound),
        "Unknown account should not be found, got {:?}",
        summary.lookup
    );
    anyhow::ensure!(
        summary.checkout.as_ref().err() == Some(&CheckoutError::NotValidated),
        "Unverified account should be rejected, got {:?}",
        summary.checkout
    );
    anyhow::ensure!(
        summary.form.nickname().is_none(),
        "Failed lookup should clear the nickname"
    );
    Ok(())
}

pub fn unverified_account_scenario() -> FlowScenario {
    FlowScenario::new(
        "Unverified Account",
        FlowPlan::new(GameId::MlbbPh, Session::guest())
            .with_account(AccountPlan::Unknown)
            .with_expectation(unverified_account_is_rejected),
    )
}

fn late_answers_are_ignored(summary: &FlowSummary) -> Result<()> {
    anyhow::ensure!(
        summary.stale_commit == topup_core::CommitOutcome::Discarded,
        "Catalog answer for an abandoned game should be discarded, got {:?}",
        summary.stale_commit
    );
    anyhow::ensure!(
        summary.bundles.iter().all(|b| b.game == summary.game),
        "Only {} bundles should be listed",
        summary.game
    );
    anyhow::ensure!(
        summary.stale_lookup == LookupOutcome::Discarded,
        "Lookup answer for edited fields should be discarded, got {:?}",
        summary.stale_lookup
    );
    Ok(())
}

pub fn stale_responses_scenario() -> FlowScenario {
    FlowScenario::new(
        "Stale Response Handling",
        FlowPlan::new(GameId::FreeFireTh, Session::reseller())
            .with_expectation(late_answers_are_ignored),
    )
}

fn restore_keeps_identifiers_only(summary: &FlowSummary) -> Result<()> {
    let restored = &summary.restored;
    anyhow::ensure!(
        restored.game() == summary.form.game()
            && restored.account_id() == summary.form.account_id()
            && restored.zone_id() == summary.form.zone_id(),
        "Restored form should keep game and identifiers, got {restored:?}"
    );
    anyhow::ensure!(
        restored.nickname() == summary.form.nickname(),
        "Restored form should keep the last nickname"
    );
    anyhow::ensure!(
        !restored.is_validated(),
        "Restored form must be verified again"
    );
    anyhow::ensure!(
        restored.selected_bundle().is_none(),
        "Restored form should not carry a bundle"
    );
    Ok(())
}

pub fn form_restore_scenario() -> FlowScenario {
    FlowScenario::new(
        "Saved Form Restore",
        FlowPlan::new(GameId::MlbbPh, Session::guest())
            .with_expectation(restore_keeps_identifiers_only),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::flow::FlowRunner;

    fn check(scenario: &FlowScenario, iterations: usize) {
        let logic = scenario.as_logic_scenario().expect("logic plan");
        for i in 0..iterations {
            let summary = FlowRunner.run(&logic.plan, i).expect("visit runs");
            for expectation in &logic.plan.expectations {
                expectation
                    .evaluate(&summary)
                    .unwrap_or_else(|err| panic!("{} iteration {i}: {err}", logic.name));
            }
        }
    }

    #[test]
    fn order_flow_plan_holds_across_bundles() {
        let logic = OrderFlowScenario.as_logic_scenario().expect("logic plan");
        for i in 0..6 {
            let summary = FlowRunner.run(&logic.plan, i).expect("visit runs");
            order_matches_form(&summary).expect("order matches form");
        }
    }

    #[test]
    fn logic_only_plans_hold() {
        check(&zoneless_order_scenario(), 4);
        check(&checkout_gates_scenario(), 2);
        check(&unverified_account_scenario(), 2);
        check(&stale_responses_scenario(), 2);
        check(&form_restore_scenario(), 2);
    }

    #[test]
    fn order_expectation_rejects_a_refused_checkout() {
        let summary = FlowRunner
            .run(&unverified_account_scenario().plan, 0)
            .expect("visit runs");
        let err = order_matches_form(&summary).expect_err("refused order should fail");
        assert!(err.to_string().contains("Order should be accepted"));
    }
}
