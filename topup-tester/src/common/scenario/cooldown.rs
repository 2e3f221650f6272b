use anyhow::Result;
use thirtyfour::prelude::*;
use topup_core::constants::{MAX_COOLDOWN_SECS, MIN_COOLDOWN_SECS};
use topup_core::{CheckoutError, GameId, Session};

use super::ordering::place_browser_order;
use super::{BrowserScenario, CombinedScenario, FlowScenario, ScenarioCtx, TestScenario};
use crate::logic::{FlowPlan, FlowSummary};

const SCENARIO_COOLDOWN_SECS: u32 = 3;

pub struct CooldownScenario;

impl CooldownScenario {
    fn plan() -> FlowPlan {
        FlowPlan::new(GameId::FreeFire, Session::guest())
            .with_cooldown(SCENARIO_COOLDOWN_SECS)
            .with_expectation(cooldown_blocks_then_releases)
    }
}

#[async_trait::async_trait]
impl BrowserScenario for CooldownScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        place_browser_order(driver, ctx).await?;
        ctx.bridge.dismiss().await?;

        let state = ctx.bridge.state().await?;
        anyhow::ensure!(
            state.checkout == "cooldown" && state.cooldown > 0,
            "Closing payment should start a cooldown, got {} ({}s)",
            state.checkout,
            state.cooldown
        );
        let label = driver.find(By::Id("checkout-submit")).await?.text().await?;
        anyhow::ensure!(
            label.contains("Please wait"),
            "Buy button should show the countdown, got '{label}'"
        );

        ctx.bridge.submit().await?;
        let blocked = ctx.bridge.state().await?;
        anyhow::ensure!(
            blocked.order.is_none() && blocked.checkout == "cooldown",
            "Submitting during the cooldown should be ignored, got {}",
            blocked.checkout
        );

        let mut ticks = 0;
        let mut remaining = blocked.cooldown;
        while remaining > 0 && ticks <= MAX_COOLDOWN_SECS {
            ctx.bridge.tick().await?;
            ticks += 1;
            remaining = ctx.bridge.state().await?.cooldown;
        }
        let state = ctx.bridge.state().await?;
        anyhow::ensure!(
            state.checkout == "idle",
            "Checkout should be idle after {ticks} ticks, got {}",
            state.checkout
        );
        if ctx.verbose {
            println!("  ⏳ Cooldown released after {ticks} ticks");
        }
        Ok(())
    }
}

impl CombinedScenario for CooldownScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::flow("Post-Payment Cooldown", Self::plan()))
    }
}

fn cooldown_blocks_then_releases(summary: &FlowSummary) -> Result<()> {
    anyhow::ensure!(
        summary.states == ["idle", "awaiting_payment", "cooldown", "idle"],
        "Unexpected checkout path {:?}",
        summary.states
    );
    anyhow::ensure!(
        summary.resubmit
            == Some(CheckoutError::CoolingDown {
                remaining_secs: SCENARIO_COOLDOWN_SECS
            }),
        "Submitting during the cooldown should be refused, got {:?}",
        summary.resubmit
    );
    anyhow::ensure!(
        summary.cooldown_ticks == SCENARIO_COOLDOWN_SECS,
        "Cooldown should last {SCENARIO_COOLDOWN_SECS} ticks, lasted {}",
        summary.cooldown_ticks
    );
    Ok(())
}

fn out_of_range_cooldown_is_clamped(summary: &FlowSummary) -> Result<()> {
    anyhow::ensure!(
        (MIN_COOLDOWN_SECS..=MAX_COOLDOWN_SECS).contains(&summary.cooldown_ticks),
        "Cooldown of {} ticks is outside {MIN_COOLDOWN_SECS}..={MAX_COOLDOWN_SECS}",
        summary.cooldown_ticks
    );
    anyhow::ensure!(
        summary.states.last() == Some(&"idle"),
        "Checkout should settle back to idle, got {:?}",
        summary.states
    );
    Ok(())
}

pub fn cooldown_bounds_scenario() -> FlowScenario {
    FlowScenario::new(
        "Cooldown Bounds",
        FlowPlan::new(GameId::Mlbb, Session::reseller())
            .with_cooldown(MAX_COOLDOWN_SECS * 10)
            .with_expectation(out_of_range_cooldown_is_clamped)
            .with_expectation(|summary: &FlowSummary| -> Result<()> {
                anyhow::ensure!(
                    summary.cooldown_ticks == MAX_COOLDOWN_SECS,
                    "Oversized cooldown should clamp to {MAX_COOLDOWN_SECS}, got {}",
                    summary.cooldown_ticks
                );
                Ok(())
            }),
    )
}
