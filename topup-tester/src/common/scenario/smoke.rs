use anyhow::Result;
use std::time::Duration;
use thirtyfour::prelude::*;
use topup_core::{GameId, Session};

use super::{BrowserScenario, CombinedScenario, ScenarioCtx, TestScenario};
use crate::logic::{FlowPlan, FlowSummary};

pub struct SmokeScenario;

impl SmokeScenario {
    fn plan() -> FlowPlan {
        FlowPlan::new(GameId::Mlbb, Session::guest()).with_expectation(smoke_expectation)
    }
}

#[async_trait::async_trait]
impl BrowserScenario for SmokeScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        driver.goto(&ctx.base_url).await?;
        let _root = driver.find(By::Css(".storefront")).await?;
        ctx.bridge.ensure_available().await?;

        let state = ctx
            .bridge
            .wait_for("the catalog to load", Duration::from_secs(10), |s| {
                !s.catalog_loading
            })
            .await?;
        if ctx.verbose {
            println!("  🌐 Storefront loaded for {} ({} bundles)", state.game, state.bundle_count);
        }

        anyhow::ensure!(
            state.game.parse::<GameId>().is_ok(),
            "Active game should be a known game, got '{}'",
            state.game
        );
        anyhow::ensure!(
            state.checkout == "idle",
            "Checkout should start idle, got {}",
            state.checkout
        );
        anyhow::ensure!(state.order.is_none(), "No order should be open on load");

        let submit = driver.find(By::Id("checkout-submit")).await?;
        anyhow::ensure!(
            submit.is_enabled().await?,
            "Buy button should be enabled on load"
        );
        Ok(())
    }
}

impl CombinedScenario for SmokeScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::flow("Storefront Smoke Test", Self::plan()))
    }
}

fn smoke_expectation(summary: &FlowSummary) -> Result<()> {
    anyhow::ensure!(
        summary.catalog_error.is_none(),
        "Catalog should load, got {:?}",
        summary.catalog_error
    );
    anyhow::ensure!(!summary.bundles.is_empty(), "Catalog should not be empty");
    anyhow::ensure!(
        summary.grouped.len() == summary.bundles.len(),
        "Grouping should keep all {} bundles, kept {}",
        summary.bundles.len(),
        summary.grouped.len()
    );
    anyhow::ensure!(
        summary.form.is_validated(),
        "Known account should validate, got {:?}",
        summary.lookup
    );
    anyhow::ensure!(
        summary.checkout.is_ok(),
        "Complete form should reach payment, got {:?}",
        summary.checkout
    );
    anyhow::ensure!(
        summary.states.last() == Some(&"idle"),
        "Checkout should settle back to idle, got {:?}",
        summary.states
    );
    Ok(())
}
