use anyhow::Result;
use thirtyfour::prelude::*;

use crate::browser::TestBridge;
use crate::logic::FlowPlan;

pub mod catalog;
pub mod cooldown;
pub mod ordering;
pub mod smoke;

#[derive(Debug, Clone)]
pub struct ScenarioCtx<'a> {
    pub base_url: String,
    pub bridge: TestBridge<'a>,
    pub verbose: bool,
}

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: FlowPlan,
}

impl TestScenario {
    #[must_use]
    pub fn flow(name: impl Into<String>, plan: FlowPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

// Browser test scenario
#[async_trait::async_trait]
pub trait BrowserScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()>;
}

// Combined scenario that can run both logic and browser tests
pub trait CombinedScenario: BrowserScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario>;
}

/// A scenario that only exercises the storefront engine.
#[derive(Clone)]
pub struct FlowScenario {
    name: &'static str,
    plan: FlowPlan,
}

impl FlowScenario {
    pub const fn new(name: &'static str, plan: FlowPlan) -> Self {
        Self { name, plan }
    }
}

#[async_trait::async_trait]
impl BrowserScenario for FlowScenario {
    async fn run_browser(&self, _driver: &WebDriver, _ctx: &ScenarioCtx<'_>) -> Result<()> {
        anyhow::bail!("Browser testing not implemented for {}", self.name)
    }
}

impl CombinedScenario for FlowScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::flow(self.name, self.plan.clone()))
    }
}

pub fn get_scenario(name: &str) -> Option<Box<dyn CombinedScenario + Send + Sync>> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(Box::new(smoke::SmokeScenario)),
        "order-flow" | "order" => Some(Box::new(ordering::OrderFlowScenario)),
        "zoneless-order" | "zoneless" => Some(Box::new(ordering::zoneless_order_scenario())),
        "checkout-gates" | "gates" => Some(Box::new(ordering::checkout_gates_scenario())),
        "unverified-account" | "unverified" => {
            Some(Box::new(ordering::unverified_account_scenario()))
        }
        "stale-responses" | "stale" => Some(Box::new(ordering::stale_responses_scenario())),
        "form-restore" | "restore" => Some(Box::new(ordering::form_restore_scenario())),
        "grouping" => Some(Box::new(catalog::grouping_scenario())),
        "reseller-pricing" | "reseller" => Some(Box::new(catalog::reseller_pricing_scenario())),
        "guest-pricing" | "guest" => Some(Box::new(catalog::guest_pricing_scenario())),
        "reseller-fallback" => Some(Box::new(catalog::reseller_fallback_scenario())),
        "catalog-outage" | "outage" => Some(Box::new(catalog::catalog_outage_scenario())),
        "cooldown" => Some(Box::new(cooldown::CooldownScenario)),
        "cooldown-bounds" => Some(Box::new(cooldown::cooldown_bounds_scenario())),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Storefront Smoke Test"),
        ("order-flow", "Zone Game Order Flow"),
        ("zoneless-order", "Zoneless Game Order Flow"),
        ("checkout-gates", "Checkout Gates"),
        ("unverified-account", "Unverified Account"),
        ("stale-responses", "Stale Response Handling"),
        ("form-restore", "Saved Form Restore"),
        ("grouping", "Product Grouping"),
        ("reseller-pricing", "Reseller Price Overlay"),
        ("guest-pricing", "Guest Pricing"),
        ("reseller-fallback", "Reseller Price Fallback"),
        ("catalog-outage", "Catalog Outage"),
        ("cooldown", "Post-Payment Cooldown"),
        ("cooldown-bounds", "Cooldown Bounds"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves_with_logic_plan() {
        for (key, description) in list_scenarios() {
            let scenario = get_scenario(key).unwrap_or_else(|| panic!("{key} resolves"));
            let logic = scenario
                .as_logic_scenario()
                .unwrap_or_else(|| panic!("{key} has a logic plan"));
            assert_eq!(logic.name, description);
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert!(get_scenario("SMOKE").is_some());
        assert!(get_scenario("gates").is_some());
        assert!(get_scenario("nonexistent").is_none());
    }
}
