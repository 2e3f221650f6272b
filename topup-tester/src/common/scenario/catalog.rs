use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use topup_core::{
    BundleKind, CatalogError, CheckoutError, FieldIssue, GameId, Session, price_to_cents,
};

use super::FlowScenario;
use crate::logic::fixtures::{FixtureBackend, RESELLER_PRICE, catalog_rows};
use crate::logic::{FlowPlan, FlowSummary};

/// Base price in cents per bundle id, straight from the fixture catalog.
fn base_prices(game: GameId) -> Result<HashMap<String, i64>> {
    Ok(catalog_rows(game)
        .context("decoding fixture catalog")?
        .into_iter()
        .map(|row| (row.id, price_to_cents(row.price)))
        .collect())
}

fn sorted_by<K: Ord>(values: impl Iterator<Item = K>) -> bool {
    let values: Vec<K> = values.collect();
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

fn grouping_is_a_sorted_partition(summary: &FlowSummary) -> Result<()> {
    let grouped = &summary.grouped;
    anyhow::ensure!(
        grouped.len() == summary.bundles.len(),
        "Grouping should keep all {} bundles, kept {}",
        summary.bundles.len(),
        grouped.len()
    );
    let mut seen = HashSet::new();
    for bundle in grouped.flatten() {
        anyhow::ensure!(
            seen.insert(bundle.id.as_str()),
            "Bundle {} appears in more than one bucket",
            bundle.id
        );
    }

    let kinds: Vec<BundleKind> = grouped.iter().map(|(kind, _)| kind).collect();
    anyhow::ensure!(
        sorted_by(kinds.iter().copied()),
        "Sections should follow storefront order, got {kinds:?}"
    );
    for (kind, members) in grouped.iter() {
        anyhow::ensure!(!members.is_empty(), "Empty {kind:?} bucket was kept");
        let ordered = match kind {
            BundleKind::Diamonds => {
                sorted_by(members.iter().map(|b| b.diamond_amount.unwrap_or(0)))
            }
            BundleKind::Special | BundleKind::Subscription => {
                sorted_by(members.iter().map(|b| b.unit_price_cents))
            }
        };
        anyhow::ensure!(ordered, "{kind:?} bucket is out of order");
    }

    let special = grouped.bucket(BundleKind::Special).unwrap_or_default();
    for untyped in summary.bundles.iter().filter(|b| b.kind.is_none()) {
        anyhow::ensure!(
            special.iter().any(|b| b.id == untyped.id),
            "Untyped bundle {} should land in the special bucket",
            untyped.id
        );
    }
    Ok(())
}

pub fn grouping_scenario() -> FlowScenario {
    FlowScenario::new(
        "Product Grouping",
        FlowPlan::new(GameId::Mlbb, Session::guest())
            .with_expectation(grouping_is_a_sorted_partition),
    )
}

fn reseller_prices_overlay_odd_ids(summary: &FlowSummary) -> Result<()> {
    let base = base_prices(summary.game)?;
    let reseller_cents = price_to_cents(RESELLER_PRICE);
    for bundle in &summary.bundles {
        let odd = bundle.id.parse::<u32>().is_ok_and(|id| id % 2 == 1);
        if odd {
            anyhow::ensure!(
                bundle.unit_price_cents == reseller_cents
                    && bundle.reseller_price_cents == Some(reseller_cents),
                "Bundle {} should carry the reseller price, got {:?}",
                bundle.id,
                bundle
            );
        } else {
            anyhow::ensure!(
                bundle.reseller_price_cents.is_none()
                    && Some(&bundle.unit_price_cents) == base.get(&bundle.id),
                "Bundle {} should keep its base price, got {:?}",
                bundle.id,
                bundle
            );
        }
    }
    anyhow::ensure!(
        summary
            .grouped
            .flatten()
            .any(|b| b.reseller_price_cents.is_some()),
        "Reseller sessions should see reseller prices in the grouped view"
    );
    Ok(())
}

pub fn reseller_pricing_scenario() -> FlowScenario {
    FlowScenario::new(
        "Reseller Price Overlay",
        FlowPlan::new(GameId::Mlbb, Session::reseller())
            .with_expectation(reseller_prices_overlay_odd_ids),
    )
}

fn base_prices_only(summary: &FlowSummary) -> Result<()> {
    let base = base_prices(summary.game)?;
    anyhow::ensure!(
        summary.catalog_error.is_none(),
        "Catalog should still load, got {:?}",
        summary.catalog_error
    );
    for bundle in summary.bundles.iter().chain(summary.grouped.flatten()) {
        anyhow::ensure!(
            bundle.reseller_price_cents.is_none(),
            "Bundle {} should not carry a reseller price",
            bundle.id
        );
        anyhow::ensure!(
            Some(&bundle.unit_price_cents) == base.get(&bundle.id),
            "Bundle {} should keep its base price, got {}",
            bundle.id,
            bundle.unit_price_cents
        );
    }
    Ok(())
}

pub fn guest_pricing_scenario() -> FlowScenario {
    FlowScenario::new(
        "Guest Pricing",
        FlowPlan::new(GameId::MlbbPh, Session::guest()).with_expectation(base_prices_only),
    )
}

pub fn reseller_fallback_scenario() -> FlowScenario {
    FlowScenario::new(
        "Reseller Price Fallback",
        FlowPlan::new(GameId::FreeFire, Session::reseller())
            .with_backend(FixtureBackend {
                reseller_down: true,
                ..FixtureBackend::default()
            })
            .with_expectation(base_prices_only),
    )
}

fn outage_blocks_checkout(summary: &FlowSummary) -> Result<()> {
    anyhow::ensure!(
        summary.catalog_error == Some(CatalogError::Status(503)),
        "Catalog outage should surface, got {:?}",
        summary.catalog_error
    );
    anyhow::ensure!(
        summary.bundles.is_empty() && summary.grouped.is_empty(),
        "No bundles should be listed during an outage"
    );
    anyhow::ensure!(
        summary.checkout.as_ref().err()
            == Some(&CheckoutError::Fields(vec![FieldIssue::MissingBundle])),
        "Checkout should ask for a product, got {:?}",
        summary.checkout
    );
    Ok(())
}

pub fn catalog_outage_scenario() -> FlowScenario {
    FlowScenario::new(
        "Catalog Outage",
        FlowPlan::new(GameId::FreeFireTh, Session::reseller())
            .with_backend(FixtureBackend {
                catalog_down: true,
                ..FixtureBackend::default()
            })
            .with_expectation(outage_blocks_checkout),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::CombinedScenario;
    use crate::logic::flow::FlowRunner;

    fn summary(scenario: &FlowScenario, iteration: usize) -> FlowSummary {
        let logic = scenario.as_logic_scenario().expect("logic plan");
        FlowRunner.run(&logic.plan, iteration).expect("visit runs")
    }

    #[test]
    fn catalog_plans_hold() {
        for scenario in [
            grouping_scenario(),
            reseller_pricing_scenario(),
            guest_pricing_scenario(),
            reseller_fallback_scenario(),
            catalog_outage_scenario(),
        ] {
            for i in 0..3 {
                let run = summary(&scenario, i);
                for expectation in &scenario.plan.expectations {
                    expectation
                        .evaluate(&run)
                        .unwrap_or_else(|err| panic!("{}: {err}", scenario.name));
                }
            }
        }
    }

    #[test]
    fn reseller_expectation_rejects_guest_prices() {
        let run = summary(&guest_pricing_scenario(), 0);
        let err = reseller_prices_overlay_odd_ids(&run).expect_err("guest prices should fail");
        assert!(err.to_string().contains("reseller price"));
    }

    #[test]
    fn untyped_bundles_are_filed_as_special() {
        let run = summary(&grouping_scenario(), 0);
        let special = run.grouped.bucket(BundleKind::Special).expect("special bucket");
        assert!(special.iter().any(|b| b.display_name == "Mystery Crate"));
    }

    #[test]
    fn sorted_by_accepts_ties() {
        assert!(sorted_by([1, 1, 2].into_iter()));
        assert!(!sorted_by([2, 1].into_iter()));
    }
}
