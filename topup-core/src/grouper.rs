//! Partition a flat bundle list into display buckets.
//!
//! Grouping is a stable multi-key partition-and-sort: every input bundle lands
//! in exactly one bucket, buckets with no members are omitted, and ties keep
//! the order the catalog returned them in (id ascending).
use crate::bundle::{Bundle, BundleKind};
use crate::constants::UNRECOGNIZED_KIND_BUCKET;
use crate::session::Session;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static RAW_DIAMONDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\s*diamonds?$").expect("valid raw diamonds pattern"));

/// Bundles bucketed by kind, iterated in storefront section order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedCatalog {
    buckets: BTreeMap<BundleKind, Vec<Bundle>>,
}

impl GroupedCatalog {
    #[must_use]
    pub fn bucket(&self, kind: BundleKind) -> Option<&[Bundle]> {
        self.buckets.get(&kind).map(Vec::as_slice)
    }

    /// Non-empty buckets in section order.
    pub fn iter(&self) -> impl Iterator<Item = (BundleKind, &[Bundle])> {
        self.buckets
            .iter()
            .map(|(kind, bundles)| (*kind, bundles.as_slice()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// All bundles, bucket by bucket.
    pub fn flatten(&self) -> impl Iterator<Item = &Bundle> {
        self.buckets.values().flatten()
    }
}

/// Partition `bundles` by kind and sort each bucket.
///
/// Bundles without a recognized kind go to [`UNRECOGNIZED_KIND_BUCKET`].
#[must_use]
pub fn group_bundles(bundles: &[Bundle]) -> GroupedCatalog {
    let mut buckets: BTreeMap<BundleKind, Vec<Bundle>> = BTreeMap::new();
    for bundle in bundles {
        let kind = bundle.kind.unwrap_or_else(|| {
            log::debug!(
                "bundle {} has no known kind, filing under {}",
                bundle.id,
                UNRECOGNIZED_KIND_BUCKET.label()
            );
            UNRECOGNIZED_KIND_BUCKET
        });
        buckets.entry(kind).or_default().push(bundle.clone());
    }
    for (kind, members) in &mut buckets {
        match kind {
            BundleKind::Diamonds => members.sort_by_key(|b| b.diamond_amount.unwrap_or(0)),
            BundleKind::Subscription | BundleKind::Special => {
                members.sort_by_key(|b| b.unit_price_cents);
            }
        }
    }
    GroupedCatalog { buckets }
}

/// Session-aware grouping for the storefront view.
#[derive(Debug, Clone, Copy)]
pub struct ProductGrouper {
    session: Session,
}

impl ProductGrouper {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Group bundles; reseller prices are only kept for reseller sessions.
    #[must_use]
    pub fn group(&self, bundles: &[Bundle]) -> GroupedCatalog {
        let mut grouped = group_bundles(bundles);
        if !self.session.is_reseller() {
            for members in grouped.buckets.values_mut() {
                for bundle in members {
                    bundle.reseller_price_cents = None;
                }
            }
        }
        grouped
    }
}

/// The diamonds bucket split the way the storefront shelves it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiamondShelves {
    /// Weekly passes and other pass products, cheapest first.
    pub passes: Vec<Bundle>,
    /// Plain "N Diamonds" bundles, smallest amount first.
    pub raw_diamonds: Vec<Bundle>,
    /// Everything else in the bucket, cheapest first.
    pub other: Vec<Bundle>,
}

impl DiamondShelves {
    #[must_use]
    pub fn split(diamonds: &[Bundle]) -> Self {
        let mut shelves = Self::default();
        for bundle in diamonds {
            let name = bundle.display_name.trim().to_lowercase();
            if name.contains("pass") || name.contains("weekly") {
                shelves.passes.push(bundle.clone());
            } else if RAW_DIAMONDS.is_match(&name) {
                shelves.raw_diamonds.push(bundle.clone());
            } else {
                shelves.other.push(bundle.clone());
            }
        }
        shelves.passes.sort_by_key(|b| b.unit_price_cents);
        shelves
            .raw_diamonds
            .sort_by_key(|b| b.diamond_amount.unwrap_or(0));
        shelves.other.sort_by_key(|b| b.unit_price_cents);
        shelves
    }

    /// Non-empty shelves in display order.
    pub fn iter(&self) -> impl Iterator<Item = &[Bundle]> {
        [
            self.passes.as_slice(),
            self.raw_diamonds.as_slice(),
            self.other.as_slice(),
        ]
        .into_iter()
        .filter(|shelf| !shelf.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameId;

    fn bundle(id: &str, name: &str, kind: Option<BundleKind>, cents: i64) -> Bundle {
        Bundle {
            id: id.to_string(),
            game: GameId::Mlbb,
            display_name: name.to_string(),
            kind,
            unit_price_cents: cents,
            original_price_cents: None,
            discount_percent: None,
            diamond_amount: None,
            reseller_price_cents: None,
            image_ref: None,
            badge_label: None,
            code: None,
        }
    }

    fn diamonds(id: &str, name: &str, amount: Option<u32>, cents: i64) -> Bundle {
        Bundle {
            diamond_amount: amount,
            ..bundle(id, name, Some(BundleKind::Diamonds), cents)
        }
    }

    #[test]
    fn buckets_are_sorted_by_their_own_keys() {
        let input = vec![
            diamonds("1", "172 Diamonds", Some(172), 220),
            diamonds("2", "86 Diamonds", Some(86), 120),
            diamonds("3", "Starlight", None, 900),
            bundle("4", "Twilight Pass", Some(BundleKind::Subscription), 800),
            bundle("5", "Weekly Elite", Some(BundleKind::Subscription), 150),
            bundle("6", "Promo", Some(BundleKind::Special), 99),
        ];
        let grouped = group_bundles(&input);
        let ids = |kind: BundleKind| {
            grouped
                .bucket(kind)
                .unwrap()
                .iter()
                .map(|b| b.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(BundleKind::Diamonds), ["3", "2", "1"]);
        assert_eq!(ids(BundleKind::Subscription), ["5", "4"]);
        assert_eq!(ids(BundleKind::Special), ["6"]);
        assert_eq!(grouped.len(), input.len());
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let grouped = group_bundles(&[bundle("1", "Promo", Some(BundleKind::Special), 10)]);
        assert!(grouped.bucket(BundleKind::Diamonds).is_none());
        assert!(grouped.bucket(BundleKind::Subscription).is_none());
        assert_eq!(grouped.iter().count(), 1);
        assert!(group_bundles(&[]).is_empty());
    }

    #[test]
    fn unrecognized_kind_lands_in_default_bucket() {
        let grouped = group_bundles(&[bundle("1", "Mystery", None, 10)]);
        let bucket = grouped.bucket(UNRECOGNIZED_KIND_BUCKET).unwrap();
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let input = vec![
            diamonds("1", "A", Some(50), 100),
            diamonds("2", "B", Some(50), 90),
            diamonds("3", "C", Some(50), 80),
        ];
        let grouped = group_bundles(&input);
        let order: Vec<_> = grouped.flatten().map(|b| b.id.as_str()).collect();
        assert_eq!(order, ["1", "2", "3"]);
    }

    #[test]
    fn guest_sessions_do_not_see_reseller_prices() {
        let mut priced = bundle("1", "Promo", Some(BundleKind::Special), 190);
        priced.reseller_price_cents = Some(190);
        let input = [priced];

        let guest = ProductGrouper::new(Session::guest()).group(&input);
        assert!(guest.flatten().all(|b| b.reseller_price_cents.is_none()));

        let reseller = ProductGrouper::new(Session::reseller()).group(&input);
        assert!(reseller.flatten().all(|b| b.reseller_price_cents == Some(190)));
    }

    #[test]
    fn diamond_shelves_split_passes_raw_and_other() {
        let input = vec![
            diamonds("1", "Weekly Diamond Pass", Some(220), 150),
            diamonds("2", "172 Diamonds", Some(172), 220),
            diamonds("3", "86 diamonds", Some(86), 120),
            diamonds("4", "Starlight Member", None, 900),
            diamonds("5", "Twilight Pass", None, 700),
            diamonds("6", "50+50 Diamonds", Some(100), 80),
        ];
        let grouped = group_bundles(&input);
        let shelves = DiamondShelves::split(grouped.bucket(BundleKind::Diamonds).unwrap());
        let ids = |shelf: &[Bundle]| shelf.iter().map(|b| b.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&shelves.passes), ["1", "5"]);
        assert_eq!(ids(&shelves.raw_diamonds), ["3", "2"]);
        assert_eq!(ids(&shelves.other), ["6", "4"]);
        assert_eq!(shelves.iter().count(), 3);
    }
}
