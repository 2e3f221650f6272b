//! Storefront constants shared by the core and the platform layers.

use crate::bundle::BundleKind;

/// Bucket for bundles whose catalog type is missing or unknown.
pub const UNRECOGNIZED_KIND_BUCKET: BundleKind = BundleKind::Special;

/// Zone id sent for games that do not use zones, or when none was entered.
pub const SENTINEL_ZONE: &str = "0";

/// Default post-payment cooldown before another order can be submitted.
pub const DEFAULT_COOLDOWN_SECS: u32 = 5;

/// Bounds accepted for a configured cooldown.
pub const MIN_COOLDOWN_SECS: u32 = 1;
pub const MAX_COOLDOWN_SECS: u32 = 60;

/// Period of the recurring UI tick driving countdowns and the clock.
pub const TICK_INTERVAL_MS: u32 = 1_000;

/// Banner carousel auto-advance period.
pub const BANNER_ROTATE_MS: u32 = 5_000;

/// Storefront clock offset from UTC (Asia/Bangkok).
pub const DEFAULT_CLOCK_UTC_OFFSET_HOURS: i32 = 7;

// Storage keys -------------------------------------------------------------
pub const FORM_STORAGE_KEY: &str = "topup.form";
pub const RESELLER_FLAG_KEY: &str = "topup.reseller_auth";
