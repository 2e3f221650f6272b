//! Per-visit session context, resolved once at startup.
use serde::{Deserialize, Serialize};

/// Who is browsing the storefront.
///
/// Built once when the app starts and handed to the catalog loader and the
/// product grouper, so nothing reads the reseller flag from storage mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    reseller: bool,
}

impl Session {
    #[must_use]
    pub const fn new(reseller: bool) -> Self {
        Self { reseller }
    }

    #[must_use]
    pub const fn guest() -> Self {
        Self::new(false)
    }

    #[must_use]
    pub const fn reseller() -> Self {
        Self::new(true)
    }

    /// Interpret the raw persisted reseller flag. Only the literal `true` counts.
    #[must_use]
    pub fn from_flag(raw: Option<&str>) -> Self {
        Self::new(raw.is_some_and(|value| value.trim() == "true"))
    }

    #[must_use]
    pub const fn is_reseller(&self) -> bool {
        self.reseller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing_is_strict() {
        assert!(Session::from_flag(Some("true")).is_reseller());
        assert!(Session::from_flag(Some(" true\n")).is_reseller());
        assert!(!Session::from_flag(Some("TRUE1")).is_reseller());
        assert!(!Session::from_flag(Some("1")).is_reseller());
        assert!(!Session::from_flag(None).is_reseller());
    }
}
