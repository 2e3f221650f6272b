use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;

/// Storefront state as reported by `window.__topupTest.state()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StorefrontState {
    pub game: String,
    pub account_id: String,
    pub zone_id: String,
    pub nickname: Option<String>,
    pub validated: bool,
    pub selected_bundle: Option<String>,
    pub bundle_count: usize,
    pub catalog_loading: bool,
    pub checkout: String,
    pub cooldown: u32,
    pub order: Option<String>,
    pub reseller: bool,
}

impl StorefrontState {
    #[must_use]
    pub fn catalog_ready(&self) -> bool {
        !self.catalog_loading && self.bundle_count > 0
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct TestBridge<'a> {
    driver: &'a WebDriver,
}

impl<'a> TestBridge<'a> {
    pub const fn new(driver: &'a WebDriver) -> Self {
        Self { driver }
    }

    async fn call(&self, script: &str, args: Vec<serde_json::Value>) -> Result<()> {
        self.driver
            .execute(script, args)
            .await
            .with_context(|| format!("running `{script}`"))?;
        Ok(())
    }

    pub async fn ensure_available(&self) -> Result<()> {
        let result = self
            .driver
            .execute("return !!window.__topupTest", vec![])
            .await?;
        let ok = result.json().as_bool().unwrap_or(false);
        if !ok {
            bail!("__topupTest is not available. Did you pass ?test=1 to the storefront?");
        }
        Ok(())
    }

    pub async fn select_game(&self, code: &str) -> Result<()> {
        self.call(
            "window.__topupTest.selectGame(arguments[0])",
            vec![code.into()],
        )
        .await
    }

    pub async fn select_bundle(&self, id: &str) -> Result<()> {
        self.call(
            "window.__topupTest.selectBundle(arguments[0])",
            vec![id.into()],
        )
        .await
    }

    pub async fn fill_account(&self, account_id: &str, zone_id: &str) -> Result<()> {
        self.call(
            "window.__topupTest.fillAccount(arguments[0], arguments[1])",
            vec![account_id.into(), zone_id.into()],
        )
        .await
    }

    pub async fn check_account(&self) -> Result<()> {
        self.call("window.__topupTest.checkAccount()", vec![]).await
    }

    pub async fn pay_with(&self, method: &str) -> Result<()> {
        self.call(
            "window.__topupTest.payWith(arguments[0])",
            vec![method.into()],
        )
        .await
    }

    pub async fn submit(&self) -> Result<()> {
        self.call("window.__topupTest.submit()", vec![]).await
    }

    pub async fn dismiss(&self) -> Result<()> {
        self.call("window.__topupTest.dismiss()", vec![]).await
    }

    pub async fn tick(&self) -> Result<()> {
        self.call("window.__topupTest.tick()", vec![]).await
    }

    pub async fn state(&self) -> Result<StorefrontState> {
        let result = self
            .driver
            .execute("return window.__topupTest.state()", vec![])
            .await?;
        let v = result.json().clone();
        let s: StorefrontState = serde_json::from_value(v).context("parsing StorefrontState")?;
        Ok(s)
    }

    /// Poll the bridge until `ready` holds or `timeout` elapses.
    pub async fn wait_for(
        &self,
        what: &str,
        timeout: Duration,
        ready: impl Fn(&StorefrontState) -> bool,
    ) -> Result<StorefrontState> {
        let start = Instant::now();
        loop {
            let state = self.state().await?;
            if ready(&state) {
                return Ok(state);
            }
            if start.elapsed() >= timeout {
                bail!("timed out after {timeout:?} waiting for {what}; last state: {state:?}");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_parses_bridge_snapshot() {
        let state: StorefrontState = serde_json::from_value(json!({
            "game": "mlbb",
            "accountId": "123456789",
            "zoneId": "1234",
            "nickname": "Shadow",
            "validated": true,
            "selectedBundle": "9",
            "bundleCount": 6,
            "catalogLoading": false,
            "checkout": "awaiting_payment",
            "cooldown": 0,
            "order": "123456789 1234 172",
            "reseller": false
        }))
        .expect("snapshot parses");
        assert!(state.catalog_ready());
        assert_eq!(state.order.as_deref(), Some("123456789 1234 172"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let state: StorefrontState =
            serde_json::from_value(json!({"game": "freefire", "catalogLoading": true}))
                .expect("partial snapshot parses");
        assert_eq!(state.game, "freefire");
        assert!(!state.catalog_ready());
        assert!(state.nickname.is_none());
    }
}
