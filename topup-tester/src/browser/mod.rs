pub mod bridge;
pub mod session;

pub use bridge::{StorefrontState, TestBridge};
pub use session::{BrowserConfig, BrowserKind, new_session};
