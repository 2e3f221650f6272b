pub mod fixtures;
pub mod flow;
pub mod reports;
pub mod tester;

pub use flow::{AccountPlan, FlowPlan, FlowSummary};
pub use tester::*;
