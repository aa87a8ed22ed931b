//! Request handlers.

pub mod approvals;
pub mod ask;
pub mod dashboard;
pub mod health;
pub mod tables;

pub use approvals::{decide_approval, list_approvals};
pub use ask::ask;
pub use dashboard::dashboard;
pub use health::health;
pub use tables::{schema, tables};
