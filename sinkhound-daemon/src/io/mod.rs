//! File-facing IO for the daemon: whitelist loading and policy publishing.

pub mod policy_writer;
pub mod whitelist_loader;

pub use policy_writer::{PolicyWriter, PublishError, PublishSummary};
pub use whitelist_loader::{load_whitelist, parse_whitelist, WhitelistLoadError};
