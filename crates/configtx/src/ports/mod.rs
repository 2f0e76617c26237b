//! Ports for the configuration transaction manager
//!
//! - `inbound`: what the manager offers the ordering/commit pipeline
//! - `outbound`: the capabilities the manager consumes

pub mod inbound;
pub mod outbound;

pub use inbound::ConfigTxApi;
pub use outbound::{ConfigHandler, Policy, PolicyManager};
