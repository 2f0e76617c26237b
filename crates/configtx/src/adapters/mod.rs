//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound capability ports. Production
//! policy engines and config handlers plug into the same traits.

mod handler;
mod policy;

pub use handler::{AcceptAllHandler, RecordingHandler};
pub use policy::{AcceptAllPolicy, RejectAllPolicy, StaticPolicyManager};
