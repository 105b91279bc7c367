//! Scripted conversation producer.
//!
//! [`ScriptedTransport`] plays a guided HR-assistant walkthrough into an
//! [`ActivityFeed`](chatline_core::ActivityFeed): a welcome message with
//! suggestions, canned replies to the suggested values, a streamed answer
//! built from typing deltas and adaptive cards whose submissions are
//! acknowledged.

pub mod cards;
pub mod scenario;
pub mod transport;

pub use chatline_core::{Error, Result};
pub use scenario::{Reply, Scenario, chunk_words};
pub use transport::ScriptedTransport;
