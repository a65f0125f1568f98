//! API layer - Host bridge entry points.
//!
//! - `host_events` - dispatch of parsed host events to use cases
//! - `stdio` - the line-delimited JSON transport

pub mod host_events;
pub mod stdio;

pub use host_events::{HandlerError, HostEventHandler};
