//! Host bridge adapters.
//!
//! The host plugin owns the real scene graph, selection and chat log. The
//! engine keeps a mirror of the pieces it reads, refreshed by host events,
//! and turns every port write into an [`EngineCommand`] on the outbox.

pub mod convert;
mod host;

pub use host::{HostBridge, HostMirror};
