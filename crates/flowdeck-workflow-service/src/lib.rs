//! Host-agnostic workflow application services for Flowdeck
//!
//! This crate wires the flow-engine pieces into one owned application
//! state object, [`WorkflowService`], and exposes the command surface a
//! host shell (desktop app, HTTP adapter, test harness) calls: history
//! commits and undo/redo, node and edge commands, selection, viewport
//! persistence, and simulation runs.
//!
//! The service holds the only mutable reference to the editing history;
//! hosts share the service itself (e.g. behind an `Arc`) rather than
//! duplicating state.

mod service;

pub use service::WorkflowService;

// Re-export the engine crate for host convenience
pub use flow_engine;
