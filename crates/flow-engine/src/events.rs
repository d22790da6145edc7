//! Event types for streaming simulation progress
//!
//! Events are sent from the simulator to the host (or any consumer)
//! so UIs can follow a run without polling the log.

use serde::{Deserialize, Serialize};

use crate::simulation::RunStatus;
use crate::types::{LogEntry, NodeId};

/// Trait for receiving simulation events
///
/// This abstracts over the transport mechanism (UI channel, mpsc, etc.)
/// allowing the simulator to be used in different contexts.
pub trait EventSink: Send + Sync {
    /// Receive an event
    fn send(&self, event: SimulationEvent);
}

/// Events emitted during a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SimulationEvent {
    /// A run resolved its entry point and started walking
    #[serde(rename_all = "camelCase")]
    RunStarted { start_node_id: NodeId },

    /// The walk entered a node; the cursor now points at it
    #[serde(rename_all = "camelCase")]
    NodeEntered { node_id: NodeId },

    /// An entry was appended to the activity log
    #[serde(rename_all = "camelCase")]
    LogAppended { entry: LogEntry },

    /// The run reached a terminal state
    #[serde(rename_all = "camelCase")]
    RunCompleted { status: RunStatus },
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: SimulationEvent) {}
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
#[derive(Default)]
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<SimulationEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<SimulationEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: SimulationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogStatus;

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();

        sink.send(SimulationEvent::NodeEntered {
            node_id: "node1".to_string(),
        });
        sink.send(SimulationEvent::LogAppended {
            entry: LogEntry::new("node1", LogStatus::Success, "Executing http..."),
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);

        match &events[0] {
            SimulationEvent::NodeEntered { node_id } => assert_eq!(node_id, "node1"),
            _ => panic!("Expected NodeEntered event"),
        }

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        // Should not panic
        sink.send(SimulationEvent::RunCompleted {
            status: RunStatus::Finished,
        });
    }

    #[test]
    fn test_event_wire_format() {
        let event = SimulationEvent::RunStarted {
            start_node_id: "trigger-1".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "runStarted");
        assert_eq!(json["startNodeId"], "trigger-1");
    }
}
