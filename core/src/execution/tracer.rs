//! Execution tracing for min-cut tree construction
//!
//! The refinement driver reports its progress through the `ExecutionTracer`
//! observer at fixed checkpoints: initial grouping, start of a round, the
//! auxiliary network, the cut found in it, and the updated tree. Tracing is a
//! side channel; the computed tree never depends on whether a tracer is
//! attached.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::Level;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, NodeId};
use crate::data_structures::graph::Capacity;
use crate::data_structures::matrix::CapacityMatrix;

/// Checkpoint reported by the refinement driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// The tree starts as one group holding every original vertex
    Initialized { groups: Vec<Vec<NodeId>> },
    /// A group with at least two members was selected
    RoundStarted { round: usize, group: Vec<NodeId> },
    /// Auxiliary network built for the selected group
    NetworkBuilt {
        round: usize,
        vertices: Vec<Vec<NodeId>>,
        matrix: CapacityMatrix,
    },
    /// Minimum cut between the chosen terminals
    CutFound {
        round: usize,
        source: Vec<NodeId>,
        sink: Vec<NodeId>,
        max_flow: Capacity,
        source_side: Vec<NodeId>,
        sink_side: Vec<NodeId>,
    },
    /// The group was split and the tree rewired
    TreeUpdated {
        round: usize,
        groups: Vec<Vec<NodeId>>,
        matrix: CapacityMatrix,
    },
    /// All groups are singletons; `tree` is indexed like the input
    Finished { tree: CapacityMatrix },
}

/// Observer of refinement checkpoints
pub trait ExecutionTracer {
    fn record(&mut self, event: &TraceEvent);
}

/// Tracer that keeps every event in order
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Rounds recorded so far
    pub fn round_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TraceEvent::RoundStarted { .. }))
            .count()
    }

    pub fn to_json(&self) -> Result<String, AlgorithmError> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }
}

impl ExecutionTracer for RecordingTracer {
    fn record(&mut self, event: &TraceEvent) {
        self.events.push(event.clone());
    }
}

/// Tracer that renders each checkpoint through the `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogTracer {
    level: Level,
}

impl LogTracer {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LogTracer {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}

impl ExecutionTracer for LogTracer {
    fn record(&mut self, event: &TraceEvent) {
        if !log::log_enabled!(self.level) {
            return;
        }
        match event {
            TraceEvent::Initialized { groups } => {
                log::log!(self.level, "Step 1: Vt = {}", format_groups(groups));
            }
            TraceEvent::RoundStarted { round, group } => {
                log::log!(self.level, "round {}, Step 2: X = {}", round, format_set(group));
            }
            TraceEvent::NetworkBuilt { round, vertices, matrix } => {
                log::log!(
                    self.level,
                    "round {}, Step 3: G = {}\n{}",
                    round,
                    format_groups(vertices),
                    matrix
                );
            }
            TraceEvent::CutFound {
                round,
                source,
                sink,
                max_flow,
                source_side,
                sink_side,
            } => {
                log::log!(
                    self.level,
                    "round {}, Step 4: s-t = {}-{}, max_f = {}, A = {}, B = {}",
                    round,
                    format_set(source),
                    format_set(sink),
                    max_flow,
                    format_set(source_side),
                    format_set(sink_side)
                );
            }
            TraceEvent::TreeUpdated { round, groups, matrix } => {
                log::log!(
                    self.level,
                    "round {}, Step 5: Vt = {}\n{}",
                    round,
                    format_groups(groups),
                    matrix
                );
            }
            TraceEvent::Finished { tree } => {
                log::log!(self.level, "result:\n{}", tree);
            }
        }
    }
}

/// `{0,1,2}`
pub fn format_set(set: &[NodeId]) -> String {
    let items: Vec<_> = set.iter().map(NodeId::to_string).collect();
    format!("{{{}}}", items.join(","))
}

/// `[ {0,1}, {2} ]`
pub fn format_groups(groups: &[Vec<NodeId>]) -> String {
    let items: Vec<_> = groups.iter().map(|group| format_set(group)).collect();
    format!("[ {} ]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn test_set_notation() {
        assert_eq!(format_set(&ids(&[0, 4, 2])), "{0,4,2}");
        assert_eq!(format_set(&[]), "{}");
        assert_eq!(
            format_groups(&[ids(&[0, 1]), ids(&[2])]),
            "[ {0,1}, {2} ]"
        );
    }

    #[test]
    fn test_recording_tracer_keeps_order() {
        let mut tracer = RecordingTracer::new();
        tracer.record(&TraceEvent::Initialized {
            groups: vec![ids(&[0, 1])],
        });
        tracer.record(&TraceEvent::RoundStarted {
            round: 1,
            group: ids(&[0, 1]),
        });

        assert_eq!(tracer.events().len(), 2);
        assert_eq!(tracer.round_count(), 1);
        assert!(matches!(tracer.events()[0], TraceEvent::Initialized { .. }));
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = TraceEvent::RoundStarted {
            round: 3,
            group: ids(&[1, 2]),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"round_started","round":3,"group":[1,2]}"#);

        let back: TraceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_log_tracer_accepts_every_event() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut tracer = LogTracer::default();
        tracer.record(&TraceEvent::Finished {
            tree: CapacityMatrix::zeros(2),
        });
        tracer.record(&TraceEvent::CutFound {
            round: 1,
            source: ids(&[0]),
            sink: ids(&[1]),
            max_flow: 5,
            source_side: ids(&[0]),
            sink_side: ids(&[1]),
        });
    }
}
