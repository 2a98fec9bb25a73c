//! Observation of algorithm execution

pub mod tracer;

pub use self::tracer::{ExecutionTracer, LogTracer, RecordingTracer, TraceEvent};
