// THEORY:
// Everything past input validation is pure arithmetic over already-checked
// data, so the analyzer has exactly one fallible surface: the frame sequence
// handed over by the decoding collaborator. A bad sequence aborts the run
// before any stage produces output; a safety verdict must never degrade into
// a best-effort partial report.

use thiserror::Error;

/// Failure kinds for an analysis run. All are detected during input
/// validation, before metric extraction begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The decoding collaborator supplied no frames at all.
    #[error("no frames supplied for analysis")]
    EmptyFrameSequence,

    /// A frame has a zero dimension, dimensions that differ from the rest of
    /// the run, or a pixel buffer that does not match its stated geometry.
    #[error("invalid frame geometry {width}x{height} at frame {index}")]
    InvalidFrameGeometry { index: usize, width: u32, height: u32 },

    /// Timestamps must be monotonically non-decreasing across the run.
    #[error("timestamp {timestamp}s at frame {index} precedes previous timestamp {previous}s")]
    NonMonotonicTimestamp {
        index: usize,
        timestamp: f64,
        previous: f64,
    },
}
