// THEORY:
// The `flash_pairer` turns the stream of frame-level transitions into
// discrete flash events. A flash, per the guidelines, is a there-and-back
// cycle: a brightness (or red-coverage) swing in one direction answered by
// an opposite swing shortly after. Pairing is greedy and non-overlapping:
// once two transitions form a flash both are consumed, and a trailing
// unmatched transition is dropped rather than forced into a pair.
//
// The general and red streams are paired independently; a brightness
// increase never closes a red-coverage decrease.

use crate::core_modules::transition_detector::{FrameTransition, TransitionKind};
use crate::pipeline::AnalyzerConfig;

/// One discrete flash event: a paired opposite-direction transition cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    /// Start of the cycle (time of the first transition), in seconds.
    pub time: f64,
    /// End of the cycle (time of the second transition), in seconds.
    pub end_time: f64,
    pub kind: TransitionKind,
}

/// Pairs adjacent opposite-direction transitions of one kind into flashes.
/// Input must be in time order; output is in time order.
pub fn pair_flashes(
    transitions: &[FrameTransition],
    kind: TransitionKind,
    config: &AnalyzerConfig,
) -> Vec<Flash> {
    let stream: Vec<&FrameTransition> = transitions.iter().filter(|t| t.kind == kind).collect();

    let mut flashes = Vec::new();
    let mut i = 0;
    while i + 1 < stream.len() {
        let (first, second) = (stream[i], stream[i + 1]);
        if first.direction != second.direction
            && second.time - first.time <= config.flash_pairing_window
        {
            flashes.push(Flash {
                time: first.time,
                end_time: second.time,
                kind,
            });
            i += 2;
        } else {
            i += 1;
        }
    }
    flashes
}
