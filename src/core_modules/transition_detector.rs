// THEORY:
// The `transition_detector` is the first temporal stage. It walks the
// timestamp-ordered metrics sequence pairwise and decides, zone by zone,
// whether the step from one frame to the next constitutes a guideline-
// relevant luminance or saturated-red change. Flagged zones are then
// aggregated by hazard kind and direction: a frame-level transition exists
// only when the combined area of same-direction flagged zones reaches one
// full minimum zone, so scattered small changes never add up to a flash.
//
// Key architectural principles:
// 1.  **Aligned lookup, not search**: Zones carry stable (row, col)
//     addressing, so the cross-frame comparison of zone i is `zones[i]`
//     against `zones[i]` of the previous frame.
// 2.  **Gap skipping**: Frame pairs more than the tolerance apart are
//     skipped outright; a gap does not become a new comparison baseline.
// 3.  **Darkness exclusion**: A luminance swing whose darker side is already
//     bright (relative luminance >= 0.80) is excluded, per the guideline's
//     carve-out for flashes that never leave a bright baseline.

use crate::core_modules::metrics_extractor::FrameMetrics;
use crate::pipeline::AnalyzerConfig;
use log::warn;
use serde::Serialize;

/// The hazard stream a transition or flash belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    General,
    Red,
}

/// Which way the measured quantity moved between the two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionDirection {
    Increase,
    Decrease,
}

/// A frame-level transition: same-direction zone changes of one hazard kind
/// whose combined area reached the guideline minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransition {
    /// Timestamp of the later frame of the pair, in seconds.
    pub time: f64,
    pub kind: TransitionKind,
    pub direction: TransitionDirection,
}

/// Walks consecutive frame pairs and emits all frame-level transitions in
/// time order.
pub fn detect_transitions(metrics: &[FrameMetrics], config: &AnalyzerConfig) -> Vec<FrameTransition> {
    let mut transitions = Vec::new();

    for pair in metrics.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let gap = cur.timestamp - prev.timestamp;
        if gap > config.transition_gap_limit {
            warn!(
                "skipping frame pair at {:.3}s: gap {:.3}s exceeds tolerance",
                cur.timestamp, gap
            );
            continue;
        }

        // Flagged-zone area sums, indexed by [kind][direction].
        let mut areas = [[0u64; 2]; 2];

        for (prev_zone, cur_zone) in prev.zones.iter().zip(&cur.zones) {
            let prev_rel = prev_zone.luminance / 255.0;
            let cur_rel = cur_zone.luminance / 255.0;
            let diff = (cur_rel - prev_rel).abs();
            let darker = prev_rel.min(cur_rel);
            if diff >= config.general_luminance_diff && darker < config.general_darkness_ceiling {
                let direction = if cur_rel > prev_rel {
                    TransitionDirection::Increase
                } else {
                    TransitionDirection::Decrease
                };
                areas[0][direction as usize] += cur_zone.area;
            }

            let red_change = (cur_zone.red_area_proportion - prev_zone.red_area_proportion).abs();
            let red_peak = cur_zone
                .red_area_proportion
                .max(prev_zone.red_area_proportion);
            if red_peak >= config.red_area_floor && red_change >= config.red_change_threshold {
                let direction = if cur_zone.red_area_proportion > prev_zone.red_area_proportion {
                    TransitionDirection::Increase
                } else {
                    TransitionDirection::Decrease
                };
                areas[1][direction as usize] += cur_zone.area;
            }
        }

        for (kind_index, kind) in [TransitionKind::General, TransitionKind::Red]
            .into_iter()
            .enumerate()
        {
            for (dir_index, direction) in
                [TransitionDirection::Increase, TransitionDirection::Decrease]
                    .into_iter()
                    .enumerate()
            {
                if areas[kind_index][dir_index] >= config.min_zone_area() {
                    transitions.push(FrameTransition {
                        time: cur.timestamp,
                        kind,
                        direction,
                    });
                }
            }
        }
    }

    transitions
}
