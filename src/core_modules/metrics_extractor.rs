// THEORY:
// The `metrics_extractor` is the bridge between raw pixel data and the
// temporal analysis stages. It reduces one decoded frame to an immutable
// `FrameMetrics` record: the frame-wide luminance and red-saturation
// scalars, the per-zone aggregates, and any spatial pattern flags. After
// this stage the frame buffer is no longer needed and can be dropped, so a
// run's resident memory is bounded by the metrics sequence, not the video.
//
// Key architectural principles:
// 1.  **Pure function of one frame**: No cross-frame state is read or
//     written here. That is what makes the stage safe to parallelize across
//     worker tasks; results are keyed by timestamp and re-sorted afterwards.
// 2.  **Derived once, immutable after**: Every later stage reads the same
//     `FrameMetrics`. Nothing recomputes pixel math.

use crate::core_modules::frame::Frame;
use crate::core_modules::pattern_detector::{self, PatternFlag};
use crate::core_modules::zone_grid::{ZoneGrid, ZoneMetrics};
use crate::pipeline::AnalyzerConfig;

/// The complete per-frame measurement record. Everything the temporal
/// stages need, with the pixel buffer left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMetrics {
    /// Presentation time of the source frame, in seconds.
    pub timestamp: f64,
    /// Mean Rec. 601 luminance over all pixels, 0-255 scale.
    pub luminance: f64,
    /// Mean saturation over red-dominant pixels, 0.0 when the frame has none.
    pub red_saturation: f64,
    /// Per-zone aggregates, row-major, aligned across all frames of a run.
    pub zones: Vec<ZoneMetrics>,
    /// Spatial pattern flags for this frame (at most one today).
    pub patterns: Vec<PatternFlag>,
}

/// Reduces one frame to its metrics record. O(pixels), no side effects.
pub fn extract_metrics(frame: &Frame, grid: &ZoneGrid, config: &AnalyzerConfig) -> FrameMetrics {
    let mut luminance_sum = 0.0f64;
    let mut red_saturation_sum = 0.0f64;
    let mut red_count = 0u64;

    for pixel in frame.pixels() {
        luminance_sum += pixel.luminance();
        if pixel.is_red_dominant() {
            red_saturation_sum += pixel.saturation();
            red_count += 1;
        }
    }

    let pixel_count = frame.pixel_count() as f64;
    FrameMetrics {
        timestamp: frame.timestamp,
        luminance: if pixel_count > 0.0 {
            luminance_sum / pixel_count
        } else {
            0.0
        },
        red_saturation: if red_count > 0 {
            red_saturation_sum / red_count as f64
        } else {
            0.0
        },
        zones: grid.partition(frame),
        patterns: pattern_detector::detect_patterns(frame, config),
    }
}
