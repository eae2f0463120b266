// THEORY:
// The `pattern_detector` flags frames that carry a dense high-contrast
// spatial pattern (tight stripes, checkerboards, strobing grids). Such
// patterns are a hazard in their own right, independent of flashing, once
// they persist on screen; this module provides the per-frame signal and the
// persistence tracking lives with the rest of the temporal analysis.
//
// Key architectural principles:
// 1.  **Strided sampling**: Scanning every pixel pair would be O(4*pixels)
//     comparisons for no extra signal; sampling every 4th pixel in each axis
//     keeps the cost low while still resolving the stripe frequencies that
//     matter at viewing distance.
// 2.  **Stateless utility**: Like a blob detector over a single status map,
//     this is a pure function of one frame. It knows nothing about previous
//     frames; runs of flagged frames are assembled downstream.
// 3.  **Severity as a ratio band**: The fraction of sampled pixels sitting on
//     a high-contrast edge maps directly to severity. Only the high band
//     participates in the safety verdict; the medium band is reported for
//     diagnostics.

use crate::core_modules::frame::Frame;
use crate::pipeline::AnalyzerConfig;
use serde::Serialize;

/// Severity band of a detected spatial pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSeverity {
    Medium,
    High,
}

/// A dense high-contrast pattern detected in a single frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternFlag {
    pub severity: PatternSeverity,
    pub description: String,
    /// Fraction of sampled pixels with a high-contrast neighbor, in [0, 1].
    pub ratio: f64,
}

/// Samples the frame on a fixed stride and compares each sampled pixel's
/// luminance against its right and below neighbors at the same stride.
/// Returns at most one flag; frames below the medium threshold yield none.
pub fn detect_patterns(frame: &Frame, config: &AnalyzerConfig) -> Vec<PatternFlag> {
    let stride = config.pattern_stride;
    let mut samples = 0u64;
    let mut transitions = 0u64;

    let mut y = 0;
    while y < frame.height {
        let mut x = 0;
        while x < frame.width {
            let right = x + stride;
            let below = y + stride;
            if right >= frame.width && below >= frame.height {
                // No neighbor at this stride; the position cannot form a pair.
                x += stride;
                continue;
            }
            samples += 1;

            let luminance = frame.pixel_at(x, y).luminance();
            let mut is_transition = false;
            if right < frame.width {
                is_transition |= (luminance - frame.pixel_at(right, y).luminance()).abs()
                    > config.pattern_contrast_threshold;
            }
            if !is_transition && below < frame.height {
                is_transition |= (luminance - frame.pixel_at(x, below).luminance()).abs()
                    > config.pattern_contrast_threshold;
            }
            if is_transition {
                transitions += 1;
            }
            x += stride;
        }
        y += stride;
    }

    if samples == 0 {
        return Vec::new();
    }

    let ratio = transitions as f64 / samples as f64;
    if ratio <= config.pattern_medium_ratio {
        return Vec::new();
    }

    let severity = if ratio > config.pattern_high_ratio {
        PatternSeverity::High
    } else {
        PatternSeverity::Medium
    };
    vec![PatternFlag {
        severity,
        description: format!(
            "High-contrast spatial pattern over {:.0}% of sampled area",
            ratio * 100.0
        ),
        ratio,
    }]
}
