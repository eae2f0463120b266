// THEORY:
// The `rate_analyzer` is the windowing stage. The guidelines do not limit
// the total number of flashes in a clip, only their density: more than
// three flashes inside any one-second span is the hazard. A fixed-width
// window therefore slides over the clip in small steps, counting general
// and red flash starts independently, tracking the per-kind maxima, and
// recording the spans where the combined density crosses the limit.
//
// Key architectural principles:
// 1.  **Start-time semantics**: A flash belongs to a window when its start
//     time falls in [t, t + window). The cycle's end may spill past the
//     window edge.
// 2.  **Ordered deduplication**: Window starts are scanned in increasing
//     order, so overlapping detections of one hazard are collapsed by
//     comparing against the most recently recorded interval only. No
//     backward search over the accumulated list is ever needed.
// 3.  **Persistence lives here too**: The static-pattern hazard needs the
//     same full-timeline walk, so the run-length tracking of high-severity
//     pattern frames sits alongside the rate scan rather than in the
//     per-frame detector.

use crate::core_modules::flash_pairer::Flash;
use crate::core_modules::metrics_extractor::FrameMetrics;
use crate::core_modules::pattern_detector::PatternSeverity;
use crate::pipeline::AnalyzerConfig;
use serde::Serialize;

/// A one-second span whose combined flash count exceeded the safe limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DangerousInterval {
    /// Window start, in seconds.
    pub start: f64,
    /// Window end (start + window width), in seconds.
    pub end: f64,
    /// General flashes starting inside the window.
    pub general_count: u32,
    /// Red flashes starting inside the window.
    pub red_count: u32,
}

/// The outcome of the sliding-window scan.
#[derive(Debug, Clone, PartialEq)]
pub struct RateAnalysis {
    /// Peak general flash count over any single window position.
    pub max_general: u32,
    /// Peak red flash count over any single window position.
    pub max_red: u32,
    /// Deduplicated spans where the combined count crossed the limit.
    pub dangerous_intervals: Vec<DangerousInterval>,
}

/// A maximal run of consecutive high-severity-patterned frames that lasted
/// long enough to be a hazard on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentPattern {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
}

/// Slides the rate window across `[0, duration)` and counts flash starts per
/// position. With `scan_past_end` set, window starts up to and including the
/// clip end are scanned as well (the trailing partial windows).
pub fn analyze_rates(
    general: &[Flash],
    red: &[Flash],
    duration: f64,
    config: &AnalyzerConfig,
) -> RateAnalysis {
    let mut analysis = RateAnalysis {
        max_general: 0,
        max_red: 0,
        dangerous_intervals: Vec::new(),
    };
    if general.is_empty() && red.is_empty() {
        return analysis;
    }

    let in_window = |flashes: &[Flash], start: f64, end: f64| {
        flashes.iter().filter(|f| f.time >= start && f.time < end).count() as u32
    };

    let mut step_index = 0u64;
    loop {
        let t = step_index as f64 * config.rate_window_step;
        let past_end = if config.scan_past_end { t > duration } else { t >= duration };
        if past_end {
            break;
        }
        let window_end = t + config.rate_window_width;

        let general_count = in_window(general, t, window_end);
        let red_count = in_window(red, t, window_end);
        analysis.max_general = analysis.max_general.max(general_count);
        analysis.max_red = analysis.max_red.max(red_count);

        if general_count + red_count > config.flashes_per_second_limit {
            let duplicate = analysis
                .dangerous_intervals
                .last()
                .is_some_and(|last| (t - last.start).abs() < config.interval_dedup_distance);
            if !duplicate {
                analysis.dangerous_intervals.push(DangerousInterval {
                    start: t,
                    end: window_end,
                    general_count,
                    red_count,
                });
            }
        }
        step_index += 1;
    }

    analysis
}

/// Walks the metrics sequence and extracts maximal runs of consecutive
/// frames carrying a high-severity pattern flag, keeping runs that span at
/// least the persistence minimum.
pub fn find_persistent_patterns(
    metrics: &[FrameMetrics],
    config: &AnalyzerConfig,
) -> Vec<PersistentPattern> {
    let mut persistent = Vec::new();
    let mut run: Option<(f64, f64)> = None;

    for frame in metrics {
        let is_high = frame
            .patterns
            .iter()
            .any(|p| p.severity == PatternSeverity::High);
        if is_high {
            run = match run {
                Some((start, _)) => Some((start, frame.timestamp)),
                None => Some((frame.timestamp, frame.timestamp)),
            };
        } else if let Some((start, end)) = run.take() {
            push_if_long_enough(&mut persistent, start, end, config);
        }
    }
    if let Some((start, end)) = run {
        push_if_long_enough(&mut persistent, start, end, config);
    }

    persistent
}

fn push_if_long_enough(
    persistent: &mut Vec<PersistentPattern>,
    start: f64,
    end: f64,
    config: &AnalyzerConfig,
) {
    let duration = end - start;
    if duration >= config.pattern_persistence_minimum {
        persistent.push(PersistentPattern {
            start_time: start,
            end_time: end,
            duration,
        });
    }
}
