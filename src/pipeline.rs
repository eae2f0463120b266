// THEORY:
// The `pipeline` module is the final, top-level API for the analyzer. It
// encapsulates the full stack — validation, per-frame metric extraction,
// transition detection, flash pairing, rate analysis, pattern persistence
// and the compliance verdict — behind a single entry point that consumes an
// ordered frame sequence and returns one immutable `ComplianceReport`.
//
// Key architectural principles:
// 1.  **Strictly forward data flow**: Each stage consumes the complete
//     output of the previous one. There are no backward transitions; a
//     validation failure aborts the run before any stage produces output.
// 2.  **Tunable but guideline-true**: Every threshold lives in
//     `AnalyzerConfig`, whose defaults are the WCAG flash and pattern
//     guideline values. Callers with stricter house rules can tighten them
//     without touching the stages.
// 3.  **One external artifact**: The `ComplianceReport` is the sole output
//     contract. Chart rendering, CLI bindings and UI layers are external
//     shells consuming this object; none of them reach into the stages.

use crate::core_modules::flash_pairer::{self, Flash};
use crate::core_modules::frame::Frame;
use crate::core_modules::metrics_extractor::{self, FrameMetrics};
use crate::core_modules::rate_analyzer::{self, DangerousInterval, PersistentPattern};
use crate::core_modules::transition_detector::{self, TransitionKind};
use crate::core_modules::zone_grid::ZoneGrid;
use crate::error::AnalysisError;
use log::{debug, info};
use serde::Serialize;

// Re-export key data structures for the public API.
pub use crate::core_modules::pattern_detector::{PatternFlag, PatternSeverity};

const COMPLIANT: &str = "WCAG 2.0 compliant";
const NON_COMPLIANT: &str = "WCAG 2.0 non-compliant - photosensitive seizure risk";

/// Configuration for an analysis run. Defaults carry the guideline values;
/// every threshold is tunable.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Maximum zone width in pixels (the guideline minimum-area dimension).
    pub zone_max_width: u32,
    /// Maximum zone height in pixels.
    pub zone_max_height: u32,
    /// Largest timestamp gap (seconds) across which two frames are compared.
    pub transition_gap_limit: f64,
    /// Largest gap (seconds) between two transitions that still pair into a flash.
    pub flash_pairing_window: f64,
    /// Minimum relative-luminance change for a general zone transition.
    pub general_luminance_diff: f64,
    /// A general transition only counts if its darker side sits below this
    /// relative luminance; swings on an already-bright baseline are excluded.
    pub general_darkness_ceiling: f64,
    /// Minimum red-area proportion (on either frame) for a red transition.
    pub red_area_floor: f64,
    /// Minimum cross-frame change in red-area proportion.
    pub red_change_threshold: f64,
    /// Sampling stride, in pixels, for the pattern detector.
    pub pattern_stride: u32,
    /// Luminance difference (0-255) above which a sampled pair is high-contrast.
    pub pattern_contrast_threshold: f64,
    /// Ratio above which a pattern flag is emitted at medium severity.
    pub pattern_medium_ratio: f64,
    /// Ratio above which the flag escalates to high severity.
    pub pattern_high_ratio: f64,
    /// Width of the sliding rate window, in seconds.
    pub rate_window_width: f64,
    /// Step between window positions, in seconds.
    pub rate_window_step: f64,
    /// Flashes per window above which a span is dangerous (and above which a
    /// per-kind peak renders the clip unsafe).
    pub flashes_per_second_limit: u32,
    /// Minimum spacing between reported dangerous-interval starts, in seconds.
    pub interval_dedup_distance: f64,
    /// Minimum time span of a high-severity pattern run to count as persistent.
    pub pattern_persistence_minimum: f64,
    /// Whether window positions past the last frame's timestamp are scanned.
    /// The upstream scan stops at the clip end; this keeps that default while
    /// letting callers cover the trailing partial windows.
    pub scan_past_end: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            zone_max_width: 341,
            zone_max_height: 256,
            transition_gap_limit: 0.5,
            flash_pairing_window: 0.5,
            general_luminance_diff: 0.10,
            general_darkness_ceiling: 0.80,
            red_area_floor: 0.25,
            red_change_threshold: 0.10,
            pattern_stride: 4,
            pattern_contrast_threshold: 100.0,
            pattern_medium_ratio: 0.3,
            pattern_high_ratio: 0.5,
            rate_window_width: 1.0,
            rate_window_step: 0.1,
            flashes_per_second_limit: 3,
            interval_dedup_distance: 0.5,
            pattern_persistence_minimum: 0.5,
            scan_past_end: false,
        }
    }
}

impl AnalyzerConfig {
    /// The guideline minimum area, in pixels, that same-direction zone
    /// changes must cover to count as a frame-level transition.
    pub fn min_zone_area(&self) -> u64 {
        self.zone_max_width as u64 * self.zone_max_height as u64
    }
}

/// One charting sample: a frame's timestamp and mean luminance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LuminancePoint {
    pub timestamp: f64,
    pub luminance: f64,
}

/// What produced a reported pattern entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternReportKind {
    /// A single frame carrying a dense high-contrast pattern.
    Static,
    /// A run of such frames sustained past the persistence minimum.
    Persistent,
}

/// One entry of the report's merged pattern list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    #[serde(rename = "type")]
    pub kind: PatternReportKind,
    pub severity: PatternSeverity,
    pub description: String,
    /// Frame timestamp for static entries, run start for persistent ones.
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

/// The final, immutable result of an analysis run — the one object handed
/// to the presentation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// Per-frame luminance samples for charting.
    pub luminance_data: Vec<LuminancePoint>,
    /// Timestamp of the last analyzed frame, in seconds.
    pub duration: f64,
    pub avg_luminance: f64,
    pub max_luminance: f64,
    pub min_luminance: f64,
    /// Total discrete flashes, general and red combined.
    pub flash_count: usize,
    pub general_flash_count: usize,
    pub red_flash_count: usize,
    /// The larger of the two per-kind window peaks.
    pub max_flashes_per_second: u32,
    pub max_general_flashes_per_second: u32,
    pub max_red_flashes_per_second: u32,
    /// Spans where the combined flash density crossed the safe limit.
    pub dangerous_seconds: Vec<DangerousInterval>,
    /// Merged per-frame pattern flags and persistent pattern runs.
    pub patterns: Vec<PatternReport>,
    pub is_safe: bool,
    /// Fixed descriptive string keyed off `is_safe`.
    pub compliance: String,
}

/// The main, top-level struct for the analyzer.
pub struct AnalysisPipeline {
    config: AnalyzerConfig,
}

impl AnalysisPipeline {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// A pipeline with the guideline-default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AnalyzerConfig::default())
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Runs the full analysis on an ordered frame sequence. Frames are
    /// consumed; each pixel buffer is dropped as soon as its metrics are
    /// derived. Fails fast on an invalid sequence, producing no report.
    pub fn analyze(&self, frames: Vec<Frame>) -> Result<ComplianceReport, AnalysisError> {
        validate_frames(&frames)?;

        let grid = ZoneGrid::new(
            frames[0].width,
            frames[0].height,
            self.config.zone_max_width,
            self.config.zone_max_height,
        );
        debug!(
            "extracting metrics: {} frames, {}x{} zone grid",
            frames.len(),
            grid.grid_width(),
            grid.grid_height()
        );
        let metrics: Vec<FrameMetrics> = frames
            .into_iter()
            .map(|frame| metrics_extractor::extract_metrics(&frame, &grid, &self.config))
            .collect();

        Ok(analyze_metrics(metrics, &self.config))
    }
}

/// Validates the input contract with the decoding collaborator: at least one
/// frame, constant non-zero geometry, buffers matching that geometry, and
/// non-decreasing timestamps.
pub(crate) fn validate_frames(frames: &[Frame]) -> Result<(), AnalysisError> {
    let first = frames.first().ok_or(AnalysisError::EmptyFrameSequence)?;

    for (index, frame) in frames.iter().enumerate() {
        let geometry_ok = frame.width > 0
            && frame.height > 0
            && frame.width == first.width
            && frame.height == first.height
            && frame.pixels.len() == frame.pixel_count() * 4;
        if !geometry_ok {
            return Err(AnalysisError::InvalidFrameGeometry {
                index,
                width: frame.width,
                height: frame.height,
            });
        }
        if index > 0 {
            let previous = frames[index - 1].timestamp;
            if frame.timestamp < previous {
                return Err(AnalysisError::NonMonotonicTimestamp {
                    index,
                    timestamp: frame.timestamp,
                    previous,
                });
            }
        }
    }
    Ok(())
}

/// The sequential back half of the pipeline: everything after metric
/// extraction. Shared by the sequential and parallel front ends.
pub(crate) fn analyze_metrics(
    metrics: Vec<FrameMetrics>,
    config: &AnalyzerConfig,
) -> ComplianceReport {
    debug!("detecting transitions over {} metric records", metrics.len());
    let transitions = transition_detector::detect_transitions(&metrics, config);

    debug!("pairing {} frame transitions into flashes", transitions.len());
    let general = flash_pairer::pair_flashes(&transitions, TransitionKind::General, config);
    let red = flash_pairer::pair_flashes(&transitions, TransitionKind::Red, config);

    let duration = metrics.last().map(|m| m.timestamp).unwrap_or(0.0);
    debug!("analyzing flash rates over {:.2}s", duration);
    let rates = rate_analyzer::analyze_rates(&general, &red, duration, config);
    let persistent = rate_analyzer::find_persistent_patterns(&metrics, config);

    let report = compose_report(&metrics, &general, &red, rates, persistent, config);
    info!(
        "analysis complete: {} flashes, peak {}/s, verdict {}",
        report.flash_count,
        report.max_flashes_per_second,
        if report.is_safe { "safe" } else { "unsafe" }
    );
    report
}

/// The pass/fail verdict: both per-kind window peaks within the limit and no
/// sustained high-severity pattern.
fn verdict(max_general: u32, max_red: u32, has_persistent_pattern: bool, limit: u32) -> bool {
    max_general <= limit && max_red <= limit && !has_persistent_pattern
}

fn compose_report(
    metrics: &[FrameMetrics],
    general: &[Flash],
    red: &[Flash],
    rates: rate_analyzer::RateAnalysis,
    persistent: Vec<PersistentPattern>,
    config: &AnalyzerConfig,
) -> ComplianceReport {
    let luminance_data: Vec<LuminancePoint> = metrics
        .iter()
        .map(|m| LuminancePoint {
            timestamp: m.timestamp,
            luminance: m.luminance,
        })
        .collect();

    let frame_count = metrics.len() as f64;
    let avg_luminance = metrics.iter().map(|m| m.luminance).sum::<f64>() / frame_count;
    let max_luminance = metrics.iter().map(|m| m.luminance).fold(f64::MIN, f64::max);
    let min_luminance = metrics.iter().map(|m| m.luminance).fold(f64::MAX, f64::min);

    let mut patterns = Vec::new();
    for frame in metrics {
        for flag in &frame.patterns {
            patterns.push(PatternReport {
                kind: PatternReportKind::Static,
                severity: flag.severity,
                description: flag.description.clone(),
                time: frame.timestamp,
                end_time: None,
                duration: None,
                ratio: Some(flag.ratio),
            });
        }
    }
    for run in &persistent {
        patterns.push(PatternReport {
            kind: PatternReportKind::Persistent,
            severity: PatternSeverity::High,
            description: format!("High-contrast pattern sustained for {:.1}s", run.duration),
            time: run.start_time,
            end_time: Some(run.end_time),
            duration: Some(run.duration),
            ratio: None,
        });
    }

    let is_safe = verdict(
        rates.max_general,
        rates.max_red,
        !persistent.is_empty(),
        config.flashes_per_second_limit,
    );

    ComplianceReport {
        luminance_data,
        duration: metrics.last().map(|m| m.timestamp).unwrap_or(0.0),
        avg_luminance,
        max_luminance,
        min_luminance,
        flash_count: general.len() + red.len(),
        general_flash_count: general.len(),
        red_flash_count: red.len(),
        max_flashes_per_second: rates.max_general.max(rates.max_red),
        max_general_flashes_per_second: rates.max_general,
        max_red_flashes_per_second: rates.max_red,
        dangerous_seconds: rates.dangerous_intervals,
        patterns,
        is_safe,
        compliance: String::from(if is_safe { COMPLIANT } else { NON_COMPLIANT }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(timestamp: f64, width: u32, height: u32, value: u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[value, value, value, 255]);
        }
        Frame::new(timestamp, width, height, data)
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let pipeline = AnalysisPipeline::with_defaults();
        assert_eq!(
            pipeline.analyze(Vec::new()),
            Err(AnalysisError::EmptyFrameSequence)
        );
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let pipeline = AnalysisPipeline::with_defaults();
        let frame = Frame::new(0.0, 0, 100, Vec::new());
        assert!(matches!(
            pipeline.analyze(vec![frame]),
            Err(AnalysisError::InvalidFrameGeometry { index: 0, .. })
        ));
    }

    #[test]
    fn inconsistent_dimensions_are_rejected() {
        let pipeline = AnalysisPipeline::with_defaults();
        let frames = vec![solid_frame(0.0, 16, 16, 0), solid_frame(0.1, 16, 8, 0)];
        assert!(matches!(
            pipeline.analyze(frames),
            Err(AnalysisError::InvalidFrameGeometry { index: 1, .. })
        ));
    }

    #[test]
    fn buffer_length_mismatch_is_rejected() {
        let pipeline = AnalysisPipeline::with_defaults();
        let frame = Frame::new(0.0, 16, 16, vec![0; 10]);
        assert!(matches!(
            pipeline.analyze(vec![frame]),
            Err(AnalysisError::InvalidFrameGeometry { .. })
        ));
    }

    #[test]
    fn backwards_timestamp_is_rejected() {
        let pipeline = AnalysisPipeline::with_defaults();
        let frames = vec![solid_frame(1.0, 16, 16, 0), solid_frame(0.5, 16, 16, 0)];
        assert_eq!(
            pipeline.analyze(frames),
            Err(AnalysisError::NonMonotonicTimestamp {
                index: 1,
                timestamp: 0.5,
                previous: 1.0
            })
        );
    }

    #[test]
    fn equal_timestamps_are_accepted() {
        let pipeline = AnalysisPipeline::with_defaults();
        let frames = vec![solid_frame(1.0, 16, 16, 50), solid_frame(1.0, 16, 16, 50)];
        assert!(pipeline.analyze(frames).is_ok());
    }

    #[test]
    fn static_clip_is_safe_with_exact_luminance_statistics() {
        let pipeline = AnalysisPipeline::with_defaults();
        let frames: Vec<Frame> = (0..5)
            .map(|i| solid_frame(i as f64 * 0.1, 32, 32, 40 + 10 * i as u8))
            .collect();

        let report = pipeline.analyze(frames).expect("valid sequence");
        assert!(report.is_safe);
        assert_eq!(report.compliance, COMPLIANT);
        assert_eq!(report.flash_count, 0);
        assert_eq!(report.luminance_data.len(), 5);
        assert!((report.avg_luminance - 60.0).abs() < 1e-9);
        assert!((report.min_luminance - 40.0).abs() < 1e-9);
        assert!((report.max_luminance - 80.0).abs() < 1e-9);
        assert!((report.duration - 0.4).abs() < 1e-9);
    }

    #[test]
    fn verdict_truth_table() {
        // Unsafe iff either per-kind peak exceeds the limit or a persistent
        // pattern exists; all eight combinations.
        for general_over in [false, true] {
            for red_over in [false, true] {
                for pattern in [false, true] {
                    let max_general = if general_over { 4 } else { 3 };
                    let max_red = if red_over { 5 } else { 2 };
                    let expected = !(general_over || red_over || pattern);
                    assert_eq!(
                        verdict(max_general, max_red, pattern, 3),
                        expected,
                        "general_over={general_over} red_over={red_over} pattern={pattern}"
                    );
                }
            }
        }
    }
}
