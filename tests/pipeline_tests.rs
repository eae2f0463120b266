// End-to-end coverage of the analyzer over synthetic decoded clips: real
// pixel buffers in, one ComplianceReport out. Frame geometry is 512x256 so
// a full-frame change covers more than one guideline minimum zone.

use flashcheck::pipeline::PatternSeverity;
use flashcheck::{AnalysisPipeline, AnalyzerConfig, Frame, ParallelPipeline};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 256;

fn solid_frame(timestamp: f64, rgba: [u8; 4]) -> Frame {
    let mut data = Vec::with_capacity((WIDTH * HEIGHT * 4) as usize);
    for _ in 0..WIDTH * HEIGHT {
        data.extend_from_slice(&rgba);
    }
    Frame::new(timestamp, WIDTH, HEIGHT, data)
}

fn gray(timestamp: f64, value: u8) -> Frame {
    solid_frame(timestamp, [value, value, value, 255])
}

/// Alternates two frame builders at 10 frames per second.
fn alternating_clip(frame_count: usize, even: impl Fn(f64) -> Frame, odd: impl Fn(f64) -> Frame) -> Vec<Frame> {
    (0..frame_count)
        .map(|i| {
            let t = i as f64 * 0.1;
            if i % 2 == 0 { even(t) } else { odd(t) }
        })
        .collect()
}

/// 4-pixel black/white stripes: a dense high-contrast pattern at the
/// detector's sampling stride.
fn striped_frame(timestamp: f64) -> Frame {
    let mut data = Vec::with_capacity((WIDTH * HEIGHT * 4) as usize);
    for _ in 0..HEIGHT {
        for x in 0..WIDTH {
            let v = if (x / 4) % 2 == 0 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Frame::new(timestamp, WIDTH, HEIGHT, data)
}

#[test]
fn rapid_luminance_strobe_is_unsafe() {
    // Relative luminance alternates 0.40 / 0.60 every frame: six full
    // flash cycles in 1.2 seconds, five of them starting inside one second.
    let frames = alternating_clip(13, |t| gray(t, 102), |t| gray(t, 153));
    let report = AnalysisPipeline::with_defaults()
        .analyze(frames)
        .expect("valid sequence");

    assert_eq!(report.general_flash_count, 6);
    assert_eq!(report.red_flash_count, 0);
    assert_eq!(report.flash_count, 6);
    assert_eq!(report.max_general_flashes_per_second, 5);
    assert_eq!(report.max_flashes_per_second, 5);
    assert!(!report.dangerous_seconds.is_empty());
    assert_eq!(report.dangerous_seconds[0].start, 0.0);
    assert_eq!(report.dangerous_seconds[0].general_count, 5);
    assert!(!report.is_safe);
    assert!(report.compliance.contains("non-compliant"));
}

#[test]
fn slow_luminance_changes_are_safe() {
    // Two flash cycles over half a second: well under the limit.
    let frames = alternating_clip(5, |t| gray(t, 102), |t| gray(t, 153));
    let report = AnalysisPipeline::with_defaults()
        .analyze(frames)
        .expect("valid sequence");

    assert_eq!(report.general_flash_count, 2);
    assert_eq!(report.max_general_flashes_per_second, 2);
    assert!(report.dangerous_seconds.is_empty());
    assert!(report.is_safe);
    assert_eq!(report.compliance, "WCAG 2.0 compliant");
}

#[test]
fn bright_baseline_strobe_is_excluded() {
    // Relative luminance alternates 0.85 / 0.95: the darker side never
    // drops below the 0.80 exclusion ceiling, so no flashes register.
    let frames = alternating_clip(13, |t| gray(t, 217), |t| gray(t, 243));
    let report = AnalysisPipeline::with_defaults()
        .analyze(frames)
        .expect("valid sequence");

    assert_eq!(report.flash_count, 0);
    assert!(report.is_safe);
}

#[test]
fn saturated_red_strobe_is_unsafe() {
    // Full-screen saturated red toggling against gray: red-coverage swings
    // of 1.0 with a luminance swing too small to register generally.
    let frames = alternating_clip(9, |t| gray(t, 100), |t| solid_frame(t, [255, 0, 0, 255]));
    let report = AnalysisPipeline::with_defaults()
        .analyze(frames)
        .expect("valid sequence");

    assert_eq!(report.general_flash_count, 0);
    assert_eq!(report.red_flash_count, 4);
    assert_eq!(report.max_red_flashes_per_second, 4);
    assert!(!report.is_safe);
    assert!(!report.dangerous_seconds.is_empty());
    assert_eq!(report.dangerous_seconds[0].red_count, 4);
}

#[test]
fn sustained_stripe_pattern_is_unsafe_without_any_flashing() {
    let frames: Vec<Frame> = (0..8).map(|i| striped_frame(i as f64 * 0.1)).collect();
    let report = AnalysisPipeline::with_defaults()
        .analyze(frames)
        .expect("valid sequence");

    assert_eq!(report.flash_count, 0);
    assert!(!report.is_safe);

    let persistent: Vec<_> = report
        .patterns
        .iter()
        .filter(|p| p.duration.is_some())
        .collect();
    assert_eq!(persistent.len(), 1);
    assert_eq!(persistent[0].severity, PatternSeverity::High);
    assert_eq!(persistent[0].time, 0.0);
    assert!((persistent[0].duration.unwrap() - 0.7).abs() < 1e-9);

    // The per-frame flags are reported alongside the persistent run.
    let static_flags = report.patterns.len() - persistent.len();
    assert_eq!(static_flags, 8);
}

#[test]
fn brief_stripe_pattern_is_safe() {
    // Two patterned frames (0.1s) then plain gray: under the persistence minimum.
    let frames: Vec<Frame> = (0..6)
        .map(|i| {
            let t = i as f64 * 0.1;
            if i < 2 { striped_frame(t) } else { gray(t, 128) }
        })
        .collect();
    let report = AnalysisPipeline::with_defaults()
        .analyze(frames)
        .expect("valid sequence");

    assert!(report.is_safe);
    assert!(report.patterns.iter().all(|p| p.duration.is_none()));
}

#[test]
fn analysis_is_deterministic() {
    let frames = alternating_clip(13, |t| gray(t, 102), |t| gray(t, 153));
    let pipeline = AnalysisPipeline::with_defaults();
    let first = pipeline.analyze(frames.clone()).expect("valid sequence");
    let second = pipeline.analyze(frames).expect("valid sequence");
    assert_eq!(first, second);
}

#[tokio::test]
async fn parallel_front_end_is_equivalent_on_a_strobing_clip() {
    let frames = alternating_clip(13, |t| gray(t, 102), |t| gray(t, 153));
    let sequential = AnalysisPipeline::with_defaults()
        .analyze(frames.clone())
        .expect("valid sequence");
    let parallel = ParallelPipeline::with_workers(AnalyzerConfig::default(), 4)
        .analyze(frames)
        .await
        .expect("valid sequence");
    assert_eq!(sequential, parallel);
}

#[test]
fn report_serializes_with_the_presentation_contract_field_names() {
    let frames = alternating_clip(13, |t| gray(t, 102), |t| gray(t, 153));
    let report = AnalysisPipeline::with_defaults()
        .analyze(frames)
        .expect("valid sequence");

    let json = serde_json::to_value(&report).expect("serializable report");
    assert!(json.get("luminanceData").is_some());
    assert!(json.get("dangerousSeconds").is_some());
    assert!(json.get("maxFlashesPerSecond").is_some());
    assert!(json.get("generalFlashCount").is_some());
    assert!(json.get("isSafe").is_some());
    assert!(json.get("compliance").is_some());
    assert_eq!(
        json["dangerousSeconds"][0]["generalCount"],
        serde_json::json!(5)
    );
}

#[test]
fn gap_in_the_sampled_timeline_is_not_a_flash() {
    // The luminance swing spans a 0.8s gap, beyond the comparison tolerance.
    let frames = vec![gray(0.0, 102), gray(0.8, 153), gray(1.6, 102)];
    let report = AnalysisPipeline::with_defaults()
        .analyze(frames)
        .expect("valid sequence");
    assert_eq!(report.flash_count, 0);
    assert!(report.is_safe);
}
