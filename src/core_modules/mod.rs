pub mod flash_pairer;
pub mod frame;
pub mod metrics_extractor;
pub mod pattern_detector;
pub mod pixel;
pub mod rate_analyzer;
pub mod transition_detector;
pub mod utils;
pub mod zone_grid;
