// THEORY:
// This file is the main entry point for the `flashcheck` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (decode
// orchestrators and presentation layers).
//
// The primary goal is to export the `AnalysisPipeline` and its associated
// data structures (`AnalyzerConfig`, `ComplianceReport`, `Frame`, the error
// type) as the clean, high-level interface for the whole analyzer. The
// internal stage modules (`core_modules`) remain reachable for callers that
// want individual detectors, but the pipeline is the supported surface.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::frame::Frame;
pub use error::AnalysisError;
pub use parallel_pipeline::ParallelPipeline;
pub use pipeline::{AnalysisPipeline, AnalyzerConfig, ComplianceReport};
