// THEORY:
// Per-frame metric extraction has no cross-frame dependency, so it is the
// one stage worth parallelizing: a dispatcher task fans decoded frames out
// to a pool of worker tasks, each worker reduces its frames to
// `FrameMetrics`, and the results are collected and re-sorted by timestamp
// before the inherently sequential stages (transitions, pairing, rates) run
// on a single task. Completion order does not matter because results are
// keyed by timestamp; each worker owns a disjoint frame and writes to a
// disjoint result slot, so no locking is involved.
//
// The worker pool is per-run: workers need the run's zone grid, which is
// only known once the first frame's dimensions are, and they wind down when
// the task channel closes at the end of the run.

use crate::core_modules::frame::Frame;
use crate::core_modules::metrics_extractor::{self, FrameMetrics};
use crate::core_modules::zone_grid::ZoneGrid;
use crate::error::AnalysisError;
use crate::pipeline::{self, AnalyzerConfig, ComplianceReport};
use futures::future;
use log::debug;
use tokio::sync::{mpsc, oneshot};

struct FrameTask {
    frame: Frame,
    result_sender: oneshot::Sender<FrameMetrics>,
}

/// A pipeline front end that extracts per-frame metrics on a bounded pool
/// of worker tasks, then runs the sequential stages on the sorted results.
/// Produces reports identical to `AnalysisPipeline::analyze`.
pub struct ParallelPipeline {
    config: AnalyzerConfig,
    worker_count: usize,
}

impl ParallelPipeline {
    /// One worker per available CPU.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_workers(config, num_cpus::get().max(1))
    }

    pub fn with_workers(config: AnalyzerConfig, worker_count: usize) -> Self {
        Self {
            config,
            worker_count: worker_count.max(1),
        }
    }

    pub async fn analyze(&self, frames: Vec<Frame>) -> Result<ComplianceReport, AnalysisError> {
        pipeline::validate_frames(&frames)?;

        let grid = ZoneGrid::new(
            frames[0].width,
            frames[0].height,
            self.config.zone_max_width,
            self.config.zone_max_height,
        );
        debug!(
            "parallel extraction: {} frames across {} workers",
            frames.len(),
            self.worker_count
        );

        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<FrameTask>();

        // Dispatcher: fans tasks out to the workers round-robin.
        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..self.worker_count)
            .map(|_| mpsc::unbounded_channel::<FrameTask>())
            .unzip();
        tokio::spawn(async move {
            let mut worker_index = 0;
            while let Some(task) = task_receiver.recv().await {
                let _ = worker_senders[worker_index].send(task);
                worker_index = (worker_index + 1) % worker_senders.len();
            }
        });

        // Workers: each owns a clone of the grid and config and reduces the
        // frames it receives. Pure per-frame work; no shared state.
        for mut worker_receiver in worker_receivers {
            let grid = grid.clone();
            let config = self.config.clone();
            tokio::spawn(async move {
                while let Some(task) = worker_receiver.recv().await {
                    let metrics = metrics_extractor::extract_metrics(&task.frame, &grid, &config);
                    let _ = task.result_sender.send(metrics);
                }
            });
        }

        let mut result_receivers = Vec::with_capacity(frames.len());
        for frame in frames {
            let (result_sender, result_receiver) = oneshot::channel();
            let _ = task_sender.send(FrameTask {
                frame,
                result_sender,
            });
            result_receivers.push(result_receiver);
        }
        // Closing the task channel lets the dispatcher and workers wind down
        // once the run's frames are drained.
        drop(task_sender);

        let mut metrics: Vec<FrameMetrics> = future::join_all(result_receivers)
            .await
            .into_iter()
            .map(|result| result.expect("metric extraction worker dropped its result channel"))
            .collect();
        metrics.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        Ok(pipeline::analyze_metrics(metrics, &self.config))
    }
}
