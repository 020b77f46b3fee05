//! Low-level DSP primitives used by the block pipeline.
//!
//! These components are allocation-free and realtime-safe. They stay focused
//! on the per-sample math so the pipeline can layer on block orchestration
//! and parameter control.

/// Four-stage nonlinear feedback low-pass (ladder) filter.
pub mod ladder;

pub use ladder::LadderFilter;
