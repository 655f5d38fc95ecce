// THEORY:
// This file is the entry point for the `foreground_detector` library crate. The
// public surface is the `ForegroundDetector` facade and its `DetectorConfig`;
// the Gaussian mixture machinery in `core_modules` is public for inspection and
// testing but callers never need to drive it directly.
//
// Layers, lowest first:
// 1.  `core_modules`: the per-pixel Gaussian mixture model and the scene grid.
// 2.  `detector`: frame validation and the accept/output facade.
// 3.  `parallel_pipeline`: an async actor around one detector.
// 4.  `sequence`: numbered image files in, mask images out.

pub mod config;
pub mod core_modules;
pub mod detector;
pub mod error;
pub mod parallel_pipeline;
pub mod sequence;

pub use config::DetectorConfig;
pub use detector::{Classification, ForegroundDetector, ForegroundMask};
pub use error::{DetectorError, Result};
pub use parallel_pipeline::DetectorHandle;
