//! Frame sequence glue: numbered image files in, mask images out.
//!
//! Nothing here is part of the background model. It decodes `<base><index>.<ext>`
//! files (optionally zero padded), converts them to grayscale, pushes them through
//! a `DetectorHandle` in order, and writes each mask under the same numbering.

use crate::config::DetectorConfig;
use crate::detector::ForegroundMask;
use crate::error::{DetectorError, Result};
use crate::parallel_pipeline::DetectorHandle;
use futures::stream::{self, StreamExt};
use image::{GrayImage, ImageError};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Frames decoded ahead of the one being processed.
const PREFETCH_FRAMES: usize = 4;

/// Where a numbered frame sequence lives and where its masks go.
#[derive(Debug, Clone)]
pub struct SequenceConfig {
    pub input_dir: PathBuf,
    pub base_name: String,
    pub start_frame: u32,
    pub end_frame: u32,
    /// Zero-pad frame numbers to this many digits; `None` writes them as is.
    pub pad_width: Option<usize>,
    pub input_extension: String,
    /// Masks are only written when an output directory is set.
    pub output_dir: Option<PathBuf>,
    pub output_extension: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            base_name: "image".to_string(),
            start_frame: 1,
            end_frame: 500,
            pad_width: None,
            input_extension: "jpg".to_string(),
            output_dir: None,
            output_extension: "jpg".to_string(),
        }
    }
}

impl SequenceConfig {
    pub fn indices(&self) -> RangeInclusive<u32> {
        self.start_frame..=self.end_frame
    }

    fn file_name(&self, index: u32, extension: &str) -> String {
        match self.pad_width {
            Some(width) => format!("{}{:0width$}.{}", self.base_name, index, extension),
            None => format!("{}{}.{}", self.base_name, index, extension),
        }
    }

    pub fn input_path(&self, index: u32) -> PathBuf {
        self.input_dir
            .join(self.file_name(index, &self.input_extension))
    }

    pub fn output_path(&self, index: u32) -> Option<PathBuf> {
        self.output_dir
            .as_ref()
            .map(|dir| dir.join(self.file_name(index, &self.output_extension)))
    }
}

/// Decodes an image file and converts it to 8-bit grayscale.
pub fn load_grayscale_frame(path: &Path) -> Result<GrayImage> {
    let image = image::open(path).map_err(|e| match e {
        ImageError::IoError(source) => DetectorError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => DetectorError::Image(other),
    })?;
    Ok(image.to_luma8())
}

/// Writes a mask as a black/white image; the format follows the extension.
pub fn save_mask(mask: &ForegroundMask, path: &Path) -> Result<()> {
    mask.to_image().save(path)?;
    Ok(())
}

/// Totals for one pass over a sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceReport {
    pub frames_processed: u64,
    pub masks_written: u64,
    pub peak_foreground_ratio: f64,
    pub peak_frame: Option<u32>,
    foreground_ratio_sum: f64,
}

impl SequenceReport {
    fn record(&mut self, index: u32, mask: &ForegroundMask) {
        let ratio = mask.foreground_ratio();
        self.frames_processed += 1;
        self.foreground_ratio_sum += ratio;
        if self.peak_frame.is_none() || ratio > self.peak_foreground_ratio {
            self.peak_foreground_ratio = ratio;
            self.peak_frame = Some(index);
        }
    }

    pub fn mean_foreground_ratio(&self) -> f64 {
        if self.frames_processed == 0 {
            return 0.0;
        }
        self.foreground_ratio_sum / self.frames_processed as f64
    }
}

/// Runs every frame of the sequence through a fresh detector sized after the
/// first frame. Stops at the first frame that cannot be read.
pub async fn process_sequence(
    sequence: &SequenceConfig,
    detector_config: DetectorConfig,
) -> Result<SequenceReport> {
    if let Some(dir) = &sequence.output_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| DetectorError::Io {
                path: dir.clone(),
                source,
            })?;
    }

    let mut frames = stream::iter(sequence.indices())
        .map(|index| {
            let path = sequence.input_path(index);
            async move {
                let frame = tokio::task::spawn_blocking(move || load_grayscale_frame(&path)).await??;
                Ok::<_, DetectorError>((index, frame))
            }
        })
        .buffered(PREFETCH_FRAMES);

    let Some(first) = frames.next().await else {
        return Err(DetectorError::InvalidInput(format!(
            "frame range {}..={} is empty",
            sequence.start_frame, sequence.end_frame
        )));
    };
    let (first_index, first_frame) = first?;
    info!(
        width = first_frame.width(),
        height = first_frame.height(),
        first_index,
        "Sequence opened"
    );

    let detector = DetectorHandle::spawn(first_frame.width(), first_frame.height(), detector_config)?;
    let mut report = SequenceReport::default();
    process_frame(&detector, sequence, first_index, first_frame, &mut report).await?;

    while let Some(next) = frames.next().await {
        let (index, frame) = next?;
        process_frame(&detector, sequence, index, frame, &mut report).await?;
    }

    detector.shutdown().await?;
    info!(
        frames = report.frames_processed,
        mean_foreground_ratio = report.mean_foreground_ratio(),
        "Sequence finished"
    );
    Ok(report)
}

async fn process_frame(
    detector: &DetectorHandle,
    sequence: &SequenceConfig,
    index: u32,
    frame: GrayImage,
    report: &mut SequenceReport,
) -> Result<()> {
    let mask = detector.process(frame).await?;
    report.record(index, &mask);
    debug!(index, foreground_ratio = mask.foreground_ratio(), "Mask ready");

    if let Some(path) = sequence.output_path(index) {
        tokio::task::spawn_blocking(move || save_mask(&mask, &path)).await??;
        report.masks_written += 1;
    }
    Ok(())
}
