// THEORY:
// The `SceneModel` is the owner and operator of the whole grid of `PixelModel`s,
// in the same way a grid manager owns its per-region analyzers. It is not an
// analyzer itself: it hands every pixel its new intensity, collects the verdicts
// into the `ForegroundMask`, and keeps nothing else.
//
// Pixels never read each other's state. The grid is one flat row-major buffer, so
// a frame can be cut into horizontal bands of rows and each band updated on its
// own worker with no locking: a band owns its pixel models and the matching mask
// cells exclusively.

use crate::config::DetectorConfig;
use crate::core_modules::mask::{Classification, ForegroundMask};
use crate::core_modules::pixel_model::PixelModel;
use image::{GrayImage, Luma};
use rayon::prelude::*;

/// Bands per available core; more bands than cores keeps the pool busy when
/// some rows are cheaper than others.
const BANDS_PER_CORE: usize = 4;

pub struct SceneModel {
    width: u32,
    height: u32,
    config: DetectorConfig,
    pixels: Vec<PixelModel>,
    mask: ForegroundMask,
    /// Number of pixels handed to one worker in the parallel pass.
    band_len: usize,
    frames_processed: u64,
}

impl SceneModel {
    /// Creates an empty model for frames of `width` x `height` pixels.
    ///
    /// The config is taken as given; `ForegroundDetector::new` is the place
    /// where it gets validated.
    pub fn new(width: u32, height: u32, config: DetectorConfig) -> Self {
        let num_pixels = width as usize * height as usize;
        let num_bands = (num_cpus::get() * BANDS_PER_CORE).max(1);
        let rows_per_band = (height as usize).div_ceil(num_bands).max(1);
        Self {
            width,
            height,
            config,
            pixels: vec![PixelModel::new(); num_pixels],
            mask: ForegroundMask::new(width, height),
            band_len: (rows_per_band * width as usize).max(1),
            frames_processed: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<&PixelModel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize)
    }

    /// Updates every pixel model with its intensity from `frame` (row-major,
    /// exactly `width * height` bytes) and rewrites the mask.
    pub fn update(&mut self, frame: &[u8]) {
        debug_assert_eq!(frame.len(), self.pixels.len());
        let config = &self.config;
        let cells = self.mask.cells_mut();

        if config.parallel {
            let band_len = self.band_len;
            self.pixels
                .par_chunks_mut(band_len)
                .zip(cells.par_chunks_mut(band_len))
                .zip(frame.par_chunks(band_len))
                .for_each(|((pixels, cells), values)| update_band(pixels, cells, values, config));
        } else {
            update_band(&mut self.pixels, cells, frame, config);
        }

        self.frames_processed += 1;
    }

    /// The mask computed by the most recent `update`; all background before the
    /// first one.
    pub fn mask(&self) -> &ForegroundMask {
        &self.mask
    }

    /// The mean of each pixel's most confident component as an image.
    pub fn background_estimate(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            let intensity = self
                .pixel(x, y)
                .and_then(PixelModel::background_intensity)
                .unwrap_or(0);
            Luma([intensity])
        })
    }
}

fn update_band(
    pixels: &mut [PixelModel],
    cells: &mut [Classification],
    values: &[u8],
    config: &DetectorConfig,
) {
    for ((model, cell), &value) in pixels.iter_mut().zip(cells.iter_mut()).zip(values) {
        model.update(value, config);
        *cell = model.classify(value, config);
    }
}
