// THEORY:
// The `detector` module is the top-level API of the engine. It wraps the
// `SceneModel` behind two calls, `accept` and `output`, so the code that iterates
// frames (files, a capture device, an async producer) never touches the grid.
// It is also the boundary where frames are checked: everything below it assumes
// a well-formed frame of the constructed size.

use crate::config::DetectorConfig;
use crate::core_modules::scene_model::SceneModel;
use crate::error::{DetectorError, Result};
use image::GrayImage;
use tracing::{debug, info, warn};

// Re-export the types a caller needs to read the output.
pub use crate::core_modules::mask::{Classification, ForegroundMask};

/// Foreground/background separation over a sequence of grayscale frames.
pub struct ForegroundDetector {
    scene_model: SceneModel,
}

impl ForegroundDetector {
    pub fn new(width: u32, height: u32, config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        if width == 0 || height == 0 {
            return Err(DetectorError::InvalidInput(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        info!(width, height, ?config, "Creating foreground detector");
        Ok(Self {
            scene_model: SceneModel::new(width, height, config),
        })
    }

    /// Builds a detector sized after `frame` and feeds it that frame.
    pub fn from_first_frame(frame: &GrayImage, config: DetectorConfig) -> Result<Self> {
        let mut detector = Self::new(frame.width(), frame.height(), config)?;
        detector.accept(frame)?;
        Ok(detector)
    }

    pub fn width(&self) -> u32 {
        self.scene_model.width()
    }

    pub fn height(&self) -> u32 {
        self.scene_model.height()
    }

    /// Feeds the next frame. Frames must arrive in temporal order.
    pub fn accept(&mut self, frame: &GrayImage) -> Result<()> {
        let (actual_width, actual_height) = frame.dimensions();
        if actual_width != self.width() || actual_height != self.height() {
            warn!(actual_width, actual_height, "Rejected frame with wrong dimensions");
            return Err(DetectorError::DimensionMismatch {
                expected_width: self.width(),
                expected_height: self.height(),
                actual_width,
                actual_height,
            });
        }
        self.apply(frame.as_raw())
    }

    /// Feeds a row-major buffer of one byte per pixel.
    pub fn accept_raw(&mut self, frame: &[u8]) -> Result<()> {
        let expected = self.width() as usize * self.height() as usize;
        if frame.len() != expected {
            warn!(len = frame.len(), expected, "Rejected raw frame with wrong length");
            return Err(DetectorError::InvalidInput(format!(
                "raw frame has {} bytes, expected {expected}",
                frame.len()
            )));
        }
        self.apply(frame)
    }

    fn apply(&mut self, frame: &[u8]) -> Result<()> {
        self.scene_model.update(frame);
        debug!(
            frame = self.scene_model.frames_processed(),
            foreground = self.scene_model.mask().foreground_count(),
            "Frame processed"
        );
        Ok(())
    }

    /// The mask of the most recently accepted frame.
    pub fn output(&self) -> &ForegroundMask {
        self.scene_model.mask()
    }

    pub fn frames_processed(&self) -> u64 {
        self.scene_model.frames_processed()
    }

    pub fn background_estimate(&self) -> GrayImage {
        self.scene_model.background_estimate()
    }

    pub fn scene_model(&self) -> &SceneModel {
        &self.scene_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_frame_of_other_size() {
        let mut detector = ForegroundDetector::new(4, 3, DetectorConfig::default()).unwrap();
        let err = detector.accept(&GrayImage::new(3, 4)).unwrap_err();

        assert!(matches!(
            err,
            DetectorError::DimensionMismatch {
                expected_width: 4,
                expected_height: 3,
                actual_width: 3,
                actual_height: 4,
            }
        ));
        assert_eq!(detector.frames_processed(), 0);
    }

    #[test]
    fn rejects_raw_buffer_of_wrong_length() {
        let mut detector = ForegroundDetector::new(2, 2, DetectorConfig::default()).unwrap();
        assert!(matches!(
            detector.accept_raw(&[0, 0, 0]),
            Err(DetectorError::InvalidInput(_))
        ));
        assert!(detector.accept_raw(&[0, 0, 0, 0]).is_ok());
    }

    #[test]
    fn rejects_empty_dimensions_and_bad_config() {
        assert!(matches!(
            ForegroundDetector::new(0, 5, DetectorConfig::default()),
            Err(DetectorError::InvalidInput(_))
        ));
        let config = DetectorConfig {
            alpha: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            ForegroundDetector::new(5, 5, config),
            Err(DetectorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn first_frame_is_background() {
        let frame = GrayImage::from_pixel(5, 4, image::Luma([77]));
        let detector = ForegroundDetector::from_first_frame(&frame, DetectorConfig::default()).unwrap();

        assert_eq!(detector.frames_processed(), 1);
        assert_eq!(detector.output().foreground_count(), 0);
        assert_eq!(detector.output().to_image().dimensions(), (5, 4));
    }
}
