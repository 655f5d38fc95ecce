use image::{GrayImage, Luma};

/// Intensity written for foreground pixels when a mask is rendered as an image.
pub const FOREGROUND_VALUE: u8 = 255;
/// Intensity written for background pixels when a mask is rendered as an image.
pub const BACKGROUND_VALUE: u8 = 0;

/// The per-pixel decision of the background model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    #[default]
    Background,
    Foreground,
}

impl Classification {
    pub fn is_foreground(self) -> bool {
        matches!(self, Classification::Foreground)
    }

    pub fn to_intensity(self) -> u8 {
        match self {
            Classification::Background => BACKGROUND_VALUE,
            Classification::Foreground => FOREGROUND_VALUE,
        }
    }
}

/// Row-major grid of classifications with the same dimensions as the frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundMask {
    width: u32,
    height: u32,
    cells: Vec<Classification>,
}

impl ForegroundMask {
    /// An all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Classification::Background; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Classification> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn cells(&self) -> &[Classification] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Classification] {
        &mut self.cells
    }

    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_foreground()).count()
    }

    /// Share of the frame classified as foreground, in `[0, 1]`.
    pub fn foreground_ratio(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.foreground_count() as f64 / self.cells.len() as f64
    }

    /// Renders the mask as a black/white image (`0` background, `255` foreground).
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            let cell = self.cells[y as usize * self.width as usize + x as usize];
            Luma([cell.to_intensity()])
        })
    }
}
