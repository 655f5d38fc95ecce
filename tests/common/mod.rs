#![allow(dead_code)]

use image::{GrayImage, Luma};

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("foreground_detector=debug")
        .with_test_writer()
        .try_init();
}

/// A 2x2 frame from its four intensities in row-major order.
pub fn quad(values: [u8; 4]) -> GrayImage {
    GrayImage::from_fn(2, 2, |x, y| Luma([values[(y * 2 + x) as usize]]))
}

/// A frame of `width` x `height` filled with `background` and a bright square of
/// side `size` whose top-left corner sits at `(left, top)`.
pub fn square_on_background(
    width: u32,
    height: u32,
    background: u8,
    left: u32,
    top: u32,
    size: u32,
) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let inside = x >= left && x < left + size && y >= top && y < top + size;
        Luma([if inside { background.saturating_add(120) } else { background }])
    })
}
