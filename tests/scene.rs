mod common;

use common::{init_logging, quad, square_on_background};
use foreground_detector::{Classification, DetectorConfig, ForegroundDetector};

const CONSTANT: u8 = 50;

#[test]
fn constant_pixels_settle_while_alternating_pixels_flag_every_jump() {
    init_logging();
    let mut detector = ForegroundDetector::new(2, 2, DetectorConfig::default()).unwrap();

    for t in 0..20 {
        let swing = if t % 2 == 0 { 0 } else { 255 };
        detector
            .accept(&quad([CONSTANT, CONSTANT, swing, swing]))
            .unwrap();
        let mask = detector.output();

        assert_eq!(mask.get(0, 0), Some(Classification::Background));
        assert_eq!(mask.get(1, 0), Some(Classification::Background));
        let expected = if swing == 255 {
            Classification::Foreground
        } else {
            Classification::Background
        };
        assert_eq!(mask.get(0, 1), Some(expected), "frame {t}");
        assert_eq!(mask.get(1, 1), Some(expected), "frame {t}");
    }
}

#[test]
fn pixels_cycling_through_more_levels_than_slots_stay_mostly_foreground() {
    let mut detector = ForegroundDetector::new(2, 2, DetectorConfig::default()).unwrap();
    let levels = [0u8, 85, 170, 255];
    let mut foreground_frames = [0usize; 4];

    for t in 0..40 {
        let level = levels[t % levels.len()];
        detector
            .accept(&quad([CONSTANT, CONSTANT, level, level]))
            .unwrap();
        for (i, cell) in detector.output().cells().iter().enumerate() {
            if cell.is_foreground() {
                foreground_frames[i] += 1;
            }
        }
    }

    assert_eq!(foreground_frames[0], 0);
    assert_eq!(foreground_frames[1], 0);
    assert!(foreground_frames[2] > 20, "{foreground_frames:?}");
    assert_eq!(foreground_frames[2], foreground_frames[3]);
}

#[test]
fn one_pixel_history_does_not_change_another_pixel() {
    let mut steady = ForegroundDetector::new(2, 2, DetectorConfig::default()).unwrap();
    let mut disturbed = ForegroundDetector::new(2, 2, DetectorConfig::default()).unwrap();

    for t in 0..30u32 {
        let drift = (t * 7 % 60) as u8;
        let noisy = if t % 3 == 0 { 250 } else { 5 };
        steady.accept(&quad([drift, 90, 140, 200])).unwrap();
        disturbed.accept(&quad([drift, 90, 140, noisy])).unwrap();

        let a = steady.output().cells();
        let b = disturbed.output().cells();
        assert_eq!(a[..3], b[..3], "frame {t}");
    }
}

#[test]
fn moving_square_is_segmented_from_static_background() {
    init_logging();
    let (width, height, size) = (48, 32, 6);
    let mut detector = ForegroundDetector::new(width, height, DetectorConfig::default()).unwrap();

    for _ in 0..30 {
        detector
            .accept(&square_on_background(width, height, 60, 0, 0, 0))
            .unwrap();
    }
    assert_eq!(detector.output().foreground_count(), 0);

    for step in 0..5 {
        let left = 4 + step * 8;
        detector
            .accept(&square_on_background(width, height, 60, left, 10, size))
            .unwrap();

        let mask = detector.output();
        assert_eq!(mask.foreground_count(), (size * size) as usize, "step {step}");
        assert_eq!(mask.get(left, 10), Some(Classification::Foreground));
        assert_eq!(mask.get(left + size, 10), Some(Classification::Background));
    }

    let estimate = detector.background_estimate();
    assert!(estimate.pixels().all(|p| p[0] == 60));
}

#[test]
fn sequential_and_parallel_detectors_agree_on_a_scene() {
    let (width, height) = (40, 25);
    let mut parallel = ForegroundDetector::new(width, height, DetectorConfig::default()).unwrap();
    let mut sequential = ForegroundDetector::new(
        width,
        height,
        DetectorConfig {
            parallel: false,
            ..Default::default()
        },
    )
    .unwrap();

    for step in 0..25 {
        let frame = square_on_background(width, height, 30, step, step % 15, 7);
        parallel.accept(&frame).unwrap();
        sequential.accept(&frame).unwrap();
        assert_eq!(parallel.output(), sequential.output(), "frame {step}");
    }
}
