use anyhow::{Context, Result, bail};
use foreground_detector::DetectorConfig;
use foreground_detector::sequence::{SequenceConfig, process_sequence};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: foreground_detector <input_dir> <base_name> <start_frame> <end_frame> [output_dir]";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("foreground_detector=info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 4 {
        println!("{USAGE}");
        return Ok(());
    }

    let (sequence, detector_config) = parse_args(&args, |key| env::var(key).ok())?;
    info!(
        input = %sequence.input_dir.display(),
        frames = ?sequence.indices(),
        parallel = detector_config.parallel,
        "Processing sequence"
    );

    let report = process_sequence(&sequence, detector_config)
        .await
        .with_context(|| format!("processing {}", sequence.input_dir.display()))?;

    info!(
        frames = report.frames_processed,
        masks_written = report.masks_written,
        mean_foreground_ratio = %format!("{:.4}", report.mean_foreground_ratio()),
        peak_foreground_ratio = %format!("{:.4}", report.peak_foreground_ratio),
        peak_frame = ?report.peak_frame,
        "Processing complete"
    );
    Ok(())
}

/// Positional arguments plus `FD_*` environment overrides.
fn parse_args(
    args: &[String],
    lookup_env: impl Fn(&str) -> Option<String>,
) -> Result<(SequenceConfig, DetectorConfig)> {
    let [input_dir, base_name, start, end, rest @ ..] = args else {
        bail!("{USAGE}");
    };

    let mut sequence = SequenceConfig {
        input_dir: PathBuf::from(input_dir),
        base_name: base_name.clone(),
        start_frame: start
            .parse()
            .with_context(|| format!("invalid start frame `{start}`"))?,
        end_frame: end
            .parse()
            .with_context(|| format!("invalid end frame `{end}`"))?,
        output_dir: rest.first().map(PathBuf::from),
        ..Default::default()
    };
    if sequence.start_frame > sequence.end_frame {
        bail!(
            "start frame {} is after end frame {}",
            sequence.start_frame,
            sequence.end_frame
        );
    }

    if let Some(width) = lookup_env("FD_PAD_WIDTH") {
        sequence.pad_width = Some(
            width
                .parse()
                .with_context(|| format!("invalid FD_PAD_WIDTH `{width}`"))?,
        );
    }
    if let Some(extension) = lookup_env("FD_INPUT_EXT") {
        sequence.input_extension = extension;
    }
    if let Some(extension) = lookup_env("FD_OUTPUT_EXT") {
        sequence.output_extension = extension;
    }

    let detector_config = DetectorConfig {
        parallel: !lookup_env("FD_SEQUENTIAL").is_some_and(|v| v == "1" || v == "true"),
        ..Default::default()
    };

    Ok((sequence, detector_config))
}
