mod audio;
mod cli;
mod config;
mod error;
mod pitch;
mod report;
#[cfg(test)]
mod testutil;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

use audio::signal::AudioSignal;
use cli::Cli;
use config::Config;
use pitch::bank::WindowPolicy;
use pitch::Detector;
use report::OutputFormat;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut cfg = match config::find_config(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            // A file named on the command line must load; a discovered one may be skipped.
            Err(err) if cli.config.is_some() => return Err(err),
            Err(err) => {
                log::warn!("{:#}", err);
                Config::default()
            }
        },
        None => Config::default(),
    };
    apply_overrides(&cli, &mut cfg);

    log::info!("Input: {}", cli.input.display());
    log::debug!("Settings: {:?}", cfg.detector);

    // 1. Decode and validate
    let pcm = audio::decode::decode_wav(&cli.input)?;
    let signal = AudioSignal::from_pcm(&pcm)?;
    log::info!(
        "Signal: {} samples at {}Hz ({:.2}s)",
        signal.samples().len(),
        signal.sample_rate(),
        signal.duration()
    );

    // 2. Build the filter bank for this sample rate
    let detector = Detector::new(&cfg.detector, signal.sample_rate())?;

    let pb = if cfg.output.progress {
        let pb = ProgressBar::new(detector.window_count(&signal) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} windows ({eta} remaining)")?
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    // 3. Scan and report
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cfg.output.diagnostic {
        let windows = detector.window_powers(&signal, &pb)?;
        report::write_diagnostic(&mut out, detector.table(), &windows)?;
    } else {
        match cfg.output.format {
            OutputFormat::Json => {
                let sequence = detector.detect(&signal, &pb)?;
                report::write_json(&mut out, sequence.notes(detector.table()))?;
            }
            OutputFormat::Text if cfg.detector.parallel => {
                let sequence = detector.detect(&signal, &pb)?;
                for name in sequence.render(detector.table()) {
                    report::write_name(&mut out, &name)?;
                }
            }
            OutputFormat::Text => {
                detector.stream_notes::<anyhow::Error, _>(&signal, &pb, |note| {
                    report::write_name(&mut out, &note.name)?;
                    out.flush()?;
                    Ok(())
                })?;
            }
        }
    }

    pb.finish_and_clear();
    out.flush()?;
    Ok(())
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(cli: &Cli, cfg: &mut Config) {
    let detector = &mut cfg.detector;
    if let Some(low) = cli.low_key {
        detector.low_key = low;
    }
    if let Some(high) = cli.high_key {
        detector.high_key = high;
    }
    if let Some(ms) = cli.window_ms {
        detector.window = WindowPolicy::Fixed { ms };
    }
    if let Some(cycles) = cli.cycles {
        detector.window = WindowPolicy::Cycles { cycles };
    }
    if let Some(threshold) = cli.threshold {
        detector.threshold = threshold;
    }
    if let Some(window_fn) = cli.window_fn {
        detector.window_fn = window_fn;
    }
    if cli.sequential {
        detector.parallel = false;
    }

    let output = &mut cfg.output;
    if let Some(format) = cli.format {
        output.format = format;
    }
    output.diagnostic |= cli.diagnostic;
    output.progress |= cli.progress;
}
