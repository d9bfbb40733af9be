use clap::Parser;
use std::path::PathBuf;

use crate::audio::window::WindowFunction;
use crate::report::OutputFormat;

/// Flags left unset fall back to the config file, then to the built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "findnotes", about = "Detect the notes played in a mono 16-bit WAV recording")]
pub struct Cli {
    /// Input WAV file (mono, 16-bit)
    pub input: PathBuf,

    /// Config file (default: ./findnotes.toml or ~/.config/findnotes/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lowest key index to scan (69 = A4)
    #[arg(long)]
    pub low_key: Option<i32>,

    /// Highest key index to scan, inclusive
    #[arg(long)]
    pub high_key: Option<i32>,

    /// Shared window length in milliseconds
    #[arg(long, conflicts_with = "cycles")]
    pub window_ms: Option<f64>,

    /// Size each filter's window to this many cycles of its note instead
    #[arg(long)]
    pub cycles: Option<f64>,

    /// Minimum filter power for a window to count as a note
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Window function applied to the filter coefficients
    #[arg(long, value_enum)]
    pub window_fn: Option<WindowFunction>,

    /// Print per-window filter powers instead of notes
    #[arg(long)]
    pub diagnostic: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Scan on one thread and print notes as they are found
    #[arg(long)]
    pub sequential: bool,

    /// Show a progress bar on stderr
    #[arg(long)]
    pub progress: bool,
}
