use anyhow::Result;
use serde::Deserialize;
use std::io::Write;

use crate::pitch::notes::{NoteSpec, NoteTable};
use crate::pitch::WindowPowers;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One note name per line
    #[default]
    Text,
    /// JSON array of {key, name, frequency}
    Json,
}

pub fn write_name<W: Write>(out: &mut W, name: &str) -> Result<()> {
    writeln!(out, "{}", name)?;
    Ok(())
}

pub fn write_json<'a, W, I>(out: &mut W, notes: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a NoteSpec>,
{
    let notes: Vec<&NoteSpec> = notes.into_iter().collect();
    serde_json::to_writer_pretty(&mut *out, &notes)?;
    writeln!(out)?;
    Ok(())
}

/// Rounds to two decimals and prints the shortest form, so `3.5` rather
/// than `3.50` and `0.0` for zero.
fn rounded(x: f64) -> String {
    format!("{:?}", (x * 100.0).round() / 100.0)
}

/// Per window: start time, then each key and its power on an indented line.
pub fn write_diagnostic<W: Write>(
    out: &mut W,
    table: &NoteTable,
    windows: &[WindowPowers],
) -> Result<()> {
    for window in windows {
        writeln!(out, "{}", rounded(window.time))?;
        for (note, power) in table.iter().zip(&window.powers) {
            writeln!(out, "  {} {}", note.key, rounded(*power))?;
        }
    }
    Ok(())
}
