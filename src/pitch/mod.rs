//! Note detection: a bank of Goertzel filters swept over fixed windows,
//! a per-window peak decision and run-length coalescing.

pub mod bank;
pub mod coalesce;
pub mod goertzel;
pub mod notes;
pub mod peak;
pub mod scan;

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};

use crate::audio::signal::AudioSignal;
use crate::audio::window::WindowFunction;
use crate::error::DetectError;
use bank::{FilterBank, WindowPolicy};
use coalesce::{coalesce, Coalescer, NoteSequence};
use notes::{NoteSpec, NoteTable};
use peak::{NoteEvent, PeakPicker};
use scan::{scan_powers, WindowScanner};

/// Tunables for one detection run. Defaults are the canonical detector:
/// keys 69..=88, 50 ms shared window, Blackman coefficients, threshold 50.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub low_key: i32,
    pub high_key: i32,
    pub window: WindowPolicy,
    pub window_fn: WindowFunction,
    pub threshold: f64,
    pub parallel: bool,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            low_key: 69,
            high_key: 88,
            window: WindowPolicy::default(),
            window_fn: WindowFunction::Blackman,
            threshold: 50.0,
            parallel: true,
        }
    }
}

/// Filter powers for one scanned window.
#[derive(Clone, Debug)]
pub struct WindowPowers {
    /// Start of the window in seconds.
    pub time: f64,
    pub powers: Vec<f64>,
}

pub struct Detector {
    table: NoteTable,
    bank: FilterBank,
    picker: PeakPicker,
    sample_rate: u32,
    parallel: bool,
}

impl Detector {
    /// Builds the note table and filter bank for audio at `sample_rate`.
    /// All configuration errors surface here, before any audio is scanned.
    pub fn new(settings: &DetectorSettings, sample_rate: u32) -> Result<Self, DetectError> {
        if sample_rate == 0 {
            return Err(DetectError::InvalidSampleRate);
        }
        let table = NoteTable::new(settings.low_key, settings.high_key)?;
        let picker = PeakPicker::new(settings.threshold)?;
        let bank = FilterBank::new(&table, sample_rate, settings.window, settings.window_fn)?;

        let shortest = bank.filters().iter().map(|f| f.window_len()).min().unwrap_or(0);
        log::info!(
            "Filter bank: {} notes ({} to {}), window {}..{} samples, {:?} window, threshold {}",
            table.len(),
            settings.low_key,
            settings.high_key,
            shortest,
            bank.stride(),
            settings.window_fn,
            settings.threshold
        );

        Ok(Self {
            table,
            bank,
            picker,
            sample_rate,
            parallel: settings.parallel,
        })
    }

    pub fn table(&self) -> &NoteTable {
        &self.table
    }

    /// Number of full windows the scan will visit.
    pub fn window_count(&self, signal: &AudioSignal) -> usize {
        signal.samples().len() / self.bank.stride().max(1)
    }

    fn check_rate(&self, signal: &AudioSignal) -> Result<(), DetectError> {
        if signal.sample_rate() != self.sample_rate {
            return Err(DetectError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: signal.sample_rate(),
            });
        }
        Ok(())
    }

    /// Raw filter powers per window, for diagnostics.
    pub fn window_powers(
        &self,
        signal: &AudioSignal,
        progress: &ProgressBar,
    ) -> Result<Vec<WindowPowers>, DetectError> {
        self.check_rate(signal)?;
        let stride = self.bank.stride();
        let powers = scan_powers(&self.bank, signal.samples(), self.parallel, progress)?;
        Ok(powers
            .into_iter()
            .enumerate()
            .map(|(i, powers)| WindowPowers {
                time: (i * stride) as f64 / self.sample_rate as f64,
                powers,
            })
            .collect())
    }

    /// Runs the whole pipeline and returns the coalesced sequence.
    pub fn detect(
        &self,
        signal: &AudioSignal,
        progress: &ProgressBar,
    ) -> Result<NoteSequence, DetectError> {
        if !self.parallel {
            return self.stream_notes::<DetectError, _>(signal, progress, |_| Ok(()));
        }
        self.check_rate(signal)?;
        let powers = scan_powers(&self.bank, signal.samples(), true, progress)?;
        let sequence = coalesce(powers.iter().map(|p| self.picker.pick(p)));
        log::info!(
            "Scanned {} windows, {} coalesced events, {} notes",
            powers.len(),
            sequence.events().len(),
            sequence.notes(&self.table).count()
        );
        Ok(sequence)
    }

    /// Sequential scan that hands each newly recognised note to `emit` as
    /// soon as its first window is seen.
    pub fn stream_notes<E, F>(
        &self,
        signal: &AudioSignal,
        progress: &ProgressBar,
        mut emit: F,
    ) -> Result<NoteSequence, E>
    where
        E: From<DetectError>,
        F: FnMut(&NoteSpec) -> Result<(), E>,
    {
        self.check_rate(signal)?;
        let mut coalescer = Coalescer::default();
        let mut sequence = NoteSequence::default();
        let mut windows = 0;

        for window in WindowScanner::new(signal.samples(), self.bank.stride())? {
            let powers = self.bank.respond_all(window.samples)?;
            progress.inc(1);
            windows += 1;

            let Some(event) = coalescer.push(self.picker.pick(&powers)) else {
                continue;
            };
            sequence.push_coalesced(event);
            if let NoteEvent::Note(i) = event {
                if let Some(note) = self.table.get(i) {
                    log::debug!(
                        "window {} ({:.2}s): {}",
                        window.index,
                        window.start as f64 / self.sample_rate as f64,
                        note.name
                    );
                    emit(note)?;
                }
            }
        }

        log::info!(
            "Scanned {} windows, {} coalesced events, {} notes",
            windows,
            sequence.events().len(),
            sequence.notes(&self.table).count()
        );
        Ok(sequence)
    }
}
