use indicatif::ProgressBar;
use rayon::prelude::*;
use std::slice::ChunksExact;

use super::bank::FilterBank;
use crate::error::DetectError;

/// One block of samples handed to the filter bank.
#[derive(Clone, Copy, Debug)]
pub struct Window<'a> {
    pub index: usize,
    /// Offset of the first sample in the signal.
    pub start: usize,
    pub samples: &'a [f64],
}

/// Non-overlapping, back-to-back windows over a signal.
///
/// Window `i` covers `samples[i * len..(i + 1) * len]`; a trailing partial
/// window is dropped.
pub struct WindowScanner<'a> {
    chunks: ChunksExact<'a, f64>,
    len: usize,
    index: usize,
}

impl<'a> WindowScanner<'a> {
    pub fn new(samples: &'a [f64], len: usize) -> Result<Self, DetectError> {
        if len == 0 {
            return Err(DetectError::InvalidWindowLength { samples: len });
        }
        Ok(Self {
            chunks: samples.chunks_exact(len),
            len,
            index: 0,
        })
    }
}

impl<'a> Iterator for WindowScanner<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let samples = self.chunks.next()?;
        let window = Window {
            index: self.index,
            start: self.index * self.len,
            samples,
        };
        self.index += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for WindowScanner<'_> {}

/// Power vectors for every full window, in window order.
///
/// With `parallel` set the windows are spread over the rayon pool; the indexed
/// collect keeps the output in signal order.
pub fn scan_powers(
    bank: &FilterBank,
    samples: &[f64],
    parallel: bool,
    progress: &ProgressBar,
) -> Result<Vec<Vec<f64>>, DetectError> {
    let stride = bank.stride();
    if stride == 0 {
        return Err(DetectError::InvalidWindowLength { samples: stride });
    }

    if parallel {
        samples
            .par_chunks_exact(stride)
            .map(|window| {
                let powers = bank.respond_all(window);
                progress.inc(1);
                powers
            })
            .collect()
    } else {
        WindowScanner::new(samples, stride)?
            .map(|window| {
                let powers = bank.respond_all(window.samples);
                progress.inc(1);
                powers
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::window::WindowFunction;
    use crate::pitch::bank::WindowPolicy;
    use crate::pitch::notes::NoteTable;
    use crate::testutil::sine;

    #[test]
    fn windows_are_contiguous_and_drop_the_tail() {
        let samples: Vec<f64> = (0..23).map(|i| i as f64).collect();
        let windows: Vec<Window> = WindowScanner::new(&samples, 5).unwrap().collect();
        assert_eq!(windows.len(), 4);
        for (i, w) in windows.iter().enumerate() {
            assert_eq!(w.index, i);
            assert_eq!(w.start, i * 5);
            assert_eq!(w.samples, &samples[i * 5..(i + 1) * 5]);
        }
    }

    #[test]
    fn exact_multiple_keeps_last_window() {
        let samples = vec![0.0; 20];
        let scanner = WindowScanner::new(&samples, 5).unwrap();
        assert_eq!(scanner.len(), 4);
    }

    #[test]
    fn short_signal_yields_nothing() {
        let samples = vec![0.0; 4];
        assert_eq!(WindowScanner::new(&samples, 5).unwrap().count(), 0);
        assert_eq!(WindowScanner::new(&[], 5).unwrap().count(), 0);
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(WindowScanner::new(&[0.0; 8], 0).is_err());
    }

    #[test]
    fn parallel_and_sequential_scans_agree() {
        let table = NoteTable::new(60, 80).unwrap();
        let bank =
            FilterBank::new(&table, 8000, WindowPolicy::default(), WindowFunction::Blackman)
                .unwrap();
        let mut samples = sine(440.0, 0.4, 8000, 4000);
        samples.extend(sine(660.0, 0.4, 8000, 4000));
        samples.extend(vec![0.0; 1234]);

        let hidden = ProgressBar::hidden();
        let sequential = scan_powers(&bank, &samples, false, &hidden).unwrap();
        let parallel = scan_powers(&bank, &samples, true, &hidden).unwrap();

        assert_eq!(sequential.len(), samples.len() / 400);
        assert_eq!(sequential, parallel);
    }
}
