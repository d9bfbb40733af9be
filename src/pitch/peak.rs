use crate::error::DetectError;

/// Per-window decision: the loudest note's table index, or silence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteEvent {
    Note(usize),
    Rest,
}

#[derive(Clone, Copy, Debug)]
pub struct PeakPicker {
    threshold: f64,
}

impl PeakPicker {
    /// `threshold` is in filter output units and depends on the window length,
    /// window function and sample scaling.
    pub fn new(threshold: f64) -> Result<Self, DetectError> {
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(DetectError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    /// Loudest entry if it strictly exceeds the threshold. Ties go to the
    /// lowest index.
    pub fn pick(&self, powers: &[f64]) -> NoteEvent {
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in powers.iter().enumerate() {
            match best {
                Some((_, max)) if p <= max => {}
                _ if p.is_nan() => {}
                _ => best = Some((i, p)),
            }
        }
        match best {
            Some((i, max)) if max > self.threshold => NoteEvent::Note(i),
            _ => NoteEvent::Rest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> PeakPicker {
        PeakPicker::new(50.0).unwrap()
    }

    #[test]
    fn picks_loudest_above_threshold() {
        assert_eq!(picker().pick(&[3.0, 120.0, 80.0]), NoteEvent::Note(1));
    }

    #[test]
    fn quiet_window_is_a_rest() {
        assert_eq!(picker().pick(&[3.0, 49.0, 10.0]), NoteEvent::Rest);
    }

    #[test]
    fn threshold_must_be_exceeded() {
        assert_eq!(picker().pick(&[50.0]), NoteEvent::Rest);
        assert_eq!(picker().pick(&[50.001]), NoteEvent::Note(0));
    }

    #[test]
    fn ties_go_to_first_note() {
        assert_eq!(picker().pick(&[1.0, 60.0, 60.0, 2.0]), NoteEvent::Note(1));
        assert_eq!(picker().pick(&[70.0, 70.0]), NoteEvent::Note(0));
    }

    #[test]
    fn empty_vector_is_a_rest() {
        assert_eq!(picker().pick(&[]), NoteEvent::Rest);
    }

    #[test]
    fn nan_entries_are_ignored() {
        assert_eq!(picker().pick(&[f64::NAN, 90.0]), NoteEvent::Note(1));
    }

    #[test]
    fn invalid_thresholds() {
        assert!(PeakPicker::new(-1.0).is_err());
        assert!(PeakPicker::new(f64::INFINITY).is_err());
        assert!(PeakPicker::new(0.0).is_ok());
    }
}
