use serde::Serialize;

use crate::error::DetectError;

/// Pitch classes in semitone order, starting from A.
const PITCH_CLASSES: [&str; 12] = [
    "A", "A#/Bb", "B", "C", "C#/Db", "D", "D#/Eb", "E", "F", "F#/Gb", "G", "G#/Ab",
];

/// Key index of A4, the 440 Hz tuning reference.
const REFERENCE_KEY: i32 = 69;
const REFERENCE_FREQ: f64 = 440.0;

/// Lowest piano key (A0). Octave numbers count up from here.
const BASE_KEY: i32 = 21;

/// Keys accepted in a note table: the MIDI note range, 8.2 Hz to 12.5 kHz.
const MIN_KEY: i32 = 0;
const MAX_KEY: i32 = 127;

/// Equal-tempered frequency of a key index.
pub fn key_frequency(key: i32) -> f64 {
    REFERENCE_FREQ * 2f64.powf((key - REFERENCE_KEY) as f64 / 12.0)
}

/// Display name such as `A[4]` or `C#/Db[3]`.
pub fn note_name(key: i32) -> String {
    let offset = key - BASE_KEY;
    let class = PITCH_CLASSES[offset.rem_euclid(12) as usize];
    format!("{}[{}]", class, offset.div_euclid(12))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoteSpec {
    pub key: i32,
    pub name: String,
    pub frequency: f64,
}

impl NoteSpec {
    pub fn new(key: i32) -> Self {
        Self {
            key,
            name: note_name(key),
            frequency: key_frequency(key),
        }
    }
}

/// Every note in an inclusive key range, ordered by key.
#[derive(Clone, Debug)]
pub struct NoteTable {
    notes: Vec<NoteSpec>,
}

impl NoteTable {
    pub fn new(low: i32, high: i32) -> Result<Self, DetectError> {
        if low > high {
            return Err(DetectError::InvalidKeyRange { low, high });
        }
        for key in [low, high] {
            if !(MIN_KEY..=MAX_KEY).contains(&key) {
                return Err(DetectError::KeyOutOfRange {
                    key,
                    min: MIN_KEY,
                    max: MAX_KEY,
                });
            }
        }
        Ok(Self {
            notes: (low..=high).map(NoteSpec::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn get(&self, index: usize) -> Option<&NoteSpec> {
        self.notes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteSpec> {
        self.notes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_inclusive_range() {
        let table = NoteTable::new(60, 83).unwrap();
        assert_eq!(table.len(), 24);
        assert_eq!(table.get(0).unwrap().key, 60);
        assert_eq!(table.get(23).unwrap().key, 83);
        assert!(table.get(24).is_none());
    }

    #[test]
    fn single_key_range() {
        let table = NoteTable::new(69, 69).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().name, "A[4]");
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(
            NoteTable::new(70, 69).unwrap_err(),
            DetectError::InvalidKeyRange { low: 70, high: 69 }
        );
    }

    #[test]
    fn keys_outside_midi_range_are_rejected() {
        assert_eq!(
            NoteTable::new(i32::MIN, i32::MIN).unwrap_err(),
            DetectError::KeyOutOfRange {
                key: i32::MIN,
                min: 0,
                max: 127
            }
        );
        assert!(matches!(
            NoteTable::new(-1, 60),
            Err(DetectError::KeyOutOfRange { key: -1, .. })
        ));
        assert!(matches!(
            NoteTable::new(100, i32::MAX),
            Err(DetectError::KeyOutOfRange { key: i32::MAX, .. })
        ));
        assert_eq!(NoteTable::new(MIN_KEY, MAX_KEY).unwrap().len(), 128);
    }

    #[test]
    fn frequencies_strictly_increase() {
        let table = NoteTable::new(21, 108).unwrap();
        let freqs: Vec<f64> = table.iter().map(|n| n.frequency).collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn reference_frequencies() {
        assert_eq!(key_frequency(69), 440.0);
        assert!((key_frequency(81) - 880.0).abs() < 1e-9);
        assert!((key_frequency(57) - 220.0).abs() < 1e-9);
        assert!((key_frequency(60) - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn pitch_classes_cycle_in_order() {
        let table = NoteTable::new(21, 56).unwrap();
        let classes: Vec<&str> = table
            .iter()
            .map(|n| n.name.split('[').next().unwrap())
            .collect();
        for (i, class) in classes.iter().enumerate() {
            assert_eq!(*class, PITCH_CLASSES[i % 12]);
        }
        let mut distinct = classes.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 12);
    }

    #[test]
    fn octave_changes_at_a() {
        assert_eq!(note_name(21), "A[0]");
        assert_eq!(note_name(68), "G#/Ab[3]");
        assert_eq!(note_name(69), "A[4]");
        assert_eq!(note_name(72), "C[4]");
        assert_eq!(note_name(20), "G#/Ab[-1]");
    }
}
