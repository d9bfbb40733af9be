use super::notes::{NoteSpec, NoteTable};
use super::peak::NoteEvent;

/// Streaming run-length reducer: passes an event through only when it
/// differs from the one before it.
#[derive(Clone, Debug, Default)]
pub struct Coalescer {
    last: Option<NoteEvent>,
}

impl Coalescer {
    pub fn push(&mut self, event: NoteEvent) -> Option<NoteEvent> {
        if self.last == Some(event) {
            return None;
        }
        self.last = Some(event);
        Some(event)
    }
}

/// Coalesced per-window decisions. Rests are kept so that a note repeated
/// after a gap still counts as a new note.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteSequence {
    events: Vec<NoteEvent>,
}

impl NoteSequence {
    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    /// Appends an event that has already been through a [`Coalescer`].
    pub(super) fn push_coalesced(&mut self, event: NoteEvent) {
        self.events.push(event);
    }

    /// Non-rest events mapped through the note table, in order.
    pub fn notes<'a>(&'a self, table: &'a NoteTable) -> impl Iterator<Item = &'a NoteSpec> + 'a {
        self.events.iter().filter_map(move |event| match *event {
            NoteEvent::Note(i) => table.get(i),
            NoteEvent::Rest => None,
        })
    }

    pub fn render(&self, table: &NoteTable) -> Vec<String> {
        self.notes(table).map(|n| n.name.clone()).collect()
    }
}

impl FromIterator<NoteEvent> for NoteSequence {
    fn from_iter<I: IntoIterator<Item = NoteEvent>>(iter: I) -> Self {
        let mut coalescer = Coalescer::default();
        Self {
            events: iter.into_iter().filter_map(|e| coalescer.push(e)).collect(),
        }
    }
}

pub fn coalesce<I: IntoIterator<Item = NoteEvent>>(events: I) -> NoteSequence {
    events.into_iter().collect()
}
