//! Handles into the structures owning events and the contract those owners fulfil.
//!
//! An event never owns its song, track, part or playback note. It only keeps
//! their handles, set and cleared by the owners themselves.
use crate::event::args::Position;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SongId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TrackId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PartId(pub usize);

/// Handle to the playback note built from a note on/off pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MidiNoteId(pub usize);

/// Owner side of the event back-references.
pub trait Container {
    /// Resolve a position within `song` to ticks, `None` if it can't be resolved.
    fn position_ticks(&self, song: SongId, position: &Position) -> Option<i64>;

    /// Flag `part` for a re-flush.
    fn mark_part_needs_update(&mut self, part: PartId);

    /// Propagate a new pitch to a playback note.
    fn set_note_pitch(&mut self, note: MidiNoteId, pitch: u8);
}

/// Container for events living on their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl Container for Detached {
    fn position_ticks(&self, _song: SongId, position: &Position) -> Option<i64> {
        log::debug!("no song to resolve {position:?}");
        None
    }

    fn mark_part_needs_update(&mut self, _part: PartId) {}

    fn set_note_pitch(&mut self, _note: MidiNoteId, _pitch: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_resolves_nothing() {
        let detached = Detached;
        assert_eq!(
            detached.position_ticks(SongId(0), &Position::Millis(1000.0)),
            None
        );
    }
}
