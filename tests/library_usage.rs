//! Integration tests for midievent library usage.
//!
//! These tests verify that the library can be used as a dependency
//! from external projects.

use midievent::{
    raw_args, sort_events, Container, Detached, EventCounter, EventFactory, LifecycleState,
    MidiEvent, MidiEventError, MidiNoteId, NoteResolver, PartId, PitchInput, Position, RawArg,
    SongId,
};
use std::collections::HashSet;

/// Test that all major types are accessible from the library.
#[test]
fn test_types_accessible() {
    // This test verifies that the public API types compile and are usable.
    // If any re-export is missing, this test will fail to compile.

    fn _assert_types() {
        let _: fn(&[RawArg]) -> Result<MidiEvent, MidiEventError> = MidiEvent::new;
        let _: &EventCounter = &midievent::EVENT_COUNTER;
        let _: NoteResolver = NoteResolver::default();
    }
}

/// Minimal song owning one part and one playback note.
struct Song {
    bar_ticks: i64,
    dirty_parts: HashSet<PartId>,
    note_pitch: Option<u8>,
}

impl Container for Song {
    fn position_ticks(&self, _song: SongId, position: &Position) -> Option<i64> {
        match position {
            Position::BarsBeats { bar, beat, .. } => {
                Some((i64::from(*bar) - 1) * self.bar_ticks + (i64::from(*beat) - 1) * 960)
            }
            _ => None,
        }
    }

    fn mark_part_needs_update(&mut self, part: PartId) {
        self.dirty_parts.insert(part);
    }

    fn set_note_pitch(&mut self, _note: MidiNoteId, pitch: u8) {
        self.note_pitch = Some(pitch);
    }
}

#[test]
fn test_decode_from_json() {
    let args: Vec<RawArg> = serde_json::from_str("[[960, 147, 60, 100]]").unwrap();
    let event = MidiEvent::new(&args).expect("Failed to decode event");
    assert_eq!(event.ticks(), 960);
    assert_eq!(event.channel(), 4);
    assert_eq!(event.command(), Some(0x90));
    assert_eq!(event.note_name(), Some("C4"));
    assert_eq!(event.sort_index(), 960 + 0x90);
}

#[test]
fn test_event_lifecycle_in_song() {
    let counter = EventCounter::new();
    let factory = EventFactory::new(&counter, NoteResolver::default());
    let mut song = Song {
        bar_ticks: 3840,
        dirty_parts: HashSet::new(),
        note_pitch: None,
    };

    let mut event = factory.create(&raw_args![0, 0x90, 60, 100]).unwrap();
    event.attach_song(SongId(0));
    event.attach_part(PartId(1));
    event.attach_midi_note(MidiNoteId(0));
    assert_eq!(event.state(), LifecycleState::New);

    let position = Position::from_raw(&raw_args!["barsbeats", 2, 3]).unwrap();
    event.move_to(&position, &mut song).unwrap();
    assert_eq!(event.ticks(), 3840 + 1920);
    assert_eq!(event.state(), LifecycleState::Moved);

    let semi = PitchInput::from_raw(&raw_args!["semi", 5].into()).unwrap();
    event.transpose(semi, &mut song).unwrap();
    assert_eq!(event.state(), LifecycleState::Transposed);
    assert_eq!(song.note_pitch, Some(65));
    assert!(song.dirty_parts.contains(&PartId(1)));

    let copy = factory.duplicate(&event);
    assert_eq!(copy.part(), None);
    assert_eq!(copy.song(), None);
    assert_eq!(copy.note_name(), Some("F4"));

    event.reset(&mut song);
    assert_eq!(event.state(), LifecycleState::Removed);
    assert_eq!(event.channel(), 0);
}

#[test]
fn test_sorting_decoded_events() {
    let counter = EventCounter::new();
    let factory = EventFactory::new(&counter, NoteResolver::default());
    let mut events: Vec<MidiEvent> = [
        raw_args![480, 0x90, 62, 100],
        raw_args![480, 0x90, 60, 0],
        raw_args![0, 0x90, 60, 100],
        raw_args![0, 0x51, 120],
    ]
    .iter()
    .map(|args| factory.create(args).unwrap())
    .collect();
    sort_events(&mut events);
    let types: Vec<u8> = events.iter().map(MidiEvent::event_type).collect();
    assert_eq!(types, vec![0x51, 0x90, 0x80, 0x90]);
}

#[test]
fn test_errors() {
    let result = MidiEvent::new(&raw_args![0, 0x90, "C4", 100]);
    assert!(matches!(result, Err(MidiEventError::InvalidArguments(_))));

    let mut cc = MidiEvent::new(&raw_args![0, 0xB0, 7, 100]).unwrap();
    let result = cc.transpose(2, &mut Detached);
    assert!(matches!(result, Err(MidiEventError::InvalidOperation(_))));
    assert_eq!(cc.data1(), Some(7));

    let result = cc.move_to(&Position::Millis(250.0), &mut Detached);
    assert!(matches!(result, Err(MidiEventError::UnresolvedPosition(_))));
    assert_eq!(cc.ticks(), 0);
}
