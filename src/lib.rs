//! Midievent - typed MIDI event decoding and mutation
//!
//! This library provides:
//! - Decoding of raw `(ticks, status, data1, data2, channel)` tuples into typed events
//! - Note attributes (name, octave, frequency) for note events
//! - Mutations (transpose, set pitch, move) keeping derived fields in sync
//!
//! # Example
//!
//! ```
//! use midievent::{raw_args, Detached, LifecycleState, MidiEvent};
//!
//! let mut event = MidiEvent::new(&raw_args![0, 0x90, 60, 100]).unwrap();
//! assert_eq!(event.note_name(), Some("C4"));
//!
//! event.transpose(4, &mut Detached).unwrap();
//! assert_eq!(event.note_name(), Some("E4"));
//! assert_eq!(event.state(), LifecycleState::Transposed);
//! ```

pub mod container;
pub mod error;
pub mod event;
pub mod note;

// Re-export main types for convenience
pub use container::{Container, Detached, MidiNoteId, PartId, SongId, TrackId};
pub use error::MidiEventError;
pub use event::{
    args::{EventArgs, ExternalMessage, PitchInput, Position, RawArg, RawFields, ResetScope},
    factory::EventFactory,
    identity::{EventCounter, EventId, EVENT_COUNTER},
    midi_event::{sort_events, MidiEvent},
    state::LifecycleState,
};
pub use note::{NoteInfo, NoteNaming, NoteResolver};
