use crate::event::args::{EventArgs, RawArg, RawFields};
use crate::event::event_type::{
    CONTROL_CHANGE, END_OF_TRACK, NOTE_OFF, NOTE_ON, PROGRAM_CHANGE, TEMPO, TIME_SIGNATURE,
};
use crate::event::identity::{EventCounter, EVENT_COUNTER};
use crate::event::midi_event::MidiEvent;
use crate::note::NoteResolver;
use crate::MidiEventError;

/// Builds events sharing an identity counter and a note resolver.
#[derive(Debug, Clone, Copy)]
pub struct EventFactory<'a> {
    counter: &'a EventCounter,
    resolver: NoteResolver,
}

impl Default for EventFactory<'static> {
    fn default() -> Self {
        Self::with_resolver(NoteResolver::default())
    }
}

impl EventFactory<'static> {
    /// Factory on the process wide counter.
    pub fn with_resolver(resolver: NoteResolver) -> Self {
        Self {
            counter: &EVENT_COUNTER,
            resolver,
        }
    }
}

impl<'a> EventFactory<'a> {
    pub const fn new(counter: &'a EventCounter, resolver: NoteResolver) -> Self {
        Self { counter, resolver }
    }

    pub const fn resolver(&self) -> &NoteResolver {
        &self.resolver
    }

    /// Build an event from `[ticks, status, data1?, data2?, channel?]`,
    /// given as separate arguments or wrapped in a list.
    pub fn create(&self, args: &[RawArg]) -> Result<MidiEvent, MidiEventError> {
        let args = EventArgs::from_raw(args)?;
        self.build(args)
    }

    pub fn build(&self, args: EventArgs) -> Result<MidiEvent, MidiEventError> {
        MidiEvent::from_args(args, self.counter, self.resolver)
    }

    pub fn decode(&self, fields: RawFields) -> Result<MidiEvent, MidiEventError> {
        MidiEvent::decode(fields, self.counter, self.resolver)
    }

    /// Copy of `event` with a fresh identity, detached from song, track and part.
    pub fn duplicate(&self, event: &MidiEvent) -> MidiEvent {
        event.duplicate_with(self.counter)
    }

    pub fn note_on(
        &self,
        ticks: i64,
        pitch: u8,
        velocity: u8,
        channel: u8,
    ) -> Result<MidiEvent, MidiEventError> {
        let status = channel_status(NOTE_ON, channel)?;
        self.decode(
            RawFields::new(ticks, status)
                .with_data1(f64::from(pitch))
                .with_data2(f64::from(velocity)),
        )
    }

    pub fn note_off(&self, ticks: i64, pitch: u8, channel: u8) -> Result<MidiEvent, MidiEventError> {
        let status = channel_status(NOTE_OFF, channel)?;
        self.decode(
            RawFields::new(ticks, status)
                .with_data1(f64::from(pitch))
                .with_data2(0.0),
        )
    }

    pub fn control_change(
        &self,
        ticks: i64,
        controller: u8,
        value: u8,
        channel: u8,
    ) -> Result<MidiEvent, MidiEventError> {
        let status = channel_status(CONTROL_CHANGE, channel)?;
        self.decode(
            RawFields::new(ticks, status)
                .with_data1(f64::from(controller))
                .with_data2(f64::from(value)),
        )
    }

    pub fn program_change(
        &self,
        ticks: i64,
        program: u8,
        channel: u8,
    ) -> Result<MidiEvent, MidiEventError> {
        let status = channel_status(PROGRAM_CHANGE, channel)?;
        self.decode(RawFields::new(ticks, status).with_data1(f64::from(program)))
    }

    pub fn tempo(&self, ticks: i64, bpm: f64) -> Result<MidiEvent, MidiEventError> {
        self.decode(RawFields::new(ticks, TEMPO).with_data1(bpm))
    }

    pub fn time_signature(
        &self,
        ticks: i64,
        nominator: u8,
        denominator: u8,
    ) -> Result<MidiEvent, MidiEventError> {
        self.decode(
            RawFields::new(ticks, TIME_SIGNATURE)
                .with_data1(f64::from(nominator))
                .with_data2(f64::from(denominator)),
        )
    }

    pub fn end_of_track(&self, ticks: i64) -> Result<MidiEvent, MidiEventError> {
        self.decode(RawFields::new(ticks, END_OF_TRACK))
    }
}

/// Status byte of a channel voice command for a 1-based channel.
fn channel_status(command: u8, channel: u8) -> Result<u8, MidiEventError> {
    if (1..=16).contains(&channel) {
        Ok(command | (channel - 1))
    } else {
        Err(MidiEventError::InvalidArguments(format!(
            "channel {channel} is not within 1..=16"
        )))
    }
}
