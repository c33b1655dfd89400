use crate::container::{Container, MidiNoteId, PartId, SongId, TrackId};
use crate::event::args::{
    check_ticks, EventArgs, PitchInput, Position, RawArg, RawFields, ResetScope,
};
use crate::event::event_type::{
    command_of, is_channel_voice, is_note, type_name, CHANNEL_PRESSURE, CONTROL_CHANGE,
    END_OF_TRACK, MAX_DATA_BYTE, NOTE_OFF, NOTE_ON, NO_OP, PITCH_BEND, PROGRAM_CHANGE, TEMPO,
    TIME_SIGNATURE,
};
use crate::event::factory::EventFactory;
use crate::event::identity::{EventCounter, EventId, Identity};
use crate::event::state::LifecycleState;
use crate::note::{NoteInfo, NoteResolver, MAX_PITCH, MIN_PITCH};
use crate::MidiEventError;
use serde::Serialize;
use std::cmp::Ordering;

/// One timed MIDI message of a composition.
///
/// The status byte is decoded once at construction. Mutations keep the
/// derived fields (note attributes, sort index) in sync and record what
/// happened in the lifecycle state so containers know what to re-flush.
#[derive(Debug, Serialize)]
pub struct MidiEvent {
    id: EventId,
    event_number: u64,
    ticks: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u8>,
    #[serde(rename = "type")]
    event_type: u8,
    channel: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data1: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data2: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<NoteInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    velocity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nominator: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    denominator: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    controller_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    controller_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    program_number: Option<i32>,
    sort_index: i64,
    muted: bool,
    state: LifecycleState,
    #[serde(skip)]
    resolver: NoteResolver,
    #[serde(skip_serializing_if = "Option::is_none")]
    song: Option<SongId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    track: Option<TrackId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    part: Option<PartId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    midi_note: Option<MidiNoteId>,
}

fn reported(error: MidiEventError) -> MidiEventError {
    log::warn!("{error}");
    error
}

fn clamp_pitch(pitch: i32) -> i32 {
    pitch.clamp(MIN_PITCH, MAX_PITCH)
}

fn data_value(value: Option<f64>, name: &str) -> Result<Option<i32>, MidiEventError> {
    match value {
        None => Ok(None),
        Some(v) if v.is_finite() && v.trunc().abs() <= f64::from(i32::MAX) => {
            Ok(Some(v.trunc() as i32))
        }
        Some(v) => Err(MidiEventError::InvalidArguments(format!(
            "{name} {v} is out of range"
        ))),
    }
}

impl MidiEvent {
    /// Build an event from loose arguments with the process wide counter.
    pub fn new(args: &[RawArg]) -> Result<Self, MidiEventError> {
        EventFactory::default().create(args)
    }

    /// Decode validated fields with the process wide counter.
    pub fn from_fields(fields: RawFields) -> Result<Self, MidiEventError> {
        EventFactory::default().decode(fields)
    }

    pub(crate) fn blank(identity: Identity, resolver: NoteResolver) -> Self {
        Self {
            id: identity.id,
            event_number: identity.event_number,
            ticks: 0,
            status: None,
            event_type: NO_OP,
            channel: 0,
            command: None,
            data1: None,
            data2: None,
            note: None,
            velocity: None,
            bpm: None,
            nominator: None,
            denominator: None,
            controller_type: None,
            controller_value: None,
            program_number: None,
            sort_index: 0,
            muted: false,
            state: LifecycleState::New,
            resolver,
            song: None,
            track: None,
            part: None,
            midi_note: None,
        }
    }

    pub(crate) fn from_args(
        args: EventArgs,
        counter: &EventCounter,
        resolver: NoteResolver,
    ) -> Result<Self, MidiEventError> {
        match args {
            EventArgs::Blank => Ok(Self::blank(counter.next_identity(), resolver)),
            EventArgs::PreParsed(message) => {
                log::info!(
                    "{} with {} byte(s) is decoded by the device layer",
                    message.kind,
                    message.data.len()
                );
                Ok(Self::blank(counter.next_identity(), resolver))
            }
            EventArgs::Fields(fields) => Self::decode(fields, counter, resolver),
        }
    }

    /// Decode the status byte and populate the type specific fields.
    ///
    /// Every field is validated before an identity is taken so a failure
    /// leaves nothing behind.
    pub(crate) fn decode(
        fields: RawFields,
        counter: &EventCounter,
        resolver: NoteResolver,
    ) -> Result<Self, MidiEventError> {
        let status = fields.status;
        let command = command_of(status);
        let (event_type, channel, command) = if is_channel_voice(command) {
            (command, (status & 0xF) + 1, Some(command))
        } else {
            let channel = match data_value(fields.channel, "channel")? {
                None => 1,
                Some(c) => u8::try_from(c).map_err(|_| {
                    MidiEventError::InvalidArguments(format!("channel {c} is out of range"))
                })?,
            };
            (status, channel, None)
        };
        let data1 = data_value(fields.data1, "data1")?;
        let data2 = data_value(fields.data2, "data2")?;
        if is_note(event_type) && data1.is_none() {
            return Err(MidiEventError::InvalidArguments(format!(
                "note event at tick {} has no pitch",
                fields.ticks
            )));
        }
        if event_type == NOTE_ON && data2.is_none() {
            return Err(MidiEventError::InvalidArguments(format!(
                "note on event at tick {} has no velocity",
                fields.ticks
            )));
        }
        let ticks = check_ticks(fields.ticks)?;

        let mut event = Self::blank(counter.next_identity(), resolver);
        event.ticks = ticks;
        event.status = Some(status);
        event.event_type = event_type;
        event.channel = channel;
        event.command = command;

        match event_type {
            NO_OP | END_OF_TRACK => {}
            NOTE_OFF => {
                event.data1 = data1.map(clamp_pitch);
                event.data2 = Some(0);
                event.velocity = Some(0);
                event.derive_note();
            }
            NOTE_ON => {
                event.data1 = data1.map(clamp_pitch);
                event.data2 = data2;
                if data2 == Some(0) {
                    event.event_type = NOTE_OFF;
                }
                event.velocity = data2;
                event.derive_note();
            }
            TEMPO => {
                event.data1 = data1;
                event.bpm = fields.data1;
            }
            TIME_SIGNATURE => {
                event.data1 = data1;
                event.data2 = data2;
                event.nominator = data1;
                event.denominator = data2;
            }
            CONTROL_CHANGE => {
                event.data1 = data1;
                event.data2 = data2;
                event.controller_type = data1;
                event.controller_value = data2;
            }
            PROGRAM_CHANGE => {
                event.data1 = data1;
                event.program_number = data1;
            }
            CHANNEL_PRESSURE | PITCH_BEND => {
                event.data1 = data1;
                event.data2 = data2;
            }
            other => log::warn!("unsupported MIDI event type {other:#04X} at tick {ticks}"),
        }
        event.refresh_sort_index();
        log::debug!("decoded {event}");
        Ok(event)
    }

    /// Copy with a fresh identity from the process wide counter.
    ///
    /// The playback note handle is shared with the source event.
    pub fn duplicate(&self) -> Self {
        EventFactory::default().duplicate(self)
    }

    /// Copy every field except identity, song, track and part, the
    /// playback note handle stays shared.
    pub(crate) fn duplicate_with(&self, counter: &EventCounter) -> Self {
        let identity = counter.next_identity();
        Self {
            id: identity.id,
            event_number: identity.event_number,
            note: self.note.clone(),
            song: None,
            track: None,
            part: None,
            ..*self
        }
    }

    fn derive_note(&mut self) {
        self.note = self.data1.map(|pitch| self.resolver.resolve(pitch));
    }

    fn refresh_sort_index(&mut self) {
        self.sort_index = i64::from(self.event_type) + self.ticks;
    }

    fn note_pitch(&self, operation: &str) -> Result<i32, MidiEventError> {
        if !is_note(self.event_type) {
            return Err(reported(MidiEventError::InvalidOperation(format!(
                "cannot {operation} {self}, not a note event"
            ))));
        }
        self.data1.ok_or_else(|| {
            reported(MidiEventError::InvalidOperation(format!(
                "cannot {operation} {self}, no pitch"
            )))
        })
    }

    fn apply_pitch<C: Container + ?Sized>(&mut self, pitch: i32, container: &mut C) {
        let pitch = clamp_pitch(pitch);
        self.data1 = Some(pitch);
        self.derive_note();
        if let Some(midi_note) = self.midi_note {
            container.set_note_pitch(midi_note, pitch as u8);
        }
    }

    fn changed<C: Container + ?Sized>(&mut self, next: LifecycleState, container: &mut C) {
        self.state = self.state.transition(next);
        self.update(container);
    }

    /// Shift the pitch of a note event, the result is clamped to the MIDI range.
    pub fn transpose<C: Container + ?Sized>(
        &mut self,
        semi: impl Into<PitchInput>,
        container: &mut C,
    ) -> Result<(), MidiEventError> {
        let current = self.note_pitch("transpose")?;
        let pitch = match semi.into() {
            PitchInput::Semitones(semi) => current.saturating_add(semi),
            PitchInput::Hertz(hertz) => {
                let target = self.resolver.frequency(f64::from(current)) + hertz;
                self.resolver.pitch_from_frequency(target).ok_or_else(|| {
                    reported(MidiEventError::InvalidArguments(format!(
                        "cannot transpose {self} by {hertz} Hz"
                    )))
                })?
            }
        };
        self.apply_pitch(pitch, container);
        log::debug!("transposed {self} from pitch {current}");
        self.changed(LifecycleState::Transposed, container);
        Ok(())
    }

    /// Set the absolute pitch of a note event, clamped to the MIDI range.
    pub fn set_pitch<C: Container + ?Sized>(
        &mut self,
        pitch: impl Into<PitchInput>,
        container: &mut C,
    ) -> Result<(), MidiEventError> {
        self.note_pitch("set the pitch of")?;
        let pitch = match pitch.into() {
            PitchInput::Semitones(pitch) => pitch,
            PitchInput::Hertz(hertz) => {
                self.resolver.pitch_from_frequency(hertz).ok_or_else(|| {
                    reported(MidiEventError::InvalidArguments(format!(
                        "{hertz} Hz is not a pitch"
                    )))
                })?
            }
        };
        self.apply_pitch(pitch, container);
        self.changed(LifecycleState::Transposed, container);
        Ok(())
    }

    /// Move the event by `delta_ticks`.
    ///
    /// The duration of an attached playback note is left as is.
    pub fn move_by<C: Container + ?Sized>(
        &mut self,
        delta_ticks: i64,
        container: &mut C,
    ) -> Result<(), MidiEventError> {
        let ticks = self
            .ticks
            .checked_add(delta_ticks)
            .ok_or_else(|| {
                MidiEventError::InvalidArguments(format!("tick overflow moving {self}"))
            })
            .and_then(check_ticks)
            .map_err(reported)?;
        self.set_ticks(ticks, container);
        Ok(())
    }

    /// Move the event to a position, resolved by the song unless given in ticks.
    pub fn move_to<C: Container + ?Sized>(
        &mut self,
        position: &Position,
        container: &mut C,
    ) -> Result<(), MidiEventError> {
        let ticks = match position {
            Position::Ticks(ticks) => *ticks,
            position => {
                let song = self.song.ok_or_else(|| {
                    reported(MidiEventError::UnresolvedPosition(format!(
                        "{self} is not part of a song"
                    )))
                })?;
                container.position_ticks(song, position).ok_or_else(|| {
                    reported(MidiEventError::UnresolvedPosition(format!(
                        "{position:?} is not a position of song {}",
                        song.0
                    )))
                })?
            }
        };
        let ticks = check_ticks(ticks).map_err(reported)?;
        self.set_ticks(ticks, container);
        Ok(())
    }

    fn set_ticks<C: Container + ?Sized>(&mut self, ticks: i64, container: &mut C) {
        log::debug!("moving {self} to tick {ticks}");
        self.ticks = ticks;
        self.refresh_sort_index();
        self.changed(LifecycleState::Moved, container);
    }

    /// Detach from all containers.
    pub fn reset<C: Container + ?Sized>(&mut self, container: &mut C) {
        self.reset_from(ResetScope::all(), container);
    }

    /// Detach from the containers selected by `scope`.
    pub fn reset_from<C: Container + ?Sized>(&mut self, scope: ResetScope, container: &mut C) {
        if scope.from_part {
            self.part = None;
        }
        if scope.from_track {
            self.track = None;
            self.channel = 0;
        }
        if scope.from_song {
            self.song = None;
        }
        self.changed(LifecycleState::Removed, container);
    }

    /// Flag the part holding this event for a re-flush.
    pub fn update<C: Container + ?Sized>(&self, container: &mut C) {
        if let Some(part) = self.part {
            container.mark_part_needs_update(part);
        }
    }

    /// Status and data bytes of a channel voice event.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        if !is_channel_voice(self.event_type) || !(1..=16).contains(&self.channel) {
            return None;
        }
        let status = self.event_type | (self.channel - 1);
        let byte = |value: Option<i32>| value.unwrap_or(0).clamp(0, MAX_DATA_BYTE) as u8;
        let bytes = match self.event_type {
            PROGRAM_CHANGE | CHANNEL_PRESSURE => vec![status, byte(self.data1)],
            _ => vec![status, byte(self.data1), byte(self.data2)],
        };
        Some(bytes)
    }

    /// Ordering key, note off first at equal ticks.
    pub const fn sort_key(&self) -> (i64, i64) {
        (self.ticks, self.sort_index)
    }

    pub fn attach_song(&mut self, song: SongId) {
        self.song = Some(song);
    }

    pub fn attach_track(&mut self, track: TrackId) {
        self.track = Some(track);
    }

    pub fn attach_part(&mut self, part: PartId) {
        self.part = Some(part);
    }

    pub fn attach_midi_note(&mut self, midi_note: MidiNoteId) {
        self.midi_note = Some(midi_note);
    }

    pub fn detach_midi_note(&mut self) {
        self.midi_note = None;
    }

    pub fn mute(&mut self) {
        self.muted = true;
    }

    pub fn unmute(&mut self) {
        self.muted = false;
    }

    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    pub const fn is_note(&self) -> bool {
        is_note(self.event_type)
    }

    pub const fn id(&self) -> EventId {
        self.id
    }

    pub const fn event_number(&self) -> u64 {
        self.event_number
    }

    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    pub const fn status(&self) -> Option<u8> {
        self.status
    }

    pub const fn event_type(&self) -> u8 {
        self.event_type
    }

    pub const fn channel(&self) -> u8 {
        self.channel
    }

    pub const fn command(&self) -> Option<u8> {
        self.command
    }

    /// First data byte, for note events the pitch clamped to `[0,127]`.
    pub const fn data1(&self) -> Option<i32> {
        self.data1
    }

    pub const fn data2(&self) -> Option<i32> {
        self.data2
    }

    pub const fn note(&self) -> Option<&NoteInfo> {
        self.note.as_ref()
    }

    /// Full note name such as `C#4`.
    pub fn note_name(&self) -> Option<&str> {
        self.note.as_ref().map(|note| note.full_name.as_str())
    }

    pub fn note_number(&self) -> Option<u8> {
        self.note.as_ref().map(|note| note.number)
    }

    pub fn octave(&self) -> Option<i8> {
        self.note.as_ref().map(|note| note.octave)
    }

    pub fn frequency(&self) -> Option<f64> {
        self.note.as_ref().map(|note| note.frequency)
    }

    pub const fn velocity(&self) -> Option<i32> {
        self.velocity
    }

    pub const fn bpm(&self) -> Option<f64> {
        self.bpm
    }

    pub const fn nominator(&self) -> Option<i32> {
        self.nominator
    }

    pub const fn denominator(&self) -> Option<i32> {
        self.denominator
    }

    pub const fn controller_type(&self) -> Option<i32> {
        self.controller_type
    }

    pub const fn controller_value(&self) -> Option<i32> {
        self.controller_value
    }

    pub const fn program_number(&self) -> Option<i32> {
        self.program_number
    }

    pub const fn sort_index(&self) -> i64 {
        self.sort_index
    }

    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    pub const fn resolver(&self) -> &NoteResolver {
        &self.resolver
    }

    pub const fn song(&self) -> Option<SongId> {
        self.song
    }

    pub const fn track(&self) -> Option<TrackId> {
        self.track
    }

    pub const fn part(&self) -> Option<PartId> {
        self.part
    }

    pub const fn midi_note(&self) -> Option<MidiNoteId> {
        self.midi_note
    }
}

impl std::fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match type_name(self.event_type) {
            Some(name) => write!(f, "{name} event {}", self.id)?,
            None => write!(f, "event {} of type {:#04X}", self.id, self.event_type)?,
        }
        write!(f, " at tick {}", self.ticks)
    }
}

/// Order events by tick, note off before note on at equal ticks.
pub fn sort_events(events: &mut [MidiEvent]) {
    events.sort_by(compare_events);
}

fn compare_events(a: &MidiEvent, b: &MidiEvent) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}
