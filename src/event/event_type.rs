//! MIDI type codes as stored in `MidiEvent::event_type`.
//!
//! Channel voice messages use the command nibble scaled to a byte,
//! meta and system messages use the raw status byte.

pub const NO_OP: u8 = 0x00;
pub const END_OF_TRACK: u8 = 0x2F;
pub const TEMPO: u8 = 0x51;
pub const TIME_SIGNATURE: u8 = 0x58;

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const POLY_PRESSURE: u8 = 0xA0;
pub const CONTROL_CHANGE: u8 = 0xB0;
pub const PROGRAM_CHANGE: u8 = 0xC0;
pub const CHANNEL_PRESSURE: u8 = 0xD0;
pub const PITCH_BEND: u8 = 0xE0;

/// Largest value a data byte can carry, the top bit is reserved for status.
pub const MAX_DATA_BYTE: i32 = 0x7F;

/// Command nibble of a status byte scaled back to a byte.
pub const fn command_of(status: u8) -> u8 {
    (status >> 4) * 16
}

pub const fn is_channel_voice(code: u8) -> bool {
    matches!(code, NOTE_OFF..=PITCH_BEND)
}

pub const fn is_note(code: u8) -> bool {
    code == NOTE_OFF || code == NOTE_ON
}

/// Human readable name of the type codes this crate decodes.
pub const fn type_name(code: u8) -> Option<&'static str> {
    let name = match code {
        NO_OP => "no-op",
        END_OF_TRACK => "end of track",
        TEMPO => "tempo",
        TIME_SIGNATURE => "time signature",
        NOTE_OFF => "note off",
        NOTE_ON => "note on",
        CONTROL_CHANGE => "control change",
        PROGRAM_CHANGE => "program change",
        CHANNEL_PRESSURE => "channel pressure",
        PITCH_BEND => "pitch bend",
        _ => return None,
    };
    Some(name)
}
