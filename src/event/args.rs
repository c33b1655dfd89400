//! Boundary input types.
//!
//! Loosely shaped arguments (numbers, tagged pairs, nested lists) are resolved
//! here once, the event itself only deals with typed values.
use crate::MidiEventError;
use serde::Deserialize;

/// Kind tag of a message already parsed by a device layer.
pub const PRE_PARSED_KIND: &str = "MIDIMessageEvent";

/// Maximum number of positional fields taken into account.
const MAX_FIELDS: usize = 5;

/// A single loosely typed argument.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawArg {
    Number(f64),
    Text(String),
    List(Vec<RawArg>),
    Message(ExternalMessage),
}

impl RawArg {
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for RawArg {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for RawArg {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u8> for RawArg {
    fn from(value: u8) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for RawArg {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for RawArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<RawArg>> for RawArg {
    fn from(value: Vec<RawArg>) -> Self {
        Self::List(value)
    }
}

/// Build a `Vec<RawArg>` from mixed literals.
///
/// ```rust
/// # use midievent::{raw_args, RawArg};
/// let args = raw_args![0, 0x90, 60, 100];
/// assert_eq!(args[1], RawArg::Number(144.0));
/// ```
#[macro_export]
macro_rules! raw_args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::RawArg::from($arg)),*]
    };
}

/// Message object coming from a device layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl ExternalMessage {
    pub fn is_pre_parsed(&self) -> bool {
        self.kind == PRE_PARSED_KIND
    }
}

/// Validated positional fields `[ticks, status, data1?, data2?, channel?]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFields {
    pub ticks: i64,
    pub status: u8,
    pub data1: Option<f64>,
    pub data2: Option<f64>,
    pub channel: Option<f64>,
}

impl RawFields {
    pub const fn new(ticks: i64, status: u8) -> Self {
        Self {
            ticks,
            status,
            data1: None,
            data2: None,
            channel: None,
        }
    }

    pub const fn with_data1(self, data1: f64) -> Self {
        Self {
            data1: Some(data1),
            ..self
        }
    }

    pub const fn with_data2(self, data2: f64) -> Self {
        Self {
            data2: Some(data2),
            ..self
        }
    }

    pub const fn with_channel(self, channel: f64) -> Self {
        Self {
            channel: Some(channel),
            ..self
        }
    }
}

/// Normalized constructor input.
#[derive(Debug, Clone, PartialEq)]
pub enum EventArgs {
    /// No arguments at all
    Blank,
    /// Message decoded elsewhere
    PreParsed(ExternalMessage),
    Fields(RawFields),
}

impl EventArgs {
    /// Normalize variadic or list wrapped arguments.
    ///
    /// A single list argument is unwrapped, and so is a single list inside it.
    pub fn from_raw(args: &[RawArg]) -> Result<Self, MidiEventError> {
        let args = match args {
            [] => return Ok(Self::Blank),
            [RawArg::Message(message)] if message.is_pre_parsed() => {
                return Ok(Self::PreParsed(message.clone()));
            }
            [RawArg::List(inner)] => match inner.as_slice() {
                [RawArg::List(nested)] => nested.as_slice(),
                inner => inner,
            },
            args => args,
        };
        if args.len() < 2 {
            return Err(MidiEventError::InvalidArguments(format!(
                "expected at least ticks and status, got {} field(s)",
                args.len()
            )));
        }
        let mut numbers = Vec::with_capacity(MAX_FIELDS);
        for (index, arg) in args.iter().take(MAX_FIELDS).enumerate() {
            let number = arg.as_number().ok_or_else(|| {
                MidiEventError::InvalidArguments(format!("field {index} is not numeric: {arg:?}"))
            })?;
            numbers.push(finite(number, index)?);
        }
        let ticks = to_ticks(numbers[0])?;
        let status = numbers[1].trunc();
        if !(0.0..=255.0).contains(&status) {
            return Err(MidiEventError::InvalidArguments(format!(
                "status {status} is not a byte"
            )));
        }
        Ok(Self::Fields(RawFields {
            ticks,
            status: status as u8,
            data1: numbers.get(2).copied(),
            data2: numbers.get(3).copied(),
            channel: numbers.get(4).copied(),
        }))
    }
}

fn finite(value: f64, index: usize) -> Result<f64, MidiEventError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MidiEventError::InvalidArguments(format!(
            "field {index} is not a finite number"
        )))
    }
}

/// Largest tick position, leaves room for the type code in the sort index.
pub const MAX_TICKS: i64 = i64::MAX - 0xFF;

pub(crate) fn check_ticks(ticks: i64) -> Result<i64, MidiEventError> {
    if ticks <= MAX_TICKS {
        Ok(ticks)
    } else {
        Err(MidiEventError::InvalidArguments(format!(
            "{ticks} is not a valid tick position"
        )))
    }
}

fn to_ticks(value: f64) -> Result<i64, MidiEventError> {
    let value = value.trunc();
    if value.is_finite() && value >= i64::MIN as f64 && value <= MAX_TICKS as f64 {
        Ok(value as i64)
    } else {
        Err(MidiEventError::InvalidArguments(format!(
            "{value} is not a valid tick position"
        )))
    }
}

/// Pitch change requested by `transpose` and `set_pitch`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchInput {
    Semitones(i32),
    Hertz(f64),
}

impl From<i32> for PitchInput {
    fn from(value: i32) -> Self {
        Self::Semitones(value)
    }
}

impl PitchInput {
    /// Accepts a plain number or a `[unit, value]` pair with unit `semi`, `semitone` or `hertz`.
    pub fn from_raw(arg: &RawArg) -> Result<Self, MidiEventError> {
        let invalid = || MidiEventError::InvalidArguments(format!("invalid pitch input {arg:?}"));
        match arg {
            RawArg::Number(n) if n.is_finite() => Ok(Self::Semitones(n.trunc() as i32)),
            RawArg::List(pair) => match pair.as_slice() {
                [RawArg::Text(unit), RawArg::Number(value)] if value.is_finite() => {
                    match unit.as_str() {
                        "semi" | "semitone" => Ok(Self::Semitones(value.trunc() as i32)),
                        "hertz" => Ok(Self::Hertz(*value)),
                        _ => Err(invalid()),
                    }
                }
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}

/// Position on a song timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Ticks(i64),
    Millis(f64),
    BarsBeats {
        bar: u32,
        beat: u32,
        sixteenth: u32,
        tick: u32,
    },
    Percentage(f64),
}

impl Position {
    /// Parse a tagged position such as `["ticks", 240]` or `["barsbeats", 2, 1, 1, 0]`.
    pub fn from_raw(args: &[RawArg]) -> Result<Self, MidiEventError> {
        let args = match args {
            [RawArg::List(inner)] => inner.as_slice(),
            args => args,
        };
        let invalid = || MidiEventError::InvalidArguments(format!("invalid position {args:?}"));
        let (tag, values) = match args {
            [RawArg::Text(tag), values @ ..] => (tag.as_str(), values),
            _ => return Err(invalid()),
        };
        let mut numbers = Vec::with_capacity(values.len());
        for value in values {
            match value.as_number() {
                Some(n) if n.is_finite() => numbers.push(n),
                _ => return Err(invalid()),
            }
        }
        let position = match (tag, numbers.as_slice()) {
            ("ticks", [ticks, ..]) => Self::Ticks(to_ticks(*ticks)?),
            ("millis", [millis, ..]) => Self::Millis(*millis),
            ("percentage", [percentage, ..]) => Self::Percentage(*percentage),
            ("barsbeats", values) if !values.is_empty() => {
                let part = |index: usize, default: u32| {
                    values
                        .get(index)
                        .map_or(default, |v| v.trunc().clamp(0.0, f64::from(u32::MAX)) as u32)
                };
                Self::BarsBeats {
                    bar: part(0, 1),
                    beat: part(1, 1),
                    sixteenth: part(2, 1),
                    tick: part(3, 0),
                }
            }
            _ => return Err(invalid()),
        };
        Ok(position)
    }
}

/// Which containers `reset` detaches the event from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetScope {
    pub from_part: bool,
    pub from_track: bool,
    pub from_song: bool,
}

impl Default for ResetScope {
    fn default() -> Self {
        Self::all()
    }
}

impl ResetScope {
    pub const fn all() -> Self {
        Self {
            from_part: true,
            from_track: true,
            from_song: true,
        }
    }
}
