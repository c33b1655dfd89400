use crate::AppError::ConfigError;
use clap::Parser;
use config::Config;
use midievent::{
    Detached, EventFactory, MidiEvent, MidiEventError as LibMidiEventError, Position, RawArg,
    EVENT_COUNTER,
};
use std::io;

mod config;

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("midievent=info"))
        .init();

    // args
    let args = CliArgs::parse();
    let raw_args = match &args.json {
        Some(json) => serde_json::from_str::<Vec<RawArg>>(json)
            .map_err(|err| AppError::InputError(format!("Invalid JSON arguments {err}")))?,
        None => args.values.iter().map(String::as_str).map(parse_value).collect(),
    };

    // read local config
    let local_config = Config::read_config()?.with_overrides(args.concert_pitch, args.flats);
    let resolver = local_config.note_resolver()?;
    log::debug!("Using {resolver:?}");

    // decode
    let factory = EventFactory::new(&EVENT_COUNTER, resolver);
    let mut event = factory.create(&raw_args)?;
    apply_mutations(&mut event, &args)?;

    let json = serde_json::to_string_pretty(&event)
        .map_err(|err| AppError::OtherError(format!("Could not serialize event {err}")))?;
    println!("{json}");
    Ok(())
}

fn apply_mutations(event: &mut MidiEvent, args: &CliArgs) -> Result<(), AppError> {
    let mut container = Detached;
    if let Some(pitch) = args.set_pitch {
        event.set_pitch(pitch, &mut container)?;
    }
    if let Some(semi) = args.transpose {
        event.transpose(semi, &mut container)?;
    }
    if let Some(delta) = args.move_by {
        event.move_by(delta, &mut container)?;
    }
    if let Some(ticks) = args.move_to {
        event.move_to(&Position::Ticks(ticks), &mut container)?;
    }
    Ok(())
}

/// Decimal or `0x` prefixed hexadecimal number, anything else is kept as text.
fn parse_value(value: &str) -> RawArg {
    let number = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok().map(RawArg::from),
        None => value.parse::<f64>().ok().map(RawArg::from),
    };
    number.unwrap_or_else(|| RawArg::from(value))
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Raw fields: ticks status [data1] [data2] [channel].
    #[arg(allow_negative_numbers = true)]
    values: Vec<String>,
    /// Raw argument list as JSON instead of positional values.
    #[arg(long, conflicts_with = "values")]
    json: Option<String>,
    /// Transpose the decoded event by semitones.
    #[arg(long, allow_negative_numbers = true)]
    transpose: Option<i32>,
    /// Set the pitch of the decoded event.
    #[arg(long, allow_negative_numbers = true)]
    set_pitch: Option<i32>,
    /// Move the event by a tick delta.
    #[arg(long, allow_negative_numbers = true)]
    move_by: Option<i64>,
    /// Move the event to an absolute tick.
    #[arg(long, allow_negative_numbers = true)]
    move_to: Option<i64>,
    /// Override the configured A4 frequency.
    #[arg(long)]
    concert_pitch: Option<f64>,
    /// Spell note names with flats.
    #[arg(long, default_value_t = false)]
    flats: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("input error: {0}")]
    InputError(String),
    #[error("event error: {0}")]
    EventError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<LibMidiEventError> for AppError {
    fn from(error: LibMidiEventError) -> Self {
        match error {
            LibMidiEventError::InvalidArguments(s) => Self::InputError(s),
            LibMidiEventError::InvalidOperation(s) => Self::EventError(s),
            LibMidiEventError::UnresolvedPosition(s) => Self::EventError(s),
            LibMidiEventError::ConfigError(s) => ConfigError(s),
            LibMidiEventError::IoError(s) => Self::OtherError(s),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("0x90"), RawArg::Number(144.0));
        assert_eq!(parse_value("480"), RawArg::Number(480.0));
        assert_eq!(parse_value("-12.5"), RawArg::Number(-12.5));
        assert_eq!(parse_value("C4"), RawArg::Text("C4".to_string()));
    }

    #[test]
    fn test_cli_args() {
        let args = CliArgs::parse_from([
            "midievent",
            "0",
            "0x93",
            "60",
            "100",
            "--transpose",
            "-2",
        ]);
        assert_eq!(args.values, vec!["0", "0x93", "60", "100"]);
        assert_eq!(args.transpose, Some(-2));
        assert!(!args.flats);
    }

    #[test]
    fn test_cli_negative_flags() {
        let args = CliArgs::parse_from([
            "midievent",
            "--set-pitch",
            "-3",
            "--transpose",
            "-2",
            "--move-by",
            "-10",
            "--move-to",
            "-480",
        ]);
        assert_eq!(args.set_pitch, Some(-3));
        assert_eq!(args.transpose, Some(-2));
        assert_eq!(args.move_by, Some(-10));
        assert_eq!(args.move_to, Some(-480));
    }

    #[test]
    fn test_apply_mutations() {
        let args = CliArgs::parse_from(["midievent", "--transpose", "2", "--move-by", "10"]);
        let resolver = Config::default().note_resolver().unwrap();
        let factory = EventFactory::new(&EVENT_COUNTER, resolver);
        let mut event = factory
            .create(&midievent::raw_args![0, 0x90, 60, 100])
            .unwrap();
        apply_mutations(&mut event, &args).unwrap();
        assert_eq!(event.note_name(), Some("D4"));
        assert_eq!(event.ticks(), 10);

        let mut tempo = factory.create(&midievent::raw_args![0, 0x51, 120]).unwrap();
        let result = apply_mutations(&mut tempo, &args);
        assert!(matches!(result, Err(AppError::EventError(_))));
    }
}
