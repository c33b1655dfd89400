use std::{
    fs::{create_dir_all, File},
    io::{BufReader, Write},
    path::PathBuf,
};

use home::home_dir;
use midievent::{note::DEFAULT_CONCERT_PITCH, MidiEventError, NoteNaming, NoteResolver};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_concert_pitch")]
    concert_pitch: f64,
    #[serde(default)]
    note_naming: NoteNaming,
}

const fn default_concert_pitch() -> f64 {
    DEFAULT_CONCERT_PITCH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concert_pitch: DEFAULT_CONCERT_PITCH,
            note_naming: NoteNaming::default(),
        }
    }
}

impl Config {
    // folder placed in $HOME directory
    const FOLDER: &'static str = ".midievent";

    /// Apply command line overrides on top of the stored values.
    pub fn with_overrides(mut self, concert_pitch: Option<f64>, flats: bool) -> Self {
        if let Some(concert_pitch) = concert_pitch {
            self.concert_pitch = concert_pitch;
        }
        if flats {
            self.note_naming = NoteNaming::Flat;
        }
        self
    }

    pub fn note_resolver(&self) -> Result<NoteResolver, MidiEventError> {
        if !self.concert_pitch.is_finite() || self.concert_pitch <= 0.0 {
            return Err(MidiEventError::ConfigError(format!(
                "Concert pitch must be a positive frequency, got {}",
                self.concert_pitch
            )));
        }
        Ok(NoteResolver::new(self.concert_pitch, self.note_naming))
    }

    fn get_base_path() -> Result<PathBuf, MidiEventError> {
        let home = home_dir().ok_or_else(|| {
            MidiEventError::ConfigError("Could not find home directory".to_string())
        })?;
        let path = home.join(Self::FOLDER);
        Ok(path)
    }

    fn get_path() -> Result<PathBuf, MidiEventError> {
        let base = Self::get_base_path()?;
        Ok(base.join("config.json"))
    }

    /// Creates config if it does not exist
    pub fn read_config() -> Result<Self, MidiEventError> {
        let base_path = Self::get_base_path()?;
        if !base_path.exists() {
            create_dir_all(base_path)?;
        }
        let config_path = Self::get_path()?;
        if !config_path.exists() {
            // create default config
            Config::default().save_config()?;
        }
        let file = File::open(config_path)?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader).map_err(|err| {
            MidiEventError::ConfigError(format!("Could not read local configuration {err:}"))
        })?;
        Ok(config)
    }

    /// Assumes the config folder exists
    pub fn save_config(&self) -> Result<(), MidiEventError> {
        let config_path = Self::get_path()?;
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            MidiEventError::ConfigError(format!("Could not save local configuration {err:}"))
        })?;
        let mut file = File::create(config_path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"note_naming": "flat"}"#).unwrap();
        assert_eq!(config.concert_pitch, DEFAULT_CONCERT_PITCH);
        assert_eq!(config.note_naming, NoteNaming::Flat);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some(432.0), true);
        let resolver = config.note_resolver().unwrap();
        assert_eq!(resolver.concert_pitch(), 432.0);
        assert_eq!(resolver.naming(), NoteNaming::Flat);
    }

    #[test]
    fn test_invalid_concert_pitch() {
        let config = Config::default().with_overrides(Some(-1.0), false);
        assert!(matches!(
            config.note_resolver(),
            Err(MidiEventError::ConfigError(_))
        ));
    }
}
