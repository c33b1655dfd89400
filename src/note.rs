use serde::{Deserialize, Serialize};

pub const SHARP_NOTES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub const FLAT_NOTES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

pub const MIN_PITCH: i32 = 0;
pub const MAX_PITCH: i32 = 127;

/// Frequency of A4 in Hz
pub const DEFAULT_CONCERT_PITCH: f64 = 440.0;

/// Pitch number of A4
const CONCERT_PITCH_NUMBER: f64 = 69.0;

/// Spelling used for the black keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteNaming {
    #[default]
    Sharp,
    Flat,
}

impl NoteNaming {
    const fn names(self) -> &'static [&'static str; 12] {
        match self {
            Self::Sharp => &SHARP_NOTES,
            Self::Flat => &FLAT_NOTES,
        }
    }
}

/// Snapshot of the musical attributes of a pitch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteInfo {
    /// Pitch class name without octave, e.g. `C#`
    pub name: &'static str,
    /// Name with octave, e.g. `C#4`
    pub full_name: String,
    /// MIDI pitch number
    pub number: u8,
    /// Octave, pitch 60 is in octave 4
    pub octave: i8,
    /// Equal tempered frequency in Hz
    pub frequency: f64,
}

/// Derives note name, octave and frequency from a MIDI pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteResolver {
    concert_pitch: f64,
    naming: NoteNaming,
}

impl Default for NoteResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONCERT_PITCH, NoteNaming::Sharp)
    }
}

impl NoteResolver {
    pub const fn new(concert_pitch: f64, naming: NoteNaming) -> Self {
        Self {
            concert_pitch,
            naming,
        }
    }

    pub const fn concert_pitch(&self) -> f64 {
        self.concert_pitch
    }

    pub const fn naming(&self) -> NoteNaming {
        self.naming
    }

    /// Resolve the note attributes of `pitch`, clamped to the MIDI range.
    pub fn resolve(&self, pitch: i32) -> NoteInfo {
        let number = pitch.clamp(MIN_PITCH, MAX_PITCH) as u8;
        let name = self.naming.names()[usize::from(number % 12)];
        let octave = (number / 12) as i8 - 1;
        NoteInfo {
            name,
            full_name: format!("{name}{octave}"),
            number,
            octave,
            frequency: self.frequency(f64::from(number)),
        }
    }

    /// Frequency of a (possibly fractional) pitch.
    pub fn frequency(&self, pitch: f64) -> f64 {
        self.concert_pitch * 2.0_f64.powf((pitch - CONCERT_PITCH_NUMBER) / 12.0)
    }

    /// Nearest pitch number for a frequency, `None` for non positive input.
    pub fn pitch_from_frequency(&self, hertz: f64) -> Option<i32> {
        if !hertz.is_finite() || hertz <= 0.0 {
            return None;
        }
        let pitch = CONCERT_PITCH_NUMBER + 12.0 * (hertz / self.concert_pitch).log2();
        Some(pitch.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_c() {
        let info = NoteResolver::default().resolve(60);
        assert_eq!(info.name, "C");
        assert_eq!(info.full_name, "C4");
        assert_eq!(info.number, 60);
        assert_eq!(info.octave, 4);
        assert!((info.frequency - 261.625).abs() < 0.01);
    }

    #[test]
    fn test_concert_a() {
        let info = NoteResolver::default().resolve(69);
        assert_eq!(info.full_name, "A4");
        assert!((info.frequency - 440.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_range_bounds() {
        let resolver = NoteResolver::default();
        assert_eq!(resolver.resolve(0).full_name, "C-1");
        assert_eq!(resolver.resolve(127).full_name, "G9");
        assert_eq!(resolver.resolve(-4).number, 0);
        assert_eq!(resolver.resolve(300).number, 127);
    }

    #[test]
    fn test_flat_naming() {
        let resolver = NoteResolver::new(DEFAULT_CONCERT_PITCH, NoteNaming::Flat);
        assert_eq!(resolver.resolve(61).full_name, "Db4");
        assert_eq!(resolver.resolve(70).name, "Bb");
    }

    #[test]
    fn test_custom_concert_pitch() {
        let resolver = NoteResolver::new(432.0, NoteNaming::Sharp);
        assert!((resolver.resolve(69).frequency - 432.0).abs() < f64::EPSILON);
        assert!((resolver.resolve(81).frequency - 864.0).abs() < 0.001);
    }

    #[test]
    fn test_pitch_from_frequency() {
        let resolver = NoteResolver::default();
        assert_eq!(resolver.pitch_from_frequency(440.0), Some(69));
        assert_eq!(resolver.pitch_from_frequency(261.63), Some(60));
        assert_eq!(resolver.pitch_from_frequency(450.0), Some(69));
        assert_eq!(resolver.pitch_from_frequency(0.0), None);
        assert_eq!(resolver.pitch_from_frequency(f64::NAN), None);
    }
}
