// Note names to MIDI key numbers.
//
// Names are a letter A-G (any case), an optional accidental (`#` or `s` for
// sharp, `b` for flat), and an octave from -1 to 9. Octave numbering follows
// the common convention where middle C is `C4` = 60, so the full MIDI range
// runs from `C-1` = 0 to `G9` = 127.

use std::fmt;

/// Semitone offset of each natural note within an octave.
const NATURALS: [(char, i16); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Canonical (sharp-spelled) pitch-class names, indexed by pitch class.
const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const MIN_OCTAVE: i16 = -1;
const MAX_OCTAVE: i16 = 9;

/// A MIDI key number (0-127).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note(u8);

impl Note {
    pub const MIDDLE_C: Note = Note(60);

    /// Wrap a raw key number. Returns `None` above 127.
    pub fn from_key(key: u8) -> Option<Note> {
        (key <= 127).then_some(Note(key))
    }

    pub fn key(self) -> u8 {
        self.0
    }

    /// Parse a note name such as `C4`, `a#3`, `Bb-1`, or `Fs2`.
    pub fn parse(name: &str) -> Option<Note> {
        let mut chars = name.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let natural = NATURALS.iter().find(|(c, _)| *c == letter)?.1;

        let rest = chars.as_str();
        let (accidental, octave_str) = match rest.chars().next()? {
            '#' | 's' | 'S' => (1, &rest[1..]),
            'b' => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let octave: i16 = octave_str.parse().ok()?;
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
            return None;
        }

        let key = (octave + 1) * 12 + natural + accidental;
        u8::try_from(key).ok().and_then(Note::from_key)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let octave = i16::from(self.0 / 12) - 1;
        write!(f, "{}{}", PITCH_CLASS_NAMES[usize::from(self.0 % 12)], octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> Option<u8> {
        Note::parse(name).map(Note::key)
    }

    #[test]
    fn middle_c_is_sixty() {
        assert_eq!(Note::parse("C4"), Some(Note::MIDDLE_C));
        assert_eq!(key("c4"), Some(60));
    }

    #[test]
    fn accidentals() {
        assert_eq!(key("A#3"), Some(58));
        assert_eq!(key("As3"), Some(58));
        assert_eq!(key("Bb3"), Some(58));
        assert_eq!(key("Cb4"), Some(59));
        assert_eq!(key("B#3"), Some(60));
    }

    #[test]
    fn range_limits() {
        assert_eq!(key("C-1"), Some(0));
        assert_eq!(key("G9"), Some(127));
        assert_eq!(key("G#9"), None);
        assert_eq!(key("Cb-1"), None);
        assert_eq!(key("C10"), None);
        assert_eq!(key("C-2"), None);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "C", "H4", "4C", "C#", "Cx4", "C 4", "do4"] {
            assert_eq!(key(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn display_uses_sharp_spelling() {
        assert_eq!(Note::parse("Bb3").unwrap().to_string(), "A#3");
        assert_eq!(Note::parse("C-1").unwrap().to_string(), "C-1");
        assert_eq!(Note::MIDDLE_C.to_string(), "C4");
    }
}
