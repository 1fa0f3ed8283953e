// Typed musical events, the vocabulary shared by the record parser, the
// sequence assembler, and the MIDI encoder.
//
// An `Event` is a delta-time (ticks since the previous event) plus an
// `EventKind` payload. Events are plain values: the parser creates them,
// the assembler rebuilds them with jittered values, the encoder reads them.

use crate::controller::Controller;
use crate::note::Note;

/// Largest delta-time expressible as a MIDI variable-length quantity.
pub const MAX_DELTA_TIME: u32 = 0x0FFF_FFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    NoteOn { note: Note, velocity: u8 },
    NoteOff { note: Note, velocity: u8 },
    ControlChange { controller: Controller, value: u8 },
    /// Raw 16-bit input; only the low 14 bits reach the wire.
    PitchBend { value: u16 },
    EndOfTrack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub delta: u32,
    pub kind: EventKind,
}

impl Event {
    pub fn new(delta: u32, kind: EventKind) -> Self {
        Self { delta, kind }
    }

    pub fn end_of_track(delta: u32) -> Self {
        Self::new(delta, EventKind::EndOfTrack)
    }

    /// Velocity of a note event, `None` for everything else.
    pub fn velocity(&self) -> Option<u8> {
        match self.kind {
            EventKind::NoteOn { velocity, .. } | EventKind::NoteOff { velocity, .. } => {
                Some(velocity)
            }
            _ => None,
        }
    }

    /// Copy of this event with a replaced delta-time and, for note events,
    /// a replaced velocity. Non-note events ignore `velocity`.
    pub fn with_values(self, delta: u32, velocity: u8) -> Self {
        let kind = match self.kind {
            EventKind::NoteOn { note, .. } => EventKind::NoteOn { note, velocity },
            EventKind::NoteOff { note, .. } => EventKind::NoteOff { note, velocity },
            other => other,
        };
        Self { delta, kind }
    }
}

/// Event labels accepted in the second input column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventLabel {
    NoteOn,
    NoteOff,
    ControlChange,
    PitchBend,
}

impl EventLabel {
    /// Recognize a label, ignoring case, spaces, hyphens and underscores:
    /// `on`/`note on`, `off`/`note_off`, `cc`/`control-change`,
    /// `bend`/`Pitch Bend`, and so on.
    pub fn parse(label: &str) -> Option<EventLabel> {
        match normalize_label(label).as_str() {
            "on" | "noteon" => Some(EventLabel::NoteOn),
            "off" | "noteoff" => Some(EventLabel::NoteOff),
            "cc" | "controlchange" => Some(EventLabel::ControlChange),
            "bend" | "pitchbend" => Some(EventLabel::PitchBend),
            _ => None,
        }
    }
}

/// Lowercase and strip the separators users sprinkle into multi-word names.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
