// Record parser: one row of input fields to one `Event`.
//
// Column layout:
//   0: delta-time (non-negative integer, ticks)
//   1: event label (see `EventLabel::parse`)
//   note on/off:    2: note name, 3: velocity
//   control change: 2: controller name, 3: value
//   pitch bend:     2: bend value
//
// Missing columns produce a `MissingField` naming the exact column so users
// can fix their file without guessing. Extra trailing columns are ignored.
// Numeric payloads are truncated to their storage width (8 bits for
// velocity and controller value, 16 for pitch bend), with a warning when
// truncation changes the value.
//
// Parsing is pure: jitter is applied afterwards by the assembler.

use crate::controller::Controller;
use crate::error::RecordError;
use crate::event::{Event, EventKind, EventLabel, MAX_DELTA_TIME};
use crate::note::Note;

/// Parse one record.
pub fn parse_record<S: AsRef<str>>(fields: &[S]) -> Result<Event, RecordError> {
    let delta = parse_delta(required(fields, 0, "delta time")?)?;
    let label_str = required(fields, 1, "event type")?;
    let label = EventLabel::parse(label_str)
        .ok_or_else(|| RecordError::UnknownEventKind(label_str.to_string()))?;

    let kind = match label {
        EventLabel::NoteOn | EventLabel::NoteOff => {
            let name = required(fields, 2, "note name")?;
            let note = Note::parse(name).ok_or_else(|| RecordError::UnknownNote(name.to_string()))?;
            let velocity = parse_u8(required(fields, 3, "velocity")?, "velocity")?;
            if label == EventLabel::NoteOn {
                EventKind::NoteOn { note, velocity }
            } else {
                EventKind::NoteOff { note, velocity }
            }
        }
        EventLabel::ControlChange => {
            let name = required(fields, 2, "controller name")?;
            let controller = Controller::parse(name)
                .ok_or_else(|| RecordError::UnknownController(name.to_string()))?;
            let value = parse_u8(required(fields, 3, "value")?, "value")?;
            EventKind::ControlChange { controller, value }
        }
        EventLabel::PitchBend => {
            let raw = required(fields, 2, "bend value")?;
            let wide = parse_integer(raw, "bend value")?;
            let value = wide as u16;
            if i64::from(value) != wide {
                tracing::warn!(input = raw, value, "pitch bend truncated to 16 bits");
            }
            EventKind::PitchBend { value }
        }
    };

    Ok(Event::new(delta, kind))
}

fn required<'a, S: AsRef<str>>(
    fields: &'a [S],
    column: usize,
    field: &'static str,
) -> Result<&'a str, RecordError> {
    fields
        .get(column)
        .map(|f| f.as_ref())
        .ok_or(RecordError::MissingField { field, column })
}

fn parse_delta(raw: &str) -> Result<u32, RecordError> {
    let delta: u32 = raw.parse().map_err(|_| RecordError::MalformedDeltaTime {
        value: raw.to_string(),
    })?;
    if delta > MAX_DELTA_TIME {
        return Err(RecordError::DeltaTimeTooLarge(delta));
    }
    Ok(delta)
}

fn parse_integer(raw: &str, field: &'static str) -> Result<i64, RecordError> {
    raw.parse().map_err(|_| RecordError::MalformedValue {
        field,
        value: raw.to_string(),
    })
}

fn parse_u8(raw: &str, field: &'static str) -> Result<u8, RecordError> {
    let wide = parse_integer(raw, field)?;
    let value = wide as u8;
    if i64::from(value) != wide {
        tracing::warn!(input = raw, value, "{field} truncated to 8 bits");
    }
    Ok(value)
}
