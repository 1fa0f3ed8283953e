// MIDI output from assembled sequences.
//
// Converts a `Sequence` into a Standard MIDI File (SMF format 0: one track)
// with metrical timing equal to the sequence's time division. Events are
// written in order with their delta-times unchanged; every channel event goes
// to the sequence's channel. The track always ends with the sequence's own
// EndOfTrack event, which carries the closing delta.
//
// Data bytes are masked to their wire width here: velocities and controller
// values to 7 bits, pitch bends to 14. Delta-times that no longer fit the
// 28-bit variable-length encoding after jitter are an error, not a wrap.
//
// Uses the `midly` crate for the byte-level encoding.

use midly::{
    Format, Header, MetaMessage, MidiMessage, PitchBend, Smf, Timing, Track, TrackEvent,
    TrackEventKind,
    num::{u4, u7, u14, u15, u28},
};

use crate::assemble::Sequence;
use crate::error::{ConvertError, Result};
use crate::event::{Event, EventKind};

/// Encode a sequence as SMF bytes.
pub fn encode(sequence: &Sequence) -> Result<Vec<u8>> {
    let smf = sequence_to_smf(sequence)?;
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| ConvertError::Encode(format!("failed to write MIDI: {e}")))?;
    Ok(buf)
}

/// Build the in-memory SMF for a sequence.
fn sequence_to_smf(sequence: &Sequence) -> Result<Smf<'static>> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(sequence.time_division & 0x7FFF)),
    ));

    let channel = u4::new(sequence.channel & 0x0F);
    let mut track: Track<'static> = Vec::with_capacity(sequence.events.len());
    for event in &sequence.events {
        track.push(track_event(event, channel)?);
    }
    smf.tracks.push(track);

    Ok(smf)
}

fn track_event(event: &Event, channel: u4) -> Result<TrackEvent<'static>> {
    let delta = u28::try_from(event.delta)
        .ok_or(ConvertError::DeltaTimeOverflow { delta: event.delta })?;

    let message = match event.kind {
        EventKind::NoteOn { note, velocity } => MidiMessage::NoteOn {
            key: u7::new(note.key()),
            vel: u7::new(velocity & 0x7F),
        },
        EventKind::NoteOff { note, velocity } => MidiMessage::NoteOff {
            key: u7::new(note.key()),
            vel: u7::new(velocity & 0x7F),
        },
        EventKind::ControlChange { controller, value } => MidiMessage::Controller {
            controller: u7::new(controller.number()),
            value: u7::new(value & 0x7F),
        },
        EventKind::PitchBend { value } => MidiMessage::PitchBend {
            bend: PitchBend(u14::new(value & 0x3FFF)),
        },
        EventKind::EndOfTrack => {
            return Ok(TrackEvent {
                delta,
                kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
            });
        }
    };

    Ok(TrackEvent {
        delta,
        kind: TrackEventKind::Midi { channel, message },
    })
}
