// csv2midi: CSV event listings to Standard MIDI Files.
//
// Each input row is one musical event (delta-time, event type, note or
// controller, value). Rows are parsed into typed events, optionally
// "humanized" by a bounded random walk on their timing and velocity, closed
// with an EndOfTrack event that lands the track on the beat grid, and written
// as a single-track SMF.
//
// Architecture:
// - error.rs: Error taxonomy (configuration, I/O, per-line record errors)
// - config.rs: Conversion settings, JSON loading, validation
// - cli.rs: Command-line flag parsing for the binary
// - note.rs: Note-name table (`C4` = 60)
// - controller.rs: Controller-name table (`Sustain Pedal` = 64)
// - event.rs: Event vocabulary and event-label normalization
// - record.rs: One CSV record to one `Event`
// - jitter.rs: Bounded random walk (`Walker`) and the `OffsetSource` seam
// - assemble.rs: Parse + jitter + close the track; whole-file conversion
// - midi.rs: `Sequence` to SMF bytes via midly
//
// Output is deterministic given a seed (see the csv2midi_prng crate).

pub mod assemble;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod jitter;
pub mod midi;
pub mod note;
pub mod record;

pub use assemble::{Sequence, assemble, convert_file, output_path};
pub use config::ConvertConfig;
pub use error::{ConvertError, RecordError, Result};
pub use event::{Event, EventKind};
pub use jitter::Walker;
pub use record::parse_record;
