// Sequence assembly: input text to a finished, jittered event list.
//
// The pipeline for one file is
//   read whole input -> split into CSV records -> `parse_record` each ->
//   jitter delta-time (and note velocity) -> append EndOfTrack -> encode ->
//   write `<name>.mid`.
//
// Jitter runs here, after parsing, through two independent `Walker`s that
// share one `SeqRng`. For each record the timing walker draws first, then
// the velocity walker, so a given seed always yields the same file.
//
// The EndOfTrack delta closes the track on the tick grid: it is the distance
// from the total emitted ticks (input ticks plus the timing walker's drift)
// up to the next multiple of the time division, counting an already-aligned
// total as a full division. The total duration is therefore always a
// positive whole number of beats.
//
// The first failure aborts the run and nothing is written.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use csv2midi_prng::SeqRng;

use crate::config::{ConvertConfig, Factors};
use crate::error::{ConvertError, Result};
use crate::event::Event;
use crate::jitter::{OffsetSource, Walker};
use crate::midi;
use crate::record::parse_record;

/// Input extension replaced by `OUTPUT_EXTENSION`; matched case-insensitively.
pub const INPUT_EXTENSION: &str = "csv";
pub const OUTPUT_EXTENSION: &str = "mid";

/// A finished single-track event list, ready for the encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    /// Ends with exactly one EndOfTrack event.
    pub events: Vec<Event>,
    pub time_division: u16,
    pub channel: u8,
    /// Final `position` of the timing walker.
    pub delta_drift: i64,
    /// Final `position` of the velocity walker.
    pub velocity_drift: i64,
}

impl Sequence {
    /// Sum of every delta-time, EndOfTrack included.
    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| u64::from(e.delta)).sum()
    }
}

/// Builds a `Sequence` one parsed event at a time.
pub struct Assembler<'a, S: OffsetSource> {
    timing: Walker,
    velocity: Walker,
    source: &'a mut S,
    events: Vec<Event>,
    emitted: u64,
    time_division: u16,
    channel: u8,
}

impl<'a, S: OffsetSource> Assembler<'a, S> {
    pub fn new(factors: Factors, time_division: u16, channel: u8, source: &'a mut S) -> Self {
        Self {
            timing: Walker::new(factors.delta_time),
            velocity: Walker::new(factors.velocity),
            source,
            events: Vec::new(),
            emitted: 0,
            time_division,
            channel,
        }
    }

    /// Jitter `event` and append it. `line` is only used for error context.
    pub fn push(&mut self, line: u64, event: Event) -> Result<()> {
        let jitter_err = |source| ConvertError::Jitter { line, source };

        let delta = self
            .timing
            .adjust(event.delta, &mut *self.source)
            .map_err(jitter_err)?;

        let velocity = match event.velocity() {
            Some(v) => {
                let wide = self
                    .velocity
                    .adjust(u32::from(v), &mut *self.source)
                    .map_err(jitter_err)?;
                let narrow = wide as u8;
                if u32::from(narrow) != wide {
                    tracing::warn!(line, velocity = wide, "jittered velocity truncated to 8 bits");
                }
                narrow
            }
            None => 0,
        };

        self.emitted += u64::from(delta);
        self.events.push(event.with_values(delta, velocity));
        Ok(())
    }

    /// Append the closing EndOfTrack event.
    pub fn finish(mut self) -> Sequence {
        let closing = closing_delta(self.emitted, self.time_division);
        self.events.push(Event::end_of_track(closing));
        Sequence {
            events: self.events,
            time_division: self.time_division,
            channel: self.channel,
            delta_drift: self.timing.position(),
            velocity_drift: self.velocity.position(),
        }
    }
}

/// Ticks from `emitted` up to the next grid line, in `1..=time_division`.
pub fn closing_delta(emitted: u64, time_division: u16) -> u32 {
    let division = u64::from(time_division.max(1));
    (division - emitted % division) as u32
}

/// Parse every record of `input` and assemble the jittered sequence.
pub fn assemble<R: Read, S: OffsetSource>(
    input: R,
    config: &ConvertConfig,
    source: &mut S,
) -> Result<Sequence> {
    let factors = config.validate()?;
    assemble_validated(input, config, factors, source)
}

/// `assemble` for a config whose `validate()` already returned `factors`.
fn assemble_validated<R: Read, S: OffsetSource>(
    input: R,
    config: &ConvertConfig,
    factors: Factors,
    source: &mut S,
) -> Result<Sequence> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(input);

    let mut assembler = Assembler::new(factors, config.time_division, config.channel, source);
    for result in reader.records() {
        let record = result.map_err(|e| ConvertError::InputFormat {
            line: e.position().map_or(0, |p| p.line()),
            message: e.to_string(),
        })?;
        let line = record.position().map_or(0, |p| p.line());
        if record.iter().all(str::is_empty) {
            continue;
        }
        let fields: Vec<&str> = record.iter().collect();
        let event = parse_record(&fields).map_err(|source| ConvertError::Record { line, source })?;
        tracing::debug!(line, ?event, "parsed record");
        assembler.push(line, event)?;
    }

    let sequence = assembler.finish();
    tracing::debug!(
        events = sequence.events.len(),
        delta_drift = sequence.delta_drift,
        velocity_drift = sequence.velocity_drift,
        "assembled sequence"
    );
    Ok(sequence)
}

/// `song.csv` -> `song.mid`; any other name gets `.mid` appended.
pub fn output_path(input: &Path) -> PathBuf {
    let recognized = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(INPUT_EXTENSION));
    if recognized {
        input.with_extension(OUTPUT_EXTENSION)
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        PathBuf::from(name)
    }
}

/// Convert one input file, returning the path of the written MIDI file.
pub fn convert_file(input: &Path, config: &ConvertConfig) -> Result<PathBuf> {
    let factors = config.validate()?;
    let data = std::fs::read(input).map_err(|source| ConvertError::InputIo {
        path: input.to_path_buf(),
        source,
    })?;

    let seed = config.seed.unwrap_or_else(clock_seed);
    tracing::info!(seed, input = %input.display(), "converting");
    let mut rng = SeqRng::new(seed);

    let sequence = assemble_validated(data.as_slice(), config, factors, &mut rng)?;
    let bytes = midi::encode(&sequence)?;

    let output = output_path(input);
    std::fs::write(&output, &bytes).map_err(|source| ConvertError::OutputIo {
        path: output.clone(),
        source,
    })?;
    tracing::info!(
        output = %output.display(),
        events = sequence.events.len(),
        ticks = sequence.total_ticks(),
        "wrote MIDI file"
    );
    Ok(output)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}
