// Error taxonomy for the converter.
//
// Every failure is fatal: the CLI prints the `Display` form of a
// `ConvertError` and exits non-zero. Record-level problems carry the 1-based
// input line so users can find the offending row. `RecordError` messages are
// part of the user-facing contract ("specify velocity at fourth column"), so
// keep their wording stable.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level failure of a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Bad flag, bad config file, or out-of-range setting. Raised before any
    /// input is read.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read {}: {source}", .path.display())]
    InputIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input could not be split into records (e.g. invalid UTF-8).
    #[error("line {line}: {message}")]
    InputFormat { line: u64, message: String },

    #[error("line {line}: {source}")]
    Record {
        line: u64,
        #[source]
        source: RecordError,
    },

    #[error("line {line}: {source}")]
    Jitter {
        line: u64,
        #[source]
        source: JitterError,
    },

    /// A (possibly jittered) delta-time does not fit the 28-bit
    /// variable-length encoding.
    #[error("delta time {delta} exceeds the 28-bit MIDI limit")]
    DeltaTimeOverflow { delta: u32 },

    #[error("MIDI encoding failed: {0}")]
    Encode(String),

    #[error("cannot write {}: {source}", .path.display())]
    OutputIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single input record could not become an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("delta time '{value}' is invalid")]
    MalformedDeltaTime { value: String },

    #[error("delta time {0} exceeds the 28-bit MIDI limit")]
    DeltaTimeTooLarge(u32),

    /// `column` is 0-based; the message uses the ordinal users see.
    #[error("specify {field} at {} column", ordinal(.column))]
    MissingField { field: &'static str, column: usize },

    #[error("unknown event type '{0}'")]
    UnknownEventKind(String),

    #[error("unknown note name '{0}'")]
    UnknownNote(String),

    #[error("unknown controller name '{0}'")]
    UnknownController(String),

    #[error("{field} '{value}' is not an integer")]
    MalformedValue { field: &'static str, value: String },
}

/// The walker's capped retry loop could not find an admissible offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JitterError {
    #[error("no admissible jitter offset for {input} (factor {factor}) after {attempts} draws")]
    DrawsExhausted {
        input: u32,
        factor: u32,
        attempts: u32,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

fn ordinal(column: &usize) -> &'static str {
    match *column {
        0 => "first",
        1 => "second",
        2 => "third",
        3 => "fourth",
        4 => "fifth",
        _ => "a later",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_column_ordinal() {
        let err = RecordError::MissingField {
            field: "note name",
            column: 2,
        };
        assert_eq!(err.to_string(), "specify note name at third column");
    }

    #[test]
    fn record_error_carries_line_number() {
        let err = ConvertError::Record {
            line: 7,
            source: RecordError::UnknownEventKind("dance".into()),
        };
        assert_eq!(err.to_string(), "line 7: unknown event type 'dance'");
    }

    #[test]
    fn io_errors_name_the_path() {
        let err = ConvertError::InputIo {
            path: PathBuf::from("missing.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot read missing.csv: not found");
    }
}
