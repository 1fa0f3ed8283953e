// Command-line parsing for the `csv2midi` binary.
//
// Simple `std::env::args()` matching, no clap dependency. Flags accept both
// `--flag VALUE` and `--flag=VALUE`. A `--config` file is applied first and
// individual flags override it regardless of their position on the line.
//
// Usage:
//   csv2midi [OPTIONS] [INPUT]
//     -d, --delta-time <N>    Timing jitter factor in ticks (default: 0)
//     -v, --velocity <N>      Velocity jitter factor (default: 0)
//     --seed <N>              PRNG seed for reproducible jitter
//     --time-division <N>     Ticks per beat (default: 960)
//     --channel <N>           MIDI channel 0-15 (default: 0)
//     --config <PATH>         JSON file with any of the settings above

use std::path::PathBuf;

use crate::config::ConvertConfig;
use crate::error::{ConvertError, Result};

pub const USAGE: &str = "\
Usage: csv2midi [OPTIONS] [INPUT]

Converts INPUT (CSV rows of: delta time, event, note/controller, value) to a
Standard MIDI File next to it, replacing a .csv extension with .mid.

Options:
  -d, --delta-time <N>    Timing jitter factor in ticks (default: 0)
  -v, --velocity <N>      Velocity jitter factor (default: 0)
  --seed <N>              PRNG seed for reproducible jitter
  --time-division <N>     Ticks per beat (default: 960)
  --channel <N>           MIDI channel 0-15 (default: 0)
  --config <PATH>         JSON file with any of the settings above
  --help, -h              Show this help";

/// What the binary was asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Convert `input`, or do nothing when no input was given.
    Convert {
        config: ConvertConfig,
        input: Option<PathBuf>,
    },
}

/// Flag values seen on the command line, applied over the config file.
#[derive(Default)]
struct Overrides {
    delta_time_factor: Option<i64>,
    velocity_factor: Option<i64>,
    seed: Option<u64>,
    time_division: Option<u16>,
    channel: Option<u8>,
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut overrides = Overrides::default();
    let mut config_path: Option<PathBuf> = None;
    let mut input: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f, Some(v.to_string())),
            _ => (arg, None),
        };
        let mut value = |name: &str| -> Result<String> {
            if let Some(v) = &inline {
                return Ok(v.clone());
            }
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| ConvertError::Config(format!("{name} requires a value")))
        };

        match flag {
            "--delta-time" | "-d" => {
                overrides.delta_time_factor = Some(number(flag, &value(flag)?)?);
            }
            "--velocity" | "-v" => {
                overrides.velocity_factor = Some(number(flag, &value(flag)?)?);
            }
            "--seed" => overrides.seed = Some(number(flag, &value(flag)?)?),
            "--time-division" => overrides.time_division = Some(number(flag, &value(flag)?)?),
            "--channel" => overrides.channel = Some(number(flag, &value(flag)?)?),
            "--config" => config_path = Some(PathBuf::from(value(flag)?)),
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with('-') && other != "-" => {
                return Err(ConvertError::Config(format!("unknown argument: {other}")));
            }
            positional => {
                if input.is_some() {
                    return Err(ConvertError::Config(format!(
                        "unexpected extra argument: {positional}"
                    )));
                }
                input = Some(PathBuf::from(positional));
            }
        }
        i += 1;
    }

    let mut config = match &config_path {
        Some(path) => ConvertConfig::load(path)?,
        None => ConvertConfig::default(),
    };
    if let Some(v) = overrides.delta_time_factor {
        config.delta_time_factor = v;
    }
    if let Some(v) = overrides.velocity_factor {
        config.velocity_factor = v;
    }
    if let Some(v) = overrides.seed {
        config.seed = Some(v);
    }
    if let Some(v) = overrides.time_division {
        config.time_division = v;
    }
    if let Some(v) = overrides.channel {
        config.channel = v;
    }

    Ok(Command::Convert { config, input })
}

fn number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| ConvertError::Config(format!("{flag} expects an integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(args: &[&str]) -> (ConvertConfig, Option<PathBuf>) {
        match parse_args(args.iter().copied()).unwrap() {
            Command::Convert { config, input } => (config, input),
            Command::Help => panic!("unexpected help for {args:?}"),
        }
    }

    #[test]
    fn no_arguments_means_nothing_to_do() {
        let (config, input) = convert(&[]);
        assert_eq!(config, ConvertConfig::default());
        assert_eq!(input, None);
    }

    #[test]
    fn short_and_long_flags() {
        let (config, input) = convert(&["-d", "12", "--velocity", "5", "song.csv"]);
        assert_eq!(config.delta_time_factor, 12);
        assert_eq!(config.velocity_factor, 5);
        assert_eq!(input, Some(PathBuf::from("song.csv")));

        let (config, _) = convert(&["--delta-time=3", "-v", "4", "--seed=9"]);
        assert_eq!(config.delta_time_factor, 3);
        assert_eq!(config.velocity_factor, 4);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn negative_factor_parses_and_fails_validation() {
        let (config, _) = convert(&["-d", "-1"]);
        assert_eq!(config.delta_time_factor, -1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_arguments_are_config_errors() {
        for args in [
            &["--velocity", "loud"][..],
            &["--delta-time"][..],
            &["--bogus"][..],
            &["a.csv", "b.csv"][..],
            &["--channel", "300"][..],
        ] {
            assert!(
                matches!(parse_args(args.iter().copied()), Err(ConvertError::Config(_))),
                "{args:?}"
            );
        }
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse_args(["-d", "3", "--help"]).unwrap(), Command::Help);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "delta_time_factor": 30, "velocity_factor": 8 }"#).unwrap();
        let path_str = path.to_str().unwrap();

        let (config, _) = convert(&["-v", "2", "--config", path_str, "in.csv"]);
        assert_eq!(config.delta_time_factor, 30);
        assert_eq!(config.velocity_factor, 2);
    }
}
