// Conversion settings.
//
// `ConvertConfig` collects everything a run needs besides the input file:
// the two jitter factors, the PRNG seed, the ticks-per-beat resolution, and
// the output channel. It can be loaded from a JSON file (`--config`) and then
// overridden field by field from CLI flags; missing JSON keys take defaults.
//
// Factors are stored signed so that a negative value from either source
// reaches `validate()` and is reported, rather than failing to parse with a
// less helpful message. `validate()` runs before any input is touched.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Ticks per beat used when nothing else is configured.
pub const DEFAULT_TIME_DIVISION: u16 = 960;

/// Largest ticks-per-beat value SMF metrical timing can carry (15 bits).
pub const MAX_TIME_DIVISION: u16 = 0x7FFF;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Maximum timing offset (exclusive) in ticks. 0 disables timing jitter.
    pub delta_time_factor: i64,
    /// Maximum velocity offset (exclusive). 0 disables velocity jitter.
    pub velocity_factor: i64,
    /// PRNG seed. `None` seeds from the clock, so runs differ.
    pub seed: Option<u64>,
    pub time_division: u16,
    /// MIDI channel (0-15) for every channel event.
    pub channel: u8,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            delta_time_factor: 0,
            velocity_factor: 0,
            seed: None,
            time_division: DEFAULT_TIME_DIVISION,
            channel: 0,
        }
    }
}

/// Jitter factors after validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Factors {
    pub delta_time: u32,
    pub velocity: u32,
}

impl ConvertConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("cannot read config {}: {e}", path.display()))
        })?;
        serde_json::from_str(&data).map_err(|e| {
            ConvertError::Config(format!("bad config {}: {e}", path.display()))
        })
    }

    /// Check every setting and return the jitter factors in walker form.
    pub fn validate(&self) -> Result<Factors> {
        let delta_time = factor("delta time", self.delta_time_factor)?;
        let velocity = factor("velocity", self.velocity_factor)?;
        if self.time_division == 0 || self.time_division > MAX_TIME_DIVISION {
            return Err(ConvertError::Config(format!(
                "time division must be between 1 and {MAX_TIME_DIVISION}, got {}",
                self.time_division
            )));
        }
        if self.channel > 15 {
            return Err(ConvertError::Config(format!(
                "channel must be between 0 and 15, got {}",
                self.channel
            )));
        }
        Ok(Factors {
            delta_time,
            velocity,
        })
    }
}

fn factor(name: &str, value: i64) -> Result<u32> {
    if value < 0 {
        return Err(ConvertError::Config(format!(
            "{name} jitter factor must not be negative, got {value}"
        )));
    }
    u32::try_from(value)
        .map_err(|_| ConvertError::Config(format!("{name} jitter factor {value} is too large")))
}
