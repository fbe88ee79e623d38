// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

use crate::tone::{emitter::ToneTiming, OverflowPolicy, Tuning};

pub mod error;
mod tone;
mod voice;

pub use error::ConfigError;
pub use voice::Voice;

/// The configuration for an instrument: where performance events come from
/// and which beepers play them.
#[derive(Deserialize)]
pub struct Instrument {
    /// The MIDI input device to listen to.
    midi_device: String,

    /// The voices to play through. A single voice plays monophonically.
    #[serde(default)]
    voices: Vec<Voice>,

    /// What to do when more pitches are held than there are voices.
    #[serde(default)]
    overflow: OverflowPolicy,

    /// Whether to play a chime once the voices are ready.
    startup_chime: Option<bool>,

    /// The tuning.
    #[serde(default)]
    tuning: tone::Tuning,

    /// The bend throttle.
    #[serde(default)]
    throttle: tone::Throttle,

    /// The tone timing.
    #[serde(default)]
    tone: tone::Tone,
}

impl Instrument {
    /// Parse an instrument from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Instrument, ConfigError> {
        let instrument = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Instrument>()?;

        if instrument.voices.is_empty() {
            return Err(ConfigError::NoVoices);
        }
        let bend_range = instrument.tuning().bend_range;
        if bend_range <= 0 {
            return Err(ConfigError::BendRange(bend_range));
        }
        Ok(instrument)
    }

    /// Returns the MIDI device name.
    pub fn midi_device(&self) -> &str {
        &self.midi_device
    }

    /// Returns the configured voices.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Returns the overflow policy.
    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Returns whether the startup chime should be played.
    pub fn startup_chime(&self) -> bool {
        self.startup_chime.unwrap_or(true)
    }

    /// Returns the tuning.
    pub fn tuning(&self) -> Tuning {
        self.tuning.tuning()
    }

    /// Returns the bend threshold.
    pub fn bend_threshold(&self) -> u32 {
        self.throttle.bend_threshold()
    }

    /// Returns the tone timing.
    pub fn timing(&self) -> Result<ToneTiming, ConfigError> {
        self.tone.timing()
    }
}
