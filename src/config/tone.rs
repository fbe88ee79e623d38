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
use std::time::Duration;

use duration_string::DurationString;
use serde::Deserialize;

use super::error::ConfigError;
use crate::tone::{emitter::ToneTiming, Bend, Tuning as ToneTuning};

const DEFAULT_BEND_THRESHOLD: u32 = 700;

/// A YAML representation of the tuning.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Tuning {
    /// The neutral bend value.
    bend_center: Option<Bend>,

    /// Bend units per semitone.
    bend_range: Option<Bend>,
}

impl Tuning {
    /// Returns the tuning, filling in defaults.
    pub fn tuning(&self) -> ToneTuning {
        let default = ToneTuning::default();
        ToneTuning {
            bend_center: self.bend_center.unwrap_or(default.bend_center),
            bend_range: self.bend_range.unwrap_or(default.bend_range),
        }
    }
}

/// A YAML representation of the bend throttle.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Throttle {
    /// The accumulated bend change needed before a held tone is re-sent.
    bend_threshold: Option<u32>,
}

impl Throttle {
    /// Returns the bend threshold.
    pub fn bend_threshold(&self) -> u32 {
        self.bend_threshold.unwrap_or(DEFAULT_BEND_THRESHOLD)
    }
}

/// A YAML representation of the tone timing.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Tone {
    /// How long a tone sounds for.
    duration: Option<String>,

    /// The frequency of the silencing command.
    silence_frequency: Option<f64>,

    /// How long the silencing command sounds for.
    silence_duration: Option<String>,
}

impl Tone {
    /// Returns the tone timing, filling in defaults.
    pub fn timing(&self) -> Result<ToneTiming, ConfigError> {
        let default = ToneTiming::default();
        Ok(ToneTiming {
            duration: parse_duration(&self.duration, default.duration)?,
            silence_frequency: self.silence_frequency.unwrap_or(default.silence_frequency),
            silence_duration: parse_duration(&self.silence_duration, default.silence_duration)?,
        })
    }
}

fn parse_duration(value: &Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => Ok(DurationString::from_string(value.clone())
            .map_err(|e| ConfigError::Duration {
                value: value.clone(),
                reason: e.to_string(),
            })?
            .into()),
        None => Ok(default),
    }
}
