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

use tracing::debug;

use super::{frequency, Bend, Error, Pitch, ToneCommand, Tuning};
use crate::session::Session;

/// Timing of the commands sent by a tone emitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneTiming {
    /// How long a tone sounds unless it is replaced or silenced.
    pub duration: Duration,
    /// The frequency of the command that stops a tone.
    pub silence_frequency: f64,
    /// The duration of the command that stops a tone.
    pub silence_duration: Duration,
}

impl Default for ToneTiming {
    fn default() -> Self {
        ToneTiming {
            duration: Duration::from_secs(10),
            silence_frequency: 20.0,
            silence_duration: Duration::from_millis(1),
        }
    }
}

/// Emits tone commands to a single remote session. A new tone replaces
/// whatever the device was sounding, so stopping a tone is done by sending
/// a very short, very low one.
pub struct ToneEmitter {
    session: Box<dyn Session>,
    tuning: Tuning,
    timing: ToneTiming,
}

impl ToneEmitter {
    /// Creates a new tone emitter that owns the given session.
    pub fn new(session: Box<dyn Session>, tuning: Tuning, timing: ToneTiming) -> ToneEmitter {
        ToneEmitter {
            session,
            tuning,
            timing,
        }
    }

    /// The command that stops the device from sounding.
    pub fn silence_command(&self) -> ToneCommand {
        ToneCommand {
            frequency: self.timing.silence_frequency,
            duration: self.timing.silence_duration,
        }
    }
}

impl super::Emitter for ToneEmitter {
    fn sound(&mut self, pitch: Pitch, bend: Bend) -> Result<(), Error> {
        let command = ToneCommand {
            frequency: frequency(&self.tuning, pitch, bend),
            duration: self.timing.duration,
        };
        debug!(
            session = self.session.to_string(),
            pitch,
            bend,
            command = command.to_string(),
            "Sounding tone."
        );
        Ok(self.session.run(&command)?)
    }

    fn silence(&mut self, pitch: Pitch) -> Result<(), Error> {
        debug!(session = self.session.to_string(), pitch, "Silencing tone.");
        Ok(self.session.run(&self.silence_command())?)
    }

    fn silence_all(&mut self) -> Result<(), Error> {
        Ok(self.session.run(&self.silence_command())?)
    }
}
