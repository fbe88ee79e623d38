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
use std::{fmt, process::ExitStatus};

use crate::{config, tone::ToneCommand};

mod mock;
mod ssh;

/// Errors reported by a remote session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to reach remote client: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote command failed ({status}): {stderr}")]
    Command { status: ExitStatus, stderr: String },

    #[error("session {0} is unavailable")]
    Unavailable(String),
}

/// An established session with a remote beeper. Sessions are owned by a
/// single tone emitter and are never shared.
pub trait Session: fmt::Display + Send {
    /// Runs the tone command on the remote device. Returns once the device
    /// has accepted the command.
    fn run(&self, command: &ToneCommand) -> Result<(), Error>;
}

/// Encodes a tone command as a beep command line.
pub fn encode(command: &ToneCommand) -> String {
    format!(
        "beep frequency={:.6} length={:.6}",
        command.frequency,
        command.duration.as_secs_f64()
    )
}

/// Gets a session for the given voice.
pub fn get(voice: &config::Voice) -> Box<dyn Session> {
    if voice.host().starts_with("mock") {
        return Box::new(mock::Session::get(voice.host()));
    }

    Box::new(ssh::Session::new(voice.host(), voice.port(), voice.user()))
}

#[cfg(test)]
pub mod test {
    use std::time::Duration;

    pub use super::mock::Session;

    use super::encode;
    use crate::tone::ToneCommand;

    #[test]
    fn encodes_beep() {
        let command = ToneCommand {
            frequency: 440.0,
            duration: Duration::from_secs(10),
        };
        assert_eq!(
            "beep frequency=440.000000 length=10.000000",
            encode(&command)
        );

        let command = ToneCommand {
            frequency: 20.0,
            duration: Duration::from_millis(1),
        };
        assert_eq!("beep frequency=20.000000 length=0.001000", encode(&command));
    }
}
