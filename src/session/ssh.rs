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
use std::{fmt, process::Command};

use tracing::{debug, span, Level};

use super::{encode, Error};
use crate::tone::ToneCommand;

/// How long the shared SSH master connection outlives the last command.
const CONTROL_PERSIST: &str = "ControlPersist=60";

/// A session that runs beep commands through the system OpenSSH client.
/// Authentication is whatever the client is configured for (keys, agent);
/// the first command opens a master connection that later commands reuse.
pub struct Session {
    host: String,
    port: u16,
    user: String,
}

impl Session {
    /// Creates a new SSH session for the given host.
    pub fn new(host: &str, port: u16, user: &str) -> Session {
        Session {
            host: host.to_string(),
            port,
            user: user.to_string(),
        }
    }

    fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

impl super::Session for Session {
    fn run(&self, command: &ToneCommand) -> Result<(), Error> {
        let span = span!(Level::DEBUG, "beep (ssh)");
        let _enter = span.enter();

        let cmd = encode(command);
        debug!(host = self.host, cmd, "Running beep command.");

        let output = Command::new("ssh")
            .args(["-p", &self.port.to_string()])
            .args(["-o", "BatchMode=yes"])
            .args(["-o", "ControlMaster=auto"])
            .args(["-o", "ControlPath=~/.ssh/miditone-%r@%h:%p"])
            .args(["-o", CONTROL_PERSIST])
            .arg(self.destination())
            .arg(&cmd)
            .output()?;

        if !output.status.success() {
            return Err(Error::Command {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} (SSH)", self.destination(), self.port)
    }
}
