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
use serde::Deserialize;

const DEFAULT_PORT: u16 = 22;
const DEFAULT_USER: &str = "admin";

/// A YAML representation of a single voice, i.e. one remote beeper.
#[derive(Deserialize, Clone, Debug)]
pub struct Voice {
    /// The host of the beeper. Hosts starting with "mock" don't connect anywhere.
    host: String,

    /// The SSH port of the beeper.
    port: Option<u16>,

    /// The user to log in as.
    user: Option<String>,
}

impl Voice {
    /// Returns the host of the beeper.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the SSH port of the beeper.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Returns the user to log in as.
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_USER)
    }
}
