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
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use tracing::debug;

use super::{encode, Error};
use crate::tone::ToneCommand;

/// A mock session. Doesn't actually beep anything.
#[derive(Clone)]
pub struct Session {
    name: String,
    commands: Arc<Mutex<Vec<ToneCommand>>>,
    failing: Arc<AtomicBool>,
}

impl Session {
    /// Gets the given mock session.
    pub fn get(name: &str) -> Session {
        Session {
            name: name.to_string(),
            commands: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    #[cfg(test)]
    /// Returns every command run so far.
    pub fn commands(&self) -> Vec<ToneCommand> {
        self.commands
            .lock()
            .expect("unable to get commands lock")
            .clone()
    }

    #[cfg(test)]
    /// Makes subsequent commands fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

impl super::Session for Session {
    fn run(&self, command: &ToneCommand) -> Result<(), Error> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(Error::Unavailable(self.name.clone()));
        }

        debug!(session = self.name, command = encode(command), "Mock beep.");
        self.commands
            .lock()
            .expect("unable to get commands lock")
            .push(*command);
        Ok(())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
