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
use std::sync::{Arc, Mutex};

use super::{Bend, Error, Pitch};
use crate::session;

/// A call received by the mock emitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Sound(Pitch, Bend),
    Silence(Pitch),
    SilenceAll,
}

/// A mock emitter. Records every call it receives and can be told to fail.
#[derive(Clone, Default)]
pub struct Emitter {
    calls: Arc<Mutex<Vec<Call>>>,
    failing: Arc<Mutex<bool>>,
}

impl Emitter {
    /// Creates a new mock emitter.
    pub fn new() -> Emitter {
        Emitter::default()
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("unable to get calls lock").clone()
    }

    /// Returns and forgets every call received so far.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().expect("unable to get calls lock"))
    }

    /// Makes subsequent calls fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().expect("unable to get failing lock") = failing;
    }

    fn record(&self, call: Call) -> Result<(), Error> {
        if *self.failing.lock().expect("unable to get failing lock") {
            return Err(session::Error::Unavailable("mock emitter".to_string()).into());
        }
        self.calls.lock().expect("unable to get calls lock").push(call);
        Ok(())
    }
}

impl super::Emitter for Emitter {
    fn sound(&mut self, pitch: Pitch, bend: Bend) -> Result<(), Error> {
        self.record(Call::Sound(pitch, bend))
    }

    fn silence(&mut self, pitch: Pitch) -> Result<(), Error> {
        self.record(Call::Silence(pitch))
    }

    fn silence_all(&mut self) -> Result<(), Error> {
        self.record(Call::SilenceAll)
    }
}
