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
//! Tone generation stages.
//!
//! A performance is turned into tone commands by a chain of stages that all
//! speak the same [`Emitter`] contract. Each stage owns the next one:
//!
//! ```text
//! NoteStack ──▶ Throttle ──▶ ToneEmitter ──▶ remote session
//! VoiceAllocator ──▶ [Throttle ──▶ ToneEmitter] × N
//! ```
use std::{fmt, time::Duration};

use crate::session;

pub mod emitter;
#[cfg(test)]
mod mock;
pub mod notestack;
pub mod throttle;
pub mod voices;

pub use emitter::ToneEmitter;
pub use notestack::NoteStack;
pub use throttle::Throttle;
pub use voices::{OverflowPolicy, VoiceAllocator};

/// A note identifier, e.g. a piano key number. Non-positive values never
/// represent a held note.
pub type Pitch = i32;

/// A pitch bend control value.
pub type Bend = i32;

/// The sentinel pitch. Sounding it is a bend-only update.
pub const NO_PITCH: Pitch = 0;

/// Returns true if the pitch can represent a held note.
pub fn is_held_pitch(pitch: Pitch) -> bool {
    pitch > NO_PITCH
}

/// Errors that can occur while emitting tones.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("remote session error: {0}")]
    Transport(#[from] session::Error),

    #[error("no free voice for pitch {pitch}, all {voices} voices are in use")]
    Overflow { pitch: Pitch, voices: usize },
}

/// Implemented by every stage of the tone pipeline.
pub trait Emitter {
    /// Sounds the given pitch at the given bend. Stages that track held
    /// pitches treat a non-positive pitch as a bend-only update.
    fn sound(&mut self, pitch: Pitch, bend: Bend) -> Result<(), Error>;

    /// Stops sounding the given pitch. Stages that track held pitches
    /// treat this as the pitch being released.
    fn silence(&mut self, pitch: Pitch) -> Result<(), Error>;

    /// Stops everything this stage is sounding and forgets any held pitches.
    fn silence_all(&mut self) -> Result<(), Error>;
}

impl<E: Emitter + ?Sized> Emitter for Box<E> {
    fn sound(&mut self, pitch: Pitch, bend: Bend) -> Result<(), Error> {
        (**self).sound(pitch, bend)
    }

    fn silence(&mut self, pitch: Pitch) -> Result<(), Error> {
        (**self).silence(pitch)
    }

    fn silence_all(&mut self) -> Result<(), Error> {
        (**self).silence_all()
    }
}

/// The tuning used to turn pitches and bends into frequencies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// The bend value that represents no deviation.
    pub bend_center: Bend,
    /// The number of bend units per semitone.
    pub bend_range: Bend,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            bend_center: 8192,
            bend_range: 4096,
        }
    }
}

/// Computes the equal temperament frequency of the pitch at the given bend.
/// Pitch 69 at the bend center is A4 (440 Hz).
pub fn frequency(tuning: &Tuning, pitch: Pitch, bend: Bend) -> f64 {
    let semitones = f64::from(pitch - 69) / 12.0;
    let deviation = f64::from(bend - tuning.bend_center) / (f64::from(tuning.bend_range) * 12.0);
    440.0 * 2f64.powf(semitones + deviation)
}

/// A single command sent to a remote beeper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneCommand {
    /// The frequency to sound in Hz.
    pub frequency: f64,
    /// How long the device should sound it.
    pub duration: Duration,
}

impl fmt::Display for ToneCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} Hz for {:.3}s",
            self.frequency,
            self.duration.as_secs_f64()
        )
    }
}
