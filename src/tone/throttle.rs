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
use tracing::debug;

use super::{Bend, Emitter, Error, Pitch, NO_PITCH};

/// Limits the tone updates forwarded to the inner emitter. A tone is only
/// re-sent for the same pitch once the bend has drifted by at least the
/// threshold since the last forwarded update, so bend wheels can't flood the
/// remote session.
pub struct Throttle<E: Emitter> {
    inner: E,
    threshold: u32,
    last_pitch: Pitch,
    last_bend: Bend,
    /// Absolute bend drift since the last update that crossed the threshold.
    drift: u32,
}

impl<E: Emitter> Throttle<E> {
    /// Creates a new throttle around the inner emitter.
    pub fn new(inner: E, threshold: u32, bend_center: Bend) -> Throttle<E> {
        Throttle {
            inner,
            threshold,
            last_pitch: NO_PITCH,
            last_bend: bend_center,
            drift: 0,
        }
    }

    #[cfg(test)]
    pub fn drift(&self) -> u32 {
        self.drift
    }
}

impl<E: Emitter> Emitter for Throttle<E> {
    fn sound(&mut self, pitch: Pitch, bend: Bend) -> Result<(), Error> {
        self.drift = self.drift.saturating_add(self.last_bend.abs_diff(bend));
        self.last_bend = bend;

        if pitch == self.last_pitch && self.drift < self.threshold {
            debug!(pitch, bend, drift = self.drift, "Throttled tone update.");
            return Ok(());
        }

        self.inner.sound(pitch, bend)?;
        self.last_pitch = pitch;

        if self.drift >= self.threshold {
            self.drift = 0;
        }

        Ok(())
    }

    fn silence(&mut self, pitch: Pitch) -> Result<(), Error> {
        self.last_pitch = NO_PITCH;
        self.inner.silence(pitch)
    }

    fn silence_all(&mut self) -> Result<(), Error> {
        self.last_pitch = NO_PITCH;
        self.inner.silence_all()
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use super::Throttle;
    use crate::tone::{
        test::{Call, Emitter as MockEmitter},
        Emitter,
    };

    fn throttle() -> (Throttle<MockEmitter>, MockEmitter) {
        let mock = MockEmitter::new();
        (Throttle::new(mock.clone(), 700, 8192), mock)
    }

    #[test]
    fn small_bends_are_suppressed() -> Result<(), Box<dyn Error>> {
        let (mut throttle, mock) = throttle();

        throttle.sound(60, 8192)?;
        for bend in [8292, 8392, 8492, 8592, 8692, 8792] {
            throttle.sound(60, bend)?;
        }
        assert_eq!(600, throttle.drift());
        assert_eq!(vec![Call::Sound(60, 8192)], mock.take_calls());

        // Crossing the threshold forwards exactly once and resets the drift.
        throttle.sound(60, 8892)?;
        assert_eq!(vec![Call::Sound(60, 8892)], mock.take_calls());
        assert_eq!(0, throttle.drift());

        throttle.sound(60, 8992)?;
        assert!(mock.take_calls().is_empty());
        Ok(())
    }

    #[test]
    fn drift_counts_both_directions() -> Result<(), Box<dyn Error>> {
        let (mut throttle, mock) = throttle();

        throttle.sound(60, 8192)?;
        throttle.sound(60, 8492)?;
        throttle.sound(60, 8192)?;
        assert!(mock.take_calls().len() == 1);

        throttle.sound(60, 8292)?;
        assert_eq!(vec![Call::Sound(60, 8292)], mock.take_calls());
        Ok(())
    }

    #[test]
    fn pitch_change_always_forwards() -> Result<(), Box<dyn Error>> {
        let (mut throttle, mock) = throttle();

        throttle.sound(60, 8192)?;
        throttle.sound(64, 8192)?;
        throttle.sound(60, 8200)?;
        assert_eq!(
            vec![
                Call::Sound(60, 8192),
                Call::Sound(64, 8192),
                Call::Sound(60, 8200)
            ],
            mock.take_calls()
        );
        // A pitch change below the threshold keeps the accumulated drift.
        assert_eq!(8, throttle.drift());
        Ok(())
    }

    #[test]
    fn silence_resets_pitch() -> Result<(), Box<dyn Error>> {
        let (mut throttle, mock) = throttle();

        throttle.sound(60, 8192)?;
        throttle.silence(60)?;
        throttle.sound(60, 8192)?;
        assert_eq!(
            vec![Call::Sound(60, 8192), Call::Silence(60), Call::Sound(60, 8192)],
            mock.take_calls()
        );
        Ok(())
    }

    #[test]
    fn failed_update_is_retried() -> Result<(), Box<dyn Error>> {
        let (mut throttle, mock) = throttle();

        mock.set_failing(true);
        assert!(throttle.sound(60, 8192).is_err());
        mock.set_failing(false);

        throttle.sound(60, 8192)?;
        assert_eq!(vec![Call::Sound(60, 8192)], mock.take_calls());
        Ok(())
    }
}
