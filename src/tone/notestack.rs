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
use std::collections::BTreeSet;

use tracing::debug;

use super::{is_held_pitch, Bend, Emitter, Error, Pitch};

/// Tracks held pitches and sounds only the highest one. Releasing the
/// highest pitch falls back to the next highest at the last known bend.
pub struct NoteStack<E: Emitter> {
    inner: E,
    held: BTreeSet<Pitch>,
    bend: Bend,
}

impl<E: Emitter> NoteStack<E> {
    /// Creates a new note stack around the inner emitter.
    pub fn new(inner: E, bend_center: Bend) -> NoteStack<E> {
        NoteStack {
            inner,
            held: BTreeSet::new(),
            bend: bend_center,
        }
    }

    /// The pitch that is currently sounding, if any.
    pub fn active(&self) -> Option<Pitch> {
        self.held.last().copied()
    }

    #[cfg(test)]
    pub fn held(&self) -> Vec<Pitch> {
        self.held.iter().copied().collect()
    }
}

impl<E: Emitter> Emitter for NoteStack<E> {
    fn sound(&mut self, pitch: Pitch, bend: Bend) -> Result<(), Error> {
        self.bend = bend;
        if is_held_pitch(pitch) {
            self.held.insert(pitch);
        }

        match self.active() {
            Some(active) => self.inner.sound(active, bend),
            None => Ok(()),
        }
    }

    fn silence(&mut self, pitch: Pitch) -> Result<(), Error> {
        self.held.remove(&pitch);
        debug!(pitch, remaining = ?self.held, "Released pitch.");

        match self.active() {
            Some(active) => self.inner.sound(active, self.bend),
            None => self.inner.silence(pitch),
        }
    }

    fn silence_all(&mut self) -> Result<(), Error> {
        self.held.clear();
        self.inner.silence_all()
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use super::NoteStack;
    use crate::tone::{
        test::{Call, Emitter as MockEmitter},
        Emitter, Throttle, NO_PITCH,
    };

    fn stack() -> (NoteStack<MockEmitter>, MockEmitter) {
        let mock = MockEmitter::new();
        (NoteStack::new(mock.clone(), 8192), mock)
    }

    #[test]
    fn highest_pitch_wins() -> Result<(), Box<dyn Error>> {
        let (mut stack, mock) = stack();

        stack.sound(60, 8192)?;
        stack.sound(64, 8192)?;
        stack.sound(62, 8192)?;
        assert_eq!(Some(64), stack.active());
        assert_eq!(vec![60, 62, 64], stack.held());
        assert_eq!(
            vec![
                Call::Sound(60, 8192),
                Call::Sound(64, 8192),
                Call::Sound(64, 8192)
            ],
            mock.take_calls()
        );
        Ok(())
    }

    #[test]
    fn release_falls_back_to_next_highest() -> Result<(), Box<dyn Error>> {
        let (mut stack, mock) = stack();

        stack.sound(60, 8192)?;
        stack.sound(64, 8192)?;
        stack.sound(NO_PITCH, 9000)?;
        mock.take_calls();

        stack.silence(64)?;
        assert_eq!(vec![Call::Sound(60, 9000)], mock.take_calls());
        stack.silence(60)?;
        assert_eq!(vec![Call::Silence(60)], mock.take_calls());
        assert!(stack.held().is_empty());
        Ok(())
    }

    #[test]
    fn bend_without_held_pitch_is_quiet() -> Result<(), Box<dyn Error>> {
        let (mut stack, mock) = stack();

        stack.sound(NO_PITCH, 9000)?;
        stack.sound(-3, 9100)?;
        assert!(mock.calls().is_empty());

        // The bend is remembered for the next release.
        stack.sound(60, 9100)?;
        stack.sound(62, 9100)?;
        stack.silence(62)?;
        assert_eq!(Call::Sound(60, 9100), *mock.calls().last().unwrap());
        Ok(())
    }

    #[test]
    fn duplicate_presses_are_held_once() -> Result<(), Box<dyn Error>> {
        let (mut stack, mock) = stack();

        stack.sound(60, 8192)?;
        stack.sound(60, 8192)?;
        stack.silence(60)?;
        assert!(stack.held().is_empty());
        assert_eq!(Call::Silence(60), *mock.calls().last().unwrap());
        Ok(())
    }

    #[test]
    fn releasing_unheld_pitch() -> Result<(), Box<dyn Error>> {
        let (mut stack, mock) = stack();

        stack.sound(60, 8192)?;
        mock.take_calls();
        stack.silence(72)?;
        assert_eq!(vec![60], stack.held());
        assert_eq!(vec![Call::Sound(60, 8192)], mock.take_calls());
        Ok(())
    }

    #[test]
    fn held_set_matches_presses() -> Result<(), Box<dyn Error>> {
        let (mut stack, mock) = stack();
        let presses = [(true, 48), (true, 72), (true, 55), (false, 72), (true, 60)];
        let mut expected: Vec<i32> = Vec::new();

        for (press, pitch) in presses {
            if press {
                stack.sound(pitch, 8192)?;
                expected.push(pitch);
            } else {
                stack.silence(pitch)?;
                expected.retain(|held| *held != pitch);
            }
            expected.sort();
            assert_eq!(expected, stack.held());
            if let Some(Call::Sound(sounding, _)) = mock.calls().last() {
                assert_eq!(expected.last(), Some(sounding));
            }
        }
        Ok(())
    }

    #[test]
    fn non_topmost_release_sends_nothing_through_throttle() -> Result<(), Box<dyn Error>> {
        let mock = MockEmitter::new();
        let mut stack = NoteStack::new(Throttle::new(mock.clone(), 700, 8192), 8192);

        stack.sound(60, 8192)?;
        stack.sound(64, 8192)?;
        stack.silence(60)?;
        assert_eq!(
            vec![Call::Sound(60, 8192), Call::Sound(64, 8192)],
            mock.take_calls()
        );

        stack.silence(64)?;
        assert_eq!(vec![Call::Silence(64)], mock.take_calls());
        Ok(())
    }
}
