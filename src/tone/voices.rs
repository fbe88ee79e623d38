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
//! Voice allocation for polyphonic output.
//!
//! Each voice is a separate emitter, usually a separate physical beeper.
//! Newly pressed pitches take the lowest free voice; releasing a pitch
//! silences and frees its voice.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{is_held_pitch, Bend, Emitter, Error, Pitch};

/// What happens when a pitch is pressed while every voice is in use.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// The pitch is not sounded and an overflow error is returned.
    #[default]
    Drop,
    /// The voice that was assigned longest ago is silenced and reused.
    Steal,
}

/// A physical voice and whether it is in use.
struct VoiceSlot<E: Emitter> {
    emitter: E,
    in_use: bool,
    /// Allocation counter value when the voice was last assigned.
    assigned_at: u64,
}

/// Assigns pitches to a fixed pool of voices.
pub struct VoiceAllocator<E: Emitter> {
    slots: Vec<VoiceSlot<E>>,
    /// Pitch to slot index.
    assignments: BTreeMap<Pitch, usize>,
    policy: OverflowPolicy,
    allocations: u64,
}

impl<E: Emitter> VoiceAllocator<E> {
    /// Creates a new voice allocator over the given voices.
    pub fn new(voices: Vec<E>, policy: OverflowPolicy) -> VoiceAllocator<E> {
        VoiceAllocator {
            slots: voices
                .into_iter()
                .map(|emitter| VoiceSlot {
                    emitter,
                    in_use: false,
                    assigned_at: 0,
                })
                .collect(),
            assignments: BTreeMap::new(),
            policy,
            allocations: 0,
        }
    }

    /// Returns the number of voices currently sounding a pitch.
    pub fn active_count(&self) -> usize {
        self.assignments.len()
    }

    /// Returns the voice index assigned to the pitch, if any.
    pub fn voice_for(&self, pitch: Pitch) -> Option<usize> {
        self.assignments.get(&pitch).copied()
    }

    /// Finds a voice for a pitch that has none.
    fn allocate(&mut self, pitch: Pitch) -> Result<usize, Error> {
        if let Some(free) = self.slots.iter().position(|slot| !slot.in_use) {
            return Ok(free);
        }

        match self.policy {
            OverflowPolicy::Drop => {
                warn!(pitch, voices = self.slots.len(), "No free voice, dropping.");
                Err(Error::Overflow {
                    pitch,
                    voices: self.slots.len(),
                })
            }
            OverflowPolicy::Steal => {
                let (&stolen_pitch, &index) = self
                    .assignments
                    .iter()
                    .min_by_key(|(_, index)| self.slots[**index].assigned_at)
                    .ok_or(Error::Overflow {
                        pitch,
                        voices: self.slots.len(),
                    })?;
                warn!(pitch, stolen_pitch, voice = index, "No free voice, stealing.");
                self.release(stolen_pitch)?;
                Ok(index)
            }
        }
    }

    /// Silences and frees the voice of the pitch, if it has one.
    fn release(&mut self, pitch: Pitch) -> Result<(), Error> {
        let Some(index) = self.assignments.remove(&pitch) else {
            return Ok(());
        };
        let slot = &mut self.slots[index];
        slot.in_use = false;
        debug!(pitch, voice = index, "Freeing voice.");
        slot.emitter.silence(pitch)
    }
}

impl<E: Emitter> Emitter for VoiceAllocator<E> {
    fn sound(&mut self, pitch: Pitch, bend: Bend) -> Result<(), Error> {
        // A bend-only update retunes every sounding voice, even if one fails.
        if !is_held_pitch(pitch) {
            let mut result = Ok(());
            for (&pitch, &index) in self.assignments.iter() {
                if let Err(e) = self.slots[index].emitter.sound(pitch, bend) {
                    result = Err(e);
                }
            }
            return result;
        }

        if let Some(index) = self.voice_for(pitch) {
            return self.slots[index].emitter.sound(pitch, bend);
        }

        let index = self.allocate(pitch)?;
        self.allocations += 1;
        let slot = &mut self.slots[index];
        slot.in_use = true;
        slot.assigned_at = self.allocations;
        self.assignments.insert(pitch, index);
        debug!(
            pitch,
            voice = index,
            active = self.active_count(),
            "Assigned voice."
        );

        self.slots[index].emitter.sound(pitch, bend)
    }

    fn silence(&mut self, pitch: Pitch) -> Result<(), Error> {
        self.release(pitch)
    }

    fn silence_all(&mut self) -> Result<(), Error> {
        self.assignments.clear();
        // Every voice is silenced even if one of them fails.
        let mut result = Ok(());
        for slot in self.slots.iter_mut() {
            slot.in_use = false;
            if let Err(e) = slot.emitter.silence_all() {
                result = Err(e);
            }
        }
        result
    }
}
