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
use midly::{live::LiveEvent, MidiMessage};

use crate::tone::{Bend, Pitch};

/// A raw MIDI message that could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("malformed MIDI event {raw:02x?}: {source}")]
pub struct MalformedEvent {
    raw: Vec<u8>,
    source: midly::Error,
}

/// A performance event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    NoteOn {
        channel: u8,
        pitch: Pitch,
        velocity: u8,
    },
    NoteOff {
        channel: u8,
        pitch: Pitch,
    },
    PitchBend {
        channel: u8,
        value: Bend,
    },
}

impl Event {
    /// Decodes a raw MIDI message. Messages that aren't part of a
    /// performance (controllers, clock, sysex and so on) decode to None.
    pub fn parse(raw: &[u8]) -> Result<Option<Event>, MalformedEvent> {
        let event = LiveEvent::parse(raw).map_err(|source| MalformedEvent {
            raw: raw.to_vec(),
            source,
        })?;

        let LiveEvent::Midi { channel, message } = event else {
            return Ok(None);
        };
        let channel = channel.as_int();

        Ok(match message {
            // A note on without velocity is a note off.
            MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => Some(Event::NoteOff {
                channel,
                pitch: key.as_int().into(),
            }),
            MidiMessage::NoteOn { key, vel } => Some(Event::NoteOn {
                channel,
                pitch: key.as_int().into(),
                velocity: vel.as_int(),
            }),
            MidiMessage::NoteOff { key, .. } => Some(Event::NoteOff {
                channel,
                pitch: key.as_int().into(),
            }),
            MidiMessage::PitchBend { bend } => Some(Event::PitchBend {
                channel,
                value: bend.0.as_int().into(),
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use super::Event;

    #[test]
    fn note_on() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            Some(Event::NoteOn {
                channel: 0,
                pitch: 60,
                velocity: 100
            }),
            Event::parse(&[0x90, 60, 100])?
        );
        assert_eq!(
            Some(Event::NoteOn {
                channel: 9,
                pitch: 36,
                velocity: 1
            }),
            Event::parse(&[0x99, 36, 1])?
        );
        Ok(())
    }

    #[test]
    fn note_off() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            Some(Event::NoteOff {
                channel: 2,
                pitch: 64
            }),
            Event::parse(&[0x82, 64, 40])?
        );
        assert_eq!(
            Some(Event::NoteOff {
                channel: 0,
                pitch: 64
            }),
            Event::parse(&[0x90, 64, 0])?
        );
        Ok(())
    }

    #[test]
    fn pitch_bend() -> Result<(), Box<dyn Error>> {
        // 14 bit value, LSB first.
        assert_eq!(
            Some(Event::PitchBend {
                channel: 0,
                value: 8192
            }),
            Event::parse(&[0xE0, 0x00, 0x40])?
        );
        assert_eq!(
            Some(Event::PitchBend {
                channel: 0,
                value: 16383
            }),
            Event::parse(&[0xE0, 0x7F, 0x7F])?
        );
        Ok(())
    }

    #[test]
    fn other_messages_are_ignored() -> Result<(), Box<dyn Error>> {
        assert_eq!(None, Event::parse(&[0xB0, 7, 100])?);
        assert_eq!(None, Event::parse(&[0xF8])?);
        Ok(())
    }

    #[test]
    fn malformed() {
        assert!(Event::parse(&[]).is_err());
        assert!(Event::parse(&[0x90, 60]).is_err());
    }
}
