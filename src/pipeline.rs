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
use std::{thread, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    config::{ConfigError, Instrument},
    midi::Event,
    session,
    tone::{
        self, emitter::ToneTiming, Bend, Emitter, NoteStack, OverflowPolicy, Pitch, Throttle,
        ToneEmitter, Tuning, VoiceAllocator, NO_PITCH,
    },
};

/// The chime played once the voices are ready.
const CHIME: [(Pitch, Duration); 3] = [
    (60, Duration::from_millis(100)),
    (64, Duration::from_millis(100)),
    (67, Duration::from_millis(500)),
];

/// The settings every stage of the pipeline is built from.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub tuning: Tuning,
    pub timing: ToneTiming,
    pub bend_threshold: u32,
    pub overflow: OverflowPolicy,
}

impl Settings {
    /// Gets the pipeline settings from the instrument configuration.
    pub fn from_config(config: &Instrument) -> Result<Settings, ConfigError> {
        Ok(Settings {
            tuning: config.tuning(),
            timing: config.timing()?,
            bend_threshold: config.bend_threshold(),
            overflow: config.overflow(),
        })
    }
}

/// Turns performance events into tone commands.
pub struct Pipeline {
    entry: Box<dyn Emitter + Send>,
    bend: Bend,
}

impl Pipeline {
    /// Builds a pipeline over the given sessions, one per voice. A single
    /// session plays the highest held pitch; more sessions play each held
    /// pitch on its own voice.
    pub fn new(sessions: Vec<Box<dyn session::Session>>, settings: Settings) -> Pipeline {
        let mut voices: Vec<Throttle<ToneEmitter>> = sessions
            .into_iter()
            .map(|session| {
                Throttle::new(
                    ToneEmitter::new(session, settings.tuning, settings.timing),
                    settings.bend_threshold,
                    settings.tuning.bend_center,
                )
            })
            .collect();

        let entry: Box<dyn Emitter + Send> = if voices.len() == 1 {
            info!("Building monophonic pipeline.");
            Box::new(NoteStack::new(voices.remove(0), settings.tuning.bend_center))
        } else {
            info!(
                voices = voices.len(),
                overflow = ?settings.overflow,
                "Building polyphonic pipeline."
            );
            Box::new(VoiceAllocator::new(voices, settings.overflow))
        };

        Pipeline {
            entry,
            bend: settings.tuning.bend_center,
        }
    }

    /// Builds a pipeline from the instrument configuration.
    pub fn from_config(config: &Instrument) -> Result<Pipeline, ConfigError> {
        let sessions = config.voices().iter().map(session::get).collect();
        Ok(Pipeline::new(sessions, Settings::from_config(config)?))
    }

    /// Processes a single performance event.
    pub fn process(&mut self, event: Event) -> Result<(), tone::Error> {
        debug!(event = ?event, "Processing event.");
        match event {
            Event::NoteOn { pitch, .. } => self.entry.sound(pitch, self.bend),
            Event::NoteOff { pitch, .. } => self.entry.silence(pitch),
            Event::PitchBend { value, .. } => {
                self.bend = value;
                self.entry.sound(NO_PITCH, value)
            }
        }
    }

    /// Plays a short rising arpeggio one pitch at a time, then silences
    /// everything. Voices are silenced even if the arpeggio fails.
    pub fn chime(&mut self) -> Result<(), tone::Error> {
        let mut result = Ok(());
        for (pitch, pause) in CHIME {
            if let Err(e) = self.chime_pitch(pitch, pause) {
                warn!(pitch, err = %e, "Unable to play chime.");
                result = Err(e);
                break;
            }
        }
        let silenced = self.silence_all();
        result.and(silenced)
    }

    fn chime_pitch(&mut self, pitch: Pitch, pause: Duration) -> Result<(), tone::Error> {
        self.entry.sound(pitch, self.bend)?;
        thread::sleep(pause);
        self.entry.silence(pitch)
    }

    /// Silences every voice and forgets every held pitch.
    pub fn silence_all(&mut self) -> Result<(), tone::Error> {
        info!("Silencing all voices.");
        self.entry.silence_all()
    }
}
