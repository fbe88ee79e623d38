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
use std::{error::Error, sync::Arc};

use tokio::{
    sync::mpsc::{self, Receiver},
    task::{JoinError, JoinHandle},
};
use tracing::{error, info, span, warn, Level};

use crate::{
    midi::{self, Event},
    pipeline::Pipeline,
};

/// Plays the events of a MIDI device through a pipeline. Events are handled
/// one at a time on a dedicated thread, each one to completion before the
/// next is accepted.
pub struct Performer {
    device: Arc<dyn midi::Device>,
    handle: JoinHandle<()>,
}

impl Performer {
    /// Starts watching the device and playing its events.
    pub fn new(
        pipeline: Pipeline,
        device: Arc<dyn midi::Device>,
    ) -> Result<Performer, Box<dyn Error>> {
        // A single slot: the device waits while an event is being played.
        let (events_tx, events_rx) = mpsc::channel::<Vec<u8>>(1);
        device.watch_events(events_tx)?;

        info!(device = device.to_string(), "Performer started.");
        Ok(Performer {
            device,
            handle: tokio::task::spawn_blocking(move || Performer::perform(pipeline, events_rx)),
        })
    }

    /// Stops watching the device. Once the remaining events are played,
    /// every voice is silenced and the performer finishes.
    pub fn stop(&self) {
        info!("Stopping performer.");
        self.device.stop_watch_events();
    }

    /// Join will block until the performer finishes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    fn perform(mut pipeline: Pipeline, mut events_rx: Receiver<Vec<u8>>) {
        let span = span!(Level::INFO, "performer");
        let _enter = span.enter();

        while let Some(raw_event) = events_rx.blocking_recv() {
            let event = match Event::parse(&raw_event) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    warn!(err = e.to_string(), "Dropping malformed event.");
                    continue;
                }
            };

            if let Err(e) = pipeline.process(event) {
                error!(
                    err = e.to_string(),
                    event = format!("{:?}", event),
                    "Error playing event."
                );
            }
        }

        info!("MIDI watcher closed.");
        if let Err(e) = pipeline.silence_all() {
            error!(err = e.to_string(), "Error silencing voices.");
        }
    }
}
