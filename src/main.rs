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
mod config;
mod midi;
mod performer;
mod pipeline;
mod session;
mod tone;

use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Instrument;
use crate::performer::Performer;
use crate::pipeline::Pipeline;

const SYSTEMD_SERVICE: &str = r#"
[Unit]
Description=MIDI beeper instrument
After=network-online.target

[Service]
Type=simple
Restart=on-failure
EnvironmentFile=-/etc/default/miditone
ExecStart=/usr/local/bin/miditone start "$MIDITONE_CONFIG"

[Install]
WantedBy=multi-user.target
Alias=miditone.service
"#;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Plays a MIDI keyboard through remote beepers."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the available MIDI input devices.
    MidiDevices {},
    /// Plays the startup chime through every configured voice and exits.
    Chime {
        /// The path to the instrument config.
        config_path: String,
    },
    /// Start will play the MIDI device through the configured voices until interrupted.
    Start {
        /// The path to the instrument config.
        config_path: String,
    },
    /// Prints a systemd service definition to stdout.
    Systemd {},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::MidiDevices {} => {
            let devices = midi::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Chime { config_path } => {
            let instrument = Instrument::deserialize(&PathBuf::from(config_path))?;
            let mut pipeline = Pipeline::from_config(&instrument)?;
            tokio::task::spawn_blocking(move || pipeline.chime()).await??;
        }
        Commands::Start { config_path } => {
            let instrument = Instrument::deserialize(&PathBuf::from(config_path))?;
            let mut pipeline = Pipeline::from_config(&instrument)?;
            if instrument.startup_chime() {
                pipeline = tokio::task::spawn_blocking(move || {
                    pipeline.chime().map(|_| pipeline)
                })
                .await??;
            }

            let device = midi::get_device(instrument.midi_device())?;
            let mut performer = Performer::new(pipeline, device)?;

            tokio::signal::ctrl_c().await?;
            info!("Interrupted, shutting down.");
            performer.stop();
            performer.join().await?;
        }
        Commands::Systemd {} => {
            println!("{}", SYSTEMD_SERVICE)
        }
    }

    Ok(())
}
