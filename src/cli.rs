//! Command-line argument parsing.

use std::path::PathBuf;

use am_master::MixerConfig;
use clap::{Parser, Subcommand};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ambimix")]
#[command(about = "Eight-channel looping ambient noise mixer", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the audio device and mix all profiles, reading volume commands from stdin
    Play {
        #[command(flatten)]
        mix: MixOptions,
    },
    /// Write one profile's loop to a 16-bit WAV file
    Render {
        /// Profile name, e.g. "Ocean Waves"
        profile: String,
        /// Output WAV path
        output: PathBuf,
        #[command(flatten)]
        mix: MixOptions,
    },
}

/// Options shared by every subcommand.
#[derive(clap::Args, Debug)]
pub struct MixOptions {
    /// Directory holding the profile WAV files
    #[arg(long, value_name = "DIR", default_value = "sounds-wav")]
    pub sounds_dir: PathBuf,

    /// Length of synthesized loops
    #[arg(long, value_name = "SECONDS", default_value = "8.0")]
    pub duration: f32,

    /// Output channel count to request
    #[arg(long, value_name = "N", default_value = "2")]
    pub channels: u16,

    /// Seed for reproducible synthesis
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

impl MixOptions {
    pub fn config(&self) -> MixerConfig {
        MixerConfig {
            sounds_dir: self.sounds_dir.clone(),
            duration_secs: self.duration.max(0.0),
            requested_channels: self.channels.max(1),
            seed: self.seed,
            ..MixerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_defaults_match_mixer_defaults() {
        let args = Args::try_parse_from(["ambimix", "play"]).unwrap();
        let Command::Play { mix } = args.command else {
            panic!("expected play");
        };
        assert_eq!(mix.config(), MixerConfig::default());
    }

    #[test]
    fn render_takes_profile_with_spaces() {
        let args = Args::try_parse_from([
            "ambimix",
            "render",
            "Ocean Waves",
            "out.wav",
            "--channels",
            "1",
        ])
        .unwrap();
        match args.command {
            Command::Render { profile, output, mix } => {
                assert_eq!(profile, "Ocean Waves");
                assert_eq!(output, PathBuf::from("out.wav"));
                assert_eq!(mix.config().requested_channels, 1);
            }
            other => panic!("expected render, got {:?}", other),
        }
    }
}
