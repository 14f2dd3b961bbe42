//! ambimix: ambient noise mixer console.
//!
//! Usage:
//!   ambimix play [--sounds-dir DIR] [--duration SECONDS] [--channels N]
//!   ambimix render "Ocean Waves" waves.wav [--channels N]

mod cli;
mod console;

use std::io;
use std::sync::mpsc;

use am_master::{default_profiles, render_profile, write_wav, AmbientMixer, SoundProfile};
use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::cli::{Args, Command, MixOptions};
use crate::console::{Exit, Input};

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    match args.command {
        Command::Play { mix } => play(&mix),
        Command::Render {
            profile,
            output,
            mix,
        } => render(&profile, &output, &mix),
    }
}

fn init_logging() {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

fn play(mix: &MixOptions) -> Result<()> {
    let config = mix.config();
    let mut mixer = AmbientMixer::open_default(&default_profiles(), &config)
        .context("Could not start the audio device")?;

    let (tx, rx) = mpsc::channel();
    let interrupt = tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt.send(Input::Interrupt);
    })
    .context("Could not install the Ctrl-C handler")?;
    console::spawn_stdin(tx).context("Could not start the input thread")?;

    let mut stdout = io::stdout();
    let exit = console::run(&mixer, rx, &mut stdout);
    if let Ok(Exit::Interrupted) = exit {
        log::info!("Interrupted; shutting down");
    }

    mixer.shutdown();
    exit?;
    Ok(())
}

fn render(name: &str, output: &std::path::Path, mix: &MixOptions) -> Result<()> {
    let config = mix.config();
    let profiles = default_profiles();
    let Some(profile) = find_profile(&profiles, name) else {
        let names: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
        bail!("Unknown profile '{}'; expected one of: {}", name, names.join(", "));
    };

    let outcome = render_profile(profile, &config);
    let buffer = outcome.asset.buffer();
    write_wav(output, buffer).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} to {} ({} frames, {} ch, {})",
        profile.name,
        output.display(),
        buffer.frames(),
        buffer.channels(),
        if outcome.asset.is_synthesized() { "synthesized" } else { "from file" }
    );
    Ok(())
}

fn find_profile<'a>(profiles: &'a [SoundProfile], name: &str) -> Option<&'a SoundProfile> {
    profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
