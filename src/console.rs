//! Line-oriented volume control over stdin.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use am_master::{AmbientMixer, AudioOutput, VolumeChanged};

/// What the console loop consumes: stdin lines plus out-of-band events.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Line(String),
    /// Ctrl-C / SIGINT.
    Interrupt,
    Eof,
}

/// Why [`run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Interrupted,
    EndOfInput,
}

/// One parsed input line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `<channel name> <0..100>`; the name may contain spaces.
    SetVolume(VolumeChanged),
    List,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => Command::Empty,
        "list" | "ls" => Command::List,
        "quit" | "exit" | "q" => Command::Quit,
        _ => match line.rsplit_once(char::is_whitespace) {
            Some((name, value)) => match value.parse::<f32>() {
                Ok(value) => Command::SetVolume(VolumeChanged::new(name.trim_end(), value)),
                Err(_) => Command::Unknown(line.to_string()),
            },
            None => Command::Unknown(line.to_string()),
        },
    }
}

pub fn print_channels<O: AudioOutput>(
    mixer: &AmbientMixer<O>,
    out: &mut impl Write,
) -> io::Result<()> {
    for channel in mixer.channels() {
        let percent = mixer.gain_percent(channel.name()).unwrap_or(0);
        writeln!(out, "  {:<14} {:>3}%", channel.name(), percent)?;
    }
    Ok(())
}

/// Send each line of `reader` to `tx`, then [`Input::Eof`].
pub fn forward_lines(reader: impl BufRead, tx: &Sender<Input>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if tx.send(Input::Line(line)).is_err() {
                    return;
                }
            }
            Err(e) => {
                log::warn!("Error reading input: {}", e);
                break;
            }
        }
    }
    let _ = tx.send(Input::Eof);
}

/// Forward stdin on a background thread.
pub fn spawn_stdin(tx: Sender<Input>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || forward_lines(io::stdin().lock(), &tx))
}

/// Apply inputs until `quit`, an interrupt or end of input.
pub fn run<O: AudioOutput>(
    mixer: &AmbientMixer<O>,
    inputs: impl IntoIterator<Item = Input>,
    out: &mut impl Write,
) -> io::Result<Exit> {
    print_channels(mixer, out)?;
    writeln!(out, "Type '<channel> <0-100>', 'list' or 'quit'.")?;
    out.flush()?;

    for input in inputs {
        let line = match input {
            Input::Line(line) => line,
            Input::Interrupt => return Ok(Exit::Interrupted),
            Input::Eof => return Ok(Exit::EndOfInput),
        };
        match parse(&line) {
            Command::SetVolume(event) => {
                // Unknown channels are ignored without comment.
                if let Some(percent) = mixer.volume_changed(&event) {
                    writeln!(out, "{}: {}%", event.channel, percent)?;
                }
            }
            Command::List => print_channels(mixer, out)?,
            Command::Quit => return Ok(Exit::Quit),
            Command::Empty => {}
            Command::Unknown(text) => writeln!(out, "Unrecognized command: {}", text)?,
        }
        out.flush()?;
    }
    // Every sender is gone.
    Ok(Exit::EndOfInput)
}
