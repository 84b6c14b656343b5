mod cli;

use std::error::Error;
use std::{io, process, thread};

use clap::Parser;
use paknob::Client;
use signal_hook::consts::signal::{SIGINT, SIGPIPE, SIGTERM};
use signal_hook::iterator::Signals;

use crate::cli::{Cli, Command};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    install_signal_handlers()?;

    let client = Client::connect("paknob");
    let kind = args.command.device_kind();

    let line = match args.command {
        Command::GetSinkVolume | Command::GetSourceVolume => client.volume(kind)?.to_string(),
        Command::SetSinkVolume { percent } | Command::SetSourceVolume { percent } => {
            client.set_volume(kind, percent)?.to_string()
        }
        Command::IncrementSinkVolume { percent } | Command::IncrementSourceVolume { percent } => {
            client.adjust_volume(kind, percent.as_increment())?.to_string()
        }
        Command::DecrementSinkVolume { percent } | Command::DecrementSourceVolume { percent } => {
            client.adjust_volume(kind, percent.as_decrement())?.to_string()
        }
        Command::GetSinkMute | Command::GetSourceMute => {
            let muted = client.mute(kind)?;
            String::from(if muted { "1" } else { "0" })
        }
        Command::SetSinkMute { mute } | Command::SetSourceMute { mute } => {
            client.set_mute(kind, mute.into())?.to_string()
        }
        Command::ToggleSinkMute | Command::ToggleSourceMute => {
            client.toggle_mute(kind)?.to_string()
        }
    };

    println!("{line}");
    Ok(())
}

/// SIGINT/SIGTERM are a clean shutdown, not an error. SIGPIPE is ignored so a
/// closed server socket surfaces as an ordinary I/O failure instead of killing
/// the process.
fn install_signal_handlers() -> io::Result<()> {
    unsafe { libc::signal(SIGPIPE, libc::SIG_IGN) };

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    thread::spawn(move || {
        if signals.forever().next().is_some() {
            process::exit(0);
        }
    });

    Ok(())
}
