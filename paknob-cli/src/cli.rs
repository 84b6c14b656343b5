use std::str::FromStr;

use clap::{Parser, Subcommand};
use paknob::api::{DeviceKind, Percent, SignedPercent};

#[derive(Debug, Parser)]
#[command(name = "paknob", disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per knob, duplicated across the two default devices.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the default sink's average volume percentage
    GetSinkVolume,
    /// Set every channel of the default sink to the given percentage
    SetSinkVolume { percent: Percent },
    /// Raise the default sink's volume by the given percentage
    IncrementSinkVolume {
        #[arg(allow_hyphen_values = true)]
        percent: SignedPercent,
    },
    /// Lower the default sink's volume by the given percentage
    DecrementSinkVolume {
        #[arg(allow_hyphen_values = true)]
        percent: SignedPercent,
    },
    /// Print the default source's average volume percentage
    GetSourceVolume,
    /// Set every channel of the default source to the given percentage
    SetSourceVolume { percent: Percent },
    /// Raise the default source's volume by the given percentage
    IncrementSourceVolume {
        #[arg(allow_hyphen_values = true)]
        percent: SignedPercent,
    },
    /// Lower the default source's volume by the given percentage
    DecrementSourceVolume {
        #[arg(allow_hyphen_values = true)]
        percent: SignedPercent,
    },
    /// Print 1 if the default sink is muted, 0 otherwise
    GetSinkMute,
    /// Mute (1/true/yes/on) or unmute (0/false/no/off) the default sink
    SetSinkMute { mute: MuteFlag },
    /// Flip the default sink's mute flag
    ToggleSinkMute,
    /// Print 1 if the default source is muted, 0 otherwise
    GetSourceMute,
    /// Mute (1/true/yes/on) or unmute (0/false/no/off) the default source
    SetSourceMute { mute: MuteFlag },
    /// Flip the default source's mute flag
    ToggleSourceMute,
}

impl Command {
    pub fn device_kind(&self) -> DeviceKind {
        use Command::*;
        match self {
            GetSinkVolume | SetSinkVolume { .. } | IncrementSinkVolume { .. }
            | DecrementSinkVolume { .. } | GetSinkMute | SetSinkMute { .. } | ToggleSinkMute => {
                DeviceKind::Sink
            }
            GetSourceVolume | SetSourceVolume { .. } | IncrementSourceVolume { .. }
            | DecrementSourceVolume { .. } | GetSourceMute | SetSourceMute { .. }
            | ToggleSourceMute => DeviceKind::Source,
        }
    }
}

/// Boolean token as accepted by the set-mute subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuteFlag(pub bool);

impl From<MuteFlag> for bool {
    fn from(value: MuteFlag) -> Self {
        value.0
    }
}

impl FromStr for MuteFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(MuteFlag(true)),
            "0" | "false" | "no" | "off" => Ok(MuteFlag(false)),
            _ => Err(format!("not a boolean token: {s:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("paknob").chain(args.iter().copied()))
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn all_fourteen_subcommands_parse() {
        for args in [
            vec!["get-sink-volume"],
            vec!["set-sink-volume", "40"],
            vec!["increment-sink-volume", "5"],
            vec!["decrement-sink-volume", "5"],
            vec!["get-source-volume"],
            vec!["set-source-volume", "40"],
            vec!["increment-source-volume", "5"],
            vec!["decrement-source-volume", "5"],
            vec!["get-sink-mute"],
            vec!["set-sink-mute", "1"],
            vec!["toggle-sink-mute"],
            vec!["get-source-mute"],
            vec!["set-source-mute", "false"],
            vec!["toggle-source-mute"],
        ] {
            assert!(parse(&args).is_ok(), "failed to parse {args:?}");
        }
    }

    #[test]
    fn device_kind_follows_the_subcommand() {
        assert_eq!(
            parse(&["get-sink-volume"]).unwrap().command.device_kind(),
            DeviceKind::Sink
        );
        assert_eq!(
            parse(&["toggle-source-mute"]).unwrap().command.device_kind(),
            DeviceKind::Source
        );
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(parse(&["frobnicate"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn volume_arguments_are_validated() {
        assert!(parse(&["set-sink-volume", "abc"]).is_err());
        assert!(parse(&["set-sink-volume", "-1"]).is_err());
        assert!(parse(&["set-sink-volume", "4000000"]).is_err());
        assert!(parse(&["set-sink-volume"]).is_err());
        assert!(parse(&["set-sink-volume", "40", "50"]).is_err());
        assert!(parse(&["get-sink-volume", "40"]).is_err());
    }

    #[test]
    fn deltas_may_carry_a_leading_sign() {
        let cli = parse(&["increment-sink-volume", "-5"]).unwrap();
        match cli.command {
            Command::IncrementSinkVolume { percent } => {
                assert!(percent.as_increment().negative);
                assert!(!percent.as_decrement().negative);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn mute_arguments_are_validated() {
        assert!(parse(&["set-sink-mute", "true"]).is_ok());
        assert!(parse(&["set-sink-mute", "0"]).is_ok());
        assert!(parse(&["set-sink-mute", "2"]).is_err());
        assert!(parse(&["set-sink-mute", "maybe"]).is_err());
        assert!(parse(&["set-sink-mute"]).is_err());
    }
}
