//! Command line surface: argument dispatch and the text printed for each outcome.

use std::io::{self, Write};

use log::debug;
use structopt::{clap::AppSettings, StructOpt};

use crate::{apply_mode, available_modes, DisplayMode, DisplaySettingsApi};

pub const LIST_HEADER: &str = "Available screen resolutions and refresh rates:";
pub const APPLY_SUCCEEDED: &str = "Screen resolution and refresh rate successfully changed.";
pub const APPLY_FAILED: &str = "Error: Unable to change the screen resolution and refresh rate.";
pub const INVALID_FORMAT: &str = "Invalid input format. Example: 1920x1080@60";
pub const INVALID_ARGUMENTS: &str = "Invalid arguments.";

/// Every token after the program name lands in `args` untouched, hyphens included; the tool has
/// no flags of its own.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "dispmode",
    about = "Lists the display modes of the primary display, or switches to one of them.",
    settings = &[
        AppSettings::TrailingVarArg,
        AppSettings::AllowLeadingHyphen,
        AppSettings::DisableHelpFlags,
        AppSettings::DisableVersion,
    ]
)]
pub struct Opt {
    /// `list`, or a mode such as `1920x1080@60`
    #[structopt(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// What a command line asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Apply(DisplayMode),
    InvalidFormat,
    InvalidArguments,
}

impl Command {
    pub fn from_args(args: &[String]) -> Command {
        match args {
            [] => Command::List,
            [arg] if arg.eq_ignore_ascii_case("list") => Command::List,
            [arg] => match arg.parse() {
                Ok(mode) => Command::Apply(mode),
                Err(err) => {
                    debug!("Could not parse `{}`: {}", arg, err);
                    Command::InvalidFormat
                }
            },
            _ => Command::InvalidArguments,
        }
    }
}

/// Runs `command` against `api`, writing the result to `out`.
///
/// Every outcome is reported as text; only a failed write is an error.
pub fn run<A, W>(api: &A, command: &Command, out: &mut W) -> io::Result<()>
where
    A: DisplaySettingsApi + ?Sized,
    W: Write + ?Sized,
{
    match command {
        Command::List => {
            writeln!(out, "{}", LIST_HEADER)?;
            for mode in available_modes(api) {
                writeln!(out, "{}", mode)?;
            }
        }
        Command::Apply(mode) => match apply_mode(api, *mode) {
            Ok(_) => writeln!(out, "{}", APPLY_SUCCEEDED)?,
            Err(err) => {
                debug!("Apply failed: {}", err);
                writeln!(out, "{}", APPLY_FAILED)?
            }
        },
        Command::InvalidFormat => writeln!(out, "{}", INVALID_FORMAT)?,
        Command::InvalidArguments => writeln!(out, "{}", INVALID_ARGUMENTS)?,
    }
    Ok(())
}
