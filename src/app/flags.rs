// SPDX-License-Identifier: MPL-2.0
//! Command line flags.

use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: iced_gallery [OPTIONS] <DIRECTORY>

Options:
  --page-size <N>       Items per page (overrides settings.toml)
  --start-page <N>      Page to open first, zero-based [default: 0]
  --config-dir <DIR>    Directory holding settings.toml
  -h, --help            Print this help";

/// Launch options for the desktop gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    pub directory: PathBuf,
    pub page_size: Option<usize>,
    pub start_page: usize,
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Parsed {
    Run(Flags),
    Help,
}

impl Flags {
    /// Parses the process arguments.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed option values or a missing directory.
    pub fn from_env() -> Result<Parsed, pico_args::Error> {
        Self::parse(pico_args::Arguments::from_env())
    }

    /// Parses an explicit argument list (without the program name).
    ///
    /// # Errors
    ///
    /// Returns an error for malformed option values or a missing directory.
    pub fn from_vec(args: Vec<OsString>) -> Result<Parsed, pico_args::Error> {
        Self::parse(pico_args::Arguments::from_vec(args))
    }

    fn parse(mut args: pico_args::Arguments) -> Result<Parsed, pico_args::Error> {
        if args.contains(["-h", "--help"]) {
            return Ok(Parsed::Help);
        }

        let page_size = args.opt_value_from_str("--page-size")?;
        let start_page = args.opt_value_from_str("--start-page")?.unwrap_or(0);
        let config_dir: Option<PathBuf> = args.opt_value_from_os_str("--config-dir", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?;
        let directory = args.free_from_os_str(|s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?;

        let remaining = args.finish();
        if !remaining.is_empty() {
            tracing::warn!(?remaining, "ignoring unexpected arguments");
        }

        Ok(Parsed::Run(Flags {
            directory,
            page_size,
            start_page,
            config_dir,
        }))
    }
}
