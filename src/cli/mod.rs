//! Command-line interface

pub mod commands;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(
    name = "machine-report",
    version,
    disable_version_flag = true,
    about = "Print a machine report: OS, network, CPU, disk, memory, last login and uptime"
)]
pub struct Cli {
    /// Print the collected metrics and report rows as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the report title line
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Override the report subtitle line
    #[arg(long, value_name = "TEXT")]
    pub subtitle: Option<String>,

    /// Read layout settings from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn command() -> clap::Command {
    Cli::command().arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
    )
}

/// Parse arguments, dropping any the parser does not recognize.
///
/// Returns the parsed CLI and the dropped arguments. Help and version
/// requests, and malformed values for known flags, come back as errors.
pub fn try_parse_lenient<I, T>(args: I) -> Result<(Cli, Vec<String>), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut ignored = Vec::new();

    loop {
        let err = match command().try_get_matches_from(&args) {
            Ok(matches) => return Cli::from_arg_matches(&matches).map(|cli| (cli, ignored)),
            Err(err) => err,
        };
        if err.kind() != ErrorKind::UnknownArgument {
            return Err(err);
        }
        let invalid = match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(invalid)) => invalid.clone(),
            _ => return Err(err),
        };
        let Some(index) = args
            .iter()
            .skip(1)
            .position(|arg| matches_arg(arg, &invalid))
            .or_else(|| {
                args.iter()
                    .skip(1)
                    .position(|arg| in_short_cluster(arg, &invalid))
            })
        else {
            return Err(err);
        };
        let removed = args.remove(index + 1);
        ignored.push(removed.to_string_lossy().into_owned());
    }
}

fn matches_arg(arg: &OsString, invalid: &str) -> bool {
    let arg = arg.to_string_lossy();
    arg == invalid
        || arg
            .strip_prefix(invalid)
            .is_some_and(|rest| rest.starts_with('='))
}

/// `-xq` is reported as `-x`; the whole cluster is dropped.
fn in_short_cluster(arg: &OsString, invalid: &str) -> bool {
    let Some(letter) = invalid.strip_prefix('-').filter(|l| l.chars().count() == 1) else {
        return false;
    };
    let arg = arg.to_string_lossy();
    match arg.strip_prefix('-') {
        Some(cluster) if !cluster.starts_with('-') => cluster.contains(letter),
        _ => false,
    }
}

/// Parse process arguments. Unknown flags are reported and skipped so the
/// default report still runs; help and version print and exit.
pub fn parse_args() -> Cli {
    match try_parse_lenient(std::env::args_os()) {
        Ok((cli, ignored)) => {
            for arg in &ignored {
                eprintln!("warning: ignoring unrecognized argument '{}'", arg);
                crate::debug_log::cli_log(&format!("ignored argument: {arg}"));
            }
            cli
        }
        Err(err) => err.exit(),
    }
}
