//! Command-line argument parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Argument errors, reported with a pointer to `--help`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    /// No command was given.
    #[error("No command given")]
    MissingCommand,

    /// The command is not known.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A flag or extra positional argument is not known.
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    /// A flag was given without its value.
    #[error("Missing value for {0}")]
    MissingValue(String),

    /// A required positional argument is absent.
    #[error("Missing required argument <{0}>")]
    MissingPositional(&'static str),
}

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a `.bsl` report for every metadata file under `dir`.
    Generate {
        /// Folder searched recursively for `*.surface.json`.
        dir: PathBuf,
        /// Output folder; reports go next to their metadata when absent.
        out: Option<PathBuf>,
    },
    /// Compare one metadata file with its baseline.
    Compare {
        /// `*.surface.json` file.
        metadata: PathBuf,
        /// Approved `.bsl` file.
        baseline: PathBuf,
    },
    /// Print the snapshot path of a request.
    SnapshotPath {
        /// Absolute request URL.
        url: String,
        /// Accept header value.
        accept: Option<String>,
        /// Snapshot root overriding the configuration.
        root: Option<PathBuf>,
    },
    /// Print usage.
    Help,
    /// Print the version.
    Version,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Path to a configuration file.
    pub config: Option<PathBuf>,
    /// Command to run.
    pub command: Command,
}

impl Args {
    /// Parses the process arguments.
    pub fn parse() -> Result<Self, ArgsError> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parses arguments, excluding the program name.
    pub fn parse_from<I, S>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut config = None;
        let mut name = None;
        let mut positionals = Vec::new();
        let mut out = None;
        let mut accept = None;
        let mut root = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => {
                    return Ok(Self {
                        config,
                        command: Command::Help,
                    })
                }
                "--version" | "-v" => {
                    return Ok(Self {
                        config,
                        command: Command::Version,
                    })
                }
                "--config" | "-c" => config = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--out" | "-o" => out = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--accept" => accept = Some(value(&mut args, &arg)?),
                "--root" => root = Some(PathBuf::from(value(&mut args, &arg)?)),
                flag if flag.starts_with('-') => return Err(ArgsError::UnknownArgument(arg)),
                _ if name.is_none() => name = Some(arg),
                _ => positionals.push(arg),
            }
        }

        let name = name.ok_or(ArgsError::MissingCommand)?;
        let mut positionals = positionals.into_iter();
        let command = match name.as_str() {
            "generate" => Command::Generate {
                dir: PathBuf::from(required(&mut positionals, "dir")?),
                out,
            },
            "compare" => Command::Compare {
                metadata: PathBuf::from(required(&mut positionals, "metadata")?),
                baseline: PathBuf::from(required(&mut positionals, "baseline")?),
            },
            "snapshot-path" => Command::SnapshotPath {
                url: required(&mut positionals, "url")?,
                accept,
                root,
            },
            "help" => Command::Help,
            "version" => Command::Version,
            _ => return Err(ArgsError::UnknownCommand(name)),
        };

        if let Some(extra) = positionals.next() {
            return Err(ArgsError::UnknownArgument(extra));
        }
        Ok(Self { config, command })
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, ArgsError> {
    args.next()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}

fn required(
    positionals: &mut impl Iterator<Item = String>,
    name: &'static str,
) -> Result<String, ArgsError> {
    positionals.next().ok_or(ArgsError::MissingPositional(name))
}

/// Usage text.
pub const HELP: &str = r"Breakdance - public API surface reports and HTTP snapshots

USAGE:
    breakdance [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    generate <dir> [--out <dir>]
        Write a <name>.bsl report for every *.surface.json under <dir>
    compare <metadata> <baseline>
        Print the diff between a report and its baseline; exit 1 on change
    snapshot-path <url> [--accept <type>] [--root <dir>]
        Print the snapshot file a request maps to

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    BREAKDANCE__SURFACE__PROPERTY_RENDERING   accessors | declaration
    BREAKDANCE__SNAPSHOT__ROOT                Snapshot root folder
    BREAKDANCE__SNAPSHOT__MAX_PATH_LENGTH     Path length limit (default: 260)
    BREAKDANCE__LOGGING__LEVEL                Log filter (default: info)
";
