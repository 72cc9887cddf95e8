//! # Command Line
//!
//! Argument parsing for one-shot use and for the interactive shell.
//!
//! ```text
//! scanprice lookup 7501055363803        one lookup, then exit
//! scanprice scan --device /dev/ttyACM0  wait for one scanned code
//! scanprice history                     list past lookups
//! scanprice status                      session and storage health
//! scanprice ar --capture frame.png      save the renderer's frame
//! scanprice                             interactive shell (default)
//!
//! scanprice> lookup 7501055363803
//! scanprice> view history
//! scanprice> select 7501055363803
//! scanprice> quit
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use scanprice_core::ActiveView;

/// Barcode product lookup with simulated prices and a local search history.
#[derive(Debug, Parser)]
#[command(name = "scanprice", version, about)]
pub struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep the history in memory only for this run
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Actions available both as subcommands and inside the shell.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Look up a typed barcode (6-13 digits)
    Lookup { code: String },

    /// Read one barcode from the scanner and look it up
    Scan {
        /// Scanner line device, overrides the configured one
        #[arg(long, value_name = "PATH", conflicts_with = "decoded")]
        device: Option<PathBuf>,

        /// Submit text as if the scanner had decoded it
        #[arg(long, value_name = "TEXT")]
        decoded: Option<String>,
    },

    /// List past lookups, most recent first
    History,

    /// Re-open a past lookup
    Select { code: String },

    /// Remove one past lookup (no-op when absent)
    Remove { code: String },

    /// Remove all past lookups
    Clear,

    /// Print the AR menu scene, or save a still of the rendered frame
    Ar {
        /// Frame file written by the renderer
        #[arg(long, value_name = "PNG")]
        capture: Option<PathBuf>,

        /// Directory for saved stills
        #[arg(long, value_name = "DIR", default_value = ".", requires = "capture")]
        out: PathBuf,
    },

    /// Show view, lookup status, current product and storage health
    Status,

    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },

    /// Interactive shell
    Shell,
}

/// Panels selectable from the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Scan,
    History,
}

impl From<ViewArg> for ActiveView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Scan => ActiveView::Scan,
            ViewArg::History => ActiveView::History,
        }
    }
}

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    #[command(flatten)]
    App(Command),

    /// Switch between the scan and history views
    View {
        #[arg(value_enum)]
        view: ViewArg,
    },

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Parses a shell line. Blank lines give `Ok(None)`.
///
/// `help` and malformed input come back as a `clap::Error` whose text is
/// ready to print.
pub fn parse_shell_line(line: &str) -> Result<Option<ShellCommand>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn test_default_is_shell() {
        let cli = Cli::try_parse_from(["scanprice"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.ephemeral);
    }

    #[test]
    fn test_one_shot_lookup() {
        let cli =
            Cli::try_parse_from(["scanprice", "--ephemeral", "lookup", "7501055363803"]).unwrap();
        assert!(cli.ephemeral);
        assert_eq!(
            cli.command,
            Some(Command::Lookup {
                code: "7501055363803".into()
            })
        );
    }

    #[test]
    fn test_scan_flags_conflict() {
        let result = Cli::try_parse_from([
            "scanprice", "scan", "--device", "/dev/ttyACM0", "--decoded", "123456",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ar_capture_flags() {
        let cli = Cli::try_parse_from(["scanprice", "ar"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Ar {
                capture: None,
                out: PathBuf::from(".")
            })
        );

        let cli = Cli::try_parse_from([
            "scanprice", "ar", "--capture", "f.png", "--out", "shots",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Ar {
                capture: Some(PathBuf::from("f.png")),
                out: PathBuf::from("shots")
            })
        );

        assert!(Cli::try_parse_from(["scanprice", "ar", "--out", "shots"]).is_err());
    }

    #[test]
    fn test_shell_lines() {
        assert_eq!(parse_shell_line("   ").unwrap(), None);
        assert_eq!(
            parse_shell_line("lookup 7501055363803").unwrap(),
            Some(ShellCommand::App(Command::Lookup {
                code: "7501055363803".into()
            }))
        );
        assert_eq!(
            parse_shell_line("view history").unwrap(),
            Some(ShellCommand::View {
                view: ViewArg::History
            })
        );
        assert_eq!(parse_shell_line("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(
            parse_shell_line("status").unwrap(),
            Some(ShellCommand::App(Command::Status))
        );
        assert_eq!(
            parse_shell_line("clear").unwrap(),
            Some(ShellCommand::App(Command::Clear))
        );
    }

    #[test]
    fn test_shell_rejects_unknown() {
        assert!(parse_shell_line("frobnicate").is_err());
        assert!(parse_shell_line("view sideways").is_err());
        assert!(parse_shell_line("lookup").is_err());
    }
}
