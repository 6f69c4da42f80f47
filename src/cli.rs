use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "r2-signed-transfer",
    version,
    about = "Upload and download objects through time-limited signed URLs"
)]
pub struct Cli {
    /// Print the final session state as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select FILE and upload it under its file name
    Upload { file: PathBuf },

    /// Select FILE and download the object stored under its file name
    Download {
        file: PathBuf,

        /// Directory to save the download into (defaults to DOWNLOAD_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Interactive session: select, upload and download repeatedly
    Shell {
        /// Directory to save downloads into (defaults to DOWNLOAD_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

pub const SHELL_HELP: &str = "\
commands:
  select <path>   pick a file (empty path cancels the pick)
  upload          upload the selected file
  download        download the object named after the selected file
  status          show the selected file and both statuses
  help            show this help
  quit            wait for downloads and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Select(Option<PathBuf>),
    Upload,
    Download,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "select" | "pick" => {
                if rest.is_empty() {
                    ShellCommand::Select(None)
                } else {
                    ShellCommand::Select(Some(PathBuf::from(rest)))
                }
            }
            "upload" | "up" => ShellCommand::Upload,
            "download" | "down" => ShellCommand::Download,
            "status" => ShellCommand::Status,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            _ => ShellCommand::Unknown(verb.to_string()),
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_download() {
        let cli = Cli::parse_from([
            "r2-signed-transfer",
            "--json",
            "download",
            "x.png",
            "--out-dir",
            "/tmp/out",
        ]);
        assert!(cli.json);
        match cli.command {
            Command::Download { file, out_dir } => {
                assert_eq!(file, PathBuf::from("x.png"));
                assert_eq!(out_dir, Some(PathBuf::from("/tmp/out")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_shell_command_parse() {
        assert_eq!(ShellCommand::parse("   "), None);
        assert_eq!(
            ShellCommand::parse("select /tmp/my report.pdf"),
            Some(ShellCommand::Select(Some(PathBuf::from("/tmp/my report.pdf"))))
        );
        assert_eq!(
            ShellCommand::parse("select"),
            Some(ShellCommand::Select(None))
        );
        assert_eq!(ShellCommand::parse("UPLOAD"), Some(ShellCommand::Upload));
        assert_eq!(ShellCommand::parse("down"), Some(ShellCommand::Download));
        assert_eq!(ShellCommand::parse("q"), Some(ShellCommand::Quit));
        assert_eq!(
            ShellCommand::parse("delete x"),
            Some(ShellCommand::Unknown("delete".to_string()))
        );
    }
}
