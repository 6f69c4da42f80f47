use clap::Parser;
use dotenvy::dotenv;
use r2_signed_transfer::AppState;
use r2_signed_transfer::cli::{Cli, Command, SHELL_HELP, ShellCommand};
use r2_signed_transfer::config::StorageConfig;
use r2_signed_transfer::handlers::TransferSession;
use r2_signed_transfer::models::{OperationState, SelectedFile};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Logs go to stderr; stdout carries the status lines
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "r2_signed_transfer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = StorageConfig::from_env()?;

    warn!("⚠️  Signing with local credentials. This tool is for testing only.");

    let failed = match cli.command {
        Command::Upload { file } => {
            let state = AppState::from_config(config, None);
            let mut session = state.new_session();
            session.select_file(Some(SelectedFile::from_path(&file).await?));
            session.upload().await;
            print_report(&session, cli.json)?;
            session.upload_status().state == OperationState::Failed
        }
        Command::Download { file, out_dir } => {
            let state = AppState::from_config(config, out_dir);
            let mut session = state.new_session();
            session.select_file(Some(SelectedFile::from_path(&file).await?));
            session.download().await;

            let summary = state.document.wait_for_downloads().await;
            info!(
                "📥 Downloads finished: {} completed, {} failed",
                summary.completed, summary.failed
            );
            print_report(&session, cli.json)?;
            session.download_status().state == OperationState::Failed
        }
        Command::Shell { out_dir } => {
            let state = AppState::from_config(config, out_dir);
            run_shell(&state, cli.json).await?;
            false
        }
    };

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_shell(state: &AppState, json: bool) -> anyhow::Result<()> {
    let mut session = state.new_session();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(
        "🐚 Session on bucket '{}', downloads go to {}",
        session.bucket(),
        state.document.download_dir().display()
    );
    println!("{}", SHELL_HELP);

    loop {
        prompt(&session)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(command) = ShellCommand::parse(&line) else {
            continue;
        };

        match command {
            ShellCommand::Select(None) => session.select_file(None),
            ShellCommand::Select(Some(path)) => match SelectedFile::from_path(&path).await {
                Ok(file) => session.select_file(Some(file)),
                Err(e) => println!("Could not read '{}': {}", path.display(), e),
            },
            ShellCommand::Upload => {
                if !session.actions_enabled() {
                    println!("(no file selected, upload is disabled)");
                }
                println!("{}", session.upload().await);
            }
            ShellCommand::Download => {
                if !session.actions_enabled() {
                    println!("(no file selected, download is disabled)");
                }
                println!("{}", session.download().await);
            }
            ShellCommand::Status => print_report(&session, json)?,
            ShellCommand::Help => println!("{}", SHELL_HELP),
            ShellCommand::Quit => break,
            ShellCommand::Unknown(verb) => println!("Unknown command '{}', try 'help'", verb),
        }
    }

    let summary = state.document.wait_for_downloads().await;
    if summary.completed + summary.failed > 0 {
        info!(
            "📥 Downloads finished: {} completed, {} failed",
            summary.completed, summary.failed
        );
    }
    Ok(())
}

fn prompt(session: &TransferSession) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    match session.selected_file() {
        Some(file) => write!(stdout, "[{}]> ", file.name)?,
        None => write!(stdout, "> ")?,
    }
    stdout.flush()?;
    Ok(())
}

fn print_report(session: &TransferSession, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&session.report())?);
        return Ok(());
    }

    match session.selected_file() {
        Some(file) => println!("file:     {} ({} bytes)", file.name, file.size()),
        None => println!("file:     (none)"),
    }
    if !session.upload_status().is_empty() {
        println!("upload:   {}", session.upload_status());
    }
    if !session.download_status().is_empty() {
        println!("download: {}", session.download_status());
    }
    Ok(())
}
