use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod script;
mod terminal;

use terminal::TerminalKind;

#[derive(Parser)]
#[command(
    name = "weft",
    about = "Weft — stackable transformers over streamed HTTP exchanges",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Emit logs as JSON lines instead of text
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a stack file and list the transformers it assembles
    Check {
        /// Path to the stack file
        #[arg(short, long, default_value = "stack.toml")]
        stack: PathBuf,
    },
    /// Drive a scripted exchange through a stack and print the response.
    ///
    /// Script steps are delivered in order; `delay_ms` on a step waits
    /// before delivering it.
    Run {
        /// Path to the stack file
        #[arg(short, long, default_value = "stack.toml")]
        stack: PathBuf,
        /// Path to the exchange script
        #[arg(long)]
        script: PathBuf,
        /// Terminal handler at the bottom of the stack
        #[arg(short, long, value_enum, default_value_t = TerminalKind::Echo)]
        terminal: TerminalKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "weft=info".into());
    let logs = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        logs.json().init();
    } else {
        logs.init();
    }

    match cli.command {
        Commands::Check { stack } => commands::check::check(&stack),
        Commands::Run {
            stack,
            script,
            terminal,
        } => commands::run::run(&stack, &script, terminal).await,
    }
}
