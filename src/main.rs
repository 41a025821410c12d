use clap::Parser;
use den::commands::{dispatch, execute_watch, Commands, Input, SessionEnd};
use den::core::{error::Result, print_error, session::Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "den")]
#[command(about = "Developer environment config discovery with a branch and pull request status companion")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Workspace root; repeat for several (default: current directory)
    #[arg(long = "workspace", short = 'w', global = true, value_name = "DIR")]
    workspaces: Vec<PathBuf>,

    /// Settings file location
    #[arg(long, global = true, env = "DEN_SETTINGS", value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag; RUST_LOG still wins
    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match run(cli).await {
        // The blocking stdin read cannot be cancelled, so don't wait for it
        Ok(Some(SessionEnd::Interrupted)) => std::process::exit(0),
        Ok(_) => {}
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<Option<SessionEnd>> {
    let session = Session::open(cli.workspaces, cli.settings)?;
    let mut input = Input::stdin();

    match cli.command {
        Commands::Watch => execute_watch(&session, &mut input).await.map(Some),
        command => dispatch(&session, command, &mut input).await.map(|_| None),
    }
}
