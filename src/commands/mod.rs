pub mod info;
pub mod init;
pub mod input;
pub mod pull_requests;
pub mod reload;
pub mod repo;
pub mod settings;
pub mod status;
pub mod switch;
pub mod validate;
pub mod watch;

pub use info::*;
pub use init::*;
pub use input::Input;
pub use pull_requests::*;
pub use reload::*;
pub use repo::*;
pub use settings::*;
pub use status::*;
pub use switch::*;
pub use validate::*;
pub use watch::*;

use crate::core::{error::Result, print_info, session::Session};
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a default den.yml in the workspace root
    Init {
        /// Overwrite an existing den.yml without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the settings file, creating it with defaults if missing
    Settings {
        /// Only print the settings file location
        #[arg(long)]
        path: bool,
    },
    /// Validate the active configuration file
    Validate,
    /// Reload the configuration from disk
    Reload,
    /// Re-read the settings file
    ReloadSettings,
    /// Show the active configuration
    Info,
    /// Drop every cached configuration
    ClearCache,
    /// List open pull requests targeting the monitored branches
    #[command(visible_alias = "pull-requests")]
    Prs,
    /// Switch branch by name, or pick from a numbered list
    Switch {
        /// Branch name, or its number in the list
        branch: Option<String>,
    },
    /// Show repository information
    Repo,
    /// Refresh the git status
    Refresh,
    /// Show the status line and the action menu
    Status,
    /// Keep a session open: watch config files and pull requests
    Watch,
}

/// Run one command against `session`. `watch` is handled by the caller,
/// since it owns the session loop.
pub async fn dispatch(session: &Session, command: Commands, input: &mut Input) -> Result<()> {
    match command {
        Commands::Init { yes } => execute_init(session, yes, input).await,
        Commands::Settings { path } => execute_settings(session, path),
        Commands::Validate => execute_validate(session),
        Commands::Reload => execute_reload(session),
        Commands::ReloadSettings => execute_reload_settings(session),
        Commands::Info => execute_info(session),
        Commands::ClearCache => execute_clear_cache(session),
        Commands::Prs => execute_pull_requests(session).await,
        Commands::Switch { branch } => execute_switch(session, branch, input).await,
        Commands::Repo => execute_repo(session).await,
        Commands::Refresh => execute_refresh(session).await,
        Commands::Status => execute_status(session).await,
        Commands::Watch => {
            print_info("Session already running");
            Ok(())
        }
    }
}
