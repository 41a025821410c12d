use crate::core::{
    error::{DenError, Result},
    print_field, print_section_header, print_success,
    session::{require_repository, Session},
    state::RepositoryInfo,
};
use colored::*;

pub async fn execute_repo(session: &Session) -> Result<()> {
    require_repository(session)?;
    let info = session
        .repo()
        .refresh()
        .await
        .ok_or(DenError::NotInGitRepo)?;
    print_repository(&info);
    Ok(())
}

/// Re-read the repository state and show the resulting status line.
pub async fn execute_refresh(session: &Session) -> Result<()> {
    require_repository(session)?;
    session.render_status().await;
    print_success("Git status refreshed");
    Ok(())
}

fn print_repository(info: &RepositoryInfo) {
    print_section_header("Repository");
    print_field("Root", &info.root.display().to_string());

    let ahead_behind = info.status.ahead_behind_label();
    if ahead_behind.is_empty() {
        print_field("Branch", &info.branch);
    } else {
        print_field("Branch", &format!("{} ({})", info.branch, ahead_behind));
    }

    let status = &info.status;
    if status.is_clean {
        print_field("Status", "clean");
    } else {
        print_field(
            "Status",
            &format!(
                "{} staged, {} modified, {} untracked, {} conflicted",
                status.staged, status.modified, status.untracked, status.conflicted
            ),
        );
    }

    match &info.last_commit {
        Some(commit) => {
            let date = commit
                .date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            print_field(
                "Last commit",
                &format!("{} {}", commit.short_hash.yellow(), commit.message),
            );
            println!(
                "  {:<12} {}",
                "",
                format!("{} {}", commit.author, date).bright_black()
            );
        }
        None => print_field("Last commit", "none"),
    }

    if info.remotes.is_empty() {
        print_field("Remotes", "none");
    } else {
        print_field("Remotes", "");
        for remote in &info.remotes {
            let host = match remote.descriptor() {
                Some(descriptor) => format!("{} {}", remote.host_type, descriptor.label()),
                None => remote.host_type.to_string(),
            };
            println!(
                "    {} {} {}",
                remote.name.blue(),
                remote.url.white(),
                format!("({host})").bright_black()
            );
        }
    }
    println!();
}
