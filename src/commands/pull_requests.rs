use crate::core::{
    error::Result, format_numbered, print_info, print_section_header,
    session::{require_repository, Session},
    state::PullRequestRecord,
};
use colored::*;

/// List open pull requests targeting the monitored branches, across every
/// recognized remote. Does not affect new-request detection.
pub async fn execute_pull_requests(session: &Session) -> Result<()> {
    require_repository(session)?;

    let branches = session.settings().git.monitored_branches.join(", ");
    let items = session.watcher().current_pull_requests().await;
    if items.is_empty() {
        print_info(&format!("No open pull requests targeting: {branches}"));
        return Ok(());
    }

    print_section_header(&format!("Pull Requests ({branches})"));
    print_pull_requests(&items);
    println!();
    Ok(())
}

/// Numbered listing shared with the session's "view all" action.
pub fn print_pull_requests(items: &[PullRequestRecord]) {
    for (index, pr) in items.iter().enumerate() {
        let draft = if pr.draft {
            format!(" {}", "[draft]".bright_black())
        } else {
            String::new()
        };
        println!(
            "{}{}",
            format_numbered(
                index + 1,
                &format!("{} {}", pr.reference().white(), pr.title.blue())
            ),
            draft
        );
        println!(
            "    {} {} {} {}  {}",
            pr.source_branch.bright_black(),
            "→".bright_black(),
            pr.target_branch.white(),
            format!("by {}", pr.author).bright_black(),
            pr.repository.bright_black()
        );
        println!("    {}", pr.url.bright_black());
    }
}
