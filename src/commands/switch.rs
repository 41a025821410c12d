use crate::commands::input::Input;
use crate::core::{
    error::{DenError, Result},
    format_numbered, print_info, print_section_header, print_success,
    session::{require_repository, Session},
};
use colored::*;

/// Check out `branch`, or pick one from a numbered list when no name is
/// given. A numeric argument selects by position in that list.
pub async fn execute_switch(
    session: &Session,
    branch: Option<String>,
    input: &mut Input,
) -> Result<()> {
    require_repository(session)?;

    let target = match branch {
        Some(name) => resolve_argument(session, name).await,
        None => match pick_branch(session, input).await? {
            Some(name) => name,
            None => return Ok(()),
        },
    };

    if session.repo().switch_branch(&target).await {
        print_success(&format!("Switched to branch '{target}'"));
        Ok(())
    } else {
        Err(DenError::SwitchFailed { branch: target })
    }
}

/// `2` means the second listed branch when no branch is literally named `2`.
async fn resolve_argument(session: &Session, argument: String) -> String {
    let Ok(index) = argument.parse::<usize>() else {
        return argument;
    };
    let branches = session.repo().branch_list().await;
    if branches.iter().any(|b| *b == argument) {
        return argument;
    }
    match index.checked_sub(1).and_then(|i| branches.get(i)) {
        Some(name) => name.clone(),
        None => argument,
    }
}

async fn pick_branch(session: &Session, input: &mut Input) -> Result<Option<String>> {
    let branches = session.repo().branch_list().await;
    if branches.is_empty() {
        print_info("No branches found. Make your first commit to create one.");
        return Ok(None);
    }

    let current = session.repo().current_branch().await.unwrap_or_default();

    print_section_header("Branches");
    for (index, name) in branches.iter().enumerate() {
        if *name == current {
            println!("{} {}", format_numbered(index + 1, &name.blue().to_string()), "*".white());
        } else {
            println!("{}", format_numbered(index + 1, &name.blue().to_string()));
        }
    }
    println!();

    match input.choose("Switch to branch number", branches.len()).await {
        Some(index) => Ok(branches.get(index - 1).cloned()),
        None => {
            log::debug!("No branch selected");
            Ok(None)
        }
    }
}
