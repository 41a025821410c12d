//! `den watch`: one long-lived session.
//!
//! The loop races command lines from stdin, watcher notifications, debounced
//! config and settings file events, and Ctrl-C. Commands run
//! against the same [`Session`], so the config cache and the watcher's
//! history carry over between them.

use crate::commands::{dispatch, print_menu, print_pull_requests, Commands, Input};
use crate::core::{
    error::Result,
    print_error, print_info,
    session::Session,
    state::PullRequestRecord,
    watcher::{Notification, NotificationAction},
};
use clap::{Parser, Subcommand};
use colored::*;
use tokio::sync::mpsc::{self, UnboundedReceiver};

#[derive(Parser, Debug)]
#[command(name = "den", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    entry: SessionEntry,
}

#[derive(Subcommand, Debug)]
enum SessionEntry {
    #[command(flatten)]
    Command(Commands),
    /// End the session
    #[command(visible_alias = "exit")]
    Quit,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    Interrupted,
}

enum Flow {
    Continue,
    Quit,
}

pub async fn execute_watch(session: &Session, input: &mut Input) -> Result<SessionEnd> {
    session.show_loading();
    session.render_status().await;

    let mut notifications = session.take_notifications();
    let monitoring = session.start_monitoring();

    let (file_tx, mut file_events) = mpsc::unbounded_channel();
    let watching_files = match session.start_file_watcher(file_tx) {
        Ok(started) => started,
        Err(e) => {
            log::warn!("Config file watching unavailable: {e}");
            false
        }
    };

    let (settings_tx, mut settings_events) = mpsc::unbounded_channel();
    if let Err(e) = session.start_settings_watcher(settings_tx) {
        log::warn!("Settings file watching unavailable: {e}");
    }

    print_menu(session.repo().is_repository());
    print_info(&format!(
        "Pull requests: {}. Config files: {}. Type a command, or 'quit' to exit.",
        if monitoring { "watching" } else { "off" },
        if watching_files { "watching" } else { "off" }
    ));

    let end = loop {
        tokio::select! {
            line = input.read_line() => match line {
                None => break SessionEnd::EndOfInput,
                Some(line) => {
                    if let Flow::Quit = run_line(session, &line, input).await {
                        break SessionEnd::Quit;
                    }
                }
            },
            Some(notification) = next_notification(&mut notifications) => {
                present_notification(&notification, input).await;
            }
            Some(kind) = file_events.recv() => {
                session.on_config_file_event(kind).await;
            }
            Some(kind) = settings_events.recv() => {
                log::info!("Settings file {}", kind.as_str());
                if let Err(e) = session.reload_settings() {
                    print_error(&e.to_string());
                }
                session.render_status().await;
            }
            _ = tokio::signal::ctrl_c() => break SessionEnd::Interrupted,
        }
    };

    session.dispose();
    log::debug!("Session ended: {end:?}");
    Ok(end)
}

async fn next_notification(
    receiver: &mut Option<UnboundedReceiver<Notification>>,
) -> Option<Notification> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => None,
    }
}

async fn run_line(session: &Session, line: &str, input: &mut Input) -> Flow {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Flow::Continue;
    }

    match SessionLine::try_parse_from(words) {
        Ok(SessionLine {
            entry: SessionEntry::Quit,
        }) => Flow::Quit,
        Ok(SessionLine {
            entry: SessionEntry::Command(command),
        }) => {
            if let Err(e) = dispatch(session, command, input).await {
                print_error(&e.to_string());
            }
            session.render_status().await;
            Flow::Continue
        }
        Err(e) => {
            let _ = e.print();
            Flow::Continue
        }
    }
}

async fn present_notification(notification: &Notification, input: &mut Input) {
    println!("\n{} {}", "●".cyan(), notification.message().white());
    match notification.action() {
        NotificationAction::Open(url) => print_open(&url),
        NotificationAction::ViewAll => {
            println!();
            print_pull_requests(notification.items());
            if let Some(pr) = pick_request(notification.items(), input).await {
                print_open(&pr.url);
            }
            println!();
        }
    }
}

/// Let the user pick one entry of a "view all" list. Blank or invalid input
/// picks nothing.
async fn pick_request<'a>(
    items: &'a [PullRequestRecord],
    input: &mut Input,
) -> Option<&'a PullRequestRecord> {
    let index = input
        .choose("Open which pull request? (Enter to skip)", items.len())
        .await?;
    items.get(index - 1)
}

fn print_open(url: &str) {
    println!("  {} {}\n", "Open:".bright_black(), url.blue());
}
