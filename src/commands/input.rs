//! Line input shared by prompts and the interactive session.
//!
//! Stdin is read one line at a time on a blocking thread, and only when a
//! line is actually requested. The pending read survives a dropped
//! `read_line` future, so `tokio::select!` can race it against other events
//! without losing input.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tokio::task::JoinHandle;

enum Source {
    Stdin {
        pending: Option<JoinHandle<io::Result<Option<String>>>>,
    },
    Scripted(VecDeque<String>),
}

pub struct Input {
    source: Source,
}

impl Input {
    pub fn stdin() -> Self {
        Self {
            source: Source::Stdin { pending: None },
        }
    }

    /// Input that replays `lines`, then reports end of input.
    pub fn scripted<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: Source::Scripted(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Next line without its terminator; `None` at end of input.
    pub async fn read_line(&mut self) -> Option<String> {
        match &mut self.source {
            Source::Scripted(lines) => lines.pop_front(),
            Source::Stdin { pending } => {
                let handle = pending.get_or_insert_with(|| tokio::task::spawn_blocking(read_stdin_line));
                let result = handle.await;
                *pending = None;
                match result {
                    Ok(Ok(line)) => line,
                    Ok(Err(e)) => {
                        log::warn!("Failed to read input: {e}");
                        None
                    }
                    Err(e) => {
                        log::warn!("Input reader stopped: {e}");
                        None
                    }
                }
            }
        }
    }

    /// Print `question [y/N]: ` and read the answer. Anything but `y`/`yes`
    /// declines, including end of input.
    pub async fn confirm(&mut self, question: &str) -> bool {
        print!("{question} [y/N]: ");
        let _ = io::stdout().flush();
        match self.read_line().await {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    /// Print `prompt` and read a 1-based index no greater than `max`.
    pub async fn choose(&mut self, prompt: &str, max: usize) -> Option<usize> {
        print!("{prompt}: ");
        let _ = io::stdout().flush();
        let answer = self.read_line().await?;
        match answer.trim().parse::<usize>() {
            Ok(index) if (1..=max).contains(&index) => Some(index),
            _ => None,
        }
    }
}

fn read_stdin_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
