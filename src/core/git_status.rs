//! Working tree cleanliness derived from `git status --porcelain=v2 --branch`.
//!
//! # Public API
//! - [`WorkingTreeStatus`]: staged/modified/untracked counts plus ahead/behind
//! - [`WorkingTreeStatus::from_porcelain_v2`]: parser for the porcelain output
//!
//! Porcelain v2 is used because it reports the upstream divergence on a
//! single `# branch.ab +N -M` header line, so one git invocation yields both
//! the file counts and the ahead/behind numbers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingTreeStatus {
    pub is_clean: bool,
    pub staged: usize,
    pub modified: usize,
    pub untracked: usize,
    pub conflicted: usize,
    pub ahead: usize,
    pub behind: usize,
}

impl Default for WorkingTreeStatus {
    fn default() -> Self {
        Self {
            is_clean: true,
            staged: 0,
            modified: 0,
            untracked: 0,
            conflicted: 0,
            ahead: 0,
            behind: 0,
        }
    }
}

impl WorkingTreeStatus {
    pub fn from_porcelain_v2(output: &str) -> Self {
        let mut status = Self::default();

        for line in output.lines() {
            if let Some(ab) = line.strip_prefix("# branch.ab ") {
                let (ahead, behind) = parse_ahead_behind(ab);
                status.ahead = ahead;
                status.behind = behind;
                continue;
            }

            let mut fields = line.splitn(3, ' ');
            match fields.next() {
                // Ordinary and renamed/copied entries: second field is the XY code
                Some("1") | Some("2") => {
                    let xy = fields.next().unwrap_or("..");
                    let mut codes = xy.chars();
                    if codes.next().is_some_and(|x| x != '.') {
                        status.staged += 1;
                    }
                    if codes.next().is_some_and(|y| y != '.') {
                        status.modified += 1;
                    }
                }
                Some("u") => status.conflicted += 1,
                Some("?") => status.untracked += 1,
                _ => {}
            }
        }

        status.is_clean = status.staged == 0
            && status.modified == 0
            && status.untracked == 0
            && status.conflicted == 0;
        status
    }

    /// Compact `+ahead/-behind` marker, empty when in sync or without upstream.
    pub fn ahead_behind_label(&self) -> String {
        match (self.ahead, self.behind) {
            (0, 0) => String::new(),
            (ahead, 0) => format!("+{ahead}"),
            (0, behind) => format!("-{behind}"),
            (ahead, behind) => format!("+{ahead}/-{behind}"),
        }
    }
}

fn parse_ahead_behind(value: &str) -> (usize, usize) {
    let mut ahead = 0;
    let mut behind = 0;
    for part in value.split_whitespace() {
        if let Some(n) = part.strip_prefix('+') {
            ahead = n.parse().unwrap_or(0);
        } else if let Some(n) = part.strip_prefix('-') {
            behind = n.parse().unwrap_or(0);
        }
    }
    (ahead, behind)
}
