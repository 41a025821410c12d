//! Common assertion helpers for den command output

#![allow(dead_code)]

use predicates::prelude::*;

pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

pub fn no_config_found() -> impl Predicate<str> {
    predicates::str::contains("no config found")
        .or(predicates::str::contains("No configuration file found"))
}

pub fn has_status_line(label: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Den: {label}"))
}

pub fn has_git_menu() -> impl Predicate<str> {
    predicates::str::contains("Switch Branch").and(predicates::str::contains("Show Pull Requests"))
}
