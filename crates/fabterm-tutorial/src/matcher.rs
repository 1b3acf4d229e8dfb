//! Command matching for tutorial steps
//!
//! Matching is literal after normalization: surrounding whitespace trimmed,
//! internal whitespace runs collapsed to one space, case folded.

use crate::catalog::EXIT_KEYWORD;

/// Words that unlock any step with an expected command
const SYNONYMS: [&str; 2] = ["continue", "next"];

pub fn normalize(command: &str) -> String {
    command
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether `submitted` satisfies a step expecting `expected`
pub fn accepts(expected: &str, submitted: &str) -> bool {
    let actual = normalize(submitted);
    actual == normalize(expected) || SYNONYMS.contains(&actual.as_str())
}

pub fn is_continue(submitted: &str) -> bool {
    SYNONYMS.contains(&normalize(submitted).as_str())
}

pub fn is_exit(submitted: &str) -> bool {
    normalize(submitted) == EXIT_KEYWORD
}
