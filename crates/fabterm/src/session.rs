//! Terminal session
//!
//! The free-form shell shown on start. It keeps the rendered command log and
//! the raw recall history, dispatches the fixed set of builtins and schedules
//! navigation. Starting the tutorial is reported to the caller, which owns
//! the tutorial engine.

use crate::links::{EntryKind, LinkTable};
use crate::navigator::{Navigator, Opened};
use chrono::{DateTime, Local, TimeZone};
use fabterm_terminal::{Span, StyledLine, Tone};
use fabterm_tutorial::{schedule_after, TaskHandle};
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Delay between acknowledging a navigation command and opening the target
pub const NAV_DELAY: Duration = Duration::from_millis(500);

/// Builtins listed by `help`, with their descriptions
pub const DOCUMENTED_BUILTINS: &[(&str, &str)] = &[
    ("help", "Show this help message"),
    ("ls", "List all pages"),
    ("install", "Show installation guide"),
    ("docs", "Navigate to documentation"),
    ("blog", "Navigate to blog"),
    ("about", "Navigate to about page"),
    ("community", "Navigate to community"),
    ("clear", "Clear the terminal"),
    ("whoami", "Display current user"),
    ("date", "Show current date"),
    ("tutorial", "Start the interactive tutorial"),
];

pub const USER: &str = "user@deepfabric";

/// A submitted command and what it printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLogEntry {
    /// Sequence number, unique for the session's lifetime
    pub id: u64,
    pub command: String,
    pub output: Vec<StyledLine>,
}

/// A navigation that became due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub name: &'static str,
    pub url: String,
    /// Log entry of the command that asked for it
    pub entry: u64,
}

/// What the host has to do after a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    None,
    StartTutorial,
}

pub struct Session {
    links: LinkTable,
    log: Vec<CommandLogEntry>,
    /// Raw submissions for Up/Down recall
    recall: Vec<String>,
    recall_cursor: Option<usize>,
    input: String,
    whoami_count: u32,
    next_entry: u64,
    nav_tx: mpsc::UnboundedSender<Navigation>,
    pending_nav: Option<TaskHandle>,
}

impl Session {
    pub fn new(links: LinkTable, nav_tx: mpsc::UnboundedSender<Navigation>) -> Self {
        Self {
            links,
            log: Vec::new(),
            recall: Vec::new(),
            recall_cursor: None,
            input: String::new(),
            whoami_count: 0,
            next_entry: 0,
            nav_tx,
            pending_nav: None,
        }
    }

    pub fn log(&self) -> &[CommandLogEntry] {
        &self.log
    }

    pub fn recall_history(&self) -> &[String] {
        &self.recall
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn whoami_count(&self) -> u32 {
        self.whoami_count
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    pub fn has_pending_navigation(&self) -> bool {
        self.pending_nav
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submit the current input line
    pub fn submit(&mut self) -> SessionAction {
        let raw = std::mem::take(&mut self.input);
        self.submit_line(&raw)
    }

    pub fn submit_line(&mut self, raw: &str) -> SessionAction {
        let command = raw.trim().to_lowercase();
        self.input.clear();
        self.recall_cursor = None;
        if command.is_empty() {
            return SessionAction::None;
        }

        self.recall.push(raw.to_string());
        let id = self.next_entry;
        self.next_entry += 1;
        debug!(command = %command, "Session command");

        let mut action = SessionAction::None;
        let output = match command.as_str() {
            "help" => help_output(),
            "ls" => self.ls_output(false),
            "ls -la" => self.ls_output(true),
            "install" => install_output(),
            "docs" => self.navigate("docs", id),
            "blog" => self.navigate("blog", id),
            "about" => self.navigate("about", id),
            "community" => self.navigate("community", id),
            "clear" => {
                self.log.clear();
                return SessionAction::None;
            }
            "whoami" => {
                self.whoami_count += 1;
                whoami_output(self.whoami_count)
            }
            "date" => vec![StyledLine::plain(format_date(&Local::now()))],
            "surprise" => surprise_output(),
            "tutorial" => {
                action = SessionAction::StartTutorial;
                vec![StyledLine::toned("Starting interactive tutorial...", Tone::Cyan)]
            }
            _ => not_found_output(&command),
        };

        self.log.push(CommandLogEntry {
            id,
            command: raw.to_string(),
            output,
        });
        action
    }

    fn navigate(&mut self, name: &'static str, entry: u64) -> Vec<StyledLine> {
        let Some(destination) = self.links.destination_for(name) else {
            return not_found_output(name);
        };
        let url = self.links.resolve(destination);
        info!(name, url = %url, "Scheduling navigation");

        // Replacing the handle aborts an older navigation that has not fired
        self.pending_nav = Some(schedule_after(
            NAV_DELAY,
            self.nav_tx.clone(),
            Navigation { name, url, entry },
        ));
        vec![StyledLine::toned(format!("Navigating to {name}..."), Tone::Cyan)]
    }

    /// Carry out a navigation that became due
    pub fn complete_navigation(&mut self, navigation: Navigation, navigator: &mut dyn Navigator) {
        self.pending_nav = None;
        let line = match navigator.open(&navigation.url) {
            Ok(Opened::Browser) => return,
            Ok(Opened::Manual) => StyledLine::toned("Open ", Tone::Fg)
                .with(Span::link(navigation.url.clone(), navigation.url)),
            Err(e) => {
                warn!(error = %e, "Navigation failed");
                StyledLine::toned(format!("Could not open a browser: {e}. Visit "), Tone::Red)
                    .with(Span::link(navigation.url.clone(), navigation.url))
            }
        };
        match self.log.iter_mut().find(|entry| entry.id == navigation.entry) {
            Some(entry) => entry.output.push(line),
            // The originating entry was cleared away; report on a fresh one
            None => {
                let id = self.next_entry;
                self.next_entry += 1;
                self.log.push(CommandLogEntry {
                    id,
                    command: navigation.name.to_string(),
                    output: vec![line],
                });
            }
        }
    }

    /// Step back through submitted commands, stopping at the oldest
    pub fn recall_previous(&mut self) {
        if self.recall.is_empty() {
            return;
        }
        let index = match self.recall_cursor {
            None => self.recall.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.recall_cursor = Some(index);
        self.input = self.recall[index].clone();
    }

    /// Step forward; moving past the newest entry clears the input
    pub fn recall_next(&mut self) {
        let Some(index) = self.recall_cursor else {
            return;
        };
        let next = index + 1;
        if next >= self.recall.len() {
            self.recall_cursor = None;
            self.input.clear();
        } else {
            self.recall_cursor = Some(next);
            self.input = self.recall[next].clone();
        }
    }

    fn ls_output(&self, long: bool) -> Vec<StyledLine> {
        let mut lines = Vec::new();
        if long {
            let home = self.links.resolve(self.links.home());
            lines.push(
                StyledLine::new()
                    .with(Span::link("🏠 ./", home))
                    .with(Span::new("  - Home", Tone::Dim)),
            );
        }
        lines.extend(self.links.pages().iter().map(|page| {
            let (icon, tone) = match page.kind {
                EntryKind::Directory => ("📁", Tone::Blue),
                EntryKind::File => ("📄", Tone::Green),
            };
            let url = self.links.resolve(page.target);
            let mut link = Span::link(format!("{icon} {}", page.label), url);
            link.tone = tone;
            StyledLine::new()
                .with(link)
                .with(Span::new(format!("  - {}", page.description), Tone::Dim))
        }));

        if long {
            lines.push(StyledLine::blank());
            for link in self.links.external() {
                lines.push(
                    StyledLine::new()
                        .with(Span::new(format!("🔗 {:<14}", link.label), Tone::Cyan))
                        .with(Span::link(link.url, link.url)),
                );
            }
        }
        lines
    }
}

/// Names listed by `help`
pub fn documented_builtins() -> Vec<&'static str> {
    DOCUMENTED_BUILTINS.iter().map(|(name, _)| *name).collect()
}

fn help_output() -> Vec<StyledLine> {
    let width = DOCUMENTED_BUILTINS
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    let mut lines = vec![StyledLine::toned("Available commands:", Tone::Yellow)];
    lines.extend(DOCUMENTED_BUILTINS.iter().map(|(name, description)| {
        StyledLine::new()
            .with(Span::new(format!("{name:<width$}"), Tone::Green))
            .with(Span::new(format!(" - {description}"), Tone::Fg))
            .indented(2)
    }));
    lines
}

fn install_output() -> Vec<StyledLine> {
    vec![
        StyledLine::toned("Installation Guide:", Tone::Yellow),
        StyledLine::toned("$ pip install deepfabric", Tone::Green).indented(2),
        StyledLine::new()
            .with(Span::new("⠋ ", Tone::Cyan))
            .with(Span::new("Installing packages...", Tone::Fg))
            .indented(2),
        StyledLine::toned("✓ Installation complete!", Tone::Green).indented(2),
        StyledLine::plain("Then run your first generation:"),
        StyledLine::new()
            .with(Span::new("deepfabric ", Tone::Purple))
            .with(Span::new("generate ", Tone::Cyan))
            .with(Span::new("quickstart.yaml", Tone::Yellow))
            .indented(2),
    ]
}

/// Escalating answers to repeated `whoami`
fn whoami_output(count: u32) -> Vec<StyledLine> {
    let line = match count {
        1 => StyledLine::toned(USER, Tone::Green),
        2 => StyledLine::new().with(Span::new(format!("{USER} (yes, really)"), Tone::Green).bold()),
        3 => StyledLine::new()
            .with(Span::new(format!("{}!!!", USER.to_uppercase()), Tone::Yellow).bold()),
        n => StyledLine::toned(
            format!("Still {USER}. That is {n} times now. Some things never change."),
            Tone::Purple,
        ),
    };
    vec![line]
}

fn surprise_output() -> Vec<StyledLine> {
    vec![
        StyledLine::toned("🚀 ✨ 🌟 You found the secret command! 🌟 ✨ 🚀", Tone::Purple),
        StyledLine::toned("The spaceman waves at you! 👋", Tone::Cyan),
    ]
}

fn not_found_output(command: &str) -> Vec<StyledLine> {
    vec![
        StyledLine::toned(format!("bash: {command}: command not found"), Tone::Red),
        StyledLine::plain("Type 'help' for available commands"),
    ]
}

/// `Sat Oct 17 2026 14:03:11 GMT+0200`
pub fn format_date<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}
