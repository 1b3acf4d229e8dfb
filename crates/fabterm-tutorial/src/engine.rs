//! Tutorial engine
//!
//! Drives the user through the step catalog. Each step plays its output,
//! then waits until the expected command is typed (or, for steps without
//! one, until the user explicitly continues) before the next step can be
//! entered. The current index is written to the progress store on every
//! transition and deleted when the tutorial is left.
//!
//! Interactive confirmations are two-step: the engine exposes a pending
//! question ([`TutorialEngine::pending_resume`],
//! [`TutorialEngine::exit_requested`]) and the host answers it.

use crate::assets::AssetStore;
use crate::catalog::{MockOutput, TutorialStep, EXIT_KEYWORD};
use crate::matcher::{accepts, is_continue, is_exit};
use crate::player::{OutputPlayer, PlayerEvent};
use crate::progress::ProgressStore;
use crate::TutorialError;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Write-only clipboard access
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), TutorialError>;
}

/// Result of submitting a line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing happened (blank input, or the engine is not taking input)
    Ignored,
    /// The step is now completed and the command was logged
    Accepted,
    /// The step was already completed before this submission
    AlreadyComplete,
    /// Wrong command; nothing logged, nothing advanced
    Rejected { hint: String },
    /// The exit keyword was typed on the terminal step
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The requested move is not allowed in the current state
    Blocked,
    /// Entered the step at this index
    Advanced(usize),
    /// The tutorial is over; the host should hand control back
    Exited,
}

/// Per-step indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Done,
    Current,
    Pending,
}

pub struct TutorialEngine {
    steps: &'static [TutorialStep],
    index: usize,
    input: String,
    /// Accepted commands, in order
    history: Vec<String>,
    /// Output chunks of the current step
    output: Vec<String>,
    output_finished: bool,
    animating: bool,
    step_completed: bool,
    pending_resume: Option<usize>,
    exit_requested: bool,
    exited: bool,
    store: Box<dyn ProgressStore>,
    store_available: bool,
    player: OutputPlayer,
}

impl TutorialEngine {
    /// Mount a fresh engine.
    ///
    /// If the store holds an index strictly between 0 and the step count the
    /// engine waits for [`resolve_resume`](Self::resolve_resume); otherwise it
    /// enters the first step immediately. A failing store disables
    /// resumption and persistence for this instance.
    ///
    /// Panics if `steps` is empty.
    pub fn mount(
        steps: &'static [TutorialStep],
        store: Box<dyn ProgressStore>,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Self {
        assert!(!steps.is_empty(), "tutorial catalog is empty");

        let mut engine = Self {
            steps,
            index: 0,
            input: String::new(),
            history: Vec::new(),
            output: Vec::new(),
            output_finished: false,
            animating: false,
            step_completed: false,
            pending_resume: None,
            exit_requested: false,
            exited: false,
            store,
            store_available: true,
            player: OutputPlayer::new(events),
        };

        let stored = match engine.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Progress storage unavailable, resumption disabled");
                engine.store_available = false;
                None
            }
        };

        match stored {
            Some(index) if index > 0 && index < steps.len() => {
                info!(index, "Found resumable tutorial progress");
                engine.pending_resume = Some(index);
            }
            _ => engine.enter(0),
        }
        engine
    }

    /// Answer the resumption offer: resume at the stored step or start over
    pub fn resolve_resume(&mut self, resume: bool) -> Transition {
        match self.pending_resume.take() {
            Some(index) => {
                let target = if resume { index } else { 0 };
                info!(resume, target, "Resolved tutorial resumption");
                self.enter(target);
                Transition::Advanced(target)
            }
            None => Transition::Blocked,
        }
    }

    fn enter(&mut self, index: usize) {
        self.index = index;
        self.input.clear();
        self.output.clear();
        self.output_finished = false;
        self.step_completed = false;
        self.exit_requested = false;
        self.persist();

        let step = self.current_step();
        debug!(step = step.id, title = step.title, "Entering tutorial step");
        match step.mock_output {
            MockOutput::Static(text) => {
                self.output.push(text.to_string());
                self.animating = false;
                self.player.play_static();
            }
            MockOutput::Animated(produce) => {
                self.animating = true;
                self.player.play_animated(produce());
            }
        }
    }

    fn persist(&mut self) {
        if !self.store_available {
            return;
        }
        if let Err(e) = self.store.save(self.index) {
            warn!(error = %e, index = self.index, "Failed to save tutorial progress");
        }
    }

    fn finish(&mut self) {
        self.player.stop();
        self.animating = false;
        self.exit_requested = false;
        self.exited = true;
        if self.store_available {
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear tutorial progress");
            }
        }
        info!(step = self.current_step().id, "Left tutorial");
    }

    fn is_interactive(&self) -> bool {
        !self.exited && self.pending_resume.is_none()
    }

    /// Apply a player event; events from an older playback are dropped
    pub fn apply_player_event(&mut self, event: PlayerEvent) -> bool {
        if self.exited || !self.player.is_current(&event) {
            trace!(generation = event.generation(), "Dropping stale player event");
            return false;
        }
        match event {
            PlayerEvent::Line { content, .. } => self.output.push(content),
            PlayerEvent::Completed { .. } => self.output_finished = true,
            PlayerEvent::Ended { .. } => self.animating = false,
        }
        true
    }

    pub fn insert_char(&mut self, c: char) {
        if self.is_interactive() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.is_interactive() {
            self.input.pop();
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.is_interactive() {
            self.input = text.into();
        }
    }

    /// Fill the input with the expected command without submitting it
    pub fn autocomplete(&mut self) -> bool {
        match self.current_step().expected_command {
            Some(expected) if self.is_interactive() => {
                self.input = expected.to_string();
                true
            }
            _ => false,
        }
    }

    /// Submit the expected command as if it had been typed
    pub fn auto_submit(&mut self) -> Submission {
        match self.current_step().expected_command {
            Some(expected) => self.submit_text(expected),
            None => Submission::Ignored,
        }
    }

    /// Submit the current input line
    pub fn submit(&mut self) -> Submission {
        let text = self.input.clone();
        self.submit_text(&text)
    }

    pub fn submit_text(&mut self, raw: &str) -> Submission {
        if !self.is_interactive() {
            return Submission::Ignored;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Submission::Ignored;
        }

        if self.is_last_step() && is_exit(trimmed) {
            self.input.clear();
            self.finish();
            return Submission::Exit;
        }

        if self.step_completed {
            return Submission::AlreadyComplete;
        }

        let step = self.current_step();
        let unlocked = match step.expected_command {
            Some(expected) => accepts(expected, trimmed),
            None => is_continue(trimmed) && self.continue_step(),
        };

        if unlocked {
            self.step_completed = true;
            self.input.clear();
            self.history.push(trimmed.to_string());
            debug!(step = step.id, "Step completed");
            return Submission::Accepted;
        }

        let hint = match step.expected_command {
            Some(expected) => format!("Hint: Try typing \"{expected}\""),
            None if self.is_last_step() => {
                format!("Type '{EXIT_KEYWORD}' to return to the main terminal.")
            }
            None => "Wait for the output to finish, then continue.".to_string(),
        };
        debug!(step = step.id, "Rejected tutorial command");
        Submission::Rejected { hint }
    }

    /// Explicit continue on a step without an expected command.
    ///
    /// Only allowed once the step's output has finished.
    pub fn continue_step(&mut self) -> bool {
        if !self.is_interactive()
            || self.current_step().expected_command.is_some()
            || !self.output_finished
        {
            return false;
        }
        self.step_completed = true;
        true
    }

    /// Move past a completed step; on the terminal step this finishes
    pub fn next_step(&mut self) -> Transition {
        if !self.is_interactive() || !self.step_completed {
            return Transition::Blocked;
        }
        if self.is_last_step() {
            self.finish();
            Transition::Exited
        } else {
            let next = self.index + 1;
            self.enter(next);
            Transition::Advanced(next)
        }
    }

    /// Ask to leave the tutorial; needs [`confirm_exit`](Self::confirm_exit)
    pub fn request_exit(&mut self) -> bool {
        if !self.is_interactive() || !self.current_step().allow_skip {
            return false;
        }
        self.exit_requested = true;
        true
    }

    pub fn confirm_exit(&mut self, confirmed: bool) -> Transition {
        if !self.exit_requested || self.exited {
            return Transition::Blocked;
        }
        self.exit_requested = false;
        if confirmed {
            self.finish();
            Transition::Exited
        } else {
            Transition::Blocked
        }
    }

    /// Copy the expected command; state is never touched
    pub fn copy_command(&self, clipboard: &mut dyn Clipboard) -> Result<&'static str, TutorialError> {
        let step = self.current_step();
        let expected = step
            .expected_command
            .ok_or(TutorialError::NoCommand(step.id))?;
        clipboard.set_text(expected)?;
        Ok(expected)
    }

    /// Name of the file the current step offers
    pub fn download_file(&self) -> Result<&'static str, TutorialError> {
        let step = self.current_step();
        step.downloadable_file
            .ok_or(TutorialError::NoDownload(step.id))
    }

    /// Save the step's downloadable file into `dest_dir`
    pub async fn download(
        &self,
        assets: &AssetStore,
        dest_dir: &Path,
    ) -> Result<PathBuf, TutorialError> {
        let name = self.download_file()?;
        assets.save(name, dest_dir).await
    }

    pub fn steps(&self) -> &'static [TutorialStep] {
        self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_step(&self) -> &'static TutorialStep {
        &self.steps[self.index]
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.index == self.steps.len() - 1
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn output_finished(&self) -> bool {
        self.output_finished
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn step_completed(&self) -> bool {
        self.step_completed
    }

    pub fn pending_resume(&self) -> Option<usize> {
        self.pending_resume
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    pub fn resume_enabled(&self) -> bool {
        self.store_available
    }

    /// Fraction of the catalog reached, counting the current step
    pub fn progress(&self) -> f64 {
        (self.index + 1) as f64 / self.steps.len() as f64
    }

    pub fn markers(&self) -> Vec<StepMarker> {
        (0..self.steps.len())
            .map(|i| match i.cmp(&self.index) {
                std::cmp::Ordering::Less => StepMarker::Done,
                std::cmp::Ordering::Equal => StepMarker::Current,
                std::cmp::Ordering::Greater => StepMarker::Pending,
            })
            .collect()
    }
}
