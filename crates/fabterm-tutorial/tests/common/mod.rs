//! Shared helpers for tutorial tests

#![allow(dead_code)]

use fabterm_tutorial::{
    catalog, AnimatedLine, AnimatedOutput, Clipboard, MemoryProgressStore, MockOutput,
    PlayerEvent, ProgressStore, TutorialEngine, TutorialError, TutorialStep,
};
use tokio::sync::mpsc;

pub type Events = mpsc::UnboundedReceiver<PlayerEvent>;

/// Mount the real catalog on a shared in-memory store
pub fn mount(store: &MemoryProgressStore) -> (TutorialEngine, Events) {
    mount_with(catalog(), Box::new(store.clone()))
}

pub fn mount_with(
    steps: &'static [TutorialStep],
    store: Box<dyn ProgressStore>,
) -> (TutorialEngine, Events) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TutorialEngine::mount(steps, store, tx), rx)
}

/// Feed player events into the engine until the current playback ends
pub async fn play_to_end(engine: &mut TutorialEngine, events: &mut Events) {
    while let Some(event) = events.recv().await {
        let is_end = matches!(event, PlayerEvent::Ended { .. });
        if engine.apply_player_event(event) && is_end {
            break;
        }
    }
}

/// Apply exactly `count` current-generation line events
pub async fn play_lines(engine: &mut TutorialEngine, events: &mut Events, count: usize) {
    let mut seen = 0;
    while seen < count {
        let event = events.recv().await.expect("player event");
        let is_line = matches!(event, PlayerEvent::Line { .. });
        if engine.apply_player_event(event) && is_line {
            seen += 1;
        }
    }
}

pub fn animated_contents(step: &TutorialStep) -> Vec<&'static str> {
    match step.mock_output {
        MockOutput::Animated(produce) => produce().steps.iter().map(|l| l.content).collect(),
        MockOutput::Static(text) => vec![text],
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub contents: Option<String>,
}

impl Clipboard for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), TutorialError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

pub struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), TutorialError> {
        Err(TutorialError::Clipboard("access denied".into()))
    }
}

fn short_animation() -> AnimatedOutput {
    AnimatedOutput::new(vec![
        AnimatedLine::new(100, "working"),
        AnimatedLine::completing(100, "done"),
    ])
}

/// Small catalog with a confirmation-only middle step
pub static CONFIRM_STEPS: [TutorialStep; 3] = [
    TutorialStep {
        id: 1,
        title: "Type",
        description: "Type a command",
        expected_command: Some("echo hi"),
        command_placeholder: None,
        mock_output: MockOutput::Animated(short_animation),
        allow_skip: true,
        downloadable_file: None,
    },
    TutorialStep {
        id: 2,
        title: "Read",
        description: "Read and continue",
        expected_command: None,
        command_placeholder: None,
        mock_output: MockOutput::Static("just read this"),
        allow_skip: true,
        downloadable_file: None,
    },
    TutorialStep {
        id: 3,
        title: "End",
        description: "The end",
        expected_command: None,
        command_placeholder: None,
        mock_output: MockOutput::Static("bye"),
        allow_skip: false,
        downloadable_file: None,
    },
];
