//! Output player
//!
//! Plays a step's scripted output as events on a channel. Static output only
//! needs a settle delay before completion is signalled; animated output waits
//! each declared delay in order before emitting its line.
//!
//! Every playback gets a new generation number. Starting a new playback or
//! stopping aborts the previous task, and the consumer drops any event whose
//! generation is not current, so lines already queued from an old step can
//! never land in the new one.

use crate::catalog::AnimatedOutput;
use crate::timer::TaskHandle;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Delay before static output reports completion, letting the UI settle
pub const STATIC_SETTLE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A new chunk of output to append
    Line { generation: u64, content: String },
    /// The step's output is complete; sent at most once per playback
    Completed { generation: u64 },
    /// No more lines will follow
    Ended { generation: u64 },
}

impl PlayerEvent {
    pub fn generation(&self) -> u64 {
        match self {
            PlayerEvent::Line { generation, .. }
            | PlayerEvent::Completed { generation }
            | PlayerEvent::Ended { generation } => *generation,
        }
    }
}

pub struct OutputPlayer {
    tx: mpsc::UnboundedSender<PlayerEvent>,
    generation: u64,
    task: Option<TaskHandle>,
}

impl OutputPlayer {
    pub fn new(tx: mpsc::UnboundedSender<PlayerEvent>) -> Self {
        Self {
            tx,
            generation: 0,
            task: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, event: &PlayerEvent) -> bool {
        event.generation() == self.generation
    }

    /// Abort the running playback and invalidate its queued events
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        self.generation += 1;
    }

    /// Signal completion of already displayed static output after the settle delay
    pub fn play_static(&mut self) -> u64 {
        self.stop();
        let generation = self.generation;
        let tx = self.tx.clone();
        debug!(generation, "Playing static output");

        self.task = Some(TaskHandle::spawn(async move {
            tokio::time::sleep(STATIC_SETTLE).await;
            let _ = tx.send(PlayerEvent::Completed { generation });
            let _ = tx.send(PlayerEvent::Ended { generation });
        }));
        generation
    }

    /// Play an animated sequence line by line
    pub fn play_animated(&mut self, output: AnimatedOutput) -> u64 {
        self.stop();
        let generation = self.generation;
        let tx = self.tx.clone();
        debug!(
            generation,
            lines = output.steps.len(),
            total_ms = output.total_delay().as_millis() as u64,
            "Playing animated output"
        );

        self.task = Some(TaskHandle::spawn(async move {
            let mut completed = false;
            for line in output.steps {
                tokio::time::sleep(line.delay).await;
                trace!(generation, "Animated line");
                if tx
                    .send(PlayerEvent::Line {
                        generation,
                        content: line.content.to_string(),
                    })
                    .is_err()
                {
                    return;
                }
                if line.completes && !completed {
                    completed = true;
                    let _ = tx.send(PlayerEvent::Completed { generation });
                }
            }
            let _ = tx.send(PlayerEvent::Ended { generation });
        }));
        generation
    }
}

impl Drop for OutputPlayer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}
