//! Scripted tutorial for fabterm
//!
//! The step catalog, the timed output player and the tutorial engine that
//! gates progress on typed commands and persists the current step between
//! runs.

pub mod assets;
pub mod catalog;
pub mod engine;
pub mod matcher;
pub mod player;
pub mod progress;
pub mod timer;

pub use assets::AssetStore;
pub use catalog::{catalog, AnimatedLine, AnimatedOutput, MockOutput, TutorialStep, EXIT_KEYWORD};
pub use engine::{Clipboard, StepMarker, Submission, Transition, TutorialEngine};
pub use matcher::{accepts, is_exit, normalize};
pub use player::{OutputPlayer, PlayerEvent};
pub use progress::{
    FileProgressStore, MemoryProgressStore, ProgressStore, UnavailableStore, PROGRESS_KEY,
};
pub use timer::{schedule_after, TaskHandle};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TutorialError {
    #[error("Progress storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Progress storage I/O error: {0}")]
    StorageIo(#[from] std::io::Error),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Failed to save {name}: {source}")]
    Download {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Step {0} has no command to copy")]
    NoCommand(u32),

    #[error("Step {0} has no downloadable file")]
    NoDownload(u32),
}
