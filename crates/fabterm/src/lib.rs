//! fabterm
//!
//! The DeepFabric terminal: a small builtin shell that can hand over to the
//! scripted tutorial, drawn in a raw-mode terminal.

pub mod app;
pub mod clipboard;
pub mod config;
pub mod links;
pub mod navigator;
pub mod session;
pub mod terminal_guard;
pub mod view;

pub use app::{App, AppParts, Background, Control, ProgressBackend};
pub use config::{AppConfig, Args, LogLevel};
pub use links::{Destination, LinkTable};
pub use navigator::{Navigator, Opened, RecordingNavigator};
pub use session::{CommandLogEntry, Navigation, Session, SessionAction};
