//! Terminal presentation for fabterm
//!
//! Styled output lines, the cosmetic line classifier, the scroll viewport and
//! the window chrome that hosts either the shell session or the tutorial.

pub mod chrome;
pub mod line;
pub mod style;
pub mod viewport;

pub use chrome::{draw, InputLine, Modal, Window};
pub use line::{Span, StyledLine, Tone};
pub use style::{classify, render_line_ansi, split_urls, text_to_lines, LineClass};
pub use viewport::Viewport;

use thiserror::Error;

/// Smallest window the chrome can lay out
pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 8;

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Terminal too small: {0}x{1}")]
    TooSmall(u16, u16),

    #[error("Terminal I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
