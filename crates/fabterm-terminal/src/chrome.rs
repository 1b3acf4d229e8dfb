//! Window chrome
//!
//! Lays out the title bar, an optional fixed header, the scrolling body, an
//! optional modal prompt, the input line and footer hints, and draws the
//! result with crossterm.

use crate::line::{Span, StyledLine, Tone};
use crate::style::render_line_ansi;
use crate::viewport::Viewport;
use crate::{TerminalError, MIN_HEIGHT, MIN_WIDTH};
use crossterm::{
    cursor, queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::Write;
use tracing::debug;

/// Block cursor drawn at the end of the input text
const CURSOR_GLYPH: &str = "▊";

/// The editable command line at the bottom of the window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    pub prompt: Vec<Span>,
    pub text: String,
    pub placeholder: Option<String>,
}

impl InputLine {
    fn to_line(&self) -> StyledLine {
        let mut line = StyledLine {
            spans: self.prompt.clone(),
        };
        if self.text.is_empty() {
            line.push(Span::new(CURSOR_GLYPH, Tone::Green));
            if let Some(placeholder) = &self.placeholder {
                line.push(Span::new(format!(" {placeholder}"), Tone::Dim));
            }
        } else {
            line.push(Span::new(self.text.clone(), Tone::Cyan));
            line.push(Span::new(CURSOR_GLYPH, Tone::Green));
        }
        line
    }
}

/// Prompts that take over the bottom of the window until answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Yes/no question
    Confirm(String),
    /// Message dismissed with any key
    Notice(String),
}

impl Modal {
    fn lines(&self) -> Vec<StyledLine> {
        let (message, hint) = match self {
            Modal::Confirm(message) => (message, "[y] yes   [n] no"),
            Modal::Notice(message) => (message, "press any key to continue"),
        };
        let mut lines: Vec<StyledLine> = message
            .lines()
            .map(|l| StyledLine::toned(l, Tone::Yellow))
            .collect();
        lines.push(StyledLine::toned(hint, Tone::Dim));
        lines
    }
}

/// One frame of window content
#[derive(Debug, Clone, Default)]
pub struct Window {
    pub title: String,
    /// Lines pinned under the title bar that never scroll
    pub header: Vec<StyledLine>,
    pub body: Vec<StyledLine>,
    pub modal: Option<Modal>,
    pub input: Option<InputLine>,
    pub footer: Vec<StyledLine>,
}

impl Window {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    fn title_bar(&self) -> StyledLine {
        StyledLine::new()
            .with(Span::new("● ", Tone::Red))
            .with(Span::new("● ", Tone::Yellow))
            .with(Span::new("●", Tone::Green))
            .with(Span::new(format!("   {}", self.title), Tone::Fg))
    }

    fn rule(width: usize) -> StyledLine {
        StyledLine::toned("─".repeat(width), Tone::Dim)
    }

    /// Lay the window out into `height` rows of ANSI text.
    ///
    /// The body is windowed through `viewport`; everything else is fixed.
    pub fn render(
        &self,
        viewport: &mut Viewport,
        width: u16,
        height: u16,
    ) -> Result<Vec<String>, TerminalError> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(TerminalError::TooSmall(width, height));
        }
        let cols = width as usize;

        let mut top = vec![self.title_bar(), Self::rule(cols)];
        top.extend(self.header.iter().cloned());

        let mut bottom = Vec::new();
        if let Some(modal) = &self.modal {
            bottom.push(Self::rule(cols));
            bottom.extend(modal.lines());
        }
        if let Some(input) = &self.input {
            bottom.push(Self::rule(cols));
            bottom.push(input.to_line());
        }
        bottom.extend(self.footer.iter().cloned());

        let fixed = top.len() + bottom.len();
        if fixed >= height as usize {
            debug!(fixed, height, "No room left for the body");
            return Err(TerminalError::TooSmall(width, height));
        }
        let body_height = height as usize - fixed;
        let range = viewport.visible_range(self.body.len(), body_height);

        let mut rows: Vec<String> = top.iter().map(|l| render_line_ansi(l, cols)).collect();
        rows.extend(
            self.body[range]
                .iter()
                .map(|l| render_line_ansi(l, cols)),
        );
        while rows.len() < top.len() + body_height {
            rows.push(String::new());
        }
        rows.extend(bottom.iter().map(|l| render_line_ansi(l, cols)));
        Ok(rows)
    }
}

/// Paint rendered rows onto the terminal
pub fn draw<W: Write>(out: &mut W, rows: &[String]) -> Result<(), TerminalError> {
    for (y, row) in rows.iter().enumerate() {
        queue!(
            out,
            cursor::MoveTo(0, y as u16),
            Print(row),
            Clear(ClearType::UntilNewLine)
        )?;
    }
    queue!(out, Clear(ClearType::FromCursorDown))?;
    out.flush()?;
    Ok(())
}
