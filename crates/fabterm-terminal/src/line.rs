//! Styled lines
//!
//! The unit of everything fabterm displays: a line made of spans, each span
//! carrying a colour role and an optional hyperlink target.

use unicode_width::UnicodeWidthStr;

/// Foreground colour roles, mirroring the site's terminal palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Fg,
    Dim,
    Green,
    Cyan,
    Yellow,
    Red,
    Purple,
    Blue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
    pub bold: bool,
    /// Target URL when the span is rendered as a hyperlink
    pub link: Option<String>,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            bold: false,
            link: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Blue,
            bold: false,
            link: Some(url.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<Span>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::toned(text, Tone::Fg)
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            spans: vec![Span::new(text, tone)],
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Prefix every span with indentation
    pub fn indented(mut self, columns: usize) -> Self {
        if columns > 0 {
            self.spans.insert(0, Span::new(" ".repeat(columns), Tone::Fg));
        }
        self
    }

    /// Plain text content without styling
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Display width in terminal columns
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.width()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

impl From<&str> for StyledLine {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}
