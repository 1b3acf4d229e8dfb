//! Line classification and ANSI rendering
//!
//! Output text is coloured by sniffing each line's prefix and content. The
//! classification is purely cosmetic: nothing in the session or tutorial
//! branches on it.

use crate::line::{Span, StyledLine, Tone};
use crossterm::style::{Attribute, Color, Stylize};
use regex::Regex;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthChar;

/// Display category of a single output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Success,
    Info,
    Warning,
    Error,
    Progress,
    Tree,
    Data,
    Header,
    Prompt,
    Plain,
}

impl LineClass {
    pub fn tone(self) -> Tone {
        match self {
            LineClass::Success | LineClass::Progress | LineClass::Prompt => Tone::Green,
            LineClass::Info | LineClass::Tree => Tone::Cyan,
            LineClass::Warning | LineClass::Header => Tone::Yellow,
            LineClass::Error => Tone::Red,
            LineClass::Data => Tone::Purple,
            LineClass::Plain => Tone::Fg,
        }
    }

    pub fn bold(self) -> bool {
        matches!(self, LineClass::Progress)
    }
}

/// Classify one line of scripted output. First match wins.
pub fn classify(line: &str) -> LineClass {
    if line.starts_with('✓') || line.starts_with('🎉') || line.starts_with('✅') {
        LineClass::Success
    } else if line.starts_with('🔧')
        || line.starts_with('📝')
        || line.starts_with('⬆')
        || line.starts_with('📦')
        || line.starts_with('📄')
    {
        LineClass::Info
    } else if line.starts_with('💡') || line.starts_with('⚠') {
        LineClass::Warning
    } else if line.starts_with('❌') || line.starts_with("Error") {
        LineClass::Error
    } else if line.contains('█') {
        LineClass::Progress
    } else if line.starts_with("  ")
        && (line.contains("├─") || line.contains("└─") || line.contains('│'))
    {
        LineClass::Tree
    } else if line.starts_with('{')
        || line.starts_with('}')
        || line.contains("\"role\":")
        || line.contains("\"content\":")
    {
        LineClass::Data
    } else if line.starts_with('#') || line.trim_end().ends_with(':') {
        LineClass::Header
    } else if line.contains('$') && !line.starts_with(' ') {
        LineClass::Prompt
    } else {
        LineClass::Plain
    }
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("static URL pattern"))
}

/// Split text into spans, turning every embedded URL into a link span.
pub fn split_urls(text: &str, tone: Tone) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for m in url_regex().find_iter(text) {
        if m.start() > last {
            spans.push(Span::new(&text[last..m.start()], tone));
        }
        spans.push(Span::link(m.as_str(), m.as_str()));
        last = m.end();
    }

    if last < text.len() || spans.is_empty() {
        spans.push(Span::new(&text[last..], tone));
    }
    spans
}

/// Convert a block of scripted output into classified, link-aware lines
pub fn text_to_lines(content: &str) -> Vec<StyledLine> {
    content
        .split('\n')
        .map(|raw| {
            let class = classify(raw);
            let mut spans = split_urls(raw, class.tone());
            if class.bold() {
                for span in spans.iter_mut().filter(|s| s.link.is_none()) {
                    span.bold = true;
                }
            }
            StyledLine { spans }
        })
        .collect()
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Fg => Color::Grey,
        Tone::Dim => Color::DarkGrey,
        Tone::Green => Color::Green,
        Tone::Cyan => Color::Cyan,
        Tone::Yellow => Color::Yellow,
        Tone::Red => Color::Red,
        Tone::Purple => Color::Magenta,
        Tone::Blue => Color::Blue,
    }
}

/// Longest prefix of `text` that fits in `max` columns, and its width
fn fit_width(text: &str, max: usize) -> (&str, usize) {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            return (&text[..idx], used);
        }
        used += w;
    }
    (text, used)
}

/// Render a styled line to an ANSI string no wider than `width` columns.
///
/// Link spans are wrapped in OSC 8 hyperlink sequences so terminals that
/// support them make the URL clickable.
pub fn render_line_ansi(line: &StyledLine, width: usize) -> String {
    let mut output = String::new();
    let mut remaining = width;

    for span in &line.spans {
        if remaining == 0 {
            break;
        }
        let (text, used) = fit_width(&span.text, remaining);
        remaining -= used;
        if text.is_empty() {
            continue;
        }

        let mut styled = text.with(tone_color(span.tone));
        if span.bold {
            styled = styled.attribute(Attribute::Bold);
        }
        if span.link.is_some() {
            styled = styled.attribute(Attribute::Underlined);
        }

        match &span.link {
            Some(url) => {
                output.push_str(&format!("\x1b]8;;{url}\x1b\\{styled}\x1b]8;;\x1b\\"));
            }
            None => output.push_str(&styled.to_string()),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_urls_middle() {
        let spans = split_urls("🔗 View at: https://huggingface.co/x done", Tone::Fg);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].link.as_deref(), Some("https://huggingface.co/x"));
        assert_eq!(spans[2].text, " done");
    }

    #[test]
    fn test_split_urls_without_url() {
        let spans = split_urls("plain", Tone::Cyan);
        assert_eq!(spans, vec![Span::new("plain", Tone::Cyan)]);
    }

    #[test]
    fn test_split_urls_empty_line_keeps_one_span() {
        assert_eq!(split_urls("", Tone::Fg).len(), 1);
    }

    #[test]
    fn test_fit_width_stops_before_wide_glyph() {
        let (text, used) = fit_width("ab🚀", 3);
        assert_eq!(text, "ab");
        assert_eq!(used, 2);
    }

    #[test]
    fn test_progress_lines_are_bold() {
        let lines = text_to_lines("  dataset.jsonl ███████████ 100% (2.3 KB)");
        assert!(lines[0].spans.iter().all(|s| s.bold));
    }

    #[test]
    fn test_render_truncates() {
        let line = StyledLine::plain("abcdefgh");
        let out = render_line_ansi(&line, 4);
        assert!(out.contains("abcd"));
        assert!(!out.contains("abcde"));
    }
}
