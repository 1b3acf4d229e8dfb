//! Screens
//!
//! Turns session and tutorial state into [`Window`] frames. Nothing here
//! changes state.

use crate::session::{Session, USER};
use fabterm_terminal::{text_to_lines, InputLine, Modal, Span, StyledLine, Tone, Window};
use fabterm_tutorial::{StepMarker, TutorialEngine};

pub const SESSION_TITLE: &str = "deepfabric@terminal:~";
pub const TUTORIAL_TITLE: &str = "deepfabric@tutorial";

const BANNER: &str = r" ____                   _____     _          _
|  _ \  ___  ___ _ __  |  ___|_ _| |__  _ __(_) ___
| | | |/ _ \/ _ \ '_ \ | |_ / _` | '_ \| '__| |/ __|
| |_| |  __/  __/ |_) ||  _| (_| | |_) | |  | | (__
|____/ \___|\___| .__/ |_|  \__,_|_.__/|_|  |_|\___|
                |_|";

const PROGRESS_BAR_CELLS: usize = 30;

fn session_prompt() -> Vec<Span> {
    vec![
        Span::new(USER, Tone::Green),
        Span::new(":", Tone::Fg),
        Span::new("~", Tone::Blue),
        Span::new("$ ", Tone::Fg),
    ]
}

pub fn session_window(session: &Session) -> Window {
    let mut window = Window::new(SESSION_TITLE);

    let mut body: Vec<StyledLine> = BANNER
        .lines()
        .map(|l| StyledLine::toned(l, Tone::Cyan))
        .collect();
    body.push(StyledLine::blank());
    body.push(
        StyledLine::new()
            .with(Span::new("DeepFabric", Tone::Green))
            .with(Span::new(" - A micro agent training pipeline", Tone::Fg)),
    );
    body.push(StyledLine::toned("Version 1.0.0-beta", Tone::Yellow));
    body.push(
        StyledLine::plain("Type ")
            .with(Span::new("'help'", Tone::Cyan))
            .with(Span::new(" for available commands", Tone::Fg)),
    );

    for entry in session.log() {
        body.push(StyledLine::blank());
        let mut prompt = StyledLine {
            spans: session_prompt(),
        };
        prompt.push(Span::new(entry.command.clone(), Tone::Fg));
        body.push(prompt);
        body.extend(entry.output.iter().cloned().map(|l| l.indented(2)));
    }
    window.body = body;

    window.input = Some(InputLine {
        prompt: session_prompt(),
        text: session.input().to_string(),
        placeholder: Some("Type a command...".into()),
    });
    window.footer = vec![
        StyledLine::toned("💡 Tip: Type 'help' to see all commands", Tone::Dim),
        StyledLine::toned("⌨️  Use ↑/↓ arrows for command history", Tone::Dim),
    ];
    window
}

/// Tutorial-only UI state that lives outside the engine
#[derive(Debug, Clone, Default)]
pub struct TutorialOverlay {
    /// One-line, non-blocking message under the output
    pub status: Option<StyledLine>,
    /// Blocking message dismissed with any key
    pub notice: Option<String>,
}

fn progress_bar(fraction: f64) -> StyledLine {
    let filled = ((fraction * PROGRESS_BAR_CELLS as f64).round() as usize).min(PROGRESS_BAR_CELLS);
    StyledLine::new()
        .with(Span::new("█".repeat(filled), Tone::Green))
        .with(Span::new("░".repeat(PROGRESS_BAR_CELLS - filled), Tone::Dim))
        .with(Span::new(format!(" {:>3.0}%", fraction * 100.0), Tone::Fg))
}

fn step_markers(engine: &TutorialEngine) -> StyledLine {
    let mut line = StyledLine::new();
    for (i, marker) in engine.markers().into_iter().enumerate() {
        if i > 0 {
            line.push(Span::new(" ", Tone::Fg));
        }
        line.push(match marker {
            StepMarker::Done => Span::new("●", Tone::Green),
            StepMarker::Current => Span::new("◉", Tone::Cyan).bold(),
            StepMarker::Pending => Span::new("○", Tone::Dim),
        });
    }
    line
}

fn action_hints(engine: &TutorialEngine) -> StyledLine {
    let step = engine.current_step();
    let mut line = StyledLine::new();
    let next = if engine.is_last_step() {
        "[Enter] Finish Tutorial"
    } else {
        "[Enter] Next Step →"
    };
    line.push(Span::new(next, Tone::Green).bold());
    if step.expected_command.is_some() {
        line.push(Span::new("   [Ctrl-Y] Copy", Tone::Cyan));
    }
    line
}

pub fn tutorial_window(engine: &TutorialEngine, overlay: &TutorialOverlay) -> Window {
    let mut window = Window::new(TUTORIAL_TITLE);
    let step = engine.current_step();

    window.header = vec![
        StyledLine::new().with(
            Span::new(
                format!("Step {}/{}: {}", step.id, engine.step_count(), step.title),
                Tone::Cyan,
            )
            .bold(),
        ),
        StyledLine::plain(step.description),
        progress_bar(engine.progress()),
        step_markers(engine),
    ];

    let mut body = Vec::new();
    for command in engine.history() {
        body.push(
            StyledLine::new()
                .with(Span::new("$ ", Tone::Green))
                .with(Span::new(command.clone(), Tone::Cyan)),
        );
    }
    if !engine.history().is_empty() {
        body.push(StyledLine::blank());
    }
    for chunk in engine.output() {
        body.extend(text_to_lines(chunk));
    }
    if engine.is_animating() {
        body.push(StyledLine::toned("Processing...", Tone::Dim));
    }
    if let Some(file) = step.downloadable_file {
        body.push(StyledLine::blank());
        body.push(StyledLine::toned(format!("📄 [Ctrl-S] Download {file}"), Tone::Cyan));
    }
    if let Some(status) = &overlay.status {
        body.push(StyledLine::blank());
        body.push(status.clone());
    }
    if engine.step_completed() {
        body.push(StyledLine::blank());
        body.push(action_hints(engine));
    }
    window.body = body;

    window.modal = if let Some(index) = engine.pending_resume() {
        Some(Modal::Confirm(format!("Resume tutorial from step {}?", index + 1)))
    } else if engine.exit_requested() {
        Some(Modal::Confirm("Are you sure you want to exit the tutorial?".into()))
    } else {
        overlay.notice.clone().map(Modal::Notice)
    };

    // The terminal step keeps its input after completion so `exit` still works
    if !engine.step_completed() || engine.is_last_step() {
        let placeholder = step.command_placeholder.unwrap_or(match step.expected_command {
            Some(_) => "Type command...",
            None if engine.is_last_step() => "Type 'exit' to return...",
            None => "Type 'continue' or press Enter...",
        });
        window.input = Some(InputLine {
            prompt: vec![Span::new("$ ", Tone::Green)],
            text: engine.input().to_string(),
            placeholder: Some(placeholder.to_string()),
        });
    }

    let mut footer = StyledLine::new();
    if step.expected_command.is_some() && !engine.step_completed() {
        footer.push(Span::new("Tab auto-fill · Ctrl-A auto-complete · Enter run", Tone::Dim));
    } else if !engine.step_completed() {
        footer.push(Span::new("Enter or Ctrl-N to continue →", Tone::Dim));
    } else {
        footer.push(Span::new("Ctrl-N next", Tone::Dim));
    }
    if step.allow_skip {
        footer.push(Span::new(" · Esc exit tutorial", Tone::Dim));
    }
    footer.push(Span::new(" · Ctrl-C quit", Tone::Dim));
    window.footer = vec![footer];
    window
}
