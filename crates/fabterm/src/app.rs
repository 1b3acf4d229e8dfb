//! Application loop
//!
//! [`App`] owns the session, the tutorial engine while one is mounted, and
//! the platform glue. Key presses, player events and due navigations are
//! applied to it one at a time; after each one the current screen is drawn.

use crate::clipboard::SystemClipboard;
use crate::config::AppConfig;
use crate::links::LinkTable;
use crate::navigator::{self, Navigator};
use crate::session::{Navigation, Session, SessionAction};
use crate::terminal_guard::TerminalGuard;
use crate::view::{self, TutorialOverlay};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use fabterm_terminal::{draw, StyledLine, TerminalError, Tone, Viewport, Window, MIN_HEIGHT, MIN_WIDTH};
use fabterm_tutorial::{
    catalog, AssetStore, Clipboard, FileProgressStore, MemoryProgressStore, PlayerEvent,
    ProgressStore, Submission, TaskHandle, Transition, TutorialEngine, TutorialError,
    UnavailableStore,
};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time;
use tracing::subscriber::NoSubscriber;
use tracing::{debug, info};
use tracing_subscriber::util::SubscriberInitExt;

/// Lines moved per PageUp/PageDown
const SCROLL_PAGE: usize = 10;
const REDRAW_INTERVAL: Duration = Duration::from_millis(500);
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Where tutorial progress lives
#[derive(Debug, Clone)]
pub enum ProgressBackend {
    File(PathBuf),
    Memory(MemoryProgressStore),
    Unavailable(String),
}

impl ProgressBackend {
    fn open(&self) -> Box<dyn ProgressStore> {
        match self {
            ProgressBackend::File(dir) => Box::new(FileProgressStore::new(dir)),
            ProgressBackend::Memory(store) => Box::new(store.clone()),
            ProgressBackend::Unavailable(reason) => Box::new(UnavailableStore::new(reason.clone())),
        }
    }
}

/// Everything the app needs from the outside world
pub struct AppParts {
    pub links: LinkTable,
    pub progress: ProgressBackend,
    pub assets: AssetStore,
    pub download_dir: PathBuf,
    pub clipboard: Box<dyn Clipboard + Send>,
    pub navigator: Box<dyn Navigator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Something that happened without a key press
#[derive(Debug)]
pub enum Background {
    Player(PlayerEvent),
    Navigation(Navigation),
    /// A Ctrl-S download finished
    Download(DownloadResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Stay,
    Leave,
}

type DownloadResult = Result<PathBuf, TutorialError>;

struct TutorialMode {
    engine: TutorialEngine,
    events: mpsc::UnboundedReceiver<PlayerEvent>,
    overlay: TutorialOverlay,
    download_tx: mpsc::UnboundedSender<DownloadResult>,
    downloads: mpsc::UnboundedReceiver<DownloadResult>,
    /// In-flight download; aborted when the tutorial is left
    download_task: Option<TaskHandle>,
}

impl TutorialMode {
    fn new(engine: TutorialEngine, events: mpsc::UnboundedReceiver<PlayerEvent>) -> Self {
        let (download_tx, downloads) = mpsc::unbounded_channel();
        Self {
            engine,
            events,
            overlay: TutorialOverlay::default(),
            download_tx,
            downloads,
            download_task: None,
        }
    }

    /// Save the current step's file off the event loop
    fn start_download(&mut self, assets: &AssetStore, dest_dir: &Path) {
        let name = match self.engine.download_file() {
            Ok(name) => name,
            Err(_) => {
                self.status("This step has no file to download.", Tone::Dim);
                return;
            }
        };
        let assets = assets.clone();
        let dest_dir = dest_dir.to_path_buf();
        let tx = self.download_tx.clone();
        self.download_task = Some(TaskHandle::spawn(async move {
            let _ = tx.send(assets.save(name, &dest_dir).await);
        }));
        self.status(format!("Downloading {name}..."), Tone::Dim);
    }

    fn finish_download(&mut self, result: DownloadResult) {
        self.download_task = None;
        match result {
            Ok(path) => self.status(format!("✓ Saved {}", path.display()), Tone::Green),
            Err(e) => {
                self.overlay.status = None;
                self.overlay.notice = Some(format!("Download failed: {e}"));
            }
        }
    }

    fn status(&mut self, text: impl Into<String>, tone: Tone) {
        self.overlay.status = Some(StyledLine::toned(text, tone));
    }

    /// Next/continue: finish the current step or move past it
    fn advance(&mut self) -> Flow {
        if !self.engine.step_completed() {
            match self.engine.current_step().expected_command {
                None if self.engine.continue_step() => self.overlay.status = None,
                None => self.status("Wait for the output to finish, then continue.", Tone::Yellow),
                Some(expected) => {
                    self.status(format!("Hint: Try typing \"{expected}\""), Tone::Yellow)
                }
            }
            return Flow::Stay;
        }
        match self.engine.next_step() {
            Transition::Exited => Flow::Leave,
            Transition::Advanced(_) => {
                self.overlay.status = None;
                Flow::Stay
            }
            Transition::Blocked => Flow::Stay,
        }
    }

    fn after_submission(&mut self, submission: Submission) -> Flow {
        match submission {
            Submission::Exit => return Flow::Leave,
            Submission::Accepted => self.overlay.status = None,
            Submission::AlreadyComplete => {
                self.status("Step complete. Press Enter to continue.", Tone::Dim)
            }
            Submission::Rejected { hint } => self.status(hint, Tone::Yellow),
            Submission::Ignored => {}
        }
        Flow::Stay
    }

    /// Whether typed characters go anywhere
    fn accepts_typing(&self) -> bool {
        !self.engine.step_completed() || self.engine.is_last_step()
    }
}

async fn recv_tutorial(tutorial: &mut Option<TutorialMode>) -> Option<Background> {
    match tutorial {
        Some(mode) => tokio::select! {
            Some(event) = mode.events.recv() => Some(Background::Player(event)),
            Some(result) = mode.downloads.recv() => Some(Background::Download(result)),
            else => None,
        },
        None => std::future::pending().await,
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

pub struct App {
    session: Session,
    tutorial: Option<TutorialMode>,
    nav_rx: mpsc::UnboundedReceiver<Navigation>,
    progress: ProgressBackend,
    assets: AssetStore,
    download_dir: PathBuf,
    clipboard: Box<dyn Clipboard + Send>,
    navigator: Box<dyn Navigator>,
    viewport: Viewport,
}

impl App {
    pub fn new(parts: AppParts) -> Self {
        let (nav_tx, nav_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(parts.links, nav_tx),
            tutorial: None,
            nav_rx,
            progress: parts.progress,
            assets: parts.assets,
            download_dir: parts.download_dir,
            clipboard: parts.clipboard,
            navigator: parts.navigator,
            viewport: Viewport::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tutorial(&self) -> Option<&TutorialEngine> {
        self.tutorial.as_ref().map(|mode| &mode.engine)
    }

    pub fn tutorial_status(&self) -> Option<String> {
        self.tutorial
            .as_ref()
            .and_then(|mode| mode.overlay.status.as_ref())
            .map(|line| line.text())
    }

    pub fn tutorial_notice(&self) -> Option<&str> {
        self.tutorial
            .as_ref()
            .and_then(|mode| mode.overlay.notice.as_deref())
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn start_tutorial(&mut self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TutorialEngine::mount(catalog(), self.progress.open(), tx);
        info!(resume_offered = engine.pending_resume().is_some(), "Tutorial started");
        self.tutorial = Some(TutorialMode::new(engine, rx));
        self.viewport.pin_to_bottom();
    }

    fn leave_tutorial(&mut self) {
        // Dropping the engine aborts its playback
        self.tutorial = None;
        self.viewport.pin_to_bottom();
        info!("Returned to session");
    }

    /// Wait for the next player event, finished download or due navigation
    pub async fn next_background(&mut self) -> Background {
        tokio::select! {
            Some(navigation) = self.nav_rx.recv() => Background::Navigation(navigation),
            Some(background) = recv_tutorial(&mut self.tutorial) => background,
            else => std::future::pending().await,
        }
    }

    pub fn apply_background(&mut self, background: Background) {
        match background {
            Background::Player(event) => {
                if let Some(mode) = self.tutorial.as_mut() {
                    if mode.engine.apply_player_event(event) {
                        self.viewport.pin_to_bottom();
                    }
                }
            }
            Background::Download(result) => {
                if let Some(mode) = self.tutorial.as_mut() {
                    mode.finish_download(result);
                    self.viewport.pin_to_bottom();
                }
            }
            Background::Navigation(navigation) => {
                debug!(name = navigation.name, "Navigation due");
                self.session
                    .complete_navigation(navigation, self.navigator.as_mut());
                if self.tutorial.is_none() {
                    self.viewport.pin_to_bottom();
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        if is_ctrl(&key, 'c') || is_ctrl(&key, 'd') {
            return Control::Quit;
        }
        match key.code {
            KeyCode::PageUp => {
                self.viewport.scroll_up(SCROLL_PAGE);
                return Control::Continue;
            }
            KeyCode::PageDown => {
                self.viewport.scroll_down(SCROLL_PAGE);
                return Control::Continue;
            }
            _ => {}
        }

        if self.tutorial.is_some() {
            if self.tutorial_key(key) == Flow::Leave {
                self.leave_tutorial();
            }
        } else {
            self.session_key(key);
        }
        Control::Continue
    }

    fn session_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => {
                self.viewport.pin_to_bottom();
                if self.session.submit() == SessionAction::StartTutorial {
                    self.start_tutorial();
                }
            }
            KeyCode::Up => self.session.recall_previous(),
            KeyCode::Down => self.session.recall_next(),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Char(c) if !ctrl => self.session.insert_char(c),
            _ => {}
        }
    }

    fn tutorial_key(&mut self, key: KeyEvent) -> Flow {
        let Some(mode) = self.tutorial.as_mut() else {
            return Flow::Stay;
        };
        self.viewport.pin_to_bottom();

        if mode.overlay.notice.take().is_some() {
            return Flow::Stay;
        }

        if mode.engine.pending_resume().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    mode.engine.resolve_resume(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    mode.engine.resolve_resume(false);
                }
                _ => {}
            }
            return Flow::Stay;
        }

        if mode.engine.exit_requested() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    match mode.engine.confirm_exit(true) {
                        Transition::Exited => Flow::Leave,
                        _ => Flow::Stay,
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    mode.engine.confirm_exit(false);
                    Flow::Stay
                }
                _ => Flow::Stay,
            };
        }

        if is_ctrl(&key, 'n') {
            return mode.advance();
        }
        if is_ctrl(&key, 'a') {
            let submission = mode.engine.auto_submit();
            return mode.after_submission(submission);
        }
        if is_ctrl(&key, 'y') {
            match mode.engine.copy_command(self.clipboard.as_mut()) {
                Ok(_) => mode.status("Command copied to clipboard!", Tone::Green),
                Err(TutorialError::NoCommand(_)) => {
                    mode.status("There is no command to copy on this step.", Tone::Dim)
                }
                Err(e) => mode.status(format!("Could not copy: {e}"), Tone::Red),
            }
            return Flow::Stay;
        }
        if is_ctrl(&key, 's') {
            mode.start_download(&self.assets, &self.download_dir);
            return Flow::Stay;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter if mode.engine.input().trim().is_empty() => mode.advance(),
            KeyCode::Enter => {
                let submission = mode.engine.submit();
                mode.after_submission(submission)
            }
            KeyCode::Tab => {
                mode.engine.autocomplete();
                Flow::Stay
            }
            KeyCode::Esc => {
                if !mode.engine.request_exit() {
                    mode.status("This step cannot be skipped.", Tone::Dim);
                }
                Flow::Stay
            }
            KeyCode::Backspace => {
                mode.engine.backspace();
                Flow::Stay
            }
            KeyCode::Char(c) if !ctrl && mode.accepts_typing() => {
                mode.engine.insert_char(c);
                Flow::Stay
            }
            _ => Flow::Stay,
        }
    }

    /// The frame for the current mode
    pub fn window(&self) -> Window {
        match &self.tutorial {
            Some(mode) => view::tutorial_window(&mode.engine, &mode.overlay),
            None => view::session_window(&self.session),
        }
    }

    /// Lay out the current frame at the given size
    pub fn frame(&mut self, cols: u16, rows: u16) -> Result<Vec<String>, TerminalError> {
        let window = self.window();
        match window.render(&mut self.viewport, cols, rows) {
            Err(TerminalError::TooSmall(..)) => Ok(vec![format!(
                "Terminal too small ({cols}x{rows}), need at least {MIN_WIDTH}x{MIN_HEIGHT}"
            )]),
            other => other,
        }
    }
}

/// Install the global subscriber.
///
/// Without a log file nothing may write to the terminal while it is in raw
/// mode, so a no-op subscriber is installed instead.
fn init_logging(config: &AppConfig) -> Result<()> {
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::from(config.log_level))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            let _ = NoSubscriber::default().try_init();
        }
    }
    Ok(())
}

pub async fn run(config: AppConfig) -> Result<()> {
    init_logging(&config)?;
    info!(site = %config.site_url, data_dir = ?config.data_dir, "Starting fabterm");

    let progress = match &config.data_dir {
        Some(dir) => ProgressBackend::File(dir.clone()),
        None => ProgressBackend::Unavailable("no data directory".into()),
    };
    let assets = match &config.assets_dir {
        Some(dir) => AssetStore::from_dir(dir),
        None => AssetStore::embedded(),
    };

    let mut app = App::new(AppParts {
        links: LinkTable::new(config.site_url.clone()),
        progress,
        assets,
        download_dir: config.download_dir.clone(),
        clipboard: Box::new(SystemClipboard::new()),
        navigator: navigator::for_config(config.open_browser),
    });
    if config.start_in_tutorial {
        app.start_tutorial();
    }

    let guard = TerminalGuard::acquire()?;

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Event>();
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    let input_handle = tokio::task::spawn_blocking({
        let mut shutdown_rx = shutdown_tx.subscribe();
        move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            if event::poll(INPUT_POLL).unwrap_or(false) {
                match event::read() {
                    Ok(event @ (Event::Key(_) | Event::Resize(..))) => {
                        if input_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }
    });

    let result = run_loop(&mut app, &mut input_rx).await;

    let _ = shutdown_tx.send(());
    let _ = input_handle.await;
    drop(guard);
    info!("fabterm exiting");
    result
}

async fn run_loop(app: &mut App, input_rx: &mut mpsc::UnboundedReceiver<Event>) -> Result<()> {
    let mut stdout = io::stdout();
    let (mut cols, mut rows) = terminal::size()?;
    let mut redraw = time::interval(REDRAW_INTERVAL);

    loop {
        let frame = app.frame(cols, rows)?;
        draw(&mut stdout, &frame)?;

        tokio::select! {
            event = input_rx.recv() => match event {
                Some(Event::Key(key)) => {
                    if app.handle_key(key) == Control::Quit {
                        break;
                    }
                }
                Some(Event::Resize(c, r)) => {
                    cols = c;
                    rows = r;
                }
                Some(_) => {}
                None => break,
            },
            background = app.next_background() => app.apply_background(background),
            _ = redraw.tick() => {}
        }
    }

    stdout.flush()?;
    Ok(())
}
