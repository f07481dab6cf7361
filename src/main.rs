//! Blockfall terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from
//! `blockfall-term`. The loop runs at the `FRAME_MS` cadence; the game's own
//! clock decides when a logic tick is due.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use blockfall::config::AppConfig;
use blockfall::core::GameState;
use blockfall::input::{session_command, should_quit, InputHandler, SessionCommand};
use blockfall::save::SaveStore;
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::{CoreEvent, GameAction, Phase, FRAME_MS};

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config)?;

    let mut term = TerminalRenderer::new();
    let result = enter_and_run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "exiting with error");
    }
    result
}

/// Log to a file when one is configured; the terminal belongs to the renderer.
fn init_logging(config: &AppConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

/// Everything the loop mutates besides the terminal
struct Session {
    game: GameState,
    input: InputHandler,
    store: SaveStore,
    status: Option<String>,
}

impl Session {
    fn new(config: &AppConfig) -> Self {
        let seed = config.resolve_seed();
        info!(seed, save_path = %config.save_path.display(), "starting session");
        Self {
            game: GameState::new(seed),
            input: InputHandler::new().with_key_release_timeout_ms(config.soft_drop_release_ms),
            store: SaveStore::new(&config.save_path),
            status: None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.kind != KeyEventKind::Release {
            if should_quit(key) {
                return Flow::Quit;
            }
            if let Some(command) = session_command(key) {
                self.run_command(command, now);
                return Flow::Continue;
            }
        }

        if let Some(action) = self.input.handle_key(key, now) {
            self.apply(action, now);
        }
        Flow::Continue
    }

    fn apply(&mut self, action: GameAction, now: Instant) {
        if self.game.apply_action(action, now) {
            debug!(action = action.as_str(), "applied action");
            if action == GameAction::NewGame {
                self.status = None;
            }
        }
    }

    fn run_command(&mut self, command: SessionCommand, now: Instant) {
        match command {
            SessionCommand::Save => self.save(),
            SessionCommand::Load => self.load(now),
        }
    }

    fn save(&mut self) {
        if !matches!(self.game.phase(), Phase::Playing | Phase::Paused) {
            self.status = Some("nothing to save".to_string());
            return;
        }

        self.status = Some(match self.store.save(&self.game.snapshot()) {
            Ok(()) => format!("saved to {}", self.store.path().display()),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "save failed");
                format!("save failed: {err}")
            }
        });
    }

    fn load(&mut self, now: Instant) {
        let result = self
            .store
            .load()
            .and_then(|snapshot| self.game.restore(&snapshot, now).context("invalid save file"));

        self.status = Some(match result {
            Ok(()) => {
                self.input.reset();
                format!("loaded {}", self.store.path().display())
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "load rejected");
                format!("load failed: {err:#}")
            }
        });
    }

    fn frame(&mut self, now: Instant) {
        if let Some(action) = self.input.update(now) {
            self.apply(action, now);
        }
        self.game.frame(now);
    }
}

/// Audio hook: fire and forget; failures never reach the game
fn notify(event: CoreEvent, config: &AppConfig, term: &mut TerminalRenderer) {
    match event {
        CoreEvent::PieceLanded {
            lines_cleared,
            score_gained,
        } => debug!(lines_cleared, score_gained, "piece landed"),
        CoreEvent::GameOver => info!("round over"),
    }
    if config.bell {
        let _ = term.bell();
    }
}

fn enter_and_run(term: &mut TerminalRenderer, config: &AppConfig) -> Result<()> {
    term.enter()?;
    run(term, config)
}

fn run(term: &mut TerminalRenderer, config: &AppConfig) -> Result<()> {
    let mut session = Session::new(config);
    if !term.key_release_events() {
        debug!(
            timeout_ms = session.input.key_release_timeout_ms(),
            "terminal has no key release events; using soft drop timeout"
        );
    }

    let view = GameView::default();
    let frame_duration = Duration::from_millis(u64::from(FRAME_MS));
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut fb = FrameBuffer::new(w, h);
    let mut next_frame = Instant::now();

    loop {
        // Input until the next frame is due.
        loop {
            let timeout = next_frame.saturating_duration_since(Instant::now());
            if !event::poll(timeout).context("poll terminal events")? {
                break;
            }
            match event::read().context("read terminal event")? {
                Event::Key(key) => {
                    if let Flow::Quit = session.handle_key(key, Instant::now()) {
                        info!(score = session.game.score(), "quit");
                        return Ok(());
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        next_frame += frame_duration;
        if next_frame < now {
            next_frame = now + frame_duration;
        }

        session.frame(now);
        for event in session.game.drain_events() {
            notify(event, config, term);
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(
            &session.game,
            Viewport::new(w, h),
            session.status.as_deref(),
            &mut fb,
        );
        term.draw_swap(&mut fb)?;
    }
}
