//! sightnotes: terminal viewer for live lecture notes.
//!
//! Entry point for the `sightnotes` binary. Wires together the terminal
//! lifecycle (`tui`), the unified event bus (`event`), the live-feed poller
//! and session worker, and the renderer (`ui`).
//!
//! # Startup sequence
//!
//! 1. Logging to `.sightnotes/sightnotes.log`, then config and theme. All of
//!    this is safe before terminal init.
//! 2. Build the note source. A bad `base_url` is reported on the normal
//!    terminal before the alternate screen is entered.
//! 3. `install_panic_hook()`, then `register_sigterm()`, then `init_tui()`.
//! 4. Event channel, input task, poller and session worker.
//!
//! `restore_tui()` runs after the event loop exits, whether by `q`, SIGTERM,
//! channel close or a draw error. The panic hook covers unexpected panics.

mod app;
mod config;
mod event;
mod logging;
mod sessions;
mod theme;
mod tui;
mod ui;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use sightnotes_core::poller::{HIGHLIGHT_DURATION, POLL_INTERVAL, schedule_expiry, spawn_poller};
use sightnotes_core::source::{DirSource, HttpSource, NoteSource};
use sightnotes_core::store::SessionStore;
use tokio::sync::mpsc;

use event::AppEvent;
use ui::keybindings::{KeyAction, handle_key, handle_mouse};

const STATE_DIR: &str = ".sightnotes";

fn build_source(config: &config::Config) -> std::io::Result<Arc<dyn NoteSource>> {
    if let Some(dir) = &config.notes_dir {
        tracing::info!(dir = %dir.display(), "reading notes from directory");
        return Ok(Arc::new(DirSource::new(dir)));
    }
    let source = HttpSource::new(&config.base_url).map_err(std::io::Error::other)?;
    tracing::info!(base_url = %config.base_url, "polling capture server");
    Ok(Arc::new(source))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = logging::init(Path::new(STATE_DIR)) {
        eprintln!("sightnotes: logging disabled: {e}");
    }
    let config = config::load();
    let theme = theme::Theme::from_name(&config.theme);
    let source = build_source(&config)?;

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let poll_tx = handler.tx.clone();
    let poller = spawn_poller(Arc::clone(&source), POLL_INTERVAL, move |result| {
        let _ = poll_tx.send(AppEvent::Poll(Box::new(result)));
    });

    let (effect_tx, effect_rx) = mpsc::unbounded_channel();
    sessions::spawn_session_worker(SessionStore::new(source), effect_rx, handler.tx.clone());
    let mut state = app::AppState::new(effect_tx);

    // Event loop: exits only via `break` so `restore_tui()` is always reached.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when no events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            tracing::error!(error = %e, "draw failed");
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, &mut state);
                    }
                    Some(AppEvent::Poll(result)) => {
                        if let Some(token) = state.apply_poll(*result) {
                            let expire_tx = handler.tx.clone();
                            let timer = schedule_expiry(token, HIGHLIGHT_DURATION, move |token| {
                                let _ = expire_tx.send(AppEvent::HighlightExpired(token));
                            });
                            state.highlights.attach_timer(token, timer.abort_handle());
                        }
                    }
                    Some(AppEvent::HighlightExpired(token)) => state.clear_highlight(token),
                    Some(AppEvent::SessionsLoaded { request, sessions }) => {
                        state.apply_sessions(request, sessions);
                    }
                    Some(AppEvent::SessionLoaded { request, detail }) => {
                        state.apply_detail(request, detail.map(|d| *d));
                    }
                    // Resize is picked up by the next Render through frame.area().
                    Some(AppEvent::Resize(_, _)) => {}
                    None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    poller.abort();
    tui::restore_tui()?;
    tracing::info!("exiting");
    Ok(())
}
