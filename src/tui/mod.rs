pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use tokio::task::JoinHandle;

use crate::catalog::Category;
use crate::credentials::AuthClient;
use crate::fetch::ScoredProduct;
use crate::scoring::ScoringConfig;
use crate::store::{StoreClient, StoreError};

type FetchHandle = JoinHandle<Result<Vec<ScoredProduct>, StoreError>>;

fn spawn_fetch(client: &StoreClient, category: Category, scoring: &ScoringConfig, verbose: bool) -> FetchHandle {
    let client = client.clone();
    let scoring = scoring.clone();
    tokio::spawn(async move {
        crate::fetch::fetch_and_score(&client, category, &scoring, verbose).await
    })
}

pub async fn run_tui(
    mut app: App,
    mut client: StoreClient,
    auth: AuthClient,
    session_path: PathBuf,
) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    // At most one fetch in flight, tagged with the screen it belongs to
    let mut pending_fetch: Option<(Category, FetchHandle)> = None;

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
        }

        // The user left the screen this fetch was for
        let stale = matches!(&pending_fetch, Some((category, _)) if app.current_category() != Some(*category));
        if stale {
            if let Some((_, handle)) = pending_fetch.take() {
                handle.abort();
            }
            app.is_loading = false;
        }

        let finished = matches!(&pending_fetch, Some((_, handle)) if handle.is_finished());
        if finished {
            if let Some((category, handle)) = pending_fetch.take() {
                app.is_loading = false;
                match handle.await {
                    Ok(Ok(products)) => app.update_products(category, products),
                    Ok(Err(e)) if e.is_unauthorized() => {
                        // Auth failure: restore terminal, re-prompt, re-init
                        ratatui::restore();
                        crate::stderr_buffer::flush();
                        // Stop reading terminal events so the prompt gets stdin
                        drop(events);

                        let result = crate::credentials::reauthenticate(&auth, &session_path, app.verbose).await;

                        crate::stderr_buffer::activate();
                        terminal = ratatui::init();
                        events = EventHandler::new(250);

                        match result {
                            Ok(token) => {
                                client = client.with_access_token(&token);
                                app.needs_fetch = true;
                                app.show_flash("Re-authenticated. Reloading...".to_string());
                            }
                            Err(err) => {
                                app.update_products(category, Vec::new());
                                app.show_flash(format!("Re-auth cancelled: {}", err));
                            }
                        }
                    }
                    Ok(Err(e)) => {
                        app.update_products(category, Vec::new());
                        app.show_flash(format!("Error: {}", e));
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => {
                        app.update_products(category, Vec::new());
                        app.show_flash(format!("Error: fetch task failed: {}", e));
                    }
                }
            }
        }

        // One fetch per screen activation or manual reload
        if app.needs_fetch && pending_fetch.is_none() {
            if let Some(category) = app.current_category() {
                app.needs_fetch = false;
                pending_fetch = Some((
                    category,
                    spawn_fetch(&client, category, &app.scoring, app.verbose),
                ));
                app.is_loading = true;
            } else {
                app.needs_fetch = false;
            }
        }

        if app.should_quit {
            break;
        }
    }

    if let Some((_, handle)) = pending_fetch {
        handle.abort();
    }

    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    crate::stderr_buffer::flush();

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            KeyCode::Enter => match app.current_screen() {
                app::Screen::Home => app.enter_selected_category(),
                app::Screen::Category(_) => app.open_selected(),
            },
            KeyCode::Char('o') => app.open_selected(),

            KeyCode::Esc | KeyCode::Backspace => {
                app.pop_screen();
            }

            KeyCode::Char('r') => app.request_refresh(),
            KeyCode::Char('b') => app.show_score_breakdown(),
            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        app::InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.dismiss_score_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
