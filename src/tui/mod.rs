pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;

use crate::records::Term;
use crate::scoring::{best_pass_plan, PassPlan};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    // Create event handler: 250ms tick drives flash expiry and the spinner
    let mut events = EventHandler::new(250);

    // Handle to an in-flight pass/fail search, if any
    let mut pending_plan: Option<tokio::task::JoinHandle<PassPlan>> = None;

    // Main loop
    loop {
        // Draw UI
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        // Handle events
        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
        }

        // Spawn a requested search if none is running. The enumeration is
        // exponential in the eligible-course count, so it runs on a blocking
        // task instead of stalling the event loop.
        if app.plan_requested && pending_plan.is_none() {
            app.plan_requested = false;
            let past = app.ledger.term_courses(Term::Past);
            let current = app.ledger.term_courses(Term::Current);
            let limit = app.config.pass_limit;
            pending_plan = Some(tokio::task::spawn_blocking(move || {
                best_pass_plan(&past, &current, limit)
            }));
            app.is_planning = true;
        }

        // Check if a background search has completed
        if let Some(handle) = &mut pending_plan {
            if handle.is_finished() {
                let handle = pending_plan.take().unwrap();
                match handle.await {
                    Ok(plan) => app.show_plan(plan),
                    Err(e) => app.show_flash(format!("Plan task panicked: {}", e)),
                }
                app.is_planning = false;
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    ratatui::restore();

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Add / edit / delete
                KeyCode::Char('a') => app.start_add_input(),
                KeyCode::Enter | KeyCode::Char('e') => app.start_edit_input(),
                KeyCode::Char('d') => app.remove_selected(),

                // Undo
                KeyCode::Char('z') => app.undo_last(),

                // Tab switching
                KeyCode::Tab => app.toggle_view(),

                // Pass/fail plan
                KeyCode::Char('p') => app.request_plan(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::CourseInput => {
            match key.code {
                // Confirm input
                KeyCode::Enter => app.confirm_course_input(),

                // Cancel input
                KeyCode::Esc => app.cancel_course_input(),

                // Backspace
                KeyCode::Backspace => {
                    app.course_input.pop();
                }

                // Character input (course names can be anything printable)
                KeyCode::Char(c) if !c.is_control() => {
                    app.course_input.push(c);
                }

                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::PlanView => match key.code {
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('q') => app.dismiss_plan(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
