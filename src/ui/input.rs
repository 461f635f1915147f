//! Input handling for the TUI.
//!
//! Keys are routed by mode: help overlay first, then the search box, then
//! the card grid.

use crate::app::{App, AppEvent};
use crate::feed::{Category, Trigger};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::MAX_SEARCH_TERM_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_selected_article, spawn_query};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.show_help {
        handle_help_input(app, code);
        return Action::Continue;
    }

    if app.search_editing {
        handle_search_input(app, code, modifiers, event_tx);
        return Action::Continue;
    }

    handle_grid_input(app, code, modifiers, event_tx)
}

/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::SubmitSearch) => {
            app.search_editing = false;
            let pending = app.controller.submit_search();
            spawn_query(app, pending, event_tx);
            return;
        }
        Some(KbAction::ExitSearch) => {
            app.search_editing = false;
            return;
        }
        Some(KbAction::ClearSearch) => {
            app.controller.set_search_term(String::new());
            return;
        }
        _ => {}
    }

    match code {
        KeyCode::Backspace => {
            let mut term = app.controller.search_term().to_string();
            term.pop();
            app.controller.set_search_term(term);
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) && !c.is_control() => {
            let term = app.controller.search_term();
            if term.chars().count() >= MAX_SEARCH_TERM_LENGTH {
                app.set_status(format!(
                    "Search term at max length ({} chars)",
                    MAX_SEARCH_TERM_LENGTH
                ));
                return;
            }
            let mut term = term.to_string();
            term.push(c);
            app.controller.set_search_term(term);
        }
        _ => {}
    }
}

fn handle_grid_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::NavLeft => app.nav_left(),
        KbAction::NavRight => app.nav_right(),
        KbAction::EnterSearch => app.search_editing = true,
        KbAction::NextCategory => {
            let next = app.controller.category().next();
            change_category(app, next, event_tx);
        }
        KbAction::PrevCategory => {
            let prev = app.controller.category().prev();
            change_category(app, prev, event_tx);
        }
        KbAction::JumpCategory(index) => {
            if let Some(category) = Category::from_index(index as usize) {
                change_category(app, category, event_tx);
            }
        }
        KbAction::CycleSort => {
            let order = app.controller.sort_order().next();
            let pending = app.controller.set_sort_order(order);
            app.set_status(format!("Sort: {}", order.label()));
            spawn_query(app, pending, event_tx);
        }
        KbAction::Refresh => {
            let pending = app.controller.submit_query(Trigger::Refresh);
            spawn_query(app, pending, event_tx);
        }
        KbAction::OpenArticle => open_selected_article(app),
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::Back => app.status_message = None,
        // Search-box actions are handled in handle_search_input
        KbAction::SubmitSearch | KbAction::ExitSearch | KbAction::ClearSearch => {}
    }

    Action::Continue
}

fn change_category(app: &mut App, category: Category, event_tx: &mpsc::Sender<AppEvent>) {
    let pending = app.controller.set_category(category);
    spawn_query(app, pending, event_tx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{QueryState, SortOrder};
    use crate::news::NewsClient;
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::MockServer;

    /// App pointed at a mock server with no routes, so spawned queries
    /// never leave the machine.
    async fn test_app() -> (App, MockServer) {
        let server = MockServer::start().await;
        let client = NewsClient::with_options(
            SecretString::from("k"),
            Some(&server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();
        (App::new(client, QueryState::default()), server)
    }

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx)
    }

    #[tokio::test]
    async fn test_quit_key() {
        let (mut app, _server) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        assert!(matches!(
            press(&mut app, &tx, KeyCode::Char('q')),
            Action::Quit
        ));
    }

    #[tokio::test]
    async fn test_typing_in_search_does_not_trigger_commands() {
        let (mut app, _server) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, &tx, KeyCode::Char('/'));
        assert!(app.search_editing);
        app.controller.set_search_term(String::new());

        for c in "quit".chars() {
            assert!(matches!(
                press(&mut app, &tx, KeyCode::Char(c)),
                Action::Continue
            ));
        }
        assert_eq!(app.controller.search_term(), "quit");
        assert!(!app.controller.is_busy());

        press(&mut app, &tx, KeyCode::Backspace);
        assert_eq!(app.controller.search_term(), "qui");
    }

    #[tokio::test]
    async fn test_enter_submits_search() {
        let (mut app, _server) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, &tx, KeyCode::Char('/'));
        handle_input(
            &mut app,
            KeyCode::Char('u'),
            KeyModifiers::CONTROL,
            &tx,
        );
        assert_eq!(app.controller.search_term(), "");
        press(&mut app, &tx, KeyCode::Char('r'));
        press(&mut app, &tx, KeyCode::Enter);

        assert!(!app.search_editing);
        assert!(app.controller.is_busy());
        assert_eq!(app.controller.latest_seq(), 1);
        assert_eq!(app.heading(), "Results for \"r\"");
    }

    #[tokio::test]
    async fn test_esc_leaves_search_without_fetching() {
        let (mut app, _server) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, &tx, KeyCode::Char('/'));
        press(&mut app, &tx, KeyCode::Char('x'));
        press(&mut app, &tx, KeyCode::Esc);

        assert!(!app.search_editing);
        assert_eq!(app.controller.search_term(), "technologyx");
        assert_eq!(app.controller.latest_seq(), 0);
    }

    #[tokio::test]
    async fn test_category_keys_clear_term_and_fetch() {
        let (mut app, _server) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, &tx, KeyCode::Char('3'));
        assert_eq!(app.controller.category(), Category::ALL[2]);
        assert_eq!(app.controller.search_term(), "");
        assert!(app.controller.is_busy());

        press(&mut app, &tx, KeyCode::Tab);
        assert_eq!(app.controller.category(), Category::ALL[3]);
        assert_eq!(app.controller.latest_seq(), 2);
    }

    #[tokio::test]
    async fn test_sort_key_cycles_and_fetches() {
        let (mut app, _server) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, &tx, KeyCode::Char('s'));
        assert_eq!(app.controller.sort_order(), SortOrder::Relevance);
        assert_eq!(app.controller.latest_seq(), 1);
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let (mut app, _server) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);
        // 'q' closes help instead of quitting
        assert!(matches!(
            press(&mut app, &tx, KeyCode::Char('q')),
            Action::Continue
        ));
        assert!(!app.show_help);
    }
}
