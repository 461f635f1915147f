//! Application event handling.
//!
//! Applies background query results to the controller and updates the
//! grid selection and status line to match.

use crate::app::{App, AppEvent};
use crate::feed::Completion;
use crate::news::{ArticlesPage, NewsError};
use crate::util::single_line;

/// Process a single event from a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::QueryCompleted { seq, result } => handle_query_completed(app, seq, result),
        AppEvent::QueryPanicked { seq, error } => {
            app.controller.abandon(seq);
            if seq == app.controller.latest_seq() {
                app.set_status(format!("Fetch failed: {}", single_line(&error)));
            }
        }
    }
    app.needs_redraw = true;
}

fn handle_query_completed(app: &mut App, seq: u64, result: Result<ArticlesPage, NewsError>) {
    // Render the message before the controller consumes the error
    let message = result.as_ref().err().map(|e| single_line(&e.to_string()));

    match app.controller.complete(seq, result) {
        Completion::Applied(count) => {
            tracing::info!(seq, count, "News results updated");
            app.reset_selection();
        }
        Completion::Failed(kind) => {
            // Failures of superseded queries are not worth interrupting for
            if seq == app.controller.latest_seq() {
                let message = message.unwrap_or_default();
                tracing::debug!(seq, ?kind, "Showing fetch failure in status bar");
                app.set_status(format!("Fetch failed: {}", message));
            }
        }
        Completion::Stale => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{QueryState, Trigger};
    use crate::news::{Article, NewsClient};
    use secrecy::SecretString;

    fn test_app() -> App {
        let client = NewsClient::new(SecretString::from("k")).unwrap();
        App::new(client, QueryState::default())
    }

    fn page(urls: &[&str]) -> ArticlesPage {
        ArticlesPage {
            articles: urls
                .iter()
                .map(|u| Article {
                    title: Some(u.to_string()),
                    description: None,
                    url: u.to_string(),
                    image_url: None,
                    source_name: None,
                    published_at: None,
                })
                .collect(),
            total_results: Some(urls.len() as u64),
        }
    }

    fn status(app: &App) -> Option<String> {
        app.status_message.as_ref().map(|(m, _)| m.to_string())
    }

    #[tokio::test]
    async fn test_applied_result_resets_selection() {
        let mut app = test_app();
        let first = app.controller.submit_query(Trigger::InitialLoad);
        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: first.seq,
                result: Ok(page(&["https://a.example", "https://b.example"])),
            },
        );
        app.selected = 1;

        let second = app.controller.submit_query(Trigger::Refresh);
        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: second.seq,
                result: Ok(page(&["https://c.example", "https://d.example"])),
            },
        );
        assert_eq!(app.selected, 0);
        assert_eq!(app.controller.results()[0].url, "https://c.example");
        assert!(!app.controller.is_busy());
    }

    #[tokio::test]
    async fn test_failure_keeps_results_and_sets_status() {
        let mut app = test_app();
        let first = app.controller.submit_query(Trigger::InitialLoad);
        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: first.seq,
                result: Ok(page(&["https://a.example"])),
            },
        );

        let second = app.controller.submit_query(Trigger::Refresh);
        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: second.seq,
                result: Err(NewsError::HttpStatus {
                    status: 429,
                    message: Some("rate\nlimited".to_string()),
                }),
            },
        );

        assert_eq!(app.controller.results().len(), 1);
        assert!(!app.controller.is_busy());
        let status = status(&app).unwrap();
        assert!(status.starts_with("Fetch failed:"));
        assert!(status.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_stale_response_is_silent() {
        let mut app = test_app();
        let old = app.controller.submit_query(Trigger::InitialLoad);
        let new = app.controller.submit_query(Trigger::SearchSubmitted);

        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: new.seq,
                result: Ok(page(&["https://new.example"])),
            },
        );
        app.selected = 0;
        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: old.seq,
                result: Ok(page(&["https://old.example", "https://old2.example"])),
            },
        );

        assert_eq!(app.controller.results()[0].url, "https://new.example");
        assert!(status(&app).is_none());
    }

    #[tokio::test]
    async fn test_late_success_after_latest_failure_is_ignored() {
        let mut app = test_app();
        let first = app.controller.submit_query(Trigger::InitialLoad);
        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: first.seq,
                result: Ok(page(&["https://a.example", "https://b.example"])),
            },
        );
        app.selected = 1;

        let older = app.controller.submit_query(Trigger::Refresh);
        let newer = app.controller.set_category(crate::feed::Category::Sports);
        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: newer.seq,
                result: Err(NewsError::Timeout(20)),
            },
        );
        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: older.seq,
                result: Ok(page(&["https://late.example"])),
            },
        );

        assert_eq!(app.controller.results()[0].url, "https://a.example");
        assert_eq!(app.selected, 1);
        assert!(status(&app).unwrap().starts_with("Fetch failed:"));
    }

    #[tokio::test]
    async fn test_superseded_failure_is_silent() {
        let mut app = test_app();
        let old = app.controller.submit_query(Trigger::InitialLoad);
        let _new = app.controller.submit_query(Trigger::Refresh);

        handle_app_event(
            &mut app,
            AppEvent::QueryCompleted {
                seq: old.seq,
                result: Err(NewsError::Timeout(20)),
            },
        );
        assert!(status(&app).is_none());
        assert!(app.controller.is_busy());
    }

    #[tokio::test]
    async fn test_panicked_latest_query_clears_busy() {
        let mut app = test_app();
        let pending = app.controller.submit_query(Trigger::InitialLoad);
        handle_app_event(
            &mut app,
            AppEvent::QueryPanicked {
                seq: pending.seq,
                error: "boom".to_string(),
            },
        );
        assert!(!app.controller.is_busy());
        assert_eq!(status(&app).as_deref(), Some("Fetch failed: boom"));
    }
}
