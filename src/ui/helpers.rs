//! Shared helpers for input and event handlers.

use crate::app::{App, AppEvent};
use crate::feed::PendingQuery;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run a future, converting a panic into an `Err` with the panic message.
///
/// Spawned tasks report through the event channel; a task that panics
/// would otherwise vanish silently and leave the loading indicator on.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Run `pending` on a background task.
///
/// Earlier queries are left running: the controller discards their results
/// by sequence number if they arrive late.
pub(super) fn spawn_query(app: &mut App, pending: PendingQuery, event_tx: &mpsc::Sender<AppEvent>) {
    let PendingQuery {
        seq,
        trigger,
        request,
    } = pending;
    let client = app.client.clone();
    let tx = event_tx.clone();

    tracing::debug!(seq, ?trigger, "Spawning news query task");

    let handle = tokio::spawn(async move {
        let event = match catch_task_panic(client.fetch(&request)).await {
            Ok(result) => AppEvent::QueryCompleted { seq, result },
            Err(error) => {
                tracing::error!(seq, error = %error, "News query task panicked");
                AppEvent::QueryPanicked { seq, error }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(seq, error = %e, "Failed to send query result (receiver dropped)");
        }
    });

    app.track_query_task(handle);
    app.needs_redraw = true;
}

/// Open the highlighted article in the system browser.
pub(super) fn open_selected_article(app: &mut App) {
    let Some(url) = app.selected_article().map(|a| a.url.clone()) else {
        return;
    };

    // Validate before open::that(): the URL comes straight from the API
    match validate_url_for_open(&url) {
        Err(e) => {
            tracing::warn!(error = %e, "Refusing to open article URL");
            app.set_status(format!("Cannot open link: {}", e));
        }
        Ok(valid) => {
            tracing::debug!(url = %valid, "Opening article in browser");
            if let Err(e) = open::that(valid.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{QueryState, Trigger};
    use crate::news::NewsClient;
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_catch_task_panic_passes_value_through() {
        let result = catch_task_panic(async { 42 }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_catch_task_panic_captures_message() {
        let result: Result<(), String> = catch_task_panic(async {
            panic!("boom {}", 7);
        })
        .await;
        assert_eq!(result, Err("boom 7".to_string()));

        let result: Result<(), String> = catch_task_panic(async {
            panic!("static boom");
        })
        .await;
        assert_eq!(result, Err("static boom".to_string()));
    }

    #[tokio::test]
    async fn test_spawn_query_reports_completion() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"ok","totalResults":1,"articles":[{"title":"T","url":"https://example.com/t"}]}"#,
            ))
            .mount(&server)
            .await;

        let client = NewsClient::with_options(
            SecretString::from("k"),
            Some(&server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();
        let mut app = App::new(client, QueryState::default());
        let (tx, mut rx) = mpsc::channel(4);

        let pending = app.controller.submit_query(Trigger::InitialLoad);
        let seq = pending.seq;
        spawn_query(&mut app, pending, &tx);
        assert_eq!(app.query_tasks.len(), 1);

        match rx.recv().await {
            Some(AppEvent::QueryCompleted { seq: got, result }) => {
                assert_eq!(got, seq);
                let page = result.unwrap();
                assert_eq!(page.articles.len(), 1);
            }
            _ => panic!("expected QueryCompleted"),
        }
    }

    #[tokio::test]
    async fn test_open_rejects_unsafe_url() {
        let client = NewsClient::new(SecretString::from("k")).unwrap();
        let mut app = App::new(client, QueryState::default());
        let pending = app.controller.submit_query(Trigger::InitialLoad);
        app.controller.complete(
            pending.seq,
            Ok(crate::news::ArticlesPage {
                articles: vec![crate::news::Article {
                    title: None,
                    description: None,
                    url: "file:///etc/passwd".to_string(),
                    image_url: None,
                    source_name: None,
                    published_at: None,
                }],
                total_results: Some(1),
            }),
        );

        open_selected_article(&mut app);
        let status = app.status_message.as_ref().map(|(m, _)| m.to_string());
        assert!(status.unwrap_or_default().starts_with("Cannot open link"));
    }
}
