use crate::app::App;
use crate::keybindings::{Action, Context};
use crate::util::{single_line, truncate_to_width};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};

const GRID_HINTS: [(Action, &str); 8] = [
    (Action::EnterSearch, "search"),
    (Action::NextCategory, "category"),
    (Action::CycleSort, "sort"),
    (Action::Refresh, "refresh"),
    (Action::OpenArticle, "open"),
    (Action::CycleTheme, "theme"),
    (Action::ShowHelp, "help"),
    (Action::Quit, "quit"),
];

const SEARCH_HINTS: [(Action, &str); 3] = [
    (Action::SubmitSearch, "run"),
    (Action::ExitSearch, "leave"),
    (Action::ClearSearch, "clear"),
];

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style) = if let Some((msg, _)) = &app.status_message {
        let style = if msg.starts_with("Fetch failed") || msg.starts_with("Cannot open") {
            app.style("status_error")
        } else {
            app.style("status_bar")
        };
        (single_line(msg), style)
    } else {
        (key_hints(app), app.style("status_bar"))
    };

    let text = truncate_to_width(&text, area.width as usize).into_owned();
    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Hint line built from the live bindings, so overrides show up.
fn key_hints(app: &App) -> String {
    if app.search_editing {
        let hints = describe(app, Context::Search, &SEARCH_HINTS, " | ");
        if hints.is_empty() {
            "Type to search".to_string()
        } else {
            format!("Type to search | {}", hints)
        }
    } else {
        describe(app, Context::Global, &GRID_HINTS, " ")
    }
}

fn describe(app: &App, context: Context, hints: &[(Action, &str)], sep: &str) -> String {
    hints
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_for(context, *action)
                .map(|key| format!("[{}] {}", key, label))
        })
        .collect::<Vec<_>>()
        .join(sep)
}
