//! Help overlay: scrollable keybinding table.
//!
//! Displays actual bindings including any user overrides from config.

use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

/// Context display order and labels for the help screen.
const CONTEXT_ORDER: [(Context, &str); 2] = [
    (Context::Global, "Browsing"),
    (Context::Search, "Search box"),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let bindings = app.keybindings.all_bindings();
    let mut rows: Vec<Row> = Vec::new();

    for (ctx, label) in &CONTEXT_ORDER {
        let mut ctx_bindings = bindings.iter().filter(|(c, _, _, _)| c == ctx).peekable();
        if ctx_bindings.peek().is_none() {
            continue;
        }

        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", label),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.style("heading")),
        );

        // Collapse the seven category digits into one row
        let mut shown_jump = false;
        for (_, key_str, action, description) in ctx_bindings {
            if let Action::JumpCategory(_) = action {
                if shown_jump {
                    continue;
                }
                shown_jump = true;
                rows.push(Row::new(vec![
                    format!("  {}", jump_key_range(app)),
                    description.to_string(),
                ]));
                continue;
            }
            rows.push(Row::new(vec![format!("  {}", key_str), description.to_string()]));
        }

        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(3) as usize; // -2 border -1 header
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(
            " Help ({}/{}) ",
            scroll.saturating_add(1),
            max_scroll.saturating_add(1)
        )
    } else {
        " Help (? to close) ".to_string()
    };

    let widths = [Constraint::Length(16), Constraint::Min(20)];
    let table = Table::new(visible_rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("help_border"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );

    f.render_widget(table, overlay);

    if max_scroll > 0 && scroll < max_scroll {
        let hint = Line::from(vec![Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.style("tagline"),
        )]);
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

/// "1-7" with default bindings, or the bound keys joined when overridden.
fn jump_key_range(app: &App) -> String {
    let keys: Vec<String> = app
        .keybindings
        .all_bindings()
        .into_iter()
        .filter(|(_, _, a, _)| matches!(a, Action::JumpCategory(_)))
        .map(|(_, k, _, _)| k)
        .collect();

    let defaults: Vec<String> = (1..=keys.len()).map(|n| n.to_string()).collect();
    match (keys.first(), keys.last()) {
        (Some(first), Some(last)) if keys == defaults => format!("{}-{}", first, last),
        _ => keys.join(","),
    }
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
