//! Article card grid, plus the loading and empty states that replace it.

use crate::app::{columns_for_width, App};
use crate::news::Article;
use crate::util::{single_line, truncate_chars, truncate_to_width, DESCRIPTION_LIMIT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows per card: border, badge, 3 title lines, 2 description lines,
/// footer, border.
pub(super) const CARD_HEIGHT: u16 = 9;

/// Braille spinner frames.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const EMPTY_MESSAGE: &str = "No articles found. Try a different search or category.";
const UNTITLED: &str = "(untitled)";
const IMAGE_MARKER: &str = "[img]";

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    if app.controller.is_busy() {
        render_loading(f, app, area);
        return;
    }

    if app.controller.results().is_empty() {
        render_centered(
            f,
            area,
            Line::from(Span::styled(EMPTY_MESSAGE, app.style("empty_state"))),
        );
        return;
    }

    let columns = columns_for_width(area.width);
    let rows = (area.height / CARD_HEIGHT).max(1) as usize;
    app.set_grid_layout(columns, rows);

    let app = &*app;
    let results = app.controller.results();
    let first = app.grid_scroll * columns;

    for row in 0..rows {
        let y = area.y + row as u16 * CARD_HEIGHT;
        if y >= area.bottom() {
            break;
        }
        let row_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: CARD_HEIGHT.min(area.bottom() - y),
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = first + row * columns + col;
            let Some(article) = results.get(index) else {
                return;
            };
            render_card(f, app, article, index == app.selected, *cell);
        }
    }
}

fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    let frame = SPINNER[app.spinner_frame % SPINNER.len()];
    render_centered(
        f,
        area,
        Line::from(vec![
            Span::styled(frame, app.style("spinner")),
            Span::raw(" "),
            Span::styled("Loading news...", app.style("empty_state")),
        ]),
    );
}

fn render_centered(f: &mut Frame, area: Rect, line: Line<'_>) {
    let middle = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), middle);
}

fn render_card(f: &mut Frame, app: &App, article: &Article, selected: bool, area: Rect) {
    let border = if selected {
        app.style("card_border_selected")
    } else {
        app.style("card_border")
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 1 || inner.height < 1 {
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(inner);
    let width = inner.width as usize;

    // Badge line
    let source = single_line(article.source_label());
    let mut badge = vec![Span::styled(
        truncate_to_width(&format!(" {} ", source), width.saturating_sub(6)).into_owned(),
        app.style("card_source"),
    )];
    if article.image_url.is_some() {
        badge.push(Span::raw(" "));
        badge.push(Span::styled(IMAGE_MARKER, app.style("card_image_marker")));
    }
    f.render_widget(Paragraph::new(Line::from(badge)), parts[0]);

    let title = article
        .title
        .as_deref()
        .map(single_line)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());
    f.render_widget(
        Paragraph::new(title)
            .style(app.style("card_title"))
            .wrap(Wrap { trim: true }),
        parts[1],
    );

    if let Some(description) = article.description.as_deref() {
        let description = single_line(description);
        f.render_widget(
            Paragraph::new(truncate_chars(&description, DESCRIPTION_LIMIT).into_owned())
                .style(app.style("card_description"))
                .wrap(Wrap { trim: true }),
            parts[2],
        );
    }

    let mut footer = vec![Span::styled(
        article.formatted_date().unwrap_or_default(),
        app.style("card_date"),
    )];
    if selected {
        footer.push(Span::raw("  "));
        footer.push(Span::styled("[o] Read", app.style("card_border_selected")));
    }
    f.render_widget(Paragraph::new(Line::from(footer)), parts[3]);
}
