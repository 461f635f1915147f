//! Header widgets: brand line, search box, category tabs and the results
//! heading.

use crate::app::App;
use crate::feed::Category;
use crate::util::{display_width, single_line, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

const TAGLINE: &str = "Stay informed across all sources";

pub(super) fn render_brand(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled("NewsFlow", app.style("brand")),
        Span::raw("  "),
        Span::styled(TAGLINE, app.style("tagline")),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Search box. While editing, the terminal cursor sits after the term.
pub(super) fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let (border_style, title) = if app.search_editing {
        (
            app.style("search_input_active"),
            " Search (Enter to run, Esc to leave) ",
        )
    } else {
        (app.style("search_input"), " Search (/) ")
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);

    let term = strip_control_chars(app.controller.search_term());
    let width = inner.width.saturating_sub(1) as usize;
    // Keep the tail visible while typing past the box width
    let visible = tail_to_width(&term, width);

    let text = if term.is_empty() && !app.search_editing {
        Span::styled("Search news...", app.style("tagline"))
    } else {
        Span::styled(visible.to_string(), app.style("search_input"))
    };

    f.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if app.search_editing {
        let cursor_x = inner.x + display_width(visible) as u16;
        f.set_cursor_position(Position::new(cursor_x.min(inner.right()), inner.y));
    }
}

/// Longest suffix of `s` that fits in `width` columns.
fn tail_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &s[start..]
}

/// Category tabs, numbered for the jump keys. No tab is highlighted while
/// a search term is set, since the results are not from a category.
pub(super) fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!("{} {}", i + 1, c.label())))
        .collect();

    let highlight = if app.controller.state().is_search() {
        app.style("category_inactive")
    } else {
        app.style("category_active")
    };

    let tabs = Tabs::new(titles)
        .style(app.style("category_inactive"))
        .highlight_style(highlight)
        .select(app.controller.category().index())
        .divider("|");

    f.render_widget(tabs, area);
}

/// Heading line: what the results are, the sort order, and the total.
pub(super) fn render_heading(f: &mut Frame, app: &App, area: Rect) {
    let heading = single_line(&app.heading());
    let mut meta = format!("  Sort: {}", app.controller.sort_order().label());
    if let Some(total) = app.controller.total_results() {
        meta.push_str(&format!("  ({} total)", total));
    }

    let heading_width = (area.width as usize).saturating_sub(display_width(&meta));
    let line = Line::from(vec![
        Span::styled(
            truncate_to_width(&heading, heading_width).into_owned(),
            app.style("heading"),
        ),
        Span::styled(meta, app.style("heading_meta")),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
