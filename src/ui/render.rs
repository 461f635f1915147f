//! Render functions for the TUI.
//!
//! Lays out the screen top to bottom: brand line, search box, category
//! tabs, results heading, card grid, status bar.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{cards, header, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 16;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // brand
            Constraint::Length(3), // search box
            Constraint::Length(1), // category tabs
            Constraint::Length(1), // heading
            Constraint::Min(0),    // grid
            Constraint::Length(1), // status
        ])
        .split(area);

    header::render_brand(f, app, chunks[0]);
    header::render_search(f, app, chunks[1]);
    header::render_tabs(f, app, chunks[2]);
    header::render_heading(f, app, chunks[3]);
    cards::render(f, app, chunks[4]);
    status::render(f, app, chunks[5]);

    if app.show_help {
        help::render(f, app);
    }
}
