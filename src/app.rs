use crate::feed::{FeedController, QueryState};
use crate::keybindings::KeybindingRegistry;
use crate::news::{Article, ArticlesPage, NewsClient, NewsError};
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status message stays on screen.
pub const STATUS_TTL_SECS: u64 = 3;

/// Terminal width below which the grid collapses to one column.
const TWO_COLUMN_MIN_WIDTH: u16 = 70;
/// Terminal width at which the grid switches to three columns.
const THREE_COLUMN_MIN_WIDTH: u16 = 120;

/// Number of card columns for a given terminal width.
pub fn columns_for_width(width: u16) -> usize {
    if width >= THREE_COLUMN_MIN_WIDTH {
        3
    } else if width >= TWO_COLUMN_MIN_WIDTH {
        2
    } else {
        1
    }
}

/// Events from background tasks
pub enum AppEvent {
    /// A query task finished.
    ///
    /// Fields:
    /// - `seq`: Sequence number the controller assigned when issuing the query
    /// - `result`: The decoded page or the error from fetching
    QueryCompleted {
        seq: u64,
        result: Result<ArticlesPage, NewsError>,
    },
    /// A query task panicked before it could report a result.
    QueryPanicked { seq: u64, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub controller: FeedController,
    pub client: NewsClient,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    /// True while the search box has keyboard focus.
    pub search_editing: bool,

    // Card grid
    /// Index into `controller.results()` of the highlighted card.
    pub selected: usize,
    /// Columns used by the last render.
    pub grid_columns: usize,
    /// First visible grid row.
    pub grid_scroll: usize,
    /// Card rows that fit in the last render.
    pub visible_rows: usize,

    /// Status message and the instant it was set.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// PERF: Only redraw when state changes
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// In-flight query tasks, aborted on drop.
    pub query_tasks: Vec<JoinHandle<()>>,
}

impl App {
    pub fn new(client: NewsClient, initial: QueryState) -> Self {
        Self {
            controller: FeedController::new(initial),
            client,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            search_editing: false,
            selected: 0,
            grid_columns: 1,
            grid_scroll: 0,
            visible_rows: 1,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
            query_tasks: Vec::new(),
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns the new theme's name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------------
    // Heading
    // ------------------------------------------------------------------------

    /// Results heading: `Results for "<term>"` in search mode, otherwise
    /// `<Category> News`.
    pub fn heading(&self) -> String {
        let state = self.controller.state();
        if state.is_search() {
            format!("Results for \"{}\"", state.search_term)
        } else {
            format!("{} News", state.category.label())
        }
    }

    // ------------------------------------------------------------------------
    // Grid navigation
    // ------------------------------------------------------------------------

    pub fn selected_article(&self) -> Option<&Article> {
        self.controller.results().get(self.selected)
    }

    fn card_count(&self) -> usize {
        self.controller.results().len()
    }

    fn columns(&self) -> usize {
        self.grid_columns.max(1)
    }

    pub fn nav_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_selected_visible();
    }

    pub fn nav_right(&mut self) {
        if self.selected + 1 < self.card_count() {
            self.selected += 1;
        }
        self.ensure_selected_visible();
    }

    pub fn nav_up(&mut self) {
        if self.selected >= self.columns() {
            self.selected -= self.columns();
        }
        self.ensure_selected_visible();
    }

    /// Move one row down. On a short last row, lands on its final card.
    pub fn nav_down(&mut self) {
        let count = self.card_count();
        if count == 0 {
            return;
        }
        let cols = self.columns();
        let last_row = (count - 1) / cols;
        if self.selected / cols < last_row {
            self.selected = (self.selected + cols).min(count - 1);
        }
        self.ensure_selected_visible();
    }

    /// Record the layout of the latest render and keep the selection in view.
    pub fn set_grid_layout(&mut self, columns: usize, visible_rows: usize) {
        self.grid_columns = columns.max(1);
        self.visible_rows = visible_rows.max(1);
        self.ensure_selected_visible();
    }

    /// Back to the first card, used whenever the result set is replaced.
    pub fn reset_selection(&mut self) {
        self.selected = 0;
        self.grid_scroll = 0;
    }

    pub fn clamp_selection(&mut self) {
        let count = self.card_count();
        self.selected = self.selected.min(count.saturating_sub(1));
        self.ensure_selected_visible();
    }

    fn ensure_selected_visible(&mut self) {
        let row = self.selected / self.columns();
        let rows = self.visible_rows.max(1);
        if row < self.grid_scroll {
            self.grid_scroll = row;
        } else if row >= self.grid_scroll + rows {
            self.grid_scroll = row + 1 - rows;
        }
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Track a spawned query task, dropping handles of tasks already done.
    pub fn track_query_task(&mut self, handle: JoinHandle<()>) {
        self.query_tasks.retain(|h| !h.is_finished());
        self.query_tasks.push(handle);
    }
}

/// Abort in-flight query tasks so none outlive the event loop.
impl Drop for App {
    fn drop(&mut self) {
        for handle in self.query_tasks.drain(..) {
            handle.abort();
        }
    }
}
