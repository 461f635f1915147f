//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are data, so users can rebind any action from config.toml.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

use crate::feed::Category;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NavLeft,
    NavRight,
    EnterSearch,
    SubmitSearch,
    ExitSearch,
    ClearSearch,
    NextCategory,
    PrevCategory,
    /// Jump straight to the category at this tab index (0-based).
    JumpCategory(u8),
    CycleSort,
    OpenArticle,
    Refresh,
    CycleTheme,
    ShowHelp,
    Back,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Move down a row",
            Self::NavUp => "Move up a row",
            Self::NavLeft => "Move to previous card",
            Self::NavRight => "Move to next card",
            Self::EnterSearch => "Edit search term",
            Self::SubmitSearch => "Run search",
            Self::ExitSearch => "Stop editing search",
            Self::ClearSearch => "Clear search term",
            Self::NextCategory => "Next category",
            Self::PrevCategory => "Previous category",
            Self::JumpCategory(_) => "Jump to category",
            Self::CycleSort => "Cycle sort order",
            Self::OpenArticle => "Open article in browser",
            Self::Refresh => "Reload current results",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::Back => "Dismiss status message",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Card grid with no input focused.
    Global,
    /// Search box is being edited; printable keys are text, not commands.
    Search,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "BackTab", "Up", "Down", "Backspace"
/// - Modifier combos: "Ctrl+d", "Ctrl+u"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "backtab" | "shift+tab" => return Some(KeySpec::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::plain(KeyCode::Char(' '))),
        _ => {}
    }

    if let Some(n) = s.strip_prefix(['F', 'f']).and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Some(KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn bind_char(&mut self, c: char, action: Action) {
        self.bind(Context::Global, KeySpec::plain(KeyCode::Char(c)), action);
    }

    fn register_defaults(&mut self) {
        use Context::{Global, Search};

        self.bind_char('q', Action::Quit);

        // Grid navigation
        self.bind_char('j', Action::NavDown);
        self.bind(Global, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind_char('k', Action::NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind_char('h', Action::NavLeft);
        self.bind(Global, KeySpec::plain(KeyCode::Left), Action::NavLeft);
        self.bind_char('l', Action::NavRight);
        self.bind(Global, KeySpec::plain(KeyCode::Right), Action::NavRight);

        // Query controls
        self.bind_char('/', Action::EnterSearch);
        self.bind(Global, KeySpec::plain(KeyCode::Tab), Action::NextCategory);
        self.bind(
            Global,
            KeySpec::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Action::PrevCategory,
        );
        for (i, _) in Category::ALL.iter().enumerate() {
            if let Some(digit) = char::from_digit(i as u32 + 1, 10) {
                self.bind_char(digit, Action::JumpCategory(i as u8));
            }
        }
        self.bind_char('s', Action::CycleSort);
        self.bind_char('r', Action::Refresh);

        // Articles
        self.bind(Global, KeySpec::plain(KeyCode::Enter), Action::OpenArticle);
        self.bind_char('o', Action::OpenArticle);

        self.bind_char('t', Action::CycleTheme);
        self.bind_char('?', Action::ShowHelp);
        self.bind(Global, KeySpec::plain(KeyCode::Esc), Action::Back);

        // Search box
        self.bind(Search, KeySpec::plain(KeyCode::Enter), Action::SubmitSearch);
        self.bind(Search, KeySpec::plain(KeyCode::Esc), Action::ExitSearch);
        self.bind(Search, KeySpec::ctrl('u'), Action::ClearSearch);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "nav_down").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts_for_action: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts_for_action.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts_for_action {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// The search box never falls back to global bindings: there, any key
    /// without a search binding is text.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        self.lookup
            .get(&(context, KeySpec::new(code, modifiers)))
            .copied()
    }

    /// Display string of the first key bound to `action` in `context`.
    pub fn key_for(&self, context: Context, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *c == context && *a == action)
            .map(|(_, key, _)| format_key(key))
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    let name = name.to_lowercase();
    if let Some(n) = name
        .strip_prefix("category_")
        .and_then(|n| n.parse::<usize>().ok())
    {
        return (1..=Category::ALL.len())
            .contains(&n)
            .then(|| Action::JumpCategory((n - 1) as u8));
    }

    match name.as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "nav_left" | "navleft" | "left" => Some(Action::NavLeft),
        "nav_right" | "navright" | "right" => Some(Action::NavRight),
        "enter_search" | "entersearch" | "search" => Some(Action::EnterSearch),
        "submit_search" | "submitsearch" => Some(Action::SubmitSearch),
        "exit_search" | "exitsearch" => Some(Action::ExitSearch),
        "clear_search" | "clearsearch" => Some(Action::ClearSearch),
        "next_category" | "nextcategory" => Some(Action::NextCategory),
        "prev_category" | "prevcategory" => Some(Action::PrevCategory),
        "cycle_sort" | "cyclesort" | "sort" => Some(Action::CycleSort),
        "open_article" | "openarticle" | "open" => Some(Action::OpenArticle),
        "refresh" => Some(Action::Refresh),
        "cycle_theme" | "cycletheme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        "back" => Some(Action::Back),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn global(reg: &KeybindingRegistry, code: KeyCode) -> Option<Action> {
        reg.action_for_key(code, KeyModifiers::NONE, Context::Global)
    }

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        assert_eq!(global(&reg, KeyCode::Char('q')), Some(Action::Quit));
    }

    #[test]
    fn test_default_grid_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(global(&reg, KeyCode::Char('j')), Some(Action::NavDown));
        assert_eq!(global(&reg, KeyCode::Down), Some(Action::NavDown));
        assert_eq!(global(&reg, KeyCode::Char('k')), Some(Action::NavUp));
        assert_eq!(global(&reg, KeyCode::Char('h')), Some(Action::NavLeft));
        assert_eq!(global(&reg, KeyCode::Right), Some(Action::NavRight));
    }

    #[test]
    fn test_number_keys_jump_categories() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            global(&reg, KeyCode::Char('1')),
            Some(Action::JumpCategory(0))
        );
        assert_eq!(
            global(&reg, KeyCode::Char('7')),
            Some(Action::JumpCategory(6))
        );
        assert_eq!(global(&reg, KeyCode::Char('8')), None);
    }

    #[test]
    fn test_backtab_is_prev_category() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::BackTab, KeyModifiers::SHIFT, Context::Global),
            Some(Action::PrevCategory)
        );
        assert_eq!(global(&reg, KeyCode::Tab), Some(Action::NextCategory));
    }

    #[test]
    fn test_search_context_has_no_global_fallback() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::Search),
            Some(Action::SubmitSearch)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Search),
            Some(Action::ExitSearch)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('u'), KeyModifiers::CONTROL, Context::Search),
            Some(Action::ClearSearch)
        );
        // 'q' while typing is a letter, not Quit
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Search),
            None
        );
    }

    #[test]
    fn test_enter_and_o_both_open() {
        let reg = KeybindingRegistry::new();
        assert_eq!(global(&reg, KeyCode::Enter), Some(Action::OpenArticle));
        assert_eq!(global(&reg, KeyCode::Char('o')), Some(Action::OpenArticle));
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(global(&reg, KeyCode::F(12)), None);
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(global(&reg, KeyCode::Char('q')), None);
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_override_replaces_every_key_for_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("open".to_string(), "x".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(global(&reg, KeyCode::Char('x')), Some(Action::OpenArticle));
        assert_eq!(global(&reg, KeyCode::Char('o')), None);
        assert_eq!(global(&reg, KeyCode::Enter), None);
        assert_eq!(
            reg.all_bindings()
                .iter()
                .filter(|(_, _, a, _)| *a == Action::OpenArticle)
                .count(),
            1
        );
    }

    #[test]
    fn test_override_category_jump() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("category_3".to_string(), "F3".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(global(&reg, KeyCode::F(3)), Some(Action::JumpCategory(2)));
        assert_eq!(global(&reg, KeyCode::Char('3')), None);
        assert_eq!(
            global(&reg, KeyCode::Char('2')),
            Some(Action::JumpCategory(1))
        );
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("nonexistent_action".to_string(), "q".to_string());
        overrides.insert("category_9".to_string(), "q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.contains("Unknown action")));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+Alt+Shift+Q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_parse_key_string_variants() {
        assert_eq!(
            parse_key_string("Enter"),
            Some(KeySpec::plain(KeyCode::Enter))
        );
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(parse_key_string("F1"), Some(KeySpec::plain(KeyCode::F(1))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(
            parse_key_string("/"),
            Some(KeySpec::plain(KeyCode::Char('/')))
        );
        assert_eq!(
            parse_key_string("é"),
            Some(KeySpec::plain(KeyCode::Char('é')))
        );
        assert_eq!(parse_key_string("abc"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char('q'))), "q");
        assert_eq!(format_key(&KeySpec::ctrl('u')), "Ctrl+u");
        assert_eq!(
            format_key(&KeySpec::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
            "Shift+Tab"
        );
        assert_eq!(format_key(&KeySpec::plain(KeyCode::F(5))), "F5");
    }

    #[test]
    fn test_key_for_follows_overrides() {
        let mut registry = KeybindingRegistry::new();
        assert_eq!(registry.key_for(Context::Global, Action::CycleSort).as_deref(), Some("s"));
        assert_eq!(
            registry.key_for(Context::Search, Action::ClearSearch).as_deref(),
            Some("Ctrl+u")
        );

        let mut overrides = HashMap::new();
        overrides.insert("cycle_sort".to_string(), "F5".to_string());
        registry.apply_overrides(&overrides);
        assert_eq!(registry.key_for(Context::Global, Action::CycleSort).as_deref(), Some("F5"));
        assert_eq!(registry.key_for(Context::Search, Action::CycleSort), None);
    }

    #[test]
    fn test_all_bindings_cover_core_actions() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        for action in [
            Action::Quit,
            Action::EnterSearch,
            Action::CycleSort,
            Action::Refresh,
            Action::SubmitSearch,
        ] {
            assert!(bindings.iter().any(|(_, _, a, _)| *a == action));
        }
    }
}
