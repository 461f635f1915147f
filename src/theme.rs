//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub brand: Style,
    pub tagline: Style,
    pub search_input: Style,
    pub search_input_active: Style,
    pub category_active: Style,
    pub category_inactive: Style,

    // -- Results --
    pub heading: Style,
    pub heading_meta: Style,
    pub empty_state: Style,
    pub spinner: Style,

    // -- Cards --
    pub card_border: Style,
    pub card_border_selected: Style,
    pub card_source: Style,
    pub card_title: Style,
    pub card_description: Style,
    pub card_date: Style,
    pub card_image_marker: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
    pub help_border: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            brand: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tagline: Style::default().fg(Color::DarkGray),
            search_input: Style::default().fg(Color::Gray),
            search_input_active: Style::default().fg(Color::Yellow),
            category_active: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            category_inactive: Style::default().fg(Color::Gray),

            heading: Style::default().add_modifier(Modifier::BOLD),
            heading_meta: Style::default().fg(Color::DarkGray),
            empty_state: Style::default().fg(Color::DarkGray),
            spinner: Style::default().fg(Color::Cyan),

            card_border: Style::default().fg(Color::DarkGray),
            card_border_selected: Style::default().fg(Color::Cyan),
            card_source: Style::default().bg(Color::Blue).fg(Color::White),
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::Gray),
            card_date: Style::default().fg(Color::DarkGray),
            card_image_marker: Style::default().fg(Color::Magenta),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::DarkGray).fg(Color::LightRed),
            help_border: Style::default().fg(Color::Cyan),
        }
    }

    /// Light palette, adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            brand: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tagline: Style::default().fg(Color::DarkGray),
            search_input: Style::default().fg(Color::Black),
            search_input_active: Style::default().fg(Color::Magenta),
            category_active: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            category_inactive: Style::default().fg(Color::DarkGray),

            heading: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            heading_meta: Style::default().fg(Color::DarkGray),
            empty_state: Style::default().fg(Color::DarkGray),
            spinner: Style::default().fg(Color::Blue),

            card_border: Style::default().fg(Color::Gray),
            card_border_selected: Style::default().fg(Color::Blue),
            card_source: Style::default().bg(Color::Blue).fg(Color::White),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::DarkGray),
            card_date: Style::default().fg(Color::DarkGray),
            card_image_marker: Style::default().fg(Color::Magenta),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::White).fg(Color::Red),
            help_border: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 20] = [
    "brand",
    "tagline",
    "search_input",
    "search_input_active",
    "category_active",
    "category_inactive",
    "heading",
    "heading_meta",
    "empty_state",
    "spinner",
    "card_border",
    "card_border_selected",
    "card_source",
    "card_title",
    "card_description",
    "card_date",
    "card_image_marker",
    "status_bar",
    "status_error",
    "help_border",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 20] = [
            p.brand,
            p.tagline,
            p.search_input,
            p.search_input_active,
            p.category_active,
            p.category_inactive,
            p.heading,
            p.heading_meta,
            p.empty_state,
            p.spinner,
            p.card_border,
            p.card_border_selected,
            p.card_source,
            p.card_title,
            p.card_description,
            p.card_date,
            p.card_image_marker,
            p.status_bar,
            p.status_error,
            p.help_border,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
