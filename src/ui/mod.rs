//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background query result processing
//! - `render` - Screen layout
//! - `helpers` - Query spawning, panic capture, browser opening
//! - `header` - Brand line, search box, category tabs, results heading
//! - `cards` - Article card grid with loading and empty states
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod cards;
mod events;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
