//! newsflow: a terminal news reader.
//!
//! The [`feed`] module holds the query state machine, [`news`] talks to the
//! news API, and [`ui`] drives the terminal front end on top of both.

pub mod app;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod news;
pub mod theme;
pub mod ui;
pub mod util;
