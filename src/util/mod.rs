//! Utility functions for common operations.
//!
//! - **Text**: display-width truncation and sanitising of API-supplied text
//!   before it is drawn into the terminal
//! - **URL validation**: checks an article link before it is opened in the
//!   system browser
//!
//! # Examples
//!
//! ```
//! use newsflow::util::{single_line, truncate_chars, validate_url_for_open};
//!
//! let summary = truncate_chars("A long description of the article", 6);
//! assert_eq!(summary, "A long...");
//!
//! assert_eq!(single_line("Markets\n  rally"), "Markets rally");
//! assert!(validate_url_for_open("https://example.com/story").is_ok());
//! ```

mod text;
mod url_validator;

pub use text::{display_width, single_line, strip_control_chars, truncate_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Maximum search term length accepted from the input box.
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;

/// Character limit for card descriptions.
pub const DESCRIPTION_LIMIT: usize = 120;
