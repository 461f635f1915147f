use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_chars` characters, appending "..." when cut.
///
/// Counts characters, not columns: this is the description limit on cards,
/// which is a content rule rather than a layout rule.
///
/// ```
/// use newsflow::util::truncate_chars;
///
/// assert_eq!(truncate_chars("short", 120), "short");
/// assert_eq!(truncate_chars("abcdef", 3), "abc...");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS)),
        None => Cow::Borrowed(s),
    }
}

/// Fit `s` into `max_width` terminal columns, ending in "..." when cut.
///
/// Widths of 3 or fewer get as many characters as fit with no ellipsis.
///
/// ```
/// use newsflow::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], suffix))
}

fn is_stripped_control(c: char) -> bool {
    c == '\x7f' || (c < ' ' && c != '\t' && c != '\n' && c != '\r')
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// API text is rendered straight into the terminal, so CSI (`ESC [`) and
/// OSC (`ESC ]`, ended by BEL or `ESC \`) sequences are dropped along with
/// C0 controls and DEL. Tab, newline and carriage return survive.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c == '\x1b' || is_stripped_control(c)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters run until a final byte in 0x40..=0x7e.
                    for p in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&p) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(p) = chars.next() {
                        if p == '\x07' {
                            break;
                        }
                        if p == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if is_stripped_control(c) => {}
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// Sanitize API text for a single card line: control sequences removed and
/// runs of whitespace (including newlines) collapsed to one space.
pub fn single_line(s: &str) -> String {
    strip_control_chars(s)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
