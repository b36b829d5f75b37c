/*
 *  Copyright 2025 Telepost Contributors
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! The inline URL-button mini-language.
//!
//! Stored jobs and templates keep button layouts as raw text, so the grammar
//! is part of the persisted format and must not drift:
//!
//! - each line is one button row;
//! - segments within a line are separated by `|`, at most 3 are used;
//! - a segment is `<label> - <url>` (space, hyphen, space) where the url
//!   starts with `http://`, `https://` or `tg://`;
//! - malformed segments are dropped silently; a block yielding zero rows is
//!   "no keyboard", not an error.

/// One inline URL button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlButton {
    /// Button label shown to readers.
    pub label: String,
    /// Target URL (`http://`, `https://` or `tg://`).
    pub url: String,
}

/// Button rows, at most 3 buttons each.
pub type Keyboard = Vec<Vec<UrlButton>>;

/// Maximum buttons rendered per row; extra segments are ignored.
pub const MAX_BUTTONS_PER_ROW: usize = 3;

const URL_SCHEMES: [&str; 3] = ["http://", "https://", "tg://"];

/// Parse a raw button block into a keyboard.
///
/// Returns `None` when the block produces no rows at all.
pub fn parse_url_buttons(text: &str) -> Option<Keyboard> {
    if text.trim().is_empty() {
        return None;
    }

    let mut keyboard = Keyboard::new();
    for line in text.trim().lines() {
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for segment in line.split('|').take(MAX_BUTTONS_PER_ROW) {
            let segment = segment.trim();
            let Some((label, url)) = segment.split_once(" - ") else {
                continue;
            };
            let label = label.trim();
            let url = url.trim();
            if label.is_empty() || url.is_empty() {
                continue;
            }
            if URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
                row.push(UrlButton {
                    label: label.to_string(),
                    url: url.to_string(),
                });
            }
        }

        if !row.is_empty() {
            keyboard.push(row);
        }
    }

    if keyboard.is_empty() {
        None
    } else {
        Some(keyboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_button() {
        let kb = parse_url_buttons("A - http://x.com").unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb[0].len(), 1);
        assert_eq!(kb[0][0].label, "A");
        assert_eq!(kb[0][0].url, "http://x.com");
    }

    #[test]
    fn two_buttons_in_one_row() {
        let kb = parse_url_buttons("A - http://x | B - http://y").unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb[0].len(), 2);
        assert_eq!(kb[0][1].label, "B");
    }

    #[test]
    fn fourth_segment_in_a_row_is_ignored() {
        let kb =
            parse_url_buttons("A - http://a | B - http://b | C - http://c | D - http://d").unwrap();
        assert_eq!(kb[0].len(), 3);
        assert_eq!(kb[0][2].label, "C");
    }

    #[test]
    fn multiple_lines_make_multiple_rows() {
        let kb = parse_url_buttons("A - https://a\nB - tg://resolve?domain=b").unwrap();
        assert_eq!(kb.len(), 2);
        assert_eq!(kb[1][0].url, "tg://resolve?domain=b");
    }

    #[test]
    fn not_a_button_yields_no_keyboard() {
        assert!(parse_url_buttons("not a button").is_none());
        assert!(parse_url_buttons("").is_none());
        assert!(parse_url_buttons("   \n  ").is_none());
    }

    #[test]
    fn bad_scheme_is_dropped() {
        assert!(parse_url_buttons("A - ftp://x.com").is_none());
        // A valid sibling on the same line survives.
        let kb = parse_url_buttons("A - ftp://x.com | B - https://y.com").unwrap();
        assert_eq!(kb[0].len(), 1);
        assert_eq!(kb[0][0].label, "B");
    }

    #[test]
    fn malformed_rows_are_skipped_but_good_rows_survive() {
        let kb = parse_url_buttons("junk line\nA - http://x.com\n\n - http://no-label").unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb[0][0].label, "A");
    }

    #[test]
    fn only_first_separator_splits_label_from_url() {
        // "Read - more - https://x.com" splits at the first " - ", leaving a
        // url of "more - https://x.com" with no valid scheme.
        assert!(parse_url_buttons("Read - more - https://x.com").is_none());
    }
}
