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

//! Civil time handling.
//!
//! The store persists and compares scheduled times as naive local timestamps
//! in one fixed operating timezone; no zone offset is ever attached. This
//! module is the only place where wall-clock time is produced or parsed.
//!
//! Persisted values have appeared in three encodings over the store's
//! lifetime (sub-second, whole-second and minute precision). All three share
//! the `YYYY-MM-DD HH:MM` prefix, which is what makes string comparison in
//! the due-jobs query agree with chronological order.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::TimeParseError;

/// Encoding used for newly written timestamps.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Known encodings, tried in order. Most precise first so a fractional
/// suffix is never truncated by a shorter match.
const LEGACY_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Current wall-clock time in the operating timezone, offset stripped.
pub fn now(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

/// Render a civil timestamp in the storage encoding.
pub fn format(t: NaiveDateTime) -> String {
    t.format(STORAGE_FORMAT).to_string()
}

/// Parse a persisted civil timestamp in any of the known encodings.
///
/// Returns a typed error when nothing matches; callers must surface it
/// rather than substitute the current time.
pub fn parse(raw: &str) -> Result<NaiveDateTime, TimeParseError> {
    let trimmed = raw.trim();
    for fmt in LEGACY_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(t);
        }
    }
    Err(TimeParseError {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn parses_all_three_encodings() {
        assert_eq!(parse("2025-03-14 09:26:53.589793").unwrap(), {
            t(9, 26, 53) + chrono::Duration::microseconds(589793)
        });
        assert_eq!(parse("2025-03-14 09:26:53").unwrap(), t(9, 26, 53));
        assert_eq!(parse("2025-03-14 09:26").unwrap(), t(9, 26, 0));
    }

    #[test]
    fn encodings_agree_on_whole_minutes() {
        // An instant expressible in all three encodings parses identically.
        let full = parse("2025-03-14 09:26:00.000000").unwrap();
        let secs = parse("2025-03-14 09:26:00").unwrap();
        let mins = parse("2025-03-14 09:26").unwrap();
        assert_eq!(full, secs);
        assert_eq!(secs, mins);
    }

    #[test]
    fn parse_preserves_ordering() {
        let a = parse("2025-03-14 09:26").unwrap();
        let b = parse("2025-03-14 09:26:30").unwrap();
        let c = parse("2025-03-14 09:27:00.5").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn malformed_input_is_a_typed_error() {
        let err = parse("not a timestamp").unwrap_err();
        assert_eq!(err.value, "not a timestamp");
        assert!(parse("").is_err());
        assert!(parse("2025-03-14T09:26:53Z").is_err());
    }

    #[test]
    fn format_round_trips_through_parse() {
        let v = t(23, 59, 59);
        assert_eq!(parse(&format(v)).unwrap(), v);
    }

    #[test]
    fn now_is_naive_local() {
        // Moscow has no DST; the fixed offset from UTC is +3.
        let utc = Utc::now().naive_utc();
        let local = now(chrono_tz::Europe::Moscow);
        let delta = local - utc;
        assert_eq!(delta.num_hours(), 3);
    }
}
