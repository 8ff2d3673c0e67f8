//! Categorical attribute lookups.
//!
//! Survey answers such as academic position or time zone arrive as free
//! strings. These lookups turn them into the numeric attributes the
//! conflict rules use, and fail loudly on anything they do not recognise.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{MatchError, MatchResult};

/// Position string → seniority level table.
///
/// Keys are matched after trimming, case-insensitively.
///
/// # Example
///
/// ```
/// use u_match::profile::SeniorityLevels;
///
/// let levels = SeniorityLevels::academic();
/// assert_eq!(levels.level_of("PhD student").unwrap(), 3);
/// assert!(levels.level_of("Astronaut").is_err());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeniorityLevels {
    levels: HashMap<String, u8>,
}

impl SeniorityLevels {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A common academic ladder, from students (2) to full professors (8).
    pub fn academic() -> Self {
        Self::new()
            .with_level("MA student", 2)
            .with_level("MSc student", 2)
            .with_level("Undergraduate student", 2)
            .with_level("Research Assistant", 2)
            .with_level("PhD student", 3)
            .with_level("Predoctoral", 3)
            .with_level("Postdoc", 4)
            .with_level("Research Scientist", 4)
            .with_level("Researcher outside of academia", 4)
            .with_level("Adjunct/Visiting Professor/Lecturer", 5)
            .with_level("Assistant Professor", 6)
            .with_level("Associate Professor", 7)
            .with_level("Full Professor", 8)
    }

    /// Adds or replaces a position.
    pub fn with_level(mut self, position: impl AsRef<str>, level: u8) -> Self {
        self.levels.insert(normalize(position.as_ref()), level);
        self
    }

    /// Looks up a position.
    ///
    /// Returns `UnknownSeniority` naming the offending value when the
    /// position is not in the table.
    pub fn level_of(&self, position: &str) -> MatchResult<u8> {
        self.levels
            .get(&normalize(position))
            .copied()
            .ok_or_else(|| MatchError::UnknownSeniority(position.to_string()))
    }

    /// Number of known positions.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Parses a time-zone answer into an offset from UTC in hours.
///
/// * empty → `Ok(None)` (attendee did not say)
/// * `"UTC"`, `"GMT"`, `"Coordinated Universal Time (UTC)"` → `0`
/// * any string ending in a signed integer (`"GMT -3"`, `"UTC+5"`,
///   `"Mountain Daylight Time (MDT) - 6"`) → that integer
/// * anything else → `InvalidTimezone`
///
/// # Example
///
/// ```
/// use u_match::profile::parse_utc_offset;
///
/// assert_eq!(parse_utc_offset("GTM -3 Argentina").unwrap(), Some(-3.0));
/// assert_eq!(parse_utc_offset("UTC+5").unwrap(), Some(5.0));
/// assert_eq!(parse_utc_offset("").unwrap(), None);
/// assert!(parse_utc_offset("teatime").is_err());
/// ```
pub fn parse_utc_offset(raw: &str) -> MatchResult<Option<f64>> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let upper = text.to_uppercase();
    if matches!(upper.as_str(), "UTC" | "GMT" | "COORDINATED UNIVERSAL TIME (UTC)") {
        return Ok(Some(0.0));
    }

    // Find the last run of digits, then look backwards for its sign.
    let chars: Vec<char> = text.chars().collect();
    let Some(end) = chars.iter().rposition(|c| c.is_ascii_digit()) else {
        return Err(MatchError::InvalidTimezone(raw.to_string()));
    };
    let mut start = end;
    while start > 0 && chars[start - 1].is_ascii_digit() {
        start -= 1;
    }
    let digits: String = chars[start..=end].iter().collect();
    let magnitude: f64 = digits
        .parse::<u32>()
        .map_err(|_| MatchError::InvalidTimezone(raw.to_string()))?
        .into();

    let mut sign = 1.0;
    let mut i = start;
    while i > 0 {
        let c = chars[i - 1];
        if c == '-' || c == '−' {
            sign = -1.0;
            break;
        }
        if c == '+' || !c.is_whitespace() {
            break;
        }
        i -= 1;
    }

    if magnitude > 14.0 {
        return Err(MatchError::InvalidTimezone(raw.to_string()));
    }
    Ok(Some(sign * magnitude))
}
