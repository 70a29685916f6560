//! Natural-language heuristics for informal task text
//!
//! Pure functions that turn free text such as `"urgent: call mom by friday"`
//! into structured hints: a due date relative to a reference date, a priority
//! with the keyword that produced it, and a cleaned-up description.
//! All matching is case-insensitive and word-boundary based.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

static TODAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\btoday\b").unwrap());
static TOMORROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\btomorrow\b").unwrap());
static NEXT_WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bnext\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .unwrap()
});
static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap()
});
static DATE_PREPOSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(on|by|at)\s+\S").unwrap());
static HIGH_PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(urgent|critical|asap)\b").unwrap());
static MEDIUM_PRIORITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bimportant\b").unwrap());
static PRIORITY_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(urgent|critical|asap|important)\b").unwrap());
static TRAILING_PREPOSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|\s)(on|by|at)$").unwrap());

/// Review reason used when a date reference was present but could not be resolved
pub const UNPARSED_DATE_REASON: &str = "could not parse date";

/// Task priority
///
/// Uses snake_case naming to match the note and tracker representations.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    high,
    medium,
    low,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::high),
            "medium" | "m" => Ok(Priority::medium),
            "low" | "l" => Ok(Priority::low),
            other => Err(format!(
                "Invalid priority '{}'. Valid options are: high, medium, low",
                other
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::high => "high",
            Priority::medium => "medium",
            Priority::low => "low",
        };
        f.write_str(name)
    }
}

/// Result of scanning text for a due date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateGuess {
    /// A date keyword matched; `span` is the byte range of the matched phrase
    Resolved { date: NaiveDate, span: Range<usize> },
    /// A date preposition is present but nothing after it could be resolved
    Unresolved,
    /// The text does not refer to a date at all
    Absent,
}

impl DateGuess {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateGuess::Resolved { date, .. } => Some(*date),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            DateGuess::Resolved { span, .. } => Some(span.clone()),
            _ => None,
        }
    }
}

/// Result of scanning text for a priority keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityGuess {
    pub priority: Priority,
    /// Human-readable reason, set only when a keyword matched
    pub reason: Option<String>,
}

/// Guess the due date referred to by `text`
///
/// Keywords are tried in order: `today`, `tomorrow`, `next <weekday>`, a bare
/// weekday. The first that matches wins. A weekday never resolves to
/// `reference` itself; it advances a full week instead.
///
/// # Arguments
/// * `text` - Free-form task text
/// * `reference` - The date relative keywords are resolved against
pub fn parse_date(text: &str, reference: NaiveDate) -> DateGuess {
    if let Some(m) = TODAY_RE.find(text) {
        return DateGuess::Resolved {
            date: reference,
            span: m.range(),
        };
    }

    if let Some(m) = TOMORROW_RE.find(text) {
        return DateGuess::Resolved {
            date: reference + Duration::days(1),
            span: m.range(),
        };
    }

    if let Some(caps) = NEXT_WEEKDAY_RE.captures(text) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        if let Some(weekday) = caps.get(1).and_then(|m| m.as_str().parse::<Weekday>().ok()) {
            return DateGuess::Resolved {
                date: next_weekday(reference, weekday),
                span: whole,
            };
        }
    }

    if let Some(m) = WEEKDAY_RE.find(text)
        && let Ok(weekday) = m.as_str().parse::<Weekday>()
    {
        return DateGuess::Resolved {
            date: next_weekday(reference, weekday),
            span: m.range(),
        };
    }

    if DATE_PREPOSITION_RE.is_match(text) {
        return DateGuess::Unresolved;
    }

    DateGuess::Absent
}

/// Next occurrence of `weekday` strictly after `reference`
pub fn next_weekday(reference: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = reference.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut days_ahead = (target - current).rem_euclid(7);
    if days_ahead == 0 {
        days_ahead = 7;
    }
    reference + Duration::days(days_ahead)
}

/// Guess the priority of `text` from its keywords
///
/// `urgent`, `critical` and `asap` mean high priority, `important` means
/// medium. Anything else is low priority without a reason.
pub fn parse_priority(text: &str) -> PriorityGuess {
    if let Some(m) = HIGH_PRIORITY_RE.find(text) {
        return PriorityGuess {
            priority: Priority::high,
            reason: Some(format!("priority keyword \"{}\"", m.as_str().to_lowercase())),
        };
    }

    if let Some(m) = MEDIUM_PRIORITY_RE.find(text) {
        return PriorityGuess {
            priority: Priority::medium,
            reason: Some(format!("priority keyword \"{}\"", m.as_str().to_lowercase())),
        };
    }

    PriorityGuess {
        priority: Priority::low,
        reason: None,
    }
}

/// Strip heuristic keywords from `text` to obtain the task description
///
/// Only the date phrase at `date_span` is removed; other date-like words stay.
/// Every priority keyword is removed. If removing the date phrase leaves a
/// dangling preposition at the end (`"submit report by"`), it is dropped too.
///
/// # Arguments
/// * `text` - The raw task text
/// * `date_span` - Byte range of the date phrase chosen by [`parse_date`]
pub fn clean_description(text: &str, date_span: Option<Range<usize>>) -> String {
    let mut working = text.to_string();
    if let Some(span) = &date_span {
        working.replace_range(span.clone(), " ");
    }

    let without_priority = PRIORITY_KEYWORD_RE.replace_all(&working, " ");
    let mut cleaned = collapse_whitespace(&without_priority);

    if date_span.is_some() {
        cleaned = TRAILING_PREPOSITION_RE.replace(&cleaned, "").into_owned();
    }

    let cleaned = cleaned
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ',' | ';' | '-'))
        .to_string();

    if cleaned.is_empty() {
        collapse_whitespace(text)
    } else {
        cleaned
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
