//! Concrete date ranges produced by period resolution.

use core::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};

/// A half-open range of instants, `[start, end)`.
///
/// `Unbounded` means "no date filtering" and is what `all-time` resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// No filtering; both ends are open.
    Unbounded,
    /// Inclusive `start`, exclusive `end`, with the reporting timezone's offset.
    Bounded {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

impl DateRange {
    /// Create a bounded range.
    #[must_use]
    pub fn bounded(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        debug_assert!(start < end, "date range start must precede its end");
        Self::Bounded { start, end }
    }

    /// Inclusive start, or `None` when unbounded.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Unbounded => None,
            Self::Bounded { start, .. } => Some(*start),
        }
    }

    /// Exclusive end, or `None` when unbounded.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Unbounded => None,
            Self::Bounded { end, .. } => Some(*end),
        }
    }

    /// Last instant inside the range at one-second resolution.
    ///
    /// Upstream filters that treat their upper bound as inclusive take this
    /// instead of [`DateRange::end`].
    #[must_use]
    pub fn last_second(&self) -> Option<DateTime<FixedOffset>> {
        self.end().map(|end| end - TimeDelta::seconds(1))
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Whether `instant` falls inside the range.
    #[must_use]
    pub fn contains<Tz: TimeZone>(&self, instant: DateTime<Tz>) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Bounded { start, end } => *start <= instant && instant < *end,
        }
    }

    /// Length of the range, or `None` when unbounded.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        match self {
            Self::Unbounded => None,
            Self::Bounded { start, end } => Some(*end - *start),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Bounded { start, end } => {
                write!(f, "[{}, {})", start.to_rfc3339(), end.to_rfc3339())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_half_open_containment() {
        let range = DateRange::bounded(at("2025-03-10T00:00:00Z"), at("2025-03-17T00:00:00Z"));
        assert!(range.contains(at("2025-03-10T00:00:00Z")));
        assert!(range.contains(at("2025-03-16T23:59:59Z")));
        assert!(!range.contains(at("2025-03-17T00:00:00Z")));
        assert!(!range.contains(at("2025-03-09T23:59:59Z")));
    }

    #[test]
    fn test_last_second() {
        let range = DateRange::bounded(at("2025-03-15T00:00:00Z"), at("2025-03-16T00:00:00Z"));
        assert_eq!(range.last_second(), Some(at("2025-03-15T23:59:59Z")));
        assert_eq!(DateRange::Unbounded.last_second(), None);
    }

    #[test]
    fn test_unbounded_contains_everything() {
        assert!(DateRange::Unbounded.contains(Utc::now()));
        assert_eq!(DateRange::Unbounded.duration(), None);
    }

    #[test]
    fn test_display() {
        let range = DateRange::bounded(at("2025-03-15T00:00:00Z"), at("2025-03-16T00:00:00Z"));
        assert_eq!(
            range.to_string(),
            "[2025-03-15T00:00:00+00:00, 2025-03-16T00:00:00+00:00)"
        );
        assert_eq!(DateRange::Unbounded.to_string(), "unbounded");
    }
}
