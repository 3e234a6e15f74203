//! Common types shared across the core and language crates.
//!
//! These live apart from `error` and `changeset` so both can use them without
//! circular module dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Span
// ============================================================================

/// Byte offsets into a unit's source text.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Move the span by `delta` bytes, clamping at zero.
    pub fn shifted(&self, delta: isize) -> Span {
        let shift = |offset: usize| -> usize {
            if delta < 0 {
                offset.saturating_sub(delta.unsigned_abs())
            } else {
                offset.saturating_add(delta as usize)
            }
        };
        Span {
            start: shift(self.start),
            end: shift(self.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Location
// ============================================================================

/// Location in a source file.
///
/// - `file`: path as displayed to the user
/// - `line`: 1-indexed line number
/// - `col`: 1-indexed column, UTF-8 bytes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// File path.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, UTF-8 bytes).
    pub col: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
        }
    }

    /// Comparison key for deterministic sorting: (file, line, col).
    fn sort_key(&self) -> (&str, u32, u32) {
        (&self.file, self.line, self.col)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod span_tests {
        use super::*;

        #[test]
        fn span_contains() {
            let outer = Span::new(10, 50);
            assert!(outer.contains(&Span::new(10, 50)));
            assert!(outer.contains(&Span::new(20, 30)));
            assert!(!outer.contains(&Span::new(5, 30)));
            assert!(!outer.contains(&Span::new(40, 60)));
        }

        #[test]
        fn span_shifted_both_directions() {
            let span = Span::new(10, 20);
            assert_eq!(span.shifted(5), Span::new(15, 25));
            assert_eq!(span.shifted(-10), Span::new(0, 10));
            assert_eq!(span.shifted(-15), Span::new(0, 5));
        }

        #[test]
        fn span_cover() {
            let a = Span::new(3, 7);
            let b = Span::new(10, 12);
            assert_eq!(a.cover(&b), Span::new(3, 12));
        }

        #[test]
        #[should_panic(expected = "must be <= end")]
        fn span_new_invalid_range_panics() {
            let _ = Span::new(10, 5);
        }
    }

    mod location_tests {
        use super::*;

        #[test]
        fn location_display() {
            let loc = Location::new("pkg/ops.go", 4, 2);
            assert_eq!(loc.to_string(), "pkg/ops.go:4:2");
        }

        #[test]
        fn location_ordering() {
            let mut locs = vec![
                Location::new("b.go", 1, 1),
                Location::new("a.go", 9, 1),
                Location::new("a.go", 2, 5),
            ];
            locs.sort();
            assert_eq!(locs[0], Location::new("a.go", 2, 5));
            assert_eq!(locs[2], Location::new("b.go", 1, 1));
        }
    }
}
