//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count bytes, not characters

use crate::types::Location;

/// Convert a byte offset to 1-indexed line and column.
///
/// If `offset` exceeds content length, returns the position at end of content.
pub fn byte_offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(content.len());
    let mut line = 1u32;
    let mut col = 1u32;

    for &byte in content.as_bytes()[..offset].iter() {
        if byte == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Build a [`Location`] for a byte offset within `content`.
pub fn location_of(file: &str, content: &str, offset: usize) -> Location {
    let (line, col) = byte_offset_to_position(content, offset);
    Location::new(file, line, col)
}

/// Split content into lines, keeping each line's terminating newline.
pub fn split_lines_inclusive(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_position_simple() {
        let content = "line1\nline2\nline3\n";
        assert_eq!(byte_offset_to_position(content, 0), (1, 1));
        assert_eq!(byte_offset_to_position(content, 4), (1, 5));
        assert_eq!(byte_offset_to_position(content, 6), (2, 1));
        assert_eq!(byte_offset_to_position(content, 12), (3, 1));
    }

    #[test]
    fn offset_beyond_content() {
        assert_eq!(byte_offset_to_position("short", 100), (1, 6));
    }

    #[test]
    fn location_of_uses_file_name() {
        let loc = location_of("a.go", "package a\nfunc", 10);
        assert_eq!(loc, Location::new("a.go", 2, 1));
    }

    #[test]
    fn split_lines_keeps_terminators() {
        assert_eq!(split_lines_inclusive("a\nb"), vec!["a\n", "b"]);
        assert!(split_lines_inclusive("").is_empty());
    }
}
