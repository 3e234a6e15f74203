//! Unified diff generation utilities.
//!
//! Computes a line-level diff between two versions of a file (Myers'
//! O(ND) algorithm) and renders it in standard unified diff format with
//! three lines of context.

use serde::Serialize;

use crate::text::split_lines_inclusive;

/// Lines of context around each change.
pub const CONTEXT_LINES: usize = 3;

/// Kind of a diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Present in both versions.
    Equal,
    /// Only in the old version.
    Delete,
    /// Only in the new version.
    Insert,
}

/// One line of a hunk. `content` keeps its newline when it had one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub content: String,
}

/// A contiguous region of change with surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    /// Start line in the old file, as printed in the `@@` header.
    pub old_start: usize,
    /// Number of old lines covered.
    pub old_len: usize,
    /// Start line in the new file, as printed in the `@@` header.
    pub new_start: usize,
    /// Number of new lines covered.
    pub new_len: usize,
    pub lines: Vec<DiffLine>,
}

/// Diff of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    pub path: String,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Compute the diff between `old` and `new`.
    pub fn compute(path: impl Into<String>, old: &str, new: &str) -> Self {
        let old_lines = split_lines_inclusive(old);
        let new_lines = split_lines_inclusive(new);
        let ops = myers(&old_lines, &new_lines);
        let hunks = build_hunks(&ops, &old_lines, &new_lines, CONTEXT_LINES);
        FileDiff {
            path: path.into(),
            hunks,
        }
    }

    /// Whether the two versions were identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Number of inserted lines.
    pub fn insertions(&self) -> usize {
        self.count(LineKind::Insert)
    }

    /// Number of deleted lines.
    pub fn deletions(&self) -> usize {
        self.count(LineKind::Delete)
    }

    fn count(&self, kind: LineKind) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter(|l| l.kind == kind)
            .count()
    }

    /// Render in unified diff format. Returns an empty string for an empty diff.
    pub fn to_unified(&self) -> String {
        let mut out = String::new();
        if self.is_empty() {
            return out;
        }
        out.push_str(&format!("--- {}\n", self.path));
        out.push_str(&format!("+++ {}\n", self.path));

        for hunk in &self.hunks {
            out.push_str(&format!(
                "@@ -{},{} +{},{} @@\n",
                hunk.old_start, hunk.old_len, hunk.new_start, hunk.new_len
            ));
            for line in &hunk.lines {
                let prefix = match line.kind {
                    LineKind::Equal => ' ',
                    LineKind::Delete => '-',
                    LineKind::Insert => '+',
                };
                out.push(prefix);
                out.push_str(&line.content);
                if !line.content.ends_with('\n') {
                    out.push_str("\n\\ No newline at end of file\n");
                }
            }
        }
        out
    }
}

// ============================================================================
// Myers diff
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal { old: usize, new: usize },
    Delete { old: usize },
    Insert { new: usize },
}

fn myers(a: &[&str], b: &[&str]) -> Vec<Op> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    let offset = max + 1;
    let mut v = vec![0isize; (2 * max + 3) as usize];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    let idx = |k: isize| (k + offset) as usize;

    'outer: for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]) {
                v[idx(k + 1)]
            } else {
                v[idx(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx(k)] = x;
            if x >= n && y >= m {
                break 'outer;
            }
            k += 2;
        }
    }

    // Walk the trace backwards to recover the edit script.
    let mut ops = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[idx(prev_k)];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            ops.push(Op::Equal {
                old: (x - 1) as usize,
                new: (y - 1) as usize,
            });
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                ops.push(Op::Insert {
                    new: (y - 1) as usize,
                });
            } else {
                ops.push(Op::Delete {
                    old: (x - 1) as usize,
                });
            }
        }
        x = prev_x;
        y = prev_y;
    }
    ops.reverse();
    ops
}

fn build_hunks(ops: &[Op], old: &[&str], new: &[&str], context: usize) -> Vec<Hunk> {
    // Line positions before each op.
    let mut positions = Vec::with_capacity(ops.len());
    let (mut old_pos, mut new_pos) = (0usize, 0usize);
    for op in ops {
        positions.push((old_pos, new_pos));
        match op {
            Op::Equal { .. } => {
                old_pos += 1;
                new_pos += 1;
            }
            Op::Delete { .. } => old_pos += 1,
            Op::Insert { .. } => new_pos += 1,
        }
    }

    let mut groups: Vec<(usize, usize)> = Vec::new();
    for (i, op) in ops.iter().enumerate() {
        if matches!(op, Op::Equal { .. }) {
            continue;
        }
        match groups.last_mut() {
            Some((_, end)) if i <= *end + 2 * context + 1 => *end = i,
            _ => groups.push((i, i)),
        }
    }

    groups
        .into_iter()
        .map(|(first, last)| {
            let lo = first.saturating_sub(context);
            let hi = (last + context).min(ops.len() - 1);
            let (old_first, new_first) = positions[lo];

            let mut lines = Vec::new();
            let (mut old_len, mut new_len) = (0, 0);
            for op in &ops[lo..=hi] {
                let (kind, content) = match *op {
                    Op::Equal { old: o, .. } => {
                        old_len += 1;
                        new_len += 1;
                        (LineKind::Equal, old[o])
                    }
                    Op::Delete { old: o } => {
                        old_len += 1;
                        (LineKind::Delete, old[o])
                    }
                    Op::Insert { new: n } => {
                        new_len += 1;
                        (LineKind::Insert, new[n])
                    }
                };
                lines.push(DiffLine {
                    kind,
                    content: content.to_string(),
                });
            }

            Hunk {
                old_start: if old_len > 0 { old_first + 1 } else { old_first },
                old_len,
                new_start: if new_len > 0 { new_first + 1 } else { new_first },
                new_len,
                lines,
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
