//! Longest-matching-blocks sequence comparison.
//!
//! Implements the classic Ratcliff/Obershelp-style algorithm: find the
//! longest contiguous block the two sequences share, recurse on the pieces
//! to the left and to the right of it, and collect every block found.
//!
//! [`similarity_ratio`] runs the algorithm over characters and reduces the
//! blocks to `2 * matched / (len(a) + len(b))`.  The line-level unified diff
//! ([`crate::compare::diff`]) reuses [`matching_blocks`] over lines.
//!
//! No junk heuristics are applied — inputs are compared literally.

use std::collections::HashMap;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// MatchBlock
// ---------------------------------------------------------------------------

/// A contiguous run shared by both sequences: `a[a_start..a_start + len]`
/// equals `b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

// ---------------------------------------------------------------------------
// find_longest_match
// ---------------------------------------------------------------------------

/// Find the longest matching block within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Of all maximal matching blocks, returns the one that starts earliest in
/// `a`, and of those, the one that starts earliest in `b` — the same
/// tie-break order callers of a stable diff expect.
fn find_longest_match<T: Eq + Hash>(
    a: &[T],
    b2j: &HashMap<&T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchBlock {
    let mut best = MatchBlock {
        a_start: alo,
        b_start: blo,
        len: 0,
    };

    // j2len[j] = length of the longest match ending at a[i-1] / b[j].
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, item) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();

        if let Some(positions) = b2j.get(item) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    // positions are ascending — nothing further can qualify
                    break;
                }

                let k = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, k);

                if k > best.len {
                    best = MatchBlock {
                        a_start: i + 1 - k,
                        b_start: j + 1 - k,
                        len: k,
                    };
                }
            }
        }

        j2len = new_j2len;
    }

    best
}

// ---------------------------------------------------------------------------
// matching_blocks
// ---------------------------------------------------------------------------

/// Return all matching blocks between `a` and `b`, sorted by position, with
/// adjacent blocks merged, terminated by a zero-length sentinel block at
/// `(a.len(), b.len())`.
pub(crate) fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<MatchBlock> {
    // Index of each element of b to its (ascending) positions.
    let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, item) in b.iter().enumerate() {
        b2j.entry(item).or_default().push(j);
    }

    // Worklist recursion: (alo, ahi, blo, bhi) regions still to examine.
    let mut queue: Vec<(usize, usize, usize, usize)> = vec![(0, a.len(), 0, b.len())];
    let mut blocks: Vec<MatchBlock> = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let m = find_longest_match(a, &b2j, alo, ahi, blo, bhi);
        if m.len > 0 {
            blocks.push(m);
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.len < ahi && m.b_start + m.len < bhi {
                queue.push((m.a_start + m.len, ahi, m.b_start + m.len, bhi));
            }
        }
    }

    blocks.sort_by_key(|m| (m.a_start, m.b_start));

    // Merge blocks that sit flush against each other.
    let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len() + 1);
    for m in blocks {
        match merged.last_mut() {
            Some(last)
                if last.a_start + last.len == m.a_start
                    && last.b_start + last.len == m.b_start =>
            {
                last.len += m.len;
            }
            _ => merged.push(m),
        }
    }

    merged.push(MatchBlock {
        a_start: a.len(),
        b_start: b.len(),
        len: 0,
    });
    merged
}

// ---------------------------------------------------------------------------
// similarity_ratio
// ---------------------------------------------------------------------------

/// Character-level similarity between two strings, in `[0.0, 1.0]`.
///
/// `2 * M / T` where `M` is the total number of characters covered by
/// matching blocks and `T` is the combined length of both strings.  Two
/// empty strings compare as a perfect match (`1.0`) — callers rely on that
/// convention, so it is deliberate, not a degenerate-case bug.
///
/// Pure computation; no normalization of whitespace or case is applied.
pub fn similarity_ratio(script: &str, recognized: &str) -> f64 {
    let a: Vec<char> = script.chars().collect();
    let b: Vec<char> = recognized.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched: usize = matching_blocks(&a, &b).iter().map(|m| m.len).sum();
    2.0 * matched as f64 / total as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
