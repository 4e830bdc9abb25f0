//! Line-level unified diff between the expected script and the transcript.
//!
//! Output follows the conventional unified format with three lines of
//! context: a `---`/`+++` label pair, then one or more `@@` hunks of
//! space/minus/plus prefixed lines.  Emitted lines carry no trailing line
//! terminators.  Identical inputs produce an empty diff — no labels, no
//! hunks.
//!
//! The "from" side is always the expected script, the "to" side the
//! recognized transcript; the labels are fixed so the host application can
//! display them verbatim.

use crate::compare::matcher::{matching_blocks, MatchBlock};

/// Label for the `---` (expected script) side.
const FROM_LABEL: &str = "CSV Script";
/// Label for the `+++` (transcript) side.
const TO_LABEL: &str = "Recognized Audio";

/// Lines of shared context around each change.
const CONTEXT: usize = 3;

// ---------------------------------------------------------------------------
// Opcodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// `(tag, a_start, a_end, b_start, b_end)` — how to turn `a[a_start..a_end]`
/// into `b[b_start..b_end]`.
type Opcode = (Tag, usize, usize, usize, usize);

/// Derive edit opcodes from the matching blocks of two line sequences.
fn opcodes(blocks: &[MatchBlock]) -> Vec<Opcode> {
    let mut out: Vec<Opcode> = Vec::new();
    let (mut i, mut j) = (0, 0);

    for m in blocks {
        let tag = if i < m.a_start && j < m.b_start {
            Some(Tag::Replace)
        } else if i < m.a_start {
            Some(Tag::Delete)
        } else if j < m.b_start {
            Some(Tag::Insert)
        } else {
            None
        };
        if let Some(tag) = tag {
            out.push((tag, i, m.a_start, j, m.b_start));
        }

        i = m.a_start + m.len;
        j = m.b_start + m.len;
        if m.len > 0 {
            out.push((Tag::Equal, m.a_start, i, m.b_start, j));
        }
    }

    out
}

/// Group opcodes into hunks with at most [`CONTEXT`] equal lines on either
/// side, splitting long equal runs between changes.
///
/// Returns no groups at all when the sequences are identical.
fn grouped_opcodes(codes: &[Opcode]) -> Vec<Vec<Opcode>> {
    if codes.is_empty() {
        return Vec::new();
    }

    let mut codes = codes.to_vec();

    // Trim leading and trailing context down to CONTEXT lines.
    if let Some(first) = codes.first_mut() {
        if first.0 == Tag::Equal {
            let (_, a1, a2, b1, b2) = *first;
            *first = (
                Tag::Equal,
                a1.max(a2.saturating_sub(CONTEXT)),
                a2,
                b1.max(b2.saturating_sub(CONTEXT)),
                b2,
            );
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.0 == Tag::Equal {
            let (_, a1, a2, b1, b2) = *last;
            *last = (Tag::Equal, a1, a2.min(a1 + CONTEXT), b1, b2.min(b1 + CONTEXT));
        }
    }

    let span = 2 * CONTEXT;
    let mut groups: Vec<Vec<Opcode>> = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();

    for (tag, mut a1, a2, mut b1, b2) in codes {
        // A long equal run in the middle closes the current hunk and starts
        // the next one.
        if tag == Tag::Equal && a2 - a1 > span {
            group.push((Tag::Equal, a1, a2.min(a1 + CONTEXT), b1, b2.min(b1 + CONTEXT)));
            groups.push(std::mem::take(&mut group));
            a1 = a1.max(a2.saturating_sub(CONTEXT));
            b1 = b1.max(b2.saturating_sub(CONTEXT));
        }
        group.push((tag, a1, a2, b1, b2));
    }

    // A trailing all-equal group means there was no change to report.
    if !group.is_empty() && !(group.len() == 1 && group[0].0 == Tag::Equal) {
        groups.push(group);
    }

    groups
}

/// Format one side of an `@@` range header: 1-based start, length omitted
/// when it is exactly one line, start shifted back when the range is empty.
fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    if length == 1 {
        return format!("{}", start + 1);
    }
    format!("{},{}", if length == 0 { start } else { start + 1 }, length)
}

/// Split on `\n`, `\r\n`, and lone `\r`, without a trailing empty line.
///
/// `str::lines` treats a bare carriage return as content, but script text
/// exported from spreadsheets can carry `\r` as its line break.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut out: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                out.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                out.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        out.push(&text[start..]);
    }
    out
}

// ---------------------------------------------------------------------------
// unified_diff
// ---------------------------------------------------------------------------

/// Compute the unified diff between `script` and `recognized`, line by line.
///
/// Returns an empty vector when both texts split into the same line
/// sequence.  Otherwise the first two entries are the fixed `---`/`+++`
/// labels and the rest are `@@` hunk headers and prefixed content lines.
pub fn unified_diff(script: &str, recognized: &str) -> Vec<String> {
    let a = split_lines(script);
    let b = split_lines(recognized);

    let blocks = matching_blocks(&a, &b);
    let groups = grouped_opcodes(&opcodes(&blocks));

    let mut out: Vec<String> = Vec::new();

    for group in groups {
        if out.is_empty() {
            out.push(format!("--- {FROM_LABEL}"));
            out.push(format!("+++ {TO_LABEL}"));
        }

        let (_, first_a, ..) = group[0];
        let (_, _, last_a, _, _) = *group.last().unwrap();
        let (_, _, _, first_b, _) = group[0];
        let (_, _, _, _, last_b) = *group.last().unwrap();
        out.push(format!(
            "@@ -{} +{} @@",
            format_range(first_a, last_a),
            format_range(first_b, last_b)
        ));

        for (tag, a1, a2, b1, b2) in group {
            match tag {
                Tag::Equal => {
                    for line in &a[a1..a2] {
                        out.push(format!(" {line}"));
                    }
                }
                Tag::Replace => {
                    for line in &a[a1..a2] {
                        out.push(format!("-{line}"));
                    }
                    for line in &b[b1..b2] {
                        out.push(format!("+{line}"));
                    }
                }
                Tag::Delete => {
                    for line in &a[a1..a2] {
                        out.push(format!("-{line}"));
                    }
                }
                Tag::Insert => {
                    for line in &b[b1..b2] {
                        out.push(format!("+{line}"));
                    }
                }
            }
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_produce_empty_diff() {
        assert!(unified_diff("one\ntwo\nthree", "one\ntwo\nthree").is_empty());
    }

    #[test]
    fn both_empty_produce_empty_diff() {
        assert!(unified_diff("", "").is_empty());
    }

    #[test]
    fn single_changed_line() {
        let diff = unified_diff("hello world", "hello word");
        assert_eq!(
            diff,
            vec![
                "--- CSV Script",
                "+++ Recognized Audio",
                "@@ -1 +1 @@",
                "-hello world",
                "+hello word",
            ]
        );
    }

    #[test]
    fn labels_appear_exactly_once() {
        let a = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\nm";
        let b = "a\nB\nc\nd\ne\nf\ng\nh\ni\nj\nk\nL\nm";
        let diff = unified_diff(a, b);
        let from_count = diff.iter().filter(|l| l.starts_with("--- ")).count();
        let to_count = diff.iter().filter(|l| l.starts_with("+++ ")).count();
        assert_eq!(from_count, 1);
        assert_eq!(to_count, 1);
        // Two changes far apart must land in two hunks.
        let hunks = diff.iter().filter(|l| l.starts_with("@@")).count();
        assert_eq!(hunks, 2);
    }

    #[test]
    fn change_in_middle_keeps_three_lines_of_context() {
        let a = "1\n2\n3\n4\n5\n6\n7\n8\n9";
        let b = "1\n2\n3\n4\nX\n6\n7\n8\n9";
        let diff = unified_diff(a, b);
        assert_eq!(
            diff,
            vec![
                "--- CSV Script",
                "+++ Recognized Audio",
                "@@ -2,7 +2,7 @@",
                " 2",
                " 3",
                " 4",
                "-5",
                "+X",
                " 6",
                " 7",
                " 8",
            ]
        );
    }

    #[test]
    fn pure_insertion_uses_zero_length_from_range() {
        let diff = unified_diff("", "new line");
        assert_eq!(
            diff,
            vec![
                "--- CSV Script",
                "+++ Recognized Audio",
                "@@ -0,0 +1 @@",
                "+new line",
            ]
        );
    }

    #[test]
    fn pure_deletion_uses_zero_length_to_range() {
        let diff = unified_diff("gone", "");
        assert_eq!(
            diff,
            vec![
                "--- CSV Script",
                "+++ Recognized Audio",
                "@@ -1 +0,0 @@",
                "-gone",
            ]
        );
    }

    #[test]
    fn emitted_lines_have_no_terminators() {
        let diff = unified_diff("a\nb\n", "a\nc\n");
        for line in &diff {
            assert!(!line.ends_with('\n'), "line has terminator: {line:?}");
            assert!(!line.ends_with('\r'), "line has terminator: {line:?}");
        }
    }

    #[test]
    fn bare_carriage_return_is_a_line_break() {
        assert_eq!(split_lines("one\rtwo"), vec!["one", "two"]);
        assert_eq!(split_lines("one\r\ntwo"), vec!["one", "two"]);
        assert_eq!(split_lines("one\ntwo\n"), vec!["one", "two"]);
        assert!(split_lines("").is_empty());

        // A CR-separated script diffs per line, the same as LF-separated.
        let diff = unified_diff("one\rtwo", "one\nTWO");
        assert_eq!(
            diff,
            vec![
                "--- CSV Script",
                "+++ Recognized Audio",
                "@@ -1,2 +1,2 @@",
                " one",
                "-two",
                "+TWO",
            ]
        );
    }

    #[test]
    fn multi_line_replace_block() {
        let diff = unified_diff("keep\nold one\nold two\nkeep2", "keep\nnew one\nkeep2");
        assert_eq!(
            diff,
            vec![
                "--- CSV Script",
                "+++ Recognized Audio",
                "@@ -1,4 +1,3 @@",
                " keep",
                "-old one",
                "-old two",
                "+new one",
                " keep2",
            ]
        );
    }
}
