//! Section splitter for underline-style headers.
//!
//! Plain-text reference documentation (e.g. the Python docs `.txt` export)
//! marks section titles by underlining them with a repeated character:
//! `***` for top-level titles, `===` for the next level, `---` below that.
//! This module partitions a document's lines into ordered `(title, body)`
//! sections on those underlines.
//!
//! Title and underline lines are excluded from section bodies, so the
//! concatenation of all bodies reproduces the document's remaining lines
//! in order. Sections whose trimmed body is empty are dropped.

use crate::models::{Section, INTRO_TITLE};

/// Classify a line as a header underline.
///
/// A trimmed line of length >= 3 consisting entirely of one repeated
/// character from `*`, `=`, `-` is an underline; the returned level is
/// 1 for `*`, 2 for `=`, 3 for `-`. The level is not used for nesting
/// downstream but is part of the detection contract.
pub fn header_level(line: &str) -> Option<u8> {
    let s = line.trim();
    if s.len() < 3 {
        return None;
    }
    let first = s.chars().next()?;
    let level = match first {
        '*' => 1,
        '=' => 2,
        '-' => 3,
        _ => return None,
    };
    if s.chars().all(|c| c == first) {
        Some(level)
    } else {
        None
    }
}

/// Split document text into ordered sections.
///
/// Everything before the first header belongs to a section titled
/// "Introduction". An underline on the very first line has no title line
/// above it and is treated as ordinary body content — a deliberate quirk
/// of the splitter, kept as-is and pinned by tests.
pub fn split_sections(content: &str) -> Vec<Section> {
    let lines: Vec<&str> = content.split('\n').collect();

    let mut sections = Vec::new();
    let mut title = INTRO_TITLE.to_string();
    let mut buf: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if i > 0 && header_level(line).is_some() {
            // The line above the underline is the next section's title.
            // It was appended to the running body on the previous
            // iteration (unless it was itself consumed as an underline),
            // so take it back out.
            if buf.last() == Some(&lines[i - 1]) {
                buf.pop();
            }
            push_section(&mut sections, &title, &buf);
            buf.clear();

            let next_title = lines[i - 1].trim();
            // An underline with a blank title line degrades to the sentinel.
            title = if next_title.is_empty() {
                INTRO_TITLE.to_string()
            } else {
                next_title.to_string()
            };
        } else {
            buf.push(line);
        }
    }

    push_section(&mut sections, &title, &buf);
    sections
}

fn push_section(sections: &mut Vec<Section>, title: &str, lines: &[&str]) {
    let body = lines.join("\n").trim().to_string();
    if !body.is_empty() {
        sections.push(Section {
            title: title.to_string(),
            body,
        });
    }
}
