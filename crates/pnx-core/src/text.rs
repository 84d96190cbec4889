//! Text normalization and tokenization for cutting-list records.
//!
//! Two normalizations exist:
//!
//! - [`normalize_text`] works on whole file contents before they are split
//!   into lines.
//! - [`normalize_key`] works on a single keyword or field before it is
//!   compared against rules.

const BOM: char = '\u{feff}';
const ZERO_WIDTH_SPACE: char = '\u{200b}';
const NO_BREAK_SPACE: char = '\u{a0}';

/// Field separator inside a record.
pub const FIELD_SEPARATOR: char = ';';

/// Normalize whole-file content.
///
/// Removes byte-order marks and zero-width spaces, turns non-breaking
/// spaces into plain spaces and unifies line endings to `\n`.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            BOM | ZERO_WIDTH_SPACE => {}
            NO_BREAK_SPACE => out.push(' '),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Normalize a keyword or field for comparison: strip invisible marks,
/// trim, lower-case.
pub fn normalize_key(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| *c != BOM && *c != ZERO_WIDTH_SPACE)
        .collect();
    stripped.trim().to_lowercase()
}

/// First field of a record: everything before the first `;`.
pub fn first_field(record: &str) -> &str {
    match record.split_once(FIELD_SEPARATOR) {
        Some((head, _)) => head,
        None => record,
    }
}

/// Leading token of an already normalized field.
///
/// Letters (Latin and Cyrillic), ASCII digits, `-` and `_` belong to a
/// token; anything else separates tokens. Leading separators are skipped,
/// so `"(пост) белый"` yields `пост`. Empty when the field holds no token
/// characters at all.
pub fn first_token(field: &str) -> &str {
    let Some(start) = field.find(is_token_char) else {
        return "";
    };
    let rest = &field[start..];
    let end = rest.find(|c: char| !is_token_char(c)).unwrap_or(rest.len());
    &rest[..end]
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё' | '-' | '_')
}

/// A record that is empty or consists of whitespace only.
pub fn is_blank(record: &str) -> bool {
    record.trim().is_empty()
}

/// Split into lines on every Unicode line boundary: `\n`, `\r\n`, `\r`,
/// vertical tab, form feed, the `\x1c`..`\x1e` separators, NEL, and the
/// line and paragraph separators. A trailing terminator does not produce an
/// extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
