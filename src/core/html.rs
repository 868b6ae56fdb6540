// src/core/html.rs
// Tiny case-insensitive helpers for walking tag soup. No DOM, no selector
// engine; the two ld2l pages we read are simple enough for substring scans.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Find the next `open_pat .. close_pat` block at or after `from`.
/// Returns byte offsets spanning the whole block, closing tag included.
/// `open_pat` is matched as a tag prefix ("<td" also matches "<td class=…>").
pub fn next_tag_block_ci(s: &str, open_pat: &str, close_pat: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open = to_lower(open_pat);
    let close = to_lower(close_pat);

    let start = lc.get(from..)?.find(&open)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end = open_end + lc[open_end..].find(&close)? + close.len();
    Some((start, end))
}

/// Find the next opening tag matching `open_pat` at or after `from`,
/// returning offsets for just the opener (`<a href=…>`).
pub fn next_tag_ci(s: &str, open_pat: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let start = lc.get(from..)?.find(&to_lower(open_pat))? + from;
    let end = s[start..].find('>')? + start + 1;
    Some((start, end))
}

/// The opening tag of a block, without the trailing `>`.
pub fn opener(block: &str) -> &str {
    &block[..block.find('>').unwrap_or(block.len())]
}

/// Pull an attribute value out of an opening tag. Tolerates single quotes,
/// double quotes, and unquoted values.
pub fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lc = to_lower(tag);
    let pat = format!("{}=", to_lower(name));
    let at = lc.find(&pat)? + pat.len();
    let rest = &tag[at..];

    match rest.as_bytes().first() {
        Some(b'"') => rest[1..].find('"').map(|e| &rest[1..1 + e]),
        Some(b'\'') => rest[1..].find('\'').map(|e| &rest[1..1 + e]),
        _ => {
            let end = rest
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .unwrap_or(rest.len());
            Some(&rest[..end])
        }
    }
}

/// Does the block contain an opening tag with this name?
pub fn has_tag_ci(block: &str, tag_name: &str) -> bool {
    let lc = to_lower(block);
    let pat = format!("<{}", to_lower(tag_name));
    // reject prefix collisions like <spanner> for "span"
    let mut from = 0;
    while let Some(i) = lc[from..].find(&pat) {
        let after = from + i + pat.len();
        match lc.as_bytes().get(after) {
            Some(b'>') | Some(b' ') | Some(b'/') | Some(b'\t') | Some(b'\n') | None => return true,
            _ => from = after,
        }
    }
    false
}
