//! Textual stylesheet rewriting.
//!
//! Renaming works directly on the stylesheet text, one map entry at a time,
//! so untouched formatting, comments and declarations survive byte for byte.

use crate::rewrite::tokens::TokenMap;

/// Rewrites every mapped class and id selector occurrence in `css_text`.
///
/// Map keys keep their sigil, so `.classA` only ever matches in selector
/// position and a `#fff` color literal is never confused with an id token.
pub fn rewrite_css(tokens: &TokenMap, css_text: &str) -> String {
    let mut out = css_text.to_string();
    for (key, token) in tokens.iter() {
        let sigil = match key.chars().next() {
            Some(ch @ ('.' | '#')) => ch,
            _ => {
                log::debug!("skipping token map key without sigil: {:?}", key);
                continue;
            }
        };
        let replacement = format!("{}{}", sigil, token);
        out = replace_whole(&out, key, &replacement);
    }
    out
}

/// Replaces every whole-token occurrence of `needle` in `text`.
///
/// A neighbour is part of the same token when it is an identifier character
/// (letter, digit, '-', '_'). An edge of the needle that is itself a
/// non-identifier character, such as a leading '.' or '#', delimits that
/// side on its own and needs no neighbour check.
pub fn replace_whole(text: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }
    let check_left = needle.chars().next().map_or(false, is_ident_char);
    let check_right = needle.chars().next_back().map_or(false, is_ident_char);

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for (start, _) in text.match_indices(needle) {
        let end = start + needle.len();
        let left_ok = !check_left
            || text[..start]
                .chars()
                .next_back()
                .map_or(true, |ch| !is_ident_char(ch));
        let right_ok = !check_right
            || text[end..]
                .chars()
                .next()
                .map_or(true, |ch| !is_ident_char(ch));
        if left_ok && right_ok {
            out.push_str(&text[copied..start]);
            out.push_str(replacement);
            copied = end;
        }
    }
    out.push_str(&text[copied..]);
    out
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}
