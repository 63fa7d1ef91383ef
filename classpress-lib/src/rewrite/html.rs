//! Markup rewriting against a token map.
//!
//! Five attribute families participate: `class` and the key positions of
//! `ng-class` / `data-ng-class` resolve against '.'-keys of the map, while
//! `id` and `for` resolve whole-value against '#'-keys. Everything else in
//! the document passes through the serializer untouched.

use crate::dom::dom_tree::{Document, ElementNode, Node};
use crate::parser::html::{create_dom_tree, serialize_document};
use crate::rewrite::css::replace_whole;
use crate::rewrite::tokens::TokenMap;
use std::cell::RefCell;
use std::rc::Rc;

/// The three Angular `ng-class` value shapes, decided once per attribute.
///
/// Classification priority is map, then array, then plain text. A brace
/// value that fails to parse as `key: expression` pairs falls back to plain
/// text, which mirrors how a browser-side expression evaluator would treat
/// it.
#[derive(Debug)]
enum NgClassStyle {
    /// `{key: expr, ...}` with class names in key position.
    Map(Vec<MapEntry>),
    /// `[expr, ...]`, kept verbatim: the entries are expressions, not
    /// class-name literals, so renaming them would corrupt scope lookups.
    Array(String),
    /// A plain space-separated class list.
    Text(String),
}

/// One `key: expression` pair of a map-style value, split so the key can be
/// rewritten while every other byte is preserved on reserialization.
#[derive(Debug)]
struct MapEntry {
    /// Whitespace between the separating comma and the key.
    lead: String,
    /// The key's quote character, if it was quoted.
    quote: Option<char>,
    key: String,
    /// Whitespace between the key and the colon.
    sep: String,
    /// The expression text after the colon, verbatim.
    expr: String,
}

/// Parses markup, rewrites every mapped attribute, and serializes back to
/// text.
pub fn rewrite_markup(tokens: &TokenMap, markup: &str) -> String {
    let document = create_dom_tree(markup);
    rewrite_document(tokens, &document);
    serialize_document(&document)
}

/// Rewrites all mapped attributes of a parsed document in place.
pub fn rewrite_document(tokens: &TokenMap, document: &Document) {
    rewrite_node(tokens, &document.root);
}

fn rewrite_node(tokens: &TokenMap, handle: &Rc<RefCell<Node>>) {
    let mut node = handle.borrow_mut();
    match &mut *node {
        Node::DocumentRoot(root) => {
            for child in &root.children {
                rewrite_node(tokens, child);
            }
        }
        Node::Element(element) => {
            rewrite_element(tokens, element);
            for child in &element.children {
                rewrite_node(tokens, child);
            }
        }
        Node::Text(_) => {}
    }
}

fn rewrite_element(tokens: &TokenMap, element: &mut ElementNode) {
    if let Some(rewritten) = element
        .attr("class")
        .map(|value| rewrite_class_value(tokens, value))
    {
        element.set_attr("class", rewritten);
    }

    // id and for are whole-value swaps: no token boundary scanning, the
    // attribute either names a mapped id exactly or stays as it is.
    for attr_name in ["id", "for"] {
        if let Some(token) = element
            .attr(attr_name)
            .and_then(|value| tokens.get(&format!("#{}", value)))
        {
            element.set_attr(attr_name, token.to_string());
        }
    }

    for attr_name in ["ng-class", "data-ng-class"] {
        if let Some(rewritten) = element
            .attr(attr_name)
            .map(|value| rewrite_ng_class_value(tokens, value))
        {
            element.set_attr(attr_name, rewritten);
        }
    }
}

/// Whole-token rewrite of a space-separated class list. Names the map does
/// not know are left alone.
fn rewrite_class_value(tokens: &TokenMap, value: &str) -> String {
    let mut out = value.to_string();
    for (key, token) in tokens.iter() {
        if let Some(name) = key.strip_prefix('.') {
            out = replace_whole(&out, name, token);
        }
    }
    out
}

fn rewrite_ng_class_value(tokens: &TokenMap, value: &str) -> String {
    match classify_ng_class(value) {
        NgClassStyle::Map(mut entries) => {
            for entry in &mut entries {
                entry.key = rewrite_class_value(tokens, &entry.key);
            }
            serialize_map_entries(&entries)
        }
        NgClassStyle::Array(raw) => raw,
        NgClassStyle::Text(raw) => rewrite_class_value(tokens, &raw),
    }
}

fn classify_ng_class(value: &str) -> NgClassStyle {
    let trimmed = value.trim();
    if trimmed.starts_with('{') && trimmed.contains(':') {
        if let Some(entries) = parse_map_entries(trimmed) {
            return NgClassStyle::Map(entries);
        }
    }
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return NgClassStyle::Array(value.to_string());
    }
    NgClassStyle::Text(value.to_string())
}

fn parse_map_entries(text: &str) -> Option<Vec<MapEntry>> {
    let inner = text.strip_prefix('{')?.strip_suffix('}')?;
    let mut entries = Vec::new();
    for piece in split_top_level(inner) {
        entries.push(parse_map_entry(piece)?);
    }
    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

/// Splits on commas that sit outside quotes and outside any nested
/// bracketing, so expression arguments like `test(a, b)` stay in one piece.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match quote {
            Some(open) => {
                if ch == open {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    pieces.push(&text[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            },
        }
    }
    pieces.push(&text[start..]);
    pieces
}

fn parse_map_entry(piece: &str) -> Option<MapEntry> {
    let body_start = piece.len() - piece.trim_start().len();
    let lead = piece[..body_start].to_string();
    let body = &piece[body_start..];

    let (quote, key, after_key) = match body.chars().next()? {
        open @ ('\'' | '"') => {
            let close = body[1..].find(open)? + 1;
            (Some(open), body[1..close].to_string(), close + 1)
        }
        _ => {
            let colon = body.find(':')?;
            let key = body[..colon].trim_end();
            (None, key.to_string(), key.len())
        }
    };
    if key.is_empty() {
        return None;
    }

    let rest = &body[after_key..];
    let colon = rest.find(':')?;
    let sep = &rest[..colon];
    if !sep.chars().all(|ch| ch.is_whitespace()) {
        return None;
    }

    Some(MapEntry {
        lead,
        quote,
        key,
        sep: sep.to_string(),
        expr: rest[colon + 1..].to_string(),
    })
}

fn serialize_map_entries(entries: &[MapEntry]) -> String {
    let mut out = String::from("{");
    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&entry.lead);
        if let Some(quote) = entry.quote {
            out.push(quote);
        }
        out.push_str(&entry.key);
        if let Some(quote) = entry.quote {
            out.push(quote);
        }
        out.push_str(&entry.sep);
        out.push(':');
        out.push_str(&entry.expr);
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press_map() -> TokenMap {
        [(".classA", "a"), (".classB", "b"), ("#id-a", "c")]
            .into_iter()
            .collect()
    }

    #[test]
    fn classifies_the_three_value_shapes() {
        assert!(matches!(classify_ng_class("class"), NgClassStyle::Text(_)));
        assert!(matches!(
            classify_ng_class("class class"),
            NgClassStyle::Text(_)
        ));
        assert!(matches!(
            classify_ng_class("[class]"),
            NgClassStyle::Array(_)
        ));
        assert!(matches!(
            classify_ng_class("[class, class]"),
            NgClassStyle::Array(_)
        ));
        assert!(matches!(
            classify_ng_class("{class: test()}"),
            NgClassStyle::Map(_)
        ));
        assert!(matches!(
            classify_ng_class("{'class': test()}"),
            NgClassStyle::Map(_)
        ));
        // Braces without a key/expression separator are not a map.
        assert!(matches!(
            classify_ng_class("{class test}"),
            NgClassStyle::Text(_)
        ));
    }

    #[test]
    fn rewrites_bare_map_keys() {
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "{classA: test()}"),
            "{a: test()}"
        );
    }

    #[test]
    fn keeps_the_quote_style_of_map_keys() {
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "{'classA': test()}"),
            "{'a': test()}"
        );
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "{\"classA\": test()}"),
            "{\"a\": test()}"
        );
    }

    #[test]
    fn rewrites_every_word_of_a_multi_word_key_but_not_the_expression() {
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "{\"classA classA\": test(\"classA\")}"),
            "{\"a a\": test(\"classA\")}"
        );
    }

    #[test]
    fn preserves_spacing_across_multiple_entries() {
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "{'classA': test(), 'classB': other}"),
            "{'a': test(), 'b': other}"
        );
    }

    #[test]
    fn leaves_unmapped_map_keys_alone() {
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "{open: isOpen()}"),
            "{open: isOpen()}"
        );
    }

    #[test]
    fn keeps_commas_inside_expression_arguments_together() {
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "{classA: test(a, b), classB: c}"),
            "{a: test(a, b), b: c}"
        );
    }

    #[test]
    fn rewrites_string_style_with_token_boundaries() {
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "classA skip-classA"),
            "a skip-classA"
        );
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "classB classA classB classA"),
            "b a b a"
        );
    }

    #[test]
    fn passes_array_style_through_verbatim() {
        assert_eq!(
            rewrite_ng_class_value(&press_map(), "[classA, classB]"),
            "[classA, classB]"
        );
    }

    #[test]
    fn rewrites_class_id_and_for_attributes_in_markup() {
        let out = rewrite_markup(
            &press_map(),
            "<div id=\"id-a\" class=\"classA\"></div><label for=\"id-a\">x</label>",
        );
        assert_eq!(
            out,
            "<html><head></head><body>\
             <div id=\"c\" class=\"a\"></div>\
             <label for=\"c\">x</label>\
             </body></html>"
        );
    }

    #[test]
    fn leaves_unmapped_ids_and_classes_in_markup_alone() {
        let out = rewrite_markup(
            &press_map(),
            "<div id=\"other\" class=\"classB skip-classA\"></div>",
        );
        assert_eq!(
            out,
            "<html><head></head><body>\
             <div id=\"other\" class=\"b skip-classA\"></div>\
             </body></html>"
        );
    }

    #[test]
    fn rewrites_ng_class_and_its_data_variant_in_markup() {
        let out = rewrite_markup(
            &press_map(),
            "<div ng-class=\"{'classB': cond()}\"></div>\
             <div data-ng-class=\"classA classB\"></div>\
             <div ng-class=\"[classA, classB]\"></div>",
        );
        assert_eq!(
            out,
            "<html><head></head><body>\
             <div ng-class=\"{'b': cond()}\"></div>\
             <div data-ng-class=\"a b\"></div>\
             <div ng-class=\"[classA, classB]\"></div>\
             </body></html>"
        );
    }
}
