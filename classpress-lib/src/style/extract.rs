//! Selector extraction over a parsed stylesheet.
//!
//! The stylesheet is parsed with LightningCSS, lifted into an owned
//! [`RuleTree`], and walked for class and id names. Names are collected in
//! first-seen document order, conditional groups included, and deduplicated
//! across the whole walk.

use crate::error::PressError;
use crate::style::rule_tree::{GroupRuleNode, RuleNode, RuleTree, StyleRuleNode};
use crate::style::selector;
use lightningcss::error::{Error as LcssError, ParserError};
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{style::StyleRule, CssRule};
use lightningcss::stylesheet::{ParserOptions, StyleSheet as LightningStyleSheet};
use lightningcss::traits::ToCss;

/// Parse a raw CSS string (LightningCSS) and convert it to a fully-owned rule tree.
pub fn parse_rule_tree(css_text: &str) -> Result<RuleTree, PressError> {
    let parser_opts = ParserOptions::default();

    // The `.map_err` call extracts the *inner* `ParserError` from
    // LightningCSS's `Error<ParserError>` wrapper; the borrowed error cannot
    // leave this function, so it is stringified here.
    let sheet = LightningStyleSheet::parse(css_text, parser_opts)
        .map_err(|e: LcssError<ParserError<'_>>| PressError::CssParse(e.kind.to_string()))?;

    Ok(RuleTree {
        nodes: convert_rules(&sheet.rules.0),
    })
}

fn convert_rules(rules: &[CssRule]) -> Vec<RuleNode> {
    let mut nodes = Vec::new();
    for rule in rules {
        match rule {
            CssRule::Style(style_rule) => {
                nodes.push(RuleNode::Style(convert_style_rule(style_rule)));
            }
            CssRule::Media(media_rule) => {
                let condition = media_rule
                    .query
                    .to_css_string(PrinterOptions::default())
                    .unwrap_or_default();
                nodes.push(RuleNode::Group(GroupRuleNode {
                    condition,
                    nodes: convert_rules(&media_rule.rules.0),
                }));
            }
            CssRule::Supports(supports_rule) => {
                let condition = supports_rule
                    .condition
                    .to_css_string(PrinterOptions::default())
                    .unwrap_or_default();
                nodes.push(RuleNode::Group(GroupRuleNode {
                    condition,
                    nodes: convert_rules(&supports_rule.rules.0),
                }));
            }
            // @font-face, @keyframes and friends carry no selectors to rename.
            _ => {}
        }
    }
    nodes
}

/// Helper to copy a single StyleRule's selector strings into the owned node.
fn convert_style_rule<'a>(style_rule: &StyleRule<'a>) -> StyleRuleNode {
    let mut selectors_vec = Vec::new();
    for selector in &style_rule.selectors.0 {
        if let Ok(sel_str) = selector.to_css_string(Default::default()) {
            selectors_vec.push(sel_str);
        }
    }
    StyleRuleNode {
        selectors: selectors_vec,
    }
}

/// All class names referenced by the stylesheet, bare (no '.'), in
/// first-seen order.
pub fn classes_from_css(css_text: &str) -> Result<Vec<String>, PressError> {
    let tree = parse_rule_tree(css_text)?;
    Ok(collect_classes(&tree))
}

/// All id names referenced by the stylesheet, bare (no '#'), in first-seen
/// order.
pub fn ids_from_css(css_text: &str) -> Result<Vec<String>, PressError> {
    let tree = parse_rule_tree(css_text)?;
    Ok(collect_ids(&tree))
}

pub fn collect_classes(tree: &RuleTree) -> Vec<String> {
    collect_names(&tree.nodes, '.', Vec::new())
}

pub fn collect_ids(tree: &RuleTree) -> Vec<String> {
    collect_names(&tree.nodes, '#', Vec::new())
}

fn collect_names(nodes: &[RuleNode], sigil: char, mut names: Vec<String>) -> Vec<String> {
    for node in nodes {
        match node {
            RuleNode::Style(rule) => {
                for sel in &rule.selectors {
                    for token in selector::sigil_tokens(sel, sigil) {
                        // Tokens are sigil-prefixed; the map built later
                        // re-attaches the sigil itself.
                        names = remove_duplicate(names, token[1..].to_string());
                    }
                }
            }
            RuleNode::Group(group) => {
                log::debug!(
                    "descending into conditional group '{}' ({} rules)",
                    group.condition,
                    group.nodes.len()
                );
                names = collect_names(node.nested(), sigil, names);
            }
        }
    }
    names
}

/// Appends `value` to `list` unless an equal entry is already present.
pub fn remove_duplicate(mut list: Vec<String>, value: String) -> Vec<String> {
    if !list.iter().any(|existing| existing == &value) {
        list.push(value);
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE_CSS: &str = "\
        .content { color: #fff }\n\
        .container { width: 100% }\n\
        .hidden { display: none }\n\
        .is-home .content { color: red }\n\
        .row { margin: 0 }\n\
        .col-xs-12, .col-sm-8, .col-lg-4 { padding: 0 }\n\
        @media (max-width: 300px) {\n\
            .title { font-size: 16px }\n\
            .link:hover { color: blue }\n\
        }\n\
        @media (min-width: 800px) {\n\
            .open { display: block }\n\
            .visible-xs { display: none }\n\
            .row { margin: 1px }\n\
        }\n\
        #main { width: 50% }\n\
        div[role='document'] { z-index: 1 }\n";

    #[test]
    fn collects_classes_in_first_seen_order() {
        let classes = classes_from_css(FIXTURE_CSS).unwrap();
        assert_eq!(
            classes,
            vec![
                "content",
                "container",
                "hidden",
                "is-home",
                "row",
                "col-xs-12",
                "col-sm-8",
                "col-lg-4",
                "title",
                "link",
                "open",
                "visible-xs",
            ]
        );
    }

    #[test]
    fn collects_ids_separately_from_classes() {
        let css = ".content { color: #fff }\n\
                   #main { width: 50% }\n\
                   @media (max-width: 300px) { #nav.open { left: 0 } }\n";
        assert_eq!(ids_from_css(css).unwrap(), vec!["main", "nav"]);
        assert_eq!(classes_from_css(css).unwrap(), vec!["content", "open"]);
    }

    #[test]
    fn recurses_into_nested_conditional_groups() {
        let css = "@media screen {\n\
                       @media (min-width: 800px) { .deep { color: red } }\n\
                       .shallow { color: blue }\n\
                   }\n";
        assert_eq!(classes_from_css(css).unwrap(), vec!["deep", "shallow"]);
    }

    #[test]
    fn reads_supports_blocks_like_media_blocks() {
        let css = "@supports (display: grid) { .grid-row { display: grid } }";
        assert_eq!(classes_from_css(css).unwrap(), vec!["grid-row"]);
    }

    #[test]
    fn rejects_unparseable_css() {
        let result = classes_from_css("}");
        assert!(matches!(result, Err(PressError::CssParse(_))));
    }

    #[test]
    fn remove_duplicate_skips_present_values() {
        let list = vec!["a".to_string()];
        assert_eq!(remove_duplicate(list, "a".to_string()), vec!["a"]);
    }

    #[test]
    fn remove_duplicate_appends_missing_values() {
        let list = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(
            remove_duplicate(list, "d".to_string()),
            vec!["a", "b", "c", "d"]
        );
    }
}
