use crate::error::PressError;
use crate::rewrite::css::rewrite_css;
use crate::rewrite::html::rewrite_markup;
use crate::rewrite::tokens::{assign_tokens, TokenMap};
use crate::style::extract;
use rayon::prelude::*;

/// Everything one pressing run produces: the rewritten stylesheet, the
/// rewritten markup documents in input order, and the token map that ties
/// the two together.
#[derive(Debug)]
pub struct PressOutput {
    pub css: String,
    pub markup: Vec<String>,
    pub tokens: TokenMap,
}

pub mod class_press {
    use super::*;

    /// Runs the whole pipeline: extract selectors from the stylesheet,
    /// assign short tokens, rewrite the stylesheet text and every markup
    /// document against the shared map.
    ///
    /// Markup documents are independent once the map exists, so they are
    /// rewritten in parallel.
    pub fn press(css_text: &str, markup_docs: &[String]) -> Result<PressOutput, PressError> {
        let tree = extract::parse_rule_tree(css_text)?;
        let classes = extract::collect_classes(&tree);
        let ids = extract::collect_ids(&tree);
        log::info!(
            "extracted {} classes and {} ids from stylesheet",
            classes.len(),
            ids.len()
        );

        let tokens = assign_tokens(&classes, &ids);
        let css = rewrite_css(&tokens, css_text);
        let markup = markup_docs
            .par_iter()
            .map(|doc| rewrite_markup(&tokens, doc))
            .collect();

        Ok(PressOutput {
            css,
            markup,
            tokens,
        })
    }
}
