// Owned rule tree lifted out of a parsed stylesheet.
//
// Only the shape needed for selector extraction survives: style rules keep
// their selector strings, conditional group rules (@media, @supports) keep
// their nested rules. Declarations are irrelevant to renaming and are not
// carried over.

#[derive(Debug, Default)]
pub struct RuleTree {
    pub nodes: Vec<RuleNode>,
}

#[derive(Debug, Clone)]
pub enum RuleNode {
    Style(StyleRuleNode),
    Group(GroupRuleNode),
}

#[derive(Debug, Clone)]
pub struct StyleRuleNode {
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GroupRuleNode {
    pub condition: String,
    pub nodes: Vec<RuleNode>,
}

impl RuleNode {
    /// The list of rules a walker should descend into for this node.
    ///
    /// A conditional group yields its nested rules; a style rule yields
    /// itself, so callers can recurse without caring which variant they
    /// hold.
    pub fn nested(&self) -> &[RuleNode] {
        match self {
            RuleNode::Group(group) => &group.nodes,
            RuleNode::Style(_) => std::slice::from_ref(self),
        }
    }
}
