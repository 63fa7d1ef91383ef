pub mod extract;
pub mod rule_tree;
pub mod selector;
