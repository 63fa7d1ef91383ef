//! This module contains functions and types for parsing HTML into a custom DOM tree
//! and serializing that tree back to markup text.
//!
//! It uses html5ever as the HTML parser and builds a DOM tree defined in the
//! `crate::dom::dom_tree` module. Serialization preserves attribute order as
//! parsed, so a document rewritten in place round-trips with only the rewritten
//! attribute values changed.

use crate::dom::dom_tree;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, NodeOrText, QuirksMode, TreeSink},
    LocalName, Namespace, QualName,
};
use std::cell::RefCell;
use std::rc::Rc;

/// A list of void (self-closing) elements in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "meta", "img", "br", "hr", "input", "link", "area", "base", "col", "embed", "param", "source",
    "track", "wbr",
];

/// Elements whose text content is written back verbatim, without entity escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// Creates a DOM tree from the provided HTML content.
///
/// # Arguments
///
/// * `markup` - A string slice containing the HTML to parse.
///
/// # Returns
///
/// A `dom_tree::Document` representing the parsed HTML.
pub fn create_dom_tree(markup: &str) -> dom_tree::Document {
    let tree_sink = PressTreeSink::new();
    let document = html5ever::parse_document(tree_sink, Default::default()).one(markup.to_string());
    document
}

/// Serializes the Document including its DOCTYPE (if any) back to markup text.
pub fn serialize_document(document: &dom_tree::Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = &*document.doctype.borrow() {
        out.push_str("<!DOCTYPE ");
        out.push_str(&doctype.name);
        out.push('>');
    }
    serialize_node(&document.root.borrow(), &mut out);
    out
}

fn serialize_node(node: &dom_tree::Node, out: &mut String) {
    match node {
        dom_tree::Node::DocumentRoot(root) => {
            for child in &root.children {
                serialize_node(&child.borrow(), out);
            }
        }
        dom_tree::Node::Element(elem) => {
            out.push('<');
            out.push_str(&elem.tag);
            for (name, value) in &elem.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }

            if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                out.push_str("/>");
                return;
            }

            out.push('>');
            let raw = RAW_TEXT_ELEMENTS.contains(&elem.tag.as_str());
            for child in &elem.children {
                match &*child.borrow() {
                    dom_tree::Node::Text(text) if raw => out.push_str(text),
                    other => serialize_node(other, out),
                }
            }
            out.push_str("</");
            out.push_str(&elem.tag);
            out.push('>');
        }
        dom_tree::Node::Text(text) => escape_text(text, out),
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// A custom TreeSink for building the DOM tree used by the parser.
///
/// It holds the Document being built, a stack of open nodes, and the current quirks mode.
pub struct PressTreeSink {
    document: dom_tree::Document,
    stack: RefCell<Vec<Rc<RefCell<dom_tree::Node>>>>,
    quirks_mode: RefCell<QuirksMode>,
}

impl PressTreeSink {
    /// Creates a new `PressTreeSink` with an initial document and root node.
    pub fn new() -> Self {
        let root_element = dom_tree::new_document();
        let root_clone = root_element.root.clone();
        Self {
            document: root_element,
            stack: RefCell::new(vec![root_clone]),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }
}

/// A simple implementation of the `ElemName` trait for our elements.
#[derive(Debug)]
pub struct PressElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for PressElemName {
    /// Returns a reference to the local name of the element.
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    /// Returns a reference to the namespace of the element.
    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for PressTreeSink {
    type Handle = Rc<RefCell<dom_tree::Node>>;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = PressElemName
    where
        Self: 'a;

    /// Finalizes and returns the constructed Document.
    fn finish(self) -> Self::Output {
        self.document
    }

    /// Called when a parsing error occurs.
    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        log::debug!("parse error: {}", msg);
    }

    /// Returns the handle to the document's root node.
    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    /// Returns the element name (as `PressElemName`) for the given element handle.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        if let dom_tree::Node::Element(ref elem) = *target.borrow() {
            PressElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            }
        } else {
            panic!("elem_name called on non-element node")
        }
    }

    /// Creates a new element node with the given name and attributes.
    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: html5ever::interface::ElementFlags,
    ) -> Self::Handle {
        let tag = name.local.to_string();
        let mut element_node = dom_tree::ElementNode::new(tag, name);
        element_node.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect::<Vec<_>>();
        Rc::new(RefCell::new(dom_tree::Node::Element(element_node)))
    }

    /// Creates a comment node. For simplicity, returns an empty text node.
    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        Rc::new(RefCell::new(dom_tree::Node::Text(String::new())))
    }

    /// Creates a processing instruction node by combining target and data into a text node.
    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        let combined = format!("{} {}", target, data);
        Rc::new(RefCell::new(dom_tree::Node::Text(combined)))
    }

    /// Appends a child node or text to the given parent node.
    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let child_node = match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                // Merge with a trailing text node so split tendrils come back
                // as one run of text.
                let parent_borrow = parent.borrow();
                let last_child = match &*parent_borrow {
                    dom_tree::Node::DocumentRoot(root) => root.children.last().cloned(),
                    dom_tree::Node::Element(elem) => elem.children.last().cloned(),
                    dom_tree::Node::Text(_) => None,
                };
                drop(parent_borrow);
                if let Some(last) = last_child {
                    if let dom_tree::Node::Text(ref mut existing) = *last.borrow_mut() {
                        existing.push_str(&text);
                        return;
                    }
                }
                Rc::new(RefCell::new(dom_tree::Node::Text(text.to_string())))
            }
        };

        let mut parent_borrow = parent.borrow_mut();
        match &mut *parent_borrow {
            dom_tree::Node::DocumentRoot(root) => root.children.push(child_node.clone()),
            dom_tree::Node::Element(ref mut element) => element.children.push(child_node.clone()),
            dom_tree::Node::Text(_) => {
                // Text nodes cannot have children; do nothing.
            }
        }
        drop(parent_borrow);

        let is_element = matches!(*child_node.borrow(), dom_tree::Node::Element(_));
        if is_element {
            self.stack.borrow_mut().push(child_node);
        }
    }

    /// Not used in this implementation.
    fn append_based_on_parent_node(
        &self,
        _element: &Self::Handle,
        _prev_element: &Self::Handle,
        _child: NodeOrText<Self::Handle>,
    ) {
    }

    /// Appends the DOCTYPE information to the Document.
    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    /// Marks that a script element has already started.
    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    /// Pops the last node off the internal stack.
    fn pop(&self, _node: &Self::Handle) {
        self.stack.borrow_mut().pop();
    }

    /// Returns the contents of a template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    /// Determines if two node handles refer to the same node.
    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    /// Sets the current quirks mode.
    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    /// Appends a node before a sibling (not implemented).
    fn append_before_sibling(&self, _sibling: &Self::Handle, _child: NodeOrText<Self::Handle>) {}

    /// Adds attributes to the target node if they are missing.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        let mut target_node = target.borrow_mut();

        if let dom_tree::Node::Element(elem_node) = &mut *target_node {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if !elem_node.attributes.iter().any(|(k, _)| k == &key) {
                    elem_node.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    /// Removes a node from its parent (not implemented).
    fn remove_from_parent(&self, _target: &Self::Handle) {}

    /// Reparents children from one node to another (not implemented).
    fn reparent_children(&self, _node: &Self::Handle, _new_parent: &Self::Handle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_trip(markup: &str) -> String {
        serialize_document(&create_dom_tree(markup))
    }

    #[test]
    fn wraps_bare_markup_in_document_scaffolding() {
        assert_eq!(
            round_trip("<div class=\"row\"></div>"),
            "<html><head></head><body><div class=\"row\"></div></body></html>"
        );
    }

    #[test]
    fn preserves_attribute_order() {
        assert_eq!(
            round_trip("<div id=\"top\" class=\"row\" data-x=\"1\"></div>"),
            "<html><head></head><body><div id=\"top\" class=\"row\" data-x=\"1\"></div></body></html>"
        );
    }

    #[test]
    fn emits_doctype_and_nested_text() {
        assert_eq!(
            round_trip("<!DOCTYPE html><html><body><h1>Test</h1></body></html>"),
            "<!DOCTYPE html><html><head></head><body><h1>Test</h1></body></html>"
        );
    }

    #[test]
    fn serializes_void_elements_self_closed() {
        assert_eq!(
            round_trip("<p>a<br>b</p>"),
            "<html><head></head><body><p>a<br/>b</p></body></html>"
        );
    }

    #[test]
    fn escapes_text_but_not_raw_style_content() {
        let markup = "<head><style>.a > .b { color: red }</style></head><body><p>1 &amp; 2 &lt; 3</p></body>";
        assert_eq!(
            round_trip(markup),
            "<html><head><style>.a > .b { color: red }</style></head>\
             <body><p>1 &amp; 2 &lt; 3</p></body></html>"
        );
    }

    #[test]
    fn drops_comments_from_output() {
        assert_eq!(
            round_trip("<div><!-- note --><span>x</span></div>"),
            "<html><head></head><body><div><span>x</span></div></body></html>"
        );
    }

    #[test]
    fn keeps_single_quotes_in_attribute_values() {
        assert_eq!(
            round_trip("<div ng-class=\"{'open': isOpen()}\"></div>"),
            "<html><head></head><body><div ng-class=\"{'open': isOpen()}\"></div></body></html>"
        );
    }
}
