use html5ever::QualName;
use std::cell::RefCell;
use std::rc::Rc;

pub mod dom_tree {
    use super::*;

    #[derive(Debug, Clone)]
    pub enum Node {
        DocumentRoot(DocumentRootNode),
        Element(ElementNode),
        Text(String),
    }

    #[derive(Debug, Clone)]
    pub struct DocumentRootNode {
        pub children: Vec<Rc<RefCell<Node>>>,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        pub attributes: Vec<(String, String)>,
        pub children: Vec<Rc<RefCell<Node>>>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: Rc<RefCell<Node>>,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl DocumentRootNode {
        pub fn new() -> Self {
            DocumentRootNode {
                children: Vec::new(),
            }
        }
    }

    impl ElementNode {
        pub fn new(tag: String, qual_name: QualName) -> Self {
            ElementNode {
                tag,
                qual_name,
                attributes: Vec::new(),
                children: Vec::new(),
            }
        }

        /// Returns the value of the named attribute, if present.
        pub fn attr(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        }

        /// Overwrites the named attribute in place, keeping its position.
        /// Appends it when the element does not carry it yet.
        pub fn set_attr(&mut self, name: &str, value: String) {
            match self.attributes.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value,
                None => self.attributes.push((name.to_string(), value)),
            }
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::new()))),
            doctype: RefCell::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::dom_tree::ElementNode;
    use html5ever::{LocalName, Namespace, QualName};

    fn make_element(tag: &str) -> ElementNode {
        ElementNode::new(
            tag.to_string(),
            QualName::new(
                None,
                Namespace::from("http://www.w3.org/1999/xhtml"),
                LocalName::from(tag),
            ),
        )
    }

    #[test]
    fn set_attr_keeps_attribute_position() {
        let mut div = make_element("div");
        div.attributes.push(("id".to_string(), "top".to_string()));
        div.attributes
            .push(("class".to_string(), "row".to_string()));

        div.set_attr("id", "a".to_string());

        assert_eq!(div.attributes[0], ("id".to_string(), "a".to_string()));
        assert_eq!(div.attr("class"), Some("row"));
    }

    #[test]
    fn set_attr_appends_missing_attribute() {
        let mut div = make_element("div");
        assert_eq!(div.attr("class"), None);

        div.set_attr("class", "row".to_string());

        assert_eq!(div.attr("class"), Some("row"));
    }
}
