//! Finder: nullable handle to one node
//!
//! The empty finder is the "not found" value. Every method on it answers
//! with another empty value (empty finder, empty stream, empty attribute
//! list, empty string), so lookups chain without checks until the caller
//! needs a real result.

use std::fmt;
use std::sync::Arc;

use dom::{render_html, AttrList, Document, Node, NodeId, NodeRef, NodeType};

/// Reference to zero or one node of a shared document
#[derive(Clone, Default)]
pub struct Finder {
    target: Option<Target>,
}

#[derive(Clone)]
struct Target {
    doc: Arc<Document>,
    id: NodeId,
    /// Detached copy made by `copy`; shadows the arena slot
    copy: Option<Arc<Node>>,
}

impl Target {
    fn node(&self) -> Option<&Node> {
        match &self.copy {
            Some(copy) => Some(copy.as_ref()),
            None => self.doc.node(self.id),
        }
    }
}

impl Finder {
    /// The "not found" finder
    pub fn empty() -> Self {
        Self { target: None }
    }

    /// Finder on the document root
    pub fn new(doc: Arc<Document>) -> Self {
        let id = doc.root_id();
        Self::from_node(doc, id)
    }

    /// Finder on `id`; empty when the document has no such node
    pub fn from_node(doc: Arc<Document>, id: NodeId) -> Self {
        if doc.node(id).is_none() {
            return Self::empty();
        }
        Self {
            target: Some(Target {
                doc,
                id,
                copy: None,
            }),
        }
    }

    /// Parse HTML into a fresh document and return its root
    pub fn parse_html(html: &str) -> Self {
        Self::new(Arc::new(Document::parse_html(html)))
    }

    /// True when no node is referenced
    pub fn is_empty(&self) -> bool {
        self.target.is_none()
    }

    /// Referenced node (the copy, for detached finders)
    pub fn node(&self) -> Option<&Node> {
        self.target.as_ref().and_then(Target::node)
    }

    /// Node together with its document, as predicates see it
    pub fn node_ref(&self) -> Option<NodeRef<'_>> {
        let target = self.target.as_ref()?;
        Some(NodeRef::new(&target.doc, target.node()?))
    }

    /// Document the node lives in
    pub fn document(&self) -> Option<&Arc<Document>> {
        self.target.as_ref().map(|t| &t.doc)
    }

    /// Arena slot of the node (a copy reports the slot it was copied from)
    pub fn node_id(&self) -> Option<NodeId> {
        self.target.as_ref().map(|t| t.id)
    }

    /// True for finders produced by `copy` or `Map`
    pub fn is_copy(&self) -> bool {
        self.target.as_ref().is_some_and(|t| t.copy.is_some())
    }

    /// Type of the referenced node
    pub fn node_type(&self) -> Option<NodeType> {
        self.node().map(|n| n.node_type)
    }

    /// Tag name, text payload or doctype name; "" when empty
    pub fn data(&self) -> &str {
        self.node().map_or("", |n| n.data.as_str())
    }

    /// Finder on another slot of the same document
    pub(crate) fn at(&self, id: NodeId) -> Finder {
        match &self.target {
            Some(t) => Finder::from_node(t.doc.clone(), id),
            None => Finder::empty(),
        }
    }

    fn follow(&self, link: impl FnOnce(&Node) -> Option<NodeId>) -> Finder {
        match self.node().and_then(link) {
            Some(id) => self.at(id),
            None => Finder::empty(),
        }
    }

    /// Parent node, empty at the root
    pub fn parent(&self) -> Finder {
        self.follow(|n| n.parent)
    }

    /// First child node
    pub fn first_child(&self) -> Finder {
        self.follow(|n| n.first_child)
    }

    /// Last child node
    pub fn last_child(&self) -> Finder {
        self.follow(|n| n.last_child)
    }

    /// Previous sibling node, of any type
    pub fn prev_sibling(&self) -> Finder {
        self.follow(|n| n.prev_sibling)
    }

    /// Next sibling node, of any type
    pub fn next_sibling(&self) -> Finder {
        self.follow(|n| n.next_sibling)
    }

    /// Attribute list; empty for non-elements and empty finders
    pub fn attr(&self) -> AttrList<'_> {
        self.node().map_or_else(AttrList::empty, Node::attr)
    }

    /// Payload of the first child when it is a text node, "" otherwise
    pub fn inner_text(&self) -> &str {
        let Some(t) = &self.target else {
            return "";
        };
        t.node()
            .and_then(|n| n.first_child)
            .and_then(|id| t.doc.node(id))
            .filter(|child| child.is_text())
            .map_or("", |child| child.data.as_str())
    }

    /// Concatenated text of the subtree in the tree, trimmed; "" when empty
    pub fn text_content(&self) -> String {
        let Some(t) = &self.target else {
            return String::new();
        };
        dom::utils::text_content(&t.doc, t.id).unwrap_or_default()
    }

    /// Detached copy: new identity, same links, independently owned payload
    pub fn copy(&self) -> Finder {
        self.copy_with(|_| {})
    }

    /// Copy and let `edit` change the copy's payload before it is shared
    pub fn copy_with(&self, edit: impl FnOnce(&mut Node)) -> Finder {
        let Some(t) = &self.target else {
            return Finder::empty();
        };
        let Some(node) = t.node() else {
            return Finder::empty();
        };
        let mut node = node.clone();
        edit(&mut node);
        Finder {
            target: Some(Target {
                doc: t.doc.clone(),
                id: t.id,
                copy: Some(Arc::new(node)),
            }),
        }
    }

    pub(crate) fn matches(&self, pred: &crate::Predicate) -> bool {
        self.node_ref().is_some_and(|n| pred.test(n))
    }
}

/// Reference equality: same document, same slot, same copy (or both empty)
impl PartialEq for Finder {
    fn eq(&self, other: &Self) -> bool {
        match (&self.target, &other.target) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                Arc::ptr_eq(&a.doc, &b.doc)
                    && a.id == b.id
                    && match (&a.copy, &b.copy) {
                        (None, None) => true,
                        (Some(x), Some(y)) => Arc::ptr_eq(x, y),
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

impl Eq for Finder {}

impl fmt::Debug for Finder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.target, self.node()) {
            (Some(t), Some(node)) => write!(
                f,
                "Finder(#{}{} {} {:?})",
                t.id,
                if t.copy.is_some() { " copy" } else { "" },
                node.node_type.label(),
                node.data
            ),
            _ => f.write_str("Finder(empty)"),
        }
    }
}

/// Outer HTML of the node; empty finders render as ""
impl fmt::Display for Finder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.target, self.node()) {
            (Some(t), Some(node)) => f.write_str(&render_html(&t.doc, node)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"<div id="1"><span class="foo">1st</span><span id="2" class="bar other" attr2="boom">2nd</span></div>"#;

    fn span(top: &Finder, n: usize) -> Finder {
        let doc = top.document().unwrap();
        let id = doc
            .node_ids()
            .filter(|&id| doc.node(id).unwrap().is_tag("span"))
            .nth(n)
            .unwrap();
        top.at(id)
    }

    #[test]
    fn test_empty() {
        let empty = Finder::empty();

        assert!(empty.is_empty());
        assert_eq!(empty, Finder::default());
        assert_eq!(empty.to_string(), "");
        assert_eq!(empty.inner_text(), "");
        assert_eq!(empty.data(), "");
        assert!(empty.parent().is_empty());
        assert!(empty.first_child().is_empty());
        assert!(empty.last_child().is_empty());
        assert!(empty.prev_sibling().is_empty());
        assert!(empty.next_sibling().is_empty());
        assert!(empty.copy().is_empty());
        assert!(empty.node_ref().is_none());
        assert!(!empty.attr().exists("href"));
        assert!(empty.attr().val("href").is_none());
        assert!(empty.attr().id().is_none());
        assert!(empty.attr().class_list().is_none());
        assert!(!empty.attr().has_class("any"));
    }

    #[test]
    fn test_from_node_out_of_range() {
        let doc = Arc::new(Document::parse_html("<p>x</p>"));
        assert!(Finder::from_node(doc, 10_000).is_empty());
    }

    #[test]
    fn test_family_navigation() {
        let top = Finder::parse_html(SIMPLE);
        assert!(top.parent().is_empty());

        let first = span(&top, 0);
        let second = span(&top, 1);

        assert!(first.parent().attr().has_id("1"));
        assert_eq!(first.next_sibling(), second);
        assert_eq!(first.next_sibling().prev_sibling(), first);
        assert_eq!(first.parent().first_child(), first);
        assert_eq!(first.parent().last_child(), second);
        assert_ne!(first, second);
        assert_eq!(first.inner_text(), "1st");
        assert_eq!(first.first_child().data(), "1st");
        assert_eq!(first.first_child().inner_text(), "");
        assert_eq!(first.parent().text_content(), "1st2nd");
        assert_eq!(Finder::empty().text_content(), "");
    }

    #[test]
    fn test_display_renders_outer_html() {
        let top = Finder::parse_html(SIMPLE);

        assert_eq!(span(&top, 0).to_string(), r#"<span class="foo">1st</span>"#);
        assert_eq!(span(&top, 0).first_child().to_string(), "1st");
    }

    #[test]
    fn test_copy_is_detached() {
        let top = Finder::parse_html(SIMPLE);
        let original = span(&top, 0);

        let copy = original.copy_with(|n| n.set_attr("class", "changed"));

        assert!(copy.is_copy());
        assert_ne!(copy, original);
        assert_eq!(copy, copy.clone());
        assert_ne!(copy, original.copy());
        assert_eq!(copy.node_id(), original.node_id());
        assert!(copy.attr().has_class("changed"));
        assert!(original.attr().has_class("foo"));
        // Links still lead into the tree
        assert_eq!(copy.next_sibling(), span(&top, 1));
        assert_eq!(copy.inner_text(), "1st");
    }
}
