//! Core node types
//!
//! Key design principles:
//! 1. Use u32 for links (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for attribute lists (most elements have a handful)
//! 3. One `data` field: tag name, text payload or doctype name depending on type

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::attr::AttrList;

/// Node identifier (index into arena)
pub type NodeId = u32;

/// Node type of an HTML tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Error = 0,
    Document = 1,
    Element = 2,
    Text = 3,
    Comment = 4,
    Doctype = 5,
}

impl NodeType {
    /// Map a DOM standard `nodeType` number (as sent by CDP)
    pub fn from_dom_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            3 | 4 => Some(NodeType::Text),
            8 => Some(NodeType::Comment),
            9 | 11 => Some(NodeType::Document),
            10 => Some(NodeType::Doctype),
            _ => None,
        }
    }

    /// Short label used by the tree printer
    pub fn label(self) -> &'static str {
        match self {
            NodeType::Error => "ERR",
            NodeType::Document => "DOC",
            NodeType::Doctype => "DOCTYPE",
            NodeType::Element => "ELEM",
            NodeType::Text => "TEXT",
            NodeType::Comment => "COMMENT",
        }
    }
}

/// A single attribute of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: None,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A node of the tree
///
/// Links are arena indices. A node copied out of the arena keeps its links,
/// so navigation from the copy lands back in the original tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_type: NodeType,

    /// Tag name (Element), payload (Text, Comment), name (Doctype)
    pub data: String,
    pub attrs: SmallVec<[Attribute; 4]>,

    // Navigation
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,

    /// Backend id when imported from CDP
    pub backend_node_id: Option<u32>,
}

impl Node {
    pub fn new(node_type: NodeType, data: impl Into<String>) -> Self {
        Self {
            node_type,
            data: data.into(),
            attrs: SmallVec::new(),
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            backend_node_id: None,
        }
    }

    pub fn document() -> Self {
        Self::new(NodeType::Document, "")
    }

    /// Element with a lower-cased tag name
    pub fn element(tag: &str) -> Self {
        Self::new(NodeType::Element, tag.to_ascii_lowercase())
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self::new(NodeType::Text, data)
    }

    pub fn comment(data: impl Into<String>) -> Self {
        Self::new(NodeType::Comment, data)
    }

    pub fn doctype(name: impl Into<String>) -> Self {
        Self::new(NodeType::Doctype, name)
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.data)
        } else {
            None
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Element test ignoring ASCII case
    pub fn is_tag(&self, tag: &str) -> bool {
        self.is_element() && self.data.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self) -> AttrList<'_> {
        AttrList::new(&self.attrs)
    }

    /// Set or replace an attribute value (no namespace)
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|a| a.namespace.is_none() && a.key == key)
        {
            Some(a) => a.value = value,
            None => self.attrs.push(Attribute::new(key, value)),
        }
    }
}
