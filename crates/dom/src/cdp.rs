//! CDP JSON → Document
//!
//! Imports the tree returned by Chrome's `DOM.getDocument` (with `depth: -1`):
//!
//! ```json
//! {
//!   "root": {
//!     "nodeId": 1,
//!     "backendNodeId": 1,
//!     "nodeType": 9,
//!     "nodeName": "#document",
//!     "children": [...]
//!   }
//! }
//! ```
//!
//! Attributes arrive as a flat `[key, value, key, value, ...]` array. Frame
//! documents (`contentDocument`) are linked as the last child of their
//! owner element.

use serde_json::Value;

use crate::arena::{Document, DocumentBuilder};
use crate::error::{DomError, Result};
use crate::types::{Attribute, Node, NodeId, NodeType};

impl Document {
    /// Build a document from a `DOM.getDocument` response
    pub fn from_cdp_json(cdp_response: &Value) -> Result<Document> {
        let root = cdp_response
            .get("root")
            .ok_or_else(|| DomError::Cdp("Missing 'root' in CDP response".to_string()))?;

        let mut builder = DocumentBuilder::new();
        let root_id = builder.root();

        match parse_node(root)? {
            // The response root becomes the arena root
            node if node.node_type == NodeType::Document => {
                builder.get_mut(root_id)?.backend_node_id = node.backend_node_id;
                parse_children(&mut builder, root, root_id)?;
            }
            node => {
                let id = builder.append(root_id, node)?;
                parse_children(&mut builder, root, id)?;
            }
        }

        let doc = builder.build();
        tracing::debug!(nodes = doc.len(), "imported CDP document");
        Ok(doc)
    }

    /// Parse a JSON string holding a `DOM.getDocument` response
    pub fn from_cdp_str(json: &str) -> Result<Document> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_cdp_json(&value)
    }
}

/// Convert a single CDP node, without its children
fn parse_node(cdp_node: &Value) -> Result<Node> {
    let node_type_val = cdp_node["nodeType"]
        .as_u64()
        .ok_or_else(|| DomError::Cdp("Missing nodeType".to_string()))?;

    let node_type = u8::try_from(node_type_val)
        .ok()
        .and_then(NodeType::from_dom_u8)
        .ok_or_else(|| DomError::InvalidNodeType {
            expected: "element, text, comment, document or doctype".to_string(),
            actual: node_type_val.to_string(),
        })?;

    let node_name = cdp_node["nodeName"].as_str().unwrap_or("");
    let node_value = cdp_node["nodeValue"].as_str().unwrap_or("");

    let mut node = match node_type {
        NodeType::Element => Node::element(cdp_node["localName"].as_str().unwrap_or(node_name)),
        NodeType::Doctype => Node::doctype(node_name),
        NodeType::Document => Node::document(),
        _ => Node::new(node_type, node_value),
    };

    node.backend_node_id = cdp_node["backendNodeId"]
        .as_u64()
        .and_then(|id| u32::try_from(id).ok());

    if let Some(attrs) = cdp_node["attributes"].as_array() {
        for pair in attrs.chunks_exact(2) {
            if let (Some(key), Some(value)) = (pair[0].as_str(), pair[1].as_str()) {
                node.attrs.push(Attribute::new(key, value));
            }
        }
    }

    Ok(node)
}

/// Recursively append `children` and `contentDocument` of a CDP node
fn parse_children(builder: &mut DocumentBuilder, cdp_node: &Value, parent: NodeId) -> Result<()> {
    if let Some(children) = cdp_node["children"].as_array() {
        for child in children {
            let child_id = builder.append(parent, parse_node(child)?)?;
            parse_children(builder, child, child_id)?;
        }
    }

    if let Some(content_doc) = cdp_node.get("contentDocument") {
        let doc_id = builder.append(parent, parse_node(content_doc)?)?;
        parse_children(builder, content_doc, doc_id)?;
    }

    Ok(())
}
