//! Arena-based document storage
//!
//! "Bad programmers worry about the code. Good programmers worry about
//! data structures and their relationships."
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<Node>
//!        [Doc][Node1][Node2]...
//!         ↑ slot 0 is always the document root
//!         ↑ links are 4-byte indices, not pointers
//! ```
//!
//! A `Document` is only mutable through `DocumentBuilder`. Once built it is
//! read-only, so it can be shared between tasks behind an `Arc` without locks.

use std::ops::Deref;

use ahash::AHashMap;

use crate::error::{DomError, Result};
use crate::types::{Node, NodeId};

/// Read-only node tree
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes, root first
    nodes: Vec<Node>,

    /// Backend node ID → NodeId lookup (for CDP-imported trees)
    backend_id_map: AHashMap<u32, NodeId>,
}

impl Document {
    /// Root node ID
    pub fn root_id(&self) -> NodeId {
        0
    }

    /// Get node by ID
    pub fn get(&self, node_id: NodeId) -> Result<&Node> {
        self.node(node_id).ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID, `None` when out of range
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(node_id as usize)
    }

    /// Borrowed, navigable view of a node
    pub fn node_ref(&self, node_id: NodeId) -> Option<NodeRef<'_>> {
        self.node(node_id).map(|node| NodeRef::new(self, node))
    }

    /// Get node ID by backend node ID
    pub fn node_by_backend_id(&self, backend_id: u32) -> Option<NodeId> {
        self.backend_id_map.get(&backend_id).copied()
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A built document always holds at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all nodes
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterator over all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| i as NodeId)
    }

    /// Child IDs of a node, left to right
    pub fn children(&self, node_id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(node_id).and_then(|n| n.first_child),
        }
    }

    /// Traverse a subtree depth-first (iterative, no recursion)
    ///
    /// `visit` receives the node and its depth relative to `start_id`.
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(NodeId, &Node, usize) -> Result<()>,
    {
        let mut stack = vec![(start_id, 0)];

        while let Some((node_id, depth)) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node_id, node, depth)?;

            // Push children in reverse order (so they're visited left-to-right)
            let children: Vec<NodeId> = self.children(node_id).collect();
            for &child_id in children.iter().rev() {
                stack.push((child_id, depth + 1));
            }
        }

        Ok(())
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// A node together with the document it lives in
///
/// Predicates receive this view so they can look at neighbours (e.g. the
/// first child's text) and not just the node itself. The node does not have
/// to be stored in the document: a detached copy navigates through its links.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub fn new(doc: &'a Document, node: &'a Node) -> Self {
        Self { doc, node }
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    fn follow(&self, link: Option<NodeId>) -> Option<NodeRef<'a>> {
        link.and_then(|id| self.doc.node_ref(id))
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.follow(self.node.parent)
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.follow(self.node.first_child)
    }

    pub fn last_child(&self) -> Option<NodeRef<'a>> {
        self.follow(self.node.last_child)
    }

    pub fn prev_sibling(&self) -> Option<NodeRef<'a>> {
        self.follow(self.node.prev_sibling)
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.follow(self.node.next_sibling)
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

/// Builds a `Document`, linking nodes as they are appended
///
/// Slot 0 is created up front and holds the document root.
#[derive(Debug)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::document());
        Self {
            doc: Document {
                nodes,
                backend_id_map: AHashMap::new(),
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.doc.root_id()
    }

    /// Store an unlinked node, returns its ID
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let node_id = self.doc.nodes.len() as NodeId;
        node.parent = None;
        node.first_child = None;
        node.last_child = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        if let Some(backend_id) = node.backend_node_id {
            self.doc.backend_id_map.insert(backend_id, node_id);
        }
        self.doc.nodes.push(node);
        node_id
    }

    /// Get node by ID (mutable), for filling in data before `build`
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut Node> {
        self.doc
            .nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Link `child` as the new last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        // No cycles: `child` must not be `parent` or one of its ancestors
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(DomError::AlreadyAttached(child));
            }
            ancestor = self.doc.get(id)?.parent;
        }
        let last = self.doc.get(parent)?.last_child;
        {
            let node = self.get_mut(child)?;
            if node.parent.is_some() || child == 0 {
                return Err(DomError::AlreadyAttached(child));
            }
            node.parent = Some(parent);
            node.prev_sibling = last;
        }
        match last {
            Some(last) => self.get_mut(last)?.next_sibling = Some(child),
            None => self.get_mut(parent)?.first_child = Some(child),
        }
        self.get_mut(parent)?.last_child = Some(child);
        Ok(())
    }

    /// Add `node` and append it under `parent` in one step
    pub fn append(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        // Validate the parent before storing anything
        self.doc.get(parent)?;
        let id = self.add_node(node);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        self.append(parent, Node::element(tag))
    }

    pub fn text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        self.append(parent, Node::text(text))
    }

    pub fn comment(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        self.append(parent, Node::comment(text))
    }

    pub fn doctype(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.append(parent, Node::doctype(name))
    }

    pub fn set_attr(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.get_mut(node_id)?.set_attr(key, value);
        Ok(())
    }

    pub fn build(self) -> Document {
        self.doc
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
