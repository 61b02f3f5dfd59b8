//! Traversal engine
//!
//! Two orders:
//! - depth-first pre-order (node, then children left to right), used by
//!   `find` and `find_all`; the starting node is included
//! - flat sibling scan along next/prev links, used by the `*sibling*`
//!   family; the starting node is excluded
//!
//! Both are plain iterators over arena links (no recursion, no allocation).
//! The streaming variants run the same iterators inside a producer task.

use dom::{Document, NodeId};

use crate::finder::Finder;
use crate::pred::Predicate;
use crate::stream::FinderStream;

/// Pre-order walk over the descendants of `root`, excluding `root`
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl<'a> Descendants<'a> {
    /// Walk starting at `root`'s first child; nothing for an unknown `root`
    pub fn new(doc: &'a Document, root: NodeId) -> Self {
        Self {
            doc,
            root,
            next: doc.node(root).and_then(|n| n.first_child),
        }
    }

    /// Successor of `current` in pre-order, staying inside `root`'s subtree
    fn successor(&self, current: NodeId) -> Option<NodeId> {
        let node = self.doc.node(current)?;
        if let Some(child) = node.first_child {
            return Some(child);
        }
        let mut at = current;
        while at != self.root {
            let node = self.doc.node(at)?;
            if let Some(sibling) = node.next_sibling {
                return Some(sibling);
            }
            at = node.parent?;
        }
        None
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.successor(current);
        Some(current)
    }
}

/// Scan direction for `Siblings`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Flat walk along sibling links, excluding the starting node
pub struct Siblings<'a> {
    doc: &'a Document,
    direction: Direction,
    next: Option<NodeId>,
}

impl<'a> Siblings<'a> {
    /// Siblings of the node whose links are `from`
    pub fn new(doc: &'a Document, from: &dom::Node, direction: Direction) -> Self {
        let next = match direction {
            Direction::Forward => from.next_sibling,
            Direction::Backward => from.prev_sibling,
        };
        Self {
            doc,
            direction,
            next,
        }
    }
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.node(current).and_then(|n| match self.direction {
            Direction::Forward => n.next_sibling,
            Direction::Backward => n.prev_sibling,
        });
        Some(current)
    }
}

impl Finder {
    /// First match in pre-order from this node (inclusive); empty if none
    pub fn find(&self, pred: Predicate) -> Finder {
        let (Some(doc), Some(id)) = (self.document(), self.node_id()) else {
            return Finder::empty();
        };
        if self.matches(&pred) {
            return self.clone();
        }
        Descendants::new(doc, id)
            .find(|&n| doc.node_ref(n).is_some_and(|n| pred.test(n)))
            .map_or_else(Finder::empty, |n| self.at(n))
    }

    /// Every match in pre-order from this node (inclusive), streamed
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless this finder is empty.
    pub fn find_all(&self, pred: Predicate) -> FinderStream {
        let (Some(doc), Some(id)) = (self.document().cloned(), self.node_id()) else {
            return FinderStream::empty();
        };
        let start = self.clone();
        FinderStream::spawn("find_all", move |out| async move {
            if start.matches(&pred) {
                out.emit(start.clone()).await?;
            }
            for n in Descendants::new(&doc, id) {
                if doc.node_ref(n).is_some_and(|n| pred.test(n)) {
                    out.emit(start.at(n)).await?;
                }
            }
            Ok(())
        })
    }

    fn scan(&self, pred: &Predicate, direction: Direction) -> Finder {
        let (Some(doc), Some(node)) = (self.document(), self.node()) else {
            return Finder::empty();
        };
        Siblings::new(doc, node, direction)
            .find(|&n| doc.node_ref(n).is_some_and(|n| pred.test(n)))
            .map_or_else(Finder::empty, |n| self.at(n))
    }

    fn scan_all(&self, pred: Predicate, direction: Direction, stage: &'static str) -> FinderStream {
        if self.is_empty() {
            return FinderStream::empty();
        }
        let start = self.clone();
        FinderStream::spawn(stage, move |out| async move {
            emit_siblings(&start, &pred, direction, &out).await
        })
    }

    /// First match among following siblings; never this node
    pub fn find_sibling(&self, pred: Predicate) -> Finder {
        self.scan(&pred, Direction::Forward)
    }

    /// First match among preceding siblings, nearest first
    pub fn find_prev_sibling(&self, pred: Predicate) -> Finder {
        self.scan(&pred, Direction::Backward)
    }

    /// All matches among following siblings, in document order
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless this finder is empty.
    pub fn find_siblings(&self, pred: Predicate) -> FinderStream {
        self.scan_all(pred, Direction::Forward, "find_siblings")
    }

    /// All matches among preceding siblings, nearest first
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless this finder is empty.
    pub fn find_prev_siblings(&self, pred: Predicate) -> FinderStream {
        self.scan_all(pred, Direction::Backward, "find_prev_siblings")
    }

    /// `find`, then the anchor's matching following siblings
    ///
    /// Returns the stream and whether an anchor was found. Suited to repeated
    /// structures (list items, table rows) reached by one deep search.
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless no anchor was found.
    pub fn find_with_siblings(&self, pred: Predicate) -> (FinderStream, bool) {
        let anchor = self.find(pred.clone());
        if anchor.is_empty() {
            return (FinderStream::empty(), false);
        }
        let stream = FinderStream::spawn("find_with_siblings", move |out| async move {
            out.emit(anchor.clone()).await?;
            emit_siblings(&anchor, &pred, Direction::Forward, &out).await
        });
        (stream, true)
    }

    /// One-item stream holding this finder; empty for an empty finder
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless this finder is empty.
    pub fn stream_self(&self) -> FinderStream {
        if self.is_empty() {
            return FinderStream::empty();
        }
        crate::stream::inject([self.clone()])
    }

    /// First element named `tag`, this node included
    pub fn find_element(&self, tag: &str) -> Finder {
        self.find(crate::pred::element(tag))
    }

    /// First element whose `id` is `id`
    pub fn find_by_id(&self, id: &str) -> Finder {
        self.find(crate::pred::id(id))
    }

    /// First element carrying the class word `class`
    pub fn find_by_class(&self, class: &str) -> Finder {
        self.find(crate::pred::class(class))
    }

    /// First element whose `key` attribute equals `val`
    pub fn find_by_attr(&self, key: &str, val: &str) -> Finder {
        self.find(crate::pred::attr(key, val))
    }

    /// Next sibling element named `tag`
    pub fn find_sibling_element(&self, tag: &str) -> Finder {
        self.find_sibling(crate::pred::element(tag))
    }

    /// Next sibling element whose `id` is `id`
    pub fn find_sibling_by_id(&self, id: &str) -> Finder {
        self.find_sibling(crate::pred::id(id))
    }

    /// Next sibling element carrying the class word `class`
    pub fn find_sibling_by_class(&self, class: &str) -> Finder {
        self.find_sibling(crate::pred::class(class))
    }

    /// Next sibling element whose `key` attribute equals `val`
    pub fn find_sibling_by_attr(&self, key: &str, val: &str) -> Finder {
        self.find_sibling(crate::pred::attr(key, val))
    }
}

/// Producer body shared by the sibling streams
async fn emit_siblings(
    start: &Finder,
    pred: &Predicate,
    direction: Direction,
    out: &crate::stream::Emitter,
) -> Result<(), crate::stream::Cancelled> {
    let (Some(doc), Some(node)) = (start.document(), start.node()) else {
        return Ok(());
    };
    for n in Siblings::new(doc, node, direction) {
        if doc.node_ref(n).is_some_and(|n| pred.test(n)) {
            out.emit(start.at(n)).await?;
        }
    }
    Ok(())
}
