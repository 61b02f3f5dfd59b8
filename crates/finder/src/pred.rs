//! Predicate library
//!
//! A predicate is a pure test over one node. Predicates only combine by
//! conjunction (`and`, `all`, `element_with`); anything else is a closure
//! wrapped with `Predicate::new`.
//!
//! All attribute and inner-text predicates match elements only.

use std::fmt;
use std::sync::Arc;

use dom::{NodeRef, NodeType};

type TestFn = dyn Fn(NodeRef<'_>) -> bool + Send + Sync;

/// Shareable node test
///
/// Cheap to clone; stream stages each hold their own clone.
#[derive(Clone)]
pub struct Predicate(Arc<TestFn>);

impl Predicate {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(NodeRef<'_>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(test))
    }

    pub fn test(&self, node: NodeRef<'_>) -> bool {
        (self.0)(node)
    }

    /// Both predicates must hold; `self` is evaluated first
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::new(move |n| self.test(n) && other.test(n))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Matches every node
pub fn always() -> Predicate {
    Predicate::new(|_| true)
}

/// Conjunction of any number of predicates; empty means `always`
pub fn all(preds: impl IntoIterator<Item = Predicate>) -> Predicate {
    let preds: Vec<Predicate> = preds.into_iter().collect();
    Predicate::new(move |n| preds.iter().all(|p| p.test(n)))
}

pub fn node_type(node_type: NodeType) -> Predicate {
    Predicate::new(move |n| n.node_type == node_type)
}

/// Element with the given tag name (ASCII case-insensitive)
pub fn element(tag: &str) -> Predicate {
    let tag = tag.to_ascii_lowercase();
    Predicate::new(move |n| n.is_tag(&tag))
}

/// Element with the given tag that also satisfies every extra predicate
pub fn element_with(tag: &str, preds: impl IntoIterator<Item = Predicate>) -> Predicate {
    element(tag).and(all(preds))
}

pub fn attr(key: &str, val: &str) -> Predicate {
    let key = key.to_string();
    let val = val.to_string();
    Predicate::new(move |n| n.is_element() && n.attr().has_val(&key, &val))
}

pub fn attr_cond<F>(key: &str, cond: F) -> Predicate
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    let key = key.to_string();
    Predicate::new(move |n| n.is_element() && n.attr().has_val_cond(&key, &cond))
}

/// `word` is one of the space-separated words of the attribute value
pub fn attr_word(key: &str, word: &str) -> Predicate {
    let key = key.to_string();
    let word = word.to_string();
    Predicate::new(move |n| n.is_element() && n.attr().has_word(&key, &word))
}

pub fn attr_word_cond<F>(key: &str, cond: F) -> Predicate
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    let key = key.to_string();
    Predicate::new(move |n| n.is_element() && n.attr().has_word_cond(&key, &cond))
}

pub fn id(id: &str) -> Predicate {
    attr("id", id)
}

pub fn id_cond<F>(cond: F) -> Predicate
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    attr_cond("id", cond)
}

pub fn class(class: &str) -> Predicate {
    attr_word("class", class)
}

/// Some class word satisfies `cond`
pub fn class_cond<F>(cond: F) -> Predicate
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    attr_word_cond("class", cond)
}

/// Element whose first child is a text node with exactly `text`
pub fn inner_text(text: &str) -> Predicate {
    let text = text.to_string();
    inner_text_cond(move |data| data == text)
}

pub fn inner_text_cond<F>(cond: F) -> Predicate
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Predicate::new(move |n| {
        n.is_element()
            && n
                .first_child()
                .is_some_and(|child| child.is_text() && cond(&child.data))
    })
}

/// Text node whose payload satisfies `cond`
pub fn text_cond<F>(cond: F) -> Predicate
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Predicate::new(move |n| n.is_text() && cond(&n.data))
}
