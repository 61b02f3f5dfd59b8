//! Attribute list accessors
//!
//! Lookup is by key, first match wins. Namespaces are carried but not
//! consulted: keys are effectively unique for HTML documents.

use crate::types::Attribute;

/// Borrowed view over a node's attributes
#[derive(Debug, Clone, Copy)]
pub struct AttrList<'a> {
    attrs: &'a [Attribute],
}

impl<'a> AttrList<'a> {
    pub fn new(attrs: &'a [Attribute]) -> Self {
        Self { attrs }
    }

    /// List with no attributes (what an empty finder reports)
    pub fn empty() -> Self {
        Self { attrs: &[] }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Attribute> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn val(&self, key: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    pub fn id(&self) -> Option<&'a str> {
        self.val("id")
    }

    /// Words of the `class` attribute
    pub fn class_list(&self) -> Option<Vec<&'a str>> {
        self.val("class")
            .map(|classes| classes.split_whitespace().collect())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.attrs.iter().any(|a| a.key == key)
    }

    pub fn has_val(&self, key: &str, val: &str) -> bool {
        self.val(key) == Some(val)
    }

    pub fn has_val_cond(&self, key: &str, cond: impl Fn(&str) -> bool) -> bool {
        self.val(key).is_some_and(cond)
    }

    /// True if `word` is one of the space-separated words of the value
    pub fn has_word(&self, key: &str, word: &str) -> bool {
        self.has_word_cond(key, |w| w == word)
    }

    pub fn has_word_cond(&self, key: &str, cond: impl Fn(&str) -> bool) -> bool {
        self.val(key)
            .is_some_and(|value| value.split_whitespace().any(cond))
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.has_val("id", id)
    }

    pub fn has_id_cond(&self, cond: impl Fn(&str) -> bool) -> bool {
        self.has_val_cond("id", cond)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.has_word("class", class)
    }

    pub fn has_class_cond(&self, cond: impl Fn(&str) -> bool) -> bool {
        self.has_word_cond("class", cond)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_attrs() -> Vec<Attribute> {
        vec![
            Attribute::new("id", "2"),
            Attribute::new("class", "bar  other"),
            Attribute::new("attr2", "boom"),
        ]
    }

    #[test]
    fn test_lookups() {
        let attrs = span_attrs();
        let list = AttrList::new(&attrs);

        assert_eq!(list.val("attr2"), Some("boom"));
        assert_eq!(list.val("attr_nonexistent"), None);
        assert_eq!(list.id(), Some("2"));
        assert_eq!(list.class_list(), Some(vec!["bar", "other"]));
        assert!(list.exists("attr2"));
        assert!(!list.exists("href"));
        assert!(list.has_val("attr2", "boom"));
        assert!(list.has_id("2"));
        assert!(!list.has_id("bad_id"));
        assert!(list.has_class("bar"));
        assert!(!list.has_class("ba"));
        assert!(list.has_class_cond(|c| c.ends_with("her")));
        assert!(list.has_id_cond(|id| id.parse::<u32>().is_ok()));
    }

    #[test]
    fn test_empty_list() {
        let list = AttrList::empty();

        assert!(list.id().is_none());
        assert!(list.class_list().is_none());
        assert!(!list.exists("any"));
        assert!(!list.has_id("any"));
        assert!(!list.has_class("any"));
        assert!(!list.has_val_cond("any", |_| true));
    }

    #[test]
    fn test_first_key_wins() {
        let attrs = vec![Attribute::new("k", "first"), Attribute::new("k", "second")];
        assert_eq!(AttrList::new(&attrs).val("k"), Some("first"));
    }
}
