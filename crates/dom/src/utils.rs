//! Text helpers

use crate::arena::Document;
use crate::error::Result;
use crate::types::{NodeId, NodeType};

/// True when `text` holds nothing but whitespace
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Concatenated text of a subtree, trimmed
pub fn text_content(doc: &Document, node_id: NodeId) -> Result<String> {
    let mut text = String::new();

    doc.traverse_df(node_id, |_, node, _| {
        if node.node_type == NodeType::Text {
            text.push_str(&node.data);
        }
        Ok(())
    })?;

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::DocumentBuilder;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_text_content() {
        let mut b = DocumentBuilder::new();
        let li = b.element(b.root(), "li").unwrap();
        b.text(li, " 2nd").unwrap();
        let span = b.element(li, "span").unwrap();
        b.text(span, "inner ").unwrap();
        b.comment(li, "skipped").unwrap();
        let doc = b.build();

        assert_eq!(text_content(&doc, li).unwrap(), "2ndinner");
        assert!(text_content(&doc, 42).is_err());
    }
}
