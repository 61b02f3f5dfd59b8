//! HTML text → Document
//!
//! Parsing itself is delegated to html5ever through `scraper`; this module
//! only copies the parsed tree into the arena. HTML5 parsing recovers from
//! any input, so there is no error path.

use scraper::{Html, Node as HtmlNode};

use crate::arena::{Document, DocumentBuilder};
use crate::types::{Attribute, Node, NodeId};

impl Document {
    /// Parse a full HTML document (html/head/body are implied when missing)
    pub fn parse_html(html: &str) -> Document {
        let parsed = Html::parse_document(html);
        let mut builder = DocumentBuilder::with_capacity(parsed.tree.nodes().count());

        // (node, parent in arena); children pushed reversed so siblings are
        // appended left to right and arena order follows document order
        let mut stack = vec![(parsed.tree.root(), None::<NodeId>)];

        while let Some((html_node, parent)) = stack.pop() {
            let converted = match html_node.value() {
                HtmlNode::Document | HtmlNode::Fragment => None,
                HtmlNode::Doctype(doctype) => Some(Node::doctype(doctype.name())),
                HtmlNode::Comment(comment) => Some(Node::comment(&**comment)),
                HtmlNode::Text(text) => Some(Node::text(&**text)),
                HtmlNode::Element(element) => {
                    let mut node = Node::element(element.name());
                    // Foreign attributes (`xlink:href` inside <svg>) keep their prefix
                    node.attrs = element
                        .attrs
                        .iter()
                        .map(|(name, value)| Attribute {
                            namespace: name.prefix.as_ref().map(|p| p.to_string()),
                            key: name.local.to_string(),
                            value: value.to_string(),
                        })
                        .collect();
                    Some(node)
                }
                _ => continue,
            };

            let parent = parent.unwrap_or_else(|| builder.root());
            let id = match converted {
                None => builder.root(),
                Some(node) => match builder.append(parent, node) {
                    Ok(id) => id,
                    Err(err) => {
                        tracing::warn!(%err, "skipping unlinkable node");
                        continue;
                    }
                },
            };

            let children: Vec<_> = html_node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        let doc = builder.build();
        tracing::debug!(nodes = doc.len(), "parsed HTML document");
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeType;

    #[test]
    fn test_parse_implies_structure() {
        let doc = Document::parse_html("<ul><li>1st</li><li>2nd</li></ul>");

        let tags: Vec<&str> = doc.iter().filter_map(|n| n.tag_name()).collect();
        assert_eq!(tags, vec!["html", "head", "body", "ul", "li", "li"]);

        let texts: Vec<&str> = doc
            .iter()
            .filter(|n| n.node_type == NodeType::Text)
            .map(|n| n.data.as_str())
            .collect();
        assert_eq!(texts, vec!["1st", "2nd"]);
    }

    #[test]
    fn test_parse_keeps_attributes_and_comments() {
        let doc = Document::parse_html(
            r#"<!DOCTYPE html><div id="1" class="a b"><!-- note --></div>"#,
        );

        let root = doc.get(doc.root_id()).unwrap();
        assert_eq!(root.node_type, NodeType::Document);
        let doctype = doc.get(root.first_child.unwrap()).unwrap();
        assert_eq!(doctype.node_type, NodeType::Doctype);
        assert_eq!(doctype.data, "html");

        let div = doc.iter().find(|n| n.is_tag("div")).unwrap();
        assert_eq!(div.attr().id(), Some("1"));
        assert_eq!(div.attr().class_list(), Some(vec!["a", "b"]));

        let comment = doc.get(div.first_child.unwrap()).unwrap();
        assert_eq!(comment.node_type, NodeType::Comment);
        assert_eq!(comment.data, " note ");
    }

    #[test]
    fn test_parse_keeps_attribute_prefix() {
        let doc = Document::parse_html(
            r##"<svg><use xlink:href="#icon" class="i"></use></svg>"##,
        );

        let used = doc.iter().find(|n| n.is_tag("use")).unwrap();
        let href = used.attrs.iter().find(|a| a.key == "href").unwrap();
        assert_eq!(href.namespace.as_deref(), Some("xlink"));
        assert_eq!(href.value, "#icon");

        let class = used.attrs.iter().find(|a| a.key == "class").unwrap();
        assert_eq!(class.namespace, None);
        assert_eq!(used.attr().val("href"), Some("#icon"));
    }
}
