//! Tree rendering
//!
//! Two consumers of a tree live here:
//! - `render_html`: outer HTML of a node, as a browser would serialize it
//! - `TreePrinter`: indented one-line-per-node debug dump
//!
//! Both take the top node separately from the document so detached copies
//! render their own payload while their children come from the tree.

use std::fmt::Write;

use crate::arena::Document;
use crate::types::{Attribute, Node, NodeType};

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are written verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Outer HTML of `node`
pub fn render_html(doc: &Document, node: &Node) -> String {
    let mut output = String::with_capacity(256);
    render_node(doc, node, false, &mut output);
    output
}

fn render_node(doc: &Document, node: &Node, raw_text: bool, output: &mut String) {
    match node.node_type {
        NodeType::Element => {
            output.push('<');
            output.push_str(&node.data);
            for attr in &node.attrs {
                output.push(' ');
                push_attr_name(attr, output);
                output.push_str("=\"");
                escape_into(&attr.value, true, output);
                output.push('"');
            }
            output.push('>');

            if VOID_ELEMENTS.contains(&node.data.as_str()) {
                return;
            }

            let raw = RAW_TEXT_ELEMENTS.contains(&node.data.as_str());
            render_children(doc, node, raw, output);

            output.push_str("</");
            output.push_str(&node.data);
            output.push('>');
        }
        NodeType::Text if raw_text => output.push_str(&node.data),
        NodeType::Text => escape_into(&node.data, false, output),
        NodeType::Comment => {
            output.push_str("<!--");
            output.push_str(&node.data);
            output.push_str("-->");
        }
        NodeType::Doctype => {
            output.push_str("<!DOCTYPE ");
            output.push_str(&node.data);
            output.push('>');
        }
        NodeType::Document => render_children(doc, node, false, output),
        NodeType::Error => {}
    }
}

fn render_children(doc: &Document, node: &Node, raw_text: bool, output: &mut String) {
    let mut next = node.first_child;
    while let Some(child) = next.and_then(|id| doc.node(id)) {
        render_node(doc, child, raw_text, output);
        next = child.next_sibling;
    }
}

fn push_attr_name(attr: &Attribute, output: &mut String) {
    if let Some(ns) = &attr.namespace {
        output.push_str(ns);
        output.push(':');
    }
    output.push_str(&attr.key);
}

fn escape_into(s: &str, in_attr: bool, output: &mut String) {
    for c in s.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' if in_attr => output.push_str("&quot;"),
            '<' if !in_attr => output.push_str("&lt;"),
            '>' if !in_attr => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}

/// Tree printer configuration
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Print whitespace-only data as `LF,SPCx4` instead of quoting it
    pub compact_spaces: bool,
    /// Omit the ` A:` column for nodes without attributes
    pub trim_empty_attr: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            compact_spaces: true,
            trim_empty_attr: true,
        }
    }
}

/// Debug printer: `T:<type> D:<data> A:[<attrs>]`, two spaces per level
pub struct TreePrinter {
    config: PrinterConfig,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::with_config(PrinterConfig::default())
    }

    pub fn with_config(config: PrinterConfig) -> Self {
        Self { config }
    }

    /// Print the whole document
    pub fn print_document(&self, doc: &Document) -> String {
        match doc.node(doc.root_id()) {
            Some(root) => self.print(doc, root),
            None => String::new(),
        }
    }

    /// Print `top` and its subtree
    pub fn print(&self, doc: &Document, top: &Node) -> String {
        let mut output = String::with_capacity(4096);
        self.print_node(doc, top, 0, &mut output);
        output
    }

    fn print_node(&self, doc: &Document, node: &Node, depth: usize, output: &mut String) {
        let attrs = format_attrs(&node.attrs);

        output.push_str(&"  ".repeat(depth));
        output.push_str("T:");
        output.push_str(node.node_type.label());
        output.push_str(" D:");
        if self.config.compact_spaces && node.data.trim().is_empty() {
            output.push_str(&compact_spaces(&node.data));
        } else {
            output.push('`');
            output.push_str(&node.data);
            output.push('`');
        }
        if !attrs.is_empty() || !self.config.trim_empty_attr {
            output.push_str(" A:");
            output.push_str(&attrs);
        }
        output.push('\n');

        let mut next = node.first_child;
        while let Some(child) = next.and_then(|id| doc.node(id)) {
            self.print_node(doc, child, depth + 1, output);
            next = child.next_sibling;
        }
    }
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// `[ns:key="value" flag]`, empty string for no attributes
fn format_attrs(attrs: &[Attribute]) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let mut output = String::from("[");
    for (i, attr) in attrs.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        push_attr_name(attr, &mut output);
        if !attr.value.is_empty() {
            output.push_str("=\"");
            output.push_str(&attr.value);
            output.push('"');
        }
    }
    output.push(']');
    output
}

/// Name runs of whitespace: `"\n    "` → `LF,SPCx4`
///
/// Input must consist of whitespace only.
fn compact_spaces(s: &str) -> String {
    let mut runs: Vec<(&str, usize)> = Vec::new();

    for c in s.chars() {
        let token = match c {
            '\n' => "LF",
            '\r' => "CR",
            ' ' => "SPC",
            _ => "WS",
        };
        if let Some((last, count)) = runs.last_mut() {
            if *last == token {
                *count += 1;
                continue;
            }
        }
        runs.push((token, 1));
    }

    let mut output = String::new();
    for (i, (token, count)) in runs.into_iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push_str(token);
        if count > 1 {
            let _ = write!(output, "x{count}");
        }
    }
    output
}
