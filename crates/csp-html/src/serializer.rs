//! HTML Serialization (outerHTML)
//!
//! Serializes DOM nodes back to HTML strings.
//!
//! Key features:
//! - Optional pretty printing with configurable indentation
//! - Proper HTML escaping
//! - Void element handling
//! - Raw text elements (script, style) emitted verbatim
//!
//! Pretty printing only moves whitespace where it cannot change rendering:
//! children go one per line when they are all block-level nodes separated by
//! whitespace-only text. Anything holding text or phrasing content is written
//! exactly as parsed.

use csp_dom::{Document, DomTree, Node, NodeData, NodeId};

/// HTML serializer
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    /// Whether to format output with indentation
    pub pretty_print: bool,
    /// Indentation string
    pub indent: String,
}

/// Void elements (self-closing, no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Elements whose content is never re-indented
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Phrasing elements; whitespace around them is significant
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "audio", "b", "bdi", "bdo", "big", "br", "button",
    "canvas", "cite", "code", "data", "del", "dfn", "em", "embed", "font", "i",
    "iframe", "img", "input", "ins", "kbd", "label", "map", "mark", "math",
    "meter", "object", "output", "picture", "progress", "q", "ruby", "s", "samp",
    "select", "small", "span", "strike", "strong", "sub", "sup", "svg",
    "textarea", "time", "tt", "u", "var", "video", "wbr",
];

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            indent: "  ".to_string(),
        }
    }

    /// Use a custom indentation unit (only relevant when pretty printing)
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Serialize a whole document, doctype included
    pub fn serialize_document(&self, document: &Document) -> String {
        let tree = document.tree();
        let mut output = self.serialize_outer(tree, tree.root());
        if self.pretty_print && !output.is_empty() {
            output.push('\n');
        }
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output, 0, self.pretty_print);
        output
    }

    /// Serialize a node and its descendants
    fn serialize_node(
        &self,
        tree: &DomTree,
        node_id: NodeId,
        output: &mut String,
        depth: usize,
        pretty: bool,
    ) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                self.serialize_children(tree, node_id, output, depth, pretty);
            }
            NodeData::Element(elem) => {
                let tag = tree.resolve(elem.name);

                output.push('<');
                output.push_str(tag);
                for attr in &elem.attrs {
                    output.push(' ');
                    output.push_str(tree.resolve(attr.name));
                    if !attr.value.is_empty() {
                        output.push_str("=\"");
                        escape_attribute(&attr.value, output);
                        output.push('"');
                    }
                }

                if VOID_ELEMENTS.contains(&tag) {
                    output.push_str(" />");
                    return;
                }
                output.push('>');

                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    self.serialize_children_raw(tree, node_id, output);
                } else if PREFORMATTED_ELEMENTS.contains(&tag) {
                    // The parser drops one newline right after the start tag
                    if first_text(tree, node_id).is_some_and(|t| t.starts_with('\n')) {
                        output.push('\n');
                    }
                    self.serialize_children(tree, node_id, output, depth + 1, false);
                } else {
                    let block = pretty && lays_out_as_block(tree, node_id);
                    self.serialize_children(tree, node_id, output, depth + 1, pretty);
                    if block {
                        self.break_line(output, depth);
                    }
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => {
                escape_text(&text.content, output);
            }
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(tree.resolve(*name));
                if !public_id.is_empty() {
                    output.push_str(" PUBLIC \"");
                    output.push_str(public_id);
                    output.push('"');
                    if !system_id.is_empty() {
                        output.push_str(" \"");
                        output.push_str(system_id);
                        output.push('"');
                    }
                } else if !system_id.is_empty() {
                    output.push_str(" SYSTEM \"");
                    output.push_str(system_id);
                    output.push('"');
                }
                output.push('>');
            }
        }
    }

    /// Children go one per line in block layout, otherwise they are written as parsed
    fn serialize_children(
        &self,
        tree: &DomTree,
        parent_id: NodeId,
        output: &mut String,
        depth: usize,
        pretty: bool,
    ) {
        let is_document = tree
            .get(parent_id)
            .is_some_and(|n| matches!(n.data, NodeData::Document));
        let block = pretty && (is_document || lays_out_as_block(tree, parent_id));

        for (child_id, child) in tree.children(parent_id) {
            if !block {
                self.serialize_node(tree, child_id, output, depth, false);
                continue;
            }
            // Whitespace between block-level nodes is replaced by the layout
            if child.as_text().is_some() {
                continue;
            }
            self.break_line(output, depth);
            self.serialize_node(tree, child_id, output, depth, pretty);
        }
    }

    fn serialize_children_raw(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (_child_id, child) in tree.children(parent_id) {
            if let Some(text) = child.as_text() {
                output.push_str(text);
            }
        }
    }

    fn break_line(&self, output: &mut String, depth: usize) {
        if !output.is_empty() {
            output.push('\n');
        }
        for _ in 0..depth {
            output.push_str(&self.indent);
        }
    }
}

/// True when every child is a block-level node or whitespace, and at least one is a node
fn lays_out_as_block(tree: &DomTree, node_id: NodeId) -> bool {
    let mut has_node = false;
    for (_, child) in tree.children(node_id) {
        if let Some(text) = child.as_text() {
            if !text.trim().is_empty() {
                return false;
            }
        } else if is_inline(tree, child) {
            return false;
        } else {
            has_node = true;
        }
    }
    has_node
}

fn is_inline(tree: &DomTree, node: &Node) -> bool {
    node.as_element()
        .is_some_and(|elem| INLINE_ELEMENTS.contains(&tree.resolve(elem.name)))
}

fn first_text(tree: &DomTree, node_id: NodeId) -> Option<&str> {
    tree.children(node_id).next().and_then(|(_, child)| child.as_text())
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}
