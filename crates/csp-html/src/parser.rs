//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM.
//! Parsing is lenient: any input, however malformed, yields a document
//! with html, head and body elements.

use csp_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_named(html, "about:blank")
    }

    /// Parse HTML, recording the name (usually the uploaded file name) on the document
    pub fn parse_named(&self, html: &str, name: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", name);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(name);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Convert an RcDom node into the arena below `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                let id = tree.create_doctype(name, public_id, system_id);
                tree.append_child(parent, id);
            }
            RcNodeData::Text { contents } => {
                let id = tree.create_text(&contents.borrow());
                tree.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let id = tree.create_element(&name.local);

                for attr in attrs.borrow().iter() {
                    let attr_name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    tree.set_attr(id, &attr_name, &attr.value);
                }
                tree.append_child(parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }

                // <template> keeps its content in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id);
                    }
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {
                // Not produced for text/html input
            }
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html);

        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert!(doc.head().is_valid());
        assert!(doc.body().is_valid());
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::new().parse(html);

        // Even fragments get wrapped in html/head/body by html5ever
        assert!(doc.body().is_valid());
        assert_eq!(doc.tree().elements_by_tag("span").len(), 1);
    }

    #[test]
    fn test_attributes_preserved_in_order() {
        let doc = HtmlParser::new().parse(r#"<div id="a" style="color:red" onclick="go()"></div>"#);
        let div = doc.tree().elements_by_tag("div")[0];

        let elem = doc.tree().get(div).and_then(|n| n.as_element()).unwrap();
        let names: Vec<_> = elem.attrs.iter().map(|a| doc.tree().resolve(a.name)).collect();
        assert_eq!(names, vec!["id", "style", "onclick"]);
        assert_eq!(doc.tree().attr(div, "onclick"), Some("go()"));
    }

    #[test]
    fn test_script_body_is_single_text() {
        let doc = HtmlParser::new().parse("<script>if (a < b) { go(); }</script>");
        let script = doc.tree().elements_by_tag("script")[0];
        assert_eq!(doc.tree().text_content(script), "if (a < b) { go(); }");
    }

    #[test]
    fn test_named_document() {
        let doc = HtmlParser::new().parse_named("<p>x</p>", "login.html");
        assert_eq!(doc.name(), "login.html");
    }

    #[test]
    fn test_whitespace_text_kept() {
        let doc = HtmlParser::new().parse("<textarea>   </textarea>");
        let textarea = doc.tree().elements_by_tag("textarea")[0];
        assert_eq!(doc.tree().text_content(textarea), "   ");
    }
}
