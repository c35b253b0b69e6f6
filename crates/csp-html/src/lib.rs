//! CSP HTML Parser
//!
//! Lenient HTML5 parser built on html5ever.
//! Parses HTML into the arena DOM and serializes it back.

mod parser;
pub mod serializer;

pub use csp_dom::{Document, DomTree, Node, NodeId};
pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Parse an HTML string, recording the name it was loaded under
pub fn parse_named(html: &str, name: &str) -> Document {
    HtmlParser::new().parse_named(html, name)
}
