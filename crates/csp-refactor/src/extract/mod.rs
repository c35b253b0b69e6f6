//! Extraction stages
//!
//! Each stage mutates the shared document in place and records what it did
//! in the [`ExtractionContext`]. The orchestrator runs them in a fixed order.

mod event_attr;
mod script_block;
mod style_attr;
mod style_block;

pub use event_attr::{EVENT_ATTRIBUTES, EventAttributeExtractor, ListenerScript};
pub use script_block::ScriptBlockExtractor;
pub use style_attr::StyleAttributeExtractor;
pub use style_block::StyleBlockExtractor;

use csp_dom::Document;

use crate::ExtractionContext;

/// A single pass over the document
pub trait Extractor {
    /// Stage name for tracing output
    fn name(&self) -> &'static str;

    /// Run the stage
    fn extract(&self, document: &mut Document, ctx: &mut ExtractionContext);
}

#[cfg(test)]
pub(crate) mod test_support {
    use csp_dom::Document;

    use super::Extractor;
    use crate::ExtractionContext;

    /// Parse `html` and run one stage on it
    pub fn run(extractor: &dyn Extractor, html: &str) -> (Document, ExtractionContext) {
        let mut doc = csp_html::parse(html);
        let mut ctx = ExtractionContext::for_document(&doc);
        extractor.extract(&mut doc, &mut ctx);
        (doc, ctx)
    }

    pub fn lines(ctx: &ExtractionContext) -> Vec<String> {
        ctx.change_log.clone().into_lines()
    }

    pub fn compact(doc: &Document) -> String {
        csp_html::HtmlSerializer::new().serialize_document(doc)
    }
}
