//! Inline `<script>` extraction

use csp_dom::Document;

use super::Extractor;
use crate::ExtractionContext;

const MARKER: &str = "// --- Extracted from inline <script> tag ---";

/// Moves inline script bodies into the JS artifact; `<script src>` is left in place
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptBlockExtractor;

impl Extractor for ScriptBlockExtractor {
    fn name(&self) -> &'static str {
        "script-blocks"
    }

    fn extract(&self, document: &mut Document, ctx: &mut ExtractionContext) {
        let scripts = document.tree().elements_by_tag("script");
        if scripts.is_empty() {
            ctx.change_log.info("No <script> tags found.");
            return;
        }

        for node in scripts {
            if let Some(src) = document.tree().attr(node, "src") {
                ctx.change_log
                    .info(format!("Kept external <script src=\"{src}\">."));
                continue;
            }

            let body = document.tree().text_content(node);
            if body.trim().is_empty() {
                continue;
            }

            ctx.js.push_chunk(&format!("{MARKER}\n{body}"));
            document.tree_mut().detach(node);
            ctx.change_log
                .success("Extracted inline <script> block to JS file.");
        }
    }
}
