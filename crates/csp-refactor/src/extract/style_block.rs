//! `<style>` element extraction

use csp_dom::Document;

use super::Extractor;
use crate::ExtractionContext;

const MARKER: &str = "/* --- Extracted from <style> tag --- */";

/// Moves every `<style>` element's text into the CSS artifact
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleBlockExtractor;

impl Extractor for StyleBlockExtractor {
    fn name(&self) -> &'static str {
        "style-blocks"
    }

    fn extract(&self, document: &mut Document, ctx: &mut ExtractionContext) {
        let styles = document.tree().elements_by_tag("style");
        if styles.is_empty() {
            ctx.change_log.info("No <style> tags found.");
            return;
        }

        for node in styles {
            let content = document.tree().text_content(node);
            ctx.css.push_chunk(&format!("{MARKER}\n{content}"));
            document.tree_mut().detach(node);
            ctx.change_log.success("Extracted <style> tag to CSS file.");
        }
    }
}
