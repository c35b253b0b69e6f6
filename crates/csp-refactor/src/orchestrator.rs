//! Refactor pipeline
//!
//! parse -> style blocks -> style attributes -> script blocks -> event
//! attributes -> reference injection -> serialize. Strictly linear; every run
//! owns its document and context.

use std::path::Path;

use csp_dom::{Document, NodeId};
use csp_html::{HtmlParser, HtmlSerializer};

use crate::extract::{
    EventAttributeExtractor, Extractor, ScriptBlockExtractor, StyleAttributeExtractor,
    StyleBlockExtractor,
};
use crate::{ExtractionContext, RefactorConfig, RefactorResult};

/// Pipeline position of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefactorStage {
    Parsed,
    StylesExtracted,
    ScriptsExtracted,
    ReferencesInjected,
    Serialized,
}

impl RefactorStage {
    /// The following stage; `Serialized` is terminal
    pub fn next(self) -> Self {
        match self {
            Self::Parsed => Self::StylesExtracted,
            Self::StylesExtracted => Self::ScriptsExtracted,
            Self::ScriptsExtracted => Self::ReferencesInjected,
            Self::ReferencesInjected | Self::Serialized => Self::Serialized,
        }
    }
}

/// Runs the extraction stages against one document at a time
#[derive(Debug, Clone, Default)]
pub struct Refactorer {
    config: RefactorConfig,
}

impl Refactorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RefactorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RefactorConfig {
        &self.config
    }

    /// Refactor one document. Parsing is lenient, so this never fails.
    pub fn refactor(&self, html: &str, original_filename: &str) -> RefactorResult {
        let span = tracing::info_span!("refactor", file = original_filename);
        let _enter = span.enter();

        let mut document = HtmlParser::new().parse_named(html, original_filename);
        let mut ctx = ExtractionContext::for_document(&document);
        let mut stage = RefactorStage::Parsed;

        run_stage(&StyleBlockExtractor, &mut document, &mut ctx);
        run_stage(&StyleAttributeExtractor, &mut document, &mut ctx);
        stage = advance(stage);

        run_stage(&ScriptBlockExtractor, &mut document, &mut ctx);
        run_stage(&EventAttributeExtractor, &mut document, &mut ctx);
        commit_listeners(&mut ctx);
        stage = advance(stage);

        inject_references(&mut document, &mut ctx, &basename(original_filename));
        stage = advance(stage);

        let serializer = HtmlSerializer {
            pretty_print: self.config.pretty_print,
            indent: self.config.indent.clone(),
        };
        let html = serializer.serialize_document(&document);
        advance(stage);

        tracing::info!(
            changes = ctx.change_log.len(),
            css_bytes = ctx.css.as_str().len(),
            js_bytes = ctx.js.as_str().len(),
            "Refactored {}",
            original_filename
        );

        RefactorResult::new(
            html,
            ctx.css.into_string(),
            ctx.js.into_string(),
            ctx.change_log.into_lines(),
        )
    }
}

fn run_stage(extractor: &dyn Extractor, document: &mut Document, ctx: &mut ExtractionContext) {
    let before = ctx.change_log.len();
    extractor.extract(document, ctx);
    tracing::debug!(
        "Stage {} logged {} changes",
        extractor.name(),
        ctx.change_log.len() - before
    );
}

fn advance(stage: RefactorStage) -> RefactorStage {
    let next = stage.next();
    tracing::trace!(from = ?stage, to = ?next, "stage transition");
    next
}

/// The listener wrapper joins the JS artifact only when the run produced some JS
fn commit_listeners(ctx: &mut ExtractionContext) {
    if ctx.js.is_empty() && ctx.listeners.registrations() == 0 {
        return;
    }
    let script = ctx.listeners.render();
    ctx.js.push_chunk(&script);
}

/// Link the extracted artifacts from the cleaned document
fn inject_references(document: &mut Document, ctx: &mut ExtractionContext, basename: &str) {
    if !ctx.css.is_empty() {
        let css_file = format!("{basename}.css");
        let head = first_valid(&[document.head(), document.document_element()]);
        let tree = document.tree_mut();
        let link = tree.create_element("link");
        tree.set_attr(link, "rel", "stylesheet");
        tree.set_attr(link, "href", &css_file);
        tree.append_child(head, link);
        ctx.change_log
            .success(format!("Added <link> to new file: {css_file}"));
    }

    if !ctx.js.is_empty() {
        let js_file = format!("{basename}.js");
        let body = first_valid(&[document.body(), document.document_element()]);
        let tree = document.tree_mut();
        let script = tree.create_element("script");
        tree.set_attr(script, "src", &js_file);
        tree.set_attr(script, "defer", "");
        tree.append_child(body, script);
        ctx.change_log
            .success(format!("Added <script> tag for new file: {js_file}"));
    }
}

fn first_valid(candidates: &[NodeId]) -> NodeId {
    candidates
        .iter()
        .copied()
        .find(|id| id.is_valid())
        .unwrap_or(NodeId::ROOT)
}

/// Used when a file name has nothing before its extension
pub const FALLBACK_BASENAME: &str = "document";

/// File name without directories and without its final extension
pub fn basename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename);
    let stem = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => {
            tracing::warn!("File name {:?} has no extension", filename);
            name
        }
    };

    if stem.is_empty() {
        tracing::warn!("File name {:?} has an empty stem, using {:?}", filename, FALLBACK_BASENAME);
        return FALLBACK_BASENAME.to_string();
    }
    stem.to_string()
}
