//! Extraction context - state shared by the stages of a single run
//!
//! One context is built per document and dropped with it. Nothing here is
//! global, so independent runs can proceed in parallel without coordination.

use std::collections::{HashMap, HashSet};

use csp_dom::Document;

use crate::changelog::ChangeLog;
use crate::extract::ListenerScript;

/// Prefix of classes synthesized for inline styles
pub const CLASS_PREFIX: &str = "csp-auto-class-";

/// Prefix of ids synthesized for elements with event handlers
pub const ID_PREFIX: &str = "csp-auto-id-";

/// Append-only text artifact (CSS or JS); each chunk is followed by a blank line
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    chunks: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chunk(&mut self, chunk: &str) {
        self.text.push_str(chunk);
        if !chunk.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push('\n');
        self.chunks += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Run-scoped extraction state
#[derive(Debug)]
pub struct ExtractionContext {
    /// Next value of the sequence shared by class and id synthesis
    next_sequence: u32,
    /// Trimmed inline style text -> synthesized class
    style_cache: HashMap<String, String>,
    /// Class tokens and ids already present in the source document
    reserved: HashSet<String>,
    pub change_log: ChangeLog,
    pub css: TextBuffer,
    pub js: TextBuffer,
    /// Listener registration code produced by the event stage
    pub listeners: ListenerScript,
}

impl ExtractionContext {
    pub fn new() -> Self {
        Self {
            next_sequence: 1,
            style_cache: HashMap::new(),
            reserved: HashSet::new(),
            change_log: ChangeLog::new(),
            css: TextBuffer::new(),
            js: TextBuffer::new(),
            listeners: ListenerScript::new(),
        }
    }

    /// Context for a freshly parsed document; names it already uses are never synthesized
    pub fn for_document(document: &Document) -> Self {
        let mut ctx = Self::new();
        let tree = document.tree();
        for node in tree.elements_with_attr("id") {
            if let Some(id) = tree.attr(node, "id") {
                ctx.reserved.insert(id.to_string());
            }
        }
        for node in tree.elements_with_attr("class") {
            if let Some(classes) = tree.attr(node, "class") {
                ctx.reserved
                    .extend(classes.split_ascii_whitespace().map(str::to_string));
            }
        }
        ctx
    }

    /// Value the next synthesized name would be built from (before collision skipping)
    pub fn peek_sequence(&self) -> u32 {
        self.next_sequence
    }

    /// Draw the next unused name with the given prefix from the shared sequence.
    /// Numbers whose name already exists in the document are consumed and skipped.
    fn synthesize(&mut self, prefix: &str) -> String {
        loop {
            let n = self.next_sequence;
            self.next_sequence += 1;
            let name = format!("{prefix}{n}");
            if !self.reserved.contains(&name) {
                return name;
            }
            tracing::debug!("Skipping {} (already present in document)", name);
        }
    }

    pub fn synthesize_class(&mut self) -> String {
        self.synthesize(CLASS_PREFIX)
    }

    pub fn synthesize_id(&mut self) -> String {
        self.synthesize(ID_PREFIX)
    }

    /// Class previously synthesized for this exact (trimmed) style text
    pub fn cached_class(&self, style: &str) -> Option<&str> {
        self.style_cache.get(style).map(String::as_str)
    }

    pub fn cache_class(&mut self, style: String, class: String) {
        self.style_cache.insert(style, class);
    }

    /// Number of distinct inline styles seen so far
    pub fn distinct_styles(&self) -> usize {
        self.style_cache.len()
    }
}

impl Default for ExtractionContext {
    fn default() -> Self {
        Self::new()
    }
}
