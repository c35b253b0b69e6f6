//! Inline event handler extraction
//!
//! Each recognized `on*` attribute becomes an `addEventListener` registration
//! inside a single `DOMContentLoaded` wrapper. `onload` on `<body>` is the one
//! exception: the wrapper already runs after the document is parsed, so the
//! handler is invoked directly.

use std::collections::HashMap;
use std::fmt::Write as _;

use csp_dom::{Document, NodeId};

use super::Extractor;
use crate::ExtractionContext;

/// Recognized inline event attributes, in processing order
pub const EVENT_ATTRIBUTES: [&str; 17] = [
    "onclick", "onmousedown", "onmouseup", "onmouseover", "onmouseout",
    "onmousemove", "onkeydown", "onkeyup", "onkeypress", "onload", "onunload",
    "onfocus", "onblur", "onsubmit", "onreset", "onchange", "onselect",
];

const HEADER: &str = "// --- Auto-generated Event Listeners ---";
const PLACEHOLDER: &str = "    // No inline event listeners found to refactor.\n";

/// Generated listener code, rendered inside the content-loaded wrapper
#[derive(Debug, Clone, Default)]
pub struct ListenerScript {
    body: String,
    registrations: usize,
}

impl ListenerScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers translated (body.onload included)
    pub fn registrations(&self) -> usize {
        self.registrations
    }

    fn push_listener(&mut self, element_id: &str, attr: &str, script: &str) {
        let id = js_string(element_id);
        let event = js_string(&attr[2..]);
        let statement = as_statement(script);
        let _ = write!(
            self.body,
            "    {{\n\
             \x20       const el = document.getElementById({id});\n\
             \x20       if (el) {{\n\
             \x20           el.addEventListener({event}, function (event) {{\n\
             \x20               try {{\n\
             \x20                   {statement}\n\
             \x20               }} catch (e) {{\n\
             \x20                   console.error('Error in legacy {attr} handler: ', e);\n\
             \x20               }}\n\
             \x20           }});\n\
             \x20       }}\n\
             \x20   }}\n\n"
        );
        self.registrations += 1;
    }

    fn push_immediate(&mut self, script: &str) {
        let statement = as_statement(script);
        let _ = write!(
            self.body,
            "    // Replaced body.onload\n\
             \x20   try {{\n\
             \x20       {statement}\n\
             \x20   }} catch (e) {{\n\
             \x20       console.error('Error running legacy onload function: ', e);\n\
             \x20   }}\n\n"
        );
        self.registrations += 1;
    }

    /// The full wrapper; contains a placeholder comment when nothing was translated
    pub fn render(&self) -> String {
        let body = if self.registrations == 0 {
            PLACEHOLDER
        } else {
            self.body.as_str()
        };
        format!("{HEADER}\ndocument.addEventListener('DOMContentLoaded', () => {{\n{body}}});\n")
    }
}

/// Translates inline event attributes into listener registrations
#[derive(Debug, Clone, Copy, Default)]
pub struct EventAttributeExtractor;

impl Extractor for EventAttributeExtractor {
    fn name(&self) -> &'static str {
        "event-attributes"
    }

    fn extract(&self, document: &mut Document, ctx: &mut ExtractionContext) {
        let mut ids = IdIndex::build(document);
        let body = document.body();

        for attr in EVENT_ATTRIBUTES {
            for node in document.tree().elements_with_attr(attr) {
                let Some(script) = document.tree_mut().remove_attr(node, attr) else {
                    continue;
                };
                let element_id = resolve_id(document, ctx, &mut ids, node);

                if attr == "onload" && node == body {
                    ctx.listeners.push_immediate(&script);
                    ctx.change_log
                        .success("Replaced [body.onload] with 'DOMContentLoaded' listener.");
                } else {
                    ctx.listeners.push_listener(&element_id, attr, &script);
                    let tag = document.tree().tag_name(node).unwrap_or_default();
                    ctx.change_log
                        .success(format!("Replaced [{attr}] on <{tag}> with event listener."));
                }
            }
        }

        if ctx.listeners.registrations() == 0 {
            ctx.change_log
                .info("No inline event attributes (e.g., onclick) found.");
        }
        tracing::debug!("{} inline handlers translated", ctx.listeners.registrations());
    }
}

/// Document-wide id -> element count, kept current as ids are assigned
struct IdIndex {
    counts: HashMap<String, usize>,
}

impl IdIndex {
    fn build(document: &Document) -> Self {
        Self {
            counts: document.id_counts(),
        }
    }

    fn is_unique(&self, id: &str) -> bool {
        self.counts.get(id) == Some(&1)
    }

    fn reassign(&mut self, old: Option<&str>, new: &str) {
        if let Some(old) = old {
            if let Some(count) = self.counts.get_mut(old) {
                *count = count.saturating_sub(1);
            }
        }
        *self.counts.entry(new.to_string()).or_insert(0) += 1;
    }
}

/// Keep an element's id when it is non-empty and unique, otherwise assign a fresh one
fn resolve_id(
    document: &mut Document,
    ctx: &mut ExtractionContext,
    ids: &mut IdIndex,
    node: NodeId,
) -> String {
    let existing = document.tree().attr(node, "id").map(str::to_string);
    if let Some(id) = existing.as_deref() {
        if !id.is_empty() && ids.is_unique(id) {
            return id.to_string();
        }
    }

    let id = ctx.synthesize_id();
    document.tree_mut().set_attr(node, "id", &id);
    ids.reassign(existing.as_deref(), &id);
    id
}

/// Handler text as a single terminated statement
fn as_statement(script: &str) -> String {
    let script = script.trim();
    if script.is_empty() || script.ends_with(';') || script.ends_with('}') {
        script.to_string()
    } else {
        format!("{script};")
    }
}

/// Single-quoted JS string literal
fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
