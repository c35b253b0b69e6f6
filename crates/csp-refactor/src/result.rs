//! Refactor output record

use serde::{Deserialize, Serialize};

/// The cleaned document, the two extracted artifacts and the change log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefactorResult {
    html: String,
    css: String,
    js: String,
    change_log: Vec<String>,
}

impl RefactorResult {
    pub(crate) fn new(html: String, css: String, js: String, change_log: Vec<String>) -> Self {
        Self {
            html,
            css,
            js,
            change_log,
        }
    }

    /// Cleaned, serialized HTML document
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Extracted stylesheet; empty when nothing was extracted
    pub fn css(&self) -> &str {
        &self.css
    }

    /// Extracted script; empty when nothing was extracted
    pub fn js(&self) -> &str {
        &self.js
    }

    /// Every decision made during the run, in processing order
    pub fn change_log(&self) -> &[String] {
        &self.change_log
    }

    pub fn into_parts(self) -> (String, String, String, Vec<String>) {
        (self.html, self.css, self.js, self.change_log)
    }
}
