//! CSP Refactor
//!
//! Hoists inline presentation and behavior out of an HTML document so it can
//! be served under a strict Content-Security-Policy:
//!
//! - `<style>` elements and `style="..."` attributes move to a CSS file,
//!   identical inline styles sharing one generated class
//! - inline `<script>` bodies move to a JS file
//! - `onclick`-style attributes become `addEventListener` registrations
//!
//! Every decision is recorded in an ordered change log.
//!
//! # Example
//! ```rust
//! let result = csp_refactor::refactor(
//!     r#"<div style="color:red" onclick="go()">hi</div>"#,
//!     "page.html",
//! );
//! assert!(result.css().contains(".csp-auto-class-1"));
//! assert!(result.js().contains("addEventListener('click'"));
//! assert!(result.html().contains(r#"href="page.css""#));
//! ```

mod changelog;
mod config;
mod context;
pub mod extract;
mod orchestrator;
pub mod package;
mod result;

pub use changelog::{ChangeEntry, ChangeLevel, ChangeLog};
pub use config::RefactorConfig;
pub use context::{CLASS_PREFIX, ExtractionContext, ID_PREFIX, TextBuffer};
pub use orchestrator::{FALLBACK_BASENAME, RefactorStage, Refactorer, basename};
pub use package::{Artifact, ArtifactBundle, PackageError};
pub use result::RefactorResult;

/// Refactor one document with the default configuration
pub fn refactor(html: &str, original_filename: &str) -> RefactorResult {
    Refactorer::new().refactor(html, original_filename)
}
