//! Refactor Configuration

/// Refactor configuration options
#[derive(Debug, Clone)]
pub struct RefactorConfig {
    /// Indent the cleaned HTML for readability
    pub pretty_print: bool,

    /// Indentation unit used when pretty printing
    pub indent: String,
}

impl Default for RefactorConfig {
    fn default() -> Self {
        Self {
            pretty_print: true,
            indent: "  ".to_string(),
        }
    }
}
