//! Change log - ordered audit trail of one refactor run

use std::fmt;

/// Severity tag printed in front of each entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeLevel {
    /// A stage looked and found nothing (or kept something as-is)
    Info,
    /// A transformation was performed
    Success,
}

impl ChangeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
        }
    }
}

/// One change log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub level: ChangeLevel,
    pub message: String,
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level.as_str(), self.message)
    }
}

/// Append-only list of entries; never reordered or deduplicated
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ChangeLevel::Info, message.into());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ChangeLevel::Success, message.into());
    }

    fn push(&mut self, level: ChangeLevel, message: String) {
        tracing::trace!(level = level.as_str(), "{}", message);
        self.entries.push(ChangeEntry { level, message });
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every entry as `LEVEL: message`, in order
    pub fn into_lines(self) -> Vec<String> {
        self.entries.into_iter().map(|e| e.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_order_and_duplicates() {
        let mut log = ChangeLog::new();
        log.info("nothing here");
        log.success("did it");
        log.success("did it");

        assert_eq!(
            log.into_lines(),
            vec!["INFO: nothing here", "SUCCESS: did it", "SUCCESS: did it"]
        );
    }
}
