//! Audit trail of refactor runs
//!
//! Every run leaves one JSON record in the audit directory, named after the
//! record id. Records are never overwritten; the history lists them newest
//! first.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use csp_refactor::{RefactorResult, basename};
use serde::{Deserialize, Serialize};

use crate::upload::Upload;

const NO_CHANGES: &str = "No changes were logged.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique within an audit directory; also the record's file stem
    pub id: String,
    pub original_filename: String,
    pub upload_timestamp: DateTime<Utc>,
    pub file_size: u64,
    /// `SUCCESS` or `FAILED: <reason>`
    pub status: String,
    pub refactored_html: Option<String>,
    pub refactored_css: Option<String>,
    pub refactored_js: Option<String>,
    /// Change log lines joined with `\n`
    pub change_log: Option<String>,
}

impl AuditRecord {
    pub fn success(upload: &Upload, result: &RefactorResult) -> Self {
        let now = Utc::now();
        Self {
            id: record_id(now, &upload.filename),
            original_filename: upload.filename.clone(),
            upload_timestamp: now,
            file_size: upload.size,
            status: "SUCCESS".to_string(),
            refactored_html: Some(result.html().to_string()),
            refactored_css: Some(result.css().to_string()),
            refactored_js: Some(result.js().to_string()),
            change_log: Some(result.change_log().join("\n")),
        }
    }

    pub fn failed(upload: &Upload, reason: &str) -> Self {
        let now = Utc::now();
        Self {
            id: record_id(now, &upload.filename),
            original_filename: upload.filename.clone(),
            upload_timestamp: now,
            file_size: upload.size,
            status: format!("FAILED: {reason}"),
            refactored_html: None,
            refactored_css: None,
            refactored_js: None,
            change_log: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "SUCCESS"
    }

    /// The stored change log split back into lines
    pub fn change_log_entries(&self) -> Vec<&str> {
        match self.change_log.as_deref() {
            Some(log) if !log.is_empty() => log.split('\n').collect(),
            _ => vec![NO_CHANGES],
        }
    }

    pub fn read_json(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading audit record {}", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn record_id(timestamp: DateTime<Utc>, filename: &str) -> String {
    format!("{}-{}", timestamp.format("%Y%m%dT%H%M%S%6fZ"), basename(filename))
}

/// A directory of audit records
#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store a record under a fresh file name; a clashing id gets a numeric suffix
    pub fn append(&self, mut record: AuditRecord) -> anyhow::Result<(AuditRecord, PathBuf)> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating audit directory {}", self.dir.display()))?;

        let base_id = record.id.clone();
        let mut attempt = 1;
        loop {
            let path = self.dir.join(format!("{}.json", record.id));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let json = serde_json::to_string_pretty(&record)?;
                    file.write_all(json.as_bytes())
                        .with_context(|| format!("writing audit record {}", path.display()))?;
                    tracing::debug!("Stored audit record {}", record.id);
                    return Ok((record, path));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    attempt += 1;
                    record.id = format!("{base_id}-{attempt}");
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("creating {}", path.display()));
                }
            }
        }
    }

    /// Every readable record, newest upload first
    pub fn list(&self) -> anyhow::Result<Vec<AuditRecord>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading audit directory {}", self.dir.display()));
            }
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match AuditRecord::read_json(&path) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!("Skipping {}: {:#}", path.display(), err),
            }
        }

        records.sort_by(|a, b| {
            b.upload_timestamp
                .cmp(&a.upload_timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    /// Look up one record by id
    pub fn get(&self, id: &str) -> anyhow::Result<Option<AuditRecord>> {
        let path = self.dir.join(format!("{id}.json"));
        if !path.is_file() {
            return Ok(None);
        }
        AuditRecord::read_json(&path).map(Some)
    }
}
