//! Output packaging
//!
//! Turns a [`RefactorResult`] into named files: `{base}_clean.html`,
//! `{base}.css` and `{base}.js`. Empty artifacts are left out entirely.
//! The bundle is written as `{base}_refactored.zip`, or unpacked into a
//! `{base}_refactored/` directory.

use std::fs;
use std::io::{self, Cursor, Write as _};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::RefactorResult;

/// Packaging errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to build archive: {0}")]
    Archive(#[from] ZipError),
}

/// One named output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub content: String,
}

/// The non-empty artifacts of one run
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    basename: String,
    artifacts: Vec<Artifact>,
}

impl ArtifactBundle {
    pub fn from_result(basename: &str, result: &RefactorResult) -> Self {
        let candidates = [
            (format!("{basename}_clean.html"), result.html()),
            (format!("{basename}.css"), result.css()),
            (format!("{basename}.js"), result.js()),
        ];

        let artifacts = candidates
            .into_iter()
            .filter(|(_, content)| !content.is_empty())
            .map(|(filename, content)| Artifact {
                filename,
                content: content.to_string(),
            })
            .collect();

        Self {
            basename: basename.to_string(),
            artifacts,
        }
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Name of the directory the bundle is unpacked into
    pub fn directory_name(&self) -> String {
        format!("{}_refactored", self.basename)
    }

    /// Name of the archive the bundle is packed into
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.directory_name())
    }

    /// The bundle as an in-memory zip archive, one deflated entry per artifact
    pub fn zip_bytes(&self) -> Result<Vec<u8>, PackageError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for artifact in &self.artifacts {
            writer.start_file(artifact.filename.as_str(), options)?;
            writer
                .write_all(artifact.content.as_bytes())
                .map_err(ZipError::from)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write `{out_dir}/{base}_refactored.zip`, returning its path
    pub fn write_zip(&self, out_dir: &Path) -> Result<PathBuf, PackageError> {
        create_dir(out_dir)?;
        let path = out_dir.join(self.archive_name());
        let bytes = self.zip_bytes()?;
        fs::write(&path, &bytes).map_err(|source| PackageError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(
            entries = self.artifacts.len(),
            bytes = bytes.len(),
            "Wrote {}",
            path.display()
        );
        Ok(path)
    }

    /// Write every artifact into `{out_dir}/{base}_refactored/`, returning that directory
    pub fn write_to_dir(&self, out_dir: &Path) -> Result<PathBuf, PackageError> {
        let dir = out_dir.join(self.directory_name());
        create_dir(&dir)?;

        for artifact in &self.artifacts {
            let path = dir.join(&artifact.filename);
            fs::write(&path, &artifact.content)
                .map_err(|source| PackageError::Write { path: path.clone(), source })?;
            tracing::debug!("Wrote {}", path.display());
        }

        Ok(dir)
    }
}

fn create_dir(dir: &Path) -> Result<(), PackageError> {
    fs::create_dir_all(dir).map_err(|source| PackageError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn result(css: &str, js: &str) -> RefactorResult {
        RefactorResult::new("<html></html>".into(), css.into(), js.into(), vec!["INFO: x".into()])
    }

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_empty_artifacts_omitted() {
        let bundle = ArtifactBundle::from_result("login", &result("", ""));
        let names: Vec<_> = bundle.artifacts().iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["login_clean.html"]);
    }

    #[test]
    fn test_all_artifacts_named() {
        let bundle = ArtifactBundle::from_result("login", &result(".a{}", "go();"));
        let names: Vec<_> = bundle.artifacts().iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["login_clean.html", "login.css", "login.js"]);
        assert_eq!(bundle.directory_name(), "login_refactored");
        assert_eq!(bundle.archive_name(), "login_refactored.zip");
    }

    #[test]
    fn test_archive_leaves_out_empty_entries() {
        let css_only = ArtifactBundle::from_result("page", &result(".a{}", ""));
        assert_eq!(
            entry_names(css_only.zip_bytes().unwrap()),
            vec!["page.css", "page_clean.html"]
        );

        let js_only = ArtifactBundle::from_result("page", &result("", "go();"));
        assert_eq!(
            entry_names(js_only.zip_bytes().unwrap()),
            vec!["page.js", "page_clean.html"]
        );
    }

    #[test]
    fn test_write_zip() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let bundle = ArtifactBundle::from_result("page", &result(".a{}", "go();"));

        let path = bundle.write_zip(&out).unwrap();
        assert_eq!(path, out.join("page_refactored.zip"));

        let mut archive = zip::ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
        let mut js = String::new();
        archive.by_name("page.js").unwrap().read_to_string(&mut js).unwrap();
        assert_eq!(js, "go();");
    }

    #[test]
    fn test_write_to_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = ArtifactBundle::from_result("page", &result(".a{}", ""));

        let dir = bundle.write_to_dir(tmp.path()).unwrap();
        assert_eq!(dir, tmp.path().join("page_refactored"));
        assert_eq!(fs::read_to_string(dir.join("page.css")).unwrap(), ".a{}");
        assert!(dir.join("page_clean.html").exists());
        assert!(!dir.join("page.js").exists());
    }
}
