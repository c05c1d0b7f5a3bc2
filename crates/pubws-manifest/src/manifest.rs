//! Manifest handle - loading, saving, and document access
//!
//! A [`Pubspec`] binds one on-disk manifest to an in-memory
//! format-preserving document. The file's full text is read once at
//! construction, all mutation goes through the document editor, and
//! [`Pubspec::save`] flushes the result with an atomic write. Nothing is
//! written when no edit changed the document.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use pubws_editor::{KeyPath, YamlDocument};

use crate::errors::ManifestError;

/// Conventional manifest file name.
pub const MANIFEST_FILE: &str = "pubspec.yaml";

/// Absolute form of `path`: canonical when it exists on disk, otherwise
/// resolved lexically against the current directory. Paths in different
/// spellings (relative vs absolute, `..` segments, symlinks) normalize
/// to comparable values.
pub(crate) fn absolute_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// One manifest document bound to its on-disk location.
pub struct Pubspec {
    path: PathBuf,
    doc: YamlDocument,
}

impl Pubspec {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        debug!("Loading manifest from: {:?}", path);
        let content = fs::read_to_string(path)?;
        let doc = YamlDocument::parse(content)?;
        Ok(Pubspec {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Build a manifest from text already in memory, bound to `path` for
    /// diagnostics and relative-path computation.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Result<Self, ManifestError> {
        Ok(Pubspec {
            path: path.into(),
            doc: YamlDocument::parse(text)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The declared package name.
    pub fn name(&self) -> Result<&str, ManifestError> {
        self.doc
            .get_scalar(&KeyPath::root().key("name"))
            .ok_or_else(|| ManifestError::MissingName(self.path.clone()))
    }

    pub fn doc(&self) -> &YamlDocument {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut YamlDocument {
        &mut self.doc
    }

    /// Whether any edit changed the document since it was loaded.
    pub fn is_modified(&self) -> bool {
        self.doc.is_modified()
    }

    /// Flush the document to disk with an atomic write (temp file then
    /// rename). Returns `false` without touching the file when nothing
    /// changed.
    pub fn save(&self) -> Result<bool, ManifestError> {
        if !self.doc.is_modified() {
            debug!("Manifest unchanged, skipping write: {:?}", self.path);
            return Ok(false);
        }

        let temp_path = self.path.with_extension("yaml.tmp");
        {
            let file = fs::File::create(&temp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(self.doc.text().as_bytes())?;
            writer.flush()?;
        }
        fs::rename(&temp_path, &self.path)?;

        info!("Manifest written: {:?}", self.path);
        Ok(true)
    }
}
