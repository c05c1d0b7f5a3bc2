//! Unused-dependency scan and prune
//!
//! Collects the package names a Dart package actually imports by
//! scanning its sources for `package:` directives, then removes declared
//! dependencies that never appear. A dependency section emptied by the
//! prune is removed outright; that cleanup is decided here, not by the
//! document editor, which never cascades deletions on its own.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::ManifestError;
use crate::manifest::Pubspec;
use crate::merge::DependencySection;

/// Source roots scanned for imports.
const SOURCE_DIRS: [&str; 4] = ["lib", "bin", "test", "tool"];

fn import_regex() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        let pattern = r#"(?m)^\s*(?:import|export|part)\s+['"]package:([A-Za-z0-9_]+)/"#;
        match Regex::new(pattern) {
            Ok(re) => re,
            Err(_) => unreachable!("import pattern is a valid regex"),
        }
    })
}

/// Package names referenced by the sources under `package_dir`.
pub fn referenced_packages(package_dir: &Path) -> Result<BTreeSet<String>, ManifestError> {
    let mut referenced = BTreeSet::new();
    for source_dir in SOURCE_DIRS {
        let dir = package_dir.join(source_dir);
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&dir).follow_links(false) {
            let entry = entry.map_err(|e| ManifestError::Io(std::io::Error::from(e)))?;
            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|ext| ext.to_str()) != Some("dart")
            {
                continue;
            }
            let content = fs::read_to_string(entry.path())?;
            for capture in import_regex().captures_iter(&content) {
                if let Some(name) = capture.get(1) {
                    referenced.insert(name.as_str().to_string());
                }
            }
        }
    }
    debug!(
        "found {} referenced package(s) under {:?}",
        referenced.len(),
        package_dir
    );
    Ok(referenced)
}

/// One dependency removed by [`prune_unused`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneAction {
    pub section: DependencySection,
    pub name: String,
    /// Whether removing this entry emptied the section and took it away.
    pub section_removed: bool,
}

/// Remove declared dependencies that `referenced` never mentions.
///
/// The package's own name is always kept. Edits stay in memory; the
/// caller saves the manifest.
pub fn prune_unused(
    manifest: &mut Pubspec,
    referenced: &BTreeSet<String>,
) -> Result<Vec<PruneAction>, ManifestError> {
    let own_name = manifest.name().map(ToString::to_string).ok();
    let mut actions = Vec::new();

    for section in DependencySection::ALL {
        let section_path = section.path();
        let Some(entries) = manifest.doc().entries(&section_path)? else {
            continue;
        };
        for (name, _) in entries {
            if referenced.contains(&name) || own_name.as_deref() == Some(name.as_str()) {
                continue;
            }
            let removed = manifest
                .doc_mut()
                .remove(&section_path.clone().key(name.clone()))?;
            if !removed {
                continue;
            }
            // Drop the section once this removal leaves it empty.
            let emptied = manifest
                .doc()
                .entries(&section_path)?
                .is_some_and(|remaining| remaining.is_empty());
            if emptied {
                manifest.doc_mut().remove(&section_path)?;
            }
            actions.push(PruneAction {
                section,
                name,
                section_removed: emptied,
            });
        }
    }
    Ok(actions)
}
