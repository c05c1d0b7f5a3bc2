//! Dependency reconciliation between a local and a workspace manifest
//!
//! For each dependency section, every entry declared by the local
//! manifest is checked against the workspace: entries unknown to the
//! workspace are propagated into it, matching entries are left alone,
//! and mismatched constraints raise a conflict. After that, the local
//! entry is rewritten to the `any` wildcard so the workspace becomes the
//! single source of truth for the actual constraint.
//!
//! All edits are staged in memory. [`merge_manifests`] runs every
//! section and reports every conflict it finds; callers save both
//! manifests only on success, which gives all-or-nothing semantics per
//! document pair.

use std::fmt;
use tracing::{debug, info};

use pubws_editor::{KeyPath, YamlValue};

use crate::errors::{Conflict, ManifestError};
use crate::manifest::Pubspec;

/// The wildcard sentinel: a constraint deferred to the workspace.
pub const WILDCARD: &str = "any";

// =============================================================================
// SECTIONS
// =============================================================================

/// The three dependency sections a manifest may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencySection {
    Dependencies,
    DevDependencies,
    DependencyOverrides,
}

impl DependencySection {
    pub const ALL: [DependencySection; 3] = [
        DependencySection::Dependencies,
        DependencySection::DevDependencies,
        DependencySection::DependencyOverrides,
    ];

    /// The section's key in the manifest document.
    pub fn key(self) -> &'static str {
        match self {
            DependencySection::Dependencies => "dependencies",
            DependencySection::DevDependencies => "dev_dependencies",
            DependencySection::DependencyOverrides => "dependency_overrides",
        }
    }

    pub fn path(self) -> KeyPath {
        KeyPath::root().key(self.key())
    }
}

impl fmt::Display for DependencySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// A dependency propagated into the workspace manifest.
#[derive(Debug, Clone)]
pub struct MergeNotice {
    pub section: DependencySection,
    pub name: String,
    pub constraint: String,
}

impl fmt::Display for MergeNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added {} to workspace {} ({})",
            self.name,
            self.section.key(),
            self.constraint
        )
    }
}

/// Result of merging one or more sections.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Entries added to the workspace manifest.
    pub promoted: Vec<MergeNotice>,
    /// Local constraints rewritten to the wildcard in this run.
    pub deferred: usize,
    /// Local entries that were already wildcarded.
    pub already_deferred: usize,
}

impl MergeOutcome {
    fn absorb(&mut self, other: MergeOutcome) {
        self.promoted.extend(other.promoted);
        self.deferred += other.deferred;
        self.already_deferred += other.already_deferred;
    }

    /// Whether the merge staged any edit at all.
    pub fn changed(&self) -> bool {
        !self.promoted.is_empty() || self.deferred > 0
    }
}

// =============================================================================
// CONSTRAINT COMPARISON
// =============================================================================

/// Whether a constraint is the wildcard sentinel (case-insensitive).
pub fn is_wildcard(value: &YamlValue) -> bool {
    value
        .as_scalar()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case(WILDCARD))
}

/// Exact comparison of two opaque constraints.
///
/// Scalars compare by trimmed string equality. Block constraints (path
/// or git tables) compare by their indentation-normalized lines, so the
/// same table written in both documents is never a conflict. A scalar
/// never equals a block.
pub fn constraints_equal(a: &YamlValue, b: &YamlValue) -> bool {
    match (a, b) {
        (YamlValue::Scalar(x), YamlValue::Scalar(y)) => x.trim() == y.trim(),
        (YamlValue::Block(x), YamlValue::Block(y)) => {
            let norm = |lines: &[String]| -> Vec<String> {
                lines
                    .iter()
                    .map(|l| l.trim_end().to_string())
                    .filter(|l| !l.is_empty())
                    .collect()
            };
            norm(x) == norm(y)
        }
        _ => false,
    }
}

/// Single-line rendering of a constraint for notices and conflicts.
pub fn display_constraint(value: &YamlValue) -> String {
    match value {
        YamlValue::Scalar(s) if s.trim().is_empty() => "(empty)".to_string(),
        YamlValue::Scalar(s) => s.trim().to_string(),
        YamlValue::Block(lines) => lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

// =============================================================================
// MERGE
// =============================================================================

/// Reconcile one dependency section between the two manifests.
///
/// Edits are staged in the manifests' documents; nothing touches disk.
/// The first mismatched constraint aborts the section with a
/// [`ManifestError::Conflicts`] error.
pub fn merge_section(
    local: &mut Pubspec,
    workspace: &mut Pubspec,
    section: DependencySection,
) -> Result<MergeOutcome, ManifestError> {
    let section_path = section.path();
    let Some(entries) = local.doc().entries(&section_path)? else {
        // A package need not declare dependencies of this kind.
        debug!("no {} section in {:?}", section.key(), local.path());
        return Ok(MergeOutcome::default());
    };

    if !workspace.doc().contains(&section_path) {
        workspace.doc_mut().insert_top_level(section.key(), None, None)?;
    }

    let mut outcome = MergeOutcome::default();
    for (name, local_constraint) in entries {
        let entry_path = section_path.clone().key(name.clone());
        match workspace.doc().value_of(&entry_path) {
            None => {
                workspace.doc_mut().set(&entry_path, &local_constraint)?;
                info!(
                    "propagating {}/{} ({}) into workspace",
                    section.key(),
                    name,
                    display_constraint(&local_constraint)
                );
                outcome.promoted.push(MergeNotice {
                    section,
                    name: name.clone(),
                    constraint: display_constraint(&local_constraint),
                });
            }
            Some(workspace_constraint) => {
                let relaxed =
                    is_wildcard(&local_constraint) || is_wildcard(&workspace_constraint);
                if !relaxed && !constraints_equal(&local_constraint, &workspace_constraint) {
                    return Err(ManifestError::Conflicts(vec![Conflict {
                        section: section.key().to_string(),
                        name,
                        local: display_constraint(&local_constraint),
                        workspace: display_constraint(&workspace_constraint),
                    }]));
                }
            }
        }

        // Defer the local entry to the workspace.
        if is_wildcard(&local_constraint) {
            outcome.already_deferred += 1;
        } else {
            local
                .doc_mut()
                .set(&entry_path, &YamlValue::scalar(WILDCARD))?;
            outcome.deferred += 1;
        }
    }
    Ok(outcome)
}

/// Reconcile all three dependency sections.
///
/// Sections are processed independently so every conflict surfaces in
/// one run; any conflict fails the whole merge and no caller should
/// flush either document.
pub fn merge_manifests(
    local: &mut Pubspec,
    workspace: &mut Pubspec,
) -> Result<MergeOutcome, ManifestError> {
    let mut outcome = MergeOutcome::default();
    let mut conflicts = Vec::new();
    for section in DependencySection::ALL {
        match merge_section(local, workspace, section) {
            Ok(section_outcome) => outcome.absorb(section_outcome),
            Err(ManifestError::Conflicts(mut found)) => conflicts.append(&mut found),
            Err(other) => return Err(other),
        }
    }
    if conflicts.is_empty() {
        Ok(outcome)
    } else {
        Err(ManifestError::Conflicts(conflicts))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pubspec(text: &str) -> Pubspec {
        match Pubspec::from_text("pubspec.yaml", text) {
            Ok(m) => m,
            Err(e) => unreachable!("fixture failed to parse: {e}"),
        }
    }

    fn local_with(deps: &str) -> Pubspec {
        pubspec(&format!("name: demo\ndependencies:\n{deps}"))
    }

    #[test]
    fn test_scenario_a_propagates_into_missing_section() {
        let mut local = local_with("  foo: ^1.2.0\n");
        let mut workspace = pubspec("name: ws\n");

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(result.is_ok_and(|o| o.promoted.len() == 1 && o.deferred == 1));
        assert!(workspace.doc().text().contains("dependencies:\n  foo: ^1.2.0\n"));
        assert!(local.doc().text().contains("  foo: any\n"));
    }

    #[test]
    fn test_scenario_b_equal_constraint_is_not_a_conflict() {
        let mut local = local_with("  foo: ^1.2.0\n");
        let mut workspace = pubspec("name: ws\ndependencies:\n  foo: ^1.2.0\n");
        let before = workspace.doc().text().to_string();

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(result.is_ok_and(|o| o.promoted.is_empty() && o.deferred == 1));
        assert_eq!(workspace.doc().text(), before);
        assert!(local.doc().text().contains("  foo: any\n"));
    }

    #[test]
    fn test_scenario_c_conflict_names_both_constraints() {
        let mut local = local_with("  foo: ^1.2.0\n");
        let mut workspace = pubspec("name: ws\ndependencies:\n  foo: ^2.0.0\n");
        let before = workspace.doc().text().to_string();

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        let Err(ManifestError::Conflicts(conflicts)) = result else {
            unreachable!("expected a conflict");
        };
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name, "foo");
        assert_eq!(conflicts[0].local, "^1.2.0");
        assert_eq!(conflicts[0].workspace, "^2.0.0");
        // Conflict symmetry: the workspace document is untouched.
        assert_eq!(workspace.doc().text(), before);
    }

    #[test]
    fn test_scenario_d_absent_section_is_a_noop() {
        let mut local = pubspec("name: demo\n");
        let mut workspace = pubspec("name: ws\n");

        let result =
            merge_section(&mut local, &mut workspace, DependencySection::DevDependencies);
        assert!(result.is_ok_and(|o| !o.changed()));
        assert!(!local.is_modified());
        assert!(!workspace.is_modified());
    }

    #[test]
    fn test_wildcard_workspace_entry_never_conflicts() {
        let mut local = local_with("  foo: ^1.2.0\n");
        let mut workspace = pubspec("name: ws\ndependencies:\n  foo: Any\n");

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(result.is_ok());
        assert!(local.doc().text().contains("  foo: any\n"));
    }

    #[test]
    fn test_wildcard_local_entry_never_conflicts() {
        let mut local = local_with("  foo: any\n");
        let mut workspace = pubspec("name: ws\ndependencies:\n  foo: ^2.0.0\n");

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(result.is_ok_and(|o| o.already_deferred == 1 && o.deferred == 0));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut local = local_with("  foo: ^1.2.0\n  bar: ^0.3.1\n");
        let mut workspace = pubspec("name: ws\n");

        let first = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(first.is_ok());
        let local_after_first = local.doc().text().to_string();

        let second = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(second.is_ok_and(|o| o.deferred == 0 && o.already_deferred == 2));
        assert_eq!(local.doc().text(), local_after_first);
    }

    #[test]
    fn test_propagation_preserves_declared_order() {
        let mut local = local_with("  zeta: ^1.0.0\n  alpha: ^2.0.0\n");
        let mut workspace = pubspec("name: ws\n");

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        let Ok(outcome) = result else {
            unreachable!("merge failed");
        };
        let order: Vec<&str> = outcome.promoted.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha"]);
        let text = workspace.doc().text();
        assert!(text.contains("  zeta: ^1.0.0\n  alpha: ^2.0.0\n"));
    }

    #[test]
    fn test_path_dependency_propagates_verbatim() {
        let mut local = local_with("  kit:\n    path: ../kit\n");
        let mut workspace = pubspec("name: ws\n");

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(result.is_ok());
        assert!(workspace.doc().text().contains("dependencies:\n  kit:\n    path: ../kit\n"));
        assert!(local.doc().text().contains("  kit: any\n"));
    }

    #[test]
    fn test_identical_path_dependency_is_not_a_conflict() {
        let mut local =
            pubspec("name: demo\ndependency_overrides:\n  kit:\n    path: ../kit\n");
        let mut workspace =
            pubspec("name: ws\ndependency_overrides:\n  kit:\n    path: ../kit\n");

        let result = merge_section(
            &mut local,
            &mut workspace,
            DependencySection::DependencyOverrides,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_scalar_vs_path_dependency_conflicts() {
        let mut local = local_with("  kit: ^1.0.0\n");
        let mut workspace = pubspec("name: ws\ndependencies:\n  kit:\n    path: ../kit\n");

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(matches!(result, Err(ManifestError::Conflicts(_))));
    }

    #[test]
    fn test_empty_local_section_creates_workspace_section() {
        let mut local = pubspec("name: demo\ndependencies:\n");
        let mut workspace = pubspec("name: ws\n");

        let result = merge_section(&mut local, &mut workspace, DependencySection::Dependencies);
        assert!(result.is_ok());
        assert!(workspace.doc().contains(&DependencySection::Dependencies.path()));
    }

    #[test]
    fn test_merge_manifests_reports_conflicts_from_every_section() {
        let mut local = pubspec(
            "name: demo\ndependencies:\n  foo: ^1.0.0\ndev_dependencies:\n  lints: ^3.0.0\n",
        );
        let mut workspace = pubspec(
            "name: ws\ndependencies:\n  foo: ^2.0.0\ndev_dependencies:\n  lints: ^4.0.0\n",
        );

        let result = merge_manifests(&mut local, &mut workspace);
        let Err(ManifestError::Conflicts(conflicts)) = result else {
            unreachable!("expected conflicts");
        };
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().any(|c| c.section == "dependencies"));
        assert!(conflicts.iter().any(|c| c.section == "dev_dependencies"));
    }

    #[test]
    fn test_merge_manifests_all_sections() {
        let mut local = pubspec(
            "name: demo\n\
             dependencies:\n  foo: ^1.0.0\n\
             dev_dependencies:\n  lints: ^4.0.0\n\
             dependency_overrides:\n  kit:\n    path: ../kit\n",
        );
        let mut workspace = pubspec("name: ws\n");

        let result = merge_manifests(&mut local, &mut workspace);
        assert!(result.is_ok_and(|o| o.promoted.len() == 3 && o.deferred == 3));
        let text = local.doc().text();
        assert!(text.contains("  foo: any\n"));
        assert!(text.contains("  lints: any\n"));
        assert!(text.contains("  kit: any\n"));
    }

    #[test]
    fn test_merge_preserves_comments_and_layout() {
        let mut local = pubspec(
            "name: demo\n\n# runtime deps\ndependencies:\n  foo: ^1.0.0 # keep me\n",
        );
        let mut workspace = pubspec("name: ws\n");

        let result = merge_manifests(&mut local, &mut workspace);
        assert!(result.is_ok());
        let text = local.doc().text();
        assert!(text.contains("# runtime deps\n"));
        assert!(text.contains("  foo: any # keep me\n"));
    }
}
