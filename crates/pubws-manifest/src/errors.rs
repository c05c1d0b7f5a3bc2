use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use pubws_editor::EditError;

/// One detected constraint mismatch between local and workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub section: String,
    pub name: String,
    pub local: String,
    pub workspace: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: local declares '{}', workspace declares '{}'",
            self.section, self.name, self.local, self.workspace
        )
    }
}

/// Errors that can occur during manifest operations
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("dependency conflicts detected:\n{}", format_conflicts(.0))]
    Conflicts(Vec<Conflict>),

    #[error("manifest at {} has no 'name' field", .0.display())]
    MissingName(PathBuf),
}

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!("  {c}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_display() {
        let conflict = Conflict {
            section: "dependencies".to_string(),
            name: "http".to_string(),
            local: "^1.1.0".to_string(),
            workspace: "^2.0.0".to_string(),
        };
        assert_eq!(
            conflict.to_string(),
            "dependencies/http: local declares '^1.1.0', workspace declares '^2.0.0'"
        );
    }

    #[test]
    fn test_conflicts_error_lists_every_conflict() {
        let err = ManifestError::Conflicts(vec![
            Conflict {
                section: "dependencies".to_string(),
                name: "http".to_string(),
                local: "^1.1.0".to_string(),
                workspace: "^2.0.0".to_string(),
            },
            Conflict {
                section: "dev_dependencies".to_string(),
                name: "lints".to_string(),
                local: "^3.0.0".to_string(),
                workspace: "^4.0.0".to_string(),
            },
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("dependencies/http"));
        assert!(rendered.contains("dev_dependencies/lints"));
    }
}
