//! Bulk wildcard pinning
//!
//! Rewrites every version constraint in all three dependency sections of
//! one manifest to the `any` wildcard. Path and git tables are left
//! alone: they reference a location, not a version, so there is nothing
//! to relax.

use tracing::debug;

use pubws_editor::YamlValue;

use crate::errors::ManifestError;
use crate::manifest::Pubspec;
use crate::merge::{is_wildcard, DependencySection, WILDCARD};

/// Rewrite every scalar constraint to the wildcard. Returns the number
/// of entries changed; edits stay in memory until the caller saves.
pub fn pin_all(manifest: &mut Pubspec) -> Result<usize, ManifestError> {
    let mut changed = 0;
    for section in DependencySection::ALL {
        let section_path = section.path();
        let Some(entries) = manifest.doc().entries(&section_path)? else {
            continue;
        };
        for (name, constraint) in entries {
            let YamlValue::Scalar(_) = constraint else {
                continue;
            };
            if is_wildcard(&constraint) {
                continue;
            }
            manifest
                .doc_mut()
                .set(&section_path.clone().key(name), &YamlValue::scalar(WILDCARD))?;
            changed += 1;
        }
    }
    debug!("pinned {} constraint(s) to '{}'", changed, WILDCARD);
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pubspec(text: &str) -> Pubspec {
        match Pubspec::from_text("pubspec.yaml", text) {
            Ok(m) => m,
            Err(e) => unreachable!("fixture failed to parse: {e}"),
        }
    }

    #[test]
    fn test_pins_all_sections() {
        let mut manifest = pubspec(
            "name: demo\n\
             dependencies:\n  foo: ^1.0.0\n\
             dev_dependencies:\n  lints: ^4.0.0\n\
             dependency_overrides:\n  bar: 2.0.0\n",
        );
        let changed = pin_all(&mut manifest);
        assert!(changed.is_ok_and(|n| n == 3));
        let text = manifest.doc().text();
        assert!(text.contains("  foo: any\n"));
        assert!(text.contains("  lints: any\n"));
        assert!(text.contains("  bar: any\n"));
    }

    #[test]
    fn test_pin_skips_wildcards_and_path_tables() {
        let src = "name: demo\ndependencies:\n  foo: any\n  kit:\n    path: ../kit\n";
        let mut manifest = pubspec(src);
        let changed = pin_all(&mut manifest);
        assert!(changed.is_ok_and(|n| n == 0));
        assert_eq!(manifest.doc().text(), src);
    }
}
