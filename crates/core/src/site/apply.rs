//! Executes a site plan against the site folder.
//!
//! Deletions that need confirmation are returned to the caller instead of
//! being performed; the prompt itself belongs to the CLI shell. The apply
//! step is not transactional: a crash can leave the folder partially
//! updated, and re-running reproduces the same target state.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::assets;
use super::planner::{PlanAction, SitePlan};

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("failed to write {0}: {1}")]
    Write(String, #[source] io::Error),

    #[error("failed to delete {0}: {1}")]
    Delete(String, #[source] io::Error),
}

#[derive(Debug, Default)]
pub struct ApplyOutcome {
    pub written: Vec<String>,
    pub deleted: Vec<String>,
    /// Absolute paths of files the caller must confirm before deleting.
    pub needs_confirmation: Vec<PathBuf>,
}

/// Apply `plan` to the site folder. `content` maps output file names to
/// their new contents for `Overwrite` entries; `CreateIfAbsent` entries
/// fall back to the built-in assets.
pub fn apply(
    plan: &SitePlan,
    site_path: &Path,
    content: &BTreeMap<String, String>,
) -> Result<ApplyOutcome, ApplyError> {
    let mut outcome = ApplyOutcome::default();

    for entry in plan.iter() {
        let path = site_path.join(&entry.file_name);
        match entry.action {
            PlanAction::Overwrite => {
                let Some(data) = content.get(&entry.file_name) else {
                    tracing::debug!(file = %entry.file_name, "no content for planned overwrite");
                    continue;
                };
                fs::write(&path, data)
                    .map_err(|e| ApplyError::Write(path.display().to_string(), e))?;
                outcome.written.push(entry.file_name);
            }
            PlanAction::CreateIfAbsent => {
                if path.exists() {
                    continue;
                }
                let Some(data) = assets::default_asset(&entry.file_name) else {
                    continue;
                };
                fs::write(&path, data)
                    .map_err(|e| ApplyError::Write(path.display().to_string(), e))?;
                outcome.written.push(entry.file_name);
            }
            PlanAction::Delete => {
                fs::remove_file(&path)
                    .map_err(|e| ApplyError::Delete(path.display().to_string(), e))?;
                outcome.deleted.push(entry.file_name);
            }
            PlanAction::DeleteWithConfirmation => {
                outcome.needs_confirmation.push(path);
            }
            PlanAction::Keep => {}
        }
    }

    tracing::info!(
        written = outcome.written.len(),
        deleted = outcome.deleted.len(),
        pending = outcome.needs_confirmation.len(),
        "applied site plan"
    );
    Ok(outcome)
}

/// Delete files whose removal the user has confirmed.
pub fn delete_confirmed(paths: &[PathBuf]) -> Result<usize, ApplyError> {
    for path in paths {
        fs::remove_file(path)
            .map_err(|e| ApplyError::Delete(path.display().to_string(), e))?;
    }
    Ok(paths.len())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use tempfile::TempDir;

    use super::super::planner::plan;
    use super::*;

    fn content(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_apply_writes_overwrites_and_assets() {
        let dir = TempDir::new().unwrap();
        let stems: BTreeSet<String> = ["index".to_string()].into();
        let site_plan = plan(&stems, &[], &BTreeSet::new(), dir.path());
        let outcome = apply(
            &site_plan,
            dir.path(),
            &content(&[("index.md", "# home\n"), ("index.html", "<p>home</p>\n")]),
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("index.md")).unwrap(), "# home\n");
        assert!(dir.path().join("style.css").exists());
        assert!(dir.path().join("header.html").exists());
        assert!(outcome.written.contains(&"index.html".to_string()));
    }

    #[test]
    fn test_apply_never_replaces_existing_assets() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("style.css"), "body { color: red }\n").unwrap();
        let site_plan = plan(&BTreeSet::new(), &["style.css".to_string()], &BTreeSet::new(), dir.path());
        apply(&site_plan, dir.path(), &BTreeMap::new()).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("style.css")).unwrap(),
            "body { color: red }\n"
        );
    }

    #[test]
    fn test_apply_deletes_orphan_markdown() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("orphan.md"), "old\n").unwrap();
        let site_plan =
            plan(&BTreeSet::new(), &["orphan.md".to_string()], &BTreeSet::new(), dir.path());
        let outcome = apply(&site_plan, dir.path(), &BTreeMap::new()).unwrap();
        assert!(!dir.path().join("orphan.md").exists());
        assert_eq!(outcome.deleted, vec!["orphan.md".to_string()]);
    }

    #[test]
    fn test_apply_defers_html_deletion_to_caller() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("old.html"), "<p>old</p>\n").unwrap();
        let site_plan =
            plan(&BTreeSet::new(), &["old.html".to_string()], &BTreeSet::new(), dir.path());
        let outcome = apply(&site_plan, dir.path(), &BTreeMap::new()).unwrap();

        // Still on disk until someone confirms.
        assert!(dir.path().join("old.html").exists());
        assert_eq!(outcome.needs_confirmation, vec![dir.path().join("old.html")]);

        delete_confirmed(&outcome.needs_confirmation).unwrap();
        assert!(!dir.path().join("old.html").exists());
    }
}
